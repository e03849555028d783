// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # changegraph
//!
//! Extracts an annotated resource dependency graph from an infrastructure plan.
//!
//! ## Overview
//!
//! A plan engine produces two independent views of the same plan: the
//! dependency graph it walked and one change record per resource instance.
//! changegraph joins the two:
//!
//! - Keep only the resource nodes of the graph, with their immediate
//!   resource dependencies
//! - Attach each change record to its resource by address
//! - Reduce every record to the attributes whose value actually changes
//! - Emit the result as a JSON array, one entry per resource
//!
//! ## Architecture
//!
//! 1. **Plan contract** ([`plan`]): graph traits, change records, attribute values
//! 2. **Projection** ([`graph::GraphProjector`]): plan graph to resource vertices
//! 3. **Merge** ([`graph::ChangeMerger`]): change records into vertices
//!
//! Records that cannot be placed are reported as [`graph::Diagnostics`]
//! instead of failing the run.
//!
//! ## Modules
//!
//! - [`plan`]: Upstream plan contract and document reader
//! - [`graph`]: Projection, merge and the change graph model
//! - [`config`]: Configuration parsing and environment overrides
//! - [`cli`]: Command-line interface
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```json
//! [
//!   {
//!     "type": "managed",
//!     "mode": "create",
//!     "addr": "aws_instance.web",
//!     "changes": { "0": { "id": "i-1" } },
//!     "to": []
//!   }
//! ]
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod plan;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ExtractorConfig};
pub use error::{ChangeGraphError, Result};
pub use graph::{ChangeGraph, ChangeMerger, Extraction, GraphProjector, Vertex, extract};
pub use plan::{PlanDocument, PlanReader};
