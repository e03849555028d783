//! Change graph types.
//!
//! The [`ChangeGraph`] owns every [`Vertex`] and keeps an address index into
//! its own vertex list. Vertices are only ever changed through the graph's
//! methods, so a lookup through the index and a scan of the list always see
//! the same vertex.

use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::plan::{Action, ResourceChange, ResourceMode, changed_attributes};

/// Rendered attribute values of one instance, by attribute name.
pub type AttributeChanges = BTreeMap<String, String>;

/// One resource in the change graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vertex {
    /// Managed resource or data source.
    #[serde(rename = "type")]
    pub kind: ResourceMode,
    /// Planned action; `None` until a change record matches.
    #[serde(rename = "mode", serialize_with = "serialize_action")]
    pub action: Option<Action>,
    /// Resource address, unique within the graph.
    #[serde(rename = "addr")]
    pub address: String,
    /// Changed attributes by instance key.
    pub changes: BTreeMap<String, AttributeChanges>,
    /// Addresses of the resources this one depends on.
    #[serde(rename = "to")]
    pub depends_on: Vec<String>,
}

impl Vertex {
    /// Creates a vertex with no action and no changes.
    #[must_use]
    pub fn new(address: impl Into<String>, kind: ResourceMode, depends_on: Vec<String>) -> Self {
        Self {
            kind,
            action: None,
            address: address.into(),
            changes: BTreeMap::new(),
            depends_on,
        }
    }

    /// Returns the action label, empty when no change matched.
    #[must_use]
    pub fn action_label(&self) -> &'static str {
        self.action.map_or("", Action::label)
    }
}

#[allow(clippy::ref_option)]
fn serialize_action<S>(action: &Option<Action>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(action.map_or("", Action::label))
}

/// Vertex collection plus address index.
#[derive(Debug, Clone, Default)]
pub struct ChangeGraph {
    vertices: Vec<Vertex>,
    index: HashMap<String, usize>,
}

/// Counts of vertices by planned action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    /// Total vertices.
    pub total: usize,
    /// Vertices to create.
    pub creates: usize,
    /// Vertices to update in place.
    pub updates: usize,
    /// Vertices to replace.
    pub replaces: usize,
    /// Vertices to delete.
    pub deletes: usize,
    /// Data sources to read.
    pub reads: usize,
    /// Vertices with an explicit no-op.
    pub unchanged: usize,
    /// Vertices no change record matched.
    pub untouched: usize,
}

impl ChangeGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex.
    ///
    /// A vertex whose address is already present is handed back unchanged.
    ///
    /// # Errors
    ///
    /// Returns the rejected vertex when its address is already indexed.
    pub fn insert(&mut self, vertex: Vertex) -> std::result::Result<(), Vertex> {
        if self.index.contains_key(&vertex.address) {
            return Err(vertex);
        }
        self.index.insert(vertex.address.clone(), self.vertices.len());
        self.vertices.push(vertex);
        Ok(())
    }

    /// Merges one decoded change record into the vertex at its address.
    ///
    /// Sets the vertex action and replaces the attribute diff stored under the
    /// record's instance key. Returns false, leaving the graph untouched, when
    /// no vertex has the address.
    pub fn apply_change(&mut self, change: &ResourceChange) -> bool {
        let Some(vertex) = self
            .index
            .get(&change.address)
            .and_then(|&i| self.vertices.get_mut(i))
        else {
            return false;
        };

        vertex.action = Some(change.action);
        let diff = changed_attributes(change.before.as_ref(), change.after.as_ref());
        vertex.changes.insert(change.instance_key(), diff);
        true
    }

    /// Looks up a vertex by address.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<&Vertex> {
        self.index.get(address).and_then(|&i| self.vertices.get(i))
    }

    /// Vertices in discovery order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Counts vertices by planned action.
    #[must_use]
    pub fn summary(&self) -> GraphSummary {
        let mut summary = GraphSummary {
            total: self.vertices.len(),
            ..GraphSummary::default()
        };

        for vertex in &self.vertices {
            match vertex.action {
                None => summary.untouched += 1,
                Some(Action::Create) => summary.creates += 1,
                Some(Action::Update) => summary.updates += 1,
                Some(Action::Delete) => summary.deletes += 1,
                Some(Action::Read) => summary.reads += 1,
                Some(Action::NoOp) => summary.unchanged += 1,
                Some(Action::DeleteThenCreate | Action::CreateThenDelete) => summary.replaces += 1,
            }
        }

        summary
    }

    /// Serializes the vertex list as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serializes the vertex list as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for ChangeGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.vertices.serialize(serializer)
    }
}

impl GraphSummary {
    /// Returns true if any vertex will be created, changed or destroyed.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.creates > 0 || self.updates > 0 || self.replaces > 0 || self.deletes > 0
    }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to replace, {} to destroy",
            self.creates, self.updates, self.replaces, self.deletes
        )
    }
}
