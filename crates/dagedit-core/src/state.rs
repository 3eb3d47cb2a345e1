//! The editable graph state: node records plus the container layout.
//!
//! Edges exist only in the [`Layout`]: "parent contains child at position i"
//! means the child's id sits at index i of the parent's children container
//! (or of the root container for top-level nodes). A node id may appear in
//! several containers at once; all instances share the single record in
//! [`DagState::nodes`].

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cycle::find_cycle;
use crate::error::CoreError;
use crate::id::{ContainerId, NodeId};

/// Canonical node record. At most one per id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Mapping from container id to its ordered member ids.
///
/// Containers are created lazily on first insertion. A missing container
/// reads as empty, and equality ignores the difference between the two.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    containers: IndexMap<ContainerId, Vec<NodeId>>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members of `id`, or an empty slice if the container does not exist.
    pub fn container(&self, id: &ContainerId) -> &[NodeId] {
        self.containers
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the container has been created (it may still be empty).
    pub fn has_container(&self, id: &ContainerId) -> bool {
        self.containers.contains_key(id)
    }

    /// Replaces the contents of a container, creating it if absent.
    pub fn set_container(&mut self, id: ContainerId, members: Vec<NodeId>) {
        self.containers.insert(id, members);
    }

    /// Empties a container if it exists. Missing containers stay missing.
    pub fn clear_container(&mut self, id: &ContainerId) {
        if let Some(members) = self.containers.get_mut(id) {
            members.clear();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContainerId, &[NodeId])> {
        self.containers.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Locates an instance of `node` in `container`.
    ///
    /// The slot at `hint` wins when it holds `node`; otherwise the first
    /// occurrence is returned.
    pub fn position_of(&self, container: &ContainerId, node: &NodeId, hint: usize) -> Option<usize> {
        let members = self.container(container);
        if members.get(hint) == Some(node) {
            return Some(hint);
        }
        members.iter().position(|m| m == node)
    }

    /// Inserts `node` at `index`, clamped to the container length. Returns
    /// the index actually used.
    pub fn insert_at(&mut self, container: &ContainerId, index: usize, node: NodeId) -> usize {
        let members = self.containers.entry(container.clone()).or_default();
        let index = index.min(members.len());
        members.insert(index, node);
        index
    }

    /// Inserts a run of nodes starting at `index`, clamped like [`Layout::insert_at`].
    pub fn splice_at(&mut self, container: &ContainerId, index: usize, nodes: &[NodeId]) {
        let members = self.containers.entry(container.clone()).or_default();
        let index = index.min(members.len());
        members.splice(index..index, nodes.iter().cloned());
    }

    /// Removes up to `count` entries starting at `index`.
    pub fn drain_at(&mut self, container: &ContainerId, index: usize, count: usize) {
        if let Some(members) = self.containers.get_mut(container) {
            let start = index.min(members.len());
            let end = index.saturating_add(count).min(members.len());
            members.drain(start..end);
        }
    }

    /// Removes one instance of `node` from `container`, preferring the slot at
    /// `hint`. Returns the removed position, or `None` if absent.
    pub fn remove_instance(&mut self, container: &ContainerId, node: &NodeId, hint: usize) -> Option<usize> {
        let pos = self.position_of(container, node, hint)?;
        if let Some(members) = self.containers.get_mut(container) {
            members.remove(pos);
        }
        Some(pos)
    }

    /// Whether `node` appears in any container.
    pub fn contains_instance(&self, node: &NodeId) -> bool {
        self.containers.values().any(|members| members.contains(node))
    }

    /// Total number of instances of `node` across all containers.
    pub fn instance_count(&self, node: &NodeId) -> usize {
        self.containers
            .values()
            .map(|members| members.iter().filter(|m| *m == node).count())
            .sum()
    }

    /// Number of distinct node ids present anywhere in the layout.
    pub fn live_node_count(&self) -> usize {
        self.containers
            .values()
            .flatten()
            .collect::<HashSet<_>>()
            .len()
    }
}

impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        let covers = |a: &Layout, b: &Layout| {
            a.containers
                .iter()
                .all(|(id, members)| members.as_slice() == b.container(id))
        };
        covers(self, other) && covers(other, self)
    }
}

impl Eq for Layout {}

impl FromIterator<(ContainerId, Vec<NodeId>)> for Layout {
    fn from_iter<I: IntoIterator<Item = (ContainerId, Vec<NodeId>)>>(iter: I) -> Self {
        Layout {
            containers: iter.into_iter().collect(),
        }
    }
}

/// Node table plus layout. The engine owns one of these exclusively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagState {
    pub nodes: IndexMap<NodeId, Node>,
    pub layout: Layout,
}

impl DagState {
    /// An empty graph with a root container and no nodes.
    pub fn new() -> Self {
        let mut layout = Layout::new();
        layout.set_container(ContainerId::Root, Vec::new());
        DagState {
            nodes: IndexMap::new(),
            layout,
        }
    }

    /// Decodes a state from its JSON wire form and validates it.
    ///
    /// Missing `nodes` or `layout` fields are a decoding failure.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let state: DagState = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn label(&self, id: &NodeId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.label.as_str())
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Checks the structural invariants a freshly constructed state must hold.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (key, node) in &self.nodes {
            if *key != node.id {
                return Err(CoreError::MismatchedRecord {
                    key: key.clone(),
                    node_id: node.id.clone(),
                });
            }
        }

        for (container_id, members) in self.layout.iter() {
            if let Some(missing) = members.iter().find(|m| !self.nodes.contains_key(*m)) {
                return Err(CoreError::DanglingInstance {
                    node_id: missing.clone(),
                    container_id: container_id.clone(),
                });
            }
        }

        if let Some(orphan) = self.nodes.keys().find(|id| !self.layout.contains_instance(id)) {
            return Err(CoreError::OrphanRecord {
                node_id: orphan.clone(),
            });
        }

        if let Some(node_id) = find_cycle(&self.layout) {
            return Err(CoreError::CyclicLayout { node_id });
        }

        Ok(())
    }
}
