//! Error types for dagedit-core.
//!
//! [`CoreError`] covers construction and parsing failures, which are fatal to
//! the caller. [`DagError`] covers dispatch-time rejections: the engine
//! returns one instead of mutating state, and every variant carries enough
//! context to render a precise message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::{ContainerId, NodeId};
use crate::ops::OperationKind;

/// Construction-time errors. An engine is never built from a state that
/// fails these checks.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A container key is neither `root` nor `<id>-children`.
    #[error("invalid container id: '{key}'")]
    InvalidContainerId { key: String },

    /// A node id is laid out in a container but has no record.
    #[error("node '{node_id}' appears in '{container_id}' but has no record")]
    DanglingInstance {
        node_id: NodeId,
        container_id: ContainerId,
    },

    /// A node record is keyed under a different id than it carries.
    #[error("node record keyed '{key}' carries id '{node_id}'")]
    MismatchedRecord { key: NodeId, node_id: NodeId },

    /// A node record exists without any instance in the layout.
    #[error("node '{node_id}' has a record but no instance in the layout")]
    OrphanRecord { node_id: NodeId },

    /// The layout already contains a cycle through this node.
    #[error("layout contains a cycle through '{node_id}'")]
    CyclicLayout { node_id: NodeId },

    /// The state could not be decoded from JSON.
    #[error("malformed state: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Machine-readable rejection kind, stable across the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    LastNodeDelete,
    CycleDetected,
    NodeNotFound,
    NodeNotInContainer,
}

/// Where a rejection happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorContext {
    pub node_id: NodeId,
    pub operation: OperationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<ContainerId>,
}

/// Serializable `{kind, message, context}` triple for collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    pub context: ErrorContext,
}

/// A dispatch rejected by validation. State is untouched when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DagError {
    /// Deleting would leave the graph with no live node.
    #[error("Cannot delete the last node")]
    LastNodeDelete {
        node_id: NodeId,
        operation: OperationKind,
    },

    /// Placing the node would make it an ancestor of itself.
    #[error("{} would create a cycle", cycle_verb(.operation))]
    CycleDetected {
        node_id: NodeId,
        container_id: ContainerId,
        operation: OperationKind,
    },

    /// The target node has no record.
    #[error("Node not found in state")]
    NodeNotFound {
        node_id: NodeId,
        operation: OperationKind,
    },

    /// The target node is not present in the named container.
    #[error("Node not found in container")]
    NodeNotInContainer {
        node_id: NodeId,
        container_id: ContainerId,
        operation: OperationKind,
    },
}

fn cycle_verb(operation: &OperationKind) -> &'static str {
    match operation {
        OperationKind::Add => "Add",
        OperationKind::Delete => "Delete",
        OperationKind::Move => "Move",
        OperationKind::ChangeLabel => "Label change",
    }
}

impl DagError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DagError::LastNodeDelete { .. } => ErrorKind::LastNodeDelete,
            DagError::CycleDetected { .. } => ErrorKind::CycleDetected,
            DagError::NodeNotFound { .. } => ErrorKind::NodeNotFound,
            DagError::NodeNotInContainer { .. } => ErrorKind::NodeNotInContainer,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        match self {
            DagError::LastNodeDelete { node_id, .. }
            | DagError::CycleDetected { node_id, .. }
            | DagError::NodeNotFound { node_id, .. }
            | DagError::NodeNotInContainer { node_id, .. } => node_id,
        }
    }

    pub fn context(&self) -> ErrorContext {
        let (operation, container_id) = match self {
            DagError::LastNodeDelete { operation, .. } | DagError::NodeNotFound { operation, .. } => {
                (*operation, None)
            }
            DagError::CycleDetected {
                container_id,
                operation,
                ..
            }
            | DagError::NodeNotInContainer {
                container_id,
                operation,
                ..
            } => (*operation, Some(container_id.clone())),
        };
        ErrorContext {
            node_id: self.node_id().clone(),
            operation,
            container_id,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
            context: self.context(),
        }
    }
}
