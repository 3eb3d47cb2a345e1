//! Editable multi-parent DAG with a reversible operation log.
//!
//! A graph is a table of labeled [`Node`]s plus a [`Layout`] of ordered
//! containers. The [`Engine`] is the only way to change it: callers hand it
//! an [`Operation`], get back the committed state or a [`DagError`], and can
//! walk the linear undo/redo history.

pub mod cycle;
pub mod engine;
pub mod error;
pub mod generate;
pub mod history;
pub mod id;
pub mod ops;
pub mod seed;
pub mod state;

// Re-export commonly used types
pub use engine::{Engine, EngineConfig, SubscriptionId};
pub use error::{CoreError, DagError, ErrorContext, ErrorKind, ErrorReport};
pub use generate::{generate_node_id, NodeIdGenerator};
pub use history::History;
pub use id::{ContainerId, NodeId};
pub use ops::{AddOp, ChangeLabelOp, DeleteOp, MoveOp, Operation, OperationKind};
pub use state::{DagState, Layout, Node};
