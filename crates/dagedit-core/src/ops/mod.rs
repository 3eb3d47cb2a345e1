//! Reversible graph operations.
//!
//! [`Operation`] is the unit of mutation and of undo/redo. Each variant has a
//! forward handler and an inverse handler in its own submodule; both are pure
//! functions over a single [`DagState`].
//!
//! Instances are addressed by position first and identity second: a removal
//! takes the slot at the recorded index when that slot holds the node, and
//! otherwise the first occurrence in the container. Insertions clamp the
//! index to the container length.
//!
//! On the wire an operation is a single-key object naming its kind:
//!
//! ```json
//! {"move": {"id": "A", "from_parent_id": "root", "to_parent_id": "B-children",
//!           "from_index": 0, "to_index": 1}}
//! ```

pub mod add;
pub mod change_label;
pub mod delete;
pub mod move_node;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{ContainerId, NodeId};
use crate::state::DagState;

/// Insert a node instance, creating the record if absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOp {
    pub id: NodeId,
    pub parent_id: ContainerId,
    pub label: String,
    pub index: usize,
}

/// Remove one instance of a node, collapsing the node if it was the last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOp {
    pub id: NodeId,
    pub parent_id: ContainerId,
    pub label: String,
    pub index: usize,
    /// Contents of the node's children container when the delete was issued.
    pub children_ids: Vec<NodeId>,
}

/// Relocate one instance of a node between (or within) containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOp {
    pub id: NodeId,
    pub from_parent_id: ContainerId,
    pub to_parent_id: ContainerId,
    pub from_index: usize,
    pub to_index: usize,
}

/// Replace a node's label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLabelOp {
    pub id: NodeId,
    pub old_label: String,
    pub new_label: String,
}

/// A reversible graph mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add(AddOp),
    Delete(DeleteOp),
    Move(MoveOp),
    ChangeLabel(ChangeLabelOp),
}

/// Discriminant of an [`Operation`], used in error context and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Add,
    Delete,
    Move,
    ChangeLabel,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Add => "add",
            OperationKind::Delete => "delete",
            OperationKind::Move => "move",
            OperationKind::ChangeLabel => "change_label",
        };
        f.write_str(name)
    }
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Add(_) => OperationKind::Add,
            Operation::Delete(_) => OperationKind::Delete,
            Operation::Move(_) => OperationKind::Move,
            Operation::ChangeLabel(_) => OperationKind::ChangeLabel,
        }
    }

    /// The node this operation targets.
    pub fn node_id(&self) -> &NodeId {
        match self {
            Operation::Add(op) => &op.id,
            Operation::Delete(op) => &op.id,
            Operation::Move(op) => &op.id,
            Operation::ChangeLabel(op) => &op.id,
        }
    }

    /// Runs the forward handler.
    pub fn apply(&self, state: &mut DagState) {
        match self {
            Operation::Add(op) => add::apply(state, op),
            Operation::Delete(op) => delete::apply(state, op),
            Operation::Move(op) => move_node::apply(state, op),
            Operation::ChangeLabel(op) => change_label::apply(state, op),
        }
    }

    /// Runs the inverse handler.
    pub fn undo(&self, state: &mut DagState) {
        match self {
            Operation::Add(op) => add::undo(state, op),
            Operation::Delete(op) => delete::undo(state, op),
            Operation::Move(op) => move_node::undo(state, op),
            Operation::ChangeLabel(op) => change_label::undo(state, op),
        }
    }

    /// Rewrites the recorded positions and captured context to what `state`
    /// actually holds, so the inverse restores exactly what the forward
    /// handler changes.
    ///
    /// Only meaningful for an operation that already passed validation
    /// against `state`.
    pub fn resolve(&self, state: &DagState) -> Operation {
        match self {
            Operation::Add(op) => Operation::Add(AddOp {
                index: op.index.min(state.layout.container(&op.parent_id).len()),
                ..op.clone()
            }),
            Operation::Delete(op) => Operation::Delete(DeleteOp {
                index: state
                    .layout
                    .position_of(&op.parent_id, &op.id, op.index)
                    .unwrap_or(op.index),
                label: state.label(&op.id).unwrap_or(&op.label).to_string(),
                children_ids: state.layout.container(&op.id.children()).to_vec(),
                ..op.clone()
            }),
            Operation::Move(op) => {
                let from_index = state
                    .layout
                    .position_of(&op.from_parent_id, &op.id, op.from_index)
                    .unwrap_or(op.from_index);
                let mut dest_len = state.layout.container(&op.to_parent_id).len();
                if op.to_parent_id == op.from_parent_id {
                    dest_len = dest_len.saturating_sub(1);
                }
                Operation::Move(MoveOp {
                    from_index,
                    to_index: op.to_index.min(dest_len),
                    ..op.clone()
                })
            }
            Operation::ChangeLabel(op) => Operation::ChangeLabel(ChangeLabelOp {
                old_label: state.label(&op.id).unwrap_or(&op.old_label).to_string(),
                ..op.clone()
            }),
        }
    }

    /// Whether applying this operation would leave `state` unchanged.
    pub fn is_noop(&self) -> bool {
        match self {
            Operation::Move(op) => op.from_parent_id == op.to_parent_id && op.from_index == op.to_index,
            _ => false,
        }
    }

    // -----------------------------------------------------------------------
    // Builders capturing dispatch-time context
    // -----------------------------------------------------------------------

    /// Appends a new node `id` to the end of `parent`.
    pub fn add_child(state: &DagState, parent: &ContainerId, id: NodeId, label: impl Into<String>) -> Self {
        Operation::Add(AddOp {
            id,
            parent_id: parent.clone(),
            label: label.into(),
            index: state.layout.container(parent).len(),
        })
    }

    /// Deletes the first instance of `id` in `parent`, capturing its label,
    /// position and current children.
    pub fn delete_instance(state: &DagState, id: NodeId, parent: &ContainerId) -> Self {
        let index = state.layout.position_of(parent, &id, 0).unwrap_or(0);
        Operation::Delete(DeleteOp {
            label: state.label(&id).unwrap_or_default().to_string(),
            children_ids: state.layout.container(&id.children()).to_vec(),
            parent_id: parent.clone(),
            index,
            id,
        })
    }

    /// Moves whatever sits at `from.1` in container `from.0` to `to.1` in
    /// container `to.0`. Returns `None` if the source slot is empty.
    pub fn move_instance(
        state: &DagState,
        from: (&ContainerId, usize),
        to: (&ContainerId, usize),
    ) -> Option<Self> {
        let id = state.layout.container(from.0).get(from.1)?.clone();
        Some(Operation::Move(MoveOp {
            id,
            from_parent_id: from.0.clone(),
            to_parent_id: to.0.clone(),
            from_index: from.1,
            to_index: to.1,
        }))
    }

    /// Renames `id`, capturing its current label for undo.
    pub fn relabel(state: &DagState, id: NodeId, new_label: impl Into<String>) -> Self {
        Operation::ChangeLabel(ChangeLabelOp {
            old_label: state.label(&id).unwrap_or_default().to_string(),
            new_label: new_label.into(),
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> DagState {
        serde_json::from_value(json!({
            "nodes": {
                "A": {"id": "A", "label": "Alpha"},
                "B": {"id": "B", "label": "Beta"},
                "A1": {"id": "A1", "label": "Alpha-child-1"}
            },
            "layout": {"root": ["A", "B"], "A-children": ["A1"], "B-children": ["A"]}
        }))
        .unwrap()
    }

    #[test]
    fn wire_format_is_single_key_snake_case() {
        let op = Operation::ChangeLabel(ChangeLabelOp {
            id: NodeId::from("n1"),
            old_label: "Original".into(),
            new_label: "Updated".into(),
        });
        insta::assert_json_snapshot!(op, @r###"
        {
          "change_label": {
            "id": "n1",
            "old_label": "Original",
            "new_label": "Updated"
          }
        }
        "###);

        let parsed: Operation = serde_json::from_value(json!({
            "add": {"id": "x", "parent_id": "A-children", "label": "X", "index": 0}
        }))
        .unwrap();
        assert_eq!(parsed.kind(), OperationKind::Add);
        match parsed {
            Operation::Add(add) => assert_eq!(add.parent_id, NodeId::from("A").children()),
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn delete_builder_captures_children_and_position() {
        let state = seeded();
        let op = Operation::delete_instance(&state, NodeId::from("B"), &ContainerId::Root);
        assert_eq!(
            op,
            Operation::Delete(DeleteOp {
                id: NodeId::from("B"),
                parent_id: ContainerId::Root,
                label: "Beta".into(),
                index: 1,
                children_ids: vec![NodeId::from("A")],
            })
        );
    }

    #[test]
    fn move_builder_resolves_slot() {
        let state = seeded();
        let op = Operation::move_instance(&state, (&ContainerId::Root, 1), (&NodeId::from("A").children(), 0))
            .unwrap();
        assert_eq!(op.node_id(), &NodeId::from("B"));
        assert!(Operation::move_instance(&state, (&ContainerId::Root, 5), (&ContainerId::Root, 0)).is_none());
    }

    #[test]
    fn resolve_corrects_stale_positions() {
        let state = seeded();
        let stale = Operation::Delete(DeleteOp {
            id: NodeId::from("B"),
            parent_id: ContainerId::Root,
            label: "old".into(),
            index: 0,
            children_ids: vec![],
        });
        match stale.resolve(&state) {
            Operation::Delete(op) => {
                assert_eq!(op.index, 1);
                assert_eq!(op.label, "Beta");
                assert_eq!(op.children_ids, vec![NodeId::from("A")]);
            }
            other => panic!("expected delete, got {other:?}"),
        }

        let far = Operation::Move(MoveOp {
            id: NodeId::from("A"),
            from_parent_id: ContainerId::Root,
            to_parent_id: ContainerId::Root,
            from_index: 0,
            to_index: 99,
        });
        match far.resolve(&state) {
            Operation::Move(op) => assert_eq!(op.to_index, 1),
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn only_same_slot_moves_are_noops() {
        let state = seeded();
        let same = Operation::move_instance(&state, (&ContainerId::Root, 0), (&ContainerId::Root, 0)).unwrap();
        assert!(same.is_noop());
        let other = Operation::move_instance(&state, (&ContainerId::Root, 0), (&ContainerId::Root, 1)).unwrap();
        assert!(!other.is_noop());
        assert!(!Operation::relabel(&state, NodeId::from("A"), "x").is_noop());
    }
}
