//! `move`: relocate one instance of a node.
//!
//! If the node is not found in the source container the move does nothing,
//! which guards against stale positions issued by a collaborator.

use crate::ops::MoveOp;
use crate::state::DagState;

pub fn apply(state: &mut DagState, op: &MoveOp) {
    if state
        .layout
        .remove_instance(&op.from_parent_id, &op.id, op.from_index)
        .is_some()
    {
        state
            .layout
            .insert_at(&op.to_parent_id, op.to_index, op.id.clone());
    }
}

pub fn undo(state: &mut DagState, op: &MoveOp) {
    if state
        .layout
        .remove_instance(&op.to_parent_id, &op.id, op.to_index)
        .is_some()
    {
        state
            .layout
            .insert_at(&op.from_parent_id, op.from_index, op.id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ContainerId, NodeId};
    use serde_json::json;

    fn ids(list: &[&str]) -> Vec<NodeId> {
        list.iter().map(|s| NodeId::from(*s)).collect()
    }

    fn two_level() -> DagState {
        serde_json::from_value(json!({
            "nodes": {
                "n1": {"id": "n1", "label": "Node 1"},
                "n2": {"id": "n2", "label": "Node 2"},
                "n3": {"id": "n3", "label": "Node 3"}
            },
            "layout": {"root": ["n1", "n3"], "n1-children": ["n2"], "n2-children": []}
        }))
        .unwrap()
    }

    #[test]
    fn moves_across_containers_and_back() {
        let mut state = two_level();
        let before = state.clone();
        let op = MoveOp {
            id: NodeId::from("n2"),
            from_parent_id: NodeId::from("n1").children(),
            to_parent_id: ContainerId::Root,
            from_index: 0,
            to_index: 1,
        };

        apply(&mut state, &op);
        assert_eq!(
            state.layout.container(&ContainerId::Root),
            ids(&["n1", "n2", "n3"]).as_slice()
        );
        assert!(state.layout.container(&NodeId::from("n1").children()).is_empty());

        undo(&mut state, &op);
        assert_eq!(state, before);
    }

    #[test]
    fn reorders_within_a_container() {
        let mut state = two_level();
        let before = state.clone();
        let op = MoveOp {
            id: NodeId::from("n1"),
            from_parent_id: ContainerId::Root,
            to_parent_id: ContainerId::Root,
            from_index: 0,
            to_index: 1,
        };

        apply(&mut state, &op);
        assert_eq!(state.layout.container(&ContainerId::Root), ids(&["n3", "n1"]).as_slice());
        undo(&mut state, &op);
        assert_eq!(state, before);
    }

    #[test]
    fn creates_destination_container() {
        let mut state = two_level();
        let op = MoveOp {
            id: NodeId::from("n3"),
            from_parent_id: ContainerId::Root,
            to_parent_id: NodeId::from("n3x").children(),
            from_index: 1,
            to_index: 0,
        };
        apply(&mut state, &op);
        assert_eq!(
            state.layout.container(&NodeId::from("n3x").children()),
            ids(&["n3"]).as_slice()
        );
    }

    #[test]
    fn missing_source_is_a_noop() {
        let mut state = two_level();
        let before = state.clone();
        let op = MoveOp {
            id: NodeId::from("n2"),
            from_parent_id: ContainerId::Root,
            to_parent_id: NodeId::from("n3").children(),
            from_index: 0,
            to_index: 0,
        };
        apply(&mut state, &op);
        assert_eq!(state, before);
        undo(&mut state, &op);
        assert_eq!(state, before);
    }
}
