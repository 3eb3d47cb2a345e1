//! The dispatcher: sole mutation entry point for a graph.
//!
//! [`Engine`] owns the [`DagState`] and its [`History`]. Every edit goes
//! through [`Engine::dispatch`], which validates the operation against the
//! current state, runs the forward handler and records the operation. A
//! rejected operation leaves state and history untouched and comes back as a
//! [`DagError`] value.
//!
//! Observers registered with [`Engine::subscribe`] run synchronously after
//! each committed dispatch, undo or redo, and only ever see a shared borrow
//! of the state.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cycle::causes_cycle;
use crate::error::{CoreError, DagError};
use crate::history::History;
use crate::ops::{Operation, OperationKind};
use crate::state::DagState;

/// Engine settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of undoable operations kept. `None` is unbounded.
    pub history_limit: Option<usize>,
}

/// Handle returned by [`Engine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&DagState)>;
type ErrorSink = Box<dyn FnMut(&DagError)>;

pub struct Engine {
    state: DagState,
    history: History,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    error_sink: Option<ErrorSink>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("observers", &self.observers.len())
            .field("has_error_sink", &self.error_sink.is_some())
            .finish()
    }
}

impl Engine {
    /// Builds an engine over `state` with default settings.
    ///
    /// Fails if the state breaks a structural invariant (dangling instance,
    /// orphan record, existing cycle).
    pub fn new(state: DagState) -> Result<Self, CoreError> {
        Self::with_config(state, EngineConfig::default())
    }

    pub fn with_config(state: DagState, config: EngineConfig) -> Result<Self, CoreError> {
        state.validate()?;
        Ok(Engine {
            state,
            history: History::with_limit(config.history_limit),
            observers: Vec::new(),
            next_subscription: 0,
            error_sink: None,
        })
    }

    /// Decodes and validates a JSON state, then builds an engine over it.
    pub fn from_json(json: &str, config: EngineConfig) -> Result<Self, CoreError> {
        Self::with_config(DagState::from_json(json)?, config)
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &DagState {
        &self.state
    }

    /// Committed operations, most recent last.
    pub fn history(&self) -> &[Operation] {
        self.history.entries()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn into_state(self) -> DagState {
        self.state
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Validates and commits `op`.
    ///
    /// The committed operation has its positions and captured context
    /// resolved against the current state. A move onto its own slot is
    /// accepted without being recorded.
    pub fn dispatch(&mut self, op: Operation) -> Result<&DagState, DagError> {
        if let Err(err) = self.validate(&op) {
            self.report(&err);
            return Err(err);
        }

        let op = op.resolve(&self.state);
        if op.is_noop() {
            debug!(kind = %op.kind(), node = %op.node_id(), "skipping no-op");
            return Ok(&self.state);
        }

        op.apply(&mut self.state);
        debug!(kind = %op.kind(), node = %op.node_id(), "committed");
        self.history.push(op);
        notify(&mut self.observers, &self.state);
        Ok(&self.state)
    }

    /// Reverts the most recent committed operation. Returns it, or `None` if
    /// there was nothing to undo.
    pub fn undo(&mut self) -> Option<&Operation> {
        let op = self.history.undo()?;
        op.undo(&mut self.state);
        debug!(kind = %op.kind(), node = %op.node_id(), "undone");
        notify(&mut self.observers, &self.state);
        Some(op)
    }

    /// Re-applies the most recently undone operation. Returns it, or `None`
    /// if there was nothing to redo.
    pub fn redo(&mut self) -> Option<&Operation> {
        let op = self.history.redo()?;
        op.apply(&mut self.state);
        debug!(kind = %op.kind(), node = %op.node_id(), "redone");
        notify(&mut self.observers, &self.state);
        Some(op)
    }

    /// Forgets all undo/redo history. The graph is not touched.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Checks `op` against the current state without applying it.
    pub fn validate(&self, op: &Operation) -> Result<(), DagError> {
        match op {
            Operation::Delete(del) => {
                let operation = OperationKind::Delete;
                if self.state.layout.live_node_count() <= 1 {
                    return Err(DagError::LastNodeDelete {
                        node_id: del.id.clone(),
                        operation,
                    });
                }
                if !self.state.contains_node(&del.id) {
                    return Err(DagError::NodeNotFound {
                        node_id: del.id.clone(),
                        operation,
                    });
                }
                if !self.state.layout.container(&del.parent_id).contains(&del.id) {
                    return Err(DagError::NodeNotInContainer {
                        node_id: del.id.clone(),
                        container_id: del.parent_id.clone(),
                        operation,
                    });
                }
                Ok(())
            }
            Operation::Move(mv) => {
                let operation = OperationKind::Move;
                if !self.state.contains_node(&mv.id) {
                    return Err(DagError::NodeNotFound {
                        node_id: mv.id.clone(),
                        operation,
                    });
                }
                if !self.state.layout.container(&mv.from_parent_id).contains(&mv.id) {
                    return Err(DagError::NodeNotInContainer {
                        node_id: mv.id.clone(),
                        container_id: mv.from_parent_id.clone(),
                        operation,
                    });
                }
                if causes_cycle(&mv.id, &mv.to_parent_id, &self.state.layout) {
                    return Err(DagError::CycleDetected {
                        node_id: mv.id.clone(),
                        container_id: mv.to_parent_id.clone(),
                        operation,
                    });
                }
                Ok(())
            }
            Operation::Add(add) => {
                if causes_cycle(&add.id, &add.parent_id, &self.state.layout) {
                    return Err(DagError::CycleDetected {
                        node_id: add.id.clone(),
                        container_id: add.parent_id.clone(),
                        operation: OperationKind::Add,
                    });
                }
                Ok(())
            }
            Operation::ChangeLabel(_) => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Observers and error sink
    // -----------------------------------------------------------------------

    /// Registers a callback run after every committed mutation.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&DagState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Routes rejections to `sink` instead of the log.
    pub fn on_error<F>(&mut self, sink: F)
    where
        F: FnMut(&DagError) + 'static,
    {
        self.error_sink = Some(Box::new(sink));
    }

    fn report(&mut self, err: &DagError) {
        match self.error_sink.as_mut() {
            Some(sink) => sink(err),
            None => warn!(
                kind = ?err.kind(),
                node = %err.node_id(),
                "dag edit rejected: {}",
                err
            ),
        }
    }
}

fn notify(observers: &mut [(SubscriptionId, Observer)], state: &DagState) {
    for (_, observer) in observers.iter_mut() {
        observer(state);
    }
}
