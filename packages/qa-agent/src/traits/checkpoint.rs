//! Checkpoint storage for pipeline runs.
//!
//! After every node the pipeline hands its state to a `CheckpointStore`
//! keyed by the run id. The default store persists nothing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::CheckpointError;
use crate::pipeline::graph::Node;
use crate::types::{PipelineState, RunId};

/// A state snapshot taken after a node finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub run_id: RunId,

    /// The node that will run next (`Done` for a finished run).
    pub next: Node,

    pub state: PipelineState,
}

/// Storage for run checkpoints.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Store the latest checkpoint of a run, replacing any earlier one.
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError>;

    /// Load the latest checkpoint of a run.
    async fn load(&self, run_id: RunId) -> Result<Option<Checkpoint>, CheckpointError>;
}

/// Store that keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCheckpointStore;

#[async_trait]
impl CheckpointStore for NoopCheckpointStore {
    async fn save(&self, _checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        Ok(())
    }

    async fn load(&self, _run_id: RunId) -> Result<Option<Checkpoint>, CheckpointError> {
        Ok(None)
    }
}

/// In-memory checkpoint store.
///
/// Useful for tests and inspection; data is lost on restart.
#[derive(Default)]
pub struct MemoryCheckpointStore {
    checkpoints: RwLock<HashMap<RunId, Checkpoint>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of runs with a stored checkpoint.
    pub fn len(&self) -> usize {
        self.checkpoints.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> CheckpointError {
    CheckpointError::Storage("checkpoint lock poisoned".into())
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        self.checkpoints
            .write()
            .map_err(poisoned)?
            .insert(checkpoint.run_id, checkpoint.clone());
        Ok(())
    }

    async fn load(&self, run_id: RunId) -> Result<Option<Checkpoint>, CheckpointError> {
        Ok(self.checkpoints.read().map_err(poisoned)?.get(&run_id).cloned())
    }
}
