//! Canonical workspace state with snapshot publication.
//!
//! Every mutation runs against a private draft copy of the current
//! [`Workspace`]. Only a mutation that completes is swapped in and published,
//! so subscribers never observe a half-applied change.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::error;

use crate::types::event::TabEvent;
use crate::types::workspace::{Workspace, WorkspaceConfig};

/// Buffered lifecycle events per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 256;

pub struct WorkspaceStore {
    current: Arc<Workspace>,
    snapshots: watch::Sender<Arc<Workspace>>,
    events: broadcast::Sender<TabEvent>,
}

impl WorkspaceStore {
    pub fn new(config: WorkspaceConfig) -> Self {
        let current = Arc::new(Workspace::new(config));
        let (snapshots, _) = watch::channel(current.clone());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            current,
            snapshots,
            events,
        }
    }

    /// The latest committed snapshot.
    pub fn snapshot(&self) -> Arc<Workspace> {
        self.current.clone()
    }

    pub fn current(&self) -> &Workspace {
        &self.current
    }

    /// Receiver that always holds the latest committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Workspace>> {
        self.snapshots.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TabEvent> {
        self.events.subscribe()
    }

    /// Runs `f` on a draft. `Some` commits the draft, `None` discards it.
    pub(crate) fn apply<T, F>(&mut self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Workspace) -> Option<T>,
    {
        let mut draft = (*self.current).clone();
        let out = f(&mut draft)?;
        self.publish(draft);
        Some(out)
    }

    /// Like [`apply`](Self::apply) for mutations that can be rejected.
    /// An `Err` discards the draft.
    pub(crate) fn try_apply<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Workspace) -> Result<T, E>,
    {
        let mut draft = (*self.current).clone();
        let out = f(&mut draft)?;
        self.publish(draft);
        Ok(out)
    }

    /// Swaps in a whole workspace, e.g. one restored from storage.
    pub(crate) fn replace(&mut self, workspace: Workspace) {
        self.publish(workspace);
    }

    pub(crate) fn emit(&self, events: Vec<TabEvent>) {
        for event in events {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
    }

    fn publish(&mut self, next: Workspace) {
        let problems = next.invariant_violations();
        if !problems.is_empty() {
            error!(?problems, "committed workspace breaks invariants");
            debug_assert!(problems.is_empty(), "workspace invariants broken: {:?}", problems);
        }
        self.current = Arc::new(next);
        self.snapshots.send_replace(self.current.clone());
    }
}
