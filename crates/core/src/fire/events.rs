//! Fire lifecycle events.
//!
//! The registry records every ignition and removal so a host can broadcast
//! them to other peers or feed them into its own systems. Events queue up
//! until the host drains them with
//! [`FireRegistry::take_events`](super::FireRegistry::take_events), whether
//! they were recorded inside a tick or between two ticks.
//!
//! # Replication model
//!
//! - **Authority** sessions (server or single player) simulate and record
//!   events; hosts forward them to replicas.
//! - **Replica** sessions apply the forwarded events with
//!   [`EventOrigin::Replicated`]; locally-originated ignitions and removals
//!   are refused.

use super::FireId;
use crate::core_types::Vec2;
use crate::hull::HullId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Who asked for an ignition or removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOrigin {
    /// This session's own simulation or gameplay code
    Local,
    /// An event received from the authoritative session
    Replicated,
}

/// Why a fire stopped burning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Put out by standing water or an extinguisher
    Extinguished,
    /// Shrank below the minimum size without oxygen
    Starved,
    /// Absorbed by an overlapping fire
    Merged { into: FireId },
    /// Explicit removal through [`FireRegistry::remove`](super::FireRegistry::remove)
    Requested,
    /// Its hull was torn down
    HullCleared,
}

/// Something that happened to a fire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FireEvent {
    Ignited {
        fire: FireId,
        hull: HullId,
        /// Vessel-local anchor
        position: Vec2,
        origin: EventOrigin,
    },
    Removed {
        fire: FireId,
        cause: RemovalCause,
    },
}

impl FireEvent {
    /// Fire the event is about
    pub fn fire(&self) -> FireId {
        match self {
            FireEvent::Ignited { fire, .. } | FireEvent::Removed { fire, .. } => *fire,
        }
    }
}

/// Events not yet taken by the host plus a bounded history.
///
/// Pending events stay queued across ticks until [`EventLog::take_pending`]
/// drains them, so an ignition recorded between two ticks is never lost.
#[derive(Debug)]
pub(crate) struct EventLog {
    pending: Vec<FireEvent>,
    history: VecDeque<FireEvent>,
    max_history: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(10000)
    }
}

impl EventLog {
    pub(crate) fn new(max_history: usize) -> Self {
        Self {
            pending: Vec::with_capacity(32),
            history: VecDeque::with_capacity(max_history.min(1024)),
            max_history,
        }
    }

    pub(crate) fn record(&mut self, event: FireEvent) {
        self.pending.push(event);
        if self.pending.len() > self.max_history {
            let excess = self.pending.len() - self.max_history;
            self.pending.drain(..excess);
        }
        self.history.push_back(event);
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    pub(crate) fn pending(&self) -> &[FireEvent] {
        &self.pending
    }

    /// Drain the pending queue, oldest first
    pub(crate) fn take_pending(&mut self) -> Vec<FireEvent> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn history(&self) -> impl Iterator<Item = &FireEvent> {
        self.history.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
        self.history.clear();
    }
}
