//! Task identity and cancellation.
//!
//! - `TaskId`: the kind of work (a `TypeId`) plus a generation counter
//! - `TaskSlot`: hands out generations for one kind of work and remembers the live one
//! - `TaskHandle`: a `TaskId` paired with a `CancellationToken` for cooperative stop
//!
//! Jobs are never aborted once started. A result is applied only when its
//! `TaskId` is still the live one in its slot; everything else is stale and
//! gets dropped by the receiver.

use std::any::TypeId;

use tokio_util::sync::CancellationToken;

/// Unique identifier for a spawned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    /// Higher generations were issued later.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Generation bookkeeping for one kind of background work.
///
/// `start` issues a fresh id and makes it live; `invalidate` forgets the live
/// id so whatever is in flight lands as stale.
#[derive(Debug, Clone)]
pub struct TaskSlot {
    type_id: TypeId,
    next_generation: u64,
    live: Option<TaskId>,
}

impl TaskSlot {
    pub fn new<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            next_generation: 1,
            live: None,
        }
    }

    pub fn start(&mut self) -> TaskId {
        let id = TaskId::new(self.type_id, self.next_generation);
        self.next_generation += 1;
        self.live = Some(id);
        id
    }

    /// Returns `true` and clears the slot if `id` is the live task.
    pub fn finish(&mut self, id: TaskId) -> bool {
        if self.live == Some(id) {
            self.live = None;
            true
        } else {
            false
        }
    }

    pub fn invalidate(&mut self) {
        self.live = None;
    }

    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }
}

/// Handle to a long-running worker with cooperative cancellation.
///
/// The worker checks `is_cancelled()` on its own schedule; `cancel()` never
/// interrupts it.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Clone of the token, to be moved into the worker.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }
}
