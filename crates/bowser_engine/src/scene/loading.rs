//! Deferred insertion of entities that finish loading later
//!
//! An entity that still needs external data is parked in a [`LoadQueue`]
//! together with a [`LoadCompleter`]. Whoever finishes the load (possibly on
//! another thread) calls [`LoadCompleter::complete`]; the scene inserts the
//! entity at its next update, in completion order. Dropping a completer
//! without completing it cancels the load.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};

use super::entity::{Entity, EntityId};

#[derive(Debug, Clone, Copy)]
enum LoadSignal {
    Completed(EntityId),
    Cancelled(EntityId),
}

/// Signal that a deferred entity is ready to join its scene
#[derive(Debug)]
pub struct LoadCompleter {
    id: EntityId,
    sender: Option<Sender<LoadSignal>>,
}

impl LoadCompleter {
    /// Id the entity will have once inserted
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Mark the load as finished
    pub fn complete(mut self) {
        self.send(LoadSignal::Completed(self.id));
    }

    fn send(&mut self, signal: LoadSignal) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        // The scene may already be gone; nothing left to insert into then.
        if sender.send(signal).is_err() {
            log::debug!("Load of {} finished after its scene was dropped", self.id);
        }
    }
}

impl Drop for LoadCompleter {
    fn drop(&mut self) {
        self.send(LoadSignal::Cancelled(self.id));
    }
}

/// An entity waiting for its completion signal
#[derive(Debug)]
pub struct PendingInsert {
    /// Entity to insert under, or `None` for a root
    pub parent: Option<EntityId>,
    /// The entity itself
    pub entity: Entity,
}

/// Entities parked until their load completes
#[derive(Debug)]
pub struct LoadQueue {
    sender: Sender<LoadSignal>,
    receiver: Receiver<LoadSignal>,
    waiting: HashMap<EntityId, PendingInsert>,
}

impl Default for LoadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadQueue {
    /// Empty queue
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            waiting: HashMap::new(),
        }
    }

    /// Park `entity` under `id` until the returned completer fires
    pub fn defer(&mut self, id: EntityId, parent: Option<EntityId>, entity: Entity) -> LoadCompleter {
        self.waiting.insert(id, PendingInsert { parent, entity });
        LoadCompleter {
            id,
            sender: Some(self.sender.clone()),
        }
    }

    /// Entities whose load completed since the last call, in completion order.
    ///
    /// Cancelled loads are discarded.
    pub fn drain_ready(&mut self) -> Vec<(EntityId, PendingInsert)> {
        let mut ready = Vec::new();
        for signal in self.receiver.try_iter() {
            match signal {
                LoadSignal::Completed(id) => {
                    if let Some(pending) = self.waiting.remove(&id) {
                        ready.push((id, pending));
                    }
                }
                LoadSignal::Cancelled(id) => {
                    if let Some(pending) = self.waiting.remove(&id) {
                        log::debug!("Load of '{}' ({}) was cancelled", pending.entity.key(), id);
                    }
                }
            }
        }
        ready
    }

    /// Number of entities still waiting
    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    /// Whether nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}
