//! Bounded multi-producer queue of player direction intents.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use maze_chase_core::Direction;
use tracing::trace;

/// Default number of intents that may wait for a tick.
pub const DEFAULT_INTENT_CAPACITY: usize = 50;

/// Pending intents plus the direction the player last committed to.
///
/// Producers never block: an intent that would exceed the capacity is
/// dropped, as is one that repeats the committed direction.
#[derive(Debug)]
pub struct IntentQueue {
    capacity: usize,
    state: Mutex<QueueState>,
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<Direction>,
    committed: Direction,
}

impl IntentQueue {
    /// Creates an empty queue accepting at most `capacity` intents.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(QueueState::default()),
        }
    }

    /// Enqueues the intent, reporting whether it was accepted.
    pub fn push(&self, direction: Direction) -> bool {
        let mut state = self.lock();
        if direction.is_none()
            || direction == state.committed
            || state.pending.len() >= self.capacity
        {
            trace!(?direction, "intent dropped");
            return false;
        }
        state.pending.push_back(direction);
        true
    }

    /// Oldest pending intent, left in place.
    #[must_use]
    pub fn peek(&self) -> Option<Direction> {
        self.lock().pending.front().copied()
    }

    /// Copy of the pending intents, oldest first.
    #[must_use]
    pub fn pending(&self) -> Vec<Direction> {
        self.lock().pending.iter().copied().collect()
    }

    /// Number of pending intents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Reports whether no intent is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    /// Maximum number of pending intents.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Direction the player last committed to.
    #[must_use]
    pub fn committed(&self) -> Direction {
        self.lock().committed
    }

    /// Consumes the head intent after the world accepted it.
    pub(crate) fn commit(&self, direction: Direction) {
        let mut state = self.lock();
        let _ = state.pending.pop_front();
        state.committed = direction;
    }

    /// Discards every pending intent.
    pub(crate) fn clear(&self) {
        self.lock().pending.clear();
    }

    /// Returns to the freshly constructed state.
    pub(crate) fn reset(&self) {
        let mut state = self.lock();
        state.pending.clear();
        state.committed = Direction::None;
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cloneable handle producers use to feed intents from any thread.
#[derive(Clone, Debug)]
pub struct IntentSender {
    queue: Arc<IntentQueue>,
}

impl IntentSender {
    pub(crate) fn new(queue: Arc<IntentQueue>) -> Self {
        Self { queue }
    }

    /// Enqueues the intent with the same rules as [`IntentQueue::push`].
    pub fn push(&self, direction: Direction) -> bool {
        self.queue.push(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_rejects_none_and_committed_direction() {
        let queue = IntentQueue::new(4);
        assert!(!queue.push(Direction::None));

        assert!(queue.push(Direction::Up));
        queue.commit(Direction::Up);
        assert!(queue.is_empty());
        assert!(!queue.push(Direction::Up));
        assert!(queue.push(Direction::Left));
        assert_eq!(queue.committed(), Direction::Up);
    }

    #[test]
    fn full_queue_drops_newest() {
        let queue = IntentQueue::new(DEFAULT_INTENT_CAPACITY);
        let mut accepted = 0;
        for index in 0..=DEFAULT_INTENT_CAPACITY {
            let direction = if index % 2 == 0 {
                Direction::Up
            } else {
                Direction::Down
            };
            if queue.push(direction) {
                accepted += 1;
            }
        }

        assert_eq!(accepted, DEFAULT_INTENT_CAPACITY);
        assert_eq!(queue.len(), DEFAULT_INTENT_CAPACITY);
        assert_eq!(queue.peek(), Some(Direction::Up));
    }

    #[test]
    fn reset_forgets_pending_and_committed() {
        let queue = IntentQueue::new(4);
        assert!(queue.push(Direction::Right));
        queue.commit(Direction::Right);
        assert!(queue.push(Direction::Down));

        queue.reset();
        assert!(queue.is_empty());
        assert_eq!(queue.committed(), Direction::None);
        assert!(queue.push(Direction::Right));
    }

    #[test]
    fn senders_share_one_queue_across_threads() {
        let queue = Arc::new(IntentQueue::new(64));
        let handles: Vec<_> = [Direction::Left, Direction::Right]
            .into_iter()
            .map(|direction| {
                let sender = IntentSender::new(Arc::clone(&queue));
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        let _ = sender.push(direction);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("producer finished");
        }

        assert_eq!(queue.len(), 20);
    }
}
