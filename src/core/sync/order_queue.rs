use super::{lock, wait_timeout_while, wait_while};
use crate::core::errors::{QueueEmptyTimeout, QueueError};
use crate::core::types::OrderItem;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct QueueState {
    items: VecDeque<OrderItem>,
    /// Pushed but not yet marked done
    unfinished: usize,
    pushed: usize,
    completed: usize,
}

/// Unbounded FIFO of orders between reservations and cooks.
///
/// Tracks completion separately from removal: an order leaves the queue
/// when a cook takes it, and counts as finished only once `mark_done` is
/// called for it.
#[derive(Debug, Default)]
pub struct OrderQueue {
    state: Mutex<QueueState>,
    available: Condvar,
    drained: Condvar,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, item: OrderItem) {
        let mut state = lock(&self.state);
        state.items.push_back(item);
        state.unfinished += 1;
        state.pushed += 1;
        drop(state);
        self.available.notify_one();
    }

    /// Take the oldest order, waiting up to `timeout` for one to arrive
    pub fn pop(&self, timeout: Duration) -> Result<OrderItem, QueueEmptyTimeout> {
        let guard = lock(&self.state);
        let (mut state, _) =
            wait_timeout_while(&self.available, guard, timeout, |s| s.items.is_empty());
        state.items.pop_front().ok_or(QueueEmptyTimeout)
    }

    /// Record that one taken order is finished
    pub fn mark_done(&self) -> Result<(), QueueError> {
        let mut state = lock(&self.state);
        if state.unfinished == 0 {
            return Err(QueueError::TooManyDone);
        }
        state.unfinished -= 1;
        state.completed += 1;
        let drained = state.unfinished == 0;
        drop(state);
        if drained {
            self.drained.notify_all();
        }
        Ok(())
    }

    /// Block until every pushed order has been marked done
    pub fn wait_until_drained(&self) {
        let guard = lock(&self.state);
        let _state = wait_while(&self.drained, guard, |s| s.unfinished > 0);
    }

    /// Orders waiting for a cook
    pub fn len(&self) -> usize {
        lock(&self.state).items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Orders ever pushed
    pub fn pushed(&self) -> usize {
        lock(&self.state).pushed
    }

    /// Orders marked done
    pub fn completed(&self) -> usize {
        lock(&self.state).completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PartyTab, SlotKey};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn item(diner: &str) -> OrderItem {
        let tab = Arc::new(PartyTab::new(SlotKey::from("2025-04-10 8:00"), 1));
        OrderItem::new(diner, "Penne", tab)
    }

    #[test]
    fn test_fifo_order() {
        let queue = OrderQueue::new();
        queue.push(item("Antonio"));
        queue.push(item("Paula"));
        queue.push(item("Ruben"));

        let timeout = Duration::from_millis(10);
        assert_eq!(queue.pop(timeout).unwrap().diner, "Antonio");
        assert_eq!(queue.pop(timeout).unwrap().diner, "Paula");
        assert_eq!(queue.pop(timeout).unwrap().diner, "Ruben");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_times_out_when_empty() {
        let queue = OrderQueue::new();
        assert!(matches!(queue.pop(Duration::from_millis(20)), Err(QueueEmptyTimeout)));
    }

    #[test]
    fn test_pop_wakes_on_push() {
        let queue = Arc::new(OrderQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop(Duration::from_secs(5)).map(|i| i.diner))
        };
        thread::sleep(Duration::from_millis(20));
        queue.push(item("Fabiola"));
        assert_eq!(consumer.join().unwrap(), Ok("Fabiola".to_string()));
    }

    #[test]
    fn test_mark_done_more_than_pushed_fails() {
        let queue = OrderQueue::new();
        queue.push(item("Jose"));
        queue.pop(Duration::from_millis(10)).unwrap();
        assert!(queue.mark_done().is_ok());
        assert_eq!(queue.mark_done(), Err(QueueError::TooManyDone));
    }

    #[test]
    fn test_every_item_taken_exactly_once() {
        let queue = Arc::new(OrderQueue::new());
        let mut pushed = HashSet::new();
        for i in 0..200 {
            let order = item(&format!("Diner {}", i));
            pushed.insert(order.id);
            queue.push(order);
        }

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut taken = Vec::new();
                    while let Ok(order) = queue.pop(Duration::from_millis(50)) {
                        taken.push(order.id);
                        queue.mark_done().unwrap();
                    }
                    taken
                })
            })
            .collect();

        queue.wait_until_drained();
        let taken: Vec<_> = workers.into_iter().flat_map(|w| w.join().unwrap()).collect();
        let unique: HashSet<_> = taken.iter().copied().collect();
        assert_eq!(taken.len(), 200);
        assert_eq!(unique, pushed);
        assert_eq!(queue.pushed(), 200);
        assert_eq!(queue.completed(), 200);
    }

    #[test]
    fn test_wait_until_drained_returns_immediately_when_idle() {
        let queue = OrderQueue::new();
        queue.wait_until_drained();
        assert_eq!(queue.completed(), 0);
    }
}
