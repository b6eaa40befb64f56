//=========================================================================
// Message Bus
//=========================================================================
//
// Thread-safe publish/subscribe with per-recipient mailboxes.
//
// Architecture:
//   Producers → send(id, msg) / broadcast(msg) → Mailbox[id] (FIFO)
//                                                     ↓
//   Driving thread ──────────→ drain() ──→ handler[id](&msg)
//
// Three tables, each behind its own RwLock:
//   handlers:   recipient → single active handler
//   mailboxes:  recipient → Mailbox (own Mutex)
//   recipients: kind → recipients in registration order
//
// drain() snapshots the mailboxes, releases every bus lock, and only then
// calls handlers. A handler may therefore send, broadcast, subscribe or
// unsubscribe; anything it enqueues is delivered by the next drain.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

//=== Internal Dependencies ===============================================

use super::mailbox::Mailbox;
use super::{Message, MessageKind};
use crate::core::id::ElementId;

//=== Public API ==========================================================

/// Callback invoked once per delivered message.
pub type Handler = Arc<dyn Fn(&Message) + Send + Sync>;

//=========================================================================

/// Routes messages to subscribed recipients.
///
/// Shared as `Arc<MessageBus>`; every operation takes `&self`.
#[derive(Default)]
pub struct MessageBus {
    handlers: RwLock<HashMap<ElementId, Handler>>,
    mailboxes: RwLock<HashMap<ElementId, Mailbox>>,
    recipients: RwLock<HashMap<MessageKind, Vec<ElementId>>>,
    pending: AtomicUsize,
}

impl MessageBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Subscriptions ----------------------------------------------------

    /// Registers `handler` as the handler for `recipient` and subscribes it
    /// to broadcasts of `kind`.
    ///
    /// A recipient has exactly one handler: subscribing again replaces the
    /// previous one but keeps earlier kind subscriptions and queued
    /// messages.
    pub fn subscribe<F>(&self, recipient: ElementId, kind: MessageKind, handler: F)
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.subscribe_many(recipient, &[kind], handler);
    }

    /// Like [`subscribe`](Self::subscribe), for several kinds at once.
    pub fn subscribe_many<F>(&self, recipient: ElementId, kinds: &[MessageKind], handler: F)
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        write(&self.handlers).insert(recipient, Arc::new(handler));
        write(&self.mailboxes)
            .entry(recipient)
            .or_insert_with(Mailbox::new);

        let mut recipients = write(&self.recipients);
        for kind in kinds {
            let ids = recipients.entry(*kind).or_default();
            if !ids.contains(&recipient) {
                ids.push(recipient);
            }
        }

        debug!(target: "bus", "{} subscribed to {:?}", recipient, kinds);
    }

    /// Removes the recipient's handler, mailbox and kind subscriptions.
    ///
    /// Messages still queued for it are discarded. Returns `false` if the
    /// recipient was not subscribed.
    pub fn unsubscribe(&self, recipient: ElementId) -> bool {
        let had_handler = write(&self.handlers).remove(&recipient).is_some();

        let discarded = write(&self.mailboxes)
            .remove(&recipient)
            .map(|mailbox| mailbox.take(&self.pending).len())
            .unwrap_or(0);

        let mut recipients = write(&self.recipients);
        for ids in recipients.values_mut() {
            ids.retain(|id| *id != recipient);
        }
        recipients.retain(|_, ids| !ids.is_empty());
        drop(recipients);

        if had_handler {
            debug!(
                target: "bus",
                "{} unsubscribed ({} queued messages discarded)",
                recipient, discarded
            );
        }
        had_handler
    }

    //--- Publishing -------------------------------------------------------

    /// Enqueues `message` for `recipient`.
    ///
    /// Returns `false` and drops the message if the recipient has no
    /// mailbox.
    pub fn send(&self, recipient: ElementId, message: Message) -> bool {
        self.enqueue(recipient, Arc::new(message))
    }

    /// Enqueues `message` for every recipient subscribed to its kind.
    ///
    /// All recipients share one allocation. Returns the number of mailboxes
    /// the message reached.
    pub fn broadcast(&self, message: Message) -> usize {
        let kind = message.kind();
        let targets = self.subscribers_of(kind);
        if targets.is_empty() {
            trace!(target: "bus", "Broadcast {:?} has no subscribers", kind);
            return 0;
        }

        let message = Arc::new(message);
        targets
            .into_iter()
            .filter(|id| self.enqueue(*id, Arc::clone(&message)))
            .count()
    }

    fn enqueue(&self, recipient: ElementId, message: Arc<Message>) -> bool {
        match read(&self.mailboxes).get(&recipient) {
            Some(mailbox) => {
                mailbox.push(message, &self.pending);
                true
            }
            None => {
                trace!(
                    target: "bus",
                    "No mailbox for {}, dropping {:?}",
                    recipient,
                    message.kind()
                );
                false
            }
        }
    }

    //--- Delivery ---------------------------------------------------------

    /// Delivers every queued message to its recipient's handler.
    ///
    /// Returns the number of messages delivered. Messages for a recipient
    /// arrive in the order they were enqueued; no order is guaranteed
    /// between recipients. Meant to be called from one thread at a time.
    pub fn drain(&self) -> usize {
        if self.pending.load(Ordering::Acquire) == 0 {
            return 0;
        }

        let batches: Vec<(ElementId, Vec<Arc<Message>>)> = read(&self.mailboxes)
            .iter()
            .filter_map(|(id, mailbox)| {
                let messages = mailbox.take(&self.pending);
                (!messages.is_empty()).then_some((*id, messages))
            })
            .collect();

        let mut delivered = 0;
        for (recipient, messages) in batches {
            // Looked up per batch: an earlier handler may have replaced or
            // removed this one.
            let handler = read(&self.handlers).get(&recipient).cloned();
            let Some(handler) = handler else {
                debug!(
                    target: "bus",
                    "{} left before delivery, dropping {} messages",
                    recipient,
                    messages.len()
                );
                continue;
            };

            for message in &messages {
                handler(message);
                delivered += 1;
            }
        }

        trace!(target: "bus", "Drained {} messages", delivered);
        delivered
    }

    //--- Query API --------------------------------------------------------

    /// Number of messages enqueued but not yet drained.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Returns `true` if `recipient` has a registered handler.
    pub fn is_subscribed(&self, recipient: ElementId) -> bool {
        read(&self.handlers).contains_key(&recipient)
    }

    /// Recipients subscribed to `kind`, in registration order.
    pub fn subscribers_of(&self, kind: MessageKind) -> Vec<ElementId> {
        read(&self.recipients)
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }
}

//=== Lock Helpers ========================================================

// A panicking handler runs with no bus lock held, so poisoning can only
// come from a panic inside the bus itself; the tables stay consistent.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::MouseButton;
    use crate::core::message_bus::PointerGesture;
    use crate::core::spatial::Point;
    use std::sync::Mutex;
    use std::thread;

    fn id(raw: u32) -> ElementId {
        ElementId::from_raw(raw)
    }

    fn click(x: i32, y: i32) -> Message {
        Message::Click(PointerGesture {
            position: Point::new(x, y),
            button: MouseButton::Left,
        })
    }

    /// Handler that records every message it receives.
    fn recorder() -> (Arc<Mutex<Vec<Message>>>, impl Fn(&Message) + Send + Sync + 'static) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        (log, move |m: &Message| sink.lock().unwrap().push(m.clone()))
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&Message) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        (count, move |_: &Message| {
            sink.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn new_bus_is_empty() {
        let bus = MessageBus::new();
        assert_eq!(bus.pending(), 0);
        assert_eq!(bus.drain(), 0);
        assert!(bus.subscribers_of(MessageKind::Click).is_empty());
    }

    #[test]
    fn send_then_drain_delivers() {
        let bus = MessageBus::new();
        let (log, handler) = recorder();
        bus.subscribe(id(1), MessageKind::Click, handler);

        assert!(bus.send(id(1), click(5, 5)));
        assert_eq!(bus.pending(), 1);

        // Nothing delivered before drain
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(bus.drain(), 1);
        assert_eq!(*log.lock().unwrap(), vec![click(5, 5)]);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn per_recipient_order_is_fifo() {
        let bus = MessageBus::new();
        let (log, handler) = recorder();
        bus.subscribe(id(1), MessageKind::Click, handler);

        bus.send(id(1), click(1, 0));
        bus.send(id(1), Message::GameOver);
        bus.send(id(1), click(2, 0));
        bus.drain();

        assert_eq!(
            *log.lock().unwrap(),
            vec![click(1, 0), Message::GameOver, click(2, 0)]
        );
    }

    #[test]
    fn send_to_unknown_recipient_is_dropped() {
        let bus = MessageBus::new();
        assert!(!bus.send(id(9), Message::GameWon));
        assert_eq!(bus.pending(), 0);
        assert_eq!(bus.drain(), 0);
    }

    #[test]
    fn broadcast_reaches_each_subscriber_once() {
        let bus = MessageBus::new();
        let (count, handler) = counter();
        let handler = Arc::new(handler);

        for raw in 1..=3 {
            let h = Arc::clone(&handler);
            bus.subscribe(id(raw), MessageKind::GameOver, move |m| h(m));
        }

        assert_eq!(bus.broadcast(Message::GameOver), 3);
        assert_eq!(bus.drain(), 3);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn broadcast_only_reaches_matching_kind() {
        let bus = MessageBus::new();
        let (over, over_handler) = counter();
        let (won, won_handler) = counter();
        bus.subscribe(id(1), MessageKind::GameOver, over_handler);
        bus.subscribe(id(2), MessageKind::GameWon, won_handler);

        assert_eq!(bus.broadcast(Message::GameWon), 1);
        bus.drain();

        assert_eq!(over.load(Ordering::SeqCst), 0);
        assert_eq!(won.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn broadcast_without_subscribers_is_noop() {
        let bus = MessageBus::new();
        assert_eq!(bus.broadcast(Message::Quit), 0);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn subscribing_twice_does_not_duplicate() {
        let bus = MessageBus::new();
        let (count, handler) = counter();
        let handler = Arc::new(handler);
        let h1 = Arc::clone(&handler);
        let h2 = Arc::clone(&handler);

        bus.subscribe(id(1), MessageKind::GameReset, move |m| h1(m));
        bus.subscribe(id(1), MessageKind::GameReset, move |m| h2(m));

        assert_eq!(bus.subscribers_of(MessageKind::GameReset), vec![id(1)]);
        bus.broadcast(Message::GameReset);
        bus.drain();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn resubscribe_replaces_handler() {
        let bus = MessageBus::new();
        let (first, first_handler) = counter();
        let (second, second_handler) = counter();

        bus.subscribe(id(1), MessageKind::Click, first_handler);
        bus.subscribe(id(1), MessageKind::GameOver, second_handler);

        bus.send(id(1), click(0, 0));
        bus.broadcast(Message::GameOver);
        bus.drain();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn subscribers_kept_in_registration_order() {
        let bus = MessageBus::new();
        for raw in [5, 2, 9] {
            bus.subscribe(id(raw), MessageKind::GameStart, |_| {});
        }
        assert_eq!(
            bus.subscribers_of(MessageKind::GameStart),
            vec![id(5), id(2), id(9)]
        );
    }

    #[test]
    fn subscribe_many_registers_every_kind() {
        let bus = MessageBus::new();
        let (log, handler) = recorder();
        bus.subscribe_many(
            id(1),
            &[MessageKind::GameOver, MessageKind::GameWon],
            handler,
        );

        bus.broadcast(Message::GameWon);
        bus.broadcast(Message::GameOver);
        bus.drain();

        assert_eq!(
            *log.lock().unwrap(),
            vec![Message::GameWon, Message::GameOver]
        );
    }

    #[test]
    fn unsubscribe_removes_everything() {
        let bus = MessageBus::new();
        bus.subscribe(id(1), MessageKind::Quit, |_| {});
        bus.subscribe(id(2), MessageKind::Quit, |_| {});

        assert!(bus.unsubscribe(id(1)));
        assert!(!bus.is_subscribed(id(1)));
        assert_eq!(bus.subscribers_of(MessageKind::Quit), vec![id(2)]);

        // Sends to the removed recipient are dropped without counting
        assert!(!bus.send(id(1), Message::Quit));
        assert_eq!(bus.pending(), 0);
        assert_eq!(bus.broadcast(Message::Quit), 1);
    }

    #[test]
    fn unsubscribe_unknown_returns_false() {
        let bus = MessageBus::new();
        assert!(!bus.unsubscribe(id(4)));
    }

    #[test]
    fn unsubscribe_discards_queued_messages() {
        let bus = MessageBus::new();
        let (count, handler) = counter();
        bus.subscribe(id(1), MessageKind::Click, handler);

        bus.send(id(1), click(0, 0));
        bus.send(id(1), click(1, 1));
        assert_eq!(bus.pending(), 2);

        bus.unsubscribe(id(1));
        assert_eq!(bus.pending(), 0);
        assert_eq!(bus.drain(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn handler_can_send_during_drain() {
        let bus = Arc::new(MessageBus::new());
        let (log, handler) = recorder();
        bus.subscribe(id(2), MessageKind::GameOver, handler);

        let relay = Arc::clone(&bus);
        bus.subscribe(id(1), MessageKind::Click, move |_| {
            relay.send(id(2), Message::GameOver);
        });

        bus.send(id(1), click(0, 0));
        assert_eq!(bus.drain(), 1);

        // Enqueued mid-drain, delivered by the next drain
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(bus.pending(), 1);

        assert_eq!(bus.drain(), 1);
        assert_eq!(*log.lock().unwrap(), vec![Message::GameOver]);
    }

    #[test]
    fn handler_can_unsubscribe_itself() {
        let bus = Arc::new(MessageBus::new());
        let (count, tally) = counter();

        let inner = Arc::clone(&bus);
        bus.subscribe(id(1), MessageKind::Click, move |m| {
            tally(m);
            inner.unsubscribe(id(1));
        });

        bus.send(id(1), click(0, 0));
        bus.send(id(1), click(1, 1));

        // The whole batch was snapshotted before the first call
        assert_eq!(bus.drain(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!bus.is_subscribed(id(1)));
    }

    #[test]
    fn handler_can_subscribe_during_drain() {
        let bus = Arc::new(MessageBus::new());
        let (count, handler) = counter();
        let handler = Arc::new(handler);

        let inner = Arc::clone(&bus);
        bus.subscribe(id(1), MessageKind::GameStart, move |_| {
            let h = Arc::clone(&handler);
            inner.subscribe(id(2), MessageKind::GameReset, move |m| h(m));
        });

        bus.broadcast(Message::GameStart);
        bus.drain();

        assert!(bus.is_subscribed(id(2)));
        bus.broadcast(Message::GameReset);
        bus.drain();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_senders_keep_per_thread_order() {
        let bus = Arc::new(MessageBus::new());
        let (log, handler) = recorder();
        bus.subscribe(id(1), MessageKind::Click, handler);

        let senders: Vec<_> = (0..4)
            .map(|thread_no| {
                let bus = Arc::clone(&bus);
                thread::spawn(move || {
                    for seq in 0..100 {
                        bus.send(id(1), click(thread_no, seq));
                    }
                })
            })
            .collect();

        for sender in senders {
            sender.join().unwrap();
        }

        assert_eq!(bus.pending(), 400);
        assert_eq!(bus.drain(), 400);

        let log = log.lock().unwrap();
        for thread_no in 0..4 {
            let seqs: Vec<i32> = log
                .iter()
                .filter_map(|m| m.gesture())
                .filter(|g| g.position.x == thread_no)
                .map(|g| g.position.y)
                .collect();
            assert_eq!(seqs, (0..100).collect::<Vec<_>>());
        }
    }

    #[test]
    fn drain_while_sending_loses_nothing() {
        let bus = Arc::new(MessageBus::new());
        let (count, handler) = counter();
        bus.subscribe(id(1), MessageKind::GameWon, handler);

        let producer = {
            let bus = Arc::clone(&bus);
            thread::spawn(move || {
                for _ in 0..500 {
                    bus.send(id(1), Message::GameWon);
                }
            })
        };

        let mut delivered = 0;
        while !producer.is_finished() {
            delivered += bus.drain();
        }
        producer.join().unwrap();
        delivered += bus.drain();

        assert_eq!(delivered, 500);
        assert_eq!(count.load(Ordering::SeqCst), 500);
        assert_eq!(bus.pending(), 0);
    }
}
