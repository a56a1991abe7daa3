//! Provider change notifications.
//!
//! EIP-1193 wallets push `accountsChanged` and `chainChanged` notifications
//! to interested listeners. [`EventHub`] is the in-process registry a
//! provider emits through; [`Subscription`] is the listener's receiving end
//! and unregisters itself when dropped, so an abandoned listener never
//! leaks a registry slot.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// The notification kinds a wallet provider publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The set of authorized accounts changed.
    AccountsChanged,
    /// The wallet switched to a different chain.
    ChainChanged,
}

/// A single provider notification.
///
/// Payloads are carried as the wallet delivered them: account entries as
/// raw strings and the chain id as a `0x`-prefixed hex quantity. Listeners
/// treat these as hints and re-query the provider for authoritative state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// New account list. An empty list means the wallet revoked access.
    AccountsChanged(Vec<String>),
    /// New active chain id as a hex quantity, e.g. `0x1`.
    ChainChanged(String),
}

impl ProviderEvent {
    /// The kind under which this event is delivered.
    pub fn kind(&self) -> EventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => EventKind::AccountsChanged,
            ProviderEvent::ChainChanged(_) => EventKind::ChainChanged,
        }
    }
}

type SubscriberId = u64;

#[derive(Debug, Default)]
struct Registry {
    next_id: SubscriberId,
    subscribers: HashMap<SubscriberId, (EventKind, mpsc::UnboundedSender<ProviderEvent>)>,
}

/// Registry of event listeners, shared between a provider and its
/// subscriptions.
///
/// Cloning the hub yields another handle onto the same registry, so a
/// provider can hand the hub to a background task that emits on its behalf.
#[derive(Debug, Clone, Default)]
pub struct EventHub {
    inner: Arc<Mutex<Registry>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `kind`.
    pub fn subscribe(&self, kind: EventKind) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut registry = self.inner.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.subscribers.insert(id, (kind, tx));
            id
        };
        Subscription {
            hub: self.clone(),
            id,
            receiver: rx,
        }
    }

    /// Deliver `event` to every listener subscribed to its kind.
    ///
    /// Delivery is queued, not blocking: listeners pick events up the next
    /// time they poll their subscription.
    pub fn emit(&self, event: ProviderEvent) {
        let kind = event.kind();
        let registry = self.inner.lock();
        for (subscribed_kind, tx) in registry.subscribers.values() {
            if *subscribed_kind == kind {
                // A send can only fail if the receiver is mid-drop, which
                // unregisters it right after.
                let _ = tx.send(event.clone());
            }
        }
    }

    /// Number of live subscriptions, across all kinds.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    fn unsubscribe(&self, id: SubscriberId) {
        self.inner.lock().subscribers.remove(&id);
    }
}

/// A registered listener for one [`EventKind`].
///
/// Dropping the subscription unregisters it from the hub.
pub struct Subscription {
    hub: EventHub,
    id: SubscriberId,
    receiver: mpsc::UnboundedReceiver<ProviderEvent>,
}

impl Subscription {
    /// Take the next queued event without waiting. `None` when the queue
    /// is empty.
    pub fn try_next(&mut self) -> Option<ProviderEvent> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next event.
    pub async fn next(&mut self) -> Option<ProviderEvent> {
        self.receiver.recv().await
    }

    /// Unregister explicitly. Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
