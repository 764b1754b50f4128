// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use strum_macros::EnumDiscriminants;
use tracing::error;

/// Represents a high-level event in the system.
///
/// Each `Event` wraps an [`EventKind`], which defines the actual type
/// and data carried by the event.
///
/// This structure is designed to be passed through an [`EventBus`]
/// between asynchronous modules.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// The inner event type and associated data.
    pub kind: EventKind,
}

impl Event {
    /// Returns the payload-free type of the event.
    pub fn event_type(&self) -> EventKindType {
        EventKindType::from(&self.kind)
    }
}

/// A thread-safe, reference-counted pointer to a [`LocationUpdate`](common::position::LocationUpdate).
///
/// Every subscriber of the bus gets a clone of the event, the pointer keeps
/// those clones cheap.
pub type LocationUpdatePtr = std::sync::Arc<common::position::LocationUpdate>;

/// A thread-safe, reference-counted pointer to a [`ProximityReport`](common::proximity::ProximityReport).
pub type ProximityReportPtr = std::sync::Arc<common::proximity::ProximityReport>;

/// Enumerates the different kinds of events that can be emitted
/// and transmitted via the [`EventBus`].
///
/// [`EventKindType`] is the payload-free counterpart that is used to wait
/// for or filter a specific kind of event.
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKindType), derive(Hash))]
pub enum EventKind {
    /// Indicates that a module shall terminate.
    QuitEvent,

    /// A location provider delivered a fix or reported a failure.
    LocationUpdateEvent(LocationUpdatePtr),

    /// The proximity to the target was recomputed.
    ///
    /// Carries the latest reading and the derived state for the render layer.
    ProximityReportEvent(ProximityReportPtr),
}

/// Returns a reference to the payload of `$kind` if it is the variant `$variant`.
///
/// ```rust
/// use module_core::{EventKind, payload_ref};
/// use std::sync::Arc;
///
/// let kind = EventKind::ProximityReportEvent(Arc::new(Default::default()));
/// assert!(payload_ref!(kind, EventKind::ProximityReportEvent).is_some());
/// assert!(payload_ref!(kind, EventKind::LocationUpdateEvent).is_none());
/// ```
#[macro_export]
macro_rules! payload_ref {
    ($kind:expr, $variant:path) => {
        match &$kind {
            $variant(payload) => Some(payload),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    };
}

/// A simple asynchronous event bus for publishing and subscribing to [`Event`]s.
///
/// The event bus uses a [`tokio::sync::broadcast::channel`] under the hood,
/// allowing multiple receivers to listen for the same stream of events.
///
/// Each published event is cloned and distributed to all active subscribers.
/// If no subscribers exist at the time of publication, the event is discarded silently.
pub struct EventBus {
    /// The broadcast sender used internally to distribute events.
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new [`EventBus`] with a fixed buffer capacity of 100 messages.
    ///
    /// When the buffer is full, the oldest messages are dropped automatically
    /// as new ones are published.
    pub fn new() -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(100);
        EventBus { sender }
    }

    /// Subscribes to the event bus and returns a [`tokio::sync::broadcast::Receiver`].
    ///
    /// The returned receiver will receive all future events published after the
    /// subscription is created.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publishes an [`Event`] to all active subscribers.
    ///
    /// If no subscribers exist, the event is discarded silently.
    pub fn publish(&self, event: &Event) {
        let _ = self.sender.send(event.clone());
    }

    /// Creates a [`ModuleCtx`] bound to this [`EventBus`].
    pub fn context(&self) -> ModuleCtx {
        ModuleCtx::new(self)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Defines the common interface for an asynchronous module
/// that can be executed and communicate via the [`EventBus`].
#[async_trait::async_trait]
pub trait Module {
    /// Runs the module asynchronously until a [`EventKind::QuitEvent`] is received.
    async fn run(&mut self) -> Result<(), ()>;
}

/// Runs `module` and publishes a [`EventKind::QuitEvent`] if it fails.
///
/// The other modules on `event_bus` stop instead of waiting for a quit that
/// never comes.
pub async fn run_or_quit<M: Module + ?Sized>(
    module: &mut M,
    event_bus: &EventBus,
) -> Result<(), ()> {
    let result = module.run().await;
    if result.is_err() {
        error!("Module failed, stopping the remaining modules");
        event_bus.publish(&Event {
            kind: EventKind::QuitEvent,
        });
    }
    result
}

/// Provides a module-scoped context for interacting with the [`EventBus`].
///
/// Each `ModuleCtx` owns both a sender and a receiver, allowing the module
/// to both publish and listen for events concurrently.
pub struct ModuleCtx {
    /// The broadcast sender used to publish events.
    pub sender: tokio::sync::broadcast::Sender<Event>,

    /// The broadcast receiver used to listen for events.
    pub receiver: tokio::sync::broadcast::Receiver<Event>,
}

impl ModuleCtx {
    /// Constructs a new [`ModuleCtx`] from the given [`EventBus`].
    ///
    /// Clones the internal broadcast sender and creates a new receiver.
    pub fn new(event_bus: &EventBus) -> Self {
        ModuleCtx {
            sender: event_bus.sender.clone(),
            receiver: event_bus.subscribe(),
        }
    }

    /// Wraps `kind` into an [`Event`] and publishes it.
    ///
    /// Fails only when no receiver is subscribed to the bus.
    pub fn publish_event(
        &self,
        kind: EventKind,
    ) -> Result<usize, tokio::sync::broadcast::error::SendError<Event>> {
        self.sender.send(Event { kind })
    }
}

pub mod test_helper;
