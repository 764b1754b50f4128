use crate::{Event, EventBus, EventKind, EventKindType};
use tokio::time::timeout;
use tracing::debug;

/// Sends a quit signal to a running module and waits for it to stop gracefully.
///
/// This function publishes a [`QuitEvent`](EventKind::QuitEvent) through the given [`EventBus`],
/// signaling the target module to terminate. It then waits asynchronously for the module’s task
/// (represented by the provided [`tokio::task::JoinHandle`]) to complete within a fixed timeout.
///
/// # Arguments
/// * `event_bus` – A reference to the [`EventBus`] used to send the quit event.
/// * `handle` – A mutable reference to the [`JoinHandle`](tokio::task::JoinHandle) of the running module’s asynchronous task.
///
/// # Panics
/// This function panics if:
/// - The module does not stop within 100 ms.
/// - The task returns an error (`Err(())`).
pub async fn stop_module(
    event_bus: &EventBus,
    handle: &mut tokio::task::JoinHandle<Result<(), ()>>,
) {
    event_bus.publish(&Event {
        kind: EventKind::QuitEvent,
    });
    timeout(std::time::Duration::from_millis(100), handle)
        .await
        .expect("Module doesn't handle quit event in timeout")
        .expect("Module task panicked")
        .expect("Module returned an error");
}

/// Waits asynchronously for a specific type of [`Event`] to be received on a
/// [`tokio::sync::broadcast::Receiver`] within a given duration.
///
/// The total waiting time is divided into ten polling steps, events of other
/// types are skipped.
///
/// # Arguments
///
/// * `rx` - The receiver the events are read from.
/// * `duration` - The maximum amount of time to wait for the expected event.
/// * `exp_event` - The expected event type. Only the variant is compared,
///   payload data is ignored.
///
/// # Panics
///
/// This function panics if no matching event is received within the specified
/// `duration`.
pub async fn wait_for_event(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    duration: std::time::Duration,
    exp_event: EventKindType,
) -> Event {
    let step_duration = duration / 10;
    for _ in 0..10 {
        let deadline = tokio::time::Instant::now() + step_duration;
        while let Ok(Ok(event)) = tokio::time::timeout_at(deadline, rx.recv()).await {
            if EventKindType::from(&event.kind) == exp_event {
                return event;
            }
            debug!("Skipping event {:?}", event.event_type());
        }
    }
    panic!("Failed to receive event of type {:?}", exp_event);
}

/// Collects every event of type `exp_event` that arrives within `duration`.
///
/// Unlike [`wait_for_event`] this never panics, an empty vector means that
/// no matching event was published in time.
pub async fn collect_events(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    duration: std::time::Duration,
    exp_event: EventKindType,
) -> Vec<Event> {
    let deadline = tokio::time::Instant::now() + duration;
    let mut events = Vec::new();
    while let Ok(Ok(event)) = tokio::time::timeout_at(deadline, rx.recv()).await {
        if EventKindType::from(&event.kind) == exp_event {
            events.push(event);
        }
    }
    events
}
