// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Event bus for inter-component communication

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::{ActuatorState, AlarmEvent, TelemetryRecord};

/// Event types in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventType {
    /// A telemetry record was committed.
    Telemetry,
    /// The alarm changed state.
    Alarm,
    /// The actuator vector changed.
    ActuatorChange,
    /// Non-fatal error surfaced by a component.
    Error,
}

/// Generic event wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic event id.
    pub id: u64,
    /// Discriminator.
    pub event_type: EventType,
    /// Emission time.
    pub timestamp: DateTime<Utc>,
    /// Payload.
    pub payload: EventPayload,
}

/// Payload carried by an [`Event`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    /// Telemetry record.
    Telemetry(TelemetryRecord),
    /// Alarm transition.
    Alarm(AlarmEvent),
    /// New actuator vector.
    Actuators(ActuatorState),
    /// Error description.
    Error {
        /// Human-readable message.
        message: String,
    },
}

/// Central event bus for pub/sub communication between the engine and the
/// streaming/display collaborators.
pub struct EventBus {
    telemetry_tx: broadcast::Sender<TelemetryRecord>,
    alarm_tx: broadcast::Sender<AlarmEvent>,
    event_tx: broadcast::Sender<Event>,
    event_counter: std::sync::atomic::AtomicU64,
}

impl EventBus {
    /// Create a bus whose channels buffer `capacity` items per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (telemetry_tx, _) = broadcast::channel(capacity);
        let (alarm_tx, _) = broadcast::channel(capacity);
        let (event_tx, _) = broadcast::channel(capacity);

        Self {
            telemetry_tx,
            alarm_tx,
            event_tx,
            event_counter: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Publish a committed telemetry record.
    pub fn publish_telemetry(&self, record: TelemetryRecord) {
        let _ = self.telemetry_tx.send(record.clone());
        self.publish_event(EventType::Telemetry, EventPayload::Telemetry(record));
    }

    /// Publish an alarm transition.
    pub fn publish_alarm(&self, alarm: AlarmEvent) {
        let _ = self.alarm_tx.send(alarm);
        self.publish_event(EventType::Alarm, EventPayload::Alarm(alarm));
    }

    /// Publish a new actuator vector.
    pub fn publish_actuators(&self, actuators: ActuatorState) {
        self.publish_event(EventType::ActuatorChange, EventPayload::Actuators(actuators));
    }

    /// Publish a non-fatal error.
    pub fn publish_error(&self, message: &str) {
        self.publish_event(
            EventType::Error,
            EventPayload::Error {
                message: message.to_string(),
            },
        );
    }

    fn publish_event(&self, event_type: EventType, payload: EventPayload) {
        let id = self
            .event_counter
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let event = Event {
            id,
            event_type,
            timestamp: Utc::now(),
            payload,
        };
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to telemetry records.
    pub fn subscribe_telemetry(&self) -> broadcast::Receiver<TelemetryRecord> {
        self.telemetry_tx.subscribe()
    }

    /// Subscribe to alarm transitions.
    pub fn subscribe_alarms(&self) -> broadcast::Receiver<AlarmEvent> {
        self.alarm_tx.subscribe()
    }

    /// Subscribe to the merged event stream.
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn alarm_fanout_reaches_both_channels() {
        let bus = EventBus::new(16);
        let mut alarms = bus.subscribe_alarms();
        let mut events = bus.subscribe_events();

        bus.publish_alarm(AlarmEvent::On);

        assert_eq!(alarms.recv().await.unwrap(), AlarmEvent::On);
        let event = events.recv().await.unwrap();
        assert!(matches!(event.payload, EventPayload::Alarm(AlarmEvent::On)));
    }

    #[tokio::test]
    async fn event_ids_are_monotonic() {
        let bus = EventBus::new(16);
        let mut events = bus.subscribe_events();
        bus.publish_error("first");
        bus.publish_error("second");

        let a = events.recv().await.unwrap();
        let b = events.recv().await.unwrap();
        assert!(b.id > a.id);
    }
}
