//! Streaming module - MQTT bridge between the engine and the outside world

mod mqtt;
pub mod messages;

pub use messages::InboundTopic;
pub use mqtt::{InboundPublish, MqttClient};

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::{AlarmEvent, Command, EventBus};

/// Streaming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Enable MQTT
    pub mqtt_enabled: bool,
    /// Broker host
    pub mqtt_broker: String,
    /// Broker port
    pub mqtt_port: u16,
    /// Client identifier
    pub mqtt_client_id: String,
    /// Optional username
    pub mqtt_username: Option<String>,
    /// Optional password
    pub mqtt_password: Option<String>,
    /// Enable TLS transport
    pub mqtt_use_tls: bool,

    /// Topic namespace, e.g. `greenguard`
    pub topic_root: String,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            mqtt_enabled: false,
            mqtt_broker: "localhost".to_string(),
            mqtt_port: 1883,
            mqtt_client_id: "greenguard".to_string(),
            mqtt_username: None,
            mqtt_password: None,
            mqtt_use_tls: false,
            topic_root: "greenguard".to_string(),
        }
    }
}

impl StreamingConfig {
    /// Outbound telemetry topic.
    pub fn data_topic(&self) -> String {
        format!("{}/data", self.topic_root)
    }

    /// Outbound alarm topic.
    pub fn alarm_topic(&self) -> String {
        format!("{}/alarm", self.topic_root)
    }

    /// Inbound control topic.
    pub fn control_topic(&self) -> String {
        format!("{}/control", self.topic_root)
    }

    /// Inbound settings topic.
    pub fn settings_topic(&self) -> String {
        format!("{}/settings", self.topic_root)
    }

    /// Inbound simulation topic.
    pub fn simulation_topic(&self) -> String {
        format!("{}/simulation", self.topic_root)
    }

    /// Inbound demo-clock topic.
    pub fn clock_topic(&self) -> String {
        format!("{}/clock", self.topic_root)
    }

    /// Classify an inbound topic string.
    pub fn classify(&self, topic: &str) -> Option<InboundTopic> {
        if topic == self.control_topic() {
            Some(InboundTopic::Control)
        } else if topic == self.settings_topic() {
            Some(InboundTopic::Settings)
        } else if topic == self.simulation_topic() {
            Some(InboundTopic::Simulation)
        } else if topic == self.clock_topic() {
            Some(InboundTopic::Clock)
        } else {
            None
        }
    }
}

/// Bridges the event bus to MQTT and inbound publishes to engine commands.
pub struct StreamingManager {
    config: StreamingConfig,
    mqtt: Option<Arc<MqttClient>>,
    inbound_rx: Option<mpsc::Receiver<InboundPublish>>,
}

impl StreamingManager {
    /// Create the manager; connects nothing until [`StreamingManager::start`].
    pub fn new(config: StreamingConfig) -> Self {
        let (mqtt, inbound_rx) = if config.mqtt_enabled {
            let (inbound_tx, inbound_rx) = mpsc::channel(64);
            (
                Some(Arc::new(MqttClient::new(&config, inbound_tx))),
                Some(inbound_rx),
            )
        } else {
            (None, None)
        };

        Self {
            config,
            mqtt,
            inbound_rx,
        }
    }

    /// Subscribe the inbound topics and spawn the outbound/inbound bridge
    /// tasks. `commands` feeds the engine loop; `bus` supplies telemetry and
    /// alarm streams.
    pub async fn start(&mut self, bus: Arc<EventBus>, commands: mpsc::Sender<Command>) -> Result<()> {
        let Some(mqtt) = self.mqtt.clone() else {
            debug!("MQTT disabled, streaming manager idle");
            return Ok(());
        };
        mqtt.announce();

        for topic in [
            self.config.control_topic(),
            self.config.settings_topic(),
            self.config.simulation_topic(),
            self.config.clock_topic(),
        ] {
            mqtt.subscribe(&topic).await?;
        }

        // Inbound: decode publishes into engine commands; malformed payloads
        // are dropped inside the decoder.
        let config = self.config.clone();
        let Some(mut inbound_rx) = self.inbound_rx.take() else {
            anyhow::bail!("streaming manager already started");
        };
        tokio::spawn(async move {
            while let Some(publish) = inbound_rx.recv().await {
                let Some(topic) = config.classify(&publish.topic) else {
                    warn!("publish on unexpected topic {:?}", publish.topic);
                    continue;
                };
                if let Some(command) = messages::decode(topic, &publish.payload) {
                    if commands.send(command).await.is_err() {
                        break;
                    }
                }
            }
        });

        // Outbound: telemetry stream.
        let data_topic = self.config.data_topic();
        let mqtt_out = mqtt.clone();
        let mut telemetry_rx = bus.subscribe_telemetry();
        tokio::spawn(async move {
            while let Ok(record) = telemetry_rx.recv().await {
                if let Err(err) = mqtt_out.publish(&data_topic, &record).await {
                    warn!("telemetry publish failed: {err}");
                }
            }
        });

        // Outbound: alarm transitions.
        let alarm_topic = self.config.alarm_topic();
        let mut alarm_rx = bus.subscribe_alarms();
        tokio::spawn(async move {
            while let Ok(alarm) = alarm_rx.recv().await {
                let payload = match alarm {
                    AlarmEvent::On => json!({
                        "event": "ON",
                        "message": "Motion detected in the greenhouse",
                    }),
                    AlarmEvent::Off => json!({
                        "event": "OFF",
                        "message": "Alarm cleared",
                    }),
                };
                if let Err(err) = mqtt.publish(&alarm_topic, &payload).await {
                    warn!("alarm publish failed: {err}");
                }
            }
        });

        Ok(())
    }
}
