// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! MQTT client for telemetry publication and remote control intake

use anyhow::{anyhow, Result};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS, Transport};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::StreamingConfig;

/// A publish received on one of the subscribed topics.
#[derive(Debug, Clone)]
pub struct InboundPublish {
    /// Full topic string.
    pub topic: String,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

/// MQTT client wrapper
pub struct MqttClient {
    client: AsyncClient,
    broker: String,
    port: u16,
}

impl MqttClient {
    /// Create the client and spawn its event loop. Incoming publishes are
    /// forwarded to `inbound`; connection errors are retried with a delay.
    pub fn new(config: &StreamingConfig, inbound: mpsc::Sender<InboundPublish>) -> Self {
        let mut options = MqttOptions::new(
            &config.mqtt_client_id,
            &config.mqtt_broker,
            config.mqtt_port,
        );

        options.set_keep_alive(Duration::from_secs(30));

        if let (Some(username), Some(password)) = (&config.mqtt_username, &config.mqtt_password) {
            options.set_credentials(username, password);
        }

        if config.mqtt_use_tls {
            // Note: in production, load proper certificates
            options.set_transport(Transport::Tcp);
        }

        let (client, mut eventloop) = AsyncClient::new(options, 100);

        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("MQTT connected");
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        debug!("MQTT received on {:?}", publish.topic);
                        let forwarded = InboundPublish {
                            topic: publish.topic.clone(),
                            payload: publish.payload.to_vec(),
                        };
                        if inbound.send(forwarded).await.is_err() {
                            // Receiver gone, the bridge is shutting down.
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("MQTT error: {:?}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        });

        Self {
            client,
            broker: config.mqtt_broker.clone(),
            port: config.mqtt_port,
        }
    }

    /// Log the endpoint once the event loop owns the connection.
    pub fn announce(&self) {
        info!("MQTT client initialized for {}:{}", self.broker, self.port);
    }

    /// Publish a JSON-encoded payload.
    pub async fn publish<T: Serialize>(&self, topic: &str, payload: &T) -> Result<()> {
        let json = serde_json::to_vec(payload)?;

        self.client
            .publish(topic, QoS::AtLeastOnce, false, json)
            .await
            .map_err(|e| anyhow!("MQTT publish failed: {}", e))?;

        Ok(())
    }

    /// Subscribe to a topic.
    pub async fn subscribe(&self, topic: &str) -> Result<()> {
        self.client
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| anyhow!("MQTT subscribe failed: {}", e))?;

        info!("Subscribed to MQTT topic: {}", topic);
        Ok(())
    }

    /// Disconnect from the broker.
    pub async fn disconnect(&self) -> Result<()> {
        self.client
            .disconnect()
            .await
            .map_err(|e| anyhow!("MQTT disconnect failed: {}", e))?;

        Ok(())
    }
}
