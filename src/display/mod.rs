// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Display collaborator - console rendering of controller state
//!
//! Stands in for the original 16x2 character LCD. Requests arrive over an
//! mpsc channel and any banner hold time elapses inside this task, so the
//! control tick never blocks on the display.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use crate::core::TelemetryRecord;

/// How long an alert/config banner stays up before status resumes.
pub const BANNER_HOLD: Duration = Duration::from_millis(2000);

/// A request for the display collaborator.
#[derive(Debug, Clone)]
pub enum DisplayRequest {
    /// Routine status line refresh.
    Status(TelemetryRecord),
    /// Two-line banner held for a fixed time; status refreshes arriving
    /// during the hold are dropped, like the original LCD overlay.
    Banner {
        /// Top line.
        line1: String,
        /// Bottom line.
        line2: String,
    },
}

/// Render display requests to the console until the channel closes.
pub async fn run(mut requests: mpsc::Receiver<DisplayRequest>) {
    while let Some(request) = requests.recv().await {
        match request {
            DisplayRequest::Status(record) => {
                info!(
                    "display: T:{:.1}C H:{:.0}% | L:{} {}",
                    record.temp,
                    record.hum,
                    record.lux,
                    if record.fan { "Open" } else { "Clsd" }
                );
            }
            DisplayRequest::Banner { line1, line2 } => {
                info!("display: [{line1}] [{line2}]");
                tokio::time::sleep(BANNER_HOLD).await;
                // Drain status refreshes that queued up during the hold.
                while let Ok(next) = requests.try_recv() {
                    if let DisplayRequest::Banner { line1, line2 } = next {
                        info!("display: [{line1}] [{line2}]");
                        tokio::time::sleep(BANNER_HOLD).await;
                    }
                }
            }
        }
    }
}
