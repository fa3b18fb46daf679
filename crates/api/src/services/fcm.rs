//! Firebase Cloud Messaging (FCM) notification service.
//!
//! Implements the NotificationService trait using the FCM legacy HTTP API
//! for sending invite pushes to Android/iOS devices.

use std::time::Duration;

use async_trait::async_trait;
use domain::services::{InviteReceivedPayload, NotificationResult, NotificationService};
use reqwest::Client;
use serde::Serialize;

use crate::config::FcmConfig;

/// FCM notification service.
pub struct FcmNotificationService {
    client: Client,
    config: FcmConfig,
}

/// FCM legacy API message structure.
#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    to: &'a str,
    data: serde_json::Value,
    priority: &'static str,
}

/// Error type for FCM setup.
#[derive(Debug, thiserror::Error)]
pub enum FcmError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("FCM is not enabled")]
    NotEnabled,
}

impl FcmNotificationService {
    /// Create a new FCM notification service.
    ///
    /// # Errors
    /// Returns an error if FCM is disabled or the HTTP client cannot be
    /// built.
    pub fn new(config: FcmConfig) -> Result<Self, FcmError> {
        if !config.enabled {
            return Err(FcmError::NotEnabled);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl NotificationService for FcmNotificationService {
    async fn send_invite_received(
        &self,
        device_token: &str,
        payload: InviteReceivedPayload,
    ) -> NotificationResult {
        if device_token.is_empty() {
            return NotificationResult::NoToken;
        }

        let data = match serde_json::to_value(&payload) {
            Ok(data) => data,
            Err(e) => return NotificationResult::Failed(format!("Payload encoding: {}", e)),
        };

        let message = FcmMessage {
            to: device_token,
            data,
            priority: "high",
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(
                "Authorization",
                format!("key={}", self.config.server_key),
            )
            .json(&message)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!(
                    invite_id = %payload.invite_id,
                    "Invite push sent"
                );
                NotificationResult::Sent
            }
            Ok(resp) => {
                let status = resp.status();
                tracing::warn!(
                    invite_id = %payload.invite_id,
                    status = %status,
                    "FCM rejected invite push"
                );
                NotificationResult::Failed(format!("FCM returned {}", status))
            }
            Err(e) => {
                tracing::warn!(
                    invite_id = %payload.invite_id,
                    error = %e,
                    "Failed to reach FCM"
                );
                NotificationResult::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_rejected() {
        let config = FcmConfig::default();
        assert!(matches!(
            FcmNotificationService::new(config),
            Err(FcmError::NotEnabled)
        ));
    }

    #[test]
    fn test_enabled_config_builds() {
        let config = FcmConfig {
            enabled: true,
            server_key: "test-key".to_string(),
            ..Default::default()
        };
        assert!(FcmNotificationService::new(config).is_ok());
    }
}
