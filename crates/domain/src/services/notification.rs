//! Notification service for push notifications.
//!
//! Provides the abstraction for delivering invite pushes to devices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    InviteReceived,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::InviteReceived => write!(f, "invite_received"),
        }
    }
}

/// Notification payload for a received game invite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteReceivedPayload {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub invite_id: Uuid,
    pub game_id: Uuid,
    pub game_name: String,
    pub park_name: String,
    pub sender_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

/// Result of a notification send attempt.
#[derive(Debug, Clone)]
pub enum NotificationResult {
    /// Notification was sent successfully.
    Sent,
    /// The recipient has no device token registered.
    NoToken,
    /// Notification sending failed (but was non-blocking).
    Failed(String),
    /// Notification was skipped (e.g., push disabled in config).
    Skipped,
}

/// Notification service trait for sending push notifications.
#[async_trait::async_trait]
pub trait NotificationService: Send + Sync {
    /// Send an invite-received notification to a device.
    async fn send_invite_received(
        &self,
        device_token: &str,
        payload: InviteReceivedPayload,
    ) -> NotificationResult;
}

/// Mock notification service for development and testing.
///
/// Logs notifications but doesn't actually send them.
#[derive(Debug, Clone, Default)]
pub struct MockNotificationService {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockNotificationService {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    /// Create a mock service that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl NotificationService for MockNotificationService {
    async fn send_invite_received(
        &self,
        device_token: &str,
        payload: InviteReceivedPayload,
    ) -> NotificationResult {
        if self.simulate_failure {
            tracing::warn!(
                device_token = %device_token,
                invite_id = %payload.invite_id,
                "Mock notification service simulating failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            device_token = %device_token,
            invite_id = %payload.invite_id,
            game_name = %payload.game_name,
            sender_name = %payload.sender_name,
            "Mock: Would send invite_received notification"
        );

        NotificationResult::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type_display() {
        assert_eq!(
            NotificationType::InviteReceived.to_string(),
            "invite_received"
        );
    }

    #[test]
    fn test_invite_received_payload_serialization() {
        let payload = InviteReceivedPayload {
            notification_type: NotificationType::InviteReceived,
            invite_id: Uuid::nil(),
            game_id: Uuid::nil(),
            game_name: "Saturday Run".to_string(),
            park_name: "Riverside Park".to_string(),
            sender_name: "Jordan".to_string(),
            scheduled_time: None,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("invite_received"));
        assert!(json.contains("Saturday Run"));
        assert!(!json.contains("scheduledTime"));
    }

    #[tokio::test]
    async fn test_mock_notification_service_send() {
        let service = MockNotificationService::new();

        let payload = InviteReceivedPayload {
            notification_type: NotificationType::InviteReceived,
            invite_id: Uuid::nil(),
            game_id: Uuid::nil(),
            game_name: "Test".to_string(),
            park_name: "Test Park".to_string(),
            sender_name: "Test".to_string(),
            scheduled_time: None,
            timestamp: Utc::now(),
        };

        let result = service.send_invite_received("token123", payload).await;
        assert!(matches!(result, NotificationResult::Sent));
    }

    #[tokio::test]
    async fn test_mock_notification_service_failure() {
        let service = MockNotificationService::failing();

        let payload = InviteReceivedPayload {
            notification_type: NotificationType::InviteReceived,
            invite_id: Uuid::nil(),
            game_id: Uuid::nil(),
            game_name: "Test".to_string(),
            park_name: "Test Park".to_string(),
            sender_name: "Test".to_string(),
            scheduled_time: None,
            timestamp: Utc::now(),
        };

        let result = service.send_invite_received("token123", payload).await;
        assert!(matches!(result, NotificationResult::Failed(_)));
    }
}
