//! QR scan resolution route.
//!
//! Scanning is a request/response conversation: the client posts the raw
//! payload, and whenever the flow needs an answer the server responds with a
//! prompt description. The client re-posts the same payload with the answer
//! filled in until the flow completes.

use async_trait::async_trait;
use axum::{extract::State, Json};
use domain::models::{CheckIn, Court, SportCategory};
use domain::services::{PromptReply, PromptRequest, ScanOutcome, ScanPrompts, ScanUser};
use persistence::repositories::UserRepository;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_check_in_created;

/// Request body for a scan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    /// Raw QR payload as scanned.
    pub payload: String,

    /// Answers to prompts from earlier passes of the same scan.
    #[serde(default)]
    pub answers: ScanAnswers,

    /// Set when the user dismissed the pending prompt.
    #[serde(default)]
    pub dismissed: bool,
}

/// Prompt answers carried across scan passes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanAnswers {
    pub sport_category: Option<SportCategory>,
    pub court_id: Option<Uuid>,
    pub player_count: Option<i32>,
}

/// Response body for a scan.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanResponse {
    /// The flow finished; a check-in was recorded.
    Complete { check_in: CheckIn, queued: bool },
    /// An answer is needed; re-post the payload with it filled in.
    Prompt { prompt: PromptRequest },
    /// The payload did not match any recognized shape.
    Unrecognized,
    /// The user dismissed a prompt; nothing was recorded.
    Cancelled,
}

/// Prompt implementation that answers from the request body.
///
/// Missing answers defer, which surfaces the prompt to the client; a
/// dismissed request turns every reply into a dismissal.
struct ProvidedAnswers {
    answers: ScanAnswers,
    dismissed: bool,
}

impl ProvidedAnswers {
    fn reply<T>(&self, value: Option<T>) -> PromptReply<T> {
        if self.dismissed {
            return PromptReply::Dismissed;
        }
        match value {
            Some(v) => PromptReply::Answer(v),
            None => PromptReply::Deferred,
        }
    }
}

#[async_trait]
impl ScanPrompts for ProvidedAnswers {
    async fn choose_sport_category(&self, _options: &[SportCategory]) -> PromptReply<SportCategory> {
        self.reply(self.answers.sport_category)
    }

    async fn choose_court(&self, _options: &[Court]) -> PromptReply<Uuid> {
        self.reply(self.answers.court_id)
    }

    async fn choose_player_count(&self, _default: i32) -> PromptReply<i32> {
        self.reply(self.answers.player_count)
    }
}

/// Resolve a scanned QR payload.
///
/// POST /api/v1/scan
pub async fn process_scan(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    let scan_user = ScanUser {
        id: user.id,
        display_name: user.display_name,
        photo_url: user.photo_url,
    };
    let prompts = ProvidedAnswers {
        answers: request.answers,
        dismissed: request.dismissed,
    };

    let outcome = state
        .resolver
        .process(&scan_user, &request.payload, &prompts)
        .await?;

    match outcome {
        ScanOutcome::CheckedIn { check_in, queued } => {
            record_check_in_created();
            info!(
                user_id = %scan_user.id,
                check_in_id = %check_in.id,
                queued = queued,
                "Scan completed"
            );
            Ok(Json(ScanResponse::Complete { check_in, queued }))
        }
        ScanOutcome::NeedsAnswer(prompt) => Ok(Json(ScanResponse::Prompt { prompt })),
        ScanOutcome::Unrecognized => Ok(Json(ScanResponse::Unrecognized)),
        ScanOutcome::Cancelled => Ok(Json(ScanResponse::Cancelled)),
        ScanOutcome::AlreadyScanning => Err(ApiError::Conflict(
            "A scan for this user is already in progress".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_provided_answers_defer_when_missing() {
        let prompts = ProvidedAnswers {
            answers: ScanAnswers::default(),
            dismissed: false,
        };
        assert_eq!(
            prompts.choose_player_count(1).await,
            PromptReply::Deferred
        );
        assert_eq!(
            prompts.choose_sport_category(&[]).await,
            PromptReply::Deferred
        );
    }

    #[tokio::test]
    async fn test_provided_answers_pass_through() {
        let prompts = ProvidedAnswers {
            answers: ScanAnswers {
                sport_category: Some(SportCategory::Tennis),
                court_id: None,
                player_count: Some(4),
            },
            dismissed: false,
        };
        assert_eq!(
            prompts.choose_sport_category(&[]).await,
            PromptReply::Answer(SportCategory::Tennis)
        );
        assert_eq!(prompts.choose_player_count(1).await, PromptReply::Answer(4));
    }

    #[tokio::test]
    async fn test_dismissed_overrides_answers() {
        let prompts = ProvidedAnswers {
            answers: ScanAnswers {
                sport_category: None,
                court_id: None,
                player_count: Some(4),
            },
            dismissed: true,
        };
        assert_eq!(
            prompts.choose_player_count(1).await,
            PromptReply::Dismissed
        );
    }

    #[test]
    fn test_scan_request_deserializes_with_defaults() {
        let request: ScanRequest =
            serde_json::from_str(r#"{"payload": "courthub://checkin?parkId=x"}"#).unwrap();
        assert!(!request.dismissed);
        assert!(request.answers.player_count.is_none());
    }
}
