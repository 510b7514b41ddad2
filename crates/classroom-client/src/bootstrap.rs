//! Session bootstrap: request a transport credential for a lesson.
//!
//! `GET {api_base}/live/lessons/{lesson_id}/join/` answers with either a
//! connection grant or, when the join window has not opened yet, a 403 with
//! `{"error": "too_early", "message": ..., "open_at": ...}`. The second case is
//! an expected deferral and is returned as [`JoinOutcome::Wait`]; the caller
//! shows a wait screen with a manual retry. Every other failure is a hard
//! [`ClassroomError`]. Nothing here retries automatically.

use crate::config::Config;
use crate::errors::ClassroomError;
use crate::join_window::{JoinPhase, JoinWindowPolicy, SessionWindow};
use crate::observability::metrics;
use chrono::{DateTime, Utc};
use common::secret::{ExposeSecret, SecretString};
use common::types::{LessonId, ParticipantIdentity};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, trace, warn};

/// Default connection timeout for the HTTP client.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Error code the backend uses for a join attempted before the window opens.
const TOO_EARLY_ERROR: &str = "too_early";

/// A file attached to the lesson.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LessonResource {
    pub id: u64,
    pub title: String,
    /// Downloadable reference (URL or storage path).
    pub file: String,
}

/// Everything needed to connect to the live room.
#[derive(Debug, Clone)]
pub struct ConnectionGrant {
    /// Transport credential.
    pub token: SecretString,
    /// Transport endpoint.
    pub url: String,
    /// Whether the local user is the host of this lesson.
    pub is_host: bool,
    /// Participant identity of the host.
    pub host_identity: ParticipantIdentity,
    /// Authoritative end time, including any extension already applied.
    pub effective_end: DateTime<Utc>,
    pub resources: Vec<LessonResource>,
}

/// Why the join was deferred, and when to try again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitInfo {
    pub message: String,
    pub open_at: Option<DateTime<Utc>>,
}

/// Result of a join attempt that did not hard-fail.
#[derive(Debug, Clone)]
pub enum JoinOutcome {
    Granted(ConnectionGrant),
    Wait(WaitInfo),
}

/// Successful join response body.
#[derive(Deserialize)]
struct JoinResponse {
    token: String,
    url: String,
    #[serde(default)]
    is_host: bool,
    host_identity: String,
    effective_end_time: DateTime<Utc>,
    #[serde(default)]
    resources: Vec<LessonResource>,
}

/// Error body returned with a 403.
#[derive(Debug, Deserialize)]
struct JoinErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    open_at: Option<DateTime<Utc>>,
}

/// HTTP client for the join endpoint.
#[derive(Clone)]
pub struct JoinClient {
    http_client: reqwest::Client,
    api_base_url: String,
    api_token: Option<SecretString>,
    policy: JoinWindowPolicy,
}

impl std::fmt::Debug for JoinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoinClient")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl JoinClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClassroomError::Config` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ClassroomError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ClassroomError::Config(format!("Failed to build HTTP client: {e}")))?;

        let lead = chrono::Duration::from_std(config.join_lead)
            .map_err(|e| ClassroomError::Config(format!("join lead out of range: {e}")))?;

        Ok(Self {
            http_client,
            api_base_url: config.api_base_url.clone(),
            api_token: config.api_token.clone(),
            policy: JoinWindowPolicy::new(lead),
        })
    }

    /// The join window policy this client gates on.
    #[must_use]
    pub fn policy(&self) -> JoinWindowPolicy {
        self.policy
    }

    /// Request a connection grant for `lesson_id`.
    ///
    /// Calling this again after a successful join returns a fresh grant.
    #[instrument(skip_all, fields(lesson_id = %lesson_id))]
    pub async fn join(&self, lesson_id: LessonId) -> Result<JoinOutcome, ClassroomError> {
        let result = self.request_grant(lesson_id).await;
        metrics::record_join_request(match &result {
            Ok(JoinOutcome::Granted(_)) => "granted",
            Ok(JoinOutcome::Wait(_)) => "too_early",
            Err(_) => "error",
        });
        result
    }

    /// Gate the join request on the local join window first.
    ///
    /// Before the window opens no request is sent and a locally built
    /// [`WaitInfo`] is returned. After the window closes the join fails with
    /// `ClassroomError::LessonEnded`.
    pub async fn join_within_window(
        &self,
        lesson_id: LessonId,
        window: &SessionWindow,
        now: DateTime<Utc>,
    ) -> Result<JoinOutcome, ClassroomError> {
        match self.policy.classify(now, window.start(), window.end()) {
            JoinPhase::TooEarly => {
                let open_at = self.policy.opens_at(window.start());
                debug!(
                    target: "classroom.bootstrap",
                    lesson_id = %lesson_id,
                    open_at = %open_at,
                    "Join window not open yet, skipping request"
                );
                Ok(JoinOutcome::Wait(WaitInfo {
                    message: too_early_message(open_at),
                    open_at: Some(open_at),
                }))
            }
            JoinPhase::Ended => Err(ClassroomError::LessonEnded),
            JoinPhase::Joinable | JoinPhase::Live => self.join(lesson_id).await,
        }
    }

    async fn request_grant(&self, lesson_id: LessonId) -> Result<JoinOutcome, ClassroomError> {
        let url = format!("{}/live/lessons/{lesson_id}/join/", self.api_base_url);

        debug!(
            target: "classroom.bootstrap",
            lesson_id = %lesson_id,
            url = %url,
            "Requesting join grant"
        );

        let mut request = self.http_client.get(&url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            debug!(target: "classroom.bootstrap", error = %e, "HTTP request failed");
            ClassroomError::Http(e.to_string())
        })?;

        let status = response.status();

        if status.is_success() {
            let body: JoinResponse = response.json().await.map_err(|e| {
                warn!(target: "classroom.bootstrap", error = %e, "Failed to parse join response");
                ClassroomError::InvalidResponse(e.to_string())
            })?;

            if body.host_identity.is_empty() {
                return Err(ClassroomError::InvalidResponse(
                    "empty host identity".to_string(),
                ));
            }

            info!(
                target: "classroom.bootstrap",
                lesson_id = %lesson_id,
                is_host = body.is_host,
                effective_end = %body.effective_end_time,
                resources = body.resources.len(),
                "Join grant received"
            );

            return Ok(JoinOutcome::Granted(ConnectionGrant {
                token: SecretString::from(body.token),
                url: body.url,
                is_host: body.is_host,
                host_identity: ParticipantIdentity::new(body.host_identity),
                effective_end: body.effective_end_time,
                resources: body.resources,
            }));
        }

        // Read the body for diagnostics; only log it at trace level
        let body = response.text().await.unwrap_or_else(|e| {
            trace!(target: "classroom.bootstrap", error = %e, "Failed to read error response body");
            String::new()
        });
        trace!(
            target: "classroom.bootstrap",
            status = %status,
            body = %body,
            "Join rejection response body"
        );

        match status.as_u16() {
            403 => {
                let parsed: Option<JoinErrorResponse> = serde_json::from_str(&body).ok();
                match parsed {
                    Some(err) if err.error.as_deref() == Some(TOO_EARLY_ERROR) => {
                        info!(
                            target: "classroom.bootstrap",
                            lesson_id = %lesson_id,
                            open_at = ?err.open_at,
                            "Join window not open yet"
                        );
                        let message = match (err.message, err.open_at) {
                            (Some(message), _) if !message.is_empty() => message,
                            (_, Some(open_at)) => too_early_message(open_at),
                            _ => "This class has not opened yet".to_string(),
                        };
                        Ok(JoinOutcome::Wait(WaitInfo {
                            message,
                            open_at: err.open_at,
                        }))
                    }
                    _ => {
                        warn!(target: "classroom.bootstrap", status = %status, "Join forbidden");
                        Err(ClassroomError::PermissionDenied(format!("Status {status}")))
                    }
                }
            }
            401 => {
                warn!(target: "classroom.bootstrap", status = %status, "Join unauthorized");
                Err(ClassroomError::Unauthorized(format!("Status {status}")))
            }
            404 => {
                warn!(target: "classroom.bootstrap", lesson_id = %lesson_id, "Lesson not found");
                Err(ClassroomError::LessonNotFound(format!("lesson {lesson_id}")))
            }
            _ => {
                warn!(
                    target: "classroom.bootstrap",
                    status = %status,
                    "Unexpected response from join endpoint"
                );
                Err(ClassroomError::Http(format!("Unexpected status: {status}")))
            }
        }
    }
}

fn too_early_message(open_at: DateTime<Utc>) -> String {
    format!(
        "This class opens at {} UTC",
        open_at.format("%Y-%m-%d %H:%M")
    )
}
