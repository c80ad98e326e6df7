//! Invite acceptance: preview the invite behind a token, then register.
//!
//! Loading → Ready → Submitting → PendingApproval, with Invalid as the
//! terminal state for unknown or expired tokens. Invalid offers no retry:
//! the candidate has to ask an admin for a new invite.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{info, warn};

use super::validation::{
    ValidationReport, validate_name, validate_optional_phone, validate_password,
    validate_password_confirmation,
};
use crate::api::{AcceptInviteRequest, StylistApi};
use crate::error::error_message;
use crate::stylists::model::InvitePreview;

/// Fixed pause on the "pending approval" screen before going to login.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(3);

const INVALID_INVITE_MESSAGE: &str =
    "This invitation is invalid or has expired. Please contact the salon admin for a new invite.";

/// Registration fields collected from the candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptForm {
    pub name: String,
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

impl AcceptForm {
    /// Validate every field, reporting all failures at once.
    pub fn validate(&self) -> Result<AcceptInviteRequest, ValidationReport> {
        let mut report = ValidationReport::default();
        let name = report.check("name", validate_name(&self.name));
        let phone = report.check("phone", validate_optional_phone(self.phone.as_deref()));
        let password = report.check("password", validate_password(&self.password));
        let confirmed = report.check(
            "confirmPassword",
            validate_password_confirmation(&self.password, &self.confirm_password),
        );

        match (name, phone, password, confirmed) {
            (Some(name), Some(phone), Some(()), Some(())) => Ok(AcceptInviteRequest {
                name,
                phone,
                password: self.password.clone(),
            }),
            _ => Err(report),
        }
    }
}

/// Where the accept screen currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptPhase {
    /// Preview not fetched yet.
    Loading,
    /// Form is showing. `error` holds the last server rejection, if any.
    Ready {
        preview: InvitePreview,
        error: Option<String>,
    },
    Submitting { preview: InvitePreview },
    /// Terminal: the token can't be used.
    Invalid { message: String },
    /// Terminal: registered, waiting for admin approval.
    PendingApproval { redirect_at: Instant },
}

impl AcceptPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Invalid { .. } | Self::PendingApproval { .. })
    }
}

/// Where to send the candidate after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Login,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptOutcome {
    Submitted,
    /// Client-side validation failed; nothing was sent.
    Invalid(ValidationReport),
    /// The server refused; the form stays open with this message.
    Failed(String),
    /// Submit isn't possible in the current phase.
    NotReady,
}

/// Drives one candidate through the accept screen.
pub struct InviteAcceptor {
    api: Arc<dyn StylistApi>,
    token: String,
    phase: AcceptPhase,
}

impl InviteAcceptor {
    pub fn new(api: Arc<dyn StylistApi>, token: impl Into<String>) -> Self {
        Self {
            api,
            token: token.into(),
            phase: AcceptPhase::Loading,
        }
    }

    pub fn phase(&self) -> &AcceptPhase {
        &self.phase
    }

    /// Fetch the invite preview. Only does anything while `Loading`.
    pub async fn load(&mut self) -> &AcceptPhase {
        if self.phase != AcceptPhase::Loading {
            return &self.phase;
        }

        self.phase = match self.api.validate_invite(&self.token).await {
            Ok(preview) if preview.is_expired_at(Utc::now()) => {
                info!(email = %preview.email, "Invite preview has expired");
                AcceptPhase::Invalid {
                    message: INVALID_INVITE_MESSAGE.to_string(),
                }
            }
            Ok(preview) => AcceptPhase::Ready {
                preview,
                error: None,
            },
            Err(e) => {
                warn!(error = %e, not_found = e.is_not_found(), "Invite token rejected");
                AcceptPhase::Invalid {
                    message: INVALID_INVITE_MESSAGE.to_string(),
                }
            }
        };
        &self.phase
    }

    /// Validate and submit the registration.
    pub async fn submit(&mut self, form: &AcceptForm) -> AcceptOutcome {
        let preview = match &self.phase {
            AcceptPhase::Ready { preview, .. } => preview.clone(),
            _ => return AcceptOutcome::NotReady,
        };

        let request = match form.validate() {
            Ok(request) => request,
            Err(report) => return AcceptOutcome::Invalid(report),
        };

        self.phase = AcceptPhase::Submitting {
            preview: preview.clone(),
        };

        match self.api.accept_invite(&self.token, &request).await {
            Ok(()) => {
                info!(email = %preview.email, "Invite accepted, awaiting approval");
                self.phase = AcceptPhase::PendingApproval {
                    redirect_at: Instant::now() + REDIRECT_DELAY,
                };
                AcceptOutcome::Submitted
            }
            Err(e) => {
                let message = error_message(&e, "Failed to complete registration");
                warn!(email = %preview.email, error = %e, "Invite acceptance rejected");
                self.phase = AcceptPhase::Ready {
                    preview,
                    error: Some(message.clone()),
                };
                AcceptOutcome::Failed(message)
            }
        }
    }

    /// Wait out the pending-approval pause. `None` unless registration succeeded.
    pub async fn wait_for_redirect(&self) -> Option<Redirect> {
        match self.phase {
            AcceptPhase::PendingApproval { redirect_at } => {
                tokio::time::sleep_until(redirect_at).await;
                Some(Redirect::Login)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration};
    use reqwest::StatusCode;

    use super::*;
    use crate::api::InviteRequest;
    use crate::error::ApiError;
    use crate::stylists::model::{InviteCreated, StylistPage, StylistQuery, StylistRecord};

    struct StubInvites {
        expires_at: Option<DateTime<Utc>>,
        accept_error: Option<String>,
        accepted: Mutex<Vec<AcceptInviteRequest>>,
    }

    impl StubInvites {
        fn valid() -> Self {
            Self {
                expires_at: Some(Utc::now() + ChronoDuration::days(2)),
                accept_error: None,
                accepted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StylistApi for StubInvites {
        async fn validate_invite(&self, token: &str) -> Result<InvitePreview, ApiError> {
            match self.expires_at {
                Some(expires_at) if token == "good" => Ok(InvitePreview {
                    email: "a@b.com".into(),
                    specialization: "Color".into(),
                    experience: 3,
                    expires_at,
                }),
                _ => Err(ApiError::Status {
                    endpoint: "GET /stylists/invite/:token".into(),
                    status: StatusCode::NOT_FOUND,
                    message: Some("Invite not found".into()),
                }),
            }
        }

        async fn accept_invite(&self, _token: &str, request: &AcceptInviteRequest) -> Result<(), ApiError> {
            if let Some(message) = &self.accept_error {
                return Err(ApiError::Refused {
                    endpoint: "POST /stylists/invite/:token/accept".into(),
                    message: Some(message.clone()),
                });
            }
            self.accepted.lock().unwrap().push(request.clone());
            Ok(())
        }

        async fn create_invite(&self, _request: &InviteRequest) -> Result<InviteCreated, ApiError> {
            unimplemented!("not used in acceptor tests")
        }
        async fn send_invite(&self, _user_id: &str) -> Result<InviteCreated, ApiError> {
            unimplemented!("not used in acceptor tests")
        }
        async fn fetch_paginated_stylists(&self, _query: &StylistQuery) -> Result<StylistPage, ApiError> {
            unimplemented!("not used in acceptor tests")
        }
        async fn fetch_stylists(&self) -> Result<Vec<StylistRecord>, ApiError> {
            unimplemented!("not used in acceptor tests")
        }
        async fn approve_stylist(&self, _user_id: &str) -> Result<(), ApiError> {
            unimplemented!("not used in acceptor tests")
        }
        async fn reject_stylist(&self, _user_id: &str) -> Result<(), ApiError> {
            unimplemented!("not used in acceptor tests")
        }
        async fn block_stylist_legacy(&self, _user_id: &str, _block: bool) -> Result<(), ApiError> {
            unimplemented!("not used in acceptor tests")
        }
        async fn set_stylist_blocked(&self, _stylist_id: &str, _is_blocked: bool) -> Result<(), ApiError> {
            unimplemented!("not used in acceptor tests")
        }
        async fn apply_as_stylist(&self, _request: &InviteRequest) -> Result<(), ApiError> {
            unimplemented!("not used in acceptor tests")
        }
    }

    fn good_form() -> AcceptForm {
        AcceptForm {
            name: "Ana Silva".into(),
            phone: Some("+91 98765 43210".into()),
            password: "Abc123!@".into(),
            confirm_password: "Abc123!@".into(),
        }
    }

    #[test]
    fn form_normalizes_phone() {
        let request = good_form().validate().unwrap();
        assert_eq!(request.phone.as_deref(), Some("9876543210"));
        assert_eq!(request.name, "Ana Silva");
    }

    #[test]
    fn form_reports_every_bad_field() {
        let form = AcceptForm {
            name: "J".into(),
            phone: Some("12345".into()),
            password: "abc12345".into(),
            confirm_password: "abc1234".into(),
        };
        let report = form.validate().unwrap_err();
        for field in ["name", "phone", "password", "confirmPassword"] {
            assert!(report.message_for(field).is_some(), "missing error for {field}");
        }
    }

    #[tokio::test]
    async fn unknown_token_is_terminal() {
        let mut acceptor = InviteAcceptor::new(Arc::new(StubInvites::valid()), "bad");
        let phase = acceptor.load().await.clone();
        assert!(matches!(phase, AcceptPhase::Invalid { .. }));
        assert!(phase.is_terminal());
        assert_eq!(acceptor.submit(&good_form()).await, AcceptOutcome::NotReady);
    }

    #[tokio::test]
    async fn expired_preview_is_invalid() {
        let stub = StubInvites {
            expires_at: Some(Utc::now() - ChronoDuration::minutes(1)),
            ..StubInvites::valid()
        };
        let mut acceptor = InviteAcceptor::new(Arc::new(stub), "good");
        assert!(matches!(acceptor.load().await, AcceptPhase::Invalid { .. }));
    }

    #[tokio::test]
    async fn validation_errors_never_hit_the_network() {
        let stub = Arc::new(StubInvites::valid());
        let mut acceptor = InviteAcceptor::new(Arc::clone(&stub) as Arc<dyn StylistApi>, "good");
        acceptor.load().await;

        let form = AcceptForm {
            confirm_password: "different".into(),
            ..good_form()
        };
        assert!(matches!(acceptor.submit(&form).await, AcceptOutcome::Invalid(_)));
        assert!(stub.accepted.lock().unwrap().is_empty());
        assert!(matches!(acceptor.phase(), AcceptPhase::Ready { .. }));
    }

    #[tokio::test]
    async fn server_rejection_keeps_form_open() {
        let stub = StubInvites {
            accept_error: Some("Invite already used".into()),
            ..StubInvites::valid()
        };
        let mut acceptor = InviteAcceptor::new(Arc::new(stub), "good");
        acceptor.load().await;

        let outcome = acceptor.submit(&good_form()).await;
        assert_eq!(outcome, AcceptOutcome::Failed("Invite already used".into()));
        match acceptor.phase() {
            AcceptPhase::Ready { error, .. } => assert_eq!(error.as_deref(), Some("Invite already used")),
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn success_redirects_to_login_after_delay() {
        let stub = Arc::new(StubInvites::valid());
        let mut acceptor = InviteAcceptor::new(Arc::clone(&stub) as Arc<dyn StylistApi>, "good");
        assert!(matches!(acceptor.load().await, AcceptPhase::Ready { .. }));

        assert_eq!(acceptor.submit(&good_form()).await, AcceptOutcome::Submitted);
        assert!(acceptor.phase().is_terminal());
        assert_eq!(stub.accepted.lock().unwrap()[0].phone.as_deref(), Some("9876543210"));

        let started = Instant::now();
        assert_eq!(acceptor.wait_for_redirect().await, Some(Redirect::Login));
        assert!(started.elapsed() >= REDIRECT_DELAY);
    }

    #[tokio::test]
    async fn no_redirect_before_success() {
        let acceptor = InviteAcceptor::new(Arc::new(StubInvites::valid()), "good");
        assert_eq!(acceptor.wait_for_redirect().await, None);
    }
}
