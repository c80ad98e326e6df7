//! Invite issuance: form validation, public self-application and helpers
//! for the shareable invite link.

use chrono::{DateTime, Utc};
use tracing::info;

use super::validation::{ValidationReport, required, validate_experience};
use crate::api::{InviteRequest, StylistApi};
use crate::error::error_message;

/// What the admin (or applicant) typed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteForm {
    pub email: String,
    pub specialization: String,
    pub experience: i64,
}

impl InviteForm {
    pub fn new(email: impl Into<String>, specialization: impl Into<String>, experience: i64) -> Self {
        Self {
            email: email.into(),
            specialization: specialization.into(),
            experience,
        }
    }

    /// Required-field checks only; the server validates email shape.
    pub fn validate(&self) -> Result<InviteRequest, ValidationReport> {
        let mut report = ValidationReport::default();
        let email = report.check("email", required("Email", &self.email));
        let specialization = report.check(
            "specialization",
            required("Specialization", &self.specialization),
        );
        let experience = report.check("experience", validate_experience(self.experience));

        match (email, specialization, experience) {
            (Some(email), Some(specialization), Some(experience)) => Ok(InviteRequest {
                email,
                specialization,
                experience,
            }),
            _ => Err(report),
        }
    }
}

/// Outcome of a public "apply as stylist" submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationOutcome {
    Submitted,
    Invalid(ValidationReport),
    Failed(String),
}

/// Submit a self-application. Creates an APPLIED record server-side.
pub async fn apply_as_stylist(api: &dyn StylistApi, form: &InviteForm) -> ApplicationOutcome {
    let request = match form.validate() {
        Ok(request) => request,
        Err(report) => return ApplicationOutcome::Invalid(report),
    };
    match api.apply_as_stylist(&request).await {
        Ok(()) => {
            info!(email = %request.email, "Stylist application submitted");
            ApplicationOutcome::Submitted
        }
        Err(e) => ApplicationOutcome::Failed(error_message(&e, "Failed to submit application")),
    }
}

/// The token part of an invite link (its last non-empty path segment,
/// ignoring any query string or fragment).
pub fn invite_token(link: &str) -> Option<&str> {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|t| !t.is_empty() && !t.contains(':'))
}

/// Whether an invite with `expires_at` can still be used at `now`.
pub fn invite_usable(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_none_or(|at| now <= at)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn valid_form_becomes_request() {
        let request = InviteForm::new(" a@b.com ", "Color", 3).validate().unwrap();
        assert_eq!(request.email, "a@b.com");
        assert_eq!(request.specialization, "Color");
        assert_eq!(request.experience, 3);
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let report = InviteForm::new("", "  ", -2).validate().unwrap_err();
        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.message_for("email"), Some("Email is required"));
        assert_eq!(report.message_for("specialization"), Some("Specialization is required"));
        assert_eq!(report.message_for("experience"), Some("Experience cannot be negative"));
    }

    #[test]
    fn token_is_last_segment() {
        assert_eq!(invite_token("https://salon.test/stylist/invite/abc123"), Some("abc123"));
        assert_eq!(invite_token("https://salon.test/stylist/invite/abc123/"), Some("abc123"));
        assert_eq!(invite_token("https://salon.test/invite/tok?ref=mail#top"), Some("tok"));
        assert_eq!(invite_token("tok"), Some("tok"));
        assert_eq!(invite_token("https://"), None);
    }

    #[test]
    fn expiry_check() {
        let now = Utc::now();
        assert!(invite_usable(None, now));
        assert!(invite_usable(Some(now + Duration::hours(1)), now));
        assert!(!invite_usable(Some(now - Duration::seconds(1)), now));
    }
}
