//! Stylist invitations: issuing, validating forms, and accepting.

pub mod acceptor;
pub mod issuer;
pub mod validation;

pub use acceptor::{AcceptForm, AcceptOutcome, AcceptPhase, InviteAcceptor, Redirect};
pub use issuer::{ApplicationOutcome, InviteForm, apply_as_stylist, invite_token};
pub use validation::{FieldError, ValidationReport};
