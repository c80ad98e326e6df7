//! Confirmation step for admin transitions.
//!
//! A `ConfirmedTransition` can only be obtained by confirming a
//! `PendingTransition`, and `ReviewQueue::execute` only accepts the former.

use serde::Serialize;

use super::flow::StylistAction;
use super::model::StylistRecord;

/// A state-changing admin action on one stylist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Approve,
    Reject,
    Block,
    Unblock,
}

impl Transition {
    /// The transition behind a row action, if it is one.
    pub fn from_action(action: StylistAction) -> Option<Self> {
        match action {
            StylistAction::Approve => Some(Self::Approve),
            StylistAction::Reject => Some(Self::Reject),
            StylistAction::Block => Some(Self::Block),
            StylistAction::Unblock => Some(Self::Unblock),
            StylistAction::SendInvite
            | StylistAction::ViewInviteLink
            | StylistAction::ResendInvite => None,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Block => "block",
            Self::Unblock => "unblock",
        }
    }
}

/// A transition the admin has asked for but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    user_id: String,
    display_name: String,
    transition: Transition,
}

impl PendingTransition {
    /// Start a confirmation for `action` on `record`. `None` if the action
    /// isn't a transition or isn't currently permitted for the record.
    pub fn for_action(record: &StylistRecord, action: StylistAction) -> Option<Self> {
        let transition = Transition::from_action(action)?;
        if !record.actions().contains(&action) {
            return None;
        }
        Some(Self {
            user_id: record.user_id.clone(),
            display_name: record.display_name().to_string(),
            transition,
        })
    }

    /// Build directly from an id, for callers that don't hold the record.
    pub fn new(user_id: impl Into<String>, transition: Transition) -> Self {
        let user_id = user_id.into();
        Self {
            display_name: user_id.clone(),
            user_id,
            transition,
        }
    }

    /// Question shown to the admin.
    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to {} {}?",
            self.transition.verb(),
            self.display_name
        )
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The admin said yes.
    pub fn confirm(self) -> ConfirmedTransition {
        ConfirmedTransition {
            user_id: self.user_id,
            transition: self.transition,
        }
    }
}

/// A transition that passed confirmation and may be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTransition {
    user_id: String,
    transition: Transition,
}

impl ConfirmedTransition {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }
}
