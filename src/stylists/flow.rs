//! Lifecycle projection: maps raw record fields to a flow stage and the
//! actions an admin may take from it.
//!
//! Both functions are total and side-effect free.

use serde::{Deserialize, Serialize};

use super::model::{InviteStatus, StylistRecord, StylistStatus};

/// Client-derived onboarding stage. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowStage {
    /// Self-applied, no invite issued yet.
    Applied,
    /// Invite issued and awaiting the candidate.
    Pending,
    /// Invite expired or was cancelled.
    Expired,
    /// Candidate registered; awaiting admin review.
    Accepted,
    /// Approved, working stylist.
    Active,
}

impl FlowStage {
    /// Badge text for the stage.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Pending => "Invite Pending",
            Self::Expired => "Invite Expired",
            Self::Accepted => "Awaiting Approval",
            Self::Active => "Active",
        }
    }
}

impl std::fmt::Display for FlowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Applied => "APPLIED",
            Self::Pending => "PENDING",
            Self::Expired => "EXPIRED",
            Self::Accepted => "ACCEPTED",
            Self::Active => "ACTIVE",
        };
        write!(f, "{s}")
    }
}

/// A button an admin can press for a stylist row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylistAction {
    SendInvite,
    ViewInviteLink,
    ResendInvite,
    Approve,
    Reject,
    Block,
    Unblock,
}

impl StylistAction {
    /// Button text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SendInvite => "Send Invite",
            Self::ViewInviteLink => "View Invite Link",
            Self::ResendInvite => "Resend Invite",
            Self::Approve => "Approve",
            Self::Reject => "Reject",
            Self::Block => "Block",
            Self::Unblock => "Unblock",
        }
    }

    /// Whether pressing the button must go through a confirmation step.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Self::Approve | Self::Reject | Self::Block | Self::Unblock)
    }
}

/// Project a record onto its flow stage. First matching rule wins.
pub fn flow_stage(record: &StylistRecord) -> FlowStage {
    if record.status == StylistStatus::Active {
        return FlowStage::Active;
    }
    match record.invite_status {
        Some(InviteStatus::Accepted) => FlowStage::Accepted,
        Some(InviteStatus::Pending) => FlowStage::Pending,
        Some(InviteStatus::Expired | InviteStatus::Cancelled) => FlowStage::Expired,
        None => FlowStage::Applied,
    }
}

/// Actions permitted from `stage` for `record`.
pub fn actions_for(stage: FlowStage, record: &StylistRecord) -> Vec<StylistAction> {
    match stage {
        FlowStage::Applied => vec![StylistAction::SendInvite],
        FlowStage::Pending => {
            if record.invite_link.is_some() {
                vec![StylistAction::ViewInviteLink]
            } else {
                vec![StylistAction::ResendInvite]
            }
        }
        FlowStage::Accepted => vec![StylistAction::Approve, StylistAction::Reject],
        FlowStage::Active => {
            if record.is_blocked {
                vec![StylistAction::Unblock]
            } else {
                vec![StylistAction::Block]
            }
        }
        FlowStage::Expired => Vec::new(),
    }
}

impl StylistRecord {
    /// Flow stage of this record.
    pub fn flow_stage(&self) -> FlowStage {
        flow_stage(self)
    }

    /// Actions permitted for this record in its current stage.
    pub fn actions(&self) -> Vec<StylistAction> {
        actions_for(self.flow_stage(), self)
    }
}
