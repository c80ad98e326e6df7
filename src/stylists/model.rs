//! Stylist data model: server records, pagination, list queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the stylist is an approved, working member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StylistStatus {
    Active,
    #[default]
    Inactive,
}

impl std::fmt::Display for StylistStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Inactive => write!(f, "INACTIVE"),
        }
    }
}

impl std::str::FromStr for StylistStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(format!("Unknown stylist status: {}", s)),
        }
    }
}

/// State of the most recent invitation issued to a stylist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Expired,
    Cancelled,
}

/// A stylist as the backend reports it. The client only ever holds a cached copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylistRecord {
    /// Stable account identifier.
    pub user_id: String,
    /// Stylist-profile identifier, used by the newer block endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylist_id: Option<String>,
    /// Unset until the candidate completes registration.
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub status: StylistStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_status: Option<InviteStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_expires_at: Option<DateTime<Utc>>,
    /// Only present right after an invite was created or resent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_link: Option<String>,
    #[serde(default)]
    pub is_blocked: bool,
}

impl StylistRecord {
    /// A fresh self-application: no invite fields, inactive, unblocked.
    pub fn applied(
        user_id: impl Into<String>,
        email: impl Into<String>,
        specialization: impl Into<String>,
        experience: u32,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            stylist_id: None,
            name: None,
            email: email.into(),
            phone: None,
            specialization: specialization.into(),
            experience,
            status: StylistStatus::Inactive,
            invite_status: None,
            invite_expires_at: None,
            invite_link: None,
            is_blocked: false,
        }
    }

    /// Set the invite status.
    pub fn with_invite_status(mut self, status: InviteStatus) -> Self {
        self.invite_status = Some(status);
        self
    }

    /// Set the lifecycle status.
    pub fn with_status(mut self, status: StylistStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the invite link.
    pub fn with_invite_link(mut self, link: impl Into<String>) -> Self {
        self.invite_link = Some(link.into());
        self
    }

    /// Set the blocked flag.
    pub fn with_blocked(mut self, blocked: bool) -> Self {
        self.is_blocked = blocked;
        self
    }

    /// Name if registered, otherwise the email.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }

    /// Identifier for the newer block endpoint.
    pub fn block_key(&self) -> &str {
        self.stylist_id.as_deref().unwrap_or(&self.user_id)
    }
}

/// Pagination block mirrored from the server. Totals are never recomputed locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// One page of stylists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylistPage {
    pub data: Vec<StylistRecord>,
    pub pagination: PaginationMetadata,
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Query for `GET /admin/stylists/paginated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylistQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search: String,
    pub sort_by: String,
    pub sort_order: SortOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_blocked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StylistStatus>,
}

impl Default for StylistQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: String::new(),
            sort_by: "createdAt".to_string(),
            sort_order: SortOrder::default(),
            is_blocked: None,
            is_active: None,
            status: None,
        }
    }
}

impl StylistQuery {
    /// Query for a given page and page size, everything else default.
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            ..Default::default()
        }
    }

    /// Same filters, different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Set the search term. Changing the search resets to the first page.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self.page = 1;
        self
    }
}

/// Returned when an invite is created or (re)sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteCreated {
    pub invite_link: String,
    /// Absent on `send-invite` responses, which are keyed by the caller's user id.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Read-only preview returned when validating an invite token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitePreview {
    pub email: String,
    pub specialization: String,
    pub experience: u32,
    pub expires_at: DateTime<Utc>,
}

impl InvitePreview {
    /// Whether the invite has passed its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
