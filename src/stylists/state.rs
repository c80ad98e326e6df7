//! Review-queue state and its pure reducer.
//!
//! Every change goes through `reduce(state, event) -> state`. Network calls
//! live in `queue.rs`; nothing here performs I/O.

use std::collections::HashMap;

use serde::Serialize;

use super::model::{
    InviteCreated, InviteStatus, PaginationMetadata, StylistPage, StylistQuery, StylistRecord,
    StylistStatus,
};

/// Records keyed by user id, remembering the order the server returned them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordSet {
    by_id: HashMap<String, StylistRecord>,
    order: Vec<String>,
}

impl RecordSet {
    /// Build from a server-ordered list. Later duplicates replace earlier ones.
    pub fn from_records(records: Vec<StylistRecord>) -> Self {
        let mut set = Self::default();
        for record in records {
            if !set.by_id.contains_key(&record.user_id) {
                set.order.push(record.user_id.clone());
            }
            set.by_id.insert(record.user_id.clone(), record);
        }
        set
    }

    pub fn get(&self, user_id: &str) -> Option<&StylistRecord> {
        self.by_id.get(user_id)
    }

    /// Records in server order.
    pub fn iter(&self) -> impl Iterator<Item = &StylistRecord> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Apply `f` to the record with `user_id`. Returns false if it isn't cached.
    pub fn patch<F>(&mut self, user_id: &str, f: F) -> bool
    where
        F: FnOnce(&mut StylistRecord),
    {
        match self.by_id.get_mut(user_id) {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        }
    }

    /// User id of the record with this email (case-insensitive).
    pub fn id_for_email(&self, email: &str) -> Option<String> {
        let email = email.trim();
        self.iter()
            .find(|r| r.email.eq_ignore_ascii_case(email))
            .map(|r| r.user_id.clone())
    }
}

/// Which thunk an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FetchPage,
    FetchDirectory,
    CreateInvite,
    SendInvite,
    Approve,
    Reject,
    ToggleBlock,
}

impl Operation {
    /// Message used when the server gives none.
    pub fn default_error(&self) -> &'static str {
        match self {
            Self::FetchPage | Self::FetchDirectory => "Failed to fetch stylists",
            Self::CreateInvite => "Failed to create invite",
            Self::SendInvite => "Failed to send invite",
            Self::Approve => "Failed to approve stylist",
            Self::Reject => "Failed to reject stylist",
            Self::ToggleBlock => "Failed to update block status",
        }
    }

    fn is_list(&self) -> bool {
        matches!(self, Self::FetchPage | Self::FetchDirectory)
    }
}

/// Everything that can happen to the queue state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StylistEvent {
    /// A paginated fetch was issued; moves `current_page` ahead of the response.
    PageRequested { request_id: u64, query: StylistQuery },
    /// A non-list thunk, or the unpaginated fetch, was issued.
    Pending {
        op: Operation,
        request_id: u64,
        target: Option<String>,
    },
    /// A thunk failed.
    Rejected {
        op: Operation,
        request_id: u64,
        target: Option<String>,
        message: String,
    },
    PageFulfilled { request_id: u64, page: StylistPage },
    DirectoryFulfilled {
        request_id: u64,
        records: Vec<StylistRecord>,
    },
    InviteFulfilled {
        request_id: u64,
        email: String,
        created: InviteCreated,
    },
    SendInviteFulfilled {
        request_id: u64,
        user_id: String,
        created: InviteCreated,
    },
    ApproveFulfilled { request_id: u64, user_id: String },
    RejectFulfilled { request_id: u64, user_id: String },
    BlockFulfilled {
        request_id: u64,
        user_id: String,
        is_blocked: bool,
    },
    /// Clear the error banner.
    ErrorDismissed,
}

impl StylistEvent {
    /// Request the event belongs to, if any.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            Self::PageRequested { request_id, .. }
            | Self::Pending { request_id, .. }
            | Self::Rejected { request_id, .. }
            | Self::PageFulfilled { request_id, .. }
            | Self::DirectoryFulfilled { request_id, .. }
            | Self::InviteFulfilled { request_id, .. }
            | Self::SendInviteFulfilled { request_id, .. }
            | Self::ApproveFulfilled { request_id, .. }
            | Self::RejectFulfilled { request_id, .. }
            | Self::BlockFulfilled { request_id, .. } => Some(*request_id),
            Self::ErrorDismissed => None,
        }
    }
}

/// State behind the admin review screens.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StylistState {
    /// Current server-side page.
    pub page: RecordSet,
    pub pagination: Option<PaginationMetadata>,
    /// Query of the latest paginated fetch.
    pub query: Option<StylistQuery>,
    /// Unpaginated list used by the legacy directory view.
    pub directory: RecordSet,
    /// A paginated fetch is in flight.
    pub page_loading: bool,
    /// A directory fetch is in flight.
    pub directory_loading: bool,
    /// An invite is being created.
    pub submitting: bool,
    /// In-flight action count per user id.
    busy: HashMap<String, u32>,
    pub error: Option<String>,
    /// Result of the last successful create / send invite.
    pub last_invite: Option<InviteCreated>,
    latest_page_request: u64,
    latest_directory_request: u64,
}

impl StylistState {
    /// Whether `request_id` is still the newest request for its list.
    pub fn is_current(&self, op: Operation, request_id: u64) -> bool {
        match op {
            Operation::FetchPage => self.latest_page_request == request_id,
            Operation::FetchDirectory => self.latest_directory_request == request_id,
            _ => true,
        }
    }

    /// Whether `event` answers a list request that has since been superseded.
    pub fn is_stale(&self, event: &StylistEvent) -> bool {
        match event {
            StylistEvent::PageFulfilled { request_id, .. } => {
                !self.is_current(Operation::FetchPage, *request_id)
            }
            StylistEvent::DirectoryFulfilled { request_id, .. } => {
                !self.is_current(Operation::FetchDirectory, *request_id)
            }
            StylistEvent::Rejected { op, request_id, .. } if op.is_list() => {
                !self.is_current(*op, *request_id)
            }
            _ => false,
        }
    }

    /// Either list is loading.
    pub fn is_loading(&self) -> bool {
        self.page_loading || self.directory_loading
    }

    /// Whether any action for `user_id` is in flight.
    pub fn is_busy(&self, user_id: &str) -> bool {
        self.busy.contains_key(user_id)
    }

    /// No action is in flight for anyone.
    pub fn is_idle(&self) -> bool {
        self.busy.is_empty()
    }

    fn mark_busy(&mut self, user_id: String) {
        *self.busy.entry(user_id).or_insert(0) += 1;
    }

    fn clear_busy(&mut self, user_id: &str) {
        if let Some(count) = self.busy.get_mut(user_id) {
            *count -= 1;
            if *count == 0 {
                self.busy.remove(user_id);
            }
        }
    }

    /// Look up a cached record in either list.
    pub fn record(&self, user_id: &str) -> Option<&StylistRecord> {
        self.page.get(user_id).or_else(|| self.directory.get(user_id))
    }

    /// Apply `f` to the record wherever it is cached.
    fn patch_everywhere<F>(&mut self, user_id: &str, f: F) -> bool
    where
        F: Fn(&mut StylistRecord),
    {
        let in_page = self.page.patch(user_id, &f);
        let in_directory = self.directory.patch(user_id, &f);
        in_page || in_directory
    }
}

fn mark_invited(record: &mut StylistRecord, created: &InviteCreated) {
    record.invite_link = Some(created.invite_link.clone());
    record.invite_status = Some(InviteStatus::Pending);
    if created.expires_at.is_some() {
        record.invite_expires_at = created.expires_at;
    }
}

/// Pure reducer.
pub fn reduce(mut state: StylistState, event: StylistEvent) -> StylistState {
    if state.is_stale(&event) {
        return state;
    }
    match event {
        StylistEvent::PageRequested { request_id, query } => {
            state.latest_page_request = request_id;
            state.page_loading = true;
            state.error = None;
            if let Some(pagination) = state.pagination.as_mut() {
                pagination.current_page = query.page;
            }
            state.query = Some(query);
        }
        StylistEvent::Pending {
            op,
            request_id,
            target,
        } => {
            state.error = None;
            match op {
                Operation::FetchDirectory => {
                    state.latest_directory_request = request_id;
                    state.directory_loading = true;
                }
                Operation::FetchPage => {
                    state.latest_page_request = request_id;
                    state.page_loading = true;
                }
                Operation::CreateInvite => state.submitting = true,
                _ => {}
            }
            if let Some(user_id) = target {
                state.mark_busy(user_id);
            }
        }
        StylistEvent::Rejected {
            op, target, message, ..
        } => {
            match op {
                Operation::FetchPage => state.page_loading = false,
                Operation::FetchDirectory => state.directory_loading = false,
                Operation::CreateInvite => state.submitting = false,
                _ => {}
            }
            if let Some(user_id) = target {
                state.clear_busy(&user_id);
            }
            state.error = Some(message);
        }
        StylistEvent::PageFulfilled { page, .. } => {
            state.page_loading = false;
            state.page = RecordSet::from_records(page.data);
            state.pagination = Some(page.pagination);
        }
        StylistEvent::DirectoryFulfilled { records, .. } => {
            state.directory_loading = false;
            state.directory = RecordSet::from_records(records);
        }
        StylistEvent::InviteFulfilled { email, created, .. } => {
            state.submitting = false;
            let user_id = created
                .user_id
                .clone()
                .filter(|id| state.record(id).is_some())
                .or_else(|| state.page.id_for_email(&email))
                .or_else(|| state.directory.id_for_email(&email));
            if let Some(user_id) = user_id {
                state.patch_everywhere(&user_id, |r| mark_invited(r, &created));
            }
            state.last_invite = Some(created);
        }
        StylistEvent::SendInviteFulfilled {
            user_id, created, ..
        } => {
            state.clear_busy(&user_id);
            state.patch_everywhere(&user_id, |r| mark_invited(r, &created));
            state.last_invite = Some(created);
        }
        StylistEvent::ApproveFulfilled { user_id, .. } => {
            state.clear_busy(&user_id);
            state.patch_everywhere(&user_id, |r| {
                r.status = StylistStatus::Active;
                r.is_blocked = false;
            });
        }
        StylistEvent::RejectFulfilled { user_id, .. } => {
            state.clear_busy(&user_id);
            state.patch_everywhere(&user_id, |r| {
                r.status = StylistStatus::Inactive;
                r.is_blocked = true;
            });
        }
        StylistEvent::BlockFulfilled {
            user_id,
            is_blocked,
            ..
        } => {
            state.clear_busy(&user_id);
            state.patch_everywhere(&user_id, |r| r.is_blocked = is_blocked);
        }
        StylistEvent::ErrorDismissed => state.error = None,
    }
    state
}
