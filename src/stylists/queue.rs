//! Admin review queue: owns the stylist state, runs the network thunks and
//! broadcasts every applied event to subscribers.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use super::confirm::{ConfirmedTransition, Transition};
use super::flow::{FlowStage, StylistAction};
use super::local_page::LocalPager;
use super::model::{InviteCreated, PaginationMetadata, StylistPage, StylistQuery, StylistRecord};
use super::state::{Operation, StylistEvent, StylistState, reduce};
use crate::api::{InviteRequest, StylistApi};
use crate::config::{BlockEndpoint, ClientConfig};
use crate::error::{ApiError, error_message};

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 256;

/// How a thunk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Fulfilled,
    Rejected,
}

/// Result of a thunk. Thunks never error out; callers branch on
/// `request_status()`.
#[derive(Debug, Clone, PartialEq)]
pub enum ThunkOutcome<T> {
    Fulfilled(T),
    Rejected(String),
}

impl<T> ThunkOutcome<T> {
    pub fn request_status(&self) -> RequestStatus {
        match self {
            Self::Fulfilled(_) => RequestStatus::Fulfilled,
            Self::Rejected(_) => RequestStatus::Rejected,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Fulfilled(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Fulfilled(_) => None,
            Self::Rejected(message) => Some(message),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Fulfilled(value) => Ok(value),
            Self::Rejected(message) => Err(message),
        }
    }
}

/// One rendered row of the review table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueRow {
    pub record: StylistRecord,
    pub stage: FlowStage,
    pub actions: Vec<StylistAction>,
    /// An action for this stylist is in flight.
    pub busy: bool,
}

impl QueueRow {
    fn new(record: &StylistRecord, busy: bool) -> Self {
        let stage = record.flow_stage();
        Self {
            actions: super::flow::actions_for(stage, record),
            record: record.clone(),
            stage,
            busy,
        }
    }
}

/// A page of the legacy directory view.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryPage {
    pub rows: Vec<QueueRow>,
    pub pagination: PaginationMetadata,
}

/// Stylist review queue.
pub struct ReviewQueue {
    api: Arc<dyn StylistApi>,
    block_endpoint: BlockEndpoint,
    page_size: u32,
    state: RwLock<StylistState>,
    next_request: AtomicU64,
    tx: broadcast::Sender<StylistEvent>,
}

impl ReviewQueue {
    /// Create a queue over `api` using page size and block endpoint from `config`.
    pub fn new(api: Arc<dyn StylistApi>, config: &ClientConfig) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            api,
            block_endpoint: config.block_endpoint,
            page_size: config.page_size.max(1),
            state: RwLock::new(StylistState::default()),
            next_request: AtomicU64::new(1),
            tx,
        })
    }

    /// Subscribe to applied events. Each view calls this.
    pub fn subscribe(&self) -> broadcast::Receiver<StylistEvent> {
        self.tx.subscribe()
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> StylistState {
        self.state.read().await.clone()
    }

    /// Current page with each record's stage and permitted actions.
    pub async fn rows(&self) -> Vec<QueueRow> {
        let state = self.state.read().await;
        state
            .page
            .iter()
            .map(|r| QueueRow::new(r, state.is_busy(&r.user_id)))
            .collect()
    }

    /// Look up a cached record.
    pub async fn record(&self, user_id: &str) -> Option<StylistRecord> {
        self.state.read().await.record(user_id).cloned()
    }

    /// Search and slice the unpaginated list locally.
    pub async fn directory_page(&self, pager: &LocalPager) -> DirectoryPage {
        let state = self.state.read().await;
        let page = pager.apply(state.directory.iter());
        DirectoryPage {
            rows: page
                .records
                .into_iter()
                .map(|r| QueueRow::new(r, state.is_busy(&r.user_id)))
                .collect(),
            pagination: page.pagination,
        }
    }

    /// Reduce `event` into the state and broadcast it.
    async fn dispatch(&self, event: StylistEvent) {
        {
            let mut state = self.state.write().await;
            if state.is_stale(&event) {
                debug!(request_id = ?event.request_id(), "Discarding stale list response");
            }
            let current = std::mem::take(&mut *state);
            *state = reduce(current, event.clone());
        }
        // Ok if nobody is listening.
        let _ = self.tx.send(event);
    }

    fn next_request_id(&self) -> u64 {
        self.next_request.fetch_add(1, Ordering::Relaxed)
    }

    /// Pending → call → fulfilled / rejected.
    async fn run<T, Fut, F>(
        &self,
        op: Operation,
        target: Option<&str>,
        call: Fut,
        fulfilled: F,
    ) -> ThunkOutcome<T>
    where
        Fut: Future<Output = Result<T, ApiError>>,
        F: FnOnce(u64, &T) -> StylistEvent,
    {
        let request_id = self.next_request_id();
        self.dispatch(StylistEvent::Pending {
            op,
            request_id,
            target: target.map(str::to_string),
        })
        .await;

        match call.await {
            Ok(value) => {
                self.dispatch(fulfilled(request_id, &value)).await;
                ThunkOutcome::Fulfilled(value)
            }
            Err(e) => {
                let message = error_message(&e, op.default_error());
                warn!(?op, target = ?target, error = %e, "Stylist request rejected");
                self.dispatch(StylistEvent::Rejected {
                    op,
                    request_id,
                    target: target.map(str::to_string),
                    message: message.clone(),
                })
                .await;
                ThunkOutcome::Rejected(message)
            }
        }
    }

    // ── Lists ───────────────────────────────────────────────────────────

    /// Fetch one page from the server. A response that arrives after a newer
    /// page request is returned to the caller but not applied to the state.
    pub async fn fetch_paginated_stylists(&self, query: StylistQuery) -> ThunkOutcome<StylistPage> {
        let request_id = self.next_request_id();
        self.dispatch(StylistEvent::PageRequested {
            request_id,
            query: query.clone(),
        })
        .await;

        match self.api.fetch_paginated_stylists(&query).await {
            Ok(page) => {
                debug!(
                    request_id,
                    page = page.pagination.current_page,
                    count = page.data.len(),
                    "Stylist page loaded"
                );
                self.dispatch(StylistEvent::PageFulfilled {
                    request_id,
                    page: page.clone(),
                })
                .await;
                ThunkOutcome::Fulfilled(page)
            }
            Err(e) => {
                let message = error_message(&e, Operation::FetchPage.default_error());
                warn!(request_id, error = %e, "Stylist page fetch rejected");
                self.dispatch(StylistEvent::Rejected {
                    op: Operation::FetchPage,
                    request_id,
                    target: None,
                    message: message.clone(),
                })
                .await;
                ThunkOutcome::Rejected(message)
            }
        }
    }

    /// Query that the next page navigation will build on.
    async fn base_query(&self) -> StylistQuery {
        self.state
            .read()
            .await
            .query
            .clone()
            .unwrap_or_else(|| StylistQuery::page(1, self.page_size))
    }

    /// Re-issue the last query (or the first page if none yet).
    pub async fn refresh(&self) -> ThunkOutcome<StylistPage> {
        let query = self.base_query().await;
        self.fetch_paginated_stylists(query).await
    }

    /// Same filters, page `page`.
    pub async fn go_to_page(&self, page: u32) -> ThunkOutcome<StylistPage> {
        let query = self.base_query().await.with_page(page);
        self.fetch_paginated_stylists(query).await
    }

    /// Next page, or `None` if the server said there is none.
    pub async fn next_page(&self) -> Option<ThunkOutcome<StylistPage>> {
        let pagination = self.state.read().await.pagination.clone()?;
        if !pagination.has_next_page {
            return None;
        }
        Some(self.go_to_page(pagination.current_page + 1).await)
    }

    /// Previous page, or `None` on the first page.
    pub async fn previous_page(&self) -> Option<ThunkOutcome<StylistPage>> {
        let pagination = self.state.read().await.pagination.clone()?;
        if !pagination.has_previous_page {
            return None;
        }
        Some(self.go_to_page(pagination.current_page.saturating_sub(1)).await)
    }

    /// Fetch every stylist for the legacy directory view.
    pub async fn fetch_stylists(&self) -> ThunkOutcome<Vec<StylistRecord>> {
        let request_id = self.next_request_id();
        self.dispatch(StylistEvent::Pending {
            op: Operation::FetchDirectory,
            request_id,
            target: None,
        })
        .await;

        match self.api.fetch_stylists().await {
            Ok(records) => {
                debug!(request_id, count = records.len(), "Stylist directory loaded");
                self.dispatch(StylistEvent::DirectoryFulfilled {
                    request_id,
                    records: records.clone(),
                })
                .await;
                ThunkOutcome::Fulfilled(records)
            }
            Err(e) => {
                let message = error_message(&e, Operation::FetchDirectory.default_error());
                warn!(request_id, error = %e, "Stylist directory fetch rejected");
                self.dispatch(StylistEvent::Rejected {
                    op: Operation::FetchDirectory,
                    request_id,
                    target: None,
                    message: message.clone(),
                })
                .await;
                ThunkOutcome::Rejected(message)
            }
        }
    }

    // ── Invites ─────────────────────────────────────────────────────────

    /// Issue an invite by email. A cached record for the same person is
    /// patched to PENDING in place; no re-fetch.
    pub async fn create_invite(&self, request: InviteRequest) -> ThunkOutcome<InviteCreated> {
        let email = request.email.clone();
        let outcome = self
            .run(
                Operation::CreateInvite,
                None,
                self.api.create_invite(&request),
                |request_id, created| StylistEvent::InviteFulfilled {
                    request_id,
                    email: email.clone(),
                    created: created.clone(),
                },
            )
            .await;
        if outcome.is_fulfilled() {
            info!(email = %request.email, "Stylist invite created");
        }
        outcome
    }

    /// Issue (or re-issue) an invite for an existing record. The record moves
    /// stage, so the current page is re-fetched afterwards.
    pub async fn send_invite_to_applied(&self, user_id: &str) -> ThunkOutcome<InviteCreated> {
        let outcome = self
            .run(
                Operation::SendInvite,
                Some(user_id),
                self.api.send_invite(user_id),
                |request_id, created| StylistEvent::SendInviteFulfilled {
                    request_id,
                    user_id: user_id.to_string(),
                    created: created.clone(),
                },
            )
            .await;
        if outcome.is_fulfilled() {
            info!(user_id = %user_id, "Stylist invite sent");
            if self.state.read().await.query.is_some() {
                self.refresh().await;
            }
        }
        outcome
    }

    // ── Transitions ─────────────────────────────────────────────────────

    /// Dispatch a confirmed transition.
    pub async fn execute(&self, confirmed: ConfirmedTransition) -> ThunkOutcome<()> {
        let user_id = confirmed.user_id();
        match confirmed.transition() {
            Transition::Approve => self.approve_stylist(user_id).await,
            Transition::Reject => self.reject_stylist(user_id).await,
            Transition::Block => self.toggle_block_stylist(user_id, true).await,
            Transition::Unblock => self.toggle_block_stylist(user_id, false).await,
        }
    }

    pub async fn approve_stylist(&self, user_id: &str) -> ThunkOutcome<()> {
        let outcome = self
            .run(
                Operation::Approve,
                Some(user_id),
                self.api.approve_stylist(user_id),
                |request_id, _| StylistEvent::ApproveFulfilled {
                    request_id,
                    user_id: user_id.to_string(),
                },
            )
            .await;
        if outcome.is_fulfilled() {
            info!(user_id = %user_id, "Stylist approved");
        }
        outcome
    }

    pub async fn reject_stylist(&self, user_id: &str) -> ThunkOutcome<()> {
        let outcome = self
            .run(
                Operation::Reject,
                Some(user_id),
                self.api.reject_stylist(user_id),
                |request_id, _| StylistEvent::RejectFulfilled {
                    request_id,
                    user_id: user_id.to_string(),
                },
            )
            .await;
        if outcome.is_fulfilled() {
            info!(user_id = %user_id, "Stylist rejected");
        }
        outcome
    }

    /// Block (`true`) or unblock (`false`) a stylist.
    pub async fn toggle_block_stylist(&self, user_id: &str, block: bool) -> ThunkOutcome<()> {
        let fulfilled = |request_id, _: &()| StylistEvent::BlockFulfilled {
            request_id,
            user_id: user_id.to_string(),
            is_blocked: block,
        };

        let outcome = match self.block_endpoint {
            BlockEndpoint::Legacy => {
                self.run(
                    Operation::ToggleBlock,
                    Some(user_id),
                    self.api.block_stylist_legacy(user_id, block),
                    fulfilled,
                )
                .await
            }
            BlockEndpoint::Patch => {
                let key = self
                    .state
                    .read()
                    .await
                    .record(user_id)
                    .map(|r| r.block_key().to_string())
                    .unwrap_or_else(|| user_id.to_string());
                self.run(
                    Operation::ToggleBlock,
                    Some(user_id),
                    self.api.set_stylist_blocked(&key, block),
                    fulfilled,
                )
                .await
            }
        };
        if outcome.is_fulfilled() {
            info!(user_id = %user_id, blocked = block, "Stylist block status changed");
        }
        outcome
    }

    /// Clear the error banner.
    pub async fn dismiss_error(&self) {
        self.dispatch(StylistEvent::ErrorDismissed).await;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::api::AcceptInviteRequest;
    use crate::stylists::confirm::PendingTransition;
    use crate::stylists::model::{InvitePreview, InviteStatus, StylistStatus};

    /// In-memory backend.
    #[derive(Default)]
    struct StubApi {
        records: Mutex<Vec<StylistRecord>>,
        calls: Mutex<Vec<String>>,
        fail_with: Mutex<Option<String>>,
        page_delays: HashMap<u32, Duration>,
    }

    impl StubApi {
        fn with_records(records: Vec<StylistRecord>) -> Self {
            Self {
                records: Mutex::new(records),
                ..Default::default()
            }
        }

        fn record_call(&self, call: String) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(call);
            match self.fail_with.lock().unwrap().clone() {
                Some(message) => Err(ApiError::Status {
                    endpoint: "stub".into(),
                    status: StatusCode::BAD_REQUEST,
                    message: Some(message),
                }),
                None => Ok(()),
            }
        }

        fn update<F: FnOnce(&mut StylistRecord)>(&self, user_id: &str, f: F) {
            if let Some(r) = self
                .records
                .lock()
                .unwrap()
                .iter_mut()
                .find(|r| r.user_id == user_id)
            {
                f(r);
            }
        }
    }

    #[async_trait]
    impl StylistApi for StubApi {
        async fn create_invite(&self, request: &InviteRequest) -> Result<InviteCreated, ApiError> {
            self.record_call(format!("create_invite {}", request.email))?;
            let user_id = self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.email == request.email)
                .map(|r| r.user_id.clone())
                .unwrap_or_else(|| "new-user".to_string());
            Ok(InviteCreated {
                invite_link: format!("https://salon.test/invite/{user_id}"),
                user_id: Some(user_id),
                expires_at: None,
            })
        }

        async fn send_invite(&self, user_id: &str) -> Result<InviteCreated, ApiError> {
            self.record_call(format!("send_invite {user_id}"))?;
            let link = format!("https://salon.test/invite/{user_id}");
            self.update(user_id, |r| {
                r.invite_status = Some(InviteStatus::Pending);
                r.invite_link = Some(link.clone());
            });
            Ok(InviteCreated {
                invite_link: link,
                user_id: None,
                expires_at: None,
            })
        }

        async fn fetch_paginated_stylists(&self, query: &StylistQuery) -> Result<StylistPage, ApiError> {
            if let Some(delay) = self.page_delays.get(&query.page) {
                tokio::time::sleep(*delay).await;
            }
            self.record_call(format!("page {}", query.page))?;
            let records = self.records.lock().unwrap().clone();
            let total = records.len() as u32;
            let total_pages = total.div_ceil(query.limit);
            let data = records
                .into_iter()
                .skip(((query.page - 1) * query.limit) as usize)
                .take(query.limit as usize)
                .collect();
            Ok(StylistPage {
                data,
                pagination: PaginationMetadata {
                    current_page: query.page,
                    total_pages,
                    total_items: u64::from(total),
                    items_per_page: query.limit,
                    has_next_page: query.page < total_pages,
                    has_previous_page: query.page > 1,
                },
            })
        }

        async fn fetch_stylists(&self) -> Result<Vec<StylistRecord>, ApiError> {
            self.record_call("all".into())?;
            Ok(self.records.lock().unwrap().clone())
        }

        async fn validate_invite(&self, _token: &str) -> Result<InvitePreview, ApiError> {
            unimplemented!("not used in queue tests")
        }

        async fn accept_invite(&self, _token: &str, _request: &AcceptInviteRequest) -> Result<(), ApiError> {
            unimplemented!("not used in queue tests")
        }

        async fn approve_stylist(&self, user_id: &str) -> Result<(), ApiError> {
            self.record_call(format!("approve {user_id}"))
        }

        async fn reject_stylist(&self, user_id: &str) -> Result<(), ApiError> {
            self.record_call(format!("reject {user_id}"))
        }

        async fn block_stylist_legacy(&self, user_id: &str, block: bool) -> Result<(), ApiError> {
            self.record_call(format!("legacy_block {user_id} {block}"))
        }

        async fn set_stylist_blocked(&self, stylist_id: &str, is_blocked: bool) -> Result<(), ApiError> {
            self.record_call(format!("patch_block {stylist_id} {is_blocked}"))
        }

        async fn apply_as_stylist(&self, _request: &InviteRequest) -> Result<(), ApiError> {
            unimplemented!("not used in queue tests")
        }
    }

    fn roster() -> Vec<StylistRecord> {
        (1..=8)
            .map(|i| StylistRecord::applied(format!("u{i}"), format!("s{i}@salon.test"), "Cut", i))
            .collect()
    }

    fn queue(api: Arc<StubApi>) -> Arc<ReviewQueue> {
        ReviewQueue::new(api, &ClientConfig::new("http://stub"))
    }

    #[tokio::test]
    async fn fetch_populates_rows_with_stages() {
        let api = Arc::new(StubApi::with_records(vec![
            StylistRecord::applied("u1", "a@b.com", "Color", 3),
            StylistRecord::applied("u2", "c@d.com", "Cut", 1)
                .with_invite_status(InviteStatus::Accepted),
        ]));
        let queue = queue(api);

        let outcome = queue.fetch_paginated_stylists(StylistQuery::page(1, 5)).await;
        assert_eq!(outcome.request_status(), RequestStatus::Fulfilled);

        let rows = queue.rows().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].stage, FlowStage::Applied);
        assert_eq!(rows[0].actions, vec![StylistAction::SendInvite]);
        assert_eq!(rows[1].stage, FlowStage::Accepted);
    }

    #[tokio::test]
    async fn sequential_fetches_last_writer_wins() {
        let queue = queue(Arc::new(StubApi::with_records(roster())));
        queue.fetch_paginated_stylists(StylistQuery::page(2, 5)).await;
        queue.fetch_paginated_stylists(StylistQuery::page(1, 5)).await;

        let state = queue.snapshot().await;
        assert_eq!(state.pagination.unwrap().current_page, 1);
        assert!(state.page.get("u1").is_some());
    }

    #[tokio::test]
    async fn slow_older_page_is_fenced_out() {
        let mut api = StubApi::with_records(roster());
        api.page_delays.insert(2, Duration::from_millis(50));
        let queue = queue(Arc::new(api));

        let slow = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.fetch_paginated_stylists(StylistQuery::page(2, 5)).await })
        };
        // Let the page-2 request get issued first.
        tokio::time::sleep(Duration::from_millis(5)).await;
        queue.fetch_paginated_stylists(StylistQuery::page(1, 5)).await;

        let stale = slow.await.unwrap();
        assert!(stale.is_fulfilled());

        let state = queue.snapshot().await;
        assert_eq!(state.pagination.unwrap().current_page, 1);
        assert!(state.page.get("u6").is_none());
        assert!(!state.page_loading);
    }

    #[tokio::test]
    async fn directory_fetch_does_not_end_page_loading() {
        let mut api = StubApi::with_records(roster());
        api.page_delays.insert(1, Duration::from_millis(200));
        let queue = queue(Arc::new(api));

        let page = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.fetch_paginated_stylists(StylistQuery::page(1, 5)).await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(queue.fetch_stylists().await.is_fulfilled());

        let state = queue.snapshot().await;
        assert!(state.page_loading);
        assert!(!state.directory_loading);

        assert!(page.await.unwrap().is_fulfilled());
        assert!(!queue.snapshot().await.is_loading());
    }

    #[tokio::test]
    async fn create_invite_patches_cached_record_without_refetch() {
        let api = Arc::new(StubApi::with_records(vec![StylistRecord::applied(
            "u1", "a@b.com", "Color", 3,
        )]));
        let queue = queue(Arc::clone(&api));
        queue.fetch_paginated_stylists(StylistQuery::page(1, 5)).await;

        let outcome = queue
            .create_invite(InviteRequest {
                email: "a@b.com".into(),
                specialization: "Color".into(),
                experience: 3,
            })
            .await;
        assert!(outcome.is_fulfilled());

        let record = queue.record("u1").await.unwrap();
        assert_eq!(record.invite_status, Some(InviteStatus::Pending));
        assert_eq!(record.invite_link.as_deref(), Some("https://salon.test/invite/u1"));
        let calls = api.calls.lock().unwrap().clone();
        assert_eq!(calls, ["page 1", "create_invite a@b.com"]);
    }

    #[tokio::test]
    async fn send_invite_refetches_current_page() {
        let api = Arc::new(StubApi::with_records(roster()));
        let queue = queue(Arc::clone(&api));
        queue.fetch_paginated_stylists(StylistQuery::page(1, 5)).await;

        let outcome = queue.send_invite_to_applied("u2").await;
        assert!(outcome.is_fulfilled());
        assert_eq!(queue.record("u2").await.unwrap().flow_stage(), FlowStage::Pending);

        let calls = api.calls.lock().unwrap().clone();
        assert_eq!(calls, ["page 1", "send_invite u2", "page 1"]);
    }

    #[tokio::test]
    async fn confirmed_block_flips_label() {
        let active = StylistRecord::applied("u1", "a@b.com", "Color", 3).with_status(StylistStatus::Active);
        let api = Arc::new(StubApi::with_records(vec![active]));
        let queue = queue(Arc::clone(&api));
        queue.fetch_paginated_stylists(StylistQuery::page(1, 5)).await;

        let record = queue.record("u1").await.unwrap();
        assert_eq!(record.actions()[0].label(), "Block");

        let confirmed = PendingTransition::for_action(&record, StylistAction::Block)
            .unwrap()
            .confirm();
        let outcome = queue.execute(confirmed).await;
        assert!(outcome.is_fulfilled());

        let rows = queue.rows().await;
        assert!(rows[0].record.is_blocked);
        assert_eq!(rows[0].actions[0].label(), "Unblock");
        assert_eq!(api.calls.lock().unwrap().last().unwrap(), "patch_block u1 true");
    }

    #[tokio::test]
    async fn legacy_block_endpoint_is_configurable() {
        let api = Arc::new(StubApi::with_records(vec![]));
        let mut config = ClientConfig::new("http://stub");
        config.block_endpoint = BlockEndpoint::Legacy;
        let queue = ReviewQueue::new(Arc::clone(&api) as Arc<dyn StylistApi>, &config);

        queue.toggle_block_stylist("u7", false).await;
        assert_eq!(api.calls.lock().unwrap().last().unwrap(), "legacy_block u7 false");
    }

    #[tokio::test]
    async fn patch_block_uses_stylist_id_when_known() {
        let mut active = StylistRecord::applied("u1", "a@b.com", "Color", 3).with_status(StylistStatus::Active);
        active.stylist_id = Some("s-41".into());
        let api = Arc::new(StubApi::with_records(vec![active]));
        let queue = queue(Arc::clone(&api));
        queue.fetch_paginated_stylists(StylistQuery::page(1, 5)).await;

        queue.toggle_block_stylist("u1", true).await;
        assert_eq!(api.calls.lock().unwrap().last().unwrap(), "patch_block s-41 true");
    }

    #[tokio::test]
    async fn approve_and_reject_patch_in_place() {
        let api = Arc::new(StubApi::with_records(vec![
            StylistRecord::applied("u1", "a@b.com", "Color", 3).with_invite_status(InviteStatus::Accepted),
            StylistRecord::applied("u2", "c@d.com", "Cut", 2).with_invite_status(InviteStatus::Accepted),
        ]));
        let queue = queue(api);
        queue.fetch_paginated_stylists(StylistQuery::page(1, 5)).await;

        assert!(queue.approve_stylist("u1").await.is_fulfilled());
        assert!(queue.reject_stylist("u2").await.is_fulfilled());

        let approved = queue.record("u1").await.unwrap();
        assert_eq!(approved.flow_stage(), FlowStage::Active);
        let rejected = queue.record("u2").await.unwrap();
        assert_eq!(rejected.status, StylistStatus::Inactive);
        assert!(rejected.is_blocked);
    }

    #[tokio::test]
    async fn failures_resolve_to_rejected_with_server_message() {
        let api = Arc::new(StubApi::with_records(roster()));
        *api.fail_with.lock().unwrap() = Some("Stylist not found".into());
        let queue = queue(api);

        let outcome = queue.approve_stylist("missing").await;
        assert_eq!(outcome.request_status(), RequestStatus::Rejected);
        assert_eq!(outcome.error(), Some("Stylist not found"));

        let state = queue.snapshot().await;
        assert_eq!(state.error.as_deref(), Some("Stylist not found"));
        assert!(state.is_idle());

        queue.dismiss_error().await;
        assert!(queue.snapshot().await.error.is_none());
    }

    #[tokio::test]
    async fn page_navigation_follows_server_flags() {
        let queue = queue(Arc::new(StubApi::with_records(roster())));
        assert!(queue.next_page().await.is_none());

        queue.fetch_paginated_stylists(StylistQuery::page(1, 5)).await;
        assert!(queue.previous_page().await.is_none());

        let next = queue.next_page().await.unwrap();
        assert_eq!(next.payload().unwrap().pagination.current_page, 2);
        assert!(queue.next_page().await.is_none());

        let prev = queue.previous_page().await.unwrap();
        assert_eq!(prev.payload().unwrap().data.len(), 5);
    }

    #[tokio::test]
    async fn directory_pages_locally() {
        let queue = queue(Arc::new(StubApi::with_records(roster())));
        let all = queue.fetch_stylists().await;
        assert_eq!(all.payload().unwrap().len(), 8);

        let mut pager = LocalPager::new(3);
        pager.page = 3;
        let page = queue.directory_page(&pager).await;
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.pagination.total_pages, 3);
        // The server-side page is untouched.
        assert!(queue.snapshot().await.page.is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_events() {
        let queue = queue(Arc::new(StubApi::with_records(roster())));
        let mut rx = queue.subscribe();
        queue.approve_stylist("u1").await;

        assert!(matches!(
            rx.recv().await.unwrap(),
            StylistEvent::Pending { op: Operation::Approve, .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            StylistEvent::ApproveFulfilled { .. }
        ));
    }
}
