//! REST API seam.
//!
//! `StylistApi` is the boundary between the review queue / invite flows and
//! the backend. `HttpStylistApi` talks to the real server; tests plug in
//! stubs.

mod envelope;
mod http;

pub use envelope::{ApiEnvelope, ErrorBody, PaginatedEnvelope};
pub use http::HttpStylistApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::stylists::model::{InviteCreated, InvitePreview, StylistPage, StylistQuery, StylistRecord};

/// Body for `POST /admin/stylists/invite` and `POST /apply-stylist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub email: String,
    pub specialization: String,
    pub experience: u32,
}

/// Body for `POST /stylists/invite/{token}/accept`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInviteRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

/// Every backend call the stylist workflows make.
#[async_trait]
pub trait StylistApi: Send + Sync {
    /// `POST /admin/stylists/invite`
    async fn create_invite(&self, request: &InviteRequest) -> Result<InviteCreated, ApiError>;

    /// `POST /admin/stylists/{userId}/send-invite`
    async fn send_invite(&self, user_id: &str) -> Result<InviteCreated, ApiError>;

    /// `GET /admin/stylists/paginated`
    async fn fetch_paginated_stylists(&self, query: &StylistQuery) -> Result<StylistPage, ApiError>;

    /// `GET /admin/stylists`
    async fn fetch_stylists(&self) -> Result<Vec<StylistRecord>, ApiError>;

    /// `GET /stylists/invite/{token}`
    async fn validate_invite(&self, token: &str) -> Result<InvitePreview, ApiError>;

    /// `POST /stylists/invite/{token}/accept`
    async fn accept_invite(&self, token: &str, request: &AcceptInviteRequest) -> Result<(), ApiError>;

    /// `POST /admin/stylists/{userId}/approve`
    async fn approve_stylist(&self, user_id: &str) -> Result<(), ApiError>;

    /// `POST /admin/stylists/{userId}/reject`
    async fn reject_stylist(&self, user_id: &str) -> Result<(), ApiError>;

    /// `POST /admin/stylists/{userId}/block` with `{block}`.
    async fn block_stylist_legacy(&self, user_id: &str, block: bool) -> Result<(), ApiError>;

    /// `PATCH /admin/stylists/{stylistId}/block` with `{isBlocked}`.
    async fn set_stylist_blocked(&self, stylist_id: &str, is_blocked: bool) -> Result<(), ApiError>;

    /// `POST /apply-stylist`
    async fn apply_as_stylist(&self, request: &InviteRequest) -> Result<(), ApiError>;
}
