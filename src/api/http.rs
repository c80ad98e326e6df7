//! reqwest-backed implementation of `StylistApi`.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, warn};

use super::envelope::{ApiEnvelope, ErrorBody, PaginatedEnvelope};
use super::{AcceptInviteRequest, InviteRequest, StylistApi};
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::stylists::model::{
    InviteCreated, InvitePreview, StylistPage, StylistQuery, StylistRecord,
};

/// HTTP client for the salon backend's stylist endpoints.
pub struct HttpStylistApi {
    base_url: Url,
    auth_token: Option<SecretString>,
    client: reqwest::Client,
}

impl HttpStylistApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "STYLIST_API_BASE_URL".into(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: "STYLIST_API_BASE_URL".into(),
                message: format!("{} cannot be used as a base URL", config.base_url),
            });
        }
        // Normalise so joined paths never produce `//`.
        if let Ok(mut segments) = base_url.path_segments_mut() {
            segments.pop_if_empty();
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url,
            auth_token: config.auth_token.clone(),
            client,
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.client.request(method, self.url(segments));
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send and return the raw body of a 2xx response.
    async fn execute(&self, endpoint: &'static str, builder: RequestBuilder) -> Result<String, ApiError> {
        debug!(endpoint, "Stylist API request");

        let resp = builder.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "Stylist API request did not complete");
            ApiError::Transport {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| ApiError::Transport {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            warn!(endpoint, status = %status, message = ?message, "Stylist API returned an error");
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
                message,
            });
        }

        Ok(body)
    }

    /// Unwrap `{success, data}` into `data`.
    async fn data<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.execute(endpoint, builder).await?;
        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        if !envelope.success {
            return Err(ApiError::Refused {
                endpoint: endpoint.to_string(),
                message: envelope.message,
            });
        }
        envelope.data.ok_or_else(|| ApiError::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: "response has no data".to_string(),
        })
    }

    /// For endpoints whose payload we don't use: only `success` matters.
    async fn acknowledge(&self, endpoint: &'static str, builder: RequestBuilder) -> Result<(), ApiError> {
        let body = self.execute(endpoint, builder).await?;
        if body.trim().is_empty() {
            return Ok(());
        }
        let envelope: ApiEnvelope<IgnoredAny> =
            serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        if envelope.success {
            Ok(())
        } else {
            Err(ApiError::Refused {
                endpoint: endpoint.to_string(),
                message: envelope.message,
            })
        }
    }
}

#[async_trait]
impl StylistApi for HttpStylistApi {
    async fn create_invite(&self, request: &InviteRequest) -> Result<InviteCreated, ApiError> {
        let builder = self
            .request(Method::POST, &["admin", "stylists", "invite"])
            .json(request);
        self.data("POST /admin/stylists/invite", builder).await
    }

    async fn send_invite(&self, user_id: &str) -> Result<InviteCreated, ApiError> {
        let builder = self.request(Method::POST, &["admin", "stylists", user_id, "send-invite"]);
        self.data("POST /admin/stylists/:userId/send-invite", builder).await
    }

    async fn fetch_paginated_stylists(&self, query: &StylistQuery) -> Result<StylistPage, ApiError> {
        const ENDPOINT: &str = "GET /admin/stylists/paginated";
        let builder = self
            .request(Method::GET, &["admin", "stylists", "paginated"])
            .query(query);
        let body = self.execute(ENDPOINT, builder).await?;
        let envelope: PaginatedEnvelope<StylistRecord> =
            serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse {
                endpoint: ENDPOINT.to_string(),
                reason: e.to_string(),
            })?;
        if !envelope.success {
            return Err(ApiError::Refused {
                endpoint: ENDPOINT.to_string(),
                message: envelope.message,
            });
        }
        let pagination = envelope.pagination.ok_or_else(|| ApiError::InvalidResponse {
            endpoint: ENDPOINT.to_string(),
            reason: "response has no pagination".to_string(),
        })?;
        Ok(StylistPage {
            data: envelope.data,
            pagination,
        })
    }

    async fn fetch_stylists(&self) -> Result<Vec<StylistRecord>, ApiError> {
        let builder = self.request(Method::GET, &["admin", "stylists"]);
        self.data("GET /admin/stylists", builder).await
    }

    async fn validate_invite(&self, token: &str) -> Result<InvitePreview, ApiError> {
        let builder = self.request(Method::GET, &["stylists", "invite", token]);
        self.data("GET /stylists/invite/:token", builder).await
    }

    async fn accept_invite(&self, token: &str, request: &AcceptInviteRequest) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, &["stylists", "invite", token, "accept"])
            .json(request);
        self.acknowledge("POST /stylists/invite/:token/accept", builder)
            .await
    }

    async fn approve_stylist(&self, user_id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, &["admin", "stylists", user_id, "approve"]);
        self.acknowledge("POST /admin/stylists/:userId/approve", builder)
            .await
    }

    async fn reject_stylist(&self, user_id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, &["admin", "stylists", user_id, "reject"]);
        self.acknowledge("POST /admin/stylists/:userId/reject", builder)
            .await
    }

    async fn block_stylist_legacy(&self, user_id: &str, block: bool) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, &["admin", "stylists", user_id, "block"])
            .json(&serde_json::json!({ "block": block }));
        self.acknowledge("POST /admin/stylists/:userId/block", builder)
            .await
    }

    async fn set_stylist_blocked(&self, stylist_id: &str, is_blocked: bool) -> Result<(), ApiError> {
        let builder = self
            .request(Method::PATCH, &["admin", "stylists", stylist_id, "block"])
            .json(&serde_json::json!({ "isBlocked": is_blocked }));
        self.acknowledge("PATCH /admin/stylists/:stylistId/block", builder)
            .await
    }

    async fn apply_as_stylist(&self, request: &InviteRequest) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, &["apply-stylist"]).json(request);
        self.acknowledge("POST /apply-stylist", builder).await
    }
}
