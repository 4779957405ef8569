//! REST client for the remote ledger.
//!
//! [`ApiClient`] implements [`engine::LedgerApi`] over HTTP. It carries the
//! session token as a default header, so the engine never sees credentials.

use api_types::{
    ErrorResponse,
    transaction::{
        TransactionKind as ApiKind, TransactionList, TransactionListResponse, TransactionNew,
        TransactionView,
    },
};
use chrono::Utc;
use engine::{
    Amount, ApiError, LedgerApi, TransactionId, TransactionInput, TransactionKind,
    TransactionRecord,
};
use reqwest::{RequestBuilder, Response, Url, header};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Errors building a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base_url: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid auth token: {0}")]
    InvalidToken(String),
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = header::HeaderMap::new();
        if let Some(token) = token.filter(|token| !token.is_empty()) {
            let mut auth = header::HeaderValue::try_from(format!("Bearer {token}"))
                .map_err(|err| ClientError::InvalidToken(err.to_string()))?;
            auth.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { base_url, http })
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("invalid base_url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let res = req.send().await.map_err(transport)?;
        if res.status().is_success() {
            return res.json::<T>().await.map_err(|err| ApiError::Malformed(err.to_string()));
        }
        Err(error_from_response(res).await)
    }

    async fn send_unit(&self, req: RequestBuilder) -> Result<(), ApiError> {
        let res = req.send().await.map_err(transport)?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(error_from_response(res).await)
    }
}

impl LedgerApi for ApiClient {
    async fn list_transactions(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<TransactionRecord>, ApiError> {
        let endpoint = self.endpoint(&["transactions"])?;
        tracing::debug!("GET {endpoint} for {year}-{month:02}");

        let req = self
            .http
            .get(endpoint)
            .query(&TransactionList { year, month });
        let response: TransactionListResponse = self.send_json(req).await?;

        response
            .transactions
            .into_iter()
            .map(record_from_view)
            .collect()
    }

    async fn create_transaction(
        &self,
        input: &TransactionInput,
    ) -> Result<TransactionRecord, ApiError> {
        let endpoint = self.endpoint(&["transactions"])?;
        tracing::debug!("POST {endpoint}");

        let payload = payload_from_input(input, Some(Uuid::new_v4().to_string()));
        let view: TransactionView = self.send_json(self.http.post(endpoint).json(&payload)).await?;
        record_from_view(view)
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        input: &TransactionInput,
    ) -> Result<TransactionRecord, ApiError> {
        let endpoint = self.endpoint(&["transactions", id.as_str()])?;
        tracing::debug!("PUT {endpoint}");

        let payload = payload_from_input(input, None);
        let view: TransactionView = self.send_json(self.http.put(endpoint).json(&payload)).await?;
        record_from_view(view)
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), ApiError> {
        let endpoint = self.endpoint(&["transactions", id.as_str()])?;
        tracing::debug!("DELETE {endpoint}");

        self.send_unit(self.http.delete(endpoint)).await
    }
}

#[derive(Default, Debug)]
pub struct ApiClientBuilder {
    base_url: String,
    token: Option<String>,
}

impl ApiClientBuilder {
    pub fn base_url(mut self, base_url: &str) -> ApiClientBuilder {
        self.base_url = base_url.to_string();
        self
    }

    pub fn token(mut self, token: &str) -> ApiClientBuilder {
        self.token = Some(token.to_string());
        self
    }

    pub fn build(self) -> Result<ApiClient, ClientError> {
        ApiClient::new(&self.base_url, self.token.as_deref())
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

async fn error_from_response(res: Response) -> ApiError {
    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());
    tracing::debug!("remote ledger answered {status}: {body}");

    match status.as_u16() {
        401 => ApiError::Unauthorized,
        403 => ApiError::Forbidden,
        404 => ApiError::NotFound,
        409 => ApiError::Conflict(body),
        422 => ApiError::Validation(body),
        _ => ApiError::Server(body),
    }
}

fn map_kind(kind: ApiKind) -> TransactionKind {
    match kind {
        ApiKind::Income => TransactionKind::Income,
        ApiKind::Expense => TransactionKind::Expense,
        ApiKind::Saving => TransactionKind::Saving,
    }
}

fn map_api_kind(kind: TransactionKind) -> ApiKind {
    match kind {
        TransactionKind::Income => ApiKind::Income,
        TransactionKind::Expense => ApiKind::Expense,
        TransactionKind::Saving => ApiKind::Saving,
    }
}

fn record_from_view(view: TransactionView) -> Result<TransactionRecord, ApiError> {
    if view.amount < 0 {
        return Err(ApiError::Malformed(format!(
            "transaction {} has negative amount {}",
            view.id, view.amount
        )));
    }
    Ok(TransactionRecord {
        id: TransactionId::new(view.id),
        date: view.date,
        amount: Amount::new(view.amount),
        kind: map_kind(view.kind),
        category_id: view.category_id,
        description: view.description,
        created_at: view.created_at.with_timezone(&Utc),
    })
}

fn payload_from_input(input: &TransactionInput, idempotency_key: Option<String>) -> TransactionNew {
    TransactionNew {
        date: input.date,
        amount: input.amount_minor,
        kind: map_api_kind(input.kind),
        category_id: input.category_id,
        description: input.description.clone(),
        idempotency_key,
    }
}
