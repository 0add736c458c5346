//! REST transport for the scheduler.

use async_trait::async_trait;
use drill_core::Card;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{Scheduler, SchedulerError};

// === API Request/Response Types ===

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    card_id: &'a str,
    answer: bool,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    token_type: String,
}

/// Which daily limit to raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LimitKind {
    #[serde(rename = "NEW")]
    New,
    #[serde(rename = "DUE")]
    Due,
}

#[derive(Debug, Serialize)]
struct IncreaseLimitRequest {
    limit_type: LimitKind,
    amount: u32,
}

/// Scheduler backed by the study REST API.
pub struct HttpScheduler {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpScheduler {
    /// Create a scheduler client. `base_url` points at the API root, e.g.
    /// `http://localhost:8000/api/v1`.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(token),
        }
    }

    /// Exchange credentials for a bearer token and keep it for later calls.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SchedulerError> {
        let url = format!("{}/auth/login", self.base_url);

        let resp = self
            .client
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| SchedulerError::Network(e.to_string()))?;

        let response: TokenResponse = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| SchedulerError::Parse(e.to_string()))?;

        *self.token.write().await = Some(response.access_token);
        tracing::info!("Logged in as {}", username);
        Ok(())
    }

    /// Raise today's new or due card limit.
    pub async fn increase_limit(&self, kind: LimitKind, amount: u32) -> Result<(), SchedulerError> {
        let url = format!("{}/study/limits/increase", self.base_url);
        let request = IncreaseLimitRequest {
            limit_type: kind,
            amount,
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(self.token().await?)
            .json(&request)
            .send()
            .await
            .map_err(|e| SchedulerError::Network(e.to_string()))?;

        check_status(resp).await?;
        Ok(())
    }

    async fn token(&self) -> Result<String, SchedulerError> {
        self.token
            .read()
            .await
            .clone()
            .ok_or(SchedulerError::NotAuthenticated)
    }
}

#[async_trait]
impl Scheduler for HttpScheduler {
    async fn fetch_next_card(&self) -> Result<Option<Card>, SchedulerError> {
        let url = format!("{}/study/next", self.base_url);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(self.token().await?)
            .send()
            .await
            .map_err(|e| SchedulerError::Network(e.to_string()))?;

        check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| SchedulerError::Parse(e.to_string()))
    }

    async fn submit_verdict(&self, card_id: &str, correct: bool) -> Result<(), SchedulerError> {
        let url = format!("{}/study/answer", self.base_url);
        let request = AnswerRequest {
            card_id,
            answer: correct,
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(self.token().await?)
            .json(&request)
            .send()
            .await
            .map_err(|e| SchedulerError::Network(e.to_string()))?;

        check_status(resp).await?;
        Ok(())
    }

    async fn delete_card(&self, card_id: &str) -> Result<(), SchedulerError> {
        let url = format!("{}/study/cards/{}", self.base_url, card_id);

        let resp = self
            .client
            .delete(&url)
            .bearer_auth(self.token().await?)
            .send()
            .await
            .map_err(|e| SchedulerError::Network(e.to_string()))?;

        check_status(resp).await?;
        Ok(())
    }
}

async fn check_status(resp: Response) -> Result<Response, SchedulerError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(SchedulerError::NotAuthenticated);
    }
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(SchedulerError::Backend {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp)
}
