//! HR API client: the only place that talks to the remote HR backend.
//!
//! Reads, updates and deletes are retried on 429, 5xx and transport failures
//! with exponential backoff. Creates and logins are sent once.

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::position::{PositionId, PositionInput, PositionRecord};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const MAX_RETRIES: u32 = 3;
const LOGIN_OK: &str = "Login exitoso";

#[derive(Debug, Error)]
pub enum HrApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HR API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Position {0} not found")]
    NotFound(PositionId),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed HR API response: {0}")]
    Malformed(String),
}

/// Wire shape of a position write on the HR API.
#[derive(Debug, Serialize)]
struct PuestoPayload<'a> {
    nombre: &'a str,
    descripcion: Option<&'a str>,
    jefe_id: Option<PositionId>,
}

impl<'a> From<&'a PositionInput> for PuestoPayload<'a> {
    fn from(input: &'a PositionInput) -> Self {
        Self {
            nombre: input.name.trim(),
            descripcion: input.description.as_deref(),
            jefe_id: input.parent_id,
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    usuario: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    mensaje: Option<String>,
    usuario: Option<String>,
}

#[derive(Clone)]
pub struct HrApiClient {
    client: Client,
    base_url: String,
    retry_delay: Duration,
}

impl HrApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HrApiError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_delay: Duration::from_millis(500),
        })
    }

    /// Overrides the first backoff step (doubles on each retry).
    #[allow(dead_code)]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, HrApiError> {
        let attempts = if method == Method::POST { 1 } else { MAX_RETRIES };
        let mut last_error: Option<HrApiError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.retry_delay * (1 << (attempt - 1));
                warn!(
                    "HR API {} {} attempt {} failed, retrying after {}ms...",
                    method,
                    path,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.request(method.clone(), self.url(path));
            if let Some(body) = &body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(HrApiError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!("HR API returned {}: {}", status, message);
                last_error = Some(HrApiError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            debug!("HR API {} {} -> {}", method, path, status);
            return Ok(response);
        }

        Err(last_error.unwrap_or(HrApiError::Api {
            status: 503,
            message: format!("no response after {attempts} attempts"),
        }))
    }

    async fn expect_success(response: Response) -> Result<Response, HrApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(HrApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, HrApiError> {
        let body = Self::expect_success(response).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| HrApiError::Malformed(e.to_string()))
    }

    /// Maps a 404 on an item route to [`HrApiError::NotFound`].
    fn item_not_found(response: &Response, id: PositionId) -> Result<(), HrApiError> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(HrApiError::NotFound(id));
        }
        Ok(())
    }

    pub async fn list_positions(&self) -> Result<Vec<PositionRecord>, HrApiError> {
        let response = self.send(Method::GET, "/puestos/", None).await?;
        Self::json(response).await
    }

    pub async fn create_position(&self, input: &PositionInput) -> Result<PositionRecord, HrApiError> {
        let body = serde_json::to_value(PuestoPayload::from(input))
            .map_err(|e| HrApiError::Malformed(e.to_string()))?;
        let response = self.send(Method::POST, "/puestos/", Some(body)).await?;
        Self::json(response).await
    }

    pub async fn update_position(
        &self,
        id: PositionId,
        input: &PositionInput,
    ) -> Result<PositionRecord, HrApiError> {
        let body = serde_json::to_value(PuestoPayload::from(input))
            .map_err(|e| HrApiError::Malformed(e.to_string()))?;
        let response = self
            .send(Method::PUT, &format!("/puestos/{id}/"), Some(body))
            .await?;
        Self::item_not_found(&response, id)?;
        Self::json(response).await
    }

    pub async fn delete_position(&self, id: PositionId) -> Result<(), HrApiError> {
        let response = self
            .send(Method::DELETE, &format!("/puestos/{id}/"), None)
            .await?;
        Self::item_not_found(&response, id)?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Checks credentials against the HR API and returns the username it vouches for.
    pub async fn login(&self, usuario: &str, password: &str) -> Result<String, HrApiError> {
        let body = serde_json::to_value(LoginRequest { usuario, password })
            .map_err(|e| HrApiError::Malformed(e.to_string()))?;
        let response = self.send(Method::POST, "/login/", Some(body)).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(HrApiError::InvalidCredentials);
        }

        let login: LoginResponse = Self::json(response).await?;
        if login.mensaje.as_deref() != Some(LOGIN_OK) {
            return Err(HrApiError::InvalidCredentials);
        }
        login
            .usuario
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| HrApiError::Malformed("login succeeded without a username".into()))
    }
}
