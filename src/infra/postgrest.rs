//! Thin client for the hosted Postgres REST (PostgREST-style) interface.
//!
//! The client owns the base URL, API key, and the bearer token it acts
//! under. Repositories build query-parameter lists; this module performs
//! the HTTP exchange and normalizes structured error bodies into
//! [`AppError`]. A client is cheap to construct per request: the inner
//! `reqwest::Client` connection pool is shared.

use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::REST_PATH;
use crate::errors::{AppError, AppResult};

/// Pairs of query-string keys and values, in emission order.
pub type QueryPairs = Vec<(String, String)>;

/// Client handle bound to one base URL, API key, and bearer token.
#[derive(Clone)]
pub struct PostgrestClient {
    http: reqwest::Client,
    rest_url: String,
    api_key: String,
    bearer: String,
}

/// Structured error body returned by the REST interface.
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
    #[serde(default)]
    hint: Option<String>,
}

/// SQLSTATE class for unique-constraint violations.
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

/// PostgREST code for "zero rows when one was requested".
const PGRST_NO_ROWS: &str = "PGRST116";

impl PostgrestClient {
    pub fn new(
        http: reqwest::Client,
        project_url: &str,
        api_key: impl Into<String>,
        bearer: impl Into<String>,
    ) -> Self {
        Self {
            http,
            rest_url: format!("{}{}", project_url.trim_end_matches('/'), REST_PATH),
            api_key: api_key.into(),
            bearer: bearer.into(),
        }
    }

    /// Fetch rows from a table.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &QueryPairs,
    ) -> AppResult<T> {
        self.exchange(Method::GET, table, query, None::<&()>).await
    }

    /// Insert one or more rows, returning the created representation.
    pub async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        query: &QueryPairs,
        body: &B,
    ) -> AppResult<T> {
        self.exchange(Method::POST, table, query, Some(body)).await
    }

    /// Patch rows matched by the query, returning the updated representation.
    pub async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        query: &QueryPairs,
        body: &B,
    ) -> AppResult<T> {
        self.exchange(Method::PATCH, table, query, Some(body)).await
    }

    /// Delete rows matched by the query, returning the deleted representation.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &QueryPairs,
    ) -> AppResult<T> {
        self.exchange(Method::DELETE, table, query, None::<&()>)
            .await
    }

    /// Connectivity probe: an empty select against the given table.
    pub async fn ping(&self, table: &str) -> AppResult<()> {
        let query = vec![
            ("select".to_string(), "*".to_string()),
            ("limit".to_string(), "1".to_string()),
        ];
        self.select::<serde_json::Value>(table, &query).await?;
        Ok(())
    }

    async fn exchange<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        table: &str,
        query: &QueryPairs,
        body: Option<&B>,
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.rest_url, table);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .query(query)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.bearer));

        // Writes ask for the affected rows back so callers can
        // distinguish "matched nothing" from success.
        if method != Method::GET {
            request = request.header("Prefer", "return=representation");
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(AppError::from);
        }

        Err(Self::map_error(status, response.text().await.ok()))
    }

    /// Map a non-2xx response into the application error taxonomy,
    /// preserving the structured body in the details channel.
    fn map_error(status: StatusCode, body: Option<String>) -> AppError {
        let parsed: Option<UpstreamErrorBody> = body
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok());

        let Some(parsed) = parsed else {
            return AppError::Upstream {
                message: format!("unexpected status {}", status.as_u16()),
                code: None,
                details: None,
            };
        };

        match parsed.code.as_deref() {
            Some(SQLSTATE_UNIQUE_VIOLATION) => AppError::conflict("Row"),
            Some(PGRST_NO_ROWS) => AppError::NotFound,
            _ if status == StatusCode::NOT_FOUND => AppError::NotFound,
            _ => {
                let mut details = parsed.details;
                if let Some(hint) = parsed.hint {
                    details = Some(serde_json::json!({
                        "details": details,
                        "hint": hint,
                    }));
                }
                AppError::Upstream {
                    message: parsed
                        .message
                        .unwrap_or_else(|| format!("unexpected status {}", status.as_u16())),
                    code: parsed.code,
                    details,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(raw: &str) -> Option<String> {
        Some(raw.to_string())
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err = PostgrestClient::map_error(
            StatusCode::CONFLICT,
            body(r#"{"message":"duplicate key value","code":"23505"}"#),
        );
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn missing_single_row_maps_to_not_found() {
        let err = PostgrestClient::map_error(
            StatusCode::NOT_ACCEPTABLE,
            body(r#"{"message":"JSON object requested, multiple (or no) rows returned","code":"PGRST116"}"#),
        );
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn structured_body_is_preserved() {
        let err = PostgrestClient::map_error(
            StatusCode::BAD_REQUEST,
            body(r#"{"message":"invalid input","code":"22P02","details":"col x","hint":"cast it"}"#),
        );
        match err {
            AppError::Upstream {
                message,
                code,
                details,
            } => {
                assert_eq!(message, "invalid input");
                assert_eq!(code.as_deref(), Some("22P02"));
                assert!(details.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn garbage_body_still_yields_upstream_error() {
        let err = PostgrestClient::map_error(StatusCode::BAD_GATEWAY, body("<html>oops</html>"));
        assert_eq!(err.code(), "UPSTREAM_ERROR");
    }
}
