//! reqwest-backed implementation of the feedback API

use async_trait::async_trait;
use fms_core::{
    performance::measure_async, AuthApi, ErrorContext, Feedback, FeedbackApi, FeedbackDraft,
    FmsError, FmsResult, LoginRequest, SignupRequest, User,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::{create_http_client, handle_response_error, transport_error, ApiClientConfig};

/// HTTP client for the feedback service
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpApiClient {
    /// Create a new client
    pub fn new(config: ApiClientConfig) -> FmsResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| FmsError::Config {
            message: format!("Invalid API base URL '{}': {}", config.base_url, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_api_client").with_operation("new"),
        })?;
        let client = create_http_client(&config)?;

        info!("Created feedback API client for {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> FmsResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, operation))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, operation).await);
        }

        Ok(response)
    }

    async fn read_body(response: reqwest::Response, operation: &str) -> FmsResult<(u16, String)> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, operation))?;
        Ok((status, body))
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> FmsResult<T> {
        let (status, body) = Self::read_body(response, operation).await?;
        serde_json::from_str(&body).map_err(|e| FmsError::Api {
            status,
            message: format!("Unexpected response body: {}", e),
            context: ErrorContext::new("http_api_client").with_operation(operation),
        })
    }
}

/// The login endpoint answers 200 for unknown credentials, echoing the request
/// without an `id`. Only a reply carrying an id is a successful login.
pub(crate) fn user_from_login_reply(body: &str) -> FmsResult<User> {
    let invalid = |detail: Option<String>| FmsError::Authentication {
        message: "Invalid email or password".to_string(),
        context: {
            let context = ErrorContext::new("http_api_client").with_operation("login");
            match detail {
                Some(detail) => context.with_metadata("detail", &detail),
                None => context,
            }
        },
    };

    if body.trim().is_empty() {
        return Err(invalid(None));
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| invalid(Some(e.to_string())))?;

    let has_id = value.get("id").is_some_and(|id| !id.is_null());
    if !has_id {
        return Err(invalid(None));
    }

    serde_json::from_value(value).map_err(|e| invalid(Some(e.to_string())))
}

/// Decode list rows one at a time. Rows the client cannot represent, such as
/// an unknown service label or a negative rating, are skipped.
pub(crate) fn feedback_from_rows(rows: Vec<serde_json::Value>) -> Vec<Feedback> {
    let total = rows.len();
    let items: Vec<Feedback> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<Feedback>(row.clone()) {
            Ok(feedback) => Some(feedback),
            Err(e) => {
                warn!(error = %e, id = %row["id"], "Skipping unreadable feedback record");
                None
            }
        })
        .collect();

    if items.len() < total {
        warn!(skipped = total - items.len(), total, "Feedback list was partially readable");
    }
    items
}

#[async_trait]
impl AuthApi for HttpApiClient {
    async fn login(&self, request: &LoginRequest) -> FmsResult<User> {
        measure_async("api.login", async {
            let url = self.endpoint(&["login"]);
            debug!("POST {}", url);

            let response = self
                .send(self.client.post(url).json(request), "login")
                .await?;
            let (_, body) = Self::read_body(response, "login").await?;
            user_from_login_reply(&body)
        })
        .await
    }

    async fn signup(&self, request: &SignupRequest) -> FmsResult<Option<User>> {
        measure_async("api.signup", async {
            let url = self.endpoint(&["signup"]);
            debug!("POST {}", url);

            let response = self
                .send(self.client.post(url).json(request), "signup")
                .await?;
            let (_, body) = Self::read_body(response, "signup").await?;

            match serde_json::from_str::<User>(&body) {
                Ok(user) => Ok(Some(user)),
                Err(_) => {
                    debug!("Signup acknowledged without a user record: {}", body.trim());
                    Ok(None)
                }
            }
        })
        .await
    }
}

#[async_trait]
impl FeedbackApi for HttpApiClient {
    async fn list_feedback(&self) -> FmsResult<Vec<Feedback>> {
        measure_async("api.list_feedback", async {
            let url = self.endpoint(&["customer-feedback"]);
            debug!("GET {}", url);

            let response = self.send(self.client.get(url), "list_feedback").await?;
            let rows: Vec<serde_json::Value> = Self::read_json(response, "list_feedback").await?;
            Ok(feedback_from_rows(rows))
        })
        .await
    }

    async fn create_feedback(&self, draft: &FeedbackDraft) -> FmsResult<Feedback> {
        measure_async("api.create_feedback", async {
            let url = self.base_url.clone();
            debug!("POST {}", url);

            let response = self
                .send(self.client.post(url).json(draft), "create_feedback")
                .await?;
            Self::read_json(response, "create_feedback").await
        })
        .await
    }

    async fn update_feedback(&self, id: &str, draft: &FeedbackDraft) -> FmsResult<Feedback> {
        measure_async("api.update_feedback", async {
            let url = self.endpoint(&[id]);
            debug!("PUT {}", url);

            let response = self
                .send(self.client.put(url).json(draft), "update_feedback")
                .await?;
            Self::read_json(response, "update_feedback").await
        })
        .await
    }

    async fn delete_feedback(&self, id: &str) -> FmsResult<()> {
        measure_async("api.delete_feedback", async {
            let url = self.endpoint(&[id]);
            debug!("DELETE {}", url);

            self.send(self.client.delete(url), "delete_feedback").await?;
            Ok(())
        })
        .await
    }
}
