//! `reqwest`-backed [`ApiClient`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use url::Url;

use crate::api::{ApiClient, ApiError, ApiResult, ListRequest, Method, Mutation};
use crate::models::config::ApiConfig;
use crate::session::SessionHandle;

/// HTTP client for the brokerage REST backend.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionHandle>,
}

impl HttpApiClient {
    /// Creates a client for `config.base_url` authorized by the shared session.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig, session: Arc<SessionHandle>) -> ApiResult<Self> {
        Url::parse(&config.base_url)?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(Url::parse(&format!(
            "{}/{}",
            self.base_url,
            path.trim_start_matches('/')
        ))?)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode(&self, response: Response) -> ApiResult<Value> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            if let Err(err) = self.session.invalidate() {
                log::error!("Failed to invalidate session: {err}");
            }
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ApiClient for HttpApiClient {
    fn get_json(&self, request: &ListRequest) -> impl Future<Output = ApiResult<Value>> + Send {
        async move {
            let mut url = self.endpoint(&request.path)?;
            if !request.params.is_empty() {
                url.query_pairs_mut().extend_pairs(request.params.iter());
            }
            log::debug!("GET {url}");

            let response = self.authorize(self.client.get(url)).send().await?;
            self.decode(response).await
        }
    }

    fn send_json(&self, mutation: &Mutation) -> impl Future<Output = ApiResult<Value>> + Send {
        async move {
            let url = self.endpoint(&mutation.path)?;
            let method = match mutation.method {
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Patch => reqwest::Method::PATCH,
                Method::Delete => reqwest::Method::DELETE,
            };
            log::debug!("{method} {url}");

            let mut request = self.authorize(self.client.request(method, url));
            if let Some(body) = &mutation.body {
                request = request.json(body);
            }

            let response = request.send().await?;
            self.decode(response).await
        }
    }
}
