use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::ClientError;
use super::session::Session;
use crate::config::ClientConfig;
use crate::workflows::envelope::Envelope;

#[derive(Debug, Deserialize)]
struct FailureBody {
    #[serde(default)]
    message: Option<String>,
}

/// Thin transport over the portal REST API.
///
/// Unwraps `{"data": ...}` envelopes on success and turns `{"message": ...}` bodies
/// into [`ClientError::Api`] on failure.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("hireflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        session: Option<&Session>,
    ) -> Result<T, ClientError> {
        self.send(self.request(Method::GET, path), session).await
    }

    pub async fn get_with_query<Q, T>(
        &self,
        path: &str,
        query: &Q,
        session: Option<&Session>,
    ) -> Result<T, ClientError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::GET, path).query(query), session)
            .await
    }

    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body), session)
            .await
    }

    pub async fn put<B, T>(
        &self,
        path: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path).json(body), session)
            .await
    }

    pub async fn patch<B, T>(
        &self,
        path: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PATCH, path).json(body), session)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        session: Option<&Session>,
    ) -> Result<T, ClientError> {
        self.send(self.request(Method::DELETE, path), session).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        session: Option<&Session>,
    ) -> Result<T, ClientError> {
        self.send(self.request(Method::POST, path).multipart(form), session)
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        session: Option<&Session>,
    ) -> Result<T, ClientError> {
        let request = match session {
            Some(session) => request.bearer_auth(session.bearer()),
            None => request,
        };

        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "portal request failed before a response");
            ClientError::Network(err)
        })?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.bytes().await.map_err(ClientError::Network)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<FailureBody>(&body)
                .ok()
                .and_then(|failure| failure.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("An error occurred")
                        .to_string()
                });
            debug!(status = status.as_u16(), path = %url, %message, "portal request rejected");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        Ok(envelope.data)
    }
}
