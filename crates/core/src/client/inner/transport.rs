use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use log::{debug, trace};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client, Url,
};

use super::cookie_store::CredentialJar;
use crate::{
    client::pipeline::{RawResponse, RequestEnvelope},
    error::ClientError,
};

/// Moves a prepared request to the backend and brings back whatever answered.
///
/// Errors are limited to [ClientError::Transport] for calls that never got an
/// answer and [ClientError::InvalidRequest] for requests that could not be
/// built; status codes are the pipeline's business.
pub trait Transport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: &'a RequestEnvelope,
    ) -> BoxFuture<'a, Result<RawResponse, ClientError>>;
}

/// [Transport] over reqwest, with the console's default headers, timeout and
/// a persisted cookie jar.
pub struct HttpTransport {
    base_url: String,
    http_client: Client,
    jar: Arc<CredentialJar>,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        jar: Arc<CredentialJar>,
    ) -> Result<Self, ClientError> {
        // validate once so every later join is just string work
        Url::parse(base_url).map_err(|e| ClientError::InvalidRequest {
            error: format!("base url `{base_url}`: {e}"),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .cookie_provider(jar.clone())
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client,
            jar,
        })
    }

    pub fn jar(&self) -> &Arc<CredentialJar> {
        &self.jar
    }

    fn url_for(&self, path: &str) -> Result<Url, ClientError> {
        let joined = if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        };
        Url::parse(&joined).map_err(|e| ClientError::InvalidRequest {
            error: format!("`{joined}`: {e}"),
        })
    }

    async fn send(&self, request: &RequestEnvelope) -> Result<RawResponse, ClientError> {
        let url = self.url_for(&request.path)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ClientError::InvalidRequest {
                    error: format!("header `{name}`: {e}"),
                })?;
            let value = HeaderValue::from_str(value).map_err(|e| ClientError::InvalidRequest {
                error: format!("header `{name}`: {e}"),
            })?;
            headers.insert(name, value);
        }

        let mut builder = self
            .http_client
            .request(request.method.into(), url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        trace!("{} {} -> {status}", request.method, request.path);

        self.jar.save();
        Ok(RawResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn execute<'a>(
        &'a self,
        request: &'a RequestEnvelope,
    ) -> BoxFuture<'a, Result<RawResponse, ClientError>> {
        Box::pin(async move {
            let res = self.send(request).await;
            if let Err(e) = &res {
                debug!("{} {} failed: {e}", request.method, request.path);
            }
            res
        })
    }
}
