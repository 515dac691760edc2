use std::time::Duration;

use async_trait::async_trait;
use questionnaire::{
    NewQuestion, QuestionId, QuestionServer, ServerReply, Submission, TransportError,
};
use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

/// How long a request may take before it is abandoned.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Error type for setting up the HTTP client.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The base URL cannot have path segments appended (e.g. `mailto:`).
    #[error("Invalid server URL: {0}")]
    InvalidBaseUrl(Url),

    /// The session cookie contains characters not allowed in a header.
    #[error("Invalid session cookie: {0}")]
    InvalidCookie(#[from] reqwest::header::InvalidHeaderValue),

    /// reqwest could not build its client.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configures an [`HttpServer`].
#[derive(Debug, Clone)]
pub struct HttpServerBuilder {
    base_url: Url,
    timeout: Duration,
    session_cookie: Option<String>,
}

impl HttpServerBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send this `Cookie` header with every request (the server's login session).
    pub fn session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn build(self) -> Result<HttpServer, HttpError> {
        if self.base_url.cannot_be_a_base() {
            return Err(HttpError::InvalidBaseUrl(self.base_url));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        if let Some(cookie) = &self.session_cookie {
            let mut value = HeaderValue::from_str(cookie)?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        Ok(HttpServer {
            client,
            base_url: self.base_url,
        })
    }
}

/// The questionnaire server, reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpServer {
    client: Client,
    base_url: Url,
}

impl HttpServer {
    /// Client with the default timeout and no session cookie.
    pub fn new(base_url: Url) -> Result<Self, HttpError> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: Url) -> HttpServerBuilder {
        HttpServerBuilder {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            session_cookie: None,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint below the base URL, keeping any base path.
    ///
    /// Segments are percent-encoded, so ids cannot escape their position.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        // Checked in the builder.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and read whatever envelope comes back.
    ///
    /// The HTTP status is not inspected: the server reports failures in the
    /// body, often with a 4xx/5xx status. Only a body that is not an
    /// envelope is an error here.
    async fn exchange(&self, request: RequestBuilder) -> Result<ServerReply, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;

        match serde_json::from_slice::<ServerReply>(&body) {
            Ok(reply) => {
                debug!(status, reply = %reply.status, "server replied");
                Ok(reply)
            }
            Err(err) => {
                warn!(status, error = %err, "reply is not a status envelope");
                Err(TransportError::UnexpectedReply { status })
            }
        }
    }
}

#[async_trait(?Send)]
impl QuestionServer for HttpServer {
    #[instrument(level = "debug", skip_all, fields(date = %submission.date))]
    async fn submit_responses(
        &self,
        submission: &Submission,
    ) -> Result<ServerReply, TransportError> {
        let url = self.endpoint(&["submit_responses"]);
        self.exchange(self.client.post(url).json(submission)).await
    }

    #[instrument(level = "debug", skip_all)]
    async fn add_question(&self, question: &NewQuestion) -> Result<ServerReply, TransportError> {
        let url = self.endpoint(&["add_question"]);
        self.exchange(self.client.post(url).json(question)).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_question(&self, id: &QuestionId) -> Result<ServerReply, TransportError> {
        let url = self.endpoint(&["question", id.as_str()]);
        self.exchange(self.client.delete(url)).await
    }
}
