//! Route-bound HTTP client.

use std::{ops::RangeInclusive, sync::Arc, time::Duration};

use serde::de::DeserializeOwned;
use tokio::{sync::watch, time::Instant};
use url::Url;

use crate::{
    decoder::{decode_body, decode_error, truncate_body, DefaultErrorDecoder, ErrorDecoder},
    errors::Error,
    route::{Invocation, Operation, Params},
    transport::{ReqwestTransport, Request, ResponseEnvelope, Transport},
};

/// How much of each exchange the client logs through `tracing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// No request logging.
    None,
    /// Request line, response status and elapsed time.
    #[default]
    Basic,
    /// `Basic` plus request and response headers.
    Headers,
    /// `Headers` plus the response body.
    Full,
}

/// Immutable client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL that route paths are appended to.
    pub base_url: String,
    /// Status codes decoded as success. Defaults to `200..=299`.
    pub success_statuses: RangeInclusive<u16>,
    pub log_level: LogLevel,
    /// Transport-level timeout per request. Defaults to 30 seconds.
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            success_statuses: 200..=299,
            log_level: LogLevel::default(),
            timeout: Duration::from_secs(30),
            user_agent: format!("routebind/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_success_statuses(mut self, statuses: RangeInclusive<u16>) -> Self {
        self.success_statuses = statuses;
        self
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

/// Cloneable cancellation signal shared between a caller and in-flight calls.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Per-call options. Dropping the call future also cancels it.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub deadline: Option<Instant>,
    pub cancel: Option<CancelToken>,
}

impl CallOptions {
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Client that resolves [`Operation`]s against a base URL, performs exactly
/// one exchange per call and routes the response to the success decoder or
/// the error decoder `D`.
///
/// Nothing is retried or cached.
pub struct Client<T = ReqwestTransport, D = DefaultErrorDecoder> {
    config: ClientConfig,
    base_url: Url,
    transport: T,
    error_decoder: D,
}

impl Client {
    /// Creates a client with the `reqwest` transport and no domain error shape.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Self::build(config, DefaultErrorDecoder)
    }
}

impl<D: ErrorDecoder> Client<ReqwestTransport, D> {
    /// Creates a client with the `reqwest` transport and the given error decoder.
    pub fn build(config: ClientConfig, error_decoder: D) -> Result<Self, Error<D::DomainError>> {
        let transport = ReqwestTransport::new(config.timeout, &config.user_agent)?;
        Self::from_parts(config, transport, error_decoder)
    }
}

impl<T: Transport, D: ErrorDecoder> Client<T, D> {
    /// Assembles a client from its parts. Fails with [`Error::InvalidUrl`]
    /// when the base URL does not parse or cannot carry a path.
    pub fn from_parts(
        config: ClientConfig,
        transport: T,
        error_decoder: D,
    ) -> Result<Self, Error<D::DomainError>> {
        let base_url = Url::parse(&config.base_url)
            .and_then(|url| {
                if url.cannot_be_a_base() {
                    Err(url::ParseError::RelativeUrlWithCannotBeABaseBase)
                } else {
                    Ok(url)
                }
            })
            .map_err(|source| {
                tracing::error!("Invalid base URL {}: {}", config.base_url, source);
                Error::InvalidUrl {
                    url: config.base_url.clone(),
                    source,
                }
            })?;
        Ok(Self {
            config,
            base_url,
            transport,
            error_decoder,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Calls `op` with `params` and no deadline.
    pub async fn call<R>(
        &self,
        op: &Operation<R>,
        params: &Params,
    ) -> Result<R, Error<D::DomainError>>
    where
        R: DeserializeOwned,
    {
        self.call_with(op, params, &CallOptions::default()).await
    }

    /// Calls `op` with `params`, honoring the deadline and cancel token in `options`.
    pub async fn call_with<R>(
        &self,
        op: &Operation<R>,
        params: &Params,
        options: &CallOptions,
    ) -> Result<R, Error<D::DomainError>>
    where
        R: DeserializeOwned,
    {
        let invocation = op.route().bind(params).map_err(|e| {
            tracing::error!("{}", e);
            e
        })?;
        let url = self.resolve(&invocation)?;
        let request = Request {
            method: invocation.method(),
            url,
            headers: vec![("accept".to_string(), "application/json".to_string())],
        };

        let key = invocation.method_key();
        self.log_request(key, &request);
        let started = Instant::now();
        let response = self.exchange(request, options).await?;
        self.log_response(key, &response, started.elapsed());

        if self.config.success_statuses.contains(&response.status) {
            match op.empty_value() {
                Some(empty) if response.has_empty_body() => Ok(empty),
                _ => decode_body(&response),
            }
        } else {
            Err(decode_error(&self.error_decoder, key, response))
        }
    }

    fn resolve(&self, invocation: &Invocation) -> Result<Url, Error<D::DomainError>> {
        invocation.resolve(&self.base_url).map_err(|source| {
            tracing::error!("Invalid URL constructed from {}: {}", self.base_url, source);
            Error::InvalidUrl {
                url: self.base_url.to_string(),
                source,
            }
        })
    }

    async fn exchange(
        &self,
        request: Request,
        options: &CallOptions,
    ) -> Result<ResponseEnvelope, Error<D::DomainError>> {
        let cancelled = async {
            match &options.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let deadline = async {
            match options.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => {
                tracing::warn!("Call cancelled before a response arrived");
                Err(Error::Cancelled)
            }
            _ = deadline => {
                tracing::warn!("Deadline exceeded before a response arrived");
                Err(Error::DeadlineExceeded)
            }
            result = self.transport.execute(request) => result.map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::Transport(e)
            }),
        }
    }

    fn log_request(&self, key: &str, request: &Request) {
        if self.config.log_level == LogLevel::None {
            return;
        }
        tracing::info!("[{}] ---> {} {}", key, request.method, request.url);
        if self.config.log_level >= LogLevel::Headers {
            for (name, value) in &request.headers {
                tracing::info!("[{}] {}: {}", key, name, value);
            }
        }
    }

    fn log_response(&self, key: &str, response: &ResponseEnvelope, elapsed: Duration) {
        if self.config.log_level == LogLevel::None {
            return;
        }
        tracing::info!(
            "[{}] <--- {} ({}ms)",
            key,
            response.status,
            elapsed.as_millis()
        );
        if self.config.log_level >= LogLevel::Headers {
            for (name, value) in &response.headers {
                tracing::info!("[{}] {}: {}", key, name, value);
            }
        }
        if self.config.log_level == LogLevel::Full {
            tracing::info!("[{}] {}", key, truncate_body(&response.body_text()));
            tracing::info!("[{}] <--- END HTTP ({}-byte body)", key, response.body.len());
        }
    }
}
