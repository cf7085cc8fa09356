//! Client construction and service accessors

use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};
use crate::runtime::config::{
    DEFAULT_BASE_URL, DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW, ENV_API_KEY, ENV_BASE_URL,
    ENV_SECRET_KEY,
};
use crate::runtime::{Api, PollPolicy, RateLimiter, TaskWaiter};
use crate::services::account::AccountService;
use crate::services::acl::AclService;
use crate::services::cloud_accounts::CloudAccountService;
use crate::services::databases::DatabaseService;
use crate::services::fixed::FixedService;
use crate::services::private_link::PrivateLinkService;
use crate::services::private_service_connect::PrivateServiceConnectService;
use crate::services::subscriptions::SubscriptionService;
use crate::services::tasks::TaskService;
use crate::services::transit_gateways::TransitGatewayService;
use crate::services::ServiceCore;
use crate::transport::{
    user_agent, Credentials, SigningTransport, TracingWireLogger, Transporter, WireLogger,
};

/// Builder for [`Client`]
///
/// Nothing here reads the environment unless [`from_env`](Self::from_env)
/// is called, so a fully explicit configuration is deterministic.
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    transporter: Option<Arc<dyn Transporter>>,
    wire_logger: Option<Arc<dyn WireLogger>>,
    log_requests: bool,
    additional_user_agent: Vec<String>,
    rate_limit: Option<(u32, Duration)>,
    poll_policy: Option<PollPolicy>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("custom_transporter", &self.transporter.is_some())
            .field("log_requests", &self.log_requests)
            .field("additional_user_agent", &self.additional_user_agent)
            .field("rate_limit", &self.rate_limit)
            .field("poll_policy", &self.poll_policy)
            .finish()
    }
}

impl ClientBuilder {
    /// Start from the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API endpoint (default [`DEFAULT_BASE_URL`])
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key and secret key
    pub fn auth(mut self, api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(api_key, secret_key));
        self
    }

    /// Replace the lower HTTP layer, e.g. with a scripted transport
    pub fn transporter(mut self, transporter: Arc<dyn Transporter>) -> Self {
        self.transporter = Some(transporter);
        self
    }

    /// Sink for the request transcript; only used with [`log_requests`](Self::log_requests)
    pub fn wire_logger(mut self, logger: Arc<dyn WireLogger>) -> Self {
        self.wire_logger = Some(logger);
        self
    }

    /// Record a redacted transcript of every request and response
    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    /// Append a product token to the `User-Agent`
    pub fn additional_user_agent(mut self, suffix: impl Into<String>) -> Self {
        self.additional_user_agent.push(suffix.into());
        self
    }

    /// Client-side fixed-window limit (default 400 per minute)
    ///
    /// Both `limit` and `window` must be non-zero; [`build`](Self::build)
    /// rejects anything else.
    pub fn rate_limit(mut self, limit: u32, window: Duration) -> Self {
        self.rate_limit = Some((limit, window));
        self
    }

    /// Task polling behaviour
    pub fn poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = Some(policy);
        self
    }

    /// Fill unset credentials and base URL from `REDISCLOUD_API_KEY`,
    /// `REDISCLOUD_SECRET_KEY` and `REDISCLOUD_URL`
    pub fn from_env(mut self) -> Self {
        if self.base_url.is_none() {
            self.base_url = std::env::var(ENV_BASE_URL).ok().filter(|v| !v.is_empty());
        }
        if self.credentials.is_none() {
            if let (Ok(key), Ok(secret)) =
                (std::env::var(ENV_API_KEY), std::env::var(ENV_SECRET_KEY))
            {
                self.credentials = Some(Credentials::new(key, secret));
            }
        }
        self
    }

    /// Validate the configuration and build the client
    ///
    /// # Errors
    /// [`Error::Configuration`] for a malformed base URL, missing
    /// credentials or credentials that are not valid header values.
    pub fn build(self) -> Result<Client> {
        let raw_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw_url)
            .map_err(|e| Error::Configuration(format!("invalid base url {raw_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "invalid base url {raw_url}: scheme must be http or https"
            )));
        }

        let credentials = self.credentials.ok_or_else(|| {
            Error::Configuration(format!(
                "missing credentials: call auth() or set {ENV_API_KEY} and {ENV_SECRET_KEY}"
            ))
        })?;

        let transporter: Arc<dyn Transporter> = match self.transporter {
            Some(t) => t,
            None => Arc::new(reqwest::Client::builder().build().map_err(|e| {
                Error::Configuration(format!("failed to build HTTP client: {e}"))
            })?),
        };

        let logger = self.log_requests.then(|| {
            self.wire_logger
                .unwrap_or_else(|| Arc::new(TracingWireLogger) as Arc<dyn WireLogger>)
        });

        let agent = user_agent(&self.additional_user_agent);
        let transport = SigningTransport::new(transporter, &credentials, &agent, logger)?;

        let (limit, window) = self
            .rate_limit
            .unwrap_or((DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW));
        if limit == 0 || window.is_zero() {
            return Err(Error::Configuration(format!(
                "invalid rate limit {limit} per {window:?}: limit and window must be non-zero"
            )));
        }
        let policy = self.poll_policy.unwrap_or_default();

        debug!(
            base_url = %base_url,
            user_agent = %agent,
            rate_limit = limit,
            rate_window_ms = window.as_millis() as u64,
            log_requests = self.log_requests,
            "Building Redis Cloud client"
        );

        let api = Api::new(base_url, transport, RateLimiter::new(limit, window));
        Ok(Client {
            core: ServiceCore::new(api, policy),
        })
    }
}

/// Redis Cloud API client
///
/// Cheap to clone; clones share the connection pool and rate limiter.
#[derive(Clone, Debug)]
pub struct Client {
    core: ServiceCore,
}

impl Client {
    /// A builder with default settings
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Build a client configured entirely from the environment
    pub fn from_env() -> Result<Self> {
        ClientBuilder::new().from_env().build()
    }

    /// A clone whose calls all observe `token`
    ///
    /// When the token fires, in-flight and future calls return
    /// [`Error::Cancelled`] promptly, including during rate-limit and poll
    /// sleeps.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        let api = self.core.api().with_cancellation(token);
        Self {
            core: ServiceCore::new(api, *self.core.tasks().policy()),
        }
    }

    /// The `User-Agent` sent with every request
    pub fn user_agent(&self) -> &str {
        self.core.api().transport().user_agent()
    }

    /// The underlying request executor
    pub fn api(&self) -> &Api {
        self.core.api()
    }

    /// The task poller
    pub fn task_waiter(&self) -> &TaskWaiter {
        self.core.tasks()
    }

    /// Task listing and lookup
    pub fn tasks(&self) -> TaskService {
        TaskService::new(self.core.clone())
    }

    /// Account-level lookups: payment methods, regions, modules, persistence options
    pub fn account(&self) -> AccountService {
        AccountService::new(self.core.clone())
    }

    /// Cloud provider accounts used by Pro subscriptions
    pub fn cloud_accounts(&self) -> CloudAccountService {
        CloudAccountService::new(self.core.clone())
    }

    /// Pro subscriptions and their networking, pricing and maintenance settings
    pub fn subscriptions(&self) -> SubscriptionService {
        SubscriptionService::new(self.core.clone())
    }

    /// Databases of Pro subscriptions
    pub fn databases(&self) -> DatabaseService {
        DatabaseService::new(self.core.clone())
    }

    /// ACL users, roles and Redis rules
    pub fn acl(&self) -> AclService {
        AclService::new(self.core.clone())
    }

    /// GCP Private Service Connect services and endpoints
    pub fn private_service_connect(&self) -> PrivateServiceConnectService {
        PrivateServiceConnectService::new(self.core.clone())
    }

    /// AWS PrivateLink configuration
    pub fn private_link(&self) -> PrivateLinkService {
        PrivateLinkService::new(self.core.clone())
    }

    /// AWS Transit Gateway attachments and invitations
    pub fn transit_gateways(&self) -> TransitGatewayService {
        TransitGatewayService::new(self.core.clone())
    }

    /// Fixed (Essentials) plans, subscriptions and databases
    pub fn fixed(&self) -> FixedService {
        FixedService::new(self.core.clone())
    }
}
