//! Production transport backed by `ureq`.

use std::io::Read;
use std::time::Duration;

use ureq::{Agent, Proxy};

use super::ArtifactTransport;
use crate::error::FetchError;

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default wait for the response status line and headers.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);
/// Default ceiling on receiving one whole response body.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(900);

/// Network settings for [`HttpTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    connect_timeout: Duration,
    read_timeout: Duration,
    download_timeout: Duration,
    use_env_proxy: bool,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            use_env_proxy: true,
        }
    }
}

impl TransportSettings {
    /// Overrides the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Overrides how long to wait for the response head once the request
    /// has been sent.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Overrides the limit on receiving a complete body. It bounds the
    /// whole transfer, so size it for the largest artifact on the slowest
    /// expected link.
    #[must_use]
    pub const fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Chooses whether proxies from `HTTP_PROXY`/`HTTPS_PROXY`/`ALL_PROXY`
    /// are honoured.
    #[must_use]
    pub const fn with_env_proxy(mut self, enabled: bool) -> Self {
        self.use_env_proxy = enabled;
        self
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the read timeout.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Returns the whole-body download limit.
    #[must_use]
    pub const fn download_timeout(&self) -> Duration {
        self.download_timeout
    }

    /// Reports whether environment proxies are honoured.
    #[must_use]
    pub const fn use_env_proxy(&self) -> bool {
        self.use_env_proxy
    }
}

/// Blocking HTTP transport.
///
/// Redirects are not followed and status codes are never turned into
/// errors by the agent; [`ArtifactTransport::open`] maps anything other
/// than `200` to [`FetchError::Status`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: Agent,
}

impl HttpTransport {
    /// Builds an agent from `settings`.
    #[must_use]
    pub fn new(settings: &TransportSettings) -> Self {
        let proxy = if settings.use_env_proxy() {
            Proxy::try_from_env()
        } else {
            None
        };
        let config = Agent::config_builder()
            .timeout_connect(Some(settings.connect_timeout()))
            .timeout_recv_response(Some(settings.read_timeout()))
            .timeout_recv_body(Some(settings.download_timeout()))
            .max_redirects(0)
            .http_status_as_error(false)
            .proxy(proxy)
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }
}

impl ArtifactTransport for HttpTransport {
    fn open(&self, url: &str) -> Result<Box<dyn Read + '_>, FetchError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|error| FetchError::Transport {
                url: url.to_owned(),
                message: error.to_string(),
            })?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status,
            });
        }
        Ok(Box::new(response.into_body().into_reader()))
    }
}
