//! Registry client configuration.

use std::time::Duration;

/// Registry client configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Per-request timeout, applied to each server attempt
    /// independently of any deadline the caller imposes.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// How long idle pooled connections are kept alive.
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// User agent string.
    pub user_agent: String,
    /// Pre-built HTTP client to use instead of one constructed from the
    /// settings above. Lets callers instrument the transport (tracing
    /// middleware, proxies) without changing request semantics.
    pub http_client: Option<reqwest::Client>,
}

impl RegistryConfig {
    /// Create a configuration with the default timeouts.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 32,
            user_agent: format!("eureka-client/{}", env!("CARGO_PKG_VERSION")),
            http_client: None,
        }
    }

    /// Create a new configuration builder.
    pub fn builder() -> RegistryConfigBuilder {
        RegistryConfigBuilder::default()
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for registry client configuration.
#[derive(Debug)]
pub struct RegistryConfigBuilder {
    config: RegistryConfig,
}

impl Default for RegistryConfigBuilder {
    fn default() -> Self {
        Self {
            config: RegistryConfig::new(),
        }
    }
}

impl RegistryConfigBuilder {
    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the connection pool idle timeout.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Supply a pre-built HTTP client, overriding the transport
    /// settings above. The client should carry its own request timeout.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.config.http_client = Some(client);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> RegistryConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let config = RegistryConfig::new();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.http_client.is_none());
    }

    #[test]
    fn test_builder() {
        let config = RegistryConfig::builder()
            .timeout(Duration::from_secs(5))
            .user_agent("my-service/1.0")
            .build();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "my-service/1.0");
    }
}
