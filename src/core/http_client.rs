use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::remote::RemoteError;

/// Connection-pool settings shared by the remote service clients.
///
/// `request_timeout_secs` is unset by default: remote calls wait as long as
/// the service takes to answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpPoolConfig {
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub tcp_keepalive_secs: Option<u64>,
    pub http2_enabled: bool,
}

impl Default for HttpPoolConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 10,
            pool_idle_timeout_secs: 90,
            request_timeout_secs: None,
            tcp_keepalive_secs: Some(60),
            http2_enabled: true,
        }
    }
}

fn apply_pool_options(
    mut builder: reqwest::ClientBuilder,
    config: &HttpPoolConfig,
) -> reqwest::ClientBuilder {
    builder = builder
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
        .tcp_keepalive(config.tcp_keepalive_secs.map(Duration::from_secs));

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if !config.http2_enabled {
        builder = builder.http1_only();
    }

    builder
}

pub fn build_http_client(config: &HttpPoolConfig) -> Result<reqwest::Client, RemoteError> {
    apply_pool_options(reqwest::Client::builder(), config)
        .build()
        .map_err(|e| RemoteError::Network(e.to_string()))
}
