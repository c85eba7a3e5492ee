//! Prometheus exporter for the process-wide `metrics` recorder.

use clap::Args;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::info;

/// Metrics server flags.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsArgs {
    /// Serve metrics over HTTP.
    #[arg(long = "metrics.enabled", env = "ARB_METRICS_ENABLED")]
    pub enabled: bool,
    /// Listen address of the metrics server.
    #[arg(long = "metrics.addr", default_value = "0.0.0.0", env = "ARB_METRICS_ADDR")]
    pub addr: IpAddr,
    /// Listen port of the metrics server.
    #[arg(long = "metrics.port", default_value = "9090", env = "ARB_METRICS_PORT")]
    pub port: u16,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 9090 }
    }
}

impl MetricsArgs {
    /// Starts the server if enabled. Must run inside a tokio runtime.
    pub fn init_metrics(&self) -> Result<(), BuildError> {
        if self.enabled {
            init_prometheus_server(self.addr, self.port)?;
        }
        Ok(())
    }
}

/// Installs the global Prometheus recorder and serves it on `addr:port`.
pub fn init_prometheus_server(addr: IpAddr, port: u16) -> Result<(), BuildError> {
    let listen_addr = SocketAddr::from((addr, port));
    PrometheusBuilder::new().with_http_listener(listen_addr).install()?;
    info!(target: "prometheus", %listen_addr, "Serving metrics");
    Ok(())
}
