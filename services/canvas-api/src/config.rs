//! Service configuration from command-line flags and environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cleanup::SweepConfig;
use crate::service::ReservationPolicy;

/// Upper bound for every interval flag, one year in seconds.
pub const MAX_INTERVAL_SECS: u64 = 31_536_000;

/// Shared pixel canvas server
#[derive(Parser, Debug, Clone)]
#[command(name = "canvas-api")]
#[command(about = "Shared pixel canvas HTTP server")]
pub struct Config {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:1036", env = "CANVAS_LISTEN_ADDR")]
    pub listen: String,

    /// Palette document (JSON array of "#rrggbb" strings)
    #[arg(long, default_value = "color_list.json", env = "CANVAS_PALETTE")]
    pub palette: PathBuf,

    /// Directory holding canvas snapshots
    #[arg(long, default_value = "history", env = "CANVAS_HISTORY_DIR")]
    pub history_dir: PathBuf,

    /// Directory holding index.html
    #[arg(long, default_value = "static", env = "CANVAS_STATIC_DIR")]
    pub static_dir: PathBuf,

    /// Seconds an identity must wait between placements
    #[arg(
        long,
        default_value_t = 60,
        env = "CANVAS_COOLDOWN_SECS",
        value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_SECS)
    )]
    pub cooldown_secs: u64,

    /// Seconds between canvas snapshots
    #[arg(
        long,
        default_value_t = 7200,
        env = "CANVAS_SNAPSHOT_INTERVAL_SECS",
        value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_SECS)
    )]
    pub snapshot_interval_secs: u64,

    /// Seconds between cooldown table sweeps (0 disables the sweep)
    #[arg(
        long,
        default_value_t = 600,
        env = "CANVAS_SWEEP_INTERVAL_SECS",
        value_parser = clap::value_parser!(u64).range(0..=MAX_INTERVAL_SECS)
    )]
    pub sweep_interval_secs: u64,

    /// Whether a rejected placement still consumes the cooldown
    #[arg(
        long,
        value_enum,
        default_value_t = ReservationPolicy::ReserveFirst,
        env = "CANVAS_RESERVATION_POLICY"
    )]
    pub reservation_policy: ReservationPolicy,

    /// Peer addresses allowed to supply the forwarded identity header
    #[arg(
        long = "trusted-proxy",
        default_value = "127.0.0.1",
        env = "CANVAS_TRUSTED_PROXIES",
        value_delimiter = ','
    )]
    pub trusted_proxies: Vec<IpAddr>,

    /// Header carrying the client address when the peer is a trusted proxy
    #[arg(long, default_value = "Cf-Connecting-Ip", env = "CANVAS_FORWARDED_HEADER")]
    pub forwarded_header: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Number of worker threads
    #[arg(long, env = "CANVAS_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

impl Config {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .with_context(|| format!("Invalid listen address: {}", self.listen))
    }

    /// Interval accessors clamp to the ranges the parser enforces.
    pub fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(bounded_secs(self.cooldown_secs))
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.snapshot_interval_secs.clamp(1, MAX_INTERVAL_SECS))
    }

    /// Sweep settings; expired entries are kept for one extra cooldown.
    pub fn sweep(&self) -> SweepConfig {
        SweepConfig {
            enabled: self.sweep_interval_secs > 0,
            interval: Duration::from_secs(self.sweep_interval_secs.clamp(1, MAX_INTERVAL_SECS)),
            grace: self.cooldown(),
        }
    }
}

fn bounded_secs(secs: u64) -> i64 {
    i64::try_from(secs.clamp(1, MAX_INTERVAL_SECS)).unwrap_or(MAX_INTERVAL_SECS as i64)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:1036".to_string(),
            palette: PathBuf::from("color_list.json"),
            history_dir: PathBuf::from("history"),
            static_dir: PathBuf::from("static"),
            cooldown_secs: 60,
            snapshot_interval_secs: 7200,
            sweep_interval_secs: 600,
            reservation_policy: ReservationPolicy::ReserveFirst,
            trusted_proxies: vec![IpAddr::V4(Ipv4Addr::LOCALHOST)],
            forwarded_header: "Cf-Connecting-Ip".to_string(),
            log_level: "info".to_string(),
            worker_threads: None,
        }
    }
}
