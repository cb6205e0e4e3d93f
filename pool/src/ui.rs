//! Console output helpers, trimmed from `jiopad::ui` to what a pool daemon
//! needs: a startup banner, component-status lines, and a periodic summary.

use std::fmt;
use std::time::Duration;

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
    pub const BRIGHT_WHITE: &str = "\x1b[97m";
}

pub fn print_banner(version: &str, network: &str) {
    println!();
    println!("{}== JIO MINING POOL v{} =={}", colors::BRIGHT_CYAN, version, colors::RESET);
    println!("{}Network:{} {}", colors::BRIGHT_WHITE, colors::RESET, network);
    println!();
}

pub fn print_section(title: &str) {
    println!();
    println!("{}-- {} --{}", colors::DIM, title, colors::RESET);
}

pub fn print_kv(key: &str, value: &str) {
    println!("  {}{}:{} {}", colors::BRIGHT_WHITE, key, colors::RESET, value);
}

#[derive(Debug, Clone, Copy)]
pub enum StatusType {
    Success,
    Info,
    Warning,
    Error,
}

pub fn print_status(icon: &str, message: &str, status: StatusType) {
    let color = match status {
        StatusType::Success => colors::BRIGHT_GREEN,
        StatusType::Info => colors::BRIGHT_CYAN,
        StatusType::Warning => colors::BRIGHT_YELLOW,
        StatusType::Error => colors::BRIGHT_RED,
    };
    println!("{}[{}]{} {}", color, icon, colors::RESET, message);
}

#[derive(Debug, Clone, Copy)]
pub enum ComponentStatus {
    Starting,
    Running,
}

pub fn print_component_status(component: &str, status: ComponentStatus) {
    let (icon, color, text) = match status {
        ComponentStatus::Starting => ("...", colors::BRIGHT_YELLOW, "starting"),
        ComponentStatus::Running => ("ok", colors::BRIGHT_GREEN, "running"),
    };
    println!("  {}[{}]{} {:<20} {}", color, icon, colors::RESET, component, text);
}

pub fn print_config_summary(config: &crate::config::PoolConfig) {
    print_section("Configuration");
    print_kv("Network", &config.network.network_id);
    print_kv("Stratum listen", &config.stratum.listen_address);
    print_kv("Node RPC endpoint", &config.rpc.node_endpoint);
    print_kv("Data directory", config.storage.data_dir.to_str().unwrap_or("N/A"));
    print_kv("HTTP status API", if config.http.enabled { &format!("{}:{}", config.http.bind_address, config.http.port) } else { "disabled" });
}

pub fn format_hashrate(hashrate: f64) -> String {
    if hashrate >= 1e12 {
        format!("{:.2} TH/s", hashrate / 1e12)
    } else if hashrate >= 1e9 {
        format!("{:.2} GH/s", hashrate / 1e9)
    } else if hashrate >= 1e6 {
        format!("{:.2} MH/s", hashrate / 1e6)
    } else if hashrate >= 1e3 {
        format!("{:.2} KH/s", hashrate / 1e3)
    } else {
        format!("{:.2} H/s", hashrate)
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Periodic status line printed by `Daemon::run`'s background task.
pub struct PoolStatus {
    pub uptime: Duration,
    pub session_count: usize,
    pub pool_hashrate: f64,
    pub window_len: usize,
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[status]{} uptime={} sessions={} pool_hashrate={} pplns_window={}",
            colors::DIM,
            colors::RESET,
            format_duration(self.uptime),
            self.session_count,
            format_hashrate(self.pool_hashrate),
            self.window_len
        )
    }
}
