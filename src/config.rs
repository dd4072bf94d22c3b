// src/config.rs
use clap::builder::BoolishValueParser;
use clap::Parser;
use std::time::Duration;

const DEFAULT_ADDRESS: &str = ":9112";
const DEFAULT_STATUS: &str = "/status";
const DEFAULT_SERVER: &str = ":27015";

/// A2S server monitoring: exposes a game server's A2S_INFO as JSON over HTTP.
///
/// Empty or blank values, from flags or the environment, count as unset and
/// fall back to the defaults.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about)]
pub struct Config {
    /// The address to listen on [default: :9112]
    #[clap(long, env = "A2SMON_ADDR")]
    pub address: Option<String>,

    /// The path to the server status [default: /status]
    #[clap(long, env = "A2SMON_STATUS")]
    pub status: Option<String>,

    /// The server address to monitor [default: :27015]
    #[clap(long, env = "A2SMON_SERVER")]
    pub server: Option<String>,

    /// Seconds to wait for each reply from the game server
    #[clap(long, env = "A2SMON_TIMEOUT", default_value = "3")]
    pub timeout: u64,

    /// Enable debug logging (accepts true/false, yes/no, on/off, 1/0)
    #[clap(long, env = "A2SMON_DEBUG", value_parser = BoolishValueParser::new())]
    pub debug: bool,
}

impl Config {
    /// `:9112` style addresses listen on every interface.
    pub fn bind_address(&self) -> String {
        with_default_host(or_default(&self.address, DEFAULT_ADDRESS), "0.0.0.0")
    }

    /// `:27015` style addresses point at the local machine.
    pub fn server_address(&self) -> String {
        with_default_host(or_default(&self.server, DEFAULT_SERVER), "127.0.0.1")
    }

    pub fn status_path(&self) -> String {
        let path = or_default(&self.status, DEFAULT_STATUS);
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

fn with_default_host(address: &str, host: &str) -> String {
    if address.starts_with(':') {
        format!("{}{}", host, address)
    } else {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    const VARS: [&str; 5] = [
        "A2SMON_ADDR",
        "A2SMON_STATUS",
        "A2SMON_SERVER",
        "A2SMON_TIMEOUT",
        "A2SMON_DEBUG",
    ];

    // The environment is process-wide; tests that read it take turns.
    static ENV: Mutex<()> = parking_lot::const_mutex(());

    fn parse_with_env(vars: &[(&str, &str)], args: &[&str]) -> Config {
        let _guard = ENV.lock();
        for var in VARS {
            std::env::remove_var(var);
        }
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        let config = Config::try_parse_from(std::iter::once("a2smon").chain(args.iter().copied()));
        for (key, _) in vars {
            std::env::remove_var(key);
        }
        config.unwrap()
    }

    #[test]
    fn defaults() {
        let config = parse_with_env(&[], &[]);
        assert_eq!(config.bind_address(), "0.0.0.0:9112");
        assert_eq!(config.server_address(), "127.0.0.1:27015");
        assert_eq!(config.status_path(), "/status");
        assert_eq!(config.query_timeout(), Duration::from_secs(3));
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn flags_override() {
        let config = parse_with_env(
            &[("A2SMON_SERVER", "10.9.9.9:1"), ("A2SMON_STATUS", "/other")],
            &[
                "--address",
                "127.0.0.1:8080",
                "--server",
                "10.0.0.5:27016",
                "--status",
                "metrics",
                "--timeout",
                "1",
                "--debug",
            ],
        );
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.server_address(), "10.0.0.5:27016");
        assert_eq!(config.status_path(), "/metrics");
        assert_eq!(config.query_timeout(), Duration::from_secs(1));
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn environment_values_are_used() {
        let config = parse_with_env(
            &[
                ("A2SMON_ADDR", ":8000"),
                ("A2SMON_SERVER", " 192.168.1.20:27015 "),
                ("A2SMON_STATUS", "/json"),
            ],
            &[],
        );
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.server_address(), "192.168.1.20:27015");
        assert_eq!(config.status_path(), "/json");
    }

    #[test]
    fn debug_env_accepts_common_spellings() {
        for value in ["1", "yes", "on", "true"] {
            let config = parse_with_env(&[("A2SMON_DEBUG", value)], &[]);
            assert_eq!(config.log_filter(), "debug", "A2SMON_DEBUG={}", value);
        }
        for value in ["0", "no", "off", "false"] {
            let config = parse_with_env(&[("A2SMON_DEBUG", value)], &[]);
            assert_eq!(config.log_filter(), "info", "A2SMON_DEBUG={}", value);
        }
    }

    #[test]
    fn blank_environment_values_fall_back_to_defaults() {
        let config = parse_with_env(
            &[("A2SMON_ADDR", ""), ("A2SMON_STATUS", ""), ("A2SMON_SERVER", "   ")],
            &[],
        );
        assert_eq!(config.bind_address(), "0.0.0.0:9112");
        assert_eq!(config.status_path(), "/status");
        assert_eq!(config.server_address(), "127.0.0.1:27015");
    }
}
