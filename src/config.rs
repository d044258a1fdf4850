//! Startup configuration. The binary builds a [Config] from the command
//! line; the library only ever sees the resolved struct.

use clap::Parser;

/// Command-line arguments, in the same order the test suites pass them.
#[derive(Parser, Debug)]
#[command(name = "mock-rcon")]
#[command(version)]
#[command(about = "A mock Source RCON server", long_about = None)]
pub struct Cli {
    /// Port to listen on
    pub port: u16,

    /// Password expected in auth packets
    pub password: String,

    /// Host to bind to
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, default_value = "info")]
    pub log_level: log::LevelFilter,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub password: String,
    pub log_level: log::LevelFilter,
}

impl Config {
    pub fn new(port: u16, password: impl Into<String>) -> Self {
        Config {
            host: "localhost".to_string(),
            port,
            password: password.into(),
            log_level: log::LevelFilter::Info,
        }
    }

    /// Parse the process arguments.
    pub fn load() -> Self {
        Cli::parse().into()
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            host: cli.host,
            port: cli.port,
            password: cli.password,
            log_level: cli.log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_port_and_password() {
        let cli = Cli::try_parse_from(["mock-rcon", "27015", "secret"]).unwrap();
        let config = Config::from(cli);

        assert_eq!(config.port, 27015);
        assert_eq!(config.password, "secret");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.log_level, log::LevelFilter::Info);
        assert_eq!(config.addr(), "localhost:27015");
    }

    #[test]
    fn host_and_log_level_flags() {
        let cli = Cli::try_parse_from([
            "mock-rcon",
            "0",
            "pw",
            "--host",
            "0.0.0.0",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let config = Config::from(cli);

        assert_eq!(config.addr(), "0.0.0.0:0");
        assert_eq!(config.log_level, log::LevelFilter::Debug);
    }

    #[test]
    fn missing_password_is_rejected() {
        assert!(Cli::try_parse_from(["mock-rcon", "27015"]).is_err());
    }

    #[test]
    fn port_must_be_numeric() {
        assert!(Cli::try_parse_from(["mock-rcon", "rcon", "secret"]).is_err());
    }
}
