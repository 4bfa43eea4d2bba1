// Configuration module entry point
// Layered loading: config.toml file, environment variables, compiled-in defaults

mod types;

use std::net::SocketAddr;

pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, SiteConfig};

impl Config {
    /// Load configuration from "config.toml" next to the binary, if present.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension).
    ///
    /// The file is optional; environment variables prefixed with `FRESHSERVE`
    /// override it, and the defaults below fill in everything else.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("FRESHSERVE"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("site.root", ".")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "freshserve/0.1")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid listen address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn defaults_match_the_served_site() {
        let cfg = Config::load_from("freshserve-no-such-config").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.site.root, ".");
        assert_eq!(cfg.site.index_files, vec!["index.html", "index.htm"]);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert!(cfg.server.workers.is_none());
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn socket_addr_uses_host_and_port() {
        let cfg = Config::load_from("freshserve-no-such-config").unwrap();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn socket_addr_rejects_garbage_host() {
        let mut cfg = Config::load_from("freshserve-no-such-config").unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.socket_addr().is_err());
    }
}
