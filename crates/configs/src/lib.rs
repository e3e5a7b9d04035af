use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8081, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

const SUPPORTED_SCHEMES: [&str; 3] = ["postgresql://", "postgres://", "sqlite:"];

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// `Ok(None)` only when the file does not exist. Unreadable or malformed files are errors.
pub fn load_from_file_if_exists(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).map(Some).map_err(|e| anyhow!("{path}: {e}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!("{path}: {e}")),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// The file at `CONFIG_PATH` if present, otherwise the environment. Validated either way.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file_if_exists(path)? {
            Some(cfg) => cfg,
            None => Self::from_env()?,
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `SERVER_HOST`, `SERVER_PORT` and `TOKIO_WORKER_THREADS`.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            cfg.server.port = port.parse().map_err(|e| anyhow!("SERVER_PORT={port}: {e}"))?;
        }
        if let Ok(threads) = std::env::var("TOKIO_WORKER_THREADS") {
            let threads = threads.parse().map_err(|e| anyhow!("TOKIO_WORKER_THREADS={threads}: {e}"))?;
            cfg.server.worker_threads = Some(threads);
        }
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        // an empty url is taken from DATABASE_URL
        self.database.normalize_from_env();
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or via DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !SUPPORTED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() -> Result<()> {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            worker_threads = 2

            [database]
            url = "postgres://u:p@localhost:5432/book"
            max_connections = 5
            min_connections = 1
            "#,
        )?;
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.acquire_timeout_secs, 30);
        Ok(())
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() -> Result<()> {
        let cfg = parse("")?;
        assert_eq!(cfg.server.port, 8081);
        assert!(cfg.database.url.is_empty());
        assert_eq!(cfg.database.min_connections, 2);
        Ok(())
    }

    #[test]
    fn normalize_fills_blank_host_and_zero_threads() -> Result<()> {
        let mut cfg = AppConfig::default();
        cfg.server.host = "  ".into();
        cfg.server.worker_threads = Some(0);
        cfg.database.url = "sqlite::memory:".into();
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        Ok(())
    }

    #[test]
    fn validate_rejects_bad_database_settings() {
        let mut db = DatabaseConfig { url: "mysql://localhost/book".into(), ..Default::default() };
        assert!(db.validate().is_err());

        db.url = "sqlite::memory:".into();
        assert!(db.validate().is_ok());

        db.min_connections = 0;
        assert!(db.validate().is_err());

        db.min_connections = 5;
        db.max_connections = 2;
        assert!(db.validate().is_err());

        db.max_connections = 5;
        db.acquire_timeout_secs = 0;
        assert!(db.validate().is_err());
    }

    fn scratch_file(name: &str, content: &str) -> Result<std::path::PathBuf> {
        let path = std::env::temp_dir().join(format!("book-configs-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, content)?;
        Ok(path)
    }

    #[test]
    fn absent_file_is_not_an_error() -> Result<()> {
        let path = std::env::temp_dir().join("book-configs-does-not-exist.toml");
        assert!(load_from_file_if_exists(&path.to_string_lossy())?.is_none());
        Ok(())
    }

    #[test]
    fn present_file_is_loaded_and_validated() -> Result<()> {
        let path = scratch_file("valid", "[server]\nhost = \"0.0.0.0\"\nport = 9000\n\n[database]\nurl = \"sqlite::memory:\"\n")?;
        let cfg = AppConfig::load_or_env_from(&path.to_string_lossy());
        std::fs::remove_file(&path)?;
        let cfg = cfg?;
        assert_eq!((cfg.server.host.as_str(), cfg.server.port), ("0.0.0.0", 9000));
        assert_eq!(cfg.database.url, "sqlite::memory:");
        Ok(())
    }

    #[test]
    fn invalid_file_is_reported_instead_of_replaced_by_env() -> Result<()> {
        let bad_scheme = scratch_file("bad-scheme", "[database]\nurl = \"mysql://localhost/book\"\n")?;
        let bad_toml = scratch_file("bad-toml", "[server\nport = \"x\"\n")?;
        let scheme_res = AppConfig::load_or_env_from(&bad_scheme.to_string_lossy());
        let toml_res = AppConfig::load_or_env_from(&bad_toml.to_string_lossy());
        std::fs::remove_file(&bad_scheme)?;
        std::fs::remove_file(&bad_toml)?;
        assert!(scheme_res.is_err());
        assert!(toml_res.is_err());
        Ok(())
    }

    #[test]
    fn validate_rejects_zero_port() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        cfg.database.url = "sqlite::memory:".into();
        assert!(cfg.normalize_and_validate().is_err());
    }
}
