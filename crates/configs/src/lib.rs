use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
    #[serde(default)]
    pub views: ViewsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Largest accepted request body, which bounds feature-image uploads.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080, worker_threads: None, max_upload_mb: default_max_upload_mb() }
    }
}

/// Connection settings. Either `url` is given verbatim or it is assembled
/// from the individual parts (`dialect`, `host`, `port`, `name`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_dialect")]
    pub dialect: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            dialect: default_dialect(),
            name: String::new(),
            user: String::new(),
            password: String::new(),
            host: default_db_host(),
            port: None,
            ssl: false,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default = "default_cloudinary_base")]
    pub api_base: String,
    #[serde(default = "default_upload_timeout")]
    pub timeout_secs: u64,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            api_base: default_cloudinary_base(),
            timeout_secs: default_upload_timeout(),
        }
    }
}

impl CloudinaryConfig {
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.trim().is_empty()
            && !self.api_key.trim().is_empty()
            && !self.api_secret.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewsConfig {
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self { static_dir: default_static_dir() }
    }
}

fn default_dialect() -> String { "postgres".into() }
fn default_db_host() -> String { "localhost".into() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_cloudinary_base() -> String { "https://api.cloudinary.com".into() }
fn default_upload_timeout() -> u64 { 60 }
fn default_max_upload_mb() -> usize { 10 }
fn default_static_dir() -> String { "public".into() }

/// Path of the config file: `CONFIG_PATH` or `./config.toml`.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
    })
}

/// Like `load_from_file`, but a missing file yields the defaults.
/// Unreadable or malformed files are still errors.
pub fn load_from_file_or_default(path: &str) -> Result<AppConfig> {
    match load_from_file(path) {
        Ok(cfg) => Ok(cfg),
        Err(e) if is_not_found(&e) => Ok(AppConfig::default()),
        Err(e) => Err(e.context(format!("failed to load config file {path}"))),
    }
}

impl AppConfig {
    /// Load `config.toml` when present (defaults otherwise), apply environment
    /// overrides, then validate.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_with(&config_path(), |key| std::env::var(key).ok())
    }

    /// `load_and_validate` with an explicit file path and variable lookup.
    pub fn load_and_validate_with<F>(path: &str, get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // a missing file means defaults; a broken one is fatal
        let mut cfg = load_from_file_or_default(path)?;
        // environment wins over the file
        cfg.apply_env_with(get);
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from environment-style variables looked up through `get`.
    pub fn apply_env_with<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = get("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = get("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }

        let db = &mut self.database;
        if let Some(url) = get("DATABASE_URL") { db.url = url; }
        if let Some(v) = get("DB_DIALECT") { db.dialect = v; }
        if let Some(v) = get("DB_NAME") { db.name = v; }
        if let Some(v) = get("DB_USER") { db.user = v; }
        if let Some(v) = get("DB_PASSWORD") { db.password = v; }
        if let Some(v) = get("DB_HOST") { db.host = v; }
        if let Some(v) = get("DB_PORT").and_then(|p| p.parse::<u16>().ok()) { db.port = Some(v); }
        if let Some(v) = get("DB_SSL") { db.ssl = v.eq_ignore_ascii_case("require"); }

        let cloud = &mut self.cloudinary;
        if let Some(v) = get("CLOUD_NAME") { cloud.cloud_name = v; }
        if let Some(v) = get("CLOUD_API_KEY") { cloud.api_key = v; }
        if let Some(v) = get("CLOUD_API_SECRET") { cloud.api_secret = v; }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        if self.max_upload_mb == 0 {
            return Err(anyhow!("server.max_upload_mb must be >= 1"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    fn is_sqlite(&self) -> bool {
        self.dialect.eq_ignore_ascii_case("sqlite")
    }

    /// File backing a SQLite database, if any.
    pub fn sqlite_path(&self) -> Option<&str> {
        if !self.url.trim().is_empty() || !self.is_sqlite() {
            return None;
        }
        match self.name.trim() {
            "" | ":memory:" => None,
            path => Some(path),
        }
    }

    /// Connection URL understood by SeaORM.
    pub fn connection_url(&self) -> String {
        if !self.url.trim().is_empty() {
            return self.url.clone();
        }
        if self.is_sqlite() {
            return match self.sqlite_path() {
                None => "sqlite::memory:".to_string(),
                Some(path) => format!("sqlite://{path}?mode=rwc"),
            };
        }
        let credentials = match (self.user.is_empty(), self.password.is_empty()) {
            (true, _) => String::new(),
            (false, true) => format!("{}@", urlencoding::encode(&self.user)),
            (false, false) => format!(
                "{}:{}@",
                urlencoding::encode(&self.user),
                urlencoding::encode(&self.password)
            ),
        };
        let port = self.port.unwrap_or(5432);
        let mut url = format!("postgres://{credentials}{}:{port}/{}", self.host, self.name);
        if self.ssl {
            url.push_str("?sslmode=require");
        }
        url
    }

    pub fn validate(&self) -> Result<()> {
        let dialect = self.dialect.to_lowercase();
        if !matches!(dialect.as_str(), "postgres" | "postgresql" | "sqlite") {
            return Err(anyhow!("database.dialect must be postgres or sqlite, got {}", self.dialect));
        }
        if self.url.trim().is_empty() && !self.is_sqlite() && self.name.trim().is_empty() {
            return Err(anyhow!("database.name is empty; set it in config.toml or DB_NAME, or provide DATABASE_URL"));
        }
        let url = self.connection_url().to_lowercase();
        if !(url.starts_with("postgresql://") || url.starts_with("postgres://") || url.starts_with("sqlite:")) {
            return Err(anyhow!("database url must start with postgres://, postgresql:// or sqlite:"));
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
