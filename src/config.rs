use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Where the site lives and how requests reach us.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Canonical public URL of the site, e.g. `https://example.com`.
    pub url: String,
    /// Development context: local origins are accepted in addition to `url`.
    #[serde(default)]
    pub dev_mode: bool,
    #[serde(default)]
    pub dev_origins: Vec<String>,
    /// Set when deployed behind a proxy that rewrites `x-forwarded-for` / `x-real-ip`.
    #[serde(default)]
    pub trusted_proxy: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window_seconds: u64,
    pub max_tracked_clients: usize,
    pub cleanup_interval_seconds: u64,
}

/// Switches for the optional stages of the submission gate.
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    pub honeypot: bool,
    pub business_email_only: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub site: SiteConfig,
    pub rate_limit: RateLimitConfig,
    pub gate: GateConfig,
    pub security: Option<SecurityConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        let defaults: &str = include_str!("../config/default.toml");
        match ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: formwacht.toml (in CWD)
        .add_source(::config::File::with_name("formwacht").required(false));

    if let Ok(custom_path) = std::env::var("FORMWACHT_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(
        ::config::Environment::with_prefix("FORMWACHT")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("site.dev_origins")
            .try_parsing(true),
    );

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub(crate) fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    // Site
    let url = cfg.site.url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(anyhow::anyhow!("site.url must be an absolute http(s) URL, got {:?}", cfg.site.url));
    }
    let host = url.trim_start_matches("https://").trim_start_matches("http://").trim_end_matches('/');
    if host.is_empty() {
        return Err(anyhow::anyhow!("site.url has no host: {:?}", cfg.site.url));
    }

    // Rate limit
    if cfg.rate_limit.max_requests == 0 {
        return Err(anyhow::anyhow!("rate_limit.max_requests must be > 0"));
    }
    if cfg.rate_limit.window_seconds == 0 {
        return Err(anyhow::anyhow!("rate_limit.window_seconds must be > 0"));
    }
    if cfg.rate_limit.max_tracked_clients == 0 {
        return Err(anyhow::anyhow!("rate_limit.max_tracked_clients must be > 0"));
    }
    if cfg.rate_limit.cleanup_interval_seconds == 0 {
        return Err(anyhow::anyhow!("rate_limit.cleanup_interval_seconds must be > 0"));
    }

    if cfg.site.dev_mode {
        tracing::warn!("Development mode enabled - local origins are accepted: {:?}", cfg.site.dev_origins);
    }

    Ok(())
}

pub fn ensure_sqlite_parent_dir(url: &str) -> anyhow::Result<()> {
    if let Some(path) = url.strip_prefix("sqlite://") {
        // On Windows, handle URLs like sqlite:///C:/... by stripping the leading '/'
        #[cfg(windows)]
        let path = {
            let bytes = path.as_bytes();
            if bytes.len() >= 3 && bytes[0] == b'/' && bytes[2] == b':' && bytes[1].is_ascii_alphabetic() {
                &path[1..]
            } else {
                path
            }
        };
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
