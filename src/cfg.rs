use std::{env, str::FromStr, sync::OnceLock};

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_SW_SCRIPT: &str = "/sw.js";
pub const DEFAULT_SW_SCOPE: &str = "/";
pub const DEFAULT_APP_ROOT: &str = "/";
pub const DEFAULT_NOTIFY_HOURS: u32 = 24;
pub const DEFAULT_TITLE: &str = "通知";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origin of the HR server; every `/api/...` path is joined onto it.
    pub api_url: String,
    pub worker: WorkerConfig,
    pub notify_hours: u32,
}

/// Settings shared by the page side (registration) and the worker itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub script_url: String,
    pub scope: String,
    /// Window opened by a notification click when no client is open.
    pub app_root: String,
    /// Title used when a push payload carries none.
    pub default_title: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            script_url: DEFAULT_SW_SCRIPT.to_string(),
            scope: DEFAULT_SW_SCOPE.to_string(),
            app_root: DEFAULT_APP_ROOT.to_string(),
            default_title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            worker: WorkerConfig::default(),
            notify_hours: DEFAULT_NOTIFY_HOURS,
        }
    }
}

impl Config {
    /// Reads `HR_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let api_url = text("HR_API_URL", DEFAULT_API_URL);
        url::Url::parse(&api_url).with_context(|| format!("HR_API_URL is not a valid url: {api_url}"))?;

        Ok(Config {
            api_url,
            worker: WorkerConfig {
                script_url: text("HR_SW_SCRIPT", DEFAULT_SW_SCRIPT),
                scope: text("HR_SW_SCOPE", DEFAULT_SW_SCOPE),
                app_root: text("HR_APP_ROOT", DEFAULT_APP_ROOT),
                default_title: text("HR_DEFAULT_TITLE", DEFAULT_TITLE),
            },
            notify_hours: parse_or(&lookup, "HR_NOTIFY_HOURS", DEFAULT_NOTIFY_HOURS)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Loads `.env` (if any) and the process environment into the global config.
/// Later calls keep the first value.
pub fn init_config() -> Result<&'static Config> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}

/// Global config, or the defaults when `init_config` was never called.
#[inline]
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}
