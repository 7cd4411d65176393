use std::{path::PathBuf, time::Duration};

use clap::Parser;
use kurdmed_core::domain::common::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_IDENTITY_BASE_URL, IdentityConfig,
    KurdMedConfig, LLMConfig, StorageConfig,
};

use crate::application::http::server::device_sessions::SessionLimits;

#[derive(Debug, Clone, Parser)]
#[command(name = "kurdmed-api", version, about = "KurdMed medication identification API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub identity: IdentityArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,

    /// Prefix of every route, e.g. `/api`.
    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LlmArgs {
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", default_value = "")]
    pub gemini_api_key: String,

    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    #[arg(long = "gemini-base-url", env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct IdentityArgs {
    #[arg(long = "firebase-api-key", env = "FIREBASE_API_KEY", default_value = "")]
    pub firebase_api_key: String,

    #[arg(
        long = "firebase-base-url",
        env = "FIREBASE_BASE_URL",
        default_value = DEFAULT_IDENTITY_BASE_URL
    )]
    pub firebase_base_url: String,

    /// Minutes a signed-in device may stay idle before its session token expires.
    #[arg(long = "session-idle-minutes", env = "SESSION_IDLE_MINUTES", default_value_t = 720)]
    pub session_idle_minutes: u64,

    /// Signed-in devices kept at once; the least recently used is dropped first.
    #[arg(long = "max-sessions", env = "MAX_SESSIONS", default_value_t = 10_000)]
    pub max_sessions: usize,
}

impl IdentityArgs {
    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            idle_ttl: Duration::from_secs(self.session_idle_minutes.saturating_mul(60)),
            max_sessions: self.max_sessions,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct StorageArgs {
    /// Directory with `en.json` and `ku.json`; bundled translations otherwise.
    #[arg(long = "locales-dir", env = "LOCALES_DIR")]
    pub locales_dir: Option<PathBuf>,

    /// JSON file for device preferences; kept in memory otherwise.
    #[arg(long = "preferences-path", env = "PREFERENCES_PATH")]
    pub preferences_path: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl From<Args> for KurdMedConfig {
    fn from(args: Args) -> Self {
        Self {
            llm: LLMConfig {
                gemini_api_key: args.llm.gemini_api_key,
                gemini_model: args.llm.gemini_model,
                gemini_base_url: args.llm.gemini_base_url,
            },
            identity: IdentityConfig {
                firebase_api_key: args.identity.firebase_api_key,
                firebase_base_url: args.identity.firebase_base_url,
            },
            storage: StorageConfig {
                locales_dir: args.storage.locales_dir,
                preferences_path: args.storage.preferences_path,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_into_config() {
        let args = Args::parse_from([
            "kurdmed-api",
            "--gemini-api-key",
            "g-key",
            "--gemini-base-url",
            "http://127.0.0.1:8080",
            "--firebase-api-key",
            "f-key",
            "--allowed-origins",
            "http://a.test,http://b.test",
        ]);
        assert_eq!(args.server.allowed_origins.len(), 2);

        let config = KurdMedConfig::from(args);
        assert_eq!(config.llm.gemini_api_key, "g-key");
        assert_eq!(config.llm.gemini_base_url, "http://127.0.0.1:8080");
        assert_eq!(config.llm.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.identity.firebase_api_key, "f-key");
        assert!(config.storage.preferences_path.is_none());
    }

    #[test]
    fn test_session_limits() {
        let args = Args::parse_from([
            "kurdmed-api",
            "--session-idle-minutes",
            "30",
            "--max-sessions",
            "50",
        ]);

        let limits = args.identity.session_limits();
        assert_eq!(limits.idle_ttl, Duration::from_secs(1800));
        assert_eq!(limits.max_sessions, 50);
    }
}
