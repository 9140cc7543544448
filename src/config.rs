use anyhow::Context;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum AdminAuthMode {
    SharedSecret,
    HashedToken,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub model_dir: PathBuf,
    pub data_dir: PathBuf,

    pub admin_auth_mode: AdminAuthMode,
    pub admin_passcode: Option<String>,
    pub admin_token_sha256: Option<String>,
    pub admin_log_limit: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let admin_auth_mode = match env::var("ADMIN_AUTH_MODE")
            .unwrap_or_else(|_| "shared_secret".into())
            .as_str()
        {
            "shared_secret" => AdminAuthMode::SharedSecret,
            "hashed_token" => AdminAuthMode::HashedToken,
            other => anyhow::bail!("ADMIN_AUTH_MODE must be shared_secret or hashed_token, got {other}"),
        };

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .context("PORT must be a number")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),

            model_dir: env::var("MODEL_DIR")
                .unwrap_or_else(|_| "models".into())
                .into(),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".into()).into(),

            admin_auth_mode,
            admin_passcode: env::var("ADMIN_PASSCODE").ok().filter(|s| !s.is_empty()),
            admin_token_sha256: env::var("ADMIN_TOKEN_SHA256")
                .ok()
                .filter(|s| !s.is_empty()),
            admin_log_limit: env::var("ADMIN_LOG_LIMIT")
                .unwrap_or_else(|_| "100".into())
                .parse()
                .unwrap_or(100),
        };

        match config.admin_auth_mode {
            AdminAuthMode::SharedSecret if config.admin_passcode.is_none() => {
                anyhow::bail!("ADMIN_PASSCODE must be set when ADMIN_AUTH_MODE=shared_secret")
            }
            AdminAuthMode::HashedToken if config.admin_token_sha256.is_none() => {
                anyhow::bail!("ADMIN_TOKEN_SHA256 must be set when ADMIN_AUTH_MODE=hashed_token")
            }
            _ => {}
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn prediction_log_path(&self) -> PathBuf {
        self.data_dir.join("user_logs.csv")
    }

    pub fn mood_log_path(&self) -> PathBuf {
        self.data_dir.join("mood_logs.csv")
    }
}
