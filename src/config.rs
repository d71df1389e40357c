use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub ai_model: String,
    pub image_service_url: String,
    pub ai_timeout_secs: u64,
    pub image_timeout_secs: u64,
    pub public_rps: u32,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            openai_api_key: get_env("OPENAI_API_KEY")?,
            openai_base_url: get_env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            ai_model: get_env_or("AI_MODEL", "gpt-4o"),
            image_service_url: get_env_or(
                "IMAGE_SERVICE_URL",
                "https://image.pollinations.ai/prompt",
            ),
            ai_timeout_secs: get_env_parse_or("AI_TIMEOUT_SECS", 120)?,
            image_timeout_secs: get_env_parse_or("IMAGE_TIMEOUT_SECS", 30)?,
            public_rps: get_env_parse_or("PUBLIC_RPS", 30)?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
