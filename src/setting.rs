use crate::Result;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// number of threads config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Thread {
    /// number of http server threads
    pub http: usize,
}

/// network config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Network {
    /// server bind host
    pub host: String,
    /// server bind port
    pub port: u16,

    pub real_ip_header: Option<String>,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            real_ip_header: None,
        }
    }
}

/// auth config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Auth {
    /// access token secret
    pub access_secret: String,
    /// refresh token secret, independent of the access secret
    pub refresh_secret: String,

    /// jwt access token expiry in seconds
    pub access_token_expiry: usize,

    /// jwt refresh token expiry in seconds
    pub refresh_token_expiry: usize,

    pub issuer: String,
    pub audience: String,

    /// http-only cookie carrying the admin token
    pub cookie_name: String,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            access_secret: "test-access".to_owned(),
            refresh_secret: "test-refresh".to_owned(),
            access_token_expiry: 60 * 60,
            refresh_token_expiry: 7 * 24 * 60 * 60,
            issuer: "givebridge".to_owned(),
            audience: "givebridge-admin".to_owned(),
            cookie_name: "admin_token".to_owned(),
        }
    }
}

/// login rate limit config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RateLimit {
    /// failed attempts allowed per identifier within the window
    pub max_attempts: u32,
    /// rolling lockout window in seconds
    pub window_secs: u64,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_secs: 15 * 60,
        }
    }
}

/// payment gateway config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Razorpay {
    pub api_url: String,
    pub key_id: String,
    pub key_secret: String,
}

impl Default for Razorpay {
    fn default() -> Self {
        Self {
            api_url: razorpay_client::client::DEFAULT_API_URL.to_owned(),
            key_id: "".to_owned(),
            key_secret: "".to_owned(),
        }
    }
}

/// donation policy config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Donation {
    /// inclusive bounds, major currency units
    pub min_amount: i64,
    pub max_amount: i64,
    pub currency: String,
}

impl Default for Donation {
    fn default() -> Self {
        Self {
            min_amount: 1,
            max_amount: 1_000_000,
            currency: "INR".to_owned(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Setting {
    /// database url
    /// https://www.sea-ql.org/SeaORM/docs/install-and-config/connection/
    pub db_url: String,

    pub thread: Thread,
    pub network: Network,

    pub auth: Auth,
    pub rate_limit: RateLimit,
    pub razorpay: Razorpay,
    pub donation: Donation,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            db_url: "sqlite://givebridge.sqlite".to_string(),
            thread: Default::default(),
            network: Default::default(),
            auth: Default::default(),
            rate_limit: Default::default(),
            razorpay: Default::default(),
            donation: Default::default(),
        }
    }
}

impl Setting {
    /// read config from file and env
    pub fn read<P: AsRef<Path>>(file: P, env_prefix: Option<String>) -> Result<Self> {
        let builder = Config::builder();
        let mut config = builder
            // override with file contents
            .add_source(File::with_name(file.as_ref().to_str().unwrap()));
        if let Some(prefix) = env_prefix {
            config = config.add_source(Self::env_source(&prefix));
        }

        let config = config.build()?;
        let setting: Setting = config.try_deserialize()?;
        Ok(setting)
    }

    fn env_source(prefix: &str) -> Environment {
        Environment::with_prefix(prefix)
            .try_parsing(true)
            .prefix_separator("_")
            .separator("__")
    }

    /// read config from env
    pub fn from_env(env_prefix: String) -> Result<Self> {
        let mut config = Config::builder();
        config = config.add_source(Self::env_source(&env_prefix));

        let config = config.build()?;
        let setting: Setting = config.try_deserialize()?;
        Ok(setting)
    }

    /// config from str
    pub fn from_str(s: &str, format: FileFormat) -> Result<Self> {
        let builder = Config::builder();
        let config = builder.add_source(File::from_str(s, format)).build()?;
        let setting: Setting = config.try_deserialize()?;
        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use config::FileFormat;
    use std::fs;
    use tempfile::Builder;

    #[test]
    fn der() -> Result<()> {
        let json = r#"{
            "network": {"port": 1},
            "thread": {"http": 1},
            "donation": {"max_amount": 500}
        }"#;

        let mut def = Setting::default();
        def.network.port = 1;
        def.thread.http = 1;
        def.donation.max_amount = 500;

        let s2 = serde_json::from_str::<Setting>(json)?;
        let s1: Setting = Setting::from_str(json, FileFormat::Json)?;

        assert_eq!(def, s1);
        assert_eq!(def, s2);

        Ok(())
    }

    #[test]
    fn read() -> Result<()> {
        let setting = Setting::default();
        assert_eq!(setting.network.host, "127.0.0.1");
        assert_eq!(setting.rate_limit.max_attempts, 5);
        assert_eq!(setting.auth.access_token_expiry, 3600);

        let file = Builder::new()
            .prefix("givebridge-config-test-read")
            .suffix(".toml")
            .rand_bytes(0)
            .tempfile()?;

        let setting = Setting::read(&file, None)?;
        assert_eq!(setting.network.host, "127.0.0.1");
        fs::write(
            &file,
            r#"
        [network]
        host = "127.0.0.2"
        "#,
        )?;

        temp_env::with_vars(
            [
                ("GB_network.port", Some("1")),
                ("GB_network__host", Some("127.0.0.3")),
            ],
            || {
                let setting = Setting::read(&file, Some("GB".to_owned())).unwrap();
                assert_eq!(setting.network.host, "127.0.0.3".to_string());
                assert_eq!(setting.network.port, 1);
            },
        );
        Ok(())
    }
}
