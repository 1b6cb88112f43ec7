//! 连接配置（RedisConfig）
//!
//! 支持三种来源：`RedisConfig::builder()` 显式构建、serde 反序列化（缺省字段取默认值）、
//! 以及 `RedisConfig::from_env()` 读取环境变量：
//! - `KEYFIELD_REDIS_URL`：完整连接串，优先级最高；
//! - `KEYFIELD_REDIS_HOST` / `KEYFIELD_REDIS_PORT` / `KEYFIELD_REDIS_DB`。
//!
use crate::error::{FieldError, FieldResult as Result};
use bon::Builder;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

pub const ENV_URL: &str = "KEYFIELD_REDIS_URL";
pub const ENV_HOST: &str = "KEYFIELD_REDIS_HOST";
pub const ENV_PORT: &str = "KEYFIELD_REDIS_PORT";
pub const ENV_DB: &str = "KEYFIELD_REDIS_DB";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 6379;

// URL userinfo 中只保留非保留字符
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// 完整连接串；设置后忽略其余连接字段
    #[builder(into)]
    pub url: Option<String>,
    #[builder(into, default = DEFAULT_HOST.to_string())]
    pub host: String,
    #[builder(default = DEFAULT_PORT)]
    pub port: u16,
    #[builder(default)]
    pub database: u32,
    #[builder(into)]
    pub username: Option<String>,
    #[builder(into)]
    pub password: Option<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RedisConfig {
    /// 渲染为 `redis://` 连接串；用户名与密码经过百分号编码
    pub fn url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        let encode = |s: &str| utf8_percent_encode(s, USERINFO).to_string();
        let username = self.username.as_deref().map(encode);
        let password = self.password.as_deref().map(encode);
        let auth = match (&username, &password) {
            (Some(user), Some(pass)) => format!("{user}:{pass}@"),
            (None, Some(pass)) => format!(":{pass}@"),
            (Some(user), None) => format!("{user}@"),
            (None, None) => String::new(),
        };

        format!(
            "redis://{auth}{}:{}/{}",
            self.host, self.port, self.database
        )
    }

    /// 从环境变量读取，未设置的项取默认值
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_URL) {
            if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                return Err(FieldError::config(format!(
                    "{ENV_URL} must start with redis:// or rediss://, got `{url}`"
                )));
            }
            config.url = Some(url);
            return Ok(config);
        }

        if let Some(host) = lookup(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = port
                .parse()
                .map_err(|e| FieldError::config(format!("{ENV_PORT}=`{port}`: {e}")))?;
        }
        if let Some(db) = lookup(ENV_DB) {
            config.database = db
                .parse()
                .map_err(|e| FieldError::config(format!("{ENV_DB}=`{db}`: {e}")))?;
        }

        Ok(config)
    }
}
