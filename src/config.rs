//! 配置模块 - 启动时一次性装配的进程配置
//!
//! 三个必需的密钥缺一不可，缺失属于启动期致命错误，
//! 不会进入轮询循环。
//!
//! 读取优先级（逐字段合并）：
//! 1. 配置文件 `~/.config/homework-status-monitor/config.json`
//!    （字段 `practicum_token`、`telegram_token`、`telegram_chat_id`，
//!    可选 `endpoint` 和 `poll_interval_secs`）
//! 2. 环境变量 `PRACTICUM_TOKEN` / `TELEGRAM_TOKEN` / `TELEGRAM_CHAT_ID`

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// 默认的作业状态 API 地址
pub const DEFAULT_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// 默认轮询间隔（秒）
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;

/// 进程配置
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Practicum API 令牌
    pub practicum_token: String,
    /// Telegram Bot 令牌
    pub telegram_token: String,
    /// 接收通知的 chat id
    pub telegram_chat_id: String,
    /// 作业状态 API 地址
    pub endpoint: String,
    /// 轮询间隔
    pub poll_interval: Duration,
}

/// 配置文件的原始形状（所有字段可缺省）
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    practicum_token: Option<String>,
    telegram_token: Option<String>,
    telegram_chat_id: Option<String>,
    endpoint: Option<String>,
    poll_interval_secs: Option<u64>,
}

impl MonitorConfig {
    /// 从配置文件和环境变量自动装配
    pub fn auto_load() -> Result<Self> {
        let file = Self::load_file_config();
        Self::resolve(file, |key| {
            std::env::var(key).ok().filter(|v| !v.is_empty())
        })
    }

    /// 读取配置文件（缺失或解析失败时退回空配置）
    fn load_file_config() -> FileConfig {
        let Some(home) = dirs::home_dir() else {
            return FileConfig::default();
        };
        let path = home.join(".config/homework-status-monitor/config.json");
        Self::read_file_config(&path)
    }

    fn read_file_config(path: &Path) -> FileConfig {
        if !path.exists() {
            return FileConfig::default();
        }
        match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str::<FileConfig>(&content).map_err(Into::into))
        {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded config file");
                config
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                FileConfig::default()
            }
        }
    }

    /// 逐字段合并：文件优先，环境变量补缺
    fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        let practicum_token = non_empty(file.practicum_token).or_else(|| env("PRACTICUM_TOKEN"));
        let telegram_token = non_empty(file.telegram_token).or_else(|| env("TELEGRAM_TOKEN"));
        let telegram_chat_id =
            non_empty(file.telegram_chat_id).or_else(|| env("TELEGRAM_CHAT_ID"));

        let mut missing = Vec::new();
        if practicum_token.is_none() {
            missing.push("PRACTICUM_TOKEN");
        }
        if telegram_token.is_none() {
            missing.push("TELEGRAM_TOKEN");
        }
        if telegram_chat_id.is_none() {
            missing.push("TELEGRAM_CHAT_ID");
        }
        let (Some(practicum_token), Some(telegram_token), Some(telegram_chat_id)) =
            (practicum_token, telegram_token, telegram_chat_id)
        else {
            return Err(anyhow!(
                "missing required secrets: {}. Set them in \
                 ~/.config/homework-status-monitor/config.json or as environment variables",
                missing.join(", ")
            ));
        };

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            endpoint: non_empty(file.endpoint).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            poll_interval: Duration::from_secs(
                file.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_none(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_from_file_only() {
        let file = FileConfig {
            practicum_token: Some("pt".to_string()),
            telegram_token: Some("tt".to_string()),
            telegram_chat_id: Some("42".to_string()),
            endpoint: None,
            poll_interval_secs: None,
        };
        let config = MonitorConfig::resolve(file, env_none).unwrap();

        assert_eq!(config.practicum_token, "pt");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.poll_interval, Duration::from_secs(600));
    }

    #[test]
    fn test_env_fills_missing_fields() {
        let file = FileConfig {
            practicum_token: Some("pt".to_string()),
            ..Default::default()
        };
        let config = MonitorConfig::resolve(file, |key| match key {
            "TELEGRAM_TOKEN" => Some("tt".to_string()),
            "TELEGRAM_CHAT_ID" => Some("42".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.practicum_token, "pt");
        assert_eq!(config.telegram_token, "tt");
    }

    #[test]
    fn test_file_beats_env() {
        let file = FileConfig {
            practicum_token: Some("from-file".to_string()),
            telegram_token: Some("tt".to_string()),
            telegram_chat_id: Some("42".to_string()),
            ..Default::default()
        };
        let config = MonitorConfig::resolve(file, |_| Some("from-env".to_string())).unwrap();
        assert_eq!(config.practicum_token, "from-file");
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let err = MonitorConfig::resolve(FileConfig::default(), env_none).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PRACTICUM_TOKEN"));
        assert!(message.contains("TELEGRAM_TOKEN"));
        assert!(message.contains("TELEGRAM_CHAT_ID"));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let file = FileConfig {
            practicum_token: Some(String::new()),
            telegram_token: Some("tt".to_string()),
            telegram_chat_id: Some("42".to_string()),
            ..Default::default()
        };
        assert!(MonitorConfig::resolve(file, env_none).is_err());
    }

    #[test]
    fn test_read_file_config_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"practicum_token": "pt", "telegram_token": "tt",
                "telegram_chat_id": "42", "poll_interval_secs": 30}}"#
        )
        .unwrap();

        let parsed = MonitorConfig::read_file_config(file.path());
        let config = MonitorConfig::resolve(parsed, env_none).unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_unreadable_file_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();

        let parsed = MonitorConfig::read_file_config(file.path());
        assert!(parsed.practicum_token.is_none());
    }
}
