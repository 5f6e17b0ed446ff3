use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SshConfig {
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self { port: 22, user: "root".to_string(), password: String::new() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PingConfig {
    pub interval: u64,
    pub timeout: u64,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self { interval: 5, timeout: 2 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RetryConfig {
    pub round_interval: u64,
    pub ssh_attempts_per_round: u32,
    pub ssh_attempt_interval: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { round_interval: 30, ssh_attempts_per_round: 4, ssh_attempt_interval: 5 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_addr: String,
    pub to_addrs: Vec<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_addr: String::new(),
            to_addrs: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NotificationConfig {
    pub enabled: bool,
    /// 事件白名单：start / ip_success / complete 均受此掩码约束
    pub notify_on: Vec<String>,
    pub email: Option<EmailConfig>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            notify_on: vec!["start".to_string(), "complete".to_string()],
            email: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub ssh: SshConfig,
    #[serde(default)]
    pub ping: PingConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
}

impl Config {
    /// 从 `<config_dir>/config.json` 加载配置；文件缺失或解析失败时写回默认配置。
    pub fn load_or_init(config_dir: &Path) -> anyhow::Result<Self> {
        let path = config_dir.join("config.json");
        match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Config>(&text) {
                Ok(cfg) => Ok(cfg),
                Err(e) => {
                    tracing::warn!("config.json 解析失败，使用默认配置: {}", e);
                    let cfg = Config::default();
                    cfg.save_to(&path)?;
                    Ok(cfg)
                }
            },
            Err(_) => {
                let cfg = Config::default();
                std::fs::create_dir_all(config_dir)?;
                cfg.save_to(&path)?;
                Ok(cfg)
            }
        }
    }

    fn save_to(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_materializes_expected_fields() {
        let cfg = Config::default();
        assert_eq!(cfg.ssh.port, 22);
        assert_eq!(cfg.ping.interval, 5);
        assert_eq!(cfg.retry.ssh_attempts_per_round, 4);
        assert!(!cfg.notification.enabled);
        assert_eq!(cfg.notification.notify_on, vec!["start", "complete"]);
    }

    #[test]
    fn load_or_init_writes_default_when_absent() {
        let dir = std::env::temp_dir().join(format!("bmt_cfg_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let cfg = Config::load_or_init(&dir).unwrap();
        assert_eq!(cfg.ssh.user, "root");
        assert!(dir.join("config.json").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
