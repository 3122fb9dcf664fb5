use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_events_file")]
    pub events_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            users_file: default_users_file(),
            events_file: default_events_file(),
        }
    }
}

fn default_data_dir() -> String { "data".to_string() }
fn default_users_file() -> String { "users.json".to_string() }
fn default_events_file() -> String { "events.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { min_password_len: default_min_password_len() }
    }
}

fn default_min_password_len() -> usize { 6 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 storage（支持从环境变量覆盖数据目录）
        self.storage.normalize_from_env();
        self.storage.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        // 环境变量提供的数据目录优先于 TOML
        if let Ok(dir) = std::env::var("DATA_DIR") {
            if !dir.trim().is_empty() {
                self.data_dir = dir;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir 不能为空"));
        }
        if self.users_file.trim().is_empty() || self.events_file.trim().is_empty() {
            return Err(anyhow!("storage.users_file / storage.events_file 不能为空"));
        }
        if self.users_file == self.events_file {
            return Err(anyhow!("storage.users_file 与 storage.events_file 不能指向同一文件"));
        }
        Ok(())
    }

    /// Path of the users document under the data directory.
    pub fn users_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(&self.users_file)
    }

    /// Path of the events document under the data directory.
    pub fn events_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(&self.events_file)
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_password_len == 0 {
            return Err(anyhow!("auth.min_password_len 必须 >= 1"));
        }
        Ok(())
    }
}
