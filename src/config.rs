use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub auction_hours: i64,
    pub max_image_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let data_dir = env::var("DATA_DIR")
            .unwrap_or_else(|_| "data".to_string())
            .into();
        let upload_dir = env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads".to_string())
            .into();
        let auction_hours = env::var("AUCTION_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(24);
        let max_image_bytes = env::var("MAX_IMAGE_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(950 * 1024);
        Ok(Self {
            host,
            port,
            data_dir,
            upload_dir,
            auction_hours,
            max_image_bytes,
        })
    }
}
