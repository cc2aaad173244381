use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub media_root: PathBuf,
    pub session_ttl_days: i64,
    pub page_size: u64,
    pub min_password_len: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://reelvault.db?mode=rwc".to_string());

        let media_root: PathBuf =
            std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()).into();

        let session_ttl_days: i64 =
            std::env::var("SESSION_TTL_DAYS").ok().and_then(|s| s.parse().ok()).unwrap_or(14);

        let page_size: u64 =
            std::env::var("PAGE_SIZE").ok().and_then(|s| s.parse().ok()).unwrap_or(2);

        let min_password_len: usize =
            std::env::var("MIN_PASSWORD_LEN").ok().and_then(|s| s.parse().ok()).unwrap_or(8);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            media_root,
            session_ttl_days,
            page_size,
            min_password_len,
        })
    }
}
