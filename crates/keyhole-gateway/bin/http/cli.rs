use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "KEYHOLE_GATEWAY_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "KEYHOLE_GATEWAY_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "KEYHOLE_GATEWAY_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "KEYHOLE_GATEWAY_MYSQL_DSN";
pub const REDIS_URL_ENV: &str = "KEYHOLE_GATEWAY_REDIS_URL";
pub const API_KEYS_ENV: &str = "KEYHOLE_GATEWAY_API_KEYS";
pub const CACHE_TTL_SECS_ENV: &str = "KEYHOLE_GATEWAY_CACHE_TTL_SECS";
pub const OTLP_ENDPOINT_ENV: &str = "KEYHOLE_GATEWAY_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "https://example.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "keyhole-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public prefix under which short URLs are formed.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    /// Redis cache endpoint; an in-process cache is used when absent.
    #[arg(long, env = REDIS_URL_ENV)]
    pub redis_url: Option<String>,

    /// Comma-separated `key=user` pairs authorized to shorten URLs.
    #[arg(long, env = API_KEYS_ENV)]
    pub api_keys: String,

    /// TTL for in-process cache entries, in seconds.
    #[arg(long, env = CACHE_TTL_SECS_ENV, default_value_t = 600)]
    pub cache_ttl_secs: u64,

    /// OTLP collector endpoint for span export, e.g. `http://localhost:4317`.
    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}
