use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Working directory for downloads staged on local disk
    pub local_path: PathBuf,
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub path_style: bool,
}

/// Only used by the local relay server; Lambda ignores it.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Values are taken as-is: an empty bucket or path is not rejected here
    /// and only fails once the storage call is made.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            storage: StorageConfig {
                local_path: PathBuf::from(env::var("LOCAL_PATH").unwrap_or_default()),
                bucket: env::var("S3_BUCKET_NAME").unwrap_or_default(),
                region: env::var("AWS_REGION").unwrap_or_default(),
                endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
                path_style: env::var("S3_PATH_STYLE")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()?,
            },
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
            },
        })
    }
}

/// True when the process is running inside the Lambda execution environment.
pub fn running_in_lambda() -> bool {
    env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok()
}
