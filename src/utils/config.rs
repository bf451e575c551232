use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Hauptkonfiguration für die Migration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_region")]
    pub aws_region: String,
    pub aws_access_key: Option<String>,
    pub aws_secret_key: Option<String>,
    /// Endpoint Override, z.B. DynamoDB Local
    pub dynamodb_endpoint: Option<String>,
    /// Endpoint Override, z.B. MinIO
    pub s3_endpoint: Option<String>,
    #[serde(default = "default_bucket")]
    pub s3_bucket: String,

    #[serde(default = "default_shock_nodes")]
    pub shock_nodes_table: String,
    #[serde(default = "default_shock_users")]
    pub shock_users_table: String,
    #[serde(default = "default_blobstore_nodes")]
    pub blobstore_nodes_table: String,
    #[serde(default = "default_blobstore_users")]
    pub blobstore_users_table: String,
    #[serde(default = "default_workspace_shock")]
    pub workspace_shock_table: String,
    #[serde(default = "default_workspace_s3")]
    pub workspace_s3_table: String,

    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
    #[serde(default)]
    pub log_json: bool,
    pub log_dir: Option<PathBuf>,
    pub metrics_file: Option<PathBuf>,
}

fn default_region() -> String {
    "us-west-1".to_string()
}

fn default_bucket() -> String {
    "blobstore".to_string()
}

fn default_shock_nodes() -> String {
    "Nodes".to_string()
}

fn default_shock_users() -> String {
    "Users".to_string()
}

fn default_blobstore_nodes() -> String {
    "nodes".to_string()
}

fn default_blobstore_users() -> String {
    "users".to_string()
}

fn default_workspace_shock() -> String {
    "shock_nodeMap".to_string()
}

fn default_workspace_s3() -> String {
    "s3_objects".to_string()
}

fn default_progress_interval() -> u64 {
    100
}

impl Config {
    /// Lade Config aus `.env`, optionaler TOML Datei und `MIGRATION_*` Variablen
    pub fn load(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config: Config = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("MIGRATION"))
            .build()
            .and_then(|c| c.try_deserialize())
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.progress_interval == 0 {
            bail!("progress_interval muss mindestens 1 sein");
        }
        if self.s3_bucket.is_empty() || self.s3_bucket.contains('.') {
            bail!("Ungültiger S3 Bucket Name: '{}'", self.s3_bucket);
        }
        if self.aws_access_key.is_some() != self.aws_secret_key.is_some() {
            bail!("aws_access_key und aws_secret_key müssen zusammen gesetzt werden");
        }
        Ok(())
    }
}
