use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub catalog: CatalogConfig,
    pub llm: LLMConfig,
    pub summaries: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// External catalog file; the bundled catalog is used when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub openai_api_key: String,
    pub provider: String,
    pub model: String,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    pub programs_dir: PathBuf,
    pub output_dir: PathBuf,
    pub aggregate_path: PathBuf,
    pub max_chars: usize,
    pub test_files: Vec<String>,
}

pub const DEFAULT_APP_NAME: &str = "Nederland 2029 API";
pub const DEFAULT_MAX_CHARS: usize = 30_000;

fn csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: csv_list(
                    &env::var("ALLOWED_ORIGINS")
                        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string()),
                ),
            },
            app: AppConfig {
                name: env::var("APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string()),
            },
            catalog: CatalogConfig {
                path: env::var("PARTY_CATALOG_PATH").ok().map(PathBuf::from),
            },
            llm: LLMConfig {
                openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                provider: env::var("SUMMARY_LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string()),
                model: env::var("SUMMARY_LLM_MODEL").unwrap_or_else(|_| "gpt-5-mini".to_string()),
                api_base: env::var("SUMMARY_LLM_API_BASE").ok(),
            },
            summaries: SummaryConfig {
                programs_dir: env::var("SUMMARY_PROGRAMS_DIR")
                    .unwrap_or_else(|_| "summaries/programs".to_string())
                    .into(),
                output_dir: env::var("SUMMARY_OUTPUT_DIR")
                    .unwrap_or_else(|_| "database".to_string())
                    .into(),
                aggregate_path: env::var("SUMMARY_AGGREGATE_PATH")
                    .unwrap_or_else(|_| "summaries/party_summaries.json".to_string())
                    .into(),
                max_chars: env::var("SUMMARY_MAX_CHARS")
                    .unwrap_or_else(|_| DEFAULT_MAX_CHARS.to_string())
                    .parse()
                    .context("SUMMARY_MAX_CHARS must be a positive integer")?,
                test_files: csv_list(
                    &env::var("SUMMARY_TEST_FILES").unwrap_or_else(|_| "sgp.pdf,pvv.pdf".to_string()),
                ),
            },
        })
    }
}
