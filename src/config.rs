use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "grantha")]
#[command(about = "Runs the grantha literature archive front end", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,

    /// Submit a search for this query after the initial load.
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,

    /// Navigate to this path after the initial load (e.g. /text/42).
    #[arg(long = "open")]
    pub open: Option<String>,

    /// Write the assembled page here instead of stdout.
    #[arg(short = 'o', long = "out")]
    pub out: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".grantha")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    api_base_url: String,
}

impl App {
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Supabase {
    pub url: String,
    pub anon_key: String,
}

impl Supabase {
    /// Credentials come from config or the environment, never from
    /// constants compiled into the page scripts.
    pub fn from_env() -> Result<Self> {
        let url = env::var("SUPABASE_URL").context("SUPABASE_URL not set")?;
        let anon_key = env::var("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY not set")?;
        if url.is_empty() || anon_key.is_empty() {
            bail!("supabase credentials are empty");
        }
        Ok(Supabase { url, anon_key })
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub app: App,
    #[serde(default)]
    pub supabase: Option<Supabase>,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        Ok(cfg)
    }

    /// Supabase section if present in the file, otherwise the environment.
    pub fn supabase(&self) -> Result<Supabase> {
        match &self.supabase {
            Some(s) => Ok(s.clone()),
            None => Supabase::from_env(),
        }
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        let yaml_with_env = Config::substitute_env_vars(&yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // Handle default values like ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!(var = var_name, "environment variable not found");
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}
