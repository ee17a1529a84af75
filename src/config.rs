use crate::metrics::DEFAULT_DEPTH;
use std::{env, path::PathBuf};
use thiserror::Error;

const TOKEN_VARS: &[&str] = &["API_TOKEN", "GHE_API_TOKEN"];
const HOSTNAME_VARS: &[&str] = &["API_HOSTNAME", "GHE_HOSTNAME"];
const DEPTH_VAR: &str = "METRICS_DEPTH";
const ORG_LIST_VAR: &str = "ORG_LIST";
const CONCURRENCY_VAR: &str = "METRICS_CONCURRENCY";

const PUBLIC_ENDPOINT: &str = "https://api.github.com/graphql";

const MAX_DEPTH: u8 = 100;
const DEFAULT_CONCURRENCY: usize = 100;

const DEFAULT_OUTPUT_DIR: &str = "./data/orgmetrics";
const DEFAULT_OUTPUT_FILE: &str = "./data/orgmetrics.json";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("API_TOKEN is required")]
    MissingToken,
    #[error("METRICS_DEPTH must be an integer between 1 and 100, got {0:?}")]
    InvalidDepth(String),
    #[error("METRICS_CONCURRENCY must be a positive integer, got {0:?}")]
    InvalidConcurrency(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub hostname: Option<String>,
    pub depth: u8,
    pub org_list: Option<Vec<String>>,
    pub concurrency: usize,
    pub output_dir: PathBuf,
    pub output_file: PathBuf,
}

impl Config {
    pub fn load() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let first_of = |keys: &[&str]| keys.iter().find_map(|key| lookup(*key));

        let token = first_of(TOKEN_VARS).ok_or(ConfigError::MissingToken)?;
        let hostname = first_of(HOSTNAME_VARS).map(|host| host.trim().to_owned());

        let depth = match lookup(DEPTH_VAR) {
            Some(raw) => match raw.trim().parse::<u8>() {
                Ok(depth) if (1..=MAX_DEPTH).contains(&depth) => depth,
                _ => return Err(ConfigError::InvalidDepth(raw)),
            },
            None => DEFAULT_DEPTH,
        };

        let concurrency = match lookup(CONCURRENCY_VAR) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(concurrency) if concurrency > 0 => concurrency,
                _ => return Err(ConfigError::InvalidConcurrency(raw)),
            },
            None => DEFAULT_CONCURRENCY,
        };

        let org_list = lookup(ORG_LIST_VAR)
            .map(|raw| parse_org_list(&raw))
            .filter(|orgs| !orgs.is_empty());

        Ok(Config {
            token,
            hostname,
            depth,
            org_list,
            concurrency,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
        })
    }

    pub fn endpoint(&self) -> String {
        match &self.hostname {
            Some(host) => format!("https://{}/api/graphql", host),
            None => PUBLIC_ENDPOINT.to_owned(),
        }
    }
}

fn parse_org_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|org| !org.is_empty())
        .map(str::to_owned)
        .collect()
}
