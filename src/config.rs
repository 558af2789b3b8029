// src/config.rs
use crate::errors::ServerError;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Where the program catalog is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramSource {
    Sqlite,
    Supabase,
    Fixture,
}

impl ProgramSource {
    pub fn parse(raw: &str) -> Result<Self, ServerError> {
        match raw.trim().to_lowercase().as_str() {
            "sqlite" | "db" | "database" => Ok(ProgramSource::Sqlite),
            "supabase" => Ok(ProgramSource::Supabase),
            "fixture" | "json" | "static" => Ok(ProgramSource::Fixture),
            other => Err(ServerError::Config(format!(
                "unknown PROGRAMS_SOURCE '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub schema_path: PathBuf,
    pub source: ProgramSource,
    pub fixture_path: PathBuf,
    pub supabase: Option<SupabaseConfig>,
    pub max_workers: usize,
    pub page_size: usize,
    pub admin_emails: Vec<String>,
    pub seed_from_fixture: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_path: PathBuf::from("programs.sqlite3"),
            schema_path: PathBuf::from("sql/schema.sql"),
            source: ProgramSource::Sqlite,
            fixture_path: PathBuf::from("data/programs.json"),
            supabase: None,
            max_workers: 8,
            page_size: 20,
            admin_emails: Vec::new(),
            seed_from_fixture: true,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ServerError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ServerError::Config(format!("failed to read .env: {e}")));
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            cfg.bind_addr = addr
                .parse()
                .map_err(|e| ServerError::Config(format!("invalid BIND_ADDR '{addr}': {e}")))?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            cfg.database_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("SCHEMA_PATH") {
            cfg.schema_path = PathBuf::from(path);
        }
        if let Some(source) = lookup("PROGRAMS_SOURCE") {
            cfg.source = ProgramSource::parse(&source)?;
        }
        if let Some(path) = lookup("FIXTURE_PATH") {
            cfg.fixture_path = PathBuf::from(path);
        }
        if let Some(n) = lookup("MAX_WORKERS") {
            cfg.max_workers = parse_positive("MAX_WORKERS", &n)?;
        }
        if let Some(n) = lookup("PAGE_SIZE") {
            cfg.page_size = parse_positive("PAGE_SIZE", &n)?;
        }
        if let Some(list) = lookup("ADMIN_EMAILS") {
            cfg.admin_emails = list
                .split(',')
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(flag) = lookup("SEED_FROM_FIXTURE") {
            cfg.seed_from_fixture = parse_bool("SEED_FROM_FIXTURE", &flag)?;
        }

        cfg.supabase = match (lookup("SUPABASE_URL"), lookup("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) if !url.is_empty() => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            _ => None,
        };

        if cfg.source == ProgramSource::Supabase && cfg.supabase.is_none() {
            return Err(ServerError::Config(
                "PROGRAMS_SOURCE=supabase requires SUPABASE_URL and SUPABASE_ANON_KEY".into(),
            ));
        }

        Ok(cfg)
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<usize, ServerError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ServerError::Config(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ServerError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ServerError::Config(format!(
            "{key} must be a boolean, got '{raw}'"
        ))),
    }
}
