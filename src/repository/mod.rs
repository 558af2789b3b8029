// src/repository/mod.rs
//! Program sources. Handlers receive one of these instead of reaching for a global catalog.

pub mod fixture;
pub mod sqlite;
pub mod supabase;

pub use fixture::FixtureProgramRepository;
pub use sqlite::SqliteProgramRepository;
pub use supabase::SupabaseProgramRepository;

use crate::config::{Config, ProgramSource};
use crate::db::Database;
use crate::domain::Program;
use crate::errors::ServerError;

pub trait ProgramRepository: Send + Sync {
    /// Canonical programs in source order. Invalid records are already dropped.
    fn load_programs(&self) -> Result<Vec<Program>, ServerError>;

    fn name(&self) -> &'static str;
}

/// Tries `primary`, and serves the fixture when it fails.
pub struct FallbackProgramRepository {
    primary: Box<dyn ProgramRepository>,
    fallback: Box<dyn ProgramRepository>,
}

impl FallbackProgramRepository {
    pub fn new(primary: Box<dyn ProgramRepository>, fallback: Box<dyn ProgramRepository>) -> Self {
        Self { primary, fallback }
    }
}

impl ProgramRepository for FallbackProgramRepository {
    fn load_programs(&self) -> Result<Vec<Program>, ServerError> {
        match self.primary.load_programs() {
            Ok(programs) => Ok(programs),
            Err(e) => {
                log::warn!(
                    "{} source failed ({e}), serving {} instead",
                    self.primary.name(),
                    self.fallback.name()
                );
                self.fallback.load_programs()
            }
        }
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }
}

/// Picks the configured source. Remote and database sources fall back to the fixture file.
pub fn build_repository(
    cfg: &Config,
    db: Database,
) -> Result<Box<dyn ProgramRepository>, ServerError> {
    let fixture = FixtureProgramRepository::new(cfg.fixture_path.clone());

    let repo: Box<dyn ProgramRepository> = match cfg.source {
        ProgramSource::Fixture => Box::new(fixture),
        ProgramSource::Sqlite => Box::new(FallbackProgramRepository::new(
            Box::new(SqliteProgramRepository::new(db)),
            Box::new(fixture),
        )),
        ProgramSource::Supabase => {
            let supabase = cfg.supabase.clone().ok_or_else(|| {
                ServerError::Config("PROGRAMS_SOURCE=supabase needs SUPABASE_URL".into())
            })?;
            Box::new(FallbackProgramRepository::new(
                Box::new(SupabaseProgramRepository::new(supabase)?),
                Box::new(fixture),
            ))
        }
    };

    log::info!("program source: {}", repo.name());
    Ok(repo)
}
