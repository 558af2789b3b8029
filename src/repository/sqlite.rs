// src/repository/sqlite.rs
use super::ProgramRepository;
use crate::db::{programs, Database};
use crate::domain::normalize::normalize_all;
use crate::domain::Program;
use crate::errors::ServerError;

pub struct SqliteProgramRepository {
    db: Database,
}

impl SqliteProgramRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl ProgramRepository for SqliteProgramRepository {
    fn load_programs(&self) -> Result<Vec<Program>, ServerError> {
        let rows = self.db.with_conn(|conn| programs::load_program_rows(conn))?;
        Ok(normalize_all(&rows))
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
