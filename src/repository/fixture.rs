// src/repository/fixture.rs
use super::ProgramRepository;
use crate::db::{programs, Database};
use crate::domain::normalize::{normalize_all, FixtureRecord, RawProgram};
use crate::domain::Program;
use crate::errors::ServerError;
use std::fs;
use std::path::PathBuf;

/// The static JSON array shipped with the app.
pub struct FixtureProgramRepository {
    path: PathBuf,
}

impl FixtureProgramRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_json_str(json: &str) -> Result<Vec<Program>, ServerError> {
        let records: Vec<FixtureRecord> = serde_json::from_str(json)
            .map_err(|e| ServerError::Config(format!("invalid program fixture: {e}")))?;
        let raws: Vec<RawProgram> = records.into_iter().map(RawProgram::Fixture).collect();
        Ok(normalize_all(&raws))
    }

    /// Copies the fixture into an empty `programs` table. A populated table is left alone.
    pub fn seed_sqlite(&self, db: &Database) -> Result<usize, ServerError> {
        let fixture = self.load_programs()?;
        db.with_conn(|conn| programs::seed_programs(conn, &fixture))
    }
}

impl ProgramRepository for FixtureProgramRepository {
    fn load_programs(&self) -> Result<Vec<Program>, ServerError> {
        let json = fs::read_to_string(&self.path).map_err(|e| {
            ServerError::Config(format!("failed to read {}: {e}", self.path.display()))
        })?;
        Self::from_json_str(&json)
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CostCategory, ProgramId};

    #[test]
    fn parses_and_drops_nameless_records() {
        let json = r#"[
            {"id": 1, "programName": "Math Camp", "organizationName": "MIT",
             "costCategory": "FREE", "selectivityPercent": "8%"},
            {"id": 2, "organizationName": "Nameless"}
        ]"#;
        let programs = FixtureProgramRepository::from_json_str(json).unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].id, ProgramId::Int(1));
        assert_eq!(programs[0].cost_category, Some(CostCategory::Free));
        assert_eq!(programs[0].selectivity_percent, Some(8));
    }

    #[test]
    fn malformed_fixture_is_a_server_side_error() {
        let err = FixtureProgramRepository::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{\"programName\": ").unwrap();
        let err = FixtureProgramRepository::new(&path).load_programs().unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn missing_file_is_an_error() {
        let repo = FixtureProgramRepository::new("does/not/exist.json");
        assert!(matches!(repo.load_programs(), Err(ServerError::Config(_))));
    }

    #[test]
    fn seeding_only_fills_an_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("seed.sqlite"));
        crate::db::init_db(&db, "sql/schema.sql").unwrap();

        let repo = FixtureProgramRepository::new("data/programs.json");
        let seeded = repo.seed_sqlite(&db).unwrap();
        assert_eq!(seeded, repo.load_programs().unwrap().len());
        assert_eq!(repo.seed_sqlite(&db).unwrap(), 0);
    }

    #[test]
    fn bundled_fixture_loads() {
        let programs = FixtureProgramRepository::new("data/programs.json")
            .load_programs()
            .unwrap();
        assert!(programs.len() >= 10);
    }
}
