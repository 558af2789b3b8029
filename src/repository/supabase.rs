// src/repository/supabase.rs
use super::ProgramRepository;
use crate::config::SupabaseConfig;
use crate::domain::normalize::{normalize_all, DocumentRow, RawProgram};
use crate::domain::Program;
use crate::errors::ServerError;
use reqwest::blocking::Client;
use std::time::Duration;

/// Reads `programs` joined with `organizations` over the PostgREST API.
pub struct SupabaseProgramRepository {
    client: Client,
    cfg: SupabaseConfig,
}

impl SupabaseProgramRepository {
    pub fn new(cfg: SupabaseConfig) -> Result<Self, ServerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ServerError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, cfg })
    }

    pub fn programs_url(&self) -> String {
        format!("{}/rest/v1/programs?select=*,organizations(*)", self.cfg.url)
    }
}

/// Decodes a PostgREST response body.
pub fn parse_documents(body: &str) -> Result<Vec<Program>, ServerError> {
    let rows: Vec<DocumentRow> = serde_json::from_str(body)
        .map_err(|e| ServerError::Upstream(format!("unexpected Supabase payload: {e}")))?;
    let raws: Vec<RawProgram> = rows.into_iter().map(RawProgram::Document).collect();
    Ok(normalize_all(&raws))
}

impl ProgramRepository for SupabaseProgramRepository {
    fn load_programs(&self) -> Result<Vec<Program>, ServerError> {
        let response = self
            .client
            .get(self.programs_url())
            .header("apikey", &self.cfg.anon_key)
            .header("Authorization", format!("Bearer {}", self.cfg.anon_key))
            .header("Accept", "application/json")
            .send()
            .map_err(|e| ServerError::Upstream(format!("Supabase request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ServerError::Upstream(format!("Supabase body read failed: {e}")))?;

        if !status.is_success() {
            return Err(ServerError::Upstream(format!("Supabase error: {status} - {body}")));
        }

        parse_documents(&body)
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}
