// src/db/suggestions.rs
use crate::db::programs::insert_program;
use crate::domain::{CostCategory, Program, ProgramId};
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(SuggestionStatus::Pending),
            "approved" => Some(SuggestionStatus::Approved),
            "rejected" => Some(SuggestionStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a visitor submits through the suggestion form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSuggestion {
    pub program_name: String,
    pub organization_name: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub cost_category: Option<String>,
    pub location_state: Option<String>,
}

impl NewSuggestion {
    /// Trims every field; program and organization names are required.
    pub fn validated(self) -> Result<Self, ServerError> {
        let trim = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let program_name = self.program_name.trim().to_string();
        let organization_name = self.organization_name.trim().to_string();
        if program_name.is_empty() {
            return Err(ServerError::BadRequest("program name is required".into()));
        }
        if organization_name.is_empty() {
            return Err(ServerError::BadRequest("organization name is required".into()));
        }
        Ok(Self {
            program_name,
            organization_name,
            website: trim(self.website),
            description: trim(self.description),
            cost_category: trim(self.cost_category),
            location_state: trim(self.location_state),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub id: i64,
    pub submitted_by: Option<i64>,
    pub submitter_email: Option<String>,
    pub program_name: String,
    pub organization_name: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub cost_category: Option<String>,
    pub location_state: Option<String>,
    pub status: SuggestionStatus,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<i64>,
    pub program_id: Option<i64>,
    pub created_at: i64,
}

impl Suggestion {
    /// The program an approval publishes.
    pub fn to_program(&self) -> Program {
        let mut p = Program::new(ProgramId::Int(0), self.program_name.clone());
        p.organization_name = self.organization_name.clone();
        p.organization_website = self.website.clone();
        p.application_url = self.website.clone();
        p.description = self.description.clone();
        p.cost_category = self.cost_category.as_deref().map(CostCategory::parse);
        p.location_state = self.location_state.clone();
        p
    }
}

const SELECT_SUGGESTIONS: &str = r#"
    SELECT
      s.id, s.submitted_by, u.email, s.program_name, s.organization_name, s.website,
      s.description, s.cost_category, s.location_state, s.status, s.reviewed_by,
      s.reviewed_at, s.program_id, s.created_at
    FROM suggestions s
    LEFT JOIN users u ON u.id = s.submitted_by
"#;

fn suggestion_from_row(r: &Row<'_>) -> rusqlite::Result<Suggestion> {
    let status: String = r.get(9)?;
    Ok(Suggestion {
        id: r.get(0)?,
        submitted_by: r.get(1)?,
        submitter_email: r.get(2)?,
        program_name: r.get(3)?,
        organization_name: r.get(4)?,
        website: r.get(5)?,
        description: r.get(6)?,
        cost_category: r.get(7)?,
        location_state: r.get(8)?,
        // The check constraint keeps this column to the three known values.
        status: SuggestionStatus::parse(&status).unwrap_or(SuggestionStatus::Pending),
        reviewed_by: r.get(10)?,
        reviewed_at: r.get(11)?,
        program_id: r.get(12)?,
        created_at: r.get(13)?,
    })
}

pub fn insert_suggestion(
    conn: &Connection,
    submitted_by: Option<i64>,
    s: &NewSuggestion,
    now: i64,
) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        insert into suggestions (
          submitted_by, program_name, organization_name, website, description,
          cost_category, location_state, created_at
        ) values (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            submitted_by,
            s.program_name,
            s.organization_name,
            s.website,
            s.description,
            s.cost_category,
            s.location_state,
            now
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert suggestion failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_suggestion(conn: &Connection, id: i64) -> Result<Option<Suggestion>, ServerError> {
    conn.query_row(
        &format!("{SELECT_SUGGESTIONS} WHERE s.id = ?"),
        params![id],
        suggestion_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select suggestion failed: {e}")))
}

/// Oldest first, optionally restricted to one status.
pub fn list_suggestions(
    conn: &Connection,
    status: Option<SuggestionStatus>,
) -> Result<Vec<Suggestion>, ServerError> {
    let sql = format!(
        "{SELECT_SUGGESTIONS} WHERE (?1 IS NULL OR s.status = ?1) ORDER BY s.created_at, s.id"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![status.map(|s| s.as_str())], suggestion_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

fn pending_suggestion(conn: &Connection, id: i64) -> Result<Suggestion, ServerError> {
    let suggestion = get_suggestion(conn, id)?.ok_or(ServerError::NotFound)?;
    if suggestion.status != SuggestionStatus::Pending {
        return Err(ServerError::BadRequest(format!(
            "suggestion {id} was already {}",
            suggestion.status
        )));
    }
    Ok(suggestion)
}

/// Publishes the suggestion as a program and marks it approved, atomically.
/// Returns the new program id.
pub fn approve_suggestion(
    conn: &mut Connection,
    id: i64,
    reviewer_id: i64,
    now: i64,
) -> Result<i64, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let suggestion = pending_suggestion(&tx, id)?;
    let program_id = insert_program(&tx, &suggestion.to_program())?;

    tx.execute(
        r#"
        update suggestions
        set status = 'approved', reviewed_by = ?, reviewed_at = ?, program_id = ?
        where id = ? and status = 'pending'
        "#,
        params![reviewer_id, now, program_id, id],
    )
    .map_err(|e| ServerError::DbError(format!("approve suggestion failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit approval failed: {e}")))?;

    log::info!("suggestion {id} approved by user {reviewer_id} as program {program_id}");
    Ok(program_id)
}

pub fn reject_suggestion(
    conn: &Connection,
    id: i64,
    reviewer_id: i64,
    now: i64,
) -> Result<(), ServerError> {
    pending_suggestion(conn, id)?;
    conn.execute(
        r#"
        update suggestions
        set status = 'rejected', reviewed_by = ?, reviewed_at = ?
        where id = ? and status = 'pending'
        "#,
        params![reviewer_id, now, id],
    )
    .map_err(|e| ServerError::DbError(format!("reject suggestion failed: {e}")))?;

    log::info!("suggestion {id} rejected by user {reviewer_id}");
    Ok(())
}
