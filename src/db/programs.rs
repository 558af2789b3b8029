// src/db/programs.rs
use crate::domain::normalize::{OrganizationRow, ProgramRow, RawProgram};
use crate::domain::Program;
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_PROGRAMS: &str = r#"
    SELECT
      p.id,
      p.program_name,
      p.description,
      p.subject_area,
      p.program_type,
      p.selectivity_percent,
      p.grade_level,
      p.cost_category,
      p.cost_amount,
      p.duration_weeks,
      p.location_city,
      p.location_state,
      p.application_deadline,
      p.start_date,
      p.end_date,
      p.delivery_method,
      p.housing_provided,
      p.financial_aid_available,
      p.application_url,
      o.id,
      o.name,
      o.website,
      o.city,
      o.state
    FROM programs p
    LEFT JOIN organizations o ON o.id = p.organization_id
    ORDER BY p.id
"#;

fn raw_from_row(row: &Row<'_>) -> rusqlite::Result<RawProgram> {
    let program = ProgramRow {
        id: row.get(0)?,
        program_name: row.get(1)?,
        description: row.get(2)?,
        subject_area: row.get(3)?,
        program_type: row.get(4)?,
        selectivity_percent: row.get(5)?,
        grade_level: row.get(6)?,
        cost_category: row.get(7)?,
        cost_amount: row.get(8)?,
        duration_weeks: row.get(9)?,
        location_city: row.get(10)?,
        location_state: row.get(11)?,
        application_deadline: row.get(12)?,
        start_date: row.get(13)?,
        end_date: row.get(14)?,
        delivery_method: row.get(15)?,
        housing_provided: row.get(16)?,
        financial_aid_available: row.get(17)?,
        application_url: row.get(18)?,
    };

    let org_id: Option<i64> = row.get(19)?;
    let organization = match org_id {
        Some(_) => Some(OrganizationRow {
            name: row.get(20)?,
            website: row.get(21)?,
            city: row.get(22)?,
            state: row.get(23)?,
        }),
        None => None,
    };

    Ok(RawProgram::Relational(program, organization))
}

/// All program rows with their joined organization, in id order.
pub fn load_program_rows(conn: &Connection) -> Result<Vec<RawProgram>, ServerError> {
    let mut stmt = conn
        .prepare(SELECT_PROGRAMS)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], raw_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

pub fn count_programs(conn: &Connection) -> Result<i64, ServerError> {
    conn.query_row("select count(*) from programs", [], |r| r.get(0))
        .map_err(|e| ServerError::DbError(format!("count programs failed: {e}")))
}

/// Find an organization by name (case-insensitive) or create it.
/// Missing website/city/state on an existing row are filled in, never overwritten.
pub fn get_or_create_organization(
    conn: &Connection,
    name: &str,
    website: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
) -> Result<i64, ServerError> {
    let existing: Option<i64> = conn
        .query_row(
            "select id from organizations where lower(name) = lower(?)",
            params![name],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select organization failed: {e}")))?;

    if let Some(id) = existing {
        conn.execute(
            r#"
            update organizations set
              website = coalesce(website, ?2),
              city    = coalesce(city, ?3),
              state   = coalesce(state, ?4)
            where id = ?1
            "#,
            params![id, website, city, state],
        )
        .map_err(|e| ServerError::DbError(format!("update organization failed: {e}")))?;
        return Ok(id);
    }

    conn.execute(
        "insert into organizations (name, website, city, state) values (?, ?, ?, ?)",
        params![name, website, city, state],
    )
    .map_err(|e| ServerError::DbError(format!("insert organization failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}

/// Stores a canonical program. Its id is not reused; SQLite assigns a new one.
pub fn insert_program(conn: &Connection, p: &Program) -> Result<i64, ServerError> {
    let org_id = get_or_create_organization(
        conn,
        &p.organization_name,
        p.organization_website.as_deref(),
        None,
        None,
    )?;

    conn.execute(
        r#"
        INSERT INTO programs (
          organization_id, program_name, description, subject_area, program_type,
          selectivity_percent, grade_level, cost_category, cost_amount, duration_weeks,
          location_city, location_state, application_deadline, start_date, end_date,
          delivery_method, housing_provided, financial_aid_available, application_url
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
        "#,
        params![
            org_id,
            p.program_name,
            p.description,
            p.subject_area,
            p.program_type,
            p.selectivity_percent.map(i64::from),
            p.grade_level.as_ref().map(|g| g.to_string()),
            p.cost_category.as_ref().map(|c| c.as_str().to_string()),
            p.cost_amount,
            p.duration_weeks.map(i64::from),
            p.location_city,
            p.location_state,
            p.application_deadline,
            p.start_date,
            p.end_date,
            p.delivery_method,
            p.housing_provided,
            p.financial_aid_available,
            p.application_url,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert program failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

/// Seeds an empty `programs` table in one transaction. Returns how many rows were written.
pub fn seed_programs(conn: &mut Connection, programs: &[Program]) -> Result<usize, ServerError> {
    if count_programs(conn)? > 0 {
        return Ok(0);
    }

    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    for p in programs {
        insert_program(&tx, p)?;
    }
    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit seed failed: {e}")))?;

    log::info!("seeded {} programs into sqlite", programs.len());
    Ok(programs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize::normalize_all;
    use crate::domain::{CostCategory, GradeLevel, ProgramId};

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("../../sql/schema.sql")).unwrap();
        conn
    }

    #[test]
    fn insert_then_load_round_trips_through_normalizer() {
        let conn = conn();
        let mut p = Program::new(ProgramId::Text("fixture-1".into()), "Summer Science");
        p.organization_name = "Science Org".into();
        p.organization_website = Some("https://science.example".into());
        p.grade_level = Some(GradeLevel::Grade(11));
        p.cost_category = Some(CostCategory::FreePlusStipend);
        p.housing_provided = Some(true);
        p.selectivity_percent = Some(9);

        let id = insert_program(&conn, &p).unwrap();
        let loaded = normalize_all(&load_program_rows(&conn).unwrap());

        assert_eq!(loaded.len(), 1);
        let got = &loaded[0];
        assert_eq!(got.id, ProgramId::Int(id));
        assert_eq!(got.organization_name, "Science Org");
        assert_eq!(got.organization_website.as_deref(), Some("https://science.example"));
        assert_eq!(got.grade_level, Some(GradeLevel::Grade(11)));
        assert_eq!(got.cost_category, Some(CostCategory::FreePlusStipend));
        assert_eq!(got.housing_provided, Some(true));
        assert_eq!(got.selectivity_percent, Some(9));
    }

    #[test]
    fn organizations_are_shared_case_insensitively() {
        let conn = conn();
        let a = get_or_create_organization(&conn, "Math Org", None, None, None).unwrap();
        let b = get_or_create_organization(&conn, "math org", Some("https://m.example"), None, None)
            .unwrap();
        assert_eq!(a, b);

        let website: Option<String> = conn
            .query_row("select website from organizations where id = ?", [a], |r| r.get(0))
            .unwrap();
        assert_eq!(website.as_deref(), Some("https://m.example"));
    }

    #[test]
    fn seed_only_fills_empty_table() {
        let mut conn = conn();
        let programs = vec![
            Program::new(ProgramId::Int(1), "One"),
            Program::new(ProgramId::Int(2), "Two"),
        ];
        assert_eq!(seed_programs(&mut conn, &programs).unwrap(), 2);
        assert_eq!(seed_programs(&mut conn, &programs).unwrap(), 0);
        assert_eq!(count_programs(&conn).unwrap(), 2);
    }

    #[test]
    fn rows_without_name_are_loaded_but_dropped_by_normalizer() {
        let conn = conn();
        conn.execute("insert into programs (program_name) values (null)", [])
            .unwrap();
        let raws = load_program_rows(&conn).unwrap();
        assert_eq!(raws.len(), 1);
        assert!(normalize_all(&raws).is_empty());
    }
}
