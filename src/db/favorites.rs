// src/db/favorites.rs
use crate::errors::ServerError;
use rusqlite::{params, Connection};

/// Program ids are stored in their display form so any program source works.
pub fn is_favorite(conn: &Connection, user_id: i64, program_id: &str) -> Result<bool, ServerError> {
    conn.query_row(
        "select exists(select 1 from favorites where user_id = ? and program_id = ?)",
        params![user_id, program_id],
        |r| r.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("favorite lookup failed: {e}")))
}

pub fn add_favorite(
    conn: &Connection,
    user_id: i64,
    program_id: &str,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert or ignore into favorites (user_id, program_id, created_at) values (?, ?, ?)",
        params![user_id, program_id, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert favorite failed: {e}")))?;
    Ok(())
}

pub fn remove_favorite(conn: &Connection, user_id: i64, program_id: &str) -> Result<(), ServerError> {
    conn.execute(
        "delete from favorites where user_id = ? and program_id = ?",
        params![user_id, program_id],
    )
    .map_err(|e| ServerError::DbError(format!("delete favorite failed: {e}")))?;
    Ok(())
}

/// Adds the favorite if absent, removes it if present.
/// Returns whether the program is a favorite afterwards.
pub fn toggle_favorite(
    conn: &Connection,
    user_id: i64,
    program_id: &str,
    now: i64,
) -> Result<bool, ServerError> {
    if is_favorite(conn, user_id, program_id)? {
        remove_favorite(conn, user_id, program_id)?;
        Ok(false)
    } else {
        add_favorite(conn, user_id, program_id, now)?;
        Ok(true)
    }
}

/// Most recently favorited first.
pub fn list_favorite_ids(conn: &Connection, user_id: i64) -> Result<Vec<String>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select program_id from favorites where user_id = ? order by created_at desc, rowid desc",
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![user_id], |r| r.get::<_, String>(0))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}
