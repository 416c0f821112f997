use std::collections::HashMap;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use crate::domain::OwnerSummary;
use crate::errors::ServerError;

/// Batched owner lookup for one page of results. Ids absent from the
/// users table simply don't appear in the map; the assembler nulls the
/// owner field for those rather than failing the page.
pub fn get_owner_summaries(
    conn: &Connection,
    ids: &[String],
) -> Result<HashMap<String, OwnerSummary>, ServerError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql =
        format!("SELECT id, display_name, avatar_url FROM users WHERE id IN ({placeholders})");

    let sql_params: Vec<Value> = ids.iter().map(|id| Value::from(id.clone())).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(sql_params), |row| {
        Ok(OwnerSummary {
            id: row.get(0)?,
            display_name: row.get(1)?,
            avatar_url: row.get(2)?,
        })
    })?;

    let mut map = HashMap::new();
    for row in rows {
        let owner = row?;
        map.insert(owner.id.clone(), owner);
    }
    Ok(map)
}
