//! Care-service catalog: fields, categories and options.

use super::{parse_text_column, severity_column};
use crate::models::{CareServiceOption, CatalogOption, Category, Field};
use crate::ClassificationResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATALOG_SELECT: &str = "
    SELECT o.id, f.name, f.short, f.area, c.name, o.name, o.severity, o.description
    FROM care_service_options o
    JOIN fields f ON f.id = o.field_id
    JOIN categories c ON c.id = o.category_id";

fn map_catalog_row(row: &Row<'_>) -> rusqlite::Result<CatalogOption> {
    let area: String = row.get(3)?;
    Ok(CatalogOption {
        id: row.get(0)?,
        field_name: row.get(1)?,
        field_short: row.get(2)?,
        area: parse_text_column(3, &area)?,
        category_name: row.get(4)?,
        name: row.get(5)?,
        severity: severity_column(6, row.get(6)?)?,
        description: row.get(7)?,
    })
}

/// Every option with its field and category, ordered by field, category and id.
pub fn list_options(conn: &Connection) -> ClassificationResult<Vec<CatalogOption>> {
    let mut stmt = conn.prepare(&format!(
        "{CATALOG_SELECT} ORDER BY f.id, c.id, o.id"
    ))?;
    let rows = stmt.query_map([], map_catalog_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_option(conn: &Connection, id: i64) -> ClassificationResult<Option<CatalogOption>> {
    let option = conn
        .query_row(
            &format!("{CATALOG_SELECT} WHERE o.id = ?1"),
            [id],
            map_catalog_row,
        )
        .optional()?;
    Ok(option)
}

pub fn field_exists(conn: &Connection, id: i64) -> ClassificationResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM fields WHERE id = ?1", [id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

pub fn category_exists(conn: &Connection, id: i64) -> ClassificationResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM categories WHERE id = ?1", [id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}

pub fn upsert_field(conn: &Connection, field: &Field) -> ClassificationResult<()> {
    conn.execute(
        "INSERT INTO fields (id, name, short, area) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name, short = excluded.short, area = excluded.area",
        params![field.id, field.name, field.short, field.area.as_str()],
    )?;
    Ok(())
}

pub fn upsert_category(conn: &Connection, category: &Category) -> ClassificationResult<()> {
    conn.execute(
        "INSERT INTO categories (id, name) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name",
        params![category.id, category.name],
    )?;
    Ok(())
}

pub fn upsert_option(conn: &Connection, option: &CareServiceOption) -> ClassificationResult<()> {
    conn.execute(
        "INSERT INTO care_service_options (id, field_id, category_id, name, severity, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            field_id = excluded.field_id,
            category_id = excluded.category_id,
            name = excluded.name,
            severity = excluded.severity,
            description = excluded.description",
        params![
            option.id,
            option.field_id,
            option.category_id,
            option.name,
            option.severity.get(),
            option.description,
        ],
    )?;
    Ok(())
}
