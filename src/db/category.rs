/// Category database queries.
use anyhow::Result;
use rusqlite::{Connection, Transaction};

use crate::types::Category;

pub fn query_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    let mut categories = Vec::new();
    for row in rows {
        categories.push(row?);
    }
    Ok(categories)
}

/// Replaces every stored category with `categories`.
pub fn replace_categories(categories: &[Category], tx: &Transaction) -> Result<()> {
    tx.execute("DELETE FROM categories", [])?;
    let mut stmt = tx.prepare("INSERT INTO categories (id, name) VALUES (?1, ?2)")?;
    for category in categories {
        stmt.execute((category.id, &category.name))?;
    }
    Ok(())
}
