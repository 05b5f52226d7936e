// ============================================================================
// Schema Synchronizer
// ============================================================================
//
// The `inquiries` table is declared here as data. On startup the live schema
// is reconciled with the declaration: the table is created when absent, any
// declared column missing from an existing table is added, and declared
// defaults and NOT NULL constraints are re-applied to columns that exist
// without them. Extra live columns are left alone; nothing is ever dropped.
//
// ============================================================================

use anyhow::{Context, Result};
use sqlx::PgPool;

pub const INQUIRY_TABLE: &str = "inquiries";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub not_null: bool,
    /// Server-side default expression, also used to backfill NULLs.
    pub default: Option<&'static str>,
}

impl ColumnDef {
    /// Full column definition as used in `CREATE TABLE` / `ADD COLUMN`.
    pub fn definition(&self) -> String {
        let mut definition = self.sql_type.to_string();
        if self.not_null {
            definition.push_str(" NOT NULL");
        }
        if let Some(default) = self.default {
            definition.push_str(" DEFAULT ");
            definition.push_str(default);
        }
        definition
    }
}

const fn required(name: &'static str, sql_type: &'static str) -> ColumnDef {
    ColumnDef { name, sql_type, not_null: true, default: None }
}

const fn defaulted(name: &'static str, sql_type: &'static str, default: &'static str) -> ColumnDef {
    ColumnDef { name, sql_type, not_null: true, default: Some(default) }
}

/// Declared columns, excluding the `id BIGSERIAL` primary key.
pub const INQUIRY_SCHEMA: &[ColumnDef] = &[
    required("car_id", "BIGINT"),
    required("buyer_id", "BIGINT"),
    required("seller_id", "BIGINT"),
    required("message", "TEXT"),
    ColumnDef { name: "preferred_time", sql_type: "TIMESTAMPTZ", not_null: false, default: None },
    defaulted("contact_phone", "VARCHAR(32)", "''"),
    defaulted("status", "VARCHAR(16)", "'new'"),
    defaulted("created_at", "TIMESTAMPTZ", "NOW()"),
    defaulted("updated_at", "TIMESTAMPTZ", "NOW()"),
];

const INDEXED_COLUMNS: &[&str] = &["car_id", "buyer_id", "seller_id"];

/// Statements that bring the live schema in line with `INQUIRY_SCHEMA`, in
/// execution order. Every statement is safe to re-run.
///
/// A table created by another tool may hold the declared columns without
/// their defaults, or with NULLs in them. Defaulted columns therefore get
/// their default re-applied, existing NULLs backfilled from it, and the
/// NOT NULL constraint set afterwards. Required columns without a default
/// are never backfilled.
pub fn schema_statements() -> Vec<String> {
    let columns = INQUIRY_SCHEMA
        .iter()
        .map(|c| format!("{} {}", c.name, c.definition()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut statements = vec![format!(
        "CREATE TABLE IF NOT EXISTS {} (id BIGSERIAL PRIMARY KEY, {})",
        INQUIRY_TABLE, columns
    )];

    statements.extend(INQUIRY_SCHEMA.iter().map(|c| {
        format!(
            "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}",
            INQUIRY_TABLE,
            c.name,
            c.definition()
        )
    }));

    for column in INQUIRY_SCHEMA {
        let Some(default) = column.default else {
            continue;
        };
        statements.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {}",
            INQUIRY_TABLE, column.name, default
        ));
        statements.push(format!(
            "UPDATE {table} SET {col} = {default} WHERE {col} IS NULL",
            table = INQUIRY_TABLE,
            col = column.name,
            default = default
        ));
        if column.not_null {
            statements.push(format!(
                "ALTER TABLE {} ALTER COLUMN {} SET NOT NULL",
                INQUIRY_TABLE, column.name
            ));
        }
    }

    statements.extend(INDEXED_COLUMNS.iter().map(|name| {
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_{col} ON {table} ({col})",
            table = INQUIRY_TABLE,
            col = name
        )
    }));

    statements
}

pub async fn sync_schema(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to open schema transaction")?;

    for statement in schema_statements() {
        tracing::debug!(%statement, "Applying schema statement");
        sqlx::query(&statement)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Schema statement failed: {}", statement))?;
    }

    tx.commit().await.context("Failed to commit schema changes")?;
    tracing::info!(table = INQUIRY_TABLE, columns = INQUIRY_SCHEMA.len(), "Schema synchronized");
    Ok(())
}
