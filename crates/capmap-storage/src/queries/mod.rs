//! Tenant-scoped query modules, one per table.

pub mod capabilities;
pub mod components;
pub mod domains;
pub mod effective_importance;
pub mod fit_scores;
pub mod importance;
pub mod pillars;
pub mod realizations;

use capmap_core::errors::StorageError;
use rusqlite::types::ToSql;
use rusqlite::MappedRows;

use crate::to_storage_err;

/// `?{start}, ?{start+1}, ...` for `count` positional parameters.
pub(crate) fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build a parameter list of a leading scalar followed by a slice of values.
pub(crate) fn leading_then<'a, T: ToSql>(first: &'a dyn ToSql, rest: &'a [T]) -> Vec<&'a dyn ToSql> {
    let mut params: Vec<&dyn ToSql> = Vec::with_capacity(rest.len() + 1);
    params.push(first);
    params.extend(rest.iter().map(|v| v as &dyn ToSql));
    params
}

/// Drain mapped rows into a Vec, converting row errors.
pub(crate) fn collect_rows<T, F>(rows: MappedRows<'_, F>) -> Result<Vec<T>, StorageError>
where
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(to_storage_err)?);
    }
    Ok(result)
}
