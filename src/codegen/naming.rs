//! Constant naming.
//!
//! Field names are turned into upper-snake-case suffixes and combined with the
//! caller's prefix (e.g. `PEX_DBFT` + `createdAt` -> `PEX_DBFT_FIELD_CREATED_AT`).

use heck::ToShoutySnakeCase;

/// Convert an identifier-style field name into an upper-snake-case suffix.
///
/// `createdAt` becomes `CREATED_AT`, `id` becomes `ID`. Digits stay attached
/// to the word they follow and already snake-cased input only changes case.
pub fn transliterate(name: &str) -> String {
    name.to_shouty_snake_case()
}

/// Name of the table-name constant (e.g. `PEX_DBFT` -> `PEX_DBFT_TABLE_NAME`)
pub fn table_constant_name(prefix: &str) -> String {
    format!("{}_TABLE_NAME", prefix)
}

/// Name of a per-field constant (e.g. `PEX_DBFT`, `title` -> `PEX_DBFT_FIELD_TITLE`)
pub fn field_constant_name(prefix: &str, field_name: &str) -> String {
    format!("{}_FIELD_{}", prefix, transliterate(field_name))
}
