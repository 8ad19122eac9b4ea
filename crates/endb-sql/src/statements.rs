//! Statement rendering.

use crate::dialect::Dialect;

/// The SQL text for every adapter operation, rendered for one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statements {
    /// `CREATE TABLE IF NOT EXISTS ...`
    pub create_table: String,
    /// Select the value for a key.
    pub select: String,
    /// Insert or replace one row.
    pub upsert: String,
    /// Delete one row.
    pub delete: String,
    /// Delete every row under a key prefix.
    pub clear: String,
    /// Select every row under a key prefix.
    pub select_all: String,
}

const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS {table} ({key} {key_type} PRIMARY KEY, {value} TEXT)";
const SELECT: &str = "SELECT {value} FROM {table} WHERE {key} = {p1}";
const DELETE: &str = "DELETE FROM {table} WHERE {key} = {p1}";
const CLEAR: &str = "DELETE FROM {table} WHERE {key} LIKE {p1} {escape}";
const SELECT_ALL: &str = "SELECT {key}, {value} FROM {table} WHERE {key} LIKE {p1} {escape}";

impl Statements {
    /// Render every statement for `dialect` against `table`.
    #[must_use]
    pub fn render(dialect: &Dialect, table: &str, key_size: usize) -> Self {
        let table = dialect.quote(table);
        let key = dialect.quote("key");
        let value = dialect.quote("value");
        let key_size = key_size.to_string();
        let key_type = fill_template(dialect.key_type, &[("key_size", &key_size)]);
        let p1 = dialect.placeholder(1);
        let p2 = dialect.placeholder(2);
        let vars: [(&str, &str); 8] = [
            ("table", &table),
            ("key", &key),
            ("value", &value),
            ("key_size", &key_size),
            ("key_type", &key_type),
            ("p1", &p1),
            ("p2", &p2),
            ("escape", dialect.like_escape),
        ];
        let fill = |template: &str| fill_template(template, &vars);

        Self {
            create_table: fill(CREATE_TABLE),
            select: fill(SELECT),
            upsert: fill(dialect.upsert),
            delete: fill(DELETE),
            clear: fill(CLEAR),
            select_all: fill(SELECT_ALL),
        }
    }
}

/// Replace each `{name}` in `template` with its value.
///
/// Substituted text is never rescanned, so quoted identifiers may contain
/// braces. Unknown names are left as written.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let (before, tail) = rest.split_at(open);
        out.push_str(before);
        let Some(close) = tail.find('}') else {
            out.push_str(tail);
            return out;
        };
        let name = tail.get(1..close).unwrap_or_default();
        match vars.iter().find(|(var, _)| *var == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(tail.get(..=close).unwrap_or_default()),
        }
        rest = tail.get(close.saturating_add(1)..).unwrap_or_default();
    }
    out.push_str(rest);
    out
}

/// The LIKE pattern matching every physical key that starts with `prefix`.
///
/// `\`, `%` and `_` are escaped; the statements declare `\` as the escape
/// character.
#[must_use]
pub fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len().saturating_add(1));
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MYSQL, POSTGRES, SQLITE};

    #[test]
    fn test_sqlite_statements() {
        let s = Statements::render(&SQLITE, "endb", 255);
        assert_eq!(
            s.create_table,
            "CREATE TABLE IF NOT EXISTS \"endb\" (\"key\" VARCHAR(255) PRIMARY KEY, \"value\" TEXT)"
        );
        assert_eq!(s.select, "SELECT \"value\" FROM \"endb\" WHERE \"key\" = ?");
        assert_eq!(
            s.upsert,
            "REPLACE INTO \"endb\" (\"key\", \"value\") VALUES (?, ?)"
        );
        assert_eq!(
            s.clear,
            "DELETE FROM \"endb\" WHERE \"key\" LIKE ? ESCAPE '\\'"
        );
    }

    #[test]
    fn test_mysql_statements() {
        let s = Statements::render(&MYSQL, "kv", 100);
        assert_eq!(
            s.create_table,
            "CREATE TABLE IF NOT EXISTS `kv` (`key` VARCHAR(100) CHARACTER SET utf8mb4 \
             COLLATE utf8mb4_bin PRIMARY KEY, `value` TEXT)"
        );
        assert_eq!(
            s.upsert,
            "INSERT INTO `kv` (`key`, `value`) VALUES (?, ?) \
             ON DUPLICATE KEY UPDATE `value` = VALUES(`value`)"
        );
        assert_eq!(
            s.select_all,
            "SELECT `key`, `value` FROM `kv` WHERE `key` LIKE ? ESCAPE '\\\\'"
        );
    }

    #[test]
    fn test_postgres_statements_use_numbered_placeholders() {
        let s = Statements::render(&POSTGRES, "endb", 255);
        assert_eq!(s.select, "SELECT \"value\" FROM \"endb\" WHERE \"key\" = $1");
        assert_eq!(s.delete, "DELETE FROM \"endb\" WHERE \"key\" = $1");
        assert_eq!(
            s.upsert,
            "INSERT INTO \"endb\" (\"key\", \"value\") VALUES ($1, $2) \
             ON CONFLICT (\"key\") DO UPDATE SET \"value\" = EXCLUDED.\"value\""
        );
        assert!(!s.upsert.contains('?'));
        assert!(s.create_table.contains("\"key\" VARCHAR(255) PRIMARY KEY"));
    }

    #[test]
    fn test_table_name_with_braces_is_not_rescanned() {
        let s = Statements::render(&SQLITE, "{key}", 10);
        assert_eq!(s.delete, "DELETE FROM \"{key}\" WHERE \"key\" = ?");
    }

    #[test]
    fn test_like_prefix_escapes_wildcards() {
        assert_eq!(like_prefix("endb:"), "endb:%");
        assert_eq!(like_prefix("a_b%c:"), "a\\_b\\%c:%");
        assert_eq!(like_prefix("back\\slash:"), "back\\\\slash:%");
    }
}
