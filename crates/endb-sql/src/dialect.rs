//! Static per-engine metadata.
//!
//! Each [`Dialect`] is a table row: quoting, placeholder style, key column
//! type, upsert template and LIKE escape clause. Templates use `{table}`,
//! `{key}`, `{value}`, `{key_size}`, `{p1}` and `{p2}`, filled in by
//! [`Statements::render`](crate::Statements::render).

/// How bound parameters are written in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?` for every parameter.
    Positional,
    /// `$1`, `$2`, ...
    Numbered,
}

/// Engine-specific SQL metadata.
#[derive(Debug, PartialEq, Eq)]
pub struct Dialect {
    /// Engine name; also the adapter name reported in logs and faults.
    pub name: &'static str,
    /// URI used when none is configured.
    pub default_uri: &'static str,
    /// Opening identifier quote.
    pub quote_open: char,
    /// Closing identifier quote; doubled when it occurs inside an identifier.
    pub quote_close: char,
    /// Placeholder style.
    pub placeholder: Placeholder,
    /// Type of the key column. Comparison on it must be case-sensitive.
    pub key_type: &'static str,
    /// Atomic insert-or-replace template.
    pub upsert: &'static str,
    /// Clause making `\` the LIKE escape character.
    pub like_escape: &'static str,
}

/// `SQLite`.
pub static SQLITE: Dialect = Dialect {
    name: "sqlite",
    default_uri: "sqlite://:memory:",
    quote_open: '"',
    quote_close: '"',
    placeholder: Placeholder::Positional,
    key_type: "VARCHAR({key_size})",
    upsert: "REPLACE INTO {table} ({key}, {value}) VALUES ({p1}, {p2})",
    like_escape: "ESCAPE '\\'",
};

/// `MySQL` / `MariaDB`.
pub static MYSQL: Dialect = Dialect {
    name: "mysql",
    default_uri: "mysql://localhost",
    quote_open: '`',
    quote_close: '`',
    placeholder: Placeholder::Positional,
    key_type: "VARCHAR({key_size}) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin",
    upsert: "INSERT INTO {table} ({key}, {value}) VALUES ({p1}, {p2}) \
             ON DUPLICATE KEY UPDATE {value} = VALUES({value})",
    like_escape: "ESCAPE '\\\\'",
};

/// `PostgreSQL`.
pub static POSTGRES: Dialect = Dialect {
    name: "postgres",
    default_uri: "postgresql://localhost:5432",
    quote_open: '"',
    quote_close: '"',
    placeholder: Placeholder::Numbered,
    key_type: "VARCHAR({key_size})",
    upsert: "INSERT INTO {table} ({key}, {value}) VALUES ({p1}, {p2}) \
             ON CONFLICT ({key}) DO UPDATE SET {value} = EXCLUDED.{value}",
    like_escape: "ESCAPE '\\'",
};

/// Every built-in dialect.
pub static DIALECTS: [&Dialect; 3] = [&SQLITE, &MYSQL, &POSTGRES];

impl Dialect {
    /// Look up a built-in dialect by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<&'static Dialect> {
        DIALECTS.iter().copied().find(|d| d.name == name)
    }

    /// Quote an identifier.
    #[must_use]
    pub fn quote(&self, ident: &str) -> String {
        let mut quoted = String::with_capacity(ident.len().saturating_add(2));
        quoted.push(self.quote_open);
        for c in ident.chars() {
            if c == self.quote_close {
                quoted.push(c);
            }
            quoted.push(c);
        }
        quoted.push(self.quote_close);
        quoted
    }

    /// The placeholder for the `index`-th parameter (1-based).
    #[must_use]
    pub fn placeholder(&self, index: usize) -> String {
        match self.placeholder {
            Placeholder::Positional => "?".to_owned(),
            Placeholder::Numbered => format!("${index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_styles() {
        assert_eq!(SQLITE.quote("key"), "\"key\"");
        assert_eq!(MYSQL.quote("key"), "`key`");
        assert_eq!(POSTGRES.quote("my\"table"), "\"my\"\"table\"");
        assert_eq!(MYSQL.quote("odd`name"), "`odd``name`");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(SQLITE.placeholder(2), "?");
        assert_eq!(MYSQL.placeholder(1), "?");
        assert_eq!(POSTGRES.placeholder(1), "$1");
        assert_eq!(POSTGRES.placeholder(2), "$2");
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(Dialect::by_name("mysql"), Some(&MYSQL));
        assert_eq!(Dialect::by_name("postgres"), Some(&POSTGRES));
        assert!(Dialect::by_name("oracle").is_none());
    }

    #[test]
    fn test_key_types_take_the_key_size() {
        for dialect in DIALECTS {
            assert!(dialect.key_type.starts_with("VARCHAR({key_size})"));
        }
        assert!(MYSQL.key_type.ends_with("COLLATE utf8mb4_bin"));
    }
}
