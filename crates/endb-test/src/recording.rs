//! A [`SqlConnector`] that runs the adapter's statements against an
//! in-memory table and records everything it was asked to do.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use endb_sql::{Dialect, SqlConnection, SqlConnector, SqlError, SqlResult, SqlRow, Statements};

/// One statement the adapter sent, with its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedStatement {
    /// SQL text.
    pub sql: String,
    /// Bound parameters in order.
    pub params: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    rows: Mutex<BTreeMap<String, String>>,
    log: Mutex<Vec<RecordedStatement>>,
    connects: AtomicUsize,
    fail_connect: AtomicBool,
    fail_create: AtomicBool,
    offline: AtomicBool,
}

/// Mock connector for a given [`Dialect`].
///
/// Understands exactly the statements [`Statements::render`] produces for
/// the same dialect, table and key size; anything else is rejected as a
/// statement error. Cloning shares the table and the log.
#[derive(Debug, Clone)]
pub struct RecordingConnector {
    dialect: &'static Dialect,
    statements: Arc<Statements>,
    state: Arc<State>,
}

impl RecordingConnector {
    /// Create a connector speaking `dialect` against `table`.
    #[must_use]
    pub fn new(dialect: &'static Dialect, table: &str, key_size: usize) -> Self {
        Self {
            dialect,
            statements: Arc::new(Statements::render(dialect, table, key_size)),
            state: Arc::new(State::default()),
        }
    }

    /// Make every connection attempt fail with a connectivity error.
    pub fn set_fail_connect(&self, fail: bool) {
        self.state.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Make table creation fail with a statement error.
    pub fn set_fail_create(&self, fail: bool) {
        self.state.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Make every statement on established connections fail with a
    /// connectivity error.
    pub fn set_offline(&self, offline: bool) {
        self.state.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of connection attempts so far.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    /// Every statement executed so far.
    #[must_use]
    pub fn statements_executed(&self) -> Vec<RecordedStatement> {
        self.state
            .log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// How many times `sql` was executed.
    #[must_use]
    pub fn count_of(&self, sql: &str) -> usize {
        self.statements_executed()
            .iter()
            .filter(|s| s.sql == sql)
            .count()
    }

    /// Snapshot of the stored rows.
    #[must_use]
    pub fn rows(&self) -> BTreeMap<String, String> {
        self.state
            .rows
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    /// The statements this connector understands.
    #[must_use]
    pub fn expected_statements(&self) -> &Statements {
        &self.statements
    }
}

#[async_trait]
impl SqlConnector for RecordingConnector {
    fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    async fn connect(&self) -> SqlResult<Arc<dyn SqlConnection>> {
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        // Give concurrent callers a chance to race for the connection.
        tokio::task::yield_now().await;
        if self.state.fail_connect.load(Ordering::SeqCst) {
            return Err(SqlError::Connect("connection refused".to_owned()));
        }
        Ok(Arc::new(RecordingConnection {
            statements: Arc::clone(&self.statements),
            state: Arc::clone(&self.state),
        }))
    }
}

struct RecordingConnection {
    statements: Arc<Statements>,
    state: Arc<State>,
}

impl RecordingConnection {
    fn record(&self, sql: &str, params: &[&str]) -> SqlResult<()> {
        let mut log = self
            .state
            .log
            .lock()
            .map_err(|e| SqlError::Statement(e.to_string()))?;
        log.push(RecordedStatement {
            sql: sql.to_owned(),
            params: params.iter().map(|p| (*p).to_owned()).collect(),
        });
        if self.state.offline.load(Ordering::SeqCst) {
            return Err(SqlError::Connect("connection reset".to_owned()));
        }
        Ok(())
    }

    fn rows(&self) -> SqlResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.state
            .rows
            .lock()
            .map_err(|e| SqlError::Statement(e.to_string()))
    }
}

fn param<'a>(params: &[&'a str], index: usize) -> SqlResult<&'a str> {
    params
        .get(index)
        .copied()
        .ok_or_else(|| SqlError::Statement(format!("missing parameter {index}")))
}

/// Undo `like_prefix`: strip the trailing `%` and the `\` escapes.
fn like_to_prefix(pattern: &str) -> String {
    let body = pattern.strip_suffix('%').unwrap_or(pattern);
    let mut prefix = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                prefix.push(escaped);
            }
        } else {
            prefix.push(c);
        }
    }
    prefix
}

#[async_trait]
impl SqlConnection for RecordingConnection {
    async fn execute(&self, sql: &str, params: &[&str]) -> SqlResult<u64> {
        self.record(sql, params)?;
        let s = &*self.statements;

        if sql == s.create_table {
            if self.state.fail_create.load(Ordering::SeqCst) {
                return Err(SqlError::Statement("permission denied".to_owned()));
            }
            return Ok(0);
        }
        if sql == s.upsert {
            let key = param(params, 0)?;
            let value = param(params, 1)?;
            self.rows()?.insert(key.to_owned(), value.to_owned());
            return Ok(1);
        }
        if sql == s.delete {
            let key = param(params, 0)?;
            return Ok(u64::from(self.rows()?.remove(key).is_some()));
        }
        if sql == s.clear {
            let prefix = like_to_prefix(param(params, 0)?);
            let mut rows = self.rows()?;
            let before = rows.len();
            rows.retain(|k, _| !k.starts_with(&prefix));
            let removed = before.saturating_sub(rows.len());
            return Ok(u64::try_from(removed).unwrap_or(u64::MAX));
        }
        Err(SqlError::Statement(format!("unexpected statement: {sql}")))
    }

    async fn query(&self, sql: &str, params: &[&str]) -> SqlResult<Vec<SqlRow>> {
        self.record(sql, params)?;
        let s = &*self.statements;

        if sql == s.select {
            let key = param(params, 0)?;
            return Ok(self
                .rows()?
                .get(key)
                .map(|v| vec![vec![v.clone()]])
                .unwrap_or_default());
        }
        if sql == s.select_all {
            let prefix = like_to_prefix(param(params, 0)?);
            return Ok(self
                .rows()?
                .iter()
                .filter(|(k, _)| k.starts_with(&prefix))
                .map(|(k, v)| vec![k.clone(), v.clone()])
                .collect());
        }
        Err(SqlError::Statement(format!("unexpected query: {sql}")))
    }
}
