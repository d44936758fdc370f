//! In-memory executor that records statements and models commit/rollback.

#![allow(dead_code)]

use sakila::{BoundQuery, Executor, StoreError, StoreResult, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use tokio_postgres::Row;

pub type Record = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub table: String,
    pub columns: Record,
}

#[derive(Default)]
struct State {
    log: Vec<String>,
    committed: Vec<StoredRow>,
    working: Option<Vec<StoredRow>>,
    next_keys: HashMap<String, i32>,
    fail_tables: Vec<String>,
    empty_tables: Vec<String>,
    fail_begin: bool,
    fail_commit: bool,
    fail_rollback: bool,
}

#[derive(Default)]
pub struct RecordingExecutor {
    state: Mutex<State>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next key generated for `table` will be `key`.
    pub fn next_key(self, table: &str, key: i32) -> Self {
        self.state.lock().unwrap().next_keys.insert(table.to_string(), key);
        self
    }

    /// Every statement touching `table` fails.
    pub fn fail_on(self, table: &str) -> Self {
        self.state.lock().unwrap().fail_tables.push(table.to_string());
        self
    }

    /// `UPDATE`s of `table` match no rows.
    pub fn no_rows_in(self, table: &str) -> Self {
        self.state.lock().unwrap().empty_tables.push(table.to_string());
        self
    }

    pub fn fail_begin(self) -> Self {
        self.state.lock().unwrap().fail_begin = true;
        self
    }

    pub fn fail_commit(self) -> Self {
        self.state.lock().unwrap().fail_commit = true;
        self
    }

    pub fn fail_rollback(self) -> Self {
        self.state.lock().unwrap().fail_rollback = true;
        self
    }

    /// Seed a committed row.
    pub fn with_row(self, table: &str, columns: &[(&str, Value)]) -> Self {
        let row = StoredRow {
            table: table.to_string(),
            columns: columns
                .iter()
                .map(|(c, v)| (c.to_string(), v.clone()))
                .collect(),
        };
        self.state.lock().unwrap().committed.push(row);
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.state
            .lock()
            .unwrap()
            .committed
            .iter()
            .filter(|r| r.table == table)
            .map(|r| r.columns.clone())
            .collect()
    }

    pub fn in_transaction(&self) -> bool {
        self.state.lock().unwrap().working.is_some()
    }

    fn apply(&self, q: &BoundQuery) -> StoreResult<(u64, Option<i32>)> {
        let mut state = self.state.lock().unwrap();
        let text = q.text();
        state.log.push(text.clone());

        let table = table_of(&text);
        if state.fail_tables.iter().any(|t| *t == table) {
            return Err(StoreError::Other(format!("simulated failure on {table}")));
        }
        if q.has_keys() {
            return Err(StoreError::statement("unresolved key reached the driver"));
        }

        let state = &mut *state;
        let rows = match state.working.as_mut() {
            Some(working) => working,
            None => &mut state.committed,
        };

        if text.starts_with("INSERT INTO") {
            let mut columns: Record = columns_of(&text)
                .into_iter()
                .zip(q.params().iter().cloned())
                .collect();
            let key = if text.contains(" RETURNING ") {
                let next = state.next_keys.entry(table.clone()).or_insert(1);
                let key = *next;
                *next += 1;
                columns.insert(format!("{table}_id"), Value::Int(key));
                Some(key)
            } else {
                None
            };
            rows.push(StoredRow { table, columns });
            Ok((1, key))
        } else if text.starts_with("DELETE FROM") {
            let column = where_column(&text);
            let target = q.params().first().cloned();
            let before = rows.len();
            rows.retain(|r| !(r.table == table && r.columns.get(&column) == target.as_ref()));
            Ok(((before - rows.len()) as u64, None))
        } else if text.starts_with("UPDATE") && state.empty_tables.contains(&table) {
            Ok((0, None))
        } else {
            Ok((1, None))
        }
    }

    fn control(&self, stmt: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.log.push(stmt.to_string());
        match stmt {
            "BEGIN" => {
                if state.fail_begin {
                    return Err(StoreError::Connection("simulated BEGIN failure".into()));
                }
                state.working = Some(state.committed.clone());
            }
            "COMMIT" => {
                let working = state.working.take();
                if state.fail_commit {
                    return Err(StoreError::Other("simulated COMMIT failure".into()));
                }
                if let Some(rows) = working {
                    state.committed = rows;
                }
            }
            _ => {
                state.working = None;
                if state.fail_rollback {
                    return Err(StoreError::Connection("simulated ROLLBACK failure".into()));
                }
            }
        }
        Ok(())
    }
}

fn table_of(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let name = match words.first().copied() {
        Some("INSERT") | Some("DELETE") => words.get(2),
        Some("UPDATE") => words.get(1),
        _ => words.iter().position(|w| *w == "FROM").and_then(|i| words.get(i + 1)),
    };
    name.map(|n| n.trim_end_matches('(').to_string()).unwrap_or_default()
}

fn columns_of(text: &str) -> Vec<String> {
    let start = text.find('(').map(|i| i + 1).unwrap_or(0);
    let end = text.find(')').unwrap_or(text.len());
    text[start..end].split(',').map(|c| c.trim().to_string()).collect()
}

fn where_column(text: &str) -> String {
    text.split(" WHERE ")
        .nth(1)
        .and_then(|w| w.split_whitespace().next())
        .unwrap_or_default()
        .to_string()
}

impl Executor for RecordingExecutor {
    async fn query(&self, q: &BoundQuery) -> StoreResult<Vec<Row>> {
        self.apply(q)?;
        Ok(Vec::new())
    }

    async fn execute(&self, q: &BoundQuery) -> StoreResult<u64> {
        self.apply(q).map(|(n, _)| n)
    }

    async fn insert_returning_key(&self, q: &BoundQuery) -> StoreResult<i32> {
        let (_, key) = self.apply(q)?;
        key.ok_or_else(|| StoreError::not_found("INSERT returned no generated key"))
    }

    async fn begin(&self) -> StoreResult<()> {
        self.control("BEGIN")
    }

    async fn commit(&self) -> StoreResult<()> {
        self.control("COMMIT")
    }

    async fn rollback(&self) -> StoreResult<()> {
        self.control("ROLLBACK")
    }
}
