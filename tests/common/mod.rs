#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rowbind::{DbError, Executor, Result, RowSet, Value};

/// A statement the fake executor received.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Executor that records every statement and replays canned results.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<Recorded>>,
    results: Mutex<VecDeque<RowSet>>,
    affected: Mutex<u64>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_rows(rows: RowSet) -> Arc<Self> {
        let executor = Self::default();
        executor.push_rows(rows);
        Arc::new(executor)
    }

    pub fn push_rows(&self, rows: RowSet) {
        self.results.lock().unwrap().push_back(rows);
    }

    pub fn set_affected(&self, count: u64) {
        *self.affected.lock().unwrap() = count;
    }

    pub fn fail_next(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Recorded> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn record(&self, sql: &str, args: &[Value]) -> Result<()> {
        self.calls.lock().unwrap().push(Recorded {
            sql: sql.to_string(),
            args: args.to_vec(),
        });
        match self.fail_with.lock().unwrap().take() {
            Some(message) => Err(DbError::executor(std::io::Error::other(message))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn query_rows(&self, sql: &str, args: &[Value]) -> Result<RowSet> {
        self.record(sql, args)?;
        Ok(self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(RowSet::empty))
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64> {
        self.record(sql, args)?;
        Ok(*self.affected.lock().unwrap())
    }
}

pub fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub fn rows(names: &[&str], rows: Vec<Vec<Value>>) -> RowSet {
    RowSet::new(columns(names), rows)
}
