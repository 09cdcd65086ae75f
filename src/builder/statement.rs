use std::fmt;

use crate::core::Value;

/// Rendered SQL text with its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// Accumulates SQL text and arguments, numbering `$N` placeholders from 1.
pub(crate) struct StatementWriter {
    sql: String,
    args: Vec<Value>,
    next: usize,
}

impl StatementWriter {
    pub(crate) fn new(prefix: &str) -> Self {
        Self {
            sql: prefix.to_string(),
            args: Vec::new(),
            next: 1,
        }
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Consumes a placeholder number without binding an argument.
    pub(crate) fn placeholder(&mut self) -> String {
        let mark = format!("${}", self.next);
        self.next += 1;
        mark
    }

    pub(crate) fn bind(&mut self, value: Value) -> String {
        self.args.push(value);
        self.placeholder()
    }

    pub(crate) fn finish(self) -> Statement {
        Statement {
            sql: self.sql,
            args: self.args,
        }
    }
}
