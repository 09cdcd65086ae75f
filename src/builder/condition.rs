use std::fmt;

use crate::core::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    In,
    NotIn,
}

impl Operator {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::In => write!(f, "IN"),
            Self::NotIn => write!(f, "NOT IN"),
        }
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Single(Value),
    List(Vec<Value>),
}

/// A filter applied to one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub op: Operator,
    pub operand: Operand,
}

impl Condition {
    pub fn new(op: Operator, operand: Operand) -> Self {
        Self { op, operand }
    }

    pub fn eq(value: impl Into<Value>) -> Self {
        Self::new(Operator::Equal, Operand::Single(value.into()))
    }

    pub fn ne(value: impl Into<Value>) -> Self {
        Self::new(Operator::NotEqual, Operand::Single(value.into()))
    }

    pub fn in_set<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(Operator::In, list(values))
    }

    pub fn not_in<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(Operator::NotIn, list(values))
    }
}

fn list<I, V>(values: I) -> Operand
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Operand::List(values.into_iter().map(Into::into).collect())
}
