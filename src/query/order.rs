use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::DatatableError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl Direction {
    #[must_use]
    pub fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }

    /// Apply this direction to a natural-order result
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    /// Wire name as used by the DataTables protocols
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DatatableError;

    /// Case-insensitive `asc`/`desc` (also `ascending`/`descending`)
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(DatatableError::configuration(format!(
                "invalid sort direction '{value}', expected 'asc' or 'desc'"
            ))),
        }
    }
}

/// One sort directive: a column and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnOrder {
    column: String,
    direction: Direction,
}

impl ColumnOrder {
    #[must_use]
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.direction.is_ascending()
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }
}

/// A search term scoped to a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSearch {
    column: String,
    value: String,
}

impl ColumnSearch {
    #[must_use]
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: String) {
        self.value = value;
    }
}
