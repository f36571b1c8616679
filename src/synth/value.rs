use chrono::NaiveDateTime;

/// A synthesized column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Int(i64),
    Float(f64),
    /// Rendered as the integers 1 / 0
    Bool(bool),
    Timestamp(NaiveDateTime),
}

/// One generated row: values paired with their column names, in the owning
/// table's declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row<'a> {
    cells: Vec<(&'a str, SqlValue)>,
}

impl<'a> Row<'a> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: &'a str, value: SqlValue) {
        self.cells.push((column, value));
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.cells.iter().map(|(name, _)| *name)
    }

    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.cells.iter().map(|(_, value)| value)
    }
}
