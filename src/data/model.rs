use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Cell – a single value in a dataset column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from a CSV / JSON / Parquet dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Guess the type of a raw text field.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return Cell::Missing;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            Ok(_) => Cell::Missing,
            Err(_) => Cell::Text(s.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Missing => write!(f, "<missing>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Row-major dataset with named columns. Every row has one cell per column.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Missing);
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate over the cells of one column.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Whether every present cell of the column is numeric.
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        self.column(idx).all(|c| !matches!(c, Cell::Text(_)))
    }

    /// Sorted distinct text values of a column.
    pub fn categories(&self, idx: usize) -> BTreeSet<String> {
        self.column(idx)
            .filter_map(|c| c.as_text().map(str::to_string))
            .collect()
    }

    /// Keep only the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Option<Table> {
        let indices: Vec<usize> = names
            .iter()
            .map(|n| self.column_index(n))
            .collect::<Option<_>>()?;
        Some(Table {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// Remove a column and return its cells.
    pub fn take_column(&mut self, name: &str) -> Option<Vec<Cell>> {
        let idx = self.column_index(name)?;
        self.columns.remove(idx);
        Some(self.rows.iter_mut().map(|row| row.remove(idx)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(vec!["a".into(), "b".into(), "c".into()]);
        t.push_row(vec![Cell::Number(1.0), Cell::Text("x".into()), Cell::Missing]);
        t.push_row(vec![Cell::Number(2.0), Cell::Text("y".into())]);
        t
    }

    #[test]
    fn parse_guesses_cell_types() {
        assert_eq!(Cell::parse(" 3.5 "), Cell::Number(3.5));
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("?"), Cell::Text("?".into()));
        assert_eq!(Cell::parse("NaN"), Cell::Missing);
    }

    #[test]
    fn short_rows_are_padded() {
        let t = sample();
        assert_eq!(t.rows[1].len(), 3);
        assert!(t.rows[1][2].is_missing());
    }

    #[test]
    fn select_reorders_columns() {
        let t = sample().select(&["b", "a"]).unwrap();
        assert_eq!(t.columns, vec!["b", "a"]);
        assert_eq!(t.rows[0][1], Cell::Number(1.0));
        assert!(sample().select(&["nope"]).is_none());
    }

    #[test]
    fn take_column_removes_it() {
        let mut t = sample();
        let b = t.take_column("b").unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(t.columns, vec!["a", "c"]);
        assert!(t.is_numeric_column(0));
        assert_eq!(sample().categories(1).len(), 2);
    }
}
