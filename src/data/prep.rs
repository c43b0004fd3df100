use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::model::{Cell, Table};

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Turn every text cell equal to `marker` into a missing cell.
pub fn mark_missing(table: &mut Table, marker: &str) {
    for cell in table.rows.iter_mut().flatten() {
        if cell.as_text() == Some(marker) {
            *cell = Cell::Missing;
        }
    }
}

/// Drop every row that has at least one missing cell.
pub fn drop_incomplete(table: &mut Table) -> usize {
    let before = table.len();
    table.rows.retain(|row| !row.iter().any(Cell::is_missing));
    let dropped = before - table.len();
    if dropped > 0 {
        log::debug!("Dropped {dropped} incomplete rows");
    }
    dropped
}

/// Fill missing numeric cells with the median of the column's present values.
pub fn impute_median(table: &mut Table) {
    for idx in 0..table.columns.len() {
        let mut present: Vec<f64> = table.column(idx).filter_map(Cell::as_f64).collect();
        if present.is_empty() || present.len() == table.len() {
            continue;
        }
        present.sort_by(f64::total_cmp);
        let mid = present.len() / 2;
        let median = if present.len() % 2 == 0 {
            (present[mid - 1] + present[mid]) / 2.0
        } else {
            present[mid]
        };
        for row in &mut table.rows {
            if row[idx].is_missing() {
                row[idx] = Cell::Number(median);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Feature matrices
// ---------------------------------------------------------------------------

/// Numeric design matrix plus its column names.
#[derive(Debug, Clone)]
pub struct Features {
    pub names: Vec<String>,
    pub records: Vec<Vec<f64>>,
}

/// Every column must be numeric and present.
pub fn numeric_features(table: &Table) -> Result<Features> {
    let mut records = Vec::with_capacity(table.len());
    for (row_no, row) in table.rows.iter().enumerate() {
        let values = row
            .iter()
            .zip(&table.columns)
            .map(|(cell, col)| {
                cell.as_f64()
                    .with_context(|| format!("Row {row_no}, column '{col}': '{cell}' is not numeric"))
            })
            .collect::<Result<Vec<f64>>>()?;
        records.push(values);
    }
    Ok(Features {
        names: table.columns.clone(),
        records,
    })
}

/// Dummy-encode text columns, dropping each column's first (sorted) category.
///
/// Numeric columns keep their position at the front; indicator columns named
/// `<column>_<category>` follow, grouped by source column.
pub fn one_hot(table: &Table) -> Result<Features> {
    let numeric: Vec<usize> = (0..table.columns.len())
        .filter(|&i| table.is_numeric_column(i))
        .collect();
    let categorical: Vec<(usize, Vec<String>)> = (0..table.columns.len())
        .filter(|&i| !table.is_numeric_column(i))
        .map(|i| (i, table.categories(i).into_iter().skip(1).collect()))
        .collect();

    let mut names: Vec<String> = numeric.iter().map(|&i| table.columns[i].clone()).collect();
    for (idx, kept) in &categorical {
        names.extend(kept.iter().map(|cat| format!("{}_{cat}", table.columns[*idx])));
    }

    let mut records = Vec::with_capacity(table.len());
    for (row_no, row) in table.rows.iter().enumerate() {
        let mut values = Vec::with_capacity(names.len());
        for &i in &numeric {
            match row[i].as_f64() {
                Some(v) => values.push(v),
                None => bail!("Row {row_no}, column '{}': missing value", table.columns[i]),
            }
        }
        for (idx, kept) in &categorical {
            let current = row[*idx].as_text();
            values.extend(
                kept.iter()
                    .map(|cat| if current == Some(cat.as_str()) { 1.0 } else { 0.0 }),
            );
        }
        records.push(values);
    }

    Ok(Features { names, records })
}

/// Map a target column to {0, 1}. Rows the mapper rejects are removed from
/// both the table and the returned targets.
pub fn binary_target<F>(table: &mut Table, column: &str, mapper: F) -> Result<Vec<usize>>
where
    F: Fn(&Cell) -> Option<usize>,
{
    let cells = table
        .take_column(column)
        .with_context(|| format!("dataset has no '{column}' column"))?;

    let mut targets = Vec::with_capacity(cells.len());
    let mut keep = Vec::with_capacity(cells.len());
    for cell in &cells {
        let mapped = mapper(cell);
        keep.push(mapped.is_some());
        targets.extend(mapped);
    }

    let mut flags = keep.iter();
    table.rows.retain(|_| flags.next().copied().unwrap_or(false));

    if targets.is_empty() {
        bail!("no usable rows for target '{column}'");
    }
    Ok(targets)
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Row indices of a train/test partition.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a fixed seed and hold out `test_fraction` of it.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.min(n.saturating_sub(1));
    let train = indices.split_off(n_test);
    Split {
        train,
        test: indices,
    }
}

/// Stratified k-fold partition, without shuffling.
///
/// Each class's rows are dealt round-robin across folds, so every fold
/// holds roughly the same class balance.
pub fn stratified_folds(targets: &[usize], k: usize) -> Vec<Split> {
    let k = k.max(2);
    let mut fold_of = vec![0usize; targets.len()];
    let mut next_fold = std::collections::BTreeMap::new();
    for (i, &t) in targets.iter().enumerate() {
        let slot = next_fold.entry(t).or_insert(0usize);
        fold_of[i] = *slot % k;
        *slot += 1;
    }

    (0..k)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..targets.len()).partition(|&i| fold_of[i] == fold);
            Split { train, test }
        })
        .collect()
}

/// Gather rows by index.
pub fn take<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| items[i].clone()).collect()
}
