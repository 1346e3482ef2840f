//! Per-column summary statistics.
//!
//! Every artifact ends with three derived rows — maximum, minimum and
//! range — computed over the data columns. The frame and sub-frame columns
//! are rendered as empty placeholders and the row label occupies the time
//! slot, so the statistics start one past the time column. Missing values
//! are excluded from each reduction; a column with no present value at all
//! yields a missing result, not an error.
use crate::config::Heuristics;
use crate::section::rows::{Cell, MeasurementMatrix};

/// Labels of the three summary rows, in artifact order.
pub const MAXIMUM_LABEL: &str = "MAXIMO";
pub const MINIMUM_LABEL: &str = "MINIMO";
pub const RANGE_LABEL: &str = "RANGO";

/// Max/min/range per data column. Entries are parallel to the matrix
/// columns starting at `heur.time_index + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSummary {
    pub max: Vec<Cell>,
    pub min: Vec<Cell>,
    pub range: Vec<Cell>,
}

/// Reduce every data column of `matrix`, ignoring missing cells.
pub fn summarize(matrix: &MeasurementMatrix, heur: &Heuristics) -> SectionSummary {
    let first_data_column = heur.time_index + 1;
    let n_cols = matrix.n_cols();

    let mut max = Vec::new();
    let mut min = Vec::new();
    let mut range = Vec::new();
    for c in first_data_column..n_cols {
        let mut col_max: Cell = None;
        let mut col_min: Cell = None;
        for cell in matrix.data.column(c) {
            if let Some(v) = cell {
                col_max = Some(col_max.map_or(*v, |m: f64| m.max(*v)));
                col_min = Some(col_min.map_or(*v, |m: f64| m.min(*v)));
            }
        }
        max.push(col_max);
        min.push(col_min);
        range.push(match (col_max, col_min) {
            (Some(hi), Some(lo)) => Some(hi - lo),
            _ => None,
        });
    }

    SectionSummary { max, min, range }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::rows::RowReader;
    use approx::assert_abs_diff_eq;

    fn matrix(lines: &[&str], width: usize) -> MeasurementMatrix {
        let heur = Heuristics::default();
        let mut reader = RowReader::new(100, width, &heur);
        for line in lines {
            reader.push_line(line).unwrap();
        }
        reader.finish()
    }

    #[test]
    fn max_min_range_per_data_column() {
        let m = matrix(&["1\t0\t3.0\t-1.0", "2\t0\t5.0\t4.0", "3\t0\t4.0\t0.5"], 5);
        let s = summarize(&m, &Heuristics::default());
        // Two data columns (indices 3 and 4).
        assert_eq!(s.max.len(), 2);
        assert_abs_diff_eq!(s.max[0].unwrap(), 5.0);
        assert_abs_diff_eq!(s.min[0].unwrap(), 3.0);
        assert_abs_diff_eq!(s.range[0].unwrap(), 2.0);
        assert_abs_diff_eq!(s.max[1].unwrap(), 4.0);
        assert_abs_diff_eq!(s.min[1].unwrap(), -1.0);
        assert_abs_diff_eq!(s.range[1].unwrap(), 5.0);
    }

    #[test]
    fn missing_cells_are_excluded_from_the_reduction() {
        let m = matrix(&["1\t0\t\t2.0", "2\t0\t7.5\t", "3\t0\t2.5\t6.0"], 5);
        let s = summarize(&m, &Heuristics::default());
        assert_abs_diff_eq!(s.max[0].unwrap(), 7.5);
        assert_abs_diff_eq!(s.min[0].unwrap(), 2.5);
        assert_abs_diff_eq!(s.max[1].unwrap(), 6.0);
        assert_abs_diff_eq!(s.min[1].unwrap(), 2.0);
    }

    #[test]
    fn all_missing_column_yields_missing_stats() {
        let m = matrix(&["1\t0\t\t2.0", "2\t0\t\t3.0"], 5);
        let s = summarize(&m, &Heuristics::default());
        assert_eq!(s.max[0], None);
        assert_eq!(s.min[0], None);
        assert_eq!(s.range[0], None);
    }

    #[test]
    fn no_data_columns_yields_empty_stats() {
        // Width 3: frame, sub-frame, time — nothing to reduce.
        let m = matrix(&["1\t0"], 3);
        let s = summarize(&m, &Heuristics::default());
        assert!(s.max.is_empty());
        assert!(s.min.is_empty());
        assert!(s.range.is_empty());
    }
}
