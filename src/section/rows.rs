//! Measurement row parsing and value formatting.
//!
//! Rows are tab-separated numeric fields. The parser splices a derived
//! time value into each row at the aligned position (`t₀ = 0`,
//! `tᵢ = tᵢ₋₁ + 1/frame_count` — the sampling rate is implied solely by
//! the section's frame count, the source has no timestamp column).
//!
//! Empty fields are *missing*, carried as `None` — an explicit tagged
//! state, never a NaN bit pattern — so equality and aggregation stay
//! well-defined. A non-empty field that fails numeric conversion is a
//! fatal [`FormatError`]: malformed rows are rejected, not skipped.
use ndarray::Array2;

use crate::config::Heuristics;
use crate::error::FormatError;

/// One measurement: a number, or missing.
pub type Cell = Option<f64>;

/// A parsed section body: rows × aligned-header-width cells.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementMatrix {
    pub data: Array2<Cell>,
}

impl MeasurementMatrix {
    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }
}

/// Incremental row parser for one section body.
///
/// Feed it non-blank lines in order; [`RowReader::finish`] yields the
/// matrix. The caller decides when the body ends (blank line or EOF).
pub struct RowReader<'a> {
    heur: &'a Heuristics,
    width: usize,
    step: f64,
    prev_time: f64,
    rows: usize,
    cells: Vec<Cell>,
}

impl<'a> RowReader<'a> {
    /// `width` is the aligned header width the rows must match;
    /// `frame_count` fixes the time step.
    pub fn new(frame_count: u32, width: usize, heur: &'a Heuristics) -> Self {
        Self {
            heur,
            width,
            step: 1.0 / f64::from(frame_count),
            prev_time: 0.0,
            rows: 0,
            cells: Vec::new(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Parse one data row.
    pub fn push_line(&mut self, line: &str) -> Result<(), FormatError> {
        let fields: Vec<&str> = line.split(self.heur.source_separator).collect();
        let time = if self.rows == 0 {
            0.0
        } else {
            self.prev_time + self.step
        };

        // Splice position clamps to the row end for degenerate short rows;
        // the width check below still rejects those.
        let at = self.heur.time_index.min(fields.len());
        let mut row: Vec<Cell> = Vec::with_capacity(fields.len() + 1);
        for (i, field) in fields.iter().enumerate() {
            if i == at {
                row.push(Some(time));
            }
            let trimmed = field.trim();
            if trimmed.is_empty() {
                row.push(None);
            } else {
                let value = trimmed.parse::<f64>().map_err(|_| FormatError::BadNumber {
                    row: self.rows + 1,
                    field: i + 1,
                    value: trimmed.to_string(),
                })?;
                row.push(Some(value));
            }
        }
        if at == fields.len() {
            row.push(Some(time));
        }

        if row.len() != self.width {
            return Err(FormatError::RowWidth {
                row: self.rows + 1,
                expected: self.width,
                found: row.len(),
            });
        }

        self.prev_time = time;
        self.rows += 1;
        self.cells.extend(row);
        Ok(())
    }

    pub fn finish(self) -> MeasurementMatrix {
        let data = Array2::from_shape_vec((self.rows, self.width), self.cells)
            .expect("every accepted row matches the header width");
        MeasurementMatrix { data }
    }
}

/// Format one cell for the normalized artifact: at most `decimals` decimal
/// places, trailing zeros and a trailing point trimmed, the literal `"0"`
/// for zero and `"nan"` for missing.
pub fn format_value(cell: Cell, decimals: usize) -> String {
    let Some(v) = cell else {
        return "nan".to_string();
    };
    if v == 0.0 {
        return "0".to_string();
    }
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let fixed = format!("{v:.decimals$}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}
