//! Convergence tables for grid-doubling studies.
//!
//! For values `v_i` computed with `n_i = n_0·2^i`, the table holds the
//! successive differences `d_i = v_i − v_{i−1}` and ratios
//! `R_i = d_{i−1}/d_i`. A method of order `p` has `R → 2^p`, so Simpson's
//! rule tends to 16 and a second-order scheme to 4.

use nf_core::{Real, Result, Size};
use std::fmt;

const COLUMN_WIDTH: usize = 14;

/// One line of a [`ConvergenceTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceRow {
    /// Discretisation size (intervals, steps, ...).
    pub n: Size,
    /// Computed value.
    pub value: Real,
    /// Difference from the previous row.
    pub diff: Option<Real>,
    /// Ratio of the previous difference to this one.
    pub ratio: Option<Real>,
}

/// Successive values with their differences and ratios.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvergenceTable {
    rows: Vec<ConvergenceRow>,
}

impl ConvergenceTable {
    /// Build a table from `(n, value)` pairs in refinement order.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (Size, Real)>,
    {
        let mut table = Self::default();
        for (n, value) in values {
            table.push(n, value);
        }
        table
    }

    /// Evaluate `f(n)` for `n = start, 2·start, …` (`levels` values).
    pub fn sweep<F>(start: Size, levels: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(Size) -> Result<Real>,
    {
        let mut table = Self::default();
        let mut n = start;
        for _ in 0..levels {
            table.push(n, f(n)?);
            n *= 2;
        }
        Ok(table)
    }

    /// Append a row.
    pub fn push(&mut self, n: Size, value: Real) {
        let diff = self.rows.last().map(|prev| value - prev.value);
        let ratio = match (self.rows.last().and_then(|prev| prev.diff), diff) {
            (Some(prev), Some(d)) if d != 0.0 => Some(prev / d),
            _ => None,
        };
        self.rows.push(ConvergenceRow {
            n,
            value,
            diff,
            ratio,
        });
    }

    /// The rows.
    pub fn rows(&self) -> &[ConvergenceRow] {
        &self.rows
    }

    /// Most refined value.
    pub fn last_value(&self) -> Option<Real> {
        self.rows.last().map(|r| r.value)
    }

    /// Ratio on the last row.
    pub fn last_ratio(&self) -> Option<Real> {
        self.rows.last().and_then(|r| r.ratio)
    }

    /// Observed order `log₂ R` from the last ratio.
    pub fn observed_order(&self) -> Option<Real> {
        self.last_ratio().filter(|r| *r > 0.0).map(Real::log2)
    }

    /// Richardson extrapolation of the last value assuming convergence of
    /// order `order`: `v + d/(2^p − 1)`.
    pub fn extrapolated(&self, order: Real) -> Option<Real> {
        let last = self.rows.last()?;
        Some(last.value + last.diff? / (order.exp2() - 1.0))
    }
}

fn cell(f: &mut fmt::Formatter<'_>, entry: Option<Real>) -> fmt::Result {
    match entry {
        Some(x) => write!(f, "|{x:>w$.8}", w = COLUMN_WIDTH),
        None => write!(f, "|{:>w$}", "", w = COLUMN_WIDTH),
    }
}

impl fmt::Display for ConvergenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for title in ["n", "value", "diff", "ratio"] {
            write!(f, "|{title:>w$}", w = COLUMN_WIDTH)?;
        }
        writeln!(f, "|")?;
        for _ in 0..4 {
            write!(f, "|{}", "-".repeat(COLUMN_WIDTH))?;
        }
        writeln!(f, "|")?;
        for row in &self.rows {
            write!(f, "|{:>w$}", row.n, w = COLUMN_WIDTH)?;
            cell(f, Some(row.value))?;
            cell(f, row.diff)?;
            cell(f, row.ratio)?;
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn differences_and_ratios() {
        // error halves twice per doubling: second order
        let table = ConvergenceTable::from_values([(10, 1.16), (20, 1.04), (40, 1.01)]);
        let rows = table.rows();
        assert_eq!(rows[0].diff, None);
        assert_abs_diff_eq!(rows[1].diff.unwrap(), -0.12, epsilon = 1e-12);
        assert_eq!(rows[1].ratio, None);
        assert_abs_diff_eq!(rows[2].ratio.unwrap(), 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(table.observed_order().unwrap(), 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(table.extrapolated(2.0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn sweep_doubles() {
        let table = ConvergenceTable::sweep(4, 4, |n| Ok(1.0 / (n * n) as Real)).unwrap();
        let ns: Vec<Size> = table.rows().iter().map(|r| r.n).collect();
        assert_eq!(ns, vec![4, 8, 16, 32]);
        assert_abs_diff_eq!(table.last_ratio().unwrap(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn sweep_propagates_errors() {
        let result = ConvergenceTable::sweep(2, 3, |n| {
            if n > 4 {
                Err(nf_core::errors::Error::Runtime("too fine".into()))
            } else {
                Ok(0.0)
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn zero_difference_has_no_ratio() {
        let table = ConvergenceTable::from_values([(1, 2.0), (2, 1.0), (4, 1.0)]);
        assert_eq!(table.last_ratio(), None);
        assert_eq!(table.observed_order(), None);
    }

    #[test]
    fn display_columns() {
        let table = ConvergenceTable::from_values([(8, 1.5), (16, 1.25)]);
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.len() == 4 * (COLUMN_WIDTH + 1) + 1));
        assert_eq!(lines[1], format!("|{}", "-".repeat(COLUMN_WIDTH)).repeat(4) + "|");
        assert!(lines[3].contains("1.25000000"));
        assert!(lines[3].contains("-0.25000000"));
    }
}
