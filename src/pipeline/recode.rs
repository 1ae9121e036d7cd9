//! Recoding of two-category text columns into 0/1 indicators
//!
//! The survey stores lottery selection and sex as text labels. Each is mapped
//! onto an `Int32` indicator; the mapping is total, so any label outside the
//! two known categories (or a null) is rejected with the offending row.

use polars::prelude::*;

use super::error::{AnalysisError, AnalysisResult};
use super::schema::{require_column, FEMALE, LOTTERY};

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// A two-label mapping onto 0/1
#[derive(Debug, Clone, Copy)]
pub struct BinaryRecode<'a> {
    pub column: &'a str,
    /// Label that maps to 0
    pub zero_label: &'a str,
    /// Label that maps to 1
    pub one_label: &'a str,
}

pub const LOTTERY_RECODE: BinaryRecode<'static> = BinaryRecode {
    column: LOTTERY,
    zero_label: "Not selected",
    one_label: "Selected",
};

pub const FEMALE_RECODE: BinaryRecode<'static> = BinaryRecode {
    column: FEMALE,
    zero_label: "0: Male",
    one_label: "1: Female",
};

impl BinaryRecode<'_> {
    fn code(&self, label: &str) -> Option<i32> {
        if label == self.zero_label {
            Some(0)
        } else if label == self.one_label {
            Some(1)
        } else {
            None
        }
    }

    fn unexpected(&self, row: usize, label: String) -> AnalysisError {
        AnalysisError::UnexpectedLabel {
            column: self.column.to_string(),
            row,
            label,
            zero_label: self.zero_label.to_string(),
            one_label: self.one_label.to_string(),
        }
    }
}

/// Recode a column into a 0/1 `Int32` column with the same name.
///
/// Text columns are mapped through the recode labels. A numeric column that
/// already holds only 0 and 1 is accepted as is, so re-running on a cleaned
/// file is harmless.
pub fn recode_binary(df: &DataFrame, recode: &BinaryRecode) -> AnalysisResult<Column> {
    let column = require_column(df, recode.column)?;

    let codes: Vec<i32> = if column.dtype().is_primitive_numeric() {
        numeric_codes(column, recode)?
    } else {
        let text = column.cast(&DataType::String)?;
        text.str()?
            .iter()
            .enumerate()
            .map(|(row, value)| match value {
                Some(label) => recode
                    .code(label)
                    .ok_or_else(|| recode.unexpected(row, label.to_string())),
                None => Err(AnalysisError::MissingValue {
                    column: recode.column.to_string(),
                    row,
                }),
            })
            .collect::<AnalysisResult<_>>()?
    };

    Ok(Column::new(recode.column.into(), codes))
}

fn numeric_codes(column: &Column, recode: &BinaryRecode) -> AnalysisResult<Vec<i32>> {
    let float_col = column.cast(&DataType::Float64)?;
    float_col
        .f64()?
        .iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) if v.abs() < TOLERANCE => Ok(0),
            Some(v) if (v - 1.0).abs() < TOLERANCE => Ok(1),
            Some(v) => Err(recode.unexpected(row, format!("{}", v))),
            None => Err(AnalysisError::MissingValue {
                column: recode.column.to_string(),
                row,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recode_lottery_labels() {
        let df = df! {
            "lottery" => ["Selected", "Not selected", "Selected", "Not selected"],
        }
        .unwrap();

        let column = recode_binary(&df, &LOTTERY_RECODE).unwrap();
        let values: Vec<Option<i32>> = column.i32().unwrap().iter().collect();

        assert_eq!(values, vec![Some(1), Some(0), Some(1), Some(0)]);
        assert_eq!(column.name().as_str(), "lottery");
    }

    #[test]
    fn test_recode_sex_labels() {
        let df = df! {
            "female" => ["1: Female", "0: Male", "0: Male"],
        }
        .unwrap();

        let column = recode_binary(&df, &FEMALE_RECODE).unwrap();
        let values: Vec<Option<i32>> = column.i32().unwrap().iter().collect();

        assert_eq!(values, vec![Some(1), Some(0), Some(0)]);
    }

    #[test]
    fn test_recode_rejects_unknown_label() {
        let df = df! {
            "female" => ["1: Female", "Other", "0: Male"],
        }
        .unwrap();

        let err = recode_binary(&df, &FEMALE_RECODE).unwrap_err();
        match err {
            AnalysisError::UnexpectedLabel { row, label, .. } => {
                assert_eq!(row, 1);
                assert_eq!(label, "Other");
            }
            other => panic!("Expected UnexpectedLabel, got {other:?}"),
        }
    }

    #[test]
    fn test_recode_rejects_null_label() {
        let df = df! {
            "lottery" => [Some("Selected"), None, Some("Not selected")],
        }
        .unwrap();

        let err = recode_binary(&df, &LOTTERY_RECODE).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingValue { row: 1, .. }));
    }

    #[test]
    fn test_recode_accepts_numeric_binary() {
        let df = df! {
            "lottery" => [0i64, 1, 1, 0],
        }
        .unwrap();

        let column = recode_binary(&df, &LOTTERY_RECODE).unwrap();
        let values: Vec<Option<i32>> = column.i32().unwrap().iter().collect();

        assert_eq!(values, vec![Some(0), Some(1), Some(1), Some(0)]);
    }

    #[test]
    fn test_recode_rejects_numeric_non_binary() {
        let df = df! {
            "lottery" => [0i64, 1, 2],
        }
        .unwrap();

        let err = recode_binary(&df, &LOTTERY_RECODE).unwrap_err();
        assert!(err.to_string().contains("unexpected label '2'"));
    }
}
