//! Derived columns: age, visit indicator and squared age

use polars::prelude::*;

use super::error::AnalysisResult;
use super::schema::{numeric_values, AGE, AGE_SQUARED, BIRTH_YEAR, DOCTOR_VISITS, VISIT_INDICATOR};

/// Survey year the ages are measured against
pub const DEFAULT_REFERENCE_YEAR: i32 = 2010;

/// Attach `age = reference_year - birthyear`
pub fn add_age(df: &mut DataFrame, reference_year: i32) -> AnalysisResult<()> {
    let ages: Vec<f64> = numeric_values(df, BIRTH_YEAR)?
        .into_iter()
        .map(|year| reference_year as f64 - year)
        .collect();
    df.with_column(Column::new(AGE.into(), ages))?;
    Ok(())
}

/// Attach `doc_visit_dummy`, 1 when at least one doctor visit was recorded
pub fn add_visit_indicator(df: &mut DataFrame) -> AnalysisResult<()> {
    let indicator: Vec<i32> = numeric_values(df, DOCTOR_VISITS)?
        .into_iter()
        .map(|visits| i32::from(visits > 0.0))
        .collect();
    df.with_column(Column::new(VISIT_INDICATOR.into(), indicator))?;
    Ok(())
}

/// Attach `age_squared`; requires `age`
pub fn add_age_squared(df: &mut DataFrame) -> AnalysisResult<()> {
    let squared: Vec<f64> = numeric_values(df, AGE)?
        .into_iter()
        .map(|age| age * age)
        .collect();
    df.with_column(Column::new(AGE_SQUARED.into(), squared))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_columns() {
        let mut df = df! {
            "birthyear" => [1980i64, 1950, 2000],
            "doc_visit_num" => [0i64, 3, 1],
        }
        .unwrap();

        add_age(&mut df, 2010).unwrap();
        add_visit_indicator(&mut df).unwrap();
        add_age_squared(&mut df).unwrap();

        assert_eq!(numeric_values(&df, "age").unwrap(), vec![30.0, 60.0, 10.0]);
        assert_eq!(
            numeric_values(&df, "doc_visit_dummy").unwrap(),
            vec![0.0, 1.0, 1.0]
        );
        assert_eq!(
            numeric_values(&df, "age_squared").unwrap(),
            vec![900.0, 3600.0, 100.0]
        );
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn test_age_squared_requires_age() {
        let mut df = df! { "birthyear" => [1980i64] }.unwrap();
        assert!(add_age_squared(&mut df).is_err());
    }
}
