use polars::prelude::*;

use crate::error::ForecastError;
use crate::selection::Selection;

/// Apply the final selection: AND across dimensions, OR within a dimension's
/// accepted set. An all-empty selection returns the record frame unchanged.
///
/// An empty result halts the pipeline with `EmptyFilterResult` - the stages
/// downstream require at least one record, so the caller surfaces "no data
/// matches" to the user instead of aggregating nothing.
pub fn apply_selection(
    records: &DataFrame,
    selection: &Selection,
) -> Result<DataFrame, ForecastError> {
    if selection.is_unconstrained() {
        return Ok(records.clone());
    }

    let mut lazy = records.clone().lazy();
    for (dim, values) in selection.constraints() {
        let accepted = Series::new("".into(), values.to_vec());
        lazy = lazy.filter(col(dim).is_in(lit(accepted), false));
    }

    let filtered = lazy.collect()?;
    if filtered.height() == 0 {
        return Err(ForecastError::EmptyFilterResult);
    }
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::sales;

    fn records() -> DataFrame {
        df!(
            sales::COUNTRY => [Some("US"), Some("US"), Some("MX"), None],
            sales::CLIENT => [Some("Acme"), Some("Bolt"), Some("Acme"), Some("Casa")],
            sales::PRODUCT => [Some("X"), Some("Y"), Some("X"), Some("Y")],
            sales::AMOUNT => [100.0, 50.0, 25.0, 10.0],
        )
        .unwrap()
    }

    fn countries(values: &[&str]) -> Selection {
        Selection {
            countries: values.iter().map(|s| s.to_string()).collect(),
            ..Selection::default()
        }
    }

    #[test]
    fn empty_selection_returns_the_full_record_set() {
        let filtered = apply_selection(&records(), &Selection::unconstrained()).unwrap();
        assert_eq!(filtered.height(), records().height());
    }

    #[test]
    fn dimensions_combine_with_and_values_with_or() {
        let selection = Selection {
            countries: vec!["US".to_string()],
            products: vec!["X".to_string(), "Y".to_string()],
            ..Selection::default()
        };
        let filtered = apply_selection(&records(), &selection).unwrap();
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn unmatched_selection_halts_with_empty_filter_result() {
        let selection = Selection {
            countries: vec!["US".to_string()],
            clients: vec!["B".to_string()],
            ..Selection::default()
        };
        let err = apply_selection(&records(), &selection).unwrap_err();
        assert!(matches!(err, ForecastError::EmptyFilterResult));
    }

    #[test]
    fn null_dimension_rows_survive_unconstrained_filtering() {
        // The null-country row passes when only client is constrained...
        let selection = Selection {
            clients: vec!["Casa".to_string()],
            ..Selection::default()
        };
        let filtered = apply_selection(&records(), &selection).unwrap();
        assert_eq!(filtered.height(), 1);

        // ...but set membership is false for null once country is constrained.
        let filtered = apply_selection(&records(), &countries(&["US", "MX"])).unwrap();
        assert_eq!(filtered.height(), 3);
    }
}
