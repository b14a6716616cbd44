use polars::prelude::*;

use crate::error::ForecastError;
use crate::schema::sales;

/// Distinct non-null values for `dimension`, restricted to records consistent
/// with the upstream constraints, lexicographically sorted.
///
/// An empty constraint slice imposes no filter (unconstrained is not "value
/// is empty"). An empty result is valid output, not a failure: the consumer
/// shows no selectable options.
pub fn dimension_options(
    records: &DataFrame,
    dimension: &str,
    upstream: &[(&str, &[String])],
) -> Result<Vec<String>, ForecastError> {
    let mut lazy = records.clone().lazy();
    for &(dim, values) in upstream {
        if values.is_empty() {
            continue;
        }
        let accepted = Series::new("".into(), values.to_vec());
        lazy = lazy.filter(col(dim).is_in(lit(accepted), false));
    }

    let options = lazy
        .select([col(dimension)
            .drop_nulls()
            .unique()
            .sort(SortOptions::default())])
        .collect()?;

    let values = options
        .column(dimension)?
        .str()?
        .into_iter()
        .filter_map(|v| v.map(|s| s.to_string()))
        .collect();

    Ok(values)
}

/// Options for the first cascade dimension; never depends on any selection.
pub fn country_options(records: &DataFrame) -> Result<Vec<String>, ForecastError> {
    dimension_options(records, sales::COUNTRY, &[])
}

/// Options for the second dimension, within the selected countries.
pub fn client_options(
    records: &DataFrame,
    countries: &[String],
) -> Result<Vec<String>, ForecastError> {
    dimension_options(records, sales::CLIENT, &[(sales::COUNTRY, countries)])
}

/// Options for the last dimension, within the selected countries and clients.
pub fn product_options(
    records: &DataFrame,
    countries: &[String],
    clients: &[String],
) -> Result<Vec<String>, ForecastError> {
    dimension_options(
        records,
        sales::PRODUCT,
        &[(sales::COUNTRY, countries), (sales::CLIENT, clients)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> DataFrame {
        df!(
            sales::COUNTRY => [Some("US"), Some("US"), Some("MX"), Some("MX"), None],
            sales::CLIENT => [Some("Acme"), Some("Bolt"), Some("Acme"), None, Some("Casa")],
            sales::PRODUCT => [Some("X"), Some("Y"), Some("Z"), Some("X"), Some("Y")],
        )
        .unwrap()
    }

    #[test]
    fn country_options_are_sorted_distinct_and_null_free() {
        let options = country_options(&records()).unwrap();
        assert_eq!(options, vec!["MX", "US"]);
    }

    #[test]
    fn unconstrained_client_options_list_every_client() {
        let options = client_options(&records(), &[]).unwrap();
        assert_eq!(options, vec!["Acme", "Bolt", "Casa"]);
    }

    #[test]
    fn client_options_follow_the_country_selection() {
        let us = vec!["US".to_string()];
        assert_eq!(client_options(&records(), &us).unwrap(), vec!["Acme", "Bolt"]);

        // MX has a null-client row: it must not surface as an option.
        let mx = vec!["MX".to_string()];
        assert_eq!(client_options(&records(), &mx).unwrap(), vec!["Acme"]);
    }

    #[test]
    fn product_options_follow_country_and_client() {
        let countries = vec!["US".to_string(), "MX".to_string()];
        let clients = vec!["Acme".to_string()];
        let options = product_options(&records(), &countries, &clients).unwrap();
        assert_eq!(options, vec!["X", "Z"]);
    }

    #[test]
    fn unmatched_upstream_selection_yields_an_empty_list() {
        let nowhere = vec!["BR".to_string()];
        let options = client_options(&records(), &nowhere).unwrap();
        assert!(options.is_empty());
    }
}
