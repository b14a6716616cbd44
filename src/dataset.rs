use std::collections::HashMap;
use std::path::Path;

use polars::prelude::*;

use crate::error::ForecastError;
use crate::schema::{derived, sales};

/// Default strptime format for the sale date column.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names and applies optional rename.
///
/// The rename map lets localized sources (e.g. PAIS, CLIENTE, PRODUCTO,
/// FECHA, TOTAL VENDIDO) feed the canonical schema.
pub fn read_csv_as_strings(
    path: &Path,
    rename: Option<HashMap<String, String>>,
) -> Result<DataFrame, ForecastError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    // Trim whitespace from column names
    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    // Apply optional column rename
    if let Some(map) = rename {
        let old: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
        let new: Vec<&str> = map.values().map(|s| s.as_str()).collect();
        df = df.lazy().rename(old, new, true).collect()?;
    }

    Ok(df)
}

/// Validate a raw string-typed sales frame and cast it into the record frame.
///
/// Required columns: country, client, product, sale_date, amount.
/// `amount` is parsed to Float64 and `sale_date` to Date with the given
/// strptime format (strict - a malformed non-null date fails the load).
/// The derived `year` and `month` columns are computed here once and cached
/// on the frame; rows with a null sale_date keep null derived columns.
pub fn prepare_records(df: DataFrame, date_format: &str) -> Result<DataFrame, ForecastError> {
    require_columns(&df, &sales::REQUIRED)?;

    if df.height() == 0 {
        return Err(ForecastError::EmptySource(
            "the loaded sales data has no rows".to_string(),
        ));
    }

    let df = df
        .lazy()
        .with_columns([
            col(sales::AMOUNT)
                .str()
                .strip_chars(lit(" \t\r\n"))
                .cast(DataType::Float64),
            col(sales::SALE_DATE)
                .str()
                .strip_chars(lit(" \t\r\n"))
                .str()
                .to_date(StrptimeOptions {
                    format: Some(date_format.into()),
                    strict: true,
                    ..Default::default()
                }),
        ])
        .with_columns([
            col(sales::SALE_DATE).dt().year().alias(derived::YEAR),
            col(sales::SALE_DATE)
                .dt()
                .month()
                .cast(DataType::Int32)
                .alias(derived::MONTH),
        ])
        .collect()?;

    Ok(df)
}

/// Load and validate a sales CSV in one step.
pub fn load_records(
    path: &Path,
    rename: Option<HashMap<String, String>>,
    date_format: Option<&str>,
) -> Result<DataFrame, ForecastError> {
    let raw = read_csv_as_strings(path, rename)?;
    prepare_records(raw, date_format.unwrap_or(DEFAULT_DATE_FORMAT))
}

pub(crate) fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), ForecastError> {
    for &name in required {
        if df.column(name).is_err() {
            return Err(ForecastError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}
