use std::collections::HashMap;
use std::path::PathBuf;

use polars::prelude::DataFrame;
use pyo3::prelude::*;
use pyo3_polars::PyDataFrame;

use crate::aggregate::{self, MonthlyPoint, SeasonalProfile};
use crate::cascade;
use crate::dataset;
use crate::error::ForecastError;
use crate::filter::apply_selection;
use crate::forecast;
use crate::selection::Selection;
use crate::visualization::{self, ChartConfig};

/// Stateful dashboard entry point: holds the base path and the loaded
/// record frame across interactions. Everything derived from a selection
/// is recomputed per call - the frame is the only cached state.
#[pyclass]
pub struct SalesModel {
    base_path: PathBuf,
    records: Option<DataFrame>,
}

#[pymethods]
impl SalesModel {
    #[new]
    fn new(base_path: String) -> Self {
        Self {
            base_path: PathBuf::from(base_path),
            records: None,
        }
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load any CSV into a Polars DataFrame with all columns as strings.
    /// Optionally rename columns via a map.
    #[pyo3(signature = (filename, rename=None))]
    fn load_csv(
        &self,
        filename: &str,
        rename: Option<HashMap<String, String>>,
    ) -> PyResult<PyDataFrame> {
        let df = dataset::read_csv_as_strings(&self.base_path.join(filename), rename)?;
        Ok(PyDataFrame(df))
    }

    /// Load the sales CSV and validate it into the record frame.
    ///
    /// Required columns (after the optional rename):
    ///     country, client, product, sale_date, amount
    /// sale_date is parsed with `date_format` (default "%Y-%m-%d", strict);
    /// amount is parsed as Float64. The derived year and month columns are
    /// computed once here and cached on the frame. An empty file is a load
    /// error - the pipeline halts before any filtering.
    #[pyo3(signature = (filename=None, rename=None, date_format=None))]
    fn load_sales(
        &mut self,
        filename: Option<&str>,
        rename: Option<HashMap<String, String>>,
        date_format: Option<&str>,
    ) -> PyResult<PyDataFrame> {
        let fname = filename.unwrap_or("sales.csv");
        let df = dataset::load_records(&self.base_path.join(fname), rename, date_format)?;
        self.records = Some(df.clone());
        Ok(PyDataFrame(df))
    }

    // ── Cascading filter options ────────────────────────────────────────────

    /// All selectable countries. Never depends on other selections.
    fn country_options(&self) -> PyResult<Vec<String>> {
        Ok(cascade::country_options(self.records()?)?)
    }

    /// Clients available within the selection's countries.
    fn client_options(&self, selection: Selection) -> PyResult<Vec<String>> {
        Ok(cascade::client_options(self.records()?, &selection.countries)?)
    }

    /// Products available within the selection's countries and clients.
    fn product_options(&self, selection: Selection) -> PyResult<Vec<String>> {
        Ok(cascade::product_options(
            self.records()?,
            &selection.countries,
            &selection.clients,
        )?)
    }

    // ── Pipeline ────────────────────────────────────────────────────────────

    /// The working subset of records for the given selection.
    ///
    /// Raises when nothing matches - downstream aggregation needs at least
    /// one record, so the caller shows "no data matches" instead.
    fn filter_records(&self, selection: Selection) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(apply_selection(self.records()?, &selection)?))
    }

    /// Monthly totals frame: year, month, total, month_start - sorted by
    /// (year, month).
    fn monthly_totals(&self, selection: Selection) -> PyResult<PyDataFrame> {
        let points = self.monthly_points(&selection)?;
        Ok(PyDataFrame(aggregate::monthly_frame(&points)?))
    }

    /// Seasonal averages frame: month 1..12, average. Months without
    /// historical coverage average to 0.
    fn seasonal_averages(&self, selection: Selection) -> PyResult<PyDataFrame> {
        let points = self.monthly_points(&selection)?;
        let profile = aggregate::seasonal_averages(&points);
        Ok(PyDataFrame(aggregate::seasonal_frame(&profile)?))
    }

    /// Forecast frame for the year after the latest observed one:
    /// month_start, month, forecast - twelve rows, chronological.
    fn forecast_next_year(&self, selection: Selection) -> PyResult<PyDataFrame> {
        let (points, profile) = self.points_and_profile(&selection)?;
        let projected = forecast::project_next_year(&points, &profile)?;
        Ok(PyDataFrame(forecast::forecast_frame(&projected)?))
    }

    // ── Visualization ───────────────────────────────────────────────────────

    /// Render the historical series plus the forecast line as a
    /// self-contained HTML chart.
    ///
    /// Returns an HTML string with SVG and JS; embed it with
    /// `IPython.display.HTML` or `st.components.v1.html`.
    #[pyo3(signature = (selection, width_px=900, height_px=420))]
    fn visualize_forecast(
        &self,
        selection: Selection,
        width_px: u32,
        height_px: u32,
    ) -> PyResult<String> {
        let (points, profile) = self.points_and_profile(&selection)?;
        let projected = forecast::project_next_year(&points, &profile)?;
        let config = ChartConfig {
            width_px,
            height_px,
        };
        Ok(visualization::generate_forecast_html(
            &points, &projected, &config,
        ))
    }

    // ── Properties ──────────────────────────────────────────────────────────

    #[getter]
    fn records_df(&self) -> PyResult<Option<PyDataFrame>> {
        Ok(self.records.clone().map(PyDataFrame))
    }
}

// ── Private helpers ─────────────────────────────────────────────────────────

impl SalesModel {
    fn records(&self) -> Result<&DataFrame, ForecastError> {
        self.records
            .as_ref()
            .ok_or_else(|| ForecastError::NotLoaded("sales records".into()))
    }

    fn monthly_points(&self, selection: &Selection) -> Result<Vec<MonthlyPoint>, ForecastError> {
        let filtered = apply_selection(self.records()?, selection)?;
        aggregate::monthly_totals(&filtered)
    }

    fn points_and_profile(
        &self,
        selection: &Selection,
    ) -> Result<(Vec<MonthlyPoint>, SeasonalProfile), ForecastError> {
        let points = self.monthly_points(selection)?;
        let profile = aggregate::seasonal_averages(&points);
        Ok((points, profile))
    }
}
