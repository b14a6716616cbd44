#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::types::PyModule;

pub mod aggregate;
pub mod cascade;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod forecast;
pub mod schema;
pub mod selection;
pub mod visualization;

#[cfg(feature = "python")]
mod model;

pub use aggregate::{
    monthly_frame, monthly_totals, seasonal_averages, seasonal_frame, MonthlyPoint,
    SeasonalProfile,
};
pub use error::ForecastError;
pub use filter::apply_selection;
pub use forecast::{forecast_frame, project_next_year, ForecastPoint};
pub use selection::Selection;

/// Export schema constants as Python submodules
#[cfg(feature = "python")]
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Sales record columns
    let sales = PyModule::new(m.py(), "sales")?;
    sales.add("COUNTRY", schema::sales::COUNTRY)?;
    sales.add("CLIENT", schema::sales::CLIENT)?;
    sales.add("PRODUCT", schema::sales::PRODUCT)?;
    sales.add("SALE_DATE", schema::sales::SALE_DATE)?;
    sales.add("AMOUNT", schema::sales::AMOUNT)?;
    m.add_submodule(&sales)?;

    // Derived columns
    let derived = PyModule::new(m.py(), "derived")?;
    derived.add("YEAR", schema::derived::YEAR)?;
    derived.add("MONTH", schema::derived::MONTH)?;
    m.add_submodule(&derived)?;

    // Cascade order
    let dimension = PyModule::new(m.py(), "dimension")?;
    dimension.add("ORDER", schema::dimension::ORDER.to_vec())?;
    m.add_submodule(&dimension)?;

    // Monthly totals
    let monthly = PyModule::new(m.py(), "monthly")?;
    monthly.add("YEAR", schema::monthly::YEAR)?;
    monthly.add("MONTH", schema::monthly::MONTH)?;
    monthly.add("TOTAL", schema::monthly::TOTAL)?;
    monthly.add("MONTH_START", schema::monthly::MONTH_START)?;
    m.add_submodule(&monthly)?;

    // Seasonal averages
    let seasonal = PyModule::new(m.py(), "seasonal")?;
    seasonal.add("MONTH", schema::seasonal::MONTH)?;
    seasonal.add("AVERAGE", schema::seasonal::AVERAGE)?;
    m.add_submodule(&seasonal)?;

    // Forecast
    let forecast = PyModule::new(m.py(), "forecast")?;
    forecast.add("MONTH_START", schema::forecast::MONTH_START)?;
    forecast.add("MONTH", schema::forecast::MONTH)?;
    forecast.add("FORECAST", schema::forecast::FORECAST)?;
    m.add_submodule(&forecast)?;

    Ok(())
}

/// Display name for a calendar month (1..=12), or None outside that range.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "month_name")]
fn py_month_name(month: u32) -> Option<&'static str> {
    schema::month_name(month)
}

#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<model::SalesModel>()?;
    m.add_class::<selection::Selection>()?;
    m.add("MONTH_NAMES", schema::MONTH_NAMES.to_vec())?;
    m.add_function(wrap_pyfunction!(py_month_name, m)?)?;
    add_schema_exports(m)?;
    Ok(())
}
