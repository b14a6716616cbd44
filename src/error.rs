#[cfg(feature = "python")]
use pyo3::exceptions::PyRuntimeError;
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Data not loaded: {0}")]
    NotLoaded(String),

    #[error("Source data is empty: {0}")]
    EmptySource(String),

    #[error("No records match the current filter selection")]
    EmptyFilterResult,

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("{0}")]
    General(String),
}

#[cfg(feature = "python")]
impl From<ForecastError> for PyErr {
    fn from(err: ForecastError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}
