use chrono::NaiveDate;
use polars::prelude::*;

use crate::aggregate::{date_column, days_from_epoch, MonthlyPoint, SeasonalProfile};
use crate::error::ForecastError;
use crate::schema::forecast;

/// One projected month of the target year.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub month_start: NaiveDate,
    pub month: u32,
    pub value: f64,
}

/// Project the seasonal profile over the year after the latest observed one.
///
/// Emits exactly twelve points with strictly increasing first-of-month
/// dates, one per calendar month of (max observed year + 1) - independent
/// of which months have historical coverage, so a 0 average still yields a
/// 0 point rather than a gap.
///
/// Refuses to run when no monthly points exist: without an observed year
/// there is no meaningful target year.
pub fn project_next_year(
    points: &[MonthlyPoint],
    profile: &SeasonalProfile,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    let latest_year = points.iter().map(|p| p.year).max().ok_or_else(|| {
        ForecastError::EmptySource("no monthly totals to project from".to_string())
    })?;
    let target_year = latest_year + 1;

    (1..=12u32)
        .map(|month| {
            let month_start = NaiveDate::from_ymd_opt(target_year, month, 1).ok_or_else(|| {
                ForecastError::InvalidData(format!(
                    "cannot build date {target_year}-{month:02}-01"
                ))
            })?;
            Ok(ForecastPoint {
                month_start,
                month,
                value: profile.average_for(month),
            })
        })
        .collect()
}

/// Twelve-row forecast frame, sorted chronologically.
///
/// Columns: month_start (Date), month, forecast.
pub fn forecast_frame(points: &[ForecastPoint]) -> Result<DataFrame, ForecastError> {
    let starts: Vec<i32> = points
        .iter()
        .map(|p| days_from_epoch(p.month_start))
        .collect();
    let months: Vec<i32> = points.iter().map(|p| p.month as i32).collect();
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();

    DataFrame::new(vec![
        date_column(forecast::MONTH_START, &starts)?,
        Column::new(forecast::MONTH.into(), &months),
        Column::new(forecast::FORECAST.into(), &values),
    ])
    .map_err(ForecastError::from)
}
