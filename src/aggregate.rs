use std::collections::BTreeMap;

use chrono::NaiveDate;
use polars::prelude::*;

use crate::error::ForecastError;
use crate::schema::{derived, monthly, sales, seasonal};

/// One (year, month) group of the filtered records.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

impl MonthlyPoint {
    /// First calendar day of this point's year-month.
    pub fn month_start(&self) -> NaiveDate {
        // month is 1..=12 by construction of monthly_totals
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("valid year-month")
    }
}

/// Group the filtered records by (year, month), summing `amount`.
///
/// Rows whose derived year/month are null (records without a parseable
/// sale date) carry no group key and are skipped; null amounts contribute
/// zero. Keys are unique and the output comes back sorted by (year, month).
pub fn monthly_totals(filtered: &DataFrame) -> Result<Vec<MonthlyPoint>, ForecastError> {
    let years = filtered.column(derived::YEAR)?.i32()?;
    let months = filtered.column(derived::MONTH)?.i32()?;
    let amounts = filtered.column(sales::AMOUNT)?.f64()?;

    let mut groups: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for i in 0..filtered.height() {
        let (Some(year), Some(month)) = (years.get(i), months.get(i)) else {
            continue; // dateless record: no group key
        };
        let month = u32::try_from(month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| ForecastError::InvalidData(format!("month out of range: {month}")))?;
        *groups.entry((year, month)).or_insert(0.0) += amounts.get(i).unwrap_or(0.0);
    }

    Ok(groups
        .into_iter()
        .map(|((year, month), total)| MonthlyPoint { year, month, total })
        .collect())
}

/// Monthly totals frame for the presentation layer.
///
/// Columns: year, month, total, month_start (Date) - sorted by (year, month).
pub fn monthly_frame(points: &[MonthlyPoint]) -> Result<DataFrame, ForecastError> {
    let years: Vec<i32> = points.iter().map(|p| p.year).collect();
    let months: Vec<i32> = points.iter().map(|p| p.month as i32).collect();
    let totals: Vec<f64> = points.iter().map(|p| p.total).collect();
    let starts: Vec<i32> = points
        .iter()
        .map(|p| days_from_epoch(p.month_start()))
        .collect();

    let df = DataFrame::new(vec![
        Column::new(monthly::YEAR.into(), &years),
        Column::new(monthly::MONTH.into(), &months),
        Column::new(monthly::TOTAL.into(), &totals),
        date_column(monthly::MONTH_START, &starts)?,
    ])?;
    Ok(df)
}

/// Per-calendar-month averages over all observed years.
///
/// Always carries all twelve months; a month with no historical coverage
/// averages to 0 and reports zero observed years.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalProfile {
    averages: [f64; 12],
    observed_years: [u32; 12],
}

impl SeasonalProfile {
    /// Average monthly total for `month`. Month must be 1..=12.
    pub fn average_for(&self, month: u32) -> f64 {
        self.averages[(month - 1) as usize]
    }

    /// Distinct years with data for `month` in the current filter scope.
    /// Month must be 1..=12.
    pub fn observed_years(&self, month: u32) -> u32 {
        self.observed_years[(month - 1) as usize]
    }
}

/// Collapse the monthly series into one average per calendar month.
///
/// The divisor for a month is exactly the count of distinct years observed
/// for it, so coverage may be uneven across months. A month with zero
/// observations averages to 0 - a deliberate simplification, not a
/// missing-data signal.
pub fn seasonal_averages(points: &[MonthlyPoint]) -> SeasonalProfile {
    let mut sums = [0.0f64; 12];
    let mut counts = [0u32; 12];
    for p in points {
        let idx = (p.month - 1) as usize;
        sums[idx] += p.total;
        counts[idx] += 1; // points are unique per (year, month)
    }

    let mut averages = [0.0f64; 12];
    for m in 0..12 {
        if counts[m] > 0 {
            averages[m] = sums[m] / f64::from(counts[m]);
        }
    }

    SeasonalProfile {
        averages,
        observed_years: counts,
    }
}

/// Twelve-row frame of the seasonal profile. Columns: month, average.
pub fn seasonal_frame(profile: &SeasonalProfile) -> Result<DataFrame, ForecastError> {
    let months: Vec<i32> = (1..=12).collect();
    let averages: Vec<f64> = (1..=12u32).map(|m| profile.average_for(m)).collect();

    DataFrame::new(vec![
        Column::new(seasonal::MONTH.into(), &months),
        Column::new(seasonal::AVERAGE.into(), &averages),
    ])
    .map_err(ForecastError::from)
}

/// Days since 1970-01-01, the physical representation of a polars Date.
pub(crate) fn days_from_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch is a valid date");
    date.signed_duration_since(epoch).num_days() as i32
}

pub(crate) fn date_column(name: &str, days: &[i32]) -> Result<Column, ForecastError> {
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(series.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtered() -> DataFrame {
        df!(
            derived::YEAR => [Some(2023), Some(2023), Some(2024), Some(2023), None],
            derived::MONTH => [Some(1), Some(1), Some(1), Some(3), None],
            sales::AMOUNT => [Some(100.0), Some(50.0), Some(300.0), Some(75.0), Some(999.0)],
        )
        .unwrap()
    }

    #[test]
    fn groups_by_year_month_and_skips_dateless_rows() {
        let points = monthly_totals(&filtered()).unwrap();
        assert_eq!(
            points,
            vec![
                MonthlyPoint { year: 2023, month: 1, total: 150.0 },
                MonthlyPoint { year: 2023, month: 3, total: 75.0 },
                MonthlyPoint { year: 2024, month: 1, total: 300.0 },
            ]
        );
    }

    #[test]
    fn grouped_sums_conserve_the_dated_total() {
        let df = filtered();
        let points = monthly_totals(&df).unwrap();

        let grouped: f64 = points.iter().map(|p| p.total).sum();
        // All rows with a date: 100 + 50 + 300 + 75.
        assert_eq!(grouped, 525.0);
    }

    #[test]
    fn monthly_frame_attaches_first_of_month_dates() {
        let points = monthly_totals(&filtered()).unwrap();
        let frame = monthly_frame(&points).unwrap();

        assert_eq!(frame.height(), 3);
        let starts = frame.column(monthly::MONTH_START).unwrap();
        assert_eq!(starts.dtype(), &DataType::Date);
        assert_eq!(
            starts.get(0).unwrap(),
            AnyValue::Date(days_from_epoch(
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
            ))
        );
    }

    #[test]
    fn seasonal_average_divides_by_observed_years_only() {
        let points = vec![
            MonthlyPoint { year: 2023, month: 1, total: 150.0 },
            MonthlyPoint { year: 2024, month: 1, total: 300.0 },
            MonthlyPoint { year: 2023, month: 3, total: 75.0 },
        ];
        let profile = seasonal_averages(&points);

        assert_eq!(profile.average_for(1), 225.0);
        assert_eq!(profile.observed_years(1), 2);
        // Month 3 has a single observed year: the divisor is 1, not 2.
        assert_eq!(profile.average_for(3), 75.0);
        assert_eq!(profile.observed_years(3), 1);
    }

    #[test]
    fn months_without_observations_average_to_zero() {
        let points = vec![MonthlyPoint { year: 2023, month: 1, total: 150.0 }];
        let profile = seasonal_averages(&points);

        for month in 2..=12 {
            assert_eq!(profile.average_for(month), 0.0);
            assert_eq!(profile.observed_years(month), 0);
        }
    }

    #[test]
    fn seasonal_frame_always_carries_twelve_months() {
        let profile = seasonal_averages(&[]);
        let frame = seasonal_frame(&profile).unwrap();

        assert_eq!(frame.height(), 12);
        let months: Vec<Option<i32>> = frame
            .column(seasonal::MONTH)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(months.first(), Some(&Some(1)));
        assert_eq!(months.last(), Some(&Some(12)));
    }

    #[test]
    fn out_of_range_month_is_invalid_data() {
        let df = df!(
            derived::YEAR => [Some(2023)],
            derived::MONTH => [Some(13)],
            sales::AMOUNT => [Some(1.0)],
        )
        .unwrap();

        let err = monthly_totals(&df).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidData(_)));
    }
}
