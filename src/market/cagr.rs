use chrono::NaiveDate;

use super::MarketDataError;

const DAYS_PER_YEAR: f64 = 365.0;
const WINDOWS_YEARS: [f64; 3] = [10.0, 5.0, 3.0];
const MIN_WINDOW_YEARS: f64 = 0.5;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CagrStats {
    pub cagr_pct: f64,
    pub years_used: f64,
    pub samples: usize,
}

fn years_between(start: NaiveDate, end: NaiveDate) -> f64 {
    (end - start).num_days() as f64 / DAYS_PER_YEAR
}

fn pick_window(sorted: &[PricePoint], target_years: f64) -> Option<&[PricePoint]> {
    let last = sorted.last()?;
    let start_idx = sorted
        .iter()
        .position(|p| years_between(p.date, last.date) <= target_years)?;
    if start_idx + 1 >= sorted.len() {
        return None;
    }
    let window = &sorted[start_idx..];
    if years_between(window[0].date, last.date) < MIN_WINDOW_YEARS {
        return None;
    }
    Some(window)
}

fn growth_pct(start: f64, end: f64, years: f64) -> Result<f64, MarketDataError> {
    if !(start.is_finite() && end.is_finite()) || start <= 0.0 || end < 0.0 {
        return Err(MarketDataError::InsufficientData(
            "non-positive or non-finite close price".to_string(),
        ));
    }
    let cagr = (end / start).powf(1.0 / years) - 1.0;
    Ok((cagr * 100.0 * 100.0).round() / 100.0)
}

/// Annualised growth of a closing-price series. Prefers the trailing 10, 5
/// then 3 year window; otherwise uses the full span with at least one year.
pub fn cagr_from_series(points: &[PricePoint]) -> Result<CagrStats, MarketDataError> {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.date);

    for target in WINDOWS_YEARS {
        if let Some(window) = pick_window(&sorted, target) {
            let start = window[0];
            let end = window[window.len() - 1];
            let years_used = years_between(start.date, end.date);
            return Ok(CagrStats {
                cagr_pct: growth_pct(start.close, end.close, years_used)?,
                years_used,
                samples: window.len(),
            });
        }
    }

    if sorted.len() < 2 {
        return Err(MarketDataError::InsufficientData(format!(
            "{} samples",
            sorted.len()
        )));
    }
    let start = sorted[0];
    let end = sorted[sorted.len() - 1];
    let years_used = years_between(start.date, end.date);
    Ok(CagrStats {
        cagr_pct: growth_pct(start.close, end.close, years_used.max(1.0))?,
        years_used,
        samples: sorted.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(y: i32, m: u32, d: u32, close: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(y, m, d).expect("valid date"),
            close,
        }
    }

    #[test]
    fn doubling_over_ten_years_is_about_seven_percent() {
        let points = vec![
            point(2014, 1, 4, 100.0),
            point(2019, 1, 2, 150.0),
            point(2024, 1, 1, 200.0),
        ];
        let stats = cagr_from_series(&points).expect("cagr");
        assert_eq!(stats.samples, 3);
        assert!((stats.years_used - 10.0).abs() < 0.01);
        assert!((stats.cagr_pct - 7.18).abs() < 0.02, "{}", stats.cagr_pct);
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let points = vec![
            point(2024, 1, 1, 121.0),
            point(2022, 1, 1, 100.0),
            point(2023, 1, 1, 110.0),
        ];
        let stats = cagr_from_series(&points).expect("cagr");
        assert_eq!(stats.samples, 3);
        assert!((stats.cagr_pct - 10.0).abs() < 0.05, "{}", stats.cagr_pct);
    }

    #[test]
    fn short_series_uses_full_span_with_one_year_floor() {
        let points = vec![point(2024, 1, 1, 100.0), point(2024, 3, 1, 105.0)];
        let stats = cagr_from_series(&points).expect("cagr");
        assert_eq!(stats.cagr_pct, 5.0);
        assert!(stats.years_used < 0.5);
    }

    #[test]
    fn single_point_is_insufficient() {
        let err = cagr_from_series(&[point(2024, 1, 1, 100.0)]).expect_err("too short");
        assert!(matches!(err, MarketDataError::InsufficientData(_)));
    }

    #[test]
    fn zero_start_price_is_rejected() {
        let points = vec![point(2020, 1, 1, 0.0), point(2024, 1, 1, 100.0)];
        assert!(cagr_from_series(&points).is_err());
    }
}
