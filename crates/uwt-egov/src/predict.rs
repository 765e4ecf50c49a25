//! Completion-window projection from an archived processing-time report.

use chrono::{Duration, NaiveDate};

use crate::error::EgovError;
use crate::normalize::ordered_bounds;
use crate::types::ProcessingTimeReport;

/// Average month length used for range projection: 365/12 days in whole
/// seconds. Archived predictions were computed with this constant; replacing
/// it with calendar-aware month addition would make old results
/// unreproducible, so it stays fixed.
const AVG_MONTH_SECS: f64 = 365.0 / 12.0 * 86_400.0;

const MONTHS_UNIT: &str = "Months";

/// Projects the completion window for one application: the dates at which
/// the subtype's lower and upper processing times elapse, counted from the
/// received date.
///
/// # Errors
///
/// - [`EgovError::SubtypeNotFound`] when the report has no subtype with the
///   requested `form_type`.
/// - [`EgovError::UnsupportedUnit`] when either bound is denominated in
///   anything but months.
/// - [`EgovError::MalformedPayload`] when the subtype's range is not a
///   two-bound pair or the projected date is unrepresentable.
pub fn completion_window(
    report: &ProcessingTimeReport,
    subtype_form_type: &str,
    received_date: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), EgovError> {
    let subtype = report
        .subtypes
        .iter()
        .find(|s| s.form_type == subtype_form_type)
        .ok_or_else(|| EgovError::SubtypeNotFound {
            form_type: subtype_form_type.to_string(),
        })?;

    let (lower, upper) = ordered_bounds(&subtype.range, subtype_form_type)?;
    for bound in [lower, upper] {
        if bound.unit != MONTHS_UNIT {
            return Err(EgovError::UnsupportedUnit {
                unit: bound.unit.clone(),
            });
        }
    }

    Ok((
        project(received_date, lower.value, subtype_form_type)?,
        project(received_date, upper.value, subtype_form_type)?,
    ))
}

/// Adds `months` average months to `date`. The span is computed in whole
/// seconds and the date addition keeps only whole days, so the sub-day
/// remainder of the month constant is dropped.
fn project(date: NaiveDate, months: f64, context: &str) -> Result<NaiveDate, EgovError> {
    let span = Duration::seconds((months * AVG_MONTH_SECS) as i64);
    date.checked_add_signed(span)
        .ok_or_else(|| EgovError::MalformedPayload {
            context: context.to_string(),
            reason: format!("projected date out of range for {months} months"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RangeBound, SubtypeReport};

    fn bound(value: f64, unit: &str) -> RangeBound {
        RangeBound {
            value,
            unit: unit.to_string(),
        }
    }

    fn report_with(subtypes: Vec<SubtypeReport>) -> ProcessingTimeReport {
        ProcessingTimeReport {
            form_name: "I-485".to_string(),
            office_code: "NBC".to_string(),
            range: None,
            subtypes,
        }
    }

    fn family_subtype(upper: RangeBound, lower: RangeBound) -> SubtypeReport {
        SubtypeReport {
            form_type: "Family-based adjustment applications".to_string(),
            range: vec![upper, lower],
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn two_to_four_months_from_new_year() {
        let report = report_with(vec![family_subtype(
            bound(4.0, "Months"),
            bound(2.0, "Months"),
        )]);

        let (lower, upper) = completion_window(
            &report,
            "Family-based adjustment applications",
            date(2024, 1, 1),
        )
        .unwrap();

        // 2 × 365/12 days = 60.83 → 60 whole days; 4 × = 121.67 → 121.
        assert_eq!(lower, date(2024, 3, 1));
        assert_eq!(upper, date(2024, 5, 1));
    }

    #[test]
    fn fractional_month_values_project() {
        let report = report_with(vec![family_subtype(
            bound(12.5, "Months"),
            bound(4.5, "Months"),
        )]);

        let (lower, upper) = completion_window(
            &report,
            "Family-based adjustment applications",
            date(2024, 1, 1),
        )
        .unwrap();

        // 4.5 months → 136 whole days; 12.5 months → 380 whole days.
        assert_eq!(lower, date(2024, 1, 1) + Duration::days(136));
        assert_eq!(upper, date(2024, 1, 1) + Duration::days(380));
    }

    #[test]
    fn missing_subtype_is_a_distinct_error() {
        let report = report_with(vec![family_subtype(
            bound(4.0, "Months"),
            bound(2.0, "Months"),
        )]);

        let result = completion_window(&report, "Employment-based", date(2024, 1, 1));
        assert!(
            matches!(
                result,
                Err(EgovError::SubtypeNotFound { ref form_type }) if form_type == "Employment-based"
            ),
            "expected SubtypeNotFound, got: {result:?}"
        );
    }

    #[test]
    fn non_month_unit_is_rejected() {
        let report = report_with(vec![family_subtype(
            bound(10.0, "Weeks"),
            bound(2.0, "Months"),
        )]);

        let result = completion_window(
            &report,
            "Family-based adjustment applications",
            date(2024, 1, 1),
        );
        assert!(
            matches!(
                result,
                Err(EgovError::UnsupportedUnit { ref unit }) if unit == "Weeks"
            ),
            "expected UnsupportedUnit, got: {result:?}"
        );
    }

    #[test]
    fn non_month_unit_on_lower_bound_is_rejected() {
        let report = report_with(vec![family_subtype(
            bound(10.0, "Months"),
            bound(8.0, "Weeks"),
        )]);

        let result = completion_window(
            &report,
            "Family-based adjustment applications",
            date(2024, 1, 1),
        );
        assert!(matches!(result, Err(EgovError::UnsupportedUnit { .. })));
    }

    #[test]
    fn malformed_subtype_range_is_rejected() {
        let report = report_with(vec![SubtypeReport {
            form_type: "Family-based adjustment applications".to_string(),
            range: vec![bound(4.0, "Months")],
        }]);

        let result = completion_window(
            &report,
            "Family-based adjustment applications",
            date(2024, 1, 1),
        );
        assert!(matches!(result, Err(EgovError::MalformedPayload { .. })));
    }
}
