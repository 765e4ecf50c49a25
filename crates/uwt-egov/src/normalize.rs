//! Normalization of raw processing-time payloads into flat wait-time records.

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

use crate::error::EgovError;
use crate::types::{ProcessingTimeReport, RangeBound};

/// One flattened wait-time observation for a (form, subtype, office) at a
/// point in time. `range_start_*` is always the lower (fastest) bound and
/// `range_end_*` the upper (slowest) bound, whatever order the wire used.
#[derive(Debug, Clone, Serialize)]
pub struct WaitTimeRecord {
    pub form: String,
    pub subtype_form: Option<String>,
    pub office_code: String,
    pub office_name: String,
    pub range_start_value: f64,
    pub range_start_units: String,
    pub range_end_value: f64,
    pub range_end_units: String,
    pub processed_at: DateTime<Utc>,
}

/// Splits a wire-order range into `(lower, upper)` bounds.
///
/// The upstream serializes every two-bound range as `[upper, lower]`. The
/// swap back into start/end order lives in exactly this one function; both
/// the normalizer and the window resolver go through it.
///
/// # Errors
///
/// Returns [`EgovError::MalformedPayload`] when the range does not hold
/// exactly two bounds.
pub fn ordered_bounds<'a>(
    range: &'a [RangeBound],
    context: &str,
) -> Result<(&'a RangeBound, &'a RangeBound), EgovError> {
    match range {
        [upper, lower] => Ok((lower, upper)),
        _ => Err(EgovError::MalformedPayload {
            context: context.to_string(),
            reason: format!("expected a two-bound range, got {} bounds", range.len()),
        }),
    }
}

/// Flattens a processing-time report into one record per published range.
///
/// A report with a top-level `range` yields a single record with
/// `subtype_form = None`; otherwise one record is emitted per subtype, in
/// payload order. All records from one call share the same `processed_at`,
/// truncated to whole seconds.
///
/// # Errors
///
/// Returns [`EgovError::MalformedPayload`] when the report carries neither a
/// top-level range nor any subtypes, or when any range is not a two-bound
/// pair.
pub fn normalize(
    report: &ProcessingTimeReport,
    office_name: &str,
    form_code: &str,
    office_code: &str,
    now: DateTime<Utc>,
) -> Result<Vec<WaitTimeRecord>, EgovError> {
    let context = format!("{form_code}/{office_code}");
    let processed_at = now.with_nanosecond(0).unwrap_or(now);

    if let Some(range) = report.range.as_deref() {
        let (lower, upper) = ordered_bounds(range, &context)?;
        return Ok(vec![record(
            report,
            None,
            office_name,
            lower,
            upper,
            processed_at,
        )]);
    }

    if report.subtypes.is_empty() {
        return Err(EgovError::MalformedPayload {
            context,
            reason: "payload has neither a range nor subtypes".to_string(),
        });
    }

    report
        .subtypes
        .iter()
        .map(|subtype| {
            let (lower, upper) = ordered_bounds(&subtype.range, &context)?;
            Ok(record(
                report,
                Some(subtype.form_type.clone()),
                office_name,
                lower,
                upper,
                processed_at,
            ))
        })
        .collect()
}

fn record(
    report: &ProcessingTimeReport,
    subtype_form: Option<String>,
    office_name: &str,
    lower: &RangeBound,
    upper: &RangeBound,
    processed_at: DateTime<Utc>,
) -> WaitTimeRecord {
    WaitTimeRecord {
        form: report.form_name.clone(),
        subtype_form,
        office_code: report.office_code.clone(),
        office_name: office_name.to_string(),
        range_start_value: lower.value,
        range_start_units: lower.unit.clone(),
        range_end_value: upper.value,
        range_end_units: upper.unit.clone(),
        processed_at,
    }
}
