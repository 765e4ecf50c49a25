//! Processing-times API response types.
//!
//! All types model the JSON structures returned by the egov REST API. Both
//! consumed endpoints wrap their payload in a `data` envelope; the structs
//! here mirror that nesting so deserialization is a single `from_value`.

use serde::Deserialize;

use crate::error::EgovError;

// ---------------------------------------------------------------------------
// formoffices
// ---------------------------------------------------------------------------

/// Top-level envelope for `GET /api/formoffices/{form_code}`:
/// `{ "data": { "form_offices": { "offices": [...] } } }`.
#[derive(Debug, Deserialize)]
pub struct FormOfficesResponse {
    pub data: FormOfficesData,
}

#[derive(Debug, Deserialize)]
pub struct FormOfficesData {
    pub form_offices: FormOffices,
}

#[derive(Debug, Deserialize)]
pub struct FormOffices {
    pub offices: Vec<Office>,
}

/// A processing center serving a form. Office codes are not globally unique
/// across forms, so an office is only meaningful alongside its form code.
#[derive(Debug, Clone, Deserialize)]
pub struct Office {
    pub office_code: String,
    pub office_name: String,
}

// ---------------------------------------------------------------------------
// processingtime
// ---------------------------------------------------------------------------

/// Top-level envelope for `GET /api/processingtime/{form_code}/{office_code}`.
#[derive(Debug, Deserialize)]
pub struct ProcessingTimeResponse {
    pub data: ProcessingTimeData,
}

#[derive(Debug, Deserialize)]
pub struct ProcessingTimeData {
    pub processing_time: ProcessingTimeReport,
}

/// Current processing-time figures for one (form, office) pair.
///
/// Exactly one of two shapes arrives on the wire: a single top-level `range`,
/// or a null/absent `range` with per-subtype ranges instead. Every `range`
/// array is ordered `[upper, lower]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingTimeReport {
    pub form_name: String,
    pub office_code: String,
    #[serde(default)]
    pub range: Option<Vec<RangeBound>>,
    #[serde(default)]
    pub subtypes: Vec<SubtypeReport>,
}

/// One end of a processing-time range, e.g. `{ "value": 11.5, "unit": "Months" }`.
#[derive(Debug, Clone, Deserialize)]
pub struct RangeBound {
    pub value: f64,
    pub unit: String,
}

/// A form sub-category with its own independent range.
#[derive(Debug, Clone, Deserialize)]
pub struct SubtypeReport {
    pub form_type: String,
    pub range: Vec<RangeBound>,
}

impl ProcessingTimeReport {
    /// Re-parses an archived raw snapshot payload into the typed report.
    ///
    /// # Errors
    ///
    /// Returns [`EgovError::Deserialize`] when the payload does not carry the
    /// `data.processing_time` envelope.
    pub fn from_snapshot(payload: &serde_json::Value) -> Result<Self, EgovError> {
        let envelope: ProcessingTimeResponse =
            serde_json::from_value(payload.clone()).map_err(|e| EgovError::Deserialize {
                context: "archived processing-time snapshot".to_string(),
                source: e,
            })?;
        Ok(envelope.data.processing_time)
    }
}
