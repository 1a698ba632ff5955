use serde::{Deserialize, Deserializer, Serialize};

/// The six inputs of a GSM check, all confirmed in centimeters / grams.
///
/// Field names on the wire match the `validate_book_gsm` function schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GsmParameters {
    #[serde(rename = "length")]
    pub length_cm: f64,
    #[serde(rename = "breadth")]
    pub breadth_cm: f64,
    #[serde(rename = "textPages", deserialize_with = "whole_number")]
    pub text_pages: u32,
    #[serde(rename = "textGSM")]
    pub text_gsm: f64,
    #[serde(rename = "coverGSM")]
    pub cover_gsm: f64,
    #[serde(rename = "measuredWeight")]
    pub measured_weight_g: f64,
}

impl GsmParameters {
    pub fn new(
        length_cm: f64,
        breadth_cm: f64,
        text_pages: u32,
        text_gsm: f64,
        cover_gsm: f64,
        measured_weight_g: f64,
    ) -> Self {
        Self {
            length_cm,
            breadth_cm,
            text_pages,
            text_gsm,
            cover_gsm,
            measured_weight_g,
        }
    }
}

// Models frequently send page counts as `200.0`; accept any whole number.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a whole, non-negative page count, got {value}"
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Passed,
    Underweight,
    Overweight,
    Error,
}

/// Whether the declared text GSM was accepted or replaced by a back-solved one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GsmStatus {
    Correct,
    Calculated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculations {
    /// Area of one page in square meters, 4 decimal places.
    pub page_area: f64,
    pub nominal_weight: f64,
    pub min_estimated_weight: f64,
    pub max_estimated_weight: f64,
    pub measured_weight: f64,
    #[serde(rename = "actualGSMUsed")]
    pub actual_gsm_used: f64,
    pub weight_difference_from_min: f64,
    pub weight_difference_from_max: f64,
}

/// Outcome of one GSM check. `calculations` and `gsm_status` are `None`
/// exactly when `status` is `ERROR`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub message: String,
    #[serde(rename = "gsmStatus")]
    pub gsm_status: Option<GsmStatus>,
    pub calculations: Option<Calculations>,
    pub inputs: GsmParameters,
}

impl ValidationResult {
    pub fn is_error(&self) -> bool {
        self.status == ValidationStatus::Error
    }

    pub fn actual_gsm(&self) -> Option<f64> {
        self.calculations.map(|c| c.actual_gsm_used)
    }
}
