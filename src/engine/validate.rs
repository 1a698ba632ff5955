use super::types::{Calculations, GsmParameters, GsmStatus, ValidationResult, ValidationStatus};
use crate::error::EngineError;

/// Lower edge of the acceptance band, as a fraction of the nominal weight.
pub const BAND_LOWER: f64 = 0.96;
/// Upper edge of the acceptance band, as a fraction of the nominal weight.
pub const BAND_UPPER: f64 = 1.04;

/// Check a book's measured weight against the weight implied by its declared
/// dimensions and paper weights.
///
/// Never panics and never returns an error: contract violations (zero pages,
/// non-positive dimensions, non-finite inputs) produce a result with
/// `status = ERROR` and no calculations.
pub fn validate(params: &GsmParameters) -> ValidationResult {
    match calculate(params) {
        Ok((status, gsm_status, calculations)) => ValidationResult {
            status,
            message: result_message(params, status).to_string(),
            gsm_status: Some(gsm_status),
            calculations: Some(calculations),
            inputs: *params,
        },
        Err(error) => {
            tracing::debug!(error = %error, "GSM check rejected its inputs");
            ValidationResult {
                status: ValidationStatus::Error,
                message: format!("Error in GSM calculation: {error}"),
                gsm_status: None,
                calculations: None,
                inputs: *params,
            }
        }
    }
}

/// Nominal book weight in grams implied by the declared values.
///
/// Each physical leaf carries two printed pages; the cover contributes a
/// front and a back sheet.
pub fn nominal_weight_g(params: &GsmParameters) -> f64 {
    let area_m2 = page_area_m2(params);
    let leaves = f64::from(params.text_pages) / 2.0;
    let nominal_kg = area_m2 * (leaves * params.text_gsm / 1000.0 + 2.0 * params.cover_gsm / 1000.0);
    nominal_kg * 1000.0
}

fn page_area_m2(params: &GsmParameters) -> f64 {
    (params.length_cm / 100.0) * (params.breadth_cm / 100.0)
}

fn calculate(
    params: &GsmParameters,
) -> Result<(ValidationStatus, GsmStatus, Calculations), EngineError> {
    check_inputs(params)?;

    let area_m2 = page_area_m2(params);
    let nominal_g = nominal_weight_g(params);
    if !nominal_g.is_finite() {
        return Err(EngineError::Overflow {
            quantity: "nominal weight",
        });
    }

    // Compare against the reported (rounded) bounds so that a measurement equal
    // to a printed bound always passes.
    let min_g = round2(nominal_g * BAND_LOWER);
    let max_g = round2(nominal_g * BAND_UPPER);
    let measured_g = params.measured_weight_g;

    let (status, gsm_status, actual_gsm) = if (min_g..=max_g).contains(&measured_g) {
        (ValidationStatus::Passed, GsmStatus::Correct, params.text_gsm)
    } else {
        let status = if measured_g < min_g {
            ValidationStatus::Underweight
        } else {
            ValidationStatus::Overweight
        };
        (
            status,
            GsmStatus::Calculated,
            back_solve_text_gsm(params, area_m2)?,
        )
    };

    let calculations = Calculations {
        page_area: round4(area_m2),
        nominal_weight: round2(nominal_g),
        min_estimated_weight: min_g,
        max_estimated_weight: max_g,
        measured_weight: round2(measured_g),
        actual_gsm_used: actual_gsm,
        weight_difference_from_min: round2(measured_g - min_g),
        weight_difference_from_max: round2(measured_g - max_g),
    };

    Ok((status, gsm_status, calculations))
}

/// Weight in grams of the two cover sheets alone.
pub fn cover_weight_g(params: &GsmParameters) -> f64 {
    page_area_m2(params) * 2.0 * params.cover_gsm
}

/// Whether the measured weight does not even account for the cover, in which
/// case the back-solved text GSM is clamped to zero.
pub fn below_cover_weight(params: &GsmParameters) -> bool {
    params.measured_weight_g <= cover_weight_g(params)
}

/// Invert the nominal-weight formula for the text GSM, keeping the declared
/// cover GSM fixed.
fn back_solve_text_gsm(params: &GsmParameters, area_m2: f64) -> Result<f64, EngineError> {
    let leaves = f64::from(params.text_pages) / 2.0;
    let gsm = (params.measured_weight_g / area_m2 - 2.0 * params.cover_gsm) / leaves;
    if gsm.is_finite() {
        // At or below the cover weight there is no text paper left to weigh.
        let gsm = gsm.round();
        Ok(if gsm > 0.0 { gsm } else { 0.0 })
    } else {
        Err(EngineError::Overflow {
            quantity: "text GSM",
        })
    }
}

fn check_inputs(params: &GsmParameters) -> Result<(), EngineError> {
    let fields = [
        ("length", params.length_cm),
        ("breadth", params.breadth_cm),
        ("textGSM", params.text_gsm),
        ("coverGSM", params.cover_gsm),
        ("measuredWeight", params.measured_weight_g),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(EngineError::NonFinite { name });
        }
    }

    if params.text_pages == 0 {
        return Err(EngineError::ZeroPages);
    }

    for &(name, value) in &fields[..4] {
        if value <= 0.0 {
            return Err(EngineError::NonPositive { name, value });
        }
    }

    if params.measured_weight_g < 0.0 {
        return Err(EngineError::Negative {
            name: "measuredWeight",
            value: params.measured_weight_g,
        });
    }

    Ok(())
}

fn result_message(params: &GsmParameters, status: ValidationStatus) -> &'static str {
    if status == ValidationStatus::Underweight && below_cover_weight(params) {
        return "GSM validation failed - measured weight is at or below the weight of the cover alone; check the measurement";
    }
    status_message(status)
}

fn status_message(status: ValidationStatus) -> &'static str {
    match status {
        ValidationStatus::Passed => {
            "GSM validation passed - measured weight is within the ±4% band around the nominal weight"
        }
        ValidationStatus::Underweight => {
            "GSM validation failed - book is lighter than the ±4% band; text GSM recalculated from the measured weight"
        }
        ValidationStatus::Overweight => {
            "GSM validation failed - book is heavier than the ±4% band; text GSM recalculated from the measured weight"
        }
        ValidationStatus::Error => "GSM validation could not be computed",
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
