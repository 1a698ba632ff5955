use super::traits::{FunctionHandler, FunctionKind, FunctionOutcome};
use crate::engine::{GsmParameters, validate};
use crate::error::DispatchError;
use crate::protocol::parameters_schema;
use serde_json::Value;

/// `validate_book_gsm`: runs the validation engine on confirmed inputs.
pub struct ValidateGsmFunction;

impl FunctionHandler for ValidateGsmFunction {
    fn kind(&self) -> FunctionKind {
        FunctionKind::ValidateBookGsm
    }

    fn description(&self) -> &str {
        "Validate the GSM of a book from its dimensions, page count, paper GSMs and measured weight. \
         Call only once all six values have been confirmed, with length and breadth in centimeters."
    }

    fn parameters_schema(&self) -> Value {
        parameters_schema()
    }

    fn call(&self, arguments: Value) -> Result<FunctionOutcome, DispatchError> {
        let params: GsmParameters =
            serde_json::from_value(arguments).map_err(|e| DispatchError::MalformedArguments {
                name: self.kind().name().to_string(),
                message: e.to_string(),
            })?;
        Ok(FunctionOutcome::Validation(validate(&params)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ValidationStatus;
    use serde_json::json;

    #[test]
    fn validates_complete_arguments() {
        let outcome = ValidateGsmFunction
            .call(json!({
                "length": 20, "breadth": 14, "textPages": 200,
                "textGSM": 80, "coverGSM": 250, "measuredWeight": 280
            }))
            .unwrap();
        let result = outcome.as_validation().unwrap();
        assert_eq!(result.status, ValidationStatus::Overweight);
        assert_eq!(outcome.payload()["gsmStatus"], "CALCULATED");
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = ValidateGsmFunction
            .call(json!({"length": 20, "breadth": 14}))
            .unwrap_err();
        assert!(matches!(err, DispatchError::MalformedArguments { .. }));
        assert!(err.to_string().contains("textPages"));
    }

    #[test]
    fn zero_pages_reaches_engine_as_error_result() {
        let outcome = ValidateGsmFunction
            .call(json!({
                "length": 20, "breadth": 14, "textPages": 0,
                "textGSM": 80, "coverGSM": 250, "measuredWeight": 280
            }))
            .unwrap();
        assert!(outcome.as_validation().unwrap().is_error());
        assert!(outcome.payload()["calculations"].is_null());
    }

    #[test]
    fn spec_is_named_for_the_wire() {
        let spec = ValidateGsmFunction.spec();
        assert_eq!(spec.name, "validate_book_gsm");
        assert_eq!(spec.parameters["required"].as_array().unwrap().len(), 6);
    }
}
