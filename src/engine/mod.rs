//! Deterministic GSM validation: declared dimensions and paper weights in,
//! verdict and calculation breakdown out. No I/O, no state.

pub mod types;
pub mod validate;

pub use types::{Calculations, GsmParameters, GsmStatus, ValidationResult, ValidationStatus};
pub use validate::{
    BAND_LOWER, BAND_UPPER, below_cover_weight, cover_weight_g, nominal_weight_g, validate,
};
