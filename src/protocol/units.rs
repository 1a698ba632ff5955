/// Verdict of the unit heuristic for a raw length or breadth value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitCheck {
    /// Plausible as centimeters; accept without asking.
    Centimeters,
    /// Too small for centimeters; ask whether the user meant inches.
    LikelyInches { as_centimeters: f64 },
    /// Too large for centimeters; ask whether the user meant millimeters.
    LikelyMillimeters { as_centimeters: f64 },
}

impl UnitCheck {
    pub fn needs_confirmation(&self) -> bool {
        !matches!(self, UnitCheck::Centimeters)
    }

    /// The converted value if the user confirms the suspected unit.
    pub fn converted(&self) -> Option<f64> {
        match self {
            UnitCheck::Centimeters => None,
            UnitCheck::LikelyInches { as_centimeters }
            | UnitCheck::LikelyMillimeters { as_centimeters } => Some(*as_centimeters),
        }
    }
}

pub const CM_PER_INCH: f64 = 2.54;
pub const CM_PER_MM: f64 = 0.1;

/// Thresholds for the "did you mean another unit?" confirmation step.
///
/// Values inside `[min_cm, max_cm]` are taken as centimeters. The policy never
/// converts silently: callers must ask and only apply the conversion once the
/// user confirms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPolicy {
    pub min_cm: f64,
    pub max_cm: f64,
}

impl Default for UnitPolicy {
    fn default() -> Self {
        Self {
            min_cm: 10.0,
            max_cm: 30.0,
        }
    }
}

impl UnitPolicy {
    pub fn check(&self, raw: f64) -> UnitCheck {
        if raw < self.min_cm {
            UnitCheck::LikelyInches {
                as_centimeters: raw * CM_PER_INCH,
            }
        } else if raw > self.max_cm {
            UnitCheck::LikelyMillimeters {
                as_centimeters: raw * CM_PER_MM,
            }
        } else {
            UnitCheck::Centimeters
        }
    }
}
