use super::parameters::Parameter;
use crate::engine::GsmParameters;
use crate::error::SessionError;
use std::fmt;

/// Where a conversation stands in gathering the six inputs of one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionState {
    #[default]
    Idle,
    Collecting(Parameter),
    ReadyToValidate,
    Validated,
}

impl fmt::Display for CollectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionState::Idle => f.write_str("Idle"),
            CollectionState::Collecting(param) => write!(f, "Collecting({param})"),
            CollectionState::ReadyToValidate => f.write_str("ReadyToValidate"),
            CollectionState::Validated => f.write_str("Validated"),
        }
    }
}

/// State machine over parameter acquisition, one parameter per step.
///
/// `Idle → Collecting(length) → … → Collecting(measuredWeight) →
/// ReadyToValidate → Validated`, with `start_new_book` re-entering
/// `Collecting(length)` with an empty parameter set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterCollector {
    state: CollectionState,
    values: [Option<f64>; 6],
    books_validated: u32,
}

impl ParameterCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CollectionState {
        self.state
    }

    pub fn books_validated(&self) -> u32 {
        self.books_validated
    }

    /// Start collecting if idle, or start a fresh book after a validation.
    /// Mid-collection this is a no-op.
    pub fn begin(&mut self) -> CollectionState {
        match self.state {
            CollectionState::Idle => {
                self.state = CollectionState::Collecting(Parameter::Length);
            }
            CollectionState::Validated => self.start_new_book(),
            CollectionState::Collecting(_) | CollectionState::ReadyToValidate => {}
        }
        self.state
    }

    /// The parameter the next user turn is expected to supply.
    pub fn expected(&self) -> Option<Parameter> {
        match self.state {
            CollectionState::Collecting(param) => Some(param),
            _ => None,
        }
    }

    pub fn value(&self, param: Parameter) -> Option<f64> {
        self.values[param.index()]
    }

    /// Record the confirmed value of the expected parameter and advance.
    pub fn supply(&mut self, param: Parameter, value: f64) -> Result<CollectionState, SessionError> {
        let CollectionState::Collecting(expected) = self.state else {
            return Err(SessionError::NotCollecting {
                state: self.state.to_string(),
            });
        };
        if param != expected {
            return Err(SessionError::OutOfOrder {
                expected: expected.to_string(),
                got: param.to_string(),
            });
        }
        if !value.is_finite() || (param == Parameter::TextPages && page_count(value).is_none()) {
            return Err(SessionError::InvalidValue {
                name: param.to_string(),
            });
        }

        self.values[param.index()] = Some(value);
        self.state = param
            .next()
            .map_or(CollectionState::ReadyToValidate, CollectionState::Collecting);
        Ok(self.state)
    }

    /// The complete parameter set, once every value has been confirmed.
    pub fn parameters(&self) -> Option<GsmParameters> {
        if !matches!(
            self.state,
            CollectionState::ReadyToValidate | CollectionState::Validated
        ) {
            return None;
        }
        let get = |param: Parameter| self.values[param.index()];
        Some(GsmParameters::new(
            get(Parameter::Length)?,
            get(Parameter::Breadth)?,
            page_count(get(Parameter::TextPages)?)?,
            get(Parameter::TextGsm)?,
            get(Parameter::CoverGsm)?,
            get(Parameter::MeasuredWeight)?,
        ))
    }

    /// Fast-forward to `ReadyToValidate` from a complete parameter set, as when
    /// the model gathered the values itself and emitted an invocation.
    pub fn load(&mut self, params: &GsmParameters) {
        self.values = [
            Some(params.length_cm),
            Some(params.breadth_cm),
            Some(f64::from(params.text_pages)),
            Some(params.text_gsm),
            Some(params.cover_gsm),
            Some(params.measured_weight_g),
        ];
        self.state = CollectionState::ReadyToValidate;
    }

    /// `ReadyToValidate → Validated`, once the invocation has round-tripped.
    pub fn mark_validated(&mut self) -> Result<(), SessionError> {
        if self.state != CollectionState::ReadyToValidate {
            return Err(SessionError::NotCollecting {
                state: self.state.to_string(),
            });
        }
        self.state = CollectionState::Validated;
        self.books_validated = self.books_validated.saturating_add(1);
        Ok(())
    }

    pub fn start_new_book(&mut self) {
        self.values = [None; 6];
        self.state = CollectionState::Collecting(Parameter::Length);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn page_count(value: f64) -> Option<u32> {
    (value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX)).then(|| value as u32)
}
