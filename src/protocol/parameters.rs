use serde_json::{Map, Value, json};

/// The six values collected from the user, in the order they are asked for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum Parameter {
    #[strum(serialize = "length")]
    Length,
    #[strum(serialize = "breadth")]
    Breadth,
    #[strum(serialize = "textPages")]
    TextPages,
    #[strum(serialize = "textGSM")]
    TextGsm,
    #[strum(serialize = "coverGSM")]
    CoverGsm,
    #[strum(serialize = "measuredWeight")]
    MeasuredWeight,
}

/// Unit a parameter is confirmed in before it reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Unit {
    #[strum(serialize = "cm")]
    Centimeters,
    #[strum(serialize = "pages")]
    Pages,
    #[strum(serialize = "g/m²")]
    GramsPerSquareMeter,
    #[strum(serialize = "g")]
    Grams,
}

impl Parameter {
    pub const ORDERED: [Parameter; 6] = [
        Parameter::Length,
        Parameter::Breadth,
        Parameter::TextPages,
        Parameter::TextGsm,
        Parameter::CoverGsm,
        Parameter::MeasuredWeight,
    ];

    /// Key used in the function schema and in argument payloads.
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Position in the collection order, starting at zero.
    pub fn index(self) -> usize {
        match self {
            Parameter::Length => 0,
            Parameter::Breadth => 1,
            Parameter::TextPages => 2,
            Parameter::TextGsm => 3,
            Parameter::CoverGsm => 4,
            Parameter::MeasuredWeight => 5,
        }
    }

    pub fn next(self) -> Option<Parameter> {
        Self::ORDERED.get(self.index() + 1).copied()
    }

    /// Length and breadth go through the unit-confirmation sub-dialogue.
    pub fn is_dimension(self) -> bool {
        matches!(self, Parameter::Length | Parameter::Breadth)
    }

    pub fn unit(self) -> Unit {
        match self {
            Parameter::Length | Parameter::Breadth => Unit::Centimeters,
            Parameter::TextPages => Unit::Pages,
            Parameter::TextGsm | Parameter::CoverGsm => Unit::GramsPerSquareMeter,
            Parameter::MeasuredWeight => Unit::Grams,
        }
    }

    /// JSON-schema type of the parameter.
    pub fn schema_type(self) -> &'static str {
        match self {
            Parameter::TextPages => "integer",
            _ => "number",
        }
    }

    pub fn schema_description(self) -> &'static str {
        match self {
            Parameter::Length => "Length of the book in centimeters",
            Parameter::Breadth => "Breadth of the book in centimeters",
            Parameter::TextPages => "Number of printed text pages",
            Parameter::TextGsm => "GSM of the text paper",
            Parameter::CoverGsm => "GSM of the cover paper",
            Parameter::MeasuredWeight => "Measured weight of the book in grams",
        }
    }
}

/// JSON schema of the `validate_book_gsm` arguments object.
pub fn parameters_schema() -> Value {
    let mut properties = Map::new();
    for param in Parameter::ORDERED {
        properties.insert(
            param.key().to_string(),
            json!({
                "type": param.schema_type(),
                "description": param.schema_description(),
            }),
        );
    }
    let required: Vec<&str> = Parameter::ORDERED.iter().map(|p| p.key()).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
