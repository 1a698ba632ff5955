use serde_json::Value;

/// Coerce a JSON value to match a target JSON Schema numeric type.
///
/// Models sometimes send numbers as strings (`"20"`, `" 14.5 "`). String
/// values are parsed when the schema expects `"number"` or `"integer"`;
/// anything that does not parse, and every non-string value, is returned
/// unchanged so that deserialization reports the real problem.
#[must_use]
pub fn coerce_value(value: &Value, target_type: &str) -> Value {
    let Value::String(s) = value else {
        return value.clone();
    };

    match target_type {
        "number" => coerce_number(s).unwrap_or_else(|| value.clone()),
        "integer" => coerce_integer(s).unwrap_or_else(|| value.clone()),
        _ => value.clone(),
    }
}

/// Coerce all string values in `args` whose keys have a matching entry in
/// `schema_properties` with a declared `"type"` field.
#[must_use]
pub fn coerce_arguments(args: &Value, schema_properties: &Value) -> Value {
    let (Some(args_obj), Some(props_obj)) = (args.as_object(), schema_properties.as_object())
    else {
        return args.clone();
    };

    let coerced = args_obj
        .iter()
        .map(|(key, value)| {
            let target_type = props_obj
                .get(key.as_str())
                .and_then(|prop| prop.get("type"))
                .and_then(Value::as_str);
            let value = match target_type {
                Some(target_type) => coerce_value(value, target_type),
                None => value.clone(),
            };
            (key.clone(), value)
        })
        .collect();

    Value::Object(coerced)
}

fn coerce_number(s: &str) -> Option<Value> {
    s.trim()
        .parse::<f64>()
        .ok()
        .and_then(|n| serde_json::Number::from_f64(n).map(Value::Number))
}

fn coerce_integer(s: &str) -> Option<Value> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    // "200.0" is still a whole page count.
    coerce_number(s).filter(|v| v.as_f64().is_some_and(|n| n.fract() == 0.0))
}

#[cfg(test)]
mod tests {
    use super::{coerce_arguments, coerce_value};
    use serde_json::json;

    #[test]
    fn coerce_string_to_number() {
        assert_eq!(coerce_value(&json!("3.14"), "number"), json!(3.14));
        assert_eq!(coerce_value(&json!(" 20 "), "number"), json!(20.0));
    }

    #[test]
    fn coerce_string_to_integer() {
        assert_eq!(coerce_value(&json!("42"), "integer"), json!(42));
        assert_eq!(coerce_value(&json!("200.0"), "integer"), json!(200.0));
        assert_eq!(coerce_value(&json!("12.5"), "integer"), json!("12.5"));
    }

    #[test]
    fn non_string_values_pass_through() {
        assert_eq!(coerce_value(&json!(42), "number"), json!(42));
        assert_eq!(coerce_value(&json!(null), "number"), json!(null));
    }

    #[test]
    fn invalid_string_returns_original() {
        assert_eq!(
            coerce_value(&json!("twenty"), "number"),
            json!("twenty")
        );
        assert_eq!(coerce_value(&json!("hello"), "string"), json!("hello"));
    }

    #[test]
    fn coerce_arguments_processes_object() {
        let args = json!({
            "length": "20",
            "textPages": "200",
            "note": "hardback"
        });
        let schema_properties = json!({
            "length": {"type": "number"},
            "textPages": {"type": "integer"}
        });

        let coerced = coerce_arguments(&args, &schema_properties);
        assert_eq!(coerced["length"], json!(20.0));
        assert_eq!(coerced["textPages"], json!(200));
        assert_eq!(coerced["note"], json!("hardback"));
    }

    #[test]
    fn coerce_arguments_non_object_returns_clone() {
        let args = json!("not an object");
        let schema = json!({"length": {"type": "number"}});
        assert_eq!(coerce_arguments(&args, &schema), json!("not an object"));
    }
}
