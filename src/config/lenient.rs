//! Permissive field deserializers: configuration files written by older
//! (or newer) tools must load even when some values are not understood.
use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Enum-valued field: an unknown identifier leaves the field absent.
pub(crate) fn variant<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => match s.parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                debug!("unknown value \"{}\": field dropped", s);
                Ok(None)
            },
        },
        Some(Value::Null) | None => Ok(None),
        Some(other) => {
            debug!("unexpected value {}: field dropped", other);
            Ok(None)
        },
    }
}

/// Numeric field: a mistyped or out of range value leaves the field absent.
pub(crate) fn number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Null) | None => Ok(None),
        Some(value) => match T::deserialize(&value) {
            Ok(number) => Ok(Some(number)),
            Err(_) => {
                debug!("unexpected value {}: field dropped", value);
                Ok(None)
            },
        },
    }
}

/// Text field: null is read as empty text.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Upgrades legacy speed unit identifiers
pub(crate) fn speed_unit(unit: String) -> String {
    let upgraded = match unit.as_str() {
        "m/s" => "mps",
        "km/h" => "kph",
        _ => return unit,
    };
    debug!("legacy speed unit \"{}\" upgraded to \"{}\"", unit, upgraded);
    upgraded.to_string()
}

/// Upgrades legacy angle unit identifiers
pub(crate) fn angle_unit(unit: String) -> String {
    if unit == "deg" {
        debug!("legacy angle unit \"deg\" upgraded to \"degree\"");
        "degree".to_string()
    } else {
        unit
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::types::OutputType;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "variant")]
        kind: Option<OutputType>,
        #[serde(default, deserialize_with = "string")]
        text: String,
        #[serde(default, deserialize_with = "number")]
        count: Option<u8>,
    }

    #[test]
    fn permissive_fields() {
        let fields: Fields = serde_json::from_str(r#"{"kind": "position", "text": "a"}"#).unwrap();
        assert_eq!(fields.kind, Some(OutputType::Position));
        assert_eq!(fields.text, "a");

        let fields: Fields = serde_json::from_str(r#"{"kind": "video", "text": null}"#).unwrap();
        assert_eq!(fields.kind, None);
        assert_eq!(fields.text, "");

        let fields: Fields = serde_json::from_str(r#"{"kind": 3}"#).unwrap();
        assert_eq!(fields.kind, None);

        let fields: Fields = serde_json::from_str("{}").unwrap();
        assert_eq!(fields.kind, None);
        assert_eq!(fields.count, None);
    }

    #[test]
    fn permissive_numbers() {
        let fields: Fields = serde_json::from_str(r#"{"count": 12}"#).unwrap();
        assert_eq!(fields.count, Some(12));
        for count in ["300", "-1", "2.5", "\"12\"", "null", "[1]"] {
            let json = format!(r#"{{"count": {}}}"#, count);
            let fields: Fields = serde_json::from_str(&json).unwrap();
            assert_eq!(fields.count, None, "{}", count);
        }
    }

    #[test]
    fn legacy_units() {
        assert_eq!(speed_unit("m/s".to_string()), "mps");
        assert_eq!(speed_unit("km/h".to_string()), "kph");
        assert_eq!(speed_unit("knot".to_string()), "knot");
        assert_eq!(angle_unit("deg".to_string()), "degree");
        assert_eq!(angle_unit("rad".to_string()), "rad");
    }
}
