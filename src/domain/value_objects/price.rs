use serde::{Deserialize, Deserializer};

/// Decimal value received from the backend as text.
///
/// Backend decimals (`price`, `amount`, `buy_price`) travel as strings and are
/// only turned into numbers for display. Conversion is lenient: a blank string
/// is zero and anything unparseable is NaN, so a bad row still renders.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Self {
        Price(value)
    }

    /// Parse a decimal string. Never fails; see the type docs for the rules.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Price(0.0);
        }

        let unsigned = trimmed.trim_start_matches(|c: char| c == '+' || c == '-');
        if unsigned == "Infinity" {
            let value = if trimmed.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
            return Price(value);
        }

        // f64::from_str also accepts "inf" and "nan" spellings, which are not numbers here
        if unsigned
            .chars()
            .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
        {
            return Price(f64::NAN);
        }

        Price(trimmed.parse::<f64>().unwrap_or(f64::NAN))
    }

    /// Price for a market asset that may be missing from the registry.
    pub fn from_optional(text: Option<&str>) -> Self {
        text.map(Price::parse).unwrap_or(Price(f64::NAN))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

/// Accept a decimal as either a JSON string or a JSON number and keep it as text.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected decimal string or number, got {}",
            other
        ))),
    }
}
