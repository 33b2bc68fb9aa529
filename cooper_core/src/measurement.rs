//! Raw form input and per-field validation.
//!
//! Every field arrives as a user-typed string. A string that does not parse
//! as a finite number is treated the same as an empty one. Grouped
//! thousands written with a single separator kind ("2.800", "2,800") are
//! rejected because pt-BR and en read them differently.

use crate::Locale;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lowest accepted heart rate in bpm
pub const MIN_HEART_RATE: f64 = 40.0;
/// Highest accepted heart rate in bpm
pub const MAX_HEART_RATE: f64 = 220.0;

/// An input field on the evaluation form
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Distance,
    Duration,
    HeartRate,
    Weight,
    Temperature,
    Humidity,
    Observations,
}

impl Field {
    /// Fields the calculator needs
    pub const PRIMARY: [Field; 4] = [
        Field::Distance,
        Field::Duration,
        Field::HeartRate,
        Field::Weight,
    ];

    pub fn is_primary(&self) -> bool {
        Self::PRIMARY.contains(self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Distance => "distance",
            Field::Duration => "duration",
            Field::HeartRate => "heart_rate",
            Field::Weight => "weight",
            Field::Temperature => "temperature",
            Field::Humidity => "humidity",
            Field::Observations => "observations",
        };
        f.write_str(name)
    }
}

/// Why a single field was rejected
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    /// Empty, or not a number
    Required,
    /// Zero or negative
    NotPositive,
    /// Heart rate outside [40, 220]
    HeartRateOutOfRange,
    /// Optional field holding text that is not a number
    NotANumber,
    /// Heart rate with a fractional part
    NotWhole,
    /// Looks like a grouped thousands value ("2.800"), which reads
    /// differently in pt-BR and en
    AmbiguousSeparator,
}

impl FieldError {
    /// User-facing message for this error on the given field
    pub fn message(&self, field: Field, locale: Locale) -> String {
        match locale {
            Locale::PtBr => {
                let name = match field {
                    Field::Distance => "Distância",
                    Field::Duration => "Duração",
                    Field::HeartRate => "Frequência cardíaca",
                    Field::Weight => "Peso",
                    Field::Temperature => "Temperatura",
                    Field::Humidity => "Umidade",
                    Field::Observations => "Observações",
                };
                match self {
                    FieldError::Required => match field {
                        Field::Distance | Field::Duration | Field::HeartRate => {
                            format!("{} é obrigatória", name)
                        }
                        _ => format!("{} é obrigatório", name),
                    },
                    FieldError::NotPositive => format!("{} deve ser maior que zero", name),
                    FieldError::HeartRateOutOfRange => {
                        format!("{} deve estar entre 40 e 220 bpm", name)
                    }
                    FieldError::NotANumber => format!("{} deve ser um número", name),
                    FieldError::NotWhole => format!("{} deve ser um número inteiro", name),
                    FieldError::AmbiguousSeparator => format!(
                        "{} tem separador ambíguo; escreva sem separador de milhar",
                        name
                    ),
                }
            }
            Locale::En => {
                let name = match field {
                    Field::Distance => "Distance",
                    Field::Duration => "Duration",
                    Field::HeartRate => "Heart rate",
                    Field::Weight => "Weight",
                    Field::Temperature => "Temperature",
                    Field::Humidity => "Humidity",
                    Field::Observations => "Observations",
                };
                match self {
                    FieldError::Required => format!("{} is required", name),
                    FieldError::NotPositive => format!("{} must be greater than zero", name),
                    FieldError::HeartRateOutOfRange => {
                        format!("{} must be between 40 and 220 bpm", name)
                    }
                    FieldError::NotANumber => format!("{} must be a number", name),
                    FieldError::NotWhole => format!("{} must be a whole number", name),
                    FieldError::AmbiguousSeparator => format!(
                        "{} has an ambiguous separator; write it without thousands separators",
                        name
                    ),
                }
            }
        }
    }
}

/// Field errors collected from one validation pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.errors.insert(field, error);
    }

    pub fn remove(&mut self, field: Field) -> Option<FieldError> {
        self.errors.remove(&field)
    }

    /// Iterate in field order
    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.errors.iter().map(|(f, e)| (*f, *e))
    }

    /// Whether any field the calculator needs is rejected
    pub fn blocks_metrics(&self) -> bool {
        self.errors.keys().any(Field::is_primary)
    }

    /// All messages, one per failing field
    pub fn messages(&self, locale: Locale) -> Vec<String> {
        self.iter()
            .map(|(field, error)| error.message(field, locale))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.errors.keys().map(|f| f.to_string()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl From<ValidationErrors> for crate::Error {
    fn from(errors: ValidationErrors) -> Self {
        crate::Error::Validation(errors.to_string())
    }
}

/// Form input exactly as typed
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawMeasurement {
    pub distance: String,
    pub duration: String,
    pub heart_rate: String,
    pub weight: String,
    pub temperature: String,
    pub humidity: String,
    pub observations: String,
}

/// Measurement that passed validation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub distance: f64,
    pub duration: f64,
    pub heart_rate: u32,
    pub weight: f64,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub observations: String,
}

/// Outcome of reading one typed number
#[derive(Clone, Copy, Debug, PartialEq)]
enum Parsed {
    Blank,
    Invalid,
    Ambiguous,
    Value(f64),
}

/// `"2.800"`, `"1,234,567"`: one separator kind, every group after the
/// first exactly three digits, and a first group that is not just "0".
fn looks_grouped(s: &str, sep: char) -> bool {
    let mut groups = s.split(sep);
    let first = match groups.next() {
        Some(first) => first,
        None => return false,
    };
    let rest: Vec<&str> = groups.collect();
    !rest.is_empty()
        && (1..=3).contains(&first.len())
        && first != "0"
        && first.chars().all(|c| c.is_ascii_digit())
        && rest
            .iter()
            .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

fn parse(raw: &str) -> Parsed {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Parsed::Blank;
    }
    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);

    let normalized = match (trimmed.rfind('.'), trimmed.rfind(',')) {
        // Both present: the last one is the decimal mark
        (Some(dot), Some(comma)) => {
            let (group, decimal) = if comma > dot { ('.', ',') } else { (',', '.') };
            let (int_part, frac) = unsigned.split_at(unsigned.rfind(decimal).unwrap_or(0));
            if !looks_grouped(int_part, group) {
                return Parsed::Invalid;
            }
            format!(
                "{}{}.{}",
                if trimmed.starts_with('-') { "-" } else { "" },
                int_part.replace(group, ""),
                &frac[1..]
            )
        }
        (Some(_), None) if looks_grouped(unsigned, '.') => return Parsed::Ambiguous,
        (None, Some(_)) if looks_grouped(unsigned, ',') => return Parsed::Ambiguous,
        // pt-BR keyboards produce a decimal comma
        _ => trimmed.replace(',', "."),
    };

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Parsed::Value(v),
        _ => Parsed::Invalid,
    }
}

/// Parse a user-typed number; `None` for blank, malformed, non-finite or
/// ambiguously grouped input
pub fn parse_number(raw: &str) -> Option<f64> {
    match parse(raw) {
        Parsed::Value(v) => Some(v),
        _ => None,
    }
}

fn required(raw: &str) -> Result<f64, FieldError> {
    match parse(raw) {
        Parsed::Blank | Parsed::Invalid => Err(FieldError::Required),
        Parsed::Ambiguous => Err(FieldError::AmbiguousSeparator),
        Parsed::Value(v) => Ok(v),
    }
}

fn positive(raw: &str) -> Result<f64, FieldError> {
    match required(raw)? {
        v if v <= 0.0 => Err(FieldError::NotPositive),
        v => Ok(v),
    }
}

fn heart_rate(raw: &str) -> Result<u32, FieldError> {
    let v = required(raw)?;
    if v.fract() != 0.0 {
        return Err(FieldError::NotWhole);
    }
    if !(MIN_HEART_RATE..=MAX_HEART_RATE).contains(&v) {
        return Err(FieldError::HeartRateOutOfRange);
    }
    Ok(v as u32)
}

fn optional(raw: &str) -> Result<Option<f64>, FieldError> {
    match parse(raw) {
        Parsed::Blank => Ok(None),
        Parsed::Invalid => Err(FieldError::NotANumber),
        Parsed::Ambiguous => Err(FieldError::AmbiguousSeparator),
        Parsed::Value(v) => Ok(Some(v)),
    }
}

impl RawMeasurement {
    /// Read the raw value of one field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Distance => &self.distance,
            Field::Duration => &self.duration,
            Field::HeartRate => &self.heart_rate,
            Field::Weight => &self.weight,
            Field::Temperature => &self.temperature,
            Field::Humidity => &self.humidity,
            Field::Observations => &self.observations,
        }
    }

    /// Replace the raw value of one field
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Distance => self.distance = value,
            Field::Duration => self.duration = value,
            Field::HeartRate => self.heart_rate = value,
            Field::Weight => self.weight = value,
            Field::Temperature => self.temperature = value,
            Field::Humidity => self.humidity = value,
            Field::Observations => self.observations = value,
        }
    }

    /// Validate every field, reporting each failure separately
    pub fn validate(&self) -> Result<Measurement, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let distance = positive(&self.distance)
            .map_err(|e| errors.insert(Field::Distance, e))
            .ok();
        let duration = positive(&self.duration)
            .map_err(|e| errors.insert(Field::Duration, e))
            .ok();
        let heart_rate = heart_rate(&self.heart_rate)
            .map_err(|e| errors.insert(Field::HeartRate, e))
            .ok();
        let weight = positive(&self.weight)
            .map_err(|e| errors.insert(Field::Weight, e))
            .ok();
        let temperature = optional(&self.temperature)
            .map_err(|e| errors.insert(Field::Temperature, e))
            .ok()
            .flatten();
        let humidity = optional(&self.humidity)
            .map_err(|e| errors.insert(Field::Humidity, e))
            .ok()
            .flatten();

        match (distance, duration, heart_rate, weight) {
            (Some(distance), Some(duration), Some(heart_rate), Some(weight))
                if errors.is_empty() =>
            {
                Ok(Measurement {
                    distance,
                    duration,
                    heart_rate,
                    weight,
                    temperature,
                    humidity,
                    observations: self.observations.trim().to_string(),
                })
            }
            _ => Err(errors),
        }
    }

    /// Validate only the fields the calculator reads
    ///
    /// Returns `None` when any primary field is missing or invalid.
    pub fn primary(&self) -> Option<(f64, f64, u32, f64)> {
        let distance = positive(&self.distance).ok()?;
        let duration = positive(&self.duration).ok()?;
        let heart_rate = heart_rate(&self.heart_rate).ok()?;
        let weight = positive(&self.weight).ok()?;
        Some((distance, duration, heart_rate, weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_raw() -> RawMeasurement {
        RawMeasurement {
            distance: "2800".into(),
            duration: "720".into(),
            heart_rate: "180".into(),
            weight: "70".into(),
            temperature: "20".into(),
            humidity: "50".into(),
            observations: "  dia quente ".into(),
        }
    }

    #[test]
    fn test_valid_measurement() {
        let m = valid_raw().validate().unwrap();
        assert_eq!(m.distance, 2800.0);
        assert_eq!(m.heart_rate, 180);
        assert_eq!(m.temperature, Some(20.0));
        assert_eq!(m.observations, "dia quente");
    }

    #[test]
    fn test_decimal_comma_accepted() {
        let mut raw = valid_raw();
        raw.weight = "70,5".into();
        assert_eq!(raw.validate().unwrap().weight, 70.5);
    }

    #[test]
    fn test_missing_and_malformed_are_required() {
        let mut raw = valid_raw();
        raw.distance = "".into();
        raw.weight = "abc".into();
        let errors = raw.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Distance), Some(FieldError::Required));
        assert_eq!(errors.get(Field::Weight), Some(FieldError::Required));
        assert_eq!(errors.get(Field::Duration), None);
        assert!(errors.blocks_metrics());
    }

    #[test]
    fn test_non_positive_values() {
        let mut raw = valid_raw();
        raw.duration = "0".into();
        raw.weight = "-3".into();
        let errors = raw.validate().unwrap_err();
        assert_eq!(errors.get(Field::Duration), Some(FieldError::NotPositive));
        assert_eq!(errors.get(Field::Weight), Some(FieldError::NotPositive));
        assert_eq!(errors.get(Field::Distance), None);
    }

    #[test]
    fn test_heart_rate_bounds_inclusive() {
        let mut raw = valid_raw();
        raw.heart_rate = "40".into();
        assert!(raw.validate().is_ok());
        raw.heart_rate = "220".into();
        assert!(raw.validate().is_ok());
        raw.heart_rate = "39".into();
        assert_eq!(
            raw.validate().unwrap_err().get(Field::HeartRate),
            Some(FieldError::HeartRateOutOfRange)
        );
        raw.heart_rate = "221".into();
        assert_eq!(
            raw.validate().unwrap_err().get(Field::HeartRate),
            Some(FieldError::HeartRateOutOfRange)
        );
    }

    #[test]
    fn test_fractional_heart_rate_rejected() {
        let mut raw = valid_raw();
        raw.heart_rate = "150.5".into();
        let errors = raw.validate().unwrap_err();
        assert_eq!(errors.get(Field::HeartRate), Some(FieldError::NotWhole));
        assert!(raw.primary().is_none());

        raw.heart_rate = "150.0".into();
        assert_eq!(raw.validate().unwrap().heart_rate, 150);
    }

    #[test]
    fn test_grouped_thousands_are_ambiguous() {
        let mut raw = valid_raw();
        raw.distance = "2.800".into();
        let errors = raw.validate().unwrap_err();
        assert_eq!(errors.get(Field::Distance), Some(FieldError::AmbiguousSeparator));
        assert!(raw.primary().is_none());

        raw.distance = "2,800".into();
        assert_eq!(
            raw.validate().unwrap_err().get(Field::Distance),
            Some(FieldError::AmbiguousSeparator)
        );

        raw.distance = "2800".into();
        assert_eq!(raw.validate().unwrap().distance, 2800.0);
    }

    #[test]
    fn test_full_grouped_forms() {
        assert_eq!(parse_number("2.800,5"), Some(2800.5));
        assert_eq!(parse_number("2,800.5"), Some(2800.5));
        assert_eq!(parse_number("1.234.567,25"), Some(1234567.25));
        assert_eq!(parse_number("2.80,5"), None);
        assert_eq!(parse_number("2.800"), None);
    }

    #[test]
    fn test_ordinary_decimals_still_parse() {
        assert_eq!(parse_number("70.5"), Some(70.5));
        assert_eq!(parse_number("70,5"), Some(70.5));
        assert_eq!(parse_number("0.500"), Some(0.5));
        assert_eq!(parse_number("12.34"), Some(12.34));
        assert_eq!(parse_number("-3,5"), Some(-3.5));
    }

    #[test]
    fn test_optional_fields() {
        let mut raw = valid_raw();
        raw.temperature = "".into();
        raw.humidity = "úmido".into();
        let errors = raw.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Humidity), Some(FieldError::NotANumber));
        assert!(!errors.blocks_metrics());
        assert!(raw.primary().is_some());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(" 12 "), Some(12.0));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            FieldError::Required.message(Field::Distance, Locale::PtBr),
            "Distância é obrigatória"
        );
        assert_eq!(
            FieldError::Required.message(Field::Weight, Locale::PtBr),
            "Peso é obrigatório"
        );
        assert_eq!(
            FieldError::HeartRateOutOfRange.message(Field::HeartRate, Locale::En),
            "Heart rate must be between 40 and 220 bpm"
        );
    }
}
