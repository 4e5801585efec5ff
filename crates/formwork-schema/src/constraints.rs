//! Synchronous checks shared by several component kinds.
//!
//! Each check constrains one aspect of a non-empty value and reports a
//! [`Failure`] naming the message to show. Checks that only apply to strings
//! (or only to numbers) pass any other value; the kind's [`TypeCheck`] runs
//! first and rejects values of the wrong type.

use formwork_core::{FormworkError, FormworkResult};
use regex::Regex;

use crate::messages::{
    MessageDescriptor, DECIMAL_LIMIT, MAX, MAX_LENGTH, MIN, MIN_LENGTH, PATTERN,
};
use crate::report::ViolationKind;
use crate::validator::{Check, Failure, Stage};
use crate::value::Value;

/// The primitive type a kind's values must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedType {
    /// A string.
    String,
    /// A finite number.
    Number,
    /// A boolean.
    Bool,
    /// A record.
    Record,
}

impl ExpectedType {
    const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::Record => "record",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => matches!(value, Value::String(_)),
            Self::Number => matches!(value, Value::Number(n) if n.is_finite()),
            Self::Bool => matches!(value, Value::Bool(_)),
            Self::Record => matches!(value, Value::Record(_)),
        }
    }
}

/// Rejects values of the wrong primitive type.
///
/// # Examples
///
/// ```
/// use formwork_schema::constraints::{ExpectedType, TypeCheck};
/// use formwork_schema::validator::Check;
/// use formwork_schema::value::Value;
///
/// let check = TypeCheck::new(ExpectedType::Number);
/// assert!(check.check(&Value::Number(1.5)).unwrap().is_none());
/// assert!(check.check(&Value::from("1.5")).unwrap().is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeCheck {
    /// The required type.
    pub expected: ExpectedType,
}

impl TypeCheck {
    /// Creates a new `TypeCheck`.
    pub const fn new(expected: ExpectedType) -> Self {
        Self { expected }
    }
}

impl Check for TypeCheck {
    fn stage(&self) -> Stage {
        Stage::Shape
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        if self.expected.accepts(value) {
            Ok(None)
        } else {
            Ok(Some(Failure::invalid_type(self.expected.name(), value)))
        }
    }
}

/// Anchors a pattern to the whole value.
///
/// The pattern is always wrapped in `^(?:...)$`, so alternations and
/// explicit anchors inside it keep their meaning.
pub fn anchor(pattern: &str) -> String {
    format!("^(?:{pattern})$")
}

/// Requires a string to match a declared pattern in full.
#[derive(Debug, Clone)]
pub struct PatternCheck {
    /// The pattern as declared.
    pub pattern: String,
    regex: Regex,
}

impl PatternCheck {
    /// Compiles the anchored form of `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::InvalidPattern`] naming `key` if the pattern
    /// does not compile.
    pub fn new(key: &str, pattern: &str) -> FormworkResult<Self> {
        let regex = Regex::new(&anchor(pattern)).map_err(|source| FormworkError::InvalidPattern {
            key: key.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Compiles the declared pattern of a component, if it has one.
    ///
    /// # Errors
    ///
    /// See [`PatternCheck::new`].
    pub fn declared(key: &str, pattern: Option<&str>) -> FormworkResult<Option<Self>> {
        pattern.map(|p| Self::new(key, p)).transpose()
    }
}

impl Check for PatternCheck {
    fn stage(&self) -> Stage {
        Stage::Format
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        Ok(value
            .as_str()
            .filter(|s| !self.regex.is_match(s))
            .map(|_| {
                Failure::new(ViolationKind::Format, PATTERN).with("pattern", self.pattern.clone())
            }))
    }
}

/// Requires a string to satisfy a kind's structural format.
///
/// Runs in the format stage unless marked as a shape test with
/// [`FormatCheck::as_shape`], in which case a failure stops the remaining
/// checks.
#[derive(Debug, Clone, Copy)]
pub struct FormatCheck {
    /// A name for diagnostics.
    pub name: &'static str,
    /// The format test.
    pub predicate: fn(&str) -> bool,
    /// The message shown when the test fails.
    pub descriptor: MessageDescriptor,
    /// The stage the test runs in.
    pub stage: Stage,
}

impl FormatCheck {
    /// Creates a new `FormatCheck`.
    pub const fn new(
        name: &'static str,
        predicate: fn(&str) -> bool,
        descriptor: MessageDescriptor,
    ) -> Self {
        Self {
            name,
            predicate,
            descriptor,
            stage: Stage::Format,
        }
    }

    /// Runs the test as a shape check.
    #[must_use]
    pub const fn as_shape(mut self) -> Self {
        self.stage = Stage::Shape;
        self
    }
}

impl Check for FormatCheck {
    fn stage(&self) -> Stage {
        self.stage
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        Ok(value
            .as_str()
            .filter(|s| !(self.predicate)(s))
            .map(|_| Failure::new(ViolationKind::Format, self.descriptor)))
    }
}

/// Requires a string to have at least `min_length` characters.
#[derive(Debug, Clone, Copy)]
pub struct MinLengthCheck {
    /// The minimum number of characters.
    pub min_length: usize,
}

impl MinLengthCheck {
    /// Creates a new `MinLengthCheck`.
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Check for MinLengthCheck {
    fn stage(&self) -> Stage {
        Stage::Bound
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        Ok(value
            .as_str()
            .filter(|s| s.chars().count() < self.min_length)
            .map(|_| {
                Failure::new(ViolationKind::Bound, MIN_LENGTH)
                    .with("minLength", self.min_length.to_string())
            }))
    }
}

/// Requires a string to have at most `max_length` characters.
#[derive(Debug, Clone, Copy)]
pub struct MaxLengthCheck {
    /// The maximum number of characters.
    pub max_length: usize,
}

impl MaxLengthCheck {
    /// Creates a new `MaxLengthCheck`.
    pub const fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Check for MaxLengthCheck {
    fn stage(&self) -> Stage {
        Stage::Bound
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        Ok(value
            .as_str()
            .filter(|s| s.chars().count() > self.max_length)
            .map(|_| {
                Failure::new(ViolationKind::Bound, MAX_LENGTH)
                    .with("maxLength", self.max_length.to_string())
            }))
    }
}

/// Requires a number to be at least `min` (inclusive).
///
/// `display` is the bound as shown in the message, already formatted for the
/// locale (and currency, if any).
#[derive(Debug, Clone)]
pub struct MinValueCheck {
    /// The minimum.
    pub min: f64,
    /// The formatted minimum.
    pub display: String,
}

impl MinValueCheck {
    /// Creates a new `MinValueCheck`.
    pub fn new(min: f64, display: impl Into<String>) -> Self {
        Self {
            min,
            display: display.into(),
        }
    }
}

impl Check for MinValueCheck {
    fn stage(&self) -> Stage {
        Stage::Bound
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        Ok(value
            .as_f64()
            .filter(|n| *n < self.min)
            .map(|_| Failure::new(ViolationKind::Bound, MIN).with("min", self.display.clone())))
    }
}

/// Requires a number to be at most `max` (inclusive).
#[derive(Debug, Clone)]
pub struct MaxValueCheck {
    /// The maximum.
    pub max: f64,
    /// The formatted maximum.
    pub display: String,
}

impl MaxValueCheck {
    /// Creates a new `MaxValueCheck`.
    pub fn new(max: f64, display: impl Into<String>) -> Self {
        Self {
            max,
            display: display.into(),
        }
    }
}

impl Check for MaxValueCheck {
    fn stage(&self) -> Stage {
        Stage::Bound
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        Ok(value
            .as_f64()
            .filter(|n| *n > self.max)
            .map(|_| Failure::new(ViolationKind::Bound, MAX).with("max", self.display.clone())))
    }
}

/// Limits the number of fraction digits of a number.
#[derive(Debug, Clone, Copy)]
pub struct DecimalLimitCheck {
    /// The maximum number of fraction digits.
    pub decimal_limit: u32,
}

impl DecimalLimitCheck {
    /// Creates a new `DecimalLimitCheck`.
    pub const fn new(decimal_limit: u32) -> Self {
        Self { decimal_limit }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn exceeds(&self, n: f64) -> bool {
        let scaled = n * 10f64.powi(self.decimal_limit.min(15) as i32);
        (scaled - scaled.round()).abs() > 1e-9 * scaled.abs().max(1.0)
    }
}

impl Check for DecimalLimitCheck {
    fn stage(&self) -> Stage {
        Stage::Format
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        Ok(value.as_f64().filter(|n| self.exceeds(*n)).map(|_| {
            Failure::new(ViolationKind::Format, DECIMAL_LIMIT)
                .with("decimalLimit", self.decimal_limit.to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::INVALID_EMAIL;

    fn failed(check: &dyn Check, value: impl Into<Value>) -> Option<Failure> {
        check.check(&value.into()).unwrap()
    }

    #[test]
    fn test_type_check() {
        let number = TypeCheck::new(ExpectedType::Number);
        assert!(failed(&number, 3.0).is_none());
        assert!(failed(&number, Value::Number(f64::NAN)).is_some());
        let failure = failed(&number, "3").unwrap();
        assert_eq!(failure.kind, ViolationKind::Shape);
        assert_eq!(
            failure.values,
            vec![("expected", "number".to_string()), ("received", "string".to_string())]
        );
        assert!(failed(&TypeCheck::new(ExpectedType::Bool), true).is_none());
    }

    #[test]
    fn test_anchor() {
        assert_eq!(anchor("[0-9]+"), "^(?:[0-9]+)$");
        let either = Regex::new(&anchor("^a|b$")).unwrap();
        assert!(either.is_match("a"));
        assert!(!either.is_match("ab"));
    }

    #[test]
    fn test_pattern_is_anchored() {
        let check = PatternCheck::new("n", "[0-9]+").unwrap();
        assert!(failed(&check, "123").is_none());
        let failure = failed(&check, "only dig1ts allowed").unwrap();
        assert_eq!(failure.kind, ViolationKind::Format);
        assert_eq!(failure.descriptor.code, "pattern");
        assert!(failed(&check, 12.0).is_none());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternCheck::new("name", "(").unwrap_err();
        assert!(matches!(err, FormworkError::InvalidPattern { ref key, .. } if key == "name"));
        assert!(PatternCheck::declared("name", None).unwrap().is_none());
    }

    #[test]
    fn test_format_check() {
        let check = FormatCheck::new("at", |s| s.contains('@'), INVALID_EMAIL);
        assert!(failed(&check, "a@b").is_none());
        assert_eq!(failed(&check, "ab").unwrap().descriptor.code, "invalidEmail");
        assert_eq!(check.stage(), Stage::Format);
        assert_eq!(check.as_shape().stage(), Stage::Shape);
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(failed(&MaxLengthCheck::new(3), "ééé").is_none());
        assert!(failed(&MaxLengthCheck::new(3), "abcd").is_some());
        let failure = failed(&MinLengthCheck::new(2), "a").unwrap();
        assert_eq!(failure.values, vec![("minLength", "2".to_string())]);
    }

    #[test]
    fn test_value_bounds_are_inclusive() {
        let min = MinValueCheck::new(10.0, "€ 10,00");
        assert!(failed(&min, 10.0).is_none());
        let failure = failed(&min, 9.1).unwrap();
        assert_eq!(failure.values, vec![("min", "€ 10,00".to_string())]);

        let max = MaxValueCheck::new(5.0, "5");
        assert!(failed(&max, 5.0).is_none());
        assert!(failed(&max, 5.5).is_some());
    }

    #[test]
    fn test_decimal_limit() {
        let check = DecimalLimitCheck::new(2);
        assert!(failed(&check, 1.25).is_none());
        assert!(failed(&check, 10.1).is_none());
        assert!(failed(&check, 1.255).is_some());
        assert!(failed(&DecimalLimitCheck::new(0), 3.0).is_none());
        assert!(failed(&DecimalLimitCheck::new(0), 3.5).is_some());
    }
}
