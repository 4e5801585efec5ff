//! Composed schemas: an ordered mapping from field key to [`Validator`].

use formwork_core::FormworkResult;

use crate::report::{FieldPath, ValidationReport};
use crate::validator::{RecordBuilder, Validator};
use crate::value::Value;

/// The product of composition: one validator per field key, in definition
/// order.
///
/// A duplicate key never shadows the earlier entry. Both validators are kept
/// and applied to the value under that key, and a warning is logged.
///
/// # Examples
///
/// ```
/// use formwork_schema::compose::compose;
/// use formwork_schema::context::ValidationContext;
/// use formwork_schema::definition::parse_components;
/// use formwork_schema::value::Value;
///
/// # tokio_test::block_on(async {
/// let components = parse_components(r#"[
///     {"type": "email", "key": "email", "validate": {"required": true}}
/// ]"#).unwrap();
/// let schema = compose(&components, &ValidationContext::for_locale("en")).unwrap();
///
/// let data = Value::from(serde_json::json!({"email": "jimmy"}));
/// let report = schema.validate(&data).await.unwrap();
/// assert_eq!(report.violations()[0].code, "invalidEmail");
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: Vec<(String, Validator)>,
}

impl Schema {
    /// Creates an empty schema.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A schema with a single entry.
    pub fn single(key: impl Into<String>, validator: Validator) -> Self {
        let mut schema = Self::new();
        schema.insert(key, validator);
        schema
    }

    /// Adds an entry. A duplicate key is combined with the existing entry.
    pub fn insert(&mut self, key: impl Into<String>, validator: Validator) {
        let key = key.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            tracing::warn!(key = %key, "duplicate component key; applying both validators");
            *existing = Validator::all_of(vec![existing.clone(), validator]);
        } else {
            self.entries.push((key, validator));
        }
    }

    /// Adds every entry of `other`, in order.
    pub fn merge(&mut self, other: Self) {
        for (key, validator) in other.entries {
            self.insert(key, validator);
        }
    }

    /// The validator for a key.
    pub fn get(&self, key: &str) -> Option<&Validator> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, validator)| validator)
    }

    /// Returns `true` if the schema has an entry for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The keys, in definition order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// The entries, in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Validator)> {
        self.entries.iter().map(|(key, v)| (key.as_str(), v))
    }

    /// The number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key is covered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A record validator over this schema's entries.
    pub fn to_validator(&self) -> Validator {
        RecordBuilder::new(self.entries.iter().cloned()).build()
    }

    /// Validates a whole submission record.
    ///
    /// Keys not covered by the schema are ignored; covered keys that are
    /// missing from `data` are validated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error only for definitions the engine cannot reconcile with
    /// the data, e.g. a select without options receiving a value.
    pub async fn validate(&self, data: &Value) -> FormworkResult<ValidationReport> {
        self.to_validator().validate(Some(data)).await
    }

    /// Validates the value of a single field, with paths rooted at its key.
    ///
    /// A key the schema does not cover is always valid.
    ///
    /// # Errors
    ///
    /// See [`Schema::validate`].
    pub async fn validate_field(
        &self,
        key: &str,
        value: Option<&Value>,
    ) -> FormworkResult<ValidationReport> {
        match self.get(key) {
            Some(validator) => validator.validate_at(value, &FieldPath::root().key(key)).await,
            None => Ok(ValidationReport::default()),
        }
    }
}

impl IntoIterator for Schema {
    type Item = (String, Validator);
    type IntoIter = std::vec::IntoIter<(String, Validator)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ValidationContext;
    use crate::definition::ComponentBase;
    use crate::validator::ScalarBuilder;
    use serde_json::json;

    fn required_text(key: &str) -> Validator {
        let ctx = ValidationContext::for_locale("en");
        ScalarBuilder::new(ctx.messages_for(&ComponentBase::new(key)), Value::is_blank)
            .required(true)
            .build()
    }

    #[tokio::test]
    async fn test_validate_record() {
        let mut schema = Schema::single("a", required_text("a"));
        schema.insert("b", required_text("b"));
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["a", "b"]);

        let report = schema
            .validate(&Value::from(json!({"a": "x", "extra": 1})))
            .await
            .unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations()[0].path.to_string(), "b");
    }

    #[tokio::test]
    async fn test_non_record_submission_is_a_shape_violation() {
        let schema = Schema::single("a", required_text("a"));
        let report = schema.validate(&Value::from("nope")).await.unwrap();
        assert_eq!(report.violations()[0].code, "invalidType");
        assert!(report.violations()[0].path.is_root());
    }

    #[tokio::test]
    async fn test_duplicate_keys_keep_both_validators() {
        let mut schema = Schema::new();
        schema.insert("a", required_text("a"));
        schema.insert("a", required_text("a"));
        assert_eq!(schema.len(), 1);

        let report = schema.validate(&Value::from(json!({}))).await.unwrap();
        assert_eq!(report.len(), 2);
    }

    #[tokio::test]
    async fn test_validate_field() {
        let schema = Schema::single("a", required_text("a"));
        let report = schema.validate_field("a", None).await.unwrap();
        assert_eq!(report.violations()[0].path.to_string(), "a");
        assert!(schema.validate_field("zz", None).await.unwrap().is_valid());
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut left = Schema::single("x", required_text("x"));
        let mut right = Schema::single("y", required_text("y"));
        right.insert("z", required_text("z"));
        left.merge(right);
        assert_eq!(left.keys().collect::<Vec<_>>(), vec!["x", "y", "z"]);
        assert!(left.contains_key("z"));
    }
}
