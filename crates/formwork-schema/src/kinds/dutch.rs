//! Dutch identifiers: postcode, license plate, BSN and IBAN.
//!
//! Each is a string kind with one built-in format check on top of the
//! shared string constraints. IBAN is not Dutch-specific, but lives here with
//! the other checksum-validated identifiers.

use formwork_core::FormworkResult;
use once_cell::sync::Lazy;
use regex::Regex;

use super::text::string_schema;
use super::{initial_scalar, is_empty_scalar, mismatch};
use crate::constraints::FormatCheck;
use crate::context::ValidationContext;
use crate::definition::{ComponentBase, ComponentDefinition};
use crate::messages::{INVALID_BSN, INVALID_IBAN, INVALID_LICENSEPLATE, INVALID_POSTCODE};
use crate::registry::ComponentBehavior;
use crate::schema::Schema;
use crate::value::Value;

static POSTCODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]{3} ?([a-zA-Z]{2})$").expect("valid regex"));

static LICENSEPLATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9]{1,3}-[a-zA-Z0-9]{1,3}-[a-zA-Z0-9]{1,3}$").expect("valid regex")
});

static IBAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]{11,30}$").expect("valid regex"));

/// Letter pairs never issued in postcodes.
const RESERVED_POSTCODE_LETTERS: [&str; 3] = ["SA", "SD", "SS"];

/// Returns `true` for a Dutch postcode such as `1015 CJ` or `1015cj`.
pub fn is_valid_postcode(value: &str) -> bool {
    POSTCODE_RE.captures(value).is_some_and(|captures| {
        let letters = captures[1].to_ascii_uppercase();
        !RESERVED_POSTCODE_LETTERS.contains(&letters.as_str())
    })
}

/// Returns `true` for a Dutch license plate: three dash-separated groups of
/// letters and digits, six characters in total (`AB-12-CD`, `1-ABC-23`).
pub fn is_valid_licenseplate(value: &str) -> bool {
    LICENSEPLATE_RE.is_match(value) && value.chars().filter(char::is_ascii_alphanumeric).count() == 6
}

/// Returns `true` for nine digits passing the eleven-test.
pub fn is_valid_bsn(value: &str) -> bool {
    if value.len() != 9 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let total: i64 = value
        .bytes()
        .map(|b| i64::from(b - b'0'))
        .zip([9, 8, 7, 6, 5, 4, 3, 2, -1])
        .map(|(digit, weight)| digit * weight)
        .sum();
    total % 11 == 0
}

/// Returns `true` for an IBAN with valid check digits. Spaces are ignored
/// and letters may be lowercase.
pub fn is_valid_iban(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if !IBAN_RE.is_match(&compact) {
        return false;
    }
    let (head, tail) = compact.split_at(4);
    let mut remainder = 0u32;
    for c in tail.chars().chain(head.chars()) {
        let Some(digit) = c.to_digit(36) else {
            return false;
        };
        remainder = if digit >= 10 {
            (remainder * 100 + digit) % 97
        } else {
            (remainder * 10 + digit) % 97
        };
    }
    remainder == 1
}

fn dutch_schema(
    component: &ComponentDefinition,
    ctx: &ValidationContext,
    expected: &str,
    format: FormatCheck,
) -> FormworkResult<Schema> {
    let base = simple_base(component).ok_or_else(|| mismatch(component, expected))?;
    string_schema(base, ctx, Some(format))
}

const fn simple_base(component: &ComponentDefinition) -> Option<&ComponentBase> {
    match component {
        ComponentDefinition::Postcode(def)
        | ComponentDefinition::Licenseplate(def)
        | ComponentDefinition::Bsn(def)
        | ComponentDefinition::Iban(def) => Some(&def.base),
        _ => None,
    }
}

macro_rules! string_kind {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $tag:literal, $format:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl ComponentBehavior for $name {
            fn build_schema(
                &self,
                component: &ComponentDefinition,
                ctx: &ValidationContext,
            ) -> FormworkResult<Schema> {
                if !matches!(component, ComponentDefinition::$variant(_)) {
                    return Err(mismatch(component, $tag));
                }
                dutch_schema(component, ctx, $tag, $format)
            }

            fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
                is_empty_scalar(component, value, Value::is_blank)
            }

            fn initial_value(&self, component: &ComponentDefinition) -> Value {
                initial_scalar(component, Value::from(""))
            }
        }
    };
}

string_kind!(
    /// `postcode`.
    PostcodeBehavior,
    Postcode,
    "postcode",
    FormatCheck::new("postcode", is_valid_postcode, INVALID_POSTCODE)
);

string_kind!(
    /// `licenseplate`. An ill-formed plate fails before the declared pattern
    /// is tried.
    LicenseplateBehavior,
    Licenseplate,
    "licenseplate",
    FormatCheck::new("licenseplate", is_valid_licenseplate, INVALID_LICENSEPLATE).as_shape()
);

string_kind!(
    /// `bsn`.
    BsnBehavior,
    Bsn,
    "bsn",
    FormatCheck::new("bsn", is_valid_bsn, INVALID_BSN)
);

string_kind!(
    /// `iban`.
    IbanBehavior,
    Iban,
    "iban",
    FormatCheck::new("iban", is_valid_iban, INVALID_IBAN)
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_postcode() {
        assert!(is_valid_postcode("1015 CJ"));
        assert!(is_valid_postcode("1015cj"));
        assert!(!is_valid_postcode("0123 AB"));
        assert!(!is_valid_postcode("1015 SS"));
        assert!(!is_valid_postcode("1015 sa"));
        assert!(!is_valid_postcode("1015  CJ"));
        assert!(!is_valid_postcode("1015 CJ extra"));
    }

    #[test]
    fn test_licenseplate() {
        assert!(is_valid_licenseplate("AB-12-CD"));
        assert!(is_valid_licenseplate("1-ABC-23"));
        assert!(is_valid_licenseplate("xx-999-x"));
        assert!(!is_valid_licenseplate("AB12CD"));
        assert!(!is_valid_licenseplate("A-B-C"));
        assert!(!is_valid_licenseplate("ABCD-1-2"));
    }

    #[test]
    fn test_bsn() {
        assert!(is_valid_bsn("111222333"));
        assert!(is_valid_bsn("123456782"));
        assert!(!is_valid_bsn("123456789"));
        assert!(!is_valid_bsn("12345678"));
        assert!(!is_valid_bsn("11122233a"));
    }

    #[test]
    fn test_iban() {
        assert!(is_valid_iban("NL91ABNA0417164300"));
        assert!(is_valid_iban("nl91 abna 0417 1643 00"));
        assert!(is_valid_iban("GB82 WEST 1234 5698 7654 32"));
        assert!(!is_valid_iban("NL92ABNA0417164300"));
        assert!(!is_valid_iban("NL91"));
        assert!(!is_valid_iban("NL91-ABNA-0417-1643-00"));
    }

    async fn codes(definition: serde_json::Value, value: &str) -> Vec<String> {
        let component: ComponentDefinition = serde_json::from_value(definition).unwrap();
        let ctx = ValidationContext::for_locale("en");
        let schema = ctx
            .lookup(component.kind())
            .unwrap()
            .build_schema(&component, &ctx)
            .unwrap();
        let report = schema
            .validate_field(component.key(), Some(&Value::from(value)))
            .await
            .unwrap();
        report.violations().iter().map(|v| v.code.clone()).collect()
    }

    #[tokio::test]
    async fn test_postcode_schema() {
        let definition = json!({"type": "postcode", "key": "pc", "validate": {"required": true}});
        assert_eq!(codes(definition.clone(), "12345").await, vec!["invalidPostcode"]);
        assert_eq!(codes(definition.clone(), "").await, vec!["required"]);
        assert!(codes(definition, "1015 CJ").await.is_empty());
    }

    #[tokio::test]
    async fn test_licenseplate_declared_pattern_is_anchored() {
        let definition = json!({
            "type": "licenseplate", "key": "plate",
            "validate": {"pattern": "[A-Z]{2}-[0-9]{2}-[A-Z]{2}"}
        });
        assert!(codes(definition.clone(), "AB-12-CD").await.is_empty());
        assert_eq!(codes(definition.clone(), "1-ABC-23").await, vec!["pattern"]);
        assert_eq!(codes(definition, "nonsense").await, vec!["invalidLicenseplate"]);
    }

    #[tokio::test]
    async fn test_bsn_and_iban_schema() {
        let bsn = json!({"type": "bsn", "key": "bsn"});
        assert_eq!(codes(bsn.clone(), "123456789").await, vec!["invalidBsn"]);
        assert!(codes(bsn, "111222333").await.is_empty());
        let iban = json!({"type": "iban", "key": "iban"});
        assert_eq!(codes(iban.clone(), "NL00ABNA0417164300").await, vec!["invalidIban"]);
        assert!(codes(iban, "NL91 ABNA 0417 1643 00").await.is_empty());
    }
}
