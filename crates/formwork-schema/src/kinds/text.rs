//! Free-text kinds: textfield, textarea, email and phone number.

use formwork_core::FormworkResult;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{finish_scalar, initial_scalar, is_empty_scalar, mismatch, scalar};
use crate::constraints::{
    ExpectedType, FormatCheck, MaxLengthCheck, MinLengthCheck, PatternCheck, TypeCheck,
};
use crate::context::ValidationContext;
use crate::definition::{ComponentBase, ComponentDefinition};
use crate::messages::{INVALID_EMAIL, INVALID_PHONE_NUMBER};
use crate::registry::ComponentBehavior;
use crate::schema::Schema;
use crate::value::Value;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\- ]+$").expect("valid regex"));

/// Returns `true` for a plausible email address: one `@`, no whitespace,
/// and a dot in the domain.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Returns `true` for digits, spaces and dashes with an optional leading `+`.
pub fn is_valid_phone_number(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// The schema shared by string kinds: type, the kind's own format (if any),
/// the declared pattern, then length bounds.
pub(crate) fn string_schema(
    base: &ComponentBase,
    ctx: &ValidationContext,
    format: Option<FormatCheck>,
) -> FormworkResult<Schema> {
    let rules = &base.validate;
    let builder = scalar(base, ctx, Value::is_blank)
        .check(TypeCheck::new(ExpectedType::String))
        .check_opt(format)
        .check_opt(PatternCheck::declared(&base.key, rules.pattern())?)
        .check_opt(rules.min_length.map(MinLengthCheck::new))
        .check_opt(rules.max_length.map(MaxLengthCheck::new));
    Ok(finish_scalar(base, ctx, builder))
}

/// `textfield` and `textarea`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextfieldBehavior;

impl ComponentBehavior for TextfieldBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let (ComponentDefinition::Textfield(def) | ComponentDefinition::Textarea(def)) = component
        else {
            return Err(mismatch(component, "textfield"));
        };
        string_schema(&def.base, ctx, None)
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, Value::is_blank)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        initial_scalar(component, Value::from(""))
    }
}

/// `email`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailBehavior;

impl ComponentBehavior for EmailBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::Email(def) = component else {
            return Err(mismatch(component, "email"));
        };
        let format = FormatCheck::new("email", is_valid_email, INVALID_EMAIL);
        string_schema(&def.base, ctx, Some(format))
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, Value::is_blank)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        initial_scalar(component, Value::from(""))
    }
}

/// `phoneNumber`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneNumberBehavior;

impl ComponentBehavior for PhoneNumberBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::PhoneNumber(def) = component else {
            return Err(mismatch(component, "phoneNumber"));
        };
        let format = FormatCheck::new("phoneNumber", is_valid_phone_number, INVALID_PHONE_NUMBER);
        string_schema(&def.base, ctx, Some(format))
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, Value::is_blank)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        initial_scalar(component, Value::from(""))
    }
}
