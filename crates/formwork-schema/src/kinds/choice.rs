//! Enumerated kinds: select, radio and selectboxes.
//!
//! Validators are built from the live option list of the definition. A
//! component without options cannot validate a concrete value: doing so is a
//! [`FormworkError::MissingOptions`] error, not a violation.

use formwork_core::{FormworkError, FormworkResult};

use super::{finish_scalar, initial_scalar, is_empty_scalar, mismatch, scalar};
use crate::constraints::{ExpectedType, TypeCheck};
use crate::context::ValidationContext;
use crate::definition::{ChoiceDefinition, ComponentDefinition};
use crate::messages::{INVALID_OPTION, MAX_SELECTED_COUNT, MIN_SELECTED_COUNT};
use crate::registry::ComponentBehavior;
use crate::report::ViolationKind;
use crate::schema::Schema;
use crate::validator::{Check, Failure, Stage};
use crate::value::Value;

fn option_values(def: &ChoiceDefinition) -> Vec<String> {
    def.options()
        .map(|options| options.iter().map(|o| o.value.clone()).collect())
        .unwrap_or_default()
}

/// Requires a string to be one of the options.
#[derive(Debug, Clone)]
pub struct OneOfCheck {
    /// The component key, for error reporting.
    pub key: String,
    /// The allowed values.
    pub options: Vec<String>,
}

impl OneOfCheck {
    /// Creates a new `OneOfCheck`.
    pub fn new(key: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            key: key.into(),
            options,
        }
    }
}

impl Check for OneOfCheck {
    fn stage(&self) -> Stage {
        Stage::Format
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        let Some(value) = value.as_str() else {
            return Ok(None);
        };
        if self.options.is_empty() {
            return Err(FormworkError::MissingOptions(self.key.clone()));
        }
        if self.options.iter().any(|option| option == value) {
            Ok(None)
        } else {
            Ok(Some(
                Failure::new(ViolationKind::Format, INVALID_OPTION).with("value", value),
            ))
        }
    }
}

/// Requires a selectboxes record to map known options to booleans.
#[derive(Debug, Clone)]
pub struct CheckedOptionsCheck {
    /// The component key, for error reporting.
    pub key: String,
    /// The allowed option keys.
    pub options: Vec<String>,
}

impl Check for CheckedOptionsCheck {
    fn stage(&self) -> Stage {
        Stage::Shape
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        let Some(members) = value.as_record() else {
            return Ok(None);
        };
        if let Some(other) = members.values().find(|v| !matches!(v, Value::Bool(_))) {
            return Ok(Some(Failure::invalid_type("boolean", other)));
        }
        if self.options.is_empty() {
            return Err(FormworkError::MissingOptions(self.key.clone()));
        }
        Ok(members
            .keys()
            .find(|name| !self.options.contains(name))
            .map(|name| {
                Failure::new(ViolationKind::Format, INVALID_OPTION).with("value", name.clone())
            }))
    }
}

fn checked_count(value: &Value) -> Option<usize> {
    value
        .as_record()
        .map(|members| members.values().filter(|v| v.as_bool() == Some(true)).count())
}

/// Requires at least `min` checked options.
#[derive(Debug, Clone, Copy)]
pub struct MinSelectedCheck {
    /// The minimum number of checked options.
    pub min: usize,
}

impl Check for MinSelectedCheck {
    fn stage(&self) -> Stage {
        Stage::Bound
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        Ok(checked_count(value).filter(|n| *n < self.min).map(|_| {
            Failure::new(ViolationKind::Bound, MIN_SELECTED_COUNT)
                .with("minSelectedCount", self.min.to_string())
        }))
    }
}

/// Allows at most `max` checked options.
#[derive(Debug, Clone, Copy)]
pub struct MaxSelectedCheck {
    /// The maximum number of checked options.
    pub max: usize,
}

impl Check for MaxSelectedCheck {
    fn stage(&self) -> Stage {
        Stage::Bound
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        Ok(checked_count(value).filter(|n| *n > self.max).map(|_| {
            Failure::new(ViolationKind::Bound, MAX_SELECTED_COUNT)
                .with("maxSelectedCount", self.max.to_string())
        }))
    }
}

/// Emptiness of a selectboxes value: `null`, or a record with every member
/// `false`.
pub fn is_empty_selection(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Record(members) => members.values().all(|v| *v == Value::Bool(false)),
        _ => false,
    }
}

/// `select` and `radio`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleChoiceBehavior;

impl ComponentBehavior for SingleChoiceBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let (ComponentDefinition::Select(def) | ComponentDefinition::Radio(def)) = component else {
            return Err(mismatch(component, "select"));
        };
        let options = option_values(def);
        if options.is_empty() {
            tracing::warn!(key = %def.base.key, "enumerated component has no options");
        }
        let builder = scalar(&def.base, ctx, Value::is_blank)
            .check(TypeCheck::new(ExpectedType::String))
            .check(OneOfCheck::new(def.base.key.clone(), options));
        Ok(finish_scalar(&def.base, ctx, builder))
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, Value::is_blank)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        initial_scalar(component, Value::from(""))
    }
}

/// `selectboxes`: a record mapping every option to whether it is checked.
///
/// Required means at least one option is checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectboxesBehavior;

impl ComponentBehavior for SelectboxesBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::Selectboxes(def) = component else {
            return Err(mismatch(component, "selectboxes"));
        };
        let rules = &def.base.validate;
        let builder = scalar(&def.base, ctx, is_empty_selection)
            .check(TypeCheck::new(ExpectedType::Record))
            .check(CheckedOptionsCheck {
                key: def.base.key.clone(),
                options: option_values(def),
            })
            .check_opt(rules.min_selected_count.map(|min| MinSelectedCheck { min }))
            .check_opt(rules.max_selected_count.map(|max| MaxSelectedCheck { max }));
        Ok(finish_scalar(&def.base, ctx, builder))
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, is_empty_selection)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        let ComponentDefinition::Selectboxes(def) = component else {
            return Value::Null;
        };
        Value::record(
            option_values(def)
                .into_iter()
                .map(|option| (option, Value::Bool(false))),
        )
    }
}
