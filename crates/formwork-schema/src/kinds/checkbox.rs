//! `checkbox`: a single boolean. Required means it must be checked.

use formwork_core::FormworkResult;

use super::{finish_scalar, initial_scalar, is_empty_scalar, mismatch, scalar};
use crate::constraints::{ExpectedType, TypeCheck};
use crate::context::ValidationContext;
use crate::definition::ComponentDefinition;
use crate::registry::ComponentBehavior;
use crate::schema::Schema;
use crate::value::Value;

/// Emptiness of a checkbox value: `null` or `false`.
pub fn is_unchecked(value: &Value) -> bool {
    matches!(value, Value::Null | Value::Bool(false))
}

/// `checkbox`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxBehavior;

impl ComponentBehavior for CheckboxBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::Checkbox(def) = component else {
            return Err(mismatch(component, "checkbox"));
        };
        let builder = scalar(&def.base, ctx, is_unchecked).check(TypeCheck::new(ExpectedType::Bool));
        Ok(finish_scalar(&def.base, ctx, builder))
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, is_unchecked)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        initial_scalar(component, Value::Bool(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ComponentBase, SimpleDefinition};
    use crate::report::ViolationKind;

    fn checkbox(required: bool) -> Schema {
        let component = ComponentDefinition::Checkbox(SimpleDefinition {
            base: ComponentBase::new("agree").required(required),
        });
        CheckboxBehavior
            .build_schema(&component, &ValidationContext::for_locale("en"))
            .unwrap()
    }

    #[tokio::test]
    async fn test_required_checkbox_must_be_checked() {
        let schema = checkbox(true);
        let report = schema
            .validate_field("agree", Some(&Value::Bool(false)))
            .await
            .unwrap();
        assert_eq!(report.violations()[0].kind, ViolationKind::Required);
        assert!(schema
            .validate_field("agree", Some(&Value::Bool(true)))
            .await
            .unwrap()
            .is_valid());
    }

    #[tokio::test]
    async fn test_optional_checkbox() {
        let schema = checkbox(false);
        assert!(schema
            .validate_field("agree", Some(&Value::Bool(false)))
            .await
            .unwrap()
            .is_valid());
        let report = schema
            .validate_field("agree", Some(&Value::from("yes")))
            .await
            .unwrap();
        assert_eq!(report.violations()[0].code, "invalidType");
    }
}
