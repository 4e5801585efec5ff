//! Layout containers: `fieldset` and `columns`.
//!
//! A container has no value of its own. Its nested components store their
//! values directly in the enclosing record, so its schema is the composition
//! of its children.

use formwork_core::FormworkResult;

use crate::compose::compose;
use crate::context::ValidationContext;
use crate::definition::ComponentDefinition;
use crate::registry::ComponentBehavior;
use crate::schema::Schema;
use crate::value::Value;

/// `fieldset` and `columns`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutBehavior;

impl ComponentBehavior for LayoutBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        compose(component.nested(), ctx)
    }

    fn is_empty(&self, _component: &ComponentDefinition, _value: Option<&Value>) -> bool {
        true
    }

    fn initial_value(&self, _component: &ComponentDefinition) -> Value {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fieldset_contributes_child_keys() {
        let component: ComponentDefinition = serde_json::from_value(json!({
            "type": "fieldset", "key": "personal",
            "components": [
                {"type": "textfield", "key": "name", "validate": {"required": true}},
                {"type": "content", "key": "help"}
            ]
        }))
        .unwrap();
        let schema = LayoutBehavior
            .build_schema(&component, &ValidationContext::for_locale("en"))
            .unwrap();
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["name"]);
        assert!(!schema.contains_key("personal"));

        let report = schema.validate(&Value::from(json!({}))).await.unwrap();
        assert_eq!(report.violations()[0].path.to_string(), "name");
    }
}
