//! `children`: a collection of child records with fixed sub-fields.
//!
//! Every child is identified by their BSN, which must be unique within the
//! collection.

use std::sync::Arc;

use formwork_core::FormworkResult;

use super::mismatch;
use crate::compose::compose;
use crate::context::ValidationContext;
use crate::definition::{
    ChildrenDefinition, ComponentBase, ComponentDefinition, DateDefinition, SimpleDefinition,
};
use crate::messages::DUPLICATE_BSN;
use crate::refinements::UniqueItemsRefinement;
use crate::registry::ComponentBehavior;
use crate::schema::Schema;
use crate::validator::ArrayBuilder;
use crate::value::Value;

fn simple(base: ComponentBase) -> SimpleDefinition {
    SimpleDefinition { base }
}

/// The synthesized definitions of one child's sub-fields.
pub fn child_components(def: &ChildrenDefinition) -> Vec<ComponentDefinition> {
    let mut components = vec![
        ComponentDefinition::Bsn(simple(ComponentBase::new("bsn").label("BSN").required(true))),
        ComponentDefinition::Textfield(simple(ComponentBase::new("firstNames").label("Firstnames"))),
        ComponentDefinition::Textfield(simple(ComponentBase::new("initials").label("Initials"))),
        ComponentDefinition::Textfield(simple(ComponentBase::new("affixes").label("Affixes"))),
        ComponentDefinition::Textfield(simple(ComponentBase::new("lastName").label("Lastname"))),
        ComponentDefinition::Date(DateDefinition {
            base: ComponentBase::new("dateOfBirth").label("Date of birth").required(true),
            ..DateDefinition::default()
        }),
    ];
    if def.enable_selection {
        components.push(ComponentDefinition::Checkbox(simple(
            ComponentBase::new("selected").label("Selected"),
        )));
    }
    components
}

/// `children`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildrenBehavior;

impl ComponentBehavior for ChildrenBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::Children(def) = component else {
            return Err(mismatch(component, "children"));
        };
        let base = &def.base;
        let item = compose(&child_components(def), ctx)?.to_validator();
        let validator = ArrayBuilder::new(item, ctx.messages_for(base))
            .required(base.validate.required)
            .refinement(Arc::new(UniqueItemsRefinement::new(
                "bsn",
                DUPLICATE_BSN,
                ctx.messages_for(base),
            )))
            .build();
        Ok(Schema::single(base.key.clone(), validator))
    }

    fn is_empty(&self, _component: &ComponentDefinition, value: Option<&Value>) -> bool {
        value
            .and_then(Value::as_array)
            .map_or(true, <[Value]>::is_empty)
    }

    fn initial_value(&self, _component: &ComponentDefinition) -> Value {
        Value::Array(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn children(definition: serde_json::Value) -> Schema {
        let component: ComponentDefinition = serde_json::from_value(definition).unwrap();
        ChildrenBehavior
            .build_schema(&component, &ValidationContext::for_locale("en"))
            .unwrap()
    }

    async fn violations(schema: &Schema, data: serde_json::Value) -> Vec<(String, String)> {
        let value = Value::from(data);
        schema
            .validate_field("children", Some(&value))
            .await
            .unwrap()
            .violations()
            .iter()
            .map(|v| (v.path.to_string(), v.message.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_duplicate_bsn() {
        let schema = children(json!({"type": "children", "key": "children"}));
        let child = |bsn: &str| json!({"bsn": bsn, "firstNames": "Kim", "dateOfBirth": "2019-04-01"});

        let found = violations(&schema, json!([child("111222333"), child("111222333")])).await;
        assert_eq!(
            found,
            vec![
                (
                    "children[0].bsn".to_string(),
                    "The BSN 111222333 occurs more than once.".to_string()
                ),
                (
                    "children[1].bsn".to_string(),
                    "The BSN 111222333 occurs more than once.".to_string()
                )
            ]
        );
        assert!(violations(&schema, json!([child("111222333"), child("123456782")]))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_child_sub_fields() {
        let schema = children(json!({"type": "children", "key": "children"}));
        let found = violations(&schema, json!([{"bsn": "123456789", "dateOfBirth": "01-04-2019"}])).await;
        let paths: Vec<&str> = found.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(paths, vec!["children[0].bsn", "children[0].dateOfBirth"]);
    }

    #[tokio::test]
    async fn test_blank_child_is_validated() {
        let schema = children(json!({"type": "children", "key": "children"}));
        let blank = json!([{"bsn": "", "firstNames": "", "dateOfBirth": ""}]);
        let found = violations(&schema, blank).await;
        let paths: Vec<&str> = found.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(paths, vec!["children[0].bsn", "children[0].dateOfBirth"]);
        assert!(violations(&schema, json!([])).await.is_empty());
    }

    #[test]
    fn test_selection_sub_field() {
        let plain: ChildrenDefinition = serde_json::from_value(json!({"key": "c"})).unwrap();
        let selectable: ChildrenDefinition =
            serde_json::from_value(json!({"key": "c", "enableSelection": true})).unwrap();
        assert_eq!(child_components(&plain).len(), 6);
        assert_eq!(child_components(&selectable).last().unwrap().key(), "selected");
    }
}
