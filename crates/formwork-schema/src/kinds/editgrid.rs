//! `editgrid`: a repeating group of records.
//!
//! The item validator is the composition of the nested components, so any
//! registered kind (including another edit grid) can appear inside an item.
//! An optional `validate.uniqueKey` names an item sub-field whose values must
//! be distinct across the group; each offending item is reported at
//! `key[index].uniqueKey`.

use std::sync::Arc;

use formwork_core::FormworkResult;

use super::mismatch;
use crate::compose::compose;
use crate::context::ValidationContext;
use crate::definition::ComponentDefinition;
use crate::messages::UNIQUE;
use crate::refinements::UniqueItemsRefinement;
use crate::registry::ComponentBehavior;
use crate::schema::Schema;
use crate::validator::ArrayBuilder;
use crate::value::Value;

/// `editgrid`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditGridBehavior;

impl ComponentBehavior for EditGridBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::Editgrid(def) = component else {
            return Err(mismatch(component, "editgrid"));
        };
        let base = &def.base;
        let item = compose(&def.components, ctx)?.to_validator();
        let mut builder = ArrayBuilder::new(item, ctx.messages_for(base))
            .required(base.validate.required)
            .max_items(base.validate.max_length);
        if let Some(identifier) = base.validate.unique_key.as_deref().filter(|k| !k.is_empty()) {
            builder = builder.refinement(Arc::new(UniqueItemsRefinement::new(
                identifier,
                UNIQUE,
                ctx.messages_for(base),
            )));
        }
        Ok(Schema::single(base.key.clone(), builder.build()))
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
