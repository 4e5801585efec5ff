//! `addressNL`: a Dutch address record.
//!
//! The sub-fields are ordinary component definitions synthesized here and
//! composed through the registry, so each one validates exactly like a
//! top-level component of its kind. An optional address that is left
//! entirely blank is accepted as a whole; once anything is filled in, the
//! postcode and house number become mandatory.

use formwork_core::FormworkResult;

use super::mismatch;
use crate::compose::compose;
use crate::context::ValidationContext;
use crate::definition::{ComponentBase, ComponentDefinition, SimpleDefinition};
use crate::registry::ComponentBehavior;
use crate::schema::Schema;
use crate::validator::RecordBuilder;
use crate::value::Value;

/// Sub-field keys, in validation order.
pub const ADDRESS_FIELDS: [&str; 6] = [
    "postcode",
    "houseNumber",
    "houseLetter",
    "houseNumberAddition",
    "city",
    "streetName",
];

fn simple(base: ComponentBase) -> SimpleDefinition {
    SimpleDefinition { base }
}

/// The synthesized definitions of the address sub-fields.
pub fn address_components() -> Vec<ComponentDefinition> {
    vec![
        ComponentDefinition::Postcode(simple(
            ComponentBase::new("postcode").label("Postcode").required(true),
        )),
        ComponentDefinition::Textfield(simple(
            ComponentBase::new("houseNumber")
                .label("House number")
                .required(true)
                .pattern("[0-9]{1,5}"),
        )),
        ComponentDefinition::Textfield(simple(
            ComponentBase::new("houseLetter")
                .label("House letter")
                .pattern("[a-zA-Z]"),
        )),
        ComponentDefinition::Textfield(simple(
            ComponentBase::new("houseNumberAddition")
                .label("House number addition")
                .max_length(4),
        )),
        ComponentDefinition::Textfield(simple(ComponentBase::new("city").label("City"))),
        ComponentDefinition::Textfield(simple(
            ComponentBase::new("streetName").label("Street name"),
        )),
    ]
}

/// `addressNL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressNlBehavior;

impl ComponentBehavior for AddressNlBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::AddressNl(def) = component else {
            return Err(mismatch(component, "addressNL"));
        };
        let base = &def.base;
        let fields = compose(&address_components(), ctx)?;
        let validator = RecordBuilder::new(fields)
            .messages(ctx.messages_for(base))
            .required(base.validate.required)
            .skip_when_empty(true)
            .build();
        Ok(Schema::single(base.key.clone(), validator))
    }

    fn is_empty(&self, _component: &ComponentDefinition, value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(value) => value
                .as_record()
                .is_some_and(|members| members.values().all(Value::is_blank)),
        }
    }

    fn initial_value(&self, _component: &ComponentDefinition) -> Value {
        Value::record(ADDRESS_FIELDS.map(|key| (key, Value::from(""))))
    }
}
