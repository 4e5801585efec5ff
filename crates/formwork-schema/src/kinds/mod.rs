//! Built-in component kinds.
//!
//! Every value-carrying kind has a behavior here; [`register_builtin_kinds`]
//! installs them into a [`Registry`]. Scalar kinds share the steps in this
//! module: the requiredness gate, remote-plugin refinements and wrapping in
//! an array when `multiple` is set.

pub mod address;
pub mod checkbox;
pub mod children;
pub mod choice;
pub mod dutch;
pub mod editgrid;
pub mod layout;
pub mod number;
pub mod signature;
pub mod temporal;
pub mod text;

use std::sync::Arc;

use formwork_core::FormworkError;

use crate::context::ValidationContext;
use crate::definition::{ComponentBase, ComponentDefinition, ComponentKind};
use crate::refinements::RemotePluginRefinement;
use crate::registry::Registry;
use crate::schema::Schema;
use crate::validator::{ArrayBuilder, EmptyPredicate, ScalarBuilder};
use crate::value::Value;

/// Registers every built-in kind. Decorative kinds are left out.
pub fn register_builtin_kinds(registry: &mut Registry) {
    registry.register(ComponentKind::Textfield, Arc::new(text::TextfieldBehavior));
    registry.register(ComponentKind::Textarea, Arc::new(text::TextfieldBehavior));
    registry.register(ComponentKind::Email, Arc::new(text::EmailBehavior));
    registry.register(ComponentKind::PhoneNumber, Arc::new(text::PhoneNumberBehavior));
    registry.register(ComponentKind::Postcode, Arc::new(dutch::PostcodeBehavior));
    registry.register(ComponentKind::Licenseplate, Arc::new(dutch::LicenseplateBehavior));
    registry.register(ComponentKind::Bsn, Arc::new(dutch::BsnBehavior));
    registry.register(ComponentKind::Iban, Arc::new(dutch::IbanBehavior));
    registry.register(ComponentKind::Number, Arc::new(number::NumberBehavior));
    registry.register(ComponentKind::Currency, Arc::new(number::CurrencyBehavior));
    registry.register(ComponentKind::Date, Arc::new(temporal::DateBehavior));
    registry.register(ComponentKind::Datetime, Arc::new(temporal::DatetimeBehavior));
    registry.register(ComponentKind::Time, Arc::new(temporal::TimeBehavior));
    registry.register(ComponentKind::Select, Arc::new(choice::SingleChoiceBehavior));
    registry.register(ComponentKind::Radio, Arc::new(choice::SingleChoiceBehavior));
    registry.register(ComponentKind::Selectboxes, Arc::new(choice::SelectboxesBehavior));
    registry.register(ComponentKind::Checkbox, Arc::new(checkbox::CheckboxBehavior));
    registry.register(ComponentKind::Signature, Arc::new(signature::SignatureBehavior));
    registry.register(ComponentKind::Editgrid, Arc::new(editgrid::EditGridBehavior));
    registry.register(ComponentKind::AddressNl, Arc::new(address::AddressNlBehavior));
    registry.register(ComponentKind::Children, Arc::new(children::ChildrenBehavior));
    registry.register(ComponentKind::Fieldset, Arc::new(layout::LayoutBehavior));
    registry.register(ComponentKind::Columns, Arc::new(layout::LayoutBehavior));
}

/// The error for a definition handed to the behavior of another kind.
pub(crate) fn mismatch(component: &ComponentDefinition, expected: &str) -> FormworkError {
    FormworkError::invalid_definition(
        component.key(),
        format!("expected a {expected} component, got {}", component.kind()),
    )
}

/// Starts a scalar validator with the component's requiredness.
pub(crate) fn scalar(
    base: &ComponentBase,
    ctx: &ValidationContext,
    is_empty: EmptyPredicate,
) -> ScalarBuilder {
    ScalarBuilder::new(ctx.messages_for(base), is_empty).required(base.validate.required)
}

/// Appends the remote-plugin refinement, if the component names plugins and
/// plugin validation is enabled.
pub(crate) fn with_plugins(
    base: &ComponentBase,
    ctx: &ValidationContext,
    builder: ScalarBuilder,
) -> ScalarBuilder {
    if !ctx.validate_plugins() || base.validate.plugins.is_empty() {
        return builder;
    }
    builder.refinement(Arc::new(RemotePluginRefinement::new(
        base.validate.plugins.clone(),
        Arc::clone(ctx.remote()),
    )))
}

/// Finishes a scalar component: plugins, then array wrapping if `multiple`.
pub(crate) fn finish_scalar(
    base: &ComponentBase,
    ctx: &ValidationContext,
    builder: ScalarBuilder,
) -> Schema {
    let validator = with_plugins(base, ctx, builder).build();
    let validator = if base.multiple {
        ArrayBuilder::new(validator, ctx.messages_for(base))
            .required(base.validate.required)
            .empty_when_items_empty(true)
            .build()
    } else {
        validator
    };
    Schema::single(base.key.clone(), validator)
}

/// Emptiness of a scalar component's value, honouring `multiple`.
pub(crate) fn is_empty_scalar(
    component: &ComponentDefinition,
    value: Option<&Value>,
    is_empty: EmptyPredicate,
) -> bool {
    let multiple = component.base().is_some_and(|base| base.multiple);
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) if multiple => items.iter().all(is_empty),
        Some(value) => is_empty(value),
    }
}

/// The initial value of a scalar component, honouring `multiple`.
pub(crate) fn initial_scalar(component: &ComponentDefinition, scalar: Value) -> Value {
    if component.base().is_some_and(|base| base.multiple) {
        Value::Array(Vec::new())
    } else {
        scalar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty_scalar_with_multiple() {
        let single = ComponentDefinition::textfield(ComponentBase::new("a"));
        let multiple = ComponentDefinition::textfield(ComponentBase::new("a").multiple(true));

        assert!(is_empty_scalar(&single, None, Value::is_blank));
        assert!(is_empty_scalar(&single, Some(&Value::from(" ")), Value::is_blank));
        assert!(!is_empty_scalar(&single, Some(&Value::from("x")), Value::is_blank));

        let blanks = Value::Array(vec![Value::from(""), Value::Null]);
        assert!(is_empty_scalar(&multiple, Some(&blanks), Value::is_blank));
        assert!(is_empty_scalar(&multiple, Some(&Value::Array(Vec::new())), Value::is_blank));
        let filled = Value::Array(vec![Value::from(""), Value::from("x")]);
        assert!(!is_empty_scalar(&multiple, Some(&filled), Value::is_blank));
    }

    #[test]
    fn test_initial_scalar() {
        let single = ComponentDefinition::textfield(ComponentBase::new("a"));
        let multiple = ComponentDefinition::textfield(ComponentBase::new("a").multiple(true));
        assert_eq!(initial_scalar(&single, Value::from("")), Value::from(""));
        assert_eq!(initial_scalar(&multiple, Value::from("")), Value::Array(Vec::new()));
    }

    #[test]
    fn test_mismatch_names_both_kinds() {
        let component = ComponentDefinition::textfield(ComponentBase::new("a"));
        let err = mismatch(&component, "number");
        assert_eq!(
            err.to_string(),
            "Invalid component definition 'a': expected a number component, got textfield"
        );
    }
}
