//! Composition: from a list of component definitions to one [`Schema`].
//!
//! Composition is a flat union of each component's contribution, obtained
//! through a single registry lookup per component. Decorative kinds
//! contribute nothing; layout kinds contribute the keys of their nested
//! components. Repeating groups call back into [`compose`] for their item
//! components, so nesting depth is bounded only by the definition itself.

use std::collections::BTreeMap;

use formwork_core::logging::validation_span;
use formwork_core::{FormworkError, FormworkResult};
use tracing::Instrument;

use crate::context::ValidationContext;
use crate::definition::ComponentDefinition;
use crate::registry::Registry;
use crate::report::ValidationReport;
use crate::schema::Schema;
use crate::value::Value;

/// Composes sibling components into one schema.
///
/// # Errors
///
/// Returns [`FormworkError::UnregisteredKind`] if a value-carrying kind has
/// no registered behavior, or any error raised by a kind's schema builder.
pub fn compose<'a>(
    components: impl IntoIterator<Item = &'a ComponentDefinition>,
    ctx: &ValidationContext,
) -> FormworkResult<Schema> {
    let mut schema = Schema::new();
    for component in components {
        let kind = component.kind();
        if kind.is_decorative() {
            continue;
        }
        let behavior = ctx
            .lookup(kind)
            .ok_or_else(|| FormworkError::UnregisteredKind(kind.to_string()))?;
        let contribution = behavior.build_schema(component, ctx)?;
        tracing::debug!(
            key = component.key(),
            %kind,
            keys = contribution.len(),
            "built component schema"
        );
        schema.merge(contribution);
    }
    Ok(schema)
}

/// Composes a form's components and validates a submission against them.
///
/// The pass runs inside a `validation` span naming the form and locale.
///
/// # Errors
///
/// See [`compose`] and [`Schema::validate`].
pub async fn validate_form(
    form: &str,
    components: &[ComponentDefinition],
    data: &Value,
    ctx: &ValidationContext,
) -> FormworkResult<ValidationReport> {
    let span = validation_span(form, ctx.locale().tag());
    async {
        let schema = compose(components, ctx)?;
        let report = schema.validate(data).await?;
        tracing::debug!(violations = report.len(), "validation finished");
        Ok(report)
    }
    .instrument(span)
    .await
}

/// The initial submission record for a list of components.
///
/// Layout components are flattened; decorative ones are skipped.
///
/// # Errors
///
/// Returns [`FormworkError::UnregisteredKind`] for a value-carrying kind
/// without a registered behavior.
pub fn initial_values(
    components: &[ComponentDefinition],
    registry: &Registry,
) -> FormworkResult<Value> {
    let mut values = BTreeMap::new();
    collect_initial_values(components.iter(), registry, &mut values)?;
    Ok(Value::Record(values))
}

fn collect_initial_values<'a>(
    components: impl Iterator<Item = &'a ComponentDefinition>,
    registry: &Registry,
    values: &mut BTreeMap<String, Value>,
) -> FormworkResult<()> {
    for component in components {
        let kind = component.kind();
        if kind.is_decorative() {
            continue;
        }
        if kind.is_layout() {
            collect_initial_values(component.nested().into_iter(), registry, values)?;
            continue;
        }
        let behavior = registry
            .lookup(kind)
            .ok_or_else(|| FormworkError::UnregisteredKind(kind.to_string()))?;
        values.insert(component.key().to_string(), behavior.initial_value(component));
    }
    Ok(())
}

/// Keys of the value-carrying components whose value in `data` is empty.
///
/// Each kind decides emptiness with its own rule. Layout components are
/// flattened; decorative ones are skipped.
pub fn empty_keys(
    components: &[ComponentDefinition],
    data: &Value,
    registry: &Registry,
) -> Vec<String> {
    let mut keys = Vec::new();
    collect_empty_keys(components.iter(), data, registry, &mut keys);
    keys
}

fn collect_empty_keys<'a>(
    components: impl Iterator<Item = &'a ComponentDefinition>,
    data: &Value,
    registry: &Registry,
    keys: &mut Vec<String>,
) {
    for component in components {
        let kind = component.kind();
        if kind.is_layout() {
            collect_empty_keys(component.nested().into_iter(), data, registry, keys);
        } else if let Some(behavior) = registry.lookup(kind) {
            if behavior.is_empty(component, data.get(component.key())) {
                keys.push(component.key().to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{parse_components, ComponentKind};
    use serde_json::json;

    fn components(value: serde_json::Value) -> Vec<ComponentDefinition> {
        parse_components(&value.to_string()).unwrap()
    }

    #[test]
    fn test_decorative_and_layout_keys() {
        let form = components(json!([
            {"type": "content", "key": "intro", "html": "<p>Hi</p>"},
            {"type": "fieldset", "key": "personal", "components": [
                {"type": "textfield", "key": "name"},
                {"type": "columns", "key": "cols", "columns": [
                    {"components": [{"type": "email", "key": "email"}]},
                    {"components": [{"type": "phoneNumber", "key": "phone"}]}
                ]}
            ]},
            {"type": "softRequiredErrors", "key": "soft"},
            {"type": "number", "key": "age"}
        ]));
        let schema = compose(&form, &ValidationContext::for_locale("en")).unwrap();
        assert_eq!(
            schema.keys().collect::<Vec<_>>(),
            vec!["name", "email", "phone", "age"]
        );
    }

    #[test]
    fn test_unregistered_kind_is_an_error() {
        let form = components(json!([{"type": "textfield", "key": "a"}]));
        let ctx = ValidationContext::new(
            std::sync::Arc::new(crate::messages::CatalogFormatter::new("en")),
            std::sync::Arc::new(Registry::new()),
            std::sync::Arc::new(crate::context::NoopRemoteValidator),
        );
        let err = compose(&form, &ctx).unwrap_err();
        assert!(matches!(err, FormworkError::UnregisteredKind(ref kind) if kind == "textfield"));
    }

    #[test]
    fn test_initial_values() {
        let form = components(json!([
            {"type": "textfield", "key": "name"},
            {"type": "textfield", "key": "tags", "multiple": true},
            {"type": "number", "key": "age"},
            {"type": "checkbox", "key": "agree"},
            {"type": "selectboxes", "key": "pets", "values": [
                {"value": "cat", "label": "Cat"}, {"value": "dog", "label": "Dog"}
            ]},
            {"type": "fieldset", "key": "fs", "components": [
                {"type": "editgrid", "key": "grid", "components": []}
            ]},
            {"type": "content", "key": "intro"}
        ]));
        let values = initial_values(&form, &Registry::with_builtin_kinds()).unwrap();
        assert_eq!(
            serde_json::Value::from(values),
            json!({
                "name": "",
                "tags": [],
                "age": null,
                "agree": false,
                "pets": {"cat": false, "dog": false},
                "grid": []
            })
        );
    }

    #[test]
    fn test_empty_keys_use_each_kinds_rule() {
        let form = components(json!([
            {"type": "textfield", "key": "name"},
            {"type": "number", "key": "age"},
            {"type": "checkbox", "key": "agree"},
            {"type": "textfield", "key": "tags", "multiple": true}
        ]));
        let data = Value::from(json!({"name": "  ", "age": 0, "agree": false, "tags": ["", ""]}));
        let keys = empty_keys(&form, &data, &Registry::with_builtin_kinds());
        assert_eq!(keys, vec!["name", "agree", "tags"]);
    }

    #[tokio::test]
    async fn test_validate_form() {
        let form = components(json!([
            {"type": "textfield", "key": "name", "validate": {"required": true}}
        ]));
        let ctx = ValidationContext::for_locale("en");
        let report = validate_form("signup", &form, &Value::from(json!({})), &ctx)
            .await
            .unwrap();
        assert_eq!(report.violations()[0].code, "required");
        assert!(ctx.lookup(ComponentKind::Textfield).is_some());
    }
}
