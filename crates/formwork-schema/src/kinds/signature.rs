//! `signature`: a drawn signature, submitted as an image data URL.

use formwork_core::FormworkResult;

use super::text::string_schema;
use super::{initial_scalar, is_empty_scalar, mismatch};
use crate::constraints::FormatCheck;
use crate::context::ValidationContext;
use crate::definition::ComponentDefinition;
use crate::messages::INVALID_SIGNATURE;
use crate::registry::ComponentBehavior;
use crate::schema::Schema;
use crate::value::Value;

/// Returns `true` for a `data:image/...` URL.
pub fn is_image_data_url(value: &str) -> bool {
    value
        .strip_prefix("data:image/")
        .is_some_and(|rest| rest.contains(','))
}

/// `signature`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureBehavior;

impl ComponentBehavior for SignatureBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::Signature(def) = component else {
            return Err(mismatch(component, "signature"));
        };
        let format = FormatCheck::new("signature", is_image_data_url, INVALID_SIGNATURE);
        string_schema(&def.base, ctx, Some(format))
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, Value::is_blank)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        initial_scalar(component, Value::from(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_url() {
        assert!(is_image_data_url("data:image/png;base64,iVBORw0KGgo="));
        assert!(!is_image_data_url("data:text/plain;base64,aGk="));
        assert!(!is_image_data_url("data:image/png"));
        assert!(!is_image_data_url("signed"));
    }

    #[tokio::test]
    async fn test_signature_schema() {
        let component: ComponentDefinition = serde_json::from_value(json!({
            "type": "signature", "key": "sig", "validate": {"required": true}
        }))
        .unwrap();
        let schema = SignatureBehavior
            .build_schema(&component, &ValidationContext::for_locale("nl"))
            .unwrap();

        let report = schema
            .validate_field("sig", Some(&Value::from("scribble")))
            .await
            .unwrap();
        assert_eq!(report.violations()[0].message, "Ongeldige handtekening.");

        let report = schema.validate_field("sig", Some(&Value::from(""))).await.unwrap();
        assert_eq!(report.violations()[0].code, "required");

        let ok = Value::from("data:image/png;base64,iVBORw0KGgo=");
        assert!(schema.validate_field("sig", Some(&ok)).await.unwrap().is_valid());
    }
}
