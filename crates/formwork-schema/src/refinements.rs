//! Asynchronous refinements: remote plugins and cross-item uniqueness.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::RemoteValidator;
use crate::messages::{FieldMessages, MessageDescriptor};
use crate::report::{FieldPath, Violation, ViolationKind};
use crate::validator::Refinement;
use crate::value::Value;

/// Constraint code of remote-plugin violations.
pub const PLUGINS_CODE: &str = "plugins";

/// Consults the remote validator with a component's plugin names.
///
/// The returned message is surfaced verbatim; it comes from the remote
/// policy, not from the catalog.
pub struct RemotePluginRefinement {
    plugins: Vec<String>,
    remote: Arc<dyn RemoteValidator>,
}

impl RemotePluginRefinement {
    /// Creates a refinement calling `remote` with `plugins`.
    pub fn new(plugins: Vec<String>, remote: Arc<dyn RemoteValidator>) -> Self {
        Self { plugins, remote }
    }
}

impl fmt::Debug for RemotePluginRefinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemotePluginRefinement")
            .field("plugins", &self.plugins)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Refinement for RemotePluginRefinement {
    async fn refine(&self, value: &Value) -> Vec<Violation> {
        match self.remote.validate(&self.plugins, value).await {
            Some(message) => {
                tracing::debug!(plugins = ?self.plugins, "remote plugin rejected value");
                vec![Violation::new(
                    FieldPath::root(),
                    ViolationKind::Remote,
                    PLUGINS_CODE,
                    message,
                )]
            }
            None => Vec::new(),
        }
    }
}

/// Requires an identifier member to be unique across the items of an array.
///
/// Every item of a duplicate group gets one violation at
/// `[index].identifier`, with the shared value interpolated as `{value}`.
/// Items whose identifier is absent or blank are ignored. Identifiers are
/// compared as values, so the number `1` and the string `"1"` differ.
#[derive(Debug)]
pub struct UniqueItemsRefinement {
    identifier: String,
    descriptor: MessageDescriptor,
    messages: FieldMessages,
}

impl UniqueItemsRefinement {
    /// Creates a refinement over the `identifier` member of each item.
    pub fn new(
        identifier: impl Into<String>,
        descriptor: MessageDescriptor,
        messages: FieldMessages,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            descriptor,
            messages,
        }
    }

    fn identifier_of<'a>(&self, item: &'a Value) -> Option<&'a Value> {
        item.get(&self.identifier).filter(|id| !id.is_blank())
    }
}

#[async_trait]
impl Refinement for UniqueItemsRefinement {
    async fn refine(&self, value: &Value) -> Vec<Violation> {
        let Some(items) = value.as_array() else {
            return Vec::new();
        };
        let ids: Vec<Option<&Value>> = items.iter().map(|item| self.identifier_of(item)).collect();

        ids.iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let id = (*id)?;
                let shared = ids.iter().flatten().filter(|other| **other == id).count();
                (shared > 1).then(|| {
                    Violation::new(
                        FieldPath::root().index(index).key(self.identifier.as_str()),
                        ViolationKind::CrossItem,
                        self.descriptor.code,
                        self.messages
                            .resolve(&self.descriptor, &[("value", id.to_string())]),
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ValidationContext;
    use crate::definition::ComponentBase;
    use crate::messages::{DUPLICATE_BSN, UNIQUE};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRemote {
        calls: Mutex<Vec<(Vec<String>, Value)>>,
        verdict: Option<String>,
    }

    #[async_trait]
    impl RemoteValidator for RecordingRemote {
        async fn validate(&self, plugins: &[String], value: &Value) -> Option<String> {
            self.calls
                .lock()
                .unwrap()
                .push((plugins.to_vec(), value.clone()));
            self.verdict.clone()
        }
    }

    fn messages(tag: &str) -> FieldMessages {
        ValidationContext::for_locale(tag).messages_for(&ComponentBase::new("children"))
    }

    #[tokio::test]
    async fn test_remote_plugin_passes_names_and_value() {
        let remote = Arc::new(RecordingRemote {
            verdict: Some("Unknown KvK number".to_string()),
            ..RecordingRemote::default()
        });
        let refinement = RemotePluginRefinement::new(vec!["kvk".to_string()], remote.clone());

        let violations = refinement.refine(&Value::from("12345678")).await;
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Remote);
        assert_eq!(violations[0].code, "plugins");
        assert_eq!(violations[0].message, "Unknown KvK number");

        let calls = remote.calls.lock().unwrap();
        assert_eq!(calls[0].0, vec!["kvk".to_string()]);
        assert_eq!(calls[0].1, Value::from("12345678"));
    }

    #[tokio::test]
    async fn test_remote_plugin_pass() {
        let refinement =
            RemotePluginRefinement::new(vec!["kvk".to_string()], Arc::new(RecordingRemote::default()));
        assert!(refinement.refine(&Value::from("1")).await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_flag_every_item_of_the_group() {
        let refinement = UniqueItemsRefinement::new("bsn", DUPLICATE_BSN, messages("en"));
        let items = Value::from(json!([
            {"bsn": "111222333"},
            {"bsn": "123456782"},
            {"bsn": "111222333"}
        ]));
        let violations = refinement.refine(&items).await;
        let paths: Vec<String> = violations.iter().map(|v| v.path.to_string()).collect();
        assert_eq!(paths, vec!["[0].bsn", "[2].bsn"]);
        assert_eq!(violations[0].kind, ViolationKind::CrossItem);
        assert_eq!(violations[0].code, "duplicateBsn");
        assert!(violations[0].message.contains("111222333"));
    }

    #[tokio::test]
    async fn test_distinct_and_blank_identifiers_pass() {
        let refinement = UniqueItemsRefinement::new("id", UNIQUE, messages("nl"));
        let items = Value::from(json!([{"id": "a"}, {"id": "b"}, {"id": ""}, {"id": ""}, {}]));
        assert!(refinement.refine(&items).await.is_empty());
        assert!(refinement.refine(&Value::from("x")).await.is_empty());
    }

    #[tokio::test]
    async fn test_identifiers_compare_as_values() {
        let refinement = UniqueItemsRefinement::new("n", UNIQUE, messages("en"));
        let items = Value::from(json!([{"n": 7}, {"n": 7.0}]));
        let violations = refinement.refine(&items).await;
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[1].message, "The value 7 occurs more than once.");

        let mixed = Value::from(json!([{"n": 1}, {"n": "1"}, {"n": true}, {"n": "true"}]));
        assert!(refinement.refine(&mixed).await.is_empty());
    }
}
