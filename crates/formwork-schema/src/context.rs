//! The validation context threaded through schema construction.
//!
//! A [`ValidationContext`] bundles the collaborators every schema builder may
//! consult: the message formatter (and through it the locale), the component
//! registry for recursive lookups, and the asynchronous remote-plugin
//! validator. It also carries the policy inputs a schema depends on. Schemas
//! are rebuilt whenever any of these change; nothing here is cached.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use formwork_core::{Locale, Settings};

use crate::definition::{ComponentBase, ComponentKind};
use crate::messages::{CatalogFormatter, FieldMessages, MessageFormatter};
use crate::registry::{ComponentBehavior, Registry};
use crate::value::Value;

/// Validates values against named remote plugins.
///
/// Called at most once per field value per validation pass, and only after
/// every synchronous check of that field has passed.
#[async_trait]
pub trait RemoteValidator: Send + Sync {
    /// Returns an error message, or `None` when the value passed every plugin.
    async fn validate(&self, plugins: &[String], value: &Value) -> Option<String>;
}

/// A [`RemoteValidator`] that accepts everything.
///
/// Used when no remote service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRemoteValidator;

#[async_trait]
impl RemoteValidator for NoopRemoteValidator {
    async fn validate(&self, plugins: &[String], _value: &Value) -> Option<String> {
        tracing::warn!(?plugins, "no remote validator configured; skipping plugins");
        None
    }
}

/// Collaborators and policy for building schemas.
///
/// # Examples
///
/// ```
/// use formwork_schema::context::ValidationContext;
///
/// let ctx = ValidationContext::for_locale("nl").with_validate_plugins(false);
/// assert_eq!(ctx.locale().tag(), "nl");
/// assert!(!ctx.validate_plugins());
/// ```
#[derive(Clone)]
pub struct ValidationContext {
    formatter: Arc<dyn MessageFormatter>,
    registry: Arc<Registry>,
    remote: Arc<dyn RemoteValidator>,
    validate_plugins: bool,
    time_zone_offset: i32,
    default_currency: String,
}

impl ValidationContext {
    /// Creates a context from its collaborators, with plugins enabled, UTC
    /// and EUR as the default currency.
    pub fn new(
        formatter: Arc<dyn MessageFormatter>,
        registry: Arc<Registry>,
        remote: Arc<dyn RemoteValidator>,
    ) -> Self {
        Self {
            formatter,
            registry,
            remote,
            validate_plugins: true,
            time_zone_offset: 0,
            default_currency: "EUR".to_string(),
        }
    }

    /// A context with the catalog formatter for `tag`, every built-in kind,
    /// and no remote validator.
    pub fn for_locale(tag: &str) -> Self {
        Self::new(
            Arc::new(CatalogFormatter::new(tag)),
            Registry::builtin(),
            Arc::new(NoopRemoteValidator),
        )
    }

    /// A context configured from settings: language, plugin policy, time
    /// zone offset and default currency.
    pub fn from_settings(
        settings: &Settings,
        registry: Arc<Registry>,
        remote: Arc<dyn RemoteValidator>,
    ) -> Self {
        Self::new(
            Arc::new(CatalogFormatter::new(&settings.language_code)),
            registry,
            remote,
        )
        .with_validate_plugins(settings.validate_plugins)
        .with_time_zone_offset(settings.time_zone_offset)
        .with_default_currency(&settings.default_currency)
    }

    /// Replaces the message formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn MessageFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Replaces the remote validator.
    #[must_use]
    pub fn with_remote(mut self, remote: Arc<dyn RemoteValidator>) -> Self {
        self.remote = remote;
        self
    }

    /// Sets whether remote-plugin refinements are attached.
    #[must_use]
    pub const fn with_validate_plugins(mut self, validate_plugins: bool) -> Self {
        self.validate_plugins = validate_plugins;
        self
    }

    /// Sets the offset (seconds east of UTC) for values without one.
    #[must_use]
    pub const fn with_time_zone_offset(mut self, offset_seconds: i32) -> Self {
        self.time_zone_offset = offset_seconds;
        self
    }

    /// Sets the currency used when a currency component declares none.
    #[must_use]
    pub fn with_default_currency(mut self, currency: &str) -> Self {
        self.default_currency = currency.to_uppercase();
        self
    }

    /// The message formatter.
    pub fn formatter(&self) -> &Arc<dyn MessageFormatter> {
        &self.formatter
    }

    /// The locale of the message formatter.
    pub fn locale(&self) -> &Locale {
        self.formatter.locale()
    }

    /// The component registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Looks up the behavior registered for a kind.
    pub fn lookup(&self, kind: ComponentKind) -> Option<Arc<dyn ComponentBehavior>> {
        self.registry.lookup(kind)
    }

    /// The remote-plugin validator.
    pub fn remote(&self) -> &Arc<dyn RemoteValidator> {
        &self.remote
    }

    /// Whether remote-plugin refinements are attached.
    pub const fn validate_plugins(&self) -> bool {
        self.validate_plugins
    }

    /// The offset (seconds east of UTC) for values without one.
    pub const fn time_zone_offset(&self) -> i32 {
        self.time_zone_offset
    }

    /// The currency used when a currency component declares none.
    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    /// Message resolution for a component.
    pub fn messages_for(&self, base: &ComponentBase) -> FieldMessages {
        FieldMessages::new(base, Arc::clone(&self.formatter))
    }
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("locale", self.locale())
            .field("kinds", &self.registry.len())
            .field("validate_plugins", &self.validate_plugins)
            .field("time_zone_offset", &self.time_zone_offset)
            .field("default_currency", &self.default_currency)
            .finish_non_exhaustive()
    }
}
