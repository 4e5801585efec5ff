//! The component-kind registry.
//!
//! Maps each [`ComponentKind`] to the behavior bundle for that kind: its
//! schema builder, its emptiness rule and its initial value. Composition
//! dispatches through one table lookup per component; decorative kinds are
//! simply not registered.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use formwork_core::FormworkResult;

use crate::context::ValidationContext;
use crate::definition::{ComponentDefinition, ComponentKind};
use crate::schema::Schema;
use crate::value::Value;

/// Behavior of one component kind.
///
/// Implementations are stateless: every method is a pure function of its
/// arguments.
pub trait ComponentBehavior: Send + Sync + fmt::Debug {
    /// Builds the validators for a component, keyed by value key.
    ///
    /// Most kinds return a single entry under the component key; layout kinds
    /// return the entries of their nested components.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition cannot be turned into a validator,
    /// e.g. a pattern that does not compile or a definition of another kind.
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema>;

    /// Returns `true` if `value` is the component's empty representation.
    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool;

    /// The value a fresh submission starts with.
    fn initial_value(&self, component: &ComponentDefinition) -> Value;
}

/// A table of component behaviors keyed by kind.
///
/// # Examples
///
/// ```
/// use formwork_schema::definition::ComponentKind;
/// use formwork_schema::registry::Registry;
///
/// let registry = Registry::with_builtin_kinds();
/// assert!(registry.contains(ComponentKind::Currency));
/// assert!(registry.lookup(ComponentKind::Content).is_none());
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    behaviors: HashMap<ComponentKind, Arc<dyn ComponentBehavior>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
        }
    }

    /// A registry holding every built-in kind.
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::new();
        crate::kinds::register_builtin_kinds(&mut registry);
        registry
    }

    /// The process-wide registry of built-in kinds.
    pub fn builtin() -> Arc<Self> {
        static BUILTIN: OnceLock<Arc<Registry>> = OnceLock::new();
        Arc::clone(BUILTIN.get_or_init(|| Arc::new(Self::with_builtin_kinds())))
    }

    /// Registers (or replaces) the behavior of a kind.
    pub fn register(&mut self, kind: ComponentKind, behavior: Arc<dyn ComponentBehavior>) {
        if self.behaviors.insert(kind, behavior).is_some() {
            tracing::debug!(%kind, "replaced component behavior");
        }
    }

    /// The behavior of a kind, if registered.
    pub fn lookup(&self, kind: ComponentKind) -> Option<Arc<dyn ComponentBehavior>> {
        self.behaviors.get(&kind).cloned()
    }

    /// Returns `true` if the kind is registered.
    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.behaviors.contains_key(&kind)
    }

    /// The registered kinds, in declaration order.
    pub fn kinds(&self) -> Vec<ComponentKind> {
        let mut kinds: Vec<ComponentKind> = self.behaviors.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// The number of registered kinds.
    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ComponentBase;

    #[derive(Debug)]
    struct Nothing;

    impl ComponentBehavior for Nothing {
        fn build_schema(
            &self,
            _component: &ComponentDefinition,
            _ctx: &ValidationContext,
        ) -> FormworkResult<Schema> {
            Ok(Schema::new())
        }

        fn is_empty(&self, _component: &ComponentDefinition, _value: Option<&Value>) -> bool {
            true
        }

        fn initial_value(&self, _component: &ComponentDefinition) -> Value {
            Value::Null
        }
    }

    #[test]
    fn test_builtin_kinds_exclude_decorative() {
        let registry = Registry::with_builtin_kinds();
        for kind in ComponentKind::ALL {
            assert_eq!(registry.contains(kind), !kind.is_decorative(), "{kind}");
        }
        assert_eq!(registry.len(), ComponentKind::ALL.len() - 2);
        assert_eq!(registry.kinds()[0], ComponentKind::Textfield);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = Registry::with_builtin_kinds();
        registry.register(ComponentKind::Textfield, Arc::new(Nothing));
        let behavior = registry.lookup(ComponentKind::Textfield).unwrap();
        let component = ComponentDefinition::textfield(ComponentBase::new("t"));
        assert_eq!(behavior.initial_value(&component), Value::Null);
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        assert!(registry.lookup(ComponentKind::Number).is_none());
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(Arc::ptr_eq(&Registry::builtin(), &Registry::builtin()));
    }
}
