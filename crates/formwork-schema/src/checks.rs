//! Static checks of form definitions.
//!
//! [`check_components`] inspects a component tree for problems that would
//! otherwise only surface while validating a submission: keys that collide,
//! kinds without a behavior, patterns that do not compile, enumerated
//! components without options and edit grids whose `uniqueKey` names no item
//! field.

use std::collections::HashSet;
use std::fmt;

use crate::constraints::PatternCheck;
use crate::definition::ComponentDefinition;
use crate::registry::Registry;

/// The result of a single definition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckMessage {
    /// The severity level of this check result.
    pub level: CheckLevel,
    /// A human-readable description of the issue.
    pub msg: String,
    /// An optional hint for how to resolve the issue.
    pub hint: Option<String>,
    /// A unique identifier for this check (e.g. "components.E001").
    pub id: String,
}

impl CheckMessage {
    fn new(level: CheckLevel, id: &str, msg: String, hint: Option<&str>) -> Self {
        Self {
            level,
            msg,
            hint: hint.map(str::to_string),
            id: id.to_string(),
        }
    }
}

impl fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.level, self.id, self.msg)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n\tHINT: {hint}")?;
        }
        Ok(())
    }
}

/// Severity levels for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckLevel {
    /// Informational message.
    Info,
    /// A warning that may indicate a problem.
    Warning,
    /// An error that must be resolved.
    Error,
    /// A critical error that prevents the form from being used.
    Critical,
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Runs every definition check over a component tree.
///
/// Layout containers share the key scope of their parent; each edit grid
/// opens a new scope for its item components.
pub fn check_components(
    components: &[ComponentDefinition],
    registry: &Registry,
) -> Vec<CheckMessage> {
    let mut messages = Vec::new();
    let mut seen = HashSet::new();
    check_scope(components.iter(), registry, &mut seen, &mut messages);
    messages
}

fn check_scope<'a>(
    components: impl Iterator<Item = &'a ComponentDefinition>,
    registry: &Registry,
    seen: &mut HashSet<String>,
    messages: &mut Vec<CheckMessage>,
) {
    for component in components {
        let kind = component.kind();
        if kind.is_decorative() {
            continue;
        }
        if kind.is_layout() {
            check_scope(component.nested().into_iter(), registry, seen, messages);
            continue;
        }
        check_component(component, registry, messages);
        let key = component.key();
        if key.is_empty() {
            messages.push(CheckMessage::new(
                CheckLevel::Error,
                "components.E004",
                format!("A {kind} component has no key"),
                Some("Every value-carrying component needs a key"),
            ));
        } else if !seen.insert(key.to_string()) {
            messages.push(CheckMessage::new(
                CheckLevel::Error,
                "components.E001",
                format!("Duplicate key '{key}'"),
                Some("Keys must be distinct within a form, layout containers included"),
            ));
        }
        if let ComponentDefinition::Editgrid(grid) = component {
            let mut item_keys = HashSet::new();
            check_scope(grid.components.iter(), registry, &mut item_keys, messages);
            if let Some(unique_key) = grid.base.validate.unique_key.as_deref() {
                if !item_keys.contains(unique_key) {
                    messages.push(CheckMessage::new(
                        CheckLevel::Warning,
                        "components.W002",
                        format!("Edit grid '{key}' declares unknown uniqueKey '{unique_key}'"),
                        Some("uniqueKey must be the key of one of the grid's item components"),
                    ));
                }
            }
        }
    }
}

fn check_component(
    component: &ComponentDefinition,
    registry: &Registry,
    messages: &mut Vec<CheckMessage>,
) {
    let key = component.key();
    let kind = component.kind();
    if !registry.contains(kind) {
        messages.push(CheckMessage::new(
            CheckLevel::Critical,
            "components.E002",
            format!("Component '{key}' has kind {kind}, which has no registered behavior"),
            None,
        ));
    }
    if let Some(pattern) = component.base().and_then(|base| base.validate.pattern()) {
        if let Err(e) = PatternCheck::new(key, pattern) {
            messages.push(CheckMessage::new(
                CheckLevel::Error,
                "components.E003",
                e.to_string(),
                Some("Patterns use Rust regex syntax and are matched against the whole value"),
            ));
        }
    }
    if let ComponentDefinition::Select(def)
    | ComponentDefinition::Radio(def)
    | ComponentDefinition::Selectboxes(def) = component
    {
        if def.options().map_or(true, <[_]>::is_empty) {
            messages.push(CheckMessage::new(
                CheckLevel::Warning,
                "components.W001",
                format!("Component '{key}' ({kind}) has no options"),
                Some("Every submitted value will be rejected until options are added"),
            ));
        }
    }
}
