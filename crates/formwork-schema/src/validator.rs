//! The validator runtime.
//!
//! A [`Validator`] is a cheap-to-clone handle over an immutable tree of
//! nodes:
//!
//! - **scalar** nodes run synchronous [`Check`]s in stage order (shape, then
//!   format, then bounds) after an emptiness/requiredness gate;
//! - **array** nodes validate every element with an item validator and the
//!   array's own cardinality;
//! - **record** nodes validate named members;
//! - **all-of** nodes apply several validators to the same value.
//!
//! Any node may carry asynchronous [`Refinement`]s. Evaluation is two-phase:
//! a synchronous walk collects every violation and queues the refinements of
//! nodes whose synchronous subtree produced none; the queued refinements are
//! then awaited one at a time, in document order. A cheap local failure
//! therefore never triggers a remote call, and callers always await
//! [`Validator::validate`] whether or not anything asynchronous is attached.
//!
//! Validators hold no mutable state, so validating the same value twice
//! yields the same report, and independent validations may run concurrently.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use formwork_core::i18n::interpolate;
use formwork_core::FormworkResult;

use crate::messages::{FieldMessages, MessageDescriptor, INVALID_TYPE, MAX_ITEMS, REQUIRED};
use crate::report::{FieldPath, ValidationReport, Violation, ViolationKind};
use crate::value::Value;

/// Decides whether a value is the kind's empty representation.
pub type EmptyPredicate = fn(&Value) -> bool;

/// The ordering stage of a synchronous check.
///
/// A failing shape check stops the node's remaining checks; format and bound
/// checks are all evaluated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Type/shape: is the value representable in the kind at all.
    Shape,
    /// Pattern or structural format.
    Format,
    /// Declared bounds.
    Bound,
}

/// A failed check, before its message is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// The violation kind.
    pub kind: ViolationKind,
    /// The message to resolve.
    pub descriptor: MessageDescriptor,
    /// Placeholder substitutions for the message.
    pub values: Vec<(&'static str, String)>,
}

impl Failure {
    /// Creates a failure without substitutions.
    pub const fn new(kind: ViolationKind, descriptor: MessageDescriptor) -> Self {
        Self {
            kind,
            descriptor,
            values: Vec::new(),
        }
    }

    /// Adds a placeholder substitution.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.push((name, value.into()));
        self
    }

    /// The shape failure for a value of the wrong type.
    pub fn invalid_type(expected: &str, received: &Value) -> Self {
        Self::new(ViolationKind::Shape, INVALID_TYPE)
            .with("expected", expected)
            .with("received", received.type_name())
    }
}

/// A synchronous constraint over a non-empty value.
pub trait Check: Send + Sync + fmt::Debug {
    /// The stage this check runs in.
    fn stage(&self) -> Stage;

    /// Returns the failure, if the value violates this constraint.
    ///
    /// # Errors
    ///
    /// Returns an error only when the check's own configuration cannot be
    /// reconciled with the value (e.g. an enumeration without options).
    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>>;
}

/// An asynchronous constraint, run after the synchronous walk.
#[async_trait]
pub trait Refinement: Send + Sync + fmt::Debug {
    /// Returns violations with paths relative to the refined value.
    async fn refine(&self, value: &Value) -> Vec<Violation>;
}

/// An executable, composable value-checking unit.
///
/// # Examples
///
/// ```
/// use formwork_schema::context::ValidationContext;
/// use formwork_schema::definition::ComponentBase;
/// use formwork_schema::value::Value;
/// use formwork_schema::validator::ScalarBuilder;
///
/// # tokio_test::block_on(async {
/// let ctx = ValidationContext::for_locale("en");
/// let base = ComponentBase::new("name").required(true);
/// let validator = ScalarBuilder::new(ctx.messages_for(&base), Value::is_blank)
///     .required(true)
///     .build();
///
/// let report = validator.validate(Some(&Value::from(""))).await.unwrap();
/// assert_eq!(report.violations()[0].code, "required");
/// assert!(validator.validate(Some(&Value::from("Ann"))).await.unwrap().is_valid());
/// # });
/// ```
#[derive(Clone)]
pub struct Validator(Arc<Node>);

enum Node {
    Scalar(ScalarNode),
    Array(ArrayNode),
    Record(RecordNode),
    AllOf(Vec<Validator>),
}

struct ScalarNode {
    messages: FieldMessages,
    required: bool,
    is_empty: EmptyPredicate,
    checks: Vec<Box<dyn Check>>,
    refinements: Vec<Arc<dyn Refinement>>,
}

struct ArrayNode {
    item: Validator,
    messages: FieldMessages,
    required: bool,
    empty_when_items_empty: bool,
    max_items: Option<usize>,
    refinements: Vec<Arc<dyn Refinement>>,
}

impl ArrayNode {
    fn is_empty_items(&self, items: &[Value]) -> bool {
        if self.empty_when_items_empty {
            items.iter().all(|item| self.item.is_empty_value(Some(item)))
        } else {
            items.is_empty()
        }
    }
}

struct RecordNode {
    fields: Vec<(String, Validator)>,
    messages: Option<FieldMessages>,
    required: bool,
    skip_when_empty: bool,
    refinements: Vec<Arc<dyn Refinement>>,
}

/// A refinement queued by the synchronous walk.
struct Pending {
    refinement: Arc<dyn Refinement>,
    value: Value,
    path: FieldPath,
}

/// Accumulated state of one validation pass.
#[derive(Default)]
pub(crate) struct Walk {
    violations: Vec<Violation>,
    pending: Vec<Pending>,
}

impl Walk {
    fn fail(&mut self, path: &FieldPath, messages: Option<&FieldMessages>, failure: &Failure) {
        let message = messages.map_or_else(
            || interpolate(failure.descriptor.default_message, &failure.values),
            |m| m.resolve(&failure.descriptor, &failure.values),
        );
        self.violations.push(Violation::new(
            path.clone(),
            failure.kind,
            failure.descriptor.code,
            message,
        ));
    }

    fn queue(&mut self, refinements: &[Arc<dyn Refinement>], value: &Value, path: &FieldPath) {
        for refinement in refinements {
            self.pending.push(Pending {
                refinement: Arc::clone(refinement),
                value: value.clone(),
                path: path.clone(),
            });
        }
    }

    async fn finish(self) -> ValidationReport {
        let mut violations = self.violations;
        for pending in self.pending {
            tracing::trace!(path = %pending.path, refinement = ?pending.refinement, "running refinement");
            let found = pending.refinement.refine(&pending.value).await;
            violations.extend(found.into_iter().map(|v| v.under(&pending.path)));
        }
        ValidationReport::new(violations)
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    value.map_or(true, Value::is_null)
}

fn required_failure() -> Failure {
    Failure::new(ViolationKind::Required, REQUIRED)
}

impl Validator {
    /// A validator applying every given validator to the same value.
    pub fn all_of(validators: Vec<Self>) -> Self {
        Self(Arc::new(Node::AllOf(validators)))
    }

    /// Validates a value (`None` meaning absent) and returns every violation.
    ///
    /// # Errors
    ///
    /// Returns an error when the validator's configuration cannot be
    /// reconciled with the value, never for ordinary invalid input.
    pub async fn validate(&self, value: Option<&Value>) -> FormworkResult<ValidationReport> {
        let mut walk = Walk::default();
        self.walk(value, &FieldPath::root(), &mut walk)?;
        Ok(walk.finish().await)
    }

    /// Validates a value and roots every violation path at `path`.
    ///
    /// # Errors
    ///
    /// See [`Validator::validate`].
    pub async fn validate_at(
        &self,
        value: Option<&Value>,
        path: &FieldPath,
    ) -> FormworkResult<ValidationReport> {
        let mut walk = Walk::default();
        self.walk(value, path, &mut walk)?;
        Ok(walk.finish().await)
    }

    /// Returns `true` if `value` is this validator's empty representation.
    ///
    /// Arrays are empty when they have no elements or only empty elements;
    /// records when every member is empty.
    pub fn is_empty_value(&self, value: Option<&Value>) -> bool {
        match self.0.as_ref() {
            Node::Scalar(node) => value.map_or(true, node.is_empty),
            Node::Array(node) => match value {
                None | Some(Value::Null) => true,
                Some(Value::Array(items)) => node.is_empty_items(items),
                Some(_) => false,
            },
            Node::Record(node) => match value {
                None | Some(Value::Null) => true,
                Some(Value::Record(members)) => node
                    .fields
                    .iter()
                    .all(|(key, field)| field.is_empty_value(members.get(key))),
                Some(_) => false,
            },
            Node::AllOf(validators) => validators.iter().all(|v| v.is_empty_value(value)),
        }
    }

    pub(crate) fn walk(
        &self,
        value: Option<&Value>,
        path: &FieldPath,
        walk: &mut Walk,
    ) -> FormworkResult<()> {
        match self.0.as_ref() {
            Node::Scalar(node) => node.walk(value, path, walk),
            Node::Array(node) => node.walk(value, path, walk),
            Node::Record(node) => node.walk(value, path, walk),
            Node::AllOf(validators) => {
                for validator in validators {
                    validator.walk(value, path, walk)?;
                }
                Ok(())
            }
        }
    }
}

impl ScalarNode {
    fn walk(&self, value: Option<&Value>, path: &FieldPath, walk: &mut Walk) -> FormworkResult<()> {
        let Some(value) = value.filter(|v| !(self.is_empty)(v)) else {
            if self.required {
                walk.fail(path, Some(&self.messages), &required_failure());
            }
            return Ok(());
        };

        let before = walk.violations.len();
        for check in &self.checks {
            if let Some(failure) = check.check(value)? {
                walk.fail(path, Some(&self.messages), &failure);
                if check.stage() == Stage::Shape {
                    return Ok(());
                }
            }
        }
        if walk.violations.len() == before {
            walk.queue(&self.refinements, value, path);
        }
        Ok(())
    }
}

impl ArrayNode {
    fn walk(&self, value: Option<&Value>, path: &FieldPath, walk: &mut Walk) -> FormworkResult<()> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            if self.required {
                walk.fail(path, Some(&self.messages), &required_failure());
            }
            return Ok(());
        };
        let Some(items) = value.as_array() else {
            walk.fail(
                path,
                Some(&self.messages),
                &Failure::invalid_type("array", value),
            );
            return Ok(());
        };
        if self.is_empty_items(items) {
            if self.required {
                walk.fail(path, Some(&self.messages), &required_failure());
            }
            return Ok(());
        }

        let before = walk.violations.len();
        if let Some(max) = self.max_items.filter(|max| items.len() > *max) {
            let failure =
                Failure::new(ViolationKind::Bound, MAX_ITEMS).with("maxLength", max.to_string());
            walk.fail(path, Some(&self.messages), &failure);
        }
        for (index, item) in items.iter().enumerate() {
            self.item.walk(Some(item), &path.index(index), walk)?;
        }
        if walk.violations.len() == before {
            walk.queue(&self.refinements, value, path);
        }
        Ok(())
    }
}

impl RecordNode {
    fn walk(&self, value: Option<&Value>, path: &FieldPath, walk: &mut Walk) -> FormworkResult<()> {
        if is_absent(value) {
            if self.required {
                walk.fail(path, self.messages.as_ref(), &required_failure());
            }
            return Ok(());
        }
        let Some(value) = value else {
            return Ok(());
        };
        let Some(members) = value.as_record() else {
            walk.fail(
                path,
                self.messages.as_ref(),
                &Failure::invalid_type("record", value),
            );
            return Ok(());
        };
        if self.skip_when_empty
            && !self.required
            && self
                .fields
                .iter()
                .all(|(key, field)| field.is_empty_value(members.get(key)))
        {
            return Ok(());
        }

        let before = walk.violations.len();
        for (key, field) in &self.fields {
            field.walk(members.get(key), &path.key(key.as_str()), walk)?;
        }
        if walk.violations.len() == before {
            walk.queue(&self.refinements, value, path);
        }
        Ok(())
    }
}

// ── Builders ───────────────────────────────────────────────────────────

/// Builds a scalar validator.
pub struct ScalarBuilder {
    messages: FieldMessages,
    required: bool,
    is_empty: EmptyPredicate,
    checks: Vec<Box<dyn Check>>,
    refinements: Vec<Arc<dyn Refinement>>,
}

impl ScalarBuilder {
    /// Starts a scalar validator with the kind's emptiness rule.
    pub fn new(messages: FieldMessages, is_empty: EmptyPredicate) -> Self {
        Self {
            messages,
            required: false,
            is_empty,
            checks: Vec::new(),
            refinements: Vec::new(),
        }
    }

    /// Sets whether the empty representation is rejected.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Adds a synchronous check.
    #[must_use]
    pub fn check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Adds a synchronous check if present.
    #[must_use]
    pub fn check_opt(self, check: Option<impl Check + 'static>) -> Self {
        match check {
            Some(check) => self.check(check),
            None => self,
        }
    }

    /// Adds an asynchronous refinement.
    #[must_use]
    pub fn refinement(mut self, refinement: Arc<dyn Refinement>) -> Self {
        self.refinements.push(refinement);
        self
    }

    /// Finishes the validator. Checks run in stage order, and in insertion
    /// order within a stage.
    pub fn build(mut self) -> Validator {
        self.checks.sort_by_key(|check| check.stage());
        Validator(Arc::new(Node::Scalar(ScalarNode {
            messages: self.messages,
            required: self.required,
            is_empty: self.is_empty,
            checks: self.checks,
            refinements: self.refinements,
        })))
    }
}

/// Builds an array validator around an item validator.
pub struct ArrayBuilder {
    item: Validator,
    messages: FieldMessages,
    required: bool,
    empty_when_items_empty: bool,
    max_items: Option<usize>,
    refinements: Vec<Arc<dyn Refinement>>,
}

impl ArrayBuilder {
    /// Starts an array-of(`item`) validator.
    pub const fn new(item: Validator, messages: FieldMessages) -> Self {
        Self {
            item,
            messages,
            required: false,
            empty_when_items_empty: false,
            max_items: None,
            refinements: Vec::new(),
        }
    }

    /// Sets whether an empty array is rejected.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Treats an array whose items are all empty like `[]`, skipping the
    /// items. Only an empty array counts as empty otherwise.
    #[must_use]
    pub const fn empty_when_items_empty(mut self, enabled: bool) -> Self {
        self.empty_when_items_empty = enabled;
        self
    }

    /// Sets the maximum number of items.
    #[must_use]
    pub const fn max_items(mut self, max_items: Option<usize>) -> Self {
        self.max_items = max_items;
        self
    }

    /// Adds an asynchronous whole-array refinement.
    #[must_use]
    pub fn refinement(mut self, refinement: Arc<dyn Refinement>) -> Self {
        self.refinements.push(refinement);
        self
    }

    /// Finishes the validator.
    pub fn build(self) -> Validator {
        Validator(Arc::new(Node::Array(ArrayNode {
            item: self.item,
            messages: self.messages,
            required: self.required,
            empty_when_items_empty: self.empty_when_items_empty,
            max_items: self.max_items,
            refinements: self.refinements,
        })))
    }
}

/// Builds a record validator over named member validators.
#[derive(Default)]
pub struct RecordBuilder {
    fields: Vec<(String, Validator)>,
    messages: Option<FieldMessages>,
    required: bool,
    skip_when_empty: bool,
    refinements: Vec<Arc<dyn Refinement>>,
}

impl RecordBuilder {
    /// Starts a record validator over `(key, validator)` members.
    pub fn new(fields: impl IntoIterator<Item = (String, Validator)>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Sets the messages used for record-level failures.
    #[must_use]
    pub fn messages(mut self, messages: FieldMessages) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Sets whether an absent record is rejected.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Accepts an all-empty record without validating its members, unless
    /// the record is required.
    #[must_use]
    pub const fn skip_when_empty(mut self, skip: bool) -> Self {
        self.skip_when_empty = skip;
        self
    }

    /// Adds an asynchronous whole-record refinement.
    #[must_use]
    pub fn refinement(mut self, refinement: Arc<dyn Refinement>) -> Self {
        self.refinements.push(refinement);
        self
    }

    /// Finishes the validator.
    pub fn build(self) -> Validator {
        Validator(Arc::new(Node::Record(RecordNode {
            fields: self.fields,
            messages: self.messages,
            required: self.required,
            skip_when_empty: self.skip_when_empty,
            refinements: self.refinements,
        })))
    }
}

// ── Debug ──────────────────────────────────────────────────────────────

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_ref() {
            Node::Scalar(node) => f
                .debug_struct("Scalar")
                .field("label", &node.messages.label())
                .field("required", &node.required)
                .field("checks", &node.checks)
                .field("refinements", &node.refinements.len())
                .finish(),
            Node::Array(node) => f
                .debug_struct("Array")
                .field("item", &node.item)
                .field("required", &node.required)
                .field("max_items", &node.max_items)
                .field("refinements", &node.refinements.len())
                .finish(),
            Node::Record(node) => f
                .debug_struct("Record")
                .field("fields", &node.fields)
                .field("required", &node.required)
                .field("refinements", &node.refinements.len())
                .finish(),
            Node::AllOf(validators) => f.debug_tuple("AllOf").field(validators).finish(),
        }
    }
}
