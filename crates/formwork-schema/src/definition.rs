//! Component definitions.
//!
//! A form is described as a tree of [`ComponentDefinition`]s, deserialized
//! from the JSON the form builder produces. Each variant is one component
//! kind; the `"type"` member selects it. Attributes every value-carrying kind
//! shares live in [`ComponentBase`] and are flattened into the variant.
//!
//! ```
//! use formwork_schema::definition::{ComponentDefinition, ComponentKind};
//!
//! let component: ComponentDefinition = serde_json::from_value(serde_json::json!({
//!     "type": "currency",
//!     "key": "amount",
//!     "label": "Amount",
//!     "currency": "EUR",
//!     "validate": {"min": 10, "max": null}
//! }))
//! .unwrap();
//! assert_eq!(component.kind(), ComponentKind::Currency);
//! assert_eq!(component.key(), "amount");
//! ```
//!
//! Definitions are read-only to the engine: builders borrow them and never
//! mutate them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use formwork_core::{FormworkError, FormworkResult};
use serde::{Deserialize, Serialize};

/// Constraints declared under a component's `validate` member.
///
/// Which of these a kind honours is up to its schema builder; unsupported
/// constraints are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidateRules {
    /// Whether an empty value is rejected.
    pub required: bool,
    /// Lower numeric bound (inclusive).
    pub min: Option<f64>,
    /// Upper numeric bound (inclusive).
    pub max: Option<f64>,
    /// Regular expression the whole value must match.
    pub pattern: Option<String>,
    /// Minimum length in characters.
    pub min_length: Option<usize>,
    /// Maximum length in characters (or items, for repeating groups).
    pub max_length: Option<usize>,
    /// Minimum number of checked options.
    pub min_selected_count: Option<usize>,
    /// Maximum number of checked options.
    pub max_selected_count: Option<usize>,
    /// Earliest allowed time of day (`HH:MM[:SS]`).
    pub min_time: Option<String>,
    /// Latest allowed time of day (`HH:MM[:SS]`).
    pub max_time: Option<String>,
    /// Names of remote validation plugins to consult.
    pub plugins: Vec<String>,
    /// Key of the item sub-field that must be unique across a repeating group.
    pub unique_key: Option<String>,
}

impl ValidateRules {
    /// The declared pattern, treating an empty string as absent.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref().filter(|p| !p.is_empty())
    }
}

/// Attributes shared by every value-carrying component kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentBase {
    /// The key the component's value is stored under.
    pub key: String,
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
    /// Optional description shown below the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional tooltip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// Declared constraints.
    #[serde(default)]
    pub validate: ValidateRules,
    /// Message overrides keyed by constraint code.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub errors: HashMap<String, String>,
    /// Whether the value is an array of the scalar kind.
    #[serde(default)]
    pub multiple: bool,
}

impl ComponentBase {
    /// Creates a base with the given key, labelled with the key itself.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            ..Self::default()
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets whether the component is required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.validate.required = required;
        self
    }

    /// Sets the pattern constraint.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.validate.pattern = Some(pattern.into());
        self
    }

    /// Sets the maximum length constraint.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.validate.max_length = Some(max_length);
        self
    }

    /// Sets a custom error message for a given constraint code.
    #[must_use]
    pub fn error_message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.errors.insert(code.into(), msg.into());
        self
    }

    /// Sets whether the value is an array of the scalar kind.
    #[must_use]
    pub const fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// The label, or the key when no label is set.
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

/// A component without kind-specific attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleDefinition {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: ComponentBase,
}

/// A number or currency component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberDefinition {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: ComponentBase,
    /// ISO 4217 currency code, for currency components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Maximum number of fraction digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_limit: Option<u32>,
}

/// Date bounds of a date or date-time component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatePicker {
    /// Earliest allowed value.
    pub min_date: Option<String>,
    /// Latest allowed value.
    pub max_date: Option<String>,
}

/// A date or date-time component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateDefinition {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: ComponentBase,
    /// Bounds.
    #[serde(default)]
    pub date_picker: DatePicker,
}

/// One option of an enumerated component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// The submitted value.
    pub value: String,
    /// The displayed label.
    #[serde(default)]
    pub label: String,
}

/// The `data` member of a select component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceData {
    /// The options.
    #[serde(default)]
    pub values: Option<Vec<ChoiceOption>>,
}

/// A select, radio or selectboxes component.
///
/// Radio and selectboxes components list their options under `values`;
/// select components under `data.values`. Either is accepted for every
/// enumerated kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceDefinition {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: ComponentBase,
    /// Options (radio/selectboxes layout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ChoiceOption>>,
    /// Options (select layout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ChoiceData>,
}

impl ChoiceDefinition {
    /// The live option list, or `None` when the definition carries none.
    pub fn options(&self) -> Option<&[ChoiceOption]> {
        self.values
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|d| d.values.as_deref()))
    }
}

/// A repeating group: an array of records shaped by nested components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditGridDefinition {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: ComponentBase,
    /// The per-item components.
    #[serde(default)]
    pub components: Vec<ComponentDefinition>,
}

/// A collection of child records with fixed sub-fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenDefinition {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: ComponentBase,
    /// Whether items carry a `selected` checkbox.
    #[serde(default)]
    pub enable_selection: bool,
}

/// A fieldset: a layout container whose children store values directly in
/// the enclosing record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDefinition {
    /// Shared attributes. Only `key` and `label` are meaningful.
    #[serde(flatten)]
    pub base: ComponentBase,
    /// Nested components.
    #[serde(default)]
    pub components: Vec<ComponentDefinition>,
}

/// One column of a columns component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Nested components.
    #[serde(default)]
    pub components: Vec<ComponentDefinition>,
}

/// A columns layout container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnsDefinition {
    /// Shared attributes. Only `key` is meaningful.
    #[serde(flatten)]
    pub base: ComponentBase,
    /// The columns.
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
}

/// A decorative component that never holds a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorativeDefinition {
    /// The component key.
    #[serde(default)]
    pub key: String,
    /// Rendered markup, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// A component definition, tagged by its `"type"` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ComponentDefinition {
    /// Single-line text.
    Textfield(SimpleDefinition),
    /// Multi-line text.
    Textarea(SimpleDefinition),
    /// Email address.
    Email(SimpleDefinition),
    /// Phone number.
    PhoneNumber(SimpleDefinition),
    /// Dutch postcode.
    Postcode(SimpleDefinition),
    /// Dutch license plate.
    Licenseplate(SimpleDefinition),
    /// Dutch citizen service number.
    Bsn(SimpleDefinition),
    /// International bank account number.
    Iban(SimpleDefinition),
    /// Number.
    Number(NumberDefinition),
    /// Currency amount.
    Currency(NumberDefinition),
    /// Calendar date.
    Date(DateDefinition),
    /// Date and time.
    Datetime(DateDefinition),
    /// Time of day.
    Time(SimpleDefinition),
    /// Single choice from a dropdown.
    Select(ChoiceDefinition),
    /// Single choice from radio buttons.
    Radio(ChoiceDefinition),
    /// Multiple choice from a checkbox group.
    Selectboxes(ChoiceDefinition),
    /// A single checkbox.
    Checkbox(SimpleDefinition),
    /// Drawn signature, submitted as an image data URL.
    Signature(SimpleDefinition),
    /// Repeating group.
    Editgrid(EditGridDefinition),
    /// Dutch address record.
    #[serde(rename = "addressNL")]
    AddressNl(SimpleDefinition),
    /// Children collection.
    Children(ChildrenDefinition),
    /// Fieldset layout container.
    Fieldset(LayoutDefinition),
    /// Columns layout container.
    Columns(ColumnsDefinition),
    /// Static content.
    Content(DecorativeDefinition),
    /// Summary of soft-required fields.
    SoftRequiredErrors(DecorativeDefinition),
}

impl ComponentDefinition {
    /// The kind tag of this definition.
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Textfield(_) => ComponentKind::Textfield,
            Self::Textarea(_) => ComponentKind::Textarea,
            Self::Email(_) => ComponentKind::Email,
            Self::PhoneNumber(_) => ComponentKind::PhoneNumber,
            Self::Postcode(_) => ComponentKind::Postcode,
            Self::Licenseplate(_) => ComponentKind::Licenseplate,
            Self::Bsn(_) => ComponentKind::Bsn,
            Self::Iban(_) => ComponentKind::Iban,
            Self::Number(_) => ComponentKind::Number,
            Self::Currency(_) => ComponentKind::Currency,
            Self::Date(_) => ComponentKind::Date,
            Self::Datetime(_) => ComponentKind::Datetime,
            Self::Time(_) => ComponentKind::Time,
            Self::Select(_) => ComponentKind::Select,
            Self::Radio(_) => ComponentKind::Radio,
            Self::Selectboxes(_) => ComponentKind::Selectboxes,
            Self::Checkbox(_) => ComponentKind::Checkbox,
            Self::Signature(_) => ComponentKind::Signature,
            Self::Editgrid(_) => ComponentKind::Editgrid,
            Self::AddressNl(_) => ComponentKind::AddressNl,
            Self::Children(_) => ComponentKind::Children,
            Self::Fieldset(_) => ComponentKind::Fieldset,
            Self::Columns(_) => ComponentKind::Columns,
            Self::Content(_) => ComponentKind::Content,
            Self::SoftRequiredErrors(_) => ComponentKind::SoftRequiredErrors,
        }
    }

    /// The shared attributes, or `None` for decorative kinds.
    pub const fn base(&self) -> Option<&ComponentBase> {
        match self {
            Self::Textfield(d)
            | Self::Textarea(d)
            | Self::Email(d)
            | Self::PhoneNumber(d)
            | Self::Postcode(d)
            | Self::Licenseplate(d)
            | Self::Bsn(d)
            | Self::Iban(d)
            | Self::Time(d)
            | Self::Checkbox(d)
            | Self::Signature(d)
            | Self::AddressNl(d) => Some(&d.base),
            Self::Number(d) | Self::Currency(d) => Some(&d.base),
            Self::Date(d) | Self::Datetime(d) => Some(&d.base),
            Self::Select(d) | Self::Radio(d) | Self::Selectboxes(d) => Some(&d.base),
            Self::Editgrid(d) => Some(&d.base),
            Self::Children(d) => Some(&d.base),
            Self::Fieldset(d) => Some(&d.base),
            Self::Columns(d) => Some(&d.base),
            Self::Content(_) | Self::SoftRequiredErrors(_) => None,
        }
    }

    /// The component key.
    pub fn key(&self) -> &str {
        match self {
            Self::Content(d) | Self::SoftRequiredErrors(d) => &d.key,
            _ => self.base().map_or("", |base| base.key.as_str()),
        }
    }

    /// Components nested directly inside this one.
    pub fn nested(&self) -> Vec<&Self> {
        match self {
            Self::Editgrid(d) => d.components.iter().collect(),
            Self::Fieldset(d) => d.components.iter().collect(),
            Self::Columns(d) => d
                .columns
                .iter()
                .flat_map(|column| column.components.iter())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Shorthand for a textfield definition.
    pub const fn textfield(base: ComponentBase) -> Self {
        Self::Textfield(SimpleDefinition { base })
    }
}

/// The kind tag of a component, used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    /// `textfield`
    Textfield,
    /// `textarea`
    Textarea,
    /// `email`
    Email,
    /// `phoneNumber`
    PhoneNumber,
    /// `postcode`
    Postcode,
    /// `licenseplate`
    Licenseplate,
    /// `bsn`
    Bsn,
    /// `iban`
    Iban,
    /// `number`
    Number,
    /// `currency`
    Currency,
    /// `date`
    Date,
    /// `datetime`
    Datetime,
    /// `time`
    Time,
    /// `select`
    Select,
    /// `radio`
    Radio,
    /// `selectboxes`
    Selectboxes,
    /// `checkbox`
    Checkbox,
    /// `signature`
    Signature,
    /// `editgrid`
    Editgrid,
    /// `addressNL`
    #[serde(rename = "addressNL")]
    AddressNl,
    /// `children`
    Children,
    /// `fieldset`
    Fieldset,
    /// `columns`
    Columns,
    /// `content`
    Content,
    /// `softRequiredErrors`
    SoftRequiredErrors,
}

impl ComponentKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 25] = [
        Self::Textfield,
        Self::Textarea,
        Self::Email,
        Self::PhoneNumber,
        Self::Postcode,
        Self::Licenseplate,
        Self::Bsn,
        Self::Iban,
        Self::Number,
        Self::Currency,
        Self::Date,
        Self::Datetime,
        Self::Time,
        Self::Select,
        Self::Radio,
        Self::Selectboxes,
        Self::Checkbox,
        Self::Signature,
        Self::Editgrid,
        Self::AddressNl,
        Self::Children,
        Self::Fieldset,
        Self::Columns,
        Self::Content,
        Self::SoftRequiredErrors,
    ];

    /// The `"type"` tag as it appears in form definitions.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Textfield => "textfield",
            Self::Textarea => "textarea",
            Self::Email => "email",
            Self::PhoneNumber => "phoneNumber",
            Self::Postcode => "postcode",
            Self::Licenseplate => "licenseplate",
            Self::Bsn => "bsn",
            Self::Iban => "iban",
            Self::Number => "number",
            Self::Currency => "currency",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Time => "time",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Selectboxes => "selectboxes",
            Self::Checkbox => "checkbox",
            Self::Signature => "signature",
            Self::Editgrid => "editgrid",
            Self::AddressNl => "addressNL",
            Self::Children => "children",
            Self::Fieldset => "fieldset",
            Self::Columns => "columns",
            Self::Content => "content",
            Self::SoftRequiredErrors => "softRequiredErrors",
        }
    }

    /// Decorative kinds never hold a value and have no schema builder.
    pub const fn is_decorative(self) -> bool {
        matches!(self, Self::Content | Self::SoftRequiredErrors)
    }

    /// Layout kinds contribute their children's keys, not their own.
    pub const fn is_layout(self) -> bool {
        matches!(self, Self::Fieldset | Self::Columns)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = FormworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FormworkError::UnregisteredKind(s.to_string()))
    }
}

/// Parses a list of component definitions from JSON text.
///
/// Accepts either a bare array or an object with a `components` array (the
/// shape form builders export).
///
/// # Errors
///
/// Returns a `SerializationError` if the JSON is malformed or a component
/// has an unknown `type`.
pub fn parse_components(json: &str) -> FormworkResult<Vec<ComponentDefinition>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Document {
        Bare(Vec<ComponentDefinition>),
        Form { components: Vec<ComponentDefinition> },
    }

    let document: Document = serde_json::from_str(json).map_err(|e| {
        FormworkError::SerializationError(format!("Invalid form definition: {e}"))
    })?;
    Ok(match document {
        Document::Bare(components) | Document::Form { components } => components,
    })
}
