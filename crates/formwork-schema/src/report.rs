//! Violations and validation reports.
//!
//! Invalid submission data is never an error in the `Result` sense: each
//! problem becomes a [`Violation`] addressed to the offending field key (and
//! array index, if any), and a [`ValidationReport`] collects them in
//! evaluation order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// One step in a path into the value tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A record member.
    Key(String),
    /// An array element.
    Index(usize),
}

/// A path from the validated root to a value, e.g. `children[1].bsn`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path, addressing the validated value itself.
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns this path extended by a record key.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Returns this path extended by an array index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Returns this path followed by `relative`.
    #[must_use]
    pub fn join(&self, relative: &Self) -> Self {
        let mut segments = self.0.clone();
        segments.extend(relative.0.iter().cloned());
        Self(segments)
    }

    /// The path segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The taxonomy of validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The value is not representable in the field's kind at all.
    Shape,
    /// The value has the right type but the wrong structure.
    Format,
    /// The value is outside a declared bound.
    Bound,
    /// The value is empty while the field is required.
    Required,
    /// The value conflicts with a sibling item in the same collection.
    CrossItem,
    /// A remote validation plugin rejected the value.
    Remote,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shape => "shape",
            Self::Format => "format",
            Self::Bound => "bound",
            Self::Required => "required",
            Self::CrossItem => "cross_item",
            Self::Remote => "remote",
        };
        f.write_str(name)
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Where in the value tree the failure applies.
    pub path: FieldPath,
    /// What kind of failure this is.
    pub kind: ViolationKind,
    /// The constraint code, e.g. `required`, `min`, `pattern`.
    pub code: String,
    /// The resolved, human-readable message.
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(
        path: FieldPath,
        kind: ViolationKind,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path,
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns this violation re-rooted under `prefix`.
    #[must_use]
    pub fn under(mut self, prefix: &FieldPath) -> Self {
        self.path = prefix.join(&self.path);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// The outcome of validating a value: every violation, in evaluation order.
///
/// # Examples
///
/// ```
/// use formwork_schema::report::{FieldPath, ValidationReport, Violation, ViolationKind};
///
/// let mut report = ValidationReport::default();
/// assert!(report.is_valid());
///
/// report.push(Violation::new(
///     FieldPath::root().key("email"),
///     ViolationKind::Format,
///     "invalidEmail",
///     "Invalid email address.",
/// ));
/// assert!(!report.is_valid());
/// assert_eq!(report.messages_at("email"), vec!["Invalid email address."]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// Creates a report from a list of violations.
    pub const fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns `true` if there are no violations.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violations in evaluation order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes the report, returning its violations.
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Appends a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Appends every violation of `other`.
    pub fn merge(&mut self, other: Self) {
        self.violations.extend(other.violations);
    }

    /// The number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations whose path renders exactly as `path`.
    pub fn at(&self, path: &str) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.path.to_string() == path)
            .collect()
    }

    /// Messages of the violations at `path`.
    pub fn messages_at(&self, path: &str) -> Vec<&str> {
        self.at(path).into_iter().map(|v| v.message.as_str()).collect()
    }

    /// Groups messages by rendered path, for display next to fields.
    pub fn errors_by_path(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for violation in &self.violations {
            grouped
                .entry(violation.path.to_string())
                .or_default()
                .push(violation.message.clone());
        }
        grouped
    }
}

impl From<Vec<Violation>> for ValidationReport {
    fn from(violations: Vec<Violation>) -> Self {
        Self::new(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(path: FieldPath, code: &str) -> Violation {
        Violation::new(path, ViolationKind::Bound, code, format!("{code} failed"))
    }

    #[test]
    fn test_path_display() {
        let path = FieldPath::root().key("children").index(1).key("bsn");
        assert_eq!(path.to_string(), "children[1].bsn");
        assert_eq!(FieldPath::root().index(0).to_string(), "[0]");
        assert_eq!(FieldPath::root().to_string(), "");
    }

    #[test]
    fn test_join_and_under() {
        let relative = FieldPath::root().index(2).key("bsn");
        let v = violation(relative, "unique").under(&FieldPath::root().key("kids"));
        assert_eq!(v.path.to_string(), "kids[2].bsn");
    }

    #[test]
    fn test_errors_by_path_keeps_order_within_path() {
        let mut report = ValidationReport::default();
        report.push(violation(FieldPath::root().key("b"), "min"));
        report.push(violation(FieldPath::root().key("a"), "max"));
        report.push(violation(FieldPath::root().key("b"), "pattern"));

        let grouped = report.errors_by_path();
        assert_eq!(grouped["b"], vec!["min failed", "pattern failed"]);
        assert_eq!(grouped["a"], vec!["max failed"]);
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn test_merge() {
        let mut a = ValidationReport::from(vec![violation(FieldPath::root(), "x")]);
        let b = ValidationReport::from(vec![violation(FieldPath::root(), "y")]);
        a.merge(b);
        let codes: Vec<&str> = a.violations().iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec!["x", "y"]);
    }

    #[test]
    fn test_violation_display() {
        let v = violation(FieldPath::root().key("n"), "min");
        assert_eq!(v.to_string(), "n: min failed");
        assert_eq!(violation(FieldPath::root(), "min").to_string(), "min failed");
    }

    #[test]
    fn test_serialize() {
        let v = Violation::new(
            FieldPath::root().key("a").index(0),
            ViolationKind::CrossItem,
            "unique",
            "dup",
        );
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["path"], "a[0]");
        assert_eq!(json["kind"], "cross_item");
    }
}
