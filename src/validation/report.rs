//! Validation issues and the error report collected over one validation run

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Category of a recoverable validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    /// Required field missing or wrong container/value shape
    Structural,
    /// Value outside a closed enumeration (logicalType, status, ...)
    UnknownEnumValue,
    /// Sibling schema objects or properties share a name
    DuplicateName,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Structural => write!(f, "structural"),
            IssueKind::UnknownEnumValue => write!(f, "unknown enum value"),
            IssueKind::DuplicateName => write!(f, "duplicate name"),
        }
    }
}

/// One validation fault, located by a dotted/indexed path
/// such as `schema[0].properties[2].logicalType`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every issue found in a single validation pass, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("invalid data contract ({} issue(s)): {}", .issues.len(), summary(.issues))]
pub struct ErrorReport {
    issues: Vec<ValidationIssue>,
}

fn summary(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Paths of all issues, in discovery order
    pub fn paths(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.path.as_str()).collect()
    }

    /// Issues of one kind
    pub fn of_kind(&self, kind: IssueKind) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.kind == kind).collect()
    }

    /// Whether any issue points at exactly this path
    pub fn contains_path(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }
}

impl IntoIterator for ErrorReport {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}
