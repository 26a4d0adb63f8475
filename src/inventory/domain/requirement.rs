use super::PackageName;
use serde::Serialize;

/// Version constraint attached to a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "spec")]
pub enum VersionConstraint {
    /// No constraint was declared, or the record shape cannot carry one.
    Unconstrained,
    /// Constraint text as declared, e.g. `>=2.0,<3`.
    Spec(String),
}

/// One requirement declared by an installed package.
///
/// The qualifier (environment marker or `extra` clause) is kept verbatim and never
/// evaluated: every requirement counts as applicable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    name: String,
    constraint: VersionConstraint,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extras: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    qualifier: Option<String>,
}

impl Requirement {
    pub fn new(
        name: String,
        constraint: VersionConstraint,
        extras: Vec<String>,
        qualifier: Option<String>,
    ) -> Self {
        Self {
            name,
            constraint,
            extras,
            qualifier,
        }
    }

    /// A Shape B requirement: a bare name with no constraint.
    pub fn unconstrained(name: String, qualifier: Option<String>) -> Self {
        Self::new(name, VersionConstraint::Unconstrained, Vec::new(), qualifier)
    }

    /// Name as declared by the requiring package.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn normalized_name(&self) -> String {
        PackageName::normalize(&self.name)
    }

    pub fn constraint(&self) -> &VersionConstraint {
        &self.constraint
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Placeholder for marker evaluation. Markers are recorded, never evaluated.
    pub fn is_applicable(&self) -> bool {
        true
    }
}
