use serde::Serialize;

use crate::lib::error::{ReportError, Result};
use crate::lib::quantity::Quantity;

/// Group/version/kind identity of a Kubernetes object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Builds the identity from an `apiVersion` (`group/version` or `version`) and a kind.
    pub fn from_api_version(api_version: &str, kind: &str) -> Result<Self> {
        match api_version.split('/').collect::<Vec<_>>().as_slice() {
            [""] => Ok(Self::new("", "", kind)),
            [version] => Ok(Self::new("", version, kind)),
            [group, version] if !group.is_empty() && !version.is_empty() => {
                Ok(Self::new(group, version, kind))
            }
            _ => Err(ReportError::InvalidInput(format!(
                "unexpected apiVersion {api_version:?}"
            ))),
        }
    }

    /// `kind` for the core group, `kind.group` otherwise.
    pub fn group_kind(&self) -> String {
        if self.group.is_empty() {
            self.kind.clone()
        } else {
            format!("{}.{}", self.kind, self.group)
        }
    }
}

/// CPU and memory amounts, either of which may be unset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourcePair {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Quantity>,
}

impl ResourcePair {
    pub fn new(cpu: Option<Quantity>, memory: Option<Quantity>) -> Self {
        Self { cpu, memory }
    }
}

/// One workload recommendation, with optional per-container children
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub name: String,
    pub namespace: String,
    pub kind: GroupVersionKind,
    pub mode: String,
    pub target_name: String,
    pub target_kind: GroupVersionKind,
    pub requests: ResourcePair,
    pub recommendations: ResourcePair,
    pub cpu_difference: Option<f64>,
    pub memory_difference: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Row>,
}

impl Row {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            ..Default::default()
        }
    }

    pub fn with_target(mut self, name: &str, kind: GroupVersionKind) -> Self {
        self.target_name = name.to_string();
        self.target_kind = kind;
        self
    }

    pub fn with_requests(mut self, requests: ResourcePair) -> Self {
        self.requests = requests;
        self
    }

    pub fn with_recommendations(mut self, recommendations: ResourcePair) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn with_differences(mut self, cpu: Option<f64>, memory: Option<f64>) -> Self {
        self.cpu_difference = cpu;
        self.memory_difference = memory;
        self
    }

    pub fn with_child(mut self, child: Row) -> Self {
        self.children.push(child);
        self
    }
}
