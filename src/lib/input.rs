//! Decoding of recommendation records from JSON or YAML documents.
//!
//! Records mirror the fields of a `VerticalPodAutoscaler`: an object
//! identity, a `targetRef`, and resource lists of current requests and
//! recommended targets. Missing percentage differences are derived here.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use bigdecimal::BigDecimal;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity as ResourceQuantity;
use log::{debug, info};
use num_traits::ToPrimitive;
use serde::Deserialize;

use crate::lib::error::Result;
use crate::lib::quantity::Quantity;
use crate::lib::row::{GroupVersionKind, ResourcePair, Row};
use crate::lib::table::Table;

const RESOURCE_CPU: &str = "cpu";
const RESOURCE_MEMORY: &str = "memory";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    List { items: Vec<RowRecord> },
    Records(Vec<RowRecord>),
}

/// A resource amount as written in a manifest; YAML allows bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResourceValue {
    Quantity(ResourceQuantity),
    Integer(i64),
    Float(f64),
}

impl ResourceValue {
    fn text(&self) -> String {
        match self {
            ResourceValue::Quantity(quantity) => quantity.0.clone(),
            ResourceValue::Integer(value) => value.to_string(),
            ResourceValue::Float(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TargetRef {
    api_version: String,
    kind: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RowRecord {
    name: String,
    #[serde(default)]
    namespace: String,
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    mode: String,
    #[serde(default)]
    target_ref: TargetRef,
    #[serde(default)]
    requests: BTreeMap<String, ResourceValue>,
    #[serde(default)]
    recommendations: BTreeMap<String, ResourceValue>,
    cpu_difference: Option<f64>,
    memory_difference: Option<f64>,
    #[serde(default)]
    children: Vec<RowRecord>,
}

impl RowRecord {
    fn into_row(self) -> Result<Row> {
        let requests = resource_pair(&self.requests)?;
        let recommendations = resource_pair(&self.recommendations)?;

        let cpu_difference = self.cpu_difference.or_else(|| {
            percentage_difference(requests.cpu.as_ref(), recommendations.cpu.as_ref())
        });
        let memory_difference = self.memory_difference.or_else(|| {
            percentage_difference(requests.memory.as_ref(), recommendations.memory.as_ref())
        });

        let children = self
            .children
            .into_iter()
            .map(RowRecord::into_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(Row {
            kind: GroupVersionKind::from_api_version(&self.api_version, &self.kind)?,
            target_kind: GroupVersionKind::from_api_version(
                &self.target_ref.api_version,
                &self.target_ref.kind,
            )?,
            name: self.name,
            namespace: self.namespace,
            mode: self.mode,
            target_name: self.target_ref.name,
            requests,
            recommendations,
            cpu_difference,
            memory_difference,
            children,
        })
    }
}

fn resource_pair(list: &BTreeMap<String, ResourceValue>) -> Result<ResourcePair> {
    let parse = |resource: &str| -> Result<Option<Quantity>> {
        match list.get(resource) {
            Some(value) => Ok(Some(value.text().parse()?)),
            None => Ok(None),
        }
    };
    Ok(ResourcePair::new(parse(RESOURCE_CPU)?, parse(RESOURCE_MEMORY)?))
}

/// Percentage change from `request` to `recommendation`.
///
/// Unset when either side is unset or nothing is requested.
pub fn percentage_difference(
    request: Option<&Quantity>,
    recommendation: Option<&Quantity>,
) -> Option<f64> {
    let (request, recommendation) = (request?, recommendation?);
    if request.is_zero() {
        return None;
    }
    let delta: BigDecimal = recommendation.as_decimal() - request.as_decimal();
    let ratio = delta.to_f64()? / request.as_decimal().to_f64()?;
    Some(ratio * 100.0)
}

/// Parses recommendation records from JSON or YAML text.
///
/// The document is either a list of records or an object with an `items` list.
pub fn parse_table(text: &str) -> Result<Table> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Ok(Table::default());
    }

    let document: Document = if trimmed.starts_with(['{', '[']) {
        debug!("Decoding input as JSON");
        serde_json::from_str(text)?
    } else {
        debug!("Decoding input as YAML");
        serde_yaml::from_str(text)?
    };
    let records = match document {
        Document::List { items } => items,
        Document::Records(records) => records,
    };

    let rows = records
        .into_iter()
        .map(RowRecord::into_row)
        .collect::<Result<Vec<_>>>()?;
    let table = Table::new(rows);
    info!(
        "Loaded {} recommendations with {} children",
        table.len(),
        table.children_count()
    );
    Ok(table)
}

/// Reads records from `path`, or from stdin when `path` is `None` or `-`.
pub fn load_table(path: Option<&Path>) -> Result<Table> {
    let text = match path {
        Some(path) if path != Path::new("-") => {
            debug!("Reading recommendations from {}", path.display());
            fs::read_to_string(path)?
        }
        _ => {
            debug!("Reading recommendations from stdin");
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    parse_table(&text)
}
