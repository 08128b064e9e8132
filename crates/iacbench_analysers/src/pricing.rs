//! CloudFormation cost estimation with memoized price lookups.
//!
//! Hourly rates come from a [`PriceSource`]. The estimator owns a
//! [`PricingCache`] in front of it so that each `(service, sku)` pair is
//! looked up at most once per estimator. Entries are never evicted.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use iacbench_core::round2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::error::{AnalysisError, AnalysisResult};

/// Hours in a billing month.
pub const HOURS_PER_MONTH: f64 = 730.0;
/// Hourly rate used when a source has no price for a SKU.
pub const DEFAULT_HOURLY_RATE: f64 = 0.05;

const DEFAULT_INSTANCE_TYPE: &str = "t2.micro";
const DEFAULT_DB_INSTANCE_CLASS: &str = "db.t3.micro";
const DEFAULT_DB_ENGINE: &str = "mysql";
const S3_STANDARD_GB_MONTH: f64 = 0.023;
const S3_ESTIMATED_SIZE_GB: u64 = 100;

/// Priced AWS service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricedService {
    Ec2,
    Rds,
}

impl fmt::Display for PricedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricedService::Ec2 => f.write_str("AmazonEC2"),
            PricedService::Rds => f.write_str("AmazonRDS"),
        }
    }
}

/// Source of on-demand hourly rates.
pub trait PriceSource {
    /// Hourly USD rate of `sku` (instance type or DB class), if known.
    fn hourly_rate(&self, service: PricedService, sku: &str) -> Option<f64>;
}

/// Built-in US East on-demand rates.
#[derive(Debug, Clone)]
pub struct StaticPriceTable {
    rates: HashMap<(PricedService, String), f64>,
}

impl StaticPriceTable {
    pub fn new() -> Self {
        let mut table = Self {
            rates: HashMap::new(),
        };
        for (sku, rate) in [
            ("t2.micro", 0.0116),
            ("t2.small", 0.023),
            ("t2.medium", 0.0464),
            ("m5.large", 0.096),
        ] {
            table.insert(PricedService::Ec2, sku, rate);
        }
        for (sku, rate) in [
            ("db.t3.micro", 0.017),
            ("db.t3.small", 0.034),
            ("db.t3.medium", 0.068),
        ] {
            table.insert(PricedService::Rds, sku, rate);
        }
        table
    }

    /// Add or replace a rate.
    pub fn insert(&mut self, service: PricedService, sku: &str, hourly_rate: f64) {
        self.rates.insert((service, sku.to_string()), hourly_rate);
    }
}

impl Default for StaticPriceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for StaticPriceTable {
    fn hourly_rate(&self, service: PricedService, sku: &str) -> Option<f64> {
        self.rates.get(&(service, sku.to_string())).copied()
    }
}

/// Memoizing wrapper around a [`PriceSource`].
pub struct PricingCache<S> {
    source: S,
    entries: HashMap<(PricedService, String), f64>,
    lookups: usize,
}

impl<S: PriceSource> PricingCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: HashMap::new(),
            lookups: 0,
        }
    }

    /// Hourly rate for `sku`, falling back to [`DEFAULT_HOURLY_RATE`].
    pub fn hourly_rate(&mut self, service: PricedService, sku: &str) -> f64 {
        let key = (service, sku.to_string());
        if let Some(rate) = self.entries.get(&key) {
            return *rate;
        }

        self.lookups += 1;
        let rate = self.source.hourly_rate(service, sku).unwrap_or_else(|| {
            debug!("No {} price for {}, using default rate", service, sku);
            DEFAULT_HOURLY_RATE
        });
        self.entries.insert(key, rate);
        rate
    }

    /// Number of lookups that reached the underlying source.
    pub fn source_lookups(&self) -> usize {
        self.lookups
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Estimated cost of one template resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceCost {
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub monthly_cost: f64,
    #[serde(default)]
    pub pricing_factors: Map<String, Value>,
}

/// Cost estimate of a whole template, as written to `cost_analysis.json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostAnalysis {
    #[serde(default)]
    pub resources: IndexMap<String, ResourceCost>,
    #[serde(default)]
    pub monthly_cost_estimate: f64,
    #[serde(default)]
    pub resource_breakdown: IndexMap<String, f64>,
}

/// Estimates monthly template cost from a cached price source.
pub struct CloudFormationCostEstimator<S> {
    cache: PricingCache<S>,
}

impl<S: PriceSource> CloudFormationCostEstimator<S> {
    pub fn new(source: S) -> Self {
        Self {
            cache: PricingCache::new(source),
        }
    }

    pub fn cache(&self) -> &PricingCache<S> {
        &self.cache
    }

    /// Load a template (YAML for `.yaml`/`.yml`, JSON otherwise) and
    /// estimate it. The template must exist.
    pub fn estimate_file(&mut self, template: &Path) -> AnalysisResult<CostAnalysis> {
        info!("Estimating CloudFormation costs of {:?}", template);
        let content = fs::read_to_string(template).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AnalysisError::MissingInput(template.to_path_buf())
            } else {
                AnalysisError::Read {
                    path: template.to_path_buf(),
                    source,
                }
            }
        })?;

        let invalid = |message: String| AnalysisError::InvalidInput {
            path: template.to_path_buf(),
            message,
        };
        let is_yaml = template
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e, "yaml" | "yml"));
        let document: Value = if is_yaml {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
            yaml_to_json(yaml)
        } else {
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?
        };

        let analysis = self.estimate_template(&document);
        info!(
            "Estimated monthly cost of {:?}: ${:.2}",
            template, analysis.monthly_cost_estimate
        );
        Ok(analysis)
    }

    /// Estimate every resource of a parsed template.
    ///
    /// Resource types without a pricing model are listed at zero cost.
    pub fn estimate_template(&mut self, template: &Value) -> CostAnalysis {
        let mut analysis = CostAnalysis::default();
        let Some(resources) = template.get("Resources").and_then(Value::as_object) else {
            return analysis;
        };

        for (resource_id, resource) in resources {
            let resource_type = resource
                .get("Type")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let empty = Map::new();
            let properties = resource
                .get("Properties")
                .and_then(Value::as_object)
                .unwrap_or(&empty);

            let cost = self.estimate_resource(resource_type, properties);
            analysis.monthly_cost_estimate += cost.monthly_cost;
            *analysis
                .resource_breakdown
                .entry(resource_category(resource_type).to_string())
                .or_insert(0.0) += cost.monthly_cost;
            analysis.resources.insert(resource_id.clone(), cost);
        }

        analysis.monthly_cost_estimate = round2(analysis.monthly_cost_estimate);
        analysis
    }

    /// Estimate one resource from its type and properties.
    pub fn estimate_resource(&mut self, resource_type: &str, properties: &Map<String, Value>) -> ResourceCost {
        let mut cost = ResourceCost {
            resource_type: resource_type.to_string(),
            ..Default::default()
        };

        match resource_type {
            "AWS::EC2::Instance" => {
                let instance_type = string_property(properties, "InstanceType", DEFAULT_INSTANCE_TYPE);
                let rate = self.cache.hourly_rate(PricedService::Ec2, instance_type);
                cost.pricing_factors
                    .insert("instance_type".into(), json!(instance_type));
                cost.monthly_cost = rate * HOURS_PER_MONTH;
            }
            "AWS::S3::Bucket" => {
                cost.pricing_factors
                    .insert("storage_class".into(), json!("Standard"));
                cost.pricing_factors
                    .insert("estimated_size_gb".into(), json!(S3_ESTIMATED_SIZE_GB));
                cost.monthly_cost = S3_STANDARD_GB_MONTH * S3_ESTIMATED_SIZE_GB as f64;
            }
            "AWS::RDS::DBInstance" => {
                let class = string_property(properties, "DBInstanceClass", DEFAULT_DB_INSTANCE_CLASS);
                let engine = string_property(properties, "Engine", DEFAULT_DB_ENGINE);
                let rate = self.cache.hourly_rate(PricedService::Rds, class);
                cost.pricing_factors
                    .insert("db_instance_class".into(), json!(class));
                cost.pricing_factors.insert("engine".into(), json!(engine));
                cost.monthly_cost = rate * HOURS_PER_MONTH;
            }
            other => debug!("No pricing model for {}", other),
        }

        cost
    }
}

/// Service segment of a CloudFormation type (`AWS::EC2::Instance` -> `EC2`).
pub fn resource_category(resource_type: &str) -> &str {
    resource_type.split("::").nth(1).unwrap_or(resource_type)
}

fn string_property<'a>(properties: &'a Map<String, Value>, key: &str, default: &'a str) -> &'a str {
    properties
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
}

/// Intrinsic-function tags (`!Ref`) are dropped, keeping the tagged value.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;
    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!(i)
            } else if let Some(u) = n.as_u64() {
                json!(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .filter_map(|(k, v)| match k {
                    Yaml::String(key) => Some((key, yaml_to_json(v))),
                    Yaml::Number(n) => Some((n.to_string(), yaml_to_json(v))),
                    Yaml::Bool(b) => Some((b.to_string(), yaml_to_json(v))),
                    _ => None,
                })
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}
