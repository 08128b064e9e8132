//! Comparison configuration: tools, categories, weights and score paths.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::Category;
use crate::error::{BenchError, BenchResult};
use crate::path::ScorePath;

/// Tools compared when no configuration file overrides them.
pub const DEFAULT_TOOLS: [&str; 3] = ["terraform", "cloudformation", "opentofu"];

/// Weight and score location for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub category: Category,
    pub weight: f64,
    pub score_key: ScorePath,
}

impl CategorySpec {
    pub fn new(category: Category, weight: f64, score_key: impl Into<ScorePath>) -> Self {
        Self {
            category,
            weight,
            score_key: score_key.into(),
        }
    }
}

/// Full comparison configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    pub tools: Vec<String>,
    pub categories: Vec<CategorySpec>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            tools: DEFAULT_TOOLS.iter().map(|t| t.to_string()).collect(),
            categories: vec![
                CategorySpec::new(Category::Complexity, 0.15, "complexity_score"),
                CategorySpec::new(
                    Category::Security,
                    0.25,
                    "security_assessment.security_score",
                ),
                CategorySpec::new(Category::Deployment, 0.25, "overall.efficiency_score"),
                CategorySpec::new(Category::Performance, 0.2, "summary.performance_score"),
                CategorySpec::new(Category::Cost, 0.15, "cost_efficiency_score"),
            ],
        }
    }
}

impl BenchConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref();
        debug!("Loading comparison config from {:?}", path);

        let content = fs::read_to_string(path).map_err(|source| BenchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: BenchConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the tool list.
    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Categories in report order.
    pub fn category_list(&self) -> Vec<Category> {
        self.categories.iter().map(|c| c.category).collect()
    }

    pub fn spec(&self, category: Category) -> Option<&CategorySpec> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Weight of a category; unconfigured categories weigh nothing.
    pub fn weight(&self, category: Category) -> f64 {
        self.spec(category).map(|c| c.weight).unwrap_or(0.0)
    }

    /// Check the configuration invariants.
    pub fn validate(&self) -> BenchResult<()> {
        if self.tools.is_empty() {
            return Err(BenchError::InvalidConfig("no tools to compare".to_string()));
        }

        let mut seen_tools = HashSet::new();
        for tool in &self.tools {
            if tool.trim().is_empty() {
                return Err(BenchError::InvalidConfig("empty tool name".to_string()));
            }
            if !seen_tools.insert(tool.as_str()) {
                return Err(BenchError::InvalidConfig(format!("duplicate tool: {}", tool)));
            }
        }

        if self.categories.is_empty() {
            return Err(BenchError::InvalidConfig("no categories configured".to_string()));
        }

        let mut seen_categories = HashSet::new();
        for spec in &self.categories {
            if !seen_categories.insert(spec.category) {
                return Err(BenchError::InvalidConfig(format!(
                    "category {} configured more than once",
                    spec.category
                )));
            }
            if !spec.weight.is_finite() || spec.weight < 0.0 {
                return Err(BenchError::InvalidConfig(format!(
                    "weight for {} must be a non-negative number, got {}",
                    spec.category, spec.weight
                )));
            }
            if !spec.score_key.is_well_formed() {
                return Err(BenchError::InvalidConfig(format!(
                    "score key for {} is not a valid dotted path: '{}'",
                    spec.category, spec.score_key
                )));
            }
        }

        Ok(())
    }
}

/// Where each category's results live on disk.
#[derive(Debug, Clone, Default)]
pub struct InputLayout {
    dirs: Vec<(Category, PathBuf)>,
}

impl InputLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout with every category under `{root}/{category}`.
    pub fn under_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let mut layout = Self::new();
        for category in Category::ALL {
            layout = layout.with_dir(category, root.join(category.as_str()));
        }
        layout
    }

    /// Set (or replace) the results directory of a category.
    pub fn with_dir(mut self, category: Category, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        match self.dirs.iter_mut().find(|(c, _)| *c == category) {
            Some(entry) => entry.1 = dir,
            None => self.dirs.push((category, dir)),
        }
        self
    }

    pub fn dir(&self, category: Category) -> Option<&Path> {
        self.dirs
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, d)| d.as_path())
    }

    /// Expected metric file for a tool, `{dir}/{tool}/{file}`.
    pub fn record_path(&self, category: Category, tool: &str) -> Option<PathBuf> {
        self.dir(category)
            .map(|dir| dir.join(tool).join(category.report_file_name(tool)))
    }
}
