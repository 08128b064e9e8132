//! Evaluation categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An evaluation dimension along which tools are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Complexity,
    Security,
    Deployment,
    Performance,
    Cost,
}

impl Category {
    /// All categories in their default report order.
    pub const ALL: [Category; 5] = [
        Category::Complexity,
        Category::Security,
        Category::Deployment,
        Category::Performance,
        Category::Cost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Complexity => "complexity",
            Category::Security => "security",
            Category::Deployment => "deployment",
            Category::Performance => "performance",
            Category::Cost => "cost",
        }
    }

    /// Capitalized name used in rendered reports.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Complexity => "Complexity",
            Category::Security => "Security",
            Category::Deployment => "Deployment",
            Category::Performance => "Performance",
            Category::Cost => "Cost",
        }
    }

    /// File name of a tool's metric report inside `{category_dir}/{tool}/`.
    pub fn report_file_name(&self, tool: &str) -> String {
        match self {
            Category::Complexity => format!("{}_report.json", tool),
            Category::Security => format!("{}_security_report.json", tool),
            Category::Deployment => "deployment_report.json".to_string(),
            Category::Performance => "performance_report.json".to_string(),
            Category::Cost => "cost_report.json".to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "complexity" => Ok(Category::Complexity),
            "security" => Ok(Category::Security),
            "deployment" => Ok(Category::Deployment),
            "performance" => Ok(Category::Performance),
            "cost" => Ok(Category::Cost),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}
