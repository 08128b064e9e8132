//! The IaC tools under comparison.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// An Infrastructure-as-Code tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IacTool {
    Terraform,
    #[serde(rename = "opentofu")]
    OpenTofu,
    #[serde(rename = "cloudformation")]
    CloudFormation,
}

impl IacTool {
    pub const ALL: [IacTool; 3] = [IacTool::Terraform, IacTool::CloudFormation, IacTool::OpenTofu];

    pub fn as_str(&self) -> &'static str {
        match self {
            IacTool::Terraform => "terraform",
            IacTool::OpenTofu => "opentofu",
            IacTool::CloudFormation => "cloudformation",
        }
    }

    /// Terraform and OpenTofu share the HCL language and tooling ecosystem.
    pub fn is_hcl(&self) -> bool {
        matches!(self, IacTool::Terraform | IacTool::OpenTofu)
    }
}

impl fmt::Display for IacTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IacTool {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "terraform" => Ok(IacTool::Terraform),
            "opentofu" | "tofu" => Ok(IacTool::OpenTofu),
            "cloudformation" | "cfn" => Ok(IacTool::CloudFormation),
            other => Err(AnalysisError::UnsupportedTool(other.to_string())),
        }
    }
}
