//! # iacbench_analysers
//!
//! Turns the raw output of benchmark collaborators into the canonical metric
//! records read by `iacbench_core`.
//!
//! Each analyser covers one category:
//! - **complexity**: resource and module counts from IaC sources
//! - **security**: Checkov pass rates
//! - **deployment**: wall time, resource usage and CloudTrail API calls
//! - **performance**: per-operation resource samples
//! - **cost**: Infracost or CloudFormation cost estimates
//!
//! [`pricing`] estimates CloudFormation template costs through a memoized
//! price lookup; its output feeds the CloudFormation branch of [`cost`].

pub mod complexity;
pub mod cost;
pub mod deployment;
pub mod error;
pub mod input;
pub mod output;
pub mod performance;
pub mod pricing;
pub mod security;
pub mod tool;

pub use complexity::{analyse_complexity, ComplexityReport};
pub use cost::{analyse_cost, CostReport};
pub use deployment::{analyse_deployment, DeploymentInputs, DeploymentReport};
pub use error::{AnalysisError, AnalysisResult};
pub use output::write_record;
pub use performance::{analyse_performance, PerformanceReport};
pub use pricing::{CloudFormationCostEstimator, CostAnalysis, PriceSource, PricingCache, StaticPriceTable};
pub use security::{analyse_security, SecurityReport};
pub use tool::IacTool;
