//! The comparison report aggregate and the pipeline that builds it.

use chrono::Local;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::category::Category;
use crate::config::{BenchConfig, InputLayout};
use crate::loader::load_tool_record;
use crate::ranking::{overall_ranking, rank_category, Ranking};
use crate::record::MetricRecord;
use crate::scorer::score_record;

/// Metric records of one tool, keyed by category.
pub type ToolResults = IndexMap<Category, MetricRecord>;

/// Everything produced by one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: String,
    pub tools_compared: Vec<String>,
    pub categories: Vec<Category>,
    /// Records that were actually loaded; missing or malformed inputs are absent.
    pub results: IndexMap<String, ToolResults>,
    pub rankings: IndexMap<Category, Ranking>,
    pub overall_ranking: Ranking,
}

impl Report {
    /// Load every configured tool/category record from `layout` and rank them.
    pub fn build(config: &BenchConfig, layout: &InputLayout) -> Self {
        info!(
            "Building comparison of {} tools across {} categories",
            config.tools.len(),
            config.categories.len()
        );

        let mut results: IndexMap<String, ToolResults> = IndexMap::new();
        for tool in &config.tools {
            let mut tool_results = ToolResults::new();
            for category in config.category_list() {
                if let Some(record) = load_tool_record(layout, category, tool).into_record() {
                    tool_results.insert(category, record);
                }
            }
            debug!("Loaded {} categories for {}", tool_results.len(), tool);
            results.insert(tool.clone(), tool_results);
        }

        Self::from_results(config, now_timestamp(), results)
    }

    /// Rank already-loaded records.
    ///
    /// Only tools with a record in a category are ranked in it. Records of
    /// tools outside `config.tools` are ignored.
    pub fn from_results(
        config: &BenchConfig,
        generated_at: impl Into<String>,
        mut results: IndexMap<String, ToolResults>,
    ) -> Self {
        let mut ordered: IndexMap<String, ToolResults> = IndexMap::new();
        for tool in &config.tools {
            ordered.insert(tool.clone(), results.swap_remove(tool).unwrap_or_default());
        }

        let mut rankings: IndexMap<Category, Ranking> = IndexMap::new();
        for spec in &config.categories {
            let scores: IndexMap<String, f64> = ordered
                .iter()
                .filter_map(|(tool, tool_results)| {
                    tool_results
                        .get(&spec.category)
                        .map(|record| (tool.clone(), score_record(record, &spec.score_key)))
                })
                .collect();
            rankings.insert(spec.category, rank_category(&scores));
        }

        let overall_ranking = overall_ranking(&rankings, config);

        Self {
            generated_at: generated_at.into(),
            tools_compared: config.tools.clone(),
            categories: config.category_list(),
            results: ordered,
            rankings,
            overall_ranking,
        }
    }

    /// The record of `tool` for `category`, if one was loaded.
    pub fn record(&self, tool: &str, category: Category) -> Option<&MetricRecord> {
        self.results.get(tool).and_then(|r| r.get(&category))
    }

    /// Category score of a tool; tools without data score `0.0`.
    pub fn score(&self, tool: &str, category: Category) -> f64 {
        self.rankings
            .get(&category)
            .and_then(|ranking| ranking.get(tool))
            .map(|entry| entry.score)
            .unwrap_or(0.0)
    }
}

/// Local time formatted as `YYYY-MM-DD HH:MM:SS`.
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
