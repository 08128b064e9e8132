//! Static HTML rendering of a comparison report.

use std::fmt::Write;

use crate::category::Category;
use crate::emit::{capitalize, html_escape};
use crate::error::BenchResult;
use crate::findings::{key_findings, tool_strengths};
use crate::report::Report;

const STYLES: &str = r#"
body { font-family: Arial, sans-serif; line-height: 1.6; margin: 0; padding: 20px; color: #333; }
h1, h2, h3 { color: #2c3e50; }
.container { max-width: 1200px; margin: 0 auto; }
.summary { background-color: #f8f9fa; padding: 20px; border-radius: 5px; margin-bottom: 20px; }
.tool-ranking { display: flex; justify-content: space-between; margin-bottom: 20px; }
.tool-card { flex: 1; background-color: #fff; box-shadow: 0 2px 5px rgba(0,0,0,0.1); margin: 0 10px; padding: 15px; border-radius: 5px; }
.tool-card h3 { margin-top: 0; border-bottom: 1px solid #eee; padding-bottom: 10px; }
.metrics-table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
.metrics-table th, .metrics-table td { padding: 12px 15px; text-align: left; border-bottom: 1px solid #ddd; }
.metrics-table th { background-color: #f8f9fa; }
.empty { color: #777; font-style: italic; }
footer { margin-top: 50px; text-align: center; color: #777; border-top: 1px solid #eee; padding-top: 20px; }
"#;

/// Render the report as a self-contained HTML page.
pub fn render_html(report: &Report) -> BenchResult<String> {
    let mut out = String::new();
    HtmlWriter { out: &mut out, report }.write_page()?;
    Ok(out)
}

struct HtmlWriter<'a, W: Write> {
    out: &'a mut W,
    report: &'a Report,
}

impl<W: Write> HtmlWriter<'_, W> {
    fn write_page(&mut self) -> std::fmt::Result {
        writeln!(self.out, "<!DOCTYPE html>")?;
        writeln!(self.out, "<html lang=\"en\">")?;
        writeln!(self.out, "<head>")?;
        writeln!(self.out, "<meta charset=\"UTF-8\">")?;
        writeln!(
            self.out,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(self.out, "<title>IaC Tools Evaluation Report</title>")?;
        writeln!(self.out, "<style>{}</style>", STYLES)?;
        writeln!(self.out, "</head>")?;
        writeln!(self.out, "<body>")?;
        writeln!(self.out, "<div class=\"container\">")?;
        writeln!(
            self.out,
            "<h1>Infrastructure as Code (IaC) Tools Evaluation Report</h1>"
        )?;
        writeln!(
            self.out,
            "<p>Generated at: {}</p>",
            html_escape(&self.report.generated_at)
        )?;

        self.write_summary()?;

        writeln!(self.out, "<h2>Detailed Category Comparisons</h2>")?;
        for category in &self.report.categories {
            self.write_category_section(*category)?;
        }

        writeln!(self.out, "<footer><p>IaC Tools Evaluation Framework</p></footer>")?;
        writeln!(self.out, "</div>")?;
        writeln!(self.out, "</body>")?;
        writeln!(self.out, "</html>")
    }

    fn write_summary(&mut self) -> std::fmt::Result {
        let tools_list = self
            .report
            .tools_compared
            .iter()
            .map(|t| html_escape(&capitalize(t)))
            .collect::<Vec<_>>()
            .join(", ");
        let categories_list = self
            .report
            .categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(self.out, "<div class=\"summary\">")?;
        writeln!(self.out, "<h2>Executive Summary</h2>")?;
        writeln!(
            self.out,
            "<p>This report compares {} across {} dimensions: {}.</p>",
            tools_list,
            self.report.categories.len(),
            categories_list
        )?;
        writeln!(self.out, "<h3>Overall Ranking</h3>")?;
        writeln!(self.out, "<div class=\"tool-ranking\">")?;

        if self.report.overall_ranking.is_empty() {
            writeln!(self.out, "<p class=\"empty\">No tool produced any results.</p>")?;
        }
        for (tool, entry) in &self.report.overall_ranking {
            writeln!(self.out, "<div class=\"tool-card\">")?;
            writeln!(
                self.out,
                "<h3>{} - Rank #{}</h3>",
                html_escape(&capitalize(tool)),
                entry.rank
            )?;
            writeln!(
                self.out,
                "<p><strong>Overall Score:</strong> {:.2}</p>",
                entry.score
            )?;
            writeln!(
                self.out,
                "<p><strong>Key Strengths:</strong> {}</p>",
                html_escape(&tool_strengths(self.report, tool))
            )?;
            writeln!(self.out, "</div>")?;
        }

        writeln!(self.out, "</div>")?;
        writeln!(self.out, "</div>")
    }

    fn write_category_section(&mut self, category: Category) -> std::fmt::Result {
        writeln!(self.out, "<h3>{} Analysis</h3>", category.label())?;
        writeln!(self.out, "<table class=\"metrics-table\">")?;
        writeln!(
            self.out,
            "<thead><tr><th>Tool</th><th>Rank</th><th>Score</th><th>Key Findings</th></tr></thead>"
        )?;
        writeln!(self.out, "<tbody>")?;

        match self.report.rankings.get(&category) {
            Some(ranking) if !ranking.is_empty() => {
                for (tool, entry) in ranking {
                    writeln!(
                        self.out,
                        "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
                        html_escape(&capitalize(tool)),
                        entry.rank,
                        entry.score,
                        html_escape(&key_findings(self.report, tool, category))
                    )?;
                }
            }
            _ => {
                writeln!(
                    self.out,
                    "<tr><td colspan=\"4\" class=\"empty\">No data available</td></tr>"
                )?;
            }
        }

        writeln!(self.out, "</tbody>")?;
        writeln!(self.out, "</table>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BenchConfig;
    use crate::record::MetricRecord;
    use crate::report::ToolResults;
    use indexmap::IndexMap;
    use serde_json::json;

    fn sample_report() -> Report {
        let config = BenchConfig::default().with_tools(["terraform", "opentofu"]);
        let mut results: IndexMap<String, ToolResults> = IndexMap::new();

        let mut terraform = ToolResults::new();
        terraform.insert(
            Category::Cost,
            MetricRecord::from_value(json!({
                "monthly_cost": 120.0,
                "cost_optimization_opportunities": [],
                "cost_efficiency_score": 85
            }))
            .unwrap(),
        );
        results.insert("terraform".to_string(), terraform);

        let mut opentofu = ToolResults::new();
        opentofu.insert(
            Category::Cost,
            MetricRecord::from_value(json!({"monthly_cost": 12.0, "cost_efficiency_score": 95}))
                .unwrap(),
        );
        results.insert("opentofu".to_string(), opentofu);

        Report::from_results(&config, "2024-05-01 12:00:00", results)
    }

    #[test]
    fn test_render_contains_cards_and_tables() {
        let html = render_html(&sample_report()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Generated at: 2024-05-01 12:00:00"));
        assert!(html.contains("<h3>Opentofu - Rank #1</h3>"));
        assert!(html.contains("<h3>Terraform - Rank #2</h3>"));
        assert!(html.contains("Best in Cost"));
        assert!(html.contains("<h3>Cost Analysis</h3>"));
        assert!(html.contains("Monthly cost: $120.00, Optimization opportunities: 0"));
        assert!(html.contains("<h3>Security Analysis</h3>"));
        assert!(html.contains("No data available"));
    }

    #[test]
    fn test_render_escapes_tool_names() {
        let config = BenchConfig::default().with_tools(["<script>"]);
        let mut results: IndexMap<String, ToolResults> = IndexMap::new();
        let mut r = ToolResults::new();
        r.insert(Category::Complexity, MetricRecord::default());
        results.insert("<script>".to_string(), r);

        let html = render_html(&Report::from_results(&config, "t", results)).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
