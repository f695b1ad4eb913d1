//! HTML producers for the results area and the page shell. Every function is
//! a pure string builder over the response; the shell declares a fixed div
//! for each chart container so nothing is created on demand at render time.

use crate::charts::{self, ChartBundle};
use crate::client::ProjectionError;
use crate::domain::projection::{
    AgeMilestone, Priority, ProjectionResponse, ProjectionSummary, YearlyRecord,
};
use crate::format::{format_inr, format_percent};
use std::fmt::Write;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const BOOTSTRAP_CDN: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

const PAGE_CSS: &str = r#"
    body { background: #f8f9fa; }
    .section-card { background: #fff; border-radius: 8px; padding: 1.25rem; margin-bottom: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
    .result-card p { margin-bottom: .4rem; }
    .chart-container { min-height: 420px; margin-bottom: 1rem; }
    body.loading::after { content: ""; position: fixed; inset: 0; background: rgba(255,255,255,.7) url('data:image/svg+xml;utf8,<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 24 24"><circle cx="12" cy="12" r="10" stroke="%233498db" stroke-width="3" fill="none" stroke-dasharray="40 20"/></svg>') center no-repeat; }
"#;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Summary panel: investment aggregates on the left, retirement analysis on
/// the right. Monetary fields share the one currency rule; rates show two
/// decimals.
pub fn summary_section(summary: &ProjectionSummary) -> String {
    format!(
        r#"<div class="row">
  <div class="col-md-6">
    <div class="section-card">
      <h3>Investment Summary</h3>
      <div class="result-card">
        <p><strong>Total Portfolio Value:</strong> {total_value}</p>
        <p><strong>Inflation Adjusted Value:</strong> {inflation_adjusted}</p>
        <p><strong>Total Contributions:</strong> {contributions}</p>
        <p><strong>Total Returns:</strong> {returns}</p>
        <p><strong>Return on Investment:</strong> {roi}</p>
      </div>
    </div>
  </div>
  <div class="col-md-6">
    <div class="section-card">
      <h3>Retirement Analysis</h3>
      <div class="result-card">
        <p><strong>Years to Retirement:</strong> {years}</p>
        <p><strong>Retirement Year Value:</strong> {retirement_value}</p>
        <p><strong>Monthly Income in Retirement:</strong> {monthly_income}</p>
        <p><strong>Safe Withdrawal Rate:</strong> {swr}</p>
      </div>
    </div>
  </div>
</div>
"#,
        total_value = format_inr(summary.total_value),
        inflation_adjusted = format_inr(summary.inflation_adjusted_value),
        contributions = format_inr(summary.total_contributions),
        returns = format_inr(summary.total_return),
        roi = format_percent(summary.return_on_investment),
        years = summary.years_to_retirement,
        retirement_value = format_inr(summary.retirement_year_value),
        monthly_income = format_inr(summary.final_monthly_income),
        swr = format_percent(summary.safe_withdrawal_rate * 100.0),
    )
}

/// Year-by-year table. The calendar year is synthetic: `current_year` plus
/// the record's offset from the first projected age. Rows that pay retirement
/// income are flagged.
pub fn yearly_table_section(records: &[YearlyRecord], current_year: i32) -> String {
    let first_age = records.first().map(|r| r.age).unwrap_or(0);

    let mut rows = String::new();
    for r in records {
        let row_class = if r.potential_monthly_income > 0.0 {
            "table-warning"
        } else {
            ""
        };
        let monthly = if r.monthly_investment > 0.0 {
            format_inr(r.monthly_investment)
        } else {
            "-".to_string()
        };
        let withdrawal = if r.potential_monthly_income > 0.0 {
            format_inr(r.potential_monthly_income)
        } else {
            "-".to_string()
        };

        let _ = write!(
            rows,
            r#"<tr class="{row_class}">
  <td>{age}</td>
  <td>{year}</td>
  <td>{value}</td>
  <td>{monthly}</td>
  <td>{annual_return}</td>
  <td>{withdrawal}</td>
  <td>{inflation_adjusted}</td>
  <td class="d-none d-md-table-cell"><small>Equity: {equity}% | Debt: {debt}% | Gold: {gold}%</small></td>
</tr>
"#,
            age = r.age,
            year = current_year + (r.age as i32 - first_age as i32),
            value = format_inr(r.investment_amount),
            annual_return = format_inr(r.annual_return),
            inflation_adjusted = format_inr(r.inflation_adjusted),
            equity = r.asset_allocation.equity,
            debt = r.asset_allocation.debt,
            gold = r.asset_allocation.gold,
        );
    }

    format!(
        r#"<div class="section-card mt-4">
  <h3>Year-by-Year Projection</h3>
  <div class="table-responsive">
    <table class="table table-bordered table-hover">
      <thead class="table-light">
        <tr>
          <th>Age</th>
          <th>Year</th>
          <th>Portfolio Value</th>
          <th>Monthly Investment</th>
          <th>Annual Return</th>
          <th>Monthly Withdrawal</th>
          <th>Inflation Adjusted Value</th>
          <th class="d-none d-md-table-cell">Asset Allocation</th>
        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
  </div>
</div>
"#
    )
}

fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "table-danger",
        Priority::Medium => "table-warning",
        Priority::Low => "table-info",
    }
}

/// Milestones table, color-coded by priority. An empty milestone list means
/// no section at all.
pub fn milestones_section(milestones: &[AgeMilestone]) -> String {
    if milestones.is_empty() {
        return String::new();
    }

    let mut rows = String::new();
    for m in milestones {
        let _ = write!(
            rows,
            r#"<tr class="{class}">
  <td>{age}</td>
  <td>{year}</td>
  <td>{milestone}</td>
  <td>{description}</td>
  <td>{action}</td>
</tr>
"#,
            class = priority_class(m.priority),
            age = m.age,
            year = m.year,
            milestone = escape_html(&m.milestone_type),
            description = escape_html(&m.description),
            action = escape_html(&m.recommended_action),
        );
    }

    format!(
        r#"<div class="section-card mt-4">
  <h3>Age-wise Investment Milestones</h3>
  <div class="table-responsive">
    <table class="table table-bordered">
      <thead class="table-light">
        <tr>
          <th>Age</th>
          <th>Year</th>
          <th>Milestone</th>
          <th>Description</th>
          <th>Recommended Action</th>
        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
  </div>
</div>
"#
    )
}

/// Advisory panel; renders nothing when no rule fired.
pub fn recommendations_section(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut list = String::new();
    for item in items {
        let _ = write!(list, "<li>{}</li>\n", escape_html(item));
    }

    format!(
        r#"<div class="section-card mt-4">
  <h3>Recommendations</h3>
  <ul class="recommendations-list">
{list}  </ul>
</div>
"#
    )
}

/// The single visible error panel that takes the place of the results area.
pub fn error_section(err: &ProjectionError) -> String {
    format!(
        "<div class=\"alert alert-danger\">Error: {}</div>\n",
        escape_html(&err.user_message())
    )
}

/// The results area in its fixed order: summary, yearly table, milestones,
/// recommendations.
pub fn results_body(
    response: &ProjectionResponse,
    recommendations: &[String],
    current_year: i32,
) -> String {
    format!(
        "{}{}{}{}",
        summary_section(&response.summary),
        yearly_table_section(&response.results, current_year),
        milestones_section(&response.age_milestones),
        recommendations_section(recommendations),
    )
}

/// The declared chart layout: one div per container id, present before any
/// render call runs.
pub fn chart_grid() -> String {
    let containers = [
        charts::GROWTH_CONTAINER,
        charts::ALLOCATION_CONTAINER,
        charts::METRICS_CONTAINER,
        charts::ALLOCATION_SNAPSHOT_CONTAINER,
        charts::SAVINGS_CONTAINER,
        charts::INCOME_CONTAINER,
        charts::SCENARIO_CONTAINER,
    ];

    let mut out = String::from("<div class=\"section-card mt-4\" id=\"charts\">\n");
    for id in containers {
        let _ = write!(out, "  <div class=\"chart-container\" id=\"{id}\"></div>\n");
    }
    out.push_str("</div>\n");
    out
}

/// One `Plotly.newPlot` call per chart, targeting its declared container.
pub fn chart_scripts(bundle: &ChartBundle) -> String {
    let mut out = String::from("<script>\n");
    for plot in bundle.plots() {
        let traces = serde_json::Value::Array(plot.traces);
        let _ = write!(
            out,
            "Plotly.newPlot({container:?}, {traces}, {layout}, {{responsive: true, displayModeBar: false}});\n",
            container = plot.container,
            traces = traces,
            layout = plot.layout,
        );
    }
    out.push_str("</script>\n");
    out
}

/// Standalone document shell around a body fragment.
pub fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{BOOTSTRAP_CDN}">
<script src="{PLOTLY_CDN}"></script>
<style>{PAGE_CSS}</style>
</head>
<body>
<div class="container py-4">
<div id="results">
{body}</div>
</div>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::AssetAllocation;

    fn summary() -> ProjectionSummary {
        ProjectionSummary {
            total_value: 25_000_000.0,
            inflation_adjusted_value: 14_000_000.0,
            total_contributions: 9_000_000.0,
            total_return: 16_000_000.0,
            return_on_investment: 177.777,
            years_to_retirement: 30,
            retirement_year_value: 25_000_000.0,
            final_monthly_income: 83_333.0,
            safe_withdrawal_rate: 0.04,
        }
    }

    fn record(age: u32, value: f64, income: f64) -> YearlyRecord {
        YearlyRecord {
            age,
            investment_amount: value,
            inflation_adjusted: value * 0.94,
            monthly_investment: if income > 0.0 { 0.0 } else { 10_000.0 },
            annual_return: value * 0.08,
            potential_monthly_income: income,
            withdrawal_rate: 0.0,
            asset_allocation: AssetAllocation {
                equity: 60.0,
                debt: 30.0,
                gold: 10.0,
            },
        }
    }

    fn two_year_response() -> ProjectionResponse {
        ProjectionResponse {
            results: vec![record(30, 100_000.0, 0.0), record(31, 120_000.0, 0.0)],
            summary: summary(),
            age_milestones: Vec::new(),
            inflation_rate: 6.0,
            retirement_age: 60,
        }
    }

    #[test]
    fn two_records_render_one_summary_two_rows_no_milestones() {
        let body = results_body(&two_year_response(), &[], 2026);

        assert_eq!(body.matches("Investment Summary").count(), 1);
        assert_eq!(body.matches("<tr class=").count(), 2);
        assert!(!body.contains("Age-wise Investment Milestones"));
        assert!(!body.contains("Recommendations"));
    }

    #[test]
    fn summary_formats_rates_to_two_decimals() {
        let html = summary_section(&summary());
        assert!(html.contains("177.78%"));
        assert!(html.contains("4.00%"));
        assert!(html.contains("₹2,50,00,000"));
    }

    #[test]
    fn yearly_rows_compute_synthetic_calendar_year() {
        let html = yearly_table_section(
            &[record(30, 100_000.0, 0.0), record(32, 140_000.0, 0.0)],
            2026,
        );
        assert!(html.contains("<td>2026</td>"));
        assert!(html.contains("<td>2028</td>"));
    }

    #[test]
    fn income_years_are_flagged_and_show_withdrawal() {
        let html = yearly_table_section(&[record(60, 1_000_000.0, 40_000.0)], 2026);
        assert!(html.contains("class=\"table-warning\""));
        assert!(html.contains("₹40,000"));
        // No contribution once retired.
        assert!(html.contains("<td>-</td>"));
    }

    #[test]
    fn milestones_are_colored_by_priority() {
        let milestone = |priority| AgeMilestone {
            age: 40,
            year: 2036,
            milestone_type: "checkpoint".into(),
            description: "desc".into(),
            recommended_action: "act".into(),
            priority,
        };

        let html = milestones_section(&[
            milestone(Priority::High),
            milestone(Priority::Medium),
            milestone(Priority::Low),
        ]);
        assert!(html.contains("table-danger"));
        assert!(html.contains("table-warning"));
        assert!(html.contains("table-info"));

        assert_eq!(milestones_section(&[]), "");
    }

    #[test]
    fn error_panel_carries_server_detail() {
        let err = ProjectionError::RequestFailed {
            status: 400,
            detail: Some("bad age".to_string()),
        };
        let html = error_section(&err);
        assert!(html.contains("alert-danger"));
        assert!(html.contains("bad age"));
    }

    #[test]
    fn rendered_text_is_escaped() {
        let err = ProjectionError::RequestFailed {
            status: 400,
            detail: Some("<script>alert(1)</script>".to_string()),
        };
        let html = error_section(&err);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn chart_grid_declares_every_container() {
        let grid = chart_grid();
        for id in [
            "portfolioGrowthChart",
            "assetAllocationChart",
            "portfolioMetricsChart",
            "assetPieChart",
            "savingsProgressChart",
            "retirementIncomeChart",
            "scenariosChart",
        ] {
            assert!(grid.contains(&format!("id=\"{id}\"")), "missing {id}");
        }
    }

    #[test]
    fn chart_scripts_emit_one_render_call_per_chart() {
        let bundle = crate::charts::build_charts(&two_year_response());
        let scripts = chart_scripts(&bundle);
        assert_eq!(scripts.matches("Plotly.newPlot(").count(), 7);
        assert!(scripts.contains("\"portfolioGrowthChart\""));
    }
}
