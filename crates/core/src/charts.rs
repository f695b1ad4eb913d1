//! Derives the chart datasets from a projection response and serializes each
//! one to Plotly traces + layout. Every chart projects independently from the
//! same immutable record slice and is rebuilt from scratch per submission.
//!
//! Container ids are fixed; the page shell declares a div for each of them
//! up front, so nothing here touches the page beyond emitting JSON.

use crate::domain::projection::{ProjectionResponse, YearlyRecord};
use serde_json::{json, Value};

pub const GROWTH_CONTAINER: &str = "portfolioGrowthChart";
pub const ALLOCATION_CONTAINER: &str = "assetAllocationChart";
pub const METRICS_CONTAINER: &str = "portfolioMetricsChart";
pub const ALLOCATION_SNAPSHOT_CONTAINER: &str = "assetPieChart";
pub const SAVINGS_CONTAINER: &str = "savingsProgressChart";
pub const INCOME_CONTAINER: &str = "retirementIncomeChart";
pub const SCENARIO_CONTAINER: &str = "scenariosChart";

const BLUE: &str = "#3498db";
const RED: &str = "#e74c3c";
const GREEN: &str = "#2ecc71";
const GOLD: &str = "#f1c40f";
const PURPLE: &str = "#9b59b6";
const ORANGE: &str = "#e67e22";
const GRID: &str = "#f0f0f0";

/// One render call: the container to draw into and what to pass to it.
#[derive(Debug, Clone)]
pub struct PlotSpec {
    pub container: &'static str,
    pub traces: Vec<Value>,
    pub layout: Value,
}

#[derive(Debug, Clone)]
pub struct ChartBundle {
    pub growth: GrowthChart,
    pub allocation: AllocationChart,
    pub metrics: MetricsChart,
    pub allocation_snapshot: AllocationSnapshot,
    pub savings: SavingsProgressChart,
    pub income: RetirementIncomeChart,
    pub scenarios: ScenarioChart,
}

pub fn build_charts(response: &ProjectionResponse) -> ChartBundle {
    ChartBundle {
        growth: GrowthChart::from_records(&response.results),
        allocation: AllocationChart::from_records(&response.results),
        metrics: MetricsChart::from_records(&response.results),
        allocation_snapshot: AllocationSnapshot::from_records(&response.results),
        savings: SavingsProgressChart::from_records(&response.results),
        income: RetirementIncomeChart::from_response(response),
        scenarios: ScenarioChart::from_records(&response.results),
    }
}

impl ChartBundle {
    pub fn plots(&self) -> Vec<PlotSpec> {
        vec![
            self.growth.plot(),
            self.allocation.plot(),
            self.metrics.plot(),
            self.allocation_snapshot.plot(),
            self.savings.plot(),
            self.income.plot(),
            self.scenarios.plot(),
        ]
    }
}

fn ages(records: &[YearlyRecord]) -> Vec<u32> {
    records.iter().map(|r| r.age).collect()
}

/// Portfolio value, its inflation-adjusted counterpart and the annualized
/// withdrawal over age. Withdrawals start hidden; they are a legend toggle.
#[derive(Debug, Clone)]
pub struct GrowthChart {
    pub ages: Vec<u32>,
    pub portfolio_values: Vec<f64>,
    pub inflation_adjusted: Vec<f64>,
    pub annual_withdrawals: Vec<f64>,
}

impl GrowthChart {
    fn from_records(records: &[YearlyRecord]) -> Self {
        Self {
            ages: ages(records),
            portfolio_values: records.iter().map(|r| r.investment_amount).collect(),
            inflation_adjusted: records.iter().map(|r| r.inflation_adjusted).collect(),
            annual_withdrawals: records
                .iter()
                .map(|r| r.potential_monthly_income * 12.0)
                .collect(),
        }
    }

    pub fn plot(&self) -> PlotSpec {
        let traces = vec![
            json!({
                "x": self.ages,
                "y": self.portfolio_values,
                "name": "Portfolio Value",
                "type": "scatter",
                "mode": "lines",
                "line": {"color": BLUE, "width": 3},
            }),
            json!({
                "x": self.ages,
                "y": self.inflation_adjusted,
                "name": "Inflation Adjusted",
                "type": "scatter",
                "mode": "lines",
                "line": {"color": RED, "width": 2, "dash": "dot"},
            }),
            json!({
                "x": self.ages,
                "y": self.annual_withdrawals,
                "name": "Annual Withdrawals",
                "type": "scatter",
                "mode": "lines",
                "line": {"color": GREEN, "width": 2},
                "visible": "legendonly",
            }),
        ];

        PlotSpec {
            container: GROWTH_CONTAINER,
            traces,
            layout: json!({
                "title": "Portfolio Growth Over Time",
                "xaxis": {"title": "Age", "gridcolor": GRID},
                "yaxis": {"title": "Value (₹)", "gridcolor": GRID, "tickformat": ",.0f"},
                "showlegend": true,
                "legend": {"x": 0.05, "y": 1},
                "hovermode": "x unified",
            }),
        }
    }
}

/// Stacked equity/debt/gold percentages; the y axis is pinned to [0, 100].
#[derive(Debug, Clone)]
pub struct AllocationChart {
    pub ages: Vec<u32>,
    pub equity: Vec<f64>,
    pub debt: Vec<f64>,
    pub gold: Vec<f64>,
}

impl AllocationChart {
    fn from_records(records: &[YearlyRecord]) -> Self {
        Self {
            ages: ages(records),
            equity: records.iter().map(|r| r.asset_allocation.equity).collect(),
            debt: records.iter().map(|r| r.asset_allocation.debt).collect(),
            gold: records.iter().map(|r| r.asset_allocation.gold).collect(),
        }
    }

    pub fn plot(&self) -> PlotSpec {
        let area = |name: &str, values: &[f64], color: &str| {
            json!({
                "x": self.ages,
                "y": values,
                "name": name,
                "type": "scatter",
                "mode": "lines",
                "stackgroup": "one",
                "fillcolor": color,
                "line": {"color": color, "width": 0},
            })
        };

        PlotSpec {
            container: ALLOCATION_CONTAINER,
            traces: vec![
                area("Equity", &self.equity, RED),
                area("Debt", &self.debt, BLUE),
                area("Gold", &self.gold, GOLD),
            ],
            layout: json!({
                "title": "Asset Allocation Over Time",
                "xaxis": {"title": "Age", "gridcolor": GRID},
                "yaxis": {"title": "Allocation (%)", "gridcolor": GRID, "range": [0, 100]},
                "showlegend": true,
                "legend": {"x": 0.05, "y": 1},
                "hovermode": "x unified",
            }),
        }
    }
}

/// Dual-axis rates: annual return rate across all ages, withdrawal rate from
/// the first income-paying record onward. The split point comes from the
/// data, never from the request's retirement age.
#[derive(Debug, Clone)]
pub struct MetricsChart {
    pub ages: Vec<u32>,
    pub return_rates: Vec<f64>,
    pub withdrawal_ages: Vec<u32>,
    pub withdrawal_rates: Vec<f64>,
}

impl MetricsChart {
    fn from_records(records: &[YearlyRecord]) -> Self {
        let return_rates = records
            .iter()
            .map(|r| {
                if r.investment_amount == 0.0 {
                    0.0
                } else {
                    r.annual_return / r.investment_amount * 100.0
                }
            })
            .collect();

        let split = records
            .iter()
            .position(|r| r.potential_monthly_income > 0.0);
        let (withdrawal_ages, withdrawal_rates) = match split {
            Some(idx) => (
                records[idx..].iter().map(|r| r.age).collect(),
                records[idx..].iter().map(|r| r.withdrawal_rate).collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Self {
            ages: ages(records),
            return_rates,
            withdrawal_ages,
            withdrawal_rates,
        }
    }

    pub fn plot(&self) -> PlotSpec {
        PlotSpec {
            container: METRICS_CONTAINER,
            traces: vec![
                json!({
                    "x": self.ages,
                    "y": self.return_rates,
                    "name": "Annual Return Rate",
                    "type": "scatter",
                    "mode": "lines",
                    "yaxis": "y2",
                    "line": {"color": PURPLE, "width": 2},
                }),
                json!({
                    "x": self.withdrawal_ages,
                    "y": self.withdrawal_rates,
                    "name": "Withdrawal Rate",
                    "type": "scatter",
                    "mode": "lines",
                    "yaxis": "y2",
                    "line": {"color": ORANGE, "width": 2},
                }),
            ],
            layout: json!({
                "title": "Portfolio Metrics",
                "xaxis": {"title": "Age", "gridcolor": GRID},
                "yaxis": {"title": "Value", "gridcolor": GRID, "tickformat": ",.1f"},
                "yaxis2": {"title": "Rate (%)", "overlaying": "y", "side": "right", "gridcolor": GRID},
                "showlegend": true,
                "legend": {"x": 0.05, "y": 1},
                "hovermode": "x unified",
            }),
        }
    }
}

/// Donut of the final year's allocation.
#[derive(Debug, Clone, Default)]
pub struct AllocationSnapshot {
    pub equity: f64,
    pub debt: f64,
    pub gold: f64,
}

impl AllocationSnapshot {
    fn from_records(records: &[YearlyRecord]) -> Self {
        records
            .last()
            .map(|r| Self {
                equity: r.asset_allocation.equity,
                debt: r.asset_allocation.debt,
                gold: r.asset_allocation.gold,
            })
            .unwrap_or_default()
    }

    pub fn plot(&self) -> PlotSpec {
        PlotSpec {
            container: ALLOCATION_SNAPSHOT_CONTAINER,
            traces: vec![json!({
                "values": [self.equity, self.debt, self.gold],
                "labels": ["Equity", "Debt", "Gold"],
                "type": "pie",
                "hole": 0.4,
                "marker": {"colors": [RED, BLUE, GOLD]},
                "textinfo": "label+percent",
                "textposition": "outside",
                "automargin": true,
            })],
            layout: json!({
                "title": "Current Asset Allocation",
                "height": 400,
                "showlegend": true,
                "legend": {"orientation": "h", "y": -0.1},
                "annotations": [{"text": "Asset<br>Split", "showarrow": false, "font": {"size": 14}}],
            }),
        }
    }
}

/// Stacked contribution/return bars with the cumulative portfolio value as a
/// line on the secondary axis.
#[derive(Debug, Clone)]
pub struct SavingsProgressChart {
    pub ages: Vec<u32>,
    pub annual_contributions: Vec<f64>,
    pub annual_returns: Vec<f64>,
    pub cumulative_values: Vec<f64>,
}

impl SavingsProgressChart {
    fn from_records(records: &[YearlyRecord]) -> Self {
        Self {
            ages: ages(records),
            annual_contributions: records
                .iter()
                .map(|r| r.monthly_investment * 12.0)
                .collect(),
            annual_returns: records.iter().map(|r| r.annual_return).collect(),
            cumulative_values: records.iter().map(|r| r.investment_amount).collect(),
        }
    }

    pub fn plot(&self) -> PlotSpec {
        PlotSpec {
            container: SAVINGS_CONTAINER,
            traces: vec![
                json!({
                    "x": self.ages,
                    "y": self.annual_contributions,
                    "name": "Annual Contributions",
                    "type": "bar",
                    "marker": {"color": GREEN},
                }),
                json!({
                    "x": self.ages,
                    "y": self.annual_returns,
                    "name": "Investment Returns",
                    "type": "bar",
                    "marker": {"color": BLUE},
                }),
                json!({
                    "x": self.ages,
                    "y": self.cumulative_values,
                    "name": "Total Portfolio",
                    "type": "scatter",
                    "mode": "lines",
                    "line": {"color": RED, "width": 3},
                    "yaxis": "y2",
                }),
            ],
            layout: json!({
                "title": "Savings Progress & Returns",
                "barmode": "stack",
                "xaxis": {"title": "Age"},
                "yaxis": {"title": "Annual Amount (₹)", "tickformat": ",.0f"},
                "yaxis2": {"title": "Total Portfolio Value (₹)", "overlaying": "y", "side": "right", "tickformat": ",.0f"},
                "showlegend": true,
                "legend": {"x": 0.05, "y": 1.1},
            }),
        }
    }
}

/// Retirement years only: nominal monthly income next to the same income
/// deflated back to retirement-age rupees.
#[derive(Debug, Clone)]
pub struct RetirementIncomeChart {
    pub ages: Vec<u32>,
    pub nominal_income: Vec<f64>,
    pub deflated_income: Vec<f64>,
}

impl RetirementIncomeChart {
    fn from_response(response: &ProjectionResponse) -> Self {
        let retirement: Vec<&YearlyRecord> = response
            .results
            .iter()
            .filter(|r| r.potential_monthly_income > 0.0)
            .collect();

        let deflator = 1.0 + response.inflation_rate / 100.0;
        let deflated_income = retirement
            .iter()
            .map(|r| {
                let years_in = r.age as i32 - response.retirement_age as i32;
                r.potential_monthly_income / deflator.powi(years_in)
            })
            .collect();

        Self {
            ages: retirement.iter().map(|r| r.age).collect(),
            nominal_income: retirement
                .iter()
                .map(|r| r.potential_monthly_income)
                .collect(),
            deflated_income,
        }
    }

    pub fn plot(&self) -> PlotSpec {
        PlotSpec {
            container: INCOME_CONTAINER,
            traces: vec![
                json!({
                    "x": self.ages,
                    "y": self.nominal_income,
                    "name": "Monthly Income",
                    "type": "scatter",
                    "mode": "lines",
                    "line": {"color": GREEN},
                }),
                json!({
                    "x": self.ages,
                    "y": self.deflated_income,
                    "name": "Inflation Adjusted Income",
                    "type": "scatter",
                    "mode": "lines",
                    "line": {"color": RED, "dash": "dot"},
                }),
            ],
            layout: json!({
                "title": "Retirement Income Analysis",
                "xaxis": {"title": "Age"},
                "yaxis": {"title": "Monthly Income (₹)", "tickformat": ",.0f"},
                "showlegend": true,
            }),
        }
    }
}

/// Multiplicative sensitivity bands around the expected portfolio value:
/// ×0.8 conservative, ×1.2 optimistic. Not separately simulated scenarios.
#[derive(Debug, Clone)]
pub struct ScenarioChart {
    pub ages: Vec<u32>,
    pub expected: Vec<f64>,
    pub conservative: Vec<f64>,
    pub optimistic: Vec<f64>,
}

impl ScenarioChart {
    const CONSERVATIVE_FACTOR: f64 = 0.8;
    const OPTIMISTIC_FACTOR: f64 = 1.2;

    fn from_records(records: &[YearlyRecord]) -> Self {
        let expected: Vec<f64> = records.iter().map(|r| r.investment_amount).collect();
        Self {
            ages: ages(records),
            conservative: expected.iter().map(|v| v * Self::CONSERVATIVE_FACTOR).collect(),
            optimistic: expected.iter().map(|v| v * Self::OPTIMISTIC_FACTOR).collect(),
            expected,
        }
    }

    pub fn plot(&self) -> PlotSpec {
        let band = |name: &str, values: &[f64], color: &str, width: u32| {
            json!({
                "x": self.ages,
                "y": values,
                "name": name,
                "type": "scatter",
                "mode": "lines",
                "line": {"color": color, "width": width},
            })
        };

        PlotSpec {
            container: SCENARIO_CONTAINER,
            traces: vec![
                band("Optimistic Scenario", &self.optimistic, GREEN, 1),
                band("Expected Scenario", &self.expected, BLUE, 2),
                band("Conservative Scenario", &self.conservative, RED, 1),
            ],
            layout: json!({
                "title": "Investment Scenarios Analysis",
                "xaxis": {"title": "Age"},
                "yaxis": {"title": "Portfolio Value (₹)", "tickformat": ",.0f"},
                "showlegend": true,
                "legend": {"x": 0.05, "y": 1},
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::{AssetAllocation, ProjectionSummary};

    fn record(age: u32, value: f64, income: f64) -> YearlyRecord {
        YearlyRecord {
            age,
            investment_amount: value,
            inflation_adjusted: value * 0.94,
            monthly_investment: if income > 0.0 { 0.0 } else { 10_000.0 },
            annual_return: value * 0.08,
            potential_monthly_income: income,
            withdrawal_rate: if income > 0.0 { 4.0 } else { 0.0 },
            asset_allocation: AssetAllocation {
                equity: 60.0,
                debt: 30.0,
                gold: 10.0,
            },
        }
    }

    fn summary() -> ProjectionSummary {
        ProjectionSummary {
            total_value: 0.0,
            inflation_adjusted_value: 0.0,
            total_contributions: 0.0,
            total_return: 0.0,
            return_on_investment: 0.0,
            years_to_retirement: 0,
            retirement_year_value: 0.0,
            final_monthly_income: 0.0,
            safe_withdrawal_rate: 0.04,
        }
    }

    fn response(records: Vec<YearlyRecord>) -> ProjectionResponse {
        ProjectionResponse {
            results: records,
            summary: summary(),
            age_milestones: Vec::new(),
            inflation_rate: 6.0,
            retirement_age: 60,
        }
    }

    #[test]
    fn scenario_bands_are_exact_multiples() {
        let chart = ScenarioChart::from_records(&[
            record(30, 100_000.0, 0.0),
            record(31, 120_000.0, 0.0),
        ]);

        for i in 0..chart.expected.len() {
            assert_eq!(chart.conservative[i], 0.8 * chart.expected[i]);
            assert_eq!(chart.optimistic[i], 1.2 * chart.expected[i]);
        }
    }

    #[test]
    fn withdrawal_series_spans_first_income_record_to_end() {
        let records = vec![
            record(58, 1_000_000.0, 0.0),
            record(59, 1_100_000.0, 0.0),
            record(60, 1_200_000.0, 40_000.0),
            record(61, 1_150_000.0, 40_000.0),
        ];

        let chart = MetricsChart::from_records(&records);
        assert_eq!(chart.withdrawal_ages, vec![60, 61]);
        assert_eq!(chart.withdrawal_rates.len(), 2);
        assert_eq!(chart.return_rates.len(), 4);
    }

    #[test]
    fn withdrawal_series_is_empty_without_income_years() {
        let records = vec![record(30, 100_000.0, 0.0), record(31, 120_000.0, 0.0)];
        let chart = MetricsChart::from_records(&records);
        assert!(chart.withdrawal_ages.is_empty());
        assert!(chart.withdrawal_rates.is_empty());
    }

    #[test]
    fn return_rate_guards_zero_portfolio() {
        let mut r = record(30, 0.0, 0.0);
        r.annual_return = 1_000.0;
        let chart = MetricsChart::from_records(&[r]);
        assert_eq!(chart.return_rates, vec![0.0]);
    }

    #[test]
    fn growth_withdrawals_are_annualized_and_hidden() {
        let chart = GrowthChart::from_records(&[record(60, 1_000_000.0, 40_000.0)]);
        assert_eq!(chart.annual_withdrawals, vec![480_000.0]);

        let plot = chart.plot();
        assert_eq!(plot.traces[2]["visible"], "legendonly");
    }

    #[test]
    fn allocation_axis_is_pinned_to_percent_range() {
        let chart = AllocationChart::from_records(&[record(30, 100_000.0, 0.0)]);
        let plot = chart.plot();
        assert_eq!(plot.layout["yaxis"]["range"], serde_json::json!([0, 100]));
        assert_eq!(chart.equity, vec![60.0]);
    }

    #[test]
    fn snapshot_uses_last_record_only() {
        let mut late = record(61, 1_000_000.0, 40_000.0);
        late.asset_allocation = AssetAllocation {
            equity: 30.0,
            debt: 55.0,
            gold: 15.0,
        };
        let snapshot =
            AllocationSnapshot::from_records(&[record(60, 1_000_000.0, 40_000.0), late]);
        assert_eq!(snapshot.equity, 30.0);
        assert_eq!(snapshot.debt, 55.0);
    }

    #[test]
    fn income_chart_filters_and_deflates() {
        let response = response(vec![
            record(59, 1_100_000.0, 0.0),
            record(60, 1_200_000.0, 40_000.0),
            record(62, 1_100_000.0, 40_000.0),
        ]);

        let chart = RetirementIncomeChart::from_response(&response);
        assert_eq!(chart.ages, vec![60, 62]);
        // Age 60 is the retirement age itself, so no deflation applies.
        assert!((chart.deflated_income[0] - 40_000.0).abs() < 1e-9);
        let expected = 40_000.0 / (1.0 + 0.06_f64).powi(2);
        assert!((chart.deflated_income[1] - expected).abs() < 1e-9);
    }

    #[test]
    fn savings_chart_annualizes_contributions() {
        let chart = SavingsProgressChart::from_records(&[record(30, 100_000.0, 0.0)]);
        assert_eq!(chart.annual_contributions, vec![120_000.0]);
        assert_eq!(chart.cumulative_values, vec![100_000.0]);
    }

    #[test]
    fn bundle_renders_into_every_fixed_container() {
        let bundle = build_charts(&response(vec![record(30, 100_000.0, 0.0)]));
        let containers: Vec<&str> = bundle.plots().iter().map(|p| p.container).collect();
        assert_eq!(
            containers,
            vec![
                GROWTH_CONTAINER,
                ALLOCATION_CONTAINER,
                METRICS_CONTAINER,
                ALLOCATION_SNAPSHOT_CONTAINER,
                SAVINGS_CONTAINER,
                INCOME_CONTAINER,
                SCENARIO_CONTAINER,
            ]
        );
    }
}
