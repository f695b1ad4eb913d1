use serde::{Deserialize, Serialize};

/// Percentage split of the portfolio across the three asset classes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub equity: f64,
    pub debt: f64,
    pub gold: f64,
}

impl AssetAllocation {
    /// The three percentages should cover the whole portfolio; a rounding
    /// drift of up to one point is tolerated.
    pub fn is_consistent(&self) -> bool {
        (self.equity + self.debt + self.gold - 100.0).abs() <= 1.0
    }
}

/// One projected year. The server emits these in ascending age order; that
/// order is the time axis for every table and chart, so consumers read the
/// slice as-is and never reorder or mutate it.
///
/// Older server builds omit the fields past `monthly_investment`; those
/// default to zero so their responses still parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyRecord {
    pub age: u32,
    pub investment_amount: f64,
    pub inflation_adjusted: f64,
    pub monthly_investment: f64,
    #[serde(default)]
    pub annual_return: f64,
    #[serde(default)]
    pub potential_monthly_income: f64,
    #[serde(default)]
    pub withdrawal_rate: f64,
    #[serde(default)]
    pub asset_allocation: AssetAllocation,
}

/// Aggregates computed once by the server; read-only on this side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_value: f64,
    pub inflation_adjusted_value: f64,
    pub total_contributions: f64,
    pub total_return: f64,
    pub return_on_investment: f64,
    pub years_to_retirement: u32,
    pub retirement_year_value: f64,
    pub final_monthly_income: f64,
    /// Fraction per year, not a percentage.
    pub safe_withdrawal_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeMilestone {
    pub age: u32,
    pub year: i32,
    pub milestone_type: String,
    pub description: String,
    pub recommended_action: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResponse {
    pub results: Vec<YearlyRecord>,
    pub summary: ProjectionSummary,
    #[serde(default)]
    pub age_milestones: Vec<AgeMilestone>,
    #[serde(default)]
    pub inflation_rate: f64,
    #[serde(default)]
    pub retirement_age: u32,
}

impl ProjectionResponse {
    /// Index of the first year that pays out retirement income. The split
    /// between accumulation and drawdown is read off the data, not taken
    /// from the request.
    pub fn first_income_index(&self) -> Option<usize> {
        self.results
            .iter()
            .position(|r| r.potential_monthly_income > 0.0)
    }
}
