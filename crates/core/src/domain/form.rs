use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::format::strip_grouping;

/// Fallback when the life-expectancy field is blank or unparseable.
pub const DEFAULT_LIFE_EXPECTANCY: u32 = 85;

/// Narrow adapter over the page's named input fields. Collection only ever
/// reads through this, so the pipeline is testable with a plain map and the
/// transport (form body, JSON file) is someone else's concern.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&str>;
}

impl FieldSource for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    /// Unrecognized values fall back to the form's preselected option;
    /// a submission is never blocked on this field.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "conservative" => Self::Conservative,
            "aggressive" => Self::Aggressive,
            _ => Self::Moderate,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }
}

/// The request payload, built fresh per submission. Currency amounts are raw
/// numbers with no formatting; the field names are the wire contract with the
/// projection service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormInput {
    pub initial_investment: f64,
    pub initial_monthly_investment: f64,
    pub increment: f64,
    pub return_rate: f64,
    pub inflation_rate: f64,
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub tax_bracket: f64,
    pub desired_monthly_income: f64,
    pub risk_profile: RiskProfile,
    pub emergency_fund_months: u32,
}

impl FormInput {
    /// Reads the fixed field set and coerces each value, falling back to the
    /// documented default when a field is blank or fails to parse.
    pub fn collect(fields: &impl FieldSource) -> Self {
        Self {
            initial_investment: currency(fields, "initial_investment"),
            initial_monthly_investment: currency(fields, "initial_monthly_investment"),
            increment: currency(fields, "increment"),
            return_rate: rate(fields, "return_rate"),
            inflation_rate: rate(fields, "inflation_rate"),
            current_age: integer(fields, "current_age", 0),
            retirement_age: integer(fields, "retirement_age", 0),
            life_expectancy: integer(fields, "life_expectancy", DEFAULT_LIFE_EXPECTANCY),
            tax_bracket: rate(fields, "tax_bracket"),
            desired_monthly_income: currency(fields, "desired_monthly_income"),
            risk_profile: fields
                .field("risk_profile")
                .map(RiskProfile::parse)
                .unwrap_or(RiskProfile::Moderate),
            emergency_fund_months: integer(fields, "emergency_fund_months", 0),
        }
    }
}

/// Grouped display text ("15,00,000") parses to the underlying amount.
fn currency(fields: &impl FieldSource, name: &str) -> f64 {
    fields
        .field(name)
        .map(strip_grouping)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn rate(fields: &impl FieldSource, name: &str) -> f64 {
    fields
        .field(name)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn integer(fields: &impl FieldSource, name: &str, fallback: u32) -> u32 {
    fields
        .field(name)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(fallback)
}
