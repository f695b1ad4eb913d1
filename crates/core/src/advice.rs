//! Threshold rules that turn the projection and the submitted inputs into
//! advisory text. Rules are independent and always evaluated in the same
//! order; none suppresses another.

use crate::domain::form::{FormInput, RiskProfile};
use crate::domain::projection::ProjectionSummary;
use crate::format::format_inr;

const HIGH_RETURN_ASSUMPTION_PCT: f64 = 12.0;
const CONTRIBUTION_FLOOR_RATIO: f64 = 0.10;
const YOUNG_INVESTOR_AGE: u32 = 30;
const MIN_EMERGENCY_FUND_MONTHS: u32 = 6;
const HIGH_TAX_BRACKET_PCT: f64 = 30.0;

pub fn recommendations(summary: &ProjectionSummary, form: &FormInput) -> Vec<String> {
    let mut out = Vec::new();

    if summary.final_monthly_income < form.desired_monthly_income {
        out.push(format!(
            "Consider increasing your monthly investment to reach your desired retirement income of {}",
            format_inr(form.desired_monthly_income)
        ));
    }

    if form.return_rate > HIGH_RETURN_ASSUMPTION_PCT {
        out.push(format!(
            "An assumed return of {:.1}% per year is optimistic; re-run the projection with a lower rate to see how sensitive your plan is",
            form.return_rate
        ));
    }

    if form.desired_monthly_income > 0.0
        && form.initial_monthly_investment
            < CONTRIBUTION_FLOOR_RATIO * form.desired_monthly_income
    {
        out.push(format!(
            "Your monthly investment of {} is small next to your income goal; even modest increases compound substantially over the years",
            format_inr(form.initial_monthly_investment)
        ));
    }

    if form.current_age < YOUNG_INVESTOR_AGE && form.risk_profile == RiskProfile::Conservative {
        out.push(
            "Given your young age, you might consider a more aggressive investment strategy to maximize long-term returns"
                .to_string(),
        );
    }

    if form.emergency_fund_months < MIN_EMERGENCY_FUND_MONTHS {
        out.push(format!(
            "Consider building an emergency fund of at least {MIN_EMERGENCY_FUND_MONTHS} months of expenses"
        ));
    }

    if form.tax_bracket >= HIGH_TAX_BRACKET_PCT {
        out.push(
            "At your tax bracket, tax-advantaged vehicles such as ELSS, PPF or NPS can meaningfully improve post-tax returns"
                .to_string(),
        );
    }

    out
}
