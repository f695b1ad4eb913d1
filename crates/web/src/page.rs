//! Markup for the input form. The form posts its named fields to `/report`;
//! currency fields carry grouped display text that the collector strips back
//! out. The inline script mirrors `CurrencyField` for keystroke feedback and
//! flips the loading overlay on submit; the submitted page replaces the whole
//! document, so the overlay can never outlive a response.

use nivesh_core::domain::form::{FormInput, RiskProfile};
use nivesh_core::format::CurrencyField;

const FORM_SCRIPT: &str = r#"<script>
document.querySelectorAll('input.currency-input').forEach((input) => {
  input.addEventListener('input', () => {
    const digits = input.value.replace(/[^0-9]/g, '');
    input.dataset.raw = digits;
    input.value = digits ? Number(digits).toLocaleString('en-IN') : '';
  });
});
document.getElementById('projection-form').addEventListener('submit', () => {
  document.body.classList.add('loading');
});
</script>
"#;

fn currency_input(name: &str, label: &str, amount: f64) -> String {
    let field = CurrencyField::from_amount(amount);
    format!(
        r#"<div class="col-md-6 mb-3">
  <label class="form-label" for="{name}">{label}</label>
  <input class="form-control currency-input" type="text" inputmode="numeric" id="{name}" name="{name}" value="{value}">
</div>
"#,
        value = field.display(),
    )
}

fn number_input(name: &str, label: &str, value: &str, step: &str) -> String {
    format!(
        r#"<div class="col-md-4 mb-3">
  <label class="form-label" for="{name}">{label}</label>
  <input class="form-control" type="number" step="{step}" id="{name}" name="{name}" value="{value}">
</div>
"#
    )
}

fn risk_select(selected: RiskProfile) -> String {
    let option = |profile: RiskProfile, label: &str| {
        let marker = if profile == selected { " selected" } else { "" };
        format!(
            "      <option value=\"{}\"{marker}>{label}</option>\n",
            profile.as_str()
        )
    };

    format!(
        r#"<div class="col-md-4 mb-3">
  <label class="form-label" for="risk_profile">Risk Profile</label>
  <select class="form-select" id="risk_profile" name="risk_profile">
{options}  </select>
</div>
"#,
        options = format!(
            "{}{}{}",
            option(RiskProfile::Conservative, "Conservative"),
            option(RiskProfile::Moderate, "Moderate"),
            option(RiskProfile::Aggressive, "Aggressive"),
        ),
    )
}

/// The form, blank on first load or sticky with the submitted values.
pub fn form_section(prefill: Option<&FormInput>) -> String {
    let amounts = prefill.map(|f| {
        (
            f.initial_investment,
            f.initial_monthly_investment,
            f.increment,
            f.desired_monthly_income,
        )
    });
    let (initial, monthly, increment, desired) = amounts.unwrap_or((0.0, 0.0, 0.0, 0.0));

    let show_u32 = |v: u32| v.to_string();
    let show_f64 = |v: f64| {
        if v == 0.0 {
            String::new()
        } else {
            format!("{v}")
        }
    };

    let (return_rate, inflation_rate, current_age, retirement_age, life, tax, emergency, risk) =
        match prefill {
            Some(f) => (
                show_f64(f.return_rate),
                show_f64(f.inflation_rate),
                show_u32(f.current_age),
                show_u32(f.retirement_age),
                show_u32(f.life_expectancy),
                show_f64(f.tax_bracket),
                show_u32(f.emergency_fund_months),
                f.risk_profile,
            ),
            None => (
                "8".to_string(),
                "6".to_string(),
                "30".to_string(),
                "60".to_string(),
                "85".to_string(),
                "20".to_string(),
                "6".to_string(),
                RiskProfile::Moderate,
            ),
        };

    format!(
        r#"<div class="section-card">
<h2>Retirement Projection</h2>
<form id="projection-form" method="post" action="/report">
  <div class="row">
{initial_investment}{monthly_investment}{increment_field}{desired_income}  </div>
  <div class="row">
{return_rate_field}{inflation_field}{tax_field}  </div>
  <div class="row">
{current_age_field}{retirement_age_field}{life_field}  </div>
  <div class="row">
{risk_field}{emergency_field}  </div>
  <button class="btn btn-primary" type="submit">Calculate Projection</button>
</form>
</div>
{script}"#,
        initial_investment = currency_input("initial_investment", "Initial Investment (₹)", initial),
        monthly_investment =
            currency_input("initial_monthly_investment", "Monthly Investment (₹)", monthly),
        increment_field = currency_input("increment", "Yearly Increment (₹)", increment),
        desired_income =
            currency_input("desired_monthly_income", "Desired Monthly Income (₹)", desired),
        return_rate_field = number_input("return_rate", "Expected Return (%)", &return_rate, "0.1"),
        inflation_field = number_input("inflation_rate", "Inflation Rate (%)", &inflation_rate, "0.1"),
        tax_field = number_input("tax_bracket", "Tax Bracket (%)", &tax, "1"),
        current_age_field = number_input("current_age", "Current Age", &current_age, "1"),
        retirement_age_field = number_input("retirement_age", "Retirement Age", &retirement_age, "1"),
        life_field = number_input("life_expectancy", "Life Expectancy", &life, "1"),
        risk_field = risk_select(risk),
        emergency_field =
            number_input("emergency_fund_months", "Emergency Fund (months)", &emergency, "1"),
        script = FORM_SCRIPT,
    )
}
