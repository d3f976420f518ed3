//! # Breakdown Rendering
//!
//! Text and JSON views of a [`BillingBreakdown`]. Both carry the content
//! digest, so a printed quote can be matched against a stored one.

use anyhow::Result;
use serde_json::json;

use landfee_core::{format_currency, BillingBreakdown, Decimal, LineKind};

use crate::OutputFormat;

const LABEL_WIDTH: usize = 58;

/// Render a breakdown in the requested format.
pub fn render(
    breakdown: &BillingBreakdown,
    tax_rate: Decimal,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => render_text(breakdown, tax_rate),
        OutputFormat::Json => render_json(breakdown),
    }
}

/// Human-readable table of lines, internal adjustments and totals.
pub fn render_text(breakdown: &BillingBreakdown, tax_rate: Decimal) -> Result<String> {
    let money = |amount: Decimal| format_currency(amount, breakdown.currency);
    let mut out = String::new();

    for item in &breakdown.items {
        let label = match item.kind {
            LineKind::Charge => item.description.clone(),
            LineKind::Component => format!("  incl. {}", item.description),
        };
        out.push_str(&row(&label, &money(item.amount)));
        if let (Some(quantity), Some(unit_price)) = (item.quantity, item.unit_price) {
            out.push_str(&format!("    {quantity} x {}\n", money(unit_price)));
        }
    }

    if !breakdown.adjustments.is_empty() {
        out.push_str("Not itemized to customer:\n");
        for adjustment in &breakdown.adjustments {
            out.push_str(&row(
                &format!("  {}", adjustment.description),
                &money(adjustment.amount),
            ));
        }
    }

    out.push_str(&row("Subtotal", &money(breakdown.subtotal)));
    let tax_label = if breakdown.taxable {
        format!("Tax ({}%)", (tax_rate * Decimal::ONE_HUNDRED).normalize())
    } else {
        "Tax (exempt)".to_string()
    };
    out.push_str(&row(&tax_label, &money(breakdown.tax)));
    out.push_str(&row("Total", &money(breakdown.total)));
    out.push_str(&format!("digest {}\n", breakdown.digest()?));
    Ok(out)
}

/// The breakdown and its digest as pretty-printed JSON.
pub fn render_json(breakdown: &BillingBreakdown) -> Result<String> {
    let value = json!({
        "breakdown": breakdown,
        "digest": breakdown.digest()?.to_string(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn row(label: &str, amount: &str) -> String {
    format!("{label:<width$} {amount:>18}\n", width = LABEL_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use landfee_tariff::{SurveyFeeRequest, SurveyKind, TariffSchedule, ZoneKey};
    use rust_decimal_macros::dec;

    fn breakdown(kind: SurveyKind) -> BillingBreakdown {
        let request = SurveyFeeRequest::new(ZoneKey::new("A").unwrap(), dec!(500), kind);
        TariffSchedule::builtin()
            .calculate_survey_fee(&request)
            .unwrap()
    }

    #[test]
    fn text_lists_lines_adjustments_and_totals() {
        let text = render_text(&breakdown(SurveyKind::Standard), dec!(0.13)).unwrap();
        assert!(text.contains("Standard survey, Zone A (Prime Island)"));
        assert!(text.contains("₦1,575,000.00"));
        assert!(text.contains("Not itemized to customer:"));
        assert!(text.contains("₦456,750.00"));
        assert!(text.contains("Tax (13%)"));
        assert!(text.contains("₦2,318,478.00"));
        assert!(text.contains("digest sha256:"));
    }

    #[test]
    fn exempt_breakdown_says_so() {
        let text = render_text(&breakdown(SurveyKind::PlanFiling), dec!(0.13)).unwrap();
        assert!(text.contains("Tax (exempt)"));
    }

    #[test]
    fn json_round_trips_breakdown() {
        let b = breakdown(SurveyKind::Details);
        let json = render_json(&b).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let parsed: BillingBreakdown =
            serde_json::from_value(value["breakdown"].clone()).unwrap();
        assert_eq!(parsed, b);
        assert_eq!(
            value["digest"].as_str().unwrap(),
            b.digest().unwrap().to_string()
        );
    }
}
