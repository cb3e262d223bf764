//! Console executive summary.

use std::path::Path;

use ledger::Summary;

const RULE_WIDTH: usize = 55;

pub fn render(summary: &Summary, output: &Path) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let period = match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => format!("{first} -> {last}"),
        _ => "no movements".to_string(),
    };

    let mut lines = vec![
        String::new(),
        rule.clone(),
        "  TREASURY EXECUTIVE SUMMARY".to_string(),
        format!("  Period: {period}"),
        rule.clone(),
        format!("  Operations         : {}", summary.operations),
        format!("  Operating days     : {}", summary.operating_days),
    ];
    for totals in &summary.currencies {
        let code = totals.currency.code();
        let amount = |value| totals.currency.format(value);
        lines.push(String::new());
        lines.push(format!("  [{code}] Inflow      : {:>24}", amount(totals.inflow_total)));
        lines.push(format!("  [{code}] Outflow     : {:>24}", amount(totals.outflow_total)));
        lines.push(format!("  [{code}] Net flow    : {:>24}", amount(totals.net_flow)));
    }
    lines.extend([
        String::new(),
        format!(
            "  Liquidity alerts   : {} day(s) with negative {} flow",
            summary.alerts, summary.alert_currency
        ),
        rule.clone(),
        format!("  Report written to  : {}", output.display()),
        rule,
    ]);
    lines.join("\n")
}
