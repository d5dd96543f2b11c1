use crate::data::aggregate::SummaryMetrics;

/// One metric card: heading and formatted value.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
}

/// The four cards, in display order.
pub fn metric_cards(m: &SummaryMetrics) -> [MetricCard; 4] {
    let avg = if m.total_customers == 0 {
        "No data".to_string()
    } else {
        format!("${}", thousands_f64(m.avg_charges, 2))
    };
    [
        MetricCard {
            title: "Total Customers",
            value: thousands(m.total_customers as u64),
        },
        MetricCard {
            title: "Average Charges",
            value: avg,
        },
        MetricCard {
            title: "Smoker Ratio",
            value: format!("{:.1}%", m.smoker_percentage),
        },
        MetricCard {
            title: "High Risk Customers",
            value: format!("{:.1}%", m.high_risk_percentage),
        },
    ]
}

/// `1234567` → `1,234,567`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Fixed-point with thousands separators in the integer part.
pub fn thousands_f64(v: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let grouped = int_part
        .parse::<u64>()
        .map(thousands)
        .unwrap_or_else(|_| int_part.to_string());
    let sign = if v < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
