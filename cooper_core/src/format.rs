//! Display helpers shared by the CLI.

use crate::{Locale, TestType};

/// Seconds as `m:ss`
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Distance in meters with locale thousands grouping
pub fn format_distance(meters: f64, locale: Locale) -> String {
    let (group, decimal) = match locale {
        Locale::PtBr => ('.', ','),
        Locale::En => (',', '.'),
    };

    let rounded = (meters * 10.0).round() / 10.0;
    let whole = rounded.trunc().abs() as u64;
    let tenths = ((rounded.abs() - whole as f64) * 10.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(group);
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    if tenths == 0 {
        format!("{}{} m", sign, grouped)
    } else {
        format!("{}{}{}{} m", sign, grouped, decimal, tenths)
    }
}

/// Up to two upper-case initials from a name
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

impl TestType {
    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (TestType::Cooper, Locale::PtBr) => "Teste de Cooper",
            (TestType::Performance, Locale::PtBr) => "Avaliação de Performance",
            (TestType::Cooper, Locale::En) => "Cooper Test",
            (TestType::Performance, Locale::En) => "Performance Evaluation",
        }
    }
}
