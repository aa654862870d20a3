use std::collections::HashMap;

use crate::dispatch::DispatchReport;
use crate::fetch::QuoteRecord;

/// Cap on individually listed failures; past this only counts matter.
const MAX_EXAMPLE_FAILURES: usize = 15;

/// Render the run summary the way the command-line tool prints it: one
/// headline, then a failure breakdown when anything went wrong.
pub fn render(report: &DispatchReport) -> String {
    let total = report.successes.len() + report.failures.len();
    let mut lines = vec![format!(
        "Done after {:.1} seconds: {}/{} requests succeeded with avg price ${:.2}",
        report.elapsed.as_secs_f64(),
        report.successes.len(),
        total,
        average_value(&report.successes),
    )];

    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Analysing the {} requests that failed...",
            report.failures.len()
        ));
        lines.push("Frequency of Error Types".to_string());
        lines.push("------------------------".to_string());
        for (note, count) in failure_frequencies(&report.failures) {
            lines.push(format!(
                "{:5} {:4.0}% {:>24}",
                count,
                100.0 * count as f64 / report.failures.len() as f64,
                note
            ));
        }
        lines.push("Example errors".to_string());
        lines.push("--------------".to_string());
        for record in report.failures.iter().take(MAX_EXAMPLE_FAILURES) {
            lines.push(format!("{} {}", record.symbol, record.note));
        }
        if report.failures.len() > MAX_EXAMPLE_FAILURES {
            lines.push("...".to_string());
        }
    }

    lines.join("\n")
}

fn average_value(successes: &[QuoteRecord]) -> f64 {
    if successes.is_empty() {
        return 0.0;
    }
    successes.iter().map(|r| r.value).sum::<f64>() / successes.len() as f64
}

/// Failure note to occurrence count, most frequent first, ties broken by
/// note for stable output.
pub fn failure_frequencies(failures: &[QuoteRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in failures {
        *counts.entry(record.note.as_str()).or_default() += 1;
    }

    let mut rows: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(note, count)| (note.to_string(), count))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}
