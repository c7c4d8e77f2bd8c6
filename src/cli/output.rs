//! Output formatting for CLI

use crate::Summary;
use crate::services::catalog::Catalog;
use std::fmt::Write as _;

/// Errors shown in full before the rest are folded into a count.
const MAX_ERRORS_SHOWN: usize = 5;

fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format summary as human-readable text
#[must_use]
pub fn format_text(summary: &Summary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} -> {}", summary.source, summary.destination);
    let _ = writeln!(
        out,
        "Source: {}  Limit: {}",
        summary.kind, summary.limit
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<24} {:>12}", "Words", format_count(summary.words.len() as u64));
    let _ = writeln!(
        out,
        "{:<24} {:>12}",
        "Images written",
        format_count(summary.images_written())
    );
    let _ = writeln!(
        out,
        "{:<24} {:>12}",
        "Sidecars written",
        format_count(summary.sidecars_written())
    );

    let short = summary.short_words();
    if short > 0 {
        let _ = writeln!(
            out,
            "{:<24} {:>12}",
            "Words below limit",
            format_count(short as u64)
        );
    }

    if summary.cancelled {
        let _ = writeln!(out);
        let _ = writeln!(out, "Extraction was cancelled before the end of the source.");
    }

    if !summary.errors.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Errors encountered: {}", summary.errors.len());
        for error in summary.errors.iter().take(MAX_ERRORS_SHOWN) {
            let _ = writeln!(out, "  [{}] {}: {}", error.code, error.path, error.message);
        }
        if summary.errors.len() > MAX_ERRORS_SHOWN {
            let _ = writeln!(
                out,
                "  ... and {} more",
                summary.errors.len() - MAX_ERRORS_SHOWN
            );
        }
    }

    out
}

/// Format summary as JSON
#[must_use]
pub fn format_json(summary: &Summary) -> String {
    let output = serde_json::json!({
        "source": summary.source,
        "destination": summary.destination,
        "kind": summary.kind.as_str(),
        "limit": summary.limit.to_string(),
        "word_count": summary.words.len(),
        "images_written": summary.images_written(),
        "sidecars_written": summary.sidecars_written(),
        "words": summary.words,
        "cancelled": summary.cancelled,
        "error_count": summary.errors.len(),
        "errors": if summary.errors.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::json!(summary.errors)
        }
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Languages of the catalog grouped under their initial letter, one group per line.
#[must_use]
pub fn format_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Available languages ({}):", catalog.len());

    for (initial, languages) in catalog.grouped_by_initial() {
        let _ = writeln!(out, "  {}: {}", initial.to_ascii_uppercase(), languages.join(", "));
    }

    out
}
