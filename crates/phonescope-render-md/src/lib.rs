//! Markdown table rendering for phonescope query results.
//!
//! Converts record tables, per-group counts and metrics, arg-min picks,
//! and batched summaries into copy-ready Markdown. The output is
//! intentionally low-magic: a header row, a separator, data rows. No
//! chart or display library involved.

use phonescope_aggregate::{GroupKey, GroupSummary};
use phonescope_schema::{Field, Record};

/// Placeholder emitted when a table has no rows.
const EMPTY_TABLE: &str = "_no rows_\n";

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v:.2}")
    }
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

fn push_header(out: &mut String, cells: &[String]) {
    push_row(out, cells);
    out.push('|');
    for _ in cells {
        out.push_str(" --- |");
    }
    out.push('\n');
}

/// Render selected columns of a record subset.
pub fn record_table(rows: &[Record], columns: &[Field]) -> String {
    if rows.is_empty() {
        return EMPTY_TABLE.to_string();
    }
    let mut out = String::new();
    push_header(
        &mut out,
        &columns.iter().map(ToString::to_string).collect::<Vec<_>>(),
    );
    for row in rows {
        let cells: Vec<String> = columns.iter().map(|f| f.value(row).to_string()).collect();
        push_row(&mut out, &cells);
    }
    out
}

/// Render per-group row counts.
pub fn count_table(key_fields: &[Field], counts: &[(GroupKey, usize)]) -> String {
    if counts.is_empty() {
        return EMPTY_TABLE.to_string();
    }
    let mut out = String::new();
    let mut header: Vec<String> = key_fields.iter().map(ToString::to_string).collect();
    header.push("count".to_string());
    push_header(&mut out, &header);
    for (key, n) in counts {
        let mut cells: Vec<String> = key.iter().map(ToString::to_string).collect();
        cells.push(n.to_string());
        push_row(&mut out, &cells);
    }
    out
}

/// Render one numeric metric per group under the given column label.
pub fn metric_table(
    key_fields: &[Field],
    rows: &[(GroupKey, f64)],
    metric_label: &str,
) -> String {
    if rows.is_empty() {
        return EMPTY_TABLE.to_string();
    }
    let mut out = String::new();
    let mut header: Vec<String> = key_fields.iter().map(ToString::to_string).collect();
    header.push(metric_label.to_string());
    push_header(&mut out, &header);
    for (key, value) in rows {
        let mut cells: Vec<String> = key.iter().map(ToString::to_string).collect();
        cells.push(fmt_num(*value));
        push_row(&mut out, &cells);
    }
    out
}

/// Render arg-min/arg-max picks: group key, the picked model, and the
/// metric value that won.
pub fn picks_table(
    key_fields: &[Field],
    picks: &[(GroupKey, &Record)],
    metric: Field,
) -> String {
    if picks.is_empty() {
        return EMPTY_TABLE.to_string();
    }
    let mut out = String::new();
    let mut header: Vec<String> = key_fields.iter().map(ToString::to_string).collect();
    header.push("model_name".to_string());
    header.push(metric.to_string());
    push_header(&mut out, &header);
    for (key, record) in picks {
        let mut cells: Vec<String> = key.iter().map(ToString::to_string).collect();
        cells.push(record.model_name.clone());
        cells.push(metric.value(record).to_string());
        push_row(&mut out, &cells);
    }
    out
}

/// Render batched summaries with the max − min spread derived per row.
pub fn summary_table(key_fields: &[Field], summaries: &[GroupSummary]) -> String {
    if summaries.is_empty() {
        return EMPTY_TABLE.to_string();
    }
    let mut out = String::new();
    let mut header: Vec<String> = key_fields.iter().map(ToString::to_string).collect();
    for label in ["count", "mean", "median", "min", "max", "spread"] {
        header.push(label.to_string());
    }
    push_header(&mut out, &header);
    for s in summaries {
        let mut cells: Vec<String> = s.key.iter().map(ToString::to_string).collect();
        cells.push(s.count.to_string());
        cells.push(fmt_num(s.mean));
        cells.push(fmt_num(s.median));
        cells.push(fmt_num(s.min));
        cells.push(fmt_num(s.max));
        cells.push(fmt_num(s.max - s.min));
        push_row(&mut out, &cells);
    }
    out
}
