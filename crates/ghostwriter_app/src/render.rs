//! Plain-text rendering of view models.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDateTime};
use ghostwriter_core::{
    ActionOutcome, ActionRowView, ArticleView, DetailView, ListView, MetricsView, Pagination,
    Record,
};

const TEXT_WIDTH: usize = 48;

pub fn render_list(view: &ListView) -> String {
    let mut out = String::new();
    let total = view
        .total
        .map_or_else(|| "?".to_string(), |total| total.to_string());
    let _ = write!(out, "{} ({} total)", view.kind, total);
    if !view.query.filters().is_empty() {
        let filters: Vec<String> = view
            .query
            .filters()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        let _ = write!(out, " [{}]", filters.join(", "));
    }
    if view.loading {
        out.push_str(" loading...");
    }
    out.push('\n');

    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
        if view.stale {
            out.push_str("showing previous results\n");
        }
    }

    if view.rows.is_empty() {
        out.push_str("  (no records)\n");
    }
    for row in &view.rows {
        let _ = writeln!(out, "  {}", render_record(row));
    }
    if view.kind.is_paginated() {
        let _ = writeln!(out, "{}", render_pager(&view.pagination));
    }
    out
}

fn render_record(record: &Record) -> String {
    match record {
        Record::Content(doc) => format!(
            "{:<24} {:<10} {:<16} {}",
            doc.id.as_deref().unwrap_or("-"),
            doc.status.as_deref().unwrap_or("-"),
            doc.date_crawled.as_deref().map_or_else(|| "-".to_string(), format_timestamp),
            truncate(doc.title.as_deref().unwrap_or(&doc.url), TEXT_WIDTH),
        ),
        Record::Log(log) => format!(
            "{:<16} {:<7} {:<10} {}",
            format_timestamp(&log.timestamp),
            log.level.as_str(),
            log.source.as_deref().unwrap_or("-"),
            truncate(&log.message, TEXT_WIDTH),
        ),
        Record::Crawler(crawler) => format!(
            "{:<24} {:<20} {:<8} {:<10} {}",
            crawler.id,
            crawler.name.as_deref().unwrap_or("-"),
            if crawler.enabled { "enabled" } else { "disabled" },
            crawler.status.as_deref().unwrap_or("-"),
            crawler
                .last_run
                .as_deref()
                .map_or_else(|| "never".to_string(), format_timestamp),
        ),
        Record::Task(task) => format!(
            "{:<24} {:<12} {:<24} {:>4.0}% {}",
            task.task_id,
            task.task_type,
            task.content_id,
            task.progress * 100.0,
            task.status.as_deref().unwrap_or("-"),
        ),
    }
}

pub fn render_pager(pagination: &Pagination) -> String {
    let prev = if pagination.prev_enabled { "< prev" } else { "  ----" };
    let next = if pagination.next_enabled { "next >" } else { "----  " };
    format!(
        "{prev}  page {} of {}  {next}",
        pagination.current, pagination.page_count
    )
}

pub fn render_metrics(view: &MetricsView) -> String {
    let mut out = String::new();
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
    }
    match &view.metrics {
        Some(metrics) => {
            let _ = writeln!(out, "active crawlers:      {}", metrics.active_crawlers);
            let _ = writeln!(out, "urls processed:       {}", metrics.urls_processed);
            let _ = writeln!(out, "avg processing time:  {}", metrics.average_processing_time);
            for (date, processed) in metrics
                .daily_stats
                .dates
                .iter()
                .zip(&metrics.daily_stats.processed)
            {
                let _ = writeln!(out, "  {date:<12} {processed}");
            }
        }
        None if view.loading => out.push_str("loading metrics...\n"),
        None => out.push_str("no metrics\n"),
    }
    out
}

pub fn render_detail(view: &DetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "document {}", view.id);
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
    }
    let Some(detail) = &view.detail else {
        if view.loading {
            out.push_str("loading...\n");
        }
        return out;
    };
    let doc = &detail.record;
    let _ = writeln!(out, "url:      {}", doc.url);
    if let Some(title) = &doc.title {
        let _ = writeln!(out, "title:    {title}");
    }
    let _ = writeln!(out, "status:   {}", doc.status.as_deref().unwrap_or("-"));
    if let Some(crawled) = &doc.date_crawled {
        let _ = writeln!(out, "crawled:  {}", format_timestamp(crawled));
    }
    if !doc.tags.is_empty() {
        let _ = writeln!(out, "tags:     {}", doc.tags.join(", "));
    }
    if let Some(summary) = &detail.summary {
        let _ = writeln!(out, "\n{summary}");
    }
    for (label, payload) in [
        ("classifications", &detail.classifications),
        ("processed content", &detail.processed_content),
        ("raw content", &detail.raw_content),
    ] {
        if let Some(payload) = payload {
            let _ = writeln!(out, "\n{label}:\n{payload:#}");
        }
    }
    out
}

pub fn render_action(row: &ActionRowView) -> String {
    let outcome = match &row.outcome {
        ActionOutcome::Pending => "pending".to_string(),
        ActionOutcome::Acknowledged => "ok".to_string(),
        ActionOutcome::Failed(reason) => format!("failed: {reason}"),
    };
    format!("{} {}: {}", row.action, row.target_id, outcome)
}

pub fn render_article(view: &ArticleView) -> String {
    let mut out = String::new();
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
    }
    if let Some(response) = &view.response {
        let _ = writeln!(out, "prompt:\n{}\n", response.agent_prompt);
        if !response.search_terms.is_empty() {
            let _ = writeln!(out, "search terms: {}", response.search_terms.join(", "));
        }
        let _ = writeln!(
            out,
            "date range:   {} .. {}",
            response.date_range.start, response.date_range.end
        );
    } else if view.submitting {
        out.push_str("generating...\n");
    }
    out
}

/// Render a backend timestamp as `YYYY-MM-DD HH:MM`. Unparseable input is
/// returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    const SHORT: &str = "%Y-%m-%d %H:%M";
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(SHORT).to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format(SHORT).to_string();
    }
    raw.to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
