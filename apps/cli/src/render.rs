//! Plain-text rendering of the client view-models.

use client_core::view::{
    HistoryDetailView, HistoryListItemView, ResultsView, ScoredBulletView, SubmitView,
    EMPTY_HISTORY_MESSAGE, NO_RESULTS_MESSAGE,
};

const BAR_WIDTH: usize = 20;

pub fn score_bar(percent: u32) -> String {
    let filled = ((percent.min(100) as usize) * BAR_WIDTH + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn bullet_lines(position: usize, item: &ScoredBulletView) -> Vec<String> {
    vec![
        format!("{position}. {}", item.text),
        format!(
            "   Score: {} {} ({}, {})",
            score_bar(item.percent),
            item.score_label,
            item.percent_label(),
            item.tier.label()
        ),
    ]
}

pub fn results_lines(results: &ResultsView) -> Vec<String> {
    match results {
        ResultsView::Empty => vec![NO_RESULTS_MESSAGE.to_string()],
        ResultsView::Items(items) => items
            .iter()
            .enumerate()
            .flat_map(|(i, item)| bullet_lines(i + 1, item))
            .collect(),
    }
}

pub fn submit_lines(view: &SubmitView) -> Vec<String> {
    match view {
        SubmitView::Results { results } => results_lines(results),
        SubmitView::Error { message } => vec![message.clone()],
    }
}

pub fn history_list_lines(rows: &[HistoryListItemView]) -> Vec<String> {
    if rows.is_empty() {
        return vec![EMPTY_HISTORY_MESSAGE.to_string()];
    }
    let width = rows.len().saturating_sub(1).to_string().len();
    rows.iter()
        .map(|row| {
            format!(
                "{} [{:>width$}] {}  ({} at {})",
                if row.selected { "*" } else { " " },
                row.index,
                row.preview,
                row.date,
                row.time,
                width = width
            )
        })
        .collect()
}

pub fn history_detail_lines(detail: &HistoryDetailView) -> Vec<String> {
    let mut lines = vec!["Input:".to_string()];
    for field in &detail.input {
        lines.push(format!("  {}: {}", field.label, field.value));
    }
    lines.push(String::new());
    lines.push("Generated Bullets:".to_string());
    lines.extend(
        detail
            .bullets
            .iter()
            .enumerate()
            .flat_map(|(i, item)| bullet_lines(i + 1, item)),
    );
    lines
}
