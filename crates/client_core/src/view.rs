//! Presentation-ready view-models. Nothing here formats markup; renderers
//! decide how a tier or a bar looks.

use chrono::TimeZone;
use serde::Serialize;
use shared::domain::{BulletRequest, HistoryEntry, ScoredBullet};

use crate::history::HistoryLog;

pub const NO_RESULTS_MESSAGE: &str = "No bullet points generated.";
pub const EMPTY_HISTORY_MESSAGE: &str = "No previous bullets found...";
pub const NO_SELECTION_MESSAGE: &str = "Select a bullet from the list to view details";
pub const SUBMIT_FAILED_MESSAGE: &str = "Error generating bullet points. Please try again.";

const PREVIEW_CHARS: usize = 50;
const EXCELLENT_THRESHOLD: f64 = 0.9;
const GOOD_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Excellent,
    Good,
    Poor,
}

impl ScoreTier {
    pub fn for_score(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            Self::Excellent
        } else if score >= GOOD_THRESHOLD {
            Self::Good
        } else {
            Self::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredBulletView {
    pub text: String,
    pub tier: ScoreTier,
    /// Score as a whole percentage; drives the width of a score bar.
    pub percent: u32,
    pub score_label: String,
}

impl ScoredBulletView {
    pub fn from_bullet(item: &ScoredBullet) -> Self {
        Self {
            text: item.bullet.clone(),
            tier: ScoreTier::for_score(item.score),
            percent: score_percent(item.score),
            score_label: format!("{:.2}", item.score),
        }
    }

    pub fn percent_label(&self) -> String {
        format!("{}%", self.percent)
    }
}

fn score_percent(score: f64) -> u32 {
    let rounded = (score * 100.0).round();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else {
        rounded as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum ResultsView {
    Empty,
    Items(Vec<ScoredBulletView>),
}

impl ResultsView {
    pub fn from_bullets(bullets: &[ScoredBullet]) -> Self {
        if bullets.is_empty() {
            Self::Empty
        } else {
            Self::Items(bullets.iter().map(ScoredBulletView::from_bullet).collect())
        }
    }

    pub fn items(&self) -> &[ScoredBulletView] {
        match self {
            Self::Empty => &[],
            Self::Items(items) => items,
        }
    }
}

/// What the result pane shows after a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitView {
    Results { results: ResultsView },
    Error { message: String },
}

impl SubmitView {
    pub fn failed() -> Self {
        Self::Error {
            message: SUBMIT_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryListItemView {
    pub index: usize,
    pub preview: String,
    pub date: String,
    pub time: String,
    pub selected: bool,
}

impl HistoryListItemView {
    pub fn from_entry<Tz: TimeZone>(
        index: usize,
        entry: &HistoryEntry,
        selected: bool,
        tz: &Tz,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let local = entry.timestamp.with_timezone(tz);
        Self {
            index,
            preview: preview(&entry.input.accomplished),
            date: local.format("%Y-%m-%d").to_string(),
            time: local.format("%H:%M:%S").to_string(),
            selected,
        }
    }
}

pub fn history_list<Tz: TimeZone>(log: &HistoryLog, tz: &Tz) -> Vec<HistoryListItemView>
where
    Tz::Offset: std::fmt::Display,
{
    log.entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            HistoryListItemView::from_entry(index, entry, log.selected_index() == Some(index), tz)
        })
        .collect()
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let mut out: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryDetailView {
    pub input: Vec<InputField>,
    pub bullets: Vec<ScoredBulletView>,
}

impl HistoryDetailView {
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            input: input_fields(&entry.input),
            bullets: entry.output.iter().map(ScoredBulletView::from_bullet).collect(),
        }
    }
}

fn input_fields(input: &BulletRequest) -> Vec<InputField> {
    let mut fields = vec![
        InputField {
            label: "Accomplished",
            value: input.accomplished.clone(),
        },
        InputField {
            label: "Measured",
            value: input.measured.clone(),
        },
        InputField {
            label: "Task",
            value: input.task.clone(),
        },
    ];
    if let Some(keyword) = input.keyword.as_deref().filter(|k| !k.is_empty()) {
        fields.push(InputField {
            label: "Keyword",
            value: keyword.to_string(),
        });
    }
    fields
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
