//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use phasee_core::calendar::{ordinal_suffix, MonthView, WEEKDAYS};
use phasee_core::{Idea, IdeaBoard, IdeaState};

const SHORT_ID_LEN: usize = 8;
const CELL_WIDTH: usize = 7;

/// `June 1st`
pub fn describe_date(date: NaiveDate) -> String {
    let day = date.day();
    format!("{} {day}{}", date.format("%B"), ordinal_suffix(day))
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

pub fn idea_block(idea: &Idea) -> String {
    let state = match idea.state() {
        IdeaState::Scheduled(date) => format!("scheduled {}", describe_date(date)),
        IdeaState::Pending(Some(date)) => format!("pending {}", describe_date(date)),
        IdeaState::Pending(None) => "pending".to_string(),
    };
    let mut out = format!(
        "{}  [{}] {state}\n    visual: {}\n    copy:   {}",
        short_id(&idea.id),
        idea.platform,
        idea.visual,
        idea.copy
    );
    if !idea.why.is_empty() {
        let _ = write!(out, "\n    why:    {}", idea.why);
    }
    out
}

/// Pending ideas for the selection (or all pending with `all`), then the
/// scheduled ones in date order.
pub fn board_listing(board: &IdeaBoard, all: bool) -> String {
    let pending = if all || board.selection().is_empty() {
        board.pending()
    } else {
        board.pending_for_selection()
    };
    let scheduled = board.scheduled();

    let mut sections = Vec::new();
    if !pending.is_empty() {
        let body: Vec<String> = pending.into_iter().map(idea_block).collect();
        sections.push(format!("Pending\n{}", body.join("\n")));
    }
    if !scheduled.is_empty() {
        let body: Vec<String> = scheduled.into_iter().map(idea_block).collect();
        sections.push(format!("Scheduled\n{}", body.join("\n")));
    }
    if sections.is_empty() {
        "No ideas yet. Select dates and run `phasee generate`.".to_string()
    } else {
        sections.join("\n\n")
    }
}

/// Sunday-first month grid. Selected days carry `*`, scheduled counts `(n)`.
pub fn calendar_grid(month: &MonthView, board: &IdeaBoard) -> String {
    let counts = board.scheduled_counts();
    let mut cells: Vec<String> = (0..month.leading_blanks).map(|_| String::new()).collect();
    for day in &month.days {
        let mut cell = day.day().to_string();
        if board.selection().contains(*day) {
            cell.push('*');
        }
        if let Some(n) = counts.get(day) {
            let _ = write!(cell, "({n})");
        }
        cells.push(cell);
    }

    let mut out = month.label();
    out.push('\n');
    out.push_str(row(WEEKDAYS.iter().copied()).trim_end());
    for week in cells.chunks(7) {
        out.push('\n');
        out.push_str(row(week.iter().map(String::as_str)).trim_end());
    }
    out
}

fn row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    cells.map(|c| format!("{c:<CELL_WIDTH$}")).collect()
}
