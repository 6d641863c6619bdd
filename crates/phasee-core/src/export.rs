//! Plain-text schedule export for sharing or email.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::board::IdeaBoard;
use crate::calendar::format_mdy;
use crate::ideas::Platform;

pub const EMPTY_SCHEDULE: &str = "No scheduled posts in selection.";
pub const SCHEDULE_SUBJECT: &str = "Scheduled Posts";

/// Render scheduled ideas on the selected dates, grouped per date then platform.
///
/// Platform groups appear in the order their first idea appears on the board.
#[must_use]
pub fn render_schedule(board: &IdeaBoard) -> String {
    let mut lines: Vec<String> = Vec::new();

    for date in board.selection().iter() {
        let day_items = board.scheduled_on(date);
        if day_items.is_empty() {
            continue;
        }
        lines.push(format_mdy(date));

        let mut by_platform: Vec<(Platform, Vec<&str>)> = Vec::new();
        for idea in day_items {
            match by_platform.iter_mut().find(|(p, _)| *p == idea.platform) {
                Some((_, visuals)) => visuals.push(idea.visual.as_str()),
                None => by_platform.push((idea.platform, vec![idea.visual.as_str()])),
            }
        }
        for (platform, visuals) in by_platform {
            for visual in visuals {
                lines.push(format!("- [{platform}] {visual}"));
            }
        }
        lines.push(String::new());
    }

    if lines.is_empty() {
        EMPTY_SCHEDULE.to_string()
    } else {
        lines.join("\n")
    }
}

/// Build a `mailto:` link carrying the rendered schedule.
#[must_use]
pub fn schedule_mailto(board: &IdeaBoard) -> String {
    let body = render_schedule(board);
    format!(
        "mailto:?subject={}&body={}",
        utf8_percent_encode(SCHEDULE_SUBJECT, NON_ALPHANUMERIC),
        utf8_percent_encode(&body, NON_ALPHANUMERIC)
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::ideas::{Idea, IdeaDraft};
    use crate::scheduling::DateSelection;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn scheduled(id: &str, on: &str, platform: Platform, visual: &str) -> Idea {
        let mut idea = Idea::pending(
            id,
            IdeaDraft {
                visual: visual.to_string(),
                copy: String::new(),
                why: String::new(),
            },
            platform,
            None,
        );
        idea.assigned_date = Some(date(on));
        idea.accepted = true;
        idea
    }

    fn board() -> IdeaBoard {
        IdeaBoard::new(
            vec![
                scheduled("a", "2024-06-02", Platform::X, "Poll graphic"),
                scheduled("b", "2024-06-01", Platform::Instagram, "Latte art close-up"),
                scheduled("c", "2024-06-01", Platform::Facebook, "Team photo"),
                scheduled("d", "2024-06-05", Platform::Facebook, "Not selected"),
            ],
            [date("2024-06-01"), date("2024-06-02"), date("2024-06-03")]
                .into_iter()
                .collect(),
        )
    }

    #[test]
    fn renders_selected_dates_grouped_by_platform() {
        let text = render_schedule(&board());
        assert_eq!(
            text,
            "6-1-2024\n- [instagram] Latte art close-up\n- [facebook] Team photo\n\n6-2-2024\n- [x] Poll graphic\n"
        );
    }

    #[test]
    fn platform_groups_keep_first_seen_order() {
        let board = IdeaBoard::new(
            vec![
                scheduled("a", "2024-06-01", Platform::X, "Poll"),
                scheduled("b", "2024-06-01", Platform::Facebook, "Album"),
                scheduled("c", "2024-06-01", Platform::X, "Thread"),
            ],
            [date("2024-06-01")].into_iter().collect(),
        );
        assert_eq!(
            render_schedule(&board),
            "6-1-2024\n- [x] Poll\n- [x] Thread\n- [facebook] Album\n"
        );
    }

    #[test]
    fn empty_selection_renders_placeholder() {
        let board = IdeaBoard::new(board().ideas().to_vec(), DateSelection::new());
        assert_eq!(render_schedule(&board), EMPTY_SCHEDULE);
    }

    #[test]
    fn mailto_percent_encodes_subject_and_body() {
        let link = schedule_mailto(&board());
        assert!(link.starts_with("mailto:?subject=Scheduled%20Posts&body=6%2D1%2D2024%0A"));
        assert!(!link.contains(' '));
    }
}
