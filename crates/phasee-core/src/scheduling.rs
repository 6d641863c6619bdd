//! Placement of ideas onto calendar dates.
//!
//! Acceptance is a greedy, per-call decision: it avoids colliding with dates
//! already held by other accepted ideas when the selection still has a free
//! date, and never rebalances ideas that are already scheduled.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ideas::Idea;

/// The set of calendar dates the user currently has selected, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateSelection(BTreeSet<NaiveDate>);

impl DateSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a date in or out of the selection. Returns `true` if it is now selected.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.0.remove(&date) {
            false
        } else {
            self.0.insert(date);
            true
        }
    }

    pub fn insert(&mut self, date: NaiveDate) {
        self.0.insert(date);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn first(&self) -> Option<NaiveDate> {
        self.0.first().copied()
    }

    /// Selected dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<NaiveDate> {
        self.iter().collect()
    }
}

impl FromIterator<NaiveDate> for DateSelection {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Decide which date the idea `target_id` lands on when it is accepted.
///
/// Returns `None` when no idea with that id exists. The rules, in order:
///
/// 1. An idea that already has an assigned date keeps it.
/// 2. With an empty selection, the idea's proposed date is used, or `today`.
/// 3. The proposed date wins if it is selected and not held by another
///    accepted idea.
/// 4. Otherwise the earliest selected date not held by another accepted idea.
/// 5. Otherwise the earliest selected date, sharing it with other ideas.
#[must_use]
pub fn choose_acceptance_date(
    ideas: &[Idea],
    selection: &DateSelection,
    target_id: &str,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let idea = ideas.iter().find(|i| i.id == target_id)?;

    if let Some(assigned) = idea.assigned_date {
        return Some(assigned);
    }

    let Some(first_selected) = selection.first() else {
        return Some(idea.proposed_date.unwrap_or(today));
    };

    let used = dates_held_by_others(ideas, target_id);

    if let Some(proposed) = idea.proposed_date {
        if selection.contains(proposed) && !used.contains(&proposed) {
            return Some(proposed);
        }
    }

    Some(
        selection
            .iter()
            .find(|date| !used.contains(date))
            .unwrap_or(first_selected),
    )
}

/// Dates occupied by accepted ideas other than `exclude_id`.
fn dates_held_by_others(ideas: &[Idea], exclude_id: &str) -> HashSet<NaiveDate> {
    ideas
        .iter()
        .filter(|i| i.id != exclude_id && i.accepted)
        .filter_map(|i| i.assigned_date)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ideas::{IdeaDraft, Platform};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn idea(id: &str, proposed: Option<&str>) -> Idea {
        Idea::pending(
            id,
            IdeaDraft {
                visual: format!("visual {id}"),
                copy: format!("copy {id}"),
                why: String::new(),
            },
            Platform::Instagram,
            proposed.map(date),
        )
    }

    fn scheduled(id: &str, on: &str) -> Idea {
        let mut i = idea(id, Some(on));
        i.assigned_date = Some(date(on));
        i.accepted = true;
        i
    }

    fn selection(dates: &[&str]) -> DateSelection {
        dates.iter().map(|d| date(d)).collect()
    }

    const TODAY: &str = "2024-05-20";

    #[test]
    fn unknown_idea_yields_none() {
        let ideas = vec![idea("a", None)];
        assert_eq!(
            choose_acceptance_date(&ideas, &DateSelection::new(), "zzz", date(TODAY)),
            None
        );
    }

    #[test]
    fn existing_assignment_is_kept_even_when_occupied() {
        let mut target = idea("a", Some("2024-06-01"));
        target.assigned_date = Some(date("2024-06-05"));
        let ideas = vec![target, scheduled("b", "2024-06-05")];
        let sel = selection(&["2024-06-01", "2024-06-02"]);
        assert_eq!(
            choose_acceptance_date(&ideas, &sel, "a", date(TODAY)),
            Some(date("2024-06-05"))
        );
    }

    #[test]
    fn empty_selection_uses_proposed_date_then_today() {
        let ideas = vec![idea("a", Some("2024-06-09")), idea("b", None)];
        let empty = DateSelection::new();
        assert_eq!(
            choose_acceptance_date(&ideas, &empty, "a", date(TODAY)),
            Some(date("2024-06-09"))
        );
        assert_eq!(
            choose_acceptance_date(&ideas, &empty, "b", date(TODAY)),
            Some(date(TODAY))
        );
    }

    #[test]
    fn free_proposed_date_in_selection_is_preferred() {
        let ideas = vec![idea("a", Some("2024-06-02")), scheduled("b", "2024-06-03")];
        let sel = selection(&["2024-06-01", "2024-06-02", "2024-06-03"]);
        assert_eq!(
            choose_acceptance_date(&ideas, &sel, "a", date(TODAY)),
            Some(date("2024-06-02"))
        );
    }

    #[test]
    fn occupied_proposed_date_moves_to_free_selected_date() {
        let ideas = vec![idea("a", Some("2024-06-01")), scheduled("b", "2024-06-01")];
        let sel = selection(&["2024-06-01", "2024-06-02"]);
        assert_eq!(
            choose_acceptance_date(&ideas, &sel, "a", date(TODAY)),
            Some(date("2024-06-02"))
        );
    }

    #[test]
    fn proposed_date_outside_selection_is_ignored() {
        let ideas = vec![idea("a", Some("2024-07-15"))];
        let sel = selection(&["2024-06-04", "2024-06-02"]);
        assert_eq!(
            choose_acceptance_date(&ideas, &sel, "a", date(TODAY)),
            Some(date("2024-06-02"))
        );
    }

    #[test]
    fn collision_only_when_every_selected_date_is_taken() {
        let ideas = vec![
            idea("a", Some("2024-06-02")),
            scheduled("b", "2024-06-01"),
            scheduled("c", "2024-06-02"),
        ];
        let sel = selection(&["2024-06-02", "2024-06-01"]);
        assert_eq!(
            choose_acceptance_date(&ideas, &sel, "a", date(TODAY)),
            Some(date("2024-06-01"))
        );
    }

    #[test]
    fn pending_ideas_with_dates_do_not_block() {
        let mut other = idea("b", Some("2024-06-01"));
        other.assigned_date = Some(date("2024-06-01"));
        let ideas = vec![idea("a", Some("2024-06-01")), other];
        let sel = selection(&["2024-06-01", "2024-06-02"]);
        assert_eq!(
            choose_acceptance_date(&ideas, &sel, "a", date(TODAY)),
            Some(date("2024-06-01"))
        );
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut sel = DateSelection::new();
        assert!(sel.toggle(date("2024-06-01")));
        assert!(sel.contains(date("2024-06-01")));
        assert!(!sel.toggle(date("2024-06-01")));
        assert!(sel.is_empty());
    }

    #[test]
    fn selection_iterates_sorted() {
        let sel = selection(&["2024-06-03", "2024-06-01", "2024-06-02"]);
        assert_eq!(
            sel.to_vec(),
            vec![date("2024-06-01"), date("2024-06-02"), date("2024-06-03")]
        );
    }
}
