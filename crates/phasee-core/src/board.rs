//! In-memory idea board: the list of ideas plus the current date selection.
//!
//! Every mutation goes through a method here so the pending/scheduled
//! lifecycle stays consistent:
//!
//! `pending(no date)` -> `pending(proposed)` -> `scheduled(assigned)`
//! -> `pending(proposed = last assigned)` on edit -> `scheduled` | deleted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fallback::{fallback_draft, seed_from_id};
use crate::ideas::{Idea, IdeaDraft, IdeaState, Platform};
use crate::plans::PlanKey;
use crate::profile::BrandProfile;
use crate::scheduling::{choose_acceptance_date, DateSelection};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("no idea with id '{0}'")]
    UnknownIdea(String),

    #[error("id prefix '{0}' matches more than one idea")]
    AmbiguousId(String),
}

/// Dates and idea count for one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationBatch {
    pub source_dates: Vec<NaiveDate>,
    pub count: usize,
}

impl GenerationBatch {
    pub const MAX_IDEAS: usize = 10;

    /// One idea per selected date (capped), or a single idea for `today`.
    #[must_use]
    pub fn plan(selection: &DateSelection, today: NaiveDate) -> Self {
        let source_dates = if selection.is_empty() {
            vec![today]
        } else {
            selection.to_vec()
        };
        let count = source_dates.len().clamp(1, Self::MAX_IDEAS);
        Self {
            source_dates,
            count,
        }
    }

    /// Batch for regenerating a single idea around its proposed date.
    #[must_use]
    pub fn single(date: NaiveDate) -> Self {
        Self {
            source_dates: vec![date],
            count: 1,
        }
    }

    /// Turn generated drafts into exactly `count` pending ideas.
    ///
    /// Drafts are spread round-robin over the source dates. Extra drafts are
    /// dropped and missing ones are filled with local fallback drafts.
    pub fn into_ideas<F>(
        &self,
        drafts: Vec<IdeaDraft>,
        platform: Platform,
        profile: &BrandProfile,
        notes: &str,
        mut next_id: F,
    ) -> Vec<Idea>
    where
        F: FnMut() -> String,
    {
        let supplied = drafts.len();
        let mut drafts = drafts.into_iter();
        let ideas: Vec<Idea> = (0..self.count)
            .map(|idx| {
                let id = next_id();
                let draft = drafts
                    .next()
                    .unwrap_or_else(|| fallback_draft(profile, notes, &seed_from_id(&id)));
                let proposed = self.source_dates.get(idx % self.source_dates.len().max(1));
                Idea::pending(id, draft, platform, proposed.copied())
            })
            .collect();

        if supplied < self.count {
            tracing::warn!(
                requested = self.count,
                supplied,
                "generation returned too few ideas; filled with local fallbacks"
            );
        }
        ideas
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaBoard {
    ideas: Vec<Idea>,
    selection: DateSelection,
}

impl IdeaBoard {
    #[must_use]
    pub fn new(ideas: Vec<Idea>, selection: DateSelection) -> Self {
        Self { ideas, selection }
    }

    #[must_use]
    pub fn ideas(&self) -> &[Idea] {
        &self.ideas
    }

    #[must_use]
    pub fn selection(&self) -> &DateSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut DateSelection {
        &mut self.selection
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Idea>, DateSelection) {
        (self.ideas, self.selection)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Idea> {
        self.ideas.iter().find(|i| i.id == id)
    }

    /// Resolve a full id or a unique id prefix.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownIdea`] if nothing matches and
    /// [`BoardError::AmbiguousId`] if a prefix matches several ideas.
    pub fn resolve_id(&self, prefix: &str) -> Result<String, BoardError> {
        if let Some(exact) = self.get(prefix) {
            return Ok(exact.id.clone());
        }
        let mut matches = self.ideas.iter().filter(|i| i.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Ok(only.id.clone()),
            (Some(_), Some(_)) => Err(BoardError::AmbiguousId(prefix.to_string())),
            (None, _) => Err(BoardError::UnknownIdea(prefix.to_string())),
        }
    }

    /// Append freshly generated ideas.
    pub fn extend(&mut self, ideas: impl IntoIterator<Item = Idea>) {
        self.ideas.extend(ideas);
    }

    /// Pin an idea to a date without accepting it. Several ideas may share a date.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownIdea`] if the id is not on the board.
    pub fn assign(&mut self, id: &str, date: NaiveDate) -> Result<&Idea, BoardError> {
        let idea = self.find_mut(id)?;
        idea.assigned_date = Some(date);
        Ok(idea)
    }

    /// Accept an idea, placing it with [`choose_acceptance_date`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownIdea`] if the id is not on the board.
    pub fn accept(&mut self, id: &str, today: NaiveDate) -> Result<&Idea, BoardError> {
        let date = choose_acceptance_date(&self.ideas, &self.selection, id, today)
            .ok_or_else(|| BoardError::UnknownIdea(id.to_string()))?;
        let idea = self.find_mut(id)?;
        idea.assigned_date = Some(date);
        idea.accepted = true;
        Ok(idea)
    }

    /// Move a scheduled idea back to pending, remembering its date as the proposal.
    ///
    /// The assigned date is kept, so re-accepting restores the same date.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownIdea`] if the id is not on the board.
    pub fn unaccept(&mut self, id: &str) -> Result<&Idea, BoardError> {
        let idea = self.find_mut(id)?;
        idea.accepted = false;
        if idea.assigned_date.is_some() {
            idea.proposed_date = idea.assigned_date;
        }
        Ok(idea)
    }

    /// Remove an idea permanently.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownIdea`] if the id is not on the board.
    pub fn delete(&mut self, id: &str) -> Result<Idea, BoardError> {
        let pos = self
            .ideas
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| BoardError::UnknownIdea(id.to_string()))?;
        Ok(self.ideas.remove(pos))
    }

    /// Swap in regenerated content for an idea, keeping id, platform and dates.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownIdea`] if the id is not on the board.
    pub fn replace_content(&mut self, id: &str, draft: IdeaDraft) -> Result<&Idea, BoardError> {
        let idea = self.find_mut(id)?;
        idea.replace_content(draft);
        Ok(idea)
    }

    /// Unaccepted ideas whose assigned or proposed date is selected.
    #[must_use]
    pub fn pending_for_selection(&self) -> Vec<&Idea> {
        self.ideas
            .iter()
            .filter(|i| !i.accepted)
            .filter(|i| {
                i.assigned_date.is_some_and(|d| self.selection.contains(d))
                    || i.proposed_date.is_some_and(|d| self.selection.contains(d))
            })
            .collect()
    }

    /// Every pending idea, regardless of the selection.
    #[must_use]
    pub fn pending(&self) -> Vec<&Idea> {
        self.ideas.iter().filter(|i| !i.accepted).collect()
    }

    #[must_use]
    pub fn scheduled_on(&self, date: NaiveDate) -> Vec<&Idea> {
        self.ideas
            .iter()
            .filter(|i| i.is_scheduled_on(date))
            .collect()
    }

    /// Scheduled ideas ordered by date; ideas on the same date keep board order.
    #[must_use]
    pub fn scheduled(&self) -> Vec<&Idea> {
        let mut scheduled: Vec<(NaiveDate, &Idea)> = self
            .ideas
            .iter()
            .filter_map(|i| match i.state() {
                IdeaState::Scheduled(date) => Some((date, i)),
                IdeaState::Pending(_) => None,
            })
            .collect();
        scheduled.sort_by_key(|(date, _)| *date);
        scheduled.into_iter().map(|(_, i)| i).collect()
    }

    #[must_use]
    pub fn has_scheduled_for_selection(&self) -> bool {
        self.selection
            .iter()
            .any(|date| self.ideas.iter().any(|i| i.is_scheduled_on(date)))
    }

    /// Number of scheduled ideas per date.
    #[must_use]
    pub fn scheduled_counts(&self) -> BTreeMap<NaiveDate, usize> {
        let mut counts = BTreeMap::new();
        for idea in &self.ideas {
            if let IdeaState::Scheduled(date) = idea.state() {
                *counts.entry(date).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Distinct dates that have at least one idea pinned to them.
    #[must_use]
    pub fn assigned_unique_dates(&self) -> usize {
        let mut dates: Vec<NaiveDate> =
            self.ideas.iter().filter_map(|i| i.assigned_date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates.len()
    }

    #[must_use]
    pub fn remaining_days(&self, plan: PlanKey) -> usize {
        plan.idea_allowance().saturating_sub(self.assigned_unique_dates())
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Idea, BoardError> {
        self.ideas
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| BoardError::UnknownIdea(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn today() -> NaiveDate {
        date("2024-05-20")
    }

    fn draft(tag: &str) -> IdeaDraft {
        IdeaDraft {
            visual: format!("visual {tag}"),
            copy: format!("copy {tag}"),
            why: format!("why {tag}"),
        }
    }

    fn ids() -> impl FnMut() -> String {
        let mut n = 0;
        move || {
            n += 1;
            format!("idea{n:02}")
        }
    }

    fn bakery() -> BrandProfile {
        BrandProfile {
            industry: "Bakery".to_string(),
            tone: "Playful".to_string(),
            ..BrandProfile::default()
        }
    }

    fn board_with(dates: &[&str], drafts: Vec<IdeaDraft>) -> IdeaBoard {
        let selection: DateSelection = dates.iter().map(|d| date(d)).collect();
        let batch = GenerationBatch::plan(&selection, today());
        let ideas = batch.into_ideas(drafts, Platform::Instagram, &bakery(), "", ids());
        IdeaBoard::new(ideas, selection)
    }

    #[test]
    fn plan_uses_today_when_nothing_selected() {
        let batch = GenerationBatch::plan(&DateSelection::new(), today());
        assert_eq!(batch.source_dates, vec![today()]);
        assert_eq!(batch.count, 1);
    }

    #[test]
    fn plan_caps_count_at_ten() {
        let selection: DateSelection = (1..=14)
            .map(|d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap())
            .collect();
        let batch = GenerationBatch::plan(&selection, today());
        assert_eq!(batch.count, GenerationBatch::MAX_IDEAS);
        assert_eq!(batch.source_dates.len(), 14);
    }

    #[test]
    fn two_dates_two_ideas_each_date_used_once() {
        let board = board_with(&["2024-06-01", "2024-06-02"], vec![draft("a"), draft("b")]);
        let proposed: Vec<_> = board.ideas().iter().map(|i| i.proposed_date).collect();
        assert_eq!(
            proposed,
            vec![Some(date("2024-06-01")), Some(date("2024-06-02"))]
        );
        assert!(board.ideas().iter().all(|i| !i.accepted));
    }

    #[test]
    fn failed_generation_fabricates_full_batch() {
        let board = board_with(&["2024-06-01", "2024-06-02"], vec![]);
        assert_eq!(board.ideas().len(), 2);
        assert!(board.ideas()[0].copy.starts_with("Copy: Bakery • Playful"));
        assert_eq!(board.ideas()[1].proposed_date, Some(date("2024-06-02")));
    }

    #[test]
    fn surplus_drafts_are_dropped_and_shortfall_filled() {
        let over = board_with(&["2024-06-01"], vec![draft("a"), draft("b"), draft("c")]);
        assert_eq!(over.ideas().len(), 1);
        assert_eq!(over.ideas()[0].visual, "visual a");

        let under = board_with(&["2024-06-01", "2024-06-02", "2024-06-03"], vec![draft("a")]);
        assert_eq!(under.ideas().len(), 3);
        assert_eq!(under.ideas()[0].visual, "visual a");
        assert!(under.ideas()[2].visual.starts_with("Visual: asset"));
    }

    #[test]
    fn accept_lands_on_free_date_when_proposed_is_taken() {
        let mut board = board_with(&["2024-06-01", "2024-06-02"], vec![draft("a"), draft("b")]);
        board.assign("idea02", date("2024-06-01")).unwrap();
        board.accept("idea02", today()).unwrap();

        let accepted = board.accept("idea01", today()).unwrap();
        assert_eq!(accepted.assigned_date, Some(date("2024-06-02")));
        assert!(accepted.accepted);
    }

    #[test]
    fn accepting_every_idea_avoids_collisions_while_dates_are_free() {
        let mut board = board_with(
            &["2024-06-01", "2024-06-02", "2024-06-03"],
            vec![draft("a"), draft("b"), draft("c")],
        );
        for id in ["idea03", "idea01", "idea02"] {
            board.accept(id, today()).unwrap();
        }
        let counts = board.scheduled_counts();
        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&n| n == 1));
    }

    #[test]
    fn edit_then_reaccept_restores_previous_date() {
        let mut board = board_with(&["2024-06-01", "2024-06-02"], vec![draft("a"), draft("b")]);
        let first = board.accept("idea02", today()).unwrap().assigned_date;

        let edited = board.unaccept("idea02").unwrap();
        assert!(!edited.accepted);
        assert_eq!(edited.assigned_date, first);
        assert_eq!(edited.proposed_date, first);

        board.selection_mut().clear();
        let again = board.accept("idea02", today()).unwrap();
        assert_eq!(again.assigned_date, first);
    }

    #[test]
    fn edit_then_reaccept_with_same_selection_restores_date() {
        let mut board = board_with(&["2024-06-01", "2024-06-02"], vec![draft("a"), draft("b")]);
        board.assign("idea01", date("2024-06-02")).unwrap();
        board.accept("idea01", today()).unwrap();
        board.unaccept("idea01").unwrap();
        let again = board.accept("idea01", today()).unwrap();
        assert_eq!(again.assigned_date, Some(date("2024-06-02")));
    }

    #[test]
    fn edit_then_reaccept_keeps_date_outside_selection() {
        let mut board = board_with(&["2024-06-01", "2024-06-02"], vec![draft("a"), draft("b")]);
        board.assign("idea01", date("2024-06-05")).unwrap();
        let first = board.accept("idea01", today()).unwrap().assigned_date;
        assert_eq!(first, Some(date("2024-06-05")));

        let edited = board.unaccept("idea01").unwrap();
        assert_eq!(edited.assigned_date, Some(date("2024-06-05")));
        assert_eq!(edited.state(), IdeaState::Pending(Some(date("2024-06-05"))));
        assert!(board.scheduled_on(date("2024-06-05")).is_empty());

        let again = board.accept("idea01", today()).unwrap();
        assert_eq!(again.assigned_date, first);
    }

    #[test]
    fn delete_removes_from_every_view() {
        let mut board = board_with(&["2024-06-01", "2024-06-02"], vec![draft("a"), draft("b")]);
        board.accept("idea01", today()).unwrap();

        board.delete("idea01").unwrap();
        board.delete("idea02").unwrap();

        assert!(board.scheduled().is_empty());
        assert!(board.pending_for_selection().is_empty());
        assert!(board.get("idea01").is_none());
        assert_eq!(
            board.delete("idea01"),
            Err(BoardError::UnknownIdea("idea01".to_string()))
        );
    }

    #[test]
    fn replace_content_preserves_dates_and_platform() {
        let mut board = board_with(&["2024-06-01"], vec![draft("a")]);
        let idea = board.replace_content("idea01", draft("fresh")).unwrap();
        assert_eq!(idea.visual, "visual fresh");
        assert_eq!(idea.why, "why fresh");
        assert_eq!(idea.platform, Platform::Instagram);
        assert_eq!(idea.proposed_date, Some(date("2024-06-01")));
    }

    #[test]
    fn pending_for_selection_tracks_selected_dates() {
        let mut board = board_with(&["2024-06-01", "2024-06-02"], vec![draft("a"), draft("b")]);
        assert_eq!(board.pending_for_selection().len(), 2);

        board.selection_mut().toggle(date("2024-06-02"));
        let pending = board.pending_for_selection();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "idea01");
        assert_eq!(board.pending().len(), 2);
    }

    #[test]
    fn has_scheduled_for_selection_reflects_acceptance() {
        let mut board = board_with(&["2024-06-01"], vec![draft("a")]);
        assert!(!board.has_scheduled_for_selection());
        board.accept("idea01", today()).unwrap();
        assert!(board.has_scheduled_for_selection());
    }

    #[test]
    fn remaining_days_counts_distinct_assigned_dates() {
        let mut board = board_with(&["2024-06-01", "2024-06-02"], vec![draft("a"), draft("b")]);
        board.assign("idea01", date("2024-06-01")).unwrap();
        board.assign("idea02", date("2024-06-01")).unwrap();
        assert_eq!(board.remaining_days(PlanKey::Free3), 2);
        board.assign("idea02", date("2024-06-02")).unwrap();
        assert_eq!(board.remaining_days(PlanKey::Free3), 1);
    }

    #[test]
    fn resolve_id_accepts_unique_prefix() {
        let board = board_with(&["2024-06-01", "2024-06-02"], vec![draft("a"), draft("b")]);
        assert_eq!(board.resolve_id("idea01").unwrap(), "idea01");
        assert_eq!(
            board.resolve_id("idea0"),
            Err(BoardError::AmbiguousId("idea0".to_string()))
        );
        assert_eq!(
            board.resolve_id("nope"),
            Err(BoardError::UnknownIdea("nope".to_string()))
        );
    }
}
