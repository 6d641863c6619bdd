//! Client-side planning commands.
//!
//! A [`Planner`] owns the local repository and the API client. Board
//! mutations are applied locally first and saved; server writes that follow
//! them are best-effort and only logged when they fail.

use anyhow::Context;
use chrono::NaiveDate;
use phasee_core::fallback::{fallback_draft, seed_from_id};
use phasee_core::{
    BrandProfile, GenerationBatch, Idea, IdeaBoard, LocalRepository, PlanKey, Platform,
    SessionStorage, User,
};
use phasee_generate::{Complexity, GenerationRequest, Optimization, OptimizeRequest};

use crate::api_client::{ApiClient, AuthReply, Registration};

pub struct Planner<S: SessionStorage> {
    repo: LocalRepository<S>,
    api: ApiClient,
    today: NaiveDate,
}

/// Options for a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub notes: String,
    pub platform: Platform,
    pub campaign: bool,
}

impl<S: SessionStorage> Planner<S> {
    pub fn new(repo: LocalRepository<S>, api: ApiClient, today: NaiveDate) -> Self {
        Self { repo, api, today }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn repo(&mut self) -> &mut LocalRepository<S> {
        &mut self.repo
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn require_user(&self) -> anyhow::Result<User> {
        self.repo
            .current_user()?
            .context("not logged in; run `phasee account login` first")
    }

    // -----------------------------------------------------------------------
    // Account
    // -----------------------------------------------------------------------

    /// Create the account and remember it as the current user.
    pub async fn register(&mut self, registration: &Registration) -> anyhow::Result<AuthReply> {
        let reply = self.api.register(registration).await?;
        self.repo.set_current_user(&reply.user)?;
        Ok(reply)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> anyhow::Result<AuthReply> {
        let reply = self.api.login(email, password).await?;
        self.repo.set_current_user(&reply.user)?;
        Ok(reply)
    }

    pub fn logout(&mut self) -> anyhow::Result<()> {
        self.repo.logout()?;
        Ok(())
    }

    pub fn current_user(&self) -> anyhow::Result<User> {
        self.require_user()
    }

    // -----------------------------------------------------------------------
    // Profile and plan
    // -----------------------------------------------------------------------

    /// Save the profile locally, mark onboarding complete, and push it to the
    /// server when logged in. Returns the server profile id if the push worked.
    pub async fn save_profile(&mut self, profile: &BrandProfile) -> anyhow::Result<Option<String>> {
        self.repo.save_profile(profile)?;
        self.repo.mark_profile_completed()?;

        let Some(user) = self.repo.current_user()? else {
            return Ok(None);
        };
        match self.api.save_brand_profile(&user.id, profile).await {
            Ok(saved) => Ok(Some(saved.profile_id)),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "brand profile saved locally only");
                Ok(None)
            }
        }
    }

    /// Replace the local profile with the one stored on the server.
    pub async fn pull_profile(&mut self) -> anyhow::Result<BrandProfile> {
        let user = self.require_user()?;
        let profile = self.api.get_brand_profile(&user.id).await?;
        self.repo.save_profile(&profile)?;
        self.repo.mark_profile_completed()?;
        Ok(profile)
    }

    pub fn select_plan(&mut self, plan: PlanKey) -> anyhow::Result<()> {
        self.repo.select_plan(plan)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Date selection
    // -----------------------------------------------------------------------

    /// Toggle each date; returns the dates that ended up selected.
    pub fn toggle_dates(&mut self, dates: &[NaiveDate]) -> anyhow::Result<Vec<NaiveDate>> {
        let mut selection = self.repo.load_selection()?;
        for date in dates {
            selection.toggle(*date);
        }
        self.repo.save_selection(&selection)?;
        Ok(selection.to_vec())
    }

    pub fn select_dates(&mut self, dates: &[NaiveDate]) -> anyhow::Result<Vec<NaiveDate>> {
        let mut selection = self.repo.load_selection()?;
        for date in dates {
            selection.insert(*date);
        }
        self.repo.save_selection(&selection)?;
        Ok(selection.to_vec())
    }

    pub fn clear_dates(&mut self) -> anyhow::Result<()> {
        let mut selection = self.repo.load_selection()?;
        selection.clear();
        self.repo.save_selection(&selection)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Ideas
    // -----------------------------------------------------------------------

    pub fn board(&mut self) -> anyhow::Result<IdeaBoard> {
        Ok(self.repo.load_board()?)
    }

    /// Generate one idea per selected date (or one for today) and add them as
    /// pending. A failed or short generation is filled with local fallbacks.
    pub async fn generate(&mut self, options: &GenerateOptions) -> anyhow::Result<Vec<Idea>> {
        let plan = self.repo.plan()?;
        if options.campaign && !plan.allows_campaigns() {
            anyhow::bail!("campaign generation requires the d30 plan (current plan: {plan})");
        }

        let mut board = self.repo.load_board()?;
        let profile = self.repo.profile()?;
        let batch = GenerationBatch::plan(board.selection(), self.today);

        let request = GenerationRequest {
            profile: profile.clone(),
            notes: options.notes.clone(),
            count: batch.count,
            campaign: options.campaign,
            source_dates: batch.source_dates.clone(),
            grounded: true,
            complexity: None,
        };
        let drafts = match self.api.generate(&request).await {
            Ok(drafts) => drafts,
            Err(e) => {
                tracing::warn!(error = %e, "generation failed; using local fallback ideas");
                Vec::new()
            }
        };

        let ideas = batch.into_ideas(drafts, options.platform, &profile, &options.notes, || {
            uuid::Uuid::new_v4().to_string()
        });
        board.extend(ideas.clone());
        self.repo.save_board(&board)?;
        Ok(ideas)
    }

    pub fn assign(&mut self, id_prefix: &str, date: NaiveDate) -> anyhow::Result<Idea> {
        let mut board = self.repo.load_board()?;
        let id = board.resolve_id(id_prefix)?;
        let idea = board.assign(&id, date)?.clone();
        self.repo.save_board(&board)?;
        Ok(idea)
    }

    /// Schedule an idea, then record it on the server.
    pub async fn accept(&mut self, id_prefix: &str) -> anyhow::Result<Idea> {
        let mut board = self.repo.load_board()?;
        let id = board.resolve_id(id_prefix)?;
        let idea = board.accept(&id, self.today)?.clone();
        self.repo.save_board(&board)?;
        self.push_idea(&idea).await?;
        Ok(idea)
    }

    /// Move a scheduled idea back to pending for editing.
    pub async fn unaccept(&mut self, id_prefix: &str) -> anyhow::Result<Idea> {
        let mut board = self.repo.load_board()?;
        let id = board.resolve_id(id_prefix)?;
        let idea = board.unaccept(&id)?.clone();
        self.repo.save_board(&board)?;
        self.push_idea(&idea).await?;
        Ok(idea)
    }

    pub fn delete(&mut self, id_prefix: &str) -> anyhow::Result<Idea> {
        let mut board = self.repo.load_board()?;
        let id = board.resolve_id(id_prefix)?;
        let removed = board.delete(&id)?;
        self.repo.save_board(&board)?;
        Ok(removed)
    }

    /// Replace an idea's content with a single freshly generated draft.
    pub async fn regenerate(
        &mut self,
        id_prefix: &str,
        complexity: Option<Complexity>,
        notes: &str,
    ) -> anyhow::Result<Idea> {
        let mut board = self.repo.load_board()?;
        let id = board.resolve_id(id_prefix)?;
        let Some(current) = board.get(&id) else {
            anyhow::bail!("no idea with id '{id}'");
        };
        let date = current
            .proposed_date
            .or(current.assigned_date)
            .unwrap_or(self.today);
        let batch = GenerationBatch::single(date);
        let profile = self.repo.profile()?;

        let request = GenerationRequest {
            profile: profile.clone(),
            notes: notes.to_string(),
            count: batch.count,
            campaign: false,
            source_dates: batch.source_dates,
            grounded: true,
            complexity,
        };
        let draft = match self.api.generate(&request).await {
            Ok(drafts) => drafts.into_iter().next(),
            Err(e) => {
                tracing::warn!(idea_id = %id, error = %e, "regeneration failed; using local fallback");
                None
            }
        }
        .unwrap_or_else(|| fallback_draft(&profile, notes, &seed_from_id(&id)));

        let idea = board.replace_content(&id, draft)?.clone();
        self.repo.save_board(&board)?;
        Ok(idea)
    }

    /// Ask for an improved version of an idea; `apply` writes it back.
    pub async fn optimize(&mut self, id_prefix: &str, apply: bool) -> anyhow::Result<Optimization> {
        let mut board = self.repo.load_board()?;
        let id = board.resolve_id(id_prefix)?;
        let Some(idea) = board.get(&id) else {
            anyhow::bail!("no idea with id '{id}'");
        };
        let request = OptimizeRequest {
            visual: idea.visual.clone(),
            copy: idea.copy.clone(),
            platform: Some(idea.platform),
            profile: Some(self.repo.profile()?),
        };
        let why = idea.why.clone();
        let optimization = self.api.optimize(&request).await?;

        if apply {
            board.replace_content(
                &id,
                phasee_core::IdeaDraft {
                    visual: optimization.visual.clone(),
                    copy: optimization.copy.clone(),
                    why,
                },
            )?;
            self.repo.save_board(&board)?;
        }
        Ok(optimization)
    }

    async fn push_idea(&self, idea: &Idea) -> anyhow::Result<()> {
        let user_id = self.repo.current_user()?.map(|u| u.id);
        if let Err(e) = self.api.save_idea(idea, user_id.as_deref()).await {
            tracing::warn!(idea_id = %idea.id, error = %e, "idea saved locally only");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
