mod api_client;
mod planner;
mod render;

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use phasee_core::calendar::MonthView;
use phasee_core::export::{render_schedule, schedule_mailto};
use phasee_core::{BrandProfile, FileStorage, LocalRepository, PlanKey, Platform, SessionStorage};
use phasee_generate::Complexity;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::api_client::{AccountUpdate, ApiClient, Registration};
use crate::planner::{GenerateOptions, Planner};

#[derive(Debug, Parser)]
#[command(name = "phasee")]
#[command(about = "Phasee social-media content planner")]
struct Cli {
    /// Base URL of the phasee API server
    #[arg(
        long,
        global = true,
        env = "PHASEE_API_URL",
        default_value = "http://localhost:8787"
    )]
    api_url: String,

    /// Directory holding local planner state
    #[arg(long, global = true, env = "PHASEE_STATE_DIR", default_value = ".phasee")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check that the API server and its database are reachable
    Health,
    /// Register, log in and manage the account
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
    /// Edit the brand profile used for generation
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Choose a subscription plan
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Manage the calendar date selection
    Dates {
        #[command(subcommand)]
        command: DatesCommands,
    },
    /// Generate ideas for the selected dates
    Generate {
        /// Free-text notes passed to the generator
        #[arg(long, default_value = "")]
        notes: String,

        /// Platform assigned to the new ideas
        #[arg(long, default_value = "instagram")]
        platform: Platform,

        /// Ask for a coherent campaign across the dates (d30 plan only)
        #[arg(long)]
        campaign: bool,
    },
    /// Review and schedule ideas
    Ideas {
        #[command(subcommand)]
        command: IdeasCommands,
    },
    /// Print scheduled posts for the selected dates
    Schedule {
        /// Print a mailto: link instead of the plain text
        #[arg(long)]
        mailto: bool,
    },
    /// Print a month grid with selected dates and scheduled counts
    Calendar {
        /// Month to show as YYYY-MM (defaults to the current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<NaiveDate>,
    },
    /// Per-user settings stored on the server
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Debug, Subcommand)]
enum AccountCommands {
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the logged-in account as stored on the server
    Show,
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum ProfileCommands {
    /// Update profile fields; unspecified fields keep their current value
    Set(ProfileArgs),
    Show,
    /// Replace the local profile with the one saved on the server
    Pull,
}

#[derive(Debug, Clone, Default, Args)]
struct ProfileArgs {
    #[arg(long)]
    brand_name: Option<String>,
    #[arg(long)]
    year_founded: Option<String>,
    #[arg(long)]
    industry: Option<String>,
    #[arg(long)]
    audience: Option<String>,
    #[arg(long)]
    tone: Option<String>,
    #[arg(long)]
    has_photography: Option<bool>,
    #[arg(long)]
    has_video: Option<bool>,
    #[arg(long)]
    has_design: Option<bool>,
    #[arg(long)]
    company_description: Option<String>,
    #[arg(long)]
    brand_culture: Option<String>,
    #[arg(long)]
    content_goals: Option<String>,
}

impl ProfileArgs {
    fn apply(self, profile: &mut BrandProfile) {
        let text_fields = [
            (self.brand_name, &mut profile.brand_name),
            (self.year_founded, &mut profile.year_founded),
            (self.industry, &mut profile.industry),
            (self.audience, &mut profile.audience),
            (self.tone, &mut profile.tone),
        ];
        for (value, field) in text_fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        let flags = [
            (self.has_photography, &mut profile.has_photography),
            (self.has_video, &mut profile.has_video),
            (self.has_design, &mut profile.has_design),
        ];
        for (value, field) in flags {
            if let Some(value) = value {
                *field = value;
            }
        }
        let optional = [
            (self.company_description, &mut profile.company_description),
            (self.brand_culture, &mut profile.brand_culture),
            (self.content_goals, &mut profile.content_goals),
        ];
        for (value, field) in optional {
            if let Some(value) = value {
                *field = Some(value).filter(|v| !v.trim().is_empty());
            }
        }
    }
}

#[derive(Debug, Subcommand)]
enum PlanCommands {
    Select { plan: PlanKey },
    Show,
}

#[derive(Debug, Subcommand)]
enum DatesCommands {
    /// Add dates to the selection
    Select {
        #[arg(required = true, value_parser = parse_date)]
        dates: Vec<NaiveDate>,
    },
    /// Flip each date in or out of the selection
    Toggle {
        #[arg(required = true, value_parser = parse_date)]
        dates: Vec<NaiveDate>,
    },
    Clear,
    Show,
}

#[derive(Debug, Subcommand)]
enum IdeasCommands {
    List {
        /// Include pending ideas outside the date selection
        #[arg(long)]
        all: bool,
    },
    /// Pin an idea to a date without scheduling it
    Assign {
        id: String,
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    Accept {
        id: String,
    },
    /// Move a scheduled idea back to pending for editing
    Unaccept {
        id: String,
    },
    Delete {
        id: String,
    },
    /// Replace an idea with a freshly generated one
    Regenerate {
        id: String,
        #[arg(long)]
        complexity: Option<Complexity>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Ask for improved visual direction, copy and hashtags
    Optimize {
        id: String,
        /// Write the suggested visual and copy back to the idea
        #[arg(long)]
        apply: bool,
    },
    /// List accepted ideas stored on the server
    Remote {
        /// List every user's ideas instead of only the logged-in user's
        #[arg(long)]
        everyone: bool,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsCommands {
    /// Store a setting; the value is parsed as JSON or kept as a string
    Set { key: String, value: String },
    List,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    phasee_core::parse_iso_date(raw).map_err(|e| e.to_string())
}

fn parse_month(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| format!("invalid month '{raw}', expected YYYY-MM"))
}

fn setting_value(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("phasee: run `phasee --help` to list commands");
        return Ok(());
    };

    let repo = LocalRepository::new(FileStorage::new(&cli.state_dir));
    let api = ApiClient::new(&cli.api_url)?;
    let mut planner = Planner::new(repo, api, Local::now().date_naive());
    run(&mut planner, command).await
}

async fn run<S: SessionStorage>(planner: &mut Planner<S>, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Health => {
            let health = planner.api().health().await?;
            println!(
                "ok={} database={} at {}",
                health.ok, health.database, health.timestamp
            );
        }
        Commands::Account { command } => run_account(planner, command).await?,
        Commands::Profile { command } => run_profile(planner, command).await?,
        Commands::Plan { command } => run_plan(planner, command)?,
        Commands::Dates { command } => run_dates(planner, command)?,
        Commands::Generate {
            notes,
            platform,
            campaign,
        } => {
            let ideas = planner
                .generate(&GenerateOptions {
                    notes,
                    platform,
                    campaign,
                })
                .await?;
            println!("added {} ideas", ideas.len());
            for idea in &ideas {
                println!("{}", render::idea_block(idea));
            }
        }
        Commands::Ideas { command } => run_ideas(planner, command).await?,
        Commands::Schedule { mailto } => {
            let board = planner.board()?;
            if mailto {
                println!("{}", schedule_mailto(&board));
            } else {
                println!("{}", render_schedule(&board));
            }
        }
        Commands::Calendar { month } => {
            let board = planner.board()?;
            let view = MonthView::containing(month.unwrap_or(planner.today()));
            println!("{}", render::calendar_grid(&view, &board));
        }
        Commands::Settings { command } => run_settings(planner, command).await?,
    }
    Ok(())
}

async fn run_account<S: SessionStorage>(
    planner: &mut Planner<S>,
    command: AccountCommands,
) -> anyhow::Result<()> {
    match command {
        AccountCommands::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let reply = planner
                .register(&Registration {
                    email,
                    password,
                    first_name,
                    last_name,
                })
                .await?;
            println!("{}: logged in as {} ({})", reply.message, reply.user.email, reply.user.id);
        }
        AccountCommands::Login { email, password } => {
            let reply = planner.login(&email, &password).await?;
            println!("{}: {} ({})", reply.message, reply.user.email, reply.user.id);
        }
        AccountCommands::Logout => {
            planner.logout()?;
            println!("logged out");
        }
        AccountCommands::Show => {
            let user = planner.current_user()?;
            let account = planner.api().get_user(&user.id).await?;
            println!("{} {} <{}>", account.first_name, account.last_name, account.email);
            println!("id:         {}", account.id);
            println!("created:    {}", account.created_at);
            match account.last_login_at {
                Some(at) => println!("last login: {at}"),
                None => println!("last login: never"),
            }
        }
        AccountCommands::Update {
            first_name,
            last_name,
            email,
        } => {
            let user = planner.current_user()?;
            let message = planner
                .api()
                .update_user(
                    &user.id,
                    &AccountUpdate {
                        first_name,
                        last_name,
                        email,
                    },
                )
                .await?;
            println!("{message}");
        }
    }
    Ok(())
}

async fn run_profile<S: SessionStorage>(
    planner: &mut Planner<S>,
    command: ProfileCommands,
) -> anyhow::Result<()> {
    match command {
        ProfileCommands::Set(args) => {
            let mut profile = planner.repo().profile()?;
            args.apply(&mut profile);
            match planner.save_profile(&profile).await? {
                Some(profile_id) => println!("profile saved (server id {profile_id})"),
                None => println!("profile saved locally"),
            }
        }
        ProfileCommands::Show => {
            let profile = planner.repo().profile()?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileCommands::Pull => {
            let profile = planner.pull_profile().await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }
    Ok(())
}

fn run_plan<S: SessionStorage>(
    planner: &mut Planner<S>,
    command: PlanCommands,
) -> anyhow::Result<()> {
    match command {
        PlanCommands::Select { plan } => {
            planner.select_plan(plan)?;
            println!(
                "plan {plan} selected ({} idea days)",
                plan.idea_allowance()
            );
        }
        PlanCommands::Show => {
            let plan = planner.repo().plan()?;
            let chosen = planner.repo().has_selected_plan()?;
            let profile_done = planner.repo().has_completed_profile()?;
            let board = planner.board()?;
            println!(
                "plan {plan}{}",
                if chosen { "" } else { " (default)" }
            );
            println!(
                "idea days remaining: {} of {}",
                board.remaining_days(plan),
                plan.idea_allowance()
            );
            println!("campaigns: {}", if plan.allows_campaigns() { "yes" } else { "no" });
            println!("profile completed: {}", if profile_done { "yes" } else { "no" });
        }
    }
    Ok(())
}

fn run_dates<S: SessionStorage>(
    planner: &mut Planner<S>,
    command: DatesCommands,
) -> anyhow::Result<()> {
    let selected = match command {
        DatesCommands::Select { dates } => planner.select_dates(&dates)?,
        DatesCommands::Toggle { dates } => planner.toggle_dates(&dates)?,
        DatesCommands::Clear => {
            planner.clear_dates()?;
            Vec::new()
        }
        DatesCommands::Show => planner.repo().load_selection()?.to_vec(),
    };
    if selected.is_empty() {
        println!("no dates selected");
    } else {
        let labels: Vec<String> = selected.into_iter().map(render::describe_date).collect();
        println!("selected: {}", labels.join(", "));
    }
    Ok(())
}

async fn run_ideas<S: SessionStorage>(
    planner: &mut Planner<S>,
    command: IdeasCommands,
) -> anyhow::Result<()> {
    match command {
        IdeasCommands::List { all } => {
            let board = planner.board()?;
            println!("{}", render::board_listing(&board, all));
        }
        IdeasCommands::Assign { id, date } => {
            let idea = planner.assign(&id, date)?;
            println!("{}", render::idea_block(&idea));
        }
        IdeasCommands::Accept { id } => {
            let idea = planner.accept(&id).await?;
            println!("{}", render::idea_block(&idea));
        }
        IdeasCommands::Unaccept { id } => {
            let idea = planner.unaccept(&id).await?;
            println!("{}", render::idea_block(&idea));
        }
        IdeasCommands::Delete { id } => {
            let idea = planner.delete(&id)?;
            println!("deleted {}", idea.id);
        }
        IdeasCommands::Regenerate {
            id,
            complexity,
            notes,
        } => {
            let idea = planner.regenerate(&id, complexity, &notes).await?;
            println!("{}", render::idea_block(&idea));
        }
        IdeasCommands::Optimize { id, apply } => {
            let suggestion = planner.optimize(&id, apply).await?;
            println!("visual:   {}", suggestion.visual);
            println!("copy:     {}", suggestion.copy);
            println!("hashtags: {}", suggestion.hashtags.join(" "));
            println!("why:      {}", suggestion.improvements);
            if apply {
                println!("applied to {id}");
            }
        }
        IdeasCommands::Remote { everyone } => {
            let user_id = if everyone {
                None
            } else {
                Some(planner.current_user()?.id)
            };
            let ideas = planner.api().list_ideas(user_id.as_deref()).await?;
            if ideas.is_empty() {
                println!("no accepted ideas on the server");
            }
            for idea in ideas {
                let date = idea
                    .assigned_date
                    .map_or_else(|| "unscheduled".to_string(), render::describe_date);
                let platform = idea.platform.as_deref().unwrap_or("-");
                println!("{date}  [{platform}] {}  ({})", idea.visual, idea.id);
                println!("    {}", idea.copy);
            }
        }
    }
    Ok(())
}

async fn run_settings<S: SessionStorage>(
    planner: &mut Planner<S>,
    command: SettingsCommands,
) -> anyhow::Result<()> {
    let user = planner.current_user()?;
    match command {
        SettingsCommands::Set { key, value } => {
            let message = planner
                .api()
                .save_setting(&user.id, &key, &setting_value(value))
                .await?;
            println!("{message}");
        }
        SettingsCommands::List => {
            let settings = planner.api().list_settings(&user.id).await?;
            for (key, value) in settings {
                println!("{key} = {value}");
            }
        }
    }
    Ok(())
}
