use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local};
use clap::{Parser, Subcommand};

use crate::{
    content::{extract_signals, PageSnapshot},
    events::{TabEvent, Trigger},
    manager::TabManager,
    models::{Category, Tab},
    notify::LogNotifier,
    scheduler::AutomationScheduler,
    store::SqliteStore,
    tabs::JsonTabProvider,
};

#[derive(Parser)]
#[command(name = "tabwarden")]
#[command(
    about = "Sort open tabs into priority, time-sink, research and zombie buckets",
    long_about = None
)]
#[command(version)]
pub(crate) struct Cli {
    /// SQLite file holding rules, activity and preferences
    #[arg(long, default_value = "tabwarden.db")]
    pub(crate) db: PathBuf,
    /// JSON array of open tabs (`[{"id":1,"url":"...","title":"...","active":false}]`)
    #[arg(long, default_value = "tabs.json")]
    pub(crate) tabs: PathBuf,
    /// Evaluate as of this RFC 3339 instant instead of now
    #[arg(long, global = true)]
    pub(crate) at: Option<String>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Seed default values for every storage key.
    Init,

    /// Classify every open tab.
    Classify {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Explain the classification of one page, optionally with its saved HTML.
    Explain {
        url: String,
        #[arg(long)]
        title: Option<String>,
        /// Saved page markup used for content signals
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Teach a manual re-categorization.
    Feedback {
        url: String,
        #[arg(short, long)]
        category: Category,
        #[arg(long)]
        title: Option<String>,
    },

    /// Close every tab in a category.
    Close { category: Category },

    /// Archive then close every research tab.
    Archive,

    /// Run the weekly zombie sweep now.
    Sweep,

    /// Recompute this week's statistics.
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Totals, oldest tab and nudges.
    Report {
        #[arg(long)]
        json: bool,
    },

    /// Forget rules, learned patterns and activity.
    Reset,

    /// Feed a tab lifecycle event to the tracker.
    Event {
        #[command(subcommand)]
        event: EventCommand,
    },

    /// Show or change user preferences.
    Prefs {
        #[arg(long)]
        use_work_hours: Option<bool>,
        #[arg(long)]
        treat_shopping_as_useless: Option<bool>,
        #[arg(long)]
        auto_close_zombies: Option<bool>,
        #[arg(long)]
        auto_archive_research: Option<bool>,
    },

    /// Run the automation scheduler until interrupted.
    Watch,
}

#[derive(Subcommand)]
pub(crate) enum EventCommand {
    Activated {
        tab_id: i64,
    },
    Navigated {
        tab_id: i64,
        url: String,
        #[arg(long)]
        title: Option<String>,
    },
    Closed {
        tab_id: i64,
    },
    Alarm {
        /// `weeklyZombieCleanup` or `dailyAnalyticsUpdate`
        name: Trigger,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(execute(cli))
}

async fn execute(cli: Cli) -> Result<()> {
    let store = Arc::new(SqliteStore::open(cli.db.clone())?);
    let provider = Arc::new(JsonTabProvider::new(cli.tabs.clone()));
    let manager = Arc::new(TabManager::new(store, provider, Arc::new(LogNotifier)));
    let now = resolve_now(cli.at.as_deref())?;

    match cli.command {
        Command::Init => {
            let seeded = manager.initialize().await?;
            if seeded.is_empty() {
                println!("already initialized");
            } else {
                println!("seeded: {}", seeded.join(", "));
            }
        }
        Command::Classify { json } => {
            let tabs = manager.classify_all(now).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tabs)?);
            } else {
                for category in Category::ALL {
                    let bucket = tabs.get(category);
                    println!("{category} ({})", bucket.len());
                    for tab in bucket {
                        println!("  [{}] {} {}", tab.id, tab.title_or_empty(), tab.url);
                    }
                }
            }
        }
        Command::Explain { url, title, html } => {
            let title = title.unwrap_or_default();
            let signals = match html {
                Some(path) => {
                    let markup = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    Some(extract_signals(&title, &url, &PageSnapshot::from_html(&markup)))
                }
                None => None,
            };
            let tab = Tab::new(0, url, title);
            let classification = manager.classify_tab(&tab, signals.as_ref(), now).await?;
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
        Command::Feedback {
            url,
            category,
            title,
        } => {
            let outcome = manager
                .record_feedback(&url, title.as_deref(), category)
                .await?;
            println!("{} -> {}", outcome.domain_pattern, outcome.category);
        }
        Command::Close { category } => {
            let closed = manager.close_by_category(category, now).await?;
            println!("closed {closed} {category} tabs");
        }
        Command::Archive => {
            let outcome = manager.archive_by_category(Category::Research, now).await?;
            println!("archived {}, closed {}", outcome.archived, outcome.closed);
        }
        Command::Sweep => {
            let outcome = manager.on_weekly_zombie_sweep(now).await?;
            if outcome.ran {
                println!(
                    "closed {} zombies, archived {} research tabs",
                    outcome.zombies_closed, outcome.research.archived
                );
            } else {
                println!("autoCloseZombies is off; nothing done");
            }
        }
        Command::Stats { json } => {
            let summary = manager.on_daily_stats_refresh(now).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("week of {}", summary.week);
                for category in Category::ALL {
                    println!(
                        "  {category}: {} min",
                        summary.totals.get(category) / 60_000
                    );
                }
            }
        }
        Command::Report { json } => {
            let report = manager.report(now).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("total tabs: {}", report.total_tabs);
                for (category, count) in &report.counts {
                    println!("  {category}: {count}");
                }
                if let Some(oldest) = &report.oldest_tab {
                    println!(
                        "oldest: \"{}\" ({} days)",
                        oldest.title,
                        oldest.days_since_access.floor()
                    );
                }
                println!(
                    "active this week: {} min",
                    report.active_time_this_week_ms / 60_000
                );
                for nudge in &report.nudges {
                    println!("! {}", nudge.message());
                }
            }
        }
        Command::Reset => {
            manager.reset_learning().await?;
            println!("learning data cleared");
        }
        Command::Event { event } => {
            let event = match event {
                EventCommand::Activated { tab_id } => TabEvent::Activated { tab_id },
                EventCommand::Navigated { tab_id, url, title } => {
                    TabEvent::Navigated { tab_id, url, title }
                }
                EventCommand::Closed { tab_id } => TabEvent::Closed { tab_id },
                EventCommand::Alarm { name } => TabEvent::Alarm(name),
            };
            manager.dispatch(event, now).await?;
        }
        Command::Prefs {
            use_work_hours,
            treat_shopping_as_useless,
            auto_close_zombies,
            auto_archive_research,
        } => {
            let mut prefs = manager.preferences().await?;
            let before = prefs.clone();
            if let Some(value) = use_work_hours {
                prefs.use_work_hours = value;
            }
            if let Some(value) = treat_shopping_as_useless {
                prefs.treat_shopping_as_useless = value;
            }
            if let Some(value) = auto_close_zombies {
                prefs.auto_close_zombies = value;
            }
            if let Some(value) = auto_archive_research {
                prefs.auto_archive_research = value;
            }
            if prefs != before {
                manager.set_preferences(prefs.clone()).await?;
            }
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        Command::Watch => {
            manager.initialize().await?;
            let mut scheduler = AutomationScheduler::new();
            scheduler.start(Arc::clone(&manager))?;
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for ctrl-c")?;
            scheduler.stop().await?;
        }
    }

    Ok(())
}

fn resolve_now(at: Option<&str>) -> Result<DateTime<FixedOffset>> {
    match at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("invalid --at timestamp '{raw}'")),
        None => Ok(Local::now().fixed_offset()),
    }
}
