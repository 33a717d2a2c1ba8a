mod collaborators;
mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use app_shell::{AppShell, AppView, FilterPropertyLink, PropertyValue, Scene};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use session::{HttpSessionApi, SessionStore, SwitchOutcome};
use session_sdk::{FeatureFlags, Navigator, OrganizationId, SessionApi, TeamId};
use tokio_util::sync::CancellationToken;

use crate::collaborators::{ConsoleNavigator, log_collaborators};
use crate::config::AppConfig;

/// Console Shell - session bootstrap and application shell for the analytics console
#[derive(Parser)]
#[command(name = "console-shell")]
#[command(about = "Console Shell - session bootstrap and application shell for the analytics console")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend origin override (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and exit
    Check,
    /// Load the session and report what the console would show at a path
    Bootstrap(BootstrapArgs),
    /// Print the link that toggles a property filter
    FilterLink(FilterLinkArgs),
    /// Switch the active project
    SwitchTeam {
        team_id: TeamId,
        /// Where to land after the switch (default: `/`)
        #[arg(long)]
        destination: Option<String>,
    },
    /// Switch the active organization
    SwitchOrg {
        organization_id: OrganizationId,
        /// Where to land after the switch (default: `/`)
        #[arg(long)]
        destination: Option<String>,
    },
    /// Reset the analytics identity and leave through the logout endpoint
    Logout,
}

#[derive(Args)]
struct BootstrapArgs {
    /// Requested location
    #[arg(long, default_value = "/")]
    path: String,

    /// Feature flags as a JSON object; omitted flags wait for the timeout
    #[arg(long)]
    flags: Option<String>,

    /// Give up waiting for the app to become ready after this many milliseconds
    #[arg(long, default_value_t = 5_000)]
    wait_ms: u64,
}

#[derive(Args)]
struct FilterLinkArgs {
    /// Property key to toggle
    property: String,

    /// Property value to toggle
    value: String,

    /// Treat the value as a number
    #[arg(long)]
    numeric: bool,

    /// Current filters as a JSON object
    #[arg(long, default_value = "{}")]
    filters: String,

    /// Current path the link is relative to
    #[arg(long, default_value = "/events")]
    path: String,
}

#[derive(Serialize)]
struct BootstrapReport {
    requested: String,
    location: String,
    ready: bool,
    signed_in: bool,
    view: AppView,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML (if provided) -> 3) env (SHELL__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.base_url.as_deref());

    logging::init_logging(&config.logging, cli.verbose)?;

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => check_config(&config),
        Commands::Bootstrap(args) => bootstrap(&config, args).await,
        Commands::FilterLink(args) => filter_link(&args),
        Commands::SwitchTeam {
            team_id,
            destination,
        } => {
            let (store, navigator) = mount_session(&config).await?;
            let outcome = store.switch_team(team_id, destination.as_deref()).await?;
            report_switch(&outcome, navigator.as_ref());
            Ok(())
        }
        Commands::SwitchOrg {
            organization_id,
            destination,
        } => {
            let (store, navigator) = mount_session(&config).await?;
            let outcome = store
                .switch_organization(organization_id, destination.as_deref())
                .await?;
            report_switch(&outcome, navigator.as_ref());
            Ok(())
        }
        Commands::Logout => {
            let navigator = Arc::new(ConsoleNavigator::new("/"));
            let api: Arc<dyn SessionApi> = Arc::new(HttpSessionApi::new(&config.session)?);
            let store = SessionStore::new(
                api,
                log_collaborators(Arc::clone(&navigator)),
                &config.session,
            );
            store.logout();
            println!("{}", navigator.current_path());
            Ok(())
        }
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    HttpSessionApi::new(&config.session).context("session configuration is invalid")?;
    println!("Configuration is valid");
    println!("{}", config.to_json()?);
    Ok(())
}

async fn bootstrap(config: &AppConfig, args: BootstrapArgs) -> Result<()> {
    let navigator = Arc::new(ConsoleNavigator::new(&args.path));
    let api: Arc<dyn SessionApi> = Arc::new(HttpSessionApi::new(&config.session)?);
    let session = SessionStore::mount(
        Arc::clone(&api),
        log_collaborators(Arc::clone(&navigator)),
        &config.session,
    )
    .await;

    let shell = AppShell::mount(session, api, navigator.clone(), &config.shell);
    for scene in Scene::ALL {
        shell.mark_scene_loaded(scene);
    }
    if let Some(raw) = &args.flags {
        let flags: FeatureFlags =
            serde_json::from_str(raw).context("--flags must be a JSON object")?;
        shell.receive_feature_flags(flags);
    }

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(Arc::clone(&shell).watch(cancel.clone()));
    let mut views = shell.subscribe_view();
    let settled = tokio::time::timeout(
        Duration::from_millis(args.wait_ms),
        views.wait_for(|view| {
            matches!(view, AppView::Frame { .. }) || shell.readiness().is_ready()
        }),
    )
    .await
    .is_ok();
    if !settled {
        tracing::warn!(wait_ms = args.wait_ms, "app did not become ready in time");
    }
    cancel.cancel();
    watcher.await.context("app shell watcher failed")?;

    let view = shell.evaluate();
    let report = BootstrapReport {
        requested: args.path,
        location: navigator.current_path(),
        ready: shell.readiness().is_ready(),
        signed_in: shell.session().user().is_some(),
        view,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn filter_link(args: &FilterLinkArgs) -> Result<()> {
    let filters: Map<String, Value> =
        serde_json::from_str(&args.filters).context("--filters must be a JSON object")?;
    let value = if args.numeric {
        let number: i64 = args
            .value
            .parse()
            .with_context(|| format!("'{}' is not an integer", args.value))?;
        PropertyValue::from(number)
    } else {
        PropertyValue::from(args.value.as_str())
    };

    let link = FilterPropertyLink::build(&args.path, &filters, args.property.as_str(), value)?;
    println!("{}", link.url());
    Ok(())
}

async fn mount_session(
    config: &AppConfig,
) -> Result<(Arc<SessionStore>, Arc<ConsoleNavigator>)> {
    let navigator = Arc::new(ConsoleNavigator::new("/"));
    let api: Arc<dyn SessionApi> = Arc::new(HttpSessionApi::new(&config.session)?);
    let store = SessionStore::mount(
        api,
        log_collaborators(Arc::clone(&navigator)),
        &config.session,
    )
    .await;
    if store.user().is_none() {
        bail!("no signed-in user; check session.base_url and session.auth_token");
    }
    Ok((store, navigator))
}

fn report_switch(outcome: &SwitchOutcome, navigator: &dyn Navigator) {
    match outcome {
        SwitchOutcome::AlreadyActive => println!("already active"),
        SwitchOutcome::Superseded => println!("superseded"),
        SwitchOutcome::Switched { destination } => {
            println!("switched, reloading {destination}");
            tracing::debug!(location = %navigator.current_path(), "navigation issued");
        }
    }
}
