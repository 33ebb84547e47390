use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lexi_config::Config;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod state;
pub mod ui;

#[cfg(test)]
mod tests;

use self::controller::{AppController, Task};
use self::state::AppState;

/// Word definitions with a local cache, history, favorites and quiz list
#[derive(Parser, Debug)]
#[command(name = "lexi", version)]
struct Args {
    /// Profile to load from the profiles folder
    #[arg(long, default_value = "main")]
    profile: String,

    /// Create the profile as a copy of main when it does not exist yet
    #[arg(long)]
    create_profile: bool,

    /// Overrides LEXI_DATA_DIR
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Overrides the profile's define service endpoint
    #[arg(long)]
    endpoint: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json") {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut defaults = Config::new();
    if let Some(dir) = &args.data_dir {
        defaults.storage.data_dir = dir.clone();
    }

    profile::init_user_config(&defaults)?;
    if args.create_profile && args.profile != "main" {
        profile::add_profile_from_default(&defaults, &args.profile)?;
    }

    let mut config = profile::load_user_profile(&defaults, &args.profile)?;
    if let Some(dir) = &args.data_dir {
        config.storage.data_dir = dir.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        config.service.endpoint = endpoint.clone();
    }
    config.limits = config.limits.sanitized();

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let config = load_config(&args)?;
    tracing::info!("Using profile '{}'", args.profile);

    // One thread: requests interleave at await points, never in parallel
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let state = Arc::new(AppState::new(config));
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl+c: {e}");
            std::future::pending::<()>().await;
        }
    };
    let result = runtime.block_on(run(state, shutdown));

    // The stdin reader sits on a blocking thread; don't wait for another line
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

/// Run until the renderer has shown everything after a quit, a task
/// fails, or `shutdown` resolves
pub async fn run(state: Arc<AppState>, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();
    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                break Ok(());
            }
            joined = tasks.join_next() => match joined {
                Some(Ok((Task::Ui, Ok(())))) => break Ok(()),
                Some(Ok((task, Ok(())))) => tracing::info!("{:?} task exited", task),
                Some(Ok((task, Err(e)))) => {
                    tracing::error!("{:?} task failed: {e}", task);
                    break Err(e);
                }
                Some(Err(e)) => {
                    tracing::error!("task panicked: {e}");
                    break Err(e.into());
                }
                None => break Ok(()),
            },
        }
    };

    controller.shutdown();
    tasks.abort_all();
    result
}
