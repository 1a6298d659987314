//! reelboard - an interactive shell for the clip-submission dashboard.
//!
//! Every command reads through one cached `Dashboard`, so repeated lookups
//! are served from memory until `reload`.

mod commands;
mod render;

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reelboard_core::auth::Session;
use reelboard_core::utils::display_date;
use reelboard_core::{ApiClient, Config, Dashboard};

use commands::{parse_command, Command, HELP};

/// Log file name prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "reelboard.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a daily file so they don't interleave with shell output.
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

fn prompt(dashboard: &Dashboard<ApiClient>) -> io::Result<()> {
    let who = dashboard
        .current_user()
        .map(|u| u.email.as_str())
        .unwrap_or("guest");
    print!("{}> ", who);
    io::stdout().flush()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let mut config = Config::load()?;
    let cache_dir = config.cache_dir()?;
    std::fs::create_dir_all(&cache_dir)?;

    let _guard = init_tracing(&cache_dir);
    info!("reelboard starting");

    let client = ApiClient::new(config.backend_url())?;
    println!("reelboard - backend {}", client.base_url());

    let mut dashboard = Dashboard::new(client).with_session(Session::new(cache_dir));
    match dashboard.auto_login().await {
        Ok(Some(user)) => println!("Welcome back, {}", user.email),
        Ok(None) => println!("Not signed in. Type 'login <email>' or 'help'."),
        Err(e) => println!("Auto login failed: {}", e),
    }

    // Last data view shown, re-run after `reload`
    let mut last_view: Option<Command> = None;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&dashboard)?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }

        let command = match command {
            Command::Reload => {
                dashboard.reload();
                println!("Cached data cleared.");
                match last_view.clone() {
                    Some(view) => view,
                    None => continue,
                }
            }
            command => command,
        };

        if command == Command::Logout {
            last_view = None;
        }

        let is_view = command.is_view();
        match run_command(&mut dashboard, &mut config, command.clone()).await {
            Ok(()) if is_view => last_view = Some(command),
            Ok(()) => {}
            Err(e) => {
                error!(error = %e, "Command failed");
                println!("Error: {}", e);
            }
        }
    }

    info!("reelboard shutting down");
    Ok(())
}

async fn run_command(
    dashboard: &mut Dashboard<ApiClient>,
    config: &mut Config,
    command: Command,
) -> Result<()> {
    match command {
        Command::Help => println!("{}", HELP),
        Command::Quit | Command::Reload => {}
        Command::Login { email, remember } => {
            let user = dashboard.login(&email, remember).await?;
            println!("{}", render::user(user));
            config.last_email = Some(user.email.clone());
            config.save()?;
        }
        Command::Logout => {
            dashboard.logout().await;
            println!("Signed out.");
        }
        Command::WhoAmI => match dashboard.current_user() {
            Some(user) => println!("{}", render::user(user)),
            None => println!("Not signed in."),
        },
        Command::Projects => match dashboard.current_user() {
            Some(user) => print!("{}", render::projects(user)),
            None => println!("Not signed in."),
        },
        Command::Work { project_id, date } => {
            let date = match date {
                Some(date) => date,
                None => dashboard.default_work_date(&project_id).await?,
            };
            let table = dashboard.work_table(&project_id, date).await?;
            let age = dashboard.project_age(&project_id);
            print!("{}", render::work_table(&table, age.as_deref()));
        }
        Command::Dashboard { email, date } => {
            let data = dashboard.employee_dashboard(&email, date).await?;
            println!("{}", render::employee_dashboard(&email, &data));
        }
        Command::Summary { year, month } => {
            let members = dashboard.monthly_summary(year, month).await?;
            print!("{}", render::monthly_summary(year, month, &members));
        }
        Command::Member { name, year, month } => {
            match dashboard.member_summary(&name, year, month).await? {
                Some(member) => print!("{}", render::member_summary(year, month, &member)),
                None => println!("No summary for '{}' in {}-{:02}.", name, year, month),
            }
        }
        Command::Staffs { term } => {
            let found = dashboard.search_staffs(&term).await?;
            print!("{}", render::staffs(&found));
        }
        Command::UpdateStaff { staff_id, column, value } => {
            dashboard.update_staff_info(&staff_id, &column, &value).await?;
            println!("Updated {} for staff {}.", column, staff_id);
        }
        Command::Leaves { date } => {
            let rows = dashboard.leaves_list(date).await?;
            print!("{}", render::leaves(&display_date(date), &rows));
        }
        Command::Profile => {
            let profile = dashboard.profile().await?;
            println!("{}", render::profile(&profile));
        }
        Command::Rename { name } => {
            dashboard.update_profile_name(&name).await?;
            println!("Name changed to {}.", name.trim());
        }
        Command::Avatar { url } => {
            dashboard.update_profile_avatar(&url).await?;
            println!("Avatar updated.");
        }
        Command::Tabs => {
            let tabs = dashboard.tab_names().await?;
            print!("{}", render::tabs(&tabs));
        }
    }
    Ok(())
}
