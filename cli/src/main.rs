use clap::{Parser, Subcommand};
use dpsmeter_cli::CliContext;
use dpsmeter_cli::commands;
use dpsmeter_cli::logging;
use dpsmeter_cli::readline;
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let ctx = CliContext::new();

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    // Cancel the refresh task before the runtime shuts down
    ctx.meter.lock().await.stop().await;
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "dpsmeter")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking
    Start,
    /// Stop tracking and print the final table
    Stop,
    /// Clear all stats
    Reset,
    /// Show or hide the meter
    Toggle,
    /// Print current stats
    Stats,
    /// Print the last rendered frame
    Frame,
    /// Set the local player id
    Player {
        #[arg(short, long)]
        id: u32,
    },
    /// Send a skill or normal attack intent through the before-send hooks
    Cast {
        #[arg(short, long)]
        skill: Option<u32>,
        #[arg(short, long, value_name = "TARGET")]
        attack: Option<u32>,
    },
    /// Place a ground skill
    Ground {
        #[arg(short, long)]
        skill: u32,
        #[arg(short, long)]
        owner: Option<u32>,
    },
    /// Feed one damage hit
    Hit {
        #[arg(short, long)]
        amount: i64,
        #[arg(short, long)]
        skill: Option<u32>,
        #[arg(long)]
        source: Option<u32>,
        #[arg(short, long)]
        crit: bool,
    },
    /// Replay a recorded JSON-lines feed
    Replay {
        #[arg(short, long)]
        path: String,
    },
    /// Show the configuration
    Config,
    /// Save the configuration
    SaveConfig,
    /// Quit
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "dpsmeter".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Start) => commands::start(ctx).await,
        Some(Commands::Stop) => commands::stop(ctx).await,
        Some(Commands::Reset) => commands::reset(ctx).await,
        Some(Commands::Toggle) => commands::toggle(ctx).await,
        Some(Commands::Stats) => commands::show_stats(ctx).await,
        Some(Commands::Frame) => commands::show_frame(ctx),
        Some(Commands::Player { id }) => commands::set_player(ctx, *id).await,
        Some(Commands::Cast { skill, attack }) => commands::cast(ctx, *skill, *attack).await,
        Some(Commands::Ground { skill, owner }) => commands::ground(ctx, *skill, *owner).await,
        Some(Commands::Hit {
            amount,
            skill,
            source,
            crit,
        }) => commands::hit(ctx, *amount, *skill, *source, *crit).await,
        Some(Commands::Replay { path }) => commands::replay(ctx, path).await,
        Some(Commands::Config) => commands::show_config(ctx).await,
        Some(Commands::SaveConfig) => commands::save_config(ctx).await,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
