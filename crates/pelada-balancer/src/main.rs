// Pelada balancer entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load roster and pair constraints
// 4. Validate the request and balance two teams
// 5. Print the report (JSON or summary) to stdout

use pelada_balancer::config::{self, OutputFormat};
use pelada_balancer::report::{self, BalanceReport};
use pelada_balancer::roster::import;
use pelada_balancer::teams::{self, TwoTeamBalancer, DEFAULT_NUMBER_OF_TEAMS};

use anyhow::Context;
use std::path::Path;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Pelada balancer starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: game={}, {} goalkeeper(s) per team, output={}",
        config.game.id,
        config.balance.goalkeepers_per_team,
        config.output_format().as_str()
    );

    // 3. Load roster and pairs
    let roster_path = Path::new(&config.data_paths.roster);
    let players = import::load_roster(roster_path)
        .with_context(|| format!("failed to load roster from {}", roster_path.display()))?;
    let pairs = match &config.data_paths.pairs {
        Some(path) => import::load_pairs(Path::new(path))
            .with_context(|| format!("failed to load pairs from {path}"))?,
        None => Vec::new(),
    };
    info!("Loaded {} players and {} pairs", players.len(), pairs.len());

    // 4. Balance
    teams::validate_request(&config.game.id, players.len(), DEFAULT_NUMBER_OF_TEAMS)
        .context("invalid balancing request")?;
    let balancer = TwoTeamBalancer::new(pairs, config.balance_options());
    let result = balancer.balance(&players);

    // 5. Print
    match config.output_format() {
        OutputFormat::Json => {
            let report = BalanceReport::new(&config.game.id, result);
            println!("{}", report.to_json().context("failed to serialize report")?);
        }
        OutputFormat::Summary => {
            print!("{}", report::render_summary(&result));
        }
    }

    info!("Pelada balancer finished");
    Ok(())
}

/// Initialize the tracing subscriber, writing to `logs/pelada-balancer.log`.
///
/// stdout carries the report, so log output goes to a file.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("pelada-balancer.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pelada_balancer=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
