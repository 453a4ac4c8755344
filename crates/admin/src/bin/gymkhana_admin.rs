use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gymkhana_admin::rank_file::{RankFile, render_table};
use sqlx::PgPool;
use storage::{
    Database,
    dto::round::{CreateRoundRequest, RoundStatus},
    repository::round::RoundRepository,
    services::leaderboard::round_leaderboard,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validator::Validate;

#[derive(Parser)]
#[command(name = "gymkhana-admin")]
#[command(about = "Gymkhana time-trial administration", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage rounds
    Rounds {
        #[command(subcommand)]
        command: RoundCommands,
    },
    /// Write a round leaderboard as CSV
    Export {
        slug: String,

        /// Defaults to stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Rank a local CSV file with rider,time,penalties columns
    RankFile { file: PathBuf },
}

#[derive(Subcommand)]
enum RoundCommands {
    List {
        #[arg(long, value_parser = parse_status)]
        status: Option<RoundStatus>,
    },
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    Open {
        slug: String,
    },
    Close {
        slug: String,
    },
}

fn parse_status(value: &str) -> Result<RoundStatus, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "open" => Ok(RoundStatus::Open),
        "closed" => Ok(RoundStatus::Closed),
        other => Err(format!("unknown status '{}', expected open or closed", other)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "gymkhana_admin={},storage={}",
                    log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::RankFile { file } => handle_rank_file(file),
        Commands::Rounds { command } => {
            let db = connect(cli.database_url.as_deref()).await?;
            handle_rounds(db.pool(), command).await
        }
        Commands::Export { slug, output } => {
            let db = connect(cli.database_url.as_deref()).await?;
            handle_export(db.pool(), &slug, output).await
        }
    }
}

async fn connect(database_url: Option<&str>) -> anyhow::Result<Database> {
    let database_url =
        database_url.context("DATABASE_URL is required (use --database-url or the environment)")?;

    tracing::debug!("Connecting to database...");
    let db = Database::with_max_connections(database_url, 2)
        .await
        .context("Failed to connect to database")?;

    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::debug!("Database migrations up to date");

    Ok(db)
}

async fn handle_rounds(pool: &PgPool, command: RoundCommands) -> anyhow::Result<()> {
    let repo = RoundRepository::new(pool);

    match command {
        RoundCommands::List { status } => {
            let rounds = repo.list(status).await?;
            if rounds.is_empty() {
                tracing::info!("No rounds found");
            }
            for round in rounds {
                println!(
                    "{:<8} {:<30} {} (created {})",
                    round.status,
                    round.slug,
                    round.name,
                    round.created_at.format("%Y-%m-%d")
                );
            }
        }
        RoundCommands::Create {
            name,
            slug,
            description,
        } => {
            let req = CreateRoundRequest {
                name,
                slug,
                description,
                status: RoundStatus::Open,
            };
            req.validate()?;

            let round = repo.create(&req).await?;
            tracing::info!("✓ Created round '{}' ({})", round.name, round.slug);
        }
        RoundCommands::Open { slug } => {
            let round = repo.set_status(&slug, RoundStatus::Open).await?;
            tracing::info!("✓ Round '{}' is open for submissions", round.slug);
        }
        RoundCommands::Close { slug } => {
            let round = repo.set_status(&slug, RoundStatus::Closed).await?;
            tracing::info!("✓ Round '{}' is closed", round.slug);
        }
    }

    Ok(())
}

async fn handle_export(pool: &PgPool, slug: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let leaderboard = round_leaderboard(pool, slug)
        .await
        .with_context(|| format!("Failed to load leaderboard for '{}'", slug))?;
    let csv = leaderboard.to_csv()?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, csv).await?;
            tracing::info!(
                "✓ Exported {} rider(s) to {}",
                leaderboard.entries.len(),
                path.display()
            );
        }
        None => print!("{}", csv),
    }

    Ok(())
}

fn handle_rank_file(file: PathBuf) -> anyhow::Result<()> {
    tracing::info!("Ranking times from: {}", file.display());

    let reader = std::fs::File::open(&file)
        .with_context(|| format!("Cannot open {}", file.display()))?;
    let rank_file = RankFile::from_reader(reader)?;

    for entry in rank_file.unranked() {
        tracing::warn!(
            "Not ranked: {} (time '{}', penalties '{}')",
            entry.label,
            entry.time,
            entry.penalties
        );
    }
    if !rank_file.skipped_rows.is_empty() {
        tracing::warn!("Skipped {} unreadable row(s)", rank_file.skipped_rows.len());
    }

    print!("{}", render_table(&rank_file.rank()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("open"), Ok(RoundStatus::Open));
        assert_eq!(parse_status(" Closed "), Ok(RoundStatus::Closed));
        assert!(parse_status("pending").is_err());
    }

    #[test]
    fn test_cli_parses_rounds_create() {
        let cli = Cli::try_parse_from([
            "gymkhana-admin",
            "rounds",
            "create",
            "--name",
            "Spring Cup",
            "--slug",
            "spring-cup",
        ])
        .unwrap();

        match cli.command {
            Commands::Rounds {
                command: RoundCommands::Create { name, slug, .. },
            } => {
                assert_eq!(name, "Spring Cup");
                assert_eq!(slug.as_deref(), Some("spring-cup"));
            }
            _ => panic!("expected rounds create"),
        }
    }

    #[tokio::test]
    async fn test_database_commands_need_a_url() {
        let err = connect(None).await.unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
