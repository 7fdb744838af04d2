use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use quiz_settle::application::engine::SettlementEngine;
use quiz_settle::application::leaderboard::LeaderboardService;
use quiz_settle::application::rooms::{create_room, load_room};
use quiz_settle::application::submission::SubmissionPipeline;
use quiz_settle::config::{DEFAULT_MAX_ATTEMPTS, SettlementConfig};
use quiz_settle::domain::ports::{LeaderboardStoreBox, RoomStoreRef};
use quiz_settle::domain::questions::draw_questions;
use quiz_settle::domain::submission::Submission;
use quiz_settle::infrastructure::in_memory::{InMemoryLeaderboardStore, InMemoryRoomStore};
use quiz_settle::interfaces::csv::submission_reader::SubmissionReader;
use quiz_settle::interfaces::json::{read_question_bank, read_rooms};
use quiz_settle::telemetry::init_tracing;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Attempts per optimistic transaction before giving up.
    #[arg(long, global = true, env = "QUIZ_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit every answer of a CSV file and print the resulting rooms
    Replay {
        /// Submissions CSV (room, round, player, chosen)
        submissions: PathBuf,
        /// JSON array of rooms to create if they are not stored yet
        #[arg(long)]
        rooms: PathBuf,
        /// Dispatch the submissions of each round on parallel tasks
        #[arg(long)]
        concurrent: bool,
    },
    /// Print a stored room
    Show { room_id: String },
    /// Draw the questions for one match from a JSON question bank
    Draw {
        bank: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Read or update a game's leaderboard
    #[command(subcommand)]
    Rank(RankCommand),
}

#[derive(Subcommand)]
enum RankCommand {
    Show { game: String },
    Submit { game: String, name: String, score: u32 },
}

struct Stores {
    rooms: RoomStoreRef,
    leaderboards: LeaderboardStoreBox,
}

fn in_memory_stores() -> Stores {
    Stores {
        rooms: Arc::new(InMemoryRoomStore::new()),
        leaderboards: Box::new(InMemoryLeaderboardStore::new()),
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<&Path>) -> Result<Stores> {
    use quiz_settle::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            Ok(Stores {
                rooms: Arc::new(store.clone()),
                leaderboards: Box::new(store),
            })
        }
        None => Ok(in_memory_stores()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<&Path>) -> Result<Stores> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    Ok(in_memory_stores())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).into_diagnostic()?;
    writeln!(out).into_diagnostic()?;
    Ok(())
}

async fn run_round(pipeline: &SubmissionPipeline, batch: Vec<Submission>) {
    let handles: Vec<_> = batch.into_iter().map(|s| pipeline.dispatch(s)).collect();
    for handle in handles {
        match handle.await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => error!(error = %e, "Error processing submission"),
            Err(e) => error!(error = %e, "Submission task failed"),
        }
    }
}

async fn replay(
    stores: &Stores,
    config: SettlementConfig,
    submissions: &Path,
    rooms: &Path,
    concurrent: bool,
) -> Result<()> {
    let seeds = read_rooms(File::open(rooms).into_diagnostic()?).into_diagnostic()?;
    let mut room_ids = Vec::with_capacity(seeds.len());
    for room in seeds {
        room_ids.push(room.room_id.clone());
        if load_room(stores.rooms.as_ref(), &room.room_id)
            .await
            .into_diagnostic()?
            .is_none()
        {
            create_room(stores.rooms.as_ref(), room)
                .await
                .into_diagnostic()?;
        }
    }

    let engine = Arc::new(SettlementEngine::new(stores.rooms.clone(), config));
    let pipeline = SubmissionPipeline::new(engine);

    let reader = SubmissionReader::new(File::open(submissions).into_diagnostic()?);
    let mut batch: Vec<Submission> = Vec::new();
    for result in reader.submissions() {
        match result {
            Ok(submission) if concurrent => {
                // Rounds are replayed one after another; answers within a round race.
                if batch.last().is_some_and(|prev| prev.round != submission.round) {
                    run_round(&pipeline, std::mem::take(&mut batch)).await;
                }
                batch.push(submission);
            }
            Ok(submission) => {
                if let Err(e) = pipeline.submit(submission).await {
                    error!(error = %e, "Error processing submission");
                }
            }
            Err(e) => {
                error!(error = %e, "Error reading submission");
            }
        }
    }
    run_round(&pipeline, batch).await;

    let mut finals = Vec::with_capacity(room_ids.len());
    for room_id in &room_ids {
        if let Some(room) = load_room(stores.rooms.as_ref(), room_id)
            .await
            .into_diagnostic()?
        {
            finals.push(room);
        }
    }
    print_json(&finals)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = SettlementConfig::default().with_max_attempts(cli.max_attempts);
    let stores = open_stores(cli.db_path.as_deref())?;

    match cli.command {
        Command::Replay {
            submissions,
            rooms,
            concurrent,
        } => replay(&stores, config, &submissions, &rooms, concurrent).await,
        Command::Show { room_id } => {
            let room = load_room(stores.rooms.as_ref(), &room_id)
                .await
                .into_diagnostic()?;
            match room {
                Some(room) => print_json(&room),
                None => Err(miette::miette!("Room {} not found", room_id)),
            }
        }
        Command::Draw { bank, seed } => {
            let bank = read_question_bank(File::open(bank).into_diagnostic()?).into_diagnostic()?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            print_json(&draw_questions(&bank, &mut rng))
        }
        Command::Rank(command) => {
            let service = LeaderboardService::new(stores.leaderboards);
            let ranks = match command {
                RankCommand::Show { game } => service.ranks(&game).await,
                RankCommand::Submit { game, name, score } => {
                    service.submit(&game, &name, score).await
                }
            }
            .into_diagnostic()?;
            print_json(&ranks)
        }
    }
}
