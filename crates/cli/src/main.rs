//! EventDesk CLI - task allocation advice over a board file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eventdesk_ai::{AiConfig, TaskAssistant};
use eventdesk_allocation::{AllocationError, AllocationPolicy};
use eventdesk_core::{MemberId, TaskId, TaskStatus};
use eventdesk_storage::{BoardStore, JsonBoardStore};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eventdesk")]
#[command(about = "Task allocation advice for event-planning committees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Board file holding tasks and team members
    #[arg(short, long, default_value = "board.json")]
    board: PathBuf,

    /// JSON file overriding allocation thresholds
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Skip the generative model and use the heuristics only
    #[arg(long)]
    offline: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend assignees for a task
    Assign {
        /// Task ID
        task: String,
        /// Write the recommended assignment back to the board
        #[arg(long)]
        apply: bool,
    },
    /// Recommend open tasks for a member
    Recommend {
        /// Member ID
        member: String,
    },
    /// Analyze team workload
    Workload,
    /// List tasks
    Tasks {
        /// Filter by status
        #[arg(long)]
        status: Option<TaskStatus>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_policy(path: Option<&Path>) -> Result<AllocationPolicy> {
    let Some(path) = path else {
        return Ok(AllocationPolicy::default());
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read policy file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid policy file {}", path.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = JsonBoardStore::new(&cli.board);
    let mut board = store
        .load()
        .await
        .with_context(|| format!("Failed to load board {}", cli.board.display()))?;
    let policy = load_policy(cli.policy.as_deref()).await?;

    let config = if cli.offline {
        AiConfig::default()
    } else {
        AiConfig::from_env()
    };
    let assistant = TaskAssistant::from_config(&config, policy)?;

    match cli.command {
        Commands::Assign { task, apply } => {
            let task_id = TaskId::new(task);
            let task = board
                .task(&task_id)
                .cloned()
                .with_context(|| format!("Task not found: {task_id}"))?;
            if apply && task.is_completed() {
                anyhow::bail!("Task {task_id} is already completed");
            }

            let advice = match assistant.assign_task(&task, &board.members).await {
                Ok(advice) => advice,
                Err(AllocationError::InvalidInput(reason)) => {
                    eprintln!("No team members available: {reason}");
                    return Ok(ExitCode::FAILURE);
                }
            };
            print_json(&advice)?;

            if apply {
                board.apply_assignment(&task_id, &advice.result.assigned_to)?;
                store.save(&board).await?;
                info!(task = %task_id, "Assignment applied");
            }
        }
        Commands::Recommend { member } => {
            let member_id = MemberId::new(member);
            let member = board
                .member(&member_id)
                .with_context(|| format!("Member not found: {member_id}"))?;

            let advice = assistant.recommend_tasks(member, &board.open_tasks()).await;
            print_json(&advice)?;
        }
        Commands::Workload => {
            let advice = assistant.workload_insights(&board.members, &board.tasks).await;
            print_json(&advice)?;
        }
        Commands::Tasks { status } => {
            let tasks: Vec<_> = match status {
                Some(status) => board.tasks_by_status(status),
                None => board.tasks.iter().collect(),
            };

            println!("Tasks ({})", tasks.len());
            for task in tasks {
                let assignees: Vec<&str> = task.assigned_to.iter().map(MemberId::as_str).collect();
                println!(
                    "  {} | {} | {} | due {} | {} | {} - {}",
                    task.id,
                    task.status,
                    task.priority,
                    task.deadline,
                    if board.can_start(&task.id) { "ready" } else { "blocked" },
                    if assignees.is_empty() { "unassigned".to_string() } else { assignees.join(", ") },
                    task.title,
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
