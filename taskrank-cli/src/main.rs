use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use taskrank_core::{
    local_today, AnalyzeError, AnalyzeRequest, AnalyzeResponse, NoStore, Ranker, StoreError,
    TaskInput, TaskResolver,
};
use taskrank_store::JsonFileStore;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod output;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "taskrank",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TASKRANK_BUILD_SHA"), ")"),
    about = "Dependency-aware task prioritization"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default config to ~/.taskrank/config.toml
    Init,

    /// Score and rank a batch of tasks
    Analyze(RankArgs),

    /// Show only the top few tasks from a batch
    Suggest {
        #[command(flatten)]
        args: RankArgs,

        /// Number of tasks to show (default: engine.suggest_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Manage the saved task store
    Tasks {
        #[command(subcommand)]
        command: TasksCommand,
    },
}

#[derive(Args, Debug)]
struct RankArgs {
    /// JSON file with a task array or {"strategy", "tasks"}; `-` reads stdin
    #[arg(long)]
    input: PathBuf,

    /// balanced | deadline | impact | fastest
    #[arg(long)]
    strategy: Option<String>,

    /// Override today's date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<String>,

    /// Print the full JSON response
    #[arg(long)]
    json: bool,

    /// Do not resolve dependencies against saved tasks
    #[arg(long)]
    no_store: bool,
}

#[derive(Subcommand, Debug)]
enum TasksCommand {
    /// Validate and save tasks (ids are assigned when missing)
    Save {
        #[arg(long)]
        input: PathBuf,
    },

    /// List saved tasks
    List {
        /// Only tasks due today
        #[arg(long)]
        today: bool,

        #[arg(long)]
        json: bool,
    },

    /// Delete a saved task by id
    Delete { id: u64 },
}

/// Accepted input documents: a bare array or a full request body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputDoc {
    Batch(Vec<TaskInput>),
    Request(AnalyzeRequest),
}

impl InputDoc {
    fn into_request(self) -> AnalyzeRequest {
        match self {
            InputDoc::Batch(tasks) => AnalyzeRequest {
                strategy: None,
                tasks,
            },
            InputDoc::Request(req) => req,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_tracing(&cfg);

    match cli.command {
        Command::Init => {
            config::init_config()?;
        }

        Command::Analyze(args) => {
            let resp = rank(&cfg, &args, None).await?;
            print_response(&resp, args.json)?;
        }

        Command::Suggest { args, limit } => {
            let limit = limit.unwrap_or(cfg.engine.suggest_limit);
            let resp = rank(&cfg, &args, Some(limit)).await?;
            print_response(&resp, args.json)?;
        }

        Command::Tasks { command } => {
            let path = cfg.store_path(&state::ensure_taskrank_home()?);
            match command {
                TasksCommand::Save { input } => {
                    let req = read_input(&input)?;
                    let mut store = JsonFileStore::open(&path)?;
                    let ids = store.save_batch(&req.tasks)?;
                    let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
                    println!("Saved {} task(s): {}", ids.len(), ids.join(", "));
                }
                TasksCommand::List { today, json } => {
                    let store = JsonFileStore::open(&path)?;
                    let tasks = if today {
                        store.list_due_on(today_for(&cfg, None)?)
                    } else {
                        store.list_all()
                    };
                    if json {
                        println!("{}", serde_json::to_string_pretty(&tasks)?);
                    } else {
                        print!("{}", output::render_tasks(&tasks));
                    }
                }
                TasksCommand::Delete { id } => {
                    let mut store = JsonFileStore::open(&path)?;
                    let task = store.delete(id)?;
                    println!("Deleted task {id}: {}", task.title);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(cfg: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log.filter));
    // Logs go to stderr so `--json` output stays clean.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn rank(cfg: &Config, args: &RankArgs, limit: Option<usize>) -> Result<AnalyzeResponse> {
    let mut req = read_input(&args.input)?;
    if args.strategy.is_some() {
        req.strategy = args.strategy.clone();
    }
    let strategy = req
        .strategy
        .take()
        .unwrap_or_else(|| cfg.engine.default_strategy.clone());
    let today = today_for(cfg, args.today.as_deref())?;
    debug!(%today, %strategy, tasks = req.tasks.len(), "ranking");

    if args.no_store {
        return run(NoStore, today, &strategy, &req.tasks, limit);
    }
    let home = state::ensure_taskrank_home()?;
    let timeout = Duration::from_millis(cfg.store.timeout_ms);
    let store = load_store(&cfg.store_path(&home), timeout)
        .await
        .map_err(AnalyzeError::from)?;
    run(&store, today, &strategy, &req.tasks, limit)
}

fn run<R: TaskResolver>(
    resolver: R,
    today: NaiveDate,
    strategy: &str,
    tasks: &[TaskInput],
    limit: Option<usize>,
) -> Result<AnalyzeResponse> {
    let ranker = Ranker::new(resolver, today);
    let resp = match limit {
        Some(n) => ranker.suggest(Some(strategy), tasks, n)?,
        None => ranker.analyze(Some(strategy), tasks)?,
    };
    Ok(resp)
}

/// Read the task store off the runtime, bounded by `timeout`.
async fn load_store(path: &Path, timeout: Duration) -> Result<JsonFileStore, StoreError> {
    let read = async {
        match tokio::fs::read_to_string(path).await {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    };
    let contents = tokio::time::timeout(timeout, read).await.map_err(|_| {
        StoreError::Unavailable(format!(
            "reading {} timed out after {}ms",
            path.display(),
            timeout.as_millis()
        ))
    })??;

    JsonFileStore::from_contents(path, &contents).map_err(|e| StoreError::Corrupt(format!("{e:#}")))
}

fn today_for(cfg: &Config, flag: Option<&str>) -> Result<NaiveDate> {
    match flag {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("--today '{raw}' is not a YYYY-MM-DD date")),
        None => local_today(&cfg.engine.timezone, Utc::now()),
    }
}

fn read_input(path: &Path) -> Result<AnalyzeRequest> {
    let text = if path == Path::new("-") {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("read tasks from stdin")?;
        s
    } else {
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };
    parse_input(&text).with_context(|| format!("parse {}", path.display()))
}

fn parse_input(text: &str) -> Result<AnalyzeRequest> {
    let doc: InputDoc = serde_json::from_str(text)?;
    Ok(doc.into_request())
}

fn print_response(resp: &AnalyzeResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(resp)?);
    } else {
        print!("{}", output::render_ranking(resp));
    }
    Ok(())
}
