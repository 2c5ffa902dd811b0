use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use formflow_config::AppConfig;
use formflow_session::{
  DocumentRenderer, EntryDocument, FsTemplateCatalog, HeadlessRenderer, Session, SessionRunner,
  SessionSettings, TemplateCatalog, UiEvent,
};
use formflow_store::{SqliteStore, Store, SubmissionState};
use formflow_workflow::{Decision, WorkflowEngine};

const CONFIG_FILE: &str = "config.json";

/// Formflow - a two-role document approval workflow
#[derive(Parser)]
#[command(name = "formflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.formflow)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Path to the config file (default: <data-dir>/config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Emit logs as JSON
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Create the data directory, a default config, and the database
  Init,

  /// List submissions
  List {
    /// Only show submissions in this state
    #[arg(long)]
    state: Option<SubmissionState>,
  },

  /// Submit a filled form for approval
  Submit {
    /// Path to the filled form
    file: PathBuf,

    /// Form name to record (default: the file name)
    #[arg(long)]
    form_name: Option<String>,

    /// Submitting role
    #[arg(long)]
    owner: Option<String>,
  },

  /// Approve a waiting submission
  Approve { id: i64 },

  /// Reject a waiting submission
  Reject { id: i64 },

  /// Write a submission's form to a file
  Export { id: i64, out: PathBuf },

  /// List the configured templates
  Templates,

  /// Drive a headless session with UI events, one JSON object per line
  Replay {
    /// File of events (default: stdin)
    events_file: Option<PathBuf>,
  },
}

/// Everything a command needs once the config and database are open.
struct App {
  config: AppConfig,
  store: Arc<SqliteStore>,
  engine: Arc<WorkflowEngine>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.json);

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory, pass --data-dir")?
      .join(".formflow"),
  };

  let Some(command) = cli.command else {
    println!("formflow - use --help to see available commands");
    return Ok(());
  };

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run(command, data_dir, cli.config).await })
}

fn init_tracing(json: bool) {
  let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

  // Logs go to stderr; stdout carries command output.
  if json {
    tracing_subscriber::registry()
      .with(env_filter)
      .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
      .init();
  } else {
    tracing_subscriber::registry()
      .with(env_filter)
      .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
      .init();
  }
}

async fn run(command: Commands, data_dir: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
  if let Commands::Init = command {
    return init(&data_dir).await;
  }

  let config = load_config(&data_dir, config_path.as_deref()).await?;
  let app = open(config).await?;

  let result = match command {
    Commands::Init => Ok(()),
    Commands::List { state } => list(&app, state).await,
    Commands::Submit {
      file,
      form_name,
      owner,
    } => submit(&app, file, form_name, owner).await,
    Commands::Approve { id } => decide(&app, id, Decision::Approve).await,
    Commands::Reject { id } => decide(&app, id, Decision::Reject).await,
    Commands::Export { id, out } => export(&app, id, out).await,
    Commands::Templates => templates(&app).await,
    Commands::Replay { events_file } => replay(&app, events_file).await,
  };

  app.store.close().await;
  result
}

async fn load_config(data_dir: &Path, explicit: Option<&Path>) -> Result<AppConfig> {
  let path = match explicit {
    Some(path) => path.to_path_buf(),
    None => {
      let path = data_dir.join(CONFIG_FILE);
      if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        debug!(data_dir = %data_dir.display(), "no config file, using defaults");
        let mut config = AppConfig::default();
        config.resolve_paths(data_dir);
        return Ok(config);
      }
      path
    }
  };

  let content = tokio::fs::read_to_string(&path)
    .await
    .with_context(|| format!("failed to read config: {}", path.display()))?;
  AppConfig::from_json(&content, &path)
    .with_context(|| format!("failed to load config: {}", path.display()))
}

async fn open(config: AppConfig) -> Result<App> {
  let store = SqliteStore::open(&config.database.path)
    .await
    .with_context(|| format!("failed to open database: {}", config.database.path.display()))?;
  store.migrate().await.context("failed to run migrations")?;
  info!(database = %config.database.path.display(), "database ready");

  let store = Arc::new(store);
  let engine = Arc::new(WorkflowEngine::new(store.clone()));
  Ok(App {
    config,
    store,
    engine,
  })
}

async fn init(data_dir: &Path) -> Result<()> {
  tokio::fs::create_dir_all(data_dir.join("forms"))
    .await
    .with_context(|| format!("failed to create data directory: {}", data_dir.display()))?;

  let config_path = data_dir.join(CONFIG_FILE);
  if tokio::fs::try_exists(&config_path).await.unwrap_or(false) {
    eprintln!("Config already exists: {}", config_path.display());
  } else {
    let content = serde_json::to_string_pretty(&AppConfig::default())?;
    tokio::fs::write(&config_path, content)
      .await
      .with_context(|| format!("failed to write config: {}", config_path.display()))?;
    eprintln!("Wrote config: {}", config_path.display());
  }

  let config = load_config(data_dir, Some(&config_path)).await?;
  let app = open(config).await?;
  eprintln!("Database ready: {}", app.config.database.path.display());
  eprintln!(
    "Place the entry document and templates under {}",
    data_dir.join("forms").display()
  );
  app.store.close().await;
  Ok(())
}

async fn list(app: &App, state: Option<SubmissionState>) -> Result<()> {
  let mut submissions = app
    .store
    .query_all()
    .await
    .context("failed to query submissions")?;
  if let Some(state) = state {
    submissions.retain(|s| s.state == state);
  }

  println!("{}", serde_json::to_string_pretty(&submissions)?);
  Ok(())
}

async fn submit(
  app: &App,
  file: PathBuf,
  form_name: Option<String>,
  owner: Option<String>,
) -> Result<()> {
  let form_bytes = tokio::fs::read(&file)
    .await
    .with_context(|| format!("failed to read form: {}", file.display()))?;

  let form_name = match form_name {
    Some(name) => name,
    None => file
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .with_context(|| format!("cannot derive a form name from {}", file.display()))?,
  };

  let id = app
    .engine
    .submit(&form_bytes, &form_name, owner.as_deref())
    .await
    .context("failed to submit form")?;

  eprintln!("Submitted {} as {}", form_name, id);
  println!("{id}");
  Ok(())
}

async fn decide(app: &App, id: i64, decision: Decision) -> Result<()> {
  let mut submission = app
    .store
    .get(id)
    .await
    .with_context(|| format!("failed to load submission {id}"))?;

  app
    .engine
    .decide(&mut submission, decision)
    .await
    .with_context(|| format!("failed to {decision} submission {id}"))?;

  println!("{}", serde_json::to_string_pretty(&submission)?);
  Ok(())
}

async fn export(app: &App, id: i64, out: PathBuf) -> Result<()> {
  let submission = app
    .store
    .get(id)
    .await
    .with_context(|| format!("failed to load submission {id}"))?;

  tokio::fs::write(&out, &submission.form_bytes)
    .await
    .with_context(|| format!("failed to write {}", out.display()))?;

  eprintln!(
    "Exported {} ({} bytes) to {}",
    submission.form_name,
    submission.form_bytes.len(),
    out.display()
  );
  Ok(())
}

async fn templates(app: &App) -> Result<()> {
  let catalog = FsTemplateCatalog::new(app.config.templates.clone());
  let templates = catalog
    .templates()
    .await
    .context("failed to read templates")?;

  for (template, source) in templates.iter().zip(catalog.sources()) {
    println!(
      "{}\t{} bytes\t{}",
      template.name,
      template.bytes.len(),
      source.path.display()
    );
  }
  Ok(())
}

/// Final state of a replayed session.
#[derive(Serialize)]
struct ReplaySummary {
  session_id: String,
  role: Option<String>,
  active_document: Option<String>,
  visible_view: Option<String>,
  messages: Vec<String>,
}

async fn replay(app: &App, events_file: Option<PathBuf>) -> Result<()> {
  let content = match events_file {
    Some(path) => tokio::fs::read_to_string(&path)
      .await
      .with_context(|| format!("failed to read events file: {}", path.display()))?,
    None => read_events_from_stdin()?,
  };

  let mut events = Vec::new();
  for (line_no, line) in content.lines().enumerate() {
    if line.trim().is_empty() {
      continue;
    }
    let event: UiEvent = serde_json::from_str(line)
      .with_context(|| format!("invalid event on line {}", line_no + 1))?;
    events.push(event);
  }

  let entry = EntryDocument::read(&app.config.entry)
    .await
    .context("failed to read entry document")?;
  let catalog: Arc<dyn TemplateCatalog> =
    Arc::new(FsTemplateCatalog::new(app.config.templates.clone()));

  let session = Session::start(
    entry,
    HeadlessRenderer::new(),
    SessionSettings::from(&app.config),
    app.engine.clone(),
    catalog,
  )
  .context("failed to start session")?;

  let runner = SessionRunner::new(session);
  let sender = runner.sender();
  let cancel = CancellationToken::new();
  let handle = tokio::spawn(runner.start(cancel.clone()));

  for event in events {
    if sender.send(event).await.is_err() {
      // The runner stopped; its error is reported below.
      break;
    }
  }
  drop(sender);

  let session = tokio::select! {
    joined = handle => joined.context("session runner panicked")??,
    _ = tokio::signal::ctrl_c() => {
      cancel.cancel();
      bail!("replay interrupted");
    }
  };

  let summary = ReplaySummary {
    session_id: session.session_id().to_string(),
    role: session.context().role().map(|r| r.name().to_string()),
    active_document: session.renderer().active_document().map(str::to_string),
    visible_view: session.renderer().visible_view().map(str::to_string),
    messages: session.renderer().messages().to_vec(),
  };
  println!("{}", serde_json::to_string_pretty(&summary)?);
  Ok(())
}

fn read_events_from_stdin() -> Result<String> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    bail!("no events given, pass an events file or pipe them on stdin");
  }

  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read events from stdin")?;
  Ok(input)
}
