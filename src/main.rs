use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use careerdesk::api::{serve, AppState};
use careerdesk::engine::Dispatcher;
use careerdesk::factory::AgentFactory;
use careerdesk::providers::ModelAdapter;
use careerdesk::session::{ChatSession, DisplayableResponse};
use careerdesk::storage::{AnalysisStore, InMemoryStore};
use careerdesk::types::DocumentSlot;
use careerdesk::Config;

#[derive(Parser)]
#[command(name = "careerdesk")]
#[command(about = "Career assistant that routes questions to resume, recruiter, skill-gap and interview agents", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single message
    Ask {
        #[arg(help = "Your question or request")]
        message: String,
        #[arg(long)]
        resume: Option<PathBuf>,
        #[arg(long)]
        jd: Option<PathBuf>,
    },
    /// Interactive chat; /resume FILE, /jd FILE and /quit are commands
    Chat {
        #[arg(long)]
        resume: Option<PathBuf>,
        #[arg(long)]
        jd: Option<PathBuf>,
    },
    /// Start the HTTP API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    init_logging(&config);
    config.validate()?;

    let store: Arc<dyn AnalysisStore> = Arc::new(InMemoryStore::new());
    let session = Arc::new(build_session(&config)?.with_store(store.clone()));

    match cli.command {
        Commands::Ask {
            message,
            resume,
            jd,
        } => {
            load_documents(&session, resume.as_deref(), jd.as_deref()).await?;
            let response = session.submit(&message).await;
            print_response(&response);
        }
        Commands::Chat { resume, jd } => {
            load_documents(&session, resume.as_deref(), jd.as_deref()).await?;
            run_repl(&session).await?;
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            serve(AppState { session, store }, port).await?;
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let default_filter = config.log_level.clone().unwrap_or_else(|| "info".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&default_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_session(config: &Config) -> Result<ChatSession> {
    let provider = config.build_provider()?;
    let catalog = Arc::new(config.build_catalog()?);
    let adapter = Arc::new(ModelAdapter::new(provider, config.timeout()));
    let dispatcher = Arc::new(Dispatcher::new(AgentFactory::new(catalog, adapter)));
    Ok(ChatSession::new(dispatcher))
}

async fn load_documents(
    session: &ChatSession,
    resume: Option<&Path>,
    jd: Option<&Path>,
) -> Result<()> {
    if let Some(path) = resume {
        upload_file(session, DocumentSlot::Resume, path).await?;
    }
    if let Some(path) = jd {
        upload_file(session, DocumentSlot::JobDescription, path).await?;
    }
    Ok(())
}

async fn upload_file(session: &ChatSession, slot: DocumentSlot, path: &Path) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let chars = session
        .upload(slot, &filename, &bytes)
        .await
        .with_context(|| format!("could not load {} as {}", path.display(), slot.as_str()))?;
    println!("Loaded {} ({} chars)", slot.as_str(), chars);
    Ok(())
}

async fn run_repl(session: &ChatSession) -> Result<()> {
    println!("careerdesk chat. Commands: /resume FILE, /jd FILE, /quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("🧑‍💻 > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "/quit" || line == "/exit" {
            break;
        }
        if let Some(path) = line.strip_prefix("/resume ") {
            if let Err(e) = upload_file(session, DocumentSlot::Resume, Path::new(path.trim())).await {
                eprintln!("{:#}", e);
            }
            continue;
        }
        if let Some(path) = line.strip_prefix("/jd ") {
            if let Err(e) =
                upload_file(session, DocumentSlot::JobDescription, Path::new(path.trim())).await
            {
                eprintln!("{:#}", e);
            }
            continue;
        }

        let response = session.submit(line).await;
        print_response(&response);
    }

    Ok(())
}

fn print_response(response: &DisplayableResponse) {
    if let Some(agent) = &response.agent {
        println!("[{}]", agent);
    }
    println!("{} {}", response.avatar, response.content);
    if response.parse_error {
        println!("(the answer could not be parsed into questions; the raw text is shown)");
    }
}
