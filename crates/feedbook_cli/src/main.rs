//! Command-line surface over `feedbook_core`.
//!
//! # Responsibility
//! - Compose the local note store and the remote resource clients.
//! - Own the session identity (email + bearer token) and pass it per call.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use feedbook_core::config::normalize_api_url;
use feedbook_core::db::open_db;
use feedbook_core::{
    init_logging, parse_rating, search_feedback, Caller, CoreConfig, Feedback, FeedbackClient,
    Note, NoteDraft, NoteService, NoteView, ReqwestTransport, ResourceClient,
    SqliteNoteRepository, Tool, ToolClient, ToolPatch, ALL_CATEGORIES,
};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "feedbook")]
#[command(about = "Personal notes and team feedback from the command line")]
#[command(version)]
struct Cli {
    /// Backend collection endpoint (overrides FEEDBOOK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Local notes database (overrides FEEDBOOK_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Local notes
    #[command(subcommand)]
    Notes(NoteCommands),

    /// Rated feedback on the backend
    #[command(subcommand)]
    Feedback(FeedbackCommands),

    /// Tool catalog on the backend
    #[command(subcommand)]
    Tools(ToolCommands),

    /// Check that the backend answers
    Doctor,
}

#[derive(Args)]
struct Identity {
    /// Acting user's email, sent in the `email` header
    #[arg(long, env = "FEEDBOOK_EMAIL")]
    email: String,

    /// Session bearer token
    #[arg(long, env = "FEEDBOOK_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl Identity {
    fn caller(&self) -> Caller {
        let caller = Caller::new(self.email.trim());
        match self.token.as_deref() {
            Some(token) => caller.with_bearer_token(token),
            None => caller,
        }
    }
}

#[derive(Args)]
struct NoteFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    content: String,
    /// Leave empty for uncategorized
    #[arg(long, default_value = "")]
    category: String,
}

impl From<NoteFields> for NoteDraft {
    fn from(fields: NoteFields) -> Self {
        NoteDraft::new(fields.title, fields.content, fields.category)
    }
}

#[derive(Subcommand)]
enum NoteCommands {
    /// List notes, newest first
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
    },
    /// Create a note
    Add(NoteFields),
    /// Replace title, content and category of a note
    Edit {
        id: String,
        #[command(flatten)]
        fields: NoteFields,
    },
    /// Delete a note
    Rm { id: String },
    /// List categories in use
    Categories,
}

#[derive(Subcommand)]
enum FeedbackCommands {
    /// List feedback entries
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Submit feedback
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Integer from 0 to 10
        #[arg(long, default_value = "5")]
        rating: String,
        #[command(flatten)]
        identity: Identity,
    },
    /// Delete feedback (admin)
    Rm {
        id: String,
        #[command(flatten)]
        identity: Identity,
    },
}

#[derive(Subcommand)]
enum ToolCommands {
    /// List tools
    List,
    /// Show one tool
    Get { id: String },
    /// Add a tool
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        category: String,
        #[command(flatten)]
        identity: Identity,
    },
    /// Change selected fields of a tool
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[command(flatten)]
        identity: Identity,
    },
    /// Delete a tool
    Rm {
        id: String,
        #[command(flatten)]
        identity: Identity,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = CoreConfig::from_env().context("invalid FEEDBOOK_* environment")?;
    if let Some(url) = cli.api_url.as_deref() {
        config.api_url = normalize_api_url(url).context("invalid --api-url")?;
    }
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = config.log_dir.as_ref() {
        let log_dir = log_dir.to_string_lossy();
        if let Err(err) = init_logging(&config.log_level, &log_dir) {
            bail!("failed to initialize logging: {err}");
        }
    }

    match cli.command {
        Commands::Notes(command) => run_notes(&config, command),
        Commands::Feedback(command) => run_feedback(&config, command).await,
        Commands::Tools(command) => run_tools(&config, command).await,
        Commands::Doctor => run_doctor(&config).await,
    }
}

fn run_notes(config: &CoreConfig, command: NoteCommands) -> Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn)?);

    match command {
        NoteCommands::List { search, category } => {
            for note in service.list_notes(&NoteView { search, category }) {
                print_note(&note);
            }
        }
        NoteCommands::Add(fields) => {
            let note = service.create_note(&fields.into())?;
            println!("created {}", note.id);
        }
        NoteCommands::Edit { id, fields } => {
            let note = service.update_note(&id, &fields.into())?;
            println!("updated {}", note.id);
        }
        NoteCommands::Rm { id } => {
            service.delete_note(&id)?;
            println!("deleted {id}");
        }
        NoteCommands::Categories => {
            for category in service.categories() {
                println!("{category}");
            }
        }
    }
    Ok(())
}

async fn run_feedback(config: &CoreConfig, command: FeedbackCommands) -> Result<()> {
    let client: FeedbackClient = ResourceClient::new(transport(config)?);

    match command {
        FeedbackCommands::List { search } => {
            let items = client.list().await?;
            for item in search_feedback(&items, &search) {
                println!(
                    "{}\t{}/10\t{}\t{}",
                    item.id.as_deref().unwrap_or("-"),
                    item.rating,
                    item.title,
                    item.submitter_email.as_deref().unwrap_or("")
                );
            }
        }
        FeedbackCommands::Add {
            title,
            description,
            rating,
            identity,
        } => {
            let rating = parse_rating(&rating)?;
            let created = client
                .create(&Feedback::new(title, description, rating), &identity.caller())
                .await?;
            println!("created {}", created.id.as_deref().unwrap_or("-"));
        }
        FeedbackCommands::Rm { id, identity } => {
            client.remove(&id, &identity.caller()).await?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

async fn run_tools(config: &CoreConfig, command: ToolCommands) -> Result<()> {
    let client: ToolClient = ResourceClient::new(transport(config)?);

    match command {
        ToolCommands::List => {
            for tool in client.list().await? {
                print_tool(&tool);
            }
        }
        ToolCommands::Get { id } => print_tool(&client.get_by_id(&id).await?),
        ToolCommands::Add {
            name,
            description,
            category,
            identity,
        } => {
            let created = client
                .create(&Tool::new(name, description, category), &identity.caller())
                .await?;
            println!("created {}", created.id.as_deref().unwrap_or("-"));
        }
        ToolCommands::Update {
            id,
            name,
            description,
            category,
            identity,
        } => {
            let patch = ToolPatch {
                name,
                description,
                category,
                ..ToolPatch::default()
            };
            let updated = client.update(&id, &patch, &identity.caller()).await?;
            print_tool(&updated);
        }
        ToolCommands::Rm { id, identity } => {
            client.remove(&id, &identity.caller()).await?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

async fn run_doctor(config: &CoreConfig) -> Result<()> {
    let client: FeedbackClient = ResourceClient::new(transport(config)?);
    let healthy = client
        .ping()
        .await
        .with_context(|| format!("backend unreachable at {}", config.api_url))?;
    info!("event=doctor module=cli status={healthy}");
    if !healthy {
        bail!("backend at {} answered with an error status", config.api_url);
    }
    println!("backend ok: {}", config.api_url);
    Ok(())
}

fn transport(config: &CoreConfig) -> Result<ReqwestTransport> {
    ReqwestTransport::new(&config.api_url, config.http_timeout)
        .context("failed to build HTTP client")
}

fn print_note(note: &Note) {
    let category = if note.is_uncategorized() {
        "-"
    } else {
        note.category.as_str()
    };
    println!("{}\t[{}]\t{}", note.id, category, note.title);
}

fn print_tool(tool: &Tool) {
    println!(
        "{}\t{}\t[{}]\t{}",
        tool.id.as_deref().unwrap_or("-"),
        tool.name,
        tool.category,
        tool.description
    );
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, FeedbackCommands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn feedback_add_takes_raw_rating_text() {
        let cli = Cli::parse_from([
            "feedbook",
            "feedback",
            "add",
            "--title",
            "Bug",
            "--rating",
            "8",
            "--email",
            "user@x.com",
        ]);
        match cli.command {
            Commands::Feedback(FeedbackCommands::Add {
                rating, identity, ..
            }) => {
                assert_eq!(rating, "8");
                assert_eq!(identity.caller().email, "user@x.com");
            }
            _ => panic!("expected feedback add"),
        }
    }
}
