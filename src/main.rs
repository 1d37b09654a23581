use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use ayan_chat::{
    App, Config, GeminiClient, Overrides, Settings, handler, logging, tui, ui,
};

#[derive(Parser)]
#[command(name = "ayan")]
#[command(version, about = "Chat with Gemini from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log file for the interactive chat (defaults to the user cache dir)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Args, Clone, Default)]
struct ConnectionArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,
    /// Model name
    #[arg(short, long, env = "GEMINI_MODEL", global = true)]
    model: Option<String>,
    /// API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,
}

impl From<ConnectionArgs> for Overrides {
    fn from(args: ConnectionArgs) -> Self {
        Self {
            api_key: args.api_key,
            model: args.model,
            base_url: args.base_url,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Ask {
        /// Your message
        text: String,
    },
    /// Store the given connection values in the config file
    Configure,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (if present) before clap reads the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let overrides = Overrides::from(cli.connection);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let log_path = match cli.log_file {
                Some(path) => path,
                None => logging::default_log_path()?,
            };
            logging::init_file(&log_path)?;
            let settings = Settings::resolve(&overrides, &Config::load()?)?;
            run_chat(&settings).await
        }
        Commands::Ask { text } => {
            logging::init_stderr()?;
            let settings = Settings::resolve(&overrides, &Config::load()?)?;
            ask_once(&settings, &text).await
        }
        Commands::Configure => {
            logging::init_stderr()?;
            configure(&overrides)
        }
    }
}

async fn run_chat(settings: &Settings) -> Result<()> {
    info!(model = %settings.model, base_url = %settings.base_url, "starting chat");
    let mut app = App::new(GeminiClient::new(settings));

    let mut terminal = tui::TerminalGuard::enter()?;
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;
        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event).await,
            None => break,
        }
    }

    app.shutdown();
    drop(terminal);
    info!(messages = app.session.transcript().len(), "chat closed");
    Ok(())
}

async fn ask_once(settings: &Settings, text: &str) -> Result<()> {
    let mut app = App::new(GeminiClient::new(settings));
    let reply = app.ask(text).await?;
    println!("{reply}");
    Ok(())
}

fn configure(overrides: &Overrides) -> Result<()> {
    let mut config = Config::load()?;
    config.merge(overrides);
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
