use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use mental_coach::render::response_lines;
use mental_coach::tui::{self, EventHandler, Tui};
use mental_coach::{handler, logging, ui, App, ChatClient, Config};

#[derive(Parser)]
#[command(name = "coach", version)]
#[command(about = "Talk to the AI Mental Coach about stress, motivation, habits, and confidence")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides COACH_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message and print the reply
    Ask {
        /// What's on your mind
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Ask { .. }) => logging::init_stderr(cli.verbose)?,
        None => {
            if let Err(err) = logging::init_file(cli.verbose) {
                eprintln!("warning: file logging disabled: {}", err);
            }
        }
    }

    // Reported on stderr too: in TUI mode the log goes to a file
    let config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unreadable config file");
        eprintln!("warning: ignoring config file: {:#}", err);
        Config::new()
    });
    let client = ChatClient::new(&config.api_url(cli.api_url.as_deref()));
    info!(backend = client.base_url(), "using chat backend");

    match cli.command {
        Some(Commands::Ask { message }) => run_ask(client, &message).await,
        None => {
            run_tui(client).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_ask(client: ChatClient, message: &str) -> Result<ExitCode> {
    let mut app = App::new(client);
    app.set_draft(message);

    // Blank input is ignored, not an error
    if !app.submit_and_wait().await {
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(error) = &app.error {
        eprintln!("Error: {}", error);
        return Ok(ExitCode::FAILURE);
    }

    if let Some(response) = app.visible_response() {
        for line in response_lines(response) {
            println!("{}", line);
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_tui(client: ChatClient) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let mut app = App::new(client);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }

        app.poll_pending().await;
    }

    Ok(())
}
