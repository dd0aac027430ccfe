use std::time::Duration;

use anyhow::Result;
use clap::Parser;

mod app;
mod config;
mod conversation;
mod error;
mod gemini;
mod handler;
mod persona;
mod reveal;
mod sanitize;
mod tui;
mod ui;

use app::App;
use config::Config;
use gemini::GeminiClient;

#[derive(Parser)]
#[command(name = "mindful")]
#[command(about = "Terminal therapy-chat companion powered by Gemini")]
struct Cli {
    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Milliseconds between revealed characters
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    // A missing key is not fatal here; it surfaces in the conversation on the
    // first submit instead of crashing the app.
    let api_key = config.resolve_api_key();
    let model = cli
        .model
        .or_else(|| config.model.clone())
        .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string());
    let delay_ms = cli.delay_ms.or(config.typing_delay_ms).unwrap_or(25);

    let client = GeminiClient::new(api_key, &model);
    let mut app = App::new(client);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new(Duration::from_millis(delay_ms));

    let result = run(&mut app, &mut terminal, &mut events).await;

    tui::restore()?;
    result
}

async fn run(app: &mut App, terminal: &mut tui::Tui, events: &mut tui::EventHandler) -> Result<()> {
    while !app.should_quit {
        app.poll_exchange().await;
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}
