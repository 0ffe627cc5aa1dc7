use anyhow::Result;

use persona_cli::app::App;
use persona_cli::config::Config;
use persona_cli::handler;
use persona_cli::tui::{self, EventHandler, Tui};
use persona_cli::ui;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, App::new(config)).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut Tui, mut app: App) -> Result<()> {
    let mut events = EventHandler::new();

    loop {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };
        handler::handle_event(&mut app, event)?;

        // Settled voice requests are picked up here; ticks keep the loop
        // turning while the user is idle.
        app.poll_voice_task().await;

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
