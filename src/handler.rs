use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode, Screen};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key)?,
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global quit
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    match app.screen {
        Screen::Select => handle_select_key(app, key),
        Screen::Chat => match app.input_mode {
            InputMode::Normal => handle_chat_normal(app, key),
            InputMode::Editing => handle_chat_editing(app, key),
        },
    }

    Ok(())
}

fn handle_select_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down => app.catalog_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.catalog_nav_up(),

        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if let Some(persona) = app.selected_persona() {
                app.open_chat(persona);
            }
        }

        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        // Leave the conversation; the session and any in-flight request die
        // with it
        KeyCode::Esc | KeyCode::Char('q') => app.close_chat(),

        // Focus the input
        KeyCode::Char('i') | KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
            app.cursor = app.input.chars().count();
        }

        // Transcript navigation
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next_message();
            app.scroll_chat_down();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev_message();
            app.scroll_chat_up();
        }
        KeyCode::Char('g') => app.chat_scroll = 0,
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),

        // Replay the selected voice response
        KeyCode::Enter | KeyCode::Char('p') => app.replay_selected_message(),

        // Stop playback
        KeyCode::Char('s') => {
            if let Some(player) = app.player.as_mut() {
                player.stop();
            }
            if let Some(session) = app.session.as_mut() {
                session.clear_playing();
            }
        }

        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        // Submission is guarded by the session: while a request is pending
        // or the input is blank, Enter changes nothing
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.input, app.cursor);
            app.input.insert(byte_pos, c);
            app.cursor += 1;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Config::default())
    }

    #[test]
    fn enter_on_a_card_opens_an_empty_conversation() {
        let mut app = app();
        app.catalog_nav_down(); // kiran
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.screen, Screen::Chat);
        assert_eq!(app.input_mode, InputMode::Editing);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.persona.id, "kiran");
        assert!(session.transcript().is_empty());
        assert!(!session.is_pending());
    }

    #[test]
    fn selection_does_not_run_past_the_catalog() {
        let mut app = app();
        for _ in 0..10 {
            handle_key(&mut app, key(KeyCode::Char('j'))).unwrap();
        }
        assert_eq!(app.selected_persona().unwrap().id, "sima");
        for _ in 0..10 {
            handle_key(&mut app, key(KeyCode::Char('k'))).unwrap();
        }
        assert_eq!(app.selected_persona().unwrap().id, "nikhil");
    }

    #[test]
    fn esc_leaves_the_conversation_and_drops_the_session() {
        let mut app = app();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        handle_key(&mut app, key(KeyCode::Esc)).unwrap(); // back to normal mode
        handle_key(&mut app, key(KeyCode::Esc)).unwrap(); // close chat

        assert_eq!(app.screen, Screen::Select);
        assert!(app.session.is_none());
        assert!(app.voice_task.is_none());
    }

    #[test]
    fn input_editing_is_utf8_safe() {
        let mut app = app();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        for c in "héllo".chars() {
            handle_key(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Home)).unwrap();
        handle_key(&mut app, key(KeyCode::Right)).unwrap();
        handle_key(&mut app, key(KeyCode::Right)).unwrap();
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.input, "hllo");
    }

    #[tokio::test]
    async fn enter_with_blank_input_sends_nothing() {
        let mut app = app();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        handle_key(&mut app, key(KeyCode::Char(' '))).unwrap();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        let session = app.session.as_ref().unwrap();
        assert!(session.transcript().is_empty());
        assert!(app.voice_task.is_none());
    }
}
