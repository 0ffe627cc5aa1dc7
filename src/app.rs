use bytes::Bytes;
use ratatui::widgets::ListState;

use crate::audio::AudioPlayer;
use crate::config::Config;
use crate::persona::Persona;
use crate::session::ChatSession;
use crate::voice::VoiceClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Select,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Transient user-visible notice, cleared after a few ticks.
pub struct Notice {
    pub text: String,
    pub ticks_left: u8,
}

const NOTICE_TICKS: u8 = 16;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub config: Config,

    // Selection screen
    pub catalog_state: ListState,

    // Conversation screen
    pub session: Option<ChatSession>,
    pub input: String,
    pub cursor: usize,
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,
    pub selected_message_idx: Option<usize>,

    // The single in-flight voice request, if any
    pub voice_task: Option<tokio::task::JoinHandle<anyhow::Result<Bytes>>>,

    pub notice: Option<Notice>,
    pub animation_frame: u8,

    // External collaborators
    pub voice: VoiceClient,
    pub player: Option<AudioPlayer>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let voice = VoiceClient::new(&config.endpoint());
        // No audio device is not fatal; replies still land in the transcript.
        let player = AudioPlayer::new().ok();

        let mut catalog_state = ListState::default();
        catalog_state.select(Some(0));

        Self {
            should_quit: false,
            screen: Screen::Select,
            input_mode: InputMode::Normal,
            config,

            catalog_state,

            session: None,
            input: String::new(),
            cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            selected_message_idx: None,

            voice_task: None,

            notice: None,
            animation_frame: 0,

            voice,
            player,
        }
    }

    // Selection screen navigation

    pub fn selected_persona(&self) -> Option<Persona> {
        self.catalog_state
            .selected()
            .and_then(|i| Persona::all().get(i).copied())
    }

    pub fn catalog_nav_down(&mut self) {
        let len = Persona::all().len();
        if len > 0 {
            let i = self.catalog_state.selected().unwrap_or(0);
            self.catalog_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn catalog_nav_up(&mut self) {
        let i = self.catalog_state.selected().unwrap_or(0);
        self.catalog_state.select(Some(i.saturating_sub(1)));
    }

    // Conversation lifecycle

    pub fn open_chat(&mut self, persona: Persona) {
        self.session = Some(ChatSession::new(persona));
        self.input.clear();
        self.cursor = 0;
        self.chat_scroll = 0;
        self.selected_message_idx = None;
        self.notice = None;
        self.screen = Screen::Chat;
        self.input_mode = InputMode::Editing;
    }

    /// Leave the conversation. Takes the in-flight task so a late response
    /// cannot touch a session that no longer exists, and releases the
    /// playback slot.
    pub fn close_chat(&mut self) {
        if let Some(task) = self.voice_task.take() {
            task.abort();
        }
        if let Some(player) = self.player.as_mut() {
            player.stop();
        }
        self.session = None;
        self.input.clear();
        self.cursor = 0;
        self.input_mode = InputMode::Normal;
        self.screen = Screen::Select;
    }

    /// Submit the input line. The session guard decides whether a request
    /// goes out; while one is pending (or the input is blank) this is a
    /// no-op and nothing is queued.
    pub fn submit_input(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let Some(request) = session.submit(&self.input) else {
            return;
        };

        self.input.clear();
        self.cursor = 0;
        self.scroll_chat_to_bottom();

        let voice = self.voice.clone();
        self.voice_task = Some(tokio::spawn(async move {
            voice.generate(&request.text, request.persona_id).await
        }));
    }

    /// Harvest the voice task once it settles. Called from the main loop;
    /// ticks arrive often enough that completion is picked up promptly.
    pub async fn poll_voice_task(&mut self) {
        let finished = self
            .voice_task
            .as_ref()
            .map(|t| t.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        let Some(task) = self.voice_task.take() else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match task.await {
            Ok(Ok(audio)) => {
                if let Some(id) = session.complete(audio) {
                    self.scroll_chat_to_bottom();
                    if self.config.autoplay() {
                        self.play_message(&id);
                    }
                }
            }
            Ok(Err(_)) | Err(_) => {
                session.fail();
                self.show_notice("Could not get a response. Please try again.");
            }
        }
    }

    // Playback

    /// Start (or restart) playback of a message's audio. Any clip already
    /// playing is stopped first.
    pub fn play_message(&mut self, id: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(audio) = session.message(id).and_then(|m| m.audio.clone()) else {
            return;
        };

        let Some(player) = self.player.as_mut() else {
            self.show_notice("No audio output device available.");
            return;
        };

        match player.play(audio) {
            Ok(()) => {
                session.mark_playing(id);
            }
            Err(_) => {
                self.show_notice("Could not play the voice response.");
            }
        }
    }

    // Transcript navigation (for replaying past responses)

    pub fn select_next_message(&mut self) {
        let len = self.transcript_len();
        if len > 0 {
            let i = self.selected_message_idx.map(|i| i + 1).unwrap_or(0);
            self.selected_message_idx = Some(i.min(len - 1));
        }
    }

    pub fn select_prev_message(&mut self) {
        if let Some(i) = self.selected_message_idx {
            self.selected_message_idx = Some(i.saturating_sub(1));
        } else if self.transcript_len() > 0 {
            self.selected_message_idx = Some(0);
        }
    }

    pub fn replay_selected_message(&mut self) {
        let id = self.selected_message_idx.and_then(|i| {
            self.session
                .as_ref()
                .and_then(|s| s.transcript().get(i))
                .filter(|m| m.has_audio())
                .map(|m| m.id.clone())
        });
        if let Some(id) = id {
            self.play_message(&id);
        }
    }

    fn transcript_len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.transcript().len())
    }

    // Chat scrolling

    pub fn scroll_chat_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    pub fn scroll_chat_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    /// Scroll so the newest message (and the thinking indicator) is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;
        if let Some(session) = &self.session {
            for msg in session.transcript() {
                total_lines += 1; // speaker line
                for line in msg.text.lines() {
                    let char_count = line.chars().count();
                    if char_count == 0 {
                        total_lines += 1;
                    } else {
                        total_lines += ((char_count / wrap_width) + 1) as u16;
                    }
                }
                if msg.has_audio() {
                    total_lines += 1; // replay hint line
                }
                total_lines += 1; // blank separator
            }
        }

        // Room for the thinking indicator
        total_lines += 2;

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        }
    }

    // Notices and ticks

    pub fn show_notice(&mut self, text: &str) {
        self.notice = Some(Notice {
            text: text.to_string(),
            ticks_left: NOTICE_TICKS,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.session.as_ref().map_or(false, |s| s.is_pending())
    }

    /// Advance animation, expire the notice, and clear the playing marker
    /// once the current clip drains.
    pub fn tick(&mut self) {
        if self.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }

        if let Some(notice) = self.notice.as_mut() {
            notice.ticks_left = notice.ticks_left.saturating_sub(1);
            if notice.ticks_left == 0 {
                self.notice = None;
            }
        }

        let drained = self.player.as_ref().map_or(false, |p| p.finished());
        if drained {
            if let Some(player) = self.player.as_mut() {
                player.stop();
            }
            if let Some(session) = self.session.as_mut() {
                session.clear_playing();
            }
        }
    }
}
