pub mod app;
pub mod audio;
pub mod config;
pub mod handler;
pub mod persona;
pub mod session;
pub mod tui;
pub mod ui;
pub mod voice;

// Re-export main types for convenience
pub use app::App;
pub use config::Config;
pub use persona::{Persona, PersonaColor};
pub use session::{ChatMessage, ChatSession, OutboundRequest, SessionState};
pub use voice::VoiceClient;
