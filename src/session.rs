use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

use crate::persona::Persona;

/// One entry in a conversation transcript. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub is_user: bool,
    pub audio: Option<Bytes>,
    pub created_at: SystemTime,
}

impl ChatMessage {
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

/// The one outbound call a submission produces. The session only describes
/// it; the caller owns the actual HTTP side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub text: String,
    pub persona_id: &'static str,
}

/// Per-conversation state: transcript, request guard, playback slot.
///
/// Independent of any rendering; the TUI layers on top. Each session owns
/// its transcript and playback slot exclusively and nothing survives it.
pub struct ChatSession {
    pub persona: Persona,
    transcript: Vec<ChatMessage>,
    state: SessionState,
    now_playing: Option<String>,
    next_seq: u64,
}

impl ChatSession {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            transcript: Vec::new(),
            state: SessionState::Idle,
            now_playing: None,
            next_seq: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == SessionState::AwaitingResponse
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn message(&self, id: &str) -> Option<&ChatMessage> {
        self.transcript.iter().find(|m| m.id == id)
    }

    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    /// Submit user text. Appends the user message optimistically and moves
    /// to `AwaitingResponse`, yielding the single request to issue.
    ///
    /// Returns `None` (and changes nothing) while a request is already in
    /// flight or when the text is empty after trimming. Additional
    /// submissions are dropped, not queued.
    pub fn submit(&mut self, text: &str) -> Option<OutboundRequest> {
        if self.state != SessionState::Idle || text.trim().is_empty() {
            return None;
        }

        let message = self.make_message(text.to_string(), true, None);
        self.transcript.push(message);
        self.state = SessionState::AwaitingResponse;

        Some(OutboundRequest {
            text: text.to_string(),
            persona_id: self.persona.id,
        })
    }

    /// Record a successful response. Appends the assistant message carrying
    /// the audio payload and returns its id so the caller can start
    /// playback. No-op unless a request was in flight.
    pub fn complete(&mut self, audio: Bytes) -> Option<String> {
        if self.state != SessionState::AwaitingResponse {
            return None;
        }

        let text = format!("Voice response from {}", self.persona.name);
        let message = self.make_message(text, false, Some(audio));
        let id = message.id.clone();
        self.transcript.push(message);
        self.state = SessionState::Idle;
        Some(id)
    }

    /// Record a failed response. The user message stays in the transcript;
    /// no assistant message is appended. The session is usable again
    /// immediately.
    pub fn fail(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Mark a message as the one currently playing. Only one message can
    /// hold the slot; marking a new one displaces the old. Returns false if
    /// the id does not name a message with audio.
    pub fn mark_playing(&mut self, id: &str) -> bool {
        match self.message(id) {
            Some(m) if m.has_audio() => {
                self.now_playing = Some(id.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn clear_playing(&mut self) {
        self.now_playing = None;
    }

    fn make_message(&mut self, text: String, is_user: bool, audio: Option<Bytes>) -> ChatMessage {
        let created_at = SystemTime::now();
        let millis = created_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        // Two messages can land in the same millisecond; the sequence
        // counter keeps ids unique within the session.
        let seq = self.next_seq;
        self.next_seq += 1;
        ChatMessage {
            id: format!("{millis}-{seq}"),
            text,
            is_user,
            audio,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::Persona;

    fn session() -> ChatSession {
        ChatSession::new(Persona::all()[0])
    }

    fn audio() -> Bytes {
        Bytes::from_static(b"RIFF....WAVE")
    }

    #[test]
    fn empty_or_whitespace_submit_is_a_noop() {
        let mut s = session();
        assert!(s.submit("").is_none());
        assert!(s.submit("   \t\n").is_none());
        assert!(s.transcript().is_empty());
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn submit_appends_and_yields_one_request() {
        let mut s = session();
        let request = s.submit("hello").expect("request");
        assert_eq!(request.text, "hello");
        assert_eq!(request.persona_id, "nikhil");
        assert_eq!(s.transcript().len(), 1);
        assert!(s.transcript()[0].is_user);
        assert_eq!(s.state(), SessionState::AwaitingResponse);
    }

    #[test]
    fn submit_while_pending_is_rejected_not_queued() {
        let mut s = session();
        assert!(s.submit("a").is_some());
        assert!(s.submit("b").is_none());
        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.transcript()[0].text, "a");
    }

    #[test]
    fn successful_exchange_grows_transcript_by_two() {
        let mut s = session();
        s.submit("hello").unwrap();
        let id = s.complete(audio()).expect("assistant message");
        assert_eq!(s.transcript().len(), 2);
        assert_eq!(s.state(), SessionState::Idle);
        let assistant = s.message(&id).unwrap();
        assert!(!assistant.is_user);
        assert!(assistant.has_audio());
    }

    #[test]
    fn failed_exchange_keeps_user_message_and_returns_to_idle() {
        let mut s = session();
        s.submit("hello").unwrap();
        s.fail();
        assert_eq!(s.transcript().len(), 1);
        assert!(s.transcript()[0].is_user);
        assert_eq!(s.state(), SessionState::Idle);
        // Resubmission works immediately.
        assert!(s.submit("hello again").is_some());
    }

    #[test]
    fn complete_without_pending_request_is_ignored() {
        let mut s = session();
        assert!(s.complete(audio()).is_none());
        assert!(s.transcript().is_empty());
    }

    #[test]
    fn message_ids_are_unique() {
        let mut s = session();
        s.submit("one").unwrap();
        s.complete(audio()).unwrap();
        s.submit("two").unwrap();
        s.complete(audio()).unwrap();
        let mut ids: Vec<&str> = s.transcript().iter().map(|m| m.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn playback_slot_holds_at_most_one_message() {
        let mut s = session();
        s.submit("one").unwrap();
        let a = s.complete(audio()).unwrap();
        s.submit("two").unwrap();
        let b = s.complete(audio()).unwrap();

        assert!(s.mark_playing(&a));
        assert_eq!(s.now_playing(), Some(a.as_str()));
        assert!(s.mark_playing(&b));
        assert_eq!(s.now_playing(), Some(b.as_str()));

        s.clear_playing();
        assert_eq!(s.now_playing(), None);
    }

    #[test]
    fn user_messages_cannot_take_the_playback_slot() {
        let mut s = session();
        let user_id = {
            s.submit("hello").unwrap();
            s.transcript()[0].id.clone()
        };
        assert!(!s.mark_playing(&user_id));
        assert!(!s.mark_playing("no-such-id"));
        assert_eq!(s.now_playing(), None);
    }

    #[test]
    fn fresh_session_starts_idle_with_empty_transcript() {
        let kiran = Persona::all()[1];
        let s = ChatSession::new(kiran);
        assert_eq!(s.persona.id, "kiran");
        assert!(s.transcript().is_empty());
        assert_eq!(s.state(), SessionState::Idle);
    }
}
