use std::io::Cursor;

use anyhow::{Context, Result};
use bytes::Bytes;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

/// Single-slot audio playback. Starting a new clip stops and replaces the
/// previous sink, so at most one clip is ever audible.
pub struct AudioPlayer {
    // The output stream must outlive every sink connected to its mixer.
    stream: OutputStream,
    current: Option<Sink>,
}

impl AudioPlayer {
    /// Open the default output device. Fails on machines without audio
    /// output; callers treat the player as optional.
    pub fn new() -> Result<Self> {
        let stream = OutputStreamBuilder::open_default_stream()
            .context("could not open audio output device")?;
        Ok(Self {
            stream,
            current: None,
        })
    }

    /// Decode and start playing `data`, displacing any clip still playing.
    pub fn play(&mut self, data: Bytes) -> Result<()> {
        self.stop();

        let source = Decoder::new(Cursor::new(data)).context("could not decode audio payload")?;
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        self.current = Some(sink);
        Ok(())
    }

    /// Stop playback and release the slot.
    pub fn stop(&mut self) {
        if let Some(sink) = self.current.take() {
            sink.stop();
        }
    }

    /// True when the current clip has drained. Polled on ticks to clear the
    /// session's playing marker.
    pub fn finished(&self) -> bool {
        self.current.as_ref().map_or(true, |sink| sink.empty())
    }
}
