//! Background music
//!
//! One looping track: starts with each run, stops when the run ends.
//! No output device is not an error; the game just runs silently.

use std::io::Cursor;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::sim::GameEvent;

/// What the music should do in response to a game event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCue {
    /// Restart the track from the beginning
    Restart,
    Stop,
}

impl MusicCue {
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Restarted => Some(MusicCue::Restart),
            GameEvent::Won | GameEvent::Lost { .. } => Some(MusicCue::Stop),
            _ => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    /// Kept alive for as long as anything plays
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
    track: Arc<[u8]>,
    volume: f32,
}

impl AudioManager {
    /// Open the default output device. The track must already be validated.
    ///
    /// The encoded track is kept shared; each `play` decodes it afresh.
    pub fn new(track: Arc<[u8]>, volume: f32) -> Self {
        let output = match OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(e) => {
                log::warn!("No audio output ({}) - music disabled", e);
                None
            }
        };
        Self {
            output,
            sink: None,
            track,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some() && self.volume > 0.0
    }

    /// Start the track from the beginning, looping forever
    pub fn play(&mut self) {
        self.stop();
        if !self.is_enabled() {
            return;
        }
        let Some((_, handle)) = &self.output else {
            return;
        };

        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::warn!("Failed to open audio sink: {}", e);
                return;
            }
        };
        match Decoder::new_looped(Cursor::new(self.track.clone())) {
            Ok(source) => {
                sink.set_volume(self.volume);
                sink.append(source);
                self.sink = Some(sink);
            }
            Err(e) => log::warn!("Failed to decode music: {}", e),
        }
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    /// React to a simulation event
    pub fn handle_event(&mut self, event: &GameEvent) {
        match MusicCue::for_event(event) {
            Some(MusicCue::Restart) => self.play(),
            Some(MusicCue::Stop) => self.stop(),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_shares_the_track() {
        let track: Arc<[u8]> = Arc::from(&b"not an mp3"[..]);
        let mut audio = AudioManager::new(track.clone(), 0.5);
        audio.play();
        audio.play();

        assert!(Arc::ptr_eq(&audio.track, &track));
        // Undecodable data never leaves a sink or a decoder holding the bytes
        assert!(audio.sink.is_none());
        assert_eq!(Arc::strong_count(&track), 2);
    }

    #[test]
    fn test_music_cues() {
        assert_eq!(MusicCue::for_event(&GameEvent::Restarted), Some(MusicCue::Restart));
        assert_eq!(MusicCue::for_event(&GameEvent::Won), Some(MusicCue::Stop));
        assert_eq!(
            MusicCue::for_event(&GameEvent::Lost { cleared: 3 }),
            Some(MusicCue::Stop)
        );
        assert_eq!(MusicCue::for_event(&GameEvent::Jumped), None);
        assert_eq!(
            MusicCue::for_event(&GameEvent::ObstaclePassed { total: 1 }),
            None
        );
    }
}
