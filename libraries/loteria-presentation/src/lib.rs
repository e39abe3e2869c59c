//! Loteria Caller - Presentation Core
//!
//! Platform-agnostic card presentation for a Loteria caller.
//!
//! This crate provides:
//! - Uniform deck shuffle with a reveal cursor and shown history
//! - Pause-aware display countdown (resume keeps the remaining time)
//! - Soundtrack selection, looping and time-sliced volume fades
//! - Bounded reveal history for renderers
//!
//! # Architecture
//!
//! `loteria-presentation` never sleeps, spawns threads or touches a device:
//! - Time comes from a [`Clock`]
//! - Audio goes to an [`AudioOutput`]
//! - Everything visible goes to a [`PresentationSink`]
//!
//! A driver waits until [`PresentationSession::next_wakeup`] (or a user
//! command) and then calls [`PresentationSession::poll`].
//!
//! # Example
//!
//! ```rust
//! use loteria_presentation::{
//!     Card, ManualClock, PresentationConfig, PresentationEvent, PresentationSession,
//!     SilentOutput,
//! };
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let events: Vec<PresentationEvent> = Vec::new();
//! let mut session = PresentationSession::with_clock(
//!     PresentationConfig::default(),
//!     SilentOutput,
//!     events,
//!     clock.clone(),
//! );
//!
//! session.load_deck(vec![
//!     Card::from_path("/cards/El Gallo.png"),
//!     Card::from_path("/cards/La Dama.png"),
//! ]);
//! session.start().unwrap();
//! assert_eq!(session.shown_count(), 1);
//!
//! // Second card after the display window
//! clock.advance(Duration::from_millis(8000));
//! session.poll();
//! assert_eq!(session.shown_count(), 2);
//! ```

mod audio;
mod clock;
mod countdown;
mod deck;
mod error;
mod events;
mod fade;
mod history;
mod session;
mod shuffle;
mod soundtrack;
pub mod types;

// Public exports
pub use audio::{AudioOutput, SilentOutput};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use countdown::{Countdown, PendingExpiry, TimerState};
pub use deck::{DeckSequencer, Reveal};
pub use error::{PresentationError, Result};
pub use events::{PresentationEvent, PresentationSink};
pub use fade::{FadeController, FadeDirection};
pub use history::RevealHistory;
pub use session::PresentationSession;
pub use shuffle::{choose_track, shuffle_cards};
pub use soundtrack::Soundtrack;
pub use types::{
    AudioState, AudioTrack, Card, Deck, FadeSettings, LoadStatus, PresentationConfig, TimerPhase,
};
