//! Presentation events
//!
//! The session tells its rendering collaborator what happened through a
//! [`PresentationSink`]. Events are emitted at key points:
//! - A card is revealed
//! - The counters change (every cursor move, prepare and restart)
//! - The deck runs out
//! - The display must be cleared (restart, new deck)
//! - The timer phase changes
//! - Audio playback fails

use crate::types::{Card, TimerPhase};
use serde::{Deserialize, Serialize};

/// Events emitted by the presentation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PresentationEvent {
    /// A card must be displayed and appended to the history
    Revealed {
        /// The card to render
        card: Card,
    },

    /// Shown/remaining counters changed
    CountersChanged {
        /// Cards revealed in this shuffle
        shown: usize,
        /// Cards left in this shuffle
        remaining: usize,
    },

    /// No cards remain; the presentation has been finalized
    Exhausted,

    /// Current card and history must be cleared
    Reset,

    /// Timer phase changed
    PhaseChanged {
        /// The new phase
        phase: TimerPhase,
    },

    /// Audio could not start or resume; presentation continues silently
    PlaybackFailed {
        /// Error message
        message: String,
    },
}

/// Rendering collaborator
///
/// Every method has an empty default so renderers implement only what they
/// display.
pub trait PresentationSink {
    /// Display `card` and add it to the history
    fn on_reveal(&mut self, _card: &Card) {}

    /// All cards of the shuffle have been shown
    fn on_exhausted(&mut self) {}

    /// Counters after a cursor change
    fn on_counter_change(&mut self, _shown: usize, _remaining: usize) {}

    /// Clear current card and history
    fn on_reset(&mut self) {}

    /// Timer phase changed
    fn on_state_change(&mut self, _phase: TimerPhase) {}

    /// Audio failed, presentation goes on
    fn on_playback_failure(&mut self, _message: &str) {}
}

/// Records every event in order
impl PresentationSink for Vec<PresentationEvent> {
    fn on_reveal(&mut self, card: &Card) {
        self.push(PresentationEvent::Revealed { card: card.clone() });
    }

    fn on_exhausted(&mut self) {
        self.push(PresentationEvent::Exhausted);
    }

    fn on_counter_change(&mut self, shown: usize, remaining: usize) {
        self.push(PresentationEvent::CountersChanged { shown, remaining });
    }

    fn on_reset(&mut self) {
        self.push(PresentationEvent::Reset);
    }

    fn on_state_change(&mut self, phase: TimerPhase) {
        self.push(PresentationEvent::PhaseChanged { phase });
    }

    fn on_playback_failure(&mut self, message: &str) {
        self.push(PresentationEvent::PlaybackFailed {
            message: message.to_string(),
        });
    }
}

impl<S: PresentationSink + ?Sized> PresentationSink for &mut S {
    fn on_reveal(&mut self, card: &Card) {
        (**self).on_reveal(card);
    }

    fn on_exhausted(&mut self) {
        (**self).on_exhausted();
    }

    fn on_counter_change(&mut self, shown: usize, remaining: usize) {
        (**self).on_counter_change(shown, remaining);
    }

    fn on_reset(&mut self) {
        (**self).on_reset();
    }

    fn on_state_change(&mut self, phase: TimerPhase) {
        (**self).on_state_change(phase);
    }

    fn on_playback_failure(&mut self, message: &str) {
        (**self).on_playback_failure(message);
    }
}
