//! Session actor message types.

use crate::{
    game::{
        entities::{Answer, Card, GameOutcome},
        states::GameView,
    },
    gesture::Gesture,
};
use tokio::sync::{mpsc, oneshot};

/// Messages that can be sent to a SessionActor
#[derive(Debug)]
pub enum SessionMessage {
    /// Hand over the shuffled deck
    Deal {
        cards: Vec<Card>,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Show the first card
    Start {
        response: oneshot::Sender<SessionResponse>,
    },

    /// Resolve the card in play
    Answer {
        answer: Answer,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Gesture detected by the host's classifier
    Gesture {
        gesture: Gesture,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Get the current view with live timers
    GetView { response: oneshot::Sender<GameView> },

    /// End the game early
    End {
        response: oneshot::Sender<SessionResponse>,
    },

    /// Stop the actor and cancel every timer
    Close {
        response: oneshot::Sender<SessionResponse>,
    },

    /// Subscribe to session updates
    Subscribe {
        subscriber_id: u64,
        sender: mpsc::Sender<SessionUpdate>,
    },

    /// Unsubscribe from session updates
    Unsubscribe { subscriber_id: u64 },
}

/// Notification sent to subscribers when the session moves on
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// The session changed phase or card
    ViewChanged(GameView),
    /// The session reached its final results
    Finished(GameOutcome),
}

/// Response from session operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResponse {
    /// Operation applied
    Success,

    /// Input doesn't apply in the current phase and was dropped
    Ignored,

    /// Operation failed
    Error(String),
}

impl SessionResponse {
    /// Check if response is success
    pub fn is_success(&self) -> bool {
        matches!(self, SessionResponse::Success)
    }

    /// Get error message if response is error
    pub fn error_message(&self) -> Option<String> {
        match self {
            SessionResponse::Error(msg) => Some(msg.clone()),
            SessionResponse::Ignored => Some("Input ignored in this phase".to_string()),
            SessionResponse::Success => None,
        }
    }
}

impl From<bool> for SessionResponse {
    fn from(applied: bool) -> Self {
        if applied {
            SessionResponse::Success
        } else {
            SessionResponse::Ignored
        }
    }
}
