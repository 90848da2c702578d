//! # Heads Up
//!
//! Session engine for the Heads-Up guessing party game: one player holds the
//! device to their forehead while the others describe the word on the card.
//!
//! The core game is implemented as a state machine shared by every mode, with
//! the mode-specific rules dispatched through `enum_dispatch`:
//!
//! - **Standard**: a fixed number of cards for a single player
//! - **Three Lives**: the whole deck until three cards are missed
//! - **Hot Potato**: two teams pass the device around, each with its own clock
//!   and skip budget
//!
//! Every session moves through `Loading → Ready → Playing ⇄ PassingPhone →
//! Finished`.
//!
//! ## Core Modules
//!
//! - [`game`]: Session state machine, entities, rules and team rotation
//! - [`gesture`]: Accelerometer gesture classification
//! - [`session`]: Async actor running a session with real timers
//! - [`stats`]: Player statistics derived from finished sessions
//!
//! ## Example
//!
//! ```
//! use heads_up::{Answer, Card, GameSettings, GameView, Session, SessionSetup};
//!
//! let mut session = Session::new(
//!     SessionSetup::Standard { player_id: Some(1) },
//!     GameSettings::default(),
//!     &mut rand::rng(),
//! );
//! session.deal(vec![Card::new("Eiffel Tower")]).unwrap();
//! session.start().unwrap();
//! session.process_answer(Answer::Correct);
//!
//! assert!(matches!(session.view(), GameView::Finished(_)));
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    GameEvent, GameView, Session, SessionError, SessionResult, SessionSetup, TeamRotation,
    TimerCommand,
    constants,
    entities::{
        self, Answer, Card, CardResult, GameMode, GameOutcome, GameSettings, HotPotatoSettings,
        Player, PlayerId, Team, TeamScores,
    },
    functional,
};

/// Accelerometer gesture detection.
pub mod gesture;
pub use gesture::{Gesture, GestureClassifier, Sample};

/// Async session actor and configuration.
pub mod session;
pub use session::{SessionActor, SessionConfig, SessionHandle};

pub mod stats;
pub use stats::{MemorySink, ResultsSink, SinkError, StatsDelta};
