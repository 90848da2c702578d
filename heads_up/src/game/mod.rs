//! Game session engine.
//!
//! This module provides the in-memory game logic:
//! - Session state machine shared by all modes (`Loading → Ready → Playing ⇄
//!   PassingPhone → Finished`)
//! - One rules implementation per game mode
//! - Hot Potato team assignment and turn rotation
//! - UI-facing views of each phase

pub mod constants;
pub mod entities;
pub mod functional;
pub mod hot_potato;
pub mod rules;
pub mod state_machine;
pub mod states;

pub use hot_potato::{TeamRotation, TeamState, Verdict};
pub use rules::{HotPotatoRules, StandardRules, ThreeLivesRules};
pub use state_machine::{
    GameEvent, ModeRules, Rules, Session, SessionError, SessionResult, SessionSetup, Step,
    TimerCommand,
};
pub use states::{GameView, PassingView, PlayingView, TeamClocks};
