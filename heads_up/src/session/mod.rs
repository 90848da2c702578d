//! Session module running a game session as an async actor.
//!
//! This module implements:
//! - SessionActor: Async actor owning one [`Session`](crate::game::Session)
//!   and the card, team and pass countdowns it asks for
//! - Message-based communication with tokio channels
//! - Session configuration and validation
//!
//! ## Architecture
//!
//! Each session runs in a separate Tokio task with an mpsc message inbox.
//! Countdowns report their expiry on a second channel; expiries of
//! countdowns that were cancelled or restarted in the meantime are dropped.
//!
//! ## Example
//!
//! ```no_run
//! use heads_up::{
//!     game::entities::{Answer, Card},
//!     session::{SessionActor, SessionConfig},
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let (actor, handle) = SessionActor::new(SessionConfig::default(), None, &mut rand::rng())?;
//! tokio::spawn(actor.run());
//!
//! handle.deal(vec![Card::new("Eiffel Tower"), Card::new("Pyramids")]).await?;
//! handle.start().await?;
//! handle.answer(Answer::Correct).await?;
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod messages;
pub mod timer;

pub use actor::{SessionActor, SessionHandle, SessionId};
pub use config::{ConfigError, ConfigResult, SessionConfig, parse_players};
pub use messages::{SessionMessage, SessionResponse, SessionUpdate};
pub use timer::{Countdown, Expiry, TimerKind};
