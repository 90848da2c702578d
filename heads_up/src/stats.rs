//! Player statistics derived from a finished session.
//!
//! Persisting statistics is the host's business. The engine only computes
//! the per-player [`StatsDelta`] and hands finished sessions to a
//! [`ResultsSink`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Mutex};
use thiserror::Error;

use crate::{
    game::{
        constants::GUEST_PLAYER_ID,
        entities::{CardResult, GameMode, GameOutcome, PlayerId},
    },
    session::SessionId,
};

/// Results sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// Sink can't be used anymore
    #[error("Results sink is unavailable")]
    Unavailable,
}

/// What a finished game adds to a player's lifetime statistics.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StatsDelta {
    pub player_id: PlayerId,
    pub games_played: u32,
    pub correct_guesses: u32,
    /// Sum of the player's points, never below zero.
    pub score: u32,
}

impl StatsDelta {
    /// Delta for `player_id` over `results`. Guests and synthesized
    /// placeholders don't keep statistics.
    #[must_use]
    pub fn for_player(player_id: PlayerId, results: &[CardResult]) -> Option<Self> {
        if !tracks_stats(player_id) {
            return None;
        }

        let mut correct_guesses = 0;
        let mut points = 0i64;
        for result in results {
            if result.is_correct() {
                correct_guesses += 1;
            }
            points += i64::from(result.points);
        }

        Some(Self {
            player_id,
            games_played: 1,
            correct_guesses,
            score: u32::try_from(points.max(0)).unwrap_or(u32::MAX),
        })
    }

    /// One delta per player responsible for at least one result, ordered
    /// by player id.
    #[must_use]
    pub fn per_player(results: &[CardResult]) -> Vec<Self> {
        let mut by_player: BTreeMap<PlayerId, Vec<CardResult>> = BTreeMap::new();
        for result in results {
            if let Some(player_id) = result.player_id {
                by_player
                    .entry(player_id)
                    .or_default()
                    .push(result.clone());
            }
        }

        by_player
            .into_iter()
            .filter_map(|(player_id, results)| Self::for_player(player_id, &results))
            .collect()
    }
}

fn tracks_stats(player_id: PlayerId) -> bool {
    player_id > GUEST_PLAYER_ID
}

/// Receives every finished session exactly once.
#[async_trait]
pub trait ResultsSink: Send + Sync {
    async fn record(
        &self,
        session_id: SessionId,
        mode: GameMode,
        outcome: &GameOutcome,
    ) -> Result<(), SinkError>;
}

/// Sink keeping everything in memory, for tests and hosts without storage.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(SessionId, GameMode, GameOutcome)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions recorded so far, oldest first.
    pub fn records(&self) -> Vec<(SessionId, GameMode, GameOutcome)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Deltas of every recorded session, flattened.
    pub fn deltas(&self) -> Vec<StatsDelta> {
        self.records()
            .iter()
            .flat_map(|(_, _, outcome)| StatsDelta::per_player(&outcome.results))
            .collect()
    }
}

#[async_trait]
impl ResultsSink for MemorySink {
    async fn record(
        &self,
        session_id: SessionId,
        mode: GameMode,
        outcome: &GameOutcome,
    ) -> Result<(), SinkError> {
        let mut records = self.records.lock().map_err(|_| SinkError::Unavailable)?;
        records.push((session_id, mode, outcome.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Card;
    use uuid::Uuid;

    fn result(points: i8, player_id: Option<PlayerId>) -> CardResult {
        CardResult::new(&Card::new("card"), points, player_id)
    }

    #[test]
    fn test_delta_counts_correct_and_score() {
        let results = [result(1, Some(3)), result(-1, Some(3)), result(1, Some(3)), result(0, Some(3))];
        assert_eq!(
            StatsDelta::for_player(3, &results),
            Some(StatsDelta {
                player_id: 3,
                games_played: 1,
                correct_guesses: 2,
                score: 1,
            })
        );
    }

    #[test]
    fn test_negative_score_clamped() {
        let results = [result(-1, Some(3)), result(-1, Some(3))];
        let delta = StatsDelta::for_player(3, &results).unwrap();
        assert_eq!(delta.score, 0);
        assert_eq!(delta.games_played, 1);
    }

    #[test]
    fn test_guest_and_placeholders_have_no_stats() {
        assert_eq!(StatsDelta::for_player(GUEST_PLAYER_ID, &[result(1, Some(0))]), None);
        assert_eq!(StatsDelta::for_player(-1, &[result(1, Some(-1))]), None);
    }

    #[test]
    fn test_per_player_groups_results() {
        let results = [
            result(1, Some(7)),
            result(-1, Some(2)),
            result(1, Some(7)),
            result(1, Some(-2)),
            result(1, None),
        ];
        let deltas = StatsDelta::per_player(&results);
        assert_eq!(deltas.len(), 2);
        assert_eq!((deltas[0].player_id, deltas[0].score), (2, 0));
        assert_eq!((deltas[1].player_id, deltas[1].correct_guesses), (7, 2));
    }

    #[tokio::test]
    async fn test_memory_sink_records() {
        let sink = MemorySink::new();
        let outcome = GameOutcome {
            results: vec![result(1, Some(5))],
            team_scores: None,
        };
        sink.record(Uuid::new_v4(), GameMode::Standard, &outcome)
            .await
            .unwrap();

        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.deltas()[0].correct_guesses, 1);
    }
}
