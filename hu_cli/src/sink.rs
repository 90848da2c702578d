//! Results sink that logs what a game adds to each player's statistics.

use async_trait::async_trait;
use heads_up::{
    GameMode, GameOutcome, ResultsSink, SinkError, StatsDelta, session::SessionId,
};

#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl ResultsSink for LogSink {
    async fn record(
        &self,
        session_id: SessionId,
        mode: GameMode,
        outcome: &GameOutcome,
    ) -> Result<(), SinkError> {
        log::info!(
            "Session {session_id} ({mode}) finished with {} results",
            outcome.results.len()
        );
        for delta in StatsDelta::per_player(&outcome.results) {
            log::info!(
                "Player {}: +{} games, +{} correct, +{} score",
                delta.player_id,
                delta.games_played,
                delta.correct_guesses,
                delta.score
            );
        }
        Ok(())
    }
}
