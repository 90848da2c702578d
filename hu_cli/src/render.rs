//! Text rendering of session views.

use heads_up::{GameOutcome, GameView, Team, game::PlayingView};
use std::time::Duration;

fn secs(duration: Duration) -> u64 {
    duration.as_secs_f64().ceil() as u64
}

fn describe_playing(view: &PlayingView) -> String {
    let mut line = format!(
        "Card: {}  [{}s / {}s]",
        view.card,
        secs(view.time_left),
        secs(view.total_time)
    );
    if let Some(lives) = view.lives_remaining {
        line.push_str(&format!("  lives: {lives}"));
    }
    if let Some(teams) = &view.teams {
        line.push_str(&format!(
            "\n  {} (team {}) is up | red {}s, {} skips | blue {}s, {} skips",
            teams.current_player,
            teams.current_team,
            secs(teams.red_time_left),
            teams.red_skips_left,
            secs(teams.blue_time_left),
            teams.blue_skips_left,
        ));
    }
    line
}

/// One or two lines describing `view`.
pub fn describe(view: &GameView) -> String {
    match view {
        GameView::Loading => "Loading cards...".to_string(),
        GameView::Ready => "Ready. Type 'start' to show the first card.".to_string(),
        GameView::Playing(playing) => describe_playing(playing),
        GameView::PassingPhone(passing) => format!(
            "'{}' done. Pass the phone to {} (team {})",
            passing.card, passing.next_player_name, passing.next_team
        ),
        GameView::Finished(outcome) => summary(outcome),
    }
}

/// Final results, one line per card.
pub fn summary(outcome: &GameOutcome) -> String {
    let mut lines = vec![format!(
        "Game over: {} correct, {} points",
        outcome.correct_count(),
        outcome.total_points()
    )];
    for result in &outcome.results {
        lines.push(format!("  {:+} {}", result.points, result.card_text));
    }
    if let Some(scores) = outcome.team_scores {
        let winner = match scores.winner {
            Team::None => "draw".to_string(),
            team => format!("team {team} wins"),
        };
        lines.push(format!("Red {} - Blue {}: {winner}", scores.red, scores.blue));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use heads_up::{Card, CardResult, TeamScores};

    #[test]
    fn test_describe_playing() {
        let view = GameView::Playing(PlayingView {
            card: Card::new("Pyramids"),
            time_left: Duration::from_millis(4200),
            total_time: Duration::from_secs(20),
            lives_remaining: Some(2),
            teams: None,
        });
        assert_eq!(describe(&view), "Card: Pyramids  [5s / 20s]  lives: 2");
    }

    #[test]
    fn test_summary_with_teams() {
        let outcome = GameOutcome {
            results: vec![CardResult::new(&Card::new("Pyramids"), 1, Some(1))],
            team_scores: Some(TeamScores {
                red: 1,
                blue: 1,
                winner: Team::None,
            }),
        };
        let text = summary(&outcome);
        assert!(text.starts_with("Game over: 1 correct, 1 points"));
        assert!(text.contains("  +1 Pyramids"));
        assert!(text.ends_with("Red 1 - Blue 1: draw"));
    }
}
