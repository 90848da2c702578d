//! Rules for each game mode.

use std::time::Duration;

use super::{
    constants::STARTING_LIVES,
    entities::{Answer, Card, CardResult, GameMode, GameSettings, PlayerId, Team, TeamScores},
    functional::{hot_potato_points, is_miss, points_for},
    hot_potato::{TeamRotation, Verdict},
    state_machine::{GameEvent, ModeRules, SessionData, SessionError, Step, TimerCommand},
    states::{PlayingView, TeamClocks},
};

/// Shows the card at the current index, or finishes once they ran out.
fn next_card_or_finish(data: &SessionData) -> Step {
    if data.current_card().is_some() {
        Step::Play
    } else {
        Step::Finish
    }
}

/// A fixed number of cards for a single player.
#[derive(Debug)]
pub struct StandardRules {
    player_id: Option<PlayerId>,
}

impl StandardRules {
    #[must_use]
    pub fn new(player_id: Option<PlayerId>) -> Self {
        Self { player_id }
    }
}

impl ModeRules for StandardRules {
    fn mode(&self) -> GameMode {
        GameMode::Standard
    }

    fn select_cards(&self, cards: Vec<Card>, settings: &GameSettings) -> Vec<Card> {
        cards.into_iter().take(settings.card_count).collect()
    }

    fn begin_round(&mut self, data: &mut SessionData) -> Step {
        next_card_or_finish(data)
    }

    fn resolve(&mut self, data: &mut SessionData, answer: Answer) -> Step {
        let Some(card) = data.current_card().cloned() else {
            return Step::Finish;
        };
        let points = points_for(answer, &data.settings);
        data.record(&card, answer, points, self.player_id);
        data.card_idx += 1;
        next_card_or_finish(data)
    }
}

/// The whole deck until three cards are missed.
#[derive(Debug)]
pub struct ThreeLivesRules {
    player_id: Option<PlayerId>,
    lives: u32,
}

impl ThreeLivesRules {
    #[must_use]
    pub fn new(player_id: Option<PlayerId>) -> Self {
        Self {
            player_id,
            lives: STARTING_LIVES,
        }
    }
}

impl ModeRules for ThreeLivesRules {
    fn mode(&self) -> GameMode {
        GameMode::ThreeLives
    }

    fn begin_round(&mut self, data: &mut SessionData) -> Step {
        next_card_or_finish(data)
    }

    fn resolve(&mut self, data: &mut SessionData, answer: Answer) -> Step {
        let Some(card) = data.current_card().cloned() else {
            return Step::Finish;
        };
        let points = points_for(answer, &data.settings);
        data.record(&card, answer, points, self.player_id);

        if is_miss(answer) {
            self.lives = self.lives.saturating_sub(1);
            data.push_event(GameEvent::LifeLost {
                lives_left: self.lives,
            });
            if self.lives == 0 {
                return Step::Finish;
            }
        }

        data.card_idx += 1;
        next_card_or_finish(data)
    }

    fn decorate(&self, view: &mut PlayingView) {
        view.lives_remaining = Some(self.lives);
    }
}

/// Two teams passing the device around, each with its own clock and skips.
#[derive(Debug)]
pub struct HotPotatoRules {
    rotation: TeamRotation,
}

impl HotPotatoRules {
    #[must_use]
    pub fn new(rotation: TeamRotation) -> Self {
        Self { rotation }
    }

    #[must_use]
    pub fn rotation(&self) -> &TeamRotation {
        &self.rotation
    }

    fn abandon(data: &mut SessionData, error: SessionError) -> Step {
        log::error!("Hot Potato turn can't be resolved, ending session: {error}");
        data.push_event(GameEvent::RotationFailed(error));
        Step::Finish
    }
}

impl ModeRules for HotPotatoRules {
    fn mode(&self) -> GameMode {
        GameMode::HotPotato
    }

    fn begin_round(&mut self, data: &mut SessionData) -> Step {
        if self.rotation.verdict() != Verdict::Continue {
            return Step::Finish;
        }
        if let Err(error) = self.rotation.current_player() {
            return Self::abandon(data, error);
        }
        if data.current_card().is_none() {
            return Step::Finish;
        }

        data.push_command(TimerCommand::StartTeamClock(
            self.rotation.current_time_left(),
        ));
        Step::Play
    }

    fn resolve(&mut self, data: &mut SessionData, answer: Answer) -> Step {
        let Some(card) = data.current_card().cloned() else {
            return Step::Finish;
        };
        let player_id = match self.rotation.current_player() {
            Ok(player) => player.id,
            Err(error) => return Self::abandon(data, error),
        };

        let points = hot_potato_points(answer);
        data.record(&card, answer, points, Some(player_id));

        if is_miss(answer) {
            self.rotation.charge_skip();
            let team = self.rotation.current_team();
            let skips_left = self
                .rotation
                .team(team)
                .map_or(0, |state| state.skips_left);
            data.push_event(GameEvent::SkipCharged { team, skips_left });

            if self.rotation.verdict() != Verdict::Continue {
                return Step::Finish;
            }
        }

        data.card_idx += 1;
        match self.rotation.next_player() {
            Ok((next_team, next)) => Step::Pass {
                card,
                next_team,
                next_player_name: next.name.clone(),
            },
            Err(error) => Self::abandon(data, error),
        }
    }

    fn finish_pass(&mut self, data: &mut SessionData) -> Step {
        if let Err(error) = self.rotation.advance() {
            return Self::abandon(data, error);
        }
        self.begin_round(data)
    }

    fn pause_team_clock(&mut self, remaining: Duration) {
        self.rotation.pause_clock(remaining);
    }

    fn expire_team_clock(&mut self, data: &mut SessionData) -> Step {
        self.rotation.expire_clock();
        data.push_event(GameEvent::ClockExpired(self.rotation.current_team()));
        Step::Finish
    }

    fn accepts_gestures(&self) -> bool {
        false
    }

    fn decorate(&self, view: &mut PlayingView) {
        let Ok(current_player) = self.rotation.current_player() else {
            return;
        };
        let (Some(red), Some(blue)) = (self.rotation.team(Team::Red), self.rotation.team(Team::Blue))
        else {
            return;
        };
        view.teams = Some(TeamClocks {
            current_team: self.rotation.current_team(),
            current_player: current_player.clone(),
            red_time_left: red.time_left,
            blue_time_left: blue.time_left,
            red_skips_left: red.skips_left,
            blue_skips_left: blue.skips_left,
        });
    }

    fn team_scores(&self, results: &[CardResult]) -> Option<TeamScores> {
        Some(self.rotation.final_scores(results))
    }
}
