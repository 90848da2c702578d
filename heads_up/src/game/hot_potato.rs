//! Team assignment, turn rotation and per-team budgets for Hot Potato.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{
    constants::{BLUE_PLACEHOLDER_ID, BLUE_PLACEHOLDER_NAME, RED_PLACEHOLDER_ID, RED_PLACEHOLDER_NAME},
    entities::{CardResult, HotPotatoSettings, Player, PlayerId, Team, TeamScores},
    state_machine::SessionError,
};

/// One team's roster and what it has left to spend.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TeamState {
    pub players: Vec<Player>,
    pub time_left: Duration,
    pub skips_left: u32,
}

impl TeamState {
    fn new(players: Vec<Player>, settings: &HotPotatoSettings) -> Self {
        Self {
            players,
            time_left: settings.team_time(),
            skips_left: settings.max_skips_per_team,
        }
    }

    /// Out of time or out of skips.
    #[must_use]
    pub fn has_lost(&self) -> bool {
        self.time_left.is_zero() || self.skips_left == 0
    }

    fn contains(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }
}

/// Whether a Hot Potato game may go on after the last resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Continue,
    Winner(Team),
    /// Both teams exhausted a budget at once.
    Draw,
}

/// Rotation state for the two Hot Potato teams.
///
/// Turns go player by player through the active team's roster. Once the
/// last player of the active team has played, the other team takes over
/// starting from its first player.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TeamRotation {
    red: TeamState,
    blue: TeamState,
    current: Team,
    turn_idx: usize,
}

impl TeamRotation {
    /// Splits `players` into two teams and picks a random starting team.
    ///
    /// Players are shuffled and then dealt alternately, red first. An empty
    /// roster gets one placeholder per team. When alternate dealing leaves a
    /// team empty, a member moves across if the other team can spare one,
    /// otherwise the empty team gets its placeholder.
    pub fn assign<R: Rng + ?Sized>(
        mut players: Vec<Player>,
        settings: &HotPotatoSettings,
        rng: &mut R,
    ) -> Self {
        if players.is_empty() {
            log::debug!("No players supplied for Hot Potato, using placeholders");
            players = vec![red_placeholder(), blue_placeholder()];
        }
        players.shuffle(rng);

        let mut red = Vec::with_capacity(players.len() / 2 + 1);
        let mut blue = Vec::with_capacity(players.len() / 2 + 1);
        for (idx, player) in players.into_iter().enumerate() {
            if idx % 2 == 0 {
                red.push(player);
            } else {
                blue.push(player);
            }
        }

        balance(&mut red, &mut blue, blue_placeholder);
        balance(&mut blue, &mut red, red_placeholder);

        let starting = if rng.random_bool(0.5) {
            Team::Red
        } else {
            Team::Blue
        };
        log::debug!(
            "Hot Potato teams: red {:?}, blue {:?}, {starting} starts",
            red.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            blue.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        );

        Self::from_teams(red, blue, starting, settings)
    }

    /// Builds a rotation from fixed rosters.
    pub fn from_teams(
        red: Vec<Player>,
        blue: Vec<Player>,
        starting: Team,
        settings: &HotPotatoSettings,
    ) -> Self {
        Self {
            red: TeamState::new(red, settings),
            blue: TeamState::new(blue, settings),
            current: starting,
            turn_idx: 0,
        }
    }

    #[must_use]
    pub fn current_team(&self) -> Team {
        self.current
    }

    #[must_use]
    pub fn team(&self, team: Team) -> Option<&TeamState> {
        match team {
            Team::Red => Some(&self.red),
            Team::Blue => Some(&self.blue),
            Team::None => None,
        }
    }

    fn team_mut(&mut self, team: Team) -> Option<&mut TeamState> {
        match team {
            Team::Red => Some(&mut self.red),
            Team::Blue => Some(&mut self.blue),
            Team::None => None,
        }
    }

    fn roster(&self, team: Team) -> Result<&[Player], SessionError> {
        match self.team(team) {
            Some(state) if !state.players.is_empty() => Ok(&state.players),
            _ => Err(SessionError::EmptyRoster(team)),
        }
    }

    /// Player holding the device for the current turn.
    pub fn current_player(&self) -> Result<&Player, SessionError> {
        let roster = self.roster(self.current)?;
        Ok(&roster[self.turn_idx % roster.len()])
    }

    /// Who gets the device after the current turn, and for which team.
    pub fn next_player(&self) -> Result<(Team, &Player), SessionError> {
        let roster = self.roster(self.current)?;
        let next_idx = (self.turn_idx + 1) % roster.len();
        if next_idx == 0 {
            let next_team = self.current.other();
            let first = &self.roster(next_team)?[0];
            Ok((next_team, first))
        } else {
            Ok((self.current, &roster[next_idx]))
        }
    }

    /// Moves the turn to the next player, switching teams after the last
    /// player of the active team.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        let roster_len = self.roster(self.current)?.len();
        self.turn_idx += 1;
        if self.turn_idx >= roster_len {
            self.turn_idx = 0;
            self.current = self.current.other();
            log::debug!("Turn passes to team {}", self.current);
        }
        Ok(())
    }

    /// Charges one skip to the active team.
    pub fn charge_skip(&mut self) {
        if let Some(team) = self.team_mut(self.current) {
            team.skips_left = team.skips_left.saturating_sub(1);
        }
    }

    /// Records how much time the active team has left after its clock was
    /// paused.
    pub fn pause_clock(&mut self, remaining: Duration) {
        if let Some(team) = self.team_mut(self.current) {
            team.time_left = team.time_left.min(remaining);
        }
    }

    /// The active team's clock ran out.
    pub fn expire_clock(&mut self) {
        if let Some(team) = self.team_mut(self.current) {
            team.time_left = Duration::ZERO;
        }
    }

    /// Time left on the active team's clock.
    #[must_use]
    pub fn current_time_left(&self) -> Duration {
        self.team(self.current)
            .map_or(Duration::ZERO, |team| team.time_left)
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        match (self.red.has_lost(), self.blue.has_lost()) {
            (false, false) => Verdict::Continue,
            (true, false) => Verdict::Winner(Team::Blue),
            (false, true) => Verdict::Winner(Team::Red),
            (true, true) => Verdict::Draw,
        }
    }

    /// Scores both teams and settles the winner once the game is over.
    ///
    /// A team that exhausted its clock or skips while the other did not
    /// loses outright. Otherwise the team with strictly more correct cards
    /// wins and equal scores are a draw.
    #[must_use]
    pub fn final_scores(&self, results: &[CardResult]) -> TeamScores {
        let red = Self::correct_for(&self.red, results);
        let blue = Self::correct_for(&self.blue, results);
        let winner = match self.verdict() {
            Verdict::Winner(team) => team,
            Verdict::Continue | Verdict::Draw => match red.cmp(&blue) {
                std::cmp::Ordering::Greater => Team::Red,
                std::cmp::Ordering::Less => Team::Blue,
                std::cmp::Ordering::Equal => Team::None,
            },
        };
        TeamScores { red, blue, winner }
    }

    fn correct_for(team: &TeamState, results: &[CardResult]) -> u32 {
        let count = results
            .iter()
            .filter(|r| r.is_correct())
            .filter(|r| r.player_id.is_some_and(|id| team.contains(id)))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// Ensures `empty` has someone, taking from `donor` when it can spare a
/// player and synthesizing a placeholder otherwise.
fn balance(donor: &mut Vec<Player>, empty: &mut Vec<Player>, placeholder: fn() -> Player) {
    if !empty.is_empty() {
        return;
    }
    if donor.len() > 1 {
        empty.push(donor.remove(0));
    } else {
        empty.push(placeholder());
    }
}

fn red_placeholder() -> Player {
    Player::new(RED_PLACEHOLDER_ID, RED_PLACEHOLDER_NAME)
}

fn blue_placeholder() -> Player {
    Player::new(BLUE_PLACEHOLDER_ID, BLUE_PLACEHOLDER_NAME)
}
