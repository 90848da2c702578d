//! Session state machine shared by every game mode.
//!
//! A [`Session`] owns the dealt cards, the results so far and the phase the
//! game is in. Everything mode specific lives behind [`ModeRules`], with one
//! implementation per mode dispatched through [`Rules`].
//!
//! The engine is synchronous and never looks at a clock. Whenever a
//! transition needs a timer started or stopped it queues a [`TimerCommand`]
//! for the driver to drain, the same way it queues [`GameEvent`]s.

use enum_dispatch::enum_dispatch;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt, time::Duration};
use thiserror::Error;

use super::{
    constants::PASS_DELAY,
    entities::{
        Answer, Card, CardResult, GameMode, GameOutcome, GameSettings, HotPotatoSettings, Player,
        PlayerId, Points, Team, TeamScores,
    },
    hot_potato::TeamRotation,
    rules::{HotPotatoRules, StandardRules, ThreeLivesRules},
    states::{GameView, PassingView, PlayingView},
};
use crate::gesture::Gesture;

/// Errors for operations the session can't perform in its current phase.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum SessionError {
    #[error("cards were already dealt")]
    NotLoading,
    #[error("session isn't ready to start")]
    NotReady,
    #[error("team {0} has no players")]
    EmptyRoster(Team),
    #[error("session is closed")]
    SessionClosed,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Things that happened during play, drained by the driver.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    CardResolved {
        card_text: String,
        answer: Answer,
        points: Points,
    },
    LifeLost {
        lives_left: u32,
    },
    SkipCharged {
        team: Team,
        skips_left: u32,
    },
    TurnPassed {
        next_team: Team,
        next_player_name: String,
    },
    ClockExpired(Team),
    RotationFailed(SessionError),
    GameOver {
        results: usize,
        winner: Option<Team>,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::CardResolved {
                card_text,
                answer,
                points,
            } => format!("'{card_text}' resolved as {answer} ({points:+})"),
            Self::LifeLost { lives_left } => format!("life lost, {lives_left} left"),
            Self::SkipCharged { team, skips_left } => {
                format!("team {team} used a skip, {skips_left} left")
            }
            Self::TurnPassed {
                next_team,
                next_player_name,
            } => format!("pass the phone to {next_player_name} (team {next_team})"),
            Self::ClockExpired(team) => format!("team {team} ran out of time"),
            Self::RotationFailed(error) => format!("turn rotation failed: {error}"),
            Self::GameOver {
                results,
                winner: Some(team),
            } => format!("game over after {results} cards, winner: {team}"),
            Self::GameOver {
                results,
                winner: None,
            } => format!("game over after {results} cards"),
        };
        write!(f, "{repr}")
    }
}

/// Timer work requested by a transition.
///
/// Starting a timer always replaces a running timer of the same kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimerCommand {
    StartCardTimer(Duration),
    /// Resume the active team's clock with this much time left.
    StartTeamClock(Duration),
    HoldForPass(Duration),
    CancelAll,
}

/// What a mode asks the session to do after a rules step.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Show the current card.
    Play,
    /// Hand the device over before the next turn.
    Pass {
        card: Card,
        next_team: Team,
        next_player_name: String,
    },
    Finish,
    /// The input doesn't apply to this mode.
    Ignore,
}

/// How a session should be built for each mode.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum SessionSetup {
    Standard {
        player_id: Option<PlayerId>,
    },
    ThreeLives {
        player_id: Option<PlayerId>,
    },
    HotPotato {
        settings: HotPotatoSettings,
        players: Vec<Player>,
    },
}

/// Mutable data shared across all phases and modes.
#[derive(Debug)]
pub struct SessionData {
    pub(super) settings: GameSettings,
    pub(super) cards: Vec<Card>,
    pub(super) card_idx: usize,
    pub(super) results: Vec<CardResult>,
    pass_delay: Duration,
    events: VecDeque<GameEvent>,
    commands: VecDeque<TimerCommand>,
}

impl SessionData {
    fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            cards: Vec::new(),
            card_idx: 0,
            results: Vec::new(),
            pass_delay: PASS_DELAY,
            events: VecDeque::new(),
            commands: VecDeque::new(),
        }
    }

    pub(super) fn current_card(&self) -> Option<&Card> {
        self.cards.get(self.card_idx)
    }

    pub(super) fn record(&mut self, card: &Card, answer: Answer, points: Points, player_id: Option<PlayerId>) {
        self.results.push(CardResult::new(card, points, player_id));
        self.events.push_back(GameEvent::CardResolved {
            card_text: card.text.clone(),
            answer,
            points,
        });
    }

    pub(super) fn push_event(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub(super) fn push_command(&mut self, command: TimerCommand) {
        self.commands.push_back(command);
    }
}

/// Mode-specific rules of a session.
#[enum_dispatch]
pub trait ModeRules {
    fn mode(&self) -> GameMode;

    /// Picks the cards this mode plays with out of the shuffled deck.
    fn select_cards(&self, cards: Vec<Card>, _settings: &GameSettings) -> Vec<Card> {
        cards
    }

    /// Called whenever the card at the current index should be shown.
    fn begin_round(&mut self, data: &mut SessionData) -> Step;

    /// Resolves the card in play.
    fn resolve(&mut self, data: &mut SessionData, answer: Answer) -> Step;

    /// The pass hold elapsed.
    fn finish_pass(&mut self, _data: &mut SessionData) -> Step {
        Step::Ignore
    }

    /// The active team's clock was paused with `remaining` left on it.
    fn pause_team_clock(&mut self, _remaining: Duration) {}

    /// The active team's clock hit zero.
    fn expire_team_clock(&mut self, _data: &mut SessionData) -> Step {
        Step::Ignore
    }

    fn accepts_gestures(&self) -> bool {
        true
    }

    /// Adds mode-specific figures to the playing view.
    fn decorate(&self, _view: &mut PlayingView) {}

    fn team_scores(&self, _results: &[CardResult]) -> Option<TeamScores> {
        None
    }
}

#[derive(Debug)]
#[enum_dispatch(ModeRules)]
pub enum Rules {
    Standard(StandardRules),
    ThreeLives(ThreeLivesRules),
    HotPotato(HotPotatoRules),
}

impl Rules {
    /// Builds the rules for `setup`. Hot Potato teams are drawn with `rng`.
    pub fn from_setup<R: Rng + ?Sized>(setup: SessionSetup, rng: &mut R) -> Self {
        match setup {
            SessionSetup::Standard { player_id } => StandardRules::new(player_id).into(),
            SessionSetup::ThreeLives { player_id } => ThreeLivesRules::new(player_id).into(),
            SessionSetup::HotPotato { settings, players } => {
                HotPotatoRules::new(TeamRotation::assign(players, &settings, rng)).into()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Loading,
    Ready,
    Playing,
    PassingPhone(PassingView),
    Finished(GameOutcome),
}

/// One game from first card to final results.
#[derive(Debug)]
pub struct Session {
    data: SessionData,
    rules: Rules,
    phase: Phase,
}

impl Session {
    pub fn new<R: Rng + ?Sized>(setup: SessionSetup, settings: GameSettings, rng: &mut R) -> Self {
        Self::with_rules(Rules::from_setup(setup, rng), settings)
    }

    pub fn with_rules(rules: Rules, settings: GameSettings) -> Self {
        Self {
            data: SessionData::new(settings),
            rules,
            phase: Phase::Loading,
        }
    }

    #[must_use]
    pub fn with_pass_delay(mut self, pass_delay: Duration) -> Self {
        self.data.pass_delay = pass_delay;
        self
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.rules.mode()
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.data.settings
    }

    #[must_use]
    pub fn results(&self) -> &[CardResult] {
        &self.data.results
    }

    /// Number of cards this session plays with.
    #[must_use]
    pub fn cards_dealt(&self) -> usize {
        self.data.cards.len()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Whether device gestures count as answers in this mode.
    #[must_use]
    pub fn accepts_gestures(&self) -> bool {
        self.rules.accepts_gestures()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&GameOutcome> {
        match &self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Hot Potato team state, if this is a Hot Potato session.
    #[must_use]
    pub fn rotation(&self) -> Option<&TeamRotation> {
        match &self.rules {
            Rules::HotPotato(rules) => Some(rules.rotation()),
            _ => None,
        }
    }

    /// Snapshot of the current phase for rendering.
    #[must_use]
    pub fn view(&self) -> GameView {
        match &self.phase {
            Phase::Loading => GameView::Loading,
            Phase::Ready => GameView::Ready,
            Phase::Playing => match self.data.current_card() {
                Some(card) => {
                    let total_time = self.data.settings.card_time();
                    let mut view = PlayingView {
                        card: card.clone(),
                        time_left: total_time,
                        total_time,
                        lives_remaining: None,
                        teams: None,
                    };
                    self.rules.decorate(&mut view);
                    GameView::Playing(view)
                }
                None => GameView::Ready,
            },
            Phase::PassingPhone(view) => GameView::PassingPhone(view.clone()),
            Phase::Finished(outcome) => GameView::Finished(outcome.clone()),
        }
    }

    /// Takes the shuffled deck and moves to `Ready`, or straight to
    /// `Finished` when the mode ends up with no cards.
    pub fn deal(&mut self, cards: Vec<Card>) -> SessionResult<()> {
        if self.phase != Phase::Loading {
            return Err(SessionError::NotLoading);
        }

        self.data.cards = self.rules.select_cards(cards, &self.data.settings);
        self.data.card_idx = 0;
        log::debug!(
            "{} session dealt {} cards",
            self.rules.mode(),
            self.data.cards.len()
        );

        if self.data.cards.is_empty() {
            self.finish();
        } else {
            self.phase = Phase::Ready;
        }
        Ok(())
    }

    /// Shows the first card.
    pub fn start(&mut self) -> SessionResult<()> {
        if self.phase != Phase::Ready {
            return Err(SessionError::NotReady);
        }
        self.data.card_idx = 0;
        let step = self.rules.begin_round(&mut self.data);
        self.apply(step);
        Ok(())
    }

    /// Resolves the card in play. Returns whether the answer was applied;
    /// outside `Playing` it's dropped without any effect.
    pub fn process_answer(&mut self, answer: Answer) -> bool {
        if self.phase != Phase::Playing {
            log::debug!("Dropping {answer} while {}", self.view().name());
            return false;
        }
        let step = self.rules.resolve(&mut self.data, answer);
        self.apply(step);
        true
    }

    /// Maps a device gesture onto an answer. Modes played with buttons
    /// ignore gestures.
    pub fn process_gesture(&mut self, gesture: Gesture) -> bool {
        if !self.rules.accepts_gestures() || self.phase != Phase::Playing {
            return false;
        }
        match gesture.answer() {
            Some(answer) => self.process_answer(answer),
            None => false,
        }
    }

    /// The pass hold elapsed: rotate the turn and continue or finish.
    pub fn complete_pass(&mut self) -> bool {
        if !matches!(self.phase, Phase::PassingPhone(_)) {
            return false;
        }
        let step = self.rules.finish_pass(&mut self.data);
        self.apply(step);
        true
    }

    /// Tells the rules how much time the active team had left when its
    /// clock was paused.
    pub fn pause_team_clock(&mut self, remaining: Duration) {
        if self.phase == Phase::Playing {
            self.rules.pause_team_clock(remaining);
        }
    }

    /// The active team's clock ran out.
    pub fn expire_team_clock(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let step = self.rules.expire_team_clock(&mut self.data);
        let applied = step != Step::Ignore;
        self.apply(step);
        applied
    }

    /// Ends the game early, keeping the results so far.
    pub fn end_game(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.finish();
        true
    }

    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.data.events)
    }

    pub fn drain_commands(&mut self) -> VecDeque<TimerCommand> {
        std::mem::take(&mut self.data.commands)
    }

    fn apply(&mut self, step: Step) {
        match step {
            Step::Play => {
                self.phase = Phase::Playing;
                self.data
                    .push_command(TimerCommand::StartCardTimer(self.data.settings.card_time()));
            }
            Step::Pass {
                card,
                next_team,
                next_player_name,
            } => {
                self.data.push_event(GameEvent::TurnPassed {
                    next_team,
                    next_player_name: next_player_name.clone(),
                });
                self.phase = Phase::PassingPhone(PassingView {
                    card,
                    next_team,
                    next_player_name,
                });
                self.data
                    .push_command(TimerCommand::HoldForPass(self.data.pass_delay));
            }
            Step::Finish => self.finish(),
            Step::Ignore => {}
        }
    }

    fn finish(&mut self) {
        let results = self.data.results.clone();
        let team_scores = self.rules.team_scores(&results);
        self.data.push_event(GameEvent::GameOver {
            results: results.len(),
            winner: team_scores.map(|scores| scores.winner),
        });
        self.data.push_command(TimerCommand::CancelAll);
        self.phase = Phase::Finished(GameOutcome {
            results,
            team_scores,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn cards(n: usize) -> Vec<Card> {
        (0..n).map(|i| Card::new(format!("card {i}"))).collect()
    }

    fn standard_session(settings: GameSettings) -> Session {
        let mut rng = StdRng::seed_from_u64(0);
        Session::new(SessionSetup::Standard { player_id: Some(4) }, settings, &mut rng)
    }

    #[test]
    fn test_new_session_is_loading() {
        let session = standard_session(GameSettings::default());
        assert_eq!(session.view(), GameView::Loading);
        assert_eq!(session.mode(), GameMode::Standard);
    }

    #[test]
    fn test_deal_twice_fails() {
        let mut session = standard_session(GameSettings::default());
        session.deal(cards(3)).unwrap();
        assert_eq!(session.deal(cards(3)), Err(SessionError::NotLoading));
    }

    #[test]
    fn test_empty_deck_finishes_immediately() {
        let mut session = standard_session(GameSettings::default());
        session.deal(Vec::new()).unwrap();
        assert_eq!(session.view(), GameView::Finished(GameOutcome::default()));
        assert_eq!(session.drain_commands(), VecDeque::from([TimerCommand::CancelAll]));
        assert_eq!(session.start(), Err(SessionError::NotReady));
    }

    #[test]
    fn test_start_requires_ready() {
        let mut session = standard_session(GameSettings::default());
        assert_eq!(session.start(), Err(SessionError::NotReady));
        session.deal(cards(2)).unwrap();
        session.start().unwrap();
        assert_eq!(session.start(), Err(SessionError::NotReady));
    }

    #[test]
    fn test_start_queues_card_timer() {
        let settings = GameSettings {
            card_time_secs: 7,
            ..GameSettings::default()
        };
        let mut session = standard_session(settings);
        session.deal(cards(2)).unwrap();
        session.start().unwrap();

        assert_eq!(
            session.drain_commands(),
            VecDeque::from([TimerCommand::StartCardTimer(Duration::from_secs(7))])
        );
        match session.view() {
            GameView::Playing(view) => {
                assert_eq!(view.card.text, "card 0");
                assert_eq!(view.total_time, Duration::from_secs(7));
                assert_eq!(view.lives_remaining, None);
                assert!(view.teams.is_none());
            }
            other => panic!("expected playing, got {other:?}"),
        }
    }

    #[test]
    fn test_answer_outside_play_is_dropped() {
        let mut session = standard_session(GameSettings::default());
        assert!(!session.process_answer(Answer::Correct));
        session.deal(cards(2)).unwrap();
        assert!(!session.process_answer(Answer::Correct));
        assert!(session.results().is_empty());
        assert_eq!(session.view(), GameView::Ready);
    }

    #[test]
    fn test_gesture_maps_to_answer() {
        let mut session = standard_session(GameSettings::default());
        session.deal(cards(3)).unwrap();
        session.start().unwrap();

        assert!(session.process_gesture(Gesture::TiltFront));
        assert!(session.process_gesture(Gesture::TiltBack));
        assert!(!session.process_gesture(Gesture::Shake));

        let points: Vec<Points> = session.results().iter().map(|r| r.points).collect();
        assert_eq!(points, vec![1, 0]);
    }

    #[test]
    fn test_end_game_keeps_results() {
        let mut session = standard_session(GameSettings::default());
        session.deal(cards(5)).unwrap();
        session.start().unwrap();
        session.process_answer(Answer::Correct);

        assert!(session.end_game());
        assert!(!session.end_game());
        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.results.len(), 1);
        assert!(outcome.team_scores.is_none());
    }

    #[test]
    fn test_events_drained_once() {
        let mut session = standard_session(GameSettings::default());
        session.deal(cards(1)).unwrap();
        session.start().unwrap();
        session.process_answer(Answer::Correct);

        let events = session.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GameEvent::CardResolved { points: 1, .. }));
        assert!(matches!(events[1], GameEvent::GameOver { results: 1, winner: None }));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_event_display() {
        let event = GameEvent::CardResolved {
            card_text: "Pyramids".to_string(),
            answer: Answer::Skip,
            points: -1,
        };
        assert_eq!(event.to_string(), "'Pyramids' resolved as skip (-1)");
        assert_eq!(
            GameEvent::ClockExpired(Team::Red).to_string(),
            "team red ran out of time"
        );
    }
}
