/// Integration tests for full session flows
///
/// These tests play whole games through the synchronous engine for each
/// mode and check results, scores and phase transitions.
use heads_up::{
    Answer, Card, GameEvent, GameMode, GameSettings, GameView, HotPotatoSettings, Player, Session,
    SessionError, SessionSetup, Team, TimerCommand,
    game::{HotPotatoRules, Rules, TeamRotation},
};
use rand::{SeedableRng, rngs::StdRng};
use std::time::Duration;

fn deck(n: usize) -> Vec<Card> {
    (0..n).map(|i| Card::new(format!("card {i}"))).collect()
}

fn hot_potato_session(red: &[&str], blue: &[&str], skips: u32) -> Session {
    let roster = |names: &[&str], first_id: i64| -> Vec<Player> {
        names
            .iter()
            .zip(first_id..)
            .map(|(name, id)| Player::new(id, *name))
            .collect()
    };
    let settings = HotPotatoSettings {
        team_time_secs: 60,
        max_skips_per_team: skips,
    };
    let rotation = TeamRotation::from_teams(roster(red, 1), roster(blue, 10), Team::Red, &settings);
    Session::with_rules(
        Rules::from(HotPotatoRules::new(rotation)),
        GameSettings::default(),
    )
}

fn playing(session: &Session) -> heads_up::game::PlayingView {
    match session.view() {
        GameView::Playing(view) => view,
        other => panic!("expected playing, got {other:?}"),
    }
}

#[test]
fn test_standard_all_correct() {
    let settings = GameSettings {
        card_count: 5,
        ..GameSettings::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = Session::new(SessionSetup::Standard { player_id: Some(3) }, settings, &mut rng);
    session.deal(deck(10)).unwrap();
    session.start().unwrap();

    for _ in 0..5 {
        assert!(session.process_answer(Answer::Correct));
    }

    let outcome = session.outcome().expect("session should be finished");
    assert_eq!(outcome.results.len(), 5);
    assert_eq!(outcome.total_points(), 5);
    assert!(outcome.results.iter().all(|r| r.player_id == Some(3)));
    assert!(outcome.team_scores.is_none());
}

#[test]
fn test_standard_penalties() {
    let settings = GameSettings {
        time_up_penalty: true,
        give_up_penalty: false,
        card_count: 3,
        ..GameSettings::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = Session::new(SessionSetup::Standard { player_id: None }, settings, &mut rng);
    session.deal(deck(3)).unwrap();
    session.start().unwrap();

    session.process_answer(Answer::Skip);
    session.process_answer(Answer::TimeUp);
    session.process_answer(Answer::Correct);

    let points: Vec<i8> = session.results().iter().map(|r| r.points).collect();
    assert_eq!(points, vec![0, -1, 1]);
    assert!(session.is_finished());
}

#[test]
fn test_three_lives_three_skips() {
    let settings = GameSettings {
        give_up_penalty: true,
        ..GameSettings::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = Session::new(SessionSetup::ThreeLives { player_id: Some(2) }, settings, &mut rng);
    session.deal(deck(20)).unwrap();
    session.start().unwrap();

    session.process_answer(Answer::Skip);
    assert_eq!(playing(&session).lives_remaining, Some(2));
    session.process_answer(Answer::Skip);
    assert_eq!(playing(&session).lives_remaining, Some(1));
    session.process_answer(Answer::Skip);

    let outcome = session.outcome().expect("session should be finished");
    assert_eq!(outcome.results.len(), 3);
    assert_eq!(outcome.total_points(), -3);
    let lives: Vec<u32> = session
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::LifeLost { lives_left } => Some(lives_left),
            _ => None,
        })
        .collect();
    assert_eq!(lives, vec![2, 1, 0]);
}

#[test]
fn test_three_lives_runs_out_of_cards() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = Session::new(
        SessionSetup::ThreeLives { player_id: None },
        GameSettings::default(),
        &mut rng,
    );
    session.deal(deck(4)).unwrap();
    session.start().unwrap();

    session.process_answer(Answer::Correct);
    session.process_answer(Answer::TimeUp);
    session.process_answer(Answer::Correct);
    session.process_answer(Answer::Correct);

    assert_eq!(session.outcome().unwrap().results.len(), 4);
}

#[test]
fn test_hot_potato_red_runs_out_of_skips() {
    let mut session = hot_potato_session(&["ann", "cat"], &["bob"], 2);
    session.deal(deck(10)).unwrap();
    session.start().unwrap();

    session.process_answer(Answer::Skip);
    assert!(session.complete_pass());
    session.process_answer(Answer::Skip);

    let rotation = session.rotation().unwrap();
    assert_eq!(rotation.team(Team::Red).unwrap().skips_left, 0);
    let scores = session.outcome().unwrap().team_scores.unwrap();
    assert_eq!(scores.winner, Team::Blue);
    assert_eq!(session.results().len(), 2);
}

#[test]
fn test_hot_potato_rotation_order() {
    let mut session = hot_potato_session(&["ann", "cat"], &["bob", "dan"], 2);
    session.deal(deck(10)).unwrap();
    session.start().unwrap();

    let mut next_players = Vec::new();
    for _ in 0..6 {
        session.process_answer(Answer::Correct);
        match session.view() {
            GameView::PassingPhone(view) => {
                next_players.push((view.next_team, view.next_player_name))
            }
            other => panic!("expected passing phone, got {other:?}"),
        }
        session.complete_pass();
    }

    let expected = [
        (Team::Red, "cat"),
        (Team::Blue, "bob"),
        (Team::Blue, "dan"),
        (Team::Red, "ann"),
        (Team::Red, "cat"),
        (Team::Blue, "bob"),
    ];
    let expected: Vec<(Team, String)> = expected
        .iter()
        .map(|(team, name)| (*team, (*name).to_string()))
        .collect();
    assert_eq!(next_players, expected);
}

#[test]
fn test_hot_potato_deck_exhausted_scores_teams() {
    let mut session = hot_potato_session(&["ann"], &["bob"], 2);
    session.deal(deck(3)).unwrap();
    session.start().unwrap();

    // ann: correct, bob: skip, ann: correct
    session.process_answer(Answer::Correct);
    session.complete_pass();
    session.process_answer(Answer::Skip);
    session.complete_pass();
    session.process_answer(Answer::Correct);
    assert!(matches!(session.view(), GameView::PassingPhone(_)));
    session.complete_pass();

    let scores = session.outcome().unwrap().team_scores.unwrap();
    assert_eq!((scores.red, scores.blue, scores.winner), (2, 0, Team::Red));
}

#[test]
fn test_hot_potato_pass_holds_then_resumes_next_team_clock() {
    let mut session = hot_potato_session(&["ann"], &["bob"], 2).with_pass_delay(Duration::from_secs(1));
    session.deal(deck(5)).unwrap();
    session.start().unwrap();
    session.drain_commands();

    session.pause_team_clock(Duration::from_secs(45));
    session.process_answer(Answer::Correct);
    assert_eq!(
        session.drain_commands().into_iter().collect::<Vec<_>>(),
        vec![TimerCommand::HoldForPass(Duration::from_secs(1))]
    );

    session.complete_pass();
    assert_eq!(
        session.drain_commands().into_iter().collect::<Vec<_>>(),
        vec![
            TimerCommand::StartTeamClock(Duration::from_secs(60)),
            TimerCommand::StartCardTimer(Duration::from_secs(20)),
        ]
    );
    let teams = playing(&session).teams.unwrap();
    assert_eq!(teams.current_team, Team::Blue);
    assert_eq!(teams.red_time_left, Duration::from_secs(45));
}

#[test]
fn test_hot_potato_single_player_gets_opponent() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let session = Session::new(
            SessionSetup::HotPotato {
                settings: HotPotatoSettings::default(),
                players: vec![Player::new(7, "solo")],
            },
            GameSettings::default(),
            &mut rng,
        );
        let rotation = session.rotation().unwrap();
        assert_eq!(rotation.team(Team::Red).unwrap().players.len(), 1);
        assert_eq!(rotation.team(Team::Blue).unwrap().players.len(), 1);
        assert!(matches!(rotation.current_team(), Team::Red | Team::Blue));
    }
}

#[test]
fn test_answers_outside_playing_have_no_effect() {
    let mut session = hot_potato_session(&["ann"], &["bob"], 2);
    assert!(!session.process_answer(Answer::Correct));
    session.deal(deck(5)).unwrap();
    assert!(!session.process_answer(Answer::Correct));
    session.start().unwrap();
    session.process_answer(Answer::Correct);

    let before = session.view();
    assert!(!session.process_answer(Answer::Correct));
    assert!(!session.process_answer(Answer::Skip));
    assert_eq!(session.view(), before);
    assert_eq!(session.results().len(), 1);

    session.end_game();
    let finished = session.view();
    assert!(!session.process_answer(Answer::TimeUp));
    assert_eq!(session.view(), finished);
    assert_eq!(session.start(), Err(SessionError::NotReady));
}

#[test]
fn test_mode_reported() {
    let mut rng = StdRng::seed_from_u64(0);
    let session = Session::new(
        SessionSetup::ThreeLives { player_id: None },
        GameSettings::default(),
        &mut rng,
    );
    assert_eq!(session.mode(), GameMode::ThreeLives);
}
