//! Terminal host for the heads_up party game.
//!
//! Loads a plain-text deck, runs one session through the session actor and
//! reads answers from stdin while the timers run.

use anyhow::{Context, Result};
use ctrlc::set_handler;
use heads_up::{
    Card, GameMode, PlayerId, ResultsSink, SessionActor, SessionConfig, SessionHandle,
    session::{SessionResponse, SessionUpdate, parse_players},
};
use hu_cli::{
    commands::{HostCommand, parse_command},
    deck::load_deck,
    render::{describe, summary},
    sink::LogSink,
};
use pico_args::Arguments;
use std::{path::PathBuf, sync::Arc};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Play a game of Heads Up in the terminal

USAGE:
  hu_cli --deck FILE [OPTIONS]

OPTIONS:
  --deck        FILE       Deck file, one card per line
  --mode        MODE       standard | three-lives | hot-potato  [default: env HU_MODE or standard]
  --player-id   N          Player the results belong to
  --players     JSON       Hot Potato roster, e.g. '{\"1\":\"Ann\",\"2\":\"Bob\"}'
  --card-time   SECS       Seconds per card  [default: 20]
  --card-count  N          Cards in Standard mode  [default: 10]
  --team-time   SECS       Hot Potato clock per team, 60-600  [default: 300]
  --max-skips   N          Hot Potato skips per team, 1-5  [default: 2]

FLAGS:
  -h, --help               Print help information

COMMANDS:
  start                    Show the first card
  c, correct               The card was guessed
  s, skip                  Give up on the card
  view                     Show the current card and timers
  end                      End the game early
  quit                     Leave

ENVIRONMENT:
  HU_MODE, HU_CARD_TIME_SECS, HU_CARD_COUNT, HU_TIME_UP_PENALTY,
  HU_GIVE_UP_PENALTY, HU_TEAM_TIME_SECS, HU_MAX_SKIPS, HU_PLAYER_ID,
  HU_PLAYERS  (flags take precedence; a .env file is loaded if present)
";

struct Args {
    deck: PathBuf,
    mode: Option<GameMode>,
    player_id: Option<PlayerId>,
    players: Option<String>,
    card_time: Option<u32>,
    card_count: Option<usize>,
    team_time: Option<u32>,
    max_skips: Option<u32>,
}

impl Args {
    /// Apply flags on top of the environment configuration.
    fn apply(self, config: &mut SessionConfig) -> Result<()> {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(player_id) = self.player_id {
            config.player_id = Some(player_id);
        }
        if let Some(players) = self.players {
            config.players = parse_players(&players)?;
        }
        if let Some(card_time) = self.card_time {
            config.settings.card_time_secs = card_time;
        }
        if let Some(card_count) = self.card_count {
            config.settings.card_count = card_count;
        }
        if let Some(team_time) = self.team_time {
            config.hot_potato.team_time_secs = team_time;
        }
        if let Some(max_skips) = self.max_skips {
            config.hot_potato.max_skips_per_team = max_skips;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        deck: pargs
            .value_from_str("--deck")
            .context("--deck FILE is required, see --help")?,
        mode: pargs.opt_value_from_str("--mode")?,
        player_id: pargs.opt_value_from_str("--player-id")?,
        players: pargs.opt_value_from_str("--players")?,
        card_time: pargs.opt_value_from_str("--card-time")?,
        card_count: pargs.opt_value_from_str("--card-count")?,
        team_time: pargs.opt_value_from_str("--team-time")?,
        max_skips: pargs.opt_value_from_str("--max-skips")?,
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();

    let mut config = SessionConfig::from_env().context("Invalid HU_* environment")?;
    let deck_path = args.deck.clone();
    args.apply(&mut config)?;

    let mut rng = rand::rng();
    let cards = load_deck(&deck_path, &mut rng)
        .with_context(|| format!("Failed to read deck {}", deck_path.display()))?;

    let sink: Arc<dyn ResultsSink> = Arc::new(LogSink);
    let (actor, handle) = SessionActor::new(config, Some(sink), &mut rng)
        .context("Invalid session configuration")?;
    tokio::spawn(actor.run());

    run(handle, cards).await
}

async fn run(handle: SessionHandle, cards: Vec<Card>) -> Result<()> {
    let mut updates = handle.subscribe(0).await?;
    report(handle.deal(cards).await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_line(&handle, &line).await? {
                    break;
                }
            }

            update = updates.recv() => match update {
                Some(SessionUpdate::ViewChanged(view)) if !view.is_finished() => {
                    println!("{}", describe(&view));
                }
                Some(SessionUpdate::ViewChanged(_)) => {}
                Some(SessionUpdate::Finished(outcome)) => {
                    println!("{}", summary(&outcome));
                    break;
                }
                None => break,
            },
        }
    }

    // The session may already be gone if it finished on its own.
    let _ = handle.close().await;
    Ok(())
}

/// Act on one line typed at the prompt. Returns false to leave.
async fn handle_line(handle: &SessionHandle, line: &str) -> Result<bool> {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => {
            println!("{e}");
            return Ok(true);
        }
    };

    match command {
        HostCommand::Answer(answer) => report(handle.answer(answer).await?),
        HostCommand::Start => report(handle.start().await?),
        HostCommand::View => println!("{}", describe(&handle.view().await?)),
        HostCommand::End => report(handle.end().await?),
        HostCommand::Help => print!("{HELP}"),
        HostCommand::Quit => return Ok(false),
    }
    Ok(true)
}

fn report(response: SessionResponse) {
    if let Some(message) = response.error_message() {
        println!("{message}");
    }
}
