//! Session actor driving one game's timers with async message handling.

use super::{
    config::{ConfigResult, SessionConfig},
    messages::{SessionMessage, SessionResponse, SessionUpdate},
    timer::{Countdown, Expiry, TimerKind},
};
use crate::{
    game::{
        entities::{Answer, Card, GameOutcome, Team},
        state_machine::{GameEvent, Session, SessionError, SessionResult, TimerCommand},
        states::GameView,
    },
    gesture::Gesture,
    stats::ResultsSink,
};
use rand::Rng;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// Identifies a session towards the results sink and in logs.
pub type SessionId = Uuid;

/// Buffered updates per subscriber before notifications are dropped
const SUBSCRIBER_BUFFER: usize = 32;

/// Session actor handle for sending messages
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    session_id: SessionId,
}

impl SessionHandle {
    /// Create a new session handle
    pub fn new(sender: mpsc::Sender<SessionMessage>, session_id: SessionId) -> Self {
        Self { sender, session_id }
    }

    /// Get session ID
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Send a message to the session
    pub async fn send(&self, message: SessionMessage) -> SessionResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| SessionError::SessionClosed)
    }

    async fn request(
        &self,
        message: impl FnOnce(oneshot::Sender<SessionResponse>) -> SessionMessage,
    ) -> SessionResult<SessionResponse> {
        let (response, rx) = oneshot::channel();
        self.send(message(response)).await?;
        rx.await.map_err(|_| SessionError::SessionClosed)
    }

    pub async fn deal(&self, cards: Vec<Card>) -> SessionResult<SessionResponse> {
        self.request(|response| SessionMessage::Deal { cards, response })
            .await
    }

    pub async fn start(&self) -> SessionResult<SessionResponse> {
        self.request(|response| SessionMessage::Start { response })
            .await
    }

    pub async fn answer(&self, answer: Answer) -> SessionResult<SessionResponse> {
        self.request(|response| SessionMessage::Answer { answer, response })
            .await
    }

    pub async fn gesture(&self, gesture: Gesture) -> SessionResult<SessionResponse> {
        self.request(|response| SessionMessage::Gesture { gesture, response })
            .await
    }

    /// Current view with live timer values
    pub async fn view(&self) -> SessionResult<GameView> {
        let (response, rx) = oneshot::channel();
        self.send(SessionMessage::GetView { response }).await?;
        rx.await.map_err(|_| SessionError::SessionClosed)
    }

    pub async fn end(&self) -> SessionResult<SessionResponse> {
        self.request(|response| SessionMessage::End { response })
            .await
    }

    /// Stop the actor. Results of an unfinished game aren't reported.
    pub async fn close(&self) -> SessionResult<SessionResponse> {
        self.request(|response| SessionMessage::Close { response })
            .await
    }

    /// Subscribe to session updates
    pub async fn subscribe(
        &self,
        subscriber_id: u64,
    ) -> SessionResult<mpsc::Receiver<SessionUpdate>> {
        let (sender, receiver) = mpsc::channel(SUBSCRIBER_BUFFER);
        self.send(SessionMessage::Subscribe {
            subscriber_id,
            sender,
        })
        .await?;
        Ok(receiver)
    }

    pub async fn unsubscribe(&self, subscriber_id: u64) -> SessionResult<()> {
        self.send(SessionMessage::Unsubscribe { subscriber_id })
            .await
    }
}

/// Session actor running a single game and its timers
pub struct SessionActor {
    /// Session ID
    id: SessionId,

    /// Game state machine
    session: Session,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,

    /// Expiries of the countdowns below
    expiries: mpsc::UnboundedReceiver<Expiry>,

    card_timer: Countdown,
    team_timer: Countdown,
    pass_timer: Countdown,

    /// Subscribers for session updates
    subscribers: HashMap<u64, mpsc::Sender<SessionUpdate>>,

    /// Collaborator storing finished games
    sink: Option<Arc<dyn ResultsSink>>,

    /// Results were handed to subscribers and the sink
    reported: bool,

    /// Is session closed
    is_closed: bool,
}

impl SessionActor {
    /// Create a new session actor
    ///
    /// # Arguments
    ///
    /// * `config` - Session configuration, validated here
    /// * `sink` - Receives the results once the game finishes
    /// * `rng` - Draws the Hot Potato teams
    ///
    /// # Returns
    ///
    /// * `(SessionActor, SessionHandle)` - Actor and handle for sending messages
    pub fn new<R: Rng + ?Sized>(
        config: SessionConfig,
        sink: Option<Arc<dyn ResultsSink>>,
        rng: &mut R,
    ) -> ConfigResult<(Self, SessionHandle)> {
        config.validate()?;

        let id = Uuid::new_v4();
        let (sender, inbox) = mpsc::channel(100);
        let (notify, expiries) = mpsc::unbounded_channel();

        let session = Session::new(config.setup(), config.settings.clone(), rng)
            .with_pass_delay(config.pass_delay);

        let actor = Self {
            id,
            session,
            inbox,
            expiries,
            card_timer: Countdown::new(TimerKind::Card, notify.clone()),
            team_timer: Countdown::new(TimerKind::Team, notify.clone()),
            pass_timer: Countdown::new(TimerKind::Pass, notify),
            subscribers: HashMap::new(),
            sink,
            reported: false,
            is_closed: false,
        };

        Ok((actor, SessionHandle::new(sender, id)))
    }

    /// Run the session actor event loop
    pub async fn run(mut self) {
        log::info!("Session {} ({}) starting", self.id, self.session.mode());

        loop {
            tokio::select! {
                message = self.inbox.recv() => {
                    let Some(message) = message else {
                        log::debug!("Session {}: every handle dropped", self.id);
                        break;
                    };
                    self.handle_message(message).await;

                    if self.is_closed {
                        break;
                    }
                }

                Some(expiry) = self.expiries.recv() => {
                    self.handle_expiry(expiry).await;
                }
            }
        }

        self.cancel_timers();
        log::info!("Session {} closed", self.id);
    }

    /// Handle a session message
    async fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Deal { cards, response } => {
                let result = self.session.deal(cards);
                self.respond_with(result, response).await;
            }

            SessionMessage::Start { response } => {
                let result = self.session.start();
                self.respond_with(result, response).await;
            }

            SessionMessage::Answer { answer, response } => {
                let applied = self.resolve(answer);
                self.respond_applied(applied, response).await;
            }

            SessionMessage::Gesture { gesture, response } => {
                let applied = match (self.session.accepts_gestures(), gesture.answer()) {
                    (true, Some(answer)) => self.resolve(answer),
                    _ => {
                        log::debug!("Session {}: ignoring {gesture}", self.id);
                        false
                    }
                };
                self.respond_applied(applied, response).await;
            }

            SessionMessage::GetView { response } => {
                let _ = response.send(self.live_view());
            }

            SessionMessage::End { response } => {
                let applied = self.session.end_game();
                self.respond_applied(applied, response).await;
            }

            SessionMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(SessionResponse::Success);
            }

            SessionMessage::Subscribe {
                subscriber_id,
                sender,
            } => {
                self.subscribers.insert(subscriber_id, sender);
                log::debug!(
                    "Subscriber {} subscribed to session {}",
                    subscriber_id,
                    self.id
                );
            }

            SessionMessage::Unsubscribe { subscriber_id } => {
                self.subscribers.remove(&subscriber_id);
                log::debug!(
                    "Subscriber {} unsubscribed from session {}",
                    subscriber_id,
                    self.id
                );
            }
        }
    }

    /// Handle a countdown reaching zero
    async fn handle_expiry(&mut self, expiry: Expiry) {
        let timer = match expiry.kind {
            TimerKind::Card => &mut self.card_timer,
            TimerKind::Team => &mut self.team_timer,
            TimerKind::Pass => &mut self.pass_timer,
        };
        if !timer.claim(expiry) {
            log::debug!("Session {}: ignoring stale {} expiry", self.id, expiry.kind);
            return;
        }

        let applied = match expiry.kind {
            TimerKind::Card => self.resolve(Answer::TimeUp),
            TimerKind::Team => self.session.expire_team_clock(),
            TimerKind::Pass => self.session.complete_pass(),
        };
        if applied {
            self.after_transition().await;
        }
    }

    /// Stop the card timer and the team clock, then resolve the card in play.
    fn resolve(&mut self, answer: Answer) -> bool {
        if !self.session.is_playing() {
            return self.session.process_answer(answer);
        }

        self.card_timer.cancel();
        if let Some(remaining) = self.team_timer.cancel() {
            self.session.pause_team_clock(remaining);
        }
        self.session.process_answer(answer)
    }

    async fn respond_with(
        &mut self,
        result: SessionResult<()>,
        response: oneshot::Sender<SessionResponse>,
    ) {
        match result {
            Ok(()) => {
                self.after_transition().await;
                let _ = response.send(SessionResponse::Success);
            }
            Err(e) => {
                log::debug!("Session {}: {e}", self.id);
                let _ = response.send(SessionResponse::Error(e.to_string()));
            }
        }
    }

    async fn respond_applied(&mut self, applied: bool, response: oneshot::Sender<SessionResponse>) {
        if applied {
            self.after_transition().await;
        }
        let _ = response.send(SessionResponse::from(applied));
    }

    /// Carry out the timer work and events the last transition queued
    async fn after_transition(&mut self) {
        for command in self.session.drain_commands() {
            self.apply_command(command);
        }

        for event in self.session.drain_events() {
            match event {
                GameEvent::GameOver { .. } => log::info!("Session {}: {event}", self.id),
                _ => log::debug!("Session {}: {event}", self.id),
            }
        }

        log::debug!("Session {} is {}", self.id, self.session.view().name());
        self.notify(SessionUpdate::ViewChanged(self.live_view()));

        if !self.reported {
            if let Some(outcome) = self.session.outcome().cloned() {
                self.reported = true;
                self.notify(SessionUpdate::Finished(outcome.clone()));
                self.report(&outcome).await;
            }
        }
    }

    fn apply_command(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::StartCardTimer(duration) => self.card_timer.start(duration),
            TimerCommand::StartTeamClock(duration) => self.team_timer.start(duration),
            TimerCommand::HoldForPass(duration) => self.pass_timer.start(duration),
            TimerCommand::CancelAll => self.cancel_timers(),
        }
    }

    fn cancel_timers(&mut self) {
        self.card_timer.cancel();
        self.team_timer.cancel();
        self.pass_timer.cancel();
    }

    /// The engine's view with the running countdowns filled in
    fn live_view(&self) -> GameView {
        let mut view = self.session.view();
        if let GameView::Playing(playing) = &mut view {
            if let Some(remaining) = self.card_timer.remaining() {
                playing.time_left = remaining;
            }
            if let (Some(teams), Some(remaining)) =
                (playing.teams.as_mut(), self.team_timer.remaining())
            {
                match teams.current_team {
                    Team::Red => teams.red_time_left = remaining,
                    Team::Blue => teams.blue_time_left = remaining,
                    Team::None => {}
                }
            }
        }
        view
    }

    /// Hand the final results to the sink
    async fn report(&self, outcome: &GameOutcome) {
        let Some(sink) = &self.sink else {
            return;
        };
        if let Err(e) = sink.record(self.id, self.session.mode(), outcome).await {
            log::warn!("Session {}: failed to report results: {e}", self.id);
        }
    }

    /// Broadcast an update to all subscribers
    fn notify(&mut self, update: SessionUpdate) {
        let id = self.id;
        self.subscribers.retain(|subscriber_id, sender| {
            match sender.try_send(update.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Subscriber {} of session {} is lagging, dropping update",
                        subscriber_id,
                        id
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", subscriber_id);
                    false
                }
            }
        });
    }
}
