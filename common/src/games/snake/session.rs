//! Drives a [`SnakeGameState`] from one task.
//!
//! The task owns the state outright. Hosts talk to it through a
//! [`SessionHandle`]: commands go in over a channel, snapshots come back on a
//! watch channel and discrete events on a second channel. The only wait is
//! the pending tick held by [`TickSchedule`], which is dropped on pause, game
//! over and return to menu, and armed fresh on start and resume.

use std::future::pending;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Sleep, sleep};

use crate::log;
use super::game_state::{GameEvent, GamePhase, GameSnapshot, SnakeGameState};
use super::types::{Direction, Mode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostCommand {
    /// Fresh run; doubles as restart after game over.
    Start,
    StartOrTogglePause,
    TogglePause,
    SetHeading(Direction),
    SelectMode(Mode),
    ReturnToMenu,
    ToggleSound,
    Shutdown,
}

#[derive(Default)]
pub struct TickSchedule {
    pending: Option<Pin<Box<Sleep>>>,
}

impl TickSchedule {
    /// Replaces any pending tick.
    pub fn arm(&mut self, delay: Duration) {
        self.pending = Some(Box::pin(sleep(delay)));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Resolves when the armed tick is due; never resolves while disarmed.
    pub async fn fired(&mut self) {
        match self.pending.as_mut() {
            Some(pending_tick) => pending_tick.await,
            None => pending::<()>().await,
        }
        self.pending = None;
    }
}

#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<HostCommand>,
    snapshots: watch::Receiver<GameSnapshot>,
}

impl SessionHandle {
    pub fn send(&self, command: HostCommand) -> Result<(), String> {
        self.commands
            .send(command)
            .map_err(|e| format!("Game session is gone, dropped {:?}", e.0))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }
}

pub struct SnakeSession {
    state: SnakeGameState,
    schedule: TickSchedule,
    commands: mpsc::UnboundedReceiver<HostCommand>,
    snapshots: watch::Sender<GameSnapshot>,
    events: mpsc::UnboundedSender<GameEvent>,
}

impl SnakeSession {
    /// Spawns the session task. The join handle yields the final state once
    /// the host sends [`HostCommand::Shutdown`] or drops every handle.
    pub fn spawn(
        state: SnakeGameState,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<GameEvent>, JoinHandle<SnakeGameState>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());

        let session = Self {
            state,
            schedule: TickSchedule::default(),
            commands: command_rx,
            snapshots: snapshot_tx,
            events: event_tx,
        };

        let handle = SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (handle, event_rx, tokio::spawn(session.run()))
    }

    pub async fn run(mut self) -> SnakeGameState {
        log!("Game session started");
        loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(HostCommand::Shutdown) | None => break,
                    Some(command) => self.apply(command),
                },
                () = self.schedule.fired() => self.on_tick(),
            }
        }

        log!("Game session stopped");
        self.state
    }

    fn on_tick(&mut self) {
        let events = self.state.tick();
        match self.state.next_delay() {
            Some(delay) => self.schedule.arm(delay),
            None => self.schedule.cancel(),
        }
        self.publish(events);
    }

    fn apply(&mut self, command: HostCommand) {
        let phase_before = self.state.phase();
        let mut events = Vec::new();

        match command {
            HostCommand::Start => {
                events.push(self.state.start());
                self.schedule.arm(Duration::ZERO);
            }
            HostCommand::StartOrTogglePause => {
                events.extend(self.state.start_or_toggle_pause());
            }
            HostCommand::TogglePause => {
                self.state.toggle_pause();
            }
            HostCommand::SetHeading(direction) => {
                self.state.set_heading(direction);
            }
            HostCommand::SelectMode(mode) => self.state.select_mode(mode),
            HostCommand::ReturnToMenu => self.state.return_to_menu(),
            HostCommand::ToggleSound => {
                self.state.toggle_sound();
            }
            HostCommand::Shutdown => {}
        }

        let phase_after = self.state.phase();
        if phase_after != GamePhase::Running {
            self.schedule.cancel();
        } else if phase_before != GamePhase::Running {
            self.schedule.arm(Duration::ZERO);
        }

        self.publish(events);
    }

    fn publish(&mut self, events: Vec<GameEvent>) {
        for event in events {
            // Hosts are free to ignore events.
            let _ = self.events.send(event);
        }
        let snapshot = self.state.snapshot();
        // Receivers only wake for snapshots that differ from the last one.
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::games::SessionRng;
    use crate::games::snake::{DeathReason, InMemoryHighScoreStore, Point};

    fn create_state() -> SnakeGameState {
        // Modifiers disabled so tick timing stays fixed whatever items spawn.
        let settings = GameSettings {
            modifier_ticks: 0,
            ..GameSettings::default()
        };
        SnakeGameState::new(settings, Box::new(InMemoryHighScoreStore::default()), SessionRng::new(42)).unwrap()
    }

    fn drain(events: &mut mpsc::UnboundedReceiver<GameEvent>) -> Vec<GameEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = events.try_recv() {
            drained.push(event);
        }
        drained
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_interval() {
        let (handle, _events, _task) = SnakeSession::spawn(create_state());
        handle.send(HostCommand::Start).unwrap();
        handle.send(HostCommand::SetHeading(Direction::Right)).unwrap();

        tokio::time::sleep(Duration::from_millis(350)).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Running);
        assert_eq!(snapshot.ticks, 4);
        assert_eq!(snapshot.snake[0], Point::new(14, 10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks_and_resume_ticks_at_once() {
        let (handle, _events, _task) = SnakeSession::spawn(create_state());
        handle.send(HostCommand::Start).unwrap();
        handle.send(HostCommand::SetHeading(Direction::Up)).unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(handle.snapshot().ticks, 2);

        handle.send(HostCommand::TogglePause).unwrap();
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        let paused = handle.snapshot();
        assert_eq!(paused.phase, GamePhase::Paused);
        assert_eq!(paused.ticks, 2);

        handle.send(HostCommand::StartOrTogglePause).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let resumed = handle.snapshot();
        assert_eq!(resumed.phase, GamePhase::Running);
        assert_eq!(resumed.ticks, 3);
        assert_eq!(resumed.snake[0], Point::new(10, 7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_halts_schedule() {
        let (handle, mut events, _task) = SnakeSession::spawn(create_state());
        handle.send(HostCommand::Start).unwrap();
        handle.send(HostCommand::SetHeading(Direction::Left)).unwrap();

        tokio::time::sleep(Duration::from_millis(2_000)).await;
        let over = handle.snapshot();
        assert_eq!(over.phase, GamePhase::GameOver);

        let received = drain(&mut events);
        assert_eq!(received.first(), Some(&GameEvent::Started { mode: Mode::Classic }));
        assert!(matches!(
            received.last(),
            Some(GameEvent::GameOver { reason: DeathReason::WallCollision, .. })
        ));

        tokio::time::sleep(Duration::from_millis(2_000)).await;
        assert_eq!(handle.snapshot().ticks, over.ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_game_over() {
        let (handle, _events, _task) = SnakeSession::spawn(create_state());
        handle.send(HostCommand::Start).unwrap();
        handle.send(HostCommand::SetHeading(Direction::Down)).unwrap();
        tokio::time::sleep(Duration::from_millis(2_000)).await;
        assert_eq!(handle.snapshot().phase, GamePhase::GameOver);

        handle.send(HostCommand::StartOrTogglePause).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.snapshot().phase, GamePhase::GameOver);

        handle.send(HostCommand::SelectMode(Mode::Portal)).unwrap();
        handle.send(HostCommand::Start).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Running);
        assert_eq!(snapshot.mode, Mode::Portal);
        assert_eq!(snapshot.snake, vec![Point::new(10, 10)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_return_to_menu_cancels_ticks() {
        let (handle, _events, _task) = SnakeSession::spawn(create_state());
        handle.send(HostCommand::Start).unwrap();
        handle.send(HostCommand::SetHeading(Direction::Up)).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        handle.send(HostCommand::ReturnToMenu).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let in_menu = handle.snapshot();
        assert_eq!(in_menu.phase, GamePhase::NotStarted);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(handle.snapshot().ticks, in_menu.ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_returns_state() {
        let (handle, _events, task) = SnakeSession::spawn(create_state());
        handle.send(HostCommand::ToggleSound).unwrap();
        handle.send(HostCommand::Shutdown).unwrap();

        let state = task.await.unwrap();
        assert!(!state.snapshot().sound_enabled);
        assert!(handle.send(HostCommand::Start).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_ends_session() {
        let (handle, _events, task) = SnakeSession::spawn(create_state());
        drop(handle);
        let state = task.await.unwrap();
        assert_eq!(state.phase(), GamePhase::NotStarted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_heading_publishes_once() {
        let (handle, _events, _task) = SnakeSession::spawn(create_state());
        handle.send(HostCommand::Start).unwrap();
        handle.send(HostCommand::SetHeading(Direction::Right)).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let mut snapshots = handle.subscribe();
        snapshots.mark_unchanged();

        handle.send(HostCommand::SetHeading(Direction::Up)).unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(snapshots.has_changed().unwrap());
        assert_eq!(snapshots.borrow_and_update().queued_heading, Some(Direction::Up));

        for _ in 0..5 {
            handle.send(HostCommand::SetHeading(Direction::Up)).unwrap();
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!snapshots.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_fires_once_per_arm() {
        let mut schedule = TickSchedule::default();

        schedule.arm(Duration::from_millis(5));
        let fired = tokio::time::timeout(Duration::from_millis(50), schedule.fired()).await;
        assert!(fired.is_ok());

        let again = tokio::time::timeout(Duration::from_millis(50), schedule.fired()).await;
        assert!(again.is_err());

        schedule.arm(Duration::from_millis(5));
        schedule.cancel();
        let cancelled = tokio::time::timeout(Duration::from_millis(50), schedule.fired()).await;
        assert!(cancelled.is_err());
    }
}
