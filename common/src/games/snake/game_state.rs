use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{GameSettings, Validate};
use crate::games::SessionRng;
use crate::log;
use super::high_score::HighScoreStore;
use super::items::{Item, ItemKind};
use super::movement::{self, StepOutcome};
use super::progression::{Modifiers, Progression};
use super::snake::Snake;
use super::spawner;
use super::types::{DeathReason, Direction, Mode, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    NotStarted,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { mode: Mode },
    ItemConsumed { kind: ItemKind, position: Point },
    LevelUp { level: u32 },
    GameOver {
        reason: DeathReason,
        score: u32,
        level: u32,
        new_record: bool,
    },
}

/// Read-only view handed to hosts once per frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub mode: Mode,
    pub selected_mode: Mode,
    pub tile_count: u32,
    pub snake: Vec<Point>,
    pub heading: Option<Direction>,
    /// Heading the next tick will commit.
    pub queued_heading: Option<Direction>,
    pub item: Item,
    pub obstacles: Vec<Point>,
    pub score: u32,
    pub level: u32,
    pub high_score: u32,
    pub modifiers: Modifiers,
    pub tick_interval: Duration,
    pub ticks: u64,
    pub sound_enabled: bool,
}

pub struct SnakeGameState {
    settings: GameSettings,
    rng: SessionRng,
    store: Box<dyn HighScoreStore>,
    phase: GamePhase,
    mode: Mode,
    selected_mode: Mode,
    snake: Snake,
    heading: Option<Direction>,
    next_heading: Option<Direction>,
    item: Item,
    obstacles: HashSet<Point>,
    progression: Progression,
    modifiers: Modifiers,
    high_score: u32,
    ticks: u64,
    sound_enabled: bool,
}

impl SnakeGameState {
    /// Fails when `settings` do not validate; the grid math relies on them.
    pub fn new(
        settings: GameSettings,
        store: Box<dyn HighScoreStore>,
        rng: SessionRng,
    ) -> Result<Self, String> {
        settings
            .validate()
            .map_err(|e| format!("Invalid game settings: {}", e))?;

        let high_score = store.load_high_score().unwrap_or_else(|e| {
            log!("Failed to load high score, starting from 0: {}", e);
            0
        });
        let start = Self::start_position(&settings);

        let mut state = Self {
            progression: Progression::new(&settings),
            settings,
            rng,
            store,
            phase: GamePhase::NotStarted,
            mode: Mode::default(),
            selected_mode: Mode::default(),
            snake: Snake::new(start),
            heading: None,
            next_heading: None,
            item: Item {
                position: start,
                kind: ItemKind::Normal,
            },
            obstacles: HashSet::new(),
            modifiers: Modifiers::default(),
            high_score,
            ticks: 0,
            sound_enabled: true,
        };
        state.reset();
        Ok(state)
    }

    fn start_position(settings: &GameSettings) -> Point {
        let center = (settings.tile_count / 2) as i32;
        Point::new(center, center)
    }

    fn tile_count(&self) -> i32 {
        self.settings.tile_count as i32
    }

    fn reset(&mut self) {
        self.mode = self.selected_mode;
        self.snake = Snake::new(Self::start_position(&self.settings));
        self.heading = None;
        self.next_heading = None;
        self.progression = Progression::new(&self.settings);
        self.modifiers = Modifiers::default();
        self.ticks = 0;

        self.obstacles = if self.mode.has_obstacles() {
            self.generate_obstacles()
        } else {
            HashSet::new()
        };
        self.respawn_item();
    }

    fn generate_obstacles(&mut self) -> HashSet<Point> {
        let count = self.settings.base_obstacle_count + self.progression.level;
        let tile_count = self.tile_count();
        spawner::place_obstacles(
            &mut self.rng,
            tile_count,
            count,
            &self.snake,
            self.item.position,
            self.settings.obstacle_place_attempts,
        )
    }

    fn respawn_item(&mut self) {
        let kind = spawner::random_item_kind(&mut self.rng);
        let tile_count = self.tile_count();
        let obstacles = self.mode.has_obstacles().then_some(&self.obstacles);
        let position = spawner::place_item(
            &mut self.rng,
            tile_count,
            &self.snake,
            obstacles,
            self.settings.item_place_attempts,
        );
        self.item = Item { position, kind };
    }

    /// Begins a fresh run in the selected mode. Also serves as restart.
    pub fn start(&mut self) -> GameEvent {
        self.reset();
        self.phase = GamePhase::Running;
        log!("Run started in {} mode, seed {}", self.mode, self.rng.seed());
        GameEvent::Started { mode: self.mode }
    }

    /// Buffers a turn for the next tick. Returns whether it was accepted.
    pub fn set_heading(&mut self, direction: Direction) -> bool {
        if self.phase != GamePhase::Running || !direction.can_follow(self.heading) {
            return false;
        }
        self.next_heading = Some(direction);
        true
    }

    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Running {
            return Vec::new();
        }

        self.heading = self.next_heading;
        let tile_count = self.tile_count();
        let outcome = movement::advance(
            &mut self.snake,
            self.heading,
            self.mode,
            tile_count,
            &self.obstacles,
            self.item.position,
        );

        let mut events = Vec::new();
        match outcome {
            StepOutcome::Terminal(reason) => {
                events.push(self.finish(reason));
                return events;
            }
            StepOutcome::Moved { grew: true } => self.consume_item(&mut events),
            StepOutcome::Moved { grew: false } | StepOutcome::Stayed => {}
        }

        self.modifiers.tick_down();
        self.ticks += 1;
        events
    }

    fn consume_item(&mut self, events: &mut Vec<GameEvent>) {
        let Item { position, kind } = self.item;
        events.push(GameEvent::ItemConsumed { kind, position });

        let new_level = self.progression.add_points(kind.points(), &self.settings);
        self.modifiers.arm(kind, self.settings.modifier_ticks);
        self.respawn_item();

        if let Some(level) = new_level {
            if self.mode.has_obstacles() {
                self.obstacles = self.generate_obstacles();
            }
            log!("Level {} reached with score {}", level, self.progression.score);
            events.push(GameEvent::LevelUp { level });
        }
    }

    fn finish(&mut self, reason: DeathReason) -> GameEvent {
        self.phase = GamePhase::GameOver;
        let score = self.progression.score;
        let new_record = score > self.high_score;

        if new_record {
            self.high_score = score;
            if let Err(e) = self.store.store_high_score(score) {
                log!("Failed to store high score {}: {}", score, e);
            }
        }

        log!(
            "Game over ({:?}): score {}, level {}, new record: {}",
            reason,
            score,
            self.progression.level,
            new_record
        );
        GameEvent::GameOver {
            reason,
            score,
            level: self.progression.level,
            new_record,
        }
    }

    /// Returns whether the phase changed. Only a live run can be paused.
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::NotStarted | GamePhase::GameOver => return false,
        };
        true
    }

    pub fn start_or_toggle_pause(&mut self) -> Option<GameEvent> {
        if self.phase == GamePhase::NotStarted {
            return Some(self.start());
        }
        self.toggle_pause();
        None
    }

    /// Takes effect at the next start.
    pub fn select_mode(&mut self, mode: Mode) {
        self.selected_mode = mode;
    }

    pub fn return_to_menu(&mut self) {
        self.phase = GamePhase::NotStarted;
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Wait before the next tick, `None` while no tick is due.
    pub fn next_delay(&self) -> Option<Duration> {
        (self.phase == GamePhase::Running)
            .then(|| self.modifiers.effective_interval(self.progression.interval))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut obstacles: Vec<Point> = self.obstacles.iter().copied().collect();
        obstacles.sort_by_key(|p| (p.y, p.x));

        GameSnapshot {
            phase: self.phase,
            mode: self.mode,
            selected_mode: self.selected_mode,
            tile_count: self.settings.tile_count,
            snake: self.snake.segments().copied().collect(),
            heading: self.heading,
            queued_heading: self.next_heading,
            item: self.item,
            obstacles,
            score: self.progression.score,
            level: self.progression.level,
            high_score: self.high_score,
            modifiers: self.modifiers,
            tick_interval: self.progression.interval,
            ticks: self.ticks,
            sound_enabled: self.sound_enabled,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_item(&mut self, position: Point, kind: ItemKind) {
        self.item = Item { position, kind };
    }

    #[cfg(test)]
    pub(crate) fn set_snake(&mut self, cells: &[Point], heading: Option<Direction>) {
        self.snake = Snake::from_cells(cells);
        self.heading = heading;
        self.next_heading = heading;
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.progression.score = score;
    }
}
