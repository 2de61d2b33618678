mod bot_controller;
mod game_state;
mod high_score;
mod items;
mod movement;
mod progression;
mod session;
mod snake;
mod spawner;
mod types;

pub use bot_controller::BotController;
pub use game_state::{GameEvent, GamePhase, GameSnapshot, SnakeGameState};
pub use high_score::{HighScoreRecord, HighScoreStore, InMemoryHighScoreStore, YamlHighScoreStore};
pub use items::{Item, ItemKind};
pub use movement::{StepOutcome, advance, next_head};
pub use progression::{Modifiers, Progression, interval_for_level};
pub use session::{HostCommand, SessionHandle, SnakeSession, TickSchedule};
pub use snake::Snake;
pub use spawner::{choose_item_kind, place_item, place_obstacles, random_item_kind};
pub use types::{Axis, DeathReason, Direction, Mode, Point};
