use tokio::sync::mpsc;
use snake_arcade_common::games::snake::{
    BotController, GameEvent, GameSnapshot, HostCommand, SessionHandle,
};
use snake_arcade_common::log;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub score: u32,
    pub level: u32,
    pub new_record: bool,
}

/// Plays one run to game over, steering from each published snapshot.
pub async fn play_run(
    handle: &SessionHandle,
    events: &mut mpsc::UnboundedReceiver<GameEvent>,
) -> Result<RunSummary, String> {
    let mut snapshots = handle.subscribe();
    snapshots.mark_unchanged();
    handle.send(HostCommand::Start)?;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                changed.map_err(|e| format!("Snapshot channel closed: {}", e))?;
                let command = steering_command(&snapshots.borrow_and_update());
                if let Some(command) = command {
                    handle.send(command)?;
                }
            }
            event = events.recv() => {
                let event = event.ok_or_else(|| "Event channel closed".to_string())?;
                if let Some(summary) = report_event(&event) {
                    return Ok(summary);
                }
            }
        }
    }
}

/// A turn is only requested when it differs from the one already queued.
fn steering_command(snapshot: &GameSnapshot) -> Option<HostCommand> {
    let direction = BotController::calculate_move(snapshot)?;
    (Some(direction) != snapshot.queued_heading).then_some(HostCommand::SetHeading(direction))
}

fn report_event(event: &GameEvent) -> Option<RunSummary> {
    match *event {
        GameEvent::Started { mode } => {
            log!("Run started in {} mode", mode);
            None
        }
        GameEvent::ItemConsumed { kind, position } => {
            log!("Ate {:?} item ({}) at ({}, {})", kind, kind.color(), position.x, position.y);
            None
        }
        GameEvent::LevelUp { level } => {
            log!("Reached level {}", level);
            None
        }
        GameEvent::GameOver { reason, score, level, new_record } => {
            log!("Game over by {:?} with score {} on level {}", reason, score, level);
            if new_record {
                log!("New high score: {}", score);
            }
            Some(RunSummary { score, level, new_record })
        }
    }
}
