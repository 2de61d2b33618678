use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GameSettings;
use super::items::ItemKind;

pub fn interval_for_level(settings: &GameSettings, level: u32) -> Duration {
    let reduction = settings
        .interval_step_ms
        .saturating_mul(u64::from(level.saturating_sub(1)));
    let interval_ms = settings
        .base_interval_ms
        .saturating_sub(reduction)
        .max(settings.min_interval_ms);
    Duration::from_millis(interval_ms)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progression {
    pub score: u32,
    pub level: u32,
    pub interval: Duration,
}

impl Progression {
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            score: 0,
            level: 1,
            interval: interval_for_level(settings, 1),
        }
    }

    /// Adds points and returns the new level if a threshold was crossed.
    ///
    /// At most one level is gained per call, even when the points cover
    /// several thresholds.
    pub fn add_points(&mut self, points: u32, settings: &GameSettings) -> Option<u32> {
        self.score = self.score.saturating_add(points);
        if self.score < self.level.saturating_mul(settings.level_score_step) {
            return None;
        }

        self.level += 1;
        self.interval = interval_for_level(settings, self.level);
        Some(self.level)
    }
}

/// Remaining ticks of the timed speed modifiers; zero means inactive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub speed_boost_ticks: u32,
    pub slow_down_ticks: u32,
}

impl Modifiers {
    pub fn speed_boost(&self) -> bool {
        self.speed_boost_ticks > 0
    }

    pub fn slow_down(&self) -> bool {
        self.slow_down_ticks > 0
    }

    pub fn arm(&mut self, kind: ItemKind, ticks: u32) {
        match kind {
            ItemKind::Speed => self.speed_boost_ticks = ticks,
            ItemKind::Slow => self.slow_down_ticks = ticks,
            ItemKind::Normal | ItemKind::Golden => {}
        }
    }

    pub fn tick_down(&mut self) {
        self.speed_boost_ticks = self.speed_boost_ticks.saturating_sub(1);
        self.slow_down_ticks = self.slow_down_ticks.saturating_sub(1);
    }

    /// Speed boost wins when both happen to be active.
    pub fn effective_interval(&self, base: Duration) -> Duration {
        if self.speed_boost() {
            base / 2
        } else if self.slow_down() {
            base * 3 / 2
        } else {
            base
        }
    }
}
