use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded source for every random choice a run makes: item kinds and grid
/// cells. Two states built with the same seed and fed the same inputs play
/// out identically.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in `[0, 1)`, matched against cumulative spawn chances.
    pub fn chance_draw(&mut self) -> f64 {
        self.rng.random()
    }

    /// Uniform coordinate on a square grid. `tile_count` must be positive.
    pub fn coordinate(&mut self, tile_count: i32) -> i32 {
        self.rng.random_range(0..tile_count)
    }
}
