use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::{
    grid::{Coord, Grid, Probability},
    step::step,
};

/// Wait between generations, kept within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Delay(Duration);

impl Delay {
    pub const MIN: Delay = Delay(Duration::from_millis(10));
    pub const MAX: Delay = Delay(Duration::from_millis(1000));
    /// Slider increment used by `faster` and `slower`.
    pub const STEP: Duration = Duration::from_millis(10);

    /// Clamps `ms` into the valid range.
    pub fn from_millis(ms: u64) -> Self {
        let ms = ms.clamp(Self::MIN.as_millis(), Self::MAX.as_millis());
        Delay(Duration::from_millis(ms))
    }

    pub fn as_millis(&self) -> u64 {
        self.0.as_millis() as u64
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    pub fn faster(self) -> Self {
        Delay(self.0.saturating_sub(Self::STEP)).max(Self::MIN)
    }

    pub fn slower(self) -> Self {
        Delay(self.0 + Self::STEP).min(Self::MAX)
    }
}

impl Default for Delay {
    fn default() -> Self {
        Delay(Duration::from_millis(100))
    }
}

/// Current generation plus everything needed to keep advancing it on a timer.
///
/// The event loop calls [`Simulation::poll`] whenever it wakes up and sleeps for at most
/// [`Simulation::time_until_tick`] in between. `running` is checked on every poll, so a stop
/// always wins over a tick that was already scheduled.
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid,
    running: bool,
    delay: Delay,
    generation: u64,
    next_tick: Option<Instant>,
}

impl Simulation {
    pub fn new(grid: Grid, delay: Delay) -> Self {
        Simulation {
            grid,
            running: false,
            delay,
            generation: 0,
            next_tick: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn delay(&self) -> Delay {
        self.delay
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts ticking. The first generation is computed right away.
    pub fn start(&mut self, now: Instant) {
        if self.running {
            return;
        }

        self.running = true;
        info!(generation = self.generation, delay_ms = self.delay.as_millis(), "simulation started");
        self.advance(now);
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.running = false;
        self.next_tick = None;
        info!(generation = self.generation, "simulation stopped");
    }

    pub fn toggle_running(&mut self, now: Instant) {
        if self.running {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Changes the delay. A tick that is already scheduled keeps its deadline.
    pub fn set_delay(&mut self, delay: Delay) {
        if delay != self.delay {
            debug!(delay_ms = delay.as_millis(), "delay changed");
        }
        self.delay = delay;
    }

    /// Runs a generation if one is due. Returns whether the grid advanced.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.running {
            self.next_tick = None;
            return false;
        }

        match self.next_tick {
            Some(deadline) if now >= deadline => {
                self.advance(now);
                true
            }
            Some(_) => false,
            None => {
                self.next_tick = Some(now + self.delay.duration());
                false
            }
        }
    }

    /// How long the caller may wait before the next `poll` has work to do.
    /// `None` while stopped.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        if !self.running {
            return None;
        }

        self.next_tick
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Clears every cell.
    pub fn reset(&mut self) {
        info!("grid reset");
        self.replace(Grid::empty());
    }

    pub fn randomize<R: Rng>(&mut self, rng: &mut R, p: Probability) {
        let grid = Grid::random_with(rng, p);
        info!(probability = p.get(), population = grid.population(), "grid randomized");
        self.replace(grid);
    }

    /// Flips one cell. Returns `false` if `coord` is off the grid.
    pub fn toggle_cell(&mut self, coord: Coord) -> bool {
        match self.grid.toggled(coord) {
            Some(grid) => {
                debug!(%coord, "cell toggled");
                self.grid = grid;
                true
            }
            None => false,
        }
    }

    fn replace(&mut self, grid: Grid) {
        self.grid = grid;
        self.generation = 0;
    }

    fn advance(&mut self, now: Instant) {
        self.grid = step(&self.grid);
        self.generation += 1;
        self.next_tick = Some(now + self.delay.duration());
        debug!(
            generation = self.generation,
            population = self.grid.population(),
            "tick"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn blinker() -> Grid {
        Grid::from_alive([(5, 4), (5, 5), (5, 6)])
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn delay_is_clamped() {
        assert_eq!(Delay::from_millis(0), Delay::MIN);
        assert_eq!(Delay::from_millis(5000), Delay::MAX);
        assert_eq!(Delay::from_millis(250).as_millis(), 250);
        assert_eq!(Delay::MIN.faster(), Delay::MIN);
        assert_eq!(Delay::MAX.slower(), Delay::MAX);
        assert_eq!(Delay::default().faster().as_millis(), 90);
        assert_eq!(Delay::default().slower().as_millis(), 110);
    }

    #[test]
    fn start_steps_immediately_then_waits() {
        let t0 = Instant::now();
        let mut sim = Simulation::new(blinker(), Delay::from_millis(100));

        sim.start(t0);
        assert!(sim.running());
        assert_eq!(sim.generation(), 1);
        assert_eq!(sim.time_until_tick(t0), Some(ms(100)));

        assert!(!sim.poll(t0 + ms(99)));
        assert!(sim.poll(t0 + ms(100)));
        assert_eq!(sim.generation(), 2);
        assert_eq!(sim.grid(), &blinker());
    }

    #[test]
    fn stopped_simulation_never_steps() {
        let t0 = Instant::now();
        let mut sim = Simulation::new(blinker(), Delay::default());

        assert!(!sim.poll(t0 + ms(10_000)));
        assert_eq!(sim.time_until_tick(t0), None);
        assert_eq!(sim.generation(), 0);
    }

    #[test]
    fn stop_cancels_pending_tick() {
        let t0 = Instant::now();
        let mut sim = Simulation::new(blinker(), Delay::from_millis(50));

        sim.start(t0);
        sim.stop();
        assert!(!sim.poll(t0 + ms(500)));
        assert_eq!(sim.generation(), 1);

        // Restarting faster than the delay does not leave a stale deadline behind.
        sim.start(t0 + ms(20));
        assert_eq!(sim.generation(), 2);
        assert!(!sim.poll(t0 + ms(60)));
        assert!(sim.poll(t0 + ms(70)));
    }

    #[test]
    fn delay_change_applies_from_next_wait() {
        let t0 = Instant::now();
        let mut sim = Simulation::new(blinker(), Delay::from_millis(100));

        sim.start(t0);
        sim.set_delay(Delay::from_millis(500));
        assert!(sim.poll(t0 + ms(100)));

        assert!(!sim.poll(t0 + ms(599)));
        assert!(sim.poll(t0 + ms(600)));
    }

    #[test]
    fn edits_replace_grid_and_keep_running() {
        let t0 = Instant::now();
        let mut sim = Simulation::new(blinker(), Delay::default());
        sim.start(t0);

        sim.reset();
        assert!(sim.running());
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.grid().population(), 0);

        assert!(sim.toggle_cell(Coord::new(0, 0)));
        assert!(!sim.toggle_cell(Coord::new(100, 0)));
        assert_eq!(sim.grid().population(), 1);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        sim.randomize(&mut rng, Probability::ALWAYS);
        assert_eq!(sim.grid().population(), sim.grid().rows() * sim.grid().cols());
    }

    #[test]
    fn toggle_running_flips_state() {
        let t0 = Instant::now();
        let mut sim = Simulation::new(Grid::empty(), Delay::default());

        sim.toggle_running(t0);
        assert!(sim.running());
        sim.toggle_running(t0);
        assert!(!sim.running());
    }
}
