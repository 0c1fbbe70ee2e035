use crate::config::{SimConfig, SpawnParams};
use crate::core::spawn::random_particles;
use crate::core::{Event, EventKind, Particle, Scheduler};
use crate::error::{Error, Result};
use crate::render::Renderer;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The clock reached the configured time limit.
    TimeLimit,
    /// No events remained; nothing will ever collide again.
    Stalled,
}

/// Driver lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Uninitialized,
    Running,
    Terminated(Termination),
}

/// Result of a single [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A valid event was applied.
    Fired(EventKind),
    /// A stale event was popped and discarded.
    Stale(EventKind),
    /// The simulation has terminated; nothing was done.
    Finished(Termination),
}

/// Event counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub particle_collisions: u64,
    pub wall_collisions: u64,
    pub redraws: u64,
    pub stale_discarded: u64,
    pub scheduled: u64,
}

impl Stats {
    /// Valid events applied, redraws included.
    pub fn fired(&self) -> u64 {
        self.particle_collisions + self.wall_collisions + self.redraws
    }
}

/// End-of-run report.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub termination: Termination,
    pub clock: f64,
    pub particles: usize,
    pub stats: Stats,
    pub initial_energy: f64,
    pub final_energy: f64,
    pub pending_events: usize,
}

impl RunSummary {
    /// Relative change in total kinetic energy over the run.
    pub fn energy_drift(&self) -> f64 {
        if self.initial_energy == 0.0 {
            return (self.final_energy - self.initial_energy).abs();
        }
        ((self.final_energy - self.initial_energy) / self.initial_energy).abs()
    }
}

/// Event-driven simulation of hard discs in a box.
///
/// The driver owns the clock, the particle arena, and the event queue. Events
/// refer to particles by arena index; after any collision, only the particles
/// involved get fresh predictions, and earlier predictions involving them are
/// recognised as stale by their collision-count snapshots when popped.
#[derive(Debug)]
pub struct Simulation {
    clock: f64,
    config: SimConfig,
    particles: Vec<Particle>,
    scheduler: Scheduler,
    state: SimState,
    stats: Stats,
    initial_energy: f64,
}

impl Simulation {
    /// Create a simulation over an explicit particle set.
    ///
    /// Particle `i` must carry id `i`. With `check_overlap` set, every disc
    /// must lie inside the domain and no two discs may overlap.
    pub fn new(particles: Vec<Particle>, config: SimConfig) -> Result<Self> {
        config.validate()?;
        if particles.is_empty() {
            return Err(Error::InvalidParam("at least one particle is required".into()));
        }
        if u32::try_from(particles.len()).is_err() {
            return Err(Error::InvalidParam("too many particles".into()));
        }
        for (i, p) in particles.iter().enumerate() {
            if p.id() as usize != i {
                return Err(Error::InvalidConfiguration(format!(
                    "particle at index {i} has id {}",
                    p.id()
                )));
            }
        }
        // A disc wider than the box touches both walls at once and never leaves t = 0.
        if let Some(p) = particles.iter().find(|p| !config.domain.fits_disc(p.radius())) {
            return Err(Error::InvalidConfiguration(format!(
                "particle {} (radius {}) does not fit between the walls",
                p.id(),
                p.radius()
            )));
        }
        if config.check_overlap {
            check_initial_placement(&particles, &config)?;
        }

        let initial_energy = particles.iter().map(Particle::kinetic_energy).sum();
        Ok(Self {
            clock: 0.0,
            config,
            particles,
            scheduler: Scheduler::new(),
            state: SimState::Uninitialized,
            stats: Stats::default(),
            initial_energy,
        })
    }

    /// Create a simulation over randomly placed identical discs.
    pub fn random(params: &SpawnParams, config: SimConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let particles = random_particles(params, &config.domain, seed)?;
        Self::new(particles, config)
    }

    /// Returns current simulation time.
    pub fn time(&self) -> f64 {
        self.clock
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Events currently queued, stale ones included.
    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    /// Compute total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// Total linear momentum (diagnostic).
    pub fn momentum(&self) -> [f64; 2] {
        self.particles.iter().fold([0.0, 0.0], |acc, p| {
            let m = p.momentum();
            [acc[0] + m[0], acc[1] + m[1]]
        })
    }

    /// Per-particle collision counts, indexed by particle id.
    pub fn collision_counts(&self) -> Vec<u64> {
        self.particles.iter().map(Particle::collision_count).collect()
    }

    /// Seed the queue with every pair prediction, both wall predictions per
    /// particle, and the first redraw tick.
    pub fn start(&mut self) -> Result<()> {
        if self.state != SimState::Uninitialized {
            return Err(Error::InvalidState("simulation already started"));
        }
        let n = self.particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let dt = self.particles[i].time_to_hit(&self.particles[j]);
                self.schedule_pair(i, j, dt)?;
            }
        }
        for i in 0..n {
            self.predict_walls(i)?;
        }
        if self.config.redraw_period().is_some() {
            self.schedule(Event::redraw(self.clock)?);
        }

        self.state = SimState::Running;
        info!(
            particles = n,
            pending = self.scheduler.len(),
            time_limit = self.config.time_limit,
            redraw = ?self.config.redraw_period(),
            "simulation started"
        );
        Ok(())
    }

    /// Process one queued event.
    ///
    /// Returns `Err(Error::SimulationStalled)` the first time the queue is found
    /// empty before the time limit; the simulation is `Terminated` afterwards.
    pub fn step(&mut self, renderer: &mut dyn Renderer) -> Result<StepOutcome> {
        match self.state {
            SimState::Uninitialized => {
                return Err(Error::InvalidState("call start() before stepping"))
            }
            SimState::Terminated(reason) => return Ok(StepOutcome::Finished(reason)),
            SimState::Running => {}
        }

        let limit = self.config.time_limit;
        if self.scheduler.is_empty() {
            if self.clock >= limit {
                return Ok(self.terminate(Termination::TimeLimit));
            }
            self.terminate(Termination::Stalled);
            warn!(time = self.clock, "event queue empty before time limit");
            return Err(Error::SimulationStalled { time: self.clock });
        }
        let Some(next) = self.scheduler.peek_time() else {
            return Err(Error::InvalidState("event queue emptied before peek"));
        };
        if next.into_inner() > limit {
            self.drift_all(limit);
            self.clock = limit;
            return Ok(self.terminate(Termination::TimeLimit));
        }

        let Some(ev) = self.scheduler.extract_min() else {
            return Err(Error::InvalidState("event queue emptied after peek"));
        };
        let kind = ev.kind();

        let (a, b) = kind.participants();
        if !ev.is_valid(self.live_count(a), self.live_count(b)) {
            self.stats.stale_discarded += 1;
            trace!(time = ev.time_f64(), ?kind, "stale event discarded");
            return Ok(StepOutcome::Stale(kind));
        }

        let t_ev = ev.time_f64();
        self.drift_all(t_ev);
        self.clock = t_ev;

        match kind {
            EventKind::Particles { a, b } => {
                let (ia, ib) = (a as usize, b as usize);
                let (pa, pb) = pair_mut(&mut self.particles, ia, ib)?;
                pa.bounce_off(pb)?;
                self.stats.particle_collisions += 1;
                self.predict(ia)?;
                self.predict(ib)?;
            }
            EventKind::VerticalWall { a } => {
                let ia = a as usize;
                self.particles[ia].bounce_off_vertical_wall();
                self.stats.wall_collisions += 1;
                self.predict(ia)?;
            }
            EventKind::HorizontalWall { a } => {
                let ia = a as usize;
                self.particles[ia].bounce_off_horizontal_wall();
                self.stats.wall_collisions += 1;
                self.predict(ia)?;
            }
            EventKind::Redraw => {
                renderer.redraw(self.clock, &self.particles);
                self.stats.redraws += 1;
                if let Some(dt) = self.config.redraw_period() {
                    self.schedule(Event::redraw(self.clock + dt)?);
                }
            }
        }

        debug!(time = self.clock, ?kind, pending = self.scheduler.len(), "event fired");
        Ok(StepOutcome::Fired(kind))
    }

    /// Run until termination and report.
    ///
    /// A stall is a normal way to finish here and is reported in the summary.
    pub fn run(&mut self, renderer: &mut dyn Renderer) -> Result<RunSummary> {
        if self.state == SimState::Uninitialized {
            self.start()?;
        }
        let termination = loop {
            match self.step(renderer) {
                Ok(StepOutcome::Finished(reason)) => break reason,
                Ok(_) => {}
                Err(Error::SimulationStalled { .. }) => break Termination::Stalled,
                Err(e) => return Err(e),
            }
        };
        let summary = self.summary(termination);
        info!(
            ?termination,
            time = summary.clock,
            fired = summary.stats.fired(),
            stale = summary.stats.stale_discarded,
            energy_drift = summary.energy_drift(),
            "simulation finished"
        );
        Ok(summary)
    }

    /// Advance to the absolute time `target`, processing every event up to it.
    ///
    /// Starts the simulation if needed. Targets past the time limit are clamped
    /// and terminate the run. Unlike [`Simulation::run`], an empty queue is not
    /// a stall here: with nothing left to collide, particles drift to `target`.
    pub fn advance_to(&mut self, target: f64, renderer: &mut dyn Renderer) -> Result<()> {
        if !target.is_finite() {
            return Err(Error::InvalidParam("target_time must be finite".into()));
        }
        if target < self.clock {
            return Err(Error::InvalidParam(
                "target_time cannot be earlier than current time".into(),
            ));
        }
        match self.state {
            SimState::Uninitialized => self.start()?,
            SimState::Terminated(_) => return Ok(()),
            SimState::Running => {}
        }

        let limit = self.config.time_limit;
        let target = target.min(limit);
        while let Some(t) = self.scheduler.peek_time() {
            if t.into_inner() > target {
                break;
            }
            self.step(renderer)?;
        }
        self.drift_all(target);
        self.clock = target;
        if target >= limit {
            self.terminate(Termination::TimeLimit);
        }
        Ok(())
    }

    fn summary(&self, termination: Termination) -> RunSummary {
        RunSummary {
            termination,
            clock: self.clock,
            particles: self.particles.len(),
            stats: self.stats,
            initial_energy: self.initial_energy,
            final_energy: self.kinetic_energy(),
            pending_events: self.scheduler.len(),
        }
    }

    fn terminate(&mut self, reason: Termination) -> StepOutcome {
        self.state = SimState::Terminated(reason);
        StepOutcome::Finished(reason)
    }

    // ============ Internal helpers ============

    #[inline]
    fn live_count(&self, id: Option<u32>) -> Option<u64> {
        id.and_then(|i| self.particles.get(i as usize))
            .map(Particle::collision_count)
    }

    fn schedule(&mut self, ev: Event) {
        self.scheduler.insert(ev);
        self.stats.scheduled += 1;
    }

    /// Queue a pair collision `dt` from now, if it ever happens.
    fn schedule_pair(&mut self, i: usize, j: usize, dt: f64) -> Result<()> {
        let t = self.clock + dt;
        if !t.is_finite() {
            return Ok(());
        }
        let (pi, pj) = (&self.particles[i], &self.particles[j]);
        let ev = Event::particles(t, pi.id(), pi.collision_count(), pj.id(), pj.collision_count())?;
        self.schedule(ev);
        Ok(())
    }

    fn predict_walls(&mut self, i: usize) -> Result<()> {
        let p = &self.particles[i];
        let domain = self.config.domain;
        let (id, cc) = (p.id(), p.collision_count());
        let tv = self.clock + p.time_to_hit_vertical_wall(&domain);
        let th = self.clock + p.time_to_hit_horizontal_wall(&domain);
        if tv.is_finite() {
            self.schedule(Event::vertical_wall(tv, id, cc)?);
        }
        if th.is_finite() {
            self.schedule(Event::horizontal_wall(th, id, cc)?);
        }
        Ok(())
    }

    /// Fresh predictions for particle `i` against every other particle and both walls.
    fn predict(&mut self, i: usize) -> Result<()> {
        for j in 0..self.particles.len() {
            if j == i {
                continue;
            }
            let dt = self.particles[i].time_to_hit(&self.particles[j]);
            self.schedule_pair(i, j, dt)?;
        }
        self.predict_walls(i)
    }

    /// Move every particle in a straight line up to the absolute time `to_time`.
    fn drift_all(&mut self, to_time: f64) {
        let dt = to_time - self.clock;
        if dt <= 0.0 {
            return;
        }
        for p in &mut self.particles {
            p.advance(dt);
        }
    }
}

// ============ Utility helpers ============

/// Disjoint mutable borrows of two arena slots.
fn pair_mut(ps: &mut [Particle], a: usize, b: usize) -> Result<(&mut Particle, &mut Particle)> {
    if a == b || a >= ps.len() || b >= ps.len() {
        return Err(Error::InvalidState("pair event with invalid participants"));
    }
    if a < b {
        let (lo, hi) = ps.split_at_mut(b);
        Ok((&mut lo[a], &mut hi[0]))
    } else {
        let (lo, hi) = ps.split_at_mut(a);
        Ok((&mut hi[0], &mut lo[b]))
    }
}

fn check_initial_placement(particles: &[Particle], config: &SimConfig) -> Result<()> {
    for p in particles {
        if !config.domain.contains_disc(p.position(), p.radius()) {
            return Err(Error::InvalidConfiguration(format!(
                "particle {} lies outside the domain",
                p.id()
            )));
        }
    }
    for (i, p) in particles.iter().enumerate() {
        for q in &particles[i + 1..] {
            let (rp, rq) = (p.position(), q.position());
            let dx = rq[0] - rp[0];
            let dy = rq[1] - rp[1];
            let sigma = p.radius() + q.radius();
            if dx * dx + dy * dy < sigma * sigma {
                return Err(Error::InvalidConfiguration(format!(
                    "particles {} and {} overlap",
                    p.id(),
                    q.id()
                )));
            }
        }
    }
    Ok(())
}
