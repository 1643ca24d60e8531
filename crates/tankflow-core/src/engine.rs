//! The discrete-event simulation engine.
//!
//! The engine owns the clock and the ordered set of tanks that are still
//! filling. Time does not advance in fixed ticks: each step jumps straight
//! to the next moment some tank becomes full.

use tracing::instrument;

use crate::active::ActiveTanks;
use crate::error::SimError;
use crate::event::TankEvent;
use crate::report::RunReport;
use crate::tank::{Tank, TankSpec};

// ---------------------------------------------------------------------------
// Step outcome
// ---------------------------------------------------------------------------

/// What happened during one call to [`Engine::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Time the clock moved forward by.
    pub elapsed: f64,
    /// Clock value after the step.
    pub clock: f64,
    /// Ordinals of tanks that became full, in walk order.
    pub filled: Vec<usize>,
    /// Events in the order they happened during the walk.
    pub events: Vec<TankEvent>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Simulation state for one run.
///
/// Independent runs need independent engines; nothing is shared between
/// instances.
#[derive(Debug, Clone)]
pub struct Engine {
    pub(crate) active: ActiveTanks,
    pub(crate) clock: f64,
    pub(crate) steps: u64,
    pub(crate) last_overflow_time: Option<f64>,
    pub(crate) all_overflow_time: Option<f64>,
    pub(crate) initial_flow_rate: f64,
    pub(crate) discarded_flow: f64,
}

impl Engine {
    /// Build an engine from tanks in input order.
    ///
    /// Every tank is validated before anything runs; the first invalid one
    /// fails the whole construction.
    pub fn new<I>(specs: I) -> Result<Self, SimError>
    where
        I: IntoIterator<Item = TankSpec>,
    {
        let mut active = ActiveTanks::new();
        let mut initial_flow_rate = 0.0;
        for (ordinal, spec) in specs.into_iter().enumerate() {
            let tank = Tank::from_spec(ordinal, spec)
                .map_err(|source| SimError::InvalidTank { ordinal, source })?;
            initial_flow_rate += tank.flow_rate();
            active.push_back(tank);
        }
        if active.is_empty() {
            return Err(SimError::NoTanks);
        }
        tracing::debug!(
            tanks = active.len(),
            initial_flow_rate,
            "engine created"
        );
        Ok(Self {
            active,
            clock: 0.0,
            steps: 0,
            last_overflow_time: None,
            all_overflow_time: None,
            initial_flow_rate,
            discarded_flow: 0.0,
        })
    }

    /// Build an engine where every tank starts with the same flow rate.
    pub fn uniform(flow_rate: f64, capacities: &[f64]) -> Result<Self, SimError> {
        Self::new(
            capacities
                .iter()
                .map(|&capacity| TankSpec::new(capacity, flow_rate)),
        )
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Current simulation time.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Number of discrete steps processed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of tanks still filling.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Tanks still filling, in input order.
    pub fn active_tanks(&self) -> impl Iterator<Item = &Tank> {
        self.active.iter().map(|(_, tank)| tank)
    }

    /// Sum of flow rates over tanks still filling.
    pub fn active_flow_rate(&self) -> f64 {
        self.active_tanks().map(Tank::flow_rate).sum()
    }

    /// Sum of flow rates at construction.
    pub fn initial_flow_rate(&self) -> f64 {
        self.initial_flow_rate
    }

    /// Flow released by full tanks with no still-filling tank after them.
    pub fn discarded_flow(&self) -> f64 {
        self.discarded_flow
    }

    pub fn is_finished(&self) -> bool {
        self.active.is_empty()
    }

    pub fn last_overflow_time(&self) -> Option<f64> {
        self.last_overflow_time
    }

    pub fn all_overflow_time(&self) -> Option<f64> {
        self.all_overflow_time
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Process the next discrete event.
    ///
    /// Moves the clock to the earliest fill time, drains that time into
    /// every active tank, and walks the tanks in order. Flow from tanks that
    /// became full accumulates and is handed, in full, to the next tank in
    /// the walk that is still filling. Returns `Ok(None)` once every tank
    /// is full.
    #[instrument(skip(self), fields(step = self.steps + 1))]
    pub fn step(&mut self) -> Result<Option<StepOutcome>, SimError> {
        if self.active.is_empty() {
            self.all_overflow_time.get_or_insert(self.clock);
            return Ok(None);
        }

        let elapsed = self
            .active_tanks()
            .map(Tank::fill_time)
            .fold(f64::INFINITY, f64::min);
        self.clock += elapsed;
        self.steps += 1;
        let clock = self.clock;

        let mut overflow_rate = 0.0;
        let mut filled = Vec::new();
        let mut events = Vec::new();

        let mut cursor = self.active.cursor_front_mut();
        while let Some(tank) = cursor.current_mut() {
            let ordinal = tank.ordinal();
            if tank.advance(elapsed) {
                let released_flow = tank.flow_rate();
                overflow_rate += released_flow;
                let last_in_order = !cursor.has_next();
                if last_in_order && self.last_overflow_time.is_none() {
                    self.last_overflow_time = Some(clock);
                    tracing::debug!(ordinal, clock, "last overflow reached");
                }
                cursor.remove_current();
                filled.push(ordinal);
                events.push(TankEvent::Filled {
                    ordinal,
                    clock,
                    released_flow,
                    last_in_order,
                });
            } else {
                if overflow_rate > 0.0 {
                    tank.increase_flow_rate(overflow_rate)
                        .map_err(|source| SimError::InvalidTank { ordinal, source })?;
                    let new_flow_rate = tank.flow_rate();
                    tracing::trace!(
                        to = ordinal,
                        delta = overflow_rate,
                        new_flow_rate,
                        "flow redistributed"
                    );
                    events.push(TankEvent::FlowRedistributed {
                        to_ordinal: ordinal,
                        clock,
                        delta: overflow_rate,
                        new_flow_rate,
                    });
                    overflow_rate = 0.0;
                }
                cursor.move_next();
            }
        }

        if overflow_rate > 0.0 {
            self.discarded_flow += overflow_rate;
            tracing::trace!(flow = overflow_rate, "flow discarded past last tank");
            events.push(TankEvent::FlowDiscarded {
                clock,
                flow: overflow_rate,
            });
        }

        if self.active.is_empty() {
            self.all_overflow_time = Some(clock);
        }

        tracing::debug!(
            elapsed,
            clock,
            filled = filled.len(),
            remaining = self.active.len(),
            "step processed"
        );

        Ok(Some(StepOutcome {
            elapsed,
            clock,
            filled,
            events,
        }))
    }

    /// Step until every tank is full and return the report.
    #[instrument(skip(self), fields(tanks = self.active.len()))]
    pub fn run(&mut self) -> Result<RunReport, SimError> {
        while self.step()?.is_some() {}
        let report = self.report()?;
        tracing::info!(
            last_overflow_time = report.last_overflow_time,
            all_overflow_time = report.all_overflow_time,
            steps = report.steps,
            "simulation finished"
        );
        Ok(report)
    }

    /// Report for a finished run.
    pub fn report(&self) -> Result<RunReport, SimError> {
        let all_overflow_time = self.all_overflow_time.ok_or(SimError::NotFinished {
            active: self.active.len(),
        })?;
        let last_overflow_time = self
            .last_overflow_time
            .ok_or(SimError::LastOverflowNotReached)?;
        Ok(RunReport {
            last_overflow_time,
            all_overflow_time,
            steps: self.steps,
        })
    }
}

/// Run a complete simulation over tanks in input order.
pub fn simulate<I>(specs: I) -> Result<RunReport, SimError>
where
    I: IntoIterator<Item = TankSpec>,
{
    Engine::new(specs)?.run()
}

// ===========================================================================
// Tests
// ===========================================================================
