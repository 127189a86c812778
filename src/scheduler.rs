// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Solow Growth Viewer - Native Frame Loop

//! Native counterpart of the browser animation loop.
//!
//! The simulation moves into a dedicated thread that runs one frame per
//! `frame_interval_ms` and sleeps until the next deadline. Parameter changes
//! arrive as messages on a channel and are applied between frames, so the
//! integrator always reads a whole snapshot. Published frames go to a
//! [`SeriesSink`].

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::simulation::GrowthSimulation;
use crate::types::{FrameResult, Params};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    #[error("failed to spawn frame loop thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("frame loop is no longer running")]
    Stopped,

    #[error("frame loop thread panicked")]
    Panicked,
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Source of frame timestamps, in milliseconds.
pub trait FrameClock: Send + 'static {
    fn now_ms(&self) -> f64;
}

/// Milliseconds since the clock was created, from [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Receives every frame that republished the series.
pub trait SeriesSink: Send + 'static {
    fn publish(&mut self, frame: &FrameResult);
}

impl<F> SeriesSink for F
where
    F: FnMut(&FrameResult) + Send + 'static,
{
    fn publish(&mut self, frame: &FrameResult) {
        self(frame)
    }
}

/// Input-side messages for a running loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamUpdate {
    Replace(Params),
    SavingsRate(f64),
    Elasticity(f64),
    DepreciationRate(f64),
    Reset,
}

enum Command {
    Update(ParamUpdate),
    Stop,
}

fn apply(sim: &mut GrowthSimulation, update: ParamUpdate) {
    let params = sim.params();
    match update {
        ParamUpdate::Replace(p) => sim.set_params(p),
        ParamUpdate::SavingsRate(s) => sim.set_params(params.with_savings_rate(s)),
        ParamUpdate::Elasticity(a) => sim.set_params(params.with_elasticity(a)),
        ParamUpdate::DepreciationRate(d) => sim.set_params(params.with_depreciation_rate(d)),
        ParamUpdate::Reset => sim.reset_core(),
    }
}

// ---------------------------------------------------------------------------
// FrameLoop
// ---------------------------------------------------------------------------

pub struct FrameLoop {
    commands: Sender<Command>,
    worker: Option<JoinHandle<GrowthSimulation>>,
}

impl FrameLoop {
    /// Start a loop timed by a [`MonotonicClock`].
    pub fn start<S: SeriesSink>(sim: GrowthSimulation, sink: S) -> Result<Self, LoopError> {
        Self::start_with_clock(sim, MonotonicClock::new(), sink)
    }

    pub fn start_with_clock<C, S>(sim: GrowthSimulation, clock: C, sink: S) -> Result<Self, LoopError>
    where
        C: FrameClock,
        S: SeriesSink,
    {
        let interval = Duration::from_millis(sim.config().frame_interval_ms);
        let (commands, inbox) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("solow-frame-loop".to_string())
            .spawn(move || run(sim, clock, sink, inbox, interval))?;
        log::info!("frame loop started ({} ms interval)", interval.as_millis());
        Ok(Self { commands, worker: Some(worker) })
    }

    /// Queue a parameter change; it applies before the next frame.
    pub fn update(&self, update: ParamUpdate) -> Result<(), LoopError> {
        self.commands
            .send(Command::Update(update))
            .map_err(|_| LoopError::Stopped)
    }

    pub fn set_params(&self, params: Params) -> Result<(), LoopError> {
        self.update(ParamUpdate::Replace(params))
    }

    /// Stop the loop and take the simulation back.
    pub fn stop(mut self) -> Result<GrowthSimulation, LoopError> {
        self.shutdown().ok_or(LoopError::Stopped)?
    }

    fn shutdown(&mut self) -> Option<Result<GrowthSimulation, LoopError>> {
        let worker = self.worker.take()?;
        // The worker may already have exited; joining is still correct.
        let _ = self.commands.send(Command::Stop);
        let joined = worker.join().map_err(|_| LoopError::Panicked);
        log::info!("frame loop stopped");
        Some(joined)
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(Err(e)) = self.shutdown() {
            log::error!("frame loop ended badly: {}", e);
        }
    }
}

fn run<C, S>(
    mut sim: GrowthSimulation,
    clock: C,
    mut sink: S,
    inbox: Receiver<Command>,
    interval: Duration,
) -> GrowthSimulation
where
    C: FrameClock,
    S: SeriesSink,
{
    let mut next_frame = Instant::now();
    loop {
        // Drain whatever arrived while the previous frame ran.
        loop {
            match inbox.try_recv() {
                Ok(Command::Update(update)) => apply(&mut sim, update),
                Ok(Command::Stop) | Err(TryRecvError::Disconnected) => return sim,
                Err(TryRecvError::Empty) => break,
            }
        }

        let frame = sim.frame_core(clock.now_ms());
        if frame.series.is_some() {
            sink.publish(&frame);
        }

        next_frame += interval;
        let now = Instant::now();
        if now > next_frame + interval {
            // Fell behind; the integrator catches up from elapsed time, the
            // schedule just restarts from here.
            next_frame = now;
        }

        loop {
            let now = Instant::now();
            if now >= next_frame {
                break;
            }
            match inbox.recv_timeout(next_frame - now) {
                Ok(Command::Update(update)) => apply(&mut sim, update),
                Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => return sim,
                Err(RecvTimeoutError::Timeout) => break,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
