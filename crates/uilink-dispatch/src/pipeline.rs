use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;
use uilink_bus::{BusAccess, BusSampler};
use uilink_frame::{decode, AssemblerConfig, AssemblerStats, DecodedCommand, FrameAssembler};

use crate::config::DEFAULT_QUEUE_CAPACITY;
use crate::error::Result;
use crate::queue::{command_queue, DispatchSnapshot, Dispatcher};

/// One sampling step chain: bus sampler, frame assembler, decoder, dispatcher.
///
/// The pipeline owns all of its state exclusively; the only thing it shares
/// with the outside is the producer end of the command queue.
pub struct Pipeline<B> {
    sampler: BusSampler<B>,
    assembler: FrameAssembler,
    dispatcher: Dispatcher,
}

impl<B: BusAccess> Pipeline<B> {
    pub fn new(sampler: BusSampler<B>, assembler: FrameAssembler, dispatcher: Dispatcher) -> Self {
        Self {
            sampler,
            assembler,
            dispatcher,
        }
    }

    /// Run one step using the wall clock.
    pub fn poll_once(&mut self) -> Option<DecodedCommand> {
        self.poll_once_at(Instant::now())
    }

    /// Sample the next channel, feed the assembler and dispatch a completed command.
    ///
    /// Returns the command handed to the dispatcher, whether or not the queue
    /// had room for it.
    pub fn poll_once_at(&mut self, now: Instant) -> Option<DecodedCommand> {
        let sample = self.sampler.sample_next();
        let frame = self
            .assembler
            .observe_at(sample.channel, sample.value, now)?;

        let command = decode(&frame);
        let accepted = self.dispatcher.enqueue(command);
        debug!(kind = %command.kind(), channel = %sample.channel, accepted, "dispatch");
        Some(command)
    }

    /// The bus being sampled.
    pub fn bus(&self) -> &B {
        self.sampler.get_ref()
    }

    pub fn sampler(&self) -> &BusSampler<B> {
        &self.sampler
    }

    pub fn assembler(&self) -> &FrameAssembler {
        &self.assembler
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn into_parts(self) -> (BusSampler<B>, FrameAssembler, Dispatcher) {
        (self.sampler, self.assembler, self.dispatcher)
    }
}

/// A command produced during [`replay`], stamped with the tick that completed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplayedCommand {
    /// Zero-based sample index.
    pub tick: u64,
    /// Virtual time since the start of the replay, in microseconds.
    pub elapsed_us: u64,
    pub command: DecodedCommand,
}

/// Outcome of a deterministic replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayReport {
    pub commands: Vec<ReplayedCommand>,
    /// Samples taken.
    pub ticks: u64,
    pub assembler: AssemblerStats,
    pub dispatch: DispatchSnapshot,
}

/// Drive a bus through the full pipeline on a virtual clock until it reports
/// [`is_finished`](BusAccess::is_finished).
///
/// The clock advances by `tick` per sample and no real sleeping happens, so
/// the result depends only on the bus contents and the settings. A bus that
/// never finishes makes this loop forever.
pub fn replay<B: BusAccess>(bus: B, tick: Duration, assembler: AssemblerConfig) -> Result<ReplayReport> {
    let (dispatcher, mut queue) = command_queue(DEFAULT_QUEUE_CAPACITY)?;
    let sampler = BusSampler::new(bus).with_settle_delay(Duration::ZERO);
    let mut pipeline = Pipeline::new(sampler, FrameAssembler::with_config(assembler), dispatcher);

    let start = Instant::now();
    let mut elapsed = Duration::ZERO;
    let mut ticks = 0u64;
    let mut commands = Vec::new();

    while !pipeline.bus().is_finished() {
        if pipeline.poll_once_at(start + elapsed).is_some() {
            commands.extend(queue.drain().map(|command| ReplayedCommand {
                tick: ticks,
                elapsed_us: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
                command,
            }));
        }
        ticks += 1;
        elapsed += tick;
    }

    debug!(ticks, commands = commands.len(), "replay finished");

    Ok(ReplayReport {
        commands,
        ticks,
        assembler: pipeline.assembler().stats(),
        dispatch: queue.stats(),
    })
}
