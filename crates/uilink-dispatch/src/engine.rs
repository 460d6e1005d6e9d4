use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};
use uilink_bus::{BusAccess, BusSampler};
use uilink_frame::{AssemblerStats, FrameAssembler};

use crate::config::EngineConfig;
use crate::error::{DispatchError, Result};
use crate::pipeline::Pipeline;
use crate::queue::{command_queue, CommandQueue, DispatchSnapshot};

const THREAD_NAME: &str = "uilink-poll";

/// Cloneable request to stop a running [`Engine`].
///
/// The polling loop checks the flag once per iteration, before sampling, so
/// a stop is observed within one polling tick and never interrupts a sample.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Counters collected when the polling loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineReport {
    /// Polling iterations completed.
    pub iterations: u64,
    pub assembler: AssemblerStats,
    pub dispatch: DispatchSnapshot,
}

/// Background polling loop over a bus.
///
/// Dropping the engine stops and joins the thread.
pub struct Engine {
    stop: StopHandle,
    handle: Option<JoinHandle<EngineReport>>,
}

impl Engine {
    /// Spawn the polling thread and return the consumer end of its command queue.
    pub fn start<B>(bus: B, config: EngineConfig) -> Result<(Self, CommandQueue)>
    where
        B: BusAccess + Send + 'static,
    {
        let (dispatcher, queue) = command_queue(config.queue_capacity)?;
        let sampler = BusSampler::new(bus).with_settle_delay(config.settle_delay);
        let assembler = FrameAssembler::with_config(config.assembler);
        let pipeline = Pipeline::new(sampler, assembler, dispatcher);

        let stop = StopHandle::new();
        let loop_stop = stop.clone();
        let poll_interval = config.poll_interval;

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || poll_loop(pipeline, &loop_stop, poll_interval))
            .map_err(DispatchError::Spawn)?;

        info!(
            settle_delay = ?config.settle_delay,
            poll_interval = ?config.poll_interval,
            queue_capacity = config.queue_capacity,
            stale_timeout = ?config.assembler.stale_timeout,
            "engine started"
        );

        Ok((
            Self {
                stop,
                handle: Some(handle),
            },
            queue,
        ))
    }

    /// A handle that can stop the loop from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// True while the polling thread has not exited.
    ///
    /// The loop also exits on its own when the bus reports it is finished.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the loop, wait for it and return its final counters.
    pub fn stop(mut self) -> Result<EngineReport> {
        let report = self.shutdown().ok_or(DispatchError::Panicked)??;
        info!(
            iterations = report.iterations,
            frames = report.assembler.frames,
            duplicates = report.assembler.duplicates,
            stale_discards = report.assembler.stale_discards,
            enqueued = report.dispatch.enqueued,
            dropped = report.dispatch.dropped,
            "engine stopped"
        );
        Ok(report)
    }

    fn shutdown(&mut self) -> Option<Result<EngineReport>> {
        let handle = self.handle.take()?;
        self.stop.stop();
        Some(handle.join().map_err(|_| DispatchError::Panicked))
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(Err(err)) = self.shutdown() {
            debug!(error = %err, "engine dropped");
        }
    }
}

fn poll_loop<B: BusAccess>(
    mut pipeline: Pipeline<B>,
    stop: &StopHandle,
    poll_interval: Duration,
) -> EngineReport {
    let mut iterations = 0u64;

    while !stop.is_stopped() {
        if pipeline.bus().is_finished() {
            debug!(iterations, "bus finished, leaving polling loop");
            break;
        }

        pipeline.poll_once();
        iterations += 1;

        if !poll_interval.is_zero() {
            thread::sleep(poll_interval);
        }
    }

    EngineReport {
        iterations,
        assembler: pipeline.assembler().stats(),
        dispatch: pipeline.dispatcher().stats(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use uilink_bus::{BusState, Channel, LatchedBus, ScriptedBus};
    use uilink_frame::{DecodedCommand, PlaySound, PrintChar};

    use super::*;

    fn fast_config() -> EngineConfig {
        EngineConfig {
            settle_delay: Duration::ZERO,
            poll_interval: Duration::from_micros(10),
            ..EngineConfig::default()
        }
    }

    fn wait_for(queue: &mut CommandQueue, timeout: Duration) -> Option<DecodedCommand> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(cmd) = queue.try_dequeue() {
                return Some(cmd);
            }
            thread::sleep(Duration::from_millis(1));
        }
        None
    }

    #[test]
    fn zero_capacity_fails_to_start() {
        let (bus, _latch) = LatchedBus::new();
        let config = EngineConfig {
            queue_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::start(bus, config),
            Err(DispatchError::InvalidCapacity)
        ));
    }

    #[test]
    fn latched_bus_commands_reach_consumer() {
        let (bus, latch) = LatchedBus::new();
        latch.set_all([0x0041, 0x0005, 0, 0]);
        let (engine, mut queue) = Engine::start(bus, fast_config()).unwrap();
        assert!(engine.is_running());

        assert_eq!(
            wait_for(&mut queue, Duration::from_secs(5)),
            Some(DecodedCommand::PrintChar(PrintChar {
                ascii: 65,
                row: 0,
                col: 5,
            }))
        );

        // Holding the same words must not produce another command.
        thread::sleep(Duration::from_millis(20));
        assert!(queue.try_dequeue().is_none());

        // PlaySound, volume 3, pairing bit flipped.
        latch.set(Channel::new(0).unwrap(), 0x8B00);
        assert_eq!(
            wait_for(&mut queue, Duration::from_secs(5)),
            Some(DecodedCommand::PlaySound(PlaySound {
                sound_id: 0,
                volume: 3,
            }))
        );

        let report = engine.stop().unwrap();
        assert!(report.iterations > 0);
        assert_eq!(report.assembler.frames, 2);
        assert_eq!(report.dispatch.enqueued, 2);
    }

    #[test]
    fn stop_handle_stops_from_another_thread() {
        let (bus, _latch) = LatchedBus::new();
        let (engine, _queue) = Engine::start(bus, fast_config()).unwrap();

        let handle = engine.stop_handle();
        let stopper = thread::spawn(move || handle.stop());
        stopper.join().unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while engine.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(!engine.is_running());
        assert!(engine.stop_handle().is_stopped());
        engine.stop().unwrap();
    }

    #[test]
    fn finite_script_ends_the_loop() {
        let states = vec![BusState::new([0x1805, 0, 0, 0], 16)];
        let bus = ScriptedBus::new(states).unwrap();
        let (engine, mut queue) = Engine::start(bus, fast_config()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while engine.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }

        let report = engine.stop().unwrap();
        assert_eq!(report.iterations, 16);
        assert_eq!(queue.try_dequeue(), Some(DecodedCommand::Boot));
        assert!(queue.is_abandoned());
    }

    #[test]
    fn full_queue_drops_without_stalling() {
        let ch0 = Channel::new(0).unwrap();
        let (bus, latch) = LatchedBus::new();
        latch.set(ch0, 0x1000);
        let config = EngineConfig {
            queue_capacity: 1,
            ..fast_config()
        };
        let (engine, mut queue) = Engine::start(bus, config).unwrap();

        // The first ClearScreen fills the queue; the rest alternate pairing bits.
        for i in 0..6u16 {
            let word = if i % 2 == 0 { 0x1000 } else { 0x9000 };
            latch.set(ch0, word);
            thread::sleep(Duration::from_millis(5));
        }

        let report = engine.stop().unwrap();
        assert_eq!(queue.len(), 1);
        assert!(report.dispatch.dropped > 0);
        assert_eq!(
            report.dispatch.enqueued + report.dispatch.dropped,
            report.assembler.frames
        );
        assert_eq!(queue.try_dequeue(), Some(DecodedCommand::ClearScreen));
    }

    #[test]
    fn dropping_engine_joins_thread() {
        let (bus, _latch) = LatchedBus::new();
        let (engine, queue) = Engine::start(bus, fast_config()).unwrap();
        let handle = engine.stop_handle();
        drop(engine);
        assert!(handle.is_stopped());
        assert!(queue.is_abandoned());
    }
}
