//! Polling engine and bounded command dispatch.
//!
//! This is the layer a presentation backend talks to. A dedicated polling
//! thread runs bus sampling, frame assembly and decoding, and hands each
//! decoded command to a lock-free single-producer/single-consumer queue.
//! The consumer drains the queue at its own pace; a full queue drops the
//! newest command instead of stalling the sampler.

pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod queue;
pub mod scene;

pub use config::{EngineConfig, DEFAULT_POLL_INTERVAL, DEFAULT_QUEUE_CAPACITY};
pub use engine::{Engine, EngineReport, StopHandle};
pub use error::{DispatchError, Result};
pub use pipeline::{replay, Pipeline, ReplayReport, ReplayedCommand};
pub use queue::{command_queue, CommandQueue, DispatchSnapshot, Dispatcher};
pub use scene::{Scene, SoundRequest, SpritePlacement, SCREEN_HEIGHT, SCREEN_WIDTH, SPRITE_SLOTS};
