//! Simulated host writing "HI" and a sprite move onto a latched bus while the
//! polling engine decodes it.
//!
//! Run with:
//!   cargo run -p uilink --example latched-host

use std::thread;
use std::time::Duration;

use uilink::bus::{Channel, LatchedBus};
use uilink::dispatch::{Engine, EngineConfig, Scene};

// Long enough for every lane to be sampled several times.
const HOLD: Duration = Duration::from_millis(5);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (bus, latch) = LatchedBus::new();
    // Start from a partial sprite command so the idle bus decodes nothing.
    latch.set_all([0x8000 | 0x2000, 0x0000, 0x0000, 0x0000]);

    let (engine, mut queue) = Engine::start(bus, EngineConfig::default())?;

    let host = thread::spawn(move || {
        let commands: [[u16; 4]; 3] = [
            [0x0048, 0x0000, 0x0000, 0x0000],
            [0x8049, 0x8001, 0x0000, 0x0000],
            [0x2090, 0x3264, 0x2190, 0x1E14],
        ];
        for words in commands {
            // Later lanes first, channel 0 last, so nothing completes early.
            for idx in (0..4u8).rev() {
                if let Some(channel) = Channel::new(idx) {
                    latch.set(channel, words[usize::from(idx)]);
                }
            }
            thread::sleep(HOLD);
        }
    });

    let mut scene = Scene::new();
    let mut seen = 0;
    while seen < 3 {
        for command in queue.drain() {
            eprintln!("decoded {command:?}");
            scene.apply(&command);
            seen += 1;
        }
        thread::sleep(Duration::from_millis(1));
    }

    host.join().map_err(|_| "host thread panicked")?;
    let report = engine.stop()?;

    println!("{}", scene.text_row(0));
    for (id, sprite) in scene.sprites() {
        println!("sprite {id} variant {} at ({}, {})", sprite.variant, sprite.x, sprite.y);
    }
    println!(
        "frames={} duplicates={} stale={}",
        report.assembler.frames, report.assembler.duplicates, report.assembler.stale_discards
    );
    Ok(())
}
