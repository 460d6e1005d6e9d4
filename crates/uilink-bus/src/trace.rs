//! Text traces of bus activity.
//!
//! One bus state per line:
//!
//! ```text
//! # hold   ch0     ch1     ch2     ch3
//! 5ms      0x0041  0x0005  0x0000  0x0000
//! 40       0x8041  0x8105  0x0000  0x0000
//! ```
//!
//! The hold is either a tick count or a duration (`us`, `ms`, `s`) that is
//! converted to ticks using the sampling period. Words accept `0x` hex,
//! `0b` binary (with `_` separators) or decimal.

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::channel::CHANNEL_COUNT;
use crate::error::{BusError, Result};
use crate::scripted::BusState;

/// Parse trace text into bus states.
pub fn parse_trace(text: &str, tick_period: Duration) -> Result<Vec<BusState>> {
    let mut states = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.len() != CHANNEL_COUNT + 1 {
            return Err(BusError::Parse {
                line,
                message: format!(
                    "expected hold plus {CHANNEL_COUNT} words, found {} fields",
                    fields.len()
                ),
            });
        }

        let hold_ticks = parse_hold(fields[0], tick_period)
            .map_err(|message| BusError::Parse { line, message })?;

        let mut words = [0u16; CHANNEL_COUNT];
        for (slot, token) in words.iter_mut().zip(&fields[1..]) {
            *slot = parse_word(token).map_err(|message| BusError::Parse { line, message })?;
        }

        states.push(BusState::new(words, hold_ticks));
    }

    if states.is_empty() {
        return Err(BusError::EmptyTrace);
    }
    Ok(states)
}

/// Read and parse a trace file.
pub fn load_trace(path: impl AsRef<Path>, tick_period: Duration) -> Result<Vec<BusState>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| BusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let states = parse_trace(&text, tick_period)?;
    debug!(
        ?path,
        states = states.len(),
        ticks = states.iter().map(|s| u64::from(s.hold_ticks)).sum::<u64>(),
        "loaded bus trace"
    );
    Ok(states)
}

/// Parse a 16-bit word written as hex, binary or decimal.
pub fn parse_word(token: &str) -> std::result::Result<u16, String> {
    let cleaned = token.replace('_', "");
    let parsed = if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        u16::from_str_radix(hex, 16)
    } else if let Some(bin) = cleaned
        .strip_prefix("0b")
        .or_else(|| cleaned.strip_prefix("0B"))
    {
        u16::from_str_radix(bin, 2)
    } else {
        cleaned.parse::<u16>()
    };
    parsed.map_err(|_| format!("invalid 16-bit word: {token}"))
}

fn parse_hold(token: &str, tick_period: Duration) -> std::result::Result<u32, String> {
    let (number, unit) = if let Some(num) = token.strip_suffix("us") {
        (num, Some(Duration::from_micros(1)))
    } else if let Some(num) = token.strip_suffix("ms") {
        (num, Some(Duration::from_millis(1)))
    } else if let Some(num) = token.strip_suffix('s') {
        (num, Some(Duration::from_secs(1)))
    } else {
        (token, None)
    };

    let value: u32 = number
        .parse()
        .map_err(|_| format!("invalid hold: {token}"))?;
    if value == 0 {
        return Err("hold must be greater than zero".to_string());
    }

    let Some(unit) = unit else {
        return Ok(value);
    };
    if tick_period.is_zero() {
        return Err(format!("duration hold {token} needs a non-zero tick period"));
    }

    let hold = unit * value;
    let ticks = hold.as_nanos().div_ceil(tick_period.as_nanos());
    u32::try_from(ticks.max(1)).map_err(|_| format!("hold too long: {token}"))
}
