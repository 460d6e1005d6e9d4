//! Headless model of what a presentation backend shows.
//!
//! Applying decoded commands to a [`Scene`] yields the state a renderer would
//! draw, without any rendering. Useful for consumers that only need to know
//! what is on screen, and for checking command streams.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::trace;
use uilink_frame::{DebugData, DecodedCommand, PlaySound, PrintChar, SpriteMove};

/// Logical surface width.
pub const SCREEN_WIDTH: u16 = 210;
/// Logical surface height.
pub const SCREEN_HEIGHT: u16 = 128;
/// Sprite ids are 4 bits wide.
pub const SPRITE_SLOTS: usize = 16;

/// Text grid for a 7x14 character cell on the logical surface.
pub const DEFAULT_TEXT_COLUMNS: usize = SCREEN_WIDTH as usize / 7;
pub const DEFAULT_TEXT_ROWS: usize = SCREEN_HEIGHT as usize / 14;

const DEBUG_LOG_LIMIT: usize = 64;

/// Where a sprite is drawn and with which image variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpritePlacement {
    pub variant: u8,
    pub x: u8,
    pub y: u8,
}

impl SpritePlacement {
    /// True when the anchor point lies on the logical surface.
    pub fn is_on_screen(&self) -> bool {
        u16::from(self.x) < SCREEN_WIDTH && u16::from(self.y) < SCREEN_HEIGHT
    }
}

/// The most recent sound a backend was asked to play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoundRequest {
    pub sound_id: u8,
    pub gain: f32,
}

impl From<PlaySound> for SoundRequest {
    fn from(sound: PlaySound) -> Self {
        Self {
            sound_id: sound.sound_id,
            gain: sound.gain(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    columns: usize,
    rows: usize,
    text: Vec<Option<char>>,
    sprites: [Option<SpritePlacement>; SPRITE_SLOTS],
    last_sound: Option<SoundRequest>,
    sounds_played: u64,
    boots: u64,
    debug_log: VecDeque<DebugData>,
    applied: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::with_text_grid(DEFAULT_TEXT_COLUMNS, DEFAULT_TEXT_ROWS)
    }

    /// Scene with an explicit text grid. Zero dimensions are raised to one.
    pub fn with_text_grid(columns: usize, rows: usize) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            columns,
            rows,
            text: vec![None; columns * rows],
            sprites: [None; SPRITE_SLOTS],
            last_sound: None,
            sounds_played: 0,
            boots: 0,
            debug_log: VecDeque::new(),
            applied: 0,
        }
    }

    /// Update the scene for one command.
    pub fn apply(&mut self, command: &DecodedCommand) {
        self.applied += 1;
        match command {
            DecodedCommand::PrintChar(print) => self.print(print),
            DecodedCommand::PlaySound(sound) => {
                self.last_sound = Some(SoundRequest::from(*sound));
                self.sounds_played += 1;
            }
            DecodedCommand::ClearScreen => {
                self.clear_text();
                self.sprites = [None; SPRITE_SLOTS];
            }
            DecodedCommand::Boot => {
                // Boot screen replaces the surface contents; sprites stay.
                self.clear_text();
                self.boots += 1;
            }
            DecodedCommand::MoveSprite(pair) => {
                self.place(&pair.first);
                self.place(&pair.second);
            }
            DecodedCommand::Debug(data) => {
                if self.debug_log.len() == DEBUG_LOG_LIMIT {
                    self.debug_log.pop_front();
                }
                self.debug_log.push_back(*data);
            }
        }
    }

    fn print(&mut self, print: &PrintChar) {
        if !print.is_printable() {
            trace!(ascii = print.ascii, "skipping non-printable character");
            return;
        }
        let col = usize::from(print.col).min(self.columns - 1);
        let row = usize::from(print.row).min(self.rows - 1);
        self.text[row * self.columns + col] = Some(print.character());
    }

    fn place(&mut self, sprite: &SpriteMove) {
        if let Some(slot) = self.sprites.get_mut(usize::from(sprite.id)) {
            *slot = Some(SpritePlacement {
                variant: sprite.variant,
                x: sprite.x,
                y: sprite.y,
            });
        }
    }

    fn clear_text(&mut self) {
        self.text.fill(None);
    }

    /// Text grid size as `(columns, rows)`.
    pub fn text_grid(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        self.text[row * self.columns + col]
    }

    /// One text row with empty cells as spaces, trailing spaces trimmed.
    pub fn text_row(&self, row: usize) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = row * self.columns;
        let line: String = self.text[start..start + self.columns]
            .iter()
            .map(|cell| cell.unwrap_or(' '))
            .collect();
        line.trim_end().to_string()
    }

    /// All text rows, top to bottom.
    pub fn text_lines(&self) -> Vec<String> {
        (0..self.rows).map(|row| self.text_row(row)).collect()
    }

    pub fn sprite(&self, id: u8) -> Option<&SpritePlacement> {
        self.sprites.get(usize::from(id))?.as_ref()
    }

    /// Placed sprites as `(id, placement)`, lowest id first.
    pub fn sprites(&self) -> impl Iterator<Item = (u8, &SpritePlacement)> + '_ {
        (0u8..)
            .zip(self.sprites.iter())
            .filter_map(|(id, slot)| slot.as_ref().map(|placement| (id, placement)))
    }

    pub fn last_sound(&self) -> Option<&SoundRequest> {
        self.last_sound.as_ref()
    }

    pub fn sounds_played(&self) -> u64 {
        self.sounds_played
    }

    pub fn is_booted(&self) -> bool {
        self.boots > 0
    }

    pub fn boots(&self) -> u64 {
        self.boots
    }

    /// Recent debug payloads, oldest first.
    pub fn debug_log(&self) -> impl Iterator<Item = &DebugData> + '_ {
        self.debug_log.iter()
    }

    /// Commands applied so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }
}
