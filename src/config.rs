use std::fs;
use std::path::Path;

use ratatui::style::Color;
use ratatui::symbols::border;
use serde::Deserialize;

use crate::error::ConfigError;

/// Default edge length of the square play grid.
pub const DEFAULT_GRID_DIMENSION: u16 = 20;

/// Step interval of a fresh game in milliseconds.
pub const DEFAULT_INITIAL_INTERVAL_MS: u64 = 150;

/// Interval reduction applied for every food eaten.
pub const DEFAULT_INTERVAL_DECREMENT_MS: u64 = 5;

/// Floor for the step interval.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 50;

/// Score granted per food eaten.
pub const DEFAULT_POINTS_PER_FOOD: u32 = 10;

/// Largest accepted grid edge; food spawning scans every cell.
pub const MAX_GRID_DIMENSION: u16 = 255;

/// Head cell of a fresh snake.
pub const DEFAULT_START: (i32, i32) = (5, 5);

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Square grid with `dimension` cells per side.
    #[must_use]
    pub fn square(dimension: u16) -> Self {
        Self {
            width: dimension,
            height: dimension,
        }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::square(DEFAULT_GRID_DIMENSION)
    }
}

/// Tunable rules of the simulation.
///
/// Every field has a default, so a JSON file only needs to name the values it
/// overrides:
///
/// ```json
/// { "grid_size": { "width": 12, "height": 12 }, "points_per_food": 5 }
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub grid_size: GridSize,
    pub initial_interval_ms: u64,
    pub interval_decrement_ms: u64,
    pub min_interval_ms: u64,
    pub points_per_food: u32,
    pub start: (i32, i32),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::default(),
            initial_interval_ms: DEFAULT_INITIAL_INTERVAL_MS,
            interval_decrement_ms: DEFAULT_INTERVAL_DECREMENT_MS,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            points_per_food: DEFAULT_POINTS_PER_FOOD,
            start: DEFAULT_START,
        }
    }
}

impl SimulationConfig {
    /// Reads a JSON config file and validates the result.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects rule combinations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size.width == 0 || self.grid_size.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have at least one cell, got {}x{}",
                self.grid_size.width, self.grid_size.height
            )));
        }

        if self.grid_size.width > MAX_GRID_DIMENSION
            || self.grid_size.height > MAX_GRID_DIMENSION
        {
            return Err(ConfigError::Invalid(format!(
                "grid may be at most {MAX_GRID_DIMENSION}x{MAX_GRID_DIMENSION}, got {}x{}",
                self.grid_size.width, self.grid_size.height
            )));
        }

        let (x, y) = self.start;
        if x < 0
            || y < 0
            || x >= i32::from(self.grid_size.width)
            || y >= i32::from(self.grid_size.height)
        {
            return Err(ConfigError::Invalid(format!(
                "start cell ({x}, {y}) lies outside the {}x{} grid",
                self.grid_size.width, self.grid_size.height
            )));
        }

        if self.min_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "min_interval_ms must be positive".to_owned(),
            ));
        }

        if self.min_interval_ms > self.initial_interval_ms {
            return Err(ConfigError::Invalid(format!(
                "min_interval_ms ({}) exceeds initial_interval_ms ({})",
                self.min_interval_ms, self.initial_interval_ms
            )));
        }

        if self.points_per_food == 0 {
            return Err(ConfigError::Invalid(
                "points_per_food must be positive".to_owned(),
            ));
        }

        Ok(())
    }
}

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub snake_head: Color,
    /// Brightest body color; segments fade from here towards `snake_tail`.
    pub snake_body: Color,
    pub snake_tail: Color,
    pub food: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub border_bg: Color,
    pub hud_score: Color,
    pub hud_muted: Color,
    pub menu_title: Color,
    pub menu_alert: Color,
}

/// Cyan snake, magenta food on a deep navy field.
pub const THEME_NEON: Theme = Theme {
    name: "Neon",
    snake_head: Color::Rgb(0, 255, 255),
    snake_body: Color::Rgb(0, 204, 204),
    snake_tail: Color::Rgb(0, 128, 128),
    food: Color::Rgb(255, 0, 255),
    play_bg: Color::Rgb(10, 10, 26),
    border_fg: Color::Rgb(0, 255, 255),
    border_bg: Color::Rgb(26, 26, 58),
    hud_score: Color::Rgb(0, 255, 255),
    hud_muted: Color::DarkGray,
    menu_title: Color::Rgb(157, 0, 255),
    menu_alert: Color::Rgb(255, 0, 255),
};

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

pub const GLYPH_SNAKE_HEAD_UP: &str = "▲";
pub const GLYPH_SNAKE_HEAD_DOWN: &str = "▼";
pub const GLYPH_SNAKE_HEAD_LEFT: &str = "◀";
pub const GLYPH_SNAKE_HEAD_RIGHT: &str = "▶";
pub const GLYPH_SNAKE_BODY: &str = "█";
pub const GLYPH_SNAKE_TAIL: &str = "▓";
pub const GLYPH_FOOD: &str = "◆";
