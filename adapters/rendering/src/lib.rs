#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rendering targets for lifestats adapters.
//!
//! [`FrameBuffer`] receives cells through the [`CellRenderer`] capability and
//! rasterizes them into one glyph per cell. Adapters print the resulting frame
//! as plain text or with 24-bit ANSI colors.

use std::{fmt::Write as _, str::FromStr};

use lifestats_core::{CellCoord, CellRenderer, CellView};
use serde::Deserialize;
use thiserror::Error;

/// Glyph ramp used for overlay intensities, from transparent to opaque.
const OVERLAY_RAMP: [char; 5] = [' ', '░', '▒', '▓', '█'];
/// Glyph used for a cell that has not been drawn yet.
const BLANK_GLYPH: char = ' ';
/// Glyph used for a cell whose outline was drawn without a fill.
const OUTLINE_GLYPH: char = '+';
/// How far the outline color is lightened before it is used as a cell background.
const OUTLINE_BACKGROUND_TINT: f32 = 0.6;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha replaced by a byte opacity.
    #[must_use]
    pub fn with_alpha(self, alpha: u8) -> Self {
        Self {
            alpha: f32::from(alpha) / 255.0,
            ..self
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Flattens the color onto a white background and returns byte RGB channels.
    #[must_use]
    pub fn composited_rgb_u8(self) -> (u8, u8, u8) {
        let flattened = self.lighten(1.0 - self.alpha.clamp(0.0, 1.0));
        (
            channel_to_u8(flattened.red),
            channel_to_u8(flattened.green),
            channel_to_u8(flattened.blue),
        )
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Colors that can be chosen by name for cells and outlines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    /// Pure red.
    Red,
    /// Pure blue.
    Blue,
    /// Pure green.
    Green,
    /// Brown.
    Brown,
    /// Purple.
    Purple,
    /// Orange.
    Orange,
    /// Violet.
    Violet,
    /// Black.
    Black,
    /// Yellow.
    Yellow,
    /// Mid grey.
    #[serde(alias = "gray")]
    Grey,
    /// White.
    White,
}

impl NamedColor {
    /// Every selectable color.
    pub const ALL: [NamedColor; 11] = [
        NamedColor::Red,
        NamedColor::Blue,
        NamedColor::Green,
        NamedColor::Brown,
        NamedColor::Purple,
        NamedColor::Orange,
        NamedColor::Violet,
        NamedColor::Black,
        NamedColor::Yellow,
        NamedColor::Grey,
        NamedColor::White,
    ];

    /// Lowercase name accepted when parsing.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Brown => "brown",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Violet => "violet",
            Self::Black => "black",
            Self::Yellow => "yellow",
            Self::Grey => "grey",
            Self::White => "white",
        }
    }

    /// Opaque color value.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Red => Color::from_rgb_u8(255, 0, 0),
            Self::Blue => Color::from_rgb_u8(0, 0, 255),
            Self::Green => Color::from_rgb_u8(0, 255, 0),
            Self::Brown => Color::from_rgb_u8(165, 42, 42),
            Self::Purple => Color::from_rgb_u8(160, 32, 240),
            Self::Orange => Color::from_rgb_u8(255, 165, 0),
            Self::Violet => Color::from_rgb_u8(238, 130, 238),
            Self::Black => Color::from_rgb_u8(0, 0, 0),
            Self::Yellow => Color::from_rgb_u8(255, 255, 0),
            Self::Grey => Color::from_rgb_u8(190, 190, 190),
            Self::White => Color::from_rgb_u8(255, 255, 255),
        }
    }
}

impl FromStr for NamedColor {
    type Err = RenderingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized == "gray" {
            return Ok(Self::Grey);
        }
        Self::ALL
            .into_iter()
            .find(|color| color.name() == normalized)
            .ok_or_else(|| RenderingError::UnknownColor(value.to_owned()))
    }
}

/// Outline shape used when drawing a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellShape {
    /// Axis-aligned square filling the cell.
    #[default]
    Square,
    /// Circle inscribed in the cell.
    Circle,
}

impl CellShape {
    fn glyph(self, mode: FillMode) -> char {
        match (self, mode) {
            (Self::Square, FillMode::Solid) => '■',
            (Self::Square, FillMode::Hollow) => '□',
            (Self::Circle, FillMode::Solid) => '●',
            (Self::Circle, FillMode::Hollow) => '○',
        }
    }
}

impl FromStr for CellShape {
    type Err = RenderingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "circle" => Ok(Self::Circle),
            _ => Err(RenderingError::UnknownShape(value.to_owned())),
        }
    }
}

/// Whether a cell is painted solid or only stroked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FillMode {
    /// Interior painted with the fill color.
    Solid,
    /// Only the one-unit stroke is painted.
    Hollow,
}

impl FillMode {
    /// Live cells are painted solid and dead cells hollow.
    #[must_use]
    pub const fn for_cell(is_alive: bool) -> Self {
        if is_alive {
            Self::Solid
        } else {
            Self::Hollow
        }
    }
}

/// Colors used for each drawing channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Color of the grid outline.
    pub outline: Color,
    /// Fill color of live cells.
    pub alive: Color,
    /// Stroke color of dead cells.
    pub dead: Color,
    /// Base color of the statistics overlay; alpha comes from the intensity.
    pub overlay: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            outline: NamedColor::Grey.color(),
            alive: NamedColor::Black.color(),
            dead: NamedColor::Grey.color(),
            overlay: NamedColor::Red.color(),
        }
    }
}

/// Last fill painted into a frame cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fill {
    /// Color painted, including overlay opacity.
    pub color: Color,
    /// Glyph standing in for the painted shape.
    pub glyph: char,
    /// Overlay intensity when the fill came from a statistics overlay.
    pub intensity: Option<u8>,
}

/// Drawing state of a single frame cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FramePixel {
    /// Whether the outline was drawn.
    pub outlined: bool,
    /// Most recent fill, if any.
    pub fill: Option<Fill>,
}

/// Text raster that implements [`CellRenderer`].
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    rows: u32,
    columns: u32,
    shape: CellShape,
    palette: Palette,
    pixels: Vec<FramePixel>,
    fills_drawn: u64,
}

impl FrameBuffer {
    /// Creates a blank frame for a `rows` x `columns` board.
    #[must_use]
    pub fn new(rows: u32, columns: u32, shape: CellShape, palette: Palette) -> Self {
        let capacity = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(0);
        Self {
            rows,
            columns,
            shape,
            palette,
            pixels: vec![FramePixel::default(); capacity],
            fills_drawn: 0,
        }
    }

    /// Number of rows in the frame.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the frame.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Palette the frame paints with.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Total fills drawn since creation or the last [`FrameBuffer::clear`].
    #[must_use]
    pub const fn fills_drawn(&self) -> u64 {
        self.fills_drawn
    }

    /// Drawing state of the cell at `coord`.
    #[must_use]
    pub fn pixel(&self, coord: CellCoord) -> Option<&FramePixel> {
        self.index(coord).map(|index| &self.pixels[index])
    }

    /// Resets every cell to blank.
    pub fn clear(&mut self) {
        self.pixels.fill(FramePixel::default());
        self.fills_drawn = 0;
    }

    /// Renders the frame as plain text, one line per row.
    ///
    /// Cells that were outlined but never filled show as `+`.
    #[must_use]
    pub fn render_text(&self) -> String {
        self.render(false)
    }

    /// Renders the frame with 24-bit ANSI colors.
    ///
    /// Fills set the foreground; outlined cells get a background tinted from
    /// [`Palette::outline`].
    #[must_use]
    pub fn render_ansi(&self) -> String {
        self.render(true)
    }

    fn render(&self, ansi: bool) -> String {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        let (outline_red, outline_green, outline_blue) = self
            .palette
            .outline
            .lighten(OUTLINE_BACKGROUND_TINT)
            .composited_rgb_u8();
        let mut background = false;
        let mut out = String::with_capacity(self.pixels.len() * if ansi { 40 } else { 3 });
        for (index, pixel) in self.pixels.iter().enumerate() {
            if index > 0 && index % width == 0 {
                if ansi {
                    out.push_str("\x1b[0m");
                    background = false;
                }
                out.push('\n');
            }

            if ansi && pixel.outlined != background {
                if pixel.outlined {
                    let _ = write!(
                        out,
                        "\x1b[48;2;{outline_red};{outline_green};{outline_blue}m"
                    );
                } else {
                    out.push_str("\x1b[49m");
                }
                background = pixel.outlined;
            }

            match pixel.fill {
                Some(fill) if ansi => {
                    let (red, green, blue) = fill.color.composited_rgb_u8();
                    let _ = write!(out, "\x1b[38;2;{red};{green};{blue}m{}", fill.glyph);
                }
                Some(fill) => out.push(fill.glyph),
                None if pixel.outlined => out.push(OUTLINE_GLYPH),
                None => out.push(BLANK_GLYPH),
            }
        }
        if ansi && !self.pixels.is_empty() {
            out.push_str("\x1b[0m");
        }
        out
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if !coord.is_within(self.rows, self.columns) {
            return None;
        }
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

impl CellRenderer for FrameBuffer {
    fn draw_outline(&mut self, cell: &CellView) {
        if let Some(index) = self.index(cell.coord) {
            self.pixels[index].outlined = true;
        }
    }

    fn draw_fill(&mut self, cell: &CellView, intensity: Option<u8>) {
        let Some(index) = self.index(cell.coord) else {
            return;
        };

        let fill = match intensity {
            Some(intensity) => Fill {
                color: self.palette.overlay.with_alpha(intensity),
                glyph: overlay_glyph(intensity),
                intensity: Some(intensity),
            },
            None => {
                let mode = FillMode::for_cell(cell.is_alive);
                let color = if cell.is_alive {
                    self.palette.alive
                } else {
                    self.palette.dead
                };
                Fill {
                    color,
                    glyph: self.shape.glyph(mode),
                    intensity: None,
                }
            }
        };

        self.pixels[index].fill = Some(fill);
        self.fills_drawn += 1;
    }
}

fn overlay_glyph(intensity: u8) -> char {
    if intensity == 0 {
        return OVERLAY_RAMP[0];
    }
    let steps = OVERLAY_RAMP.len() - 1;
    let bucket = 1 + (usize::from(intensity) * (steps - 1)) / usize::from(u8::MAX);
    OVERLAY_RAMP[bucket.min(steps)]
}

/// Errors that can occur when parsing rendering options.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// The color name is not one of [`NamedColor::ALL`].
    #[error("unknown color `{0}`")]
    UnknownColor(String),
    /// The shape name is neither `square` nor `circle`.
    #[error("unknown cell shape `{0}` (expected `square` or `circle`)")]
    UnknownShape(String),
}
