//! `Display` implementation on top of any embedded-graphics target.
//!
//! Regions map to character-cell rectangles taken from the board profile.
//! The canvas keeps its own copy of the visible text-area lines so that
//! scrolling is a matter of shifting the copy and repainting.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{BinaryColor, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use heapless::{String, Vec};

use crate::board::BoardProfile;
use crate::display::{Color, Display, Region};
use crate::error::Error;

/// Longest line any profile can show.
pub const MAX_COLUMNS: usize = 32;

/// Most text-area lines any profile can show.
pub const MAX_BODY_LINES: usize = 16;

/// Bytes needed for `MAX_COLUMNS` characters of UTF-8.
const LINE_BYTES: usize = MAX_COLUMNS * 4;

/// Pixel colors that logical colors can be mapped onto.
pub trait LogicalColor: PixelColor {
    fn from_logical(color: Color) -> Self;
}

impl LogicalColor for BinaryColor {
    fn from_logical(color: Color) -> Self {
        match color {
            Color::Black => BinaryColor::Off,
            _ => BinaryColor::On,
        }
    }
}

impl LogicalColor for Rgb565 {
    fn from_logical(color: Color) -> Self {
        match color {
            Color::Black => Rgb565::BLACK,
            Color::White => Rgb565::WHITE,
            Color::Red => Rgb565::RED,
            Color::Cyan => Rgb565::CYAN,
            Color::Yellow => Rgb565::YELLOW,
        }
    }
}

/// Draw target that may buffer frames (e.g. an SSD1306 in buffered mode).
pub trait Panel: DrawTarget {
    /// Push the frame buffer to the glass.
    fn present(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct BodyLine {
    text: String<LINE_BYTES>,
    color: Color,
}

/// Text screen laid out per a [`BoardProfile`].
pub struct TextCanvas<D> {
    target: D,
    profile: BoardProfile,
    body: Vec<Option<BodyLine>, MAX_BODY_LINES>,
}

impl<D> TextCanvas<D>
where
    D: Panel,
    D::Color: LogicalColor,
{
    pub fn new(target: D, profile: BoardProfile) -> Self {
        let mut body = Vec::new();
        let lines = (profile.body_lines() as usize).min(MAX_BODY_LINES);
        for _ in 0..lines {
            let _ = body.push(None);
        }
        Self {
            target,
            profile,
            body,
        }
    }

    pub fn profile(&self) -> &BoardProfile {
        &self.profile
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn release(self) -> D {
        self.target
    }

    /// Text currently shown on text-area line `n`.
    pub fn body_text(&self, n: u8) -> Option<&str> {
        self.body
            .get(n as usize)
            .and_then(|line| line.as_ref())
            .map(|line| line.text.as_str())
    }

    /// Blank the whole screen.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.target
            .clear(D::Color::from_logical(Color::Black))
            .map_err(|_| Error::Display)?;
        for line in self.body.iter_mut() {
            *line = None;
        }
        Ok(())
    }

    fn cell(&self) -> Size {
        let font = self.profile.font;
        Size::new(
            font.character_size.width + font.character_spacing,
            font.character_size.height,
        )
    }

    /// Character cells covered by `region`, if the board has it.
    fn cells(&self, region: Region) -> Option<Cells> {
        let p = &self.profile;
        let columns = p.columns();
        let (row, col, height) = match region {
            Region::Title(n) => (n as u32, 0, 1),
            Region::Status => (p.status_row as u32, p.status_col as u32, 1),
            Region::Mode => (p.mode_row? as u32, 0, 1),
            Region::Body => (p.body_top as u32, 0, self.body.len() as u32),
            Region::Line(n) if (n as usize) < self.body.len() => (p.body_top as u32 + n as u32, 0, 1),
            Region::Line(_) => return None,
        };
        if row >= p.rows() || height == 0 || col >= columns {
            return None;
        }
        // A title sharing its row with the status stops where the status starts.
        let end = match region {
            Region::Title(_) if row == p.status_row as u32 && p.status_col > 0 => p.status_col as u32,
            _ => columns,
        };
        Some(Cells {
            row,
            col,
            width: end - col,
            height,
        })
    }

    fn rect(&self, cells: Cells) -> Rectangle {
        let cell = self.cell();
        let x = cells.col * cell.width;
        let width = if cells.col + cells.width == self.profile.columns() {
            // Cover the partial cell at the right edge too.
            self.profile.width.saturating_sub(x)
        } else {
            cells.width * cell.width
        };
        Rectangle::new(
            Point::new(x as i32, (cells.row * cell.height) as i32),
            Size::new(width, cells.height * cell.height),
        )
    }

    fn paint(&mut self, region: Region, color: Color) -> Result<(), Error> {
        let Some(cells) = self.cells(region) else {
            return Ok(());
        };
        let area = self.rect(cells);
        self.target
            .fill_solid(&area, D::Color::from_logical(color))
            .map_err(|_| Error::Display)
    }

    fn write(&mut self, row: u32, col: u32, text: &str, color: Color) -> Result<(), Error> {
        let cell = self.cell();
        let style = MonoTextStyle::new(self.profile.font, D::Color::from_logical(color));
        let origin = Point::new((col * cell.width) as i32, (row * cell.height) as i32);
        Text::with_baseline(text, origin, style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| Error::Display)
    }

    fn redraw_body(&mut self) -> Result<(), Error> {
        self.paint(Region::Body, Color::Black)?;
        let top = self.profile.body_top as u32;
        for i in 0..self.body.len() {
            if let Some(line) = self.body[i].clone() {
                self.write(top + i as u32, 0, &line.text, line.color)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
struct Cells {
    row: u32,
    col: u32,
    width: u32,
    height: u32,
}

/// The part of `text` that fits on one row of `columns` characters.
/// Stops at the first control character so a row never wraps.
fn fit(text: &str, columns: usize) -> String<LINE_BYTES> {
    let mut line = String::new();
    for c in text.chars().take_while(|c| !c.is_control()).take(columns) {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}

impl<D> Display for TextCanvas<D>
where
    D: Panel,
    D::Color: LogicalColor,
{
    fn draw_text(&mut self, region: Region, text: &str, color: Color) -> Result<(), Error> {
        let Some(cells) = self.cells(region) else {
            debug!("draw_text: region {} not on this board", region);
            return Ok(());
        };
        let text = fit(text, (cells.width as usize).min(MAX_COLUMNS));

        self.paint(region, Color::Black)?;
        if !text.is_empty() {
            self.write(cells.row, cells.col, &text, color)?;
        }
        if let Region::Line(n) = region {
            self.body[n as usize] = Some(BodyLine { text, color });
        }
        Ok(())
    }

    fn fill_region(&mut self, region: Region, color: Color) -> Result<(), Error> {
        match region {
            Region::Body => self.body.iter_mut().for_each(|line| *line = None),
            Region::Line(n) => {
                if let Some(line) = self.body.get_mut(n as usize) {
                    *line = None;
                }
            }
            _ => {}
        }
        self.paint(region, color)
    }

    fn scroll(&mut self, lines: u8) -> Result<(), Error> {
        let lines = (lines as usize).min(self.body.len());
        if lines == 0 {
            return Ok(());
        }
        self.body.rotate_left(lines);
        let len = self.body.len();
        for line in self.body[len - lines..].iter_mut() {
            *line = None;
        }
        self.redraw_body()
    }

    fn body_lines(&self) -> u8 {
        self.body.len() as u8
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.target.present().map_err(|_| Error::Display)
    }
}
