//! Logical display capability used by the consumer.
//!
//! The consumer only names regions and colors. Pixel geometry belongs to
//! the implementation (see [`crate::canvas::TextCanvas`]).

use crate::error::Error;

/// Logical colors. Monochrome panels map everything but `Black` to "on".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Black,
    White,
    Red,
    Cyan,
    Yellow,
}

/// Logical screen regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    /// Title line `n` (0-based).
    Title(u8),
    /// Connection status.
    Status,
    /// Send mode (start/stop boards only).
    Mode,
    /// The whole scrolling text area.
    Body,
    /// One line of the text area (0 = top).
    Line(u8),
}

/// A screen the consumer can draw on.
pub trait Display {
    /// Clear `region` and draw `text` into it.
    fn draw_text(&mut self, region: Region, text: &str, color: Color) -> Result<(), Error>;

    /// Paint `region` with a solid color.
    fn fill_region(&mut self, region: Region, color: Color) -> Result<(), Error>;

    /// Shift the text area up by `lines`, blanking the lines exposed at the bottom.
    fn scroll(&mut self, lines: u8) -> Result<(), Error>;

    /// Number of visible text-area lines.
    fn body_lines(&self) -> u8;

    /// Push buffered drawing to the panel.
    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Display + ?Sized> Display for &mut T {
    fn draw_text(&mut self, region: Region, text: &str, color: Color) -> Result<(), Error> {
        (**self).draw_text(region, text, color)
    }

    fn fill_region(&mut self, region: Region, color: Color) -> Result<(), Error> {
        (**self).fill_region(region, color)
    }

    fn scroll(&mut self, lines: u8) -> Result<(), Error> {
        (**self).scroll(lines)
    }

    fn body_lines(&self) -> u8 {
        (**self).body_lines()
    }

    fn flush(&mut self) -> Result<(), Error> {
        (**self).flush()
    }
}

/// What happens when the text area is full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Overflow {
    /// Scroll up one line and write at the bottom.
    Scroll,
    /// Clear the area and restart at the top.
    Wrap,
}

/// Where the next line goes, and what has to happen first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Line(u8),
    ScrollThenLine(u8),
    ClearThenLine(u8),
}

/// Tracks the cursor of an append-only text area.
#[derive(Clone, Copy, Debug)]
pub struct TextLog {
    overflow: Overflow,
    capacity: u8,
    next: u8,
}

impl TextLog {
    pub const fn new(overflow: Overflow, capacity: u8) -> Self {
        Self {
            overflow,
            capacity,
            next: 0,
        }
    }

    /// Reserve the next line. `None` when there is no text area at all.
    pub fn place(&mut self) -> Option<Placement> {
        if self.capacity == 0 {
            return None;
        }
        if self.next < self.capacity {
            let row = self.next;
            self.next += 1;
            return Some(Placement::Line(row));
        }
        Some(match self.overflow {
            Overflow::Scroll => Placement::ScrollThenLine(self.capacity - 1),
            Overflow::Wrap => {
                self.next = 1;
                Placement::ClearThenLine(0)
            }
        })
    }

    /// Append one line of text.
    pub fn append<D: Display>(&mut self, display: &mut D, text: &str, color: Color) -> Result<(), Error> {
        let Some(placement) = self.place() else {
            return Ok(());
        };
        let row = match placement {
            Placement::Line(row) => row,
            Placement::ScrollThenLine(row) => {
                display.scroll(1)?;
                row
            }
            Placement::ClearThenLine(row) => {
                display.fill_region(Region::Body, Color::Black)?;
                row
            }
        };
        display.draw_text(Region::Line(row), text, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_policy_fills_then_scrolls_at_bottom() {
        let mut log = TextLog::new(Overflow::Scroll, 3);
        assert_eq!(log.place(), Some(Placement::Line(0)));
        assert_eq!(log.place(), Some(Placement::Line(1)));
        assert_eq!(log.place(), Some(Placement::Line(2)));
        assert_eq!(log.place(), Some(Placement::ScrollThenLine(2)));
        assert_eq!(log.place(), Some(Placement::ScrollThenLine(2)));
    }

    #[test]
    fn wrap_policy_clears_and_restarts() {
        let mut log = TextLog::new(Overflow::Wrap, 2);
        assert_eq!(log.place(), Some(Placement::Line(0)));
        assert_eq!(log.place(), Some(Placement::Line(1)));
        assert_eq!(log.place(), Some(Placement::ClearThenLine(0)));
        assert_eq!(log.place(), Some(Placement::Line(1)));
        assert_eq!(log.place(), Some(Placement::ClearThenLine(0)));
    }

    #[test]
    fn no_text_area_places_nothing() {
        let mut log = TextLog::new(Overflow::Scroll, 0);
        assert_eq!(log.place(), None);
    }
}
