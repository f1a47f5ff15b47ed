//! Fractional layout specs.
//!
//! A spec reads `FRACTION±OFFSET;FRACTION±OFFSET` (horizontal first) and
//! resolves against the current terminal size, so every pane describes its
//! position and size once and is re-placed on resize for free:
//!
//! ```text
//! "0.5+0;1.0-2" on 80×24  →  (40, 22)
//! ```
//!
//! A fraction of exactly `1.0` means the whole dimension, rounded down to an
//! even number so half splits line up. Bordered widgets give up one cell on
//! every side for the frame.

use std::str::FromStr;

use ratatui::layout::Rect;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout spec {0:?} needs two axes separated by ';'")]
    MissingAxis(String),
    #[error("layout axis {0:?} is not FRACTION+OFFSET or FRACTION-OFFSET")]
    BadAxis(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub fraction: f32,
    pub offset: i32,
}

impl Axis {
    pub fn resolve(self, dimension: u16) -> i32 {
        let base = if self.fraction == 1.0 {
            f32::from(dimension - dimension % 2)
        } else {
            self.fraction * f32::from(dimension)
        };
        (base + self.offset as f32) as i32
    }
}

impl FromStr for Axis {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || LayoutError::BadAxis(s.to_string());
        let at = s.find(['+', '-']).ok_or_else(bad)?;
        let (fraction, rest) = s.split_at(at);
        let fraction: f32 = fraction.trim().parse().map_err(|_| bad())?;
        let magnitude: i32 = rest[1..].trim().parse().map_err(|_| bad())?;
        if !fraction.is_finite() || fraction < 0.0 || magnitude < 0 {
            return Err(bad());
        }
        let offset = if rest.starts_with('-') { -magnitude } else { magnitude };
        Ok(Axis { fraction, offset })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpec {
    pub horizontal: Axis,
    pub vertical: Axis,
}

impl LayoutSpec {
    pub fn resolve(&self, width: u16, height: u16) -> (i32, i32) {
        (self.horizontal.resolve(width), self.vertical.resolve(height))
    }
}

impl FromStr for LayoutSpec {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, v) = s
            .split_once(';')
            .ok_or_else(|| LayoutError::MissingAxis(s.to_string()))?;
        Ok(LayoutSpec {
            horizontal: h.parse()?,
            vertical: v.parse()?,
        })
    }
}

/// Unclipped resolution of a placement, in signed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Resolved {
    fn clip(self, screen: Rect) -> Rect {
        let x = self.x.max(0);
        let y = self.y.max(0);
        let right = (self.x + self.width).max(x);
        let bottom = (self.y + self.height).max(y);
        let to_u16 = |v: i32| v.clamp(0, i32::from(u16::MAX)) as u16;
        let rect = Rect::new(
            to_u16(x),
            to_u16(y),
            to_u16(right - x),
            to_u16(bottom - y),
        );
        rect.intersection(screen)
    }
}

/// Where a widget sits: position spec, size spec, border flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: LayoutSpec,
    pub size: LayoutSpec,
    pub bordered: bool,
}

impl Placement {
    pub fn new(position: &str, size: &str, bordered: bool) -> Result<Self, LayoutError> {
        Ok(Self {
            position: position.parse()?,
            size: size.parse()?,
            bordered,
        })
    }

    /// Content rectangle before clipping; bordered widgets are inset.
    pub fn resolve(&self, screen: Rect) -> Resolved {
        let (x, y) = self.position.resolve(screen.width, screen.height);
        let (width, height) = self.size.resolve(screen.width, screen.height);
        let inset = i32::from(self.bordered);
        Resolved {
            x: x + inset,
            y: y + inset,
            width: width - 2 * inset,
            height: height - 2 * inset,
        }
    }

    pub fn content(&self, screen: Rect) -> Rect {
        self.resolve(screen).clip(screen)
    }

    /// The border frame: the content grown by one cell. `None` when unbordered.
    pub fn frame(&self, screen: Rect) -> Option<Rect> {
        if !self.bordered {
            return None;
        }
        let r = self.resolve(screen);
        let grown = Resolved {
            x: r.x - 1,
            y: r.y - 1,
            width: r.width + 2,
            height: r.height + 2,
        };
        Some(grown.clip(screen))
    }
}
