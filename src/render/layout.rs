//! Width-constrained text layout.
//!
//! Every dynamic field on the ticket face has a maximum width. The layout
//! engine searches downward from a starting font size in fixed steps
//! until the text fits or a floor is reached; text still overflowing at
//! the floor is drawn as-is. Measurement is injected as a closure so the
//! search stays independent of any particular font backend.

/// Font-size reduction per iteration.
pub const SHRINK_STEP: f32 = 2.0;

/// Result of the shrink-to-fit search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitText {
    /// Chosen pixel size.
    pub px: f32,
    /// Measured width at the chosen size.
    pub width: f32,
}

/// Find the largest size at or below `start` whose measured width fits
/// `max_width`, stepping down by [`SHRINK_STEP`] while the size is above
/// `floor`. Overflow at the floor is accepted.
pub fn shrink_to_fit(
    width_at: impl Fn(f32) -> f32,
    start: f32,
    floor: f32,
    max_width: f32,
) -> FitText {
    let mut px = start;
    let mut width = width_at(px);
    while width > max_width && px > floor {
        px -= SHRINK_STEP;
        width = width_at(px);
    }
    FitText { px, width }
}

/// A block of pre-split lines sharing one font size.
///
/// Lines are measured independently; there is no per-line shrink.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<String>,
}

impl TextBlock {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Width of the widest line.
    pub fn width(&self, line_width: impl Fn(&str) -> f32) -> f32 {
        self.lines
            .iter()
            .map(|line| line_width(line))
            .fold(0.0, f32::max)
    }

    /// Total height when lines are stacked at the given line height.
    pub fn height(&self, line_height: f32) -> f32 {
        self.lines.len() as f32 * line_height
    }
}
