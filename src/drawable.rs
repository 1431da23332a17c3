use crate::Pt;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawCommand {
    /// Solid RGB fill of the whole window.
    Fill([u8; 3]),
    /// Image id, options, and the image size in pixels.
    Image(u32, DrawOption, [u32; 2]),
}

/// Options for drawing an image.
///
/// The position is the image's *center* in window pixels, origin at the
/// top-left of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOption {
    position: [Pt; 2],
}

impl Default for DrawOption {
    fn default() -> Self {
        Self {
            position: [Pt(0.0), Pt(0.0)],
        }
    }
}

impl DrawOption {
    pub fn new(position: [Pt; 2]) -> Self {
        Self { position }
    }

    pub fn position(&self) -> [Pt; 2] {
        self.position
    }

    pub fn with_position(mut self, position: [Pt; 2]) -> Self {
        self.position = position;
        self
    }

    /// Top-left corner of an image of `size` drawn with these options.
    ///
    /// The center is rounded to a whole pixel first, then shifted by half
    /// the size using integer division.
    pub(crate) fn top_left(&self, size: [u32; 2]) -> (i64, i64) {
        let [x, y] = self.position;
        (
            x.as_i32() as i64 - (size[0] / 2) as i64,
            y.as_i32() as i64 - (size[1] / 2) as i64,
        )
    }
}
