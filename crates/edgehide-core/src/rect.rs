use serde::{Deserialize, Serialize};

/// A rectangle representing a window's position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from its four edges, the form Win32 reports.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns whether the point lies inside the rectangle.
    ///
    /// All four edges count as inside.
    pub fn contains(&self, point: Point) -> bool {
        self.spans_horizontally(point.x) && self.spans_vertically(point.y)
    }

    /// Returns whether `x` falls within `[left, right]`.
    pub fn spans_horizontally(&self, x: i32) -> bool {
        self.x <= x && x <= self.right()
    }

    /// Returns whether `y` falls within `[top, bottom]`.
    pub fn spans_vertically(&self, y: i32) -> bool {
        self.y <= y && y <= self.bottom()
    }

    /// The same rectangle with its top-left corner moved to `(x, y)`.
    pub fn moved_to(&self, x: i32, y: i32) -> Self {
        Self::new(x, y, self.width, self.height)
    }
}

/// A screen-space point, typically the cursor position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Dimensions of the primary display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl ScreenSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}
