use super::Point;

/// Axis-aligned rectangle in pixel coordinates.
///
/// Half-open: covers columns `x..x + width` and rows `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    /// Left column
    pub x: usize,
    /// Top row
    pub y: usize,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from inclusive first/last column and row
    pub fn from_extents(first_x: usize, first_y: usize, last_x: usize, last_y: usize) -> Self {
        Self::new(
            first_x,
            first_y,
            last_x.saturating_sub(first_x) + 1,
            last_y.saturating_sub(first_y) + 1,
        )
    }

    /// Number of pixels covered
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// One past the last column
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// One past the last row
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Width over height, `None` for a degenerate rectangle
    pub fn aspect(&self) -> Option<f64> {
        if self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }

    /// True if the pixel lies inside
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x as i64 && y >= self.y as i64 && x < self.right() as i64 && y < self.bottom() as i64
    }

    /// True if the point (truncated to its pixel) lies inside
    pub fn contains_point(&self, point: &Point) -> bool {
        let (x, y) = point.to_pixel();
        self.contains(x, y)
    }

    /// Clip to a `width` x `height` grid
    pub fn clamp_to(&self, width: usize, height: usize) -> Rect {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Rect::new(x, y, self.right().min(width) - x, self.bottom().min(height) - y)
    }
}
