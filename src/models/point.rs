/// 2D point with floating point coordinates (x = column, y = row)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate (column)
    pub x: f32,
    /// Y coordinate (row)
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Truncate to the pixel that contains this point
    pub fn to_pixel(&self) -> (i64, i64) {
        (self.x as i64, self.y as i64)
    }
}

/// Integer pixel address used by flood fill frontiers and seeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PixelCoord {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl PixelCoord {
    /// Create a new pixel coordinate
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Four neighbours in fill order: west, east, north, south.
    ///
    /// Neighbours that would fall off the top/left edge are skipped.
    pub fn neighbors4(&self) -> impl Iterator<Item = PixelCoord> {
        let PixelCoord { x, y } = *self;
        [
            x.checked_sub(1).map(|w| PixelCoord::new(w, y)),
            Some(PixelCoord::new(x + 1, y)),
            y.checked_sub(1).map(|n| PixelCoord::new(x, n)),
            Some(PixelCoord::new(x, y + 1)),
        ]
        .into_iter()
        .flatten()
    }
}
