use crate::error::{EmblemError, Result};

/// Pixel layout of an [`Image`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One 8-bit channel (intensity, binary mask, label mask)
    Gray,
    /// Three 8-bit channels, stored B, G, R (or H, S, V after conversion)
    Color,
}

impl PixelFormat {
    /// Bytes per pixel
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Color => 3,
        }
    }

    /// Map a declared channel count to a format, rejecting anything but 1 or 3
    pub fn from_channels(channels: usize) -> Result<Self> {
        match channels {
            1 => Ok(PixelFormat::Gray),
            3 => Ok(PixelFormat::Color),
            other => Err(EmblemError::UnsupportedChannels(other)),
        }
    }
}

/// Rectangular, non-empty 8-bit image with 1 or 3 interleaved channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Image {
    /// Create a zero-filled image
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        Self::filled(width, height, format, 0)
    }

    /// Create an image with every byte set to `value`
    pub fn filled(width: usize, height: usize, format: PixelFormat, value: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EmblemError::EmptyImage { width, height });
        }
        Ok(Self {
            width,
            height,
            format,
            data: vec![value; width * height * format.channels()],
        })
    }

    /// Wrap a raw interleaved buffer
    pub fn from_raw(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        let format = PixelFormat::from_channels(channels)?;
        if width == 0 || height == 0 {
            return Err(EmblemError::EmptyImage { width, height });
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(EmblemError::BufferSize {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Zero-filled image with the same dimensions
    pub(crate) fn blank_like(&self, format: PixelFormat) -> Self {
        Self {
            width: self.width,
            height: self.height,
            format,
            data: vec![0; self.width * self.height * format.channels()],
        }
    }

    /// Get image width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get image height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get pixel format
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per pixel
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.width * self.format.channels()
    }

    /// Get raw data as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// First channel at (x, y); 0 outside the image
    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y * self.width + x) * self.channels()]
    }

    /// Set every channel at (x, y); ignored outside the image
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let c = self.channels();
        let start = (y * self.width + x) * c;
        self.data[start..start + c].fill(value);
    }

    /// All channels at (x, y)
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let c = self.channels();
        let start = (y * self.width + x) * c;
        &self.data[start..start + c]
    }

    /// Overwrite all channels at (x, y); ignored outside the image
    pub fn set_pixel(&mut self, x: usize, y: usize, value: &[u8]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let c = self.channels();
        let start = (y * self.width + x) * c;
        self.data[start..start + c].copy_from_slice(&value[..c]);
    }

    /// True when (x, y) is off the 1-pixel frame that region operations skip
    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        x >= 1 && y >= 1 && x + 1 < self.width && y + 1 < self.height
    }

    /// Number of single-channel pixels equal to `value`
    pub fn count(&self, value: u8) -> usize {
        match self.format {
            PixelFormat::Gray => self.data.iter().filter(|&&v| v == value).count(),
            PixelFormat::Color => self
                .data
                .chunks_exact(3)
                .filter(|px| px.iter().all(|&v| v == value))
                .count(),
        }
    }

    /// Fail unless the image has `format`
    pub fn require(&self, operation: &'static str, format: PixelFormat) -> Result<()> {
        if self.format != format {
            return Err(EmblemError::format(operation, format, self.format));
        }
        Ok(())
    }

    /// Fail unless `other` has the same dimensions
    pub fn require_same_size(&self, other: &Image) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(EmblemError::DimensionMismatch {
                left_width: self.width,
                left_height: self.height,
                right_width: other.width,
                right_height: other.height,
            });
        }
        Ok(())
    }
}

/// Inclusive per-channel bounds used to build a binary mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRange {
    /// Lower bound per channel
    pub lower: [u8; 3],
    /// Upper bound per channel
    pub upper: [u8; 3],
}

impl ColorRange {
    /// Create a new range
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// True when every channel of `pixel` lies in its bound.
    ///
    /// A 1-channel pixel is tested against the first bound only.
    pub fn contains(&self, pixel: &[u8]) -> bool {
        pixel
            .iter()
            .enumerate()
            .all(|(c, &v)| self.lower[c] <= v && v <= self.upper[c])
    }
}
