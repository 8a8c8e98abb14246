use crate::foundation::core::Color;
use crate::foundation::error::{GrailError, GrailResult};

/// A CPU pixel buffer in row-major RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
    /// Whether `data` holds premultiplied alpha.
    pub premultiplied: bool,
}

/// Byte length of a `width` x `height` RGBA8 buffer, `None` on overflow.
pub(crate) fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)
}

impl Frame {
    /// Fully transparent premultiplied frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Premultiplied frame filled with `color`.
    ///
    /// A size whose byte length overflows `usize` yields an empty 0x0 frame; callers that take
    /// sizes from outside check with [`Frame::try_filled`].
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let px = color.to_premul();
        let (width, height, len) = match byte_len(width, height) {
            Some(len) => (width, height, len),
            None => (0, 0, 0),
        };
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / 4 {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            data,
            premultiplied: true,
        }
    }

    /// Like [`Frame::filled`], failing when either side exceeds `max_side` or the byte length
    /// overflows.
    pub fn try_filled(width: u32, height: u32, max_side: u32, color: Color) -> GrailResult<Self> {
        if width > max_side || height > max_side || byte_len(width, height).is_none() {
            return Err(GrailError::render(format!(
                "frame {width}x{height} exceeds {max_side} pixels per side"
            )));
        }
        Ok(Self::filled(width, height, color))
    }

    /// Wrap existing bytes, checking the length.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>, premultiplied: bool) -> GrailResult<Self> {
        if byte_len(width, height) != Some(data.len()) {
            return Err(GrailError::validation(format!(
                "frame byte length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied,
        })
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Whether the frame has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Straight-alpha copy, as PNG encoders expect.
    pub fn to_straight(&self) -> Self {
        if !self.premultiplied {
            return self.clone();
        }
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        Self {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
