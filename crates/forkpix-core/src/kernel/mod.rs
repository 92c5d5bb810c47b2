mod convolution;
mod grayscale;
mod sepia;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::pixel_buf::PixelBuffer;

pub use convolution::{ConvolutionMatrix, convolve};
pub use grayscale::grayscale;
pub use sepia::sepia;

/// A pixel transform selected by the caller.
///
/// Grayscale and sepia only look at the pixel being written; convolution
/// reads a neighborhood of the source buffer. All variants are read-only
/// and can be shared across worker threads.
#[derive(Clone, Debug, PartialEq)]
pub enum Kernel {
    Grayscale,
    Sepia,
    Convolution(ConvolutionMatrix),
}

impl Kernel {
    pub fn name(&self) -> String {
        match self {
            Kernel::Grayscale => "grayscale".into(),
            Kernel::Sepia => "sepia".into(),
            Kernel::Convolution(m) => format!("convolution {}x{}", m.width(), m.height()),
        }
    }

    /// Compute the output pixel at `(x, y)`.
    #[inline]
    pub fn apply(&self, src: &PixelBuffer, x: u32, y: u32) -> u32 {
        match self {
            Kernel::Grayscale => grayscale(src.pixel(x, y)),
            Kernel::Sepia => sepia(src.pixel(x, y)),
            Kernel::Convolution(m) => convolve(src, m, x, y),
        }
    }

    /// Fill one output row. `out` must be exactly `src.width` pixels long.
    pub fn apply_row(&self, src: &PixelBuffer, y: u32, out: &mut [u32]) {
        debug_assert_eq!(out.len(), src.width as usize);
        match self {
            Kernel::Grayscale => {
                for (dst, &p) in out.iter_mut().zip(src.row(y)) {
                    *dst = grayscale(p);
                }
            }
            Kernel::Sepia => {
                for (dst, &p) in out.iter_mut().zip(src.row(y)) {
                    *dst = sepia(p);
                }
            }
            Kernel::Convolution(m) => {
                for (x, dst) in out.iter_mut().enumerate() {
                    *dst = convolve(src, m, x as u32, y);
                }
            }
        }
    }

    pub fn ops_per_pixel(&self) -> u64 {
        match self {
            Kernel::Grayscale => grayscale::OPS_PER_PIXEL,
            Kernel::Sepia => sepia::OPS_PER_PIXEL,
            Kernel::Convolution(m) => m.ops_per_pixel(),
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Effect selectors accepted at the engine boundary.
pub const EFFECTS: &[&str] = &["grayscale", "sepia", "blur", "edge-detection", "sharpen"];

impl FromStr for Kernel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "grayscale" | "greyscale" => Ok(Kernel::Grayscale),
            "sepia" => Ok(Kernel::Sepia),
            "blur" => Ok(Kernel::Convolution(ConvolutionMatrix::blur())),
            "edge-detection" | "edge" => Ok(Kernel::Convolution(ConvolutionMatrix::edge_detection())),
            "sharpen" | "custom-filter" => Ok(Kernel::Convolution(ConvolutionMatrix::sharpen())),
            _ => Err(Error::UnsupportedEffect(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{alpha, pack};

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..width * height)
            .map(|i| pack(0xff - (i % 7) * 10, (i * 3) % 256, (i * 5) % 256, (i * 11) % 256))
            .collect();
        PixelBuffer::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn parse_selectors() {
        assert_eq!("grayscale".parse::<Kernel>().unwrap(), Kernel::Grayscale);
        assert_eq!("Sepia".parse::<Kernel>().unwrap(), Kernel::Sepia);
        assert_eq!(
            "Edge Detection".parse::<Kernel>().unwrap(),
            Kernel::Convolution(ConvolutionMatrix::edge_detection())
        );
        assert_eq!(
            "custom_filter".parse::<Kernel>().unwrap(),
            Kernel::Convolution(ConvolutionMatrix::sharpen())
        );
        for name in EFFECTS {
            assert!(name.parse::<Kernel>().is_ok(), "{name} should parse");
        }
    }

    #[test]
    fn unknown_selector_is_unsupported() {
        let err = "posterize".parse::<Kernel>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedEffect(ref s) if s == "posterize"));
    }

    #[test]
    fn apply_row_matches_apply() {
        let src = gradient(9, 4);
        let kernels = [
            Kernel::Grayscale,
            Kernel::Sepia,
            Kernel::Convolution(ConvolutionMatrix::blur()),
        ];
        for kernel in &kernels {
            for y in 0..src.height {
                let mut row = vec![0; src.width as usize];
                kernel.apply_row(&src, y, &mut row);
                for x in 0..src.width {
                    assert_eq!(row[x as usize], kernel.apply(&src, x, y), "{kernel} at ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn alpha_passthrough_for_every_kernel() {
        let src = gradient(6, 5);
        let kernels = [
            Kernel::Grayscale,
            Kernel::Sepia,
            Kernel::Convolution(ConvolutionMatrix::edge_detection()),
        ];
        for kernel in &kernels {
            for y in 0..src.height {
                for x in 0..src.width {
                    assert_eq!(alpha(kernel.apply(&src, x, y)), alpha(src.pixel(x, y)));
                }
            }
        }
    }

    #[test]
    fn ops_per_pixel() {
        assert_eq!(Kernel::Grayscale.ops_per_pixel(), 11);
        assert_eq!(Kernel::Sepia.ops_per_pixel(), 24);
        assert_eq!(
            Kernel::Convolution(ConvolutionMatrix::blur()).ops_per_pixel(),
            63
        );
    }

    #[test]
    fn names() {
        assert_eq!(Kernel::Grayscale.to_string(), "grayscale");
        assert_eq!(
            Kernel::Convolution(ConvolutionMatrix::sharpen()).name(),
            "convolution 3x3"
        );
    }
}
