use crate::error::{Error, Result};
use crate::pixel::{alpha, blue, clamp_channel, clamp_coord, green, pack, red};
use crate::pixel_buf::PixelBuffer;

/// Rectangular grid of convolution weights with odd width and height.
///
/// Weights are stored row-major; `weight(kx, ky)` is the tap applied to the
/// source pixel at offset `(kx - half_width, ky - half_height)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvolutionMatrix {
    width: usize,
    height: usize,
    weights: Vec<f64>,
}

impl ConvolutionMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(Error::InvalidKernel("matrix is empty".into()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(Error::InvalidKernel(format!(
                "row {i} has {} weights, expected {width}",
                row.len()
            )));
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(Error::InvalidKernel(format!(
                "{width}x{height} matrix must have odd dimensions"
            )));
        }
        Ok(Self {
            width,
            height,
            weights: rows.into_iter().flatten().collect(),
        })
    }

    /// Parse `"a,b,c;d,e,f;g,h,i"`: rows separated by `;`, weights by `,`.
    pub fn parse(text: &str) -> Result<Self> {
        let rows = text
            .split(';')
            .map(|row| {
                row.split(',')
                    .map(|w| {
                        let w = w.trim();
                        w.parse::<f64>().map_err(|_| {
                            Error::InvalidKernel(format!("{w:?} is not a number"))
                        })
                    })
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(rows)
    }

    /// 3x3 Gaussian blur, weights summing to one.
    pub fn blur() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: [1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0]
                .iter()
                .map(|w| w / 16.0)
                .collect(),
        }
    }

    /// 3x3 Laplacian edge detector.
    pub fn edge_detection() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
        }
    }

    pub fn sharpen() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f64 {
        self.weights[ky * self.width + kx]
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Per-tap unpack/multiply/accumulate plus the final clamp and pack.
    pub fn ops_per_pixel(&self) -> u64 {
        6 * (self.width * self.height) as u64 + 9
    }
}

/// Convolve the neighborhood centered at `(x, y)`.
///
/// Samples outside the image replicate the nearest edge pixel. The output
/// alpha is the center pixel's alpha; only color channels are filtered.
pub fn convolve(src: &PixelBuffer, m: &ConvolutionMatrix, x: u32, y: u32) -> u32 {
    let half_w = (m.width / 2) as i64;
    let half_h = (m.height / 2) as i64;

    let mut r = 0.0_f64;
    let mut g = 0.0_f64;
    let mut b = 0.0_f64;

    for ky in 0..m.height {
        let sy = clamp_coord(y as i64 + ky as i64 - half_h, src.height);
        let row = src.row(sy);
        for kx in 0..m.width {
            let sx = clamp_coord(x as i64 + kx as i64 - half_w, src.width);
            let p = row[sx as usize];
            let w = m.weight(kx, ky);
            r += red(p) as f64 * w;
            g += green(p) as f64 * w;
            b += blue(p) as f64 * w;
        }
    }

    pack(
        alpha(src.pixel(x, y)),
        clamp_channel(r),
        clamp_channel(g),
        clamp_channel(b),
    )
}
