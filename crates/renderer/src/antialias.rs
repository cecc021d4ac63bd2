//! Anti-aliasing modes and sample patterns.

use std::fmt;

/// Sampling strategy class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AntiAliasingMode {
    /// One sample at the pixel centre.
    None,
    /// Every pixel is sampled with the full pattern.
    Supersampling,
    /// Pixels are sampled once; only pixels that differ from their neighbours
    /// are re-sampled with the full pattern.
    AdaptiveSupersampling,
}

/// Per-pixel sample arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AntiAliasingPattern {
    OrderedGrid1x1,
    OrderedGrid2x2,
    OrderedGrid3x3,
    OrderedGrid4x4,
    /// Centre sample (weight 1/2) plus the four pixel corners (1/8 each).
    Quincunx,
    RotatedGrid2x2,
}

/// A sample position inside the unit pixel square with its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub dx: f64,
    pub dy: f64,
    pub weight: f64,
}

impl Sample {
    pub const CENTER: Sample = Sample {
        dx: 0.5,
        dy: 0.5,
        weight: 1.0,
    };
}

impl AntiAliasingPattern {
    pub const ALL: [AntiAliasingPattern; 6] = [
        Self::OrderedGrid1x1,
        Self::OrderedGrid2x2,
        Self::OrderedGrid3x3,
        Self::OrderedGrid4x4,
        Self::Quincunx,
        Self::RotatedGrid2x2,
    ];

    /// Sample positions; weights sum to 1.
    pub fn samples(self) -> Vec<Sample> {
        match self {
            Self::OrderedGrid1x1 => ordered_grid(1),
            Self::OrderedGrid2x2 => ordered_grid(2),
            Self::OrderedGrid3x3 => ordered_grid(3),
            Self::OrderedGrid4x4 => ordered_grid(4),
            Self::Quincunx => {
                let mut out = vec![Sample {
                    dx: 0.5,
                    dy: 0.5,
                    weight: 0.5,
                }];
                for (dx, dy) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
                    out.push(Sample {
                        dx,
                        dy,
                        weight: 0.125,
                    });
                }
                out
            }
            Self::RotatedGrid2x2 => [(0.625, 0.125), (0.875, 0.625), (0.375, 0.875), (0.125, 0.375)]
                .into_iter()
                .map(|(dx, dy)| Sample {
                    dx,
                    dy,
                    weight: 0.25,
                })
                .collect(),
        }
    }

    pub fn sample_count(self) -> usize {
        match self {
            Self::OrderedGrid1x1 => 1,
            Self::OrderedGrid2x2 | Self::RotatedGrid2x2 => 4,
            Self::OrderedGrid3x3 => 9,
            Self::OrderedGrid4x4 => 16,
            Self::Quincunx => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::OrderedGrid1x1 => "OG_1x1",
            Self::OrderedGrid2x2 => "OG_2x2",
            Self::OrderedGrid3x3 => "OG_3x3",
            Self::OrderedGrid4x4 => "OG_4x4",
            Self::Quincunx => "QUINCUNX",
            Self::RotatedGrid2x2 => "RG_2x2",
        }
    }
}

fn ordered_grid(n: usize) -> Vec<Sample> {
    let weight = 1.0 / (n * n) as f64;
    let mut out = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            out.push(Sample {
                dx: (i as f64 + 0.5) / n as f64,
                dy: (j as f64 + 0.5) / n as f64,
                weight,
            });
        }
    }
    out
}

impl fmt::Display for AntiAliasingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for AntiAliasingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "NONE",
            Self::Supersampling => "SUPERSAMPLING",
            Self::AdaptiveSupersampling => "ADAPTIVE_SUPERSAMPLING",
        })
    }
}

/// Complete anti-aliasing setting handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AntiAliasing {
    pub mode: AntiAliasingMode,
    pub pattern: AntiAliasingPattern,
}

impl AntiAliasing {
    pub const fn new(mode: AntiAliasingMode, pattern: AntiAliasingPattern) -> Self {
        Self { mode, pattern }
    }

    /// Single centre sample, no refinement.
    pub const NONE: AntiAliasing =
        AntiAliasing::new(AntiAliasingMode::None, AntiAliasingPattern::OrderedGrid1x1);
}

impl fmt::Display for AntiAliasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mode, self.pattern)
    }
}
