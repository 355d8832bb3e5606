//! This module defines [`Colormap`], an ordered sequence of (position, color) control points that
//! describes a continuous mapping of the numbers between 0 and 1 to colors, along with the one
//! piece of machinery both generators share: the finalizer that turns a dense sequence of
//! perceptually uniform points into a clipped, displayable colormap. The two construction
//! strategies ([`AnchorPath`] and [`HelixPath`]) differ only in how they produce uniform-space
//! points; everything after that — inverse conversion, gamut clipping, pairing with positions —
//! is identical and lives here behind the [`UniformPath`] trait.
//!
//! [`AnchorPath`]: ../segment/struct.AnchorPath.html
//! [`HelixPath`]: ../helix/struct.HelixPath.html

use std::error::Error;
use std::fmt;

use color::RGBColor;
use coord::Coord;
use uniform;

/// The number of control points a colormap gets when the caller doesn't ask for a specific
/// resolution. Dense enough that the piecewise-linear segments are invisible on any display.
pub const DEFAULT_NUM_POINTS: usize = 1024;

/// An error in constructing a colormap. These are structural problems with the inputs, surfaced
/// before any conversion or optimization work happens: numerical difficulties during construction
/// (an optimizer that stops short of full convergence, colors that fall outside the displayable
/// gamut) are expected and handled internally, never reported through this type.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum CmapError {
    /// The anchor positions and colors are malformed: mismatched lengths, fewer than two anchors,
    /// positions that aren't strictly increasing, positions that don't start at 0 and end at 1, or
    /// anchor colors outside the displayable range.
    InvalidAnchors,
    /// A helix endpoint is out of its domain: a non-finite component, a lightness outside
    /// [0, 100], or a negative colorfulness.
    InvalidEndpoint,
    /// Fewer than two samples were requested, which can't even represent the two required
    /// endpoints of a colormap.
    InvalidSampleCount,
}

impl fmt::Display for CmapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CmapError::InvalidAnchors => write!(f, "invalid anchor positions or colors"),
            CmapError::InvalidEndpoint => write!(f, "helix endpoint outside its valid domain"),
            CmapError::InvalidSampleCount => write!(f, "a colormap needs at least two samples"),
        }
    }
}

impl Error for CmapError {}

/// Returns `n` evenly spaced values from `start` to `stop` inclusive, with both endpoints exact.
pub(crate) fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// A named colormap: an ordered sequence of (position, color) control points with strictly
/// increasing positions running from exactly 0 to exactly 1. Between control points the colormap
/// is defined by piecewise-linear interpolation, which [`Colormap::sample`] implements. Once
/// built, a colormap is immutable; hand it to a [`ColormapSink`] to make it available for lookup
/// by name.
///
/// [`ColormapSink`]: ../registry/trait.ColormapSink.html
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colormap {
    name: String,
    points: Vec<(f64, RGBColor)>,
}

impl Colormap {
    /// Constructs a colormap directly from control points, validating the positional invariant:
    /// at least two points, strictly increasing positions, first position exactly 0 and last
    /// exactly 1. Colors are clipped to the displayable range.
    /// # Errors
    /// Returns `CmapError::InvalidAnchors` if the positions violate the invariant.
    pub fn new(name: &str, points: Vec<(f64, RGBColor)>) -> Result<Colormap, CmapError> {
        if points.len() < 2 {
            return Err(CmapError::InvalidAnchors);
        }
        if points[0].0 != 0.0 || points[points.len() - 1].0 != 1.0 {
            return Err(CmapError::InvalidAnchors);
        }
        if points.windows(2).any(|pair| pair[0].0 >= pair[1].0) {
            return Err(CmapError::InvalidAnchors);
        }
        Ok(Colormap {
            name: name.to_string(),
            points: points
                .into_iter()
                .map(|(x, color)| (x, color.clip()))
                .collect(),
        })
    }

    /// The shared finalization step of both generators: converts a dense sequence of perceptually
    /// uniform points to RGB, clips every component to the displayable range (silently — uniform
    /// paths leave the gamut routinely), and pairs the colors with evenly spaced positions over
    /// [0, 1].
    /// # Errors
    /// Returns `CmapError::InvalidSampleCount` on fewer than two points.
    pub fn from_uniform_points(name: &str, points: &[Coord]) -> Result<Colormap, CmapError> {
        if points.len() < 2 {
            return Err(CmapError::InvalidSampleCount);
        }
        let positions = linspace(0.0, 1.0, points.len());
        let colors = uniform::from_uniform(points);
        Ok(Colormap {
            name: name.to_string(),
            points: positions
                .into_iter()
                .zip(colors.into_iter().map(RGBColor::clip))
                .collect(),
        })
    }

    /// The name this colormap registers under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered (position, color) control points.
    pub fn points(&self) -> &[(f64, RGBColor)] {
        &self.points
    }

    /// The number of control points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a colormap carries at least its two endpoints.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Maps a number between 0 and 1 to a color by piecewise-linear interpolation between the two
    /// control points that bound it. Out-of-range values are simply clamped to the correct range:
    /// calling this on negative numbers returns the first color, and calling this on numbers
    /// larger than 1 returns the last. Exactly at a control point, that point's color comes back
    /// unchanged.
    pub fn sample(&self, x: f64) -> RGBColor {
        // clamp between 0 and 1 beforehand
        let clamped = if x < 0.0 {
            0.0
        } else if x > 1.0 {
            1.0
        } else {
            x
        };
        // index of the first control point strictly past x; at least 1 because the first
        // position is 0
        let next = self.points.partition_point(|&(p, _)| p <= clamped);
        if next == self.points.len() {
            // clamped == 1.0, the final control point
            return self.points[next - 1].1;
        }
        let (x0, color0) = self.points[next - 1];
        let (x1, color1) = self.points[next];
        let t = (clamped - x0) / (x1 - x0);
        // blend in RGB space; t == 0 reproduces the left control point exactly
        let coord0: Coord = color0.into();
        let coord1: Coord = color1.into();
        RGBColor::from(coord1.weighted_midpoint(&coord0, t))
    }
}

/// A path through the perceptually uniform space: the strategy seam between the two generators.
/// An implementation only decides where the path goes; the provided [`to_colormap`] method is the
/// single shared finalizer that turns any path into a displayable colormap.
///
/// [`to_colormap`]: #method.to_colormap
pub trait UniformPath {
    /// Produces `num_points` uniform-space points tracing the path from its start (parameter 0)
    /// to its end (parameter 1). Callers are expected to pass `num_points >= 2`; the provided
    /// `to_colormap` method checks this before sampling.
    fn sample(&self, num_points: usize) -> Vec<Coord>;

    /// Samples the path and finalizes it into a named colormap: inverse conversion to RGB, gamut
    /// clipping, and pairing with evenly spaced positions.
    /// # Errors
    /// Returns `CmapError::InvalidSampleCount` if `num_points < 2`.
    fn to_colormap(&self, name: &str, num_points: usize) -> Result<Colormap, CmapError> {
        if num_points < 2 {
            return Err(CmapError::InvalidSampleCount);
        }
        Colormap::from_uniform_points(name, &self.sample(num_points))
    }
}
