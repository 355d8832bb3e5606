//! The anchor-interpolation strategy: build a colormap by pinning a handful of colors at fixed
//! positions and letting the space between them vary smoothly. The smoothness is the entire
//! trick — interpolating the anchors in RGB would drift through muddy in-between colors, so
//! [`AnchorPath`] converts the anchors to the perceptually uniform space once and interpolates
//! each of the three uniform coordinates independently. Equal parameter steps then track equal
//! perceived change as closely as straight segments between the anchors allow.

use color::RGBColor;
use colormap::{linspace, Colormap, CmapError, UniformPath, DEFAULT_NUM_POINTS};
use coord::Coord;
use uniform;

/// A piecewise-linear path through the uniform space defined by a validated set of anchors:
/// strictly increasing positions spanning exactly [0, 1], paired one-to-one with displayable
/// colors. Construction converts the anchors to uniform space once; sampling is pure lookup and
/// interpolation afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPath {
    positions: Vec<f64>,
    anchors: Vec<Coord>,
}

impl AnchorPath {
    /// Validates an anchor set and converts it into a path. The requirements, each of which
    /// otherwise fails with `CmapError::InvalidAnchors`:
    ///
    /// - positions and colors have the same length, at least 2;
    /// - positions are strictly increasing;
    /// - the first position is exactly 0 and the last exactly 1, so the anchors span the whole
    ///   colormap and no sample ever falls outside the interpolation nodes;
    /// - every color is displayable (finite components in [0, 1]).
    pub fn new(positions: &[f64], colors: &[RGBColor]) -> Result<AnchorPath, CmapError> {
        if positions.len() != colors.len() || positions.len() < 2 {
            return Err(CmapError::InvalidAnchors);
        }
        if positions[0] != 0.0 || positions[positions.len() - 1] != 1.0 {
            return Err(CmapError::InvalidAnchors);
        }
        if positions.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(CmapError::InvalidAnchors);
        }
        if colors.iter().any(|color| !color.is_displayable()) {
            return Err(CmapError::InvalidAnchors);
        }
        Ok(AnchorPath {
            positions: positions.to_vec(),
            anchors: uniform::to_uniform(colors),
        })
    }

    /// The uniform-space point at parameter `x`, found by interpolating between the two anchors
    /// that bound it. Exact at the anchor positions themselves.
    fn interpolate(&self, x: f64) -> Coord {
        // index of the first anchor strictly past x; at least 1 because the first position is 0
        let next = self.positions.partition_point(|&p| p <= x);
        if next == self.positions.len() {
            // x == 1.0, the final anchor
            return self.anchors[next - 1];
        }
        let x0 = self.positions[next - 1];
        let x1 = self.positions[next];
        let t = (x - x0) / (x1 - x0);
        self.anchors[next].weighted_midpoint(&self.anchors[next - 1], t)
    }
}

impl UniformPath for AnchorPath {
    fn sample(&self, num_points: usize) -> Vec<Coord> {
        linspace(0.0, 1.0, num_points)
            .into_iter()
            .map(|x| self.interpolate(x))
            .collect()
    }
}

/// Builds a colormap with [`DEFAULT_NUM_POINTS`] control points by interpolating the given anchor
/// colors through the perceptually uniform space. `positions` must be strictly increasing and run
/// from exactly 0 to exactly 1, with one color per position. For a different resolution, use
/// [`AnchorPath::new`] with [`UniformPath::to_colormap`] directly.
///
/// # Errors
/// Returns `CmapError::InvalidAnchors` if the anchor set is malformed; see [`AnchorPath::new`].
///
/// # Example
/// ```
/// # use viridian::color::RGBColor;
/// # use viridian::segment::segment_uniform;
/// let cmap = segment_uniform(
///     &[0.0, 0.5, 1.0],
///     &[
///         RGBColor::from((0, 0, 0)),
///         RGBColor::from((32, 96, 160)),
///         RGBColor::from((255, 255, 255)),
///     ],
///     "ocean_depth",
/// ).unwrap();
/// assert_eq!(cmap.len(), 1024);
/// ```
pub fn segment_uniform(
    positions: &[f64],
    colors: &[RGBColor],
    name: &str,
) -> Result<Colormap, CmapError> {
    AnchorPath::new(positions, colors)?.to_colormap(name, DEFAULT_NUM_POINTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_anchors() -> (Vec<f64>, Vec<RGBColor>) {
        (
            vec![0.0, 0.5, 1.0],
            vec![
                RGBColor::from((0, 0, 0)),
                RGBColor {
                    r: 0.5,
                    g: 0.5,
                    b: 0.5,
                },
                RGBColor::from((255, 255, 255)),
            ],
        )
    }

    #[test]
    fn test_rejects_malformed_anchors() {
        let black = RGBColor::from((0, 0, 0));
        let white = RGBColor::from((255, 255, 255));
        // length mismatch
        assert_eq!(
            AnchorPath::new(&[0.0, 0.5, 1.0], &[black, white]).unwrap_err(),
            CmapError::InvalidAnchors
        );
        // too few anchors
        assert_eq!(
            AnchorPath::new(&[0.0], &[black]).unwrap_err(),
            CmapError::InvalidAnchors
        );
        // doesn't start at 0
        assert_eq!(
            AnchorPath::new(&[0.1, 1.0], &[black, white]).unwrap_err(),
            CmapError::InvalidAnchors
        );
        // doesn't end at 1
        assert_eq!(
            AnchorPath::new(&[0.0, 0.99], &[black, white]).unwrap_err(),
            CmapError::InvalidAnchors
        );
        // not strictly increasing
        assert_eq!(
            AnchorPath::new(&[0.0, 0.5, 0.5, 1.0], &[black, white, black, white]).unwrap_err(),
            CmapError::InvalidAnchors
        );
        // undisplayable anchor color
        assert_eq!(
            AnchorPath::new(
                &[0.0, 1.0],
                &[
                    black,
                    RGBColor {
                        r: 1.4,
                        g: 0.0,
                        b: 0.0
                    }
                ]
            )
            .unwrap_err(),
            CmapError::InvalidAnchors
        );
    }

    #[test]
    fn test_colormap_shape() {
        let (positions, colors) = gray_anchors();
        let cmap = segment_uniform(&positions, &colors, "grays").unwrap();
        assert_eq!(cmap.len(), 1024);
        assert_eq!(cmap.name(), "grays");
        assert_eq!(cmap.points()[0].0, 0.0);
        assert_eq!(cmap.points()[1023].0, 1.0);
        assert!(cmap.points().windows(2).all(|w| w[0].0 < w[1].0));
        assert!(cmap.points().iter().all(|&(_, c)| c.is_displayable()));
    }

    #[test]
    fn test_anchor_reproduced_at_its_position() {
        // 11 samples put the 6th exactly at position 0.5, the middle anchor: the colormap must
        // return that anchor's color, converted through the uniform space and clipped
        let (positions, colors) = gray_anchors();
        let path = AnchorPath::new(&positions, &colors).unwrap();
        let cmap = path.to_colormap("grays", 11).unwrap();
        let expected = uniform::from_uniform(&uniform::to_uniform(&[colors[1]]))[0].clip();
        let (position, actual) = cmap.points()[5];
        assert_eq!(position, 0.5);
        assert!((actual.r - expected.r).abs() <= 1e-9);
        assert!((actual.g - expected.g).abs() <= 1e-9);
        assert!((actual.b - expected.b).abs() <= 1e-9);
    }

    #[test]
    fn test_interpolation_is_linear_in_uniform_space() {
        let (positions, colors) = gray_anchors();
        let path = AnchorPath::new(&positions, &colors).unwrap();
        let samples = path.sample(5);
        // parameter 0.25 sits halfway between the anchors at 0 and 0.5 in every coordinate
        let expected = path.anchors[0].weighted_midpoint(&path.anchors[1], 0.5);
        assert!((samples[1].x - expected.x).abs() <= 1e-9);
        assert!((samples[1].y - expected.y).abs() <= 1e-9);
        assert!((samples[1].z - expected.z).abs() <= 1e-9);
    }

    #[test]
    fn test_colormap_points_roundtrip_through_uniform_space() {
        // a neutral-axis map stays far from the gamut boundary, so clipping never fires and the
        // adapter round-trip reproduces the rendered control points
        let (positions, colors) = gray_anchors();
        let path = AnchorPath::new(&positions, &colors).unwrap();
        let cmap = path.to_colormap("grays", 17).unwrap();
        let rendered: Vec<RGBColor> = cmap.points().iter().map(|&(_, c)| c).collect();
        let back = uniform::from_uniform(&uniform::to_uniform(&rendered));
        for (original, recovered) in rendered.iter().zip(back.iter()) {
            assert!((original.r - recovered.r).abs() <= 1e-6);
            assert!((original.g - recovered.g).abs() <= 1e-6);
            assert!((original.b - recovered.b).abs() <= 1e-6);
        }
    }

    #[test]
    fn test_idempotent_construction() {
        let (positions, colors) = gray_anchors();
        let first = segment_uniform(&positions, &colors, "grays").unwrap();
        let second = segment_uniform(&positions, &colors, "grays").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_two_anchor_gradient_spans_endpoints() {
        let anchors = [
            RGBColor::from((8, 16, 64)),
            RGBColor::from((250, 240, 200)),
        ];
        let cmap = segment_uniform(&[0.0, 1.0], &anchors, "dusk").unwrap();
        let first = cmap.points()[0].1;
        let last = cmap.points()[1023].1;
        assert!((first.r - anchors[0].r).abs() <= 1e-4);
        assert!((first.g - anchors[0].g).abs() <= 1e-4);
        assert!((first.b - anchors[0].b).abs() <= 1e-4);
        assert!((last.r - anchors[1].r).abs() <= 1e-4);
        assert!((last.g - anchors[1].g).abs() <= 1e-4);
        assert!((last.b - anchors[1].b).abs() <= 1e-4);
    }
}
