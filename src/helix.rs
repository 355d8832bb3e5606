//! The helix strategy, the heart of Viridian: build a colormap as a corkscrew through the
//! perceptually uniform space. Lightness and chroma ramp linearly between two endpoints while the
//! hue angle sweeps through any number of full revolutions, which yields vivid maps that still
//! order correctly by lightness. The catch is that a naively parameterized helix is not uniform:
//! lightness and chroma advance evenly per index while the hue carries the points sideways by
//! amounts that depend on the local chroma, so consecutive samples are perceptually closer in
//! some stretches than others. The fix is the uniformization pass: the interior hue angles are
//! re-optimized, endpoints pinned, to equalize the Euclidean step lengths along the path, with
//! each angle confined to a ±45° neighborhood of its naive value so the hue keeps progressing in
//! the intended direction.

use std::f64::consts::{PI, TAU};

use colormap::{linspace, Colormap, CmapError, UniformPath, DEFAULT_NUM_POINTS};
use coord::Coord;
use least_squares::{solve_bounded, BandSparsity, SolverOptions, TwoBandJacobian};
use uniform::{colorfulness_to_ucs, lightness_to_ucs};

/// How far the optimizer may move an interior hue angle away from its naive linearly interpolated
/// value, in radians. Tight enough that the hue stays visually monotonic in the winding
/// direction.
const MAX_HUE_DEVIATION: f64 = PI / 4.0;

/// One end of a helix, in the cylindrical appearance coordinates JMh: lightness, colorfulness
/// (chroma magnitude), and hue angle in degrees. The values are CAM16 appearance correlates, not
/// yet UCS-rescaled; the path construction applies the rescalings itself.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelixEndpoint {
    /// Lightness J, from 0 (black) to 100 (diffuse white).
    pub lightness: f64,
    /// Colorfulness M, 0 for the neutral axis; vivid display colors reach roughly 100.
    pub colorfulness: f64,
    /// Hue angle h in degrees. Any finite value is accepted; whole turns matter here, since the
    /// difference between endpoint hues fixes where the winding lands.
    pub hue: f64,
}

impl HelixEndpoint {
    /// A convenience constructor for the common literal case.
    pub fn new(lightness: f64, colorfulness: f64, hue: f64) -> HelixEndpoint {
        HelixEndpoint {
            lightness,
            colorfulness,
            hue,
        }
    }

    fn in_domain(&self) -> bool {
        self.lightness.is_finite()
            && self.colorfulness.is_finite()
            && self.hue.is_finite()
            && (0.0..=100.0).contains(&self.lightness)
            && self.colorfulness >= 0.0
    }
}

/// A helical path through the uniform space between two endpoints, with a winding count giving
/// the number of extra full hue revolutions between them (negative counts wind the other way).
/// Sampling builds the naive helix and then runs the uniformization pass; see the module
/// documentation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HelixPath {
    start: HelixEndpoint,
    end: HelixEndpoint,
    winding_count: i32,
}

impl HelixPath {
    /// Validates the endpoints and constructs the path.
    /// # Errors
    /// Returns `CmapError::InvalidEndpoint` if either endpoint has a non-finite component, a
    /// lightness outside [0, 100], or a negative colorfulness.
    pub fn new(
        start: HelixEndpoint,
        end: HelixEndpoint,
        winding_count: i32,
    ) -> Result<HelixPath, CmapError> {
        if !start.in_domain() || !end.in_domain() {
            return Err(CmapError::InvalidEndpoint);
        }
        Ok(HelixPath {
            start,
            end,
            winding_count,
        })
    }

    /// The naive parameterization: UCS lightness and chroma ramp linearly, and the hue angle (in
    /// radians) ramps linearly from the start hue to the end hue plus the winding turns.
    fn naive_ramps(&self, num_points: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let lightness = linspace(
            lightness_to_ucs(self.start.lightness),
            lightness_to_ucs(self.end.lightness),
            num_points,
        );
        let chroma = linspace(
            colorfulness_to_ucs(self.start.colorfulness),
            colorfulness_to_ucs(self.end.colorfulness),
            num_points,
        );
        let angles = linspace(
            self.start.hue.to_radians(),
            self.end.hue.to_radians() + TAU * f64::from(self.winding_count),
            num_points,
        );
        (lightness, chroma, angles)
    }
}

impl UniformPath for HelixPath {
    fn sample(&self, num_points: usize) -> Vec<Coord> {
        let (lightness, chroma, mut angles) = self.naive_ramps(num_points);
        if num_points > 2 {
            angles = equalize_steps(&lightness, &chroma, &angles);
        }
        lightness
            .iter()
            .zip(chroma.iter())
            .zip(angles.iter())
            .map(|((&jj, &mm), &hue)| {
                let (sin, cos) = hue.sin_cos();
                Coord {
                    x: jj,
                    y: mm * cos,
                    z: mm * sin,
                }
            })
            .collect()
    }
}

/// Builds a colormap with [`DEFAULT_NUM_POINTS`] control points along a uniformized helix between
/// the two endpoints, winding the hue through `winding_count` extra full revolutions. For a
/// different resolution, use [`HelixPath::new`] with [`UniformPath::to_colormap`] directly.
///
/// The uniformization solve converges to a local optimum; if it stops at its iteration cap
/// instead, the best iterate is used and a warning is logged, so the returned colormap is always
/// usable (merely near-uniform rather than exactly uniform).
///
/// # Errors
/// Returns `CmapError::InvalidEndpoint` if either endpoint is out of domain; see
/// [`HelixPath::new`].
///
/// # Example
/// ```
/// # use viridian::helix::{helix_uniform, HelixEndpoint};
/// let cmap = helix_uniform(
///     HelixEndpoint::new(15.0, 30.0, 50.0),
///     HelixEndpoint::new(85.0, 30.0, 310.0),
///     1,
///     "corkscrew",
/// ).unwrap();
/// assert_eq!(cmap.len(), 1024);
/// ```
pub fn helix_uniform(
    start: HelixEndpoint,
    end: HelixEndpoint,
    winding_count: i32,
    name: &str,
) -> Result<Colormap, CmapError> {
    HelixPath::new(start, end, winding_count)?.to_colormap(name, DEFAULT_NUM_POINTS)
}

/// The Euclidean lengths of the steps between consecutive helix points, reconstructed from the
/// cylindrical ramps: the `i`th length spans (J′, M′·cos h, M′·sin h) at indices `i` and `i + 1`.
fn step_lengths(lightness: &[f64], chroma: &[f64], angles: &[f64]) -> Vec<f64> {
    (0..angles.len() - 1)
        .map(|i| {
            let delta_a = chroma[i + 1] * angles[i + 1].cos() - chroma[i] * angles[i].cos();
            let delta_b = chroma[i + 1] * angles[i + 1].sin() - chroma[i] * angles[i].sin();
            (lightness[i + 1] - lightness[i]).hypot(delta_a.hypot(delta_b))
        })
        .collect()
}

/// Splices the fixed endpoint angles around an interior-angle vector.
fn with_endpoints(first: f64, interior: &[f64], last: f64) -> Vec<f64> {
    let mut angles = Vec::with_capacity(interior.len() + 2);
    angles.push(first);
    angles.extend_from_slice(interior);
    angles.push(last);
    angles
}

/// The uniformization pass: re-optimizes the interior hue angles so the step lengths come out as
/// equal as the bounds allow, returning the full angle vector with its endpoints untouched.
///
/// The residual vector is the step lengths minus their mean, so driving it to zero makes every
/// step the same length. Each step length depends only on the two angles at its ends, which gives
/// the residuals a two-band Jacobian: the derivative of step `k` with respect to angle `k` is
/// M′(k)·M′(k+1)·sin(θ(k) − θ(k+1)) / d(k), and with respect to angle `k + 1` the same magnitude
/// with opposite sign. The mean couples every residual to every angle too, but the residuals sum
/// to zero by construction, so dropping the mean's derivative leaves the gradient Jᵀr exact;
/// only the curvature estimate is approximate.
fn equalize_steps(lightness: &[f64], chroma: &[f64], angles: &[f64]) -> Vec<f64> {
    let num_points = angles.len();
    let first = angles[0];
    let last = angles[num_points - 1];
    let interior = &angles[1..num_points - 1];

    let residuals = |interior_angles: &[f64]| -> Vec<f64> {
        let full = with_endpoints(first, interior_angles, last);
        let lengths = step_lengths(lightness, chroma, &full);
        let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
        lengths.into_iter().map(|d| d - mean).collect()
    };

    let jacobian = |interior_angles: &[f64]| -> TwoBandJacobian {
        let full = with_endpoints(first, interior_angles, last);
        let lengths = step_lengths(lightness, chroma, &full);
        let n = interior_angles.len();
        let mut diag = vec![0.0; n];
        let mut sub = vec![0.0; n];
        for j in 0..n {
            // unknown j is the angle at index j + 1; it ends step j and starts step j + 1
            diag[j] = partial(chroma, &full, &lengths, j + 1, j);
            sub[j] = partial(chroma, &full, &lengths, j + 1, j + 1);
        }
        TwoBandJacobian { diag, sub }
    };

    let lower: Vec<f64> = interior.iter().map(|&h| h - MAX_HUE_DEVIATION).collect();
    let upper: Vec<f64> = interior.iter().map(|&h| h + MAX_HUE_DEVIATION).collect();
    let sparsity = BandSparsity::two_band(num_points - 1, num_points - 2);
    let solution = solve_bounded(
        interior,
        &lower,
        &upper,
        &sparsity,
        residuals,
        jacobian,
        &SolverOptions::default(),
    );
    if !solution.converged {
        warn!(
            "helix uniformization stopped after {} iterations without converging; \
             using the best iterate found",
            solution.iterations
        );
    }
    with_endpoints(first, &solution.x, last)
}

/// The derivative of step length `step` with respect to the angle at index `angle`, which must be
/// one of the step's two ends. Zero-length steps contribute a zero derivative rather than a
/// division by zero (they occur when both endpoints coincide, e.g. on the neutral axis).
fn partial(chroma: &[f64], angles: &[f64], lengths: &[f64], angle: usize, step: usize) -> f64 {
    debug_assert!(angle == step || angle == step + 1);
    if lengths[step] == 0.0 {
        return 0.0;
    }
    let other = if angle == step { step + 1 } else { step };
    chroma[step] * chroma[step + 1] * (angles[angle] - angles[other]).sin() / lengths[step]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_std(values: &[f64]) -> f64 {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64).sqrt()
    }

    fn point_steps(points: &[Coord]) -> Vec<f64> {
        points
            .windows(2)
            .map(|pair| pair[0].euclidean_distance(&pair[1]))
            .collect()
    }

    #[test]
    fn test_rejects_out_of_domain_endpoints() {
        let good = HelixEndpoint::new(50.0, 20.0, 90.0);
        let cases = [
            HelixEndpoint::new(f64::NAN, 20.0, 90.0),
            HelixEndpoint::new(50.0, f64::INFINITY, 90.0),
            HelixEndpoint::new(50.0, 20.0, f64::NAN),
            HelixEndpoint::new(-3.0, 20.0, 90.0),
            HelixEndpoint::new(120.0, 20.0, 90.0),
            HelixEndpoint::new(50.0, -1.0, 90.0),
        ];
        for &bad in &cases {
            assert_eq!(
                HelixPath::new(bad, good, 0).unwrap_err(),
                CmapError::InvalidEndpoint
            );
            assert_eq!(
                HelixPath::new(good, bad, 0).unwrap_err(),
                CmapError::InvalidEndpoint
            );
        }
        assert!(HelixPath::new(good, good, 0).is_ok());
    }

    #[test]
    fn test_colormap_shape() {
        let cmap = helix_uniform(
            HelixEndpoint::new(15.0, 25.0, 30.0),
            HelixEndpoint::new(85.0, 25.0, 200.0),
            0,
            "twist",
        )
        .unwrap();
        assert_eq!(cmap.len(), 1024);
        assert_eq!(cmap.name(), "twist");
        assert_eq!(cmap.points()[0].0, 0.0);
        assert_eq!(cmap.points()[1023].0, 1.0);
        assert!(cmap.points().windows(2).all(|w| w[0].0 < w[1].0));
        assert!(cmap.points().iter().all(|&(_, c)| c.is_displayable()));
    }

    #[test]
    fn test_grayscale_ramp_is_a_straight_line() {
        // a pure neutral ramp: no chroma, no hue sweep, so the helix degenerates to a straight
        // lightness ramp whose steps are already equal without the optimizer touching anything
        let path = HelixPath::new(
            HelixEndpoint::new(10.0, 0.0, 0.0),
            HelixEndpoint::new(90.0, 0.0, 0.0),
            0,
        )
        .unwrap();
        let points = path.sample(5);
        assert_eq!(points.len(), 5);
        for pair in points.windows(2) {
            assert!(pair[0].x < pair[1].x);
        }
        for point in &points {
            assert!(point.y.abs() <= 1e-12);
            assert!(point.z.abs() <= 1e-12);
        }
        let steps = point_steps(&points);
        assert!(sample_std(&steps) <= 1e-9);
        // and the rendered colors are a near-neutral ramp
        let cmap = path.to_colormap("grays", 5).unwrap();
        for &(_, color) in cmap.points() {
            assert!((color.r - color.g).abs() <= 0.02);
            assert!((color.g - color.b).abs() <= 0.02);
        }
    }

    #[test]
    fn test_constant_hue_needs_no_optimization() {
        // equal hues and zero windings: the residuals start at zero, so the optimized angles are
        // the naive ones
        let path = HelixPath::new(
            HelixEndpoint::new(20.0, 40.0, 140.0),
            HelixEndpoint::new(80.0, 10.0, 140.0),
            0,
        )
        .unwrap();
        let (lightness, chroma, naive) = path.naive_ramps(9);
        let optimized = equalize_steps(&lightness, &chroma, &naive);
        for (a, b) in naive.iter().zip(optimized.iter()) {
            assert!((a - b).abs() <= 1e-6);
        }
        let steps = step_lengths(&lightness, &chroma, &optimized);
        assert!(sample_std(&steps) <= 1e-9);
    }

    #[test]
    fn test_uniformization_reduces_step_spread() {
        // unequal endpoint chroma: the naive helix takes wide sideways steps where the path is
        // vivid and narrow ones near the neutral axis, so there is real spread to remove
        let path = HelixPath::new(
            HelixEndpoint::new(20.0, 5.0, 0.0),
            HelixEndpoint::new(80.0, 50.0, 260.0),
            1,
        )
        .unwrap();
        let (lightness, chroma, naive) = path.naive_ramps(32);
        let naive_steps = step_lengths(&lightness, &chroma, &naive);
        let optimized = equalize_steps(&lightness, &chroma, &naive);
        let optimized_steps = step_lengths(&lightness, &chroma, &optimized);
        assert!(sample_std(&optimized_steps) < sample_std(&naive_steps));
    }

    #[test]
    fn test_optimized_angles_respect_deviation_bound() {
        let path = HelixPath::new(
            HelixEndpoint::new(10.0, 45.0, 20.0),
            HelixEndpoint::new(90.0, 5.0, 20.0),
            2,
        )
        .unwrap();
        let (lightness, chroma, naive) = path.naive_ramps(24);
        let optimized = equalize_steps(&lightness, &chroma, &naive);
        assert_eq!(optimized[0], naive[0]);
        assert_eq!(optimized[23], naive[23]);
        for (n, o) in naive.iter().zip(optimized.iter()) {
            assert!((n - o).abs() <= MAX_HUE_DEVIATION + 1e-12);
        }
    }

    #[test]
    fn test_two_point_helix_skips_the_solve() {
        let path = HelixPath::new(
            HelixEndpoint::new(30.0, 20.0, 0.0),
            HelixEndpoint::new(70.0, 20.0, 180.0),
            0,
        )
        .unwrap();
        let points = path.sample(2);
        assert_eq!(points.len(), 2);
        let cmap = path.to_colormap("pair", 2).unwrap();
        assert_eq!(cmap.len(), 2);
    }

    #[test]
    fn test_negative_winding_sweeps_backwards() {
        let path = HelixPath::new(
            HelixEndpoint::new(30.0, 20.0, 90.0),
            HelixEndpoint::new(70.0, 20.0, 90.0),
            -1,
        )
        .unwrap();
        let (_, _, angles) = path.naive_ramps(5);
        assert!(angles.windows(2).all(|w| w[1] < w[0]));
        assert!((angles[0] - angles[4] - TAU).abs() <= 1e-12);
    }

    #[test]
    fn test_idempotent_construction() {
        let start = HelixEndpoint::new(25.0, 35.0, 10.0);
        let end = HelixEndpoint::new(75.0, 15.0, 300.0);
        let first = helix_uniform(start, end, 1, "twice").unwrap();
        let second = helix_uniform(start, end, 1, "twice").unwrap();
        assert_eq!(first, second);
    }
}
