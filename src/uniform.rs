//! This module is the boundary between Viridian and color-appearance math: a bidirectional,
//! batch-oriented mapping between device RGB and a perceptually uniform coordinate triple. The
//! uniform space is CAM16-UCS, reached through the [`palette`] crate: sRGB → linear RGB → XYZ →
//! CAM16 lightness/colorfulness/hue under fixed viewing conditions, then the UCS rescalings that
//! turn appearance correlates into coordinates whose Euclidean distances approximate perceived
//! color difference. Everything downstream treats the conversion as a black box; the generators
//! only ever see [`Coord`] values (J′ on x, the opponent pair a′ and b′ on y and z).
//!
//! The inverse direction is deliberately unclamped. Uniform-space paths leave the displayable
//! gamut all the time, and it is the caller's job (the shared colormap finalizer) to clip the
//! resulting RGB components, so nothing here hides that overshoot.

use std::f64::consts::PI;

use palette::cam16::{BakedParameters, Cam16Jmh, Parameters, StaticWp};
use palette::convert::IntoColorUnclamped;
use palette::white_point::D65;
use palette::{IntoColor, LinSrgb, Srgb, Xyz};

use color::RGBColor;
use coord::Coord;

/// Compression constant of the UCS lightness rescaling.
const UCS_C1: f64 = 0.007;
/// Compression constant of the UCS colorfulness rescaling.
const UCS_C2: f64 = 0.0228;

lazy_static! {
    /// Viewing conditions for a self-luminous sRGB display in a dim room: adapting luminance
    /// 64/π · 0.2 cd/m², 20% background, average surround, D65 white. Baked once since every
    /// conversion in the crate shares them.
    static ref VIEWING_CONDITIONS: BakedParameters<StaticWp<D65>, f64> = {
        let adapting_luminance = 64.0 / PI * 0.2;
        Parameters::default_static_wp(adapting_luminance).bake()
    };
}

/// Rescales a CAM16 lightness J into the UCS lightness J′. The transform is compressive: it
/// stretches dark values apart and squeezes bright ones together, and maps 0 to 0 and 100 to 100.
pub fn lightness_to_ucs(lightness: f64) -> f64 {
    (1.0 + 100.0 * UCS_C1) * lightness / (1.0 + UCS_C1 * lightness)
}

/// The inverse of [`lightness_to_ucs`]: recovers CAM16 lightness J from UCS lightness J′.
pub fn ucs_to_lightness(lightness: f64) -> f64 {
    lightness / (1.0 + 100.0 * UCS_C1 - UCS_C1 * lightness)
}

/// Rescales a CAM16 colorfulness M into the UCS colorfulness M′ using a logarithmic transform
/// that tames the very large steps CAM16 reports between vivid colors. Maps 0 to 0.
pub fn colorfulness_to_ucs(colorfulness: f64) -> f64 {
    (1.0 + UCS_C2 * colorfulness).ln() / UCS_C2
}

/// The inverse of [`colorfulness_to_ucs`]: recovers CAM16 colorfulness M from UCS M′.
pub fn ucs_to_colorfulness(colorfulness: f64) -> f64 {
    ((UCS_C2 * colorfulness).exp() - 1.0) / UCS_C2
}

/// Converts a batch of device colors to perceptually uniform points. Input components are expected
/// in [0, 1]; the output coordinates are (J′, a′, b′) with a′ = M′·cos h and b′ = M′·sin h.
pub fn to_uniform(colors: &[RGBColor]) -> Vec<Coord> {
    colors
        .iter()
        .map(|color| {
            let xyz: Xyz<D65, f64> = Srgb::new(color.r, color.g, color.b)
                .into_linear()
                .into_color();
            let jmh = Cam16Jmh::from_xyz(xyz, *VIEWING_CONDITIONS);
            let chroma = colorfulness_to_ucs(jmh.colorfulness);
            let (sin, cos) = jmh.hue.into_radians().sin_cos();
            Coord {
                x: lightness_to_ucs(jmh.lightness),
                y: chroma * cos,
                z: chroma * sin,
            }
        })
        .collect()
}

/// Converts a batch of perceptually uniform points back to device colors. The output is
/// unclamped: points outside the displayable gamut produce components outside [0, 1], and
/// degenerate points can produce non-finite components, both of which [`RGBColor::clip`]
/// normalizes.
pub fn from_uniform(points: &[Coord]) -> Vec<RGBColor> {
    points
        .iter()
        .map(|point| {
            let chroma = point.z.hypot(point.y);
            let hue = point.z.atan2(point.y).to_degrees();
            let jmh = Cam16Jmh::new(
                ucs_to_lightness(point.x),
                ucs_to_colorfulness(chroma),
                hue,
            );
            let xyz = jmh.into_xyz(*VIEWING_CONDITIONS);
            let linear: LinSrgb<f64> = xyz.into_color_unclamped();
            let srgb = Srgb::from_linear(linear);
            RGBColor {
                r: srgb.red,
                g: srgb.green,
                b: srgb.blue,
            }
        })
        .collect()
}
