//! This module defines [`RGBColor`], the display-referred color type that every colormap in
//! Viridian ultimately produces. Components are kept as floats in the nominal range [0, 1] rather
//! than as bytes: the generators do all of their real work in a perceptually uniform space, and the
//! inverse conversion back to RGB routinely lands slightly outside the displayable cube. Keeping
//! full precision until the final, explicit gamut clip avoids quantizing twice.

use std::fmt;

use coord::Coord;

/// A color in the sRGB space with each component expressed as a float, where 0 represents none of
/// that primary and 1 represents the most intense value displayable. Values outside of that range
/// can exist as intermediate results of uniform-space math, but they don't describe a real
/// displayable color until they have been clipped: see [`RGBColor::clip`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RGBColor {
    /// The red component, nominally in the range [0, 1].
    pub r: f64,
    /// The green component, nominally in the range [0, 1].
    pub g: f64,
    /// The blue component, nominally in the range [0, 1].
    pub b: f64,
}

impl RGBColor {
    /// Returns true if every component is finite and within the displayable range [0, 1]: in other
    /// words, if this value describes a color a monitor can actually show without modification.
    pub fn is_displayable(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    /// Clamps every component to the displayable range [0, 1]. This is gamut clipping: perceptually
    /// uniform paths routinely exit the real-color gamut at high chroma, and the inverse conversion
    /// then reports components below 0 or above 1, which simply snap to the nearest displayable
    /// value.
    ///
    /// The inverse conversion is not assumed to produce finite numbers either. A NaN component
    /// becomes 0, and an infinite component clamps to the bound it exceeds, so the result of `clip`
    /// is always displayable no matter what came out of the uniform-space math.
    ///
    /// # Example
    /// ```
    /// # use viridian::color::RGBColor;
    /// let too_vivid = RGBColor{r: 1.2, g: -0.01, b: 0.5};
    /// let clipped = too_vivid.clip();
    /// assert_eq!(clipped, RGBColor{r: 1.0, g: 0.0, b: 0.5});
    /// assert!(clipped.is_displayable());
    /// ```
    pub fn clip(self) -> RGBColor {
        fn clip_component(c: f64) -> f64 {
            if c.is_nan() {
                0.0
            } else {
                c.max(0.0).min(1.0)
            }
        }
        RGBColor {
            r: clip_component(self.r),
            g: clip_component(self.g),
            b: clip_component(self.b),
        }
    }

    /// Returns the color as a tuple of bytes in the range 0-255, clipping first so that the result
    /// is always valid. Rounds to the nearest byte value.
    pub fn int_rgb_tup(&self) -> (u8, u8, u8) {
        let clipped = self.clip();
        (
            (clipped.r * 255.0).round() as u8,
            (clipped.g * 255.0).round() as u8,
            (clipped.b * 255.0).round() as u8,
        )
    }
}

/// Displays the color as an uppercase hex code, e.g. `#FF0077`, clipping beforehand so the output
/// is always a well-formed displayable color.
impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (r, g, b) = self.int_rgb_tup();
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

/// Constructs a color from bytes in the range 0-255, the most common way colors appear in the
/// wild.
impl From<(u8, u8, u8)> for RGBColor {
    fn from(rgb: (u8, u8, u8)) -> RGBColor {
        let (r, g, b) = rgb;
        RGBColor {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
        }
    }
}

impl From<Coord> for RGBColor {
    fn from(c: Coord) -> RGBColor {
        RGBColor {
            r: c.x,
            g: c.y,
            b: c.z,
        }
    }
}

impl From<RGBColor> for Coord {
    fn from(c: RGBColor) -> Coord {
        Coord {
            x: c.r,
            y: c.g,
            z: c.b,
        }
    }
}
