//! This module contains a struct, [`Coord`](coord::Coord), that models a point in a 3D coordinate
//! space and supports limited math with scalars and other points. Viridian uses it to unify math
//! that treats colors as geometry: a `Coord` is how a perceptually uniform point (a lightness axis
//! and two opponent-chroma axes) is passed around, and it is also the common currency for blending
//! device colors during colormap lookup.

use std::ops::{Add, Div, Mul, Sub};
use num;
use num::{Num, NumCast};

/// Represents a scalar value that can be easily converted, described using the common numeric traits
/// in [`num`]. Anything that falls under this category can be multiplied by a [`Coord`] to scale
/// it. This has no added functionality: it's just for convenience.
pub trait Scalar: NumCast + Num {}

impl<T: NumCast + Num> Scalar for T {}

/// A point in 3D space. Supports the common arithmetic operations the rest of Viridian needs.
/// `Coord` has three axes, denoted `x`, `y`, and `z`. These are not any different in any method of
/// `Coord`, so the distinction between them is completely conventional. In Viridian, a perceptually
/// uniform point maps its lightness-like coordinate J′ to the x-axis and its two opponent-chroma
/// coordinates a′ and b′ to the y- and z-axes, in that order, so that Euclidean distance between
/// two such points approximates how different the two colors look.
///
/// # Examples
/// ```
/// # use viridian::coord::Coord;
/// let point_1 = Coord{x: 1., y: 8., z: 7.};
/// let point_2 = Coord{x: 7., y: 2., z: 3.};
/// // Add two points together to do componentwise addition.
/// let sum = point_1 + point_2;  // the point (8, 10, 10)
/// // Subtract two points the same way.
/// let diff = point_1 - point_2;  // the point (-6, 6, 4)
/// // There is no multiplication of two points, because there are many different ways to
/// // conceptualize multiplying two points and Viridian doesn't need it. Instead, it supports
/// // scalar multiplication and division. This has the unfortunate side effect of not allowing
/// // multiplication one way.
/// let prod = point_1 * 2u8; // the point (2, 16, 14)
/// // switching the above operands' order would cause an error!
/// let quot = point_1 / 2.; // the point (0.5, 4, 3.5)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coord {
    /// The first axis.
    pub x: f64,
    /// The second axis.
    pub y: f64,
    /// The third axis.
    pub z: f64,
}

// Addition and subtraction, as well as division and multiplication by scalars. The multiplication
// of points by points in 3D space has conflicting definitions, so it stays unimplemented: it's
// unclear what even the return type should be.
impl Add for Coord {
    type Output = Coord;
    fn add(self, rhs: Coord) -> Coord {
        Coord {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

/// This is a perfect analogue to numbers: for any Coords c1, c2, and c3 with the same type, c1 + c2 =
/// c3 implies c3 - c2 = c1 and c3 - c1 = c2, down to floating point error if that exists.
impl Sub for Coord {
    type Output = Coord;
    fn sub(self, rhs: Coord) -> Coord {
        Coord {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

// This implements basic scalar multiplication and division: (a, b, c) * s = (sa, sb, sc) and
// similarly for division. This is unfortunately not commutative, but it'll do.
impl<U: Scalar> Mul<U> for Coord {
    type Output = Coord;
    fn mul(self, rhs: U) -> Coord {
        let r: f64 = num::cast(rhs).unwrap();
        Coord {
            x: self.x * r,
            y: self.y * r,
            z: self.z * r,
        }
    }
}

impl<U: Scalar> Div<U> for Coord {
    type Output = Coord;
    fn div(self, rhs: U) -> Coord {
        if rhs.is_zero() {
            panic!("Division by 0!");
        } else {
            let r: f64 = num::cast(rhs).unwrap();
            Coord {
                x: self.x / r,
                y: self.y / r,
                z: self.z / r,
            }
        }
    }
}

impl Coord {
    /// The weighted midpoint of two 3D points: a point on the line segment between them, placed so
    /// that a larger weight moves it toward the point calling the method and a smaller weight moves
    /// it toward the point being passed in. Very strange things may happen if the weight is not
    /// between 0 and 1. A weight of exactly 0 returns the other point and a weight of exactly 1
    /// returns this one.
    /// # Example
    /// ```
    /// # use viridian::coord::Coord;
    /// let point1 = Coord{x: 0.2, y: 0., z: 1.};
    /// let point2 = Coord{x: 1., y: 0.8, z: 1.};
    /// let mid = point1.weighted_midpoint(&point2, 0.25);
    /// // note how this is not 0.6 because the weight has shifted it towards the second point
    /// assert!((mid.x - 0.8).abs() <= 1e-10);
    /// assert!((mid.y - 0.6).abs() <= 1e-10);
    /// assert!((mid.z - 1.).abs() <= 1e-10);
    /// ```
    pub fn weighted_midpoint(&self, other: &Coord, weight: f64) -> Coord {
        *self * weight + *other * (1.0 - weight)
    }
    /// The Euclidean difference between two 3D points, defined as the square root of the sum of
    /// squares of differences in each axis. For arbitrary projections of colors into 3D space this
    /// is a poor analogue of perceptual difference, but in a perceptually uniform space it is the
    /// whole point: the step sizes the colormap generators equalize are exactly these distances
    /// between consecutive uniform-space points.
    /// # Example
    /// ```
    /// # use viridian::coord::Coord;
    /// let point1 = Coord{x: 0., y: 0., z: -1.};
    /// let point2 = Coord{x: 2., y: 3., z: 5.};
    /// let dist = point1.euclidean_distance(&point2);
    /// assert!((dist - 7.).abs() <= 1e-10);
    /// ```
    pub fn euclidean_distance(&self, other: &Coord) -> f64 {
        let diff = *self - *other;
        (diff.x * diff.x + diff.y * diff.y + diff.z * diff.z).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_midpoint_hits_endpoints() {
        let c1 = Coord {
            x: 24.1,
            y: -3.2,
            z: 0.8,
        };
        let c2 = Coord {
            x: 60.5,
            y: 12.0,
            z: -14.3,
        };
        assert_eq!(c1.weighted_midpoint(&c2, 1.0), c1);
        assert_eq!(c1.weighted_midpoint(&c2, 0.0), c2);
    }

    #[test]
    fn test_euclidean_distance_is_symmetric() {
        let c1 = Coord {
            x: 10.5,
            y: -45.0,
            z: 40.0,
        };
        let c2 = Coord {
            x: 54.2,
            y: 65.0,
            z: 100.0,
        };
        assert!((c1.euclidean_distance(&c2) - 132.70150715).abs() <= 1e-7);
        assert_eq!(c1.euclidean_distance(&c2), c2.euclidean_distance(&c1));
        assert_eq!(c1.euclidean_distance(&c1), 0.0);
    }
}
