//! Viridian is a library for building perceptually uniform colormaps: gradients for scientific
//! visualization in which equal steps of the 0-to-1 parameter correspond, as closely as possible,
//! to equal perceived changes in color. The underlying philosophy is that uniformity shouldn't be
//! something you check after the fact with a lightness plot: colormaps here are *constructed* in a
//! perceptually uniform space (CAM16-UCS), so evenness is a property of the algorithm rather than
//! an accident of well-chosen colors. Two strategies are provided: pin down anchor colors and
//! interpolate between them through the uniform space ([`segment::segment_uniform`]), or sweep a
//! helix between two endpoints and let a bounded least-squares solve redistribute the hue angles
//! until every step is the same perceptual length ([`helix::helix_uniform`]).
//!
//! ```
//! use viridian::prelude::*;
//!
//! let mut registry = CmapRegistry::new();
//! let cmap = helix_uniform(
//!     HelixEndpoint::new(10.0, 30.0, 40.0),
//!     HelixEndpoint::new(90.0, 30.0, 300.0),
//!     0,
//!     "sunrise",
//! ).unwrap();
//! registry.register(cmap);
//! let mid = registry.get("sunrise").unwrap().sample(0.5);
//! assert!(mid.is_displayable());
//! ```

#![doc(html_root_url = "https://docs.rs/viridian/0.1.0")]
// we don't mess around with documentation
#![deny(missing_docs)]

extern crate num;
extern crate palette;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod color;
pub mod colormap;
pub mod coord;
pub mod helix;
pub mod least_squares;
pub mod prelude;
pub mod registry;
pub mod segment;
pub mod uniform;
