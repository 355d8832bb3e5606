//! This module simply brings the most common Viridian functionality under a single namespace, to
//! prevent excessive imports: the two generator entry points and their path types, the colormap
//! and color value types, the error enum, and the registration machinery. The lower-level pieces
//! — the uniform-space adapter and the bounded least-squares solver — are deliberately left out;
//! pull those in from their own modules when you need them.

pub use color::RGBColor;
pub use colormap::{Colormap, CmapError, UniformPath, DEFAULT_NUM_POINTS};
pub use coord::Coord;
pub use helix::{helix_uniform, HelixEndpoint, HelixPath};
pub use registry::{CmapRegistry, ColormapSink};
pub use segment::{segment_uniform, AnchorPath};
