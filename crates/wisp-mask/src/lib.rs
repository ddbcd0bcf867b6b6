//! Wisp Mask - where particles are allowed to spawn
//!
//! Two interchangeable ways of describing a spawn region:
//! - `PixelMask` rasterizes an image into an offscreen bitmap once and keeps every
//!   non-transparent pixel as a candidate spawn point
//! - `ShapeRegion` keeps vector shapes (from SVG or TOML) and rejection-samples points
//!   on demand
//!
//! SVG masks are rasterized with `resvg`; SVG shape documents are read with `roxmltree`.

mod pixel;
mod region;
mod shape;
mod svg;

pub use pixel::{ImageSource, PixelMask};
pub use region::{ShapeDocument, ShapeRegion, ViewBox, DEFAULT_MAX_ATTEMPTS};
pub use shape::{Bounds, FillRule, Shape};
