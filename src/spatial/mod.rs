// Spatial layer: loaded datasets as immutable context objects, plus the
// geometry queries run against them.

pub mod layers;
pub mod proximity;
pub mod raster;
pub mod regions;

pub use layers::{BorderLayer, FeatureLayer, Region, RegionLayer};
pub use raster::{AffineTransform, ElevationRaster};
