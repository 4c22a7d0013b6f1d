/// EPSG code type alias
pub type EpsgCode = u16;

/// RGF93 / Lambert-93 (EPSG:2154), the projected CRS all plot rasters are
/// written in.
pub const EPSG_LAMBERT_93: EpsgCode = 2154;
