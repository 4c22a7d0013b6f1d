use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

use veg_core::crs::EpsgCode;

use crate::error::RasterError;
use crate::geotransform::GeoTransform;
use crate::stratum::StratumRasters;

/// GDAL's nodata marker tag, not part of the baseline TIFF tag set.
const TAG_GDAL_NODATA: u16 = 42113;

/// Writes all bands as 32-bit float grayscale directories of a single TIFF,
/// each directory carrying the pixel scale, tie point, and projected CRS
/// geo-keys. An existing file at `path` is replaced.
pub fn write_geotiff(
    path: &Path,
    rasters: &StratumRasters,
    geo: &GeoTransform,
    epsg: EpsgCode,
) -> Result<(), RasterError> {
    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;

    let size = rasters.grid_size as u32;
    let (origin_x, origin_y) = geo.origin();
    let pixel_scale = [geo.pixel_width(), -geo.pixel_height(), 0.0];
    let tie_point = [0.0, 0.0, 0.0, origin_x, origin_y, 0.0];
    let geo_keys = geo_key_directory(epsg);

    for band in &rasters.bands {
        let mut image = encoder.new_image::<colortype::Gray32Float>(size, size)?;
        image.encoder().write_tag(Tag::ImageDescription, band.name)?;
        image
            .encoder()
            .write_tag(Tag::ModelPixelScaleTag, &pixel_scale[..])?;
        image
            .encoder()
            .write_tag(Tag::ModelTiepointTag, &tie_point[..])?;
        image
            .encoder()
            .write_tag(Tag::GeoKeyDirectoryTag, &geo_keys[..])?;
        image
            .encoder()
            .write_tag(Tag::Unknown(TAG_GDAL_NODATA), "nan")?;
        image.write_data(&band.data)?;
    }

    Ok(())
}

/// Minimal GeoTIFF key directory: version header, then {model type =
/// projected, raster type = pixel-is-area, projected CRS = `epsg`}.
fn geo_key_directory(epsg: EpsgCode) -> [u16; 16] {
    [
        1, 1, 0, 3, //
        1024, 0, 1, 1, //
        1025, 0, 1, 1, //
        3072, 0, 1, epsg,
    ]
}
