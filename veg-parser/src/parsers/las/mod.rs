use std::path::PathBuf;

use las::Reader;

use veg_core::crs::EpsgCode;
use veg_core::pointcloud::point::{Color, Point, PointAttributes, PointCloud};

use crate::error::ParseError;
use crate::filter::AnomalyFilter;

use super::{plot_stem, Parser, ParserProvider};

pub struct LasParserProvider {
    pub filename: PathBuf,
    pub epsg: EpsgCode,
    pub filter: AnomalyFilter,
}

impl ParserProvider for LasParserProvider {
    fn get_parser(&self) -> Box<dyn Parser> {
        Box::new(LasParser {
            filename: self.filename.clone(),
            epsg: self.epsg,
            filter: self.filter.clone(),
        })
    }
}

pub struct LasParser {
    pub filename: PathBuf,
    pub epsg: EpsgCode,
    pub filter: AnomalyFilter,
}

impl Parser for LasParser {
    fn parse(&self) -> Result<PointCloud, ParseError> {
        let mut reader = Reader::from_path(&self.filename).map_err(|source| ParseError::Las {
            path: self.filename.clone(),
            source,
        })?;

        let stem = plot_stem(&self.filename);
        let mut points = Vec::new();

        for las_point in reader.points() {
            let las_point = las_point.map_err(|source| ParseError::Las {
                path: self.filename.clone(),
                source,
            })?;

            // The las crate already applies the header's scale and offset,
            // so coordinates arrive in meters.
            let color = las_point
                .color
                .map(|c| Color {
                    r: c.red,
                    g: c.green,
                    b: c.blue,
                })
                .unwrap_or_default();

            let attributes = PointAttributes {
                nir: las_point.nir,
                intensity: Some(las_point.intensity),
                return_number: Some(las_point.return_number),
            };

            let point = Point::new(las_point.x, las_point.y, las_point.z, color, attributes);

            if self.filter.keeps(&stem, &point) {
                points.push(point);
            }
        }

        if points.is_empty() {
            return Err(ParseError::EmptyCloud {
                path: self.filename.clone(),
            });
        }

        Ok(PointCloud::new(points, stem, self.epsg))
    }
}
