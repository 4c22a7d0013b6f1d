use std::collections::HashMap;
use std::path::PathBuf;

use csv::ReaderBuilder;

use veg_core::crs::EpsgCode;
use veg_core::pointcloud::point::{Color, Point, PointAttributes, PointCloud};

use crate::error::ParseError;
use crate::filter::AnomalyFilter;

use super::{plot_stem, Parser, ParserProvider};

pub struct CsvParserProvider {
    pub filename: PathBuf,
    pub epsg: EpsgCode,
    pub filter: AnomalyFilter,
}

impl ParserProvider for CsvParserProvider {
    fn get_parser(&self) -> Box<dyn Parser> {
        Box::new(CsvParser {
            filename: self.filename.clone(),
            epsg: self.epsg,
            filter: self.filter.clone(),
        })
    }
}

pub struct CsvParser {
    pub filename: PathBuf,
    pub epsg: EpsgCode,
    pub filter: AnomalyFilter,
}

const COLUMNS: [&str; 9] = [
    "x",
    "y",
    "z",
    "red",
    "green",
    "blue",
    "nir",
    "intensity",
    "return_number",
];

impl Parser for CsvParser {
    fn parse(&self) -> Result<PointCloud, ParseError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.filename)
            .map_err(|source| ParseError::Csv {
                path: self.filename.clone(),
                source,
            })?;

        let headers = reader.headers().map_err(|source| ParseError::Csv {
            path: self.filename.clone(),
            source,
        })?;
        let mapping = create_column_mapping(&self.filename, headers)?;

        let stem = plot_stem(&self.filename);
        let mut points = Vec::new();

        for record in reader.records() {
            let record = record.map_err(|source| ParseError::Csv {
                path: self.filename.clone(),
                source,
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let x = self.required_field(&record, &mapping, "x", line)?;
            let y = self.required_field(&record, &mapping, "y", line)?;
            let z = self.required_field(&record, &mapping, "z", line)?;

            let color = Color {
                r: self.optional_field(&record, &mapping, "red", line)?.unwrap_or(0),
                g: self.optional_field(&record, &mapping, "green", line)?.unwrap_or(0),
                b: self.optional_field(&record, &mapping, "blue", line)?.unwrap_or(0),
            };

            let attributes = PointAttributes {
                nir: self.optional_field(&record, &mapping, "nir", line)?,
                intensity: self.optional_field(&record, &mapping, "intensity", line)?,
                return_number: self.optional_field(&record, &mapping, "return_number", line)?,
            };

            let point = Point::new(x, y, z, color, attributes);
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

impl CsvParser {
    fn required_field(
        &self,
        record: &csv::StringRecord,
        mapping: &HashMap<&'static str, usize>,
        column: &'static str,
        line: u64,
    ) -> Result<f64, ParseError> {
        let value = get_field_value(record, mapping, column).ok_or(ParseError::MissingColumn {
            path: self.filename.clone(),
            column,
        })?;
        value.trim().parse().map_err(|_| ParseError::InvalidValue {
            path: self.filename.clone(),
            column,
            line,
        })
    }

    fn optional_field<T: std::str::FromStr>(
        &self,
        record: &csv::StringRecord,
        mapping: &HashMap<&'static str, usize>,
        column: &'static str,
        line: u64,
    ) -> Result<Option<T>, ParseError> {
        match get_field_value(record, mapping, column) {
            Some(value) if !value.trim().is_empty() => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ParseError::InvalidValue {
                    path: self.filename.clone(),
                    column,
                    line,
                }),
            _ => Ok(None),
        }
    }
}

fn create_column_mapping(
    path: &std::path::Path,
    headers: &csv::StringRecord,
) -> Result<HashMap<&'static str, usize>, ParseError> {
    let mut mapping = HashMap::new();

    for (index, header) in headers.iter().enumerate() {
        let normalized_header = header.to_lowercase().replace(['_', '-'], "");
        for column in COLUMNS {
            let normalized_column = column.replace('_', "");
            if normalized_header == normalized_column {
                mapping.insert(column, index);
                break;
            }
        }
    }

    for column in ["x", "y", "z"] {
        if !mapping.contains_key(column) {
            return Err(ParseError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    Ok(mapping)
}

fn get_field_value<'a>(
    record: &'a csv::StringRecord,
    mapping: &HashMap<&'static str, usize>,
    column: &str,
) -> Option<&'a str> {
    mapping.get(column).and_then(|&index| record.get(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_full_record() {
        let file = write_temp_csv(
            "x,y,z,red,green,blue,nir,intensity,return_number\n\
             1.5,2.5,10.0,100,200,300,400,50,1\n\
             2.0,3.0,11.0,,,,,,\n",
        );
        let parser = CsvParser {
            filename: file.path().to_path_buf(),
            epsg: 2154,
            filter: AnomalyFilter::new(),
        };

        let cloud = parser.parse().unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.points[0].x, 1.5);
        assert_eq!(cloud.points[0].color.g, 200);
        assert_eq!(cloud.points[0].attributes.nir, Some(400));
        assert_eq!(cloud.points[0].attributes.return_number, Some(1));
        assert_eq!(cloud.points[1].attributes.intensity, None);
        assert_eq!(cloud.points[1].color.r, 0);
    }

    #[test]
    fn header_names_are_matched_loosely() {
        let file = write_temp_csv("X,Y,Z,Return-Number\n0.0,1.0,2.0,2\n");
        let parser = CsvParser {
            filename: file.path().to_path_buf(),
            epsg: 2154,
            filter: AnomalyFilter::new(),
        };

        let cloud = parser.parse().unwrap();
        assert_eq!(cloud.points[0].attributes.return_number, Some(2));
    }

    #[test]
    fn missing_coordinate_column_is_an_error() {
        let file = write_temp_csv("x,y\n0.0,1.0\n");
        let parser = CsvParser {
            filename: file.path().to_path_buf(),
            epsg: 2154,
            filter: AnomalyFilter::new(),
        };

        match parser.parse() {
            Err(ParseError::MissingColumn { column, .. }) => assert_eq!(column, "z"),
            Err(other) => panic!("expected MissingColumn, got {other:?}"),
            Ok(_) => panic!("expected MissingColumn, got a cloud"),
        }
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = write_temp_csv("x,y,z\n");
        let parser = CsvParser {
            filename: file.path().to_path_buf(),
            epsg: 2154,
            filter: AnomalyFilter::new(),
        };

        assert!(matches!(parser.parse(), Err(ParseError::EmptyCloud { .. })));
    }
}
