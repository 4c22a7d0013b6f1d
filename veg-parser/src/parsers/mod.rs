use std::path::Path;

use veg_core::pointcloud::point::PointCloud;

use crate::error::ParseError;

pub mod csv;
pub mod las;

pub trait ParserProvider {
    fn get_parser(&self) -> Box<dyn Parser>;
}

pub trait Parser {
    fn parse(&self) -> Result<PointCloud, ParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Las,
    Laz,
    Csv,
    Txt,
}

pub fn get_extension(ext: &str) -> Option<Extension> {
    match ext.to_lowercase().as_str() {
        "las" => Some(Extension::Las),
        "laz" => Some(Extension::Laz),
        "csv" => Some(Extension::Csv),
        "txt" => Some(Extension::Txt),
        _ => None,
    }
}

/// File stem used as the plot identifier and as the anomaly-rule key.
pub fn plot_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}
