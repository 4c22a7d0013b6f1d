use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use glob::glob;
use log::LevelFilter;
use rayon::iter::{IntoParallelRefIterator as _, ParallelIterator as _};

use veg_core::crs::{EpsgCode, EPSG_LAMBERT_93};
use veg_parser::filter::AnomalyFilter;
use veg_parser::parsers::csv::CsvParserProvider;
use veg_parser::parsers::las::LasParserProvider;
use veg_parser::parsers::{get_extension, Extension, Parser as _, ParserProvider as _};
use veg_raster::geotiff::write_geotiff;
use veg_raster::{rasterize_plot, RasterizeOptions, StratumMode};
use veg_transformer::builder::{PlotPreprocessBuilder, TransformBuilder as _};
use veg_transformer::runner::{PointCloudTransformer, Transformer as _};

mod error;
mod predictions;

use error::PlotError;

#[derive(Parser, Debug)]
#[command(
    name = "vegcover",
    about = "Rasterizes per-point vegetation predictions of LiDAR plots into stratum coverage GeoTIFFs",
    version = "0.1.0"
)]
struct Cli {
    /// Input plot files (las/laz/csv/txt), globs allowed
    #[arg(short, long, required = true, num_args = 1.., value_name = "FILE")]
    input: Vec<String>,

    /// Directory holding one <plot>.csv prediction file per input plot
    #[arg(short, long, required = true, value_name = "DIR")]
    predictions: PathBuf,

    /// Output directory for the per-plot GeoTIFFs
    #[arg(short, long, required = true, value_name = "DIR")]
    output: PathBuf,

    /// Raster resolution in pixels per side
    #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u32).range(1..))]
    grid_size: u32,

    /// Neighborhood radius for ground-height detrending, in meters
    #[arg(long, default_value_t = 1.5)]
    radius: f64,

    /// Plot radius in meters, used to rescale planar coordinates
    #[arg(long, default_value_t = 10.0)]
    plot_radius: f64,

    /// Number of vegetation strata in the predictions (2 or 3)
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=3))]
    strata: u8,

    /// Renormalize the low-vegetation band against the soil channel
    #[arg(long)]
    normalize_ground: bool,

    /// Projected EPSG code stamped into the output rasters
    #[arg(long, default_value_t = EPSG_LAMBERT_93)]
    epsg: EpsgCode,
}

fn expand_globs(input_patterns: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in input_patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            for entry in glob(pattern).expect("Failed to read glob pattern") {
                match entry {
                    Ok(path) => paths.push(path),
                    Err(e) => log::warn!("skipping unreadable glob entry: {:?}", e),
                }
            }
        } else {
            paths.push(PathBuf::from(pattern));
        }
    }
    paths
}

struct PlotSummary {
    stem: String,
    point_count: usize,
    coverages: Vec<(&'static str, f32)>,
    output_path: PathBuf,
}

fn process_plot(
    path: &Path,
    cli: &Cli,
    mode: StratumMode,
    filter: &AnomalyFilter,
) -> Result<PlotSummary, PlotError> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .and_then(get_extension)
        .ok_or_else(|| PlotError::UnsupportedExtension {
            path: path.to_path_buf(),
        })?;

    let parser = match extension {
        Extension::Las | Extension::Laz => LasParserProvider {
            filename: path.to_path_buf(),
            epsg: cli.epsg,
            filter: filter.clone(),
        }
        .get_parser(),
        Extension::Csv | Extension::Txt => CsvParserProvider {
            filename: path.to_path_buf(),
            epsg: cli.epsg,
            filter: filter.clone(),
        }
        .get_parser(),
    };
    let cloud = parser.parse()?;

    let builder = PlotPreprocessBuilder::new(cli.radius, cli.plot_radius);
    let transformer = PointCloudTransformer::new(builder.build());
    let cloud = transformer.execute(cloud);

    let stem = cloud.metadata.source_name.clone();
    let prediction_path = cli.predictions.join(format!("{stem}.csv"));
    let predictions = predictions::load_predictions(&prediction_path, mode.channels())?;

    let options = RasterizeOptions {
        grid_size: cli.grid_size as usize,
        mode,
        normalize_ground: cli.normalize_ground,
        plot_radius: cli.plot_radius,
    };
    let (rasters, geo) = rasterize_plot(&cloud, &predictions, &options)?;

    let output_path = cli.output.join(format!("{stem}.tif"));
    write_geotiff(&output_path, &rasters, &geo, cli.epsg)?;

    Ok(PlotSummary {
        stem,
        point_count: cloud.len(),
        coverages: rasters
            .bands
            .iter()
            .map(|band| (band.name, band.mean_coverage()))
            .collect(),
        output_path,
    })
}

fn main() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    log::info!("input files: {:?}", cli.input);
    log::info!("predictions folder: {}", cli.predictions.display());
    log::info!("output folder: {}", cli.output.display());
    log::info!(
        "grid size: {}, radius: {} m, plot radius: {} m, strata: {}, normalize ground: {}, EPSG: {}",
        cli.grid_size,
        cli.radius,
        cli.plot_radius,
        cli.strata,
        cli.normalize_ground,
        cli.epsg
    );

    let start = std::time::Instant::now();

    let input_files = expand_globs(&cli.input);
    if input_files.is_empty() {
        log::error!("no input files matched");
        std::process::exit(1);
    }
    log::info!("expanded input files: {:?}", input_files);

    if let Err(e) = std::fs::create_dir_all(&cli.output) {
        log::error!("cannot create output folder: {}", e);
        std::process::exit(1);
    }

    let mode = match cli.strata {
        3 => StratumMode::Three,
        _ => StratumMode::Two,
    };
    let filter = AnomalyFilter::default_rules();

    log::info!("start processing {} plots...", input_files.len());
    let outcomes: Vec<bool> = input_files
        .par_iter()
        .map(|path| match process_plot(path, &cli, mode, &filter) {
            Ok(summary) => {
                let coverages = summary
                    .coverages
                    .iter()
                    .map(|(name, mean)| format!("{} {:.3}", name, mean))
                    .collect::<Vec<_>>()
                    .join(", ");
                log::info!(
                    "{}: {} points -> {} ({})",
                    summary.stem,
                    summary.point_count,
                    summary.output_path.display(),
                    coverages
                );
                true
            }
            Err(e) => {
                log::error!("{}: {}", path.display(), e);
                false
            }
        })
        .collect();

    let succeeded = outcomes.iter().filter(|ok| **ok).count();
    let failed = outcomes.len() - succeeded;
    log::info!(
        "finished: {} plots written, {} failed, elapsed {:?}",
        succeeded,
        failed,
        start.elapsed()
    );
    if succeeded == 0 {
        std::process::exit(1);
    }
}
