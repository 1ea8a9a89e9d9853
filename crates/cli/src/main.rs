use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use litedet_core::detection::domain::detector_config::{BoxMapping, DetectorConfig};
use litedet_core::detection::infrastructure::object_detector::ObjectDetector;
use litedet_core::inference::domain::inference_engine::{EngineFactory, EngineOptions};
use litedet_core::inference::domain::model_source::ModelSource;
use litedet_core::inference::infrastructure::asset_resolver::AssetResolver;
use litedet_core::inference::infrastructure::model_holder::ModelHolder;
use litedet_core::shared::constants::{DEFAULT_MAX_DETECTIONS, IMAGE_EXTENSIONS};
use litedet_core::shared::frame::Frame;
use litedet_core::shared::recognition::Recognition;

/// Object detection on an image with a TensorFlow Lite SSD model.
#[derive(Parser)]
#[command(name = "litedet")]
struct Cli {
    /// Model file, or asset name with --asset.
    model: String,

    /// Input image file.
    input: PathBuf,

    /// Treat MODEL as a packaged asset name.
    #[arg(long)]
    asset: bool,

    /// Extra directory searched for packaged assets (repeatable).
    #[arg(long = "asset-dir")]
    asset_dirs: Vec<PathBuf>,

    /// Detector settings as JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Square model input size.
    #[arg(long)]
    input_size: Option<u32>,

    /// Model input width.
    #[arg(long)]
    width: Option<u32>,

    /// Model input height.
    #[arg(long)]
    height: Option<u32>,

    /// Model takes normalized float input instead of quantized bytes.
    #[arg(long)]
    float: bool,

    /// Maximum number of detections the model reports.
    #[arg(long)]
    max_detections: Option<usize>,

    /// Rotate the frame by this many degrees (clockwise) before detection.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    rotation: i32,

    /// Label file of `<id> <name>` lines.
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Interpreter threads.
    #[arg(long)]
    threads: Option<i32>,

    /// Hide recognitions scoring below this (0.0-1.0).
    #[arg(long, default_value = "0.0")]
    threshold: f32,

    /// Report boxes in source-image pixels instead of model-input pixels.
    #[arg(long)]
    source_coords: bool,

    /// Print recognitions as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    let mut holder = build_holder(&cli)?;
    let options = EngineOptions {
        num_threads: cli.threads,
    };
    holder.load_with_options(model_source(&cli), &options)?;

    let mut detector = ObjectDetector::new(config);
    if let Some(labels) = &cli.labels {
        detector = detector.with_label_file(labels)?;
    }

    let frame = Frame::open(&cli.input)?;
    let config = detector.config();
    log::info!(
        "Running detection on {} ({}x{}) at {}x{} {} input",
        cli.input.display(),
        frame.width(),
        frame.height(),
        config.input_width(),
        config.input_height(),
        if config.quantized() { "quantized" } else { "float" }
    );
    let recognitions: Vec<Recognition> = detector
        .detect(&mut holder, &frame, cli.rotation)?
        .into_iter()
        .filter(|r| r.score >= cli.threshold)
        .collect();
    holder.release();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&recognitions)?);
    } else {
        print_table(&recognitions);
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<DetectorConfig, Box<dyn std::error::Error>> {
    let base = match &cli.config {
        Some(path) => serde_json::from_str::<DetectorConfig>(&fs::read_to_string(path)?)
            .map_err(|e| format!("Invalid config {}: {e}", path.display()))?,
        None => DetectorConfig::default(),
    };

    let size = cli.input_size;
    let width = cli.width.or(size).unwrap_or(base.input_width());
    let height = cli.height.or(size).unwrap_or(base.input_height());
    let quantized = if cli.float { false } else { base.quantized() };
    let max_detections = cli.max_detections.unwrap_or(base.max_detections());
    let box_mapping = if cli.source_coords {
        BoxMapping::SourceFrame
    } else {
        base.box_mapping()
    };

    Ok(DetectorConfig::new(width, height, quantized, max_detections)?.with_box_mapping(box_mapping))
}

fn build_holder(cli: &Cli) -> Result<ModelHolder, Box<dyn std::error::Error>> {
    let assets = cli
        .asset_dirs
        .iter()
        .fold(AssetResolver::new(), |r, dir| r.with_bundled_dir(dir));
    Ok(ModelHolder::new(engine_factory()?).with_assets(assets))
}

#[cfg(feature = "tflite")]
fn engine_factory() -> Result<Box<dyn EngineFactory>, Box<dyn std::error::Error>> {
    use litedet_core::inference::infrastructure::tflite_engine::TfliteEngineFactory;
    Ok(Box::new(TfliteEngineFactory))
}

#[cfg(not(feature = "tflite"))]
fn engine_factory() -> Result<Box<dyn EngineFactory>, Box<dyn std::error::Error>> {
    Err("litedet was built without TensorFlow Lite support; rebuild with --features tflite".into())
}

fn model_source(cli: &Cli) -> ModelSource {
    if cli.asset {
        ModelSource::Asset(cli.model.clone())
    } else {
        ModelSource::File(PathBuf::from(&cli.model))
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.input) {
        return Err(format!(
            "Input must be an image ({}), got {}",
            IMAGE_EXTENSIONS.join(", "),
            cli.input.display()
        )
        .into());
    }
    if !cli.asset && !Path::new(&cli.model).exists() {
        return Err(format!("Model file not found: {}", cli.model).into());
    }
    if cli.input_size.is_some() && (cli.width.is_some() || cli.height.is_some()) {
        return Err("--input-size and --width/--height are mutually exclusive".into());
    }
    if !(0.0..=1.0).contains(&cli.threshold) {
        return Err(format!(
            "Threshold must be between 0.0 and 1.0, got {}",
            cli.threshold
        )
        .into());
    }
    if let Some(t) = cli.threads {
        if t < 1 {
            return Err(format!("Threads must be at least 1, got {t}").into());
        }
    }
    if cli.max_detections == Some(0) {
        return Err(format!(
            "Max detections must be at least 1 (default {DEFAULT_MAX_DETECTIONS})"
        )
        .into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn print_table(recognitions: &[Recognition]) {
    if recognitions.is_empty() {
        println!("No objects detected");
        return;
    }
    for r in recognitions {
        let name = if r.title.is_empty() {
            format!("class {}", r.class_id)
        } else {
            r.title.clone()
        };
        println!(
            "{name:<20} {:>5.1}%  [{:.1}, {:.1}, {:.1}, {:.1}]",
            r.score * 100.0,
            r.location.left,
            r.location.top,
            r.location.right,
            r.location.bottom
        );
    }
}
