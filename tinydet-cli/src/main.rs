use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tinydet::{Anchor, BBox, Decoder, GridSpec, SuppressionPolicy};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "tinydet CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PolicyConfig {
    ClassAgnostic,
    ClassAware,
}

impl From<PolicyConfig> for SuppressionPolicy {
    fn from(value: PolicyConfig) -> Self {
        match value {
            PolicyConfig::ClassAgnostic => SuppressionPolicy::ClassAgnostic,
            PolicyConfig::ClassAware => SuppressionPolicy::ClassAware,
        }
    }
}

/// Detector head description; omitted sections fall back to the
/// TinyYOLOv2 VOC preset.
#[derive(Debug, Deserialize)]
struct ModelConfig {
    grid: usize,
    image_size: f32,
    anchors: Vec<[f32; 2]>,
    labels: Vec<String>,
}

impl ModelConfig {
    fn into_spec(self) -> Result<GridSpec, Box<dyn std::error::Error>> {
        let anchors = self
            .anchors
            .into_iter()
            .map(|[width, height]| Anchor::new(width, height))
            .collect();
        Ok(GridSpec::new(
            self.grid,
            anchors,
            self.labels,
            self.image_size,
        )?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    /// Raw little-endian f32 dump of the network output tensor.
    tensor_path: String,
    output_path: Option<String>,
    confidence_threshold: f32,
    max_boxes: usize,
    overlap_threshold: f32,
    policy: PolicyConfig,
    /// Clip final boxes to the network input frame before emitting.
    clamp_to_frame: bool,
    model: Option<ModelConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tensor_path: String::new(),
            output_path: None,
            confidence_threshold: 0.3,
            max_boxes: 5,
            overlap_threshold: 0.5,
            policy: PolicyConfig::ClassAgnostic,
            clamp_to_frame: false,
            model: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    detections: Vec<BBox>,
}

fn read_tensor(path: &str) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(format!(
            "tensor file length {} is not a multiple of 4 bytes",
            bytes.len()
        )
        .into());
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("tinydet=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.tensor_path.is_empty() {
        return Err("tensor_path must be set in the config".into());
    }
    if !(0.0..=1.0).contains(&config.confidence_threshold) {
        return Err("confidence_threshold must be in [0, 1]".into());
    }
    if !(0.0..=1.0).contains(&config.overlap_threshold) {
        return Err("overlap_threshold must be in [0, 1]".into());
    }

    let spec = match config.model {
        Some(model) => model.into_spec()?,
        None => GridSpec::tiny_yolo_v2_voc(),
    };
    let image_size = spec.image_size();
    let decoder = Decoder::new(spec);

    let tensor = read_tensor(&config.tensor_path)?;
    let mut detections = decoder.detect(
        &tensor,
        config.confidence_threshold,
        config.max_boxes,
        config.overlap_threshold,
        config.policy.into(),
    )?;

    if config.clamp_to_frame {
        detections = detections
            .iter()
            .map(|b| b.clamped(image_size, image_size))
            .collect();
    }

    let output = Output {
        count: detections.len(),
        detections,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
