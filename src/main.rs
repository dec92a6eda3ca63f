use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{error, info};

use dds_bc45_rs::image_pipeline::{ConversionConfig, DdsToTiffPipeline, PassKind, TiffCompression};
use dds_bc45_rs::logger;

/// Decode a BC4/BC5 DDS texture and save it as an RGB TIFF.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Input DDS file
    input: PathBuf,

    /// Output TIFF file
    output: PathBuf,

    /// Rebuild the blue channel as the Z component of a tangent-space normal map
    #[arg(long)]
    normal_map: bool,

    /// TIFF compression
    #[arg(long, value_enum, default_value_t = Compression::None)]
    compression: Compression,

    /// Apply horizontal differencing before compression
    #[arg(long)]
    predictor: bool,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Compression {
    None,
    Lzw,
    DeflateFast,
    Deflate,
    DeflateBest,
}

impl From<Compression> for TiffCompression {
    fn from(value: Compression) -> Self {
        match value {
            Compression::None => TiffCompression::None,
            Compression::Lzw => TiffCompression::Lzw,
            Compression::DeflateFast => TiffCompression::DeflateFast,
            Compression::Deflate => TiffCompression::DeflateBalanced,
            Compression::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(if args.verbose { "debug" } else { "info" });

    let pass = if args.normal_map {
        PassKind::NormalMap
    } else {
        PassKind::Void
    };

    let config = ConversionConfig::builder()
        .compression(args.compression.into())
        .predictor(args.predictor.then_some(2))
        .pass(pass)
        .build();
    let pipeline = DdsToTiffPipeline::new(config);

    info!("Compression: {:?}", pipeline.config().compression);
    info!("Pass: {:?}", pipeline.config().pass);

    pipeline
        .convert_file(&args.input, &args.output)
        .inspect_err(|e| error!("Conversion failed: {}", e))
        .with_context(|| {
            format!(
                "converting {} to {}",
                args.input.display(),
                args.output.display()
            )
        })?;

    info!("Conversion successful!");
    Ok(())
}
