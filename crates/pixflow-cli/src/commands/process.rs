//! Process command
//!
//! Runs the stage pipeline on a single file. Flags override the optional
//! YAML config.

use crate::ProcessArgs;
use anyhow::{Context, Result, bail};
use pixflow_core::PixelBuffer;
use pixflow_ops::{
    Accumulate, BlurParams, Pipeline, PipelineConfig, Schedule, TransformRequest,
};
use pixflow_server::ServerConfig;
use tracing::{info, trace};

pub fn run(args: ProcessArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "process::run");

    let config = super::load_config(args.config.as_deref())?;
    let (pipeline_config, request) = resolve(&args, &config)?;
    if request.is_empty() {
        bail!("Nothing to do: enable at least one of --grayscale, --rotate, --blur");
    }

    let pipeline = Pipeline::new(pipeline_config).context("Invalid pipeline configuration")?;

    let image = super::load_image(&args.input)?;
    let buffer = PixelBuffer::from_image(&image)
        .with_context(|| format!("Unsupported pixel layout in {}", args.input.display()))?;

    if verbose > 0 {
        println!(
            "Processing {} ({}x{}, {} channels)",
            args.input.display(),
            image.width,
            image.height,
            image.channels
        );
    }

    let output = pipeline.execute(buffer, &request)?;
    info!(stages = ?output.applied, elapsed = ?output.elapsed, "pipeline done");

    super::save_image(&args.output, &output.buffer.to_image(), config.jpeg_quality)?;

    if verbose > 0 {
        let stages: Vec<_> = output.applied.iter().map(|s| s.name()).collect();
        println!(
            "Applied [{}] in {:.2?} -> {}",
            stages.join(", "),
            output.elapsed,
            args.output.display()
        );
    }

    Ok(())
}

/// Merges config file values with command-line overrides.
fn resolve(args: &ProcessArgs, config: &ServerConfig) -> Result<(PipelineConfig, TransformRequest)> {
    let mut pipeline = config.pipeline.clone();
    if let Some(order) = &args.order {
        pipeline.order = PipelineConfig::parse_order(order)
            .with_context(|| format!("Invalid --order '{}'", order))?;
    }
    if args.concurrent {
        pipeline.schedule = Schedule::Concurrent;
    }

    let blur_params = BlurParams {
        size: args.size.unwrap_or(config.blur.size),
        spread: args.spread.unwrap_or(config.blur.spread),
        accumulate: if args.wrap {
            Accumulate::Wrap
        } else {
            config.blur.accumulate
        },
    };

    let request = TransformRequest {
        grayscale: args.grayscale,
        rotate: args.rotate,
        blur: args.blur,
        blur_params,
    };
    Ok((pipeline, request))
}
