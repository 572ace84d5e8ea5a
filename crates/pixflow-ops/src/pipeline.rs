//! Stage pipeline: applies a selected subset of transforms to one buffer.
//!
//! A [`TransformRequest`] says *which* stages run (grayscale, rotate, blur);
//! a [`PipelineConfig`] says *in what order* and *how they are scheduled*.
//!
//! # Schedules
//!
//! - [`Schedule::Ordered`] (default) - stages run one after another in
//!   [`PipelineConfig::order`]. Each stage takes ownership of the buffer
//!   and hands it to the next, so the result is fully determined by the
//!   order.
//! - [`Schedule::Concurrent`] - every enabled stage is dispatched on its
//!   own scoped worker thread against a single `Mutex<PixelBuffer>`. A stage
//!   holds the lock for its whole pass, so stages never interleave on
//!   pixels; the result equals *some* serialization of the stages. The
//!   applied order is reported in [`PipelineOutput::applied`].
//!
//! Blur reads the buffer as left by the stages before it. With the default
//! order `[blur, grayscale, rotate]` it sees the decoded pixels.
//!
//! Stage workers are plain threads rather than Rayon workers: blur runs its
//! rows on the Rayon pool while holding the stage lock, and a Rayon worker
//! blocked on that lock could otherwise be asked to run it.
//!
//! # Example
//!
//! ```rust
//! use pixflow_core::{PixelBuffer, Rgba8};
//! use pixflow_ops::pipeline::{Pipeline, PipelineConfig, TransformRequest};
//!
//! let buf = PixelBuffer::filled(8, 8, Rgba8::rgb(200, 100, 50)).unwrap();
//! let request = TransformRequest::new().with_grayscale().with_rotate();
//! let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//! let out = pipeline.run(buf, &request).unwrap();
//! assert!(out.samples().iter().all(|px| px.is_gray()));
//! ```

use crate::color::grayscale;
use crate::filter::Accumulate;
use crate::kernel::Kernel;
use crate::transform::rotate_180;
use crate::{OpsError, OpsResult};
use pixflow_core::PixelBuffer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use crate::parallel::convolve;
#[cfg(not(feature = "parallel"))]
use crate::filter::convolve;

/// One of the three transform stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    /// Luma conversion, alpha preserved.
    Grayscale,
    /// 180-degree rotation.
    Rotate,
    /// Gaussian convolution.
    Blur,
}

impl StageKind {
    /// All stages, in the default execution order.
    pub const ALL: [StageKind; 3] = [StageKind::Blur, StageKind::Grayscale, StageKind::Rotate];

    /// Lowercase stage name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Rotate => "rotate",
            Self::Blur => "blur",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StageKind {
    type Err = OpsError;

    fn from_str(s: &str) -> OpsResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "grayscale" | "gray" | "greyscale" => Ok(Self::Grayscale),
            "rotate" | "rotate180" => Ok(Self::Rotate),
            "blur" | "gaussian" => Ok(Self::Blur),
            other => Err(OpsError::InvalidParameter(format!("unknown stage '{}'", other))),
        }
    }
}

/// How enabled stages are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    /// Run stages sequentially in the configured order.
    #[default]
    Ordered,
    /// Run each stage on its own worker under a whole-buffer lock.
    Concurrent,
}

/// Kernel parameters for the blur stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurParams {
    /// Kernel side length (odd).
    pub size: usize,
    /// Gaussian standard deviation.
    pub spread: f64,
    /// Channel accumulation mode.
    pub accumulate: Accumulate,
}

impl BlurParams {
    /// Default kernel size of the `/processImage` endpoint.
    pub const DEFAULT_SIZE: usize = 23;
    /// Default spread of the `/processImage` endpoint.
    pub const DEFAULT_SPREAD: f64 = 3.0;

    /// Builds the Gaussian kernel for these parameters.
    pub fn kernel(&self) -> OpsResult<Kernel> {
        Kernel::gaussian(self.size, self.spread)
    }
}

impl Default for BlurParams {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            spread: Self::DEFAULT_SPREAD,
            accumulate: Accumulate::Saturate,
        }
    }
}

/// Which stages a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformRequest {
    /// Apply grayscale.
    pub grayscale: bool,
    /// Apply 180-degree rotation.
    pub rotate: bool,
    /// Apply blur.
    pub blur: bool,
    /// Kernel parameters used when `blur` is set.
    pub blur_params: BlurParams,
}

impl TransformRequest {
    /// Empty request (no stages, default blur parameters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables grayscale.
    pub fn with_grayscale(mut self) -> Self {
        self.grayscale = true;
        self
    }

    /// Enables rotation.
    pub fn with_rotate(mut self) -> Self {
        self.rotate = true;
        self
    }

    /// Enables blur with default parameters.
    pub fn with_blur(mut self) -> Self {
        self.blur = true;
        self
    }

    /// Enables blur with the given parameters.
    pub fn with_blur_params(mut self, params: BlurParams) -> Self {
        self.blur = true;
        self.blur_params = params;
        self
    }

    /// Builds a request from legacy query values.
    ///
    /// A stage is enabled only by the exact value `"TRUE"`.
    ///
    /// ```rust
    /// use pixflow_ops::pipeline::TransformRequest;
    ///
    /// let req = TransformRequest::from_query_flags(Some("TRUE"), Some("true"), None);
    /// assert!(req.rotate);
    /// assert!(!req.grayscale);
    /// assert!(!req.blur);
    /// ```
    pub fn from_query_flags(
        rotate: Option<&str>,
        grayscale: Option<&str>,
        blur: Option<&str>,
    ) -> Self {
        let on = |v: Option<&str>| v == Some("TRUE");
        Self {
            grayscale: on(grayscale),
            rotate: on(rotate),
            blur: on(blur),
            blur_params: BlurParams::default(),
        }
    }

    /// Returns `true` if `kind` is enabled.
    pub fn is_enabled(&self, kind: StageKind) -> bool {
        match kind {
            StageKind::Grayscale => self.grayscale,
            StageKind::Rotate => self.rotate,
            StageKind::Blur => self.blur,
        }
    }

    /// Returns `true` if no stage is enabled.
    pub fn is_empty(&self) -> bool {
        !(self.grayscale || self.rotate || self.blur)
    }
}

/// Stage ordering and scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Execution order; every stage that a request enables must appear once.
    pub order: Vec<StageKind>,
    /// Scheduling discipline.
    pub schedule: Schedule,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            order: StageKind::ALL.to_vec(),
            schedule: Schedule::Ordered,
        }
    }
}

impl PipelineConfig {
    /// Config with an explicit order and the ordered schedule.
    pub fn with_order(order: impl Into<Vec<StageKind>>) -> Self {
        Self {
            order: order.into(),
            schedule: Schedule::Ordered,
        }
    }

    /// Config with the concurrent schedule.
    pub fn concurrent() -> Self {
        Self {
            schedule: Schedule::Concurrent,
            ..Self::default()
        }
    }

    /// Parses a comma separated order such as `"blur,grayscale,rotate"`.
    pub fn parse_order(s: &str) -> OpsResult<Vec<StageKind>> {
        s.split(',')
            .filter(|p| !p.trim().is_empty())
            .map(StageKind::from_str)
            .collect()
    }

    /// Rejects orders that list a stage twice.
    pub fn validate(&self) -> OpsResult<()> {
        for (i, kind) in self.order.iter().enumerate() {
            if self.order[..i].contains(kind) {
                return Err(OpsError::InvalidParameter(format!(
                    "stage '{}' listed twice in pipeline order",
                    kind
                )));
            }
        }
        Ok(())
    }
}

/// A stage ready to run: parameters validated, kernel built.
#[derive(Debug)]
enum Stage {
    Grayscale,
    Rotate,
    Blur { kernel: Kernel, mode: Accumulate },
}

impl Stage {
    fn kind(&self) -> StageKind {
        match self {
            Self::Grayscale => StageKind::Grayscale,
            Self::Rotate => StageKind::Rotate,
            Self::Blur { .. } => StageKind::Blur,
        }
    }

    /// Ordered handoff: takes the buffer, returns the transformed buffer.
    fn apply(&self, mut buffer: PixelBuffer) -> OpsResult<PixelBuffer> {
        match self {
            Self::Grayscale => {
                grayscale(&mut buffer);
                Ok(buffer)
            }
            Self::Rotate => {
                rotate_180(&mut buffer);
                Ok(buffer)
            }
            Self::Blur { kernel, mode } => convolve(&buffer, kernel, *mode),
        }
    }

    /// Shared-buffer variant: the caller holds the stage lock.
    fn apply_in_place(&self, buffer: &mut PixelBuffer) -> OpsResult<()> {
        match self {
            Self::Grayscale => grayscale(buffer),
            Self::Rotate => rotate_180(buffer),
            Self::Blur { kernel, mode } => *buffer = convolve(buffer, kernel, *mode)?,
        }
        Ok(())
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The transformed buffer.
    pub buffer: PixelBuffer,
    /// Stages in the order they were actually applied.
    pub applied: Vec<StageKind>,
    /// Wall time spent in stages.
    pub elapsed: Duration,
}

/// Applies [`TransformRequest`]s under a fixed [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline after validating `config`.
    pub fn new(config: PipelineConfig) -> OpsResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The pipeline's configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Stages enabled by `request`, in configured order, with kernels built.
    fn prepare(&self, request: &TransformRequest) -> OpsResult<Vec<Stage>> {
        for kind in StageKind::ALL {
            if request.is_enabled(kind) && !self.config.order.contains(&kind) {
                return Err(OpsError::InvalidParameter(format!(
                    "stage '{}' is enabled but missing from the pipeline order",
                    kind
                )));
            }
        }

        self.config
            .order
            .iter()
            .filter(|kind| request.is_enabled(**kind))
            .map(|kind| {
                Ok(match kind {
                    StageKind::Grayscale => Stage::Grayscale,
                    StageKind::Rotate => Stage::Rotate,
                    StageKind::Blur => Stage::Blur {
                        kernel: request.blur_params.kernel()?,
                        mode: request.blur_params.accumulate,
                    },
                })
            })
            .collect()
    }

    /// Runs the enabled stages and returns the final buffer.
    ///
    /// Parameters are validated before any pixel is touched. Any stage
    /// failure aborts the run; the partially transformed buffer is dropped.
    pub fn run(&self, buffer: PixelBuffer, request: &TransformRequest) -> OpsResult<PixelBuffer> {
        self.execute(buffer, request).map(|out| out.buffer)
    }

    /// Like [`run`](Self::run), also reporting the applied stage order and
    /// timing.
    pub fn execute(
        &self,
        buffer: PixelBuffer,
        request: &TransformRequest,
    ) -> OpsResult<PipelineOutput> {
        trace!(
            width = buffer.width(),
            height = buffer.height(),
            ?request,
            schedule = ?self.config.schedule,
            "Pipeline::execute"
        );

        let stages = self.prepare(request)?;
        let start = Instant::now();

        let (buffer, applied) = match self.config.schedule {
            Schedule::Ordered => run_ordered(buffer, &stages)?,
            Schedule::Concurrent => run_concurrent(buffer, &stages)?,
        };

        let elapsed = start.elapsed();
        debug!(?applied, ?elapsed, "pipeline finished");
        Ok(PipelineOutput {
            buffer,
            applied,
            elapsed,
        })
    }
}

fn run_ordered(
    mut buffer: PixelBuffer,
    stages: &[Stage],
) -> OpsResult<(PixelBuffer, Vec<StageKind>)> {
    let mut applied = Vec::with_capacity(stages.len());
    for stage in stages {
        let t = Instant::now();
        buffer = stage.apply(buffer)?;
        debug!(stage = %stage.kind(), elapsed = ?t.elapsed(), "stage done");
        applied.push(stage.kind());
    }
    Ok((buffer, applied))
}

struct Shared {
    buffer: PixelBuffer,
    applied: Vec<StageKind>,
}

fn run_concurrent(
    buffer: PixelBuffer,
    stages: &[Stage],
) -> OpsResult<(PixelBuffer, Vec<StageKind>)> {
    let shared = Mutex::new(Shared {
        buffer,
        applied: Vec::with_capacity(stages.len()),
    });

    let results: Vec<OpsResult<()>> = thread::scope(|s| {
        let handles: Vec<_> = stages
            .iter()
            .map(|stage| {
                let shared = &shared;
                thread::Builder::new()
                    .name(format!("pixflow-{}", stage.kind()))
                    .spawn_scoped(s, move || -> OpsResult<()> {
                        let mut guard = shared
                            .lock()
                            .map_err(|_| OpsError::StagePanicked(stage.kind().to_string()))?;
                        let t = Instant::now();
                        stage.apply_in_place(&mut guard.buffer)?;
                        guard.applied.push(stage.kind());
                        debug!(stage = %stage.kind(), elapsed = ?t.elapsed(), "stage done");
                        Ok(())
                    })
                    .map(|h| (stage.kind(), h))
            })
            .collect();

        // Fan-in: join every spawned worker before reporting any error.
        handles
            .into_iter()
            .map(|spawned| match spawned {
                Ok((kind, handle)) => handle
                    .join()
                    .unwrap_or_else(|_| Err(OpsError::StagePanicked(kind.to_string()))),
                Err(e) => Err(OpsError::WorkerSpawn(e)),
            })
            .collect()
    });

    results.into_iter().collect::<OpsResult<Vec<()>>>()?;

    let shared = shared
        .into_inner()
        .map_err(|_| OpsError::StagePanicked("pipeline".into()))?;
    Ok((shared.buffer, shared.applied))
}

/// Runs `request` with the default [`PipelineConfig`].
pub fn run(buffer: PixelBuffer, request: &TransformRequest) -> OpsResult<PixelBuffer> {
    Pipeline::default().run(buffer, request)
}
