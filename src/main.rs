use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use structopt::StructOpt;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;

#[cfg(feature = "gui")]
mod capture;
mod controller;
mod error;
mod pose;
mod render;
mod viewport;

use controller::{FrameSource, LoopController, PoseEstimator, Tick};
use error::Error;
use pose::{Joint, JointName, Pose, NUM_JOINTS};
use render::Surface;
use viewport::{Dimensions, Point};

#[derive(structopt::StructOpt)]
struct Opt {
    /// A v4l2 compatible device: /dev/videoDEVICE
    #[cfg(feature = "gui")]
    #[structopt(short, long, default_value = "0")]
    device: i32,

    /// The width of the synthetic source frame.
    #[cfg(not(feature = "gui"))]
    #[structopt(long, default_value = "640")]
    frame_width: u32,

    /// The height of the synthetic source frame.
    #[cfg(not(feature = "gui"))]
    #[structopt(long, default_value = "480")]
    frame_height: u32,

    /// The width of the viewport the overlay is drawn into.
    #[structopt(long, default_value = "1280")]
    viewport_width: u32,

    /// The height of the viewport the overlay is drawn into.
    #[structopt(long, default_value = "720")]
    viewport_height: u32,

    /// Milliseconds to wait between display refreshes.
    #[structopt(short = "-W", long, default_value = "16")]
    wait_ms: u64,

    #[structopt(short, long, default_value = "info", env = "RUST_LOG")]
    log_level: tracing_subscriber::filter::EnvFilter,

    #[structopt(short, long)]
    show_progress: bool,
}

/// Stands in for the upstream estimator (model loading is outside this
/// tool): emits one full-confidence pose that sways side to side so the
/// overlay has something to track.
struct SwayEstimator {
    dims: Dimensions,
    ticks: u32,
}

impl SwayEstimator {
    fn new(dims: Dimensions) -> Self {
        Self { dims, ticks: 0 }
    }

    /// Joint anchors as fractions of the source frame.
    fn anchor(name: JointName) -> (f32, f32) {
        use JointName::*;
        match name {
            Nose => (0.50, 0.18),
            LeftEye => (0.46, 0.16),
            RightEye => (0.54, 0.16),
            LeftEar => (0.42, 0.18),
            RightEar => (0.58, 0.18),
            LeftShoulder => (0.38, 0.30),
            RightShoulder => (0.62, 0.30),
            LeftElbow => (0.32, 0.43),
            RightElbow => (0.68, 0.43),
            LeftWrist => (0.30, 0.55),
            RightWrist => (0.70, 0.55),
            LeftHip => (0.43, 0.55),
            RightHip => (0.57, 0.55),
            LeftKnee => (0.42, 0.72),
            RightKnee => (0.58, 0.72),
            LeftAnkle => (0.41, 0.88),
            RightAnkle => (0.59, 0.88),
        }
    }
}

impl PoseEstimator for SwayEstimator {
    fn estimate(&mut self) -> Result<Vec<Pose>, Error> {
        if self.dims.width == 0 || self.dims.height == 0 {
            return Err(Error::Estimate(
                "cannot place joints in a zero-sized frame".into(),
            ));
        }
        self.ticks = self.ticks.wrapping_add(1);
        let width = self.dims.width as f32;
        let height = self.dims.height as f32;
        let sway = (self.ticks as f32 / 30.0).sin() * width * 0.05;

        let joints = (0..NUM_JOINTS)
            .filter_map(JointName::from_index)
            .map(|name| {
                let (fx, fy) = Self::anchor(name);
                Joint::new(name, Point::new(fx * width + sway, fy * height), 0.9)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(vec![Pose::from_joints(joints)?])
    }
}

#[cfg(not(feature = "gui"))]
struct SyntheticSource {
    dims: Dimensions,
}

#[cfg(not(feature = "gui"))]
impl FrameSource for SyntheticSource {
    fn dimensions(&mut self) -> Option<Dimensions> {
        Some(self.dims)
    }
}

/// Swallows draw calls; the headless build only exercises the loop.
#[cfg(not(feature = "gui"))]
struct NullCanvas {
    dims: Dimensions,
}

#[cfg(not(feature = "gui"))]
impl Surface for NullCanvas {
    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    fn clear(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn stroke_polyline(
        &mut self,
        _points: &[Point],
        _weight: f32,
        _color: pose::Color,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn fill_circle(
        &mut self,
        _center: Point,
        _radius: f32,
        _color: pose::Color,
    ) -> Result<(), Error> {
        Ok(())
    }
}

fn main() -> Result<()> {
    let mut opt = Opt::from_args();

    let log_level = std::mem::take(&mut opt.log_level);
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(log_level),
    )?;

    run(opt)
}

#[cfg(feature = "gui")]
fn run(opt: Opt) -> Result<()> {
    let viewport = Dimensions::new(opt.viewport_width, opt.viewport_height);
    let (source, surface) =
        capture::open(opt.device, viewport).context("failed to open video capture")?;
    info!(
        width = source.dims.width,
        height = source.dims.height,
        "got dimensions from video capture"
    );

    let estimator = SwayEstimator::new(source.dims);
    let controller = LoopController::new(source, estimator, surface);
    let wait_ms = opt.wait_ms as i32;

    drive(controller, &opt, move |surface| {
        capture::show(surface)?;
        capture::wait_refresh(wait_ms)
    })
}

#[cfg(not(feature = "gui"))]
fn run(opt: Opt) -> Result<()> {
    let dims = Dimensions::new(opt.frame_width, opt.frame_height);
    let viewport = Dimensions::new(opt.viewport_width, opt.viewport_height);
    info!(
        width = dims.width,
        height = dims.height,
        "using synthetic frame source"
    );

    let controller = LoopController::new(
        SyntheticSource { dims },
        SwayEstimator::new(dims),
        NullCanvas { dims: viewport },
    );
    let wait_ms = opt.wait_ms;

    drive(controller, &opt, move |_surface| {
        std::thread::sleep(std::time::Duration::from_millis(wait_ms));
        Ok(true)
    })
}

/// Run the detection loop at display-refresh cadence until it stops. The
/// `refresh` callback presents the finished frame and reports whether the
/// host wants to keep going.
fn drive<F, E, S, R>(
    mut controller: LoopController<F, E, S>,
    opt: &Opt,
    mut refresh: R,
) -> Result<()>
where
    F: FrameSource,
    E: PoseEstimator,
    S: Surface,
    R: FnMut(&S) -> Result<bool, Error>,
{
    let handle = controller.handle();
    ctrlc::set_handler(move || handle.stop()).context("failed setting Ctrl-C handler")?;

    let pb_fps = if opt.show_progress {
        Some(
            ProgressBar::new_spinner().with_style(
                ProgressStyle::default_spinner()
                    .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
                    .template("{prefix:.bold.dim} {spinner} {wide_msg}"),
            ),
        )
    } else {
        None
    };

    info!("starting detection loop");
    let started = Instant::now();
    let mut frames = 0_usize;

    let mut outcome = controller.start();
    loop {
        match outcome {
            Ok(Tick::Rendered) | Ok(Tick::Cleared) => {
                frames += 1;
                if let Some(pb_fps) = &pb_fps {
                    pb_fps.set_message(format!(
                        "FPS => {:.1}",
                        frames as f64 / started.elapsed().as_secs_f64()
                    ));
                    pb_fps.inc(1);
                }
            }
            Ok(Tick::Skipped(skip)) => debug!(?skip, "tick skipped"),
            Ok(Tick::Stopped) => break,
            Err(e) => {
                warn!(error = %e, "tick failed");
                return Err(e).context("detection loop failed");
            }
        }

        if !controller.is_running() {
            break;
        }

        if !refresh(controller.surface()).context("failed presenting frame")? {
            controller.stop();
        }

        outcome = controller.tick();
    }

    info!(frames, "detection loop stopped");
    Ok(())
}
