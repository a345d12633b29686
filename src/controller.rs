use crate::{
    error::Error,
    pose::Pose,
    render::{render, Surface},
    viewport::{Dimensions, ViewportTransform},
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::{debug, trace};

/// Live frame geometry, polled once per tick. `None` until the source has
/// produced its first frame.
pub(crate) trait FrameSource {
    fn dimensions(&mut self) -> Option<Dimensions>;
}

/// Upstream pose estimator. One outstanding call at a time: the controller
/// never issues the next estimate before the previous one has returned.
pub(crate) trait PoseEstimator {
    fn estimate(&mut self) -> Result<Vec<Pose>, Error>;
}

/// Cloneable remote for the loop's running flag. Commands may arrive at any
/// time from outside the tick cadence (a Ctrl-C handler, a UI button);
/// cancellation is cooperative and takes effect at the next tick boundary.
#[derive(Debug, Clone, Default)]
pub(crate) struct LoopHandle {
    running: Arc<AtomicBool>,
}

impl LoopHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub(crate) fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// What a single tick did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Tick {
    /// A pose was drawn.
    Rendered,
    /// No pose (or no joints) this frame; the previous frame was cleared.
    Cleared,
    /// Nothing was touched; the next refresh retries.
    Skipped(Skip),
    /// The running flag was clear.
    Stopped,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Skip {
    /// The frame source has not produced dimensions yet.
    SourceNotReady,
    /// Zero-sized source frame, scale is undefined.
    DegenerateDimensions,
}

/// Drives one estimate-and-render cycle per display refresh. The host calls
/// `tick` from its refresh callback; `stop` from anywhere flips the shared
/// flag and the loop quiesces at the next boundary check. At most one render
/// can happen after `stop`, when the flag flips mid-estimate.
pub(crate) struct LoopController<F, E, S> {
    source: F,
    estimator: E,
    surface: S,
    handle: LoopHandle,
}

impl<F, E, S> LoopController<F, E, S>
where
    F: FrameSource,
    E: PoseEstimator,
    S: Surface,
{
    pub(crate) fn new(source: F, estimator: E, surface: S) -> Self {
        Self {
            source,
            estimator,
            surface,
            handle: LoopHandle::new(),
        }
    }

    /// Remote handle for issuing start/stop from outside the tick cadence.
    pub(crate) fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Transition to running and execute the first tick immediately.
    pub(crate) fn start(&mut self) -> Result<Tick, Error> {
        self.handle.start();
        self.tick()
    }

    pub(crate) fn stop(&self) {
        self.handle.stop();
    }

    /// One request/response cycle with the estimator plus one render.
    ///
    /// Failures stay inside the tick: a not-ready source or degenerate frame
    /// geometry skips the frame and keeps the loop running, while an
    /// estimator fault stops the loop (so `is_running` reports the stall)
    /// and hands the error to the host.
    pub(crate) fn tick(&mut self) -> Result<Tick, Error> {
        if !self.handle.is_running() {
            return Ok(Tick::Stopped);
        }

        let source_dims = match self.source.dimensions() {
            Some(dims) => dims,
            None => {
                trace!("frame source not ready, skipping tick");
                return Ok(Tick::Skipped(Skip::SourceNotReady));
            }
        };

        let transform = match ViewportTransform::contain(source_dims, self.surface.dimensions()) {
            Some(transform) => transform,
            None => {
                debug!(?source_dims, "degenerate source dimensions, skipping tick");
                return Ok(Tick::Skipped(Skip::DegenerateDimensions));
            }
        };

        let poses = match self.estimator.estimate() {
            Ok(poses) => poses,
            Err(e) => {
                self.handle.stop();
                return Err(e);
            }
        };

        // stop() may have landed while the estimate was in flight
        if !self.handle.is_running() {
            return Ok(Tick::Stopped);
        }

        // single-subject contract: only the primary pose is drawn
        let pose = poses.into_iter().next().unwrap_or_default();
        render(&pose, &transform, &mut self.surface)?;

        if pose.is_empty() {
            Ok(Tick::Cleared)
        } else {
            Ok(Tick::Rendered)
        }
    }

    pub(crate) fn surface(&self) -> &S {
        &self.surface
    }
}
