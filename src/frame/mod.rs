//! Render-frame scheduling.
//!
//! Work that reads layout after a DOM mutation has to wait until the
//! renderer has committed that mutation. [`FrameScheduler`] models
//! `requestAnimationFrame`: callbacks requested now run on the next frame,
//! and callbacks requested while a frame is running wait for the one after.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{ResizeError, Result};
use crate::tree::RenderTree;

pub type FrameCallback = Box<dyn FnOnce(&mut FrameContext<'_>) -> Result<()>>;

/// What a frame callback can touch.
pub struct FrameContext<'a> {
    pub tree: &'a mut RenderTree,
    pub frames: &'a mut dyn FrameScheduler,
}

pub trait FrameScheduler {
    fn request_frame(&mut self, callback: FrameCallback);

    /// Callbacks waiting for a future frame.
    fn pending(&self) -> usize;
}

/// How long to wait before measuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStrategy {
    /// Two nested frames: the first lets the mutation commit, the second
    /// measures against settled layout.
    #[default]
    Double,
    /// Measure on the very next frame.
    Single,
}

impl FrameStrategy {
    pub const fn frames(self) -> usize {
        match self {
            FrameStrategy::Double => 2,
            FrameStrategy::Single => 1,
        }
    }
}

/// Run `callback` once rendering has settled according to `strategy`.
pub fn after_render_settles(
    frames: &mut dyn FrameScheduler,
    strategy: FrameStrategy,
    callback: FrameCallback,
) {
    match strategy {
        FrameStrategy::Single => frames.request_frame(callback),
        FrameStrategy::Double => frames.request_frame(Box::new(move |ctx| {
            ctx.frames.request_frame(callback);
            Ok(())
        })),
    }
}

/// Outcome of one frame.
#[derive(Debug, Default)]
pub struct FrameReport {
    pub ran: usize,
    pub errors: Vec<ResizeError>,
}

/// Deterministic FIFO scheduler. Hosts drive it with [`FrameQueue::run_frame`];
/// tests use it to step frames one at a time.
#[derive(Default)]
pub struct FrameQueue {
    queue: VecDeque<FrameCallback>,
    frame_count: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Run every callback queued before this call, in request order. A
    /// failing callback does not stop the rest.
    pub fn run_frame(&mut self, tree: &mut RenderTree) -> FrameReport {
        let due = std::mem::take(&mut self.queue);
        self.frame_count += 1;

        let mut report = FrameReport::default();
        for callback in due {
            let mut ctx = FrameContext {
                tree: &mut *tree,
                frames: &mut *self,
            };
            if let Err(err) = callback(&mut ctx) {
                report.errors.push(err);
            }
            report.ran += 1;
        }
        report
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, callback: FrameCallback) {
        self.queue.push_back(callback);
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}
