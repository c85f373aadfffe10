use std::time::Duration;

use crate::{
    animation::driver::{AnimationClip, AnimationDriver},
    foundation::core::{FrameRGBA, Viewport},
    foundation::error::{CaptureError, CaptureResult},
    render::device::{RenderDevice, decode_readback},
    scene::context::RenderContext,
};

/// Smallest driver step that still makes the mixer commit a pose.
pub const SCRUB_EPSILON_SECS: f64 = 0.00001;

/// Default bound on one render + read-back + decode wait.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables for [`FrameSampler`].
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerOptions {
    /// Delta passed to [`AnimationDriver::advance`] after scrubbing.
    pub scrub_epsilon_secs: f64,
    /// Bound on each render + decode wait; `None` waits forever.
    ///
    /// `Some` uses [`tokio::time::timeout`], so sampling must then run inside a tokio runtime
    /// with time enabled.
    pub wait_timeout: Option<Duration>,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            scrub_epsilon_secs: SCRUB_EPSILON_SECS,
            wait_timeout: Some(DEFAULT_WAIT_TIMEOUT),
        }
    }
}

/// Scrubs the active clip to an exact time and renders one cell-sized frame.
#[derive(Clone, Debug, Default)]
pub struct FrameSampler {
    opts: SamplerOptions,
}

impl FrameSampler {
    /// Create a sampler.
    pub fn new(opts: SamplerOptions) -> Self {
        Self { opts }
    }

    /// Sampler options.
    pub fn options(&self) -> &SamplerOptions {
        &self.opts
    }

    /// Switch the driver from playback to scrubbing: restart the action paused at time zero.
    pub fn prepare<A: AnimationDriver + ?Sized>(&self, driver: &mut A) -> CaptureResult<AnimationClip> {
        let clip = driver
            .active_clip()
            .ok_or_else(|| CaptureError::precondition("no active animation clip"))?;
        driver.stop();
        driver.play();
        driver.set_paused(true);
        driver.set_time(0.0);
        driver.advance(self.opts.scrub_epsilon_secs);
        Ok(clip)
    }

    /// Render the active clip at `normalized_time` into a `size` bitmap.
    ///
    /// Order: scrub, wait one cycle, commit pose, wait one cycle, lease viewport, render and
    /// read back, decode, release viewport. The viewport and camera extents are restored even
    /// when rendering, decoding or the wait timeout fails.
    #[tracing::instrument(skip(self, driver, ctx), fields(w = size.width, h = size.height))]
    pub async fn sample_frame<A, D>(
        &self,
        driver: &mut A,
        ctx: &mut RenderContext<D>,
        normalized_time: f64,
        size: Viewport,
    ) -> CaptureResult<FrameRGBA>
    where
        A: AnimationDriver + ?Sized,
        D: RenderDevice,
    {
        let clip = driver
            .active_clip()
            .ok_or_else(|| CaptureError::precondition("animation clip vanished mid-capture"))?;
        let t = normalized_time.clamp(0.0, 1.0) * clip.duration_secs;
        driver.set_time(t);

        ctx.device.next_frame().await;
        driver.advance(self.opts.scrub_epsilon_secs);
        ctx.device.next_frame().await;

        let mut lease = ctx.lease_viewport(size);
        let readback_and_decode = async {
            let readback = lease.render_and_read().await?;
            decode_readback(readback)
        };
        let frame = match self.opts.wait_timeout {
            Some(limit) => tokio::time::timeout(limit, readback_and_decode)
                .await
                .map_err(|_| {
                    CaptureError::timeout(format!("frame at t={t:.4}s not ready after {limit:?}"))
                })??,
            None => readback_and_decode.await?,
        };
        drop(lease);

        tracing::debug!(t, "frame sampled");
        Ok(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sample/sampler.rs"]
mod tests;
