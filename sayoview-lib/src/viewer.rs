//! Consumer-facing pull boundary for rendering front ends.

use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::frame::DecodedFrame;
use crate::pacing::FpsCounter;
use crate::relay::FrameReceiver;

/// Pulls the latest frame off the relay and decodes it on demand.
///
/// One `poll` per consumer iteration: it ticks the FPS counter, decodes the
/// newest relayed frame if there is one, and otherwise leaves the last
/// decoded frame in place, so a stalled device shows a stale picture rather
/// than a blank one.
pub struct ScreenViewer {
    frames: FrameReceiver,
    decoded: DecodedFrame,
    have_frame: bool,
    fps: FpsCounter,
}

impl ScreenViewer {
    pub fn new(frames: FrameReceiver) -> Self {
        Self {
            frames,
            decoded: DecodedFrame::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            have_frame: false,
            fps: FpsCounter::new(),
        }
    }

    /// Advance one consumer iteration. Returns the freshly decoded frame,
    /// or `None` when nothing new arrived since the last call.
    pub fn poll(&mut self) -> Option<&DecodedFrame> {
        self.fps.tick();
        let raw = self.frames.try_take()?;
        self.decoded.decode_from(&raw);
        self.have_frame = true;
        Some(&self.decoded)
    }

    /// Last decoded frame, if any cycle has ever completed.
    pub fn latest(&self) -> Option<&DecodedFrame> {
        self.have_frame.then_some(&self.decoded)
    }

    /// Consumer iterations measured over the last full second.
    pub fn fps(&self) -> u32 {
        self.fps.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RawFrame;
    use crate::relay::frame_relay;

    #[test]
    fn poll_decodes_new_frames_and_keeps_the_last() {
        let (tx, rx) = frame_relay();
        let mut viewer = ScreenViewer::new(rx);

        assert!(viewer.poll().is_none());
        assert!(viewer.latest().is_none());

        // a frame of zeros decodes to all-black
        assert!(tx.try_publish(RawFrame::new(SCREEN_WIDTH, SCREEN_HEIGHT)));

        let frame = viewer.poll().expect("new frame");
        assert!(frame.rgb().iter().all(|&b| b == 0));

        // nothing new, but the decoded frame survives
        assert!(viewer.poll().is_none());
        assert!(viewer.latest().is_some());
    }
}
