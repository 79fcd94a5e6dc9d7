//! Bounded hand-off between the acquisition loop and the consumer.
//!
//! Capacity 2: one frame in flight plus one buffered, without ever blocking
//! either side. This is a latest-frame relay, not a lossless pipe - a full
//! relay drops the newcomer, an empty relay leaves the consumer reusing its
//! last decoded frame.

use crate::constants::FRAME_RELAY_DEPTH;
use crate::frame::RawFrame;
use crossbeam_channel::{Receiver, Sender, bounded};

pub struct FramePublisher {
    tx: Sender<RawFrame>,
}

impl FramePublisher {
    /// Non-blocking publish. Returns `false` when the relay is full; the
    /// frame is dropped and the previous one stays current downstream.
    pub fn try_publish(&self, frame: RawFrame) -> bool {
        self.tx.try_send(frame).is_ok()
    }
}

pub struct FrameReceiver {
    rx: Receiver<RawFrame>,
}

impl FrameReceiver {
    /// Non-blocking take. `None` means no new frame since the last call.
    pub fn try_take(&self) -> Option<RawFrame> {
        self.rx.try_recv().ok()
    }
}

/// Create a connected publisher/receiver pair.
pub fn frame_relay() -> (FramePublisher, FrameReceiver) {
    let (tx, rx) = bounded(FRAME_RELAY_DEPTH);
    (FramePublisher { tx }, FrameReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tag: u16) -> RawFrame {
        RawFrame::from_samples(2, 2, vec![tag; 4].into_boxed_slice())
    }

    #[test]
    fn third_publish_is_dropped() {
        let (tx, rx) = frame_relay();
        assert!(tx.try_publish(frame(1)));
        assert!(tx.try_publish(frame(2)));
        assert!(!tx.try_publish(frame(3)));

        // the queued pair is untouched, FIFO order preserved
        assert_eq!(rx.try_take().unwrap().samples()[0], 1);
        assert_eq!(rx.try_take().unwrap().samples()[0], 2);
        assert!(rx.try_take().is_none());
    }

    #[test]
    fn empty_take_never_blocks() {
        let (_tx, rx) = frame_relay();
        assert!(rx.try_take().is_none());
    }
}
