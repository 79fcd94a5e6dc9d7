//! Frame acquisition: one cycle sends the whole request batch, then polls
//! the transport until the raster is covered or the device stalls out.
//!
//! A cycle assembles into a private scratch buffer and publishes only a
//! finished frame; abandoned cycles publish nothing, so the consumer keeps
//! showing the previous frame. Neither side ever blocks on the other.

use crate::constants::{
    CHUNK_SIZE, MAX_STALL_WINDOWS, READ_BACKOFF, SCREEN_HEIGHT, SCREEN_WIDTH, STALL_WINDOW,
};
use crate::device::ScreenTransport;
use crate::error::ScreenError;
use crate::frame::RawFrame;
use crate::packet::{RequestPacket, ResponseChunk, build_requests};
use crate::relay::{FramePublisher, FrameReceiver, frame_relay};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Reassembles chunk responses into a raster at their declared offsets.
///
/// Completion is tracked by accumulating the sample count each response
/// accounts for; individual samples landing outside the raster are dropped
/// without being written, but still count toward coverage, matching the
/// device's own accounting.
pub struct FrameAssembler {
    width: usize,
    height: usize,
    scratch: Box<[u16]>,
    received: usize,
}

impl FrameAssembler {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            scratch: vec![0u16; width * height].into_boxed_slice(),
            received: 0,
        }
    }

    /// Clear the scratch raster for a fresh cycle.
    pub fn reset(&mut self) {
        self.scratch.fill(0);
        self.received = 0;
    }

    /// Place a response's samples and return how many it accounted for.
    pub fn absorb(&mut self, chunk: &ResponseChunk) -> usize {
        let pos = (chunk.dest_offset / 2) as usize;
        for (j, sample) in chunk.payload.chunks_exact(2).enumerate() {
            if let Some(slot) = self.scratch.get_mut(pos + j) {
                *slot = u16::from_le_bytes([sample[0], sample[1]]);
            }
        }
        let samples = chunk.data_len / 2;
        self.received += samples;
        samples
    }

    pub fn is_complete(&self) -> bool {
        self.received >= self.scratch.len()
    }

    /// Hand out the assembled frame and reset for the next cycle.
    pub fn finish(&mut self) -> RawFrame {
        let frame = RawFrame::from_samples(self.width, self.height, self.scratch.clone());
        self.reset();
        frame
    }
}

/// Poll/backoff parameters of one cycle. Defaults match the device.
#[derive(Debug, Clone, Copy)]
pub struct CycleTiming {
    /// Sleep after an empty read.
    pub read_backoff: Duration,
    /// Quiet time charged as one stall window.
    pub stall_window: Duration,
    /// Stall windows tolerated before abandoning the cycle.
    pub max_stalls: u32,
}

impl Default for CycleTiming {
    fn default() -> Self {
        Self {
            read_backoff: READ_BACKOFF,
            stall_window: STALL_WINDOW,
            max_stalls: MAX_STALL_WINDOWS,
        }
    }
}

/// Outcome of one acquisition cycle. Timing out is a normal outcome, not an
/// error: the cycle is abandoned and the previous frame stays current.
#[derive(Debug)]
pub enum CycleOutcome {
    Complete(RawFrame),
    TimedOut,
}

/// Drives full-frame acquisition cycles over an owned transport.
pub struct Acquisition<T: ScreenTransport> {
    transport: T,
    requests: Vec<RequestPacket>,
    assembler: FrameAssembler,
    timing: CycleTiming,
}

impl<T: ScreenTransport> Acquisition<T> {
    /// Acquisition at the reference device's 160x80 dimensions.
    pub fn new(transport: T) -> Self {
        Self::with_dimensions(transport, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    pub fn with_dimensions(transport: T, width: usize, height: usize) -> Self {
        Self {
            transport,
            requests: build_requests(width, height, CHUNK_SIZE),
            assembler: FrameAssembler::new(width, height),
            timing: CycleTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: CycleTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Run one full acquisition cycle.
    ///
    /// Sends every request with a freshly sealed checksum, then polls for
    /// responses, backing off briefly on empty reads. The stall counter is
    /// reset by any non-empty read, malformed or not; only consecutive
    /// quiet windows advance it. A transport error aborts this cycle only.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome, ScreenError> {
        self.assembler.reset();

        for request in &mut self.requests {
            request.seal();
            self.transport.write(request.as_bytes())?;
        }

        let mut stalls = 0u32;
        let mut stall_start = Instant::now();

        while !self.assembler.is_complete() {
            if stalls >= self.timing.max_stalls {
                return Ok(CycleOutcome::TimedOut);
            }
            match self.transport.try_read()? {
                Some(report) => {
                    stalls = 0;
                    stall_start = Instant::now();
                    if let Some(chunk) = ResponseChunk::parse(&report) {
                        self.assembler.absorb(&chunk);
                    } else {
                        trace!(len = report.len(), "skipping malformed response");
                    }
                }
                None => {
                    thread::sleep(self.timing.read_backoff);
                    if stall_start.elapsed() >= self.timing.stall_window {
                        stalls += 1;
                        stall_start = Instant::now();
                    }
                }
            }
        }

        Ok(CycleOutcome::Complete(self.assembler.finish()))
    }

    /// Run cycles back-to-back on a dedicated thread until `shutdown` is
    /// observed, publishing completed frames without ever blocking. An
    /// in-flight cycle runs to completion or its own timeout first.
    pub fn spawn(self, shutdown: Arc<AtomicBool>) -> (FrameReceiver, JoinHandle<()>)
    where
        T: Send + 'static,
    {
        let (publisher, receiver) = frame_relay();
        let handle = thread::spawn(move || acquisition_loop(self, publisher, shutdown));
        (receiver, handle)
    }
}

fn acquisition_loop<T: ScreenTransport>(
    mut acquisition: Acquisition<T>,
    frames: FramePublisher,
    shutdown: Arc<AtomicBool>,
) {
    info!("acquisition loop started");
    while !shutdown.load(Ordering::Relaxed) {
        match acquisition.run_cycle() {
            Ok(CycleOutcome::Complete(frame)) => {
                if !frames.try_publish(frame) {
                    trace!("frame relay full, dropping frame");
                }
            }
            Ok(CycleOutcome::TimedOut) => {
                debug!("acquisition cycle timed out, keeping previous frame");
            }
            Err(e) => {
                warn!("acquisition cycle failed: {e}");
            }
        }
    }
    info!("acquisition loop stopped");
}
