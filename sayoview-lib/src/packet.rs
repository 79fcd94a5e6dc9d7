//! Wire framing for the screen-read exchange.
//!
//! A full frame is pulled as a batch of fixed-size chunk requests. Each
//! request is a 1024-byte report whose header carries the read-framebuffer
//! command, a 16-bit additive checksum and the little-endian byte offset of
//! the chunk being asked for; the rest is zero padding. Responses echo a
//! declared length and the destination byte offset, with pixel data from
//! byte 12 onward.

use crate::checksum;
use crate::constants::{REQUEST_LEN, RESPONSE_MAX_LEN, RESPONSE_OVERHEAD, RESPONSE_PAYLOAD_START};
use bytes::Bytes;
use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

/// Fixed leading bytes of a chunk request: report id 0x22, command 0x03,
/// checksum placeholder, then the 08 00 25 00 command-class sequence.
const REQUEST_HEADER: [u8; 8] = [0x22, 0x03, 0x00, 0x00, 0x08, 0x00, 0x25, 0x00];

/// Byte position of the little-endian chunk offset field.
const OFFSET_FIELD: usize = 8;

/// One prebuilt read-framebuffer request.
///
/// Only the offset field differs between requests, so the set is built once
/// per session. The checksum covers the offset bytes and is re-sealed before
/// every send.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPacket {
    bytes: [u8; REQUEST_LEN],
}

impl RequestPacket {
    fn new(chunk_offset: u32) -> Self {
        let mut bytes = [0u8; REQUEST_LEN];
        bytes[..REQUEST_HEADER.len()].copy_from_slice(&REQUEST_HEADER);
        bytes[OFFSET_FIELD..OFFSET_FIELD + 4].copy_from_slice(&chunk_offset.to_le_bytes());
        Self { bytes }
    }

    /// Recompute and embed the checksum. Must be called before every send.
    pub fn seal(&mut self) {
        checksum::seal(&mut self.bytes);
    }

    /// Framebuffer byte offset this request asks for.
    pub fn chunk_offset(&self) -> u32 {
        u32::from_le_bytes([self.bytes[8], self.bytes[9], self.bytes[10], self.bytes[11]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Build the ordered request batch covering a `width x height` RGB565 frame.
///
/// Offsets are consecutive multiples of `chunk_size`; together the chunks
/// span exactly `width * height * 2` bytes, the last one truncated by the
/// device to the remainder.
pub fn build_requests(width: usize, height: usize, chunk_size: usize) -> Vec<RequestPacket> {
    let total_bytes = width * height * 2;
    let num_chunks = total_bytes.div_ceil(chunk_size);

    (0..num_chunks)
        .map(|i| RequestPacket::new((i * chunk_size) as u32))
        .collect()
}

#[derive(FromBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct ResponseHeader {
    _cmd: [u8; 4],
    declared_len: U16,
    _reserved: [u8; 2],
    dest_offset: U32,
}

/// One parsed chunk response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseChunk {
    /// Destination byte offset into the raw framebuffer.
    pub dest_offset: u32,
    /// Payload bytes the header accounts for (declared length, clamped to
    /// the protocol maximum, minus the 8 header bytes). May exceed
    /// `payload.len()` if the report was cut short on the wire.
    pub data_len: usize,
    /// Pixel bytes actually present, starting at report byte 12.
    pub payload: Bytes,
}

impl ResponseChunk {
    /// Parse a raw report read from the device.
    ///
    /// Returns `None` for malformed or irrelevant reports: shorter than the
    /// payload start, or declaring no pixel data at all. Such reports are
    /// skipped without touching the framebuffer.
    pub fn parse(report: &Bytes) -> Option<Self> {
        if report.len() < RESPONSE_PAYLOAD_START {
            return None;
        }
        let (header, _) = ResponseHeader::ref_from_prefix(report.as_ref()).ok()?;

        let declared = (header.declared_len.get() as usize).min(RESPONSE_MAX_LEN);
        let data_len = declared.checked_sub(RESPONSE_OVERHEAD)?;
        if data_len == 0 {
            return None;
        }

        let end = report.len().min(RESPONSE_PAYLOAD_START + data_len);
        Some(Self {
            dest_offset: header.dest_offset.get(),
            data_len,
            payload: report.slice(RESPONSE_PAYLOAD_START..end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CHUNK_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};

    #[test]
    fn reference_device_needs_26_requests() {
        let requests = build_requests(SCREEN_WIDTH, SCREEN_HEIGHT, CHUNK_SIZE);
        assert_eq!(requests.len(), 26);
        for (i, req) in requests.iter().enumerate() {
            assert_eq!(req.chunk_offset(), (i * CHUNK_SIZE) as u32);
        }
        assert_eq!(requests.last().unwrap().chunk_offset(), 25300);
    }

    #[test]
    fn request_header_is_bit_exact() {
        let mut req = build_requests(SCREEN_WIDTH, SCREEN_HEIGHT, CHUNK_SIZE)
            .into_iter()
            .nth(1)
            .unwrap();
        req.seal();
        let bytes = req.as_bytes();

        assert_eq!(bytes.len(), REQUEST_LEN);
        // chunk 1: report id + command, checksum 0x0743, command class,
        // LE offset 0x3F4
        let expected = hex::decode("2203430708002500f4030000").unwrap();
        assert_eq!(&bytes[..12], &expected[..]);
        assert!(bytes[12..].iter().all(|&b| b == 0));

        // checksum over the zeroed-field packet matches the embedded value
        let mut zeroed = bytes.to_vec();
        zeroed[2] = 0;
        zeroed[3] = 0;
        assert_eq!(
            u16::from_le_bytes([bytes[2], bytes[3]]),
            crate::checksum::compute(&zeroed)
        );
    }

    #[test]
    fn chunks_cover_frame_without_gaps_or_overlap() {
        for (w, h, chunk) in [(160, 80, 0x3F4), (128, 64, 0x200), (32, 32, 300), (16, 8, 1012)] {
            let requests = build_requests(w, h, chunk);
            let total = w * h * 2;

            let mut expected = 0usize;
            for req in &requests {
                assert_eq!(req.chunk_offset() as usize, expected);
                expected += chunk;
            }
            assert!(expected >= total, "chunks must span the whole frame");
            assert!(expected - total < chunk, "no fully redundant trailing chunk");
        }
    }

    #[test]
    fn parse_full_response() {
        let mut report = vec![0u8; 1024];
        report[4] = 0xFC; // declared_len = 0x3FC
        report[5] = 0x03;
        report[8] = 0xF4; // dest_offset = 0x3F4
        report[9] = 0x03;
        report[12] = 0xAB;

        let chunk = ResponseChunk::parse(&Bytes::from(report)).expect("valid response");
        assert_eq!(chunk.dest_offset, 0x3F4);
        assert_eq!(chunk.data_len, 0x3FC - 8);
        assert_eq!(chunk.payload.len(), 0x3FC - 8);
        assert_eq!(chunk.payload[0], 0xAB);
    }

    #[test]
    fn parse_clamps_declared_length() {
        let mut report = vec![0u8; 1024];
        report[4] = 0xFF; // declares 0xFFFF, far beyond the protocol cap
        report[5] = 0xFF;

        let chunk = ResponseChunk::parse(&Bytes::from(report)).expect("valid response");
        assert_eq!(chunk.data_len, RESPONSE_MAX_LEN - RESPONSE_OVERHEAD);
    }

    #[test]
    fn parse_rejects_malformed_reports() {
        // too short to hold a header
        assert_eq!(ResponseChunk::parse(&Bytes::from_static(&[0x22, 0x03])), None);

        // declares only the header overhead, no pixel data
        let mut report = vec![0u8; 64];
        report[4] = RESPONSE_OVERHEAD as u8;
        assert_eq!(ResponseChunk::parse(&Bytes::from(report)), None);

        // declares less than the overhead
        let mut report = vec![0u8; 64];
        report[4] = 4;
        assert_eq!(ResponseChunk::parse(&Bytes::from(report)), None);
    }
}
