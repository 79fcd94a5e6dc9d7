//! Additive checksum embedded in outgoing request packets.
//!
//! The device sums the whole 1024-byte report as little-endian 16-bit words
//! with the checksum field itself zeroed, and keeps the low 16 bits of the
//! result. Summation runs in 32-bit precision; only the final value is
//! masked, so intermediate carries beyond 16 bits are discarded once.

/// Byte position of the 2-byte checksum field inside a request packet.
pub const CHECKSUM_FIELD: usize = 2;

/// Compute the checksum over a byte slice of little-endian 16-bit words.
///
/// The caller is responsible for zeroing the checksum field first; this
/// function just folds words. Input length must be even.
pub fn compute(data: &[u8]) -> u16 {
    debug_assert!(data.len() % 2 == 0, "checksum input must be whole words");

    let sum: u32 = data
        .chunks_exact(2)
        .map(|w| u32::from(u16::from_le_bytes([w[0], w[1]])))
        .sum();
    (sum & 0xFFFF) as u16
}

/// Zero the checksum field, compute over the full packet, and write the
/// result back little-endian. Idempotent: sealing an already-sealed packet
/// yields the same bytes.
pub fn seal(packet: &mut [u8]) {
    packet[CHECKSUM_FIELD] = 0;
    packet[CHECKSUM_FIELD + 1] = 0;
    let sum = compute(packet);
    packet[CHECKSUM_FIELD..CHECKSUM_FIELD + 2].copy_from_slice(&sum.to_le_bytes());
}
