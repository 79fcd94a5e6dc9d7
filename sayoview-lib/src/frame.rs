//! Raster buffers and the RGB565 -> RGB888 decode.

/// 8-bit expansions of the 5-bit red channel codes.
pub static RED_LUT: [u8; 32] = replicate_lut::<32>(3, 2);
/// 8-bit expansions of the 6-bit green channel codes.
pub static GREEN_LUT: [u8; 64] = replicate_lut::<64>(2, 4);
/// 8-bit expansions of the 5-bit blue channel codes.
pub static BLUE_LUT: [u8; 32] = replicate_lut::<32>(3, 2);

/// Bit-replication expansion: shift the code into the high bits and fill the
/// freed low bits with the code's own top bits, so 0 maps to 0x00 and the
/// all-ones code maps to 0xFF.
const fn replicate_lut<const N: usize>(shift: u32, back: u32) -> [u8; N] {
    let mut lut = [0u8; N];
    let mut code = 0usize;
    while code < N {
        lut[code] = ((code << shift) | (code >> back)) as u8;
        code += 1;
    }
    lut
}

/// A fully assembled frame of packed RGB565 samples, row-major.
///
/// Fixed-size for the lifetime of a session; the assembler fills a private
/// scratch copy and only hands out finished frames.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    width: usize,
    height: usize,
    samples: Box<[u16]>,
}

impl RawFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![0u16; width * height].into_boxed_slice(),
        }
    }

    pub(crate) fn from_samples(width: usize, height: usize, samples: Box<[u16]>) -> Self {
        debug_assert_eq!(samples.len(), width * height);
        Self { width, height, samples }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }
}

/// An unpacked RGB888 frame, `height x width x 3` bytes, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    width: usize,
    height: usize,
    rgb: Box<[u8]>,
}

impl DecodedFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgb: vec![0u8; width * height * 3].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Interleaved RGB bytes, three per pixel.
    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// Decode a raw frame into this buffer, element-wise through the LUTs.
    pub fn decode_from(&mut self, raw: &RawFrame) {
        debug_assert_eq!((raw.width, raw.height), (self.width, self.height));

        for (sample, px) in raw.samples.iter().zip(self.rgb.chunks_exact_mut(3)) {
            px[0] = RED_LUT[(sample >> 11) as usize & 0x1F];
            px[1] = GREEN_LUT[(sample >> 5) as usize & 0x3F];
            px[2] = BLUE_LUT[*sample as usize & 0x1F];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_endpoints_replicate_to_full_scale() {
        assert_eq!(RED_LUT[0x00], 0x00);
        assert_eq!(RED_LUT[0x1F], 0xFF);
        assert_eq!(GREEN_LUT[0x00], 0x00);
        assert_eq!(GREEN_LUT[0x3F], 0xFF);
        assert_eq!(BLUE_LUT[0x1F], 0xFF);
    }

    #[test]
    fn lut_matches_replication_formula() {
        for code in 0..32 {
            assert_eq!(RED_LUT[code], ((code << 3) | (code >> 2)) as u8);
        }
        for code in 0..64 {
            assert_eq!(GREEN_LUT[code], ((code << 2) | (code >> 4)) as u8);
        }
    }

    #[test]
    fn decode_primary_colors() {
        let mut raw = RawFrame::new(4, 1);
        raw.samples[0] = 0xF800; // pure red
        raw.samples[1] = 0x07E0; // pure green
        raw.samples[2] = 0x001F; // pure blue
        raw.samples[3] = 0xFFFF; // white

        let mut decoded = DecodedFrame::new(4, 1);
        decoded.decode_from(&raw);

        assert_eq!(&decoded.rgb()[0..3], &[0xFF, 0x00, 0x00]);
        assert_eq!(&decoded.rgb()[3..6], &[0x00, 0xFF, 0x00]);
        assert_eq!(&decoded.rgb()[6..9], &[0x00, 0x00, 0xFF]);
        assert_eq!(&decoded.rgb()[9..12], &[0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn decode_mixed_sample() {
        // r=0b10000, g=0b100000, b=0b01000
        let sample = (0b10000u16 << 11) | (0b100000 << 5) | 0b01000;
        let mut raw = RawFrame::new(1, 1);
        raw.samples[0] = sample;

        let mut decoded = DecodedFrame::new(1, 1);
        decoded.decode_from(&raw);
        assert_eq!(decoded.rgb(), &[0x84, 0x82, 0x42]);
    }
}
