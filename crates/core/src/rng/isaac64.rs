//! ISAAC64 generator core.
//!
//! Exact port of Bob Jenkins' ISAAC64 as used by the reference engine:
//! 256-word state, golden-ratio seeding with four warm-up mix rounds, two
//! absorption sweeps, and batch regeneration of 256 results consumed from
//! the top (`r[--n]`). Every operation is wrapping 64-bit arithmetic; any
//! deviation here shifts the entire downstream draw sequence.

const SZ_LOG: usize = 8;
const SZ: usize = 1 << SZ_LOG;
const GOLDEN: u64 = 0x9E37_79B9_7F4A_7C13;

/// `SZ_LOG` bits starting at bit 3, used to index `m` by a previous result.
fn lower_bits(x: u64) -> usize {
    ((x >> 3) & (SZ as u64 - 1)) as usize
}

/// `SZ_LOG` bits starting at bit `SZ_LOG + 3`.
fn upper_bits(y: u64) -> usize {
    ((y >> (SZ_LOG + 3)) & (SZ as u64 - 1)) as usize
}

/// One round of the seeding mixer over the eight-word lane.
fn mix(x: &mut [u64; 8]) {
    const SHIFT: [u32; 8] = [9, 9, 23, 15, 14, 20, 17, 14];
    for i in 0..8 {
        x[i] = x[i].wrapping_sub(x[(i + 4) & 7]);
        if i & 1 == 0 {
            x[(i + 5) & 7] ^= x[(i + 7) & 7] >> SHIFT[i];
        } else {
            x[(i + 5) & 7] ^= x[(i + 7) & 7] << SHIFT[i];
        }
        x[(i + 7) & 7] = x[(i + 7) & 7].wrapping_add(x[i]);
    }
}

#[derive(Clone)]
pub struct Isaac64 {
    m: [u64; SZ],
    r: [u64; SZ],
    a: u64,
    b: u64,
    c: u64,
    /// Results remaining in `r`; consumption walks downward.
    n: usize,
}

impl Isaac64 {
    /// Fresh generator state from a 64-bit seed, absorbed little-endian.
    pub fn from_seed(seed: u64) -> Self {
        let mut ctx =
            Self { m: [0; SZ], r: [0; SZ], a: 0, b: 0, c: 0, n: 0 };
        ctx.absorb_seed(&seed.to_le_bytes());
        ctx
    }

    /// XOR seed bytes into the result array as little-endian words, then
    /// run the full seeding schedule and generate the first batch.
    fn absorb_seed(&mut self, seed: &[u8]) {
        let mut i = 0;
        for chunk in seed.chunks(8) {
            let mut word = 0u64;
            for (j, &byte) in chunk.iter().enumerate() {
                word |= (byte as u64) << (j * 8);
            }
            self.r[i] ^= word;
            i += 1;
        }

        let mut x = [GOLDEN; 8];
        for _ in 0..4 {
            mix(&mut x);
        }

        // First sweep absorbs r, second re-mixes m over itself.
        for k in (0..SZ).step_by(8) {
            for j in 0..8 {
                x[j] = x[j].wrapping_add(self.r[k + j]);
            }
            mix(&mut x);
            self.m[k..k + 8].copy_from_slice(&x);
        }
        for k in (0..SZ).step_by(8) {
            for j in 0..8 {
                x[j] = x[j].wrapping_add(self.m[k + j]);
            }
            mix(&mut x);
            self.m[k..k + 8].copy_from_slice(&x);
        }

        self.update();
    }

    /// Regenerate all 256 results. The step mixing `a` cycles through four
    /// flavors; the partner word sits half the table away (`i ^ SZ/2`).
    fn update(&mut self) {
        self.c = self.c.wrapping_add(1);
        let mut b = self.b.wrapping_add(self.c);
        let mut a = self.a;

        for i in 0..SZ {
            let x = self.m[i];
            a = match i & 3 {
                0 => !(a ^ (a << 21)),
                1 => a ^ (a >> 5),
                2 => a ^ (a << 12),
                _ => a ^ (a >> 33),
            }
            .wrapping_add(self.m[i ^ (SZ / 2)]);
            let y = self.m[lower_bits(x)].wrapping_add(a).wrapping_add(b);
            self.m[i] = y;
            b = self.m[upper_bits(y)].wrapping_add(x);
            self.r[i] = b;
        }

        self.b = b;
        self.a = a;
        self.n = SZ;
    }

    pub fn next_u64(&mut self) -> u64 {
        if self.n == 0 {
            self.update();
        }
        self.n -= 1;
        self.r[self.n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Raw output vectors captured from the reference implementation.
    #[test]
    fn raw_output_matches_reference_for_seed_zero() {
        let mut rng = Isaac64::from_seed(0);
        let expected: [u64; 6] = [
            11_329_126_462_075_137_345,
            3_096_006_490_854_172_103,
            4_961_560_858_198_160_711,
            11_247_167_491_742_853_858,
            8_467_686_926_187_236_489,
            3_643_601_464_190_828_991,
        ];
        for value in expected {
            assert_eq!(rng.next_u64(), value);
        }
    }

    #[test]
    fn raw_output_matches_reference_for_seed_forty_two() {
        let mut rng = Isaac64::from_seed(42);
        let expected: [u64; 6] = [
            13_535_040_523_913_025_898,
            11_186_036_148_076_763_066,
            17_457_813_421_150_709_648,
            14_433_197_483_349_118_045,
            7_996_039_696_826_744_184,
            8_587_010_431_704_612_506,
        ];
        for value in expected {
            assert_eq!(rng.next_u64(), value);
        }
    }

    #[test]
    fn raw_output_matches_reference_for_seed_one() {
        let mut rng = Isaac64::from_seed(1);
        assert_eq!(rng.next_u64(), 16_257_666_806_172_921_645);
        assert_eq!(rng.next_u64(), 12_079_090_740_189_436_754);
    }

    #[test]
    fn stream_survives_batch_regeneration_boundary() {
        let mut a = Isaac64::from_seed(777);
        let mut b = Isaac64::from_seed(777);
        // Cross the 256-result boundary a few times.
        for _ in 0..1_000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }
}
