// Note: For GCM standard, a 16 Bytes sequence represents a polynomial of degree 127 in GF(2)[x]
// The Bytes sequence is in little endian.
// But in each byte is "big-endian". For example, 0x80, the first bit is 1, and 0x01, the 7-th bit is 1.
// Example:
// [0x80, 00, ..., 0x01] <=> x^127 + 1
// [b0, b1, b2, ..., b15]:
// coefficient of:
// x^0 = (b0 >> 7) & 1
// x^1 = (b0 >> 6) & 1
// ....
// x^126 = (b15 >> 1) & 1
// x^127 = b15 & 1
//
// GF(2^128) = GF(2)[x]/(x^128 + x^7 + x^2 + x + 1)
use super::{BLOCK_SIZE, Block};
use core::ops::{Add, AddAssign, Mul, MulAssign};

// x^7 + x^2 + x + 1 in the bit order above, placed in byte 0.
pub const GHASH_POLYNOMIAL: u8 = 0xe1;

// Multiplication by x (the element 010...0): a big-endian shift right by
// one bit. If the bit shifted out is one, the defining polynomial is added
// to cancel the x^128 term.
#[inline]
pub(crate) fn rightshift(x: &mut Block) {
    let mask = 0u8.wrapping_sub(x[BLOCK_SIZE - 1] & 1);
    for i in (1..BLOCK_SIZE).rev() {
        x[i] = (x[i] >> 1) | (x[i - 1] << 7);
    }
    x[0] = (x[0] >> 1) ^ (mask & GHASH_POLYNOMIAL);
}

// Sets a <- a * b mod P, using the plain bitwise algorithm from
// SP 800-38D, algorithm 1.
pub(crate) fn gf_mul(a: &mut Block, b: &Block) {
    let mut v = *a;
    let mut z = [0u8; BLOCK_SIZE];

    for &byte in b {
        let mut byte = byte;
        for _ in 0..8 {
            let mask = 0u8.wrapping_sub(byte >> 7);
            z.iter_mut().zip(&v).for_each(|(z, v)| *z ^= *v & mask);
            rightshift(&mut v);
            byte <<= 1;
        }
    }
    *a = z;
}

/// An element of GF(2^128) in GCM's bit-reflected byte layout.
#[derive(Default, Copy, Clone, Eq, PartialEq, Debug)]
pub struct FieldElement(pub Block);

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement([0; BLOCK_SIZE]);

    // The polynomial 1, whose x^0 coefficient is the MSB of byte 0.
    pub const ONE: FieldElement = {
        let mut one = [0; BLOCK_SIZE];
        one[0] = 0x80;
        FieldElement(one)
    };

    #[inline]
    pub fn bytes(self) -> Block {
        self.0
    }

    /// Returns self * x.
    #[inline]
    pub fn mul_x(mut self) -> Self {
        rightshift(&mut self.0);
        self
    }
}

impl From<Block> for FieldElement {
    #[inline]
    fn from(b: Block) -> Self {
        FieldElement(b)
    }
}

impl Add for FieldElement {
    type Output = FieldElement;
    #[inline]
    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for FieldElement {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0.iter_mut().zip(&rhs.0).for_each(|(z, x)| *z ^= *x);
    }
}

impl Mul for FieldElement {
    type Output = FieldElement;
    #[inline]
    fn mul(mut self, rhs: Self) -> Self::Output {
        self *= rhs;
        self
    }
}

impl MulAssign for FieldElement {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        gf_mul(&mut self.0, &rhs.0);
    }
}
