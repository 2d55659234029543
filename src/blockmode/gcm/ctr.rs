use super::{BLOCK_SIZE, Block};
use crate::traits::BlockCipher;

// Increment the rightmost 32 bits, modulo 2^32. The leftmost 96 bits are
// never touched.
#[inline]
pub(crate) fn inc32(counter: &mut Block) {
    let ctr = &mut counter[BLOCK_SIZE - 4..];
    let x = u32::from_be_bytes([ctr[0], ctr[1], ctr[2], ctr[3]]).wrapping_add(1);
    ctr.copy_from_slice(&x.to_be_bytes());
}

/// The CTR state of one message, GCTR in SP 800-38D.
#[derive(Default, Clone)]
pub(crate) struct Counter {
    block: Block,
}

impl Counter {
    // The first counter is inc32(J0); J0 itself is reserved for the tag mask.
    pub fn new(pre_counter: &Block) -> Self {
        let mut block = *pre_counter;
        inc32(&mut block);
        Counter { block }
    }

    #[inline]
    pub fn block(&self) -> &Block {
        &self.block
    }

    #[inline]
    fn keystream<B: BlockCipher + ?Sized>(&mut self, cipher: &B, buf: &mut Block) {
        cipher.encrypt_block(buf, &self.block);
        inc32(&mut self.block);
    }

    // crypts src into dst[..src.len()], the rest of dst is left alone.
    // A partial tail still consumes a whole counter block.
    pub fn crypt<B: BlockCipher + ?Sized>(&mut self, cipher: &B, dst: &mut [u8], src: &[u8]) {
        debug_assert!(dst.len() >= src.len());
        let mut buffer = [0u8; BLOCK_SIZE];

        for (d, s) in dst.chunks_mut(BLOCK_SIZE).zip(src.chunks(BLOCK_SIZE)) {
            self.keystream(cipher, &mut buffer);
            d.iter_mut()
                .zip(s)
                .zip(&buffer)
                .for_each(|((z, x), y)| *z = *x ^ *y);
        }
    }

    pub fn crypt_inplace<B: BlockCipher + ?Sized>(&mut self, cipher: &B, in_out: &mut [u8]) {
        let mut buffer = [0u8; BLOCK_SIZE];

        for chunk in in_out.chunks_mut(BLOCK_SIZE) {
            self.keystream(cipher, &mut buffer);
            chunk.iter_mut().zip(&buffer).for_each(|(z, y)| *z ^= *y);
        }
    }
}
