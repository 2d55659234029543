use super::field::gf_mul;
use super::{BLOCK_SIZE, Block};

pub trait GHash {
    fn init(&mut self, key: &Block);
    fn reset(&mut self);

    // hash data, padding 0 if data is not of length of multiple of 128
    fn update(&mut self, data: &[u8]);
    fn update_u64x2(&mut self, a: u64, b: u64);
    fn sum(&self, h: &mut Block);
}

/// Bitwise GHASH: y = (y ^ block) * H for each block, Horner's rule.
#[derive(Default, Clone)]
pub struct GHasher {
    key: Block,
    y: Block,
}

impl GHasher {
    pub fn new(key: &Block) -> Self {
        GHasher { key: *key, y: [0; BLOCK_SIZE] }
    }

    #[inline]
    fn update_block(&mut self, block: &[u8]) {
        debug_assert!(block.len() <= BLOCK_SIZE);
        self.y.iter_mut().zip(block).for_each(|(y, b)| *y ^= *b);
        gf_mul(&mut self.y, &self.key);
    }
}

impl GHash for GHasher {
    fn init(&mut self, key: &Block) {
        self.key = *key;
        self.y = [0; BLOCK_SIZE];
    }

    fn reset(&mut self) {
        self.y = [0; BLOCK_SIZE];
    }

    // A short final block only touches the prefix of y, which is the
    // same as xoring in the zero padded block.
    fn update(&mut self, data: &[u8]) {
        let mut blocks = data.chunks_exact(BLOCK_SIZE);
        for block in &mut blocks {
            self.update_block(block);
        }
        let tail = blocks.remainder();
        if !tail.is_empty() {
            self.update_block(tail);
        }
    }

    fn update_u64x2(&mut self, a: u64, b: u64) {
        let mut block = [0; BLOCK_SIZE];
        block[..8].copy_from_slice(&a.to_be_bytes());
        block[8..].copy_from_slice(&b.to_be_bytes());
        self.update_block(&block);
    }

    fn sum(&self, h: &mut Block) {
        h.copy_from_slice(&self.y);
    }
}
