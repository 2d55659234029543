use crate::blockmode::gcm::{BLOCK_SIZE, Block};

/// A 128-bit block cipher, forward direction only.
///
/// GCM never calls the inverse cipher, so this is the whole contract: a
/// deterministic function of the key schedule and one input block.
pub trait BlockCipher {
    fn encrypt_block(&self, dst: &mut Block, src: &Block);

    fn encrypt_block_inplace(&self, in_out: &mut Block) {
        let src = *in_out;
        self.encrypt_block(in_out, &src);
    }

    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }
}

// Lets a bare callback stand in for a cipher context.
impl<F> BlockCipher for F
where
    F: Fn(&mut Block, &Block),
{
    #[inline]
    fn encrypt_block(&self, dst: &mut Block, src: &Block) {
        self(dst, src)
    }
}

pub trait AEAD {
    type Error;

    // NonceSize returns the size of the nonce that must be passed to Seal
    // and Open.
    fn nonce_size(&self) -> usize;

    // Overhead returns the maximum difference between the lengths of a
    // plaintext and its ciphertext.
    fn overhead(&self) -> usize;

    fn seal(&self, out: &mut [u8], nonce: &[u8], plaintext: &[u8], add: Option<&[u8]>) -> Result<(), Self::Error>;

    fn open(&self, out: &mut [u8], nonce: &[u8], ciphertext: &[u8], add: Option<&[u8]>) -> Result<usize, Self::Error>;

    fn seal_inplace(&self, in_out: &mut [u8], tag: &mut [u8], nonce: &[u8], add: Option<&[u8]>) -> Result<(), Self::Error>;

    fn open_inplace(&self, in_out: &mut [u8], tag: &[u8], nonce: &[u8], add: Option<&[u8]>) -> Result<(), Self::Error>;
}
