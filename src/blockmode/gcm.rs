mod ctr;
pub mod field;
pub mod ghash;

use ctr::Counter;
use ghash::{GHash, GHasher};

use super::{Error, Result};
use crate::traits::AEAD;
use crate::traits::BlockCipher;
use subtle::ConstantTimeEq;

pub const BLOCK_SIZE: usize = 16;
pub const TAG_SIZE: usize = 16;
pub const MIN_TAG_SIZE: usize = 12;
pub const NONCE_SIZE: usize = 12;

pub type Block = [u8; BLOCK_SIZE];

// SP 800-38D 5.2.1.1: len(P) <= 2^39 - 256 bits, i.e. 2^32 - 2 blocks, the
// most a 32-bit counter can cover without reusing J0 or a keystream block.
const MAX_DATA_SIZE: u64 = ((1 << 32) - 2) * BLOCK_SIZE as u64;
// len(A) <= 2^64 - 1 bits.
const MAX_AUTH_SIZE: u64 = u64::MAX / 8;

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    #[default]
    Unkeyed,
    Keyed,
    Armed,
    Authenticating,
    Transforming,
    Finalized,
}

/// A streaming GCM session.
///
/// The cipher is borrowed on every call rather than owned, so one key
/// schedule can serve many sessions. Per message the calls go
/// [`set_iv`](Self::set_iv), any number of [`authenticate`](Self::authenticate),
/// any number of [`encrypt`](Self::encrypt) or [`decrypt`](Self::decrypt), then
/// [`digest`](Self::digest). Within each phase only the last call may pass a
/// length that is not a multiple of 16.
///
/// `digest` only produces a tag. When decrypting, the caller must compare it
/// with the received tag using [`verify_tag`] and discard the plaintext on
/// mismatch. Nothing here enforces that.
#[derive(Default, Clone)]
pub struct GcmContext {
    // J0, the pre-counter block. E(J0) masks the tag.
    iv: Block,
    ctr: Counter,
    x: GHasher,
    auth_size: u64,
    data_size: u64,
    state: State,
}

impl GcmContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the hash subkey H = E_K(0^128). Any message in flight is
    /// dropped and a new IV must be set.
    pub fn set_key<B: BlockCipher + ?Sized>(&mut self, cipher: &B) {
        debug_assert_eq!(cipher.block_size(), BLOCK_SIZE);

        let mut h = [0; BLOCK_SIZE];
        cipher.encrypt_block_inplace(&mut h);

        *self = GcmContext {
            x: GHasher::new(&h),
            state: State::Keyed,
            ..Default::default()
        };
    }

    /// Arms the session for a new message under the current key.
    pub fn set_iv(&mut self, nonce: &[u8]) -> Result<()> {
        if self.state == State::Unkeyed {
            return Err(Error::MisalignedPhaseTransition("IV set before key"));
        }
        if nonce.len() != NONCE_SIZE {
            return Err(Error::InvalidIvLength(nonce.len()));
        }

        self.iv[..NONCE_SIZE].copy_from_slice(nonce);
        self.iv[NONCE_SIZE..].copy_from_slice(&1u32.to_be_bytes());
        self.ctr = Counter::new(&self.iv);

        self.x.reset();
        self.auth_size = 0;
        self.data_size = 0;
        self.state = State::Armed;
        Ok(())
    }

    /// Feeds additional data, authenticated but not encrypted.
    pub fn authenticate(&mut self, data: &[u8]) -> Result<()> {
        match self.state {
            State::Armed | State::Authenticating => {}
            State::Unkeyed | State::Keyed => {
                return Err(Error::MisalignedPhaseTransition("authenticate before IV"));
            }
            State::Transforming => {
                return Err(Error::MisalignedPhaseTransition("authenticate after data"));
            }
            State::Finalized => {
                return Err(Error::MisalignedPhaseTransition("authenticate after digest"));
            }
        }
        if self.auth_size % BLOCK_SIZE as u64 != 0 {
            return Err(Error::MisalignedPhaseTransition(
                "authenticate after a partial block",
            ));
        }
        let auth_size = self
            .auth_size
            .checked_add(data.len() as u64)
            .filter(|n| *n <= MAX_AUTH_SIZE)
            .ok_or(Error::DataTooLong)?;

        self.x.update(data);
        self.auth_size = auth_size;
        self.state = State::Authenticating;
        Ok(())
    }

    pub fn encrypt<B: BlockCipher + ?Sized>(&mut self, cipher: &B, dst: &mut [u8], src: &[u8]) -> Result<()> {
        if dst.len() < src.len() {
            return Err(Error::OutputTooSmall(src.len(), dst.len()));
        }
        let data_size = self.begin_data(src.len())?;

        let dst = &mut dst[..src.len()];
        self.ctr.crypt(cipher, dst, src);
        self.x.update(dst);
        self.end_data(data_size);
        Ok(())
    }

    pub fn encrypt_inplace<B: BlockCipher + ?Sized>(&mut self, cipher: &B, in_out: &mut [u8]) -> Result<()> {
        let data_size = self.begin_data(in_out.len())?;

        self.ctr.crypt_inplace(cipher, in_out);
        self.x.update(in_out);
        self.end_data(data_size);
        Ok(())
    }

    // GHASH always runs over the ciphertext: here it is hashed before it
    // is transformed.
    pub fn decrypt<B: BlockCipher + ?Sized>(&mut self, cipher: &B, dst: &mut [u8], src: &[u8]) -> Result<()> {
        if dst.len() < src.len() {
            return Err(Error::OutputTooSmall(src.len(), dst.len()));
        }
        let data_size = self.begin_data(src.len())?;

        self.x.update(src);
        self.ctr.crypt(cipher, &mut dst[..src.len()], src);
        self.end_data(data_size);
        Ok(())
    }

    pub fn decrypt_inplace<B: BlockCipher + ?Sized>(&mut self, cipher: &B, in_out: &mut [u8]) -> Result<()> {
        let data_size = self.begin_data(in_out.len())?;

        self.x.update(in_out);
        self.ctr.crypt_inplace(cipher, in_out);
        self.end_data(data_size);
        Ok(())
    }

    /// Writes the first `tag.len()` bytes of the authentication tag and
    /// finalizes the message. Set a fresh IV to start the next one.
    pub fn digest<B: BlockCipher + ?Sized>(&mut self, cipher: &B, tag: &mut [u8]) -> Result<()> {
        if tag.len() > TAG_SIZE {
            return Err(Error::TagTooLong(tag.len()));
        }
        match self.state {
            State::Armed | State::Authenticating | State::Transforming => {}
            State::Unkeyed | State::Keyed => {
                return Err(Error::MisalignedPhaseTransition("digest before IV"));
            }
            State::Finalized => {
                return Err(Error::MisalignedPhaseTransition("digest called twice"));
            }
        }

        self.x.update_u64x2(self.auth_size * 8, self.data_size * 8);

        let mut tag_mask = [0; BLOCK_SIZE];
        cipher.encrypt_block(&mut tag_mask, &self.iv);

        let mut s = [0; BLOCK_SIZE];
        self.x.sum(&mut s);
        tag.iter_mut()
            .zip(s.iter().zip(&tag_mask))
            .for_each(|(t, (s, m))| *t = *s ^ *m);

        self.state = State::Finalized;
        Ok(())
    }

    /// The next counter block to be encrypted.
    pub fn counter(&self) -> &Block {
        self.ctr.block()
    }

    // Checks that data may be transformed now, returns the new data size.
    fn begin_data(&self, len: usize) -> Result<u64> {
        match self.state {
            State::Armed | State::Authenticating | State::Transforming => {}
            State::Unkeyed | State::Keyed => {
                return Err(Error::MisalignedPhaseTransition("data before IV"));
            }
            State::Finalized => {
                return Err(Error::MisalignedPhaseTransition("data after digest"));
            }
        }
        if self.data_size % BLOCK_SIZE as u64 != 0 {
            return Err(Error::MisalignedPhaseTransition(
                "data after a partial block",
            ));
        }
        self.data_size
            .checked_add(len as u64)
            .filter(|n| *n <= MAX_DATA_SIZE)
            .ok_or(Error::DataTooLong)
    }

    #[inline]
    fn end_data(&mut self, data_size: u64) {
        self.data_size = data_size;
        self.state = State::Transforming;
    }
}

/// Compares a computed tag with a received one in constant time.
/// Tags of different lengths never match.
pub fn verify_tag(expected: &[u8], received: &[u8]) -> bool {
    expected.ct_eq(received).into()
}

// Returns a GCM instance with standard nonce size 12 and tag size 16.
pub fn new_gcm_std<B: BlockCipher>(cipher: B) -> Gcm<B, TAG_SIZE> {
    Gcm::<B, TAG_SIZE>::new(cipher)
}

/// One-shot GCM over an owned cipher, with a 96-bit nonce and a `T` byte tag.
pub struct Gcm<B: BlockCipher, const T: usize> {
    pub cipher: B,
    // keyed, never armed; cloned per message
    keyed: GcmContext,
}

impl<B: BlockCipher, const T: usize> Gcm<B, T> {
    const VALID_TAG_SIZE: () = assert!(
        T >= MIN_TAG_SIZE && T <= TAG_SIZE,
        "GCM tag size must be between 12 and 16"
    );

    pub fn new(cipher: B) -> Self {
        let () = Self::VALID_TAG_SIZE;

        let mut keyed = GcmContext::new();
        keyed.set_key(&cipher);
        Gcm { cipher, keyed }
    }

    fn start(&self, nonce: &[u8], add: Option<&[u8]>) -> Result<GcmContext> {
        let mut ctx = self.keyed.clone();
        ctx.set_iv(nonce)?;
        if let Some(add) = add {
            ctx.authenticate(add)?;
        }
        Ok(ctx)
    }
}

impl<B: BlockCipher, const T: usize> AEAD for Gcm<B, T> {
    type Error = super::Error;

    fn nonce_size(&self) -> usize {
        NONCE_SIZE
    }

    fn overhead(&self) -> usize {
        T
    }

    fn seal(&self, out: &mut [u8], nonce: &[u8], plaintext: &[u8], add: Option<&[u8]>) -> Result<()> {
        let plaintext_length = plaintext.len();
        if out.len() < plaintext_length + T {
            return Err(Error::OutputTooSmall(plaintext_length + T, out.len()));
        }

        let mut ctx = self.start(nonce, add)?;
        let (ciphertext, tag) = out.split_at_mut(plaintext_length);
        ctx.encrypt(&self.cipher, ciphertext, plaintext)?;
        ctx.digest(&self.cipher, &mut tag[..T])
    }

    // On failure out is zeroed, no unauthenticated plaintext is left behind.
    fn open(&self, out: &mut [u8], nonce: &[u8], ciphertext: &[u8], add: Option<&[u8]>) -> Result<usize> {
        if ciphertext.len() < T {
            return Err(Error::CiphertextTooSmall(ciphertext.len(), T));
        }
        let (ciphertext, tag) = ciphertext.split_at(ciphertext.len() - T);
        if out.len() < ciphertext.len() {
            return Err(Error::OutputTooSmall(ciphertext.len(), out.len()));
        }

        let mut ctx = self.start(nonce, add)?;
        let out = &mut out[..ciphertext.len()];
        ctx.decrypt(&self.cipher, out, ciphertext)?;

        let mut expected_tag = [0; T];
        ctx.digest(&self.cipher, &mut expected_tag)?;
        if !verify_tag(&expected_tag, tag) {
            out.fill(0);
            return Err(Error::AuthenticationFailed);
        }
        Ok(ciphertext.len())
    }

    fn seal_inplace(&self, in_out: &mut [u8], tag: &mut [u8], nonce: &[u8], add: Option<&[u8]>) -> Result<()> {
        if tag.len() < T {
            return Err(Error::OutputTooSmall(T, tag.len()));
        }

        let mut ctx = self.start(nonce, add)?;
        ctx.encrypt_inplace(&self.cipher, in_out)?;
        ctx.digest(&self.cipher, &mut tag[..T])
    }

    fn open_inplace(&self, in_out: &mut [u8], tag: &[u8], nonce: &[u8], add: Option<&[u8]>) -> Result<()> {
        let mut ctx = self.start(nonce, add)?;
        ctx.decrypt_inplace(&self.cipher, in_out)?;

        let mut expected_tag = [0; T];
        ctx.digest(&self.cipher, &mut expected_tag)?;
        if !verify_tag(&expected_tag, tag) {
            in_out.fill(0);
            return Err(Error::AuthenticationFailed);
        }
        Ok(())
    }
}
