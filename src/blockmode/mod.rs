pub mod gcm;
use thiserror;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("invalid IV length, want {want}, got {0}", want = gcm::NONCE_SIZE)]
    InvalidIvLength(usize),

    // Contract violation by the caller: a phase resumed after a short
    // call, or an operation issued out of order.
    #[error("GCM misaligned phase transition: {}", .0)]
    MisalignedPhaseTransition(&'static str),

    #[error("GCM tag too long, max {max}, got {0}", max = gcm::TAG_SIZE)]
    TagTooLong(usize),

    #[error("GCM message exceeds the per-nonce length limit")]
    DataTooLong,

    #[error("GCM authentication failed while decrypting")]
    AuthenticationFailed,

    #[error("GCM ciphertext's length ({}) is shorter than tag size({})", .0, .1)]
    CiphertextTooSmall(usize, usize),

    #[error("output too small, want: {}, got: {}", .0, .1)]
    OutputTooSmall(usize, usize),
}
pub type Result<T> = core::result::Result<T, Error>;
