#![no_std]
#![warn(clippy::std_instead_of_alloc, clippy::std_instead_of_core)]

pub mod blockmode;
pub mod traits;

pub use blockmode::gcm::{Gcm, GcmContext, new_gcm_std, verify_tag};
pub use blockmode::{Error, Result};
pub use traits::{AEAD, BlockCipher};

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;
