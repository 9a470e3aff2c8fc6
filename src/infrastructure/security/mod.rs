pub mod signer;

pub use signer::{SessionError, SessionTokens, Signer};
