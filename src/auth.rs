//! Service-account credentials: identifiers, secrets, signing keys, and JWT claims.

pub mod claims;
pub mod credential;
pub mod id;
pub mod secret;

pub use claims::*;
pub use credential::*;
pub use id::*;
pub use secret::*;
