//! Shell around the auction page core: runs its effects against the real
//! backend client and hosts the login popup handshake.

pub mod live;
pub mod logging;
pub mod sso;
