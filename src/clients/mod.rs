//! Client modules for the Laneful email API

#[cfg(feature = "blocking")]
pub mod blocking;
pub mod laneful_client;
pub mod request;

#[cfg(feature = "blocking")]
pub use blocking::BlockingLanefulClient;
pub use laneful_client::LanefulClient;
