pub mod client;
pub mod error;
pub mod filter;

pub use client::RestClient;
pub use error::RestError;
