//! Public domain types.

pub mod grant;

pub use grant::Grant;
