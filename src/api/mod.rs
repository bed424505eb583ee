mod client;
mod error;

pub use client::CmsClient;
pub use error::ApiError;
