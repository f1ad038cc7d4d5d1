mod client;
mod dev_backend;
mod dto;
mod error;

pub use client::ApiClient;
pub use dev_backend::DevBackend;
#[cfg(test)]
pub use dev_backend::DevFailure;
pub use error::ApiError;
