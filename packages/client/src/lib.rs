pub mod api;
pub mod dropzone;
pub mod error;
pub mod library;
pub mod models;
pub mod optimize;
pub mod pipeline;
pub mod session;


pub use api::{MediaApi, MediaBackend};
pub use error::ClientError;
pub use library::Library;
pub use pipeline::Uploader;
pub use session::Session;
