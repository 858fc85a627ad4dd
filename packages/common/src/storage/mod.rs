mod error;
mod gateway;
mod key;
mod traits;

pub mod memory;
#[cfg(feature = "object-storage")]
pub mod s3_store;

pub use error::StorageError;
pub use gateway::{DEFAULT_UPLOAD_EXPIRY, UploadTicket, issue_upload_url};
pub use key::ObjectKey;
pub use traits::ObjectStore;
