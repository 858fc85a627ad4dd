pub mod storage;

pub use storage::{ObjectKey, ObjectStore, StorageError};
