use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("File operation failed")]
    FileOperationFailed(#[from] std::io::Error),
    #[error("Storage directory could not be resolved")]
    StorageDirUnresolved,
}
