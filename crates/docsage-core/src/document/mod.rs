//! Document domain module.

mod model;
mod upload;

pub use model::Document;
pub use upload::{MAX_UPLOAD_BYTES, PDF_MIME_TYPE, UploadFile, validate_upload_batch};
