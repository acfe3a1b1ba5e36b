//! HTTP request handlers, one module per operation group.

pub mod presigned_cookie;
pub mod presigned_url;
pub mod video_create;
pub mod video_get;
