//! Shared constants: presign TTLs and accepted upload types.

use std::time::Duration;

/// Default expiry for presigned upload and download URLs.
pub const DEFAULT_PRESIGN_TTL: Duration = Duration::from_secs(600);

/// Short expiry used by the generic upload helper.
pub const GENERIC_UPLOAD_PRESIGN_TTL: Duration = Duration::from_secs(60);

/// Longer expiry for media download URLs issued after an existence probe.
pub const MEDIA_PRESIGN_TTL: Duration = Duration::from_secs(1800);

/// The only content type accepted for direct video uploads.
pub const ACCEPTED_VIDEO_CONTENT_TYPE: &str = "video/mp4";
