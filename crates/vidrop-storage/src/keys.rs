//! Shared key generation for storage backends.
//!
//! Key format: direct uploads land at `users/{user_id}/uploads/{filename}`;
//! any other per-user object lives at `users/{user_id}/{path}`. All backends
//! and signers must use these formats for consistency.

use uuid::Uuid;

/// Prefix under which every object belonging to `user_id` is stored.
pub fn user_prefix(user_id: Uuid) -> String {
    format!("users/{}/", user_id)
}

/// Storage key for a direct upload.
pub fn upload_object_key(user_id: Uuid, filename: &str) -> String {
    format!("users/{}/uploads/{}", user_id, filename)
}

/// Storage key for an arbitrary per-user object path.
pub fn user_object_key(user_id: Uuid, path: &str) -> String {
    format!("users/{}/{}", user_id, path)
}

/// Upload filename carrying a millisecond timestamp prefix.
///
/// Two uploads of the same file in different milliseconds produce distinct
/// keys; the original filename stays visible for operators.
pub fn unique_upload_filename(timestamp_ms: i64, filename: &str) -> String {
    format!("{}_{}", timestamp_ms, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_key_is_scoped_to_user() {
        let user_id = Uuid::new_v4();
        let key = upload_object_key(user_id, "1700000000000_clip.mp4");
        assert_eq!(key, format!("users/{}/uploads/1700000000000_clip.mp4", user_id));
        assert!(key.starts_with(&user_prefix(user_id)));
    }

    #[test]
    fn object_key_preserves_nested_paths() {
        let user_id = Uuid::new_v4();
        let key = user_object_key(user_id, "m3u8/clip/clip.m3u8");
        assert_eq!(key, format!("users/{}/m3u8/clip/clip.m3u8", user_id));
    }

    #[test]
    fn unique_filenames_differ_across_milliseconds() {
        let a = unique_upload_filename(1700000000000, "ride.mp4");
        let b = unique_upload_filename(1700000000001, "ride.mp4");
        assert_ne!(a, b);
        assert_eq!(a, "1700000000000_ride.mp4");
    }
}
