//! Attachment validation and storage-name generation.
//!
//! Validation short-circuits in a fixed order: media type first, then size.
//! Nothing here touches storage; the lifecycle service stages the binary
//! through the attachment store port after validation succeeds.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Error;

/// Maximum attachment size in bytes (5 MiB).
pub const ATTACHMENT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Accepted extension / content-type pairs.
const ACCEPTED_FORMATS: [(&str, &str); 5] = [
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// Binary payload accompanying a creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    /// Client-supplied file name; its extension must match the declared type.
    pub file_name: String,
    /// Declared content type, e.g. `image/png`.
    pub content_type: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// Upload that passed validation, carrying its normalised extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedAttachment<'a> {
    upload: &'a AttachmentUpload,
    extension: &'a str,
}

impl<'a> ValidatedAttachment<'a> {
    /// Raw bytes of the validated upload.
    pub fn bytes(&self) -> &'a [u8] {
        &self.upload.bytes
    }

    /// Collision-resistant storage name: millisecond timestamp plus a random
    /// suffix plus the original extension.
    pub fn storage_name(&self, now: DateTime<Utc>) -> String {
        format!(
            "{}-{}.{}",
            now.timestamp_millis(),
            Uuid::new_v4().simple(),
            self.extension
        )
    }
}

fn extension_of(file_name: &str) -> Option<&str> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension)
}

/// Validate an upload against the accepted formats and the size cap.
///
/// The extension and the declared content type must independently be known
/// and must agree; disagreement is treated the same as an unknown format.
pub fn validate(upload: &AttachmentUpload) -> Result<ValidatedAttachment<'_>, Error> {
    let extension = extension_of(&upload.file_name).ok_or_else(|| {
        Error::unsupported_media_type("attachment must be a jpeg, jpg, png, gif, or webp image")
    })?;

    let declared = upload.content_type.to_ascii_lowercase();
    let extension = ACCEPTED_FORMATS
        .iter()
        .find(|(ext, content_type)| {
            extension.eq_ignore_ascii_case(ext) && declared == *content_type
        })
        .map(|(ext, _)| *ext)
        .ok_or_else(|| {
            Error::unsupported_media_type(
                "attachment must be a jpeg, jpg, png, gif, or webp image",
            )
        })?;

    if upload.bytes.len() > ATTACHMENT_MAX_BYTES {
        return Err(Error::payload_too_large(
            "attachment must not exceed 5 MiB",
        ));
    }

    Ok(ValidatedAttachment {
        upload,
        extension,
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    fn upload(file_name: &str, content_type: &str, size: usize) -> AttachmentUpload {
        AttachmentUpload {
            file_name: file_name.to_owned(),
            content_type: content_type.to_owned(),
            bytes: vec![0_u8; size],
        }
    }

    #[rstest]
    #[case("leak.jpg", "image/jpeg")]
    #[case("leak.jpeg", "image/jpeg")]
    #[case("leak.png", "image/png")]
    #[case("leak.gif", "image/gif")]
    #[case("leak.webp", "image/webp")]
    #[case("leak.PNG", "image/png")]
    fn accepts_matching_extension_and_type(#[case] file_name: &str, #[case] content_type: &str) {
        let upload = upload(file_name, content_type, 64);
        assert!(validate(&upload).is_ok());
    }

    #[rstest]
    #[case("leak.png", "image/jpeg")] // disagreement
    #[case("leak.pdf", "application/pdf")] // unknown format
    #[case("leak.png", "application/octet-stream")] // unknown declared type
    #[case("leak", "image/png")] // no extension
    #[case(".png", "image/png")] // extension only
    fn rejects_mismatched_or_unknown_formats(#[case] file_name: &str, #[case] content_type: &str) {
        let upload = upload(file_name, content_type, 64);
        let error = validate(&upload).expect_err("format must be rejected");
        assert_eq!(error.code(), ErrorCode::UnsupportedMediaType);
    }

    #[rstest]
    #[case(ATTACHMENT_MAX_BYTES, true)]
    #[case(ATTACHMENT_MAX_BYTES + 1, false)]
    #[case(6 * 1024 * 1024, false)]
    fn size_cap_is_inclusive(#[case] size: usize, #[case] accepted: bool) {
        let upload = upload("leak.png", "image/png", size);
        match validate(&upload) {
            Ok(_) => assert!(accepted),
            Err(error) => {
                assert!(!accepted);
                assert_eq!(error.code(), ErrorCode::PayloadTooLarge);
            }
        }
    }

    #[test]
    fn media_type_is_checked_before_size() {
        let upload = upload("huge.pdf", "application/pdf", ATTACHMENT_MAX_BYTES + 1);
        let error = validate(&upload).expect_err("format must be rejected first");
        assert_eq!(error.code(), ErrorCode::UnsupportedMediaType);
    }

    #[test]
    fn storage_names_do_not_collide() {
        let upload = upload("leak.png", "image/png", 8);
        let validated = validate(&upload).expect("valid upload");
        let now = chrono::Utc::now();
        let first = validated.storage_name(now);
        let second = validated.storage_name(now);
        assert_ne!(first, second);
        assert!(first.ends_with(".png"));
    }
}
