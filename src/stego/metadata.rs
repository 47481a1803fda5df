//! EXIF metadata inspection.
//!
//! Editing tools that embed or post-process hidden content tend to leave
//! tracks in the metadata block. A populated `Software` field or any
//! comment-family field is grounds for rejection on its own.

use exif::{Context, In, Reader, Tag, Value};

// Windows stores its Explorer comment in a vendor tag kamadak-exif has no
// named constant for.
const XP_COMMENT: Tag = Tag(Context::Tiff, 0x9c9c);

const FLAGGED_FIELDS: [(Tag, &str); 3] = [
    (Tag::Software, "Software"),
    (Tag::UserComment, "UserComment"),
    (XP_COMMENT, "XPComment"),
];

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("EXIF metadata could not be parsed: {0}")]
    Unreadable(exif::Error),
}

/// Checks the EXIF block of `data` for flagged fields.
///
/// Returns the name of the first non-empty flagged field, `None` when the
/// container carries no EXIF data or all flagged fields are absent or
/// blank. A present-but-malformed EXIF block is an error so the caller can
/// apply its analysis-failure policy instead of silently passing.
pub fn inspect_metadata(data: &[u8]) -> Result<Option<&'static str>, MetadataError> {
    let mut cursor = std::io::Cursor::new(data);
    let exif = match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(None),
        Err(err) => return Err(MetadataError::Unreadable(err)),
    };

    for (tag, name) in FLAGGED_FIELDS {
        if let Some(field) = exif.get_field(tag, In::PRIMARY) {
            if !value_is_empty(&field.value) {
                return Ok(Some(name));
            }
        }
    }
    Ok(None)
}

fn value_is_empty(value: &Value) -> bool {
    match value {
        Value::Ascii(lines) => lines
            .iter()
            .all(|line| line.iter().all(|&b| b == 0 || b.is_ascii_whitespace())),
        Value::Byte(bytes) => bytes.iter().all(|&b| b == 0),
        Value::Undefined(bytes, _) => {
            // UserComment opens with an 8-byte character-set code.
            let body = if bytes.len() >= 8 { &bytes[8..] } else { &bytes[..] };
            body.iter().all(|&b| b == 0 || b == b' ')
        }
        _ => false,
    }
}
