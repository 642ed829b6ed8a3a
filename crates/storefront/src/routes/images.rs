//! Placeholder artwork for image ids.
//!
//! Documents reference images by id (`prod1-1`, `cat-audio`, `user-avatar-2`).
//! Until real photography is uploaded, each id resolves to a generated SVG
//! whose colour is derived from the id, so the same id always looks the same.

use askama::Template;
use axum::{
    extract::Path,
    http::{
        StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};

use crate::error::AppError;

const MAX_ID_LEN: usize = 64;

#[derive(Template)]
#[template(path = "images/placeholder.svg", escape = "html")]
struct PlaceholderSvg<'a> {
    label: &'a str,
    hue: u16,
}

/// Whether a string is usable as an image id.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Stable hue in `0..360` for an id (FNV-1a).
fn hue_for(id: &str) -> u16 {
    let hash = id.bytes().fold(0x811c_9dc5_u32, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    });
    u16::try_from(hash % 360).unwrap_or(0)
}

/// Serve the placeholder for an image id.
///
/// # Errors
///
/// Returns an error if the SVG template fails to render.
pub async fn show(Path(id): Path<String>) -> Result<Response, AppError> {
    if !is_valid_id(&id) {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let svg = PlaceholderSvg {
        label: &id,
        hue: hue_for(&id),
    }
    .render()?;

    Ok((
        [
            (CONTENT_TYPE, "image/svg+xml"),
            (CACHE_CONTROL, "public, max-age=86400"),
        ],
        svg,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_validation() {
        assert!(is_valid_id("prod1-1"));
        assert!(is_valid_id("user_avatar"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../etc/passwd"));
        assert!(!is_valid_id("<script>"));
        assert!(!is_valid_id(&"a".repeat(MAX_ID_LEN + 1)));
    }

    #[test]
    fn test_hue_is_stable_and_in_range() {
        assert_eq!(hue_for("cat-audio"), hue_for("cat-audio"));
        for id in ["prod1-1", "prod1-2", "hero-home", "user-avatar-1"] {
            assert!(hue_for(id) < 360);
        }
    }
}
