//! Derives a complete [`SheetSnapshot`] from a base-endpoint response.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sheetsync_domain::{Document, Node, SheetSnapshot, SheetType, DEFAULT_CHARACTER_NAME};
use url::Url;

use crate::infrastructure::ports::FetchError;

use super::error::SyncError;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Note category whose bodies may hold the portrait link.
const PORTRAIT_NOTE: &str = "character";

pub(crate) fn build_snapshot(
    response: Document,
    fetched_at: DateTime<Utc>,
) -> Result<SheetSnapshot, SyncError> {
    let Value::Object(mut body) = response.into_value() else {
        return Err(FetchError::Malformed("expected a JSON object".to_string()).into());
    };

    let sheet = body
        .remove("data")
        .filter(|v| v.is_object())
        .map(Document::new)
        .ok_or_else(|| FetchError::Malformed("response has no data object".to_string()))?;
    let values = body
        .remove("values")
        .filter(|v| !v.is_null())
        .map(Document::new)
        .unwrap_or_default();

    let data = sheet.node();
    let raw_type = data
        .get_opt_str(&["type"])?
        .ok_or_else(|| SyncError::UnknownSheetType("(missing)".to_string()))?;
    let sheet_type: SheetType = raw_type
        .parse()
        .map_err(|_| SyncError::UnknownSheetType(raw_type.clone()))?;

    let name = data
        .get_non_empty_str(&["name"])?
        .unwrap_or_else(|| DEFAULT_CHARACTER_NAME.to_string());
    let image_url = portrait_url(data)?;

    Ok(SheetSnapshot {
        sheet,
        values,
        fetched_at,
        sheet_type,
        name,
        image_url,
    })
}

/// Computed values from a `/values` response. The `data` object is required.
pub(crate) fn values_from_response(response: Document) -> Result<Document, SyncError> {
    response
        .into_field("data")
        .filter(Document::is_object)
        .ok_or_else(|| {
            FetchError::Malformed("values response has no data object".to_string()).into()
        })
}

fn portrait_url(data: Node<'_>) -> Result<Option<String>, SyncError> {
    for note in data.items(&["customnotes"])? {
        if note.get_opt_str(&["uiid"])?.as_deref() != Some(PORTRAIT_NOTE) {
            continue;
        }
        if let Some(body) = note.get_opt_str(&["body"])? {
            let body = body.trim();
            if is_image_url(body) {
                return Ok(Some(body.to_string()));
            }
        }
    }
    Ok(None)
}

/// An http(s) URL whose path ends in a common image extension.
pub fn is_image_url(text: &str) -> bool {
    let Ok(url) = Url::parse(text) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    url.path()
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
