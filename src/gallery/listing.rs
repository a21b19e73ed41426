use crate::foundation::error::{LeafFallError, LeafFallResult};

/// Description shown under every gallery image.
pub const GALLERY_DESC: &str = "GitHub hosted image";

/// Repository folder the gallery lists.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RepoPath {
    pub user: String,
    pub repo: String,
    pub folder: String,
}

impl Default for RepoPath {
    fn default() -> Self {
        Self {
            user: "MaeNoSurname".to_owned(),
            repo: "portfolio-images".to_owned(),
            folder: "images".to_owned(),
        }
    }
}

impl RepoPath {
    /// GitHub contents API endpoint for the folder.
    pub fn api_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/contents/{}",
            self.user, self.repo, self.folder
        )
    }
}

/// One entry of a contents listing. Only the fields the gallery reads.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct ListingEntry {
    pub name: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// A displayable gallery image.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GalleryItem {
    pub src: String,
    pub alt: String,
    pub title: String,
    pub desc: String,
}

/// `png`, `jpg`, `jpeg`, `gif` or `webp` extension, case-insensitive.
pub fn is_image_name(name: &str) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    ["png", "jpg", "jpeg", "gif", "webp"]
        .iter()
        .any(|e| ext.eq_ignore_ascii_case(e))
}

/// File name without its last extension. Names whose last dot is followed by nothing (or by a
/// path separator) are returned unchanged.
pub fn title_from_filename(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem.to_owned(),
        _ => name.to_owned(),
    }
}

/// Parse a contents listing. A JSON object instead of an array is the API's error shape.
pub fn parse_listing(json: &str) -> LeafFallResult<Vec<ListingEntry>> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| LeafFallError::serde(format!("parse gallery listing JSON: {e}")))?;
    if let Some(msg) = value.get("message").and_then(|m| m.as_str()) {
        return Err(LeafFallError::asset(format!("gallery listing unavailable: {msg}")));
    }
    serde_json::from_value(value)
        .map_err(|e| LeafFallError::serde(format!("gallery listing is not a file array: {e}")))
}

/// Image entries in listing order. Entries without a download URL are skipped.
pub fn gallery_items(entries: &[ListingEntry]) -> Vec<GalleryItem> {
    let items: Vec<GalleryItem> = entries
        .iter()
        .filter(|e| is_image_name(&e.name))
        .filter_map(|e| {
            let src = e.download_url.clone()?;
            Some(GalleryItem {
                src,
                alt: e.name.clone(),
                title: title_from_filename(&e.name),
                desc: GALLERY_DESC.to_owned(),
            })
        })
        .collect();
    tracing::debug!(entries = entries.len(), images = items.len(), "filtered gallery listing");
    items
}

#[cfg(test)]
#[path = "../../tests/unit/gallery/listing.rs"]
mod tests;
