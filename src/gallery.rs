use crate::dates::decode_date;
use crate::section::SectionState;
use crate::sheet_client::SheetClient;
use crate::table::{self, Row};

pub const PLACEHOLDER_GALLERY_IMAGE: &str = "https://via.placeholder.com/250x200?text=Image";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub image_url: String,
    pub caption: String,
    /// `dd/mm/yyyy`, empty when the sheet date is missing or unreadable.
    pub date: String,
}

pub fn build_gallery(rows: &[Row]) -> Vec<GalleryItem> {
    rows.iter()
        .map(|row| GalleryItem {
            image_url: row.text_or("Image URL", PLACEHOLDER_GALLERY_IMAGE),
            caption: row.text_or("Caption", ""),
            date: decode_date(row.get("Date"))
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_default(),
        })
        .collect()
}

pub fn load_gallery(client: &SheetClient) -> SectionState<Vec<GalleryItem>> {
    SectionState::from_fetch(table::GALLERY, client.fetch(table::GALLERY), build_gallery)
}
