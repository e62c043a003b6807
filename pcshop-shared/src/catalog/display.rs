//! Display image resolution
//!
//! Every place that shows a product picture, from storefront cards and the
//! detail page to back-office list thumbnails and the edit-form preview, picks
//! the image with the same three-step fallback:
//!
//! 1. the image flagged `is_main` (the first one, if data has several)
//! 2. otherwise the first image in insertion order
//! 3. otherwise a placeholder
//!
//! Only the rendered size differs between the compact and full
//! presentations.
//!
//! # Example
//!
//! ```
//! use pcshop_shared::catalog::display::{resolve, DisplayImage};
//! use pcshop_shared::models::product_image::ProductImage;
//!
//! let images = vec![
//!     ProductImage { id: 1, product_id: 7, image: "products/a.jpg".into(), is_main: false },
//!     ProductImage { id: 2, product_id: 7, image: "products/b.jpg".into(), is_main: false },
//! ];
//!
//! match resolve(&images) {
//!     DisplayImage::Image(img) => assert_eq!(img.id, 1),
//!     DisplayImage::Placeholder => unreachable!(),
//! }
//! ```

use serde::Serialize;

use crate::models::product_image::ProductImage;

/// Alt text shown in place of a missing product picture
pub const PLACEHOLDER_LABEL: &str = "No image";

/// Outcome of display image resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayImage<'a> {
    /// A stored image was chosen
    Image(&'a ProductImage),

    /// The product has no images at all
    Placeholder,
}

impl<'a> DisplayImage<'a> {
    /// The chosen image, if any
    pub fn image(&self) -> Option<&'a ProductImage> {
        match self {
            DisplayImage::Image(img) => Some(img),
            DisplayImage::Placeholder => None,
        }
    }
}

/// Picks the image to display for a product
///
/// `images` must be the product's images in insertion order.
pub fn resolve(images: &[ProductImage]) -> DisplayImage<'_> {
    images
        .iter()
        .find(|img| img.is_main)
        .or_else(|| images.first())
        .map(DisplayImage::Image)
        .unwrap_or(DisplayImage::Placeholder)
}

/// Whether any image of the product is flagged main
pub fn has_main_image(images: &[ProductImage]) -> bool {
    images.iter().any(|img| img.is_main)
}

/// Returns the image that should be promoted to main, if a repair is needed
///
/// A repair is needed when the product has images but none is flagged main;
/// the first image in insertion order is the candidate.
pub fn main_image_repair_candidate(images: &[ProductImage]) -> Option<&ProductImage> {
    if has_main_image(images) {
        None
    } else {
        images.first()
    }
}

/// Splits images into the display image and everything else
///
/// The remainder keeps insertion order and never repeats the display image,
/// so a detail page can render one large picture plus a gallery.
pub fn split_for_detail(images: &[ProductImage]) -> (DisplayImage<'_>, Vec<&ProductImage>) {
    let display = resolve(images);
    let chosen = display.image().map(|img| img.id);
    let others = images
        .iter()
        .filter(|img| Some(img.id) != chosen)
        .collect();

    (display, others)
}

/// Rendered size of an image preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    /// Listing cards and back-office list thumbnails
    Compact,

    /// Rows of the back-office inline image editor
    Inline,

    /// Detail page and back-office edit form
    Full,
}

impl Presentation {
    /// Square edge length in pixels
    pub fn size(&self) -> u32 {
        match self {
            Presentation::Compact => 50,
            Presentation::Inline => 100,
            Presentation::Full => 200,
        }
    }
}

/// Serializable preview of a product's display image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePreview {
    /// Image ID (None for the placeholder)
    pub image_id: Option<i64>,

    /// Public URL (None for the placeholder)
    pub url: Option<String>,

    /// Whether the chosen image carries the main flag
    pub is_main: bool,

    /// Whether this is the placeholder
    pub placeholder: bool,

    /// Alt text
    pub alt: String,

    /// Rendered width in pixels
    pub width: u32,

    /// Rendered height in pixels
    pub height: u32,
}

impl ImagePreview {
    /// Builds the preview for a resolved display image
    pub fn new(
        display: DisplayImage<'_>,
        presentation: Presentation,
        media_url: &str,
        alt: &str,
    ) -> Self {
        let size = presentation.size();

        match display {
            DisplayImage::Image(img) => Self {
                image_id: Some(img.id),
                url: Some(media_path(media_url, &img.image)),
                is_main: img.is_main,
                placeholder: false,
                alt: alt.to_string(),
                width: size,
                height: size,
            },
            DisplayImage::Placeholder => Self {
                image_id: None,
                url: None,
                is_main: false,
                placeholder: true,
                alt: PLACEHOLDER_LABEL.to_string(),
                width: size,
                height: size,
            },
        }
    }

    /// Resolves and renders in one step
    pub fn for_images(
        images: &[ProductImage],
        presentation: Presentation,
        media_url: &str,
        alt: &str,
    ) -> Self {
        Self::new(resolve(images), presentation, media_url, alt)
    }
}

/// Joins the media URL prefix with a stored asset reference
pub fn media_path(media_url: &str, reference: &str) -> String {
    format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(id: i64, is_main: bool) -> ProductImage {
        ProductImage {
            id,
            product_id: 1,
            image: format!("products/{}.jpg", id),
            is_main,
        }
    }

    #[test]
    fn test_main_image_wins() {
        let images = vec![img(1, false), img(2, true), img(3, false)];
        assert_eq!(resolve(&images).image().map(|i| i.id), Some(2));
    }

    #[test]
    fn test_first_image_when_none_flagged() {
        let images = vec![img(1, false), img(2, false)];
        assert_eq!(resolve(&images).image().map(|i| i.id), Some(1));
    }

    #[test]
    fn test_placeholder_when_no_images() {
        assert!(resolve(&[]).image().is_none());
    }

    #[test]
    fn test_first_flagged_wins_when_several_are_main() {
        let images = vec![img(1, false), img(2, true), img(3, true)];
        assert_eq!(resolve(&images).image().map(|i| i.id), Some(2));
    }

    #[test]
    fn test_repair_candidate() {
        assert_eq!(
            main_image_repair_candidate(&[img(4, false), img(5, false)]).map(|i| i.id),
            Some(4)
        );
        assert!(main_image_repair_candidate(&[img(4, false), img(5, true)]).is_none());
        assert!(main_image_repair_candidate(&[]).is_none());
    }

    #[test]
    fn test_split_for_detail_excludes_display_image() {
        let images = vec![img(1, false), img(2, true), img(3, false)];
        let (display, others) = split_for_detail(&images);
        assert_eq!(display.image().map(|i| i.id), Some(2));
        assert_eq!(others.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 3]);

        let images = vec![img(1, false), img(2, false)];
        let (display, others) = split_for_detail(&images);
        assert_eq!(display.image().map(|i| i.id), Some(1));
        assert_eq!(others.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2]);

        let (display, others) = split_for_detail(&[]);
        assert_eq!(display, DisplayImage::Placeholder);
        assert!(others.is_empty());
    }

    #[test]
    fn test_preview_sizes_share_fallback() {
        let images = vec![img(1, false), img(2, false)];
        let compact = ImagePreview::for_images(&images, Presentation::Compact, "/media/", "GPU");
        let full = ImagePreview::for_images(&images, Presentation::Full, "/media/", "GPU");

        assert_eq!(compact.image_id, full.image_id);
        assert_eq!(compact.url.as_deref(), Some("/media/products/1.jpg"));
        assert_eq!((compact.width, compact.height), (50, 50));
        assert_eq!((full.width, full.height), (200, 200));
    }

    #[test]
    fn test_placeholder_preview() {
        let preview = ImagePreview::for_images(&[], Presentation::Full, "/media", "GPU");
        assert!(preview.placeholder);
        assert!(preview.url.is_none());
        assert_eq!(preview.alt, PLACEHOLDER_LABEL);
    }

    #[test]
    fn test_media_path() {
        assert_eq!(media_path("/media/", "/products/a.jpg"), "/media/products/a.jpg");
        assert_eq!(
            media_path("https://cdn.example.com/media", "categories/x.png"),
            "https://cdn.example.com/media/categories/x.png"
        );
    }
}
