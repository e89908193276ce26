//! Image decoding seam.
//!
//! Decoding is asynchronous and owned by the host. The board only consumes
//! the decoded dimensions and keeps the source reference.

use crate::error::{BoardError, BoardResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A decoded image ready to be placed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedImage {
    /// Source reference (URL or data URL).
    pub source: String,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
}

impl DecodedImage {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }
}

/// Host-provided image decoder.
pub trait ImageLoader {
    /// Decode `source` and report its natural size.
    fn load(&self, source: &str) -> BoxFuture<'_, Result<DecodedImage, String>>;
}

/// Decode an image through `loader`, rejecting images without pixels.
pub async fn load_image<L: ImageLoader + ?Sized>(
    loader: &L,
    source: &str,
) -> BoardResult<DecodedImage> {
    let image = loader.load(source).await.map_err(BoardError::ImageLoad)?;
    if image.width == 0 || image.height == 0 {
        return Err(BoardError::ImageLoad(format!(
            "image has no pixels: {}x{}",
            image.width, image.height
        )));
    }
    log::debug!("Decoded image {}x{}", image.width, image.height);
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct TableLoader {
        images: HashMap<String, (u32, u32)>,
    }

    impl ImageLoader for TableLoader {
        fn load(&self, source: &str) -> BoxFuture<'_, Result<DecodedImage, String>> {
            let found = self.images.get(source).copied();
            let source = source.to_string();
            Box::pin(async move {
                let (width, height) = found.ok_or_else(|| format!("not found: {source}"))?;
                Ok(DecodedImage::new(source, width, height))
            })
        }
    }

    fn loader() -> TableLoader {
        let mut images = HashMap::new();
        images.insert("page.png".to_string(), (1200, 800));
        images.insert("empty.png".to_string(), (0, 10));
        TableLoader { images }
    }

    #[test]
    fn test_load_image() {
        let image = pollster::block_on(load_image(&loader(), "page.png")).unwrap();
        assert_eq!(image, DecodedImage::new("page.png", 1200, 800));
    }

    #[test]
    fn test_load_failure() {
        let result = pollster::block_on(load_image(&loader(), "missing.png"));
        assert!(matches!(result, Err(BoardError::ImageLoad(_))));
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        let result = pollster::block_on(load_image(&loader(), "empty.png"));
        assert!(matches!(result, Err(BoardError::ImageLoad(_))));
    }
}
