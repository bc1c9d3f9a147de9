//! Photo payload attached to a card.
//!
//! The uploaded bytes are kept verbatim. A decoded copy is produced once,
//! cropped to a square the way CSS `object-fit: cover` would, so both the
//! preview and the export sample the same pixels.

use image::imageops::FilterType;
use image::RgbaImage;
use log::{debug, warn};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Side length of the decoded, square photo.
///
/// The photo circle is 96pt wide and exports at 2x, so this leaves headroom.
pub const PHOTO_SIDE_PX: u32 = 384;

static NEXT_PHOTO_ID: AtomicU64 = AtomicU64::new(1);

/// An uploaded photo.
#[derive(Clone)]
pub struct Photo {
    /// Unique per upload; used to key preview textures
    id: u64,
    /// Original encoded payload
    bytes: Arc<[u8]>,
    /// Cover-cropped square image, `None` when the payload could not be decoded
    image: Option<Arc<RgbaImage>>,
}

impl Photo {
    /// Store an encoded image payload.
    ///
    /// Decoding is best effort: an undecodable payload is still accepted and
    /// simply renders as the empty-photo placeholder.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        let image = match image::load_from_memory(&bytes) {
            Ok(decoded) => {
                debug!(
                    "Decoded photo {}x{}, cropping to {}px square",
                    decoded.width(),
                    decoded.height(),
                    PHOTO_SIDE_PX
                );
                let square = decoded
                    .resize_to_fill(PHOTO_SIDE_PX, PHOTO_SIDE_PX, FilterType::Triangle)
                    .to_rgba8();
                Some(Arc::new(square))
            }
            Err(e) => {
                warn!("Photo could not be decoded, showing placeholder: {}", e);
                None
            }
        };

        Self {
            id: NEXT_PHOTO_ID.fetch_add(1, Ordering::Relaxed),
            bytes,
            image,
        }
    }

    /// Unique identifier of this upload.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The encoded payload as uploaded.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The decoded square image, if decoding succeeded.
    pub fn image(&self) -> Option<&Arc<RgbaImage>> {
        self.image.as_ref()
    }
}

impl PartialEq for Photo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("id", &self.id)
            .field("bytes", &self.bytes.len())
            .field("decoded", &self.image.is_some())
            .finish()
    }
}
