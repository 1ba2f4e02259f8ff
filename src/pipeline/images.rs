//! Optional slide pictures.
//!
//! An [`ImageProvider`] turns a slide title into a validated PNG/JPEG.
//! Image failures are never fatal to a deck: the caller logs them and
//! renders the slide without a picture.

use crate::error::ImageError;
use crate::output::{ImageKind, SlideImage};
use async_trait::async_trait;
use image::ImageFormat;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Search endpoint of the Pexels API.
pub const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";

/// Environment variable holding the Pexels API key.
pub const PEXELS_API_KEY_ENV: &str = "PEXELS_API_KEY";

/// Anything that can find a picture for a search query.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search_image(&self, query: &str) -> Result<SlideImage, ImageError>;
}

/// Stock-photo search backed by Pexels.
pub struct PexelsImageProvider {
    client: reqwest::Client,
    api_key: String,
    timeout_secs: u64,
}

impl PexelsImageProvider {
    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ImageError::RequestFailed {
                query: String::new(),
                detail: e.to_string(),
            })?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            timeout_secs,
        })
    }

    /// Build from `PEXELS_API_KEY`; `None` when unset or empty.
    pub fn from_env(timeout_secs: u64) -> Option<Self> {
        let key = std::env::var(PEXELS_API_KEY_ENV).ok()?;
        if key.trim().is_empty() {
            return None;
        }
        Self::new(key, timeout_secs).ok()
    }

    fn map_reqwest(&self, query: &str, e: reqwest::Error) -> ImageError {
        if e.is_timeout() {
            ImageError::Timeout {
                query: query.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            ImageError::RequestFailed {
                query: query.to_string(),
                detail: e.to_string(),
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    url: Option<String>,
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    landscape: Option<String>,
    medium: Option<String>,
}

#[async_trait]
impl ImageProvider for PexelsImageProvider {
    fn name(&self) -> &str {
        "pexels"
    }

    async fn search_image(&self, query: &str) -> Result<SlideImage, ImageError> {
        let response = self
            .client
            .get(PEXELS_SEARCH_URL)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .query(&[
                ("query", query),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .send()
            .await
            .map_err(|e| self.map_reqwest(query, e))?;

        if !response.status().is_success() {
            return Err(ImageError::RequestFailed {
                query: query.to_string(),
                detail: format!("HTTP {}", response.status()),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| self.map_reqwest(query, e))?;

        let photo = body
            .photos
            .into_iter()
            .next()
            .ok_or_else(|| ImageError::NotFound {
                query: query.to_string(),
            })?;
        let download_url = photo
            .src
            .landscape
            .or(photo.src.medium)
            .ok_or_else(|| ImageError::NotFound {
                query: query.to_string(),
            })?;

        debug!("Downloading image for '{}': {}", query, download_url);
        let bytes = self
            .client
            .get(&download_url)
            .send()
            .await
            .map_err(|e| self.map_reqwest(query, e))?
            .error_for_status()
            .map_err(|e| self.map_reqwest(query, e))?
            .bytes()
            .await
            .map_err(|e| self.map_reqwest(query, e))?;

        validate_image(query, bytes.to_vec(), photo.url.or(Some(download_url)))
    }
}

/// Check that `bytes` decode as PNG or JPEG and record their dimensions.
pub fn validate_image(
    query: &str,
    bytes: Vec<u8>,
    source_url: Option<String>,
) -> Result<SlideImage, ImageError> {
    let invalid = |detail: String| ImageError::InvalidImage {
        query: query.to_string(),
        detail,
    };

    let format = image::guess_format(&bytes).map_err(|e| invalid(e.to_string()))?;
    let kind = match format {
        ImageFormat::Png => ImageKind::Png,
        ImageFormat::Jpeg => ImageKind::Jpeg,
        other => return Err(invalid(format!("unsupported format {other:?}"))),
    };

    let decoded =
        image::load_from_memory_with_format(&bytes, format).map_err(|e| invalid(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(invalid("zero-sized image".into()));
    }

    Ok(SlideImage {
        bytes,
        kind,
        width,
        height,
        source_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::io::Cursor;

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    #[test]
    fn accepts_png() {
        let img = validate_image("cats", encoded(8, 4, ImageFormat::Png), None).unwrap();
        assert_eq!(img.kind, ImageKind::Png);
        assert_eq!((img.width, img.height), (8, 4));
    }

    #[test]
    fn accepts_jpeg() {
        let img = validate_image("dogs", encoded(16, 9, ImageFormat::Jpeg), None).unwrap();
        assert_eq!(img.kind, ImageKind::Jpeg);
        assert_eq!((img.width, img.height), (16, 9));
    }

    #[test]
    fn rejects_garbage() {
        let err = validate_image("x", b"<html>not an image</html>".to_vec(), None).unwrap_err();
        assert!(matches!(err, ImageError::InvalidImage { .. }));
    }

    #[test]
    fn rejects_truncated_png() {
        let mut bytes = encoded(8, 8, ImageFormat::Png);
        bytes.truncate(20);
        assert!(validate_image("x", bytes, None).is_err());
    }

    #[test]
    fn parses_search_response() {
        let json = r#"{"photos":[{"url":"https://pexels.com/p/1","src":{"landscape":"https://img/1.jpeg","medium":"https://img/1m.jpeg"}}]}"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.photos.len(), 1);
        assert_eq!(resp.photos[0].src.landscape.as_deref(), Some("https://img/1.jpeg"));
    }

    #[test]
    fn parses_empty_search_response() {
        let resp: SearchResponse = serde_json::from_str(r#"{"total_results":0}"#).unwrap();
        assert!(resp.photos.is_empty());
    }
}
