//! Offscreen bitmap mask: draw an image, keep its opaque pixels

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::path::PathBuf;
use wisp_core::{Result, Vec2, WispError};

/// Where the mask image comes from. SVG is rasterized at the target size,
/// everything else goes through the `image` decoders and is resampled.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageSource {
    fn is_svg(&self) -> bool {
        match self {
            ImageSource::Path(path) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg")),
            ImageSource::Bytes(bytes) => looks_like_svg(bytes),
        }
    }

    fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => format!("'{}'", path.display()),
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }

    /// Decode and scale to exactly `width` x `height`. Load errors surface even
    /// when the target is empty.
    fn rasterize(&self, width: u32, height: u32) -> Result<RgbaImage> {
        if self.is_svg() {
            let data = match self {
                ImageSource::Path(path) => std::fs::read(path).map_err(|e| {
                    WispError::ResourceLoad(format!(
                        "Failed to load mask image {}: {}",
                        self.describe(),
                        e
                    ))
                })?,
                ImageSource::Bytes(bytes) => bytes.clone(),
            };
            return rasterize_svg(&data, width, height)
                .map_err(|e| WispError::ResourceLoad(format!("{} ({})", e, self.describe())));
        }

        let decoded = match self {
            ImageSource::Path(path) => image::open(path).map_err(|e| {
                WispError::ResourceLoad(format!(
                    "Failed to load mask image '{}': {}",
                    path.display(),
                    e
                ))
            })?,
            ImageSource::Bytes(bytes) => image::load_from_memory(bytes).map_err(|e| {
                WispError::ResourceLoad(format!("Failed to decode mask image: {}", e))
            })?,
        };
        if width == 0 || height == 0 {
            return Ok(RgbaImage::new(width, height));
        }
        Ok(imageops::resize(
            &decoded.to_rgba8(),
            width,
            height,
            FilterType::Triangle,
        ))
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

/// An XML document whose root looks like `<svg`
fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(4096)];
    let starts_with_tag = head
        .iter()
        .find(|b| !b.is_ascii_whitespace() && **b != 0xEF && **b != 0xBB && **b != 0xBF)
        .is_some_and(|b| *b == b'<');
    starts_with_tag && head.windows(4).any(|w| w == b"<svg")
}

fn rasterize_svg(data: &[u8], width: u32, height: u32) -> std::result::Result<RgbaImage, String> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .map_err(|e| format!("Failed to parse SVG mask: {}", e))?;
    if width == 0 || height == 0 {
        return Ok(RgbaImage::new(width, height));
    }

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| format!("Cannot allocate a {}x{} pixmap", width, height))?;
    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha
    Ok(RgbaImage::from_fn(width, height, |x, y| match pixmap.pixel(x, y) {
        Some(px) => {
            let c = px.demultiply();
            Rgba([c.red(), c.green(), c.blue(), c.alpha()])
        }
        None => Rgba([0, 0, 0, 0]),
    }))
}

/// A canvas-sized offscreen bitmap the mask image is drawn into
pub struct PixelMask {
    bitmap: RgbaImage,
}

impl PixelMask {
    /// Transparent bitmap matching the canvas dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bitmap: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    /// Decode `source`, scale it to `width` x `height` and composite it at `(x, y)`.
    /// Anything outside the bitmap is clipped.
    pub fn render(
        &mut self,
        source: &ImageSource,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let scaled = source.rasterize(width, height)?;
        if width == 0 || height == 0 {
            log::warn!("[mask] Target rectangle is empty, nothing drawn");
            return Ok(());
        }

        imageops::overlay(&mut self.bitmap, &scaled, x, y);
        log::debug!(
            "[mask] Drew {} at ({}, {}) as {}x{}",
            source.describe(),
            x,
            y,
            width,
            height
        );
        Ok(())
    }

    /// Draw `source` inset by `padding` pixels on every side of the bitmap
    pub fn render_inset(&mut self, source: &ImageSource, padding: u32) -> Result<()> {
        let inset = padding.saturating_mul(2);
        let width = self.width().saturating_sub(inset);
        let height = self.height().saturating_sub(inset);
        self.render(source, padding as i64, padding as i64, width, height)
    }

    /// Every pixel with alpha > 0, scanned top-to-bottom, left-to-right.
    /// O(width x height); run once after rendering, not per frame.
    pub fn extract_opaque_points(&self) -> Vec<Vec2> {
        self.bitmap
            .enumerate_pixels()
            .filter(|(_, _, px)| px.0[3] > 0)
            .map(|(x, y, _)| Vec2::new(x as f32, y as f32))
            .collect()
    }
}
