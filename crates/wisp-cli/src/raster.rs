//! Software `DrawSurface` backed by an RGBA image

use image::{Rgba as Pixel, RgbaImage};
use wisp_core::{Rgba, Vec2};
use wisp_particles::DrawSurface;

pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Source-over blend of `style` into the pixel at (x, y) with extra `coverage`
    fn blend(&mut self, x: i64, y: i64, style: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let src_a = (style.a * coverage).clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }

        let dst = self.image.get_pixel(x as u32, y as u32).0;
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let channel = |src: u8, dst: u8| {
            let c = (src as f32 * src_a + dst as f32 * dst_a * (1.0 - src_a)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };

        self.image.put_pixel(
            x as u32,
            y as u32,
            Pixel([
                channel(style.rgb.r, dst[0]),
                channel(style.rgb.g, dst[1]),
                channel(style.rgb.b, dst[2]),
                (out_a * 255.0).round() as u8,
            ]),
        );
    }
}

impl DrawSurface for RasterSurface {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let x0 = x.max(0.0) as u32;
        let y0 = y.max(0.0) as u32;
        let x1 = ((x + width).max(0.0) as u32).min(self.image.width());
        let y1 = ((y + height).max(0.0) as u32).min(self.image.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px, py, Pixel([0, 0, 0, 0]));
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, style: Rgba) {
        if radius <= 0.0 {
            return;
        }

        // Sub-pixel circles cover a fraction of the pixel they sit in
        if radius < 1.0 {
            let coverage = (std::f32::consts::PI * radius * radius).min(1.0);
            self.blend(
                center.x.floor() as i64,
                center.y.floor() as i64,
                style,
                coverage,
            );
            return;
        }

        // Only visit the part of the bounding box that lies on the image
        let r2 = radius * radius;
        let (width, height) = (self.image.width() as i64, self.image.height() as i64);
        let x0 = ((center.x - radius).floor() as i64).max(0);
        let x1 = ((center.x + radius).ceil() as i64).min(width);
        let y0 = ((center.y - radius).floor() as i64).max(0);
        let y1 = ((center.y + radius).ceil() as i64).min(height);
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - center.x;
                let dy = py as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.blend(px, py, style, 1.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_core::Rgb;

    #[test]
    fn opaque_circle_fills_center() {
        let mut surface = RasterSurface::new(10, 10);
        surface.fill_circle(Vec2::new(5.0, 5.0), 2.0, Rgb::new(255, 0, 0).with_alpha(1.0));

        assert_eq!(surface.image().get_pixel(5, 5).0, [255, 0, 0, 255]);
        assert_eq!(surface.image().get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn small_circle_blends_partially() {
        let mut surface = RasterSurface::new(4, 4);
        surface.fill_circle(Vec2::new(1.5, 1.5), 0.2, Rgb::new(0, 0, 255).with_alpha(1.0));

        let px = surface.image().get_pixel(1, 1).0;
        assert_eq!(px[2], 255);
        assert!(px[3] > 0 && px[3] < 255);
    }

    #[test]
    fn clear_rect_resets_pixels() {
        let mut surface = RasterSurface::new(4, 4);
        surface.fill_circle(Vec2::new(2.0, 2.0), 3.0, Rgb::new(9, 9, 9).with_alpha(0.5));
        assert!(surface.image().get_pixel(2, 2).0[3] > 0);

        surface.clear_rect(0.0, 0.0, 4.0, 4.0);
        assert!(surface.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn offscreen_circle_is_clipped() {
        let mut surface = RasterSurface::new(4, 4);
        surface.fill_circle(Vec2::new(-20.0, 50.0), 3.0, Rgb::new(1, 1, 1).with_alpha(1.0));
        assert!(surface.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn huge_circle_covers_image_without_scanning_its_box() {
        let mut surface = RasterSurface::new(8, 8);
        surface.fill_circle(Vec2::new(4.0, 4.0), 1.0e9, Rgb::new(0, 255, 0).with_alpha(1.0));
        assert!(surface.image().pixels().all(|p| p.0 == [0, 255, 0, 255]));

        surface.fill_circle(Vec2::new(-1.0e9, 4.0), 1.0e6, Rgb::new(255, 0, 0).with_alpha(1.0));
        assert!(surface.image().pixels().all(|p| p.0 == [0, 255, 0, 255]));
    }
}
