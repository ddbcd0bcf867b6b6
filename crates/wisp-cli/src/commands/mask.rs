//! Mask inspection command

use anyhow::{bail, Result};
use std::path::PathBuf;
use wisp_core::Vec2;
use wisp_mask::{ImageSource, PixelMask};

pub fn run(image: &str, width: u32, height: u32, padding: u32) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("Canvas must have a non-zero area, got {}x{}", width, height);
    }

    let mut mask = PixelMask::new(width, height);
    mask.render_inset(&ImageSource::Path(PathBuf::from(image)), padding)?;
    let points = mask.extract_opaque_points();

    println!("Mask: {}", image);
    println!("Canvas: {}x{} (padding {})", width, height, padding);
    println!("Eligible points: {}", points.len());
    match point_bounds(&points) {
        Some((min, max)) => println!(
            "Bounds: ({}, {}) .. ({}, {})",
            min.x, min.y, max.x, max.y
        ),
        None => println!("Bounds: none (no opaque pixels)"),
    }
    Ok(())
}

fn point_bounds(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(min, max), p| {
        (
            Vec2::new(min.x.min(p.x), min.y.min(p.y)),
            Vec2::new(max.x.max(p.x), max.y.max(p.y)),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn bounds_of_points() {
        assert_eq!(point_bounds(&[]), None);
        let points = [Vec2::new(3.0, 1.0), Vec2::new(1.0, 4.0), Vec2::new(2.0, 2.0)];
        assert_eq!(
            point_bounds(&points),
            Some((Vec2::new(1.0, 1.0), Vec2::new(3.0, 4.0)))
        );
    }

    #[test]
    fn run_reports_mask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();

        assert!(run(path.to_str().unwrap(), 16, 16, 2).is_ok());
        assert!(run(path.to_str().unwrap(), 0, 16, 2).is_err());
        assert!(run("/nonexistent/mask.png", 16, 16, 2).is_err());
    }
}
