//! Vector spawn region: rejection sampling against a set of shapes

use crate::shape::{Bounds, Shape};
use serde::{Deserialize, Serialize};
use std::path::Path;
use wisp_core::{ParticleRng, Result, Vec2, WispError};

/// Rejection-sampling budget per spawn point
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// The document's intrinsic coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A vector document embedded somewhere on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDocument {
    pub view_box: ViewBox,
    /// Size the document is drawn at on the canvas, in pixels
    pub rendered_width: f32,
    pub rendered_height: f32,
    /// Canvas position of the document's top-left corner
    #[serde(default)]
    pub offset: [f32; 2],
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl ShapeDocument {
    pub fn from_toml(source: &str) -> Result<Self> {
        let doc: ShapeDocument = toml::from_str(source)?;
        if doc.view_box.width <= 0.0 || doc.view_box.height <= 0.0 {
            return Err(WispError::InvalidConfig(format!(
                "view_box must have a positive size, got {}x{}",
                doc.view_box.width, doc.view_box.height
            )));
        }
        Ok(doc)
    }

    /// Read the view box, size and the `circle`, `rect`, `ellipse`, `polygon` and `path`
    /// elements of an SVG document. Transforms and CSS styling are not applied.
    pub fn from_svg(source: &str) -> Result<Self> {
        crate::svg::parse_document(source)
    }

    /// Load an `.svg` file, or the TOML document format for any other extension
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let is_svg = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        if is_svg {
            Self::from_svg(&source)
        } else {
            Self::from_toml(&source)
        }
    }

    /// Per-axis document-to-canvas scale
    pub fn scale(&self) -> (f32, f32) {
        (
            self.rendered_width / self.view_box.width,
            self.rendered_height / self.view_box.height,
        )
    }

    /// Map a document-space point to canvas pixels
    pub fn to_canvas(&self, p: Vec2) -> Vec2 {
        let (sx, sy) = self.scale();
        Vec2::new(
            (p.x - self.view_box.x) * sx + self.offset[0],
            (p.y - self.view_box.y) * sy + self.offset[1],
        )
    }
}

/// Point-in-fill queries and random spawn points over a `ShapeDocument`
pub struct ShapeRegion {
    document: ShapeDocument,
    bounds: Option<Bounds>,
    max_attempts: u32,
}

impl ShapeRegion {
    pub fn new(document: ShapeDocument) -> Self {
        let bounds = document
            .shapes
            .iter()
            .filter_map(Shape::bounds)
            .reduce(|a, b| a.union(&b));
        Self {
            document,
            bounds,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn document(&self) -> &ShapeDocument {
        &self.document
    }

    pub fn shape_count(&self) -> usize {
        self.document.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.shapes.is_empty()
    }

    /// Document-space point test against every shape
    pub fn is_inside_any_shape(&self, point: Vec2) -> bool {
        self.document.shapes.iter().any(|s| s.contains(point))
    }

    /// Uniform point inside the shapes, in canvas pixels
    pub fn random_point_in_region(&self, rng: &mut ParticleRng) -> Result<Vec2> {
        let Some(bounds) = self.bounds else {
            return Err(WispError::NoSpawnPointFound { attempts: 0 });
        };

        for _ in 0..self.max_attempts {
            let candidate = Vec2::new(
                rng.range(bounds.min.x, bounds.max.x),
                rng.range(bounds.min.y, bounds.max.y),
            );
            if self.is_inside_any_shape(candidate) {
                return Ok(self.document.to_canvas(candidate));
            }
        }

        Err(WispError::NoSpawnPointFound {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::FillRule;

    const DOC: &str = r#"
rendered_width = 200.0
rendered_height = 100.0
offset = [10, 20]

[view_box]
width = 100
height = 100

[[shapes]]
kind = "circle"
cx = 50
cy = 50
r = 10

[[shapes]]
kind = "polygon"
points = [[0, 0], [20, 0], [0, 20]]
"#;

    #[test]
    fn parse_document() {
        let doc = ShapeDocument::from_toml(DOC).unwrap();
        assert_eq!(doc.shapes.len(), 2);
        assert_eq!(doc.scale(), (2.0, 1.0));
        if let Shape::Polygon { fill_rule, .. } = &doc.shapes[1] {
            assert_eq!(*fill_rule, FillRule::NonZero);
        } else {
            panic!("Expected polygon");
        }
    }

    #[test]
    fn reject_zero_view_box() {
        let src = "rendered_width = 1.0\nrendered_height = 1.0\n[view_box]\nwidth = 0\nheight = 10\n";
        assert!(matches!(
            ShapeDocument::from_toml(src),
            Err(WispError::InvalidConfig(_))
        ));
    }

    #[test]
    fn to_canvas_applies_scale_and_offset() {
        let doc = ShapeDocument::from_toml(DOC).unwrap();
        assert_eq!(doc.to_canvas(Vec2::new(50.0, 50.0)), Vec2::new(110.0, 70.0));
    }

    #[test]
    fn inside_any_shape() {
        let region = ShapeRegion::new(ShapeDocument::from_toml(DOC).unwrap());
        assert!(region.is_inside_any_shape(Vec2::new(50.0, 55.0)));
        assert!(region.is_inside_any_shape(Vec2::new(2.0, 2.0)));
        assert!(!region.is_inside_any_shape(Vec2::new(90.0, 90.0)));
    }

    #[test]
    fn random_points_land_in_shapes() {
        let region = ShapeRegion::new(ShapeDocument::from_toml(DOC).unwrap());
        let doc = region.document().clone();
        let (sx, sy) = doc.scale();
        let mut rng = ParticleRng::new(17);

        for _ in 0..500 {
            let p = region.random_point_in_region(&mut rng).unwrap();
            let source = Vec2::new((p.x - doc.offset[0]) / sx, (p.y - doc.offset[1]) / sy);
            assert!(region.is_inside_any_shape(source));
        }
    }

    #[test]
    fn empty_region_fails_fast() {
        let mut doc = ShapeDocument::from_toml(DOC).unwrap();
        doc.shapes.clear();
        let region = ShapeRegion::new(doc);
        let mut rng = ParticleRng::new(1);
        assert!(region.is_empty());
        assert!(matches!(
            region.random_point_in_region(&mut rng),
            Err(WispError::NoSpawnPointFound { attempts: 0 })
        ));
    }

    #[test]
    fn degenerate_region_gives_up() {
        let mut doc = ShapeDocument::from_toml(DOC).unwrap();
        doc.shapes = vec![Shape::Polygon {
            points: vec![[0.0, 0.0], [10.0, 10.0], [20.0, 20.0]],
            fill_rule: FillRule::EvenOdd,
        }];
        let region = ShapeRegion::new(doc).with_max_attempts(50);
        let mut rng = ParticleRng::new(1);
        assert!(matches!(
            region.random_point_in_region(&mut rng),
            Err(WispError::NoSpawnPointFound { attempts: 50 })
        ));
    }

    #[test]
    fn svg_file_drives_region() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.svg");
        std::fs::write(
            &path,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 100 100">
  <circle cx="25" cy="25" r="10"/>
  <rect x="60" y="60" width="20" height="20"/>
</svg>"#,
        )
        .unwrap();

        let region = ShapeRegion::new(ShapeDocument::load(&path).unwrap());
        assert_eq!(region.shape_count(), 2);
        assert!(region.is_inside_any_shape(Vec2::new(25.0, 30.0)));
        assert!(region.is_inside_any_shape(Vec2::new(70.0, 70.0)));
        assert!(!region.is_inside_any_shape(Vec2::new(50.0, 50.0)));

        let mut rng = ParticleRng::new(3);
        for _ in 0..200 {
            // Canvas points are doubled document points
            let p = region.random_point_in_region(&mut rng).unwrap();
            assert!(region.is_inside_any_shape(Vec2::new(p.x / 2.0, p.y / 2.0)));
        }
    }
}
