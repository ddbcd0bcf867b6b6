//! Shape documents read straight from SVG markup

use crate::region::{ShapeDocument, ViewBox};
use crate::shape::{FillRule, Shape};
use std::str::FromStr;
use svgtypes::{LengthUnit, SimplePathSegment};
use wisp_core::{Result, WispError};

/// Line segments per Bézier curve when flattening path data
const CURVE_STEPS: usize = 8;

/// Containers whose children are never painted directly
const NON_RENDERED: [&str; 6] = ["defs", "clipPath", "mask", "symbol", "pattern", "marker"];

type Point = [f32; 2];

fn invalid(msg: String) -> WispError {
    WispError::InvalidConfig(msg)
}

pub(crate) fn parse_document(source: &str) -> Result<ShapeDocument> {
    let doc = roxmltree::Document::parse(source)
        .map_err(|e| WispError::ResourceLoad(format!("SVG is not well-formed: {}", e)))?;
    let root = doc.root_element();
    if !root.has_tag_name("svg") {
        return Err(invalid(format!(
            "expected an <svg> root element, found <{}>",
            root.tag_name().name()
        )));
    }

    let width = length_attr(root, "width")?;
    let height = length_attr(root, "height")?;
    let view_box = match root.attribute("viewBox") {
        Some(raw) => {
            let vb = svgtypes::ViewBox::from_str(raw)
                .map_err(|e| invalid(format!("bad viewBox '{}': {}", raw, e)))?;
            ViewBox {
                x: vb.x as f32,
                y: vb.y as f32,
                width: vb.w as f32,
                height: vb.h as f32,
            }
        }
        None => match (width, height) {
            (Some(width), Some(height)) => ViewBox {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
            _ => return Err(invalid("SVG needs a viewBox or a width and height".into())),
        },
    };
    if view_box.width <= 0.0 || view_box.height <= 0.0 {
        return Err(invalid(format!(
            "view_box must have a positive size, got {}x{}",
            view_box.width, view_box.height
        )));
    }

    let mut shapes = Vec::new();
    for node in root.descendants().filter(|n| n.is_element()) {
        if node
            .ancestors()
            .any(|a| NON_RENDERED.contains(&a.tag_name().name()))
        {
            continue;
        }
        if let Some(shape) = shape_from_node(node)? {
            shapes.push(shape);
        }
    }

    Ok(ShapeDocument {
        view_box,
        rendered_width: width.unwrap_or(view_box.width),
        rendered_height: height.unwrap_or(view_box.height),
        offset: [0.0, 0.0],
        shapes,
    })
}

/// Absolute length in user units; percentages resolve to None
fn length_attr(node: roxmltree::Node, name: &str) -> Result<Option<f32>> {
    let Some(raw) = node.attribute(name) else {
        return Ok(None);
    };
    let length = svgtypes::Length::from_str(raw)
        .map_err(|e| invalid(format!("bad {} '{}': {}", name, raw, e)))?;
    if length.unit == LengthUnit::Percent {
        return Ok(None);
    }
    Ok(Some(length.number as f32))
}

fn number(node: roxmltree::Node, name: &str) -> Result<f32> {
    Ok(length_attr(node, name)?.unwrap_or(0.0))
}

/// `fill-rule` is inherited, the nearest declaration wins
fn fill_rule(node: roxmltree::Node) -> FillRule {
    match node.ancestors().find_map(|n| n.attribute("fill-rule")) {
        Some("evenodd") => FillRule::EvenOdd,
        _ => FillRule::NonZero,
    }
}

fn shape_from_node(node: roxmltree::Node) -> Result<Option<Shape>> {
    let shape = match node.tag_name().name() {
        "circle" => Shape::Circle {
            cx: number(node, "cx")?,
            cy: number(node, "cy")?,
            r: number(node, "r")?,
        },
        "rect" => Shape::Rect {
            x: number(node, "x")?,
            y: number(node, "y")?,
            width: number(node, "width")?,
            height: number(node, "height")?,
        },
        "ellipse" => Shape::Ellipse {
            cx: number(node, "cx")?,
            cy: number(node, "cy")?,
            rx: number(node, "rx")?,
            ry: number(node, "ry")?,
        },
        "polygon" => {
            let points: Vec<Point> = svgtypes::PointsParser::from(node.attribute("points").unwrap_or(""))
                .map(|(x, y)| [x as f32, y as f32])
                .collect();
            if points.len() < 3 {
                return Ok(None);
            }
            Shape::Polygon {
                points,
                fill_rule: fill_rule(node),
            }
        }
        "path" => {
            let subpaths = flatten_path(node.attribute("d").unwrap_or(""))?;
            if subpaths.is_empty() {
                return Ok(None);
            }
            Shape::Path {
                subpaths,
                fill_rule: fill_rule(node),
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(shape))
}

/// Path data as closed polygon rings; curves become `CURVE_STEPS` segments each
fn flatten_path(d: &str) -> Result<Vec<Vec<Point>>> {
    let mut subpaths = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut start: Point = [0.0, 0.0];

    for segment in svgtypes::SimplifyingPathParser::from(d) {
        let segment = segment.map_err(|e| invalid(format!("bad path data: {}", e)))?;
        let last = current.last().copied().unwrap_or(start);

        match segment {
            SimplePathSegment::MoveTo { x, y } => {
                finish_ring(&mut subpaths, &mut current);
                start = [x as f32, y as f32];
                current.push(start);
            }
            SimplePathSegment::LineTo { x, y } => current.push([x as f32, y as f32]),
            SimplePathSegment::Quadratic { x1, y1, x, y } => {
                let c = [x1 as f32, y1 as f32];
                let end = [x as f32, y as f32];
                for i in 1..=CURVE_STEPS {
                    let t = i as f32 / CURVE_STEPS as f32;
                    let mt = 1.0 - t;
                    current.push([
                        mt * mt * last[0] + 2.0 * mt * t * c[0] + t * t * end[0],
                        mt * mt * last[1] + 2.0 * mt * t * c[1] + t * t * end[1],
                    ]);
                }
            }
            SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let c1 = [x1 as f32, y1 as f32];
                let c2 = [x2 as f32, y2 as f32];
                let end = [x as f32, y as f32];
                for i in 1..=CURVE_STEPS {
                    let t = i as f32 / CURVE_STEPS as f32;
                    let mt = 1.0 - t;
                    let (a, b, c, e) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
                    current.push([
                        a * last[0] + b * c1[0] + c * c2[0] + e * end[0],
                        a * last[1] + b * c1[1] + c * c2[1] + e * end[1],
                    ]);
                }
            }
            SimplePathSegment::ClosePath => {
                finish_ring(&mut subpaths, &mut current);
                current.push(start);
            }
        }
    }
    finish_ring(&mut subpaths, &mut current);
    Ok(subpaths)
}

/// Rings with fewer than three points enclose nothing and are dropped
fn finish_ring(subpaths: &mut Vec<Vec<Point>>, current: &mut Vec<Point>) {
    let ring = std::mem::take(current);
    if ring.len() >= 3 {
        subpaths.push(ring);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_core::Vec2;

    fn contains(doc: &ShapeDocument, x: f32, y: f32) -> bool {
        doc.shapes.iter().any(|s| s.contains(Vec2::new(x, y)))
    }

    #[test]
    fn reads_view_box_and_size() {
        let doc = parse_document(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="200px" height="100" viewBox="10 20 100 100"/>"#,
        )
        .unwrap();
        assert_eq!(
            doc.view_box,
            ViewBox {
                x: 10.0,
                y: 20.0,
                width: 100.0,
                height: 100.0
            }
        );
        assert_eq!((doc.rendered_width, doc.rendered_height), (200.0, 100.0));
        assert!(doc.shapes.is_empty());
    }

    #[test]
    fn size_falls_back_to_view_box() {
        let doc = parse_document(r#"<svg viewBox="0 0 40 30" width="100%"/>"#).unwrap();
        assert_eq!((doc.rendered_width, doc.rendered_height), (40.0, 30.0));

        let doc = parse_document(r#"<svg width="64" height="32"/>"#).unwrap();
        assert_eq!(doc.view_box.width, 64.0);
        assert_eq!(doc.view_box.height, 32.0);
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(
            parse_document("<svg"),
            Err(WispError::ResourceLoad(_))
        ));
        assert!(matches!(
            parse_document("<html/>"),
            Err(WispError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_document("<svg/>"),
            Err(WispError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_document(r#"<svg viewBox="0 0 0 10"/>"#),
            Err(WispError::InvalidConfig(_))
        ));
    }

    #[test]
    fn collects_every_shape_kind() {
        let doc = parse_document(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <g>
    <circle cx="20" cy="20" r="5"/>
    <rect x="40" y="10" width="10" height="20"/>
  </g>
  <ellipse cx="80" cy="20" rx="10" ry="4"/>
  <polygon points="10,60 30,60 10,80"/>
  <path d="M 60 60 L 90 60 L 90 90 Z"/>
  <text x="0" y="0">ignored</text>
  <defs><circle cx="50" cy="50" r="50"/></defs>
</svg>"#,
        )
        .unwrap();

        assert_eq!(doc.shapes.len(), 5);
        assert!(contains(&doc, 20.0, 22.0));
        assert!(contains(&doc, 45.0, 25.0));
        assert!(contains(&doc, 85.0, 21.0));
        assert!(!contains(&doc, 80.0, 26.0));
        assert!(contains(&doc, 12.0, 62.0));
        assert!(contains(&doc, 85.0, 70.0));
        assert!(!contains(&doc, 65.0, 85.0));
        // The <defs> circle would cover the center
        assert!(!contains(&doc, 50.0, 50.0));
    }

    #[test]
    fn path_with_hole_respects_fill_rule() {
        let ring = "M 0 0 L 30 0 L 30 30 L 0 30 Z M 10 10 L 20 10 L 20 20 L 10 20 Z";
        let nonzero = parse_document(&format!(r#"<svg viewBox="0 0 30 30"><path d="{ring}"/></svg>"#))
            .unwrap();
        let evenodd = parse_document(&format!(
            r#"<svg viewBox="0 0 30 30" fill-rule="evenodd"><path d="{ring}"/></svg>"#
        ))
        .unwrap();

        match &evenodd.shapes[0] {
            Shape::Path {
                subpaths,
                fill_rule,
            } => {
                assert_eq!(subpaths.len(), 2);
                assert_eq!(*fill_rule, FillRule::EvenOdd);
            }
            other => panic!("Expected path, got {:?}", other),
        }
        assert!(contains(&nonzero, 15.0, 15.0));
        assert!(!contains(&evenodd, 15.0, 15.0));
        assert!(contains(&evenodd, 5.0, 5.0));
    }

    #[test]
    fn curves_are_flattened() {
        // Two cubic half-circles approximating a circle of radius 10 at (50, 50)
        let doc = parse_document(
            r#"<svg viewBox="0 0 100 100">
  <path d="M 40 50 C 40 36.7 60 36.7 60 50 C 60 63.3 40 63.3 40 50 Z"/>
</svg>"#,
        )
        .unwrap();
        assert!(contains(&doc, 50.0, 50.0));
        assert!(contains(&doc, 50.0, 42.0));
        assert!(!contains(&doc, 50.0, 35.0));
        assert!(!contains(&doc, 30.0, 50.0));
    }

    #[test]
    fn degenerate_elements_are_skipped() {
        let doc = parse_document(
            r#"<svg viewBox="0 0 10 10"><polygon points="1,1 2,2"/><path d=""/></svg>"#,
        )
        .unwrap();
        assert!(doc.shapes.is_empty());
    }
}
