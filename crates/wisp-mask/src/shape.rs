//! Vector shapes with point-in-fill tests

use serde::{Deserialize, Serialize};
use wisp_core::Vec2;

/// How overlapping edges of a polygon or path decide what is "inside"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// A fillable shape in the source document's coordinate system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Ellipse {
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
    },
    Polygon {
        points: Vec<[f32; 2]>,
        #[serde(default)]
        fill_rule: FillRule,
    },
    /// One or more implicitly closed subpaths filled together
    Path {
        subpaths: Vec<Vec<[f32; 2]>>,
        #[serde(default)]
        fill_rule: FillRule,
    },
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    fn from_points<'a>(points: impl IntoIterator<Item = &'a [f32; 2]>) -> Option<Bounds> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let start = Bounds {
            min: Vec2::new(first[0], first[1]),
            max: Vec2::new(first[0], first[1]),
        };
        Some(iter.fold(start, |b, p| Bounds {
            min: Vec2::new(b.min.x.min(p[0]), b.min.y.min(p[1])),
            max: Vec2::new(b.max.x.max(p[0]), b.max.y.max(p[1])),
        }))
    }
}

impl Shape {
    /// True if `p` lies in the filled area (edges count as inside)
    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            Shape::Circle { cx, cy, r } => {
                let d = p - Vec2::new(*cx, *cy);
                d.length_squared() <= r * r
            }
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => p.x >= *x && p.x <= x + width && p.y >= *y && p.y <= y + height,
            Shape::Ellipse { cx, cy, rx, ry } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return false;
                }
                let nx = (p.x - cx) / rx;
                let ny = (p.y - cy) / ry;
                nx * nx + ny * ny <= 1.0
            }
            Shape::Polygon { points, fill_rule } => {
                fill_contains(std::iter::once(points.as_slice()), *fill_rule, p)
            }
            Shape::Path {
                subpaths,
                fill_rule,
            } => fill_contains(subpaths.iter().map(Vec::as_slice), *fill_rule, p),
        }
    }

    /// Bounding box, or None for a shape with no points
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Shape::Circle { cx, cy, r } => Some(Bounds {
                min: Vec2::new(cx - r, cy - r),
                max: Vec2::new(cx + r, cy + r),
            }),
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => Some(Bounds {
                min: Vec2::new(*x, *y),
                max: Vec2::new(x + width, y + height),
            }),
            Shape::Ellipse { cx, cy, rx, ry } => Some(Bounds {
                min: Vec2::new(cx - rx, cy - ry),
                max: Vec2::new(cx + rx, cy + ry),
            }),
            Shape::Polygon { points, .. } => Bounds::from_points(points),
            Shape::Path { subpaths, .. } => Bounds::from_points(subpaths.iter().flatten()),
        }
    }
}

/// Winding-number test over every edge of every ring
fn fill_contains<'a>(rings: impl Iterator<Item = &'a [[f32; 2]]>, rule: FillRule, p: Vec2) -> bool {
    let mut winding = 0i32;
    let mut crossings = 0u32;

    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];
            let upward = a[1] <= p.y && b[1] > p.y;
            let downward = b[1] <= p.y && a[1] > p.y;
            if !upward && !downward {
                continue;
            }
            let t = (p.y - a[1]) / (b[1] - a[1]);
            let x_at = a[0] + t * (b[0] - a[0]);
            if x_at > p.x {
                crossings += 1;
                winding += if upward { 1 } else { -1 };
            }
        }
    }

    match rule {
        FillRule::NonZero => winding != 0,
        FillRule::EvenOdd => crossings % 2 == 1,
    }
}
