//! Closed profile loops in the XZ plane
//!
//! Loops wind counter-clockwise when viewed from +Y (looking down), so caps
//! built from them face up and walls lofted between them face outward.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

/// Ordered, implicitly closed ring of points sharing one height
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileLoop {
    points: Vec<Vec3>,
}

/// Map a point of the math plane (x right, w up when seen from above) to 3D
fn plane_to_xz(p: Vec2) -> Vec3 {
    Vec3::new(p.x, 0.0, -p.y)
}

impl ProfileLoop {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Circle of `sections` points, starting on +X
    pub fn circle(radius: f32, sections: u32) -> Self {
        let points = (0..sections)
            .map(|i| {
                let a = TAU * i as f32 / sections as f32;
                plane_to_xz(Vec2::from_angle(a) * radius)
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copy with every point moved to height `y`
    pub fn at_height(&self, y: f32) -> Self {
        Self {
            points: self.points.iter().map(|p| Vec3::new(p.x, y, p.z)).collect(),
        }
    }

    /// Copy scaled about the Y axis (height preserved)
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Vec3::new(p.x * factor, p.y, p.z * factor))
                .collect(),
        }
    }

    /// Copy shifted by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            points: self.points.iter().map(|p| *p + offset).collect(),
        }
    }

    /// Largest |x| or |z| over the loop
    pub fn max_extent(&self) -> f32 {
        self.points
            .iter()
            .fold(0.0f32, |m, p| m.max(p.x.abs()).max(p.z.abs()))
    }

    /// Mean of the loop's points
    pub fn centroid(&self) -> Vec3 {
        if self.points.is_empty() {
            return Vec3::ZERO;
        }
        self.points.iter().copied().sum::<Vec3>() / self.points.len() as f32
    }
}

/// Rounded regular octagon
///
/// The eight sharp corners sit on a circle of `radius`, the first at π/8.
/// Each corner is replaced by a circular arc of radius `fillet` tangent to
/// both adjacent edges, sampled at `arc_segments` points from the incoming
/// tangent point to the outgoing one. One segment keeps only the incoming
/// tangent point; a zero fillet reproduces the sharp corners.
pub fn rounded_octagon_points(radius: f32, fillet: f32, arc_segments: u32) -> Vec<Vec3> {
    const SIDES: usize = 8;
    let corners: Vec<Vec2> = (0..SIDES)
        .map(|i| Vec2::from_angle(PI / 8.0 + i as f32 * TAU / SIDES as f32) * radius)
        .collect();

    // Half of the 135° interior angle
    let half_interior = (PI - TAU / SIDES as f32) * 0.5;
    let tangent_len = fillet / half_interior.tan();
    let centre_dist = fillet / half_interior.sin();

    let mut points = Vec::with_capacity(SIDES * arc_segments as usize);
    for i in 0..SIDES {
        let v = corners[i];
        let to_prev = (corners[(i + SIDES - 1) % SIDES] - v).normalize_or_zero();
        let to_next = (corners[(i + 1) % SIDES] - v).normalize_or_zero();
        let bisector = (to_prev + to_next).normalize_or_zero();

        let centre = v + bisector * centre_dist;
        let t1 = v + to_prev * tangent_len;
        let t2 = v + to_next * tangent_len;

        let a1 = (t1 - centre).to_angle();
        let a2 = (t2 - centre).to_angle();
        let mut delta = a2 - a1;
        while delta <= 0.0 {
            delta += TAU;
        }

        for s in 0..arc_segments {
            let t = if arc_segments > 1 {
                s as f32 / (arc_segments - 1) as f32
            } else {
                0.0
            };
            let p = centre + Vec2::from_angle(a1 + delta * t) * fillet;
            points.push(plane_to_xz(p));
        }
    }
    points
}

/// [`rounded_octagon_points`] as a loop at y = 0
pub fn rounded_octagon(radius: f32, fillet: f32, arc_segments: u32) -> ProfileLoop {
    ProfileLoop::new(rounded_octagon_points(radius, fillet, arc_segments))
}

/// Signed area of the loop projected onto the plane seen from +Y
///
/// Positive for counter-clockwise loops.
pub fn signed_area_from_above(points: &[Vec3]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            // (x, -z) is the view from above
            a.x * -b.z - b.x * -a.z
        })
        .sum::<f32>()
        * 0.5
}
