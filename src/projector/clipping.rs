use glam::{Vec2, Vec4};

/// Signed distances of a clip-space point to the six clip boundaries
/// `-w <= x, y, z <= w`; all non-negative means inside.
#[inline]
fn boundary_coords(v: Vec4) -> [f32; 6] {
    [v.w + v.x, v.w - v.x, v.w + v.y, v.w - v.y, v.w + v.z, v.w - v.z]
}

/// Liang-Barsky clipping of the clip-space segment `a -> b`.
///
/// Returns the parameter range `(t0, t1)` of the part inside the clip volume,
/// or `None` when nothing is left.
#[must_use]
pub fn clip_segment(a: Vec4, b: Vec4) -> Option<(f32, f32)> {
    let bc_a = boundary_coords(a);
    let bc_b = boundary_coords(b);

    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;

    for (da, db) in bc_a.into_iter().zip(bc_b) {
        if da < 0.0 && db < 0.0 {
            return None;
        }
        if da < 0.0 {
            // entering
            t0 = t0.max(da / (da - db));
        } else if db < 0.0 {
            // leaving
            t1 = t1.min(da / (da - db));
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((t0, t1))
}

/// Whether the NDC rectangle `[min, max]` overlaps the `[-1, 1]` square.
#[inline]
#[must_use]
pub fn rect_intersects_clip(min: Vec2, max: Vec2) -> bool {
    max.x >= -1.0 && min.x <= 1.0 && max.y >= -1.0 && min.y <= 1.0
}
