//! Camera and Frustum Tests
//!
//! Tests for:
//! - Perspective/Orthographic projection matrices (OpenGL clip volume)
//! - View matrix update from the camera world transform
//! - Frustum plane extraction (Gribb-Hartmann) and normalization
//! - Point containment on the boundary
//! - Sphere vs object culling boundary
//! - Frustum-AABB intersection
//! - Camera validation

use glam::{Affine3A, Mat4, Vec3, Vec4};

use lumen::errors::ProjectorError;
use lumen::resources::{BoundingBox, BoundingSphere};
use lumen::scene::{Camera, Frustum, Plane};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn ndc(m: &Mat4, p: Vec3) -> Vec3 {
    let clip = *m * p.extend(1.0);
    clip.truncate() / clip.w
}

// ============================================================================
// Projection Matrix Tests
// ============================================================================

#[test]
fn perspective_near_and_far_map_to_gl_depth_range() {
    let cam = Camera::new_perspective(60.0, 1.0, 0.5, 50.0);
    let proj = cam.projection_matrix();

    let near = ndc(proj, Vec3::new(0.0, 0.0, -0.5));
    let far = ndc(proj, Vec3::new(0.0, 0.0, -50.0));
    assert!(approx(near.z, -1.0), "near plane should map to z=-1, got {}", near.z);
    assert!(approx(far.z, 1.0), "far plane should map to z=1, got {}", far.z);
}

#[test]
fn perspective_fov_is_stored_in_radians() {
    let cam = Camera::new_perspective(90.0, 1.0, 0.1, 100.0);
    assert!(approx(cam.fov, std::f32::consts::FRAC_PI_2));

    // 90 degree vertical fov: y = |z| lands on the top edge
    let top = ndc(cam.projection_matrix(), Vec3::new(0.0, 10.0, -10.0));
    assert!(approx(top.y, 1.0), "expected y=1 on the top edge, got {}", top.y);
}

#[test]
fn orthographic_extents_follow_size_aspect_and_zoom() {
    let mut cam = Camera::new_orthographic(5.0, 2.0, 1.0, 10.0);
    let edge = ndc(cam.projection_matrix(), Vec3::new(10.0, 5.0, -5.0));
    assert!(approx(edge.x, 1.0) && approx(edge.y, 1.0), "got {edge:?}");

    cam.zoom = 2.0;
    cam.update_projection_matrix();
    let edge = ndc(cam.projection_matrix(), Vec3::new(5.0, 2.5, -5.0));
    assert!(approx(edge.x, 1.0) && approx(edge.y, 1.0), "zoomed extents, got {edge:?}");
}

// ============================================================================
// View Matrix Tests
// ============================================================================

#[test]
fn view_matrix_is_inverse_of_world() {
    let mut cam = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
    let world = Affine3A::from_rotation_translation(
        glam::Quat::from_rotation_y(0.7),
        Vec3::new(3.0, -2.0, 8.0),
    );
    cam.update_view_projection(&world);

    let product = *cam.view_matrix() * Mat4::from(world);
    assert!(
        product.abs_diff_eq(Mat4::IDENTITY, EPSILON),
        "view * world should be identity, got {product:?}"
    );
    assert!((cam.position() - Vec3::new(3.0, -2.0, 8.0)).length() < EPSILON);
}

#[test]
fn view_projection_combines_both_matrices() {
    let mut cam = Camera::new_perspective(60.0, 1.5, 0.1, 100.0);
    cam.update_view_projection(&Affine3A::from_translation(Vec3::new(0.0, 0.0, 10.0)));

    let expected = *cam.projection_matrix() * *cam.view_matrix();
    assert!(cam.view_projection_matrix().abs_diff_eq(expected, EPSILON));

    // the world origin sits 10 units in front of the camera
    let view_z = cam.view_matrix().transform_point3(Vec3::ZERO).z;
    assert!(approx(view_z, -10.0));
}

// ============================================================================
// Plane Extraction Tests
// ============================================================================

#[test]
fn raw_planes_are_row_combinations() {
    let cam = Camera::new_perspective(75.0, 1.3, 0.2, 40.0);
    let m = *cam.projection_matrix();
    let raw = Frustum::extract_raw_planes(&m);
    let (r0, r1, r2, r3) = (m.row(0), m.row(1), m.row(2), m.row(3));

    let expected = [r3 - r0, r3 + r0, r3 + r1, r3 - r1, r3 - r2, r3 + r2];
    for (index, (got, want)) in raw.iter().zip(expected).enumerate() {
        assert!(got.abs_diff_eq(want, 1e-6), "plane {index}: {got:?} != {want:?}");
    }
}

#[test]
fn identity_planes_bound_the_unit_cube() {
    let frustum = Frustum::from_matrix(Mat4::IDENTITY);
    let planes = frustum.planes();

    assert_eq!(planes[Frustum::RIGHT].as_vec4(), Vec4::new(-1.0, 0.0, 0.0, 1.0));
    assert_eq!(planes[Frustum::LEFT].as_vec4(), Vec4::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(planes[Frustum::BOTTOM].as_vec4(), Vec4::new(0.0, 1.0, 0.0, 1.0));
    assert_eq!(planes[Frustum::TOP].as_vec4(), Vec4::new(0.0, -1.0, 0.0, 1.0));
    assert_eq!(planes[Frustum::FAR].as_vec4(), Vec4::new(0.0, 0.0, -1.0, 1.0));
    assert_eq!(planes[Frustum::NEAR].as_vec4(), Vec4::new(0.0, 0.0, 1.0, 1.0));
}

#[test]
fn extracted_planes_have_unit_normals() {
    let mut cam = Camera::new_perspective(50.0, 16.0 / 9.0, 0.1, 500.0);
    cam.update_view_projection(&Affine3A::from_rotation_translation(
        glam::Quat::from_rotation_x(-0.4),
        Vec3::new(1.0, 5.0, 12.0),
    ));

    for (index, plane) in cam.frustum().planes().iter().enumerate() {
        assert!(
            approx(plane.normal.length(), 1.0),
            "plane {index} normal length {}",
            plane.normal.length()
        );
    }
}

#[test]
fn zero_normal_plane_normalizes_to_zero_plane() {
    let plane = Plane::new(Vec3::ZERO, 5.0).normalized();
    assert_eq!(plane, Plane::default());
}

#[test]
fn near_plane_passes_through_near_point() {
    let cam = Camera::new_perspective(60.0, 1.0, 0.5, 50.0);
    let near = cam.frustum().planes()[Frustum::NEAR];
    assert!(approx(near.distance_to_point(Vec3::new(0.0, 0.0, -0.5)), 0.0));
    assert!(near.distance_to_point(Vec3::new(0.0, 0.0, -1.0)) > 0.0);
}

// ============================================================================
// Containment & Intersection Tests
// ============================================================================

fn make_test_frustum() -> Frustum {
    // camera at origin looking down -Z, 90 degree fov
    let cam = Camera::new_perspective(90.0, 1.0, 0.1, 100.0);
    *cam.frustum()
}

#[test]
fn point_on_boundary_is_contained() {
    let frustum = Frustum::from_matrix(Mat4::IDENTITY);
    assert!(frustum.contains_point(Vec3::new(1.0, 0.0, 0.0)));
    assert!(frustum.contains_point(Vec3::new(-1.0, -1.0, 1.0)));
    assert!(!frustum.contains_point(Vec3::new(1.0 + 1e-3, 0.0, 0.0)));
}

#[test]
fn frustum_sphere_inside_and_outside() {
    let frustum = make_test_frustum();
    assert!(frustum.intersects_sphere(Vec3::new(0.0, 0.0, -10.0), 1.0));
    assert!(!frustum.intersects_sphere(Vec3::new(0.0, 0.0, 10.0), 1.0), "behind the camera");
    assert!(!frustum.intersects_sphere(Vec3::new(-30.0, 0.0, -10.0), 1.0), "left of the view");
    assert!(!frustum.intersects_sphere(Vec3::new(0.0, 0.0, -200.0), 1.0), "beyond far");
}

#[test]
fn frustum_sphere_straddling_boundary() {
    let frustum = make_test_frustum();
    // center just outside the right plane, radius reaches back in
    assert!(frustum.intersects_sphere(Vec3::new(11.0, 0.0, -10.0), 2.0));
}

#[test]
fn sphere_touching_from_outside_is_kept_but_object_is_culled() {
    let frustum = Frustum::from_matrix(Mat4::IDENTITY);
    let sphere = BoundingSphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);

    assert!(
        frustum.intersects_sphere(sphere.center, sphere.radius),
        "generic sphere test includes the boundary"
    );
    assert!(
        !frustum.intersects_object(&Affine3A::IDENTITY, &sphere),
        "object test rejects a sphere that only touches"
    );

    let overlapping = BoundingSphere::new(Vec3::new(1.9, 0.0, 0.0), 1.0);
    assert!(frustum.intersects_object(&Affine3A::IDENTITY, &overlapping));
}

#[test]
fn object_test_scales_radius_by_max_axis_scale() {
    let frustum = Frustum::from_matrix(Mat4::IDENTITY);
    let world = Affine3A::from_scale(Vec3::new(1.0, 3.0, 1.0));

    // world center (1.5, 0, 0), radius 1.5
    let near_edge = BoundingSphere::new(Vec3::new(1.5, 0.0, 0.0), 0.5);
    assert!(frustum.intersects_object(&world, &near_edge));

    // world center (3.0, 0, 0), radius 1.5
    let far_out = BoundingSphere::new(Vec3::new(3.0, 0.0, 0.0), 0.5);
    assert!(!frustum.intersects_object(&world, &far_out));
}

#[test]
fn frustum_aabb_inside_outside_and_straddling() {
    let frustum = make_test_frustum();
    assert!(frustum.intersects_box(Vec3::new(-1.0, -1.0, -11.0), Vec3::new(1.0, 1.0, -9.0)));
    assert!(!frustum.intersects_box(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 8.0)));
    assert!(frustum.intersects_aabb(&BoundingBox::new(
        Vec3::new(9.0, -1.0, -11.0),
        Vec3::new(12.0, 1.0, -9.0)
    )));
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn camera_with_far_before_near_is_invalid() {
    let cam = Camera::new_perspective(60.0, 1.0, 10.0, 1.0);
    assert!(matches!(cam.validate(), Err(ProjectorError::InvalidCamera(_))));
}

#[test]
fn perspective_camera_needs_positive_near() {
    let cam = Camera::new_perspective(60.0, 1.0, 0.0, 10.0);
    assert!(matches!(cam.validate(), Err(ProjectorError::InvalidCamera(_))));

    let ortho = Camera::new_orthographic(1.0, 1.0, 0.0, 10.0);
    assert!(ortho.validate().is_ok(), "orthographic near may be zero");
}

#[test]
fn camera_with_zero_scale_is_degenerate() {
    let mut cam = Camera::new_perspective(60.0, 1.0, 0.1, 10.0);
    cam.update_view_projection(&Affine3A::from_scale(Vec3::new(1.0, 0.0, 1.0)));

    assert!(matches!(
        cam.validate(),
        Err(ProjectorError::DegenerateCamera { .. })
    ));
    assert_eq!(*cam.view_matrix(), Mat4::IDENTITY, "singular world falls back to identity");
}

#[test]
fn camera_with_tiny_uniform_scale_is_valid() {
    let mut cam = Camera::new_perspective(60.0, 1.0, 0.1, 10.0);
    let world = Affine3A::from_scale_rotation_translation(
        Vec3::splat(0.001),
        glam::Quat::from_rotation_y(0.4),
        Vec3::new(0.0, 0.0, 0.01),
    );
    cam.update_view_projection(&world);

    assert!(cam.validate().is_ok());
    let round_trip = *cam.view_matrix() * Mat4::from(world);
    assert!(round_trip.abs_diff_eq(Mat4::IDENTITY, 1e-3));
}
