//! Geometry, Bounds and Material Tests
//!
//! Tests for:
//! - BoundingBox center, size, union, containment, transform
//! - BoundingSphere transform
//! - Geometry bounding volume computation and invalidation on mutation
//! - Face and vertex normal computation (area-weighted)
//! - Primitive geometry creation (box, plane, triangle, line strip)
//! - Material face-side selection

use glam::{Affine3A, Quat, Vec3, Vec4};

use lumen::resources::{BoundingBox, BoundingSphere, Face, Geometry, Material, Side};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

// ============================================================================
// BoundingBox Tests
// ============================================================================

#[test]
fn bbox_center_and_size() {
    let bbox = BoundingBox::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 4.0, 6.0));
    assert!(vec3_approx(bbox.center(), Vec3::new(1.0, 2.0, 4.0)));
    assert!(vec3_approx(bbox.size(), Vec3::new(4.0, 4.0, 4.0)));
}

#[test]
fn bbox_union() {
    let a = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
    let b = BoundingBox::new(Vec3::new(-2.0, 0.5, 0.5), Vec3::new(0.5, 3.0, 0.75));
    let u = a.union(&b);
    assert!(vec3_approx(u.min, Vec3::new(-2.0, 0.0, 0.0)));
    assert!(vec3_approx(u.max, Vec3::new(1.0, 3.0, 1.0)));
}

#[test]
fn bbox_union_with_empty_is_identity() {
    let a = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
    assert_eq!(a.union(&BoundingBox::EMPTY), a);
}

#[test]
fn bbox_contains_point_inclusive() {
    let bbox = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
    assert!(bbox.contains_point(Vec3::splat(0.5)));
    assert!(bbox.contains_point(Vec3::ONE));
    assert!(!bbox.contains_point(Vec3::new(1.01, 0.5, 0.5)));
}

#[test]
fn bbox_transform_translation() {
    let bbox = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let moved = bbox.transform(&Affine3A::from_translation(Vec3::new(5.0, 0.0, -2.0)));
    assert!(vec3_approx(moved.min, Vec3::new(4.0, -1.0, -3.0)));
    assert!(vec3_approx(moved.max, Vec3::new(6.0, 1.0, -1.0)));
}

#[test]
fn bbox_transform_scale() {
    let bbox = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let scaled = bbox.transform(&Affine3A::from_scale(Vec3::new(2.0, 3.0, 0.5)));
    assert!(vec3_approx(scaled.min, Vec3::new(-2.0, -3.0, -0.5)));
    assert!(vec3_approx(scaled.max, Vec3::new(2.0, 3.0, 0.5)));
}

#[test]
fn bbox_transform_rotation_grows_box() {
    let bbox = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let rotated = bbox.transform(&Affine3A::from_quat(Quat::from_rotation_y(
        std::f32::consts::FRAC_PI_4,
    )));
    let half_diagonal = std::f32::consts::SQRT_2;
    assert!(approx(rotated.max.x, half_diagonal), "got {}", rotated.max.x);
    assert!(approx(rotated.max.y, 1.0));
    assert!(approx(rotated.min.z, -half_diagonal));
}

#[test]
fn bounding_sphere_transform_uses_max_scale() {
    let sphere = BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
    let world = Affine3A::from_scale_rotation_translation(
        Vec3::new(1.0, 3.0, 2.0),
        Quat::IDENTITY,
        Vec3::new(0.0, 10.0, 0.0),
    );
    let transformed = sphere.transform(&world);
    assert!(vec3_approx(transformed.center, Vec3::new(1.0, 10.0, 0.0)));
    assert!(approx(transformed.radius, 6.0));
    assert!(transformed.contains_point(Vec3::new(1.0, 15.9, 0.0)));
}

// ============================================================================
// Geometry Bounding Volumes
// ============================================================================

#[test]
fn geometry_box_bounding_volume() {
    let geometry = Geometry::new_box(2.0, 4.0, 6.0);

    let bbox = geometry.bounding_box().expect("box computes its bounds");
    assert!(vec3_approx(bbox.min, Vec3::new(-1.0, -2.0, -3.0)));
    assert!(vec3_approx(bbox.max, Vec3::new(1.0, 2.0, 3.0)));

    let sphere = geometry.bounding_sphere().unwrap();
    assert!(vec3_approx(sphere.center, Vec3::ZERO));
    assert!(approx(sphere.radius, 14.0_f32.sqrt()));
}

#[test]
fn bounding_sphere_reaches_farthest_vertex() {
    let mut geometry = Geometry::from_parts(
        vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)],
        Vec::new(),
    );
    let sphere = geometry.compute_bounding_sphere().unwrap();

    // centered on the box center, not the centroid
    assert!(vec3_approx(sphere.center, Vec3::new(2.0, 0.5, 0.0)));
    let expected = Vec3::new(2.0, 0.5, 0.0).distance(Vec3::ZERO);
    assert!(approx(sphere.radius, expected));
    assert!(geometry.bounding_box().is_some(), "sphere computation fills the box too");
}

#[test]
fn empty_geometry_has_no_bounds() {
    let mut geometry = Geometry::new();
    assert!(geometry.compute_bounding_box().is_none());
    assert!(geometry.compute_bounding_sphere().is_none());
    assert!(geometry.bounding_sphere().is_none());
}

#[test]
fn vertex_mutation_invalidates_bounds() {
    let mut geometry = Geometry::new_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
    assert!(geometry.bounding_box().is_some());
    assert!(geometry.bounding_sphere().is_some());

    geometry.vertices_mut()[0] = Vec3::new(-5.0, 0.0, 0.0);
    assert!(geometry.bounding_box().is_none(), "vertices_mut drops cached box");
    assert!(geometry.bounding_sphere().is_none(), "vertices_mut drops cached sphere");

    geometry.compute_bounding_volume();
    assert!(approx(geometry.bounding_box().unwrap().min.x, -5.0));

    geometry.push_vertex(Vec3::new(0.0, 0.0, 9.0));
    assert!(geometry.bounding_box().is_none(), "push_vertex drops cached bounds");

    geometry.compute_bounding_volume();
    geometry.set_vertices(vec![Vec3::ONE]);
    assert!(geometry.bounding_sphere().is_none(), "set_vertices drops cached bounds");
}

#[test]
fn face_edits_keep_bounds() {
    let mut geometry = Geometry::new_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
    geometry.push_face(Face::tri(2, 1, 0));
    assert!(geometry.bounding_box().is_some());
}

// ============================================================================
// Normals
// ============================================================================

#[test]
fn box_face_normals_point_outward() {
    let mut geometry = Geometry::new_box(1.0, 2.0, 3.0);
    let assigned: Vec<Vec3> = geometry.faces.iter().map(|f| f.normal).collect();

    geometry.compute_face_normals();

    for (index, (face, expected)) in geometry.faces.iter().zip(assigned).enumerate() {
        assert!(
            vec3_approx(face.normal, expected),
            "side {index}: computed {:?}, assigned {expected:?}",
            face.normal
        );
        let centroid = geometry.face_centroid(index).unwrap();
        assert!(centroid.dot(face.normal) > 0.0, "side {index} normal points inward");
    }
}

#[test]
fn vertex_normals_are_area_weighted() {
    // Large triangle in the XY plane and a half-size one in the XZ plane,
    // sharing the edge v0-v1.
    let mut geometry = Geometry::from_parts(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
        vec![Face::tri(0, 1, 2), Face::tri(0, 3, 1)],
    );
    geometry.compute_vertex_normals();

    let shared = Vec3::new(0.0, 1.0, 2.0).normalize();
    let big = &geometry.faces[0];
    assert_eq!(big.vertex_normals.len(), 3);
    assert!(vec3_approx(big.vertex_normals[0], shared), "got {:?}", big.vertex_normals[0]);
    assert!(vec3_approx(big.vertex_normals[1], shared));
    assert!(vec3_approx(big.vertex_normals[2], Vec3::Z));

    let small = &geometry.faces[1];
    assert!(vec3_approx(small.vertex_normals[1], Vec3::Y));
}

#[test]
fn invalid_faces_get_no_normals() {
    let mut geometry = Geometry::from_parts(vec![Vec3::ZERO, Vec3::X], vec![Face::tri(0, 1, 7)]);
    geometry.compute_face_normals();
    geometry.compute_vertex_normals();

    assert_eq!(geometry.faces[0].normal, Vec3::ZERO);
    assert!(geometry.faces[0].vertex_normals.is_empty());
    assert!(geometry.face_centroid(0).is_none());
}

// ============================================================================
// Faces & Primitives
// ============================================================================

#[test]
fn face_validity_checks_arity_and_range() {
    assert!(Face::tri(0, 1, 2).is_valid_for(3));
    assert!(!Face::tri(0, 1, 3).is_valid_for(3));
    assert!(Face::quad(0, 1, 2, 3).is_valid_for(4));

    let mut pentagon = Face::quad(0, 1, 2, 3);
    pentagon.indices.push(4);
    assert!(!pentagon.is_valid_for(5));
}

#[test]
fn geometry_box_has_six_quads() {
    let geometry = Geometry::new_box(1.0, 1.0, 1.0);
    assert_eq!(geometry.vertices().len(), 24);
    assert_eq!(geometry.faces.len(), 6);
    assert!(geometry.faces.iter().all(|f| f.arity() == 4));
    assert_eq!(geometry.face_vertex_uvs.len(), 1);
    assert_eq!(geometry.face_vertex_uvs[0].len(), 6);

    let material_indices: Vec<usize> = geometry.faces.iter().map(|f| f.material_index).collect();
    assert_eq!(material_indices, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn geometry_plane_faces_plus_z() {
    let geometry = Geometry::new_plane(2.0, 2.0);
    assert_eq!(geometry.faces.len(), 1);

    let mut recomputed = geometry.clone();
    recomputed.compute_face_normals();
    assert!(vec3_approx(recomputed.faces[0].normal, Vec3::Z));
    assert!(vec3_approx(geometry.face_centroid(0).unwrap(), Vec3::ZERO));
}

#[test]
fn line_strip_has_white_vertex_colors() {
    let points = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0)];
    let geometry = Geometry::new_line_strip(&points);

    assert_eq!(geometry.vertices(), &points);
    assert_eq!(geometry.colors, vec![Vec4::ONE; 3]);
    assert!(geometry.faces.is_empty());
    assert!(geometry.bounding_sphere().is_some());
}

// ============================================================================
// Material Side Selection
// ============================================================================

#[test]
fn material_side_selects_faces() {
    let front = Material::new_basic(Vec4::ONE);
    assert!(front.keeps_face(true));
    assert!(!front.keeps_face(false));

    let back = Material::new_basic(Vec4::ONE).with_side(Side::Back);
    assert!(!back.keeps_face(true));
    assert!(back.keeps_face(false));

    let double = Material::new_basic(Vec4::ONE).with_side(Side::Double);
    assert!(double.keeps_face(true) && double.keeps_face(false));
}

#[test]
fn transparent_material_keeps_both_sides() {
    let glass = Material::new_lambert(Vec4::ONE).with_opacity(0.5);
    assert!(glass.transparent);
    assert!(glass.keeps_face(false));

    let opaque = Material::new_lambert(Vec4::ONE).with_opacity(1.0);
    assert!(!opaque.transparent);
}
