//! End-to-end resting-pose searches on simple solids.

use approx::assert_relative_eq;
use mesh_stability::{
    find_stable_orientations, is_statically_stable, CandidateVerdict, ConvexHull, Facet,
    OrientationReport, Reorient, RestingPose, RigidBody, StabilityError, StabilityParams,
    SupportPlane,
};
use mesh_types::{cuboid, unit_cube, IndexedMesh, Vertex};
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

fn all_planes() -> StabilityParams {
    StabilityParams::default().with_max_curved_repeats(u32::MAX)
}

/// Regular tetrahedron with edge length 2 resting on z = 0.
fn regular_tetrahedron() -> IndexedMesh {
    let h = (8.0_f64 / 3.0).sqrt();
    let r = 2.0 / 3.0_f64.sqrt();
    let mut mesh = IndexedMesh::new();
    for k in 0..3 {
        let angle = f64::from(k) * 2.0 * PI / 3.0;
        mesh.vertices
            .push(Vertex::from_coords(r * angle.cos(), r * angle.sin(), 0.0));
    }
    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, h));
    mesh.faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
    mesh
}

/// Closed prism over a regular `sides`-gon.
fn polygon_prism(sides: u32, radius: f64, height: f64) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    for z in [0.0, height] {
        for i in 0..sides {
            let angle = f64::from(i) * 2.0 * PI / f64::from(sides);
            mesh.vertices
                .push(Vertex::from_coords(radius * angle.cos(), radius * angle.sin(), z));
        }
    }
    for i in 0..sides {
        let j = (i + 1) % sides;
        mesh.faces.push([i, j, sides + j]);
        mesh.faces.push([i, sides + j, sides + i]);
    }
    for i in 1..sides - 1 {
        mesh.faces.push([0, i + 1, i]);
        mesh.faces.push([sides, sides + i, sides + i + 1]);
    }
    mesh
}

/// Centroid of the rested vertices touching the floor.
fn footprint_center(mesh: &IndexedMesh, pose: &RestingPose) -> Point3<f64> {
    let rested = pose.apply_to_mesh(mesh);
    let (sum, count) = rested
        .vertices
        .iter()
        .filter(|v| v.position.z.abs() < 1e-9)
        .fold((Vector3::zeros(), 0.0), |(sum, n), v| (sum + v.position.coords, n + 1.0));
    Point3::from(sum / count)
}

fn verdict_count(report: &OrientationReport, verdict: CandidateVerdict) -> usize {
    report.count(verdict)
}

// =============================================================================
// Cube and boxes
// =============================================================================

#[test]
fn cube_rests_on_all_six_faces() {
    let cube = unit_cube();
    let report = find_stable_orientations(&cube, &all_planes()).unwrap();

    assert_eq!(report.orientations.len(), 6);
    for (i, orientation) in report.orientations.iter().enumerate() {
        assert_eq!(orientation.index, i);
        assert!(orientation.stable);
        assert_relative_eq!(orientation.normal.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(orientation.plane.area, 1.0, epsilon = 1e-9);

        let com = orientation.pose.center_of_mass;
        let center = footprint_center(&cube, &orientation.pose);
        assert_relative_eq!(com.x, center.x, epsilon = 1e-9);
        assert_relative_eq!(com.y, center.y, epsilon = 1e-9);
        assert_relative_eq!(com.z, 0.5, epsilon = 1e-9);
    }

    // Six pairwise perpendicular or opposite normals.
    for (i, a) in report.orientations.iter().enumerate() {
        for b in &report.orientations[i + 1..] {
            assert!(a.normal.dot(&b.normal) < 1e-9);
        }
    }
}

#[test]
fn cube_faces_share_one_area_bucket_by_default() {
    // Six equal faces look like a curved surface to the redundancy pass,
    // which keeps three of them.
    let report = find_stable_orientations(&unit_cube(), &StabilityParams::default()).unwrap();
    assert_eq!(report.plane_count, 6);
    assert_eq!(report.reduced_count, 3);
    assert_eq!(report.orientations.len(), 3);
}

#[test]
fn box_with_distinct_sides() {
    let block = cuboid(1.0, 2.0, 3.0);
    let report = find_stable_orientations(&block, &StabilityParams::default()).unwrap();

    assert_eq!(report.orientations.len(), 6);
    assert_relative_eq!(report.total_area, 22.0, epsilon = 1e-9);
    assert_relative_eq!(report.lowest_height.unwrap(), 0.5, epsilon = 1e-9);

    let mut heights: Vec<f64> = report
        .orientations
        .iter()
        .map(|o| o.pose.height())
        .collect();
    heights.sort_by(f64::total_cmp);
    for (got, want) in heights.iter().zip([0.5, 0.5, 1.0, 1.0, 1.5, 1.5]) {
        assert_relative_eq!(*got, want, epsilon = 1e-9);
    }
}

#[test]
fn decimal_box_rests_on_all_faces() {
    // Coordinates such as 0.1 have no exact binary form; the hull must
    // still map its vertices back onto the mesh, wherever the box sits.
    for offset in [Vector3::zeros(), Vector3::new(12.34, -5.6, 0.789)] {
        let mut block = cuboid(0.1, 0.2, 0.3);
        for v in &mut block.vertices {
            v.position += offset;
        }
        let report = find_stable_orientations(&block, &StabilityParams::default()).unwrap();

        assert_eq!(report.plane_count, 6);
        assert_eq!(report.orientations.len(), 6);
        assert_relative_eq!(report.total_area, 0.22, epsilon = 1e-12);

        let mut heights: Vec<f64> = report
            .orientations
            .iter()
            .map(|o| o.pose.height())
            .collect();
        heights.sort_by(f64::total_cmp);
        for (got, want) in heights.iter().zip([0.05, 0.05, 0.1, 0.1, 0.15, 0.15]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }
}

#[test]
fn tall_box_filtered_by_height() {
    // Standing on its 1 x 1 end the center of mass is at 5, ten times the
    // lying height of 0.5.
    let post = cuboid(1.0, 1.5, 10.0);
    let report = find_stable_orientations(&post, &StabilityParams::default()).unwrap();

    assert_eq!(verdict_count(&report, CandidateVerdict::TooHigh), 2);
    assert_eq!(report.orientations.len(), 4);
    assert!(report
        .orientations
        .iter()
        .all(|o| o.normal.z.abs() < 1e-9));

    let relaxed = StabilityParams::default().with_height_multiplier(20.0);
    let report = find_stable_orientations(&post, &relaxed).unwrap();
    assert_eq!(report.orientations.len(), 6);
}

#[test]
fn ranking_cap_limits_candidates() {
    let block = cuboid(1.0, 2.0, 3.0);
    let params = StabilityParams::default().with_max_planes(2);
    let report = find_stable_orientations(&block, &params).unwrap();

    assert_eq!(report.ranked_count, 2);
    for orientation in &report.orientations {
        assert_relative_eq!(orientation.plane.area, 6.0, epsilon = 1e-9);
    }
}

// =============================================================================
// Tetrahedra
// =============================================================================

#[test]
fn regular_tetrahedron_center_above_face() {
    let tet = regular_tetrahedron();
    let points = tet.positions();
    let body = RigidBody::new(&tet).unwrap();

    let base = SupportPlane::new(Facet([0, 2, 1]), -Vector3::z(), 1.0);
    let pose = body.rest_on(&base.normal);
    assert!(is_statically_stable(&points, &pose, &base, 1e-9));

    let shifted = RestingPose {
        center_of_mass: pose.center_of_mass + Vector3::new(10.0, 0.0, 0.0),
        ..pose
    };
    assert!(!is_statically_stable(&points, &shifted, &base, 1e-9));
}

#[test]
fn regular_tetrahedron_rests_on_every_face() {
    let tet = regular_tetrahedron();
    let report = find_stable_orientations(&tet, &all_planes()).unwrap();

    assert_eq!(report.plane_count, 4);
    assert_eq!(report.orientations.len(), 4);
    let height = report.orientations[0].pose.height();
    for orientation in &report.orientations {
        assert_relative_eq!(orientation.pose.height(), height, epsilon = 1e-9);
    }
}

#[test]
fn skewed_tetrahedron_tips_over_its_overhang() {
    // The apex leans far past the base, dragging the center of mass
    // outside the base triangle.
    let mut tet = IndexedMesh::new();
    for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [3.0, 3.0, 0.5]] {
        tet.vertices.push(Vertex::from(p));
    }
    tet.faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];

    let params = all_planes().with_height_multiplier(1e6);
    let report = find_stable_orientations(&tet, &params).unwrap();

    assert!(verdict_count(&report, CandidateVerdict::Unstable) >= 1);
    assert!(report.orientations.len() < 4);
    assert!(report
        .orientations
        .iter()
        .all(|o| (o.normal - Vector3::new(0.0, 0.0, -1.0)).norm() > 1e-6));
}

// =============================================================================
// Curved surfaces
// =============================================================================

#[test]
fn prism_sides_are_thinned() {
    let prism = polygon_prism(24, 1.0, 4.0);
    let report = find_stable_orientations(&prism, &StabilityParams::default()).unwrap();

    assert_eq!(report.plane_count, 26);
    // Three of the 24 equal sides plus both caps.
    assert_eq!(report.reduced_count, 5);
    assert_eq!(report.orientations.len(), 5);

    let caps = report
        .orientations
        .iter()
        .filter(|o| o.normal.z.abs() > 1.0 - 1e-9)
        .count();
    assert_eq!(caps, 2);
}

#[test]
fn small_prism_sides_are_thinned() {
    let prism = polygon_prism(24, 0.3, 1.1);
    let report = find_stable_orientations(&prism, &StabilityParams::default()).unwrap();

    assert_eq!(report.plane_count, 26);
    assert_eq!(report.reduced_count, 5);
    assert_eq!(report.orientations.len(), 5);

    let apothem = 0.3 * (PI / 24.0).cos();
    for orientation in &report.orientations {
        let want = if orientation.normal.z.abs() > 1.0 - 1e-9 { 0.55 } else { apothem };
        assert_relative_eq!(orientation.pose.height(), want, epsilon = 1e-9);
    }
}

#[test]
fn prism_keeps_every_side_when_allowed() {
    let prism = polygon_prism(12, 1.0, 3.0);
    let report = find_stable_orientations(&prism, &all_planes()).unwrap();
    assert_eq!(report.orientations.len(), 14);
}

// =============================================================================
// Degenerate input
// =============================================================================

#[test]
fn flat_object_is_reported_not_panicked() {
    let mut sheet = IndexedMesh::new();
    for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
        sheet.vertices.push(Vertex::from(p));
    }
    sheet.faces = vec![[0, 1, 2], [0, 2, 3]];

    let err = find_stable_orientations(&sheet, &StabilityParams::default()).unwrap_err();
    assert!(matches!(err, StabilityError::HullFailed { .. }));
}

#[test]
fn hull_ignores_interior_vertices() {
    let mut cube = unit_cube();
    cube.vertices.push(Vertex::from_coords(0.5, 0.5, 0.5));
    let points = cube.positions();
    let hull = ConvexHull::compute(&points).unwrap();
    assert!(hull.facets().iter().all(|f| !f.indices().contains(&8)));
}
