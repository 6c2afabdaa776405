//! Closed and flat primitive solids.

use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector2, Vector3};

use crate::{
    data_structures::mesh::Mesh,
    primitives::{MeshBuilder, non_negative, positive, segments},
};

/// Axis-aligned box of full extents `width x height x depth` centered on the origin.
pub fn cuboid(width: f32, height: f32, depth: f32) -> Mesh {
    let hx = positive("cuboid", "width", width) / 2.0;
    let hy = positive("cuboid", "height", height) / 2.0;
    let hz = positive("cuboid", "depth", depth) / 2.0;

    // (normal, u axis, v axis) with u x v == normal
    let faces = [
        (Vector3::unit_x(), -Vector3::unit_z(), Vector3::unit_y()),
        (-Vector3::unit_x(), Vector3::unit_z(), Vector3::unit_y()),
        (Vector3::unit_y(), Vector3::unit_x(), -Vector3::unit_z()),
        (-Vector3::unit_y(), Vector3::unit_x(), Vector3::unit_z()),
        (Vector3::unit_z(), Vector3::unit_x(), Vector3::unit_y()),
        (-Vector3::unit_z(), -Vector3::unit_x(), Vector3::unit_y()),
    ];
    let half = |v: Vector3<f32>| Vector3::new(v.x * hx, v.y * hy, v.z * hz);

    let mut builder = MeshBuilder::new();
    for (normal, u, v) in faces {
        let center = half(normal);
        let (u, v) = (half(u), half(v));
        let a = builder.add_vertex(center - u - v, normal, Vector2::new(0.0, 1.0));
        let b = builder.add_vertex(center + u - v, normal, Vector2::new(1.0, 1.0));
        let c = builder.add_vertex(center + u + v, normal, Vector2::new(1.0, 0.0));
        let d = builder.add_vertex(center - u + v, normal, Vector2::new(0.0, 0.0));
        builder.add_quad(a, b, c, d);
    }
    builder.build("cuboid")
}

/// Frustum along Y with the given top and bottom radii. `open_ended` skips both caps.
pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
) -> Mesh {
    let radius_top = non_negative("cylinder", "radius_top", radius_top);
    let radius_bottom = non_negative("cylinder", "radius_bottom", radius_bottom);
    let height = positive("cylinder", "height", height);
    let radial = segments("cylinder", radial_segments, 3);
    let rows = segments("cylinder", height_segments, 1);
    let half_height = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;

    let mut builder = MeshBuilder::new();
    let mut grid = Vec::with_capacity(rows as usize + 1);
    for y in 0..=rows {
        let v = y as f32 / rows as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let row: Vec<u32> = (0..=radial)
            .map(|x| {
                let u = x as f32 / radial as f32;
                let theta = u * TAU;
                let (sin, cos) = theta.sin_cos();
                builder.add_vertex(
                    Vector3::new(radius * sin, -v * height + half_height, radius * cos),
                    Vector3::new(sin, slope, cos).normalize(),
                    Vector2::new(u, 1.0 - v),
                )
            })
            .collect();
        grid.push(row);
    }
    for x in 0..radial as usize {
        for y in 0..rows as usize {
            builder.add_quad(grid[y][x], grid[y + 1][x], grid[y + 1][x + 1], grid[y][x + 1]);
        }
    }

    if !open_ended {
        if radius_top > 0.0 {
            cap(&mut builder, radius_top, half_height, radial, true);
        }
        if radius_bottom > 0.0 {
            cap(&mut builder, radius_bottom, -half_height, radial, false);
        }
    }
    builder.build("cylinder")
}

fn cap(builder: &mut MeshBuilder, radius: f32, y: f32, radial: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = Vector3::new(0.0, sign, 0.0);
    let center = builder.add_vertex(Vector3::new(0.0, y, 0.0), normal, Vector2::new(0.5, 0.5));
    let ring: Vec<u32> = (0..=radial)
        .map(|x| {
            let theta = x as f32 / radial as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            builder.add_vertex(
                Vector3::new(radius * sin, y, radius * cos),
                normal,
                Vector2::new(cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5),
            )
        })
        .collect();
    for pair in ring.windows(2) {
        if top {
            builder.add_triangle(pair[0], pair[1], center);
        } else {
            builder.add_triangle(pair[1], pair[0], center);
        }
    }
}

/// Cone along Y, apex up.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Mesh {
    let mut mesh = cylinder(0.0, radius, height, radial_segments, 1, false);
    mesh.name = "cone".to_string();
    mesh
}

/// Torus in the XY plane around the Z axis.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let radius = positive("torus", "radius", radius);
    let tube = positive("torus", "tube", tube);
    let radial = segments("torus", radial_segments, 3);
    let tubular = segments("torus", tubular_segments, 3);

    let mut builder = MeshBuilder::new();
    for j in 0..=radial {
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let v = j as f32 / radial as f32 * TAU;
            let position = Vector3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vector3::new(radius * u.cos(), radius * u.sin(), 0.0);
            builder.add_vertex(
                position,
                (position - center).normalize(),
                Vector2::new(i as f32 / tubular as f32, j as f32 / radial as f32),
            );
        }
    }
    let stride = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            builder.add_quad(a, b, c, d);
        }
    }
    builder.build("torus")
}

/// Flat annulus in the XY plane facing +Z.
pub fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> Mesh {
    let inner = non_negative("ring", "inner_radius", inner_radius);
    let outer = positive("ring", "outer_radius", outer_radius).max(inner + 0.001);
    let theta = segments("ring", theta_segments, 3);
    let normal = Vector3::unit_z();

    let mut builder = MeshBuilder::new();
    for radius in [inner, outer] {
        for i in 0..=theta {
            let angle = i as f32 / theta as f32 * TAU;
            let (x, y) = (radius * angle.cos(), radius * angle.sin());
            builder.add_vertex(
                Vector3::new(x, y, 0.0),
                normal,
                Vector2::new((x / outer + 1.0) / 2.0, (y / outer + 1.0) / 2.0),
            );
        }
    }
    for i in 0..theta {
        let a = i;
        let b = i + theta + 1;
        let c = i + theta + 2;
        let d = i + 1;
        builder.add_quad(a, b, c, d);
    }
    builder.build("ring")
}

/// Filled disc in the XY plane facing +Z.
pub fn circle(radius: f32, segment_count: u32) -> Mesh {
    let radius = positive("circle", "radius", radius);
    let count = segments("circle", segment_count, 3);
    let normal = Vector3::unit_z();

    let mut builder = MeshBuilder::new();
    let center = builder.add_vertex(Vector3::new(0.0, 0.0, 0.0), normal, Vector2::new(0.5, 0.5));
    let rim: Vec<u32> = (0..=count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            builder.add_vertex(
                Vector3::new(radius * cos, radius * sin, 0.0),
                normal,
                Vector2::new((cos + 1.0) / 2.0, (sin + 1.0) / 2.0),
            )
        })
        .collect();
    for pair in rim.windows(2) {
        builder.add_triangle(pair[0], pair[1], center);
    }
    builder.build("circle")
}

/// Angular extent of a sphere patch, in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereSweep {
    pub phi_start: f32,
    pub phi_length: f32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl SphereSweep {
    pub const FULL: SphereSweep = SphereSweep {
        phi_start: 0.0,
        phi_length: TAU,
        theta_start: 0.0,
        theta_length: PI,
    };

    /// The upper half, pole at +Y.
    pub const HEMISPHERE: SphereSweep = SphereSweep {
        theta_length: PI / 2.0,
        ..Self::FULL
    };
}

pub fn sphere(radius: f32, width_segments: u32, height_segments: u32, sweep: SphereSweep) -> Mesh {
    let radius = positive("sphere", "radius", radius);
    let columns = segments("sphere", width_segments, 3);
    let rows = segments("sphere", height_segments, 2);
    let theta_end = (sweep.theta_start + sweep.theta_length).min(PI);

    let mut builder = MeshBuilder::new();
    let mut grid = Vec::with_capacity(rows as usize + 1);
    for iy in 0..=rows {
        let v = iy as f32 / rows as f32;
        let theta = sweep.theta_start + v * sweep.theta_length;
        let row: Vec<u32> = (0..=columns)
            .map(|ix| {
                let u = ix as f32 / columns as f32;
                let phi = sweep.phi_start + u * sweep.phi_length;
                let position = Vector3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                builder.add_vertex(position, position / radius, Vector2::new(u, 1.0 - v))
            })
            .collect();
        grid.push(row);
    }
    for iy in 0..rows as usize {
        for ix in 0..columns as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 || sweep.theta_start > 0.0 {
                builder.add_triangle(a, b, d);
            }
            if iy != rows as usize - 1 || theta_end < PI {
                builder.add_triangle(b, c, d);
            }
        }
    }
    builder.build("sphere")
}

/// Single quad in the XY plane facing +Z.
pub fn plane(width: f32, height: f32) -> Mesh {
    let hx = positive("plane", "width", width) / 2.0;
    let hy = positive("plane", "height", height) / 2.0;
    let normal = Vector3::unit_z();
    let mut builder = MeshBuilder::new();
    let a = builder.add_vertex(Vector3::new(-hx, -hy, 0.0), normal, Vector2::new(0.0, 0.0));
    let b = builder.add_vertex(Vector3::new(hx, -hy, 0.0), normal, Vector2::new(1.0, 0.0));
    let c = builder.add_vertex(Vector3::new(hx, hy, 0.0), normal, Vector2::new(1.0, 1.0));
    let d = builder.add_vertex(Vector3::new(-hx, hy, 0.0), normal, Vector2::new(0.0, 1.0));
    builder.add_quad(a, b, c, d);
    builder.build("plane")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(mesh: &Mesh, i: usize) -> Vector3<f32> {
        mesh.vertices()[i].position.into()
    }

    #[test]
    fn cuboid_has_six_outward_faces() {
        let mesh = cuboid(8.0, 4.0, 6.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        for tri in mesh.indices().chunks(3) {
            let (a, b, c) = (
                position(&mesh, tri[0] as usize),
                position(&mesh, tri[1] as usize),
                position(&mesh, tri[2] as usize),
            );
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn torus_vertices_stay_on_the_tube() {
        let mesh = torus(5.2, 0.1, 8, 24);
        for v in mesh.vertices() {
            let p: Vector3<f32> = v.position.into();
            let ring_distance = (p.x * p.x + p.y * p.y).sqrt() - 5.2;
            let tube_distance = (ring_distance * ring_distance + p.z * p.z).sqrt();
            assert!((tube_distance - 0.1).abs() < 1e-4);
        }
    }

    #[test]
    fn hemisphere_stays_above_the_equator() {
        let mesh = sphere(170.0, 16, 8, SphereSweep::HEMISPHERE);
        assert!(mesh.vertices().iter().all(|v| v.position[1] >= -1e-3));
    }

    #[test]
    fn open_cylinder_has_no_caps() {
        let open = cylinder(2.5, 0.4, 45.0, 16, 30, true);
        let closed = cylinder(2.5, 0.4, 45.0, 16, 30, false);
        assert_eq!(open.vertex_count(), 17 * 31);
        assert!(closed.triangle_count() > open.triangle_count());
    }
}
