//! Swept shapes: extruded outlines, tubes along curves and vertex displacement.

use cgmath::{InnerSpace, Quaternion, Rad, Rotation, Rotation3, Vector2, Vector3};
use log::warn;

use crate::{
    data_structures::mesh::{Geometry, Mesh},
    primitives::{MeshBuilder, positive, segments},
};

/// Chamfer around the side walls of an extrusion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bevel {
    /// Extra depth added in front of and behind the body.
    pub thickness: f32,
    /// How far the body walls are pushed out from the outline.
    pub size: f32,
}

/**
 * Extrudes a closed 2D outline (XY plane) along +Z by `depth`. With a bevel the caps
 * keep the outline at `-thickness` and `depth + thickness` while the walls between
 * them are widened by `size`.
 *
 * Caps are fanned from the centroid, so the outline must be star-shaped about it.
 */
pub fn extrude(outline: &[Vector2<f32>], depth: f32, bevel: Option<Bevel>) -> Mesh {
    let depth = positive("extrude", "depth", depth);
    let mut contour: Vec<Vector2<f32>> = outline.to_vec();
    if contour.len() > 1 && contour.first() == contour.last() {
        contour.pop();
    }
    if contour.len() < 3 {
        warn!("extrude: outline needs at least 3 distinct points, got {}", contour.len());
        return MeshBuilder::new().build("extrude");
    }
    if signed_area(&contour) < 0.0 {
        contour.reverse();
    }

    let layers: Vec<(f32, Vec<Vector2<f32>>)> = match bevel {
        Some(Bevel { thickness, size }) => {
            let widened = offset(&contour, size);
            vec![
                (-thickness, contour.clone()),
                (0.0, widened.clone()),
                (depth, widened),
                (depth + thickness, contour.clone()),
            ]
        }
        None => vec![(0.0, contour.clone()), (depth, contour.clone())],
    };

    let mut builder = MeshBuilder::new();
    let n = contour.len();
    for pair in layers.windows(2) {
        let (z0, lower) = (pair[0].0, &pair[0].1);
        let (z1, upper) = (pair[1].0, &pair[1].1);
        for k in 0..n {
            let next = (k + 1) % n;
            let a = lower[k].extend(z0);
            let b = lower[next].extend(z0);
            let c = upper[next].extend(z1);
            let d = upper[k].extend(z1);
            let normal = (b - a).cross(d - a).normalize();
            let u0 = k as f32 / n as f32;
            let u1 = (k + 1) as f32 / n as f32;
            let (v0, v1) = (z0 / depth, z1 / depth);
            let ia = builder.add_vertex(a, normal, Vector2::new(u0, v0));
            let ib = builder.add_vertex(b, normal, Vector2::new(u1, v0));
            let ic = builder.add_vertex(c, normal, Vector2::new(u1, v1));
            let id = builder.add_vertex(d, normal, Vector2::new(u0, v1));
            builder.add_quad(ia, ib, ic, id);
        }
    }

    if let (Some((back_z, back)), Some((front_z, front))) = (layers.first(), layers.last()) {
        fan_cap(&mut builder, back, *back_z, false);
        fan_cap(&mut builder, front, *front_z, true);
    }
    builder.build("extrude")
}

fn fan_cap(builder: &mut MeshBuilder, contour: &[Vector2<f32>], z: f32, front: bool) {
    let normal = Vector3::new(0.0, 0.0, if front { 1.0 } else { -1.0 });
    let centroid = contour.iter().fold(Vector2::new(0.0, 0.0), |acc, p| acc + *p) / contour.len() as f32;
    let center = builder.add_vertex(centroid.extend(z), normal, centroid);
    let rim: Vec<u32> = contour
        .iter()
        .map(|p| builder.add_vertex(p.extend(z), normal, *p))
        .collect();
    for k in 0..rim.len() {
        let (a, b) = (rim[k], rim[(k + 1) % rim.len()]);
        if front {
            builder.add_triangle(center, a, b);
        } else {
            builder.add_triangle(center, b, a);
        }
    }
}

fn signed_area(contour: &[Vector2<f32>]) -> f32 {
    let n = contour.len();
    (0..n)
        .map(|k| {
            let (p, q) = (contour[k], contour[(k + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum::<f32>()
        / 2.0
}

/// Pushes every vertex of a counter-clockwise outline outward by `distance`.
fn offset(contour: &[Vector2<f32>], distance: f32) -> Vec<Vector2<f32>> {
    let n = contour.len();
    let outward = |from: Vector2<f32>, to: Vector2<f32>| {
        let e = to - from;
        let len = e.magnitude();
        if len > f32::EPSILON {
            Vector2::new(e.y, -e.x) / len
        } else {
            Vector2::new(0.0, 0.0)
        }
    };
    (0..n)
        .map(|k| {
            let prev = contour[(k + n - 1) % n];
            let here = contour[k];
            let next = contour[(k + 1) % n];
            let n1 = outward(prev, here);
            let n2 = outward(here, next);
            let sum = n1 + n2;
            if sum.magnitude2() < f32::EPSILON {
                return here + n2 * distance;
            }
            let dir = sum.normalize();
            // miter, limited on sharp corners
            let scale = distance / dir.dot(n2).max(0.25);
            here + dir * scale
        })
        .collect()
}

/// Uniform Catmull-Rom spline through control points, ends extrapolated.
#[derive(Clone, Debug, PartialEq)]
pub struct CatmullRom {
    points: Vec<Vector3<f32>>,
}

impl CatmullRom {
    pub fn new(points: Vec<Vector3<f32>>) -> Self {
        Self { points }
    }

    /// Point at `t` in `[0, 1]` over the whole curve.
    pub fn point(&self, t: f32) -> Vector3<f32> {
        let n = self.points.len();
        match n {
            0 => return Vector3::new(0.0, 0.0, 0.0),
            1 => return self.points[0],
            _ => {}
        }
        let p = (n - 1) as f32 * t.clamp(0.0, 1.0);
        let mut index = p.floor() as usize;
        let mut weight = p - index as f32;
        if index >= n - 1 {
            index = n - 2;
            weight = 1.0;
        }
        let p1 = self.points[index];
        let p2 = self.points[index + 1];
        let p0 = if index > 0 {
            self.points[index - 1]
        } else {
            p1 * 2.0 - p2
        };
        let p3 = if index + 2 < n {
            self.points[index + 2]
        } else {
            p2 * 2.0 - p1
        };
        let (w2, w3) = (weight * weight, weight * weight * weight);
        (p1 * 2.0
            + (p2 - p0) * weight
            + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * w2
            + (-p0 + p1 * 3.0 - p2 * 3.0 + p3) * w3)
            * 0.5
    }

    pub fn tangent(&self, t: f32) -> Vector3<f32> {
        let delta = 0.0001;
        let (t1, t2) = ((t - delta).max(0.0), (t + delta).min(1.0));
        let d = self.point(t2) - self.point(t1);
        if d.magnitude2() > 0.0 {
            d.normalize()
        } else {
            Vector3::unit_y()
        }
    }
}

/// A tube of `radius` swept along `curve` with parallel-transported frames.
pub fn tube(curve: &CatmullRom, tubular_segments: u32, radius: f32, radial_segments: u32) -> Mesh {
    let tubular = segments("tube", tubular_segments, 1);
    let radial = segments("tube", radial_segments, 3);
    let radius = positive("tube", "radius", radius);

    let tangents: Vec<Vector3<f32>> = (0..=tubular)
        .map(|i| curve.tangent(i as f32 / tubular as f32))
        .collect();
    let mut normals = Vec::with_capacity(tangents.len());
    let first = tangents[0];
    let seed = if first.x.abs() <= first.y.abs() && first.x.abs() <= first.z.abs() {
        Vector3::unit_x()
    } else if first.y.abs() <= first.z.abs() {
        Vector3::unit_y()
    } else {
        Vector3::unit_z()
    };
    normals.push(first.cross(seed).normalize().cross(first));
    for i in 1..tangents.len() {
        let previous = normals[i - 1];
        let axis = tangents[i - 1].cross(tangents[i]);
        let normal = if axis.magnitude() > f32::EPSILON {
            let angle = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
            Quaternion::from_axis_angle(axis.normalize(), Rad(angle)).rotate_vector(previous)
        } else {
            previous
        };
        normals.push(normal);
    }

    let mut builder = MeshBuilder::new();
    for i in 0..=tubular as usize {
        let center = curve.point(i as f32 / tubular as f32);
        let n = normals[i];
        let b = tangents[i].cross(n);
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * std::f32::consts::TAU;
            let normal = (n * -v.cos() + b * v.sin()).normalize();
            builder.add_vertex(
                center + normal * radius,
                normal,
                Vector2::new(i as f32 / tubular as f32, j as f32 / radial as f32),
            );
        }
    }
    let stride = radial + 1;
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            builder.add_quad(a, b, c, d);
        }
    }
    builder.build("tube")
}

/**
 * Moves every vertex through `displace` and recomputes smooth normals. A vertex whose
 * new position is not finite keeps its old one.
 */
pub fn displace(mesh: &mut Mesh, displace: impl Fn(Vector3<f32>) -> Vector3<f32>) {
    let Geometry::Triangles { vertices, .. } = &mut mesh.geometry else {
        return;
    };
    let mut kept = 0;
    for vertex in vertices.iter_mut() {
        let moved = displace(vertex.position.into());
        if moved.x.is_finite() && moved.y.is_finite() && moved.z.is_finite() {
            vertex.position = moved.into();
        } else {
            kept += 1;
        }
    }
    if kept > 0 {
        warn!("{}: {kept} vertices kept in place, displacement was not finite", mesh.name);
    }
    mesh.compute_vertex_normals();
    mesh.compute_tangents();
}

/**
 * Twists and tapers a vertical column of the given `height`: the cross-section wobbles
 * over one and a half turns (`3πt`) and shrinks to 30% at the top (`1 - 0.7 t^1.2`).
 */
pub fn spiral_taper(mesh: &mut Mesh, height: f32) {
    let height = positive("spiral_taper", "height", height);
    displace(mesh, |p| {
        let t = (p.y / height).clamp(0.0001, 1.0);
        let angle = t * std::f32::consts::PI * 3.0;
        let radius = 1.0 - t.powf(1.2) * 0.7;
        Vector3::new(
            p.x * (1.0 + angle.sin() * 0.15) * radius,
            p.y,
            p.z * (1.0 + angle.cos() * 0.15) * radius,
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blade() -> Vec<Vector2<f32>> {
        vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.5, 0.8),
            Vector2::new(1.5, 4.0),
            Vector2::new(-1.5, 4.0),
            Vector2::new(-1.5, 0.8),
            Vector2::new(0.0, 0.0),
        ]
    }

    #[test]
    fn bevelled_extrusion_spans_its_depth() {
        let mesh = extrude(
            &blade(),
            0.2,
            Some(Bevel {
                thickness: 0.1,
                size: 0.1,
            }),
        );
        let zs: Vec<f32> = mesh.vertices().iter().map(|v| v.position[2]).collect();
        let min = zs.iter().cloned().fold(f32::MAX, f32::min);
        let max = zs.iter().cloned().fold(f32::MIN, f32::max);
        assert!((min + 0.1).abs() < 1e-5);
        assert!((max - 0.3).abs() < 1e-5);
        assert!(mesh.vertices().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn catmull_rom_passes_through_control_points() {
        let curve = CatmullRom::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 9.0, 1.0),
            Vector3::new(0.0, 18.0, 3.0),
        ]);
        assert!((curve.point(0.5) - Vector3::new(0.0, 9.0, 1.0)).magnitude() < 1e-4);
        assert!((curve.point(1.0) - Vector3::new(0.0, 18.0, 3.0)).magnitude() < 1e-4);
    }

    #[test]
    fn tube_keeps_its_radius() {
        let points = (0..6)
            .map(|i| {
                let t = i as f32 / 5.0;
                Vector3::new(0.0, 45.0 * t, 11.25 * t.powf(1.2))
            })
            .collect();
        let curve = CatmullRom::new(points);
        let mesh = tube(&curve, 40, 2.0, 12);
        assert_eq!(mesh.vertex_count(), 41 * 13);
        assert!(mesh.vertices().iter().all(|v| v.is_finite()));
    }
}
