use glam::Vec3;

/// Floats per vertex in [`MeshData::vertices`]
pub const STRIDE: usize = 9;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, vertex: usize) -> Vec3 {
        let b = vertex * STRIDE;
        Vec3::new(self.vertices[b], self.vertices[b + 1], self.vertices[b + 2])
    }

    pub fn normal(&self, vertex: usize) -> Vec3 {
        let b = vertex * STRIDE + 3;
        Vec3::new(self.vertices[b], self.vertices[b + 1], self.vertices[b + 2])
    }

    /// Corner positions of triangle `tri`
    pub fn triangle(&self, tri: usize) -> [Vec3; 3] {
        let i = &self.indices[tri * 3..tri * 3 + 3];
        [
            self.position(i[0] as usize),
            self.position(i[1] as usize),
            self.position(i[2] as usize),
        ]
    }

    /// Indexed triangle mesh with smooth normals: each vertex normal is the
    /// area-weighted average of the faces around it. Indices must be valid.
    pub fn smooth(positions: &[Vec3], triangles: &[[u32; 3]], color: [f32; 3]) -> Self {
        let mut normals = vec![Vec3::ZERO; positions.len()];
        for t in triangles {
            let [a, b, c] = t.map(|i| positions[i as usize]);
            // Unnormalized cross product weights by area
            let n = (b - a).cross(c - a);
            for i in t {
                normals[*i as usize] += n;
            }
        }

        let mut vertices = Vec::with_capacity(positions.len() * STRIDE);
        for (p, n) in positions.iter().zip(&normals) {
            push_vert(&mut vertices, p.x, p.y, p.z, n.normalize_or_zero(), color);
        }

        Self {
            vertices,
            indices: triangles.iter().flatten().copied().collect(),
        }
    }
}

/// UV sphere centred on the origin
pub fn sphere(radius: f32, rings: u32, sectors: u32, color: [f32; 3]) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        let sp = phi.sin();
        let cp = phi.cos();

        for s in 0..=sectors {
            let theta = std::f32::consts::TAU * s as f32 / sectors as f32;
            let x = sp * theta.cos();
            let y = cp;
            let z = sp * theta.sin();

            push_vert(&mut vertices, radius * x, radius * y, radius * z, Vec3::new(x, y, z), color);
        }
    }

    for r in 0..rings {
        for s in 0..sectors {
            let i0 = r * (sectors + 1) + s;
            let i1 = i0 + 1;
            let i2 = i0 + sectors + 1;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    MeshData { vertices, indices }
}

fn push_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[px, py, pz, n.x, n.y, n.z, c[0], c[1], c[2]]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_vertices_on_radius() {
        let m = sphere(2.0, 8, 12, [1.0, 0.0, 0.0]);
        assert_eq!(m.vertex_count(), 9 * 13);
        assert_eq!(m.triangle_count(), 8 * 12 * 2);
        for i in 0..m.vertex_count() {
            assert!((m.position(i).length() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_smooth_normals_of_flat_quad() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let m = MeshData::smooth(&positions, &[[0, 1, 2], [0, 2, 3]], [0.5; 3]);
        assert_eq!(m.vertex_count(), 4);
        for i in 0..4 {
            assert!((m.normal(i) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_smooth_normals_average_at_shared_edge() {
        // Two faces folded 90 degrees along the X axis
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let m = MeshData::smooth(&positions, &[[0, 1, 2], [0, 3, 1]], [0.5; 3]);
        let shared = m.normal(0);
        let expected = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!((shared - expected).length() < 1e-6);
    }

    #[test]
    fn test_triangle_corners() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let m = MeshData::smooth(&positions, &[[0, 1, 2]], [0.5; 3]);
        assert_eq!(m.triangle(0), [Vec3::ZERO, Vec3::X, Vec3::Y]);
    }
}
