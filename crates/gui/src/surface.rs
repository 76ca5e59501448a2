//! The surface being annotated.
//!
//! Segmentation and iso-surface extraction happen upstream; this module
//! accepts their output as a [`SurfaceDescription`] file and turns it into a
//! renderable, pickable mesh plus the session bounds.

use std::path::Path;

use glam::{DVec3, Vec3};
use shared::SurfaceDescription;

use crate::bounds::SceneBounds;
use crate::error::{AnnotationError, Result};
use crate::viewport::mesh::{self, MeshData};
use crate::viewport::picking::{pick_triangle, Ray};

/// Radius of the built-in demonstration surface
const DEMO_RADIUS: f32 = 50.0;

/// Triangle surface with smooth normals and its axis-aligned bounds
#[derive(Debug, Clone)]
pub struct Surface {
    pub mesh: MeshData,
    pub bounds: SceneBounds,
}

impl Surface {
    /// Build from a description; rejects empty surfaces and bad indices.
    pub fn from_description(desc: &SurfaceDescription, color: [f32; 3]) -> Result<Self> {
        if desc.is_empty() {
            return Err(AnnotationError::InvalidSurface(
                "surface has no vertices or no triangles".into(),
            ));
        }
        let count = desc.vertices.len();
        if let Some(bad) = desc.triangles.iter().flatten().find(|i| **i as usize >= count) {
            return Err(AnnotationError::InvalidSurface(format!(
                "triangle index {bad} out of range ({count} vertices)"
            )));
        }
        let extents = desc
            .extents()
            .ok_or_else(|| AnnotationError::InvalidSurface("surface has no extent".into()))?;

        let positions: Vec<Vec3> = desc.vertices.iter().map(|v| Vec3::from_array(*v)).collect();
        Ok(Self {
            mesh: MeshData::smooth(&positions, &desc.triangles, color),
            bounds: SceneBounds::from_extents(extents),
        })
    }

    /// Read a surface JSON file
    pub fn load(path: &Path, color: [f32; 3]) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let desc: SurfaceDescription = serde_json::from_str(&json)?;
        let surface = Self::from_description(&desc, color)?;
        tracing::info!(
            "Loaded surface from {} ({} vertices, {} triangles)",
            path.display(),
            surface.mesh.vertex_count(),
            surface.mesh.triangle_count()
        );
        Ok(surface)
    }

    /// Sphere shown when no surface file is given
    pub fn demo(color: [f32; 3]) -> Self {
        let mesh = mesh::sphere(DEMO_RADIUS, 48, 64, color);
        let r = DEMO_RADIUS as f64;
        Self {
            mesh,
            bounds: SceneBounds::new(DVec3::splat(-r), DVec3::splat(r)),
        }
    }

    /// Nearest point of the surface along the ray
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, DVec3)> {
        pick_triangle(ray, &self.mesh).map(|hit| (hit.distance, hit.point.as_dvec3()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SurfaceDescription {
        SurfaceDescription {
            vertices: vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [10.0, 10.0, 0.0], [0.0, 10.0, 0.0]],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    #[test]
    fn test_bounds_from_vertices() {
        let s = Surface::from_description(&quad(), [0.5; 3]).unwrap();
        assert_eq!(s.bounds.extents(), [0.0, 10.0, 0.0, 10.0, 0.0, 0.0]);
        assert_eq!(s.mesh.triangle_count(), 2);
    }

    #[test]
    fn test_rejects_empty() {
        let err = Surface::from_description(&SurfaceDescription::default(), [0.5; 3]).unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidSurface(_)));
    }

    #[test]
    fn test_rejects_bad_index() {
        let mut d = quad();
        d.triangles.push([0, 1, 9]);
        let err = Surface::from_description(&d, [0.5; 3]).unwrap_err();
        assert!(err.to_string().contains("9"));
    }

    #[test]
    fn test_intersect() {
        let s = Surface::from_description(&quad(), [0.5; 3]).unwrap();
        let ray = Ray {
            origin: Vec3::new(5.0, 5.0, 20.0),
            direction: Vec3::NEG_Z,
        };
        let (t, p) = s.intersect(&ray).unwrap();
        assert!((t - 20.0).abs() < 1e-4);
        assert!(s.bounds.contains(p));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.json");
        std::fs::write(&path, serde_json::to_string(&quad()).unwrap()).unwrap();
        let s = Surface::load(&path, [0.5; 3]).unwrap();
        assert_eq!(s.mesh.vertex_count(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Surface::load(Path::new("/nonexistent/surface.json"), [0.5; 3]).unwrap_err();
        assert!(matches!(err, AnnotationError::Io(_)));
    }

    #[test]
    fn test_demo_bounds_contain_mesh() {
        let s = Surface::demo([0.5; 3]);
        for i in 0..s.mesh.vertex_count() {
            assert!(s.bounds.contains(s.mesh.position(i).as_dvec3() * 0.999));
        }
    }
}
