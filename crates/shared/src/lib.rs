use serde::{Deserialize, Serialize};

/// Sequence id of an annotated point
pub type AnnotationId = u32;

/// One annotated point, as written to the annotation file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Annotation {
    pub fn new(id: AnnotationId, position: [f64; 3]) -> Self {
        Self {
            id,
            x: position[0],
            y: position[1],
            z: position[2],
        }
    }

    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Triangle surface produced by the volumetric pipeline
/// (iso-surface of the scan, reduced to its largest connected component).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDescription {
    /// Vertex positions in world (scanner) coordinates
    pub vertices: Vec<[f32; 3]>,
    /// Vertex indices, three per triangle
    pub triangles: Vec<[u32; 3]>,
}

impl SurfaceDescription {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    /// Axis-aligned extent as (xmin, xmax, ymin, ymax, zmin, zmax)
    pub fn extents(&self) -> Option<[f64; 6]> {
        let first = self.vertices.first()?;
        let mut ext = [
            first[0] as f64,
            first[0] as f64,
            first[1] as f64,
            first[1] as f64,
            first[2] as f64,
            first[2] as f64,
        ];
        for v in &self.vertices {
            for axis in 0..3 {
                let c = v[axis] as f64;
                ext[axis * 2] = ext[axis * 2].min(c);
                ext[axis * 2 + 1] = ext[axis * 2 + 1].max(c);
            }
        }
        Some(ext)
    }
}
