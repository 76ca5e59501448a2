//! Spatial bounds of the annotated surface.

use glam::DVec3;

/// Axis-aligned box constraining where annotations may be placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl SceneBounds {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Build from (xmin, xmax, ymin, ymax, zmin, zmax)
    pub fn from_extents(e: [f64; 6]) -> Self {
        Self {
            min: DVec3::new(e[0], e[2], e[4]),
            max: DVec3::new(e[1], e[3], e[5]),
        }
    }

    /// Extents as (xmin, xmax, ymin, ymax, zmin, zmax)
    pub fn extents(&self) -> [f64; 6] {
        [
            self.min.x, self.max.x, self.min.y, self.max.y, self.min.z, self.max.z,
        ]
    }

    /// Closed-interval containment on all three axes
    pub fn contains(&self, p: DVec3) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).length()
    }
}

/// Returns true iff `position` lies inside `bounds`.
/// Unset bounds reject everything.
pub fn within(position: DVec3, bounds: Option<&SceneBounds>) -> bool {
    bounds.is_some_and(|b| b.contains(position))
}
