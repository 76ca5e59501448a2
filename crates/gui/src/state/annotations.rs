//! Annotation store: ordered annotated points, each owning its marker.
//!
//! Every record carries its annotation and its marker together, so the
//! annotation list and the marker/label lists can never drift apart.

use std::path::Path;

use glam::DVec3;
use serde::Serialize;
use shared::{Annotation, AnnotationId};

use crate::error::{AnnotationError, Result};
use crate::marker::Marker;
use crate::scene::MarkerHandle;

/// One annotation and the visual marker that represents it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedPoint {
    pub annotation: Annotation,
    pub marker: Marker,
}

impl AnnotatedPoint {
    pub fn position(&self) -> DVec3 {
        DVec3::from_array(self.annotation.position())
    }
}

/// Ordered collection of annotated points; issues ids
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    points: Vec<AnnotatedPoint>,
    next_id: AnnotationId,
    renumber_on_move: bool,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AnnotationStore {
    /// `renumber_on_move` rewrites a moved record's id to its index + 1
    pub fn new(renumber_on_move: bool) -> Self {
        Self {
            points: Vec::new(),
            next_id: 1,
            renumber_on_move,
        }
    }

    /// Id the next appended annotation will receive
    pub fn next_id(&self) -> AnnotationId {
        self.next_id
    }

    /// Append a point with the next id and return that id
    pub fn append(&mut self, position: DVec3, marker: Marker) -> AnnotationId {
        let id = self.next_id;
        self.next_id += 1;
        self.points.push(AnnotatedPoint {
            annotation: Annotation::new(id, position.to_array()),
            marker,
        });
        id
    }

    /// Remove the record at `index`, returning it so its marker can be destroyed
    pub fn remove_at(&mut self, index: usize) -> Result<AnnotatedPoint> {
        self.check_index(index)?;
        Ok(self.points.remove(index))
    }

    /// Move the record at `index` to `position`
    pub fn update_at(&mut self, index: usize, position: DVec3) -> Result<()> {
        self.check_index(index)?;
        let renumber = self.renumber_on_move;
        let point = &mut self.points[index];
        let id = if renumber {
            (index + 1) as AnnotationId
        } else {
            point.annotation.id
        };
        point.annotation = Annotation::new(id, position.to_array());
        Ok(())
    }

    /// Current index of the record owning `handle`
    pub fn index_of_marker(&self, handle: MarkerHandle) -> Option<usize> {
        self.points.iter().position(|p| p.marker.sphere == handle)
    }

    pub fn get(&self, index: usize) -> Option<&AnnotatedPoint> {
        self.points.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotatedPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Annotations in list order
    pub fn serialize(&self) -> Vec<Annotation> {
        self.points.iter().map(|p| p.annotation).collect()
    }

    /// Pretty JSON with 4-space indentation
    pub fn to_json(&self) -> Result<String> {
        let annotations = self.serialize();
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        annotations.serialize(&mut ser)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Write the annotation file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        tracing::info!("Saved {} annotations to {}", self.len(), path.display());
        Ok(())
    }

    /// Read back an annotation file written by [`AnnotationStore::save`]
    pub fn load(path: &Path) -> Result<Vec<Annotation>> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.points.len() {
            Ok(())
        } else {
            Err(AnnotationError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
        }
    }
}
