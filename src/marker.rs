//! Marker data model.

use glam::Vec3;

/// Number of icon columns in the horizontal sprite atlas.
pub const ATLAS_COLUMNS: u32 = 4;

/// One labeled point in world space.
///
/// A marker has no identity beyond its index in the current [`MarkerSet`];
/// the set is always replaced wholesale, which invalidates every previously
/// held index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// World-space position. Immutable after creation.
    pub position: Vec3,
    /// Icon column in the sprite atlas (`0..ATLAS_COLUMNS`).
    pub category: u32,
}

impl Marker {
    /// Create a marker at the given position with the given icon category.
    pub fn new(position: Vec3, category: u32) -> Self {
        Self { position, category }
    }
}

/// Ordered collection of markers.
///
/// Insertion order is significant: it is the indexing basis for hit results
/// and hover/selection state.
pub type MarkerSet = Vec<Marker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_creation() {
        let marker = Marker::new(Vec3::new(1.0, 2.0, 3.0), 2);
        assert_eq!(marker.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(marker.category, 2);
    }
}
