//! Classification of point masses into anatomical zones by vertex color.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{PointMass, Vertex};

/// An anatomical zone of the heart mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    /// Vertices painted like the sinoatrial node.
    Sa,
    /// Vertices painted like the atrioventricular node.
    Av,
    /// Vertices painted like the His-Purkinje complex.
    Hpc,
    /// Everything else.
    Other,
}

impl Zone {
    /// All zones, in storage order.
    pub const ALL: [Self; 4] = [Self::Sa, Self::Av, Self::Hpc, Self::Other];

    /// The position of the zone in storage order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Sa => 0,
            Self::Av => 1,
            Self::Hpc => 2,
            Self::Other => 3,
        }
    }

    /// A short name for logs and summaries.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sa => "sa",
            Self::Av => "av",
            Self::Hpc => "hpc",
            Self::Other => "other",
        }
    }
}

/// Assigns point masses to zones by comparing their vertex colors to three reference colors.
///
/// A color matches a reference when every channel is within `tolerance` of it. The references are tried in the order `hpc`, `av`, `sa`, and a color
/// matching none of them lands in `Zone::Other`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneClassifier {
    /// The reference color of the His-Purkinje complex.
    pub hpc: Vec3,
    /// The reference color of the atrioventricular node.
    pub av: Vec3,
    /// The reference color of the sinoatrial node.
    pub sa: Vec3,
    /// The largest per-channel difference that still matches.
    pub tolerance: f32,
}

impl Default for ZoneClassifier {
    fn default() -> Self {
        Self {
            hpc: Vec3::new(0.0, 0.0, 1.0),
            av: Vec3::new(0.0, 1.0, 0.0),
            sa: Vec3::new(1.0, 0.0, 0.0),
            tolerance: 0.2,
        }
    }
}

impl ZoneClassifier {
    /// Returns the classifier with a new tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Whether `color` is within tolerance of `reference` on every channel.
    fn matches(&self, color: Vec3, reference: Vec3) -> bool {
        (color - reference).abs().max_element() <= self.tolerance
    }

    /// The zone of a single color.
    #[must_use]
    pub fn classify_color(&self, color: Vec3) -> Zone {
        [(self.hpc, Zone::Hpc), (self.av, Zone::Av), (self.sa, Zone::Sa)]
            .into_iter()
            .find_map(|(reference, zone)| self.matches(color, reference).then_some(zone))
            .unwrap_or(Zone::Other)
    }

    /// Assigns every `PointMass` to exactly one zone, by the color of its vertex.
    ///
    /// The members of each zone keep the order of `masses`.
    #[must_use]
    pub fn classify(&self, masses: &[PointMass], vertices: &[Vertex]) -> ZoneMap {
        let mut members: [Vec<usize>; 4] = Default::default();
        for (i, pm) in masses.iter().enumerate() {
            let zone = self.classify_color(vertices[pm.vertex()].color());
            members[zone.index()].push(i);
        }

        let map = ZoneMap { members };
        ftlog::debug!(
            "Classified {} point masses: sa {}, av {}, hpc {}, other {}",
            masses.len(),
            map.len(Zone::Sa),
            map.len(Zone::Av),
            map.len(Zone::Hpc),
            map.len(Zone::Other)
        );
        map
    }
}

/// The indices of the point masses in each zone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ZoneMap {
    /// Point mass indices, one list per zone in storage order.
    members: [Vec<usize>; 4],
}

impl ZoneMap {
    /// The indices of the point masses in a zone, in ascending order.
    #[must_use]
    pub fn members(&self, zone: Zone) -> &[usize] {
        &self.members[zone.index()]
    }

    /// The number of point masses in a zone.
    #[must_use]
    pub fn len(&self, zone: Zone) -> usize {
        self.members[zone.index()].len()
    }

    /// The number of point masses in all zones.
    #[must_use]
    pub fn total(&self) -> usize {
        self.members.iter().map(Vec::len).sum()
    }

    /// The zone of one point mass, if it was classified.
    #[must_use]
    pub fn zone_of(&self, index: usize) -> Option<Zone> {
        Zone::ALL.into_iter().find(|&zone| self.members(zone).binary_search(&index).is_ok())
    }
}
