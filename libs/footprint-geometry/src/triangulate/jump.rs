//! Sub-polygon extraction by walking a jump dictionary.
//!
//! The dictionary stores, for every node, which node follows when the node
//! is entered from a given predecessor: `entries[cur][prev] = next`. A plain
//! ring maps every vertex from its predecessor to its successor. Each cut
//! segment `a-b` adds the pair `a -> b` and `b -> a`, spliced into the
//! existing fan of the endpoint so that walks always take the first turn
//! clockwise. Walking and consuming entries then yields every face of the
//! cut ring exactly once.

use super::cutting::{CutResult, Node};
use crate::error::{GeometryError, GeometryResult};
use crate::predicates::clockwise_metric;
use glam::DVec3;
use std::collections::BTreeMap;

/// Turn table over ring positions and branch points.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpDictionary {
    entries: BTreeMap<Node, BTreeMap<Node, Node>>,
    ring: Vec<usize>,
    branch_points: Vec<usize>,
}

impl JumpDictionary {
    /// Dictionary of the uncut ring.
    pub fn from_parts(ring: Vec<usize>, branch_points: Vec<usize>) -> Self {
        let n = ring.len();
        let entries = (0..n)
            .map(|i| {
                let turn = BTreeMap::from([(Node::Ring((i + n - 1) % n), Node::Ring((i + 1) % n))]);
                (Node::Ring(i), turn)
            })
            .collect();
        Self {
            entries,
            ring,
            branch_points,
        }
    }

    /// Builds the dictionary for a ring cut by [`insert_cutting_rays`].
    ///
    /// [`insert_cutting_rays`]: super::insert_cutting_rays
    ///
    /// # Errors
    ///
    /// [`GeometryError::SubPolygonTopology`] for an odd number of hits or
    /// nodes that do not resolve to a point.
    pub fn build(points: &[DVec3], ring: &[usize], cut: &CutResult) -> GeometryResult<Self> {
        if cut.hits.len() % 2 != 0 {
            return Err(GeometryError::topology(format!(
                "cut segments need paired hits, got {}",
                cut.hits.len()
            )));
        }

        let mut dictionary = Self::from_parts(ring.to_vec(), cut.branch_points.clone());
        for (i, &cur) in cut.hits.iter().enumerate() {
            let partner = cut.hits[i ^ 1];
            let cur_position = points[dictionary.vertex(cur)?];
            let to_partner = points[dictionary.vertex(partner)?] - cur_position;

            let mut fan: Vec<(f64, Node, Node)> = Vec::new();
            if let Some(turns) = dictionary.entries.get(&cur) {
                for (&from, &to) in turns {
                    let metric = clockwise_metric(to_partner, points[dictionary.vertex(from)?] - cur_position);
                    fan.push((metric, from, to));
                }
            }
            fan.sort_by(|a, b| a.0.total_cmp(&b.0));
            let (prev, next) = fan.first().map_or((partner, partner), |&(_, from, to)| (from, to));

            let turns = dictionary.entries.entry(cur).or_default();
            turns.insert(prev, partner);
            turns.insert(partner, next);
        }
        Ok(dictionary)
    }

    /// Whether every turn has been consumed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Point index a node stands for.
    pub fn vertex(&self, node: Node) -> GeometryResult<usize> {
        match node {
            Node::Ring(position) => self.ring.get(position).copied(),
            Node::Branch(id) => self.branch_points.get(id).copied(),
        }
        .ok_or_else(|| GeometryError::topology(format!("{node:?} does not resolve to a point")))
    }

    /// Consumes the dictionary, yielding every sub-polygon as point indices.
    pub fn sub_polygons(self) -> SubPolygons {
        SubPolygons {
            dictionary: self,
            failed: false,
        }
    }

    fn walk(&mut self, mut prev: Node, mut cur: Node, mut next: Node) -> GeometryResult<Vec<usize>> {
        let mut polygon = Vec::new();
        loop {
            polygon.push(self.vertex(cur)?);

            if let Some(turns) = self.entries.get_mut(&cur) {
                turns.remove(&prev);
                if turns.is_empty() {
                    self.entries.remove(&cur);
                }
            }

            if self.vertex(next)? == polygon[0] {
                return Ok(polygon);
            }

            let following = self
                .entries
                .get(&next)
                .and_then(|turns| turns.get(&cur))
                .copied()
                .ok_or_else(|| {
                    GeometryError::topology(format!("no turn at {next:?} coming from {cur:?}"))
                })?;
            (prev, cur, next) = (cur, next, following);
        }
    }
}

/// Iterator over the faces of a cut ring. Stops after the first error.
#[derive(Debug)]
pub struct SubPolygons {
    dictionary: JumpDictionary,
    failed: bool,
}

impl SubPolygons {
    /// Turns not yet consumed.
    pub fn remaining(&self) -> &JumpDictionary {
        &self.dictionary
    }
}

impl Iterator for SubPolygons {
    type Item = GeometryResult<Vec<usize>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (&cur, turns) = self.dictionary.entries.iter().next()?;
        let (&prev, &next) = turns.iter().next()?;
        let result = self.dictionary.walk(prev, cur, next);
        self.failed = result.is_err();
        Some(result)
    }
}
