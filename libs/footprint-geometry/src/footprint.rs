//! # Footprint
//!
//! A building outline ready for extrusion: one cleaned clockwise outer ring
//! with its holes bridged in, plus the loop layout the wall builder needs.

use crate::error::{GeometryResult, Triangle, TriangulationFailure};
use crate::polygon::{point_in_polygon, polygon_area, prepare_ring, vertex_centroid};
use crate::triangulate::{merge_holes, triangulate};
use glam::DVec3;
use rand::Rng;
use std::ops::Range;

/// Prepared building outline.
///
/// `points` holds the outer loop first and then every merged hole, each as
/// a contiguous run whose length is listed in `loop_sizes`. `ring` is the
/// single bridged ring used for triangulation and cutting.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    /// Loop points, outer loop first.
    pub points: Vec<DVec3>,
    /// Bridged ring over `points`.
    pub ring: Vec<usize>,
    /// Point count of each loop in `points`.
    pub loop_sizes: Vec<usize>,
    /// Input hole indices that were rejected or could not be bridged.
    pub dropped_holes: Vec<usize>,
}

impl Footprint {
    /// Cleans, orients and merges raw rings into a footprint.
    ///
    /// Degenerate holes are dropped (and listed in `dropped_holes`) rather
    /// than failing the whole outline.
    ///
    /// # Errors
    ///
    /// Fails when the outer ring itself is degenerate.
    ///
    /// # Example
    ///
    /// ```rust
    /// use footprint_geometry::Footprint;
    /// use glam::DVec3;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
    /// let outer = vec![
    ///     DVec3::new(0.0, 0.0, 0.0),
    ///     DVec3::new(4.0, 0.0, 0.0),
    ///     DVec3::new(4.0, 0.0, 4.0),
    ///     DVec3::new(0.0, 0.0, 4.0),
    /// ];
    /// let footprint = Footprint::from_rings(outer, Vec::new(), &mut rng).unwrap();
    /// assert_eq!(footprint.outer_len(), 4);
    /// assert!((footprint.area() - 16.0).abs() < 1e-9);
    /// ```
    pub fn from_rings<R: Rng + ?Sized>(
        outer: Vec<DVec3>,
        holes: Vec<Vec<DVec3>>,
        rng: &mut R,
    ) -> GeometryResult<Self> {
        let outer = prepare_ring(outer, false, rng)?;

        let mut dropped_holes = Vec::new();
        let mut prepared = Vec::with_capacity(holes.len());
        let mut kept_from = Vec::with_capacity(holes.len());
        for (i, hole) in holes.into_iter().enumerate() {
            match prepare_ring(hole, true, rng) {
                Ok(hole) => {
                    prepared.push(hole);
                    kept_from.push(i);
                }
                Err(_) => dropped_holes.push(i),
            }
        }

        let merged = merge_holes(outer, &prepared);
        dropped_holes.extend(merged.dropped.iter().map(|&k| kept_from[k]));
        dropped_holes.sort_unstable();

        Ok(Self {
            points: merged.points,
            ring: merged.ring,
            loop_sizes: merged.loop_sizes,
            dropped_holes,
        })
    }

    /// Number of outer loop points.
    pub fn outer_len(&self) -> usize {
        self.loop_sizes.first().copied().unwrap_or(0)
    }

    /// Point index ranges of every loop, outer loop first.
    pub fn loops(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.loop_sizes.iter().scan(0, |start, &len| {
            let range = *start..*start + len;
            *start += len;
            Some(range)
        })
    }

    /// Indices of the outer loop.
    pub fn outer_ring(&self) -> Vec<usize> {
        (0..self.outer_len()).collect()
    }

    /// Outer area minus the area of every merged hole.
    pub fn area(&self) -> f64 {
        self.loops()
            .enumerate()
            .map(|(i, range)| {
                let ring: Vec<usize> = range.collect();
                let area = polygon_area(&self.points, &ring);
                if i == 0 {
                    area
                } else {
                    -area
                }
            })
            .sum()
    }

    /// Vertex average of the outer loop, height dropped.
    pub fn center(&self) -> DVec3 {
        vertex_centroid(&self.points, &self.outer_ring())
    }

    /// Whether `point` lies inside the outer loop and outside every hole.
    pub fn contains(&self, point: DVec3) -> bool {
        self.loops().enumerate().all(|(i, range)| {
            let ring: Vec<usize> = range.collect();
            point_in_polygon(point, &self.points, &ring) == (i == 0)
        })
    }

    /// Ear-clips the bridged ring.
    pub fn triangulate(&self) -> Result<Vec<Triangle>, TriangulationFailure> {
        triangulate(&self.points, &self.ring)
    }
}
