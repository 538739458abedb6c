//! Recorded tunnel centerlines with arc-length parameterized sampling.

use glam::DVec3;

use crate::spline::{catmull_rom, catmull_rom_derivative};

/// Curve samples per segment used to approximate arc length.
pub const SEGMENT_SAMPLES: usize = 16;

/// Cumulative chord lengths along the Catmull-Rom curve.
///
/// Entry 0 is the path start at length 0. Entry `k > 0` is sample
/// `(k - 1) % SEGMENT_SAMPLES + 1` of segment `segment[k]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArcLengthTable {
    cumulative: Vec<f64>,
    segment: Vec<usize>,
}

impl ArcLengthTable {
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn segments(&self) -> &[usize] {
        &self.segment
    }

    fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

/// Position and unit tangent at a distance along a path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSample {
    pub position: DVec3,
    pub tangent: DVec3,
}

/// Ordered centerline points plus a lazily invalidated arc-length table.
///
/// The table is a cache: any mutation of `points` drops it, and it must be
/// rebuilt before distances mean anything again.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TunnelPath {
    points: Vec<DVec3>,
    table: Option<ArcLengthTable>,
}

impl TunnelPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path over `points` with its table already built.
    pub fn from_points(points: Vec<DVec3>) -> Self {
        let mut path = Self { points, table: None };
        path.build_arc_length_table();
        path
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<DVec3> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<DVec3> {
        self.points.last().copied()
    }

    /// At least two points.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn is_finalized(&self) -> bool {
        self.table.is_some()
    }

    pub fn table(&self) -> Option<&ArcLengthTable> {
        self.table.as_ref()
    }

    /// Append a point and invalidate the table.
    pub fn push_point(&mut self, p: DVec3) {
        self.points.push(p);
        self.table = None;
    }

    /// Rebuild the table from the current points.
    ///
    /// Leaves no table behind for an invalid path.
    pub fn build_arc_length_table(&mut self) {
        self.table = None;
        if !self.is_valid() {
            return;
        }

        let segments = self.points.len() - 1;
        let mut table = ArcLengthTable {
            cumulative: Vec::with_capacity(segments * SEGMENT_SAMPLES + 1),
            segment: Vec::with_capacity(segments * SEGMENT_SAMPLES + 1),
        };
        table.cumulative.push(0.0);
        table.segment.push(0);

        let mut acc = 0.0;
        for i in 0..segments {
            let [p0, p1, p2, p3] = self.controls(i);
            let mut prev = p1;
            for s in 1..=SEGMENT_SAMPLES {
                let cur = catmull_rom(p0, p1, p2, p3, s as f64 / SEGMENT_SAMPLES as f64);
                acc += prev.distance(cur);
                table.cumulative.push(acc);
                table.segment.push(i);
                prev = cur;
            }
        }

        self.table = Some(table);
    }

    /// Build the table unless one already exists.
    pub fn ensure_built(&mut self) {
        if self.table.is_none() {
            self.build_arc_length_table();
        }
    }

    /// Arc length of the whole path; 0 without a table.
    pub fn total_length(&self) -> f64 {
        self.table.as_ref().map_or(0.0, ArcLengthTable::total)
    }

    /// Position and unit tangent `distance` along the path.
    ///
    /// `distance` is clamped to `[0, total_length]`. Without a table the
    /// first point and the direction toward the second are returned.
    pub fn sample_by_distance(&self, distance: f64) -> PathSample {
        let table = match &self.table {
            Some(t) if self.is_valid() && t.cumulative.len() >= 2 => t,
            _ => return self.fallback_sample(),
        };

        let cum = &table.cumulative;
        let d = distance.clamp(0.0, table.total());

        // First entry at or past `d`, kept inside [1, len - 1].
        let hi = cum.partition_point(|&c| c < d).clamp(1, cum.len() - 1);
        let lo = hi - 1;

        let span = cum[hi] - cum[lo];
        let local = if span > 0.0 { (d - cum[lo]) / span } else { 0.0 };

        let seg = table.segment[hi];
        let sample_start = ((hi - 1) % SEGMENT_SAMPLES) as f64;
        let t = (sample_start + local) / SEGMENT_SAMPLES as f64;

        let [p0, p1, p2, p3] = self.controls(seg);
        let tangent = catmull_rom_derivative(p0, p1, p2, p3, t)
            .try_normalize()
            .unwrap_or_else(|| self.chord_direction(seg));
        PathSample {
            position: catmull_rom(p0, p1, p2, p3, t),
            tangent,
        }
    }

    /// Control points for segment `i`, clamped at the ends.
    fn controls(&self, i: usize) -> [DVec3; 4] {
        let n = self.points.len();
        [
            self.points[i.saturating_sub(1)],
            self.points[i],
            self.points[i + 1],
            self.points[(i + 2).min(n - 1)],
        ]
    }

    fn chord_direction(&self, i: usize) -> DVec3 {
        (self.points[i + 1] - self.points[i])
            .try_normalize()
            .unwrap_or(DVec3::Z)
    }

    fn fallback_sample(&self) -> PathSample {
        match self.points.as_slice() {
            [] => PathSample {
                position: DVec3::ZERO,
                tangent: DVec3::Z,
            },
            [only] => PathSample {
                position: *only,
                tangent: DVec3::Z,
            },
            [a, b, ..] => PathSample {
                position: *a,
                tangent: (*b - *a).try_normalize().unwrap_or(DVec3::Z),
            },
        }
    }
}
