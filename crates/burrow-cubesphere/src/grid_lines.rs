//! Cached grid-line polylines for debug drawing.

use glam::DVec3;

use crate::{CubeFace, SphereGrid, dominant_face};

/// Which lines to generate and how finely to sample them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLineOptions {
    /// Draw every `stride`-th line; at least 1.
    pub stride: u32,
    /// Samples per line minus one; at least 8.
    pub segments_per_edge: u32,
    /// Emit each shared seam from one face only.
    pub canonical_edges_only: bool,
}

impl Default for GridLineOptions {
    fn default() -> Self {
        Self {
            stride: 1,
            segments_per_edge: 96,
            canonical_edges_only: true,
        }
    }
}

/// One polyline with the face and line it was sampled from.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLine {
    pub face: CubeFace,
    pub vertical: bool,
    pub index: u32,
    pub points: Vec<DVec3>,
}

/// Polylines of every grid line, rebuilt when the grid's revision moves.
#[derive(Clone, Debug, Default)]
pub struct GridLines {
    options: GridLineOptions,
    lines: Vec<GridLine>,
    built_revision: Option<u64>,
}

impl GridLines {
    pub fn new(options: GridLineOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
            built_revision: None,
        }
    }

    pub fn options(&self) -> &GridLineOptions {
        &self.options
    }

    /// Change options; the next [`refresh`](Self::refresh) rebuilds.
    pub fn set_options(&mut self, options: GridLineOptions) {
        if options != self.options {
            self.options = options;
            self.built_revision = None;
        }
    }

    pub fn lines(&self) -> &[GridLine] {
        &self.lines
    }

    /// Rebuild if `grid` changed since the last build. Returns whether it did.
    pub fn refresh(&mut self, grid: &SphereGrid) -> bool {
        if self.built_revision == Some(grid.revision()) {
            return false;
        }
        self.force_rebuild(grid);
        true
    }

    /// Rebuild regardless of the cached revision.
    pub fn force_rebuild(&mut self, grid: &SphereGrid) {
        let n = grid.resolution();
        let stride = self.options.stride.max(1) as usize;
        let segments = self.options.segments_per_edge.max(8);

        self.lines.clear();
        for face in CubeFace::ALL {
            for vertical in [true, false] {
                for index in (0..=n).step_by(stride) {
                    if self.options.canonical_edges_only && !owns_line(face, vertical, index, n) {
                        continue;
                    }
                    self.lines.push(GridLine {
                        face,
                        vertical,
                        index,
                        points: grid.edge_polyline(face, vertical, i64::from(index), segments),
                    });
                }
            }
        }
        self.built_revision = Some(grid.revision());
    }
}

/// Face on the other side of boundary line `index`, or `None` for an
/// interior line.
fn seam_neighbour(face: CubeFace, vertical: bool, index: u32, n: u32) -> Option<CubeFace> {
    let axis = if vertical { face.tangent() } else { face.bitangent() };
    let outward = if index == 0 {
        -axis
    } else if index == n {
        axis
    } else {
        return None;
    };
    Some(dominant_face(outward))
}

/// Interior lines always belong to their face; a seam belongs to the lower
/// of its two faces.
fn owns_line(face: CubeFace, vertical: bool, index: u32, n: u32) -> bool {
    seam_neighbour(face, vertical, index, n).is_none_or(|other| face < other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridSettings;

    fn grid(resolution: u32) -> SphereGrid {
        SphereGrid::new(DVec3::ZERO, GridSettings { resolution, ..Default::default() })
    }

    #[test]
    fn test_canonical_line_count() {
        let g = grid(4);
        let mut lines = GridLines::new(GridLineOptions::default());
        assert!(lines.refresh(&g));
        // 6 faces x 2 orientations x 3 interior lines + 12 cube edges.
        assert_eq!(lines.lines().len(), 36 + 12);
        assert!(lines.lines().iter().all(|l| l.points.len() == 97));
    }

    #[test]
    fn test_all_edges_and_stride() {
        let g = grid(4);
        let mut lines = GridLines::new(GridLineOptions {
            stride: 2,
            segments_per_edge: 1,
            canonical_edges_only: false,
        });
        lines.refresh(&g);
        // Indices 0, 2, 4 on every face and orientation.
        assert_eq!(lines.lines().len(), 6 * 2 * 3);
        assert_eq!(lines.lines()[0].points.len(), 9);
    }

    #[test]
    fn test_refresh_follows_revision() {
        let mut g = grid(4);
        let mut lines = GridLines::default();
        assert!(lines.refresh(&g));
        assert!(!lines.refresh(&g));
        g.set_resolution(6);
        assert!(lines.refresh(&g));
        assert!(!lines.refresh(&g));
        lines.set_options(GridLineOptions { stride: 3, ..Default::default() });
        assert!(lines.refresh(&g));
    }

    #[test]
    fn test_seam_lines_drawn_once_match_neighbours() {
        // +Z's u = -1 line is the seam with -X's u = +1 line.
        let g = grid(4);
        let pz = g.edge_polyline(CubeFace::PosZ, true, 0, 8);
        let nx = g.edge_polyline(CubeFace::NegX, true, 4, 8);
        for (a, b) in pz.iter().zip(&nx) {
            assert!((*a - *b).length() < 1e-4);
        }
    }

    #[test]
    fn test_every_seam_drawn_exactly_once() {
        let n = 4;
        let g = grid(n);
        let mut lines = GridLines::new(GridLineOptions::default());
        lines.refresh(&g);
        let midpoints: Vec<DVec3> = lines.lines().iter().map(|l| l.points[l.points.len() / 2]).collect();

        let mut seams = 0;
        for face in CubeFace::ALL {
            for vertical in [true, false] {
                for index in [0, n] {
                    let mid = g.edge_sample(face, vertical, i64::from(index), 0.5);
                    let drawn = midpoints.iter().filter(|m| (**m - mid).length() < 1e-4).count();
                    assert_eq!(drawn, 1, "{face} vertical={vertical} index={index} drawn {drawn} times");
                    seams += 1;
                }
            }
        }
        // Each of the 12 edges was visited from both of its faces.
        assert_eq!(seams, 24);
        assert_eq!(lines.lines().iter().filter(|l| l.index == 0 || l.index == n).count(), 12);
    }

    #[test]
    fn test_seam_owned_by_one_side() {
        let n = 4;
        for face in CubeFace::ALL {
            for vertical in [true, false] {
                assert_eq!(seam_neighbour(face, vertical, 2, n), None);
                for index in [0, n] {
                    let other = seam_neighbour(face, vertical, index, n).expect("boundary");
                    assert!(other.normal().dot(face.normal()).abs() < 1e-12, "{face} -> {other}");

                    // Exactly one boundary line of the neighbour leads back here.
                    let back: Vec<_> = [true, false]
                        .into_iter()
                        .flat_map(|v| [(v, 0), (v, n)])
                        .filter(|&(v, i)| seam_neighbour(other, v, i, n) == Some(face))
                        .collect();
                    assert_eq!(back.len(), 1, "{face} <-> {other}");
                    let (v, i) = back[0];
                    assert_ne!(owns_line(face, vertical, index, n), owns_line(other, v, i, n));
                }
            }
        }
    }
}
