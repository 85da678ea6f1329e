//! Render-facing tile mesh.
//!
//! Combines the primal icosphere (tile centers) and its dual (tile corner
//! polygons) into one vertex buffer with fan triangles for filled rendering,
//! dual edges for wireframe rendering, and a mutable per-vertex color
//! buffer written tile-by-tile.

use glam::Vec3;

use crate::geometry::{build_dual, generate_icosphere};

/// Per-vertex color, linear RGBA in [0, 1].
pub type Rgba = [f32; 4];

/// Color tiles carry before the first generation pass.
pub const UNSET_COLOR: Rgba = [0.42, 0.42, 0.42, 1.0];

/// One tile: a center vertex plus its ordered corner ring, both indexing the
/// combined vertex buffer.
#[derive(Debug, Clone)]
struct Tile {
    center: u32,
    ring: Vec<u32>,
}

/// A tile planet surface at a fixed subdivision level.
///
/// The vertex buffer stores the `tile_count` primal centers first, followed
/// by the dual corners, so a tile's number doubles as the index of its
/// center vertex. Built once per subdivision level and replaced wholesale
/// when the level changes.
#[derive(Debug, Clone)]
pub struct TileMesh {
    radius: f32,
    subdivisions: u32,
    positions: Vec<Vec3>,
    corner_offset: u32,
    tiles: Vec<Tile>,
    face_indices: Vec<u32>,
    edge_indices: Vec<u32>,
    colors: Vec<Rgba>,
}

impl TileMesh {
    /// Builds the icosphere, derives the dual tiling, and assembles the
    /// render buffers.
    pub fn new(radius: f32, subdivisions: u32) -> Self {
        let sphere = generate_icosphere(radius, subdivisions);
        let dual = build_dual(&sphere, radius);
        let corner_offset = sphere.positions.len() as u32;

        let mut positions = sphere.positions;
        positions.extend_from_slice(&dual.corners);

        let tiles: Vec<Tile> = dual
            .cells
            .iter()
            .map(|cell| Tile {
                center: cell.center,
                ring: cell.ring.iter().map(|&c| corner_offset + c).collect(),
            })
            .collect();

        let mut face_indices = Vec::with_capacity(tiles.iter().map(|t| t.ring.len() * 3).sum());
        for tile in &tiles {
            let len = tile.ring.len();
            for i in 0..len {
                face_indices.extend_from_slice(&[
                    tile.center,
                    tile.ring[i],
                    tile.ring[(i + 1) % len],
                ]);
            }
        }

        let edge_indices: Vec<u32> = dual
            .edges
            .iter()
            .flat_map(|e| [corner_offset + e[0], corner_offset + e[1]])
            .collect();

        let colors = vec![UNSET_COLOR; positions.len()];

        Self {
            radius,
            subdivisions,
            positions,
            corner_offset,
            tiles,
            face_indices,
            edge_indices,
            colors,
        }
    }

    /// Tile count for a subdivision level without building the mesh.
    pub fn tiles_at_level(subdivisions: u32) -> usize {
        10 * 4usize.pow(subdivisions) + 2
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Reads a vertex of the combined buffer (centers, then corners).
    pub fn vertex(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    /// Center position of a tile at the mesh radius.
    pub fn tile_center(&self, tile: usize) -> Vec3 {
        self.positions[self.tiles[tile].center as usize]
    }

    /// Unit-sphere tile centers in tile order, the sampling positions the
    /// generators consume.
    pub fn unit_tile_centers(&self) -> Vec<Vec3> {
        self.tiles
            .iter()
            .map(|t| self.positions[t.center as usize].normalize_or_zero())
            .collect()
    }

    /// Paints one tile: its center vertex plus every corner of its ring.
    ///
    /// Ring corners are shared with the two neighboring tiles, so the last
    /// writer of a generation pass wins there; passes iterate tiles in a
    /// fixed order, which keeps repeated recolors identical.
    pub fn set_tile_color(&mut self, tile: usize, color: Rgba) {
        let t = &self.tiles[tile];
        self.colors[t.center as usize] = color;
        for &corner in &t.ring {
            self.colors[corner as usize] = color;
        }
    }

    /// Color currently painted at a tile's center vertex.
    pub fn tile_color(&self, tile: usize) -> Rgba {
        self.colors[self.tiles[tile].center as usize]
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Triangle list: a fan around each tile center.
    pub fn face_indices(&self) -> &[u32] {
        &self.face_indices
    }

    /// Line list tracing tile boundaries (dual edges).
    pub fn edge_indices(&self) -> &[u32] {
        &self.edge_indices
    }

    /// First index of the corner region of the vertex buffer; also the tile
    /// count.
    pub fn corner_offset(&self) -> u32 {
        self.corner_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_counts_follow_the_level_table() {
        assert_eq!(TileMesh::tiles_at_level(0), 12);
        assert_eq!(TileMesh::tiles_at_level(1), 42);
        assert_eq!(TileMesh::tiles_at_level(2), 162);
        assert_eq!(TileMesh::tiles_at_level(3), 642);
        assert_eq!(TileMesh::tiles_at_level(4), 2562);

        for level in 0..3u32 {
            let mesh = TileMesh::new(1.0, level);
            assert_eq!(mesh.tile_count(), TileMesh::tiles_at_level(level));
        }
    }

    #[test]
    fn color_buffer_covers_every_vertex() {
        let mesh = TileMesh::new(1.0, 1);
        assert_eq!(mesh.colors().len(), mesh.vertex_count());
        assert!(mesh.colors().iter().all(|&c| c == UNSET_COLOR));
    }

    #[test]
    fn painting_a_tile_covers_center_and_ring() {
        let mut mesh = TileMesh::new(1.0, 0);
        let red: Rgba = [1.0, 0.0, 0.0, 1.0];
        mesh.set_tile_color(3, red);

        assert_eq!(mesh.tile_color(3), red);
        let tile = &mesh.tiles[3];
        for &corner in &tile.ring {
            assert_eq!(mesh.colors[corner as usize], red);
        }
        // Unrelated centers stay untouched.
        assert_eq!(mesh.tile_color(0), UNSET_COLOR);
    }

    #[test]
    fn base_mesh_fans_into_sixty_triangles() {
        let mesh = TileMesh::new(1.0, 0);
        // 12 pentagons, one triangle per side.
        assert_eq!(mesh.face_indices().len(), 12 * 5 * 3);
    }

    #[test]
    fn index_buffers_are_in_bounds() {
        let mesh = TileMesh::new(1.0, 2);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.face_indices().iter().all(|&i| i < n));
        assert!(mesh.edge_indices().iter().all(|&i| i < n));
        // Tile outlines only run between corners.
        assert!(mesh.edge_indices().iter().all(|&i| i >= mesh.corner_offset()));
        assert_eq!(mesh.edge_indices().len() % 2, 0);
    }

    #[test]
    fn unit_centers_are_normalized() {
        let mesh = TileMesh::new(5.0, 1);
        let centers = mesh.unit_tile_centers();
        assert_eq!(centers.len(), mesh.tile_count());
        for c in centers {
            assert!((c.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn tile_number_is_center_vertex_index() {
        let mesh = TileMesh::new(1.0, 1);
        for tile in 0..mesh.tile_count() {
            assert_eq!(mesh.tile_center(tile), mesh.vertex(tile));
        }
    }
}
