//! Dual (tile) topology of a subdivided icosphere.
//!
//! Every primal vertex becomes a polygonal tile whose corners are the
//! centroids of the faces meeting at that vertex: 12 pentagons at the
//! original icosahedron vertices, hexagons everywhere else.

use std::collections::HashSet;

use glam::Vec3;

use crate::geometry::icosphere::{Icosphere, project_to_sphere};

/// One dual cell: the tile surrounding a primal vertex.
#[derive(Debug, Clone)]
pub struct TileCell {
    /// Index of the tile's center vertex in the primal position buffer.
    pub center: u32,
    /// Corner indices into [`DualMesh::corners`], ordered angularly around
    /// the center (counter-clockwise seen from outside the sphere).
    pub ring: Vec<u32>,
}

/// Face-centroid dual of an icosphere.
#[derive(Debug, Clone)]
pub struct DualMesh {
    /// Dual vertices: one face centroid per primal face, re-projected onto
    /// the sphere.
    pub corners: Vec<Vec3>,
    /// Undirected wireframe edges between corners of edge-adjacent faces,
    /// deduplicated.
    pub edges: Vec<[u32; 2]>,
    /// One cell per primal vertex, in primal vertex order.
    pub cells: Vec<TileCell>,
}

/// Derives the dual tiling of `sphere`.
pub fn build_dual(sphere: &Icosphere, radius: f32) -> DualMesh {
    // One corner per face; faces are distinct points on the sphere, so face
    // identity doubles as position identity.
    let corners: Vec<Vec3> = sphere
        .faces
        .iter()
        .map(|&[a, b, c]| {
            let centroid = (sphere.positions[a as usize]
                + sphere.positions[b as usize]
                + sphere.positions[c as usize])
                / 3.0;
            project_to_sphere(centroid, radius)
        })
        .collect();

    let faces_of = faces_per_vertex(sphere);

    let mut edge_seen: HashSet<(u32, u32)> = HashSet::new();
    let mut edges = Vec::new();
    let mut cells = Vec::with_capacity(sphere.positions.len());

    for (vertex, around) in faces_of.iter().enumerate() {
        // Edge-adjacent face pairs around this vertex share the vertex
        // itself plus exactly one more.
        for (i, &fa) in around.iter().enumerate() {
            for &fb in &around[i + 1..] {
                if shared_vertex_count(sphere.faces[fa as usize], sphere.faces[fb as usize]) == 2 {
                    let key = (fa.min(fb), fa.max(fb));
                    if edge_seen.insert(key) {
                        edges.push([key.0, key.1]);
                    }
                }
            }
        }

        cells.push(TileCell {
            center: vertex as u32,
            ring: order_ring(sphere.positions[vertex], around, &corners),
        });
    }

    DualMesh {
        corners,
        edges,
        cells,
    }
}

/// Face indices grouped by the vertices they contain.
fn faces_per_vertex(sphere: &Icosphere) -> Vec<Vec<u32>> {
    let mut faces_of: Vec<Vec<u32>> = vec![Vec::with_capacity(6); sphere.positions.len()];
    for (fi, face) in sphere.faces.iter().enumerate() {
        for &v in face {
            faces_of[v as usize].push(fi as u32);
        }
    }
    faces_of
}

fn shared_vertex_count(a: [u32; 3], b: [u32; 3]) -> usize {
    a.iter().filter(|v| b.contains(v)).count()
}

/// Sorts the corner candidates angularly in the tangent plane of the tile
/// center so consecutive ring entries bound consecutive tile sides.
fn order_ring(center: Vec3, around: &[u32], corners: &[Vec3]) -> Vec<u32> {
    let normal = center.normalize_or_zero();
    if normal == Vec3::ZERO {
        return around.to_vec();
    }
    let (tangent, bitangent) = normal.any_orthonormal_pair();

    let mut ring: Vec<(u32, f32)> = around
        .iter()
        .map(|&fi| {
            let dir = corners[fi as usize] - center;
            let angle = dir.dot(bitangent).atan2(dir.dot(tangent));
            (fi, angle)
        })
        .collect();
    ring.sort_by(|a, b| a.1.total_cmp(&b.1));
    ring.into_iter().map(|(fi, _)| fi).collect()
}
