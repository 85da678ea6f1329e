//! Icosphere construction by iterative face subdivision.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

/// The 20 triangular faces of a regular icosahedron, as indices into the
/// golden-ratio vertex list built by [`generate_icosphere`].
const BASE_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// A subdivided icosahedron projected onto a sphere.
#[derive(Debug, Clone)]
pub struct Icosphere {
    /// Vertex positions, all at distance `radius` from the origin.
    pub positions: Vec<Vec3>,
    /// Triangular faces as vertex index triples.
    pub faces: Vec<[u32; 3]>,
    /// Undirected edges derived from the face list, deduplicated.
    pub edges: Vec<[u32; 2]>,
}

/// Builds an icosphere of the given radius.
///
/// Each subdivision splits every face into 4 children with edge midpoints
/// re-projected onto the sphere, taking the vertex count from 12 to
/// `10 * 4^subdivisions + 2`.
pub fn generate_icosphere(radius: f32, subdivisions: u32) -> Icosphere {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions: Vec<Vec3> = vec![
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(0.0, 1.0, -phi),
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, 1.0),
    ];
    for p in &mut positions {
        *p = project_to_sphere(*p, radius);
    }

    let mut faces = BASE_FACES.to_vec();
    for _ in 0..subdivisions {
        faces = subdivide(&mut positions, &faces, radius);
    }

    let edges = edges_from_faces(&faces);
    Icosphere {
        positions,
        faces,
        edges,
    }
}

/// Scales `v` onto the sphere of the given radius.
///
/// A degenerate zero-length input is returned unchanged instead of
/// propagating NaN through the mesh.
pub fn project_to_sphere(v: Vec3, radius: f32) -> Vec3 {
    let len = v.length();
    if len <= f32::EPSILON {
        return v;
    }
    v * (radius / len)
}

/// Splits every face into 4, memoizing midpoints per undirected edge so
/// shared edges produce a single shared vertex.
fn subdivide(positions: &mut Vec<Vec3>, faces: &[[u32; 3]], radius: f32) -> Vec<[u32; 3]> {
    let mut cache: HashMap<(u32, u32), u32> = HashMap::new();
    let mut children = Vec::with_capacity(faces.len() * 4);

    let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&idx) = cache.get(&key) {
            return idx;
        }
        let mid = (positions[a as usize] + positions[b as usize]) * 0.5;
        let idx = positions.len() as u32;
        positions.push(project_to_sphere(mid, radius));
        cache.insert(key, idx);
        idx
    };

    for &[v1, v2, v3] in faces {
        let a = midpoint(v1, v2, positions);
        let b = midpoint(v2, v3, positions);
        let c = midpoint(v3, v1, positions);

        children.push([v1, a, c]);
        children.push([v2, b, a]);
        children.push([v3, c, b]);
        children.push([a, b, c]);
    }
    children
}

/// Collects the undirected edge set of a face list, keyed by min/max index
/// so each shared edge appears once.
fn edges_from_faces(faces: &[[u32; 3]]) -> Vec<[u32; 2]> {
    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    let mut edges = Vec::new();
    for face in faces {
        for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
            let key = if a < b { (a, b) } else { (b, a) };
            if seen.insert(key) {
                edges.push([key.0, key.1]);
            }
        }
    }
    edges
}
