//! Icosphere geometry module.
//!
//! Builds the subdivided icosahedron and its face-centroid dual, which is
//! the tile topology the generators operate on.

mod dual;
mod icosphere;

pub use dual::{DualMesh, TileCell, build_dual};
pub use icosphere::{Icosphere, generate_icosphere, project_to_sphere};
