//! Wavefront OBJ loading via `tobj`.
//!
//! All objects in a file are merged into one [`Mesh`]. Faces are
//! triangulated and keep separate position/uv/normal indices. Files without
//! texture coordinates get a single `(0, 0)` UV; files without normals get
//! one flat normal per face.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use ember_math::{Vec2, Vec3};

use crate::mesh::{Face, Mesh, MeshError, MeshResult};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: true,
        ..Default::default()
    }
}

/// Load an OBJ file from disk.
pub fn load_obj(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let (models, _materials) =
        tobj::load_obj(path, &load_options()).map_err(|source| MeshError::Load {
            path: path.to_path_buf(),
            source,
        })?;

    let mesh = merge_models(path, &models)?;
    log::debug!(
        "Loaded mesh {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text from a reader. `name` only labels errors.
pub fn parse_obj(reader: &mut impl BufRead, name: &str) -> MeshResult<Mesh> {
    let path = PathBuf::from(name);
    let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .map_err(|source| MeshError::Load {
        path: path.clone(),
        source,
    })?;

    merge_models(&path, &models)
}

fn merge_models(path: &Path, models: &[tobj::Model]) -> MeshResult<Mesh> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut faces = Vec::new();

    for model in models {
        let mesh = &model.mesh;
        let position_base = positions.len() as u32;
        let normal_base = normals.len() as u32;
        let uv_base = uvs.len() as u32;

        positions.extend(mesh.positions.chunks_exact(3).map(Vec3::from_slice));
        normals.extend(mesh.normals.chunks_exact(3).map(Vec3::from_slice));
        uvs.extend(mesh.texcoords.chunks_exact(2).map(Vec2::from_slice));

        let has_normals = mesh.normal_indices.len() == mesh.indices.len();
        let has_uvs = mesh.texcoord_indices.len() == mesh.indices.len();
        if !has_normals {
            log::warn!(
                "Mesh {} ({}) has no normals, using flat face normals",
                path.display(),
                model.name
            );
        }

        for (i, v) in mesh.indices.chunks_exact(3).enumerate() {
            let v = [v[0] + position_base, v[1] + position_base, v[2] + position_base];

            let vn = if has_normals {
                let n = &mesh.normal_indices[i * 3..i * 3 + 3];
                [n[0] + normal_base, n[1] + normal_base, n[2] + normal_base]
            } else {
                let flat = flat_normal(&positions, &v);
                normals.push(flat);
                let index = normals.len() as u32 - 1;
                [index; 3]
            };

            let vt = if has_uvs {
                let t = &mesh.texcoord_indices[i * 3..i * 3 + 3];
                [t[0] + uv_base, t[1] + uv_base, t[2] + uv_base]
            } else {
                if uvs.len() as u32 == uv_base {
                    uvs.push(Vec2::ZERO);
                }
                [uv_base; 3]
            };

            faces.push(Face { v, vt, vn });
        }
    }

    if faces.is_empty() {
        return Err(MeshError::Empty {
            path: path.to_path_buf(),
        });
    }

    Mesh::new(positions, normals, uvs, faces)
}

/// Geometric normal of a face, zero when the face is degenerate or an index
/// is out of range (the mesh validation reports the latter).
fn flat_normal(positions: &[Vec3], v: &[u32; 3]) -> Vec3 {
    match (
        positions.get(v[0] as usize),
        positions.get(v[1] as usize),
        positions.get(v[2] as usize),
    ) {
        (Some(&p0), Some(&p1), Some(&p2)) => (p1 - p0).cross(p2 - p0).normalize_or_zero(),
        _ => Vec3::ZERO,
    }
}
