//! Triangle mesh geometry.
//!
//! A mesh keeps positions, normals and UVs in separate arrays, and each face
//! indexes into each array independently (the OBJ `v/vt/vn` layout). Face
//! indices are checked once by [`Mesh::new`]; code that walks faces after
//! that may index the attribute arrays directly.

use std::path::PathBuf;

use ember_math::{Aabb, Vec2, Vec3};
use thiserror::Error;

/// Errors raised while loading or validating a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("failed to load mesh {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("mesh {path} contains no geometry")]
    Empty { path: PathBuf },

    #[error("face {face} references {attribute} index {index}, but the mesh has only {len}")]
    IndexOutOfRange {
        face: usize,
        attribute: Attribute,
        index: u32,
        len: usize,
    },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// Per-vertex attribute a face index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Normal,
    Uv,
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Attribute::Position => "position",
            Attribute::Normal => "normal",
            Attribute::Uv => "uv",
        })
    }
}

/// One triangle: three indices per attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Face {
    pub v: [u32; 3],
    pub vt: [u32; 3],
    pub vn: [u32; 3],
}

/// A triangle mesh with validated face indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    faces: Vec<Face>,
}

/// A face with its attributes looked up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleVertices {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
    pub uvs: [Vec2; 3],
}

impl Mesh {
    /// Build a mesh, rejecting any face that indexes past an attribute array.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        uvs: Vec<Vec2>,
        faces: Vec<Face>,
    ) -> MeshResult<Self> {
        let mesh = Self {
            positions,
            normals,
            uvs,
            faces,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    fn validate(&self) -> MeshResult<()> {
        let checks = |face: usize, attribute: Attribute, indices: &[u32; 3], len: usize| {
            match indices.iter().find(|&&i| i as usize >= len) {
                Some(&index) => Err(MeshError::IndexOutOfRange {
                    face,
                    attribute,
                    index,
                    len,
                }),
                None => Ok(()),
            }
        };

        for (i, face) in self.faces.iter().enumerate() {
            checks(i, Attribute::Position, &face.v, self.positions.len())?;
            checks(i, Attribute::Normal, &face.vn, self.normals.len())?;
            checks(i, Attribute::Uv, &face.vt, self.uvs.len())?;
        }
        Ok(())
    }

    /// Resolve the attributes of face `index`, moving positions by `offset`.
    /// `None` when there is no such face.
    pub fn triangle(&self, index: usize, offset: Vec3) -> Option<TriangleVertices> {
        self.faces.get(index).map(|face| self.resolve(face, offset))
    }

    /// Iterate over every face with its attributes resolved.
    pub fn triangles(&self, offset: Vec3) -> impl Iterator<Item = TriangleVertices> + '_ {
        self.faces.iter().map(move |face| self.resolve(face, offset))
    }

    // Face indices were checked in `validate`
    fn resolve(&self, face: &Face, offset: Vec3) -> TriangleVertices {
        let position = |i: usize| self.positions[face.v[i] as usize] + offset;
        let normal = |i: usize| self.normals[face.vn[i] as usize];
        let uv = |i: usize| self.uvs[face.vt[i] as usize];

        TriangleVertices {
            positions: [position(0), position(1), position(2)],
            normals: [normal(0), normal(1), normal(2)],
            uvs: [uv(0), uv(1), uv(2)],
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Bounds of the mesh positions.
    pub fn bounds(&self) -> Aabb {
        self.positions
            .iter()
            .fold(Aabb::EMPTY, |acc, p| Aabb::surrounding(&acc, &Aabb::from_points(*p, *p)))
    }
}
