//! Indexed triangle meshes.
//!
//! A [`Mesh`] owns its model-space vertices and faces, a [`Transform`] read
//! every frame, and an optional shared texture. Face indices are 0-based.

use std::io::BufRead;
use std::path::Path;
use std::rc::Rc;

use log::info;

use crate::colors;
use crate::error::LoadError;
use crate::math::{Vec2, Vec3};
use crate::texture::Texture;
use crate::transform::Transform;

/// A triangle referencing three mesh vertices, with per-corner UVs and a color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub a_uv: Vec2,
    pub b_uv: Vec2,
    pub c_uv: Vec2,
    pub color: u32,
}

impl Face {
    pub const fn new(indices: [usize; 3], uvs: [Vec2; 3], color: u32) -> Self {
        Self {
            a: indices[0],
            b: indices[1],
            c: indices[2],
            a_uv: uvs[0],
            b_uv: uvs[1],
            c_uv: uvs[2],
            color,
        }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    pub fn uvs(&self) -> [Vec2; 3] {
        [self.a_uv, self.b_uv, self.c_uv]
    }
}

pub const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

const UV_BL: Vec2 = Vec2::new(0.0, 1.0);
const UV_TL: Vec2 = Vec2::new(0.0, 0.0);
const UV_TR: Vec2 = Vec2::new(1.0, 0.0);
const UV_BR: Vec2 = Vec2::new(1.0, 1.0);

const fn cube_face(a: usize, b: usize, c: usize, uvs: [Vec2; 3]) -> Face {
    Face::new([a, b, c], uvs, 0xFFFFFFFF)
}

/// Two triangles per side, wound clockwise when seen from outside.
pub const CUBE_FACES: [Face; 12] = [
    // front
    cube_face(0, 1, 2, [UV_BL, UV_TL, UV_TR]),
    cube_face(0, 2, 3, [UV_BL, UV_TR, UV_BR]),
    // right
    cube_face(3, 2, 4, [UV_BL, UV_TL, UV_TR]),
    cube_face(3, 4, 5, [UV_BL, UV_TR, UV_BR]),
    // back
    cube_face(5, 4, 6, [UV_BL, UV_TL, UV_TR]),
    cube_face(5, 6, 7, [UV_BL, UV_TR, UV_BR]),
    // left
    cube_face(7, 6, 1, [UV_BL, UV_TL, UV_TR]),
    cube_face(7, 1, 0, [UV_BL, UV_TR, UV_BR]),
    // top
    cube_face(1, 6, 4, [UV_BL, UV_TL, UV_TR]),
    cube_face(1, 4, 2, [UV_BL, UV_TR, UV_BR]),
    // bottom
    cube_face(5, 7, 0, [UV_BL, UV_TL, UV_TR]),
    cube_face(5, 0, 3, [UV_BL, UV_TR, UV_BR]),
];

#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    transform: Transform,
    texture: Option<Rc<Texture>>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            name: name.into(),
            vertices,
            faces,
            transform: Transform::default(),
            texture: None,
        }
    }

    /// The built-in 2x2x2 cube centered at the origin.
    pub fn cube() -> Self {
        Self::new("cube", CUBE_VERTICES.to_vec(), CUBE_FACES.to_vec())
    }

    /// Load every object of an OBJ file into a single mesh.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let (models, _materials) = tobj::load_obj(path.as_ref(), &obj_load_options())?;
        let name = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mesh".to_string());
        let mesh = Self::from_obj_models(name, &models)?;
        info!(
            "loaded {} ({} vertices, {} faces)",
            path.as_ref().display(),
            mesh.vertices.len(),
            mesh.faces.len()
        );
        Ok(mesh)
    }

    /// Parse OBJ data from a reader. Material libraries are ignored.
    pub fn from_obj_reader<R: BufRead>(
        name: impl Into<String>,
        reader: &mut R,
    ) -> Result<Self, LoadError> {
        let (models, _materials) =
            tobj::load_obj_buf(reader, &obj_load_options(), |_| Ok(Default::default()))?;
        Self::from_obj_models(name, &models)
    }

    fn from_obj_models(name: impl Into<String>, models: &[tobj::Model]) -> Result<Self, LoadError> {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for model in models {
            let m = &model.mesh;
            let base = vertices.len();
            vertices.extend(
                m.positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2])),
            );

            // OBJ V grows upwards, texture rows are stored top-down.
            let uv = |i: usize| -> Vec2 {
                match (m.texcoords.get(2 * i), m.texcoords.get(2 * i + 1)) {
                    (Some(&u), Some(&v)) => Vec2::new(u, 1.0 - v),
                    _ => Vec2::ZERO,
                }
            };

            for tri in m.indices.chunks_exact(3) {
                let local = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                faces.push(Face::new(
                    [base + local[0], base + local[1], base + local[2]],
                    [uv(local[0]), uv(local[1]), uv(local[2])],
                    colors::FILL,
                ));
            }
        }

        let mesh = Self::new(name, vertices, faces);
        mesh.validate()?;
        Ok(mesh)
    }

    /// Checks that the mesh has faces and every index points at a vertex.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.faces.is_empty() {
            return Err(LoadError::EmptyMesh);
        }
        for (face_index, face) in self.faces.iter().enumerate() {
            if let Some(&index) = face.indices().iter().find(|&&i| i >= self.vertices.len()) {
                return Err(LoadError::IndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count: self.vertices.len(),
                });
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Overrides the color of every face.
    pub fn set_color(&mut self, color: u32) {
        for face in &mut self.faces {
            face.color = color;
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn set_texture(&mut self, texture: Rc<Texture>) {
        self.texture = Some(texture);
    }

    pub fn texture(&self) -> Option<&Rc<Texture>> {
        self.texture.as_ref()
    }
}

fn obj_load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD_OBJ: &str = "\
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn cube_is_valid() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.faces().len(), 12);
        assert!(cube.validate().is_ok());
    }

    #[test]
    fn obj_quad_is_triangulated_with_flipped_v() {
        let mesh = Mesh::from_obj_reader("quad", &mut Cursor::new(QUAD_OBJ)).unwrap();
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.faces().len(), 2);

        // Every referenced vertex exists, and V was flipped: the first vertex
        // sits at OBJ (0, 0), i.e. the bottom-left of the image.
        let first = mesh.faces()[0];
        let corner = first
            .indices()
            .iter()
            .position(|&i| mesh.vertices()[i] == Vec3::new(-1.0, -1.0, 0.0))
            .unwrap();
        assert_eq!(first.uvs()[corner], Vec2::new(0.0, 1.0));
    }

    #[test]
    fn empty_obj_is_an_error() {
        let err = Mesh::from_obj_reader("empty", &mut Cursor::new("v 0 0 0\n")).unwrap_err();
        assert!(matches!(err, LoadError::EmptyMesh));
    }

    #[test]
    fn validate_reports_bad_index() {
        let mesh = Mesh::new(
            "broken",
            vec![Vec3::ZERO; 3],
            vec![Face::new([0, 1, 7], [Vec2::ZERO; 3], colors::FILL)],
        );
        assert!(matches!(
            mesh.validate(),
            Err(LoadError::IndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn set_color_recolors_all_faces() {
        let mut cube = Mesh::cube();
        cube.set_color(0xFF00FF00);
        assert!(cube.faces().iter().all(|f| f.color == 0xFF00FF00));
    }
}
