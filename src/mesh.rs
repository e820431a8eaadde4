//! Reading and writing the line-oriented mesh text format.
//!
//! ```text
//! g cube
//! v 0 0 0
//! v 1 0 0
//! v 1 1 0
//! f 1 2 3
//! a
//! ```
//!
//! `g` names the mesh, `v` appends a vertex, `f` appends a 1-based vertex
//! index loop and `a` ends parsing early. Blank lines, `#` comments and
//! unknown directives (`vt`, `vn`, `o`, `s`, ...) are skipped. Face entries
//! may carry `/`-separated texture and normal indices; only the vertex index
//! is used.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, ViewError};
use crate::geometry::{Geometry, Position};

/// A parsed mesh. Face indices are zero-based.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Position>,
    pub faces: Vec<Vec<usize>>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Position>, faces: Vec<Vec<usize>>) -> Self {
        Self {
            name: name.into(),
            vertices,
            faces,
        }
    }

    /// Parses mesh text. An unnamed mesh is called `fallback_name`.
    pub fn parse(text: &str, fallback_name: &str) -> Result<Self> {
        let mut mesh = Mesh::default();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let mut tokens = line.split_whitespace();
            let Some(directive) = tokens.next() else {
                continue;
            };

            match directive {
                "g" => mesh.name = tokens.collect::<Vec<_>>().join(" "),
                "v" => {
                    let coords = tokens
                        .take(3)
                        .map(|t| parse_number(t, line_no))
                        .collect::<Result<Vec<f64>>>()?;
                    let &[x, y, z] = coords.as_slice() else {
                        return Err(parse_error(line_no, "vertex needs three coordinates"));
                    };
                    mesh.vertices.push(Position::new(x, y, z));
                }
                "f" => {
                    let face = tokens
                        .map(|t| parse_index(t, mesh.vertices.len(), line_no))
                        .collect::<Result<Vec<usize>>>()?;
                    if face.len() < 2 {
                        return Err(parse_error(line_no, "face needs at least two vertices"));
                    }
                    mesh.faces.push(face);
                }
                "a" => break,
                _ => {}
            }
        }

        if mesh.name.is_empty() {
            mesh.name = fallback_name.to_string();
        }
        Ok(mesh)
    }

    /// Reads a mesh file, naming unnamed meshes after the file stem.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("mesh");
        Self::parse(&text, stem)
    }

    pub fn write_to(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "g {}", self.name)?;
        writeln!(out)?;
        for v in &self.vertices {
            writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
        }
        if !self.faces.is_empty() {
            writeln!(out)?;
        }
        for face in &self.faces {
            let indices: Vec<String> = face.iter().map(|i| (i + 1).to_string()).collect();
            writeln!(out, "f {}", indices.join(" "))?;
        }
        Ok(())
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Wireframe geometry for the mesh. Faceless meshes become a plain
    /// vertex loop.
    pub fn to_geometry(&self, filled: bool) -> Geometry {
        Geometry::Wireframe {
            points: self.vertices.clone(),
            faces: (!self.faces.is_empty()).then(|| self.faces.clone()),
            filled,
        }
    }

    /// The mesh stored in a wireframe, or `None` for other geometry.
    pub fn from_geometry(name: impl Into<String>, geometry: &Geometry) -> Option<Self> {
        match geometry {
            Geometry::Wireframe { points, faces, .. } => Some(Self::new(
                name,
                points.clone(),
                faces.clone().unwrap_or_default(),
            )),
            _ => None,
        }
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> ViewError {
    ViewError::MeshParse {
        line,
        message: message.into(),
    }
}

fn parse_number(token: &str, line: usize) -> Result<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| parse_error(line, format!("invalid coordinate {:?}", token)))
}

fn parse_index(token: &str, vertex_count: usize, line: usize) -> Result<usize> {
    let vertex = token.split('/').next().unwrap_or(token);
    let index: usize = vertex
        .parse()
        .map_err(|_| parse_error(line, format!("invalid face index {:?}", token)))?;
    if index == 0 || index > vertex_count {
        return Err(parse_error(
            line,
            format!("face index {} out of range 1..={}", index, vertex_count),
        ));
    }
    Ok(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "\
# unit square
g square
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn parses_vertices_and_faces() {
        let mesh = Mesh::parse(SQUARE, "fallback").unwrap();
        assert_eq!(mesh.name, "square");
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.vertices[2], Position::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.faces, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn a_stops_parsing() {
        let mesh = Mesh::parse("v 0 0 0\na\nv 1 1 1\n", "early").unwrap();
        assert_eq!(mesh.name, "early");
        assert_eq!(mesh.vertices.len(), 1);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = Mesh::parse("v 0 0 0\nv 1 x 0\n", "bad").unwrap_err();
        assert!(matches!(err, ViewError::MeshParse { line: 2, .. }));

        let err = Mesh::parse("v 0 0 0\nf 1 2\n", "bad").unwrap_err();
        assert!(matches!(err, ViewError::MeshParse { line: 2, .. }));

        let err = Mesh::parse("v 0 0\n", "bad").unwrap_err();
        assert!(matches!(err, ViewError::MeshParse { line: 1, .. }));
    }

    #[test]
    fn written_text_parses_back() {
        let mesh = Mesh::parse(SQUARE, "fallback").unwrap();
        let mut out = Vec::new();
        mesh.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("g square\n"));
        assert!(text.contains("f 1 2 3 4\n"));
        assert_eq!(Mesh::parse(&text, "other").unwrap(), mesh);
    }

    #[test]
    fn geometry_conversion() {
        let mesh = Mesh::parse(SQUARE, "fallback").unwrap();
        let geometry = mesh.to_geometry(true);
        assert!(geometry.is_filled());
        assert_eq!(Mesh::from_geometry("square", &geometry), Some(mesh));
        assert_eq!(Mesh::from_geometry("p", &Geometry::Point(Position::ZERO)), None);
    }
}
