/// Wavefront OBJ loader for vertex positions and polygon faces
use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{all_consuming, opt},
    multi::many1,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use std::path::Path;

use crate::error::{RenderError, RenderResult};
use crate::geometry::{Color, Geometry};

/// Parse OBJ text, giving every triangle `color`.
///
/// Only `v` and `f` records are read. Faces with more than three corners
/// are split into a fan around their first corner; texture and normal
/// references (`1/2/3`, `1//3`) are ignored.
pub fn parse_obj(input: &str, color: Color) -> RenderResult<Geometry> {
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();

    for (number, raw) in input.lines().enumerate() {
        let line_number = number + 1;
        let line = raw.split('#').next().unwrap_or(raw).trim();

        match line.split_whitespace().next() {
            Some("v") => {
                let (_, vertex) = all_consuming(vertex_record)(line)
                    .map_err(|_| parse_error(line_number, "vertex needs 3 numeric coordinates"))?;
                vertices.push(vertex);
            }
            Some("f") => {
                let (_, indices) = all_consuming(face_record)(line)
                    .map_err(|_| parse_error(line_number, "face indices must be integers"))?;
                if indices.len() < 3 {
                    return Err(parse_error(line_number, "face needs at least 3 vertices"));
                }
                let corners = indices
                    .iter()
                    .map(|&index| resolve_index(index, vertices.len()))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| parse_error(line_number, "face index 0 or before the first vertex"))?;
                for i in 1..corners.len() - 1 {
                    triangles.push([corners[0], corners[i], corners[i + 1]]);
                }
            }
            _ => {}
        }
    }

    log::info!(
        "parsed OBJ: {} vertices, {} triangles",
        vertices.len(),
        triangles.len()
    );
    let colors = vec![color; triangles.len()];
    Ok(Geometry::new(vertices, triangles, colors))
}

/// Read and parse an OBJ file
pub fn load_obj(path: impl AsRef<Path>, color: Color) -> RenderResult<Geometry> {
    let path = path.as_ref();
    log::debug!("loading OBJ from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    parse_obj(&text, color)
}

fn parse_error(line: usize, message: &str) -> RenderError {
    RenderError::ObjParse {
        line,
        message: message.to_string(),
    }
}

/// 1-based indices count from the start, negative ones back from the latest vertex
fn resolve_index(index: i64, vertex_count: usize) -> Option<usize> {
    match index {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => vertex_count.checked_sub(usize::try_from(i.unsigned_abs()).ok()?),
    }
}

fn vertex_record(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = tag("v")(input)?;
    let (input, x) = preceded(space1, float)(input)?;
    let (input, y) = preceded(space1, float)(input)?;
    let (input, z) = preceded(space1, float)(input)?;
    // Optional w component
    let (input, _) = opt(preceded(space1, float))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn face_record(input: &str) -> IResult<&str, Vec<i64>> {
    let (input, _) = tag("f")(input)?;
    let (input, indices) = many1(preceded(space1, face_index))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, indices))
}

fn face_index(input: &str) -> IResult<&str, i64> {
    let (input, index) = integer(input)?;
    let (input, _) = opt(preceded(char('/'), take_till(|c: char| c.is_whitespace())))(input)?;
    Ok((input, index))
}
