// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Text mesh parser using pest

use crate::error::{Error, Result};
use crate::geometry::Vec2;
use crate::mesh::{Face, MeshData};
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

#[derive(Parser)]
#[grammar = "io/mesh.pest"]
struct MeshParser;

/// Parse `.mesh` source into a mesh with derived edges rebuilt
pub fn parse_mesh(source: &str) -> Result<MeshData> {
    let file = MeshParser::parse(Rule::file, source)
        .map_err(syntax_error)?
        .next()
        .ok_or_else(|| Error::Parse {
            line: 1,
            message: "empty input".to_string(),
        })?;

    let mut mesh = MeshData::new();
    for pair in file.into_inner() {
        let line = pair.as_span().start_pos().line_col().0;
        match pair.as_rule() {
            Rule::vertex => parse_vertex(&mut mesh, pair, line)?,
            Rule::face => parse_face(&mut mesh, pair, line)?,
            Rule::depth => {
                mesh.depth = parse_float(first_inner(pair, line)?, line)?;
            }
            Rule::palette => {
                let value = parse_int(first_inner(pair, line)?, line)?;
                mesh.palette = u32::try_from(value).map_err(|_| parse_error(line, "palette must not be negative"))?;
            }
            _ => {}
        }
    }

    mesh.update_edges();
    debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        edges = mesh.edge_count(),
        "mesh parsed"
    );
    Ok(mesh)
}

fn parse_vertex(mesh: &mut MeshData, pair: Pair<Rule>, line: usize) -> Result<()> {
    let mut inner = pair.into_inner();
    let x = parse_float(next_inner(&mut inner, line)?, line)?;
    let y = parse_float(next_inner(&mut inner, line)?, line)?;
    // Height, edge and weight attributes belong to the 3D editor and are skipped
    mesh.add_vertex(Vec2::new(x, y))
        .map_err(|e| parse_error(line, e))?;
    Ok(())
}

fn parse_face(mesh: &mut MeshData, pair: Pair<Rule>, line: usize) -> Result<()> {
    let mut indices = Vec::new();
    let mut color = 0u8;
    let mut opacity = 1.0f32;
    let mut normal = Vec2::zeros();

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::integer => {
                let index = parse_int(item, line)?;
                let index = usize::try_from(index)
                    .ok()
                    .filter(|&i| i < mesh.vertex_count())
                    .ok_or_else(|| parse_error(line, format!("vertex index {} out of range", index)))?;
                indices.push(index);
            }
            Rule::color_attr => {
                let mut attrs = item.into_inner();
                let value = parse_int(next_inner(&mut attrs, line)?, line)?;
                color = u8::try_from(value).map_err(|_| parse_error(line, format!("color {} out of range", value)))?;
                for attr in attrs {
                    if attr.as_rule() == Rule::number {
                        opacity = parse_float(attr, line)?.clamp(0.0, 1.0);
                    }
                }
            }
            Rule::normal_attr => {
                let mut attrs = item.into_inner();
                let nx = parse_float(next_inner(&mut attrs, line)?, line)?;
                let ny = parse_float(next_inner(&mut attrs, line)?, line)?;
                normal = Vec2::new(nx, ny);
            }
            _ => {}
        }
    }

    // Closed loops written with the first index repeated at the end
    if indices.len() > 1 && indices.first() == indices.last() {
        indices.pop();
    }

    let mut face = Face::new(indices);
    face.color = color;
    face.opacity = opacity;
    face.normal = normal;
    if face.vertex_count() < 3 {
        return Err(parse_error(line, Error::DegenerateLoop(face.vertex_count())));
    }
    mesh.push_face(face).map_err(|e| parse_error(line, e))?;
    Ok(())
}

fn first_inner(pair: Pair<Rule>, line: usize) -> Result<Pair<Rule>> {
    next_inner(&mut pair.into_inner(), line)
}

fn next_inner<'a>(pairs: &mut pest::iterators::Pairs<'a, Rule>, line: usize) -> Result<Pair<'a, Rule>> {
    pairs.next().ok_or_else(|| parse_error(line, "missing value"))
}

fn parse_float(pair: Pair<Rule>, line: usize) -> Result<f32> {
    pair.as_str()
        .parse::<f32>()
        .map_err(|e| parse_error(line, format!("invalid number '{}': {}", pair.as_str(), e)))
}

fn parse_int(pair: Pair<Rule>, line: usize) -> Result<i64> {
    pair.as_str()
        .parse::<i64>()
        .map_err(|e| parse_error(line, format!("invalid integer '{}': {}", pair.as_str(), e)))
}

fn parse_error(line: usize, message: impl ToString) -> Error {
    Error::Parse {
        line,
        message: message.to_string(),
    }
}

fn syntax_error(error: pest::error::Error<Rule>) -> Error {
    let line = match error.line_col {
        LineColLocation::Pos((line, _)) => line,
        LineColLocation::Span((line, _), _) => line,
    };
    Error::Parse {
        line,
        message: error.variant.message().into_owned(),
    }
}
