// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Meshknife CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use meshknife::config::CONFIG_FILE;
use meshknife::utils::init_logging;
use meshknife::{io, Button, Editor, FrameInput, KnifeConfig, MeshData, Primitive, ToolStatus, Vec2};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "meshknife")]
#[command(about = "Knife tool for 2D polygon meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./meshknife.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay clicks against a mesh and save the result
    Cut {
        /// Input mesh (.mesh or .json)
        input: PathBuf,

        /// Output mesh; the format follows the extension
        #[arg(short, long)]
        output: PathBuf,

        /// Click in world space as `x,y`; repeatable
        #[arg(long = "click", value_name = "X,Y", value_parser = parse_point, allow_hyphen_values = true)]
        clicks: Vec<Vec2>,

        /// File with one `x y` click per line
        #[arg(long, value_name = "FILE")]
        clicks_file: Option<PathBuf>,

        /// Select these faces first and restrict the knife to them
        #[arg(long = "select", value_name = "FACE")]
        selected: Vec<usize>,
    },

    /// Print mesh statistics
    Info {
        input: PathBuf,

        /// Also list every face loop
        #[arg(long)]
        faces: bool,
    },

    /// Write a primitive mesh
    New {
        #[arg(value_enum)]
        shape: Shape,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value = "1")]
        cols: usize,

        #[arg(long, default_value = "1")]
        rows: usize,

        #[arg(long, default_value = "1.0")]
        cell: f32,

        #[arg(long, default_value = "6")]
        sides: usize,

        #[arg(long, default_value = "1.0")]
        radius: f32,
    },

    /// Write the effective configuration to a TOML file
    InitConfig {
        #[arg(short, long, default_value = CONFIG_FILE)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Square,
    Grid,
    Polygon,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => {
            let mut config = KnifeConfig::from_file(path)?;
            config.apply_env();
            config
        }
        None => KnifeConfig::load()?,
    };

    match cli.command {
        Commands::Cut {
            input,
            output,
            clicks,
            clicks_file,
            selected,
        } => cut_command(&input, &output, clicks, clicks_file.as_deref(), &selected, config),
        Commands::Info { input, faces } => info_command(&input, faces),
        Commands::New {
            shape,
            output,
            cols,
            rows,
            cell,
            sides,
            radius,
        } => {
            let primitive = match shape {
                Shape::Square => Primitive::unit_square(),
                Shape::Grid => Primitive::Grid { cols, rows, cell },
                Shape::Polygon => Primitive::Polygon { radius, sides },
            };
            let mesh = primitive.to_mesh().context("Failed to build primitive")?;
            io::save_mesh(&mesh, &output)?;
            println!("{} Wrote {}", "Success:".green(), output.display());
            Ok(())
        }
        Commands::InitConfig { output } => {
            config.save(&output)?;
            println!("{} Wrote {}", "Success:".green(), output.display());
            Ok(())
        }
    }
}

fn parse_point(s: &str) -> std::result::Result<Vec2, String> {
    let mut parts = s.split(|c: char| c == ',' || c.is_whitespace()).filter(|p| !p.is_empty());
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected `x,y`, got `{}`", s));
    };
    let x = x.parse::<f32>().map_err(|e| format!("bad x `{}`: {}", x, e))?;
    let y = y.parse::<f32>().map_err(|e| format!("bad y `{}`: {}", y, e))?;
    Ok(Vec2::new(x, y))
}

fn read_clicks(path: &Path) -> Result<Vec<Vec2>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read clicks file: {}", path.display()))?;

    let mut clicks = Vec::new();
    for (number, line) in source.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        match parse_point(line) {
            Ok(point) => clicks.push(point),
            Err(e) => bail!("{}:{}: {}", path.display(), number + 1, e),
        }
    }
    Ok(clicks)
}

fn cut_command(
    input: &Path,
    output: &Path,
    mut clicks: Vec<Vec2>,
    clicks_file: Option<&Path>,
    selected: &[usize],
    config: KnifeConfig,
) -> Result<()> {
    if let Some(path) = clicks_file {
        clicks.extend(read_clicks(path)?);
    }
    if clicks.is_empty() {
        bail!("No clicks given; use --click or --clicks-file");
    }

    let mesh = io::load_mesh(input)?;
    let mut editor = Editor::with_config(mesh, config);
    for &face in selected {
        editor
            .set_face_selected(face, true)
            .with_context(|| format!("Cannot select face {}", face))?;
    }
    editor.begin_knife_tool(!selected.is_empty());

    let mut status = ToolStatus::Active;
    for &click in &clicks {
        status = editor.update(&FrameInput::click(click.x, click.y)).unwrap_or(status);
        if status != ToolStatus::Active {
            break;
        }
    }
    if status == ToolStatus::Active {
        status = editor
            .update(&FrameInput::key(Button::Enter))
            .unwrap_or(ToolStatus::Cancelled);
    }

    let Some(summary) = editor.last_commit().cloned() else {
        bail!("Knife session ended without a commit ({:?})", status);
    };

    io::save_mesh(editor.mesh(), output)?;

    println!("{}", "Knife commit".bold());
    println!("  Path points:    {}", summary.path_points);
    println!("  Actions:        {:?}", summary.actions);
    println!(
        "  Applied:        {}",
        summary.report.applied.to_string().green()
    );
    if summary.report.failed > 0 {
        println!("  Failed:         {}", summary.report.failed.to_string().red());
    }
    println!("  Vertices added: {}", summary.vertices_added);
    println!("  Faces added:    {}", summary.faces_added);
    println!("{} Wrote {}", "Success:".green(), output.display());
    Ok(())
}

fn info_command(input: &Path, list_faces: bool) -> Result<()> {
    let mesh: MeshData = io::load_mesh(input)?;
    let bounds = mesh.bounds();
    let islands = mesh.faces.iter().map(|f| f.island).collect::<std::collections::BTreeSet<_>>();

    println!("{}", input.display().to_string().bold());
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Faces:    {}", mesh.face_count());
    println!("  Edges:    {}", mesh.edge_count());
    println!("  Islands:  {}", islands.len());
    println!(
        "  Bounds:   ({:.3}, {:.3}) - ({:.3}, {:.3})",
        bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y
    );
    println!("  Depth:    {}", mesh.depth);
    println!("  Palette:  {}", mesh.palette);

    if list_faces {
        for (i, face) in mesh.faces.iter().enumerate() {
            let area = mesh.face_signed_area(i);
            let line = format!("  f{:<4} {:?} color {} area {:.4}", i, face.vertices, face.color, area);
            if area <= 0.0 {
                println!("{}", line.yellow());
            } else {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
