/// Example: Load an OBJ file and report what the indexer makes of it
///
/// Usage: cargo run --example load_obj -- path/to/file.obj

use anyhow::{bail, Context, Result};
use armrig_core::load_obj;
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        bail!("Usage: {} <obj-file>", args[0]);
    }

    let path = Path::new(&args[1]);
    println!("Loading OBJ file: {}", path.display());

    let data = load_obj(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let triangles = data.triangle_count();
    let corners = data.positions.len();

    let mesh = data.into_indexed().context("Failed to index mesh")?;
    println!("Triangles:       {}", triangles);
    println!("Face corners:    {}", corners);
    println!("Unique vertices: {}", mesh.vertex_count());
    println!("Indices:         {}", mesh.index_count());

    Ok(())
}
