//! Output of routes and statistics.
//!
//! The route format is fixed: four summary lines (vertex count, route count,
//! total cost, total demand) then one line per route listing its serviced
//! elements between two depot markers.

use crate::error::{Error, Result};
use crate::instance::Instance;
use crate::solution::Solution;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const DEPOT_MARKER: &str = "(D 0,1,1)";

/// Write the route listing of `solution`
pub fn write_routes<W: Write>(out: &mut W, instance: &Instance, solution: &Solution) -> std::io::Result<()> {
    writeln!(out, "{}", instance.vertex_count)?;
    writeln!(out, "{}", solution.num_routes())?;
    writeln!(out, "{}", solution.total_cost())?;
    writeln!(out, "{}", solution.total_demand())?;

    for (index, route) in solution.routes.iter().enumerate() {
        write!(
            out,
            " 0 1 {} {} {} {} {}",
            index + 1,
            route.len(),
            route.total_cost,
            route.total_demand,
            DEPOT_MARKER
        )?;
        for &id in &route.elements {
            let (from, to) = instance.element(id).map(|e| e.endpoints()).unwrap_or((0, 0));
            write!(out, " (S {},{},{})", id, from, to)?;
        }
        writeln!(out, " {}", DEPOT_MARKER)?;
    }

    Ok(())
}

/// Route listing as a string
pub fn format_routes(instance: &Instance, solution: &Solution) -> String {
    let mut buffer = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_routes(&mut buffer, instance, solution);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Save the route listing to `path`
pub fn save_routes<P: AsRef<Path>>(path: P, instance: &Instance, solution: &Solution) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::write(path, e))?;
    let mut writer = BufWriter::new(file);
    write_routes(&mut writer, instance, solution)
        .and_then(|_| writer.flush())
        .map_err(|e| Error::write(path, e))?;
    log::info!("Routes saved to {:?}", path);
    Ok(())
}

/// Save any serializable report as pretty JSON
pub fn save_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| Error::write(path, e))?;
    log::info!("JSON saved to {:?}", path);
    Ok(())
}

/// `sol-<file name>` next to the instance file
pub fn default_solution_path<P: AsRef<Path>>(instance_path: P) -> PathBuf {
    let instance_path = instance_path.as_ref();
    let file_name = instance_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "instance.dat".to_string());
    instance_path.with_file_name(format!("sol-{}", file_name))
}
