use std::fmt::Write as _;

use crate::error::ColoringError;
use crate::formats::{integer_list, integer_pair, one_indexed};
use crate::instance::Instance;

/** reads an instance in MatrixMarket format.

`%` lines are a banner; the first data line holds `n n m`; every following
line holds a 1-indexed edge `u v`. */
pub fn read(content: &str, path: &str) -> Result<Instance, ColoringError> {
    let mut instance: Option<Instance> = None;
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') { continue; }
        match instance.as_mut() {
            None => {
                let (_, sizes) = integer_list(trimmed).map_err(|e| {
                    ColoringError::parse(path, format!("line {}: {}", i + 1, e))
                })?;
                let n = *sizes.first().ok_or_else(|| {
                    ColoringError::parse(path, format!("line {}: empty size line", i + 1))
                })?;
                instance = Some(Instance::new(n));
            }
            Some(inst) => {
                let (_, (v1, v2)) = integer_pair(trimmed).map_err(|e| {
                    ColoringError::parse(path, format!("line {}: {}", i + 1, e))
                })?;
                inst.add_edge(one_indexed(v1, path)?, one_indexed(v2, path)?)
                    .map_err(|e| ColoringError::parse(path, e.to_string()))?;
            }
        }
    }
    instance.ok_or_else(|| ColoringError::parse(path, "missing size line".to_string()))
}

/// writes an instance in MatrixMarket format
pub fn write(instance: &Instance) -> String {
    let mut res = String::default();
    let _ = writeln!(res, "{} {} {}",
        instance.nb_vertices(), instance.nb_vertices(), instance.nb_edges());
    for &(v1, v2) in instance.edges() {
        let _ = writeln!(res, "{} {}", v1 + 1, v2 + 1);
    }
    res
}
