use std::fmt::Write as _;

use crate::error::ColoringError;
use crate::formats::integer_pair;
use crate::instance::Instance;

/** reads an instance in SNAP edge-list format.

`#` lines are a banner; every following line holds a 0-indexed edge `u v`.
The vertex set grows on demand. */
pub fn read(content: &str, path: &str) -> Result<Instance, ColoringError> {
    let mut instance = Instance::new(0);
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') { continue; }
        let (_, (v1, v2)) = integer_pair(trimmed).map_err(|e| {
            ColoringError::parse(path, format!("line {}: {}", i + 1, e))
        })?;
        while v1.max(v2) >= instance.nb_vertices() {
            instance.add_vertex();
        }
        instance.add_edge(v1, v2)
            .map_err(|e| ColoringError::parse(path, e.to_string()))?;
    }
    Ok(instance)
}

/// writes an instance in SNAP edge-list format
pub fn write(instance: &Instance) -> String {
    let mut res = String::default();
    for &(v1, v2) in instance.edges() {
        let _ = writeln!(res, "{} {}", v1, v2);
    }
    res
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::tests::{edge_set, k4_minus_one_edge};

    #[test]
    fn test_read_grows_vertex_set() {
        let content = "# SNAP graph\n0 1\n1 4\n";
        let inst = read(content, "test").unwrap();
        assert_eq!(inst.nb_vertices(), 5);
        assert_eq!(edge_set(&inst), vec![(0, 1), (1, 4)]);
    }

    #[test]
    fn test_roundtrip() {
        let inst = k4_minus_one_edge();
        let reread = read(&write(&inst), "test").unwrap();
        assert_eq!(reread.nb_vertices(), inst.nb_vertices());
        assert_eq!(edge_set(&reread), edge_set(&inst));
    }
}
