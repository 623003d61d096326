use std::fmt::Write as _;

use crate::error::ColoringError;
use crate::formats::{integer_list, one_indexed};
use crate::instance::Instance;

/** reads an instance in DIMACS-2010 adjacency-list format.

`%` lines are a banner; the first data line starts with `n`; then one line
per vertex lists its 1-indexed neighbors (possibly none). Each edge is kept
once, from its lower endpoint. */
pub fn read(content: &str, path: &str) -> Result<Instance, ColoringError> {
    let mut instance: Option<Instance> = None;
    let mut v = 0;
    for (i, line) in content.lines().enumerate() {
        if line.trim_start().starts_with('%') { continue; }
        match instance.as_mut() {
            None => {
                let (_, sizes) = integer_list(line).map_err(|e| {
                    ColoringError::parse(path, format!("line {}: {}", i + 1, e))
                })?;
                let n = *sizes.first().ok_or_else(|| {
                    ColoringError::parse(path, format!("line {}: empty header line", i + 1))
                })?;
                instance = Some(Instance::new(n));
            }
            Some(inst) => {
                if v == inst.nb_vertices() { break; }
                let (_, neighbors) = integer_list(line).map_err(|e| {
                    ColoringError::parse(path, format!("line {}: {}", i + 1, e))
                })?;
                for neighbor in neighbors {
                    let v2 = one_indexed(neighbor, path)?;
                    if v2 > v {
                        inst.add_edge(v, v2)
                            .map_err(|e| ColoringError::parse(path, e.to_string()))?;
                    }
                }
                v += 1;
            }
        }
    }
    let inst = instance.ok_or_else(|| ColoringError::parse(path, "missing header line".to_string()))?;
    if v != inst.nb_vertices() {
        return Err(ColoringError::parse(
            path,
            format!("expected {} adjacency lines, found {}", inst.nb_vertices(), v),
        ));
    }
    Ok(inst)
}

/// writes an instance in DIMACS-2010 adjacency-list format
pub fn write(instance: &Instance) -> String {
    let mut res = String::default();
    let _ = writeln!(res, "{} {}", instance.nb_vertices(), instance.nb_edges());
    for v in 0..instance.nb_vertices() {
        let line: Vec<String> = instance.neighbors(v).iter()
            .map(|neighbor| (neighbor.v + 1).to_string())
            .collect();
        let _ = writeln!(res, "{}", line.join(" "));
    }
    res
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::tests::{edge_set, k4_minus_one_edge};

    #[test]
    fn test_read() {
        // triangle plus an isolated vertex
        let content = "% banner\n4 3\n2 3\n1 3\n1 2\n\n";
        let inst = read(content, "test").unwrap();
        assert_eq!(inst.nb_vertices(), 4);
        assert_eq!(edge_set(&inst), vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(inst.degree(3), 0);
    }

    #[test]
    fn test_read_rejects_truncated_file() {
        assert!(read("3 2\n2 3\n", "test").is_err());
    }

    #[test]
    fn test_roundtrip() {
        let inst = k4_minus_one_edge();
        let reread = read(&write(&inst), "test").unwrap();
        assert_eq!(reread.nb_vertices(), inst.nb_vertices());
        assert_eq!(edge_set(&reread), edge_set(&inst));
    }
}
