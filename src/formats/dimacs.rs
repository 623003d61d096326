use std::fmt::Write as _;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::space1;
use nom::sequence::preceded;
use nom::IResult;

use crate::error::ColoringError;
use crate::formats::{integer_pair, one_indexed};
use crate::instance::Instance;

/** reads an instance in DIMACS edge-list format.

`c` lines are comments; `p edge n m` (or `p col n m`) announces the sizes;
`e u v` lines list the edges, 1-indexed. */
pub fn read(content: &str, path: &str) -> Result<Instance, ColoringError> {
    let mut instance: Option<Instance> = None;
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') { continue; }
        if let Ok((_, (n, _m))) = header(trimmed) {
            instance = Some(Instance::new(n));
            continue;
        }
        if let Ok((_, (v1, v2))) = edge(trimmed) {
            let inst = instance.as_mut().ok_or_else(|| {
                ColoringError::parse(path, format!("line {}: edge before the problem line", i + 1))
            })?;
            inst.add_edge(one_indexed(v1, path)?, one_indexed(v2, path)?)
                .map_err(|e| ColoringError::parse(path, e.to_string()))?;
            continue;
        }
        return Err(ColoringError::parse(path, format!("line {}: unrecognized line \"{}\"", i + 1, trimmed)));
    }
    instance.ok_or_else(|| ColoringError::parse(path, "missing problem line".to_string()))
}

/// writes an instance in DIMACS edge-list format
pub fn write(instance: &Instance) -> String {
    let mut res = String::default();
    let _ = writeln!(res, "p edge {} {}", instance.nb_vertices(), instance.nb_edges());
    for &(v1, v2) in instance.edges() {
        let _ = writeln!(res, "e {} {}", v1 + 1, v2 + 1);
    }
    res
}

/// parses a problem line, returning (n, m)
fn header(s: &str) -> IResult<&str, (usize, usize)> {
    preceded(alt((tag("p edge"), tag("p col"))), preceded(space1, integer_pair))(s)
}

/// parses an edge line (1-indexed endpoints)
fn edge(s: &str) -> IResult<&str, (usize, usize)> {
    preceded(tag("e"), preceded(space1, integer_pair))(s)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::tests::{edge_set, k4_minus_one_edge};

    #[test]
    fn test_read() {
        let content = "c P3 instance\np edge 3 2\ne 1 2\ne 2 3\n";
        let inst = read(content, "test").unwrap();
        assert_eq!(inst.nb_vertices(), 3);
        assert_eq!(inst.nb_edges(), 2);
        assert_eq!(edge_set(&inst), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_read_col_header() {
        let content = "p col 2 1\ne 1 2\n";
        let inst = read(content, "test").unwrap();
        assert_eq!(inst.nb_vertices(), 2);
        assert_eq!(inst.nb_edges(), 1);
    }

    #[test]
    fn test_read_rejects_garbage() {
        assert!(read("p edge 2 1\nx 1 2\n", "test").is_err());
        assert!(read("e 1 2\n", "test").is_err());
        assert!(read("c only comments\n", "test").is_err());
        assert!(read("p edge 2 1\ne 0 1\n", "test").is_err());
    }

    #[test]
    fn test_roundtrip() {
        let inst = k4_minus_one_edge();
        let reread = read(&write(&inst), "test").unwrap();
        assert_eq!(reread.nb_vertices(), inst.nb_vertices());
        assert_eq!(edge_set(&reread), edge_set(&inst));
    }
}
