//! Readers and writers for the supported instance file formats.

/// DIMACS edge-list format (`p edge n m`, `e u v`, 1-indexed)
pub mod dimacs;

/// DIMACS-2010 adjacency-list format (one line per vertex, 1-indexed)
pub mod dimacs2010;

/// MatrixMarket format (`n n m` header, `u v` lines, 1-indexed)
pub mod matrixmarket;

/// SNAP edge-list format (`u v` lines, 0-indexed)
pub mod snap;

use nom::character::complete::{digit1, space0, space1};
use nom::combinator::map_res;
use nom::multi::separated_list0;
use nom::sequence::{preceded, separated_pair};
use nom::IResult;

use crate::error::ColoringError;
use crate::instance::Instance;

/// reads an instance file in the given format
pub fn read_instance(path: &str, format: &str) -> Result<Instance, ColoringError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ColoringError::io(path, source))?;
    let mut instance = match format {
        "dimacs" => dimacs::read(&content, path),
        "dimacs2010" => dimacs2010::read(&content, path),
        "matrixmarket" => matrixmarket::read(&content, path),
        "snap" => snap::read(&content, path),
        _ => Err(ColoringError::UnknownFormat(format.to_string())),
    }?;
    instance.set_name(path.to_string());
    Ok(instance)
}

/// writes an instance file in the given format
pub fn write_instance(instance: &Instance, path: &str, format: &str) -> Result<(), ColoringError> {
    let content = match format {
        "dimacs" => dimacs::write(instance),
        "dimacs2010" => dimacs2010::write(instance),
        "matrixmarket" => matrixmarket::write(instance),
        "snap" => snap::write(instance),
        _ => return Err(ColoringError::UnknownFormat(format.to_string())),
    };
    std::fs::write(path, content)
        .map_err(|source| ColoringError::io(path, source))
}

/// parses an unsigned integer
pub(crate) fn integer(s: &str) -> IResult<&str, usize> {
    map_res(digit1, |digits: &str| digits.parse::<usize>())(s)
}

/// parses two space-separated integers
pub(crate) fn integer_pair(s: &str) -> IResult<&str, (usize, usize)> {
    separated_pair(integer, space1, integer)(s)
}

/// parses a possibly empty space-separated integer list
pub(crate) fn integer_list(s: &str) -> IResult<&str, Vec<usize>> {
    preceded(space0, separated_list0(space1, integer))(s)
}

/// rebases a 1-indexed vertex id, rejecting 0
pub(crate) fn one_indexed(v: usize, path: &str) -> Result<usize, ColoringError> {
    if v == 0 {
        return Err(ColoringError::parse(path, "vertex indices are 1-indexed".to_string()));
    }
    Ok(v - 1)
}


#[cfg(test)]
mod tests {
    use super::*;

    /// K4 minus the edge (2,3)
    pub fn k4_minus_one_edge() -> Instance {
        let mut inst = Instance::new(4);
        for &(v1, v2) in [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3)].iter() {
            inst.add_edge(v1, v2).unwrap();
        }
        inst
    }

    /// normalized undirected edge set
    pub fn edge_set(inst: &Instance) -> Vec<(usize, usize)> {
        let mut res: Vec<(usize, usize)> = inst.edges().iter()
            .map(|&(v1, v2)| (v1.min(v2), v1.max(v2)))
            .collect();
        res.sort_unstable();
        res.dedup();
        res
    }

    #[test]
    fn test_unknown_format() {
        let inst = Instance::new(1);
        assert!(write_instance(&inst, "/tmp/unused", "graphml").is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let inst = k4_minus_one_edge();
        let path_buf = std::env::temp_dir().join(format!("rw_color_roundtrip_{}.col", std::process::id()));
        let path = path_buf.to_str().unwrap().to_string();
        write_instance(&inst, &path, "dimacs").unwrap();
        let reread = read_instance(&path, "dimacs").unwrap();
        assert_eq!(reread.nb_vertices(), inst.nb_vertices());
        assert_eq!(edge_set(&reread), edge_set(&inst));
        assert_eq!(reread.name(), path);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_instance("/nonexistent/instance.col", "dimacs").is_err());
    }
}
