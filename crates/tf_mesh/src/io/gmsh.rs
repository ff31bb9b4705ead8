// crates/tf_mesh/src/io/gmsh.rs

//! Gmsh ASCII reader and writer
//!
//! Reads formats 2.x and 4.x into a [`MeshSource`]. Only 3-node triangles
//! (element type 2) become cells; 2-node lines (type 1) are kept as
//! boundary segments with their physical tags so a driver can map named
//! boundaries onto edges. Everything else is skipped. The node `z`
//! coordinate is stored as elevation.
//!
//! A v2 element carries its physical tag directly. A v4 element only names
//! the geometric entity it lies on; its physical groups come from the
//! curve records of `$Entities`.
//!
//! # Example
//!
//! ```ignore
//! use tf_mesh::io::gmsh::GmshLoader;
//!
//! let gmsh = GmshLoader::load("bowl.msh")?;
//! let mesh = TriangularMesh::build(&gmsh.source)?;
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

use crate::error::{MeshError, MeshResult};
use crate::unstructured::{MeshSource, SourceNode, SourceTriangle};

const FORMAT: &str = "gmsh";

/// Boundary segment read from a line element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundarySegment {
    /// Physical groups the segment belongs to, empty when it is in none
    pub physical: Vec<i64>,
    /// Node tags
    pub nodes: [i64; 2],
}

impl BoundarySegment {
    /// Member of physical group `tag`?
    pub fn in_group(&self, tag: i64) -> bool {
        self.physical.contains(&tag)
    }
}

/// Content of a Gmsh file
#[derive(Debug, Clone, Default)]
pub struct GmshMesh {
    /// Nodes and triangles
    pub source: MeshSource,
    /// Line elements
    pub segments: Vec<BoundarySegment>,
    /// `$PhysicalNames`, lower-cased
    pub physical_names: HashMap<i64, String>,
}

impl GmshMesh {
    /// Name of a physical group
    pub fn physical_name(&self, tag: i64) -> Option<&str> {
        self.physical_names.get(&tag).map(String::as_str)
    }

    /// Segments in any physical group whose name matches one of `names`,
    /// ignoring case
    pub fn segments_named<'a>(&'a self, names: &'a [String]) -> impl Iterator<Item = &'a BoundarySegment> + 'a {
        self.segments.iter().filter(move |seg| {
            seg.physical.iter().any(|&tag| {
                self.physical_name(tag)
                    .is_some_and(|name| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
            })
        })
    }
}

/// Physical tags of the curve entities in `$Entities`
type CurveGroups = HashMap<i64, Vec<i64>>;

/// Line iterator that remembers the current line number
struct LineCursor<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> LineCursor<R> {
    fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line: 0 }
    }

    fn next_line(&mut self) -> MeshResult<Option<String>> {
        match self.lines.next() {
            None => Ok(None),
            Some(l) => {
                self.line += 1;
                Ok(Some(l?))
            }
        }
    }

    /// Next non-empty line, failing at end of file
    fn expect_line(&mut self, what: &str) -> MeshResult<String> {
        loop {
            match self.next_line()? {
                Some(l) if l.trim().is_empty() => continue,
                Some(l) => return Ok(l),
                None => return Err(self.error(format!("unexpected end of file, expected {}", what))),
            }
        }
    }

    fn skip_to(&mut self, end: &str) -> MeshResult<()> {
        while let Some(l) = self.next_line()? {
            if l.trim() == end {
                return Ok(());
            }
        }
        Err(self.error(format!("missing {}", end)))
    }

    fn error(&self, message: impl Into<String>) -> MeshError {
        MeshError::format(FORMAT, self.line, message)
    }

    fn parse<T: std::str::FromStr>(&self, token: Option<&str>, what: &str) -> MeshResult<T> {
        token
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| self.error(format!("invalid {}", what)))
    }
}

/// Gmsh file loader
pub struct GmshLoader;

impl GmshLoader {
    /// Load a `.msh` file
    pub fn load<P: AsRef<Path>>(path: P) -> MeshResult<GmshMesh> {
        let file = File::open(path.as_ref())?;
        Self::load_from_reader(BufReader::new(file))
    }

    /// Load from any buffered reader
    pub fn load_from_reader<R: BufRead>(reader: R) -> MeshResult<GmshMesh> {
        let mut cur = LineCursor::new(reader);
        let mut mesh = GmshMesh::default();
        let mut version = 2.2_f64;
        let mut curves = CurveGroups::new();

        while let Some(line) = cur.next_line()? {
            match line.trim() {
                "$MeshFormat" => {
                    let fmt = cur.expect_line("format line")?;
                    let mut it = fmt.split_whitespace();
                    version = cur.parse(it.next(), "format version")?;
                    let file_type: u8 = cur.parse(it.next(), "file type")?;
                    if file_type != 0 {
                        return Err(cur.error("binary files are not supported"));
                    }
                    cur.skip_to("$EndMeshFormat")?;
                }
                "$PhysicalNames" => mesh.physical_names = Self::parse_physical_names(&mut cur)?,
                "$Entities" => curves = Self::parse_entities(&mut cur, version)?,
                "$Nodes" => {
                    mesh.source.nodes = if version >= 4.0 {
                        Self::parse_nodes_v4(&mut cur)?
                    } else {
                        Self::parse_nodes_v2(&mut cur)?
                    };
                }
                "$Elements" => {
                    if version >= 4.0 {
                        Self::parse_elements_v4(&mut cur, &mut mesh, &curves)?
                    } else {
                        Self::parse_elements_v2(&mut cur, &mut mesh)?
                    }
                }
                _ => {}
            }
        }

        log::debug!(
            "gmsh v{}: {} nodes, {} triangles, {} boundary segments",
            version,
            mesh.source.nodes.len(),
            mesh.source.triangles.len(),
            mesh.segments.len()
        );
        Ok(mesh)
    }

    fn parse_physical_names<R: BufRead>(cur: &mut LineCursor<R>) -> MeshResult<HashMap<i64, String>> {
        let mut names = HashMap::new();
        cur.expect_line("physical name count")?;
        loop {
            let line = cur.expect_line("$EndPhysicalNames")?;
            let t = line.trim();
            if t == "$EndPhysicalNames" {
                return Ok(names);
            }
            let parts: Vec<&str> = t.split_whitespace().collect();
            if parts.len() >= 3 {
                let tag: i64 = cur.parse(Some(parts[1]), "physical tag")?;
                let name = parts[2..].join(" ").trim_matches('"').to_lowercase();
                names.insert(tag, name);
            }
        }
    }

    /// Curve entity tag to physical tags. Points and surfaces are read past;
    /// v4.0 points carry a bounding box, v4.1 points a single position.
    fn parse_entities<R: BufRead>(cur: &mut LineCursor<R>, version: f64) -> MeshResult<CurveGroups> {
        let header = cur.expect_line("entity counts")?;
        let mut it = header.split_whitespace();
        let n_points: usize = cur.parse(it.next(), "point entity count")?;
        let n_curves: usize = cur.parse(it.next(), "curve entity count")?;

        let point_coords = if version >= 4.1 { 3 } else { 6 };
        for _ in 0..n_points {
            let line = cur.expect_line("point entity")?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            let n_phys: usize = cur.parse(parts.get(1 + point_coords).copied(), "point physical count")?;
            if parts.len() < 2 + point_coords + n_phys {
                return Err(cur.error("truncated point entity"));
            }
        }

        let mut curves = CurveGroups::with_capacity(n_curves);
        for _ in 0..n_curves {
            let line = cur.expect_line("curve entity")?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            let tag: i64 = cur.parse(parts.first().copied(), "curve tag")?;
            // tag, bounding box, physical count
            let n_phys: usize = cur.parse(parts.get(7).copied(), "curve physical count")?;
            let physical = (0..n_phys)
                .map(|k| cur.parse(parts.get(8 + k).copied(), "curve physical tag"))
                .collect::<MeshResult<Vec<i64>>>()?;
            curves.insert(tag, physical);
        }
        cur.skip_to("$EndEntities")?;
        Ok(curves)
    }

    fn parse_nodes_v2<R: BufRead>(cur: &mut LineCursor<R>) -> MeshResult<Vec<SourceNode>> {
        let count_line = cur.expect_line("node count")?;
        let count: usize = cur.parse(Some(count_line.trim()), "node count")?;
        let mut nodes = Vec::with_capacity(count);
        for _ in 0..count {
            let line = cur.expect_line("node")?;
            let mut it = line.split_whitespace();
            let tag = cur.parse(it.next(), "node tag")?;
            let x = cur.parse(it.next(), "x coordinate")?;
            let y = cur.parse(it.next(), "y coordinate")?;
            let z = cur.parse(it.next(), "z coordinate")?;
            nodes.push(SourceNode { tag, x, y, elevation: Some(z) });
        }
        cur.skip_to("$EndNodes")?;
        Ok(nodes)
    }

    fn parse_nodes_v4<R: BufRead>(cur: &mut LineCursor<R>) -> MeshResult<Vec<SourceNode>> {
        let header = cur.expect_line("node header")?;
        let mut it = header.split_whitespace();
        let n_blocks: usize = cur.parse(it.next(), "entity block count")?;
        let total: usize = cur.parse(it.next(), "node count")?;
        let mut nodes = Vec::with_capacity(total);

        for _ in 0..n_blocks {
            let block = cur.expect_line("node block header")?;
            let mut it = block.split_whitespace();
            let _dim: i64 = cur.parse(it.next(), "entity dimension")?;
            let _entity: i64 = cur.parse(it.next(), "entity tag")?;
            let parametric: u8 = cur.parse(it.next(), "parametric flag")?;
            let n: usize = cur.parse(it.next(), "block node count")?;
            if parametric != 0 {
                return Err(cur.error("parametric nodes are not supported"));
            }

            let mut tags = Vec::with_capacity(n);
            for _ in 0..n {
                let line = cur.expect_line("node tag")?;
                tags.push(cur.parse::<i64>(Some(line.trim()), "node tag")?);
            }
            for tag in tags {
                let line = cur.expect_line("node coordinates")?;
                let mut it = line.split_whitespace();
                let x = cur.parse(it.next(), "x coordinate")?;
                let y = cur.parse(it.next(), "y coordinate")?;
                let z = cur.parse(it.next(), "z coordinate")?;
                nodes.push(SourceNode { tag, x, y, elevation: Some(z) });
            }
        }
        cur.skip_to("$EndNodes")?;
        Ok(nodes)
    }

    fn parse_elements_v2<R: BufRead>(cur: &mut LineCursor<R>, mesh: &mut GmshMesh) -> MeshResult<()> {
        let count_line = cur.expect_line("element count")?;
        let count: usize = cur.parse(Some(count_line.trim()), "element count")?;
        for _ in 0..count {
            let line = cur.expect_line("element")?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            let tag: i64 = cur.parse(parts.first().copied(), "element tag")?;
            let elem_type: u32 = cur.parse(parts.get(1).copied(), "element type")?;
            let n_tags: usize = cur.parse(parts.get(2).copied(), "tag count")?;
            // tag 0 is "no physical group"
            let physical: Vec<i64> = if n_tags > 0 {
                let tag: i64 = cur.parse(parts.get(3).copied(), "physical tag")?;
                if tag != 0 { vec![tag] } else { Vec::new() }
            } else {
                Vec::new()
            };
            let nodes = &parts[(3 + n_tags).min(parts.len())..];
            Self::push_element(cur, mesh, tag, elem_type, &physical, nodes)?;
        }
        cur.skip_to("$EndElements")
    }

    fn parse_elements_v4<R: BufRead>(
        cur: &mut LineCursor<R>,
        mesh: &mut GmshMesh,
        curves: &CurveGroups,
    ) -> MeshResult<()> {
        let header = cur.expect_line("element header")?;
        let n_blocks: usize = cur.parse(header.split_whitespace().next(), "entity block count")?;
        for _ in 0..n_blocks {
            let block = cur.expect_line("element block header")?;
            let mut it = block.split_whitespace();
            let dim: i64 = cur.parse(it.next(), "entity dimension")?;
            let entity: i64 = cur.parse(it.next(), "entity tag")?;
            let elem_type: u32 = cur.parse(it.next(), "element type")?;
            let n: usize = cur.parse(it.next(), "block element count")?;
            let physical: &[i64] = match dim {
                1 => curves.get(&entity).map_or(&[], Vec::as_slice),
                _ => &[],
            };
            for _ in 0..n {
                let line = cur.expect_line("element")?;
                let parts: Vec<&str> = line.split_whitespace().collect();
                let tag: i64 = cur.parse(parts.first().copied(), "element tag")?;
                Self::push_element(cur, mesh, tag, elem_type, physical, &parts[1..])?;
            }
        }
        cur.skip_to("$EndElements")
    }

    fn push_element<R: BufRead>(
        cur: &LineCursor<R>,
        mesh: &mut GmshMesh,
        tag: i64,
        elem_type: u32,
        physical: &[i64],
        nodes: &[&str],
    ) -> MeshResult<()> {
        match elem_type {
            1 => {
                let a = cur.parse(nodes.first().copied(), "line node")?;
                let b = cur.parse(nodes.get(1).copied(), "line node")?;
                mesh.segments.push(BoundarySegment { physical: physical.to_vec(), nodes: [a, b] });
            }
            2 => {
                let a = cur.parse(nodes.first().copied(), "triangle node")?;
                let b = cur.parse(nodes.get(1).copied(), "triangle node")?;
                let c = cur.parse(nodes.get(2).copied(), "triangle node")?;
                mesh.source.triangles.push(SourceTriangle { tag, nodes: [a, b, c] });
            }
            _ => {}
        }
        Ok(())
    }
}

/// Gmsh v2.2 ASCII writer
pub struct GmshWriter;

impl GmshWriter {
    /// Write a description to a `.msh` file
    pub fn write<P: AsRef<Path>>(path: P, source: &MeshSource) -> MeshResult<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        Self::write_to(&mut writer, source)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a description to any writer
    pub fn write_to<W: Write>(w: &mut W, source: &MeshSource) -> MeshResult<()> {
        writeln!(w, "$MeshFormat\n2.2 0 8\n$EndMeshFormat")?;
        writeln!(w, "$Nodes\n{}", source.nodes.len())?;
        for n in &source.nodes {
            writeln!(w, "{} {} {} {}", n.tag, n.x, n.y, n.elevation.unwrap_or(0.0))?;
        }
        writeln!(w, "$EndNodes\n$Elements\n{}", source.triangles.len())?;
        for t in &source.triangles {
            writeln!(w, "{} 2 2 0 1 {} {} {}", t.tag, t.nodes[0], t.nodes[1], t.nodes[2])?;
        }
        writeln!(w, "$EndElements")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::MeshTopology;
    use crate::unstructured::TriangularMesh;
    use std::io::Cursor;

    const SQUARE_V2: &str = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$PhysicalNames
2
1 7 \"open\"
2 8 \"domain\"
$EndPhysicalNames
$Nodes
4
1 0 0 -1
2 1 0 -1
3 1 1 -0.5
4 0 1 -0.5
$EndNodes
$Elements
4
1 1 2 7 1 2 3
2 15 2 0 1 1
3 2 2 8 1 1 2 3
4 2 2 8 1 1 3 4
$EndElements
";

    const SQUARE_V4: &str = "\
$MeshFormat
4.1 0 8
$EndMeshFormat
$Nodes
1 4 1 4
2 1 0 4
1
2
3
4
0 0 0
1 0 0
1 1 0
0 1 0
$EndNodes
$Elements
2 3 1 3
1 5 1 1
1 1 2
2 1 2 2
2 1 2 3
3 1 3 4
$EndElements
";

    #[test]
    fn test_load_v2() {
        let g = GmshLoader::load_from_reader(Cursor::new(SQUARE_V2)).unwrap();
        assert_eq!(g.source.nodes.len(), 4);
        assert_eq!(g.source.triangles.len(), 2);
        assert_eq!(g.segments, vec![BoundarySegment { physical: vec![7], nodes: [2, 3] }]);
        assert_eq!(g.physical_name(7), Some("open"));
        assert_eq!(g.source.nodes[2].elevation, Some(-0.5));

        let mesh = TriangularMesh::build(&g.source).unwrap();
        assert!((mesh.total_area() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_load_v4() {
        let g = GmshLoader::load_from_reader(Cursor::new(SQUARE_V4)).unwrap();
        assert_eq!(g.source.nodes.len(), 4);
        assert_eq!(g.source.triangles.len(), 2);
        assert_eq!(g.segments.len(), 1);
        // no $Entities, so no groups
        assert!(g.segments[0].physical.is_empty());
        let mesh = TriangularMesh::build(&g.source).unwrap();
        assert_eq!(mesh.neighbor_of(0, 2), Some(1));
    }

    /// Curve entity 5 is in physical group 2 "open"; curve entity 2 lies
    /// on segment 1-2 and is in no group.
    const SQUARE_V4_ENTITIES: &str = "\
$MeshFormat
4.1 0 8
$EndMeshFormat
$PhysicalNames
2
1 2 \"open\"
2 3 \"domain\"
$EndPhysicalNames
$Entities
1 2 1 0
1 0 0 0 0
2 0 0 0 1 0 0 0 2 1 -2
5 1 0 0 1 1 0 1 2 2 2 -3
1 0 0 0 1 1 0 1 3 0
$EndEntities
$Nodes
1 4 1 4
2 1 0 4
1
2
3
4
0 0 0
1 0 0
1 1 0
0 1 0
$EndNodes
$Elements
3 4 1 4
1 2 1 1
1 1 2
1 5 1 1
2 2 3
2 1 2 2
3 1 2 3
4 1 3 4
$EndElements
";

    #[test]
    fn test_load_v4_entity_groups() {
        let g = GmshLoader::load_from_reader(Cursor::new(SQUARE_V4_ENTITIES)).unwrap();
        assert_eq!(g.source.triangles.len(), 2);
        assert_eq!(
            g.segments,
            vec![
                BoundarySegment { physical: vec![], nodes: [1, 2] },
                BoundarySegment { physical: vec![2], nodes: [2, 3] },
            ]
        );
        assert!(!g.segments[0].in_group(2));
        assert!(g.segments[1].in_group(2));

        let open = ["open".to_string()];
        let named: Vec<_> = g.segments_named(&open).map(|s| s.nodes).collect();
        assert_eq!(named, vec![[2, 3]]);
    }

    #[test]
    fn test_load_v40_point_entities() {
        // v4.0 points carry a bounding box
        let text = "$MeshFormat\n4 0 8\n$EndMeshFormat\n$Entities\n1 1 0 0\n\
                    1 0 0 0 0 0 0 0\n\
                    4 0 0 0 1 0 0 1 9 2 1 -1\n$EndEntities\n";
        let g = GmshLoader::load_from_reader(Cursor::new(text)).unwrap();
        assert!(g.segments.is_empty());
        let mut cur = LineCursor::new(Cursor::new("1 1 0 0\n1 0 0 0 0 0 0 0\n4 0 0 0 1 0 0 1 9 2 1 -1\n$EndEntities\n"));
        let curves = GmshLoader::parse_entities(&mut cur, 4.0).unwrap();
        assert_eq!(curves.get(&4), Some(&vec![9]));
    }

    #[test]
    fn test_truncated_file() {
        let text = "$MeshFormat\n2.2 0 8\n$EndMeshFormat\n$Nodes\n3\n1 0 0 0\n";
        let err = GmshLoader::load_from_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, MeshError::Format { .. }));
    }

    #[test]
    fn test_bad_number() {
        let text = "$MeshFormat\n2.2 0 8\n$EndMeshFormat\n$Nodes\n1\n1 zero 0 0\n$EndNodes\n";
        match GmshLoader::load_from_reader(Cursor::new(text)) {
            Err(MeshError::Format { line, .. }) => assert_eq!(line, 6),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_write_then_load() {
        let g = GmshLoader::load_from_reader(Cursor::new(SQUARE_V2)).unwrap();
        let mut buf = Vec::new();
        GmshWriter::write_to(&mut buf, &g.source).unwrap();
        let back = GmshLoader::load_from_reader(Cursor::new(buf)).unwrap();
        assert_eq!(back.source.nodes, g.source.nodes);
        assert_eq!(back.source.triangles, g.source.triangles);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.msh");
        let g = GmshLoader::load_from_reader(Cursor::new(SQUARE_V2)).unwrap();
        GmshWriter::write(&path, &g.source).unwrap();

        let back = GmshLoader::load(&path).unwrap();
        let mesh = TriangularMesh::build(&back.source).unwrap();
        assert_eq!(mesh.n_triangles(), 2);
        assert_eq!(mesh.node_elevation(2), Some(-0.5));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GmshLoader::load(dir.path().join("absent.msh")).is_err());
    }
}
