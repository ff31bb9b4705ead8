// crates/tf_physics/tests/common/mod.rs

//! Shared mesh and engine helpers for the integration tests

#![allow(dead_code)]

use tf_mesh::{MeshSource, TriangularMesh};

/// Square `[0, length]²` split into `n × n` cells, interior nodes shifted
/// by up to 20 % of the spacing, diagonals alternating
pub fn jittered_mesh(n: usize, length: f64) -> TriangularMesh {
    let h = length / n as f64;
    let tag = |i: usize, j: usize| (j * (n + 1) + i + 1) as i64;
    let mut source = MeshSource::new();
    for j in 0..=n {
        for i in 0..=n {
            let interior = i > 0 && i < n && j > 0 && j < n;
            let (dx, dy) = if interior {
                let s = i as f64 * 1.7 + j as f64 * 2.3;
                (0.2 * h * s.sin(), 0.2 * h * (1.3 * s).cos())
            } else {
                (0.0, 0.0)
            };
            source.push_node(tag(i, j), i as f64 * h + dx, j as f64 * h + dy);
        }
    }
    let mut t = 1;
    for j in 0..n {
        for i in 0..n {
            let (a, b, c, d) = (tag(i, j), tag(i + 1, j), tag(i + 1, j + 1), tag(i, j + 1));
            let pair = if (i + j) % 2 == 0 {
                [[a, b, c], [a, c, d]]
            } else {
                [[a, b, d], [b, c, d]]
            };
            for tri in pair {
                source.push_triangle(t, tri);
                t += 1;
            }
        }
    }
    match TriangularMesh::build(&source) {
        Ok(mesh) => mesh,
        Err(e) => panic!("test mesh is invalid: {e}"),
    }
}
