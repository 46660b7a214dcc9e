use std::fmt;
use std::str::FromStr;

use crate::shader::{sources, ShaderSources};

use super::{GeometryData, GeometryError, VertexLayout};

/// Built-in geometry + shader pairings.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Variant {
    /// One red triangle from three positions; non-indexed.
    Triangle,
    /// Four colored vertices, two indexed triangles sharing an edge.
    Quad,
    /// Five colored vertices, two indexed triangles sharing vertex 0.
    #[default]
    SharedVertex,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Triangle, Variant::Quad, Variant::SharedVertex];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Triangle => "triangle",
            Variant::Quad => "quad",
            Variant::SharedVertex => "shared-vertex",
        }
    }

    pub fn shader_sources(self) -> ShaderSources<'static> {
        match self {
            Variant::Triangle => sources::SOLID_RED,
            Variant::Quad | Variant::SharedVertex => sources::VERTEX_COLOR,
        }
    }

    pub fn geometry(self) -> Result<GeometryData, GeometryError> {
        match self {
            Variant::Triangle => GeometryData::new(
                VertexLayout::interleaved(&[(0, 3)])?,
                vec![
                    -0.5, -0.5, 0.0,
                    -0.5,  0.5, 0.0,
                     0.5, -0.5, 0.0,
                ],
                None,
            ),
            Variant::Quad => GeometryData::new(
                position_color()?,
                vec![
                    -0.5, -0.5, 0.0,   1.0, 0.0, 0.0,
                    -0.5,  0.5, 0.0,   0.0, 1.0, 0.0,
                     0.5, -0.5, 0.0,   0.0, 0.0, 1.0,
                     0.5,  0.5, 0.0,   1.0, 0.0, 1.0,
                ],
                Some(vec![0, 1, 2, 1, 2, 3]),
            ),
            Variant::SharedVertex => GeometryData::new(
                position_color()?,
                vec![
                     0.0,  0.0, 0.0,   1.0, 0.0, 0.0,
                    -0.5,  0.0, 0.0,   0.0, 1.0, 0.0,
                     0.0, -0.5, 0.0,   0.0, 0.0, 1.0,
                     0.5,  0.0, 0.0,   0.0, 1.0, 1.0,
                     0.0,  0.5, 0.0,   1.0, 0.0, 1.0,
                ],
                Some(vec![0, 1, 2, 0, 3, 4]),
            ),
        }
    }
}

fn position_color() -> Result<VertexLayout, GeometryError> {
    VertexLayout::interleaved(&[(0, 3), (1, 3)])
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown variant `{s}` (expected triangle, quad or shared-vertex)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DrawCall;
    use crate::shader::ShaderProgram;

    #[test]
    fn every_variant_builds_and_links() {
        for v in Variant::ALL {
            let geometry = v.geometry().unwrap();
            ShaderProgram::link(&v.shader_sources(), geometry.layout())
                .unwrap_or_else(|e| panic!("{v}: {e}"));
        }
    }

    #[test]
    fn shared_vertex_is_two_triangles_sharing_vertex_zero() {
        let g = Variant::SharedVertex.geometry().unwrap();
        assert_eq!(g.vertex_count(), 5);
        assert_eq!(g.draw_call(), DrawCall::Indexed { count: 6 });

        let tris = g.triangles();
        assert_eq!(tris, vec![[0, 1, 2], [0, 3, 4]]);
        assert!(tris.iter().all(|t| t.contains(&0)));
    }

    #[test]
    fn quad_is_two_indexed_triangles() {
        let g = Variant::Quad.geometry().unwrap();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.triangles(), vec![[0, 1, 2], [1, 2, 3]]);
    }

    #[test]
    fn triangle_draws_three_vertices_without_indices() {
        let g = Variant::Triangle.geometry().unwrap();
        assert!(!g.is_indexed());
        assert_eq!(g.draw_call(), DrawCall::Arrays { first: 0, count: 3 });
        assert_eq!(g.layout().stride_floats(), 3);
    }

    #[test]
    fn colored_variants_use_six_float_stride() {
        for v in [Variant::Quad, Variant::SharedVertex] {
            assert_eq!(v.geometry().unwrap().layout().stride_floats(), 6);
        }
    }

    #[test]
    fn parses_names() {
        assert_eq!("quad".parse::<Variant>(), Ok(Variant::Quad));
        assert_eq!("Shared-Vertex".parse::<Variant>(), Ok(Variant::SharedVertex));
        assert!("cube".parse::<Variant>().is_err());
        assert_eq!(Variant::default(), Variant::SharedVertex);
    }
}
