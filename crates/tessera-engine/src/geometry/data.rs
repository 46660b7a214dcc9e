use super::{GeometryError, VertexLayout};

/// The single draw call issued for a piece of geometry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawCall {
    /// Non-indexed triangle list over `first..first + count` vertices.
    Arrays { first: u32, count: u32 },
    /// Indexed triangle list over the first `count` indices.
    Indexed { count: u32 },
}

impl DrawCall {
    /// Number of elements (vertices or indices) consumed by the draw.
    pub fn element_count(&self) -> u32 {
        match *self {
            DrawCall::Arrays { count, .. } | DrawCall::Indexed { count } => count,
        }
    }

    pub fn triangle_count(&self) -> u32 {
        self.element_count() / 3
    }
}

/// Validated, CPU-side geometry: interleaved vertex floats and optional 8-bit indices.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    layout: VertexLayout,
    vertices: Vec<f32>,
    indices: Option<Vec<u8>>,
}

impl GeometryData {
    pub fn new(
        layout: VertexLayout,
        vertices: Vec<f32>,
        indices: Option<Vec<u8>>,
    ) -> Result<Self, GeometryError> {
        if vertices.is_empty() {
            return Err(GeometryError::NoVertices);
        }

        let stride = layout.stride_floats();
        if vertices.len() % stride != 0 {
            return Err(GeometryError::RaggedVertices {
                floats: vertices.len(),
                stride,
            });
        }

        let vertex_count = vertices.len() / stride;

        if let Some(indices) = &indices {
            if indices.is_empty() || indices.len() % 3 != 0 {
                return Err(GeometryError::RaggedIndices { count: indices.len() });
            }
            if let Some((position, &index)) = indices
                .iter()
                .enumerate()
                .find(|(_, i)| usize::from(**i) >= vertex_count)
            {
                return Err(GeometryError::IndexOutOfRange {
                    index,
                    position,
                    vertex_count,
                });
            }
        }

        Ok(Self {
            layout,
            vertices,
            indices,
        })
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&[u8]> {
        self.indices.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.stride_floats()
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Resolves the draw call: all indices when indexed, otherwise every whole
    /// triangle from vertex 0.
    pub fn draw_call(&self) -> DrawCall {
        match &self.indices {
            Some(indices) => DrawCall::Indexed {
                count: indices.len() as u32,
            },
            None => DrawCall::Arrays {
                first: 0,
                count: (self.vertex_count() / 3 * 3) as u32,
            },
        }
    }

    /// Vertex triples of every triangle the draw call assembles.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [u32::from(t[0]), u32::from(t[1]), u32::from(t[2])])
                .collect(),
            None => {
                let count = self.draw_call().element_count();
                (0..count / 3).map(|t| [3 * t, 3 * t + 1, 3 * t + 2]).collect()
            }
        }
    }

    /// Indices widened to `u16`; wgpu has no 8-bit index format.
    pub(crate) fn gpu_indices(&self) -> Option<Vec<u16>> {
        self.indices
            .as_ref()
            .map(|i| i.iter().copied().map(u16::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colored() -> VertexLayout {
        VertexLayout::interleaved(&[(0, 3), (1, 3)]).unwrap()
    }

    fn positions() -> VertexLayout {
        VertexLayout::interleaved(&[(0, 3)]).unwrap()
    }

    #[test]
    fn non_indexed_draws_first_three_vertices() {
        let g = GeometryData::new(positions(), vec![0.0; 9], None).unwrap();
        assert_eq!(g.draw_call(), DrawCall::Arrays { first: 0, count: 3 });
        assert_eq!(g.triangles(), vec![[0, 1, 2]]);
    }

    #[test]
    fn non_indexed_ignores_trailing_partial_triangle() {
        let g = GeometryData::new(positions(), vec![0.0; 15], None).unwrap();
        assert_eq!(g.vertex_count(), 5);
        assert_eq!(g.draw_call().element_count(), 3);
    }

    #[test]
    fn indexed_draw_counts_indices() {
        let g = GeometryData::new(colored(), vec![0.0; 30], Some(vec![0, 1, 2, 0, 3, 4])).unwrap();
        assert_eq!(g.draw_call(), DrawCall::Indexed { count: 6 });
        assert_eq!(g.draw_call().triangle_count(), 2);
        assert_eq!(g.gpu_indices(), Some(vec![0u16, 1, 2, 0, 3, 4]));
    }

    #[test]
    fn rejects_ragged_vertices() {
        assert_eq!(
            GeometryData::new(colored(), vec![0.0; 10], None),
            Err(GeometryError::RaggedVertices { floats: 10, stride: 6 })
        );
    }

    #[test]
    fn rejects_empty_vertices() {
        assert_eq!(
            GeometryData::new(colored(), Vec::new(), None),
            Err(GeometryError::NoVertices)
        );
    }

    #[test]
    fn rejects_out_of_range_index() {
        assert_eq!(
            GeometryData::new(colored(), vec![0.0; 18], Some(vec![0, 1, 3])),
            Err(GeometryError::IndexOutOfRange { index: 3, position: 2, vertex_count: 3 })
        );
    }

    #[test]
    fn rejects_partial_index_triangle() {
        assert_eq!(
            GeometryData::new(colored(), vec![0.0; 18], Some(vec![0, 1])),
            Err(GeometryError::RaggedIndices { count: 2 })
        );
    }
}
