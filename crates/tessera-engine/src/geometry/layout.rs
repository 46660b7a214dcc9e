use super::GeometryError;

const FLOAT_SIZE: u64 = std::mem::size_of::<f32>() as u64;

/// One vertex input: `components` consecutive `f32`s starting at `offset`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    /// Shader input location (`@location(n)`).
    pub location: u32,

    /// Number of `f32` components, 1..=4.
    pub components: u32,

    /// Byte offset from the start of the vertex.
    pub offset: u64,
}

impl VertexAttribute {
    fn format(&self) -> wgpu::VertexFormat {
        match self.components {
            1 => wgpu::VertexFormat::Float32,
            2 => wgpu::VertexFormat::Float32x2,
            3 => wgpu::VertexFormat::Float32x3,
            _ => wgpu::VertexFormat::Float32x4,
        }
    }

    fn size(&self) -> u64 {
        u64::from(self.components) * FLOAT_SIZE
    }
}

/// Describes how interleaved vertex floats map onto shader input locations.
///
/// A layout is immutable once built. Use [`VertexLayout::interleaved`] for the
/// common tightly packed case.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: u64,
    wgpu_attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    /// Builds a tightly packed layout from `(location, components)` pairs, in order.
    ///
    /// `[(0, 3), (1, 3)]` yields position at offset 0, color at offset 12 and a
    /// 24-byte stride.
    pub fn interleaved(attributes: &[(u32, u32)]) -> Result<Self, GeometryError> {
        let mut offset = 0;
        let mut out = Vec::with_capacity(attributes.len());
        for &(location, components) in attributes {
            let attr = VertexAttribute { location, components, offset };
            offset += attr.size();
            out.push(attr);
        }
        Self::new(out, offset)
    }

    /// Builds a layout from explicit attribute descriptors and stride (bytes).
    pub fn new(attributes: Vec<VertexAttribute>, stride: u64) -> Result<Self, GeometryError> {
        if attributes.is_empty() {
            return Err(GeometryError::EmptyLayout);
        }
        if stride == 0 || stride % FLOAT_SIZE != 0 {
            return Err(GeometryError::BadStride { stride });
        }

        for (i, attr) in attributes.iter().enumerate() {
            if !(1..=4).contains(&attr.components) {
                return Err(GeometryError::BadComponentCount {
                    location: attr.location,
                    components: attr.components,
                });
            }
            if attr.offset % FLOAT_SIZE != 0 || attr.offset + attr.size() > stride {
                return Err(GeometryError::AttributeOutOfBounds {
                    location: attr.location,
                    offset: attr.offset,
                    stride,
                });
            }
            if attributes[..i].iter().any(|a| a.location == attr.location) {
                return Err(GeometryError::DuplicateLocation { location: attr.location });
            }
        }

        let wgpu_attributes = attributes
            .iter()
            .map(|a| wgpu::VertexAttribute {
                format: a.format(),
                offset: a.offset,
                shader_location: a.location,
            })
            .collect();

        Ok(Self {
            attributes,
            stride,
            wgpu_attributes,
        })
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Returns the attribute bound to `location`, if any.
    pub fn attribute(&self, location: u32) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.location == location)
    }

    /// Vertex stride in bytes.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Vertex stride in `f32`s.
    pub fn stride_floats(&self) -> usize {
        (self.stride / FLOAT_SIZE) as usize
    }

    /// Per-vertex buffer layout for pipeline creation. Borrows `self`.
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.wgpu_attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_position_color() {
        let layout = VertexLayout::interleaved(&[(0, 3), (1, 3)]).unwrap();
        assert_eq!(layout.stride(), 24);
        assert_eq!(layout.stride_floats(), 6);
        assert_eq!(layout.attribute(0).unwrap().offset, 0);
        assert_eq!(layout.attribute(1).unwrap().offset, 12);
        assert!(layout.attribute(2).is_none());
    }

    #[test]
    fn interleaved_position_only() {
        let layout = VertexLayout::interleaved(&[(0, 3)]).unwrap();
        assert_eq!(layout.stride_floats(), 3);
    }

    #[test]
    fn buffer_layout_matches_attributes() {
        let layout = VertexLayout::interleaved(&[(0, 3), (1, 3)]).unwrap();
        let bl = layout.buffer_layout();
        assert_eq!(bl.array_stride, 24);
        assert_eq!(bl.attributes.len(), 2);
        assert_eq!(bl.attributes[1].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(bl.attributes[1].offset, 12);
        assert_eq!(bl.attributes[1].shader_location, 1);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(VertexLayout::interleaved(&[]), Err(GeometryError::EmptyLayout));
    }

    #[test]
    fn rejects_duplicate_location() {
        assert_eq!(
            VertexLayout::interleaved(&[(0, 3), (0, 3)]),
            Err(GeometryError::DuplicateLocation { location: 0 })
        );
    }

    #[test]
    fn rejects_bad_component_count() {
        assert!(matches!(
            VertexLayout::interleaved(&[(0, 5)]),
            Err(GeometryError::BadComponentCount { location: 0, components: 5 })
        ));
    }

    #[test]
    fn rejects_attribute_past_stride() {
        let attrs = vec![
            VertexAttribute { location: 0, components: 3, offset: 0 },
            VertexAttribute { location: 1, components: 3, offset: 12 },
        ];
        // Stride of 3 floats cannot hold the color attribute.
        assert!(matches!(
            VertexLayout::new(attrs, 12),
            Err(GeometryError::AttributeOutOfBounds { location: 1, .. })
        ));
    }
}
