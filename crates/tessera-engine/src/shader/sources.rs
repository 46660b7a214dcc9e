//! Embedded WGSL sources.

/// WGSL text for a vertex/fragment pair.
#[derive(Debug, Copy, Clone)]
pub struct ShaderSources<'a> {
    pub label: &'a str,
    pub vertex: &'a str,
    pub fragment: &'a str,
}

/// Passes `@location(1)` vertex color through to the fragment.
pub const VERTEX_COLOR: ShaderSources<'static> = ShaderSources {
    label: "vertex color",
    vertex: include_str!("shaders/position_color.vert.wgsl"),
    fragment: include_str!("shaders/vertex_color.frag.wgsl"),
};

/// Position-only input, constant red output.
pub const SOLID_RED: ShaderSources<'static> = ShaderSources {
    label: "solid red",
    vertex: include_str!("shaders/position.vert.wgsl"),
    fragment: include_str!("shaders/solid_red.frag.wgsl"),
};
