use super::{GfxError, RootSignature, Shader, ShaderStage};

/// Places an element directly after the previous one.
pub const APPEND_ALIGNED_ELEMENT: u64 = u64::MAX;

/// Upper bound on simultaneously bound render targets.
pub const MAX_RENDER_TARGETS: usize = 8;

/// One vertex attribute in an input layout.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InputElement {
    pub semantic_name: &'static str,
    pub semantic_index: u32,
    pub format: wgpu::VertexFormat,
    /// Byte offset inside the vertex, or [`APPEND_ALIGNED_ELEMENT`].
    pub aligned_byte_offset: u64,
}

impl InputElement {
    pub const fn new(semantic_name: &'static str, format: wgpu::VertexFormat) -> Self {
        Self {
            semantic_name,
            semantic_index: 0,
            format,
            aligned_byte_offset: APPEND_ALIGNED_ELEMENT,
        }
    }
}

/// Resolved vertex layout for a single vertex buffer slot.
///
/// Elements map to shader locations in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct InputLayout {
    elements: Vec<InputElement>,
    attributes: Vec<wgpu::VertexAttribute>,
    stride: u64,
}

impl InputLayout {
    pub fn new(elements: &[InputElement]) -> Self {
        let mut attributes = Vec::with_capacity(elements.len());
        let mut cursor = 0u64;
        let mut stride = 0u64;

        for (location, e) in elements.iter().enumerate() {
            let offset = if e.aligned_byte_offset == APPEND_ALIGNED_ELEMENT {
                cursor.next_multiple_of(attribute_alignment(e.format))
            } else {
                e.aligned_byte_offset
            };
            let end = offset + e.format.size();

            attributes.push(wgpu::VertexAttribute {
                format: e.format,
                offset,
                shader_location: location as u32,
            });

            cursor = end;
            stride = stride.max(end);
        }

        Self {
            elements: elements.to_vec(),
            attributes,
            stride: stride.next_multiple_of(wgpu::VERTEX_ALIGNMENT),
        }
    }

    /// Rejects explicit offsets that break attribute alignment.
    pub fn check_alignment(&self) -> Result<(), GfxError> {
        match self
            .attributes
            .iter()
            .find(|a| a.offset % attribute_alignment(a.format) != 0)
        {
            Some(a) => Err(GfxError::MisalignedElement {
                location: a.shader_location,
                offset: a.offset,
            }),
            None => Ok(()),
        }
    }

    pub fn elements(&self) -> &[InputElement] {
        &self.elements
    }

    pub fn attributes(&self) -> &[wgpu::VertexAttribute] {
        &self.attributes
    }

    /// Size of one vertex in bytes.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    fn provides(&self, location: u32) -> bool {
        self.attributes.iter().any(|a| a.shader_location == location)
    }
}

/// Required offset alignment for an attribute: its size, capped at 4 bytes.
fn attribute_alignment(format: wgpu::VertexFormat) -> u64 {
    format.size().min(4)
}

/// Output-merger blend configuration for every render target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlendDesc {
    pub write_mask: wgpu::ColorWrites,
    /// `None` writes source color unchanged.
    pub blend: Option<wgpu::BlendState>,
}

impl Default for BlendDesc {
    fn default() -> Self {
        Self {
            write_mask: wgpu::ColorWrites::ALL,
            blend: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RasterizerDesc {
    pub cull_mode: Option<wgpu::Face>,
    pub fill_mode: wgpu::PolygonMode,
    pub front_face: wgpu::FrontFace,
}

impl Default for RasterizerDesc {
    fn default() -> Self {
        Self {
            cull_mode: Some(wgpu::Face::Back),
            fill_mode: wgpu::PolygonMode::Fill,
            front_face: wgpu::FrontFace::Ccw,
        }
    }
}

impl RasterizerDesc {
    /// Returns `true` if a triangle with these clip-space vertices is discarded
    /// before rasterization.
    ///
    /// Winding is evaluated in normalized device coordinates (+Y up).
    /// Zero-area triangles are always discarded.
    pub fn is_culled(&self, clip: [[f32; 4]; 3]) -> bool {
        let ndc = clip.map(|p| [p[0] / p[3], p[1] / p[3]]);
        let [a, b, c] = ndc;
        let area2 = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);

        if area2 == 0.0 || !area2.is_finite() {
            return true;
        }

        let ccw = area2 > 0.0;
        let front = match self.front_face {
            wgpu::FrontFace::Ccw => ccw,
            wgpu::FrontFace::Cw => !ccw,
        };

        match self.cull_mode {
            None => false,
            Some(wgpu::Face::Back) => !front,
            Some(wgpu::Face::Front) => front,
        }
    }
}

/// Everything needed to build a [`PipelineState`].
#[derive(Debug, Clone)]
pub struct GraphicsPipelineDesc<'a> {
    pub root_signature: &'a RootSignature,
    pub input_layout: &'a InputLayout,
    pub vs: &'a Shader,
    pub ps: &'a Shader,
    pub blend: BlendDesc,
    pub rasterizer: RasterizerDesc,
    pub rtv_formats: Vec<wgpu::TextureFormat>,
    pub topology: wgpu::PrimitiveTopology,
    pub sample_count: u32,
    pub sample_mask: u64,
}

impl GraphicsPipelineDesc<'_> {
    /// Checks stage assignment, shader linkage and output-merger settings.
    pub fn validate(&self) -> Result<(), GfxError> {
        self.input_layout.check_alignment()?;
        link_stages(self.input_layout, self.vs, self.ps)?;
        check_targets(&self.rtv_formats, self.sample_count)
    }
}

/// Checks the render target count and sample count.
pub fn check_targets(formats: &[wgpu::TextureFormat], sample_count: u32) -> Result<(), GfxError> {
    if formats.is_empty() {
        return Err(GfxError::InvalidPipeline("no render target formats"));
    }
    if formats.len() > MAX_RENDER_TARGETS {
        return Err(GfxError::InvalidPipeline("too many render targets"));
    }
    if !sample_count.is_power_of_two() {
        return Err(GfxError::InvalidPipeline("sample count must be a power of two"));
    }
    Ok(())
}

/// Verifies that `vs` and `ps` sit in the right slots and that every input
/// location is fed by the previous stage.
pub fn link_stages(input_layout: &InputLayout, vs: &Shader, ps: &Shader) -> Result<(), GfxError> {
    expect_stage("VS", ShaderStage::Vertex, vs)?;
    expect_stage("PS", ShaderStage::Pixel, ps)?;

    if let Some(missing) = vs
        .input_locations()
        .into_iter()
        .find(|&loc| !input_layout.provides(loc))
    {
        return Err(GfxError::MissingVertexAttribute(missing));
    }

    let written = vs.output_locations();
    if let Some(unlinked) = ps
        .input_locations()
        .into_iter()
        .find(|loc| !written.contains(loc))
    {
        return Err(GfxError::UnlinkedLocation(unlinked));
    }

    Ok(())
}

fn expect_stage(slot: &'static str, expected: ShaderStage, shader: &Shader) -> Result<(), GfxError> {
    if shader.stage() == expected {
        Ok(())
    } else {
        Err(GfxError::StageMismatch {
            slot,
            expected,
            found: shader.stage(),
        })
    }
}

/// Compiled render pipeline (PSO).
#[derive(Debug)]
pub struct PipelineState {
    pipeline: wgpu::RenderPipeline,
}

impl PipelineState {
    pub fn create(device: &wgpu::Device, desc: &GraphicsPipelineDesc<'_>) -> Result<Self, GfxError> {
        desc.validate()?;

        let required = match desc.rasterizer.fill_mode {
            wgpu::PolygonMode::Fill => wgpu::Features::empty(),
            wgpu::PolygonMode::Line => wgpu::Features::POLYGON_MODE_LINE,
            wgpu::PolygonMode::Point => wgpu::Features::POLYGON_MODE_POINT,
        };
        if !device.features().contains(required) {
            return Err(GfxError::InvalidPipeline(
                "fill mode is not supported by this device",
            ));
        }

        let vs_module = desc.vs.module(device);
        let ps_module = desc.ps.module(device);

        let targets: Vec<Option<wgpu::ColorTargetState>> = desc
            .rtv_formats
            .iter()
            .map(|&format| {
                Some(wgpu::ColorTargetState {
                    format,
                    blend: desc.blend.blend,
                    write_mask: desc.blend.write_mask,
                })
            })
            .collect();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("trigon pipeline state"),
            layout: Some(desc.root_signature.get()),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(desc.vs.entry_point()),
                compilation_options: Default::default(),
                buffers: &[desc.input_layout.buffer_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &ps_module,
                entry_point: Some(desc.ps.entry_point()),
                compilation_options: Default::default(),
                targets: &targets,
            }),

            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                strip_index_format: None,
                front_face: desc.rasterizer.front_face,
                cull_mode: desc.rasterizer.cull_mode,
                polygon_mode: desc.rasterizer.fill_mode,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: desc.sample_count,
                mask: desc.sample_mask,
                alpha_to_coverage_enabled: false,
            },

            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "pipeline state created: {} + {} -> {:?}",
            desc.vs.label(),
            desc.ps.label(),
            desc.rtv_formats
        );

        Ok(Self { pipeline })
    }

    pub fn get(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── input layout ──────────────────────────────────────────────────────

    #[test]
    fn single_float4_element() {
        let layout = InputLayout::new(&[InputElement::new(
            "POSITION",
            wgpu::VertexFormat::Float32x4,
        )]);
        assert_eq!(layout.stride(), 16);
        assert_eq!(
            layout.attributes(),
            &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 0,
                shader_location: 0,
            }]
        );
    }

    #[test]
    fn append_aligned_packs_after_previous() {
        let layout = InputLayout::new(&[
            InputElement::new("POSITION", wgpu::VertexFormat::Float32x3),
            InputElement::new("TEXCOORD", wgpu::VertexFormat::Float32x2),
            InputElement::new("COLOR", wgpu::VertexFormat::Unorm8x4),
        ]);
        let offsets: Vec<u64> = layout.attributes().iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 20]);
        assert_eq!(layout.stride(), 24);

        let locations: Vec<u32> = layout.attributes().iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }

    #[test]
    fn explicit_offset_is_honored() {
        let layout = InputLayout::new(&[
            InputElement {
                aligned_byte_offset: 16,
                ..InputElement::new("NORMAL", wgpu::VertexFormat::Float32x3)
            },
            InputElement {
                aligned_byte_offset: 0,
                ..InputElement::new("POSITION", wgpu::VertexFormat::Float32x4)
            },
        ]);
        assert_eq!(layout.attributes()[0].offset, 16);
        assert_eq!(layout.attributes()[1].offset, 0);
        assert_eq!(layout.stride(), 28);
    }

    #[test]
    fn appended_element_is_padded_to_its_alignment() {
        let layout = InputLayout::new(&[
            InputElement::new("COLOR", wgpu::VertexFormat::Unorm8x2),
            InputElement::new("WEIGHT", wgpu::VertexFormat::Float32),
        ]);
        let offsets: Vec<u64> = layout.attributes().iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 4]);
        assert_eq!(layout.stride(), 8);
        assert_eq!(layout.check_alignment(), Ok(()));
    }

    #[test]
    fn stride_rounds_up_to_vertex_alignment() {
        let layout = InputLayout::new(&[InputElement::new("COLOR", wgpu::VertexFormat::Unorm8x2)]);
        assert_eq!(layout.stride(), 4);
        assert_eq!(layout.stride() % wgpu::VERTEX_ALIGNMENT, 0);
    }

    #[test]
    fn small_formats_align_to_their_size() {
        let layout = InputLayout::new(&[
            InputElement::new("A", wgpu::VertexFormat::Uint8x2),
            InputElement::new("B", wgpu::VertexFormat::Uint8x2),
        ]);
        let offsets: Vec<u64> = layout.attributes().iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 2]);
        assert_eq!(layout.stride(), 4);
    }

    #[test]
    fn misaligned_explicit_offset_is_rejected() {
        let layout = InputLayout::new(&[InputElement {
            aligned_byte_offset: 2,
            ..InputElement::new("WEIGHT", wgpu::VertexFormat::Float32)
        }]);
        assert_eq!(
            layout.check_alignment(),
            Err(GfxError::MisalignedElement {
                location: 0,
                offset: 2,
            })
        );
    }

    #[test]
    fn empty_layout_has_zero_stride() {
        let layout = InputLayout::new(&[]);
        assert_eq!(layout.stride(), 0);
        assert!(layout.buffer_layout().attributes.is_empty());
    }

    // ── linkage ───────────────────────────────────────────────────────────

    const VS: &str = r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(1) uv: vec2<f32>,
}

@vertex
fn main(@location(0) position: vec4<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = position;
    out.uv = position.xy;
    return out;
}
"#;

    fn position_layout() -> InputLayout {
        InputLayout::new(&[InputElement::new("POSITION", wgpu::VertexFormat::Float32x4)])
    }

    fn ps_reading(location: u32) -> Shader {
        let src = format!(
            "@fragment\nfn main(@location({location}) uv: vec2<f32>) -> @location(0) vec4<f32> {{\n    return vec4<f32>(uv, 0.0, 1.0);\n}}\n"
        );
        Shader::from_source("ps", src, "ps_6_0").unwrap()
    }

    #[test]
    fn linked_stages_pass() {
        let vs = Shader::from_source("vs", VS, "vs_6_0").unwrap();
        assert_eq!(link_stages(&position_layout(), &vs, &ps_reading(1)), Ok(()));
    }

    #[test]
    fn unwritten_pixel_input_is_rejected() {
        let vs = Shader::from_source("vs", VS, "vs_6_0").unwrap();
        assert_eq!(
            link_stages(&position_layout(), &vs, &ps_reading(2)),
            Err(GfxError::UnlinkedLocation(2))
        );
    }

    #[test]
    fn vertex_input_without_element_is_rejected() {
        let vs = Shader::from_source("vs", VS, "vs_6_0").unwrap();
        let empty = InputLayout::new(&[]);
        assert_eq!(
            link_stages(&empty, &vs, &ps_reading(1)),
            Err(GfxError::MissingVertexAttribute(0))
        );
    }

    #[test]
    fn swapped_shaders_are_stage_mismatch() {
        let vs = Shader::from_source("vs", VS, "vs_6_0").unwrap();
        let ps = ps_reading(1);
        assert_eq!(
            link_stages(&position_layout(), &ps, &vs),
            Err(GfxError::StageMismatch {
                slot: "VS",
                expected: ShaderStage::Vertex,
                found: ShaderStage::Pixel,
            })
        );
    }

    // ── render targets ────────────────────────────────────────────────────

    const RGBA: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    #[test]
    fn single_target_single_sample_passes() {
        assert_eq!(check_targets(&[RGBA], 1), Ok(()));
        assert_eq!(check_targets(&[RGBA], 4), Ok(()));
    }

    #[test]
    fn empty_target_list_is_rejected() {
        assert!(matches!(
            check_targets(&[], 1),
            Err(GfxError::InvalidPipeline(_))
        ));
    }

    #[test]
    fn too_many_targets_are_rejected() {
        let formats = [RGBA; MAX_RENDER_TARGETS + 1];
        assert!(check_targets(&formats[..MAX_RENDER_TARGETS], 1).is_ok());
        assert!(matches!(
            check_targets(&formats, 1),
            Err(GfxError::InvalidPipeline(_))
        ));
    }

    #[test]
    fn zero_and_odd_sample_counts_are_rejected() {
        for count in [0, 3] {
            assert!(
                matches!(check_targets(&[RGBA], count), Err(GfxError::InvalidPipeline(_))),
                "sample count {count} should be rejected"
            );
        }
    }

    // ── rasterizer ────────────────────────────────────────────────────────

    const CCW: [[f32; 4]; 3] = [
        [0.0, 0.5, 0.0, 1.0],
        [-0.5, -0.5, 0.0, 1.0],
        [0.5, -0.5, 0.0, 1.0],
    ];
    const CW: [[f32; 4]; 3] = [
        [0.0, 0.5, 0.0, 1.0],
        [0.5, -0.5, 0.0, 1.0],
        [-0.5, -0.5, 0.0, 1.0],
    ];

    #[test]
    fn default_rasterizer_keeps_ccw_and_culls_cw() {
        let r = RasterizerDesc::default();
        assert!(!r.is_culled(CCW));
        assert!(r.is_culled(CW));
    }

    #[test]
    fn clockwise_front_face_flips_culling() {
        let r = RasterizerDesc {
            front_face: wgpu::FrontFace::Cw,
            ..RasterizerDesc::default()
        };
        assert!(r.is_culled(CCW));
        assert!(!r.is_culled(CW));
    }

    #[test]
    fn no_cull_mode_keeps_both_windings() {
        let r = RasterizerDesc {
            cull_mode: None,
            ..RasterizerDesc::default()
        };
        assert!(!r.is_culled(CCW));
        assert!(!r.is_culled(CW));
    }

    #[test]
    fn front_culling_discards_front_faces() {
        let r = RasterizerDesc {
            cull_mode: Some(wgpu::Face::Front),
            ..RasterizerDesc::default()
        };
        assert!(r.is_culled(CCW));
        assert!(!r.is_culled(CW));
    }

    #[test]
    fn uniform_negative_w_preserves_winding() {
        // Dividing x and y by -1 mirrors both axes, which is a rotation.
        let flipped = CCW.map(|p| [p[0], p[1], p[2], -1.0]);
        assert!(!RasterizerDesc::default().is_culled(flipped));
    }

    #[test]
    fn degenerate_triangle_is_culled() {
        let line = [
            [0.0, 0.0, 0.0, 1.0],
            [1.0, 1.0, 0.0, 1.0],
            [2.0, 2.0, 0.0, 1.0],
        ];
        assert!(RasterizerDesc { cull_mode: None, ..Default::default() }.is_culled(line));
    }
}
