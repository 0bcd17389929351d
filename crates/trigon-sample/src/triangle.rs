use anyhow::{Context, Result};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use trigon_engine::core::{App, AppControl, FrameCtx, InitCtx};
use trigon_engine::gfx::{
    BlendDesc, GraphicsPipelineDesc, IndexBuffer, InputElement, InputLayout, PipelineState,
    RasterizerDesc, RootSignature, Shader, VertexBuffer,
};

use crate::config::SampleConfig;
use crate::mesh::{INDICES, VERTICES, VertexData};

/// Vertex input: a single float4 position, packed.
pub fn input_layout() -> InputLayout {
    InputLayout::new(&[InputElement::new(
        "POSITION",
        wgpu::VertexFormat::Float32x4,
    )])
}

/// Cull back faces, solid fill.
pub fn rasterizer() -> RasterizerDesc {
    RasterizerDesc {
        cull_mode: Some(wgpu::Face::Back),
        fill_mode: wgpu::PolygonMode::Fill,
        // Counter-clockwise is the front face here, unlike D3D's clockwise default;
        // the mesh indices are wound for this and would be culled otherwise.
        front_face: wgpu::FrontFace::Ccw,
    }
}

/// Builds the triangle PSO from an empty root signature and the two shaders.
pub fn setup_pipeline_state(
    device: &wgpu::Device,
    rs: &RootSignature,
    vs: &Shader,
    ps: &Shader,
    target_format: wgpu::TextureFormat,
) -> Result<PipelineState> {
    let input_layout = input_layout();

    let desc = GraphicsPipelineDesc {
        root_signature: rs,
        input_layout: &input_layout,
        vs,
        ps,
        // Write every color channel, no blending.
        blend: BlendDesc {
            write_mask: wgpu::ColorWrites::ALL,
            blend: None,
        },
        rasterizer: rasterizer(),
        rtv_formats: vec![target_format],
        topology: wgpu::PrimitiveTopology::TriangleList,
        sample_count: 1,
        sample_mask: !0,
    };

    PipelineState::create(device, &desc).context("failed to create pipeline state")
}

/// GPU objects created once at startup and used every frame.
struct TriangleScene {
    _root_signature: RootSignature,
    pipeline_state: PipelineState,
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
}

impl TriangleScene {
    fn new(ctx: &InitCtx<'_>, config: &SampleConfig) -> Result<Self> {
        let rs = RootSignature::create(ctx.device);

        let vs = Shader::load(config.vertex_shader_path(), "vs_6_0")
            .context("failed to load vertex shader")?;
        let ps = Shader::load(config.pixel_shader_path(), "ps_6_0")
            .context("failed to load pixel shader")?;

        let pipeline_state = setup_pipeline_state(ctx.device, &rs, &vs, &ps, ctx.surface_format)?;

        let vertex_buffer = VertexBuffer::create(
            ctx.device,
            std::mem::size_of_val(&VERTICES) as u64,
            std::mem::size_of::<VertexData>() as u64,
        )
        .context("failed to create vertex buffer")?;
        vertex_buffer.write(ctx.queue, &VERTICES)?;

        let index_buffer = IndexBuffer::create(
            ctx.device,
            std::mem::size_of_val(&INDICES) as u64,
            std::mem::size_of::<u16>() as u64,
        )
        .context("failed to create index buffer")?;
        index_buffer.write(ctx.queue, &INDICES)?;

        log::info!(
            "triangle ready: {} vertices, {} indices, target {:?}",
            vertex_buffer.count(),
            index_buffer.count(),
            ctx.surface_format
        );

        Ok(Self {
            _root_signature: rs,
            pipeline_state,
            vertex_buffer,
            index_buffer,
        })
    }
}

/// Renders one static triangle until the window closes or Escape is pressed.
pub struct TriangleApp {
    config: SampleConfig,
    scene: Option<TriangleScene>,
}

impl TriangleApp {
    pub fn new(config: SampleConfig) -> Self {
        Self {
            config,
            scene: None,
        }
    }
}

impl App for TriangleApp {
    fn on_init(&mut self, ctx: &InitCtx<'_>) -> Result<()> {
        log::info!("width: {},height: {}", ctx.size.width, ctx.size.height);
        self.scene = Some(TriangleScene::new(ctx, &self.config)?);
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                log::info!("escape pressed");
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(scene) = self.scene.as_ref() else {
            return AppControl::Continue;
        };

        if ctx.time.frame_index == 0 {
            log::debug!("first frame");
        }

        ctx.render(self.config.clear_color, |_rctx, target| {
            let mut pass = target.begin_pass("triangle pass");
            pass.set_pipeline(scene.pipeline_state.get());
            pass.set_vertex_buffer(0, scene.vertex_buffer.slice());
            pass.set_index_buffer(scene.index_buffer.slice(), scene.index_buffer.format());
            pass.draw_indexed(0..scene.index_buffer.count(), 0, 0..1);
        })
    }
}
