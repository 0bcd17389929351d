/// Resource binding layout shared by a pipeline and its draw calls.
///
/// The triangle path binds no resources, so the layout is empty: vertex data
/// arrives through the input assembler only.
#[derive(Debug)]
pub struct RootSignature {
    layout: wgpu::PipelineLayout,
}

impl RootSignature {
    /// Creates an empty root signature.
    pub fn create(device: &wgpu::Device) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("trigon root signature"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        log::debug!("root signature created");

        Self { layout }
    }

    pub fn get(&self) -> &wgpu::PipelineLayout {
        &self.layout
    }
}
