//! The shipped shaders must compile and link without a GPU.

use std::path::PathBuf;

use trigon_engine::gfx::{
    InputElement, InputLayout, Shader, ShaderError, ShaderStage, link_stages,
};

fn shader_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("resources")
        .join("shaders")
        .join(name)
}

#[test]
fn vertex_shader_compiles() {
    let vs = Shader::load(shader_path("TestVS.wgsl"), "vs_6_0").unwrap();
    assert_eq!(vs.stage(), ShaderStage::Vertex);
    assert_eq!(vs.input_locations(), vec![0]);
    assert!(vs.output_locations().is_empty());
}

#[test]
fn pixel_shader_compiles() {
    let ps = Shader::load(shader_path("TestPS.wgsl"), "ps_6_0").unwrap();
    assert_eq!(ps.stage(), ShaderStage::Pixel);
    assert!(ps.input_locations().is_empty());
    assert_eq!(ps.output_locations(), vec![0]);
}

#[test]
fn shaders_link_against_position_layout() {
    let vs = Shader::load(shader_path("TestVS.wgsl"), "vs_6_0").unwrap();
    let ps = Shader::load(shader_path("TestPS.wgsl"), "ps_6_0").unwrap();
    let layout = InputLayout::new(&[InputElement::new(
        "POSITION",
        wgpu::VertexFormat::Float32x4,
    )]);
    assert_eq!(link_stages(&layout, &vs, &ps), Ok(()));
}

#[test]
fn loading_with_wrong_profile_fails() {
    let err = Shader::load(shader_path("TestVS.wgsl"), "ps_6_0").unwrap_err();
    assert!(matches!(err, ShaderError::MissingEntryPoint { stage: ShaderStage::Pixel, .. }));
}
