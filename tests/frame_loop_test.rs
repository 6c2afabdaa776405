use bastion::{
    animation::driver::AnimationDriver,
    config::AnimationConfig,
    flow::{FlatTerrain, FrameLoop, RenderHost, TerrainProvider},
    render::Render,
};

use crate::common::test_utils::{RecordingHost, SEED, build_base, small_config};

mod common;

#[test]
fn run_stops_when_the_host_does() {
    let config = small_config();
    let (mut ctx, mut base) = build_base(&config);
    let mut driver = AnimationDriver::new(config.animation, SEED);
    let mut host = RecordingHost::new(5);

    let frames = FrameLoop::new()
        .run(&mut base, &mut ctx, &mut driver, &mut host)
        .unwrap();
    assert_eq!(frames, 5);
    assert_eq!(host.rendered(), 5);
    assert_eq!(driver.frames(), 5);
}

#[test]
fn every_frame_draws_the_whole_base() {
    let config = small_config();
    let (mut ctx, mut base) = build_base(&config);
    let mut driver = AnimationDriver::new(config.animation, SEED);
    let mut host = RecordingHost::new(3);
    let mut frame_loop = FrameLoop::default();
    let mut frame = 0;
    while host.request_frame() {
        frame_loop
            .frame(frame as f64 / 60.0, &mut base, &mut ctx, &mut driver, &mut host)
            .unwrap();
        frame += 1;
    }

    let mut drawables = 0;
    ctx.root.walk(&mut |n| {
        if n.drawable.is_some() {
            drawables += 1;
        }
    });
    assert!(host.instances.iter().all(|&n| n == drawables));
    // shared templates collapse into far fewer batches than drawables
    assert!(host.batches[0] < drawables / 4);
    assert_eq!(frame_loop.frames(), 3);
}

#[test]
fn host_failure_stops_the_loop() {
    let config = small_config();
    let (mut ctx, mut base) = build_base(&config);
    let mut driver = AnimationDriver::new(AnimationConfig::default(), SEED);
    let mut host = RecordingHost::new(10);
    host.fail_on = Some(2);

    let mut frame_loop = FrameLoop::new();
    let err = frame_loop
        .run(&mut base, &mut ctx, &mut driver, &mut host)
        .unwrap_err();
    assert_eq!(err.to_string(), "surface lost");
    assert_eq!(frame_loop.frames(), 2);
}

#[test]
fn hidden_layers_are_not_drawn() {
    let config = small_config();
    let (mut ctx, _) = build_base(&config);
    ctx.root.update_world_transform_all();
    let full = Render::collect(&ctx).instance_count();
    for layer in ctx.root.get_children_mut() {
        layer.visible = false;
    }
    assert_eq!(Render::collect(&ctx).instance_count(), 0);
    assert!(full > 0);
}

#[test]
fn instance_buffers_pack_one_matrix_set_per_instance() {
    let config = small_config();
    let (mut ctx, _) = build_base(&config);
    ctx.root.update_world_transform_all();
    let render = Render::collect(&ctx);
    for batch in render.opaque.iter().chain(render.transparent.iter()) {
        assert_eq!(
            batch.as_bytes().len(),
            batch.instances.len() * std::mem::size_of_val(&batch.instances[0])
        );
    }
}

#[test]
fn flat_terrain_reports_its_height() {
    let terrain = FlatTerrain { height: -2.5 };
    assert_eq!(terrain.height_at(100.0, -40.0), -2.5);
    assert_eq!(FlatTerrain::default().height_at(0.0, 0.0), 0.0);
}
