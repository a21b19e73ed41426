use super::*;
use crate::foundation::core::{Affine, Rect};
use crate::render::recording::{DrawCommand, RecordingSurface};
use crate::sim::wind::WIND_LIMIT;

fn sprite() -> Sprite {
    Sprite::from_premul_rgba8(1, 1, vec![255; 4]).unwrap()
}

fn scene(seed: u64) -> LeafScene {
    let vp = Viewport::new(800.0, 600.0, 1.0).unwrap();
    LeafScene::new(vp, 15, Box::new(SeededRandom::new(seed)))
}

fn running(seed: u64) -> LeafScene {
    let mut s = scene(seed);
    s.on_sprite_loaded(sprite(), 0.0).unwrap();
    s
}

#[test]
fn frames_are_refused_before_the_sprite_arrives() {
    let mut s = scene(1);
    let mut surface = RecordingSurface::new();
    let err = s.frame(16.0, &mut surface).unwrap_err();
    assert!(matches!(err, LeafFallError::Validation(_)));
    assert!(surface.commands().is_empty());
    assert!(s.swarm().is_empty());
}

#[test]
fn sprite_load_transitions_exactly_once() {
    let mut s = scene(1);
    assert_eq!(s.state(), &SceneState::Uninitialized);
    s.on_sprite_loaded(sprite(), 100.0).unwrap();
    assert!(s.is_running());
    assert_eq!(s.swarm().len(), 15);

    let before = s.swarm().clone();
    assert!(s.on_sprite_loaded(sprite(), 200.0).is_err());
    assert_eq!(s.swarm(), &before);
}

#[test]
fn failed_sprite_is_terminal() {
    let mut s = scene(1);
    let err = s
        .load_sprite(&SpriteSource::parse("no/such/leaf.png"), 0.0)
        .unwrap_err();
    assert!(matches!(err, LeafFallError::Asset(_)));
    assert!(matches!(s.state(), SceneState::Failed(_)));

    let mut surface = RecordingSurface::new();
    let err = s.frame(16.0, &mut surface).unwrap_err();
    assert!(err.to_string().contains("failed to load"));
    assert!(s.on_sprite_loaded(sprite(), 0.0).is_err());
}

#[test]
fn frame_clears_then_draws_background_before_foreground() {
    let mut s = running(4);
    let mut surface = RecordingSurface::new();
    let max = s.swarm().max_size().unwrap();
    let report = s.frame(16.6667, &mut surface).unwrap();

    assert_eq!(report.frame, FrameIndex(0));
    assert!((report.dt_ms - 16.6667).abs() < 1e-9);
    assert_eq!(report.bands.total(), 15);
    assert_eq!(surface.save_depth(), 0);

    let cmds = surface.commands();
    assert_eq!(
        cmds[0],
        DrawCommand::Clear {
            rect: Rect::new(0.0, 0.0, 800.0, 600.0),
            transform: Affine::IDENTITY,
        }
    );
    let sizes: Vec<f64> = cmds[1..]
        .iter()
        .map(|c| match c {
            DrawCommand::Image { dst, .. } => dst.width(),
            DrawCommand::Clear { .. } => panic!("unexpected clear"),
        })
        .collect();
    let split = report.bands.background;
    assert!(sizes[..split].iter().all(|&w| w <= max / 2.0));
    assert!(sizes[split..].iter().all(|&w| w > max / 2.0));
}

#[test]
fn leaves_read_the_previous_frames_wind() {
    let mut s = running(9);
    let mut surface = RecordingSurface::new();
    let first = s.frame(16.0, &mut surface).unwrap();
    assert_eq!(first.wind, 0.0);
    let after_first = s.wind().value();
    assert_ne!(after_first, 0.0);
    let second = s.frame(32.0, &mut surface).unwrap();
    assert_eq!(second.wind, after_first);
}

#[test]
fn wind_stays_bounded_over_long_runs() {
    let mut s = running(21).with_wind(WindField::with_value(1.19));
    let mut surface = RecordingSurface::new();
    for i in 1..=2_000 {
        s.frame(i as f64 * 16.0, &mut surface).unwrap();
        surface.take_commands();
        assert!(s.wind().value().abs() <= WIND_LIMIT);
    }
    assert_eq!(s.frames_drawn(), 2_000);
    assert_eq!(s.swarm().len(), 15);
}

#[test]
fn seeded_scenes_are_deterministic() {
    let mut a = running(77);
    let mut b = running(77);
    let (mut sa, mut sb) = (RecordingSurface::new(), RecordingSurface::new());
    for i in 1..=30 {
        let ra = a.frame(i as f64 * 16.0, &mut sa).unwrap();
        let rb = b.frame(i as f64 * 16.0, &mut sb).unwrap();
        assert_eq!(ra, rb);
    }
    assert_eq!(sa.commands(), sb.commands());
}

#[test]
fn resize_regenerates_a_running_swarm() {
    let mut s = running(5);
    let before = s.swarm().clone();
    let vp = Viewport::new(300.0, 200.0, 2.0).unwrap();
    s.resize(vp);
    assert_eq!(s.viewport(), vp);
    assert_ne!(s.swarm(), &before);
    assert!(s.swarm().leaves().iter().all(|l| (0.0..=300.0).contains(&l.position.x)));

    let mut surface = RecordingSurface::new();
    s.frame(16.0, &mut surface).unwrap();
    assert_eq!(
        surface.commands()[0],
        DrawCommand::Clear {
            rect: Rect::new(0.0, 0.0, 300.0, 200.0),
            transform: Affine::scale(2.0),
        }
    );
}

#[test]
fn resize_before_load_only_records_the_viewport() {
    let mut s = scene(5);
    let vp = Viewport::new(320.0, 240.0, 1.0).unwrap();
    s.resize(vp);
    assert!(s.swarm().is_empty());
    s.on_sprite_loaded(sprite(), 0.0).unwrap();
    assert!(s.swarm().leaves().iter().all(|l| l.position.x <= 320.0));
}

#[test]
fn backwards_timestamps_do_not_move_leaves_backwards() {
    let mut s = running(3);
    let mut surface = RecordingSurface::new();
    s.frame(100.0, &mut surface).unwrap();
    let report = s.frame(50.0, &mut surface).unwrap();
    assert_eq!(report.dt_ms, 0.0);
}

#[test]
fn tilt_wraps_only_the_draw_passes() {
    let mut s = running(8).with_tilt(TiltConfig::default());
    let mut surface = RecordingSurface::new();
    let report = s.frame(FRAME_MS * 100.0, &mut surface).unwrap();
    let angle = report.tilt_angle.unwrap();
    assert!((angle - (0.3f64).sin() * 0.03).abs() < 1e-9);
    assert_eq!(surface.save_depth(), 0);

    match &surface.commands()[0] {
        DrawCommand::Clear { transform, .. } => assert_eq!(*transform, Affine::IDENTITY),
        other => panic!("expected clear first, got {other:?}"),
    }
    let c = s.viewport().center().to_vec2();
    let tilt = Affine::translate(c) * Affine::rotate(angle) * Affine::translate(-c);
    let leaf = s.swarm().draw_order(f64::INFINITY).next().unwrap().1;
    let expected = tilt * leaf.transform();
    let found = surface.images().any(|cmd| match cmd {
        DrawCommand::Image { transform, .. } => {
            let (a, b) = (transform.as_coeffs(), expected.as_coeffs());
            a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
        }
        DrawCommand::Clear { .. } => false,
    });
    assert!(found);
}
