use super::*;
use crate::foundation::rng::SeededRandom;
use crate::render::recording::{DrawCommand, RecordingSurface};

/// Always samples the middle of the requested range.
struct Midpoint;

impl RandomSource for Midpoint {
    fn next_unit(&mut self) -> f64 {
        0.5
    }
}

fn bounds() -> Size {
    Size::new(800.0, 600.0)
}

fn calm_leaf() -> Leaf {
    Leaf {
        position: Point::new(100.0, 0.0),
        velocity: Vec2::new(0.0, 1.0),
        size: 50.0,
        rotation: 0.0,
        angular_speed: 0.0,
        sway_phase: 0.0,
        sway_speed: 0.0,
        sway_amplitude: 0.0,
        opacity: 1.0,
    }
}

#[test]
fn reset_samples_every_attribute_in_range() {
    let mut rng = SeededRandom::new(11);
    for _ in 0..200 {
        let leaf = Leaf::spawn(bounds(), &mut rng);
        assert!((0.0..=800.0).contains(&leaf.position.x));
        assert!((-10.0..=600.0).contains(&leaf.position.y));
        assert!(DRIFT_SPAN.contains(leaf.velocity.x));
        assert!(FALL_SPAN.contains(leaf.velocity.y));
        assert!(SIZE_SPAN.contains(leaf.size));
        assert!(ROTATION_SPAN.contains(leaf.rotation));
        assert!(ANGULAR_SPEED_SPAN.contains(leaf.angular_speed));
        assert!(SWAY_PHASE_SPAN.contains(leaf.sway_phase));
        assert!(SWAY_SPEED_SPAN.contains(leaf.sway_speed));
        assert!(SWAY_AMPLITUDE_SPAN.contains(leaf.sway_amplitude));
        assert!(OPACITY_SPAN.contains(leaf.opacity));
    }
}

#[test]
fn midpoint_leaf_moves_as_expected_over_one_second() {
    let mut rng = Midpoint;
    let mut leaf = Leaf::spawn(bounds(), &mut rng);
    assert_eq!(leaf.position, Point::new(400.0, 295.0));
    assert_eq!(leaf.size, 70.0);

    let recycled = leaf.update(1000.0, bounds(), 0.0, &mut rng);
    assert!(!recycled);

    let s = 1000.0 / FRAME_MS;
    let sway = (std::f64::consts::PI + 0.01 * s).sin() * 17.0;
    let expected_x = 400.0 + sway * 0.001 * 70.0 * 0.12 * s;
    let expected_y = 295.0 + 1.4 * 70.0 * 0.06 * s;
    assert!((leaf.position.x - expected_x).abs() < 1e-9);
    assert!((leaf.position.y - expected_y).abs() < 1e-9);
    assert!((leaf.rotation - std::f64::consts::PI).abs() < 1e-12);
    assert_eq!(leaf.velocity.x, 0.0);
}

#[test]
fn update_never_touches_size_or_opacity() {
    let mut rng = SeededRandom::new(3);
    let mut leaf = Leaf::spawn(bounds(), &mut rng);
    let (size, opacity) = (leaf.size, leaf.opacity);
    for _ in 0..50 {
        if leaf.update(FRAME_MS, bounds(), 0.7, &mut rng) {
            break;
        }
        assert_eq!(leaf.size, size);
        assert_eq!(leaf.opacity, opacity);
    }
}

#[test]
fn fall_is_linear_without_sway_or_wind() {
    let mut rng = Midpoint;
    let mut leaf = calm_leaf();
    for _ in 0..5 {
        assert!(!leaf.update(FRAME_MS, bounds(), 0.0, &mut rng));
    }
    assert!((leaf.position.y - 5.0 * 1.0 * 50.0 * 0.06).abs() < 1e-9);
    assert_eq!(leaf.position.x, 100.0);
}

#[test]
fn drift_eases_toward_wind() {
    let mut rng = Midpoint;
    let mut leaf = calm_leaf();
    leaf.update(FRAME_MS, bounds(), 1.0, &mut rng);
    assert!((leaf.velocity.x - 0.002).abs() < 1e-12);
    assert!(leaf.position.x > 100.0);
}

#[test]
fn leaf_below_viewport_reenters_from_above() {
    let mut rng = SeededRandom::new(99);
    let mut leaf = calm_leaf();
    leaf.position.y = 10_000.0;
    assert!(leaf.update(FRAME_MS, bounds(), 0.0, &mut rng));
    assert!(REENTRY_SPAN.contains(leaf.position.y));
    assert!((0.0..=800.0).contains(&leaf.position.x));
}

#[test]
fn side_margins_trigger_recycling() {
    let mut rng = Midpoint;
    let mut left = calm_leaf();
    left.position.x = -150.0;
    assert!(left.is_out_of_bounds(bounds()));

    let mut right = calm_leaf();
    right.position.x = 950.0;
    assert!(right.is_out_of_bounds(bounds()));

    let mut inside = calm_leaf();
    inside.position = Point::new(-99.0, 600.0 + 40.0 + 49.0);
    assert!(!inside.is_out_of_bounds(bounds()));
    assert!(right.update(0.0, bounds(), 0.0, &mut rng));
    assert_eq!(right.position.y, REENTRY_SPAN.midpoint());
}

#[test]
fn draw_is_balanced_and_uses_leaf_state() {
    let sprite = Sprite::from_premul_rgba8(2, 2, vec![255; 16]).unwrap();
    let mut leaf = calm_leaf();
    leaf.rotation = 0.5;
    leaf.opacity = 0.75;

    let mut surface = RecordingSurface::new();
    surface.set_transform(Affine::scale(2.0));
    leaf.draw(&mut surface, &sprite).unwrap();

    assert_eq!(surface.save_depth(), 0);
    assert_eq!(surface.max_save_depth(), 1);
    assert_eq!(surface.current_transform(), Affine::scale(2.0));
    assert_eq!(
        surface.commands(),
        &[DrawCommand::Image {
            sprite: sprite.id(),
            dst: Rect::new(-25.0, -25.0, 25.0, 25.0),
            transform: Affine::scale(2.0) * leaf.transform(),
            alpha: 0.75,
        }]
    );
}
