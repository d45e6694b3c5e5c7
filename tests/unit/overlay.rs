use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn start_of_scroll_shows_nav_and_header_only() {
    let s = overlay_at(0.0);
    assert_eq!(s.nav_opacity, 1.0);
    assert_eq!(s.header.opacity, 1.0);
    assert_eq!(s.header.translate_z, 0.0);
    assert_eq!(s.hero.opacity, 0.0);
    assert_eq!(s.hero.translate_z, 1000.0);
    assert_eq!(OverlayState::default(), s);
}

#[test]
fn nav_fades_over_first_tenth() {
    assert!(close(overlay_at(0.05).nav_opacity, 0.5));
    assert!(close(overlay_at(0.1).nav_opacity, 0.0));
    assert_eq!(overlay_at(0.3).nav_opacity, 0.0);
}

#[test]
fn header_recedes_then_fades() {
    let s = overlay_at(0.125);
    assert!(close(s.header.translate_z, -250.0));
    assert_eq!(s.header.opacity, 1.0);

    let s = overlay_at(0.225);
    assert!(close(s.header.opacity, 0.5));
    assert!(close(s.header.translate_z, -450.0));

    let s = overlay_at(0.25);
    assert!(close(s.header.opacity, 0.0));
    assert!(close(s.header.translate_z, -500.0));

    let s = overlay_at(0.5);
    assert_eq!(s.header.opacity, 0.0);
    assert_eq!(s.header.translate_z, -500.0);
}

#[test]
fn hero_approaches_between_sixty_and_ninety_percent() {
    assert_eq!(overlay_at(0.59).hero.opacity, 0.0);

    let s = overlay_at(0.7);
    assert!(close(s.hero.opacity, 0.5));
    assert!(close(s.hero.translate_z, 1000.0 - 1000.0 / 3.0));

    let s = overlay_at(0.85);
    assert_eq!(s.hero.opacity, 1.0);
    assert!(close(s.hero.translate_z, 1000.0 / 6.0));

    let s = overlay_at(0.95);
    assert_eq!(s.hero.opacity, 1.0);
    assert_eq!(s.hero.translate_z, 0.0);
}

#[test]
fn out_of_range_progress_is_clamped() {
    assert_eq!(overlay_at(-3.0), overlay_at(0.0));
    assert_eq!(overlay_at(f64::NAN), overlay_at(0.0));
    assert_eq!(overlay_at(7.0), overlay_at(1.0));
}

#[test]
fn opacities_stay_in_unit_range() {
    for step in 0..=1000u32 {
        let s = overlay_at(f64::from(step) / 1000.0);
        for o in [s.nav_opacity, s.header.opacity, s.hero.opacity] {
            assert!((0.0..=1.0).contains(&o), "step {step}: {o}");
        }
    }
}
