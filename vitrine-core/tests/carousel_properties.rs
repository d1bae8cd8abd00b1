use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use vitrine_config::{Breakpoint, SettingsOverride};
use vitrine_core::{
    Carousel, CarouselBuilder, CarouselOptions, Content, Direction, Easing,
    Invalidation, Lifecycle, Payload, PointerEvent, PointerOutcome,
    PointerPhase, RejectReason, Settings, StateTag, Viewport,
};

fn images(n: usize) -> Vec<Content> {
    (0..n).map(|i| Content::new(format!("/img/{i}.jpg"))).collect()
}

fn build(settings: Settings, n: usize) -> Carousel {
    CarouselBuilder::new(CarouselOptions::from(settings), Viewport::new(900.0))
        .items(images(n))
        .build()
        .unwrap()
}

fn looping() -> Settings {
    Settings {
        looping: true,
        ..Settings::default()
    }
}

fn counter(carousel: &mut Carousel, kind: Lifecycle) -> Rc<RefCell<usize>> {
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    carousel.subscribe(kind, move |_| *sink.borrow_mut() += 1);
    count
}

fn relative_current(carousel: &Carousel) -> Option<usize> {
    carousel.current().and_then(|c| carousel.relative(c))
}

#[test]
fn update_without_invalidation_writes_nothing() {
    let mut c = build(Settings::default(), 6);
    assert!(c.is(StateTag::Valid));
    let writes = c.stage().writes();

    c.update();
    c.update();
    assert_eq!(c.stage().writes(), writes);

    c.invalidate(Invalidation::Position);
    assert!(!c.is(StateTag::Valid));
    c.update();
    assert!(c.stage().writes() > writes);
    assert!(c.is(StateTag::Valid));
}

#[test]
fn normalize_and_relative_round_trip() {
    let c = build(looping(), 5);
    let n = 5;
    let half = c.clones().len() / 2;
    assert_eq!(c.clones().len(), 6);

    for p in 0..n + c.clones().len() {
        assert_eq!(c.normalize(p as isize, false), Some(p));
        let expected =
            (p as isize - half as isize).rem_euclid(n as isize) as usize;
        assert_eq!(c.relative(p), Some(expected), "slot {p}");
    }
    assert_eq!(c.normalize(-1, true), Some(4));
    assert_eq!(c.normalize(7, true), Some(2));
}

#[test]
fn looping_to_item_count_lands_on_first_item() {
    let mut c = build(looping(), 5);
    c.to(5, Some(0)).unwrap();
    let wrapped = c.current();
    assert_eq!(relative_current(&c), Some(0));

    c.to(0, Some(0)).unwrap();
    assert_eq!(c.current(), wrapped);

    c.to(-1, Some(0)).unwrap();
    assert_eq!(relative_current(&c), Some(4));
    assert!(c.clones_of(None).contains(&c.current().unwrap()));
}

#[test]
fn non_looping_to_clamps_and_rewind_wraps() {
    let mut c = build(Settings::default(), 6);
    c.to(10, Some(0)).unwrap();
    assert_eq!(c.current(), Some(3));
    c.to(-4, Some(0)).unwrap();
    assert_eq!(c.current(), Some(0));

    let mut r = build(
        Settings {
            rewind: true,
            ..Settings::default()
        },
        6,
    );
    r.to(3, Some(0)).unwrap();
    r.next(Some(0)).unwrap();
    assert_eq!(r.current(), Some(0));
    r.prev(Some(0)).unwrap();
    assert_eq!(r.current(), Some(3));
}

#[test]
fn breakpoint_selection_and_resize() {
    let options = CarouselOptions::default()
        .with_breakpoint(
            0,
            SettingsOverride {
                items: Some(1),
                ..SettingsOverride::default()
            },
        )
        .with_breakpoint(
            600,
            SettingsOverride {
                items: Some(3),
                ..SettingsOverride::default()
            },
        )
        .with_breakpoint(
            1000,
            SettingsOverride {
                items: Some(5),
                ..SettingsOverride::default()
            },
        );
    let mut c = CarouselBuilder::new(options, Viewport::new(700.0))
        .items(images(8))
        .build()
        .unwrap();
    assert_eq!(c.breakpoint(), Some(Breakpoint(600)));
    assert_eq!(c.settings().items, 3);

    assert!(c.resize_now(Viewport::new(1200.0)));
    assert_eq!(c.settings().items, 5);
    assert!(!c.resize_now(Viewport::new(1200.0)), "unchanged width");
}

#[test]
fn drag_release_snaps_within_tolerance() {
    let t0 = Instant::now();
    let mut c = CarouselBuilder::new(
        CarouselOptions::from(Settings::default()),
        Viewport::new(900.0),
    )
    .items(images(6))
    .clock(t0)
    .build()
    .unwrap();

    assert_eq!(
        c.pointer(PointerEvent::mouse(PointerPhase::Down, 500.0, 100.0, t0)),
        PointerOutcome::Pressed
    );
    assert_eq!(
        c.pointer(PointerEvent::mouse(PointerPhase::Move, 485.0, 100.0, t0)),
        PointerOutcome::Dragging { offset: -15.0 }
    );
    assert!(c.is(StateTag::Interacting));
    let released =
        c.pointer(PointerEvent::mouse(PointerPhase::Up, 485.0, 100.0, t0));
    assert_eq!(
        released,
        PointerOutcome::Released {
            direction: Direction::Left,
            click_suppressed: true,
            position: Some(0),
        }
    );
    assert!(!c.is(StateTag::Dragging));

    let t1 = t0 + Duration::from_secs(1);
    c.tick(t1);
    c.pointer(PointerEvent::mouse(PointerPhase::Down, 500.0, 100.0, t1));
    c.pointer(PointerEvent::mouse(PointerPhase::Move, 460.0, 100.0, t1));
    let released =
        c.pointer(PointerEvent::mouse(PointerPhase::Up, 460.0, 100.0, t1));
    assert!(matches!(
        released,
        PointerOutcome::Released {
            position: Some(1),
            ..
        }
    ));
    assert_eq!(c.current(), Some(1));
}

#[test]
fn closest_mirrors_in_rtl() {
    let c = build(
        Settings {
            rtl: true,
            ..Settings::default()
        },
        6,
    );
    assert_eq!(c.coordinate(1), 300.0);
    assert_eq!(c.closest(10.0, Direction::Left), Some(0));
    assert_eq!(c.closest(40.0, Direction::Left), Some(1));
}

fn build_at(settings: Settings, n: usize, t0: Instant) -> Carousel {
    CarouselBuilder::new(CarouselOptions::from(settings), Viewport::new(900.0))
        .items(images(n))
        .clock(t0)
        .build()
        .unwrap()
}

fn drag(c: &mut Carousel, from: f32, to: f32, at: Instant) -> PointerOutcome {
    c.pointer(PointerEvent::mouse(PointerPhase::Down, from, 100.0, at));
    c.pointer(PointerEvent::mouse(PointerPhase::Move, to, 100.0, at));
    c.pointer(PointerEvent::mouse(PointerPhase::Up, to, 100.0, at))
}

#[test]
fn closest_follows_a_right_pull() {
    let c = build(Settings::default(), 6);
    assert_eq!(c.coordinate(1), -300.0);
    // Within tolerance of the next boundary.
    assert_eq!(c.closest(-285.0, Direction::Right), Some(1));
    assert_eq!(c.closest(-315.0, Direction::Right), Some(1));
    // Between boundaries a right pull keeps the slot on the left.
    assert_eq!(c.closest(-100.0, Direction::Right), Some(0));
    assert_eq!(c.closest(-100.0, Direction::Left), Some(1));
    assert_eq!(c.closest(-400.0, Direction::Right), Some(1));
}

#[test]
fn release_just_past_a_boundary_snaps_back_onto_it() {
    let t0 = Instant::now();
    let mut c = build_at(Settings::default(), 6, t0);
    let released = drag(&mut c, 500.0, 185.0, t0);
    assert_eq!(
        released,
        PointerOutcome::Released {
            direction: Direction::Left,
            click_suppressed: true,
            position: Some(1),
        }
    );
    c.tick(t0 + Duration::from_secs(1));
    assert_eq!(c.current(), Some(1));
    assert_eq!(c.stage().offset(), c.coordinate(1));
}

#[test]
fn long_stationary_press_is_still_a_click() {
    let t0 = Instant::now();
    let mut c = build_at(Settings::default(), 6, t0);
    c.pointer(PointerEvent::mouse(PointerPhase::Down, 500.0, 100.0, t0));
    let released = c.pointer(PointerEvent::mouse(
        PointerPhase::Up,
        500.0,
        100.0,
        t0 + Duration::from_millis(400),
    ));
    assert!(matches!(
        released,
        PointerOutcome::Released {
            click_suppressed: false,
            position: None,
            ..
        }
    ));
    assert_eq!(c.current(), Some(0));
}

#[test]
fn free_drag_past_the_bounds_springs_back() {
    let t0 = Instant::now();
    let free = Settings {
        free_drag: true,
        ..Settings::default()
    };

    let mut c = build_at(free.clone(), 6, t0);
    c.pointer(PointerEvent::mouse(PointerPhase::Down, 100.0, 100.0, t0));
    let pulled =
        c.pointer(PointerEvent::mouse(PointerPhase::Move, 300.0, 100.0, t0));
    assert_eq!(pulled, PointerOutcome::Dragging { offset: 40.0 });
    let released =
        c.pointer(PointerEvent::mouse(PointerPhase::Up, 300.0, 100.0, t0));
    assert!(matches!(
        released,
        PointerOutcome::Released {
            position: Some(0),
            ..
        }
    ));
    c.tick(t0 + Duration::from_secs(1));
    assert!(!c.is(StateTag::Animating));
    assert_eq!(c.current(), Some(0));
    assert_eq!(c.stage().offset(), c.coordinate(0));

    let mut c = build_at(free, 6, t0);
    let released = drag(&mut c, 900.0, -200.0, t0);
    assert!(matches!(
        released,
        PointerOutcome::Released {
            position: Some(3),
            ..
        }
    ));
    c.tick(t0 + Duration::from_secs(1));
    assert_eq!(c.current(), Some(3));
    assert_eq!(c.stage().offset(), c.coordinate(3));
}

#[test]
fn free_drag_within_the_bounds_stays_put() {
    let t0 = Instant::now();
    let mut c = build_at(
        Settings {
            free_drag: true,
            ..Settings::default()
        },
        6,
        t0,
    );
    let released = drag(&mut c, 500.0, 100.0, t0);
    assert!(matches!(
        released,
        PointerOutcome::Released {
            position: Some(1),
            ..
        }
    ));
    assert_eq!(c.stage().offset(), -400.0);
}

#[test]
fn looping_drag_wraps_within_the_loop_span() {
    let t0 = Instant::now();
    let mut c = build_at(looping(), 5, t0);
    let (min, max) = (c.minimum(false), c.maximum(false));
    let start = c.coordinate(min);
    let end = c.coordinate(max + 1);
    assert_eq!((start, end), (-900.0, -2400.0));
    assert_eq!(c.stage().offset(), start);

    c.pointer(PointerEvent::mouse(PointerPhase::Down, 500.0, 100.0, t0));
    let PointerOutcome::Dragging { offset } =
        c.pointer(PointerEvent::mouse(PointerPhase::Move, 700.0, 100.0, t0))
    else {
        panic!("expected a drag");
    };
    assert_eq!(offset, -2200.0);
    assert!(offset <= start && offset > end);

    c.pointer(PointerEvent::mouse(PointerPhase::Up, 700.0, 100.0, t0));
    assert_eq!(relative_current(&c), Some(4));
}

#[test]
fn huge_speed_factor_does_not_overflow() {
    let mut c = build(Settings::default(), 6);
    c.to(3, Some(u64::MAX / 2)).unwrap();
    assert_eq!(c.speed(), u64::MAX);
    assert_eq!(c.current(), Some(3));
    assert!(c.is(StateTag::Animating));

    c.tick(Instant::now() + Duration::from_secs(1));
    assert!(c.is(StateTag::Animating));
    c.transition_end();
    assert!(!c.is(StateTag::Animating));
    assert_eq!(c.stage().offset(), -900.0);
}

#[test]
fn vertical_gesture_is_left_to_scroll() {
    let t0 = Instant::now();
    let mut c = build(Settings::default(), 6);
    c.pointer(PointerEvent::touch(PointerPhase::Down, 100.0, 100.0, t0));
    assert_eq!(
        c.pointer(PointerEvent::touch(PointerPhase::Move, 98.0, 160.0, t0)),
        PointerOutcome::Scrolling
    );
    assert!(!c.is(StateTag::Dragging));
    let up = c.pointer(PointerEvent::touch(PointerPhase::Up, 98.0, 160.0, t0));
    assert!(matches!(up, PointerOutcome::Released { position: None, .. }));
    assert_eq!(c.current(), Some(0));
}

#[test]
fn disabled_input_and_secondary_button_are_ignored() {
    let t0 = Instant::now();
    let mut c = build(
        Settings {
            mouse_drag: false,
            ..Settings::default()
        },
        6,
    );
    assert_eq!(
        c.pointer(PointerEvent::mouse(PointerPhase::Down, 0.0, 0.0, t0)),
        PointerOutcome::Ignored
    );
    let secondary = PointerEvent::touch(PointerPhase::Down, 0.0, 0.0, t0)
        .with_button(vitrine_core::PointerButton::Secondary);
    assert_eq!(c.pointer(secondary), PointerOutcome::Ignored);
}

#[test]
fn destroy_releases_everything() {
    let mut c = build(Settings::default(), 6);
    let changed = counter(&mut c, Lifecycle::Changed);
    c.destroy();

    assert!(c.is_destroyed());
    assert!(c.stage().slots().is_empty());
    assert_eq!(
        c.next(None).unwrap_err().reason(),
        Some(RejectReason::Destroyed)
    );
    assert!(c.to(2, None).is_err());
    assert_eq!(
        c.pointer(PointerEvent::mouse(
            PointerPhase::Down,
            0.0,
            0.0,
            Instant::now()
        )),
        PointerOutcome::Ignored
    );
    c.tick(Instant::now());
    assert_eq!(*changed.borrow(), 0);
}

#[test]
fn resize_after_destroy_is_ignored() {
    let t0 = Instant::now();
    let options = CarouselOptions::default().with_breakpoint(
        1000,
        SettingsOverride {
            items: Some(5),
            ..SettingsOverride::default()
        },
    );
    let mut c = CarouselBuilder::new(options, Viewport::new(900.0))
        .items(images(8))
        .clock(t0)
        .build()
        .unwrap();
    let resized = counter(&mut c, Lifecycle::Resized);
    c.destroy();

    assert!(!c.resize_now(Viewport::new(1200.0)));
    c.resize(Viewport::new(1300.0), t0);
    c.tick(t0 + Duration::from_secs(1));
    assert_eq!(c.settings().items, 3);
    assert_eq!(*resized.borrow(), 0);
}

#[test]
fn clone_slots_follow_push_order() {
    let c = build(looping(), 5);
    assert_eq!(c.clones(), &[0, 4, 1, 3, 2, 2]);
    let order: Vec<(usize, bool)> = c
        .stage()
        .slots()
        .iter()
        .map(|slot| (slot.index, slot.cloned))
        .collect();
    assert_eq!(
        order,
        vec![
            (2, true),
            (3, true),
            (4, true),
            (0, false),
            (1, false),
            (2, false),
            (3, false),
            (4, false),
            (0, true),
            (1, true),
            (2, true),
        ]
    );
    assert_eq!(c.clones_of(Some(2)), vec![10, 0]);
    assert_eq!(c.current(), Some(3));
}

#[test]
fn coordinates_with_margin_rtl_and_center() {
    let margin = build(
        Settings {
            margin: 10.0,
            ..Settings::default()
        },
        3,
    );
    assert_eq!(margin.coordinate(0), 0.0);
    assert_eq!(margin.coordinate(1), -303.0);
    assert_eq!(margin.stage().style().width, Some(910.0));
    let slot_width = margin.stage().slots()[0].width.unwrap();
    assert!((slot_width - 293.333).abs() < 1e-3);

    let rtl = build(
        Settings {
            margin: 10.0,
            rtl: true,
            ..Settings::default()
        },
        3,
    );
    assert_eq!(rtl.coordinate(1), 304.0);

    let center = build(
        Settings {
            center: true,
            ..Settings::default()
        },
        5,
    );
    assert_eq!(center.coordinate(0), 300.0);
    assert_eq!(center.coordinate(1), 0.0);
    assert_eq!(center.stage().offset(), 300.0);
    let centered: Vec<bool> =
        center.stage().slots().iter().map(|slot| slot.center).collect();
    assert_eq!(centered, vec![true, false, false, false, false]);
}

#[test]
fn active_slots_cover_the_viewport() {
    let mut c = build(Settings::default(), 6);
    assert_eq!(c.active_slots(), vec![0, 1, 2]);
    c.to(2, Some(0)).unwrap();
    assert_eq!(c.active_slots(), vec![2, 3, 4]);
}

#[test]
fn minimum_and_maximum_per_mode() {
    let plain = build(Settings::default(), 6);
    assert_eq!((plain.minimum(false), plain.maximum(false)), (0, 3));

    let center = build(
        Settings {
            center: true,
            ..Settings::default()
        },
        6,
    );
    assert_eq!(center.maximum(false), 5);

    let lp = build(looping(), 5);
    assert_eq!(lp.minimum(false), 3);
    assert_eq!(lp.maximum(false), 7);
    assert_eq!(lp.maximum(true), 4);

    let widths = [400.0, 300.0, 300.0, 200.0];
    let auto = CarouselBuilder::new(
        CarouselOptions::from(Settings {
            auto_width: true,
            ..Settings::default()
        }),
        Viewport::new(900.0),
    )
    .items(
        widths
            .iter()
            .map(|w| Content::new("x.jpg").with_natural_width(*w)),
    )
    .build()
    .unwrap();
    assert_eq!(auto.maximum(false), 1);
    assert_eq!(auto.stage().slots()[0].width, None);

    let few = build(Settings::default(), 2);
    assert_eq!(few.maximum(false), 0);
}

#[test]
fn add_and_remove_keep_the_visible_item() {
    let mut c = build(Settings::default(), 6);
    c.to(2, Some(0)).unwrap();
    let shown = c.slot_item(2).unwrap();
    let added = counter(&mut c, Lifecycle::Added);

    let id = c.add(Content::new("/img/new.jpg"), Some(0)).unwrap();
    assert_eq!(c.current(), Some(3));
    assert_eq!(c.slot_item(3), Some(shown));
    assert_eq!(c.position_of(id), Some(0));
    assert_eq!(*added.borrow(), 1);

    assert_eq!(c.remove(0).unwrap(), id);
    assert_eq!(c.current(), Some(2));
    assert_eq!(c.slot_item(2), Some(shown));

    let appended = c.add(Content::new("/img/last.jpg"), None).unwrap();
    assert_eq!(c.position_of(appended), Some(6));
}

#[test]
fn empty_carousel_rejects_navigation() {
    let mut c = build(Settings::default(), 0);
    assert_eq!(c.current(), None);
    assert_eq!(
        c.next(None).unwrap_err().reason(),
        Some(RejectReason::EmptyCarousel)
    );
    assert_eq!(
        c.remove(0).unwrap_err().reason(),
        Some(RejectReason::EmptyCarousel)
    );
    assert_eq!(c.stage().style().width, None);

    c.add(Content::new("/img/first.jpg"), Some(5)).unwrap();
    assert_eq!(c.current(), Some(0));
    assert_eq!(c.stage().slots().len(), 1);
}

#[test]
fn replace_restarts_at_start_position() {
    let mut c = build(
        Settings {
            start_position: vitrine_config::StartPosition::Index(1),
            ..Settings::default()
        },
        6,
    );
    assert_eq!(c.current(), Some(1));
    c.to(3, Some(0)).unwrap();
    c.replace(images(4)).unwrap();
    assert_eq!(c.len(), 4);
    assert_eq!(c.current(), Some(1));
}

#[test]
fn change_can_redirect_position() {
    let mut c = build(Settings::default(), 6);
    c.subscribe(Lifecycle::Change, |event| {
        if let Payload::Position { position: 1 } = event.payload {
            event.override_position(3);
        }
    });
    c.next(Some(0)).unwrap();
    assert_eq!(c.current(), Some(3));
}

#[test]
fn new_animation_completes_the_running_one() {
    let t0 = Instant::now();
    let mut c = CarouselBuilder::new(
        CarouselOptions::from(Settings {
            transitions: false,
            ..Settings::default()
        }),
        Viewport::new(900.0),
    )
    .items(images(6))
    .clock(t0)
    .build()
    .unwrap();
    let translated = counter(&mut c, Lifecycle::Translated);

    c.to(2, None).unwrap();
    assert_eq!(c.speed(), 500);
    assert!(c.is(StateTag::Animating));
    assert_eq!(c.stage().offset(), 0.0);

    c.tick(t0 + Duration::from_millis(250));
    assert!((c.stage().offset() + 300.0).abs() < 1.0);

    c.to(3, None).unwrap();
    assert_eq!(*translated.borrow(), 1);
    assert_eq!(c.stage().offset(), -600.0);

    c.tick(t0 + Duration::from_secs(2));
    assert_eq!(c.stage().offset(), -900.0);
    assert!(!c.is(StateTag::Animating));
    assert_eq!(*translated.borrow(), 2);
}

#[test]
fn tick_driven_transitions_use_the_builder_easing() {
    let t0 = Instant::now();
    let tick_driven = || {
        CarouselBuilder::new(
            CarouselOptions::from(Settings {
                transitions: false,
                ..Settings::default()
            }),
            Viewport::new(900.0),
        )
        .items(images(6))
        .clock(t0)
    };
    let mut linear = tick_driven().easing(Easing::Linear).build().unwrap();
    let mut swing = tick_driven().build().unwrap();

    for c in [&mut linear, &mut swing] {
        c.to(1, None).unwrap();
        assert_eq!(c.speed(), 250);
        c.tick(t0 + Duration::from_millis(50));
    }
    assert!((linear.stage().offset() + 60.0).abs() < 1.0);
    assert!((swing.stage().offset() + 28.6).abs() < 1.0);
}

#[test]
fn host_transition_end_finishes_animation() {
    let mut c = build(Settings::default(), 6);
    c.next(None).unwrap();
    assert!(c.is(StateTag::Busy));
    assert_eq!(c.stage().style().transition_ms, 250);
    assert_eq!(c.stage().offset(), -300.0);

    c.transition_end();
    assert!(!c.is(StateTag::Animating));
    assert_eq!(c.stage().style().transition_ms, 0);
}

#[test]
fn resize_is_debounced() {
    let t0 = Instant::now();
    let options = CarouselOptions::default().with_breakpoint(
        1000,
        SettingsOverride {
            items: Some(5),
            ..SettingsOverride::default()
        },
    );
    let mut c = CarouselBuilder::new(options, Viewport::new(900.0))
        .items(images(8))
        .clock(t0)
        .build()
        .unwrap();
    let resized = counter(&mut c, Lifecycle::Resized);

    c.resize(Viewport::new(1200.0), t0);
    c.tick(t0 + Duration::from_millis(100));
    assert_eq!(c.settings().items, 3);

    c.resize(Viewport::new(1300.0), t0 + Duration::from_millis(150));
    c.tick(t0 + Duration::from_millis(300));
    assert_eq!(c.settings().items, 3);

    c.tick(t0 + Duration::from_millis(360));
    assert_eq!(c.settings().items, 5);
    assert_eq!(*resized.borrow(), 1);
}

#[test]
fn prevented_resize_keeps_settings() {
    let options = CarouselOptions::default().with_breakpoint(
        1000,
        SettingsOverride {
            items: Some(5),
            ..SettingsOverride::default()
        },
    );
    let mut c = CarouselBuilder::new(options, Viewport::new(900.0))
        .items(images(8))
        .build()
        .unwrap();
    c.subscribe(Lifecycle::Resize, |event| event.prevent_default());
    assert!(!c.resize_now(Viewport::new(1200.0)));
    assert_eq!(c.settings().items, 3);
}

#[test]
fn invalid_options_fail_construction() {
    let err = CarouselBuilder::new(
        CarouselOptions::from(Settings {
            items: 0,
            ..Settings::default()
        }),
        Viewport::new(900.0),
    )
    .build()
    .unwrap_err();
    assert!(matches!(err, vitrine_core::CarouselError::Options(_)));
}

#[test]
fn snapshot_serializes() {
    let c = build(looping(), 4);
    let json = serde_json::to_value(c.snapshot()).unwrap();
    assert_eq!(json["current"], 3);
    assert_eq!(json["relative"], 0);
    assert_eq!(json["settings"]["loop"], true);
    assert_eq!(json["items"].as_array().unwrap().len(), 4);
}
