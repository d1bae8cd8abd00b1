use std::time::{Duration, Instant};

use vitrine_core::plugins::{Autoplay, Lazy, Navigation, Navigator};
use vitrine_core::{
    Carousel, CarouselBuilder, CarouselOptions, Command, Content, PointerEvent,
    PointerPhase, Settings, Viewport,
};

fn images(n: usize) -> Vec<Content> {
    (0..n).map(|i| Content::new(format!("/img/{i}.jpg"))).collect()
}

fn autoplaying(settings: Settings, t0: Instant) -> Carousel {
    CarouselBuilder::new(CarouselOptions::from(settings), Viewport::new(900.0))
        .items(images(4))
        .plugin(Autoplay::new())
        .clock(t0)
        .build()
        .unwrap()
}

fn autoplay_settings() -> Settings {
    Settings {
        items: 1,
        autoplay: true,
        autoplay_timeout: 1_000,
        ..Settings::default()
    }
}

fn relative_current(carousel: &Carousel) -> Option<usize> {
    carousel.current().and_then(|c| carousel.relative(c))
}

#[test]
fn autoplay_advances_on_its_interval() {
    let t0 = Instant::now();
    let mut c = autoplaying(autoplay_settings(), t0);
    assert!(c.plugin::<Autoplay>().unwrap().is_playing());

    c.tick(t0 + Duration::from_millis(999));
    assert_eq!(c.current(), Some(0));

    c.tick(t0 + Duration::from_millis(1_000));
    assert_eq!(c.current(), Some(1));

    c.tick(t0 + Duration::from_millis(2_000));
    assert_eq!(c.current(), Some(2));

    c.dispatch(Command::Stop).unwrap();
    c.tick(t0 + Duration::from_millis(5_000));
    assert_eq!(c.current(), Some(2));
    assert!(!c.plugin::<Autoplay>().unwrap().is_playing());
}

#[test]
fn autoplay_pauses_while_hovered() {
    let t0 = Instant::now();
    let settings = Settings {
        autoplay_hover_pause: true,
        ..autoplay_settings()
    };
    let mut c = autoplaying(settings, t0);

    c.hover(true);
    c.tick(t0 + Duration::from_millis(5_000));
    assert_eq!(c.current(), Some(0));
    assert!(c.plugin::<Autoplay>().unwrap().is_paused());

    c.hover(false);
    c.tick(t0 + Duration::from_millis(5_500));
    assert_eq!(c.current(), Some(0));
    c.tick(t0 + Duration::from_millis(6_000));
    assert_eq!(c.current(), Some(1));
}

#[test]
fn autoplay_skips_while_dragging() {
    let t0 = Instant::now();
    let mut c = autoplaying(autoplay_settings(), t0);

    c.pointer(PointerEvent::mouse(PointerPhase::Down, 400.0, 10.0, t0));
    c.pointer(PointerEvent::mouse(PointerPhase::Move, 380.0, 10.0, t0));
    c.tick(t0 + Duration::from_millis(1_000));
    assert_eq!(c.current(), Some(0));
    assert!(c.is_dragging());
}

#[test]
fn play_command_overrides_interval() {
    let t0 = Instant::now();
    let mut c = autoplaying(
        Settings {
            autoplay: false,
            ..autoplay_settings()
        },
        t0,
    );
    assert!(!c.plugin::<Autoplay>().unwrap().is_playing());

    c.dispatch(Command::Play {
        timeout: Some(300),
        speed: Some(0),
    })
    .unwrap();
    c.tick(t0 + Duration::from_millis(300));
    assert_eq!(c.current(), Some(1));
}

#[test]
fn play_with_an_enormous_interval_never_fires() {
    let t0 = Instant::now();
    let mut c = autoplaying(autoplay_settings(), t0);
    c.dispatch(Command::Play {
        timeout: Some(u64::MAX),
        speed: Some(0),
    })
    .unwrap();
    assert!(c.plugin::<Autoplay>().unwrap().is_playing());

    c.tick(t0 + Duration::from_secs(3_600));
    assert_eq!(c.current(), Some(0));
}

#[test]
fn plugins_compose_on_one_carousel() {
    let mut c = CarouselBuilder::new(
        CarouselOptions::from(Settings {
            looping: true,
            lazy_load: true,
            ..Settings::default()
        }),
        Viewport::new(900.0),
    )
    .items(images(6))
    .plugin(Navigation::new())
    .plugin(Lazy::new())
    .build()
    .unwrap();

    let lazy = c.plugin::<Lazy>().unwrap();
    let first = c.items()[0].id;
    assert!(lazy.is_loaded(first));
    let clones_of_first = c.clones_of(Some(0));
    assert!(
        clones_of_first
            .iter()
            .all(|slot| lazy.loaded_slots().contains(slot))
    );

    Navigator::new(&mut c).prev(Some(0)).unwrap();
    assert_eq!(relative_current(&c), Some(5));
    let controls = c.plugin::<Navigation>().unwrap().controls();
    assert!(!controls.prev_disabled && !controls.next_disabled);
    assert_eq!(controls.active_page, Some(1));
}
