use vitrine_core::{
    CarouselBuilder, CarouselKey, CarouselOptions, Command, CommandBus, Content,
    RejectReason, Settings, Target, Viewport,
};

fn builder(n: usize) -> CarouselBuilder {
    CarouselBuilder::new(
        CarouselOptions::from(Settings::default()),
        Viewport::new(900.0),
    )
    .items((0..n).map(|i| Content::new(format!("/img/{i}.jpg"))))
}

#[test]
fn broadcast_reaches_addressed_carousels() {
    let bus = CommandBus::default();
    let mut hero = builder(6).listen(&bus, "hero").build().unwrap();
    let mut gallery = builder(6)
        .listen(&bus, CarouselKey::new(String::from("gallery-2")))
        .build()
        .unwrap();
    assert_eq!(bus.listeners(), 2);

    assert_eq!(
        bus.broadcast(Target::All, Command::Next { speed: Some(0) }),
        2
    );
    bus.broadcast(
        Target::key("hero"),
        Command::To {
            position: 3,
            speed: Some(0),
        },
    );

    assert_eq!(hero.pump(), 2);
    assert_eq!(gallery.pump(), 1);
    assert_eq!(hero.current(), Some(3));
    assert_eq!(gallery.current(), Some(1));
    assert_eq!(hero.pump(), 0);
}

#[test]
fn lagging_listener_keeps_the_newest_commands() {
    let bus = CommandBus::new(2);
    let mut c = builder(6).listen(&bus, "catalog").build().unwrap();
    for _ in 0..5 {
        bus.broadcast(Target::All, Command::Next { speed: Some(0) });
    }
    assert_eq!(c.pump(), 2);
    assert_eq!(c.current(), Some(2));
}

#[test]
fn bus_commands_mutate_items_and_destroy() {
    let bus = CommandBus::default();
    let mut c = builder(3).listen(&bus, "gallery").build().unwrap();

    bus.broadcast(
        Target::Key(CarouselKey::from("gallery")),
        Command::Add {
            content: Content::new("/img/extra.jpg"),
            position: None,
        },
    );
    bus.broadcast(Target::All, Command::Remove { position: 0 });
    assert_eq!(c.pump(), 2);
    assert_eq!(c.len(), 3);
    assert_eq!(c.items()[2].content.image, "/img/extra.jpg");

    bus.broadcast(Target::All, Command::Destroy);
    bus.broadcast(Target::All, Command::Refresh);
    assert_eq!(c.pump(), 1);
    assert!(c.is_destroyed());
    assert_eq!(bus.listeners(), 0);
    assert_eq!(
        c.dispatch(Command::Refresh).unwrap_err().reason(),
        Some(RejectReason::Destroyed)
    );
}

#[test]
fn keys_are_matched_by_name() {
    let bus = CommandBus::default();
    let mut hero = builder(6).listen(&bus, "hero").build().unwrap();
    bus.broadcast(Target::key("Hero"), Command::Next { speed: Some(0) });
    bus.broadcast(Target::key("hero-2"), Command::Next { speed: Some(0) });
    assert_eq!(hero.pump(), 0);
    assert_eq!(hero.current(), Some(0));

    let key = CarouselKey::from("hero");
    assert!(Target::key("hero").matches(&key));
    assert_eq!(key.to_string(), "hero");
    assert_eq!(key.as_str(), "hero");
}

#[test]
fn broadcast_without_listeners_is_harmless() {
    let bus = CommandBus::new(4);
    assert_eq!(bus.broadcast(Target::All, Command::Stop), 0);
}

#[test]
fn commands_read_from_json() {
    let command: Command =
        serde_json::from_str(r#"{ "command": "to", "position": -1 }"#).unwrap();
    assert_eq!(
        command,
        Command::To {
            position: -1,
            speed: None
        }
    );
    assert_eq!(command.name(), "to");
}
