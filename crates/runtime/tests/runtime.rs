//! The runtime driven through its async handle.
use std::time::Duration;

use skirmish_core::{ActionIntent, CharacterTemplate, Direction, ObjectType, Parameter, Position};
use skirmish_runtime::{
    ArenaMap, Event, Runtime, RuntimeConfig, RuntimeError, TickEvent, Topic, World, WorldEvent,
};

fn runtime(config: RuntimeConfig) -> Runtime {
    let world = World::new(ArenaMap::open(200, 200), &config);
    Runtime::builder()
        .config(config)
        .world(world)
        .build()
        .expect("runtime should build")
}

#[tokio::test]
async fn stepping_publishes_world_and_tick_events() {
    let runtime = runtime(RuntimeConfig::default());
    let handle = runtime.handle();
    let mut world_rx = handle.subscribe(Topic::World);
    let mut tick_rx = handle.subscribe(Topic::Tick);

    let walker = handle
        .spawn_character(
            CharacterTemplate::named("walker", ObjectType::Player),
            Position::new(10, 10),
            None,
        )
        .await
        .unwrap();
    assert!(matches!(
        world_rx.recv().await.unwrap(),
        Event::World(WorldEvent::Spawned { handle, .. }) if handle == walker
    ));

    handle
        .set_intent(walker, ActionIntent::moving(Direction::Right))
        .await
        .unwrap();
    let now = handle.step(2).await.unwrap();
    assert_eq!(now.0, 2);

    let moved = world_rx.recv().await.unwrap();
    assert!(matches!(
        moved,
        Event::World(WorldEvent::Moved { handle, to, .. }) if handle == walker && to == Position::new(11, 10)
    ));
    assert!(matches!(
        tick_rx.recv().await.unwrap(),
        Event::Tick(TickEvent::Completed { characters: 1, .. })
    ));

    let state = handle.query_character(walker).await.unwrap();
    assert_eq!(state.position(), Position::new(12, 10));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn commands_on_unknown_entities_fail_cleanly() {
    let runtime = runtime(RuntimeConfig::default());
    let handle = runtime.handle();

    let hero = handle
        .spawn_character(
            CharacterTemplate::named("hero", ObjectType::Player),
            Position::new(0, 0),
            None,
        )
        .await
        .unwrap();
    handle.despawn(hero).await.unwrap();

    assert!(matches!(
        handle.query_character(hero).await,
        Err(RuntimeError::UnknownEntity(_))
    ));
    assert!(matches!(
        handle.level_up(hero, Parameter::HitPoints).await,
        Err(RuntimeError::UnknownEntity(_))
    ));
    assert!(matches!(
        handle.signal(hero, "wake").await,
        Err(RuntimeError::UnknownEntity(_))
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn handle_fails_after_shutdown() {
    let runtime = runtime(RuntimeConfig::default());
    let handle = runtime.handle();
    runtime.shutdown().await.unwrap();

    assert!(matches!(
        handle.now().await,
        Err(RuntimeError::CommandChannelClosed)
    ));
}

#[tokio::test]
async fn free_running_clock_advances_by_itself() {
    let config = RuntimeConfig {
        tick_interval: Some(Duration::from_millis(5)),
        ..RuntimeConfig::default()
    };
    let runtime = runtime(config);
    let handle = runtime.handle();
    let mut tick_rx = handle.subscribe(Topic::Tick);

    for _ in 0..3 {
        assert!(matches!(
            tick_rx.recv().await.unwrap(),
            Event::Tick(TickEvent::Completed { .. })
        ));
    }
    assert!(handle.now().await.unwrap().0 >= 3);

    runtime.shutdown().await.unwrap();
}

#[test]
fn runtime_requires_a_world() {
    assert!(matches!(
        Runtime::builder().build(),
        Err(RuntimeError::MissingWorld)
    ));
}
