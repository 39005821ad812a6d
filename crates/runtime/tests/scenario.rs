//! Worlds built from content directories.
use std::fs;

use skirmish_content::ContentFactory;
use skirmish_core::ObjectType;
use skirmish_runtime::{Brain, Event, RuntimeConfig, ScriptEvent, World};

#[test]
fn bundled_duel_runs_without_script_faults() {
    let factory = ContentFactory::bundled();
    let config = RuntimeConfig {
        rules: factory.load_rules().unwrap(),
        ..RuntimeConfig::default()
    };
    let scenario = factory.load_scenario("duel").unwrap();
    let mut world = World::from_scenario(&scenario, &config).unwrap();

    assert_eq!(world.characters().count(), 2);
    assert_eq!(world.items().count(), 2);
    assert!(world.characters().all(|(_, character)| character.brain.is_scripted()));

    let reports = world.run(300);

    let faults: Vec<&ScriptEvent> = reports
        .iter()
        .flat_map(|report| report.script_events())
        .collect();
    assert!(faults.is_empty(), "unexpected script events: {faults:?}");
    assert_eq!(world.now().0, 300);
}

#[test]
fn training_dummy_is_passive() {
    let factory = ContentFactory::bundled();
    let scenario = factory.load_scenario("training").unwrap();
    let world = World::from_scenario(&scenario, &RuntimeConfig::default()).unwrap();

    let dummy = world
        .characters()
        .find(|(_, character)| character.state.kind() == ObjectType::Npc)
        .map(|(_, character)| character)
        .unwrap();
    assert!(matches!(dummy.brain, Brain::Passive));
    assert!(dummy.script.is_none());
}

#[test]
fn broken_script_in_content_does_not_stop_the_world() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("scripts")).unwrap();
    fs::create_dir_all(root.join("scenarios")).unwrap();
    fs::write(
        root.join("characters.ron"),
        r#"[
            (id: "brute", name: "Brute", kind: Npc, script: Some("scripts/brute.lua")),
            (id: "scout", name: "Scout", kind: Npc, script: Some("scripts/scout.lua")),
        ]"#,
    )
    .unwrap();
    fs::write(root.join("items.ron"), "[]").unwrap();
    fs::write(root.join("scripts/brute.lua"), "function decide(tick").unwrap();
    fs::write(
        root.join("scripts/scout.lua"),
        "function decide(tick) setAction(Action.Move) setDirection(Direction.Down) end",
    )
    .unwrap();
    fs::write(
        root.join("scenarios/pit.ron"),
        r#"(
            arena: (width: 100, height: 100),
            characters: [
                (template: "brute", at: (x: 10, y: 10)),
                (template: "scout", at: (x: 60, y: 10)),
            ],
        )"#,
    )
    .unwrap();

    let factory = ContentFactory::new(root);
    let scenario = factory.load_scenario("pit").unwrap();
    let mut world = World::from_scenario(&scenario, &RuntimeConfig::default()).unwrap();

    let report = world.tick();
    let load_failures = report
        .events
        .iter()
        .filter(|event| matches!(event, Event::Script(ScriptEvent::LoadFailed { .. })))
        .count();
    assert_eq!(load_failures, 1);

    let scout = world
        .characters()
        .find(|(_, character)| character.state.record().name == "Scout")
        .map(|(_, character)| character)
        .unwrap();
    assert_eq!(scout.state.position().y, 11);
}
