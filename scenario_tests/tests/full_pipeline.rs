// End-to-end elevator scenarios.
//
// Each test builds a world through a `Scenario`, feeds host commands through
// `Sandbox::step()`, and checks where agents end up and what the floor
// indicator showed. The code under test is the same `ElevatorSystem` and
// reference host the replay binary runs; only the `TestTower` wrapper is
// test-specific.

use liftwell_sim::command::{HostAction, HostCommand};
use liftwell_sim::config::ElevatorConfig;
use liftwell_sim::gesture::{AscendGesture, JumpVerdict};
use liftwell_sim::host::AgentControl;
use liftwell_sim::sandbox::{Sandbox, Scenario, ScenarioFloor};
use liftwell_sim::types::{AgentId, Compass, Material, Position};
use scenario_tests::{TestTower, WORLD, floor, on_floor};

const ALICE: AgentId = AgentId(1);
const BOB: AgentId = AgentId(2);

// ---------------------------------------------------------------------------
// Riding
// ---------------------------------------------------------------------------

#[test]
fn ride_to_the_top_and_back_down() {
    let mut tower = TestTower::new(&[10, 40, 70]);
    tower.join(ALICE, on_floor(10));

    tower.hop(ALICE);
    assert_eq!(tower.standing_y(ALICE), 40);
    tower.hop(ALICE);
    assert_eq!(tower.standing_y(ALICE), 70);
    // Top floor: the jump is just a jump.
    tower.hop(ALICE);
    assert_eq!(tower.standing_y(ALICE), 70);

    tower.sneak(ALICE);
    assert_eq!(tower.standing_y(ALICE), 40);
    tower.sneak(ALICE);
    assert_eq!(tower.standing_y(ALICE), 10);
    tower.sneak(ALICE);
    assert_eq!(tower.standing_y(ALICE), 10);

    assert_eq!(
        tower.indicator_titles(ALICE),
        vec!["Floor 2 of 3", "Floor 3 of 3", "Floor 2 of 3", "Floor 1 of 3"]
    );
    assert_eq!(tower.moves.len(), 4);
}

#[test]
fn holding_jump_moves_only_once() {
    let mut tower = TestTower::new(&[0, 20, 40, 60]);
    tower.join(ALICE, on_floor(0));

    // Several rising samples in one arc, then the landing.
    tower.jump(ALICE);
    tower.jump(ALICE);
    tower.jump(ALICE);
    assert_eq!(tower.standing_y(ALICE), 20);
    tower.land(ALICE);
    tower.jump(ALICE);
    assert_eq!(tower.standing_y(ALICE), 40);
}

#[test]
fn floors_below_zero_are_reachable() {
    let mut tower = TestTower::new(&[-30, 5]);
    tower.join(ALICE, on_floor(5));
    tower.sneak(ALICE);
    assert_eq!(tower.standing_y(ALICE), -30);
    assert_eq!(tower.shaft_floors(), vec![-30, 5]);
}

#[test]
fn jumping_beside_the_shaft_does_nothing() {
    let mut tower = TestTower::new(&[10, 40]);
    let beside = on_floor(10);
    tower.join(ALICE, [beside[0] + 3.0, beside[1], beside[2]]);
    tower.hop(ALICE);
    tower.sneak(ALICE);
    assert!(tower.moves.is_empty());
    assert!(tower.sandbox.elevators.cache().is_empty());
}

#[test]
fn climbing_a_ladder_never_teleports() {
    let mut tower = TestTower::new(&[10, 40]);
    // Ladder in the block the agent's feet occupy.
    tower.set_block(Position::new(WORLD, 8, 11, 8), Material::Ladder);
    tower.join(ALICE, on_floor(10));
    tower.jump(ALICE);
    assert_eq!(tower.standing_y(ALICE), 10);
    assert!(tower.moves.is_empty());
}

#[test]
fn agents_ride_independently() {
    let mut tower = TestTower::new(&[10, 40, 70]);
    tower.join(ALICE, on_floor(10));
    tower.join(BOB, on_floor(70));

    tower.hop(ALICE);
    tower.sneak(BOB);
    assert_eq!(tower.standing_y(ALICE), 40);
    assert_eq!(tower.standing_y(BOB), 40);
    assert_eq!(tower.indicator(ALICE).as_deref(), Some("Floor 2 of 3"));
    assert_eq!(tower.indicator(BOB).as_deref(), Some("Floor 2 of 3"));

    tower.sneak(ALICE);
    tower.hop(BOB);
    assert_eq!(tower.standing_y(ALICE), 10);
    assert_eq!(tower.standing_y(BOB), 70);
}

#[test]
fn separate_columns_are_separate_elevators() {
    let mut tower = TestTower::new(&[10, 40]);
    let other = Position::new(WORLD, 2, 25, 2);
    tower
        .sandbox
        .host
        .worlds
        .build_floor(other, Material::IronBlock, Material::SmoothStone);
    tower
        .sandbox
        .host
        .worlds
        .build_floor(other.with_y(60), Material::IronBlock, Material::SmoothStone);

    tower.join(ALICE, [2.5, 26.0, 2.5]);
    tower.hop(ALICE);
    assert_eq!(tower.standing_y(ALICE), 60);
    assert_eq!(tower.indicator(ALICE).as_deref(), Some("Floor 2 of 2"));
    // The shaft column was never touched.
    assert!(tower.shaft_floors().is_empty());
    assert_eq!(tower.sandbox.elevators.cache().len(), 1);
}

// ---------------------------------------------------------------------------
// World edits
// ---------------------------------------------------------------------------

#[test]
fn floor_built_after_discovery_joins_the_elevator() {
    let mut tower = TestTower::new(&[10, 70]);
    tower.join(ALICE, on_floor(10));
    tower.hop(ALICE);
    assert_eq!(tower.shaft_floors(), vec![10, 70]);

    // Build a floor at 40 one block at a time.
    tower.set_block(floor(40), Material::IronBlock);
    for dir in Compass::ALL {
        tower.set_block(floor(40).neighbor(dir), Material::SmoothStone);
    }
    tower.walk_to(ALICE, on_floor(40));
    tower.hop(ALICE);

    assert_eq!(tower.standing_y(ALICE), 70);
    assert_eq!(tower.shaft_floors(), vec![10, 40, 70]);
    assert_eq!(tower.indicator(ALICE).as_deref(), Some("Floor 3 of 3"));
}

#[test]
fn breaking_a_rim_block_removes_its_floor() {
    let mut tower = TestTower::new(&[10, 40, 70]);
    tower.join(ALICE, on_floor(10));
    tower.hop(ALICE);

    tower.break_block(floor(40).neighbor(Compass::West));
    assert_eq!(tower.removed, vec![floor(40)]);
    assert_eq!(tower.shaft_floors(), vec![10, 70]);

    tower.walk_to(ALICE, on_floor(10));
    tower.hop(ALICE);
    assert_eq!(tower.standing_y(ALICE), 70);
    assert_eq!(tower.indicator(ALICE).as_deref(), Some("Floor 2 of 2"));
}

#[test]
fn replacing_a_center_removes_its_floor() {
    let mut tower = TestTower::new(&[10, 40, 70]);
    tower.join(ALICE, on_floor(70));
    tower.sneak(ALICE);

    tower.set_block(floor(10), Material::GoldBlock);
    assert_eq!(tower.removed, vec![floor(10)]);

    // 40 is now the bottom.
    tower.sneak(ALICE);
    assert_eq!(tower.standing_y(ALICE), 40);
}

#[test]
fn edits_to_unknown_columns_are_ignored() {
    let mut tower = TestTower::new(&[10, 40]);
    tower.break_block(floor(40));
    assert!(tower.removed.is_empty());
    assert!(tower.sandbox.elevators.cache().is_empty());

    // First use scans the column as it is now.
    tower.join(ALICE, on_floor(10));
    tower.hop(ALICE);
    assert_eq!(tower.standing_y(ALICE), 10);
    assert_eq!(tower.shaft_floors(), vec![10]);
}

#[test]
fn emptied_elevator_picks_up_new_floors() {
    let mut tower = TestTower::new(&[10, 40]);
    tower.join(ALICE, on_floor(10));
    tower.hop(ALICE);
    tower.break_block(floor(10));
    tower.break_block(floor(40));
    assert!(tower.shaft_floors().is_empty());
    assert_eq!(tower.sandbox.elevators.cache().len(), 1);

    for y in [0, 50] {
        tower
            .sandbox
            .host
            .worlds
            .build_floor(floor(y), Material::IronBlock, Material::SmoothStone);
    }
    tower.walk_to(ALICE, on_floor(0));
    tower.hop(ALICE);
    // Only the marker the agent stood on was healed in, so there is nothing
    // above it yet.
    assert_eq!(tower.shaft_floors(), vec![0]);
    tower.walk_to(ALICE, on_floor(50));
    tower.sneak(ALICE);
    assert_eq!(tower.standing_y(ALICE), 0);
}

// ---------------------------------------------------------------------------
// Floor indicator
// ---------------------------------------------------------------------------

#[test]
fn indicator_hides_after_leaving_the_elevator() {
    let mut tower = TestTower::new(&[10, 40]);
    tower.join(ALICE, on_floor(10));
    tower.hop(ALICE);
    assert!(tower.indicator(ALICE).is_some());

    // Shown at tick 2, first check at tick 62.
    tower.walk_to(ALICE, [1.5, 41.0, 1.5]);
    tower.wait(57);
    assert!(tower.indicator(ALICE).is_some());
    tower.wait(1);
    assert!(tower.indicator(ALICE).is_none());
    assert_eq!(tower.hide_count(ALICE), 1);
}

#[test]
fn indicator_stays_while_on_the_elevator() {
    let mut tower = TestTower::new(&[10, 40]);
    tower.join(ALICE, on_floor(10));
    tower.hop(ALICE);

    tower.wait(600);
    assert_eq!(tower.indicator(ALICE).as_deref(), Some("Floor 2 of 2"));
    assert_eq!(tower.hide_count(ALICE), 0);

    tower.walk_to(ALICE, [1.5, 41.0, 1.5]);
    tower.wait(60);
    assert!(tower.indicator(ALICE).is_none());
}

#[test]
fn indicator_duration_follows_config() {
    let config = ElevatorConfig {
        display_duration_secs: 10,
        ..ElevatorConfig::default()
    };
    let mut tower = TestTower::with_config(&[10, 40], config);
    tower.join(ALICE, on_floor(10));
    tower.hop(ALICE);
    tower.walk_to(ALICE, [1.5, 41.0, 1.5]);

    tower.wait(150);
    assert!(tower.indicator(ALICE).is_some());
    tower.wait(100);
    assert!(tower.indicator(ALICE).is_none());
}

#[test]
fn indicator_can_be_turned_off() {
    let config = ElevatorConfig {
        display_floor_on_teleport: false,
        ..ElevatorConfig::default()
    };
    let mut tower = TestTower::with_config(&[10, 40], config);
    tower.join(ALICE, on_floor(10));
    tower.hop(ALICE);
    assert_eq!(tower.standing_y(ALICE), 40);
    assert!(tower.indicator_titles(ALICE).is_empty());
}

#[test]
fn quitting_hides_the_indicator() {
    let mut tower = TestTower::new(&[10, 40]);
    tower.join(ALICE, on_floor(10));
    tower.hop(ALICE);
    tower.quit(ALICE);
    assert_eq!(tower.hide_count(ALICE), 1);
    assert!(tower.sandbox.elevators.gestures().state(ALICE).is_none());

    // The pending check finds nothing to do.
    tower.wait(120);
    assert_eq!(tower.hide_count(ALICE), 1);
}

// ---------------------------------------------------------------------------
// Observers and configuration
// ---------------------------------------------------------------------------

#[test]
fn cancelled_jump_stays_put_and_loses_lift() {
    let mut tower = TestTower::new(&[10, 40]);
    tower
        .sandbox
        .elevators
        .add_jump_observer(Box::new(|g: &AscendGesture| {
            if g.agent == ALICE {
                JumpVerdict::Cancel {
                    reason: "rooted".into(),
                }
            } else {
                JumpVerdict::Proceed
            }
        }));
    tower.join(ALICE, on_floor(10));
    tower.join(BOB, on_floor(10));

    tower.jump(ALICE);
    assert_eq!(tower.standing_y(ALICE), 10);
    assert_eq!(tower.sandbox.host.velocity(ALICE).map(|v| v.y), Some(0.0));

    tower.jump(BOB);
    assert_eq!(tower.standing_y(BOB), 40);
}

#[test]
fn custom_materials() {
    let config = ElevatorConfig {
        center_material: "GOLD_BLOCK".into(),
        rim_material: "quartz_block".into(),
        ..ElevatorConfig::default()
    };
    let json = r#"{
        "worlds": [ { "id": 0, "shape": { "size_x": 8, "size_y": 64, "size_z": 8 } } ],
        "floors": [
            { "at": { "world": 0, "x": 4, "y": 5, "z": 4 }, "center": "gold_block", "rim": "quartz_block" },
            { "at": { "world": 0, "x": 4, "y": 20, "z": 4 } },
            { "at": { "world": 0, "x": 4, "y": 35, "z": 4 }, "center": "gold_block", "rim": "quartz_block" }
        ],
        "commands": [
            { "tick": 0, "action": { "Join": { "agent": 1, "world": 0, "location": [4.5, 6.0, 4.5] } } },
            { "tick": 5, "action": { "Move": {
                "agent": 1, "velocity": { "x": 0.0, "y": 0.42, "z": 0.0 }, "on_ground": false
            } } }
        ]
    }"#;
    let scenario = Scenario::from_json(json).unwrap();
    let mut sandbox = Sandbox::from_scenario(&scenario, config).unwrap();
    let result = sandbox.run(&scenario).unwrap();

    // The iron/smooth-stone floor at 20 is not one of these elevators.
    assert_eq!(result.moves.len(), 1);
    assert_eq!(result.moves[0].moved.target.y, 35);
    assert_eq!(result.moves[0].moved.floor_count, 2);
}

#[test]
fn unknown_material_disables_every_elevator() {
    let config = ElevatorConfig {
        rim_material: "bedrock_but_misspelled".into(),
        ..ElevatorConfig::default()
    };
    let mut tower = TestTower::with_config(&[10, 40], config);
    tower.join(ALICE, on_floor(10));
    tower.hop(ALICE);
    tower.sneak(ALICE);
    assert!(tower.moves.is_empty());
    assert!(tower.sandbox.elevators.cache().is_empty());
}

#[test]
fn scenario_round_trips_through_json() {
    let scenario = Scenario {
        floors: vec![ScenarioFloor {
            at: floor(10),
            center: Material::DiamondBlock,
            rim: Material::Obsidian,
        }],
        commands: vec![HostCommand::new(
            3,
            HostAction::ToggleSneak {
                agent: ALICE,
                sneaking: true,
            },
        )],
        run_until: Some(10),
        ..Scenario::default()
    };
    let json = serde_json::to_string(&scenario).unwrap();
    let restored = Scenario::from_json(&json).unwrap();
    assert_eq!(restored, scenario);
    assert_eq!(restored.end_tick(), 10);
}
