//! Integration tests for fire growth, suppression, merging and spread
//!
//! Every scenario runs against `HeadlessWorld`, so the effects on audio,
//! lights, particles, crew and items can be checked directly.

use approx::assert_relative_eq;
use hull_fire_core::fire::region::growth_modifier;
use hull_fire_core::{
    Character, EmberCrossing, EventOrigin, ExtinguishOutcome, FireConfig, FireEvent, FireId,
    FireRegistry, FireSounds, HeadlessWorld, HullId, Item, ParticleKind, Rect, RemovalCause, Vec2,
};

const DT: f32 = 0.1;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A 1000x200 hull with its floor at y = 0
fn single_hull_world() -> (HeadlessWorld, HullId) {
    let mut world = HeadlessWorld::new();
    let hull = world
        .hulls
        .add(Rect::new(0.0, 200.0, 1000.0, 200.0), Vec2::zeros());
    (world, hull)
}

fn registry(world: &mut HeadlessWorld, seed: u64) -> FireRegistry {
    let sounds = FireSounds::load(&mut world.audio);
    FireRegistry::new(FireConfig::seeded(seed), sounds).unwrap()
}

fn ignite(fires: &mut FireRegistry, world: &mut HeadlessWorld, x: f32, y: f32) -> FireId {
    fires
        .ignite(Vec2::new(x, y), None, EventOrigin::Local, &mut world.context())
        .unwrap()
        .expect("ignition point should be inside a hull")
}

fn assert_inside_hull(fires: &FireRegistry, world: &HeadlessWorld) {
    for fire in fires.fires() {
        let hull = world.hulls.get(fire.hull()).unwrap();
        assert!(
            hull.rect().encloses(&fire.rect(), 1e-3),
            "{} escaped {}: {:?} not inside {:?}",
            fire.id(),
            hull.id(),
            fire.rect(),
            hull.rect()
        );
    }
}

#[test]
fn test_fire_grows_with_breathable_gas() {
    let (mut world, _) = single_hull_world();
    let mut fires = registry(&mut world, 1);
    let id = ignite(&mut fires, &mut world, 495.0, 100.0);

    let start = fires.fire(id).unwrap().size().x;
    assert_relative_eq!(start, 10.0);

    let mut previous = start;
    for _ in 0..50 {
        fires.update_all(DT, &mut world.context());
        let width = fires.fire(id).unwrap().size().x;
        assert!(width >= previous, "fire shrank from {previous} to {width}");
        previous = width;
    }

    // 5 units/s for 5 s
    assert_relative_eq!(previous, 35.0, epsilon = 1e-3);
    assert_relative_eq!(fires.fire(id).unwrap().left(), 500.0 - 12.5, epsilon = 1e-3);
}

#[test]
fn test_fire_consumes_oxygen() {
    let (mut world, hull) = single_hull_world();
    let mut fires = registry(&mut world, 2);
    ignite(&mut fires, &mut world, 495.0, 100.0);

    let before = world.hulls.get(hull).unwrap().oxygen();
    fires.update_all(DT, &mut world.context());
    let after = world.hulls.get(hull).unwrap().oxygen();

    // width 10 * dt 0.1 * 50
    assert_relative_eq!(before - after, 50.0, epsilon = 1e-2);
}

#[test]
fn test_fire_stays_inside_hull() {
    let (mut world, _) = single_hull_world();
    let mut fires = registry(&mut world, 3);
    ignite(&mut fires, &mut world, 990.0, 100.0);
    ignite(&mut fires, &mut world, 2.0, 198.0);
    ignite(&mut fires, &mut world, 400.0, 1.0);

    assert_inside_hull(&fires, &world);
    for _ in 0..300 {
        fires.update_all(DT, &mut world.context());
        assert_inside_hull(&fires, &world);
    }
}

#[test]
fn test_ignition_at_right_wall_stays_inside() {
    let (mut world, _) = single_hull_world();
    let mut fires = registry(&mut world, 17);
    let id = ignite(&mut fires, &mut world, 998.0, 100.0);

    let fire = fires.fire(id).unwrap();
    assert!(fire.size().x >= 0.0);
    assert!(fire.left() <= 1000.0);
    assert_inside_hull(&fires, &world);

    // Pinned against the wall it cannot reach the minimum width
    fires.update_all(DT, &mut world.context());
    assert!(fires.fire(id).is_none());
    assert!(fires.pending_events().contains(&FireEvent::Removed {
        fire: id,
        cause: RemovalCause::Starved,
    }));
}

#[test]
fn test_large_fire_settles_to_floor() {
    let (mut world, hull) = single_hull_world();
    let mut fires = registry(&mut world, 4);
    let id = ignite(&mut fires, &mut world, 495.0, 150.0);

    let floor = world.hulls.get(hull).unwrap().floor();
    {
        let hull = world.hulls.get(hull).unwrap();
        assert!(fires
            .fire_mut(id)
            .unwrap()
            .set_size(Vec2::new(100.0, 10.0), hull));
    }

    let start_y = fires.fire(id).unwrap().position().y;
    for _ in 0..20 {
        fires.update_all(DT, &mut world.context());
    }
    let end_y = fires.fire(id).unwrap().position().y;
    assert!(end_y < start_y);
    assert!(end_y - floor < (start_y - floor) * 0.5);
}

#[test]
fn test_starved_fire_is_removed() {
    let (mut world, hull) = single_hull_world();
    let mut fires = registry(&mut world, 5);
    let id = ignite(&mut fires, &mut world, 495.0, 100.0);
    world.hulls.get_mut(hull).unwrap().set_oxygen(0.0);

    let modifier = growth_modifier(
        world.hulls.get(hull).unwrap().oxygen_percentage(),
        fires.config().starvation_threshold,
    );
    assert_relative_eq!(modifier, -1.0);

    let mut previous = fires.fire(id).unwrap().size().x;
    let mut ticks = 0;
    while fires.fire(id).is_some() {
        assert!(ticks < 40, "starved fire still burning after {ticks} ticks");
        fires.update_all(DT, &mut world.context());
        ticks += 1;

        if let Some(fire) = fires.fire(id) {
            let width = fire.size().x;
            assert!(width < previous, "width {width} did not drop below {previous}");
            // grow_speed * modifier * dt
            assert_relative_eq!(previous - width, 0.5, epsilon = 1e-4);
            previous = width;
        }
    }

    assert!(fires.fire(id).is_none());
    assert!(world.lights.is_empty());
    assert_eq!(world.audio.playing(), 0);
    assert!(world.hulls.get(hull).unwrap().fires().is_empty());
    assert!(fires.event_history().any(|e| *e
        == FireEvent::Removed {
            fire: id,
            cause: RemovalCause::Starved,
        }));
}

#[test]
fn test_flooded_hull_puts_fire_out() {
    let (mut world, hull) = single_hull_world();
    let mut fires = registry(&mut world, 6);
    let id = ignite(&mut fires, &mut world, 495.0, 100.0);
    world.hulls.get_mut(hull).unwrap().set_water_volume(100_000.0);
    fires.take_events();

    fires.update_all(DT, &mut world.context());

    assert!(fires.fire(id).is_none());
    // min(100000 / 100, 10) * 10 * 0.1
    assert_relative_eq!(
        world.hulls.get(hull).unwrap().water_volume(),
        99_990.0,
        epsilon = 1e-2
    );
    assert_eq!(
        fires.pending_events(),
        &[FireEvent::Removed {
            fire: id,
            cause: RemovalCause::Extinguished,
        }]
    );
}

#[test]
fn test_puddle_slows_but_does_not_stop_fire() {
    let (mut world, hull) = single_hull_world();
    let mut fires = registry(&mut world, 7);
    let id = ignite(&mut fires, &mut world, 495.0, 100.0);
    world.hulls.get_mut(hull).unwrap().set_water_volume(10.0);

    fires.update_all(DT, &mut world.context());

    // grows 0.5, loses min(0.1, 10) * 10 * 0.1 = 0.1
    let fire = fires.fire(id).expect("fire should survive a puddle");
    assert_relative_eq!(fire.size().x, 10.4, epsilon = 1e-4);
    assert!(world.hulls.get(hull).unwrap().water_volume() < 10.0);
}

#[test]
fn test_directed_extinguish() {
    let (mut world, hull) = single_hull_world();
    let mut fires = registry(&mut world, 8);
    let id = ignite(&mut fires, &mut world, 495.0, 100.0);
    world.hulls.get_mut(hull).unwrap().set_water_volume(500.0);
    let mut ctx = world.context();

    // Fire spans [500, 510]; reach is 100 either side
    let outcome = fires
        .extinguish(id, 1.0, 50.0, Vec2::new(800.0, 100.0), &mut ctx)
        .unwrap();
    assert_eq!(outcome, ExtinguishOutcome::OutOfRange);
    assert_relative_eq!(fires.fire(id).unwrap().size().x, 10.0);

    let outcome = fires
        .extinguish(id, 1.0, 2.0, Vec2::new(505.0, 100.0), &mut ctx)
        .unwrap();
    assert_eq!(outcome, ExtinguishOutcome::Reduced);
    assert_relative_eq!(fires.fire(id).unwrap().size().x, 8.0);
    assert_relative_eq!(fires.fire(id).unwrap().left(), 501.0);
    assert_relative_eq!(ctx.hulls.get(hull).unwrap().water_volume(), 498.0);

    // A non-finite dose leaves the fire and the water alone
    let outcome = fires
        .extinguish(id, 1.0, f32::NAN, Vec2::new(505.0, 100.0), &mut ctx)
        .unwrap();
    assert_eq!(outcome, ExtinguishOutcome::OutOfRange);
    assert_relative_eq!(fires.fire(id).unwrap().size().x, 8.0);
    assert_relative_eq!(fires.fire(id).unwrap().left(), 501.0);
    assert_relative_eq!(ctx.hulls.get(hull).unwrap().water_volume(), 498.0);

    let outcome = fires
        .extinguish(id, 1.0, 50.0, Vec2::new(505.0, 100.0), &mut ctx)
        .unwrap();
    assert_eq!(outcome, ExtinguishOutcome::Extinguished);
    assert!(fires.fire(id).is_none());

    // 2 + 50 units of agent drawn from the hull
    assert_relative_eq!(world.hulls.get(hull).unwrap().water_volume(), 448.0);
    assert!(world.lights.is_empty());
}

#[test]
fn test_extinguish_at_hits_every_fire_in_reach() {
    let (mut world, _) = single_hull_world();
    let mut fires = registry(&mut world, 9);
    ignite(&mut fires, &mut world, 95.0, 100.0);
    ignite(&mut fires, &mut world, 195.0, 100.0);
    let far = ignite(&mut fires, &mut world, 795.0, 100.0);

    let affected = fires.extinguish_at(1.0, 100.0, Vec2::new(160.0, 100.0), &mut world.context());

    assert_eq!(affected, 2);
    assert_eq!(fires.len(), 1);
    assert!(fires.fire(far).is_some());
}

#[test]
fn test_overlapping_fires_merge_during_update() {
    let (mut world, hull) = single_hull_world();
    let mut fires = registry(&mut world, 10);
    let first = ignite(&mut fires, &mut world, 495.0, 100.0);
    let second = ignite(&mut fires, &mut world, 507.0, 100.0);

    for _ in 0..20 {
        fires.update_all(DT, &mut world.context());
    }

    assert_eq!(fires.len(), 1);
    assert!(fires.fire(first).is_some());
    assert_eq!(world.hulls.get(hull).unwrap().fires(), &[first]);
    assert_eq!(world.lights.len(), 1);
    assert!(fires.event_history().any(|e| *e
        == FireEvent::Removed {
            fire: second,
            cause: RemovalCause::Merged { into: first },
        }));
}

#[test]
fn test_loops_are_refreshed_not_duplicated() {
    let (mut world, hull) = single_hull_world();
    let mut fires = registry(&mut world, 11);
    let id = ignite(&mut fires, &mut world, 495.0, 100.0);

    fires.update_all(DT, &mut world.context());
    let (basic, large) = fires.fire(id).unwrap().sound_slots();
    assert!(basic.is_some());
    assert!(large.is_none());

    for _ in 0..10 {
        fires.update_all(DT, &mut world.context());
        assert_eq!(world.audio.playing(), 1);
        assert_eq!(fires.fire(id).unwrap().sound_slots().0, basic);
    }

    {
        let hull = world.hulls.get(hull).unwrap();
        assert!(fires
            .fire_mut(id)
            .unwrap()
            .set_size(Vec2::new(400.0, 10.0), hull));
    }
    fires.update_all(DT, &mut world.context());
    assert_eq!(world.audio.playing(), 2);
    let large = fires.fire(id).unwrap().sound_slots().1.unwrap();
    assert_relative_eq!(world.audio.loop_state(large).unwrap().volume, 1.0);
}

#[test]
fn test_light_follows_fire() {
    let (mut world, _) = single_hull_world();
    let mut fires = registry(&mut world, 12);
    let id = ignite(&mut fires, &mut world, 495.0, 100.0);

    let light = fires.fire(id).unwrap().light().unwrap();
    assert_relative_eq!(world.lights.get(light).unwrap().range, 50.0);

    fires.update_all(DT, &mut world.context());
    let width = fires.fire(id).unwrap().size().x;
    let range = world.lights.get(light).unwrap().range;
    assert!(range >= width * 4.0 && range <= width * 5.0);
}

#[test]
fn test_fire_burns_crew_and_items() {
    let (mut world, hull) = single_hull_world();
    let mut fires = registry(&mut world, 13);

    world
        .crew
        .push(Character::new(Some(hull), Vec2::new(505.0, 90.0), 4));
    world
        .crew
        .push(Character::new(Some(hull), Vec2::new(950.0, 90.0), 4));
    let mut corpse = Character::new(Some(hull), Vec2::new(505.0, 90.0), 4);
    corpse.is_dead = true;
    world.crew.push(corpse);
    let mut suit = Character::new(Some(hull), Vec2::new(505.0, 90.0), 2);
    suit.limbs[0].fireproof = true;
    world.crew.push(suit);

    world.items.push(Item::new(Some(hull), Vec2::new(505.0, 90.0)));
    let mut extinguisher = Item::new(Some(hull), Vec2::new(505.0, 90.0));
    extinguisher.fireproof = true;
    world.items.push(extinguisher);

    ignite(&mut fires, &mut world, 495.0, 100.0);
    fires.update_all(DT, &mut world.context());

    assert!(world.crew[0].total_damage() > 0.0);
    assert!(world.crew[0].total_burn() > world.crew[0].total_damage());
    assert_relative_eq!(world.crew[1].total_damage(), 0.0);
    assert_relative_eq!(world.crew[2].total_damage(), 0.0);
    assert_relative_eq!(world.crew[3].limbs[0].damage, 0.0);
    assert!(world.crew[3].limbs[1].damage > 0.0);

    assert!(world.items[0].condition < 100.0);
    assert_relative_eq!(world.items[1].condition, 100.0);
}

#[test]
fn test_embers_spread_fire_to_neighbouring_hull() {
    let mut world = HeadlessWorld::new();
    let a = world
        .hulls
        .add(Rect::new(0.0, 200.0, 500.0, 200.0), Vec2::zeros());
    let b = world
        .hulls
        .add(Rect::new(500.0, 200.0, 500.0, 200.0), Vec2::zeros());
    let mut fires = registry(&mut world, 14);
    let source = ignite(&mut fires, &mut world, 400.0, 100.0);

    let mut ember = None;
    for _ in 0..600 {
        fires.update_all(DT, &mut world.context());
        ember = world.particles.embers().next().copied();
        if ember.is_some() {
            break;
        }
    }
    let ember = ember.expect("a burning fire should emit embers");
    assert_eq!(ember.ember_source, Some(source));
    assert_eq!(ember.kind, ParticleKind::Flame);
    assert_eq!(ember.hull, a);

    // The host's particle system carried the ember through the bulkhead
    let landed = Vec2::new(700.0, ember.position.y.min(190.0));
    let to_hull = world.hulls.find_hull(landed, None);
    assert_eq!(to_hull, Some(b));

    let crossing = EmberCrossing {
        source,
        from_hull: ember.hull,
        to_hull,
        position: landed,
    };
    let spread = fires
        .on_ember_crossed(crossing, &mut world.context())
        .expect("ember should ignite the neighbouring hull");
    let fire = fires.fire(spread).unwrap();
    assert_eq!(fire.hull(), b);
    assert_relative_eq!(fire.position().y, world.hulls.get(b).unwrap().floor());

    // A second ember at the same spot finds the hull already burning
    assert_eq!(fires.on_ember_crossed(crossing, &mut world.context()), None);
}

#[test]
fn test_fires_in_offset_vessel() {
    let mut world = HeadlessWorld::new();
    let origin = Vec2::new(-2000.0, 300.0);
    let hull = world
        .hulls
        .add(Rect::new(0.0, 200.0, 400.0, 200.0), origin);
    let mut fires = registry(&mut world, 15);

    let id = ignite(&mut fires, &mut world, -1900.0, 400.0);
    let fire = fires.fire(id).unwrap();
    assert_eq!(fire.hull(), hull);
    assert_relative_eq!(fire.position().x, 105.0);
    assert_relative_eq!(fire.position().y, 95.0);

    let light = fire.light().unwrap();
    let light_pos = world.lights.get(light).unwrap().position;
    assert_relative_eq!(light_pos.x, -1895.0);
    assert_relative_eq!(light_pos.y, 395.0);

    for _ in 0..20 {
        fires.update_all(DT, &mut world.context());
    }
    assert_inside_hull(&fires, &world);
}

#[test]
fn test_events_queue_until_taken() {
    let (mut world, _) = single_hull_world();
    let mut fires = registry(&mut world, 16);
    let id = ignite(&mut fires, &mut world, 495.0, 100.0);
    assert_eq!(fires.pending_events().len(), 1);
    assert_eq!(fires.pending_events()[0].fire(), id);

    fires.update_all(DT, &mut world.context());
    assert_eq!(fires.pending_events().len(), 1);
    assert_eq!(fires.frame_number(), 1);
    assert_relative_eq!(fires.simulation_time(), DT);

    let taken = fires.take_events();
    assert_eq!(taken.len(), 1);
    assert!(fires.pending_events().is_empty());
    assert_eq!(fires.event_history().count(), 1);

    fires.clear_event_history();
    assert_eq!(fires.event_history().count(), 0);
}

#[test]
fn test_ignition_between_ticks_survives_next_tick() {
    let (mut world, _) = single_hull_world();
    let mut fires = registry(&mut world, 18);
    ignite(&mut fires, &mut world, 100.0, 100.0);
    fires.update_all(DT, &mut world.context());
    fires.take_events();

    // Gameplay code lights a second fire after the tick has run
    let late = ignite(&mut fires, &mut world, 700.0, 100.0);
    fires.update_all(DT, &mut world.context());

    let events = fires.take_events();
    assert!(events.iter().any(|event| matches!(
        event,
        FireEvent::Ignited { fire, origin: EventOrigin::Local, .. } if *fire == late
    )));
    assert!(fires.pending_events().is_empty());
}

#[test]
fn test_seeded_runs_are_deterministic() {
    let run = || {
        let (mut world, _) = single_hull_world();
        let mut fires = registry(&mut world, 99);
        ignite(&mut fires, &mut world, 295.0, 100.0);
        ignite(&mut fires, &mut world, 695.0, 100.0);
        for _ in 0..100 {
            fires.update_all(DT, &mut world.context());
        }
        (fires.snapshot(), world.particles.spawned().len())
    };

    assert_eq!(run(), run());
}
