use clap::Parser;
use hull_fire_core::{
    Character, EmberCrossing, EventOrigin, ExtinguishOutcome, FireConfig, FireEvent,
    FireRegistry, FireSounds, HeadlessWorld, Hull, HullId, Item, Rect, RemovalCause, Vec2,
};
use tracing_subscriber::EnvFilter;

/// Seconds an ember drifts sideways before the demo checks where it landed
const EMBER_FLIGHT: f32 = 1.0;

/// Hull fire demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "hull-fire-demo")]
#[command(about = "Headless hull fire simulation demo", long_about = None)]
struct Args {
    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 60.0)]
    duration: f32,

    /// Simulation ticks per second
    #[arg(short, long, default_value_t = 60.0)]
    tick_rate: f32,

    /// Number of hulls, laid out side by side
    #[arg(long, default_value_t = 3)]
    hulls: u32,

    /// Hull width in world units
    #[arg(long, default_value_t = 400.0)]
    hull_width: f32,

    /// Hull height in world units
    #[arg(long, default_value_t = 200.0)]
    hull_height: f32,

    /// Number of fires to start
    #[arg(short, long, default_value_t = 1)]
    fires: u32,

    /// Standing water in every hull, as % of its volume
    #[arg(short, long, default_value_t = 0.0)]
    water: f32,

    /// Breathable gas in every hull, as % of its volume
    #[arg(short, long, default_value_t = 100.0)]
    oxygen: f32,

    /// RNG seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 5.0)]
    report_interval: f32,

    /// Point an extinguisher at the first fire every tick
    #[arg(short, long)]
    extinguish: bool,

    /// Extinguishing agent per second
    #[arg(long, default_value_t = 40.0)]
    extinguish_rate: f32,
}

/// Fire lifecycle counters, fed from the registry's events
#[derive(Debug, Default)]
struct RunStats {
    ignited: usize,
    merged: usize,
    starved: usize,
    extinguished: usize,
    removed: usize,
    peak_fires: usize,
    peak_width: f32,
}

impl RunStats {
    fn record(&mut self, fires: &mut FireRegistry) {
        for event in fires.take_events() {
            match event {
                FireEvent::Ignited { .. } => self.ignited += 1,
                FireEvent::Removed { cause, .. } => match cause {
                    RemovalCause::Merged { .. } => self.merged += 1,
                    RemovalCause::Starved => self.starved += 1,
                    RemovalCause::Extinguished => self.extinguished += 1,
                    RemovalCause::Requested | RemovalCause::HullCleared => self.removed += 1,
                },
            }
        }
        self.peak_fires = self.peak_fires.max(fires.len());
        self.peak_width = self.peak_width.max(fires.total_width());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if args.tick_rate <= 0.0 || args.hulls == 0 {
        return Err("tick rate and hull count must be positive".into());
    }

    println!("=== Hull Fire Demo ===\n");

    let mut world = HeadlessWorld::new();
    let hulls = build_vessel(&mut world, &args);
    println!(
        "Created {} hulls of {:.0}x{:.0} (O2 {:.0}%, water {:.0}%)",
        hulls.len(),
        args.hull_width,
        args.hull_height,
        args.oxygen,
        args.water
    );

    let config = FireConfig {
        seed: args.seed,
        ..FireConfig::default()
    };
    let sounds = FireSounds::load(&mut world.audio);
    let mut fires = FireRegistry::new(config, sounds)?;
    let mut stats = RunStats::default();

    let per_hull = args.fires.div_ceil(args.hulls);
    for i in 0..args.fires {
        let hull = hulls[(i % args.hulls) as usize];
        let Some(rect) = world.hulls.get(hull).map(Hull::world_rect) else {
            continue;
        };
        let slot = (i / args.hulls) as f32 + 1.0;
        let point = Vec2::new(
            rect.left() + rect.width * slot / (per_hull as f32 + 1.0),
            rect.bottom() + rect.height * 0.5,
        );
        let ignited = fires.ignite(point, Some(hull), EventOrigin::Local, &mut world.context())?;
        if let Some(id) = ignited {
            println!(
                "Ignited {} in {} at ({:.0}, {:.0})",
                id, hull, point.x, point.y
            );
        }
    }
    stats.record(&mut fires);

    println!("\nRunning simulation...\n");
    println!("Time(s) | Fires | Width(u) | Spread | Hulls (O2% / water)");
    println!("--------|-------|----------|--------|--------------------");

    let dt = 1.0 / args.tick_rate;
    let mut time = 0.0;
    let mut next_report = 0.0;
    let mut spread = 0;

    while time < args.duration {
        fires.update_all(dt, &mut world.context());
        spread += carry_embers(&mut fires, &mut world);
        if args.extinguish {
            aim_extinguisher(&mut fires, &mut world, dt, args.extinguish_rate);
        }
        stats.record(&mut fires);
        time += dt;

        if time >= next_report {
            report(time, &fires, &world, &hulls, spread);
            next_report += args.report_interval;
        }
        if fires.is_empty() {
            println!("\nAll fires out after {:.1}s", time);
            break;
        }
    }

    println!("\n=== Simulation Complete ===");
    println!("Final time: {:.1}s", time);
    println!("Fires ignited: {} ({} by embers)", stats.ignited, spread);
    println!(
        "Merged: {}, starved: {}, extinguished: {}, removed: {}",
        stats.merged, stats.starved, stats.extinguished, stats.removed
    );
    println!(
        "Peak fires: {}, peak burning width: {:.1}",
        stats.peak_fires, stats.peak_width
    );

    for fire in fires.snapshot() {
        println!(
            "  {} in {}: x {:.1}..{:.1}, height {:.1}",
            fire.id,
            fire.hull,
            fire.position.x,
            fire.position.x + fire.size.x,
            fire.size.y
        );
    }
    for (crew, hull) in world.crew.iter().zip(&hulls) {
        println!(
            "  Crew in {}: damage {:.1}, burns {:.1}",
            hull,
            crew.total_damage(),
            crew.total_burn()
        );
    }

    Ok(())
}

/// Lay hulls side by side, one crew member and one crate in each
fn build_vessel(world: &mut HeadlessWorld, args: &Args) -> Vec<HullId> {
    let mut hulls = Vec::with_capacity(args.hulls as usize);

    for i in 0..args.hulls {
        let left = i as f32 * args.hull_width;
        let rect = Rect::new(left, args.hull_height, args.hull_width, args.hull_height);
        let id = world.hulls.add(rect, Vec2::zeros());

        if let Some(hull) = world.hulls.get_mut(id) {
            let volume = hull.full_volume();
            hull.set_oxygen(volume * args.oxygen / 100.0);
            hull.set_water_volume(volume * args.water / 100.0);
        }

        let center = left + args.hull_width * 0.5;
        world
            .crew
            .push(Character::new(Some(id), Vec2::new(center + 30.0, 10.0), 6));
        world
            .items
            .push(Item::new(Some(id), Vec2::new(center - 30.0, 5.0)));
        hulls.push(id);
    }

    hulls
}

/// Drift this tick's embers sideways and report the ones that left their
/// hull. Returns the number of new fires they started.
fn carry_embers(fires: &mut FireRegistry, world: &mut HeadlessWorld) -> usize {
    let crossings: Vec<EmberCrossing> = world
        .particles
        .embers()
        .filter_map(|ember| {
            let source = ember.ember_source?;
            let landed = Vec2::new(
                ember.position.x + ember.velocity.x * EMBER_FLIGHT,
                ember.position.y,
            );
            Some(EmberCrossing {
                source,
                from_hull: ember.hull,
                to_hull: world.hulls.find_hull(landed, Some(ember.hull)),
                position: landed,
            })
        })
        .collect();
    world.particles.clear();

    crossings
        .into_iter()
        .filter_map(|crossing| fires.on_ember_crossed(crossing, &mut world.context()))
        .count()
}

fn aim_extinguisher(fires: &mut FireRegistry, world: &mut HeadlessWorld, dt: f32, rate: f32) {
    let Some(target) = fires.fires().first() else {
        return;
    };
    let Some(hull) = world.hulls.get(target.hull()) else {
        return;
    };
    let id = target.id();
    let aim = target.world_position(hull) + Vec2::new(target.size().x * 0.5, 0.0);

    match fires.extinguish(id, dt, rate, aim, &mut world.context()) {
        Ok(ExtinguishOutcome::Extinguished) => println!("        | {} put out", id),
        Ok(_) => {}
        Err(e) => eprintln!("Extinguisher failed: {}", e),
    }
}

fn report(time: f32, fires: &FireRegistry, world: &HeadlessWorld, hulls: &[HullId], spread: usize) {
    let hull_summary: Vec<String> = hulls
        .iter()
        .filter_map(|&id| world.hulls.get(id))
        .map(|h| format!("{:5.1}/{:6.0}", h.oxygen_percentage(), h.water_volume()))
        .collect();

    println!(
        "{:7.1} | {:5} | {:8.1} | {:6} | {}",
        time,
        fires.len(),
        fires.total_width(),
        spread,
        hull_summary.join("  ")
    );
}
