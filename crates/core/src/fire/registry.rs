//! The collection of active fires and the per-tick update/merge pass.

use super::config::FireConfig;
use super::events::{EventLog, EventOrigin, FireEvent, RemovalCause};
use super::extinguish::ExtinguishOutcome;
use super::region::{FireRegion, FireSnapshot};
use super::{FireContext, FireId};
use crate::core_types::Vec2;
use crate::error::FireError;
use crate::feedback::FireSounds;
use crate::hull::{HullId, HullMap};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Whether this session owns the fire simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionRole {
    /// Server or single player: creates and removes fires freely.
    #[default]
    Authority,
    /// Networked client: only replicated ignitions and removals apply.
    Replica,
}

/// An ember particle drifted out of the hull it was emitted in.
///
/// Reported by the host's particle system at the moment it detects the
/// crossing, through [`FireRegistry::on_ember_crossed`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmberCrossing {
    /// Fire that emitted the ember
    pub source: FireId,
    /// Hull the ember was emitted in
    pub from_hull: HullId,
    /// Hull the ember is now in, `None` when it left every hull
    pub to_hull: Option<HullId>,
    /// World-space position of the ember
    pub position: Vec2,
}

/// All active fires of a session.
///
/// The registry owns its fires; fires only refer back to their hull by id.
/// Call [`update_all`](Self::update_all) exactly once per simulation tick.
///
/// # Example
///
/// ```
/// use hull_fire_core::{EventOrigin, FireConfig, FireRegistry, FireSounds, HeadlessWorld, Rect, Vec2};
///
/// let mut world = HeadlessWorld::new();
/// world.hulls.add(Rect::new(0.0, 200.0, 1000.0, 200.0), Vec2::zeros());
///
/// let sounds = FireSounds::load(&mut world.audio);
/// let mut fires = FireRegistry::new(FireConfig::seeded(7), sounds).unwrap();
///
/// let id = fires
///     .ignite(Vec2::new(500.0, 50.0), None, EventOrigin::Local, &mut world.context())
///     .unwrap()
///     .expect("point is inside the hull");
///
/// for _ in 0..60 {
///     fires.update_all(1.0 / 60.0, &mut world.context());
/// }
/// assert!(fires.fire(id).unwrap().size().x > 10.0);
/// ```
#[derive(Debug)]
pub struct FireRegistry {
    config: FireConfig,
    sounds: FireSounds,
    role: SessionRole,
    fires: Vec<FireRegion>,
    next_id: u32,
    rng: StdRng,
    events: EventLog,
    simulation_time: f32,
    frame: u32,
}

impl FireRegistry {
    /// Create an empty registry.
    ///
    /// `sounds` must already be loaded; every fire shares them.
    pub fn new(config: FireConfig, sounds: FireSounds) -> Result<Self, FireError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        info!(seed = ?config.seed, "Creating fire registry");

        Ok(Self {
            config,
            sounds,
            role: SessionRole::Authority,
            fires: Vec::new(),
            next_id: 0,
            rng,
            events: EventLog::default(),
            simulation_time: 0.0,
            frame: 0,
        })
    }

    /// Set the session role
    pub fn with_role(mut self, role: SessionRole) -> Self {
        self.role = role;
        self
    }

    pub fn role(&self) -> SessionRole {
        self.role
    }

    pub fn config(&self) -> &FireConfig {
        &self.config
    }

    pub fn sounds(&self) -> &FireSounds {
        &self.sounds
    }

    /// Number of active fires
    pub fn len(&self) -> usize {
        self.fires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fires.is_empty()
    }

    /// Active fires in update order
    pub fn fires(&self) -> &[FireRegion] {
        &self.fires
    }

    pub fn fire(&self, id: FireId) -> Option<&FireRegion> {
        self.fires.iter().find(|f| f.id == id)
    }

    pub fn fire_mut(&mut self, id: FireId) -> Option<&mut FireRegion> {
        self.fires.iter_mut().find(|f| f.id == id)
    }

    /// Fires burning in one hull
    pub fn fires_in(&self, hull: HullId) -> impl Iterator<Item = &FireRegion> {
        self.fires.iter().filter(move |f| f.hull == hull)
    }

    /// Geometry of every active fire
    pub fn snapshot(&self) -> Vec<FireSnapshot> {
        self.fires.iter().map(FireRegion::snapshot).collect()
    }

    /// Sum of the widths of all active fires
    pub fn total_width(&self) -> f32 {
        self.fires.iter().map(|f| f.size.x).sum()
    }

    /// Seconds simulated so far
    pub fn simulation_time(&self) -> f32 {
        self.simulation_time
    }

    /// Number of completed ticks
    pub fn frame_number(&self) -> u32 {
        self.frame
    }

    /// Events recorded since the host last called [`Self::take_events`].
    ///
    /// Ticks do not clear this queue: ignitions and removals made between
    /// two calls to [`Self::update_all`] stay here alongside the events of
    /// the ticks themselves.
    pub fn pending_events(&self) -> &[FireEvent] {
        self.events.pending()
    }

    /// Drain the pending events, oldest first
    pub fn take_events(&mut self) -> Vec<FireEvent> {
        self.events.take_pending()
    }

    /// Bounded history of past events, oldest first
    pub fn event_history(&self) -> impl Iterator<Item = &FireEvent> {
        self.events.history()
    }

    /// Forget all recorded events
    pub fn clear_event_history(&mut self) {
        self.events.clear();
    }

    fn index_of(&self, id: FireId) -> Option<usize> {
        self.fires.iter().position(|f| f.id == id)
    }

    fn check_authority(&self, origin: EventOrigin) -> Result<(), FireError> {
        if self.role == SessionRole::Replica && origin == EventOrigin::Local {
            debug!("Refusing local fire change on a replica");
            return Err(FireError::NotAuthoritative);
        }
        Ok(())
    }

    /// Start a fire at a world point.
    ///
    /// Returns `Ok(None)` when the point is in no hull; fire cannot exist
    /// outside one. `hint` is tested first by the containment query.
    pub fn ignite(
        &mut self,
        world_pos: Vec2,
        hint: Option<HullId>,
        origin: EventOrigin,
        ctx: &mut FireContext<'_>,
    ) -> Result<Option<FireId>, FireError> {
        let Some(hull_id) = ctx.hulls.find_hull(world_pos, hint) else {
            trace!("No hull at {:?}, ignition ignored", world_pos);
            return Ok(None);
        };
        self.check_authority(origin)?;

        let hull = ctx
            .hulls
            .get_mut(hull_id)
            .ok_or(FireError::UnknownHull(hull_id))?;

        let id = FireId(self.next_id);
        self.next_id += 1;

        let fire = FireRegion::new(id, hull, world_pos, &self.config, ctx.lights);
        hull.attach_fire(id);

        debug!(fire = %id, hull = %hull_id, ?origin, "Fire ignited at {:?}", world_pos);
        self.events.record(FireEvent::Ignited {
            fire: id,
            hull: hull_id,
            position: fire.position,
            origin,
        });
        self.fires.push(fire);

        Ok(Some(id))
    }

    /// Advance every fire by `dt` seconds, then merge overlapping fires.
    ///
    /// Fires are updated in reverse order. Fires that burn out or starve
    /// during the update take no part in the merge, and every removed fire
    /// is released in a single compaction at the end of the tick.
    pub fn update_all(&mut self, dt: f32, ctx: &mut FireContext<'_>) {
        debug_assert!(dt.is_finite() && dt >= 0.0, "invalid tick length {dt}");

        self.simulation_time += dt;
        self.frame += 1;

        let mut causes: Vec<Option<RemovalCause>> = vec![None; self.fires.len()];
        for i in (0..self.fires.len()).rev() {
            causes[i] = self.fires[i].update(dt, &self.config, &self.sounds, ctx, &mut self.rng);
        }

        let merged = self.mark_merges(&mut causes, ctx.hulls);
        self.compact(causes, ctx);

        trace!(
            frame = self.frame,
            fires = self.fires.len(),
            merged,
            "Fire tick complete"
        );
    }

    /// Merge overlapping fires without advancing them. Returns the number
    /// of fires absorbed.
    pub fn merge_overlapping(&mut self, ctx: &mut FireContext<'_>) -> usize {
        let mut causes = vec![None; self.fires.len()];
        let merged = self.mark_merges(&mut causes, ctx.hulls);
        self.compact(causes, ctx);
        merged
    }

    /// Mark every fire absorbed by a lower-indexed overlapping fire.
    ///
    /// For each fire `i` from the back, the first live `j < i` (scanning
    /// down) whose horizontal span overlaps absorbs `i`'s span. The survivor
    /// keeps its own height, light and sound slots; the absorbed fire is
    /// marked and skipped from then on. A survivor stretched across a wall
    /// is clamped back into its own hull.
    fn mark_merges(&mut self, causes: &mut [Option<RemovalCause>], hulls: &HullMap) -> usize {
        let mut merged = 0;

        for i in (0..self.fires.len()).rev() {
            if causes[i].is_some() {
                continue;
            }
            for j in (0..i).rev() {
                if causes[j].is_some() {
                    continue;
                }

                let (absorbed, survivor) = (&self.fires[i], &self.fires[j]);
                // Overlap is tested on x only; fires in different hulls merge
                // unless the config asks otherwise
                if self.config.merge_requires_same_hull && absorbed.hull != survivor.hull {
                    continue;
                }
                if !absorbed.overlaps(survivor) {
                    continue;
                }

                let left = absorbed.left().min(survivor.left());
                let right = absorbed.right().max(survivor.right());
                let absorbed_id = absorbed.id;

                let survivor = &mut self.fires[j];
                survivor.position.x = left;
                survivor.size.x = right - left;
                if let Some(hull) = hulls.get(survivor.hull) {
                    survivor.limit_size(hull);
                }

                trace!(survivor = %survivor.id, absorbed = %absorbed_id, "Fires merged");
                causes[i] = Some(RemovalCause::Merged { into: survivor.id });
                merged += 1;
                break;
            }
        }

        merged
    }

    /// Drop every fire with a removal cause, releasing its resources
    fn compact(&mut self, causes: Vec<Option<RemovalCause>>, ctx: &mut FireContext<'_>) {
        if causes.iter().all(Option::is_none) {
            return;
        }

        let fires = std::mem::take(&mut self.fires);
        for (mut fire, cause) in fires.into_iter().zip(causes) {
            match cause {
                None => self.fires.push(fire),
                Some(cause) => self.release(&mut fire, cause, ctx),
            }
        }
    }

    fn release(&mut self, fire: &mut FireRegion, cause: RemovalCause, ctx: &mut FireContext<'_>) {
        fire.release(ctx.audio, ctx.lights);
        if let Some(hull) = ctx.hulls.get_mut(fire.hull) {
            hull.detach_fire(fire.id);
        }
        debug!(fire = %fire.id, ?cause, "Fire removed");
        self.events.record(FireEvent::Removed {
            fire: fire.id,
            cause,
        });
    }

    /// Horizontal containment test of a vessel-local point against one fire
    pub fn contains(&self, id: FireId, point: Vec2) -> Result<bool, FireError> {
        self.fire(id)
            .map(|f| f.contains(point))
            .ok_or(FireError::UnknownFire(id))
    }

    /// True when any fire in `hull` spans the vessel-local point
    pub fn is_on_fire(&self, hull: HullId, point: Vec2) -> bool {
        self.fires_in(hull).any(|f| f.contains(point))
    }

    /// Aim `amount` per second of extinguishing agent at one fire.
    ///
    /// The agent used is drained from the hull's standing water, like the
    /// hull's own liquid extinguishing, and both can act on a fire in the
    /// same tick. A fire put out here is removed immediately.
    pub fn extinguish(
        &mut self,
        id: FireId,
        dt: f32,
        amount: f32,
        world_pos: Vec2,
        ctx: &mut FireContext<'_>,
    ) -> Result<ExtinguishOutcome, FireError> {
        let index = self.index_of(id).ok_or(FireError::UnknownFire(id))?;
        let outcome = self.extinguish_index(index, dt, amount, world_pos, ctx)?;

        if outcome == ExtinguishOutcome::Extinguished {
            let mut fire = self.fires.remove(index);
            self.release(&mut fire, RemovalCause::Extinguished, ctx);
        }
        Ok(outcome)
    }

    /// Aim an extinguisher at a world point and apply it to every fire in
    /// reach. Returns the number of fires affected.
    pub fn extinguish_at(
        &mut self,
        dt: f32,
        amount: f32,
        world_pos: Vec2,
        ctx: &mut FireContext<'_>,
    ) -> usize {
        let mut causes = vec![None; self.fires.len()];
        let mut affected = 0;

        for index in (0..self.fires.len()).rev() {
            match self.extinguish_index(index, dt, amount, world_pos, ctx) {
                Ok(ExtinguishOutcome::OutOfRange) | Err(_) => {}
                Ok(ExtinguishOutcome::Reduced) => affected += 1,
                Ok(ExtinguishOutcome::Extinguished) => {
                    causes[index] = Some(RemovalCause::Extinguished);
                    affected += 1;
                }
            }
        }

        self.compact(causes, ctx);
        affected
    }

    fn extinguish_index(
        &mut self,
        index: usize,
        dt: f32,
        amount: f32,
        world_pos: Vec2,
        ctx: &mut FireContext<'_>,
    ) -> Result<ExtinguishOutcome, FireError> {
        let fire = &mut self.fires[index];
        let hull = ctx
            .hulls
            .get_mut(fire.hull)
            .ok_or(FireError::UnknownHull(fire.hull))?;

        Ok(fire.extinguish_directed(
            dt,
            amount,
            world_pos,
            &self.config,
            hull,
            ctx.particles,
            &mut self.rng,
        ))
    }

    /// Remove a fire, stopping its loops and removing its light.
    ///
    /// On a replica only [`EventOrigin::Replicated`] removals apply.
    pub fn remove(
        &mut self,
        id: FireId,
        origin: EventOrigin,
        ctx: &mut FireContext<'_>,
    ) -> Result<(), FireError> {
        self.check_authority(origin)?;
        let index = self.index_of(id).ok_or(FireError::UnknownFire(id))?;

        let mut fire = self.fires.remove(index);
        self.release(&mut fire, RemovalCause::Requested, ctx);
        Ok(())
    }

    /// Remove every fire in a hull, e.g. before the hull is torn down.
    /// Returns the number of fires removed.
    pub fn clear_hull(&mut self, hull: HullId, ctx: &mut FireContext<'_>) -> usize {
        let causes: Vec<Option<RemovalCause>> = self
            .fires
            .iter()
            .map(|f| (f.hull == hull).then_some(RemovalCause::HullCleared))
            .collect();
        let removed = causes.iter().flatten().count();
        self.compact(causes, ctx);
        removed
    }

    /// Remove every fire
    pub fn clear(&mut self, ctx: &mut FireContext<'_>) {
        let causes = vec![Some(RemovalCause::Requested); self.fires.len()];
        self.compact(causes, ctx);
    }

    /// Handle an ember that drifted into another hull.
    ///
    /// Ignites a new fire on the new hull's floor below the ember, unless
    /// the ember stayed in its own hull, left every hull, or a fire in the
    /// new hull already burns within `ignition_margin` of it.
    pub fn on_ember_crossed(
        &mut self,
        crossing: EmberCrossing,
        ctx: &mut FireContext<'_>,
    ) -> Option<FireId> {
        let to = crossing.to_hull?;
        if to == crossing.from_hull {
            return None;
        }
        let hull = ctx.hulls.get(to)?;

        let local = crossing.position - hull.vessel_origin();
        let margin = self.config.ignition_margin;
        if self
            .fires_in(to)
            .any(|f| local.x > f.left() - margin && local.x < f.right() + margin)
        {
            trace!(hull = %to, "Ember landed next to an existing fire");
            return None;
        }

        let target = Vec2::new(crossing.position.x, hull.world_rect().bottom() + 5.0);
        match self.ignite(target, Some(to), EventOrigin::Local, ctx) {
            Ok(Some(id)) => {
                debug!(fire = %id, source = %crossing.source, hull = %to, "Ember spread fire");
                Some(id)
            }
            Ok(None) => None,
            Err(e) => {
                debug!("Ember ignition refused: {e}");
                None
            }
        }
    }
}
