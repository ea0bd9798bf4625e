//! Simulation engine - owns the world and runs the tick pipeline.

use crate::components::*;
use crate::systems::*;
use hecs::{Entity, World};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snowline_logic::config::TuningConfig;
use snowline_logic::constants::{BOARDING_WINDOW, CURVE_SAMPLES, TREE_CLEAR_RADIUS};
use snowline_logic::scoring::SkierLevel;
use thiserror::Error;

/// Failure surface of the external commands. Tick systems never error;
/// they self-heal instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("insufficient funds: need {cost}, have {balance}")]
    InsufficientFunds { cost: i64, balance: i64 },
    #[error("no facility with id {0:?}")]
    UnknownFacility(FacilityId),
    #[error("no such skier")]
    UnknownSkier,
}

/// A build command: everything needed to place one facility.
#[derive(Debug, Clone)]
pub struct BuildOrder {
    pub name: String,
    pub kind: FacilityKind,
    pub start: Vec2,
    pub end: Vec2,
    /// Explicit seat count for carriers; derived from length when absent.
    pub capacity: Option<u32>,
    pub cost: i64,
}

/// Main simulation engine.
pub struct SimulationEngine {
    /// ECS world containing all entities.
    pub world: World,
    /// Simulation time in seconds since start.
    pub sim_time: f64,
    pub config: TuningConfig,
    /// Day/night clock state.
    pub cycle: CycleTracker,
    /// Coin balance and floating labels.
    pub ledger: Ledger,
    /// Global snow depth driving the environmental speed multiplier.
    pub snow_depth: f32,
    /// Skiers that have reached the top tier, all-time.
    pub promoted_count: u32,
    /// Decorative tree positions, thinned out by construction.
    pub trees: Vec<Vec2>,

    pub(crate) rng: ChaCha8Rng,
    time_scale: f32,
    pub(crate) next_facility_id: u32,
    pub(crate) next_skier_seq: u64,
    last_spawn: f64,
}

impl SimulationEngine {
    /// Create an empty simulation with a nondeterministic seed.
    pub fn new() -> Self {
        Self::with_seed(TuningConfig::default(), ChaCha8Rng::from_entropy())
    }

    /// Create an empty simulation with a fixed seed, for reproducible runs.
    pub fn from_seed(config: TuningConfig, seed: u64) -> Self {
        Self::with_seed(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_seed(config: TuningConfig, rng: ChaCha8Rng) -> Self {
        Self {
            world: World::new(),
            sim_time: 0.0,
            config,
            cycle: CycleTracker::default(),
            ledger: Ledger::default(),
            snow_depth: 50.0,
            promoted_count: 0,
            trees: Vec::new(),
            rng,
            time_scale: 1.0,
            next_facility_id: 1,
            next_skier_seq: 0,
            last_spawn: 0.0,
        }
    }

    /// Advance the simulation by `delta_seconds` of real time, scaled by the
    /// speed multiplier. A zero scale pauses the world entirely.
    pub fn update(&mut self, delta_seconds: f32) {
        let dt = delta_seconds * self.time_scale;
        if dt <= 0.0 {
            return;
        }
        self.sim_time += dt as f64;

        self.heal_dangling();

        let edges = self.cycle.update(self.sim_time, &self.config.cycle);
        if edges.became_night {
            info!("night falls at t={:.1}", self.sim_time);
            night_policy(&mut self.world, &mut self.rng);
            for pos in night_edge(&mut self.world) {
                self.ledger.credit(self.config.economy.hotel_price, pos);
            }
        }
        if edges.became_day {
            info!("day breaks at t={:.1}", self.sim_time);
            day_policy(&mut self.world, &mut self.rng);
            day_edge(&mut self.world);
        }

        connectivity_system(&mut self.world);
        boarding_system(
            &mut self.world,
            self.sim_time,
            self.config.lift_speed,
            &mut self.rng,
        );
        decision_system(&mut self.world, self.sim_time, &mut self.rng);

        let promotions = movement_system(
            &mut self.world,
            dt,
            &self.config,
            self.snow_depth,
            &mut self.rng,
        );
        for event in promotions {
            self.apply_promotion(event);
        }

        for meal in needs_system(&mut self.world, dt, &self.config) {
            self.ledger.credit(self.config.economy.meal_price, meal.pos);
        }
        economy_system(
            &mut self.world,
            dt as f64,
            self.sim_time,
            &self.config.economy,
            &mut self.ledger,
        );
        population_system(
            &mut self.world,
            self.sim_time,
            &self.config,
            &mut self.rng,
            &mut self.next_skier_seq,
            &mut self.last_spawn,
        );

        self.ledger.decay_labels(dt);
    }

    fn apply_promotion(&mut self, event: PromotionEvent) {
        if event.new_level == SkierLevel::Expertise {
            self.promoted_count += 1;
        }
        let label = self
            .world
            .get::<&Skier>(event.skier)
            .map(|s| s.label.clone())
            .unwrap_or_default();
        self.ledger
            .notice(event.pos, format!("{label} reached {:?}!", event.new_level));

        // Word gets around: a promotion draws new visitors.
        let rewards = self.rng.gen_range(1..=2);
        for _ in 0..rewards {
            let seq = self.next_skier_seq;
            self.next_skier_seq += 1;
            spawn_skier(
                &mut self.world,
                &self.config,
                &mut self.rng,
                seq,
                self.sim_time,
            );
        }
    }

    /// Reset any skier whose facility entity no longer exists.
    fn heal_dangling(&mut self) {
        let mut broken = Vec::new();
        for (skier, state) in self.world.query::<&SkierState>().iter() {
            if let Some(facility) = state.facility() {
                if !self.world.contains(facility) {
                    broken.push(skier);
                }
            }
        }
        for skier in broken {
            debug!("healing skier with dangling facility reference");
            if let Ok(mut state) = self.world.get::<&mut SkierState>(skier) {
                *state = SkierState::Idle;
            }
            if let Ok(mut progress) = self.world.get::<&mut Progress>(skier) {
                progress.0 = 0.0;
            }
        }
    }

    // ---- external commands (between ticks) ----

    /// Place a facility without charging; generation and tests use this.
    pub fn place_facility(
        &mut self,
        name: impl Into<String>,
        kind: FacilityKind,
        start: Vec2,
        end: Vec2,
        capacity: Option<u32>,
    ) -> Entity {
        let id = FacilityId(self.next_facility_id);
        self.next_facility_id += 1;

        let mut facility = Facility::new(id, name, kind, start, end, self.sim_time);
        if let Some(seats) = capacity {
            facility = facility.with_capacity(seats);
        }
        self.clear_trees(&facility);

        let status = if kind.is_gated() {
            FacilityStatus::gated(true)
        } else {
            FacilityStatus::always_open()
        };
        self.world.spawn((facility, status, BoardingQueue::default()))
    }

    /// Build command: funds check, debit, place.
    pub fn build_facility(&mut self, order: BuildOrder) -> Result<Entity, CommandError> {
        if self.ledger.coins < order.cost {
            return Err(CommandError::InsufficientFunds {
                cost: order.cost,
                balance: self.ledger.coins,
            });
        }
        self.ledger.debit(order.cost, order.start);
        Ok(self.place_facility(order.name, order.kind, order.start, order.end, order.capacity))
    }

    /// Demolish command: remove the facility and reset every skier that was
    /// using it to idle at the entrance.
    pub fn demolish_facility(&mut self, id: FacilityId) -> Result<(), CommandError> {
        let entity = self
            .world
            .query::<&Facility>()
            .iter()
            .find(|(_, f)| f.id == id)
            .map(|(e, _)| e)
            .ok_or(CommandError::UnknownFacility(id))?;

        let mut displaced = Vec::new();
        for (skier, state) in self.world.query::<&SkierState>().iter() {
            if state.facility() == Some(entity) {
                displaced.push(skier);
            }
        }
        for skier in displaced {
            self.reset_skier(skier, self.config.spawn_point);
        }
        // The queue component despawns with the facility.
        let _ = self.world.despawn(entity);
        Ok(())
    }

    /// Force-relocate a skier (manual UI action).
    pub fn relocate_skier(&mut self, skier: Entity, pos: Vec2) -> Result<(), CommandError> {
        if !self.world.contains(skier) {
            return Err(CommandError::UnknownSkier);
        }
        self.remove_from_queues(skier);
        self.reset_skier(skier, pos);
        Ok(())
    }

    /// Manual lesson sale: credit the fee at the skier's position.
    pub fn sell_lesson(&mut self, skier: Entity) -> Result<(), CommandError> {
        let pos = self
            .world
            .get::<&Position>(skier)
            .map(|p| p.0)
            .map_err(|_| CommandError::UnknownSkier)?;
        self.ledger.credit(self.config.economy.lesson_price, pos);
        Ok(())
    }

    /// Debug/cheat adjustment, no label.
    pub fn adjust_coins(&mut self, delta: i64) {
        self.ledger.coins += delta;
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn set_snow_depth(&mut self, depth: f32) {
        self.snow_depth = depth.max(0.0);
    }

    fn reset_skier(&mut self, skier: Entity, pos: Vec2) {
        if let Ok(mut state) = self.world.get::<&mut SkierState>(skier) {
            *state = SkierState::Idle;
        }
        if let Ok(mut progress) = self.world.get::<&mut Progress>(skier) {
            progress.0 = 0.0;
        }
        if let Ok(mut position) = self.world.get::<&mut Position>(skier) {
            position.0 = pos;
        }
    }

    fn remove_from_queues(&mut self, skier: Entity) {
        for (_, queue) in self.world.query_mut::<&mut BoardingQueue>() {
            queue.remove(skier);
        }
    }

    /// Fell the trees along a new facility's path.
    fn clear_trees(&mut self, facility: &Facility) {
        let samples: Vec<Vec2> = (0..=CURVE_SAMPLES)
            .map(|i| facility.point_at(i as f32 / CURVE_SAMPLES as f32))
            .collect();
        let before = self.trees.len();
        self.trees
            .retain(|tree| samples.iter().all(|p| p.distance(tree) > TREE_CLEAR_RADIUS));
        let felled = before - self.trees.len();
        if felled > 0 {
            debug!("{felled} trees cleared for {}", facility.name);
        }
    }

    // ---- accessors ----

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn is_night(&self) -> bool {
        self.cycle.is_night
    }

    pub fn coins(&self) -> i64 {
        self.ledger.coins
    }

    pub fn skier_count(&self) -> usize {
        self.world.query::<&Skier>().iter().count()
    }

    pub fn facility_count(&self) -> usize {
        self.world.query::<&Facility>().iter().count()
    }

    pub fn find_facility(&self, id: FacilityId) -> Option<Entity> {
        self.world
            .query::<&Facility>()
            .iter()
            .find(|(_, f)| f.id == id)
            .map(|(e, _)| e)
    }

    /// Structural invariant sweep for test harnesses. Returns one message
    /// per violation; an empty list means the world is consistent.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for (skier, (state, progress)) in self.world.query::<(&SkierState, &Progress)>().iter() {
            if !(0.0..=1.0).contains(&progress.0) {
                violations.push(format!("skier {skier:?}: progress {} out of [0,1]", progress.0));
            }
            if let Some(facility) = state.facility() {
                if !self.world.contains(facility) {
                    violations.push(format!("skier {skier:?}: dangling facility reference"));
                }
            }
            if let SkierState::Lifting { facility, seat } = state {
                if let Ok(f) = self.world.get::<&Facility>(*facility) {
                    if *seat >= f.seat_count() {
                        violations.push(format!(
                            "skier {skier:?}: seat {seat} exceeds capacity of {}",
                            f.name
                        ));
                    }
                }
            }
        }

        // Carrier loading: riders still inside the boarding window hold
        // distinct seats and never outnumber the seat count.
        let mut terminal_seats: std::collections::HashMap<Entity, Vec<u32>> =
            std::collections::HashMap::new();
        for (_, (state, progress)) in self.world.query::<(&SkierState, &Progress)>().iter() {
            if let SkierState::Lifting { facility, seat } = state {
                if progress.0 < BOARDING_WINDOW {
                    terminal_seats.entry(*facility).or_default().push(*seat);
                }
            }
        }
        for (carrier, mut seats) in terminal_seats {
            if let Ok(f) = self.world.get::<&Facility>(carrier) {
                if seats.len() > f.seat_count() as usize {
                    violations.push(format!(
                        "{}: {} riders in the boarding window exceed {} seats",
                        f.name,
                        seats.len(),
                        f.seat_count()
                    ));
                }
                seats.sort_unstable();
                let before = seats.len();
                seats.dedup();
                if seats.len() != before {
                    violations.push(format!("{}: two riders share a seat", f.name));
                }
            }
        }

        // Queue membership: every queued entity is a skier waiting on that
        // exact carrier, and no skier sits in two queues.
        let mut seen = std::collections::HashSet::new();
        for (carrier, queue) in self.world.query::<&BoardingQueue>().iter() {
            for &skier in &queue.0 {
                if !seen.insert(skier) {
                    violations.push(format!("skier {skier:?}: present in multiple queues"));
                }
                match self.world.get::<&SkierState>(skier) {
                    Ok(state)
                        if matches!(*state, SkierState::Waiting { facility } if facility == carrier) => {}
                    Ok(_) => violations
                        .push(format!("skier {skier:?}: queued on {carrier:?} but not waiting on it")),
                    Err(_) => violations.push(format!("queue on {carrier:?} holds a dead entity")),
                }
            }
        }

        violations
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}
