//! Rigid-body world backed by rapier2d
//!
//! Bodies are addressed by [`EntityRef`]; fixtures are bound in an
//! [`EntityRegistry`] so every contact comes out already resolved to the two
//! game fixtures involved.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use glam::Vec2;
use rapier2d::prelude::*;

use super::entity::{EntityRef, EntityRegistry, Fixture};
use super::filter::CollisionFilter;

// ---------------------------------------------------------------------------
// Conversion helpers (private) - glam <-> nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn to_group(bits: u16) -> Group {
    Group::from_bits_truncate(u32::from(bits))
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// World construction errors. Any of these means the level can't be played.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    InvalidShape { entity: EntityRef, reason: String },
    UnknownEntity(EntityRef),
    DuplicateEntity(EntityRef),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::InvalidShape { entity, reason } => {
                write!(f, "invalid shape for {entity:?}: {reason}")
            }
            WorldError::UnknownEntity(entity) => write!(f, "no body for {entity:?}"),
            WorldError::DuplicateEntity(entity) => write!(f, "{entity:?} already has a body"),
        }
    }
}

impl std::error::Error for WorldError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Fixed,
    /// Moved by setting its velocity
    Kinematic,
}

impl BodyKind {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyKind::Dynamic => RigidBodyType::Dynamic,
            BodyKind::Fixed => RigidBodyType::Fixed,
            BodyKind::Kinematic => RigidBodyType::KinematicVelocityBased,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { half_width: f32, half_height: f32 },
    Circle { radius: f32 },
}

impl Shape {
    fn validate(&self) -> Result<(), String> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        match *self {
            Shape::Box {
                half_width,
                half_height,
            } if !ok(half_width) || !ok(half_height) => Err(format!(
                "box half extents must be positive, got {half_width} x {half_height}"
            )),
            Shape::Circle { radius } if !ok(radius) => {
                Err(format!("circle radius must be positive, got {radius}"))
            }
            _ => Ok(()),
        }
    }

    fn builder(&self) -> ColliderBuilder {
        match *self {
            Shape::Box {
                half_width,
                half_height,
            } => ColliderBuilder::cuboid(half_width, half_height),
            Shape::Circle { radius } => ColliderBuilder::ball(radius),
        }
    }
}

/// One fixture on a body
#[derive(Debug, Clone, Copy)]
pub struct FixtureDesc {
    pub fixture: Fixture,
    pub shape: Shape,
    /// Offset from the body origin
    pub offset: Vec2,
    pub filter: CollisionFilter,
    pub sensor: bool,
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    /// Perfectly elastic, frictionless bounces no matter what it touches
    pub elastic: bool,
}

impl FixtureDesc {
    pub fn new(fixture: Fixture, shape: Shape, filter: CollisionFilter) -> Self {
        Self {
            fixture,
            shape,
            offset: Vec2::ZERO,
            filter,
            sensor: false,
            restitution: 0.0,
            friction: 0.0,
            density: 1.0,
            elastic: false,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn as_sensor(mut self) -> Self {
        self.sensor = true;
        self.density = 0.0;
        self
    }

    pub fn elastic(mut self) -> Self {
        self.elastic = true;
        self.restitution = 1.0;
        self.friction = 0.0;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

/// Description of a body and its fixtures
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub fixed_rotation: bool,
    pub ccd: bool,
    pub enabled: bool,
    pub fixtures: Vec<FixtureDesc>,
}

impl BodyDesc {
    pub fn new(kind: BodyKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            fixed_rotation: false,
            ccd: false,
            enabled: true,
            fixtures: Vec::new(),
        }
    }

    pub fn with_fixture(mut self, fixture: FixtureDesc) -> Self {
        self.fixtures.push(fixture);
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Start switched off (no simulation, no contacts)
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// What happened to a contact during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactChange {
    /// Shapes started touching (or entered a sensor)
    Started,
    /// The solver pushed the bodies apart this step; velocities now hold the response
    Solved,
    Stopped,
}

/// A contact change between two registered fixtures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawContact {
    pub a: Fixture,
    pub b: Fixture,
    pub change: ContactChange,
}

// ---------------------------------------------------------------------------
// Event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct EventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
    /// Collider pairs that exchanged a non-zero impulse
    forces: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl EventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
            forces: Mutex::new(Vec::new()),
        }
    }

    fn drain<T>(queue: &Mutex<Vec<T>>) -> Vec<T> {
        let mut guard = queue.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }
}

impl EventHandler for EventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
        self.forces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((contact_pair.collider1, contact_pair.collider2));
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: EventCollector,
    registry: EntityRegistry<ColliderHandle>,
    handles: HashMap<EntityRef, RigidBodyHandle>,
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .field("fixtures", &self.registry.len())
            .field("joints", &self.impulse_joints.len())
            .finish()
    }
}

impl PhysicsWorld {
    /// Y-up world: pass a negative `gravity.y` for things to fall
    pub fn new(gravity: Vec2, dt: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: EventCollector::new(),
            registry: EntityRegistry::new(),
            handles: HashMap::new(),
        }
    }

    /// Create a body for `entity` with all its fixtures.
    ///
    /// Every fixture's entity is registered as an alias of this body, so a
    /// multi-part entity (the paddle) can be addressed through any part.
    pub fn create_body(&mut self, entity: EntityRef, desc: &BodyDesc) -> Result<(), WorldError> {
        if desc.fixtures.is_empty() {
            return Err(WorldError::InvalidShape {
                entity,
                reason: "body has no fixtures".to_string(),
            });
        }
        let aliases: Vec<EntityRef> = std::iter::once(entity)
            .chain(desc.fixtures.iter().map(|f| f.fixture.entity))
            .collect();
        if let Some(taken) = aliases
            .iter()
            .find(|e| self.handles.contains_key(e))
        {
            return Err(WorldError::DuplicateEntity(*taken));
        }
        for fixture in &desc.fixtures {
            fixture
                .shape
                .validate()
                .map_err(|reason| WorldError::InvalidShape { entity, reason })?;
        }

        let rb = RigidBodyBuilder::new(desc.kind.to_rapier())
            .translation(vec2_to_na(desc.position))
            .linvel(vec2_to_na(desc.velocity))
            .gravity_scale(desc.gravity_scale)
            .locked_axes(if desc.fixed_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .ccd_enabled(desc.ccd)
            .build();
        let body_handle = self.bodies.insert(rb);

        for fixture in &desc.fixtures {
            let mut builder = fixture
                .shape
                .builder()
                .translation(vec2_to_na(fixture.offset))
                .sensor(fixture.sensor)
                .restitution(fixture.restitution)
                .friction(fixture.friction)
                .density(fixture.density)
                .collision_groups(InteractionGroups::new(
                    to_group(fixture.filter.category),
                    to_group(fixture.filter.mask),
                ))
                .active_events(if fixture.sensor {
                    ActiveEvents::COLLISION_EVENTS
                } else {
                    ActiveEvents::COLLISION_EVENTS | ActiveEvents::CONTACT_FORCE_EVENTS
                })
                // Strictly positive force only, so speculative contacts stay quiet
                .contact_force_event_threshold(0.0);
            if fixture.elastic {
                builder = builder
                    .restitution_combine_rule(CoefficientCombineRule::Max)
                    .friction_combine_rule(CoefficientCombineRule::Min);
            }
            let handle =
                self.colliders
                    .insert_with_parent(builder.build(), body_handle, &mut self.bodies);
            self.registry.bind(handle, fixture.fixture);
        }

        if !desc.enabled {
            if let Some(rb) = self.bodies.get_mut(body_handle) {
                rb.set_enabled(false);
            }
        }
        for alias in aliases {
            self.handles.insert(alias, body_handle);
        }
        log::trace!("Created body for {entity:?} ({} fixtures)", desc.fixtures.len());
        Ok(())
    }

    /// Hinge `b` to `a` with an angular range in radians (relative angle b - a)
    pub fn create_revolute(
        &mut self,
        a: EntityRef,
        b: EntityRef,
        anchor_a: Vec2,
        anchor_b: Vec2,
        limits: [f32; 2],
    ) -> Result<(), WorldError> {
        let ha = self.handle(a).ok_or(WorldError::UnknownEntity(a))?;
        let hb = self.handle(b).ok_or(WorldError::UnknownEntity(b))?;
        let joint = RevoluteJointBuilder::new()
            .local_anchor1(nalgebra::Point2::new(anchor_a.x, anchor_a.y))
            .local_anchor2(nalgebra::Point2::new(anchor_b.x, anchor_b.y))
            .limits(limits)
            .build();
        self.impulse_joints.insert(ha, hb, joint, true);
        Ok(())
    }

    /// Advance one timestep, appending the contact changes it produced.
    ///
    /// Starts and stops come first, then one `Solved` per pair the solver
    /// pushed on. A pair keeps reporting `Solved` for as long as it presses.
    pub fn step(&mut self, contacts: &mut Vec<RawContact>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        let collisions = EventCollector::drain(&self.event_collector.collisions)
            .into_iter()
            .map(|event| match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, ContactChange::Started),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, ContactChange::Stopped),
            });
        let forces = EventCollector::drain(&self.event_collector.forces)
            .into_iter()
            .map(|(h1, h2)| (h1, h2, ContactChange::Solved));

        for (h1, h2, change) in collisions.chain(forces) {
            match (self.registry.resolve(h1), self.registry.resolve(h2)) {
                (Some(a), Some(b)) => contacts.push(RawContact { a, b, change }),
                _ => log::trace!("Contact with unregistered collider dropped"),
            }
        }
    }

    fn handle(&self, entity: EntityRef) -> Option<RigidBodyHandle> {
        self.handles.get(&entity).copied()
    }

    fn body(&self, entity: EntityRef) -> Option<&RigidBody> {
        self.handle(entity).and_then(|h| self.bodies.get(h))
    }

    fn body_mut(&mut self, entity: EntityRef) -> Option<&mut RigidBody> {
        let handle = self.handle(entity)?;
        self.bodies.get_mut(handle)
    }

    pub fn has_body(&self, entity: EntityRef) -> bool {
        self.handles.contains_key(&entity)
    }

    pub fn velocity(&self, entity: EntityRef) -> Option<Vec2> {
        self.body(entity).map(|rb| na_to_vec2(rb.linvel()))
    }

    pub fn set_velocity(&mut self, entity: EntityRef, vel: Vec2) {
        if let Some(rb) = self.body_mut(entity) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    pub fn angular_velocity(&self, entity: EntityRef) -> Option<f32> {
        self.body(entity).map(|rb| rb.angvel())
    }

    pub fn position(&self, entity: EntityRef) -> Option<Vec2> {
        self.body(entity).map(|rb| na_to_vec2(rb.translation()))
    }

    pub fn angle(&self, entity: EntityRef) -> Option<f32> {
        self.body(entity).map(|rb| rb.rotation().angle())
    }

    /// Teleport a body
    pub fn set_position(&mut self, entity: EntityRef, pos: Vec2) {
        if let Some(rb) = self.body_mut(entity) {
            rb.set_translation(vec2_to_na(pos), true);
        }
    }

    pub fn set_gravity_scale(&mut self, entity: EntityRef, scale: f32) {
        if let Some(rb) = self.body_mut(entity) {
            rb.set_gravity_scale(scale, true);
        }
    }

    pub fn apply_impulse(&mut self, entity: EntityRef, impulse: Vec2) {
        if let Some(rb) = self.body_mut(entity) {
            rb.apply_impulse(vec2_to_na(impulse), true);
        }
    }

    /// Switch a body in or out of the simulation. Never call during a step.
    pub fn set_enabled(&mut self, entity: EntityRef, enabled: bool) {
        match self.body_mut(entity) {
            Some(rb) => rb.set_enabled(enabled),
            None => log::warn!("Activation change for {entity:?} without a body"),
        }
    }

    pub fn is_enabled(&self, entity: EntityRef) -> bool {
        self.body(entity).is_some_and(|rb| rb.is_enabled())
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
