//! Contact response
//!
//! Canonical contacts come in from the classifier tagged with their lifecycle
//! point. Begin and end only do bookkeeping (the ball's incoming velocity, the
//! bomb's blast set); the gameplay rules run once the world has resolved the
//! contact. All rules live in one dispatch table in [`ContactResponder::on_resolved`].
//!
//! The world usually reports a contact a step before it pushes the bodies
//! apart, so a solid begin only marks the contact pending. The rules run on
//! the first `Solved` report for a pending contact, when the velocities
//! already carry the world's response.

use std::collections::HashSet;

use glam::Vec2;

use super::angle_guard::guard_angle;
use super::brick::{BonusKind, HitOutcome, ItemState};
use super::classify::{CanonicalContact, ContactPair, classify};
use super::entity::{BrickId, EntityRef, Fixture, ProjectileKind};
use super::state::GameSession;
use super::steering::{PaddleHit, steer_bounce};
use crate::audio::{AudioSink, SoundEffect};

/// Lifecycle point of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    /// The world pushed the bodies apart this step
    Solved,
    End,
}

/// A classified contact event from one world step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub contact: CanonicalContact,
    pub phase: ContactPhase,
}

impl ContactEvent {
    pub fn begin(a: Fixture, b: Fixture) -> Self {
        Self {
            contact: classify(a, b),
            phase: ContactPhase::Begin,
        }
    }

    pub fn solved(a: Fixture, b: Fixture) -> Self {
        Self {
            contact: classify(a, b),
            phase: ContactPhase::Solved,
        }
    }

    pub fn end(a: Fixture, b: Fixture) -> Self {
        Self {
            contact: classify(a, b),
            phase: ContactPhase::End,
        }
    }
}

/// Running counts, for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactStats {
    pub begins: u64,
    pub ends: u64,
    pub resolved: u64,
    /// Resolved contacts with no gameplay rule
    pub ignored: u64,
    /// Solid contacts that ended without the world ever pushing on them
    pub grazed: u64,
}

#[derive(Debug, Default)]
pub struct ContactResponder {
    pub stats: ContactStats,
    /// Solid contacts that began and still wait for their first solve
    pending: HashSet<CanonicalContact>,
}

impl ContactResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle all events from one step: begins and ends first, then the
    /// resolved pass for pending contacts the world solved.
    ///
    /// `pre_step_ball_vel` is the ball velocity captured before the step.
    pub fn dispatch(
        &mut self,
        session: &mut GameSession,
        events: &[ContactEvent],
        pre_step_ball_vel: Vec2,
        audio: &mut dyn AudioSink,
    ) {
        for event in events {
            match event.phase {
                ContactPhase::Begin => {
                    self.on_begin(session, &event.contact, pre_step_ball_vel);
                    if !event.contact.involves_sensor() {
                        self.pending.insert(event.contact);
                    }
                }
                ContactPhase::End => self.on_end(session, &event.contact),
                ContactPhase::Solved => {}
            }
        }
        for event in events.iter().filter(|e| e.phase == ContactPhase::Solved) {
            if self.pending.remove(&event.contact) {
                // The velocity entering the solving step is the true incoming one
                if is_ball_pair(event.contact.pair) {
                    session.ball.pre_contact_vel = pre_step_ball_vel;
                }
                self.on_resolved(session, &event.contact, audio);
            }
        }
        for event in events.iter().filter(|e| e.phase == ContactPhase::End) {
            if self.pending.remove(&event.contact) {
                self.stats.grazed += 1;
                log::trace!("Contact {:?} ended unsolved", event.contact.pair);
            }
        }
    }

    /// Contacts still waiting for the world to solve them
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn on_begin(&mut self, session: &mut GameSession, contact: &CanonicalContact, pre_vel: Vec2) {
        self.stats.begins += 1;
        match contact.pair {
            pair if is_ball_pair(pair) => {
                session.ball.pre_contact_vel = pre_vel;
            }
            ContactPair::ProjectileBrick {
                kind: ProjectileKind::Bomb,
                brick,
                ..
            } => {
                if session.paddle.bomb.alive && session.blast.insert(brick) {
                    log::trace!("Brick {brick:?} entered blast radius");
                }
            }
            _ => {}
        }
    }

    pub fn on_end(&mut self, session: &mut GameSession, contact: &CanonicalContact) {
        self.stats.ends += 1;
        if let ContactPair::ProjectileBrick {
            kind: ProjectileKind::Bomb,
            brick,
            blast: true,
        } = contact.pair
        {
            if session.blast.remove(brick) {
                log::trace!("Brick {brick:?} left blast radius");
            }
        }
    }

    /// Gameplay rules, one arm per canonical pair
    pub fn on_resolved(
        &mut self,
        session: &mut GameSession,
        contact: &CanonicalContact,
        audio: &mut dyn AudioSink,
    ) {
        self.stats.resolved += 1;
        log::debug!("Contact {:?}", contact.pair);

        match contact.pair {
            ContactPair::BallFlatTop => {
                audio.cue(SoundEffect::BallPaddle);
                let ball = &mut session.ball;
                let hit = PaddleHit {
                    ball_x: ball.pos.x,
                    paddle_x: session.paddle.x,
                    half_width: session.paddle.half_total_width(),
                };
                let steered = steer_bounce(
                    ball.vel,
                    ball.pre_contact_vel,
                    hit,
                    &ball.bounds,
                    &session.steering,
                );
                ball.vel = guard_angle(steered, ball.pre_contact_vel, &ball.bounds);
            }
            ContactPair::BallBrick(id) => {
                audio.cue(SoundEffect::BallBrick);
                let outcome = session.bricks.damage(id, 1);
                apply_hit_outcome(session, id, outcome, audio);
                guard_ball(session);
            }
            ContactPair::BallFlipper(side) => {
                if session
                    .paddle
                    .flipper(side)
                    .is_flipping(session.flipper_motion_threshold)
                {
                    audio.cue(SoundEffect::BallFlipper);
                    session.ball.renormalize();
                }
                guard_ball(session);
            }
            ContactPair::BallFloor => {
                audio.cue(SoundEffect::DeadBall);
                session.lose_life();
            }
            ContactPair::ProjectileBrick {
                kind: ProjectileKind::Laser,
                brick,
                ..
            } => {
                if !session.paddle.laser.alive {
                    return;
                }
                audio.cue(SoundEffect::LaserBrick);
                let power = session.paddle.laser.power;
                let outcome = session.bricks.damage(brick, power);
                apply_hit_outcome(session, brick, outcome, audio);
                retire_projectile(session, ProjectileKind::Laser);
            }
            ContactPair::ProjectileBrick {
                kind: ProjectileKind::Bomb,
                brick,
                ..
            } => {
                if !session.paddle.bomb.alive {
                    return;
                }
                audio.cue(SoundEffect::BombBrick);
                detonate(session, brick, audio);
                retire_projectile(session, ProjectileKind::Bomb);
            }
            ContactPair::ProjectileCeiling(kind) => {
                if !session.paddle.projectile(kind).alive {
                    return;
                }
                audio.cue(match kind {
                    ProjectileKind::Laser => SoundEffect::LaserCeiling,
                    ProjectileKind::Bomb => SoundEffect::BombCeiling,
                });
                retire_projectile(session, kind);
            }
            ContactPair::BonusItemPaddle(id) => catch_item(session, id, audio),
            ContactPair::BonusItemFloor(id) => {
                if let Some(item) = session.bricks.item_mut(id).filter(|i| i.is_alive()) {
                    item.state = ItemState::Missed;
                    log::debug!("Bonus item {:?} missed", item.kind);
                    session.deactivate(EntityRef::BonusItem(id));
                }
            }
            ContactPair::NoContact => {
                self.stats.ignored += 1;
            }
        }
    }
}

fn is_ball_pair(pair: ContactPair) -> bool {
    matches!(
        pair,
        ContactPair::BallFlatTop
            | ContactPair::BallBrick(_)
            | ContactPair::BallFlipper(_)
            | ContactPair::BallFloor
    )
}

fn guard_ball(session: &mut GameSession) {
    let ball = &mut session.ball;
    ball.vel = guard_angle(ball.vel, ball.pre_contact_vel, &ball.bounds);
}

/// Score a destroyed brick, switch its body off and release its item
fn apply_hit_outcome(
    session: &mut GameSession,
    id: BrickId,
    outcome: HitOutcome,
    audio: &mut dyn AudioSink,
) {
    let HitOutcome::Destroyed { points, revealed } = outcome else {
        return;
    };
    audio.cue(SoundEffect::BrickDestroyed);
    session.score += u64::from(points);
    session.deactivate(EntityRef::Brick(id));
    log::info!(
        "Brick {} destroyed (+{points}), {} remaining",
        id.0,
        session.bricks.remaining()
    );
    if let Some(kind) = revealed {
        audio.cue(SoundEffect::BonusItemAppears);
        session.activate(EntityRef::BonusItem(id));
        log::info!("Bonus item {kind:?} released from brick {}", id.0);
    }
}

/// Damage every brick in the blast radius once, then empty the set
fn detonate(session: &mut GameSession, direct_hit: BrickId, audio: &mut dyn AudioSink) {
    session.blast.insert(direct_hit);
    let power = session.paddle.bomb.power;
    let caught = session.blast.detonate();
    log::info!("Bomb detonated on brick {}, {} in radius", direct_hit.0, caught.len());
    for id in caught {
        let outcome = session.bricks.damage(id, power);
        apply_hit_outcome(session, id, outcome, audio);
    }
}

fn retire_projectile(session: &mut GameSession, kind: ProjectileKind) {
    session.paddle.projectile_mut(kind).retire();
    session.deactivate(EntityRef::Projectile(kind));
    if kind == ProjectileKind::Bomb {
        session.blast.clear();
    }
}

fn catch_item(session: &mut GameSession, id: BrickId, audio: &mut dyn AudioSink) {
    let Some(item) = session.bricks.item_mut(id).filter(|i| i.is_alive()) else {
        return;
    };
    item.state = ItemState::Caught;
    let kind = item.kind;
    session.deactivate(EntityRef::BonusItem(id));
    audio.cue(SoundEffect::BonusItemObtained);

    if let Some(weapon) = kind.weapon() {
        session.paddle.equip(weapon);
        log::info!("Equipped {}", weapon.name());
    } else if kind == BonusKind::ExtraLife {
        audio.cue(SoundEffect::ExtraLife);
        session.gain_life();
    } else {
        session.paddle.modifier = Some(kind);
        log::info!("Paddle modifier {kind:?}");
    }
}
