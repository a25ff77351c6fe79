//! Contact classification
//!
//! Turns an unordered pair of fixtures into a canonical, ordered pair with a
//! recognised gameplay meaning. The world reports contacts in arbitrary order;
//! everything downstream only ever sees the canonical form.

use super::entity::{
    BrickId, EntityRef, Fixture, FixtureRole, FlipperSide, PaddlePart, ProjectileKind, WallSide,
};

/// Recognised gameplay meaning of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactPair {
    BallFlatTop,
    BallFlipper(FlipperSide),
    BallBrick(BrickId),
    BallFloor,
    ProjectileBrick {
        kind: ProjectileKind,
        brick: BrickId,
        /// Contact came from the bomb's blast sensor rather than its body
        blast: bool,
    },
    ProjectileCeiling(ProjectileKind),
    BonusItemPaddle(BrickId),
    BonusItemFloor(BrickId),
    /// Valid collision with no gameplay rule (e.g. ball against a side wall)
    NoContact,
}

/// A contact with its fixtures placed in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalContact {
    pub primary: Fixture,
    pub secondary: Fixture,
    pub pair: ContactPair,
}

impl CanonicalContact {
    /// True when either side is a sensor (no physical resolution happens)
    pub fn involves_sensor(&self) -> bool {
        self.primary.is_sensor() || self.secondary.is_sensor()
    }
}

/// Put the two fixtures in canonical order.
///
/// Entities are ranked by kind (ball, projectile, bonus item, paddle, brick,
/// wall); ties fall back to the full fixture ordering so the result never
/// depends on argument order.
fn canonical_order(a: Fixture, b: Fixture) -> (Fixture, Fixture) {
    let key = |f: &Fixture| (f.entity.kind(), tie_key(f));
    if key(&a) <= key(&b) { (a, b) } else { (b, a) }
}

// Total order inside a kind, only used to break ties between same-kind fixtures
fn tie_key(f: &Fixture) -> (u8, u32) {
    let role = match f.role {
        FixtureRole::Primary => 0,
        FixtureRole::BlastSensor => 1,
    };
    let id = match f.entity {
        EntityRef::Brick(BrickId(id)) | EntityRef::BonusItem(BrickId(id)) => id,
        EntityRef::Projectile(ProjectileKind::Laser) => 0,
        EntityRef::Projectile(ProjectileKind::Bomb) => 1,
        EntityRef::Paddle(PaddlePart::Body) => 0,
        EntityRef::Paddle(PaddlePart::FlatTop) => 1,
        EntityRef::Paddle(PaddlePart::Flipper(FlipperSide::Left)) => 2,
        EntityRef::Paddle(PaddlePart::Flipper(FlipperSide::Right)) => 3,
        EntityRef::Wall(WallSide::Left) => 0,
        EntityRef::Wall(WallSide::Right) => 1,
        EntityRef::Wall(WallSide::Ceiling) => 2,
        EntityRef::Wall(WallSide::Floor) => 3,
        EntityRef::Ball => 0,
    };
    (role, id)
}

/// Classify an unordered fixture pair into its canonical contact
pub fn classify(a: Fixture, b: Fixture) -> CanonicalContact {
    let (primary, secondary) = canonical_order(a, b);
    CanonicalContact {
        primary,
        secondary,
        pair: pair_rule(primary, secondary),
    }
}

/// The dispatch table: canonical (primary, secondary) -> gameplay meaning
fn pair_rule(primary: Fixture, secondary: Fixture) -> ContactPair {
    use EntityRef as E;
    use FixtureRole::{BlastSensor, Primary};

    match (primary.entity, primary.role, secondary.entity, secondary.role) {
        (E::Ball, Primary, E::Paddle(PaddlePart::FlatTop), Primary) => ContactPair::BallFlatTop,
        (E::Ball, Primary, E::Paddle(PaddlePart::Flipper(side)), Primary) => {
            ContactPair::BallFlipper(side)
        }
        (E::Ball, Primary, E::Brick(id), Primary) => ContactPair::BallBrick(id),
        (E::Ball, Primary, E::Wall(WallSide::Floor), Primary) => ContactPair::BallFloor,

        (E::Projectile(kind), Primary, E::Brick(brick), Primary) => ContactPair::ProjectileBrick {
            kind,
            brick,
            blast: false,
        },
        (E::Projectile(ProjectileKind::Bomb), BlastSensor, E::Brick(brick), Primary) => {
            ContactPair::ProjectileBrick {
                kind: ProjectileKind::Bomb,
                brick,
                blast: true,
            }
        }
        (E::Projectile(kind), Primary, E::Wall(WallSide::Ceiling), Primary) => {
            ContactPair::ProjectileCeiling(kind)
        }

        (E::BonusItem(id), Primary, E::Paddle(_), Primary) => ContactPair::BonusItemPaddle(id),
        (E::BonusItem(id), Primary, E::Wall(WallSide::Floor), Primary) => {
            ContactPair::BonusItemFloor(id)
        }

        _ => ContactPair::NoContact,
    }
}
