//! Damped springs between anchor points.

use tracing::{trace, warn};

use crate::body::RigidBody;
use crate::types::{BodyHandle, Vec3};

/// One end of a spring.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Anchor {
    /// A point fixed in world space.
    Fixed(Vec3),
    /// A point fixed in the body frame of `body`.
    Attached { body: BodyHandle, local: Vec3 },
}

impl Anchor {
    #[must_use]
    pub fn attached(body: BodyHandle, local: Vec3) -> Self {
        Self::Attached { body, local }
    }

    #[must_use]
    pub fn body(&self) -> Option<BodyHandle> {
        match self {
            Self::Fixed(_) => None,
            Self::Attached { body, .. } => Some(*body),
        }
    }
}

/// Force a spring applies to one attached anchor during the current step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnchorLoad {
    pub body: BodyHandle,
    pub force: Vec3,
    /// Attachment point rotated into world orientation, relative to the
    /// body's centre of mass.
    pub lever: Vec3,
}

impl AnchorLoad {
    #[must_use]
    pub fn torque(&self) -> Vec3 {
        self.lever.cross(self.force)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    anchors: [Anchor; 2],
    pub rest_length: f32,
    /// Stiffness `ks`.
    pub stiffness: f32,
    /// Damping `kd`, applied to the relative velocity of the anchors.
    pub damping: f32,
    pub enabled: bool,
}

/// World-space kinematics of an anchor for the current body state.
struct AnchorState {
    body: Option<BodyHandle>,
    lever: Vec3,
    world: Vec3,
    velocity: Vec3,
}

impl AnchorState {
    fn fixed(point: Vec3) -> Self {
        Self {
            body: None,
            lever: Vec3::ZERO,
            world: point,
            velocity: Vec3::ZERO,
        }
    }

    /// An attachment to a body missing from `bodies` acts as a fixed anchor
    /// at its local point.
    fn resolve(anchor: Anchor, bodies: &[RigidBody]) -> Self {
        match anchor {
            Anchor::Fixed(point) => Self::fixed(point),
            Anchor::Attached { body, local } => {
                let Some(b) = bodies.get(body.index()) else {
                    warn!(body = body.index(), "spring anchor names a missing body");
                    return Self::fixed(local);
                };
                let lever = b.orientation * local;
                Self {
                    body: Some(body),
                    lever,
                    world: lever + b.position,
                    velocity: b.angular_velocity().cross(lever) + b.velocity(),
                }
            }
        }
    }
}

impl Spring {
    /// Anchors are validated by [`World::add_spring`](crate::World::add_spring),
    /// which is the only public way to create a spring.
    pub(crate) fn new(
        anchors: [Anchor; 2],
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    ) -> Self {
        Self {
            anchors,
            rest_length,
            stiffness,
            damping,
            enabled: true,
        }
    }

    #[must_use]
    pub fn anchors(&self) -> &[Anchor; 2] {
        &self.anchors
    }

    /// Current distance between the two anchors. `bodies` is normally
    /// [`World::bodies`](crate::World::bodies) of the world holding the spring.
    #[must_use]
    pub fn length(&self, bodies: &[RigidBody]) -> f32 {
        let [a, b] = self.anchors.map(|anchor| AnchorState::resolve(anchor, bodies));
        (b.world - a.world).length()
    }

    /// Forces on both anchors for the current body state. The first anchor
    /// receives `f`, the second `-f`, where `f` pulls the first anchor towards
    /// the second while the spring is stretched. Fixed anchors yield `None`.
    ///
    /// With coincident anchors the direction of the elastic force is
    /// undefined, so only the damping term is applied. An anchor whose body is
    /// not in `bodies` is treated as fixed and gets no load.
    #[must_use]
    pub fn loads(&self, bodies: &[RigidBody]) -> [Option<AnchorLoad>; 2] {
        let ends = self.anchors.map(|anchor| AnchorState::resolve(anchor, bodies));
        let separation = ends[1].world - ends[0].world;
        let length = separation.length();

        let mut force = (ends[1].velocity - ends[0].velocity) * self.damping;
        if length > 0.0 && length.is_finite() {
            let extension = length - self.rest_length;
            force += separation * (self.stiffness * extension / length);
        } else {
            trace!(length, "degenerate spring, elastic term skipped");
        }

        let signed = [force, -force];
        let mut loads = [None, None];
        for (i, end) in ends.iter().enumerate() {
            loads[i] = end.body.map(|body| AnchorLoad {
                body,
                force: signed[i],
                lever: end.lever,
            });
        }
        loads
    }
}
