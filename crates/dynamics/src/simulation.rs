//! # Simulation World
//!
//! [`World`] owns the bodies, the springs and the slice-start snapshot used
//! as the "previous" pose during collision detection. [`World::step`] is the
//! only operation that advances time.
//!
//! ## Adaptive sub-stepping
//!
//! A step integrates the whole remaining time in one trial sub-step and
//! checks for contacts. A contact deeper than
//! [`WorldConfig::penetration_threshold`] rejects the trial: the bodies are
//! restored from the snapshot and the sub-step is halved. Once the trial is at
//! or below [`WorldConfig::min_substep`] the contact is accepted anyway, so the
//! bisection always terminates. Accepted sub-steps resolve at most one contact
//! and the next trial covers all of the time that is left.

use std::ops::AddAssign;

use tracing::{debug, trace, warn};

use crate::body::RigidBody;
use crate::collision::{detect_body_body, resolve_contact, Contact};
use crate::config::WorldConfig;
use crate::error::PhysicsError;
use crate::integrator::integrate_bodies;
use crate::spring::Spring;
use crate::types::{BodyHandle, SpringHandle};

/// What happened during one or more calls to [`World::step`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Trial integrations performed, accepted or not.
    pub substeps: u32,
    /// Trials rejected because a contact was too deep.
    pub retries: u32,
    /// Contacts passed to collision response.
    pub contacts: u32,
    /// Too-deep contacts accepted at the sub-step floor.
    pub fallbacks: u32,
    /// Contacts whose penetration already existed at slice start.
    pub carried_over: u32,
    /// Largest depth among the contacts passed to collision response.
    pub max_depth: f32,
}

impl StepReport {
    fn record_contact(&mut self, contact: &Contact) {
        self.contacts += 1;
        if contact.carried_over {
            self.carried_over += 1;
        }
        self.max_depth = self.max_depth.max(contact.depth);
    }
}

impl AddAssign for StepReport {
    fn add_assign(&mut self, other: Self) {
        self.substeps += other.substeps;
        self.retries += other.retries;
        self.contacts += other.contacts;
        self.fallbacks += other.fallbacks;
        self.carried_over += other.carried_over;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// States of the adaptive stepping loop.
#[derive(Debug)]
enum Phase {
    /// Integrate `trial` seconds from the snapshot and look for contacts.
    Integrating { remaining: f32, trial: f32 },
    /// The trial went too deep; restore and halve it.
    PenetratedRetry { remaining: f32, trial: f32 },
    /// Too deep at the sub-step floor; accept the contact as it is.
    PenetratedFallback {
        remaining: f32,
        trial: f32,
        contact: Contact,
    },
    /// The trial is accepted, with at most one contact to respond to.
    Resolved {
        remaining: f32,
        trial: f32,
        contact: Option<Contact>,
    },
    Done,
}

/// A caller-owned simulation context.
#[derive(Clone, Debug, Default)]
pub struct World {
    config: WorldConfig,
    pub(crate) bodies: Vec<RigidBody>,
    previous: Vec<RigidBody>,
    pub(crate) springs: Vec<Spring>,
}

impl World {
    /// Creates an empty world.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: WorldConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self {
            config,
            bodies: Vec::new(),
            previous: Vec::new(),
            springs: Vec::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Replaces the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] and keeps the old configuration
    /// if `config` does not validate.
    pub fn set_config(&mut self, config: WorldConfig) -> Result<(), PhysicsError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    #[must_use]
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.index())
    }

    /// Mutable access to a body. Call [`RigidBody::compute_aux`] after
    /// changing its momenta or orientation.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle.index())
    }

    #[must_use]
    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    #[must_use]
    pub fn spring(&self, handle: SpringHandle) -> Option<&Spring> {
        self.springs.get(handle.index())
    }

    pub fn spring_mut(&mut self, handle: SpringHandle) -> Option<&mut Spring> {
        self.springs.get_mut(handle.index())
    }

    /// Two distinct bodies borrowed mutably at once.
    fn body_pair_mut(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Option<(&mut RigidBody, &mut RigidBody)> {
        let (i, j) = (a.index(), b.index());
        if i == j || i >= self.bodies.len() || j >= self.bodies.len() {
            return None;
        }
        if i < j {
            let (head, tail) = self.bodies.split_at_mut(j);
            Some((&mut head[i], &mut tail[0]))
        } else {
            let (head, tail) = self.bodies.split_at_mut(i);
            Some((&mut tail[0], &mut head[j]))
        }
    }

    /// Accumulates the force and torque of every enabled spring.
    pub fn compute_spring_forces(&mut self) {
        for spring in self.springs.iter().filter(|spring| spring.enabled) {
            for load in spring.loads(&self.bodies).into_iter().flatten() {
                if let Some(body) = self.bodies.get_mut(load.body.index()) {
                    body.apply_force_at(load.force, load.lever);
                }
            }
        }
    }

    /// Adds `gravity * mass` to every dynamic body.
    pub fn apply_gravity(&mut self) {
        let gravity = self.config.gravity;
        for body in self.bodies.iter_mut().filter(|body| body.is_dynamic()) {
            body.force += gravity * body.mass();
        }
    }

    /// Integrates every dynamic body over `dt`.
    pub fn integrate_bodies(&mut self, dt: f32) {
        integrate_bodies(
            &mut self.bodies,
            dt,
            self.config.linear_damping,
            self.config.angular_damping,
        );
    }

    /// First contact over all ordered body pairs `(i, j)`, `i != j`, in index
    /// order, comparing each body against the slice-start snapshot of the
    /// other. Not the deepest contact, and not the earliest in time.
    #[must_use]
    pub fn detect_collisions(&self) -> Option<Contact> {
        for (i, reference) in self.bodies.iter().enumerate() {
            for (j, current) in self.bodies.iter().enumerate() {
                if i == j {
                    continue;
                }
                let previous = self.previous.get(j).unwrap_or(current);
                let contact = detect_body_body(
                    reference,
                    previous,
                    current,
                    (BodyHandle(i), BodyHandle(j)),
                );
                if contact.is_some() {
                    return contact;
                }
            }
        }
        None
    }

    /// Applies the restitution impulse for `contact`. Returns the signed
    /// impulse magnitude, or `None` when nothing was applied.
    pub fn handle_collision(&mut self, contact: &Contact) -> Option<f32> {
        let restitution = self.config.restitution;
        let (reference, incident) = self.body_pair_mut(contact.reference, contact.incident)?;
        resolve_contact(reference, incident, contact, restitution)
    }

    /// Overwrites the slice-start snapshot with the current bodies.
    fn snapshot(&mut self) {
        self.previous.clone_from(&self.bodies);
    }

    /// Discards a rejected trial.
    fn restore(&mut self) {
        self.bodies.clone_from(&self.previous);
    }

    pub fn clear_accumulators(&mut self) {
        for body in &mut self.bodies {
            body.clear_accumulators();
        }
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidTimeStep`] without touching the world if
    /// `dt` is negative or not finite.
    pub fn step(&mut self, dt: f32) -> Result<StepReport, PhysicsError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }

        self.compute_spring_forces();
        self.apply_gravity();

        let threshold = self.config.penetration_threshold;
        let min_substep = self.config.min_substep;
        let mut report = StepReport::default();

        let mut phase = if dt > 0.0 {
            self.snapshot();
            Phase::Integrating {
                remaining: dt,
                trial: dt,
            }
        } else {
            Phase::Done
        };

        loop {
            phase = match phase {
                Phase::Integrating { remaining, trial } => {
                    self.integrate_bodies(trial);
                    report.substeps += 1;
                    match self.detect_collisions() {
                        Some(contact) if contact.is_too_deep(threshold) => {
                            if trial > min_substep {
                                Phase::PenetratedRetry { remaining, trial }
                            } else {
                                Phase::PenetratedFallback {
                                    remaining,
                                    trial,
                                    contact,
                                }
                            }
                        }
                        contact => Phase::Resolved {
                            remaining,
                            trial,
                            contact,
                        },
                    }
                }
                Phase::PenetratedRetry { remaining, trial } => {
                    report.retries += 1;
                    self.restore();
                    trace!(trial, "contact too deep, halving sub-step");
                    Phase::Integrating {
                        remaining,
                        trial: trial / 2.0,
                    }
                }
                Phase::PenetratedFallback {
                    remaining,
                    trial,
                    contact,
                } => {
                    report.fallbacks += 1;
                    warn!(
                        depth = contact.depth,
                        trial, "penetration fallback at minimum sub-step"
                    );
                    Phase::Resolved {
                        remaining,
                        trial,
                        contact: Some(contact),
                    }
                }
                Phase::Resolved {
                    remaining,
                    trial,
                    contact,
                } => {
                    if let Some(contact) = contact {
                        debug!(trial, depth = contact.depth, "collision");
                        report.record_contact(&contact);
                        self.handle_collision(&contact);
                    }
                    let remaining = remaining - trial;
                    if remaining > 0.0 {
                        self.snapshot();
                        Phase::Integrating {
                            remaining,
                            trial: remaining,
                        }
                    } else {
                        Phase::Done
                    }
                }
                Phase::Done => break,
            };
        }

        self.clear_accumulators();
        Ok(report)
    }

    /// Advances one frame of `frame_dt` seconds as
    /// [`WorldConfig::substeps`] equal calls to [`step`](Self::step).
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidTimeStep`] if `frame_dt` is negative or
    /// not finite.
    #[allow(clippy::cast_precision_loss)]
    pub fn advance(&mut self, frame_dt: f32) -> Result<StepReport, PhysicsError> {
        if !(frame_dt.is_finite() && frame_dt >= 0.0) {
            return Err(PhysicsError::InvalidTimeStep(frame_dt));
        }
        let substeps = self.config.substeps;
        let dt = frame_dt / substeps as f32;
        let mut report = StepReport::default();
        for _ in 0..substeps {
            report += self.step(dt)?;
        }
        Ok(report)
    }

    /// Runs `steps` consecutive steps of `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidTimeStep`] if `dt` is negative or not
    /// finite.
    pub fn run(&mut self, dt: f32, steps: usize) -> Result<StepReport, PhysicsError> {
        let mut report = StepReport::default();
        for _ in 0..steps {
            report += self.step(dt)?;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mat3, Vec3};

    #[test]
    fn rejects_invalid_time_steps() {
        let mut world = World::default();
        world
            .add_box(Vec3::ONE, 1.0, Vec3::ZERO, Mat3::IDENTITY)
            .unwrap();
        assert_eq!(
            world.step(-0.1),
            Err(PhysicsError::InvalidTimeStep(-0.1))
        );
        assert!(world.step(f32::INFINITY).is_err());
        assert!(world.step(f32::NAN).is_err());
        assert_eq!(world.bodies()[0].position, Vec3::ZERO);
    }

    #[test]
    fn zero_step_only_clears_accumulators() {
        let mut world = World::default();
        let h = world
            .add_box(Vec3::ONE, 1.0, Vec3::ZERO, Mat3::IDENTITY)
            .unwrap();
        let report = world.step(0.0).unwrap();
        assert_eq!(report.substeps, 0);
        let body = world.body(h).unwrap();
        assert_eq!(body.force, Vec3::ZERO);
        assert_eq!(body.velocity(), Vec3::ZERO);
    }

    #[test]
    fn single_free_body_takes_one_substep() {
        let mut world = World::default();
        world
            .add_box(Vec3::ONE, 1.0, Vec3::new(0.0, 10.0, 0.0), Mat3::IDENTITY)
            .unwrap();
        let report = world.step(1.0 / 60.0).unwrap();
        assert_eq!(report.substeps, 1);
        assert_eq!(report.retries, 0);
        assert_eq!(report.contacts, 0);
    }

    #[test]
    fn deep_contact_bisects_until_accepted() {
        let mut world = World::new(WorldConfig::default().frictionless()).unwrap();
        world
            .add_fixed_box(Vec3::ONE, Vec3::ZERO, Mat3::IDENTITY)
            .unwrap();
        let slim = Vec3::new(1.0, 0.5, 0.5);
        let h = world
            .add_box(slim, 1.0, Vec3::new(1.2, 0.0, 0.0), Mat3::IDENTITY)
            .unwrap();
        world
            .body_mut(h)
            .unwrap()
            .set_velocity(Vec3::new(-3.0, 0.0, 0.0), Vec3::ZERO);

        // A full 0.1 s trial would carry the corner 0.1 inside.
        let report = world.step(0.1).unwrap();
        assert!(report.retries > 0);
        assert!(report.contacts >= 1);
    }

    #[test]
    fn body_pair_mut_handles_either_order() {
        let mut world = World::default();
        let a = world
            .add_box(Vec3::ONE, 1.0, Vec3::ZERO, Mat3::IDENTITY)
            .unwrap();
        let b = world
            .add_box(Vec3::ONE, 2.0, Vec3::X, Mat3::IDENTITY)
            .unwrap();
        let (first, second) = world.body_pair_mut(b, a).unwrap();
        assert!((first.mass() - 2.0).abs() < f32::EPSILON);
        assert!((second.mass() - 1.0).abs() < f32::EPSILON);
        assert!(world.body_pair_mut(a, a).is_none());
        assert!(world.body_pair_mut(a, BodyHandle(7)).is_none());
    }

    #[test]
    fn report_accumulates() {
        let mut total = StepReport::default();
        total += StepReport {
            substeps: 2,
            contacts: 1,
            max_depth: 0.004,
            ..StepReport::default()
        };
        total += StepReport {
            substeps: 3,
            retries: 1,
            max_depth: 0.002,
            ..StepReport::default()
        };
        assert_eq!(total.substeps, 5);
        assert_eq!(total.retries, 1);
        assert!((total.max_depth - 0.004).abs() < f32::EPSILON);
    }
}
