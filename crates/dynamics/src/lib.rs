#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Box Dynamics
//!
//! A small rigid-body engine for boxes, connected by damped springs and
//! colliding with each other.
//!
//! ## Key Components
//!
//! -   **Rigid Bodies:** [`RigidBody`] stores a box's state as position,
//!     orientation and momenta. A body with negative mass is fixed.
//! -   **Springs:** [`Spring`] joins two [`Anchor`]s, each either a world
//!     point or a point on a body.
//! -   **Collision:** boxes are tested corner-against-box in the frame of the
//!     reference box, see [`collision`]. Contacts are answered with a single
//!     restitution impulse.
//! -   **Simulation:** [`World`] owns everything and advances time with
//!     [`World::step`], bisecting a step whenever a contact is found too deep.
//!
//! ## Usage
//!
//! ```rust
//! use dynamics::{Mat3, Vec3, World, WorldConfig};
//!
//! let mut world = World::new(WorldConfig::default())?;
//! world.add_fixed_box(Vec3::new(10.0, 1.0, 10.0), Vec3::new(0.0, -0.5, 0.0), Mat3::IDENTITY)?;
//! let cube = world.add_box(Vec3::ONE, 1.0, Vec3::new(0.0, 2.0, 0.0), Mat3::IDENTITY)?;
//!
//! let report = world.run(1.0 / 300.0, 100)?;
//! assert!(world.body(cube).is_some());
//! assert!(report.substeps >= 100);
//! # Ok::<(), dynamics::PhysicsError>(())
//! ```

pub mod body;
pub mod builder;
pub mod collision;
pub mod config;
pub mod error;
pub mod integrator;
pub mod simulation;
pub mod spring;
pub mod transform;
pub mod types;

pub use body::{RigidBody, FIXED_MASS};
pub use collision::Contact;
pub use config::WorldConfig;
pub use error::PhysicsError;
pub use simulation::{StepReport, World};
pub use spring::{Anchor, AnchorLoad, Spring};
pub use transform::BodyTransform;
pub use types::{skew_symmetric, BodyHandle, Mat3, Mat4, SpringHandle, Vec3, Vec4};
