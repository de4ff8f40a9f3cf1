#![deny(clippy::all, clippy::pedantic)]
//! JSON scene descriptions.
//!
//! A scene lists boxes by id and connects them with springs that refer to
//! those ids. [`Scene::into_world`] validates the references and builds a
//! [`World`].

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use dynamics::{Anchor, BodyHandle, Mat3, Vec3, World, WorldConfig};
use serde::Deserialize;
use tracing::{debug, info};

const DEMO: &str = include_str!("../scenes/demo.json");

#[derive(Debug, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub config: ConfigOverrides,
    pub bodies: Vec<BodyDef>,
    #[serde(default)]
    pub springs: Vec<SpringDef>,
}

/// Fields left out keep their [`WorldConfig::default`] value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub gravity: Option<[f32; 3]>,
    pub linear_damping: Option<f32>,
    pub angular_damping: Option<f32>,
    pub restitution: Option<f32>,
    pub min_substep: Option<f32>,
    pub penetration_threshold: Option<f32>,
    pub substeps: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub enum BodyDef {
    #[serde(rename = "dynamic")]
    Dynamic {
        id: String,
        /// Full edge lengths.
        size: [f32; 3],
        mass: f32,
        position: [f32; 3],
        #[serde(default)]
        rotation: Option<AxisAngle>,
        #[serde(default = "zero_vec")]
        velocity: [f32; 3],
        #[serde(default = "zero_vec")]
        angular_velocity: [f32; 3],
    },
    #[serde(rename = "fixed")]
    Fixed {
        id: String,
        size: [f32; 3],
        position: [f32; 3],
        #[serde(default)]
        rotation: Option<AxisAngle>,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AxisAngle {
    pub axis: [f32; 3],
    pub degrees: f32,
}

#[derive(Debug, Deserialize)]
pub struct SpringDef {
    pub a: AnchorDef,
    pub b: AnchorDef,
    /// Defaults to the anchor distance in the initial pose.
    #[serde(default)]
    pub rest_length: Option<f32>,
    pub stiffness: f32,
    #[serde(default)]
    pub damping: f32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub enum AnchorDef {
    #[serde(rename = "fixed")]
    Fixed { point: [f32; 3] },
    #[serde(rename = "body")]
    Body {
        id: String,
        #[serde(default = "zero_vec")]
        local: [f32; 3],
    },
}

/// A built world together with the handles of its named bodies.
#[derive(Debug)]
pub struct LoadedScene {
    pub world: World,
    pub handles: HashMap<String, BodyHandle>,
}

impl LoadedScene {
    #[must_use]
    pub fn handle(&self, id: &str) -> Option<BodyHandle> {
        self.handles.get(id).copied()
    }

    /// Body ids with their handles, in the order the bodies were added.
    #[must_use]
    pub fn named_handles(&self) -> Vec<(&str, BodyHandle)> {
        let mut named: Vec<_> = self
            .handles
            .iter()
            .map(|(id, handle)| (id.as_str(), *handle))
            .collect();
        named.sort_by_key(|&(_, handle)| handle);
        named
    }
}

fn zero_vec() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

impl ConfigOverrides {
    #[must_use]
    pub fn apply(&self, base: WorldConfig) -> WorldConfig {
        WorldConfig {
            gravity: self.gravity.map_or(base.gravity, vec3),
            linear_damping: self.linear_damping.unwrap_or(base.linear_damping),
            angular_damping: self.angular_damping.unwrap_or(base.angular_damping),
            restitution: self.restitution.unwrap_or(base.restitution),
            min_substep: self.min_substep.unwrap_or(base.min_substep),
            penetration_threshold: self
                .penetration_threshold
                .unwrap_or(base.penetration_threshold),
            substeps: self.substeps.unwrap_or(base.substeps),
        }
    }
}

impl AxisAngle {
    /// Rotation matrix for this axis and angle.
    ///
    /// # Errors
    ///
    /// Fails if the axis has zero length or is not finite.
    pub fn to_mat3(self) -> Result<Mat3> {
        let axis = vec3(self.axis).normalize_or_zero();
        if axis == Vec3::ZERO || !self.degrees.is_finite() {
            bail!("rotation needs a non-zero axis and a finite angle");
        }
        Ok(Mat3::from_axis_angle(axis, self.degrees.to_radians()))
    }
}

fn orientation(rotation: Option<AxisAngle>) -> Result<Mat3> {
    rotation.map_or(Ok(Mat3::IDENTITY), AxisAngle::to_mat3)
}

impl BodyDef {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Dynamic { id, .. } | Self::Fixed { id, .. } => id.as_str(),
        }
    }

    fn add_to(&self, world: &mut World) -> Result<BodyHandle> {
        match self {
            Self::Dynamic {
                size,
                mass,
                position,
                rotation,
                velocity,
                angular_velocity,
                ..
            } => {
                let handle = world.add_box(
                    vec3(*size),
                    *mass,
                    vec3(*position),
                    orientation(*rotation)?,
                )?;
                if let Some(body) = world.body_mut(handle) {
                    body.set_velocity(vec3(*velocity), vec3(*angular_velocity));
                }
                Ok(handle)
            }
            Self::Fixed {
                size,
                position,
                rotation,
                ..
            } => Ok(world.add_fixed_box(vec3(*size), vec3(*position), orientation(*rotation)?)?),
        }
    }
}

impl AnchorDef {
    fn resolve(&self, handles: &HashMap<String, BodyHandle>) -> Result<Anchor> {
        match self {
            Self::Fixed { point } => Ok(Anchor::Fixed(vec3(*point))),
            Self::Body { id, local } => {
                let body = handles
                    .get(id)
                    .ok_or_else(|| anyhow!("unknown body {id}"))?;
                Ok(Anchor::attached(*body, vec3(*local)))
            }
        }
    }
}

impl FromStr for Scene {
    type Err = anyhow::Error;

    fn from_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Scene {
    /// Reads and parses a scene file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid scene.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene {}", path.display()))?;
        json.parse()
            .with_context(|| format!("parsing scene {}", path.display()))
    }

    /// The built-in demo: a floor, a box tumbling onto it, a box hanging
    /// from a spring and a hanging chain of two boxes. Only the tumbler
    /// rests on the floor, since each detection pass answers one contact.
    ///
    /// # Errors
    ///
    /// Only if the embedded scene is malformed.
    pub fn demo() -> Result<Self> {
        DEMO.parse().context("parsing built-in demo scene")
    }

    /// Builds the world. Bodies are added in file order, so their handles
    /// follow that order too.
    ///
    /// # Errors
    ///
    /// Fails on duplicate body ids, springs naming unknown bodies, and any
    /// value the engine rejects.
    pub fn into_world(self) -> Result<LoadedScene> {
        let config = self.config.apply(WorldConfig::default());
        let mut world = World::new(config).context("invalid scene config")?;
        let mut handles: HashMap<String, BodyHandle> = HashMap::new();

        for body in &self.bodies {
            let id = body.id();
            if handles.contains_key(id) {
                bail!("duplicate body id {id}");
            }
            let handle = body
                .add_to(&mut world)
                .with_context(|| format!("body {id}"))?;
            debug!(id, index = handle.index(), "added body");
            handles.insert(id.to_owned(), handle);
        }

        for (i, spring) in self.springs.iter().enumerate() {
            let a = spring
                .a
                .resolve(&handles)
                .with_context(|| format!("spring {i}"))?;
            let b = spring
                .b
                .resolve(&handles)
                .with_context(|| format!("spring {i}"))?;
            let handle = world
                .add_spring(
                    a,
                    b,
                    spring.rest_length.unwrap_or(0.0),
                    spring.stiffness,
                    spring.damping,
                )
                .with_context(|| format!("spring {i}"))?;
            if spring.rest_length.is_none() {
                let length = world
                    .spring(handle)
                    .map(|s| s.length(world.bodies()))
                    .unwrap_or_default();
                if let Some(s) = world.spring_mut(handle) {
                    s.rest_length = length;
                }
            }
        }

        info!(
            bodies = world.bodies().len(),
            springs = world.springs().len(),
            "scene loaded"
        );
        Ok(LoadedScene { world, handles })
    }
}
