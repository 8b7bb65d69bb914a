// Lane lifecycle: RON lane definition, asynchronous build, load / reset / rescale,
// and the registry of ball + pin state owned by the loaded lane.
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy_rapier3d::prelude::{
    Collider, ColliderMassProperties, Damping, ExternalImpulse, Friction, Restitution, RigidBody,
};
use futures_lite::future::{block_on, poll_once};
use serde::Deserialize;
use thiserror::Error;

use crate::plugins::ball::{Ball, BallController};
use crate::plugins::force::ForceDirection;
use crate::plugins::pins::{up_axis, Pin, PinTracker};
use crate::plugins::round::RoundState;

// ----------------------- Lane Definition (RON) -----------------------

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Vec3Def { pub x: f32, pub y: f32, pub z: f32 }
impl Vec3Def { pub fn to_vec3(self) -> Vec3 { Vec3::new(self.x, self.y, self.z) } }

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BallDef {
    pub name: String,
    /// Contact point on the lane surface; the ball centre sits one radius above.
    pub pos: Vec3Def,
    pub radius: f32,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    #[serde(default)]
    pub linear_damping: f32,
    #[serde(default)]
    pub angular_damping: f32,
    pub color: (f32, f32, f32),
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct PinShape {
    pub radius: f32,
    pub height: f32,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub color: (f32, f32, f32),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PinSpot {
    pub name: String,
    pub x: f32,
    pub z: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LaneDef {
    #[serde(default)]
    pub ball: Option<BallDef>,
    pub pin_shape: PinShape,
    #[serde(default)]
    pub pins: Vec<PinSpot>,
}

#[derive(Debug, Error)]
pub enum LaneLoadError {
    #[error("failed to read lane file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse lane file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid lane definition: {0}")]
    Invalid(String),
}

impl LaneDef {
    pub fn parse(data: &str, path: &Path) -> Result<Self, LaneLoadError> {
        let def: LaneDef = ron::from_str(data)
            .map_err(|source| LaneLoadError::Parse { path: path.to_path_buf(), source })?;
        def.validate()?;
        Ok(def)
    }

    pub fn read(path: &Path) -> Result<Self, LaneLoadError> {
        let data = std::fs::read_to_string(path)
            .map_err(|source| LaneLoadError::Io { path: path.to_path_buf(), source })?;
        Self::parse(&data, path)
    }

    fn validate(&self) -> Result<(), LaneLoadError> {
        let s = &self.pin_shape;
        if !(s.radius > 0.0 && s.height > 0.0 && s.mass > 0.0) {
            return Err(LaneLoadError::Invalid(format!(
                "pin shape needs positive radius/height/mass, got {}/{}/{}",
                s.radius, s.height, s.mass
            )));
        }
        if let Some(b) = &self.ball {
            if !(b.radius > 0.0 && b.mass > 0.0) {
                return Err(LaneLoadError::Invalid(format!(
                    "ball '{}' needs positive radius/mass, got {}/{}",
                    b.name, b.radius, b.mass
                )));
            }
        }
        Ok(())
    }
}

// ----------------------- Components / Resources -----------------------

/// Placement anchor every lane is parented to; rescale acts on its transform.
#[derive(Component)]
pub struct LaneAnchor;

/// Root of one instantiated lane (ball + pins).
#[derive(Component)]
pub struct LaneRoot;

#[derive(Component)]
struct LaneBuildTask {
    ticket: LoadTicket,
    task: Task<Result<LaneDef, LaneLoadError>>,
}

#[derive(Resource, Debug, Clone)]
pub struct LaneConfig {
    pub path: PathBuf,
    pub anchor: Vec3,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Request a load at startup instead of waiting for the menu.
    pub autoload: bool,
}
impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/lanes/lane1.ron"),
            anchor: Vec3::ZERO,
            min_scale: 0.05,
            max_scale: 20.0,
            autoload: false,
        }
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum LaneRequest {
    Load,
    Reset,
    Rescale(f32),
}

/// Identifies one load attempt; a retired ticket's result is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanePhase {
    Unloaded,
    Loading,
    Loaded,
}

/// Everything owned by one lane lifetime.
#[derive(Debug)]
pub struct Lane {
    pub root: Entity,
    pub ball: Option<BallController>,
    pub pins: Vec<PinTracker>,
    pub round: RoundState,
}

impl Lane {
    pub fn new(root: Entity, ball: Option<BallController>, pins: Vec<PinTracker>) -> Self {
        Self { root, ball, pins, round: RoundState::default() }
    }
}

#[derive(Resource, Debug, Default)]
pub struct LaneSession {
    lane: Option<Lane>,
    pending: Option<LoadTicket>,
    issued: u64,
}

impl LaneSession {
    pub fn phase(&self) -> LanePhase {
        if self.lane.is_some() {
            LanePhase::Loaded
        } else if self.pending.is_some() {
            LanePhase::Loading
        } else {
            LanePhase::Unloaded
        }
    }

    pub fn is_loaded(&self) -> bool { self.lane.is_some() }

    pub fn lane(&self) -> Option<&Lane> { self.lane.as_ref() }

    pub fn lane_mut(&mut self) -> Option<&mut Lane> { self.lane.as_mut() }

    pub fn ball(&self) -> Option<&BallController> {
        self.lane.as_ref().and_then(|l| l.ball.as_ref())
    }

    /// Reserve a ticket for a new load. `None` when a lane is loaded or a load is pending.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.phase() != LanePhase::Unloaded {
            return None;
        }
        self.issued += 1;
        let ticket = LoadTicket(self.issued);
        self.pending = Some(ticket);
        Some(ticket)
    }

    pub fn is_pending(&self, ticket: LoadTicket) -> bool {
        self.pending == Some(ticket)
    }

    /// Publish a finished lane. A stale ticket hands the lane back untouched.
    pub fn publish(&mut self, ticket: LoadTicket, lane: Lane) -> Result<(), Lane> {
        if !self.is_pending(ticket) {
            return Err(lane);
        }
        self.pending = None;
        self.lane = Some(lane);
        Ok(())
    }

    /// A failed load leaves the session unloaded.
    pub fn abandon(&mut self, ticket: LoadTicket) {
        if self.is_pending(ticket) {
            self.pending = None;
        }
    }

    /// Drop the current lane and retire any pending ticket.
    pub fn teardown(&mut self) -> Option<Lane> {
        self.pending = None;
        self.lane.take()
    }

    pub fn start_force(&mut self, direction: ForceDirection) {
        if let Some(ball) = self.lane.as_mut().and_then(|l| l.ball.as_mut()) {
            ball.start_force(direction);
        }
    }

    pub fn stop_force(&mut self) {
        if let Some(ball) = self.lane.as_mut().and_then(|l| l.ball.as_mut()) {
            ball.stop_force();
        }
    }
}

/// Multiplicative rescale clamped to `[min, max]`. Rejects non-positive or non-finite factors.
pub fn rescaled(current: Vec3, factor: f32, min: f32, max: f32) -> Option<Vec3> {
    if !factor.is_finite() || factor <= 0.0 {
        return None;
    }
    Some((current * factor).clamp(Vec3::splat(min), Vec3::splat(max)))
}

// ----------------------- Plugin -----------------------

pub struct LanePlugin;
impl Plugin for LanePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LaneConfig>()
            .init_resource::<LaneSession>()
            .add_event::<LaneRequest>()
            .add_systems(Startup, spawn_anchor)
            .add_systems(Update, (handle_lane_requests, finalize_lane_tasks).chain());
    }
}

// ----------------------- Systems -----------------------

fn spawn_anchor(mut commands: Commands, cfg: Res<LaneConfig>, mut requests: EventWriter<LaneRequest>) {
    commands.spawn((
        SpatialBundle::from_transform(Transform::from_translation(cfg.anchor)),
        LaneAnchor,
        Name::new("lane_anchor"),
    ));
    if cfg.autoload {
        requests.send(LaneRequest::Load);
    }
}

fn handle_lane_requests(
    mut commands: Commands,
    mut requests: EventReader<LaneRequest>,
    mut session: ResMut<LaneSession>,
    cfg: Res<LaneConfig>,
    q_tasks: Query<Entity, With<LaneBuildTask>>,
    mut q_anchor: Query<&mut Transform, With<LaneAnchor>>,
) {
    for req in requests.read() {
        match *req {
            LaneRequest::Load => start_load(&mut commands, &mut session, &cfg),
            LaneRequest::Reset => {
                if let Some(lane) = session.teardown() {
                    commands.entity(lane.root).despawn_recursive();
                }
                // Dropping the task cancels an in-flight build.
                for e in &q_tasks {
                    commands.entity(e).despawn();
                }
                info!("LANE reset");
                start_load(&mut commands, &mut session, &cfg);
            }
            LaneRequest::Rescale(factor) => {
                let Ok(mut anchor) = q_anchor.get_single_mut() else {
                    warn!("LANE rescale ignored: no anchor");
                    continue;
                };
                match rescaled(anchor.scale, factor, cfg.min_scale, cfg.max_scale) {
                    Some(scale) => {
                        anchor.scale = scale;
                        debug!("LANE rescale factor={:.3} scale={:.3}", factor, scale.x);
                    }
                    None => warn!("LANE rescale rejected factor={}", factor),
                }
            }
        }
    }
}

fn start_load(commands: &mut Commands, session: &mut LaneSession, cfg: &LaneConfig) {
    let Some(ticket) = session.begin_load() else {
        debug!("LANE load ignored phase={:?}", session.phase());
        return;
    };
    let path = cfg.path.clone();
    info!("LANE loading path={}", path.display());
    let task = AsyncComputeTaskPool::get().spawn(async move { LaneDef::read(&path) });
    commands.spawn(LaneBuildTask { ticket, task });
}

fn finalize_lane_tasks(
    mut commands: Commands,
    mut session: ResMut<LaneSession>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
    q_anchor: Query<(Entity, &GlobalTransform), With<LaneAnchor>>,
    mut q_tasks: Query<(Entity, &mut LaneBuildTask)>,
) {
    for (e, mut build) in q_tasks.iter_mut() {
        let Some(result) = block_on(poll_once(&mut build.task)) else { continue; };
        let ticket = build.ticket;
        commands.entity(e).despawn();

        if !session.is_pending(ticket) {
            debug!("LANE stale load discarded ticket={:?}", ticket);
            continue;
        }
        match result {
            Ok(def) => {
                let anchor = q_anchor.get_single().ok().map(|(a, g)| (a, *g));
                let lane = spawn_lane(&mut commands, anchor, &def, &mut meshes, &mut mats);
                info!("LANE loaded pins={} ball={}", lane.pins.len(), lane.ball.is_some());
                if let Err(lane) = session.publish(ticket, lane) {
                    commands.entity(lane.root).despawn_recursive();
                }
            }
            Err(err) => {
                error!("LANE load failed: {err}");
                if let Some(source) = std::error::Error::source(&err) {
                    error!("  caused by: {source}");
                }
                session.abandon(ticket);
            }
        }
    }
}

/// Spawns root, ball and pins and builds the matching registry in one step.
fn spawn_lane(
    commands: &mut Commands,
    anchor: Option<(Entity, GlobalTransform)>,
    def: &LaneDef,
    meshes: &mut Assets<Mesh>,
    mats: &mut Assets<StandardMaterial>,
) -> Lane {
    let anchor_global = anchor.map(|(_, g)| g).unwrap_or(GlobalTransform::IDENTITY);
    let root_local = Transform::IDENTITY;
    let root_global = anchor_global.mul_transform(root_local);

    let mut root_cmd = commands.spawn((
        SpatialBundle {
            transform: root_local,
            global_transform: root_global,
            ..default()
        },
        LaneRoot,
        Name::new("lane"),
    ));
    if let Some((anchor_entity, _)) = anchor {
        root_cmd.set_parent(anchor_entity);
    }
    let root = root_cmd.id();

    let ball = match &def.ball {
        Some(b) => {
            let local = Transform::from_translation(b.pos.to_vec3() + Vec3::Y * b.radius);
            let entity = commands
                .spawn((
                    PbrBundle {
                        mesh: meshes.add(Sphere::new(b.radius)),
                        material: mats.add(StandardMaterial {
                            base_color: Color::srgb(b.color.0, b.color.1, b.color.2),
                            ..default()
                        }),
                        transform: local,
                        global_transform: root_global.mul_transform(local),
                        ..default()
                    },
                    Ball,
                    Name::new(b.name.clone()),
                    RigidBody::Dynamic,
                    Collider::ball(b.radius),
                    ColliderMassProperties::Mass(b.mass),
                    Friction::coefficient(b.friction),
                    Restitution::coefficient(b.restitution),
                    Damping { linear_damping: b.linear_damping, angular_damping: b.angular_damping },
                    ExternalImpulse::default(),
                ))
                .set_parent(root)
                .id();
            Some(BallController::new(entity))
        }
        None => {
            warn!("LANE definition has no ball; force controls disabled");
            None
        }
    };

    if def.pins.is_empty() {
        warn!("LANE definition has no pins; round can never finish");
    }
    let shape = def.pin_shape;
    let pin_mesh = meshes.add(Cylinder::new(shape.radius, shape.height));
    let pin_mat = mats.add(StandardMaterial {
        base_color: Color::srgb(shape.color.0, shape.color.1, shape.color.2),
        ..default()
    });
    let pins = def
        .pins
        .iter()
        .map(|spot| {
            let local = Transform::from_xyz(spot.x, shape.height * 0.5, spot.z);
            let global = root_global.mul_transform(local);
            let entity = commands
                .spawn((
                    PbrBundle {
                        mesh: pin_mesh.clone(),
                        material: pin_mat.clone(),
                        transform: local,
                        global_transform: global,
                        ..default()
                    },
                    Pin,
                    Name::new(spot.name.clone()),
                    RigidBody::Dynamic,
                    Collider::cylinder(shape.height * 0.5, shape.radius),
                    ColliderMassProperties::Mass(shape.mass),
                    Friction::coefficient(shape.friction),
                    Restitution::coefficient(shape.restitution),
                ))
                .set_parent(root)
                .id();
            PinTracker::new(entity, spot.name.clone(), up_axis(&global))
        })
        .collect();

    Lane::new(root, ball, pins)
}
