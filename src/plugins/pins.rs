// Per-pin orientation tracking.
use bevy::prelude::*;

#[derive(Component)]
pub struct Pin;

/// Resting orientation of one pin plus its sticky fallen flag.
#[derive(Debug, Clone, PartialEq)]
pub struct PinTracker {
    pub entity: Entity,
    pub name: String,
    /// World-space up axis captured when the lane was published.
    pub initial_up: Vec3,
    pub has_fallen: bool,
}

impl PinTracker {
    pub fn new(entity: Entity, name: impl Into<String>, initial_up: Vec3) -> Self {
        Self { entity, name: name.into(), initial_up, has_fallen: false }
    }

    /// Feed the live up axis for this tick. Returns true only on the tick the pin
    /// is first judged fallen; after that the flag never clears.
    pub fn observe(&mut self, live_up: Vec3, threshold: f32) -> bool {
        if self.has_fallen {
            return false;
        }
        match is_upright(self.initial_up, live_up, threshold) {
            Some(false) => {
                self.has_fallen = true;
                true
            }
            _ => false,
        }
    }
}

/// Local Y axis of a transform, expressed in world space (not normalized).
pub fn up_axis(global: &GlobalTransform) -> Vec3 {
    Vec3::from(global.affine().matrix3.y_axis)
}

/// World up axis of a pin from its local transform and its parent's global one.
/// Rapier writes `Transform` every step, while `GlobalTransform` is only propagated
/// once per frame.
pub fn live_up(parent: Option<&GlobalTransform>, local: &Transform) -> Vec3 {
    let parent = parent.copied().unwrap_or(GlobalTransform::IDENTITY);
    up_axis(&parent.mul_transform(*local))
}

/// Cosine between two axes, or `None` when either is degenerate.
pub fn orientation_dot(initial: Vec3, current: Vec3) -> Option<f32> {
    let a = initial.try_normalize()?;
    let b = current.try_normalize()?;
    Some(a.dot(b))
}

pub fn is_upright(initial: Vec3, current: Vec3, threshold: f32) -> Option<bool> {
    orientation_dot(initial, current).map(|d| d >= threshold)
}
