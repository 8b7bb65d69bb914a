// Directional force model: four discrete directions on the lane plane.
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForceDirection {
    Up,
    Left,
    Right,
    Down,
}

impl ForceDirection {
    /// On-screen order: top row, middle row (left, right), bottom row.
    pub const ALL: [ForceDirection; 4] = [
        ForceDirection::Up,
        ForceDirection::Left,
        ForceDirection::Right,
        ForceDirection::Down,
    ];

    /// Unit vector in the horizontal plane. "Up" pushes away from the camera (-Z).
    pub fn vector(self) -> Vec3 {
        match self {
            ForceDirection::Up => Vec3::new(0.0, 0.0, -1.0),
            ForceDirection::Down => Vec3::new(0.0, 0.0, 1.0),
            ForceDirection::Left => Vec3::new(-1.0, 0.0, 0.0),
            ForceDirection::Right => Vec3::new(1.0, 0.0, 0.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ForceDirection::Up => "^",
            ForceDirection::Left => "<",
            ForceDirection::Right => ">",
            ForceDirection::Down => "v",
        }
    }

    pub fn keys(self) -> [KeyCode; 2] {
        match self {
            ForceDirection::Up => [KeyCode::ArrowUp, KeyCode::KeyW],
            ForceDirection::Left => [KeyCode::ArrowLeft, KeyCode::KeyA],
            ForceDirection::Right => [KeyCode::ArrowRight, KeyCode::KeyD],
            ForceDirection::Down => [KeyCode::ArrowDown, KeyCode::KeyS],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::up(ForceDirection::Up, Vec3::new(0.0, 0.0, -1.0))]
    #[case::down(ForceDirection::Down, Vec3::new(0.0, 0.0, 1.0))]
    #[case::left(ForceDirection::Left, Vec3::new(-1.0, 0.0, 0.0))]
    #[case::right(ForceDirection::Right, Vec3::new(1.0, 0.0, 0.0))]
    fn direction_vectors(#[case] dir: ForceDirection, #[case] expected: Vec3) {
        let v = dir.vector();
        assert_eq!(v, expected);
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert_eq!(v.y, 0.0, "force must stay in the horizontal plane");
    }

    #[test]
    fn opposite_directions_cancel() {
        assert_eq!(ForceDirection::Up.vector() + ForceDirection::Down.vector(), Vec3::ZERO);
        assert_eq!(ForceDirection::Left.vector() + ForceDirection::Right.vector(), Vec3::ZERO);
    }
}
