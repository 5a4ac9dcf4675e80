use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::math::units::{screen, world};
use crate::math::VectorExt;
use crate::CAMERA_SMOOTHING;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Follow {
    /// Sit exactly on the target every frame.
    Snap,
    /// Cover `fraction` of the remaining distance each tick.
    Smooth { fraction: f32 },
}

impl Default for Follow {
    fn default() -> Self {
        Follow::Smooth { fraction: CAMERA_SMOOTHING }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Camera {
    pub position: world::Point2D,
    pub follow: Follow,
}

impl Camera {
    pub fn new(follow: Follow) -> Self {
        Self {
            position: world::Point2D::origin(),
            follow,
        }
    }

    pub fn snapped_to(position: world::Point2D) -> Self {
        Self {
            position,
            follow: Follow::Snap,
        }
    }

    /// Moves towards the center of `target`.
    ///
    /// The smoothed step is rounded to whole units, halves away from zero, so
    /// starting from a whole position the camera stays on whole units and
    /// reaches a whole-unit target exactly without overshooting it.
    pub fn follow(&mut self, target: &Entity) {
        let point = target.center();

        self.position = match self.follow {
            Follow::Snap => point,
            Follow::Smooth { fraction } => {
                let remaining = point - self.position;
                let step = remaining * fraction;
                let step = world::Vector2D::new(step.x.round(), step.y.round());
                self.position.translate(step)
            }
        };
    }

    /// World position to screen position, with the camera in the middle of the screen.
    pub fn to_screen(&self, point: world::Point2D, screen_size: screen::Size2D) -> screen::Point2D {
        let half_screen: world::Vector2D = screen_size.to_vector().halve().cast_unit();

        point
            .translate(self.position.to_vector().flip())
            .translate(half_screen)
            .round()
            .cast_unit()
    }

    pub fn to_world(&self, point: screen::Point2D, screen_size: screen::Size2D) -> world::Point2D {
        let half_screen: world::Vector2D = screen_size.to_vector().halve().cast_unit();
        let point: world::Point2D = point.cast_unit();

        point
            .translate(half_screen.flip())
            .translate(self.position.to_vector())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::units::world::Point2D;

    fn target_at(x: f32, y: f32) -> Entity {
        let mut entity = Entity::new(1);
        entity.position = Point2D::new(x, y);
        entity
    }

    #[test]
    fn snap_follows_target_center() {
        let mut camera = Camera::new(Follow::Snap);
        camera.follow(&target_at(100.0, 200.0));
        assert_eq!(camera.position, Point2D::new(116.0, 232.0));
    }

    #[test]
    fn smooth_follow_converges_without_overshoot() {
        let mut camera = Camera::default();
        let target = target_at(1000.0, -500.0);
        let goal = target.center();

        let mut distance = (goal - camera.position).length();
        let mut ticks = 0;

        while distance > 0.0 {
            camera.follow(&target);
            ticks += 1;

            let next = (goal - camera.position).length();
            assert!(next < distance, "tick {ticks}: {next} is not closer than {distance}");
            assert!(camera.position.x <= goal.x && camera.position.y >= goal.y, "overshot at tick {ticks}");

            distance = next;
            assert!(ticks <= 16, "camera did not settle");
        }

        assert_eq!(camera.position, goal);
    }

    #[test]
    fn smooth_follow_settles_from_one_unit_either_side() {
        for offset in [-1.0, 1.0] {
            let target = target_at(0.0, 0.0);
            let mut camera = Camera::default();
            camera.position = target.center() + world::Vector2D::new(offset, offset);

            camera.follow(&target);
            assert_eq!(camera.position, target.center(), "offset {offset}");
        }
    }

    #[test]
    fn smooth_follow_reaches_targets_up_and_left() {
        let target = target_at(0.0, 0.0);
        let mut camera = Camera::default();
        camera.position = target.center() + world::Vector2D::new(37.0, 5.0);

        for _ in 0..16 {
            camera.follow(&target);
        }

        assert_eq!(camera.position, target.center());
    }

    #[test]
    fn screen_projection_round_trips() {
        let camera = Camera::snapped_to(Point2D::new(300.0, 200.0));
        let screen_size = screen::Size2D::new(800.0, 600.0);

        let on_screen = camera.to_screen(Point2D::new(300.0, 200.0), screen_size);
        assert_eq!(on_screen, screen::Point2D::new(400.0, 300.0));

        let back = camera.to_world(on_screen, screen_size);
        assert_eq!(back, Point2D::new(300.0, 200.0));
    }
}
