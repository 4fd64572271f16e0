use glam::{Mat4, Vec3};

/// Vertical field of view in degrees.
pub const FOV_Y_DEG: f32 = 75.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

/// Where the camera sits before the first frame.
pub const START_POSITION: Vec3 = Vec3::new(40.0, 60.0, 80.0);
/// Tilted look-at used until the first frame re-aims at the origin.
pub const START_TARGET: Vec3 = Vec3::new(0.0, 20.0, 0.0);

/// Fraction of the remaining distance to the goal covered per frame.
pub const FOLLOW_RATE: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct Camera {
    // --- Placement ---
    /// Eye position in world units.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    pub up: Vec3,

    // --- Projection ---
    pub fov_y_rad: f32,
    /// Viewport width over height.
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Cached perspective matrix; rebuilt by `update_projection()`.
    pub proj: Mat4,
}

impl Camera {
    /// Creates the camera at its starting pose for the given aspect ratio.
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            position: START_POSITION,
            target: START_TARGET,
            up: Vec3::Y,
            fov_y_rad: FOV_Y_DEG.to_radians(),
            aspect,
            z_near: Z_NEAR,
            z_far: Z_FAR,
            proj: Mat4::IDENTITY, // placeholder
        };

        camera.update_projection();
        camera
    }

    /// Rebuilds the projection matrix. Must be called after any projection parameter changes.
    pub fn update_projection(&mut self) {
        // glam's RH perspective already maps depth to [0, 1] as wgpu expects.
        self.proj = Mat4::perspective_rh(self.fov_y_rad, self.aspect, self.z_near, self.z_far);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    /// Moves the eye's X and Y a fixed fraction of the way toward `goal`.
    /// Z is left alone.
    pub fn follow(&mut self, goal_x: f32, goal_y: f32) {
        self.position.x += (goal_x - self.position.x) * FOLLOW_RATE;
        self.position.y += (goal_y - self.position.y) * FOLLOW_RATE;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// World to camera transform.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns combined view-projection matrix.
    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_is_exponential() {
        let mut camera = Camera::new(16.0 / 9.0);
        camera.follow(0.0, 0.0);
        assert_eq!(camera.position.x, 40.0 + (0.0 - 40.0) * 0.05);
        assert_eq!(camera.position.y, 60.0 + (0.0 - 60.0) * 0.05);
        assert_eq!(camera.position.z, 80.0);

        for _ in 0..2_000 {
            camera.follow(5.0, -3.0);
        }
        assert!((camera.position.x - 5.0).abs() < 1e-3);
        assert!((camera.position.y + 3.0).abs() < 1e-3);
    }

    #[test]
    fn origin_projects_inside_clip_volume() {
        let mut camera = Camera::new(1.5);
        camera.look_at(Vec3::ZERO);
        let clip = camera.view_proj() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn aspect_change_rebuilds_projection() {
        let mut camera = Camera::new(1.0);
        let before = camera.proj;
        camera.set_aspect(2.0);
        assert_ne!(before, camera.proj);
        assert_eq!(camera.proj, Mat4::perspective_rh(FOV_Y_DEG.to_radians(), 2.0, Z_NEAR, Z_FAR));
    }
}
