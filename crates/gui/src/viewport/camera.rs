use glam::{Mat4, Vec3, Vec4};

/// Arc-ball camera for 3D viewport
#[derive(Debug, Clone, Copy)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    /// Radius of the framed scene; scales zoom limits and clip planes
    pub scene_radius: f32,
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 6.0,
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
            scene_radius: 2.0,
        }
    }

    /// Default orientation, looking at the origin from far enough away
    /// to fit a sphere of `radius`.
    pub fn framing(radius: f32) -> Self {
        let mut camera = Self::new();
        camera.scene_radius = if radius.is_finite() && radius > 0.0 { radius } else { 1.0 };
        camera.distance = camera.scene_radius / (camera.fov * 0.5).sin() * 1.1;
        camera
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        let min = self.scene_radius * 0.05;
        let max = self.scene_radius * 50.0;
        self.distance = (self.distance * (1.0 - delta)).clamp(min, max);
    }

    /// Pan by a screen-space delta in pixels
    pub fn pan(&mut self, dx: f32, dy: f32) {
        // World units per pixel grows with distance
        let scale = self.distance * 0.0015;
        let offset = self.right_vector() * -dx * scale + self.up_vector() * dy * scale;
        self.target += offset;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// Direction from the target towards the eye
    pub fn view_direction(&self) -> Vec3 {
        (self.eye_position() - self.target).normalize_or_zero()
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let near = (self.distance * 0.01).max(1e-4);
        let far = self.distance * 4.0 + self.scene_radius * 20.0;
        Mat4::perspective_rh_gl(self.fov, aspect, near, far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a 3D point to 2D screen coords (for overlay text)
    pub fn project(&self, point: [f32; 3], rect: egui::Rect) -> Option<egui::Pos2> {
        let aspect = rect.width() / rect.height();
        let vp = self.view_projection(aspect);
        let p = vp * Vec4::new(point[0], point[1], point[2], 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some(egui::pos2(screen_x, screen_y))
    }
}
