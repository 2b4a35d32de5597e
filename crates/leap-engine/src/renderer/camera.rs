use glam::Vec2;

/// 2D camera over a Y-down world.
///
/// The core only tracks where the camera is; the JavaScript renderer reads
/// [`view_center`](Self::view_center) once per tick and draws accordingly.
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Visible width in world units.
    pub width: f32,
    /// Visible height in world units.
    pub height: f32,
    /// Camera center position in world space.
    pub center: Vec2,
    /// Optional bounds for camera clamping (min_x, min_y, max_x, max_y).
    pub bounds: Option<[f32; 4]>,
    /// Smoothing factor for camera follow (0.0 = instant, 1.0 = never moves).
    pub smoothing: f32,
    shake: Option<Shake>,
}

#[derive(Debug, Clone, Copy)]
struct Shake {
    intensity: f32,
    remaining: u32,
    total: u32,
}

impl Camera2D {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: Vec2::new(width / 2.0, height / 2.0),
            bounds: None,
            smoothing: 0.0,
            shake: None,
        }
    }

    /// Set world bounds for camera clamping.
    /// Camera will not show areas outside these bounds.
    pub fn set_bounds(&mut self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) {
        self.bounds = Some([min_x, min_y, max_x, max_y]);
        self.clamp_to_bounds();
    }

    /// Clear camera bounds (allow camera to move anywhere).
    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    /// Set smoothing factor for camera movement.
    /// 0.0 = instant snap, 0.9 = very smooth/slow.
    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 0.99);
    }

    /// Move camera center to target position, applying bounds.
    pub fn look_at(&mut self, target: Vec2) {
        self.center = target;
        self.clamp_to_bounds();
    }

    /// Move toward `target`. Called once per tick by the follow capability.
    pub fn follow(&mut self, target: Vec2) {
        if self.smoothing <= 0.0 {
            self.look_at(target);
        } else {
            self.center += (target - self.center) * (1.0 - self.smoothing);
            self.clamp_to_bounds();
        }
    }

    /// Start a screen shake lasting `ticks` ticks. A stronger running shake
    /// is not replaced by a weaker one.
    pub fn shake(&mut self, intensity: f32, ticks: u32) {
        if ticks == 0 {
            return;
        }
        if let Some(current) = self.shake {
            if current.intensity * current.remaining as f32 > intensity * ticks as f32 {
                return;
            }
        }
        self.shake = Some(Shake {
            intensity,
            remaining: ticks,
            total: ticks,
        });
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    /// Current shake displacement. Alternates direction every tick and decays
    /// linearly to zero.
    pub fn shake_offset(&self) -> Vec2 {
        match self.shake {
            Some(s) => {
                let falloff = s.remaining as f32 / s.total as f32;
                let amount = s.intensity * falloff;
                let dir = if s.remaining % 2 == 0 { 1.0 } else { -1.0 };
                Vec2::new(amount * dir, amount * -dir * 0.5)
            }
            None => Vec2::ZERO,
        }
    }

    /// Advance the shake by one tick.
    pub fn tick(&mut self) {
        if let Some(s) = &mut self.shake {
            s.remaining -= 1;
            if s.remaining == 0 {
                self.shake = None;
            }
        }
    }

    /// Center the renderer should draw around, shake included.
    pub fn view_center(&self) -> Vec2 {
        self.center + self.shake_offset()
    }

    /// World position of the visible area's top-left corner.
    pub fn top_left(&self) -> Vec2 {
        self.view_center() - Vec2::new(self.width, self.height) * 0.5
    }

    /// Clamp camera center to bounds if set.
    fn clamp_to_bounds(&mut self) {
        if let Some([min_x, min_y, max_x, max_y]) = self.bounds {
            let half_w = self.width / 2.0;
            let half_h = self.height / 2.0;

            // Viewport larger than the bounds: center on them.
            self.center.x = if self.width >= max_x - min_x {
                (min_x + max_x) / 2.0
            } else {
                self.center.x.clamp(min_x + half_w, max_x - half_w)
            };
            self.center.y = if self.height >= max_y - min_y {
                (min_y + max_y) / 2.0
            } else {
                self.center.y.clamp(min_y + half_h, max_y - half_h)
            };
        }
    }

    /// Check if a world-space rectangle (top-left + size) overlaps the viewport.
    pub fn is_rect_visible(&self, pos: Vec2, size: Vec2) -> bool {
        let min = self.top_left();
        let max = min + Vec2::new(self.width, self.height);
        pos.x + size.x >= min.x && pos.x <= max.x && pos.y + size.y >= min.y && pos.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_moves_camera() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.look_at(Vec2::new(500.0, 300.0));
        assert_eq!(cam.center, Vec2::new(500.0, 300.0));
    }

    #[test]
    fn bounds_clamp_camera() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.set_bounds(0.0, 0.0, 500.0, 400.0);

        cam.look_at(Vec2::new(0.0, 0.0));
        assert!((cam.center.x - 50.0).abs() < 1e-6);
        assert!((cam.center.y - 50.0).abs() < 1e-6);

        cam.look_at(Vec2::new(1000.0, 1000.0));
        assert!((cam.center.x - 450.0).abs() < 1e-6);
        assert!((cam.center.y - 350.0).abs() < 1e-6);
    }

    #[test]
    fn small_bounds_center_the_view() {
        let mut cam = Camera2D::new(600.0, 400.0);
        cam.set_bounds(0.0, 0.0, 300.0, 1000.0);
        cam.look_at(Vec2::new(0.0, 0.0));
        assert!((cam.center.x - 150.0).abs() < 1e-6);
        assert!((cam.center.y - 200.0).abs() < 1e-6);
    }

    #[test]
    fn follow_with_no_smoothing_snaps() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.follow(Vec2::new(200.0, 150.0));
        assert_eq!(cam.center, Vec2::new(200.0, 150.0));
    }

    #[test]
    fn follow_with_smoothing_interpolates() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.center = Vec2::ZERO;
        cam.set_smoothing(0.9);
        cam.follow(Vec2::new(100.0, 100.0));
        assert!(cam.center.x > 0.0 && cam.center.x < 100.0);
        assert!(cam.center.y > 0.0 && cam.center.y < 100.0);
    }

    #[test]
    fn shake_decays_and_stops() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.shake(4.0, 3);
        let first = cam.shake_offset().length();
        assert!(first > 0.0);

        cam.tick();
        let second = cam.shake_offset().length();
        assert!(second < first);

        cam.tick();
        cam.tick();
        assert!(!cam.is_shaking());
        assert_eq!(cam.view_center(), cam.center);
    }

    #[test]
    fn weaker_shake_does_not_override() {
        let mut cam = Camera2D::new(100.0, 100.0);
        cam.shake(10.0, 20);
        cam.shake(1.0, 2);
        cam.tick();
        cam.tick();
        assert!(cam.is_shaking());
    }

    #[test]
    fn rect_visibility() {
        let cam = Camera2D::new(100.0, 100.0); // Viewport: [0,100] x [0,100]
        assert!(cam.is_rect_visible(Vec2::new(40.0, 40.0), Vec2::splat(10.0)));
        assert!(cam.is_rect_visible(Vec2::new(-5.0, 50.0), Vec2::splat(10.0)));
        assert!(!cam.is_rect_visible(Vec2::new(-50.0, 50.0), Vec2::splat(10.0)));
    }

    #[test]
    fn top_left_is_half_viewport_from_center() {
        let mut cam = Camera2D::new(600.0, 400.0);
        cam.look_at(Vec2::new(1000.0, 500.0));
        assert_eq!(cam.top_left(), Vec2::new(700.0, 300.0));
    }
}
