use glam::Vec2;

/// Axis selector for the separated-axis movement passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component index into a `Vec2`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// The perpendicular axis.
    #[inline]
    pub fn cross(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Build a point from a coordinate along this axis and one across it.
    #[inline]
    pub fn compose(self, along: f32, across: f32) -> Vec2 {
        match self {
            Axis::X => Vec2::new(along, across),
            Axis::Y => Vec2::new(across, along),
        }
    }
}

/// Axis-aligned bounding box. `min` is the top-left corner in a Y-down world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box anchored at `pos` (top-left) with the given size.
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Point containment, edges inclusive.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Standard AABB overlap test. Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// First point where the segment `ray` enters this box (slab method).
    /// Returns `None` when the segment misses the box entirely.
    pub fn ray_entry(&self, ray: &Ray) -> Option<Vec2> {
        let dir = ray.end - ray.start;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for i in 0..2 {
            let origin = ray.start[i];
            let lo = self.min[i];
            let hi = self.max[i];

            if dir[i].abs() < f32::EPSILON {
                // Parallel to this slab: must already lie within it.
                if origin < lo || origin > hi {
                    return None;
                }
            } else {
                let inv = 1.0 / dir[i];
                let mut t1 = (lo - origin) * inv;
                let mut t2 = (hi - origin) * inv;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_min = t_min.max(t1);
                t_max = t_max.min(t2);
                if t_min > t_max {
                    return None;
                }
            }
        }

        Some(ray.start + dir * t_min)
    }
}

/// A finite ray segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub start: Vec2,
    pub end: Vec2,
}

impl Ray {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Axis-aligned probe running from `from` to `to` along `axis`, offset `across`.
    pub fn along(axis: Axis, from: f32, to: f32, across: f32) -> Self {
        Self {
            start: axis.compose(from, across),
            end: axis.compose(to, across),
        }
    }
}
