/// Sprite component: which atlas cell an entity is drawn with.
/// The renderer itself lives on the JavaScript side; this is only data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteComponent {
    /// Atlas (tileset) index, in the order the level declared them.
    pub atlas: u32,
    /// Column in the atlas grid.
    pub col: f32,
    /// Row in the atlas grid.
    pub row: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
}

impl SpriteComponent {
    pub fn new(col: f32, row: f32) -> Self {
        Self {
            atlas: 0,
            col,
            row,
            alpha: 1.0,
        }
    }

    pub fn with_atlas(mut self, atlas: u32) -> Self {
        self.atlas = atlas;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
