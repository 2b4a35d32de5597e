use bytemuck::{Pod, Zeroable};

/// Per-entity render data read by the JavaScript renderer.
/// Must match the TypeScript side: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Top-left X in world space.
    pub x: f32,
    /// Top-left Y in world space.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// `EntityKind::code()` of the entity.
    pub kind: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// Atlas column.
    pub sprite_col: f32,
    /// Atlas row.
    pub atlas_row: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// A contiguous run of instances drawn from the same atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasBatch {
    pub atlas: u32,
    pub start: u32,
    pub count: u32,
}

/// Render snapshot for one tick: instances ordered by atlas, plus the batch
/// boundaries.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    instances: Vec<RenderInstance>,
    batches: Vec<AtlasBatch>,
    capacity: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    /// A buffer that holds at most `capacity` instances; extra pushes are dropped.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            batches: Vec::new(),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.batches.clear();
    }

    /// Append an instance for `atlas`. Returns `false` when the buffer is full.
    /// Callers push in atlas order; a change of atlas opens a new batch.
    pub fn push(&mut self, atlas: u32, instance: RenderInstance) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        let index = self.instances.len() as u32;
        match self.batches.last_mut() {
            Some(batch) if batch.atlas == atlas => batch.count += 1,
            _ => self.batches.push(AtlasBatch {
                atlas,
                start: index,
                count: 1,
            }),
        }
        self.instances.push(instance);
        true
    }

    pub fn instances(&self) -> &[RenderInstance] {
        &self.instances
    }

    pub fn batches(&self) -> &[AtlasBatch] {
        &self.batches
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Raw pointer to instance data for zero-copy reads from JS.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    /// Instance data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
