pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod level;

// Re-export key types at crate root for convenience
pub use api::error::{ConfigError, EngineError, EngineResult};
pub use api::game::{EngineContext, Game, GameConfig};
pub use api::types::{EntityId, EntityKind, GameEvent};
pub use components::camera::{FixedToCamera, FollowWithCamera};
pub use components::capability::{Behavior, Capability};
pub use components::entity::Entity;
pub use components::sprite::SpriteComponent;
pub use core::collision::{CollisionResolver, RaycastHit};
pub use core::geometry::{Aabb, Axis, Ray};
pub use core::group::{Group, GroupId, Groups};
pub use core::loading::LoadTracker;
pub use core::physics::{PhysicsCapability, PhysicsConfig, PhysicsDesc, PhysicsState};
pub use core::registry::Registry;
pub use core::scheduler::{Scheduler, TickPhase};
pub use core::time::FixedTimestep;
pub use input::queue::{InputEvent, InputQueue};
pub use input::state::{Control, InputState};
pub use level::builder::{Level, LevelBuilder, TileSpawn};
pub use level::tiled::TiledMap;
pub use renderer::camera::Camera2D;
pub use renderer::instance::{AtlasBatch, RenderBuffer, RenderInstance};
pub use systems::render::build_render_buffer;
