use std::collections::HashMap;

use glam::Vec2;

use crate::api::error::EngineResult;
use crate::api::game::EngineContext;
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::components::sprite::SpriteComponent;
use crate::core::group::GroupId;
use crate::level::tiled::{TiledLayer, TiledMap};

/// One non-empty cell of a tile layer, handed to a layer spawner.
#[derive(Debug, Clone)]
pub struct TileSpawn<'a> {
    /// Name of the layer the tile came from.
    pub layer: &'a str,
    /// Top-left corner in world space.
    pub pos: Vec2,
    pub size: Vec2,
    pub sprite: SpriteComponent,
    pub visible: bool,
}

impl TileSpawn<'_> {
    /// The plain static entity a tile turns into when no spawner overrides it.
    pub fn into_entity(self, id: EntityId) -> Entity {
        let mut entity = Entity::new(id)
            .with_tag(self.layer)
            .with_pos(self.pos)
            .with_size(self.size)
            .with_sprite(self.sprite);
        entity.visible = self.visible;
        entity
    }
}

/// Custom tile creation for one layer (e.g. turn every cell of "Enemies"
/// into an enemy).
pub type LayerSpawner = Box<dyn FnMut(&mut EngineContext, TileSpawn<'_>) -> EngineResult<EntityId>>;

/// Named groups produced by a level build.
#[derive(Debug, Clone, Default)]
pub struct Level {
    layers: HashMap<String, GroupId>,
    pub width: f32,
    pub height: f32,
}

impl Level {
    /// Group holding every entity spawned from the named layer.
    pub fn layer(&self, name: &str) -> Option<GroupId> {
        self.layers.get(name).copied()
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }
}

/// Turns a [`TiledMap`] into entities and named groups.
#[derive(Default)]
pub struct LevelBuilder {
    spawners: HashMap<String, LayerSpawner>,
}

impl LevelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override tile creation for the layer called `layer`.
    pub fn with_layer_spawner<F>(mut self, layer: impl Into<String>, spawner: F) -> Self
    where
        F: FnMut(&mut EngineContext, TileSpawn<'_>) -> EngineResult<EntityId> + 'static,
    {
        self.spawners.insert(layer.into(), Box::new(spawner));
        self
    }

    /// Parse `json` and build it.
    pub fn build_json(&mut self, json: &str, ctx: &mut EngineContext) -> EngineResult<Level> {
        let map = TiledMap::from_json(json)?;
        self.build(&map, ctx)
    }

    /// Spawn every non-empty tile of every tile layer. Each layer's entities
    /// are collected into the context group of the same name.
    pub fn build(&mut self, map: &TiledMap, ctx: &mut EngineContext) -> EngineResult<Level> {
        let mut level = Level {
            layers: HashMap::new(),
            width: map.pixel_width(),
            height: map.pixel_height(),
        };

        for layer in map.layers.iter().filter(|l| l.is_tile_layer()) {
            let group = ctx.groups.named(&layer.name);
            let spawned = self.build_layer(map, layer, group, ctx)?;
            log::info!("level: layer '{}' spawned {} entities", layer.name, spawned);
            level.layers.insert(layer.name.clone(), group);
        }

        Ok(level)
    }

    fn build_layer(
        &mut self,
        map: &TiledMap,
        layer: &TiledLayer,
        group: GroupId,
        ctx: &mut EngineContext,
    ) -> EngineResult<usize> {
        let columns = layer.width.max(1) as usize;
        let mut spawned = 0;

        for (i, &gid) in layer.data.iter().enumerate() {
            if gid == 0 {
                continue;
            }
            let tile = map.tile(gid)?;
            let spawn = TileSpawn {
                layer: &layer.name,
                pos: Vec2::new(
                    (i % columns) as f32 * tile.width as f32,
                    (i / columns) as f32 * tile.height as f32,
                ),
                size: Vec2::new(tile.width as f32, tile.height as f32),
                sprite: SpriteComponent::new(tile.col as f32, tile.row as f32)
                    .with_atlas(tile.atlas)
                    .with_alpha(layer.opacity),
                visible: layer.visible,
            };

            let id = match self.spawners.get_mut(&layer.name) {
                Some(spawner) => spawner(ctx, spawn)?,
                None => {
                    let id = ctx.next_id();
                    ctx.spawn(spawn.into_entity(id))
                }
            };

            if let Some(members) = ctx.groups.get_mut(group) {
                members.add(id);
            }
            spawned += 1;
        }

        Ok(spawned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::EngineError;
    use crate::api::types::EntityKind;

    const MAP: &str = r#"{
        "width": 3, "height": 2, "tilewidth": 16, "tileheight": 16,
        "tilesets": [
            { "firstgid": 1, "image": "tiles.png", "imagewidth": 64, "tilewidth": 16, "tileheight": 16 }
        ],
        "layers": [
            { "name": "Wall", "type": "tilelayer", "width": 3, "height": 2,
              "data": [0, 0, 0, 1, 2, 3] },
            { "name": "Enemies", "type": "tilelayer", "width": 3, "height": 2,
              "data": [0, 5, 0, 0, 0, 0] }
        ]
    }"#;

    #[test]
    fn tiles_land_on_their_grid_cells() {
        let mut ctx = EngineContext::new();
        let level = LevelBuilder::new().build_json(MAP, &mut ctx).unwrap();

        let walls = ctx.groups.get(level.layer("Wall").unwrap()).unwrap();
        assert_eq!(walls.size(), 3);

        let mut positions: Vec<Vec2> = walls
            .iter()
            .map(|id| ctx.registry.get(id).unwrap().pos)
            .collect();
        positions.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert_eq!(
            positions,
            vec![Vec2::new(0.0, 16.0), Vec2::new(16.0, 16.0), Vec2::new(32.0, 16.0)]
        );

        let first = ctx.registry.find_by_tag("Wall").unwrap();
        assert_eq!(first.size, Vec2::splat(16.0));
        assert_eq!(first.kind, EntityKind::Static);
        assert_eq!(level.width, 48.0);
    }

    #[test]
    fn huge_tiles_are_placed_without_wrapping() {
        let json = r#"{
            "width": 3, "height": 1, "tilewidth": 3000000000, "tileheight": 16,
            "tilesets": [
                { "firstgid": 1, "image": "big.png", "imagewidth": 3000000000,
                  "tilewidth": 3000000000, "tileheight": 16 }
            ],
            "layers": [
                { "name": "Wall", "type": "tilelayer", "width": 3, "height": 1, "data": [0, 0, 1] }
            ]
        }"#;
        let mut ctx = EngineContext::new();
        LevelBuilder::new().build_json(json, &mut ctx).unwrap();

        let tile = ctx.registry.find_by_tag("Wall").unwrap();
        assert_eq!(tile.pos, Vec2::new(6.0e9, 0.0));
    }

    #[test]
    fn group_is_named_after_the_layer() {
        let mut ctx = EngineContext::new();
        let level = LevelBuilder::new().build_json(MAP, &mut ctx).unwrap();
        assert_eq!(ctx.groups.find("Wall"), level.layer("Wall"));
        assert_eq!(ctx.registry.with_tag("Wall").size(), 3);
    }

    #[test]
    fn layer_spawner_overrides_default_creation() {
        let mut ctx = EngineContext::new();
        let level = LevelBuilder::new()
            .with_layer_spawner("Enemies", |ctx, tile| {
                let id = ctx.next_id();
                let entity = tile.into_entity(id).with_kind(EntityKind::Enemy);
                Ok(ctx.spawn(entity))
            })
            .build_json(MAP, &mut ctx)
            .unwrap();

        let enemies = ctx.groups.get(level.layer("Enemies").unwrap()).unwrap();
        assert_eq!(enemies.size(), 1);
        let id = enemies.all()[0];
        let enemy = ctx.registry.get(id).unwrap();
        assert_eq!(enemy.kind, EntityKind::Enemy);
        assert_eq!(enemy.pos, Vec2::new(16.0, 0.0));
        // gid 5 is the first cell of the second row in a 4-wide image.
        let sprite = enemy.sprite.unwrap();
        assert_eq!((sprite.col, sprite.row), (0.0, 1.0));
    }

    #[test]
    fn spawner_errors_abort_the_build() {
        let mut ctx = EngineContext::new();
        let result = LevelBuilder::new()
            .with_layer_spawner("Enemies", |_ctx, _tile| Err(EngineError::UnknownEntity(EntityId(0))))
            .build_json(MAP, &mut ctx);
        assert!(result.is_err());
    }
}
