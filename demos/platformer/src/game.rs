use glam::Vec2;
use leap_engine::*;

use crate::{enemy, hud, player};

const WORLD_W: f32 = 600.0;
const WORLD_H: f32 = 400.0;

/// Layer whose tiles block movement.
pub const WALL_LAYER: &str = "Wall";
/// Layer whose tiles become patrolling enemies.
pub const ENEMY_LAYER: &str = "Enemies";
/// Everything a bullet stops at: walls and enemies.
pub const BULLET_TARGETS: &str = "BulletTargets";

/// Atlas holding the character sprites. Level tilesets come first.
pub const SPRITE_ATLAS: u32 = 8;

// Game event kinds forwarded to JS.
/// a = previous health, b = new health, c = max health.
pub const EVENT_HEALTH_CHANGED: f32 = 1.0;
/// a = enemy id.
pub const EVENT_ENEMY_HIT: f32 = 2.0;
/// a = enemy id.
pub const EVENT_ENEMY_KILLED: f32 = 3.0;

const PLAYER_START: Vec2 = Vec2::new(32.0, 300.0);

/// Side-scrolling shooter: a Tiled level, one player, patrolling enemies.
pub struct Platformer {
    level: Option<Level>,
    player: Option<EntityId>,
}

impl Platformer {
    pub fn new() -> Self {
        Self {
            level: None,
            player: None,
        }
    }
}

impl Default for Platformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Platformer {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_W,
            world_height: WORLD_H,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        // The host fetches the map and hands it to level_loaded().
        ctx.loading.begin();
    }

    fn level_loaded(&mut self, ctx: &mut EngineContext, json: &str) -> EngineResult<()> {
        // Created up front so enemies can target the walls before they exist.
        let walls = ctx.groups.named(WALL_LAYER);

        let level = LevelBuilder::new()
            .with_layer_spawner(ENEMY_LAYER, move |ctx, tile| enemy::spawn_enemy(ctx, tile, walls))
            .build_json(json, ctx)?;

        self.level = Some(level);
        Ok(())
    }

    fn loading_complete(&mut self, ctx: &mut EngineContext) {
        let walls = ctx.groups.named(WALL_LAYER);
        let targets = ctx.groups.named(BULLET_TARGETS);

        let mut members = ctx.registry.with_tag(WALL_LAYER);
        members.extend(ctx.of_kind(EntityKind::Enemy).iter());
        if let Some(group) = ctx.groups.get_mut(targets) {
            group.extend(members.iter());
        }

        if let Some(level) = &self.level {
            ctx.camera.set_bounds(0.0, 0.0, level.width, level.height);
        }

        match player::spawn_player(ctx, PLAYER_START, walls, targets) {
            Ok(id) => {
                hud::spawn_hud(ctx, player::MAX_HEALTH);
                self.player = Some(id);
            }
            Err(err) => log::error!("platformer: could not spawn player: {}", err),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 8x4 tiles of 16px. Floor along the bottom row, a wall at each end,
    /// one enemy standing on the floor.
    pub(crate) const LEVEL: &str = r#"{
        "width": 8, "height": 4, "tilewidth": 16, "tileheight": 16,
        "tilesets": [
            { "firstgid": 1, "image": "tiles.png", "imagewidth": 64, "tilewidth": 16, "tileheight": 16 }
        ],
        "layers": [
            { "name": "Wall", "type": "tilelayer", "width": 8, "height": 4,
              "data": [1, 0, 0, 0, 0, 0, 0, 1,
                       1, 0, 0, 0, 0, 0, 0, 1,
                       1, 0, 0, 0, 0, 0, 0, 1,
                       1, 1, 1, 1, 1, 1, 1, 1] },
            { "name": "Enemies", "type": "tilelayer", "width": 8, "height": 4,
              "data": [0, 0, 0, 0, 0, 0, 0, 0,
                       0, 0, 0, 0, 0, 0, 0, 0,
                       0, 0, 0, 0, 0, 5, 0, 0,
                       0, 0, 0, 0, 0, 0, 0, 0] }
        ]
    }"#;

    #[test]
    fn level_load_builds_walls_and_enemies() {
        let mut game = Platformer::new();
        let mut ctx = EngineContext::from_config(&game.config()).unwrap();
        game.init(&mut ctx);
        assert!(!ctx.loading.is_done());

        game.level_loaded(&mut ctx, LEVEL).unwrap();
        ctx.loading.finish();
        assert!(ctx.loading.take_completion());
        game.loading_complete(&mut ctx);

        let walls = ctx.groups.find(WALL_LAYER).unwrap();
        assert_eq!(ctx.groups.get(walls).unwrap().size(), 14);
        assert_eq!(ctx.of_kind(EntityKind::Enemy).size(), 1);
        assert!(game.player.is_some());

        let targets = ctx.groups.find(BULLET_TARGETS).unwrap();
        assert_eq!(ctx.groups.get(targets).unwrap().size(), 15);
        assert_eq!(ctx.camera.bounds, Some([0.0, 0.0, 128.0, 64.0]));
    }

    #[test]
    fn malformed_level_is_reported() {
        let mut game = Platformer::new();
        let mut ctx = EngineContext::new();
        assert!(game.level_loaded(&mut ctx, "not json").is_err());
    }
}
