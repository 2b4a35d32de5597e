use serde::Deserialize;

use crate::api::error::{EngineError, EngineResult};

/// Tiled stores flip flags in the top bits of a gid.
const GID_MASK: u32 = 0x1FFF_FFFF;

/// A map exported from the Tiled editor as JSON. Only the fields the level
/// builder needs are modeled; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TiledMap {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub tilesets: Vec<TiledTileset>,
    #[serde(default)]
    pub layers: Vec<TiledLayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledTileset {
    pub firstgid: u32,
    #[serde(default)]
    pub name: String,
    /// Image path relative to the map file.
    #[serde(default)]
    pub image: String,
    pub imagewidth: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledLayer {
    pub name: String,
    #[serde(rename = "type", default = "default_layer_type")]
    pub layer_type: String,
    /// Width in tiles.
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Row-major gids; 0 is an empty cell.
    #[serde(default)]
    pub data: Vec<u32>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

fn default_layer_type() -> String {
    "tilelayer".to_string()
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

impl TiledLayer {
    pub fn is_tile_layer(&self) -> bool {
        self.layer_type == "tilelayer"
    }
}

/// Where a gid lives: which tileset, and which cell of its image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRef {
    /// Index of the tileset in firstgid order.
    pub atlas: u32,
    pub col: u32,
    pub row: u32,
    pub width: u32,
    pub height: u32,
}

impl TiledMap {
    /// Parse a map from a JSON string. Tilesets are sorted by `firstgid`.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let mut map: TiledMap = serde_json::from_str(json)?;
        map.tilesets.sort_by_key(|t| t.firstgid);
        Ok(map)
    }

    /// Resolve a non-zero gid to its tileset cell.
    ///
    /// A tileset covers `[firstgid, next.firstgid)`; the last one is open-ended.
    pub fn tile(&self, gid: u32) -> EngineResult<TileRef> {
        let gid = gid & GID_MASK;
        let index = self
            .tilesets
            .iter()
            .rposition(|t| t.firstgid <= gid)
            .ok_or(EngineError::UnknownTileset { gid })?;
        let tileset = &self.tilesets[index];

        let local = gid - tileset.firstgid;
        let columns = (tileset.imagewidth / tileset.tilewidth.max(1)).max(1);
        Ok(TileRef {
            atlas: index as u32,
            col: local % columns,
            row: local / columns,
            width: tileset.tilewidth,
            height: tileset.tileheight,
        })
    }

    /// Map size in world units. Computed in `f32`: map dimensions come
    /// straight from the file and their product can exceed `u32`.
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tilewidth as f32
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * self.tileheight as f32
    }

    pub fn layer(&self, name: &str) -> Option<&TiledLayer> {
        self.layers.iter().find(|l| l.name == name)
    }
}
