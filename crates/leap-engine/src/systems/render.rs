use crate::components::entity::Entity;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from a set of entities.
/// Skips hidden entities and entities without sprites, then groups by atlas
/// (stable, so spawn order is kept within an atlas).
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    let mut drawn: Vec<(u32, RenderInstance)> = entities
        .filter(|e| e.visible)
        .filter_map(|entity| {
            let sprite = entity.sprite.as_ref()?;
            Some((
                sprite.atlas,
                RenderInstance {
                    x: entity.pos.x,
                    y: entity.pos.y,
                    width: entity.size.x,
                    height: entity.size.y,
                    kind: entity.kind.code(),
                    alpha: sprite.alpha,
                    sprite_col: sprite.col,
                    atlas_row: sprite.row,
                },
            ))
        })
        .collect();
    drawn.sort_by_key(|(atlas, _)| *atlas);

    let mut dropped = 0;
    for (atlas, instance) in drawn {
        if !buffer.push(atlas, instance) {
            dropped += 1;
        }
    }
    if dropped > 0 {
        log::warn!("render buffer full, dropped {} instances", dropped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{EntityId, EntityKind};
    use crate::components::sprite::SpriteComponent;
    use glam::Vec2;

    #[test]
    fn hidden_and_spriteless_entities_are_skipped() {
        let mut hidden = Entity::new(EntityId(2)).with_sprite(SpriteComponent::default());
        hidden.visible = false;
        let entities = vec![
            Entity::new(EntityId(1))
                .with_kind(EntityKind::Player)
                .with_pos(Vec2::new(5.0, 6.0))
                .with_size(Vec2::new(16.0, 24.0))
                .with_sprite(SpriteComponent::new(3.0, 1.0)),
            hidden,
            Entity::new(EntityId(3)),
        ];

        let mut buf = RenderBuffer::new();
        build_render_buffer(entities.iter(), &mut buf);

        assert_eq!(buf.instance_count(), 1);
        let inst = buf.instances()[0];
        assert_eq!((inst.x, inst.y, inst.width, inst.height), (5.0, 6.0, 16.0, 24.0));
        assert_eq!(inst.kind, EntityKind::Player.code());
        assert_eq!((inst.sprite_col, inst.atlas_row), (3.0, 1.0));
    }

    #[test]
    fn instances_are_grouped_by_atlas() {
        let entities = vec![
            Entity::new(EntityId(1)).with_sprite(SpriteComponent::new(0.0, 0.0).with_atlas(1)),
            Entity::new(EntityId(2)).with_sprite(SpriteComponent::new(1.0, 0.0)),
            Entity::new(EntityId(3)).with_sprite(SpriteComponent::new(2.0, 0.0).with_atlas(1)),
        ];

        let mut buf = RenderBuffer::new();
        build_render_buffer(entities.iter(), &mut buf);

        let cols: Vec<f32> = buf.instances().iter().map(|i| i.sprite_col).collect();
        assert_eq!(cols, vec![1.0, 0.0, 2.0]);
        assert_eq!(buf.batches().len(), 2);
    }
}
