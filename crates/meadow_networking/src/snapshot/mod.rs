//! # Full Region Snapshots
//!
//! Sent when a client first subscribes to a region, or after it lost track.
//!
//! A snapshot is an ordinary region update: every visible entity is written
//! as if it had just been added, the remove and tile-delta lists are empty,
//! and the full tile data rides in the trailing blob. The client decodes it
//! with the same [`crate::decode_region_update`] as any delta.

use meadow_shared::RegionCoord;

use crate::config::CodecConfig;
use crate::error::EncodeResult;
use crate::integration::{EntitySnapshot, VisibilityFilter};
use crate::protocol::write_envelope;
use crate::protocol::WireWriter;
use crate::protocol::UpdateFlags;

/// Flags every entity carries in a full snapshot.
///
/// `ACTION` is left out: actions are one-shot and already played.
pub const SNAPSHOT_FLAGS: UpdateFlags = UpdateFlags::POSITION
    .union(UpdateFlags::STATE)
    .union(UpdateFlags::EXPRESSION)
    .union(UpdateFlags::TYPE)
    .union(UpdateFlags::PLAYER_STATE);

/// Flags to request for `entity` in a full snapshot.
///
/// Optional properties the entity does not have are not sent. The usual
/// derivations (velocity, name-bad) still apply at write time.
#[must_use]
pub fn snapshot_flags(entity: &EntitySnapshot) -> UpdateFlags {
    let mut flags = SNAPSHOT_FLAGS;
    if entity.name.is_some() {
        flags.insert(UpdateFlags::NAME);
    }
    if entity.options.is_some() {
        flags.insert(UpdateFlags::OPTIONS);
    }
    if entity.info.is_some() {
        flags.insert(UpdateFlags::INFO);
    }
    flags
}

/// Encodes the full state of a region as seen by `observer`.
///
/// # Errors
///
/// Fails if any entity record fails; the whole snapshot is abandoned.
pub fn encode_region_snapshot<'e, V>(
    region: RegionCoord,
    entities: impl IntoIterator<Item = &'e EntitySnapshot>,
    observer: &V::Observer,
    visibility: &V,
    tile_data: Option<&[u8]>,
    config: &CodecConfig,
) -> EncodeResult<Vec<u8>>
where
    V: VisibilityFilter + ?Sized,
{
    let mut writer = WireWriter::new();
    let mut hidden = 0usize;

    let visible = entities.into_iter().filter(|entity| {
        let is_hidden = visibility.is_entity_hidden_from(observer, entity);
        if is_hidden {
            hidden += 1;
        }
        !is_hidden
    });

    write_envelope(
        &mut writer,
        region,
        visible.map(|entity| (entity, snapshot_flags(entity))),
        &[],
        &[],
        tile_data,
        config,
    )?;

    if hidden > 0 {
        tracing::debug!(
            "Snapshot of region ({}, {}) skipped {} hidden entities",
            region.x,
            region.y,
            hidden
        );
    }
    Ok(writer.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{HiddenEntities, ShowAll};
    use crate::protocol::decode_region_update;
    use crate::protocol::{EntityInfo, Value};
    use meadow_shared::{Expression, Vec2};

    fn config() -> CodecConfig {
        CodecConfig::default()
    }

    #[test]
    fn test_snapshot_flags_follow_optional_properties() {
        let bare = EntitySnapshot::new(1);
        assert_eq!(snapshot_flags(&bare), SNAPSHOT_FLAGS);

        let full = EntitySnapshot {
            name: Some("Fluttershy".to_owned()),
            options: Some(Value::Bool(true)),
            info: Some(EntityInfo::new(1, vec![0])),
            ..EntitySnapshot::new(2)
        };
        let flags = snapshot_flags(&full);
        assert!(flags.contains(UpdateFlags::NAME | UpdateFlags::OPTIONS | UpdateFlags::INFO));
        assert!(!flags.contains(UpdateFlags::ACTION));
    }

    #[test]
    fn test_snapshot_writes_every_entity_as_new() {
        let entities = vec![
            EntitySnapshot {
                position: Vec2::new(1.0, 1.0),
                expression: Some(Expression::new(1, 2, 3, 4, 5, 0)),
                entity_type: 12,
                ..EntitySnapshot::new(100)
            },
            EntitySnapshot {
                position: Vec2::new(2.0, 3.0),
                velocity: Vec2::new(1.25, 0.0),
                name: Some("Applejack".to_owned()),
                player_state: 4,
                ..EntitySnapshot::new(101)
            },
        ];
        let tiles = [1u8, 2, 3, 4];
        let bytes = encode_region_snapshot(
            RegionCoord::new(5, 6),
            &entities,
            &(),
            &ShowAll,
            Some(&tiles[..]),
            &config(),
        )
        .unwrap();

        let update = decode_region_update(&bytes, &config()).unwrap();
        assert_eq!(update.region, RegionCoord::new(5, 6));
        assert_eq!(update.updates.len(), 2);
        assert!(update.removes.is_empty());
        assert!(update.tiles.is_empty());
        assert_eq!(update.tile_data.as_deref(), Some(&tiles[..]));

        let first = &update.updates[0];
        assert_eq!(first.position, Some(Vec2::new(1.0, 1.0)));
        assert_eq!(first.state, Some(0));
        assert_eq!(first.velocity, None);
        assert_eq!(first.expression, Some(Some(Expression::new(1, 2, 3, 4, 5, 0))));
        assert_eq!(first.entity_type, Some(12));
        assert_eq!(first.name, None);

        let second = &update.updates[1];
        assert_eq!(second.velocity, Some(Vec2::new(1.25, 0.0)));
        assert_eq!(second.name.as_deref(), Some("Applejack"));
        assert_eq!(second.player_state, Some(4));
    }

    #[test]
    fn test_snapshot_respects_visibility() {
        let entities: Vec<EntitySnapshot> = (1..=4).map(EntitySnapshot::new).collect();
        let filter: HiddenEntities = [2, 4].into_iter().collect();

        let bytes =
            encode_region_snapshot(RegionCoord::new(0, 0), &entities, &(), &filter, None, &config()).unwrap();
        let update = decode_region_update(&bytes, &config()).unwrap();
        let ids: Vec<u32> = update.updates.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(update.tile_data, None);
    }
}
