//! # Region Update Envelope
//!
//! One tick's delta for one spatial region.
//!
//! ## Envelope Structure
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Region x (u16) │ Region y (u16)                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Entity record* │ ... │ 0x0000 (terminator)                   │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Remove count (varint) │ entity id (u32) * count              │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Tile count (varint)   │ (x u8, y u8, type u8) * count        │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Tile data (nullable varint length + bytes)                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decoder never knows how many entities to expect: the terminator is the
//! only end marker for the record section. Everything after it is length
//! prefixed, and the buffer must end exactly after the tile data.

use meadow_shared::{EntityId, RegionCoord, TileDelta, RECORD_TERMINATOR};

use crate::config::CodecConfig;
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::integration::{EntityDelta, EntitySnapshot};
use crate::protocol::flags::UpdateFlags;
use crate::protocol::record::{read_entity_update, write_entity_update, EntityUpdate};
use crate::protocol::serialization::{WireReader, WireWriter};

/// Size of the region coordinate header in bytes.
pub const REGION_HEADER_SIZE: usize = 4;

/// Everything that changed in one region this tick, as the simulation
/// reports it.
#[derive(Clone, Copy, Debug)]
pub struct RegionDelta<'a> {
    /// Which region
    pub region: RegionCoord,
    /// Changed entities and the fields to send for each
    pub entities: &'a [EntityDelta<'a>],
    /// Entities that left the region or were destroyed
    pub removes: &'a [EntityId],
    /// Individually changed tiles
    pub tiles: &'a [TileDelta],
    /// Compressed bulk tile data, if any
    pub tile_data: Option<&'a [u8]>,
}

impl<'a> RegionDelta<'a> {
    /// A delta for `region` with nothing in it.
    #[must_use]
    pub const fn empty(region: RegionCoord) -> Self {
        Self {
            region,
            entities: &[],
            removes: &[],
            tiles: &[],
            tile_data: None,
        }
    }

    /// Returns true if nothing changed in the region.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.removes.is_empty()
            && self.tiles.is_empty()
            && self.tile_data.is_none()
    }
}

/// A decoded region update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionUpdate {
    /// Which region
    pub region: RegionCoord,
    /// Entity records in wire order
    pub updates: Vec<EntityUpdate>,
    /// Removed entity ids
    pub removes: Vec<EntityId>,
    /// Changed tiles
    pub tiles: Vec<TileDelta>,
    /// Bulk tile data, still compressed
    pub tile_data: Option<Vec<u8>>,
}

impl RegionUpdate {
    /// Returns true if the update carries no change at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
            && self.removes.is_empty()
            && self.tiles.is_empty()
            && self.tile_data.is_none()
    }
}

/// Encodes a region delta into a fresh buffer.
///
/// # Errors
///
/// Fails if any entity record fails (see [`write_entity_update`]); the whole
/// envelope is abandoned.
pub fn encode_region_update(delta: &RegionDelta<'_>, config: &CodecConfig) -> EncodeResult<Vec<u8>> {
    let mut writer = WireWriter::with_capacity(estimate_size(delta));
    encode_region_update_into(&mut writer, delta, config)?;
    Ok(writer.into_bytes())
}

/// Appends a region delta to `writer`.
///
/// On error `writer` is restored to its length on entry.
///
/// # Errors
///
/// Same as [`encode_region_update`].
pub fn encode_region_update_into(
    writer: &mut WireWriter,
    delta: &RegionDelta<'_>,
    config: &CodecConfig,
) -> EncodeResult<()> {
    write_envelope(
        writer,
        delta.region,
        delta.entities.iter().map(|d| (d.entity, d.flags)),
        delta.removes,
        delta.tiles,
        delta.tile_data,
        config,
    )
}

/// Shared by the delta and full-snapshot paths.
pub(crate) fn write_envelope<'e>(
    writer: &mut WireWriter,
    region: RegionCoord,
    entities: impl Iterator<Item = (&'e EntitySnapshot, UpdateFlags)>,
    removes: &[EntityId],
    tiles: &[TileDelta],
    tile_data: Option<&[u8]>,
    config: &CodecConfig,
) -> EncodeResult<()> {
    let start = writer.len();
    let result = write_envelope_body(writer, region, entities, removes, tiles, tile_data, config);
    if result.is_err() {
        writer.truncate(start);
    }
    result
}

fn write_envelope_body<'e>(
    writer: &mut WireWriter,
    region: RegionCoord,
    entities: impl Iterator<Item = (&'e EntitySnapshot, UpdateFlags)>,
    removes: &[EntityId],
    tiles: &[TileDelta],
    tile_data: Option<&[u8]>,
    config: &CodecConfig,
) -> EncodeResult<()> {
    writer.write_u16(region.x);
    writer.write_u16(region.y);

    let mut records = 0usize;
    for (entity, flags) in entities {
        write_entity_update(writer, entity, flags, config)?;
        records += 1;
    }
    writer.write_u16(RECORD_TERMINATOR);

    writer.write_count("removes", removes.len())?;
    for &id in removes {
        writer.write_u32(id);
    }

    writer.write_count("tiles", tiles.len())?;
    for tile in tiles {
        writer.write_u8(tile.x);
        writer.write_u8(tile.y);
        writer.write_u8(tile.tile_type);
    }

    writer.write_nullable_blob("tile data", tile_data)?;

    tracing::debug!(
        "Encoded region ({}, {}): {} records, {} removes, {} tiles, tile data {}",
        region.x,
        region.y,
        records,
        removes.len(),
        tiles.len(),
        tile_data.map_or(0, <[u8]>::len)
    );
    Ok(())
}

/// Decodes one region update occupying the whole of `bytes`.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the buffer is truncated or malformed, or
/// [`DecodeError::TrailingBytes`] if anything follows the tile data.
pub fn decode_region_update(bytes: &[u8], config: &CodecConfig) -> DecodeResult<RegionUpdate> {
    let mut reader = WireReader::new(bytes);
    match read_region_update(&mut reader, config) {
        Ok(update) if reader.is_exhausted() => Ok(update),
        Ok(_) => {
            let extra = reader.remaining();
            tracing::warn!("Rejected region update: {} trailing bytes", extra);
            Err(DecodeError::TrailingBytes(extra))
        }
        Err(err) => {
            tracing::warn!("Rejected region update at byte {}: {}", reader.position(), err);
            Err(err)
        }
    }
}

/// Reads one region update from the reader's current position.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the buffer is truncated or malformed.
pub fn read_region_update(reader: &mut WireReader<'_>, config: &CodecConfig) -> DecodeResult<RegionUpdate> {
    let region = RegionCoord::new(reader.read_u16()?, reader.read_u16()?);

    let mut updates = Vec::new();
    while let Some(update) = read_entity_update(reader, config)? {
        updates.push(update);
    }

    let remove_count = reader.read_count("removes", 4)?;
    let mut removes = Vec::with_capacity(remove_count);
    for _ in 0..remove_count {
        removes.push(reader.read_u32()?);
    }

    let tile_count = reader.read_count("tiles", TileDelta::SIZE)?;
    let mut tiles = Vec::with_capacity(tile_count);
    for _ in 0..tile_count {
        tiles.push(TileDelta::new(reader.read_u8()?, reader.read_u8()?, reader.read_u8()?));
    }

    let tile_data = reader.read_nullable_blob("tile data")?.map(<[u8]>::to_vec);

    tracing::debug!(
        "Decoded region ({}, {}): {} records, {} removes, {} tiles",
        region.x,
        region.y,
        updates.len(),
        removes.len(),
        tiles.len()
    );

    Ok(RegionUpdate {
        region,
        updates,
        removes,
        tiles,
        tile_data,
    })
}

/// Rough output size, to avoid regrowing the buffer on typical ticks.
fn estimate_size(delta: &RegionDelta<'_>) -> usize {
    REGION_HEADER_SIZE
        + delta.entities.len() * 16
        + 2
        + 5
        + delta.removes.len() * 4
        + 5
        + delta.tiles.len() * TileDelta::SIZE
        + 5
        + delta.tile_data.map_or(0, <[u8]>::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeError;
    use meadow_shared::Vec2;

    fn config() -> CodecConfig {
        CodecConfig::default()
    }

    #[test]
    fn test_empty_region_layout() {
        let bytes = encode_region_update(&RegionDelta::empty(RegionCoord::new(1, 2)), &config()).unwrap();
        // header, terminator, 0 removes, 0 tiles, absent tile data
        assert_eq!(bytes, vec![1, 0, 2, 0, 0, 0, 0, 0, 0]);

        let update = decode_region_update(&bytes, &config()).unwrap();
        assert_eq!(update.region, RegionCoord::new(1, 2));
        assert!(update.is_empty());
    }

    #[test]
    fn test_terminator_is_the_only_record_boundary() {
        let a = EntitySnapshot { entity_type: 1, ..EntitySnapshot::new(10) };
        let b = EntitySnapshot { entity_type: 2, ..EntitySnapshot::new(20) };
        let entities = [
            EntityDelta::new(&a, UpdateFlags::TYPE),
            EntityDelta::new(&b, UpdateFlags::TYPE | UpdateFlags::SWITCH_REGION),
        ];
        let delta = RegionDelta { entities: &entities, ..RegionDelta::empty(RegionCoord::new(0, 0)) };
        let update = decode_region_update(&encode_region_update(&delta, &config()).unwrap(), &config()).unwrap();

        let ids: Vec<EntityId> = update.updates.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![10, 20]);
        assert!(!update.updates[0].switch_region);
        assert!(update.updates[1].switch_region);
        assert_eq!(update.updates[1].entity_type, Some(2));
    }

    #[test]
    fn test_removes_tiles_and_data() {
        let removes = [7, 0xFFFF_FFFF];
        let tiles = [TileDelta::new(0, 0, 1), TileDelta::new(255, 17, 4)];
        let data = [9u8; 300];
        let delta = RegionDelta {
            region: RegionCoord::new(u16::MAX, 0),
            entities: &[],
            removes: &removes,
            tiles: &tiles,
            tile_data: Some(&data[..]),
        };
        let update = decode_region_update(&encode_region_update(&delta, &config()).unwrap(), &config()).unwrap();
        assert_eq!(update.region, RegionCoord::new(u16::MAX, 0));
        assert_eq!(update.removes, removes.to_vec());
        assert_eq!(update.tiles, tiles.to_vec());
        assert_eq!(update.tile_data.as_deref(), Some(&data[..]));
    }

    #[test]
    fn test_failed_record_abandons_envelope() {
        let fast = EntitySnapshot { velocity: Vec2::new(100.0, 0.0), ..EntitySnapshot::new(1) };
        let entities = [EntityDelta::new(&fast, UpdateFlags::POSITION)];
        let delta = RegionDelta { entities: &entities, ..RegionDelta::empty(RegionCoord::new(3, 3)) };

        let mut writer = WireWriter::new();
        writer.write_u8(0x42);
        let err = encode_region_update_into(&mut writer, &delta, &config()).unwrap_err();
        assert!(matches!(err, EncodeError::VelocityOutOfRange { .. }));
        assert_eq!(writer.as_slice(), &[0x42]);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = encode_region_update(&RegionDelta::empty(RegionCoord::new(0, 0)), &config()).unwrap();
        bytes.push(0);
        assert_eq!(decode_region_update(&bytes, &config()), Err(DecodeError::TrailingBytes(1)));
    }

    #[test]
    fn test_back_to_back_envelopes_with_reader() {
        let mut writer = WireWriter::new();
        encode_region_update_into(&mut writer, &RegionDelta::empty(RegionCoord::new(1, 1)), &config()).unwrap();
        encode_region_update_into(&mut writer, &RegionDelta::empty(RegionCoord::new(2, 2)), &config()).unwrap();

        let mut reader = WireReader::new(writer.as_slice());
        assert_eq!(read_region_update(&mut reader, &config()).unwrap().region, RegionCoord::new(1, 1));
        assert_eq!(read_region_update(&mut reader, &config()).unwrap().region, RegionCoord::new(2, 2));
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_delta_is_empty() {
        let removes = [1];
        assert!(RegionDelta::empty(RegionCoord::new(0, 0)).is_empty());
        assert!(!RegionDelta { removes: &removes, ..RegionDelta::empty(RegionCoord::new(0, 0)) }.is_empty());
    }
}
