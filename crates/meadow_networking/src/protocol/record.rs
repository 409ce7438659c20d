//! # Entity Update Records
//!
//! One entity's changed state for one tick.
//!
//! ## Record Layout
//!
//! ```text
//! ┌────────────┬───────────┬──────────────────────────────────────────┐
//! │ flags (u16)│ id (u32)  │ present fields, in Field::CANONICAL order │
//! └────────────┴───────────┴──────────────────────────────────────────┘
//! ```
//!
//! A flag word of zero is not a record: it terminates the sequence.
//!
//! ## Derived Flags
//!
//! The encoder adjusts the requested flags before anything is written:
//!
//! - `POSITION` forces `STATE`
//! - `POSITION` forces `VELOCITY` when the entity is moving
//! - `NAME` on a filtered name forces `NAME_BAD`
//!
//! The decoder does not rely on any of these.

use meadow_shared::{decode_expression, encode_expression, EntityId, Expression, Vec2};

use crate::config::CodecConfig;
use crate::error::{DecodeResult, EncodeResult};
use crate::integration::EntitySnapshot;
use crate::protocol::flags::{Field, UpdateFlags};
use crate::protocol::quantize::{
    decode_coord_x, decode_coord_y, decode_velocity, encode_coord_x, encode_coord_y, encode_velocity,
};
use crate::protocol::serialization::{WireReader, WireWriter};
use crate::protocol::value::{read_value, write_value, Value};

/// Opaque info blob with its integrity checksum.
///
/// The checksum is computed and verified by the caller; the codec only
/// carries it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityInfo {
    /// Caller-defined checksum over `data`.
    pub checksum: u16,
    /// Raw info bytes.
    pub data: Vec<u8>,
}

impl EntityInfo {
    /// Creates an info blob.
    #[must_use]
    pub fn new(checksum: u16, data: Vec<u8>) -> Self {
        Self { checksum, data }
    }
}

/// A decoded entity update record.
///
/// Every payload field is `None` unless its flag arrived.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityUpdate {
    /// Entity id
    pub id: EntityId,
    /// Raw flag word as received.
    pub flags: UpdateFlags,
    /// The entity crossed into this region.
    pub switch_region: bool,
    /// Position in tiles
    pub position: Option<Vec2>,
    /// Velocity in tiles per second
    pub velocity: Option<Vec2>,
    /// State byte
    pub state: Option<u8>,
    /// Outer `Some` when the field arrived; inner `None` clears the expression.
    pub expression: Option<Option<Expression>>,
    /// Type id
    pub entity_type: Option<u16>,
    /// Options value
    pub options: Option<Value>,
    /// Info blob
    pub info: Option<EntityInfo>,
    /// Action byte
    pub action: Option<u8>,
    /// Name; `None` also when the name bytes were not valid UTF-8.
    pub name: Option<String>,
    /// The name was caught by the profanity filter. Only set alongside a decoded `name`.
    pub name_bad: bool,
    /// Player state byte
    pub player_state: Option<u8>,
}

impl EntityUpdate {
    /// An update for `id` carrying nothing.
    #[must_use]
    pub const fn empty(id: EntityId, flags: UpdateFlags) -> Self {
        Self {
            id,
            flags,
            switch_region: false,
            position: None,
            velocity: None,
            state: None,
            expression: None,
            entity_type: None,
            options: None,
            info: None,
            action: None,
            name: None,
            name_bad: false,
            player_state: None,
        }
    }
}

/// Applies the producer-side flag derivations to a requested flag set.
#[must_use]
pub fn derive_flags(requested: UpdateFlags, entity: &EntitySnapshot) -> UpdateFlags {
    let mut flags = requested;

    if flags.contains(UpdateFlags::POSITION) {
        flags.insert(UpdateFlags::STATE);
        if !entity.velocity.is_zero() {
            flags.insert(UpdateFlags::VELOCITY);
        }
    }

    if flags.contains(UpdateFlags::NAME) && entity.name_bad {
        flags.insert(UpdateFlags::NAME_BAD);
    }

    flags
}

/// Writes one entity record.
///
/// On error nothing is left behind in `writer`: a half-written record would
/// shift every byte after it.
///
/// # Errors
///
/// Returns [`crate::EncodeError::VelocityOutOfRange`] if a velocity component
/// reaches `config.max_velocity`, or a length error for an oversized name,
/// info blob or options value.
///
/// # Panics
///
/// In debug builds, if the derived flag word is zero (it would read back as
/// the sequence terminator).
pub fn write_entity_update(
    writer: &mut WireWriter,
    entity: &EntitySnapshot,
    requested: UpdateFlags,
    config: &CodecConfig,
) -> EncodeResult<()> {
    let start = writer.len();
    let result = write_record(writer, entity, derive_flags(requested, entity), config);
    if let Err(err) = &result {
        writer.truncate(start);
        tracing::warn!("Dropped record for entity {}: {}", entity.id, err);
    }
    result
}

fn write_record(
    writer: &mut WireWriter,
    entity: &EntitySnapshot,
    flags: UpdateFlags,
    config: &CodecConfig,
) -> EncodeResult<()> {
    debug_assert!(
        !flags.is_empty(),
        "entity {} written with an empty flag word",
        entity.id
    );

    writer.write_u16(flags.bits());
    writer.write_u32(entity.id);

    for field in flags.fields() {
        match field {
            Field::Position => {
                writer.write_i16(encode_coord_x(entity.position.x, config.tile_width));
                writer.write_i16(encode_coord_y(entity.position.y, config.tile_height));
            }
            Field::Velocity => {
                let vx = encode_velocity(entity.velocity.x, config.max_velocity)?;
                let vy = encode_velocity(entity.velocity.y, config.max_velocity)?;
                writer.write_i16(vx);
                writer.write_i16(vy);
            }
            Field::State => writer.write_u8(entity.state),
            Field::Expression => writer.write_u32(encode_expression(entity.expression)),
            Field::Type => writer.write_u16(entity.entity_type),
            Field::Options => write_value(writer, entity.options.as_ref().unwrap_or(&Value::Null))?,
            Field::Info => {
                let (checksum, data) = entity
                    .info
                    .as_ref()
                    .map_or((0, &[][..]), |info| (info.checksum, info.data.as_slice()));
                writer.write_u16(checksum);
                writer.write_short_blob("info", data)?;
            }
            Field::Action => writer.write_u8(entity.action),
            Field::Name => {
                let name = entity.name.as_deref().unwrap_or_default();
                writer.write_short_blob("name", name.as_bytes())?;
            }
            Field::PlayerState => writer.write_u8(entity.player_state),
        }
    }

    tracing::trace!("Wrote entity {} with {:?}", entity.id, flags);
    Ok(())
}

/// Reads one entity record.
///
/// Returns `Ok(None)` when the terminator (flag word zero) is consumed.
///
/// # Errors
///
/// Returns a [`crate::DecodeError`] if the buffer ends mid-record or the
/// options value is malformed. A name that is not valid UTF-8 is not an
/// error: the record decodes with `name: None`.
pub fn read_entity_update(
    reader: &mut WireReader<'_>,
    config: &CodecConfig,
) -> DecodeResult<Option<EntityUpdate>> {
    let flags = UpdateFlags::from_bits(reader.read_u16()?);
    if flags.is_empty() {
        return Ok(None);
    }

    let id = reader.read_u32()?;
    let mut update = EntityUpdate::empty(id, flags);
    update.switch_region = flags.contains(UpdateFlags::SWITCH_REGION);

    for field in flags.fields() {
        match field {
            Field::Position => {
                let x = decode_coord_x(reader.read_i16()?, config.tile_width);
                let y = decode_coord_y(reader.read_i16()?, config.tile_height);
                update.position = Some(Vec2::new(x, y));
            }
            Field::Velocity => {
                let vx = decode_velocity(reader.read_i16()?, config.max_velocity);
                let vy = decode_velocity(reader.read_i16()?, config.max_velocity);
                update.velocity = Some(Vec2::new(vx, vy));
            }
            Field::State => update.state = Some(reader.read_u8()?),
            Field::Expression => update.expression = Some(decode_expression(reader.read_u32()?)),
            Field::Type => update.entity_type = Some(reader.read_u16()?),
            Field::Options => update.options = Some(read_value(reader)?),
            Field::Info => {
                let checksum = reader.read_u16()?;
                let data = reader.read_short_blob("info")?.to_vec();
                update.info = Some(EntityInfo { checksum, data });
            }
            Field::Action => update.action = Some(reader.read_u8()?),
            Field::Name => {
                let bytes = reader.read_short_blob("name")?;
                match std::str::from_utf8(bytes) {
                    Ok(name) => update.name = Some(name.to_owned()),
                    Err(err) => {
                        tracing::warn!("Entity {} sent a malformed name ({}), ignoring it", id, err);
                    }
                }
            }
            Field::PlayerState => update.player_state = Some(reader.read_u8()?),
        }
    }

    // The marker means nothing without a name to apply it to.
    update.name_bad = update.name.is_some() && flags.contains(UpdateFlags::NAME_BAD);
    Ok(Some(update))
}
