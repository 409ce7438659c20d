//! # Update Flags
//!
//! The 16-bit flag word at the head of every entity record.
//!
//! Field flags are independent bits, but their payloads are laid out
//! strictly in [`Field::CANONICAL`] order. Reader and writer both walk that
//! one array, and every payload site matches [`Field`] exhaustively, so a new
//! field cannot be added on one side only.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Flag word of an entity update record.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UpdateFlags(u16);

impl UpdateFlags {
    /// No flags. Only valid as the record-sequence terminator.
    pub const NONE: Self = Self(0);
    /// Position (x, y) follows.
    pub const POSITION: Self = Self(1 << 0);
    /// Velocity (vx, vy) follows.
    pub const VELOCITY: Self = Self(1 << 1);
    /// State byte follows.
    pub const STATE: Self = Self(1 << 2);
    /// Packed expression word follows.
    pub const EXPRESSION: Self = Self(1 << 3);
    /// Type id follows.
    pub const TYPE: Self = Self(1 << 4);
    /// Options value follows.
    pub const OPTIONS: Self = Self(1 << 5);
    /// Checksummed info blob follows.
    pub const INFO: Self = Self(1 << 6);
    /// Action byte follows.
    pub const ACTION: Self = Self(1 << 7);
    /// Name string follows.
    pub const NAME: Self = Self(1 << 8);
    /// The name was caught by the profanity filter. No payload.
    pub const NAME_BAD: Self = Self(1 << 9);
    /// Player state byte follows.
    pub const PLAYER_STATE: Self = Self(1 << 10);
    /// The entity crossed into this region. No payload.
    pub const SWITCH_REGION: Self = Self(1 << 11);

    const NAMED: [(Self, &'static str); 12] = [
        (Self::POSITION, "POSITION"),
        (Self::VELOCITY, "VELOCITY"),
        (Self::STATE, "STATE"),
        (Self::EXPRESSION, "EXPRESSION"),
        (Self::TYPE, "TYPE"),
        (Self::OPTIONS, "OPTIONS"),
        (Self::INFO, "INFO"),
        (Self::ACTION, "ACTION"),
        (Self::NAME, "NAME"),
        (Self::NAME_BAD, "NAME_BAD"),
        (Self::PLAYER_STATE, "PLAYER_STATE"),
        (Self::SWITCH_REGION, "SWITCH_REGION"),
    ];

    /// Wraps a raw flag word. Reserved bits are kept as-is.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Returns the raw flag word.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Returns true if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every bit of `other` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the bits set in either.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Sets the bits of `other`.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the bits of `other`.
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Iterates the payload-carrying fields present, in wire order.
    pub fn fields(self) -> impl Iterator<Item = Field> {
        Field::CANONICAL
            .into_iter()
            .filter(move |field| self.contains(field.flag()))
    }
}

impl BitOr for UpdateFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for UpdateFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Debug for UpdateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("UpdateFlags(NONE)");
        }
        f.write_str("UpdateFlags(")?;
        let mut first = true;
        let mut known = 0u16;
        for (flag, name) in Self::NAMED {
            known |= flag.0;
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        let reserved = self.0 & !known;
        if reserved != 0 {
            if !first {
                f.write_str(" | ")?;
            }
            write!(f, "{reserved:#06x}")?;
        }
        f.write_str(")")
    }
}

/// A payload-carrying section of an entity record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// `i16` x, `i16` y
    Position,
    /// `i16` vx, `i16` vy
    Velocity,
    /// `u8`
    State,
    /// `u32` packed expression
    Expression,
    /// `u16` type id
    Type,
    /// Options value
    Options,
    /// `u16` checksum, `u16`-length bytes
    Info,
    /// `u8`
    Action,
    /// `u16`-length UTF-8
    Name,
    /// `u8`
    PlayerState,
}

impl Field {
    /// Wire order of payload sections.
    pub const CANONICAL: [Self; 10] = [
        Self::Position,
        Self::Velocity,
        Self::State,
        Self::Expression,
        Self::Type,
        Self::Options,
        Self::Info,
        Self::Action,
        Self::Name,
        Self::PlayerState,
    ];

    /// The flag that gates this field.
    #[must_use]
    pub const fn flag(self) -> UpdateFlags {
        match self {
            Self::Position => UpdateFlags::POSITION,
            Self::Velocity => UpdateFlags::VELOCITY,
            Self::State => UpdateFlags::STATE,
            Self::Expression => UpdateFlags::EXPRESSION,
            Self::Type => UpdateFlags::TYPE,
            Self::Options => UpdateFlags::OPTIONS,
            Self::Info => UpdateFlags::INFO,
            Self::Action => UpdateFlags::ACTION,
            Self::Name => UpdateFlags::NAME,
            Self::PlayerState => UpdateFlags::PLAYER_STATE,
        }
    }
}
