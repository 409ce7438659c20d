//! # Expression Codec
//!
//! A pony's face is six small numbers packed into one 28-bit word.
//!
//! ## Bit Layout (low to high)
//!
//! ```text
//!  27      23 22   19 18   15 14     10 9       5 4       0
//! ┌─────────┬───────┬───────┬─────────┬─────────┬─────────┐
//! │  extra  │ rIris │ lIris │ rightEye│ leftEye │ muzzle  │
//! │ 5 bits  │ 4 bits│ 4 bits│ 5 bits  │ 5 bits  │ 5 bits  │
//! └─────────┴───────┴───────┴─────────┴─────────┴─────────┘
//! ```
//!
//! The codec does not mask on encode. A field wider than its slot bleeds into
//! its neighbour; callers range-reduce before packing.

use serde::{Deserialize, Serialize};

use crate::constants::EXPRESSION_NONE;

const MUZZLE_SHIFT: u32 = 0;
const LEFT_EYE_SHIFT: u32 = 5;
const RIGHT_EYE_SHIFT: u32 = 10;
const LEFT_IRIS_SHIFT: u32 = 15;
const RIGHT_IRIS_SHIFT: u32 = 19;
const EXTRA_SHIFT: u32 = 23;

const MASK_5: u32 = 0x1F;
const MASK_4: u32 = 0x0F;

/// Named bits of [`Expression::extra`].
pub struct ExpressionExtra;

impl ExpressionExtra {
    /// No extras.
    pub const NONE: u8 = 0;
    /// Blushing cheeks.
    pub const BLUSH: u8 = 1 << 0;
    /// Sleeping ("zzz"). Any player action cancels it.
    pub const ZZZ: u8 = 1 << 1;
    /// Crying.
    pub const CRY: u8 = 1 << 2;
    /// Tears.
    pub const TEARS: u8 = 1 << 3;
    /// Floating hearts.
    pub const HEARTS: u8 = 1 << 4;
}

/// A facial expression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expression {
    /// Muzzle shape (5 bits).
    pub muzzle: u8,
    /// Left eye shape (5 bits).
    pub left_eye: u8,
    /// Right eye shape (5 bits).
    pub right_eye: u8,
    /// Left iris direction (4 bits).
    pub left_iris: u8,
    /// Right iris direction (4 bits).
    pub right_iris: u8,
    /// [`ExpressionExtra`] bits (5 bits).
    pub extra: u8,
}

impl Expression {
    /// Largest muzzle/eye/extra value.
    pub const MAX_5_BIT: u8 = 31;
    /// Largest iris value.
    pub const MAX_4_BIT: u8 = 15;

    /// Creates an expression from its six fields.
    #[must_use]
    pub const fn new(
        muzzle: u8,
        left_eye: u8,
        right_eye: u8,
        left_iris: u8,
        right_iris: u8,
        extra: u8,
    ) -> Self {
        Self {
            muzzle,
            left_eye,
            right_eye,
            left_iris,
            right_iris,
            extra,
        }
    }

    /// Returns true if every field fits its slot.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.muzzle <= Self::MAX_5_BIT
            && self.left_eye <= Self::MAX_5_BIT
            && self.right_eye <= Self::MAX_5_BIT
            && self.left_iris <= Self::MAX_4_BIT
            && self.right_iris <= Self::MAX_4_BIT
            && self.extra <= Self::MAX_5_BIT
    }
}

/// Packs an expression into its wire word.
///
/// `None` packs to [`EXPRESSION_NONE`].
#[must_use]
pub fn encode_expression(expression: Option<Expression>) -> u32 {
    let Some(e) = expression else {
        return EXPRESSION_NONE;
    };

    let packed = (u32::from(e.muzzle) << MUZZLE_SHIFT)
        | (u32::from(e.left_eye) << LEFT_EYE_SHIFT)
        | (u32::from(e.right_eye) << RIGHT_EYE_SHIFT)
        | (u32::from(e.left_iris) << LEFT_IRIS_SHIFT)
        | (u32::from(e.right_iris) << RIGHT_IRIS_SHIFT)
        | (u32::from(e.extra) << EXTRA_SHIFT);

    debug_assert_ne!(
        packed, EXPRESSION_NONE,
        "expression {e:?} packed onto the absent sentinel"
    );
    packed
}

/// Unpacks a wire word.
///
/// Returns `None` only for [`EXPRESSION_NONE`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn decode_expression(value: u32) -> Option<Expression> {
    if value == EXPRESSION_NONE {
        return None;
    }

    Some(Expression {
        muzzle: ((value >> MUZZLE_SHIFT) & MASK_5) as u8,
        left_eye: ((value >> LEFT_EYE_SHIFT) & MASK_5) as u8,
        right_eye: ((value >> RIGHT_EYE_SHIFT) & MASK_5) as u8,
        left_iris: ((value >> LEFT_IRIS_SHIFT) & MASK_4) as u8,
        right_iris: ((value >> RIGHT_IRIS_SHIFT) & MASK_4) as u8,
        extra: ((value >> EXTRA_SHIFT) & MASK_5) as u8,
    })
}

/// True if the expression is one a player action should cancel (sleeping).
#[inline]
#[must_use]
pub const fn is_cancellable(expression: &Expression) -> bool {
    expression.extra & ExpressionExtra::ZZZ != 0
}
