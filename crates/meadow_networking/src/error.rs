//! # Protocol Error Types
//!
//! Everything that can go wrong while turning region deltas into bytes and
//! back.
//!
//! Encode errors are producer bugs (the simulation handed us a value the wire
//! cannot carry). Decode errors are hostile or corrupted peers; the transport
//! decides whether to drop the connection.

use thiserror::Error;

/// Errors raised while encoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// Velocity magnitude reached the configured maximum.
    #[error("velocity {value} out of range: magnitude must be below {max}")]
    VelocityOutOfRange {
        /// The rejected velocity component.
        value: f64,
        /// The configured maximum velocity.
        max: f64,
    },

    /// A `u16`-length-prefixed blob was too long.
    #[error("{field} is {len} bytes, limit is {max}")]
    BlobTooLong {
        /// Which field overflowed.
        field: &'static str,
        /// Actual length in bytes.
        len: usize,
        /// Largest encodable length.
        max: usize,
    },

    /// A count-prefixed list or blob does not fit a varint count.
    #[error("{field} has {len} elements, too many to encode")]
    TooManyElements {
        /// Which list overflowed.
        field: &'static str,
        /// Actual element count.
        len: usize,
    },

    /// An options value is nested deeper than the decoder accepts.
    #[error("options value nested deeper than {max} levels")]
    ValueTooDeep {
        /// Maximum nesting depth.
        max: usize,
    },
}

/// Errors raised while decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ended in the middle of a field.
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes the next field needs.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A length or count prefix claims more data than the buffer holds.
    #[error("{field} claims {len} elements but only {remaining} bytes remain")]
    LengthExceedsBuffer {
        /// Which field carried the prefix.
        field: &'static str,
        /// Claimed length or count.
        len: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A varint ran past five bytes or past 32 bits.
    #[error("varint overflows 32 bits")]
    VarintOverflow,

    /// Unknown options value tag.
    #[error("invalid options value tag {0}")]
    InvalidValueTag(u8),

    /// Options value nested deeper than allowed.
    #[error("options value nested deeper than {max} levels")]
    ValueTooDeep {
        /// Maximum nesting depth.
        max: usize,
    },

    /// A string field that must be UTF-8 was not.
    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 {
        /// Which field was malformed.
        field: &'static str,
    },

    /// Bytes left over after the trailing tile-data blob.
    #[error("{0} trailing bytes after region update")]
    TrailingBytes(usize),
}

/// Errors raised while loading codec configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Any protocol-layer error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Encoder error
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Decoder error
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for encode operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for operations spanning several protocol stages.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
