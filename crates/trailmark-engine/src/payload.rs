//! Payload encoding per column encoding.
//!
//! Text columns go through the active strategy. Structured columns always
//! hold a compact JSON document so the database can evaluate predicates on
//! them, whichever strategy is active.

use trailmark_core::errors::Result;
use trailmark_core::{
    AttributeMap, Changeset, ColumnEncoding, JsonStrategy, SerializationStrategy,
};

pub fn encode_attributes(
    encoding: ColumnEncoding,
    strategy: &dyn SerializationStrategy,
    attributes: &AttributeMap,
) -> Result<String> {
    match encoding {
        ColumnEncoding::Text => strategy.encode(attributes),
        ColumnEncoding::StructuredJson | ColumnEncoding::StructuredBinaryJson => {
            JsonStrategy.encode(attributes)
        }
    }
}

pub fn decode_attributes(
    encoding: ColumnEncoding,
    strategy: &dyn SerializationStrategy,
    payload: &str,
) -> Result<AttributeMap> {
    match encoding {
        ColumnEncoding::Text => strategy.decode(payload),
        ColumnEncoding::StructuredJson | ColumnEncoding::StructuredBinaryJson => {
            JsonStrategy.decode(payload)
        }
    }
}

pub fn encode_changeset(
    encoding: ColumnEncoding,
    strategy: &dyn SerializationStrategy,
    changes: &Changeset,
) -> Result<String> {
    match encoding {
        ColumnEncoding::Text => strategy.encode_changeset(changes),
        ColumnEncoding::StructuredJson | ColumnEncoding::StructuredBinaryJson => {
            JsonStrategy.encode_changeset(changes)
        }
    }
}

pub fn decode_changeset(
    encoding: ColumnEncoding,
    strategy: &dyn SerializationStrategy,
    payload: &str,
) -> Result<Changeset> {
    match encoding {
        ColumnEncoding::Text => strategy.decode_changeset(payload),
        ColumnEncoding::StructuredJson | ColumnEncoding::StructuredBinaryJson => {
            JsonStrategy.decode_changeset(payload)
        }
    }
}
