//! Serialization of composite routing keys.
//!
//! A composite partition key is routed by hashing the concatenation of its
//! components, each one length-prefixed and terminated, in declaration
//! order. The format must match what the storage layer computes internally,
//! otherwise the router lands on the wrong replica.

use bytes::{BufMut, Bytes, BytesMut};
use std::convert::TryFrom;
use std::io::{Cursor, Read};

use crate::error::{Error, Result};

/// Number of length bytes preceding every routing key component.
pub const SHORT_LEN: usize = 2;
/// Maximum byte length of a single routing key component.
pub const MAX_COMPONENT_LEN: usize = u16::MAX as usize;

const COMPONENT_TERMINATOR: u8 = 0;

/// Serializes partition key components into a routing key.
///
/// Every component is written as a 2-byte big-endian length, the raw
/// component bytes and a zero terminator byte. Components longer than
/// [`MAX_COMPONENT_LEN`] do not fit the length field and result in
/// [`Error::ValueTooLarge`] instead of a silently corrupted key.
pub fn serialize_routing_key<C: AsRef<[u8]>>(components: &[C]) -> Result<Bytes> {
    let mut buffer = BytesMut::with_capacity(
        components
            .iter()
            .map(|component| SHORT_LEN + component.as_ref().len() + 1)
            .sum(),
    );

    for component in components {
        let component = component.as_ref();
        let len =
            u16::try_from(component.len()).map_err(|_| Error::ValueTooLarge(component.len()))?;

        buffer.put_u16(len);
        buffer.put_slice(component);
        buffer.put_u8(COMPONENT_TERMINATOR);
    }

    Ok(buffer.freeze())
}

/// Recovers the components of a composite routing key.
///
/// The inverse of [`serialize_routing_key`]. Fails on truncated input or
/// when a component is not followed by a zero terminator.
pub fn deserialize_routing_key(key: &[u8]) -> Result<Vec<Bytes>> {
    let mut cursor = Cursor::new(key);
    let mut components = Vec::new();

    while (cursor.position() as usize) < key.len() {
        components.push(component_from_cursor(&mut cursor)?);
    }

    Ok(components)
}

fn component_from_cursor(cursor: &mut Cursor<&[u8]>) -> Result<Bytes> {
    let mut len_bytes = [0; SHORT_LEN];
    cursor.read_exact(&mut len_bytes)?;

    let mut component = vec![0; u16::from_be_bytes(len_bytes) as usize];
    cursor.read_exact(&mut component)?;

    let mut terminator = [0];
    cursor.read_exact(&mut terminator)?;

    if terminator[0] != COMPONENT_TERMINATOR {
        return Err(Error::InvalidComponentTerminator(terminator[0]));
    }

    Ok(component.into())
}
