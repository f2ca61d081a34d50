//! Little-endian primitive decoding and encoding for bytecode operands.
//!
//! Ark instruction operands wider than one byte are stored little-endian. This module
//! provides the bounds-checked primitives the instruction cursor reads operands with and
//! the encoder writes them with.
//!
//! # Key Components
//!
//! - [`crate::file::io::AbcIO`] - Trait defining endian-aware conversion for primitive types
//! - [`crate::file::io::read_le`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_le_at`] - Read a value at an offset and advance the offset
//! - [`crate::file::io::write_le_at`] - Append a value to a byte vector
//!
//! # Examples
//!
//! ```rust
//! use abcscope::file::io::{read_le, read_le_at};
//!
//! let data = [0x01, 0x00, 0x02, 0x00];
//! let first: u16 = read_le(&data)?;
//! assert_eq!(first, 1);
//!
//! let mut offset = 2;
//! let second: u16 = read_le_at(&data, &mut offset)?;
//! assert_eq!(second, 2);
//! assert_eq!(offset, 4);
//! # Ok::<(), abcscope::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// Trait for type-specific little-endian conversion of operand values.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array matching the width of the primitive.
pub trait AbcIO: Sized + Copy {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_abc_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl AbcIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_abc_io! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
}

/// Read a value of type T from the start of `data` in little-endian.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le<T: AbcIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Read a value of type T at `offset` in little-endian and advance the offset.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Mutable reference to the offset position (will be advanced after reading)
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le_at<T: AbcIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Append `value` to `data` in little-endian.
pub fn write_le_at<T: AbcIO>(data: &mut Vec<u8>, value: T) {
    data.extend_from_slice(value.to_le_bytes().as_ref());
}
