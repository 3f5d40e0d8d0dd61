//! Variable-length quantities.
//!
//! SMF delta times and meta lengths are written seven bits per byte, most
//! significant group first, with the high bit set on every byte but the last.

use byteorder::WriteBytesExt;
use std::io::{self, Write};

/// Largest value a four-byte VLQ can hold.
pub const MAX_VLQ_VALUE: u32 = 0x0FFF_FFFF;

/// Writes `value` as a variable-length quantity.
///
/// Values above [`MAX_VLQ_VALUE`] are rejected with `InvalidInput`.
pub fn write_vlq<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    if value > MAX_VLQ_VALUE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("value {} does not fit in a variable-length quantity", value),
        ));
    }

    let mut groups = [0u8; 4];
    let mut count = 0;
    let mut rest = value;
    loop {
        groups[count] = (rest & 0x7F) as u8;
        count += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }

    for i in (0..count).rev() {
        let continuation = if i > 0 { 0x80 } else { 0x00 };
        writer.write_u8(groups[i] | continuation)?;
    }
    Ok(())
}

/// Number of bytes [`write_vlq`] emits for `value`.
pub fn vlq_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        _ => 4,
    }
}
