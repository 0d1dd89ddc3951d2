/// Removes emulation prevention bytes from an escaped NAL unit payload.
///
/// A 0x03 following two zero bytes is dropped and the zero run restarts,
/// so `00 00 03 03` unescapes to `00 00 03`.
pub fn clear_start_code_emulation_prevention_3_byte(data: &[u8]) -> Vec<u8> {
    let mut unescaped_bytes = Vec::with_capacity(data.len());
    let mut zero_count = 0;

    for &byte in data {
        if zero_count == 2 && byte == 0x03 {
            zero_count = 0;
            continue;
        }

        unescaped_bytes.push(byte);

        if byte == 0 {
            zero_count = (zero_count + 1).min(2);
        } else {
            zero_count = 0;
        }
    }

    unescaped_bytes
}

/// Escapes an RBSP so that it cannot emulate a start code.
///
/// Inverse of [`clear_start_code_emulation_prevention_3_byte`].
pub fn add_start_code_emulation_prevention_3_byte(data: &[u8]) -> Vec<u8> {
    let mut escaped_bytes = Vec::with_capacity(data.len() + data.len() / 2);
    let mut zero_count = 0;

    for &byte in data {
        if zero_count == 2 && byte <= 0x03 {
            escaped_bytes.push(0x03);
            zero_count = 0;
        }

        escaped_bytes.push(byte);

        if byte == 0 {
            zero_count += 1;
        } else {
            zero_count = 0;
        }
    }

    escaped_bytes
}

/// Strips the trailing_zero_8bits that may follow a NAL unit.
pub fn trim_trailing_zero_bytes(data: &[u8]) -> &[u8] {
    let end = data.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);

    &data[..end]
}
