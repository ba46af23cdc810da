//! ANSI escape recognition for width calculations.

/// Byte length of the escape sequence starting at `pos`, if one starts there.
///
/// Recognizes CSI (`ESC [ ... final`), OSC/APC/DCS (terminated by BEL or
/// `ESC \`) and SS3 (`ESC O x`).
pub fn ansi_len_at(input: &str, pos: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if pos + 1 >= bytes.len() || bytes[pos] != 0x1b {
        return None;
    }

    match bytes[pos + 1] {
        b'[' => bytes[pos + 2..]
            .iter()
            .position(|b| (0x40..=0x7e).contains(b))
            .map(|offset| offset + 3),
        b']' | b'_' | b'P' => string_terminated_len(bytes, pos),
        b'O' if pos + 2 < bytes.len() => Some(3),
        _ => None,
    }
}

fn string_terminated_len(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut idx = pos + 2;
    while idx < bytes.len() {
        if bytes[idx] == 0x07 {
            return Some(idx + 1 - pos);
        }
        if bytes[idx] == 0x1b && bytes.get(idx + 1) == Some(&b'\\') {
            return Some(idx + 2 - pos);
        }
        idx += 1;
    }
    None
}

/// Remove every recognized escape sequence from `input`.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut idx = 0;
    while idx < input.len() {
        if let Some(len) = ansi_len_at(input, idx) {
            idx += len;
            continue;
        }
        let Some(ch) = input[idx..].chars().next() else {
            break;
        };
        out.push(ch);
        idx += ch.len_utf8();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{ansi_len_at, strip_ansi};

    #[test]
    fn csi_and_osc_lengths() {
        assert_eq!(ansi_len_at("\x1b[31mx", 0), Some(5));
        assert_eq!(ansi_len_at("\x1b]8;;u\x07x", 0), Some(7));
        assert_eq!(ansi_len_at("x\x1b[0m", 0), None);
        assert_eq!(ansi_len_at("\x1b[", 0), None);
    }

    #[test]
    fn strip_removes_styles() {
        assert_eq!(strip_ansi("\x1b[7mh\x1b[27mi"), "hi");
    }
}
