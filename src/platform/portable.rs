// ── Portable codepage ─────────────────────────────────────────────────────────
//
// Same contract as `win32::codepage`, same replacement behaviour (invalid
// UTF-8 and unpaired surrogates both become U+FFFD), no OS calls.

fn scalars(src: &[u16]) -> impl Iterator<Item = char> + '_ {
    char::decode_utf16(src.iter().copied()).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
}

pub(crate) fn wide_len(src: &[u8]) -> usize {
    String::from_utf8_lossy(src).encode_utf16().count()
}

pub(crate) fn to_wide(src: &[u8], dst: &mut [u16]) -> usize {
    let text = String::from_utf8_lossy(src);
    if text.encode_utf16().count() > dst.len() {
        return 0;
    }
    let mut n = 0;
    for (slot, unit) in dst.iter_mut().zip(text.encode_utf16()) {
        *slot = unit;
        n += 1;
    }
    n
}

pub(crate) fn narrow_len(src: &[u16]) -> usize {
    scalars(src).map(char::len_utf8).sum()
}

pub(crate) fn to_narrow(src: &[u16], dst: &mut [u8]) -> usize {
    if narrow_len(src) > dst.len() {
        return 0;
    }
    let mut n = 0;
    for c in scalars(src) {
        n += c.encode_utf8(&mut dst[n..]).len();
    }
    n
}
