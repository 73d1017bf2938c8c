// Narrow/wide text conversions for the wide-character entry points. The
// native API is UTF-16 throughout; the shim pipeline works on owned UTF-8
// strings and converts at the boundary.

use sysdefs::constants::err_const::Errno;

/// Decode a (possibly NUL-terminated) UTF-16 buffer into an owned string.
/// Unpaired surrogates are a caller error, not something to paper over.
pub fn widestr_to_ruststr(wide: &[u16]) -> Result<String, Errno> {
    let end = wide.iter().position(|&u| u == 0).unwrap_or(wide.len());
    String::from_utf16(&wide[..end]).map_err(|_| Errno::EINVAL)
}

/// Encode a string as a NUL-terminated UTF-16 buffer for the native API.
pub fn ruststr_to_widebuf(s: &str) -> Vec<u16> {
    let mut buf: Vec<u16> = s.encode_utf16().collect();
    buf.push(0);
    buf
}
