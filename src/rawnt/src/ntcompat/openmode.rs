// Open-mode translation: the pure half of the open pipeline. A POSIX mode
// string or flag bitmask maps onto the native creation triple through fixed
// tables; no filesystem state is consulted.

use sysdefs::constants::fs_const::{
    O_ACCMODE, O_APPEND, O_BINARY, O_CREAT, O_EXCL, O_NOINHERIT, O_RANDOM, O_RDONLY, O_RDWR,
    O_SEQUENTIAL, O_SHORT_LIVED, O_TEMPORARY, O_TEXT, O_TRUNC, O_U16TEXT, O_U8TEXT, O_WRONLY,
    O_WTEXT, SH_DENYRD, SH_DENYRW, SH_DENYWR, S_IREAD, S_IWRITE,
};
use sysdefs::constants::win_const::{
    CREATE_ALWAYS, CREATE_NEW, FILE_ATTRIBUTE_NORMAL, FILE_ATTRIBUTE_TEMPORARY,
    FILE_FLAG_DELETE_ON_CLOSE, FILE_FLAG_RANDOM_ACCESS, FILE_FLAG_SEQUENTIAL_SCAN,
    FILE_GENERIC_READ, FILE_GENERIC_WRITE, FILE_READ_ATTRIBUTES, FILE_READ_DATA,
    FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE, FILE_WRITE_ATTRIBUTES,
    FILE_WRITE_DATA, GENERIC_READ, GENERIC_WRITE, OPEN_ALWAYS, OPEN_EXISTING,
    TRUNCATE_EXISTING,
};
use sysdefs::data::fs_struct::CreateParams;

// Recognized multi-character encoding suffixes. Must match exactly; a near
// miss is skipped like any other unrecognized character.
const CCS_UNICODE: &str = "ccs=UNICODE";
const CCS_UTF8: &str = "ccs=UTF-8";
const CCS_UTF16LE: &str = "ccs=UTF-16LE";

fn has_flag(value: i32, flag: i32) -> bool {
    value & flag == flag
}

fn match_encoding_suffix(rest: &str) -> Option<(usize, i32)> {
    if rest.starts_with(CCS_UTF16LE) {
        Some((CCS_UTF16LE.len(), O_U16TEXT))
    } else if rest.starts_with(CCS_UNICODE) {
        Some((CCS_UNICODE.len(), O_WTEXT))
    } else if rest.starts_with(CCS_UTF8) {
        Some((CCS_UTF8.len(), O_U8TEXT))
    } else {
        None
    }
}

/// Translate a stdio-style mode string into an open-flag bitmask. One pass,
/// left to right; unrecognized characters are skipped rather than rejected
/// (documented lenient behavior).
pub fn translate_mode(mode: &str) -> i32 {
    let mut oflag = 0;
    let mut rest = mode;

    while !rest.is_empty() {
        if let Some((len, flag)) = match_encoding_suffix(rest) {
            oflag |= flag;
            rest = &rest[len..];
            continue;
        }

        let mut chars = rest.chars();
        let c = chars.next().unwrap();
        let plus = chars.next() == Some('+');
        match c {
            'a' => {
                oflag |= if plus {
                    O_RDWR | O_CREAT | O_APPEND
                } else {
                    O_WRONLY | O_CREAT | O_APPEND
                }
            }
            'r' => oflag |= if plus { O_RDWR } else { O_RDONLY },
            'w' => {
                oflag |= if plus {
                    O_RDWR | O_CREAT | O_TRUNC
                } else {
                    O_WRONLY | O_CREAT | O_TRUNC
                }
            }
            'b' => oflag |= O_BINARY,
            't' => oflag |= O_TEXT,
            // commit/no-commit hints: accepted, no effect here
            'c' | 'n' => {}
            'S' => oflag |= O_SEQUENTIAL,
            'R' => oflag |= O_RANDOM,
            'T' => oflag |= O_SHORT_LIVED,
            'D' => oflag |= O_TEMPORARY,
            _ => {}
        }
        rest = &rest[c.len_utf8()..];
    }

    oflag
}

/// Derive the native creation triple from POSIX open flags, a sharing flag
/// and a permission mode. Pure; the same inputs always produce the same
/// parameters.
pub fn open_parms(oflag: i32, shflag: i32, pmode: i32) -> CreateParams {
    // Construct access mode.
    let mut desired_access = match oflag & O_ACCMODE {
        O_RDWR => {
            GENERIC_WRITE
                | GENERIC_READ
                | FILE_READ_DATA
                | FILE_WRITE_DATA
                | FILE_READ_ATTRIBUTES
                | FILE_WRITE_ATTRIBUTES
        }
        O_WRONLY => GENERIC_WRITE | FILE_WRITE_DATA | FILE_WRITE_ATTRIBUTES,
        _ => GENERIC_READ | FILE_READ_DATA | FILE_READ_ATTRIBUTES,
    };

    // Construct shared mode.
    let mut share_mode = FILE_SHARE_DELETE | FILE_SHARE_READ | FILE_SHARE_WRITE;
    if has_flag(shflag, SH_DENYRW) {
        share_mode &= !(FILE_SHARE_READ | FILE_SHARE_WRITE);
    }
    if has_flag(shflag, SH_DENYWR) {
        share_mode &= !FILE_SHARE_WRITE;
    }
    if has_flag(shflag, SH_DENYRD) {
        share_mode &= !FILE_SHARE_READ;
    }
    if pmode as u16 & S_IWRITE != 0 {
        share_mode |= FILE_SHARE_READ | FILE_SHARE_WRITE;
    }
    if pmode as u16 & S_IREAD != 0 {
        share_mode |= FILE_SHARE_READ;
    }

    // Override access mode with pmode if creating file.
    if has_flag(oflag, O_CREAT) {
        if pmode as u16 & S_IWRITE != 0 {
            desired_access |= FILE_GENERIC_WRITE;
        }
        if pmode as u16 & S_IREAD != 0 {
            desired_access |= FILE_GENERIC_READ;
        }
    }

    // Create file disposition: a single value, chosen by precedence.
    let creation_disposition = if has_flag(oflag, O_CREAT | O_EXCL) {
        CREATE_NEW
    } else if has_flag(oflag, O_TRUNC | O_CREAT) {
        CREATE_ALWAYS
    } else if oflag & O_TRUNC != 0 && oflag & O_ACCMODE != O_RDONLY {
        TRUNCATE_EXISTING
    } else if oflag & O_APPEND != 0 {
        OPEN_EXISTING
    } else if oflag & O_CREAT != 0 {
        OPEN_ALWAYS
    } else {
        OPEN_EXISTING
    };

    // Set file access attributes.
    let mut flags_and_attributes = FILE_ATTRIBUTE_NORMAL;
    if oflag & O_TEMPORARY != 0 {
        flags_and_attributes |= FILE_FLAG_DELETE_ON_CLOSE;
    }
    if oflag & O_SHORT_LIVED != 0 {
        flags_and_attributes |= FILE_ATTRIBUTE_TEMPORARY;
    }
    if oflag & O_RANDOM != 0 {
        flags_and_attributes |= FILE_FLAG_RANDOM_ACCESS;
    }
    if oflag & O_SEQUENTIAL != 0 {
        flags_and_attributes |= FILE_FLAG_SEQUENTIAL_SCAN;
    }
    // The NORMAL attribute is only valid on its own.
    if flags_and_attributes != FILE_ATTRIBUTE_NORMAL {
        flags_and_attributes &= !FILE_ATTRIBUTE_NORMAL;
    }

    // Ensure shared read for files which are opened read-only, so common
    // read-only open patterns cannot inflict sharing violations on
    // themselves.
    if creation_disposition == OPEN_EXISTING
        && desired_access & (GENERIC_WRITE | GENERIC_READ) == GENERIC_READ
    {
        share_mode |= FILE_SHARE_READ;
    }

    CreateParams {
        desired_access,
        share_mode,
        creation_disposition,
        flags_and_attributes,
        inherit_handle: oflag & O_NOINHERIT == 0,
    }
}
