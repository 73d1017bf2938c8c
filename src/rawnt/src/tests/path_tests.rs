use sysdefs::constants::err_const::Errno;
use sysdefs::constants::win_const::{
    ERROR_ACCESS_DENIED, ERROR_NOT_ENOUGH_MEMORY, ERROR_OUTOFMEMORY,
};

use crate::interface::MemVolume;
use crate::ntcompat::filesystem::{create_device_path, is_device_path};

#[test]
fn test_prefixed_paths_pass_through_unchanged() {
    let vol = MemVolume::new();
    let inputs = [
        r"\\?\C:\already\qualified.txt",
        r"\\.\PhysicalDrive0",
        r"\\.\pipe\worker",
        r"\Device\HarddiskVolume1\boot.ini",
        r"\\?\UNC\server\share\file.dat",
    ];
    for input in inputs {
        assert!(is_device_path(input));
        // Byte for byte, including any separators the caller used.
        assert_eq!(create_device_path(&vol, input), Ok(input.to_string()));
    }
}

#[test]
fn test_forward_slashes_are_rewritten() {
    let vol = MemVolume::new();
    vol.add_dir(r"C:\temp");
    vol.add_file(r"C:\temp\notes.txt", b"x");
    assert_eq!(
        create_device_path(&vol, "C:/temp/notes.txt"),
        Ok(r"\\?\C:\temp\notes.txt".to_string())
    );
}

#[test]
fn test_relative_path_is_anchored_at_working_directory() {
    let vol = MemVolume::new();
    assert_eq!(
        create_device_path(&vol, "notes.txt"),
        Ok(r"\\?\C:\users\shim\notes.txt".to_string())
    );
    assert_eq!(
        create_device_path(&vol, "."),
        Ok(r"\\?\C:\users\shim".to_string())
    );
}

#[test]
fn test_dot_and_dotdot_components_are_folded() {
    let vol = MemVolume::new();
    assert_eq!(
        create_device_path(&vol, r"C:\a\b\..\c\.\d.txt"),
        Ok(r"\\?\C:\a\c\d.txt".to_string())
    );
    // Folding never pops past the drive root.
    assert_eq!(
        create_device_path(&vol, r"C:\..\..\top.txt"),
        Ok(r"\\?\C:\top.txt".to_string())
    );
    // A trailing separator names the same entry.
    assert_eq!(
        create_device_path(&vol, "C:/temp/"),
        Ok(r"\\?\C:\temp".to_string())
    );
}

#[test]
fn test_network_share_gets_the_unc_form() {
    let vol = MemVolume::new();
    assert_eq!(
        create_device_path(&vol, "//fileserv/share/data/x.txt"),
        Ok(r"\\?\UNC\fileserv\share\data\x.txt".to_string())
    );
    // The server and share components survive any amount of "..".
    assert_eq!(
        create_device_path(&vol, r"\\fileserv\share\..\..\y.txt"),
        Ok(r"\\?\UNC\fileserv\share\y.txt".to_string())
    );
}

#[test]
fn test_short_components_are_expanded() {
    let vol = MemVolume::new();
    vol.add_dir(r"C:\Program Files");
    vol.add_file(r"C:\Program Files\app.txt", b"x");
    vol.add_short_name(r"C:\PROGRA~1\app.txt", r"C:\Program Files\app.txt");
    assert_eq!(
        create_device_path(&vol, "C:/PROGRA~1/app.txt"),
        Ok(r"\\?\C:\Program Files\app.txt".to_string())
    );
}

#[test]
fn test_missing_target_still_normalizes() {
    // The expansion query cannot improve a nonexistent path; the pipeline
    // keeps going with the buffer it has.
    let vol = MemVolume::new();
    assert_eq!(
        create_device_path(&vol, "C:/nope/x.txt"),
        Ok(r"\\?\C:\nope\x.txt".to_string())
    );
}

#[test]
fn test_ordinary_query_failure_keeps_the_buffer() {
    let vol = MemVolume::new();
    vol.fail_next("full_path_name", ERROR_ACCESS_DENIED);
    assert_eq!(
        create_device_path(&vol, r"C:\temp\x.txt"),
        Ok(r"\\?\C:\temp\x.txt".to_string())
    );
}

#[test]
fn test_resource_exhaustion_is_fatal() {
    let vol = MemVolume::new();
    vol.fail_next("long_path_name", ERROR_OUTOFMEMORY);
    assert_eq!(
        create_device_path(&vol, r"C:\temp\x.txt"),
        Err(Errno::ENOMEM)
    );

    vol.fail_next("full_path_name", ERROR_NOT_ENOUGH_MEMORY);
    assert_eq!(
        create_device_path(&vol, r"C:\temp\x.txt"),
        Err(Errno::ENOMEM)
    );
}

#[test]
fn test_output_is_idempotent() {
    let vol = MemVolume::new();
    vol.add_dir(r"C:\temp");
    let first = create_device_path(&vol, "C:/temp/../temp/z.txt").unwrap();
    assert_eq!(create_device_path(&vol, &first), Ok(first.clone()));
}

#[test]
fn test_arbitrary_printable_input_yields_wellformed_output() {
    let vol = MemVolume::new();
    let alphabet: Vec<char> = "abcXYZ019._- /:".chars().collect();
    for len in 1..=200usize {
        let input: String = (0..len)
            .map(|i| alphabet[(i * 7 + len) % alphabet.len()])
            .collect();
        let out = create_device_path(&vol, &input).unwrap();
        assert!(is_device_path(&out), "not namespace-qualified: {:?}", out);
        assert!(!out.contains('\u{0}'));
        assert!(!out.contains('/'));
        // Feeding the output back must reproduce it exactly.
        assert_eq!(create_device_path(&vol, &out), Ok(out.clone()));
    }
}
