use sysdefs::constants::err_const::Errno;
use sysdefs::constants::fs_const::{
    O_BINARY, O_CREAT, O_EXCL, O_RDONLY, O_RDWR, O_TRUNC, O_WRONLY, SEEK_SET, SH_DENYRW,
    S_IREAD, S_IWRITE,
};
use sysdefs::constants::win_const::{
    ERROR_INVALID_FUNCTION, ERROR_INVALID_HANDLE, ERROR_NOT_ENOUGH_MEMORY,
};

use super::setup::{homed, test_shim};
use crate::interface::ruststr_to_widebuf;

const RW_PMODE: i32 = (S_IREAD | S_IWRITE) as i32;

#[test]
fn test_open_write_read_roundtrip() {
    let shim = test_shim();
    let path = homed("foobar.txt");

    let fd = shim.sopen_syscall(&path, O_CREAT | O_TRUNC | O_RDWR, 0, RW_PMODE);
    assert!(fd >= 0);
    assert_eq!(shim.volume().write_fd(fd, b"hello there!"), Ok(12));
    assert_eq!(shim.volume().lseek_fd(fd, 0, SEEK_SET), Ok(0));
    let mut buf = [0u8; 12];
    assert_eq!(shim.volume().read_fd(fd, &mut buf), Ok(12));
    assert_eq!(&buf, b"hello there!");
    assert_eq!(shim.close_syscall(fd), 0);
    assert_eq!(shim.volume().open_handle_count(), 0);
}

#[test]
fn test_wide_open_with_nonascii_path() {
    let shim = test_shim();
    let path = homed("日誌.txt");
    let wide = ruststr_to_widebuf(&path);

    let fd = shim.wsopen_syscall(&wide, O_CREAT | O_RDWR, 0, RW_PMODE);
    assert!(fd >= 0);
    assert_eq!(shim.volume().write_fd(fd, b"entry"), Ok(5));
    assert_eq!(shim.close_syscall(fd), 0);

    // The narrow and wide spellings address the same file.
    let fd2 = shim.sopen_syscall(&path, O_RDONLY, 0, 0);
    assert!(fd2 >= 0);
    let mut buf = [0u8; 5];
    assert_eq!(shim.volume().read_fd(fd2, &mut buf), Ok(5));
    assert_eq!(&buf, b"entry");
    assert_eq!(shim.close_syscall(fd2), 0);
}

#[test]
fn test_fopen_w_truncates_existing() {
    let shim = test_shim();
    let path = homed("trunc.txt");
    shim.volume().add_file(&path, b"old content");

    let fd = shim.fopen_syscall(&path, "w");
    assert!(fd >= 0);
    assert_eq!(shim.close_syscall(fd), 0);

    let fd = shim.fopen_syscall(&path, "r");
    assert!(fd >= 0);
    let mut buf = [0u8; 16];
    assert_eq!(shim.volume().read_fd(fd, &mut buf), Ok(0));
    assert_eq!(shim.close_syscall(fd), 0);
}

#[test]
fn test_fopen_a_appends_at_end() {
    let shim = test_shim();
    let path = homed("append.txt");
    shim.volume().add_file(&path, b"hello");

    let fd = shim.fopen_syscall(&path, "a");
    assert!(fd >= 0);
    assert_eq!(shim.volume().write_fd(fd, b" world"), Ok(6));
    assert_eq!(shim.close_syscall(fd), 0);

    let fd = shim.sopen_syscall(&path, O_RDONLY, 0, 0);
    let mut buf = [0u8; 11];
    assert_eq!(shim.volume().read_fd(fd, &mut buf), Ok(11));
    assert_eq!(&buf, b"hello world");
    assert_eq!(shim.close_syscall(fd), 0);
}

#[test]
fn test_append_requires_existing_file() {
    // Append mode carries O_CREAT out of the mode string, but the chosen
    // disposition still opens existing only.
    let shim = test_shim();
    assert_eq!(
        shim.fopen_syscall(&homed("no-such.log"), "a"),
        -(Errno::ENOENT as i32)
    );
}

#[test]
fn test_exclusive_create_fails_on_existing() {
    let shim = test_shim();
    let path = homed("already.txt");
    shim.volume().add_file(&path, b"x");
    assert_eq!(
        shim.sopen_syscall(&path, O_CREAT | O_EXCL | O_WRONLY, 0, RW_PMODE),
        -(Errno::EEXIST as i32)
    );
}

#[test]
fn test_open_missing_file_is_enoent() {
    let shim = test_shim();
    assert_eq!(
        shim.sopen_syscall(&homed("missing.txt"), O_RDONLY, 0, 0),
        -(Errno::ENOENT as i32)
    );
    // A missing parent directory reports the same errno.
    assert_eq!(
        shim.sopen_syscall(r"C:\no\such\dir\f.txt", O_RDONLY, 0, 0),
        -(Errno::ENOENT as i32)
    );
}

#[test]
fn test_write_open_on_readonly_file_is_eacces() {
    let shim = test_shim();
    let path = homed("ro.txt");
    shim.volume().add_file(&path, b"locked");
    shim.volume().set_readonly(&path, true);

    assert_eq!(
        shim.sopen_syscall(&path, O_WRONLY, 0, 0),
        -(Errno::EACCES as i32)
    );
    // Reading it stays allowed.
    let fd = shim.sopen_syscall(&path, O_RDONLY, 0, 0);
    assert!(fd >= 0);
    assert_eq!(shim.close_syscall(fd), 0);
}

#[test]
fn test_two_readers_share_the_file() {
    let shim = test_shim();
    let path = homed("shared.txt");
    shim.volume().add_file(&path, b"data");

    let fd1 = shim.sopen_syscall(&path, O_RDONLY, 0, 0);
    let fd2 = shim.sopen_syscall(&path, O_RDONLY, 0, 0);
    assert!(fd1 >= 0 && fd2 >= 0);
    assert_eq!(shim.close_syscall(fd1), 0);
    assert_eq!(shim.close_syscall(fd2), 0);
}

#[test]
fn test_deny_sharing_blocks_second_open() {
    let shim = test_shim();
    let path = homed("locked.txt");
    shim.volume().add_file(&path, b"data");

    let fd1 = shim.sopen_syscall(&path, O_RDWR, SH_DENYRW, 0);
    assert!(fd1 >= 0);
    assert_eq!(
        shim.sopen_syscall(&path, O_RDONLY, 0, 0),
        -(Errno::EINVAL as i32)
    );
    assert_eq!(shim.close_syscall(fd1), 0);

    // Releasing the holder lifts the denial.
    let fd2 = shim.sopen_syscall(&path, O_RDONLY, 0, 0);
    assert!(fd2 >= 0);
    assert_eq!(shim.close_syscall(fd2), 0);
}

#[test]
fn test_temporary_file_is_deleted_on_close() {
    let shim = test_shim();
    let path = homed("scratch.tmp");

    let fd = shim.fopen_syscall(&path, "wD");
    assert!(fd >= 0);
    assert_eq!(shim.volume().write_fd(fd, b"scratch"), Ok(7));
    assert!(shim.volume().contains(&path));
    assert_eq!(shim.close_syscall(fd), 0);
    assert!(!shim.volume().contains(&path));
}

#[test]
fn test_failed_adoption_leaks_nothing() {
    let shim = test_shim();
    shim.volume().fail_next("handle_to_fd", ERROR_INVALID_HANDLE);

    assert_eq!(
        shim.sopen_syscall(&homed("leak.txt"), O_CREAT | O_RDWR, 0, RW_PMODE),
        -(Errno::EBADF as i32)
    );
    assert_eq!(shim.volume().open_handle_count(), 0);
    assert_eq!(shim.volume().open_fd_count(), 0);
}

#[test]
fn test_failed_mode_set_closes_the_descriptor() {
    let shim = test_shim();
    shim.volume().fail_next("set_fd_mode", ERROR_INVALID_FUNCTION);

    assert_eq!(
        shim.sopen_syscall(&homed("binary.dat"), O_CREAT | O_RDWR | O_BINARY, 0, RW_PMODE),
        -(Errno::EFAULT as i32)
    );
    assert_eq!(shim.volume().open_handle_count(), 0);
    assert_eq!(shim.volume().open_fd_count(), 0);
}

#[test]
fn test_normalizer_exhaustion_aborts_the_open() {
    let shim = test_shim();
    shim.volume()
        .fail_next("full_path_name", ERROR_NOT_ENOUGH_MEMORY);
    assert_eq!(
        shim.sopen_syscall(&homed("any.txt"), O_CREAT | O_RDWR, 0, RW_PMODE),
        -(Errno::ENOMEM as i32)
    );
    assert_eq!(shim.volume().open_handle_count(), 0);
}

#[test]
fn test_wfopen_roundtrip() {
    let shim = test_shim();
    let path = homed("wide.txt");
    let wpath = ruststr_to_widebuf(&path);

    let fd = shim.wfopen_syscall(&wpath, &ruststr_to_widebuf("w"));
    assert!(fd >= 0);
    assert_eq!(shim.volume().write_fd(fd, b"wide"), Ok(4));
    assert_eq!(shim.close_syscall(fd), 0);

    let fd = shim.wfopen_syscall(&wpath, &ruststr_to_widebuf("r"));
    assert!(fd >= 0);
    let mut buf = [0u8; 4];
    assert_eq!(shim.volume().read_fd(fd, &mut buf), Ok(4));
    assert_eq!(&buf, b"wide");
    assert_eq!(shim.close_syscall(fd), 0);
}

#[test]
fn test_truncating_open_on_readonly_changes_nothing() {
    let shim = test_shim();
    let path = homed("keep.txt");
    shim.volume().add_file(&path, b"keep me");
    shim.volume().set_readonly(&path, true);

    assert_eq!(
        shim.sopen_syscall(&path, O_CREAT | O_TRUNC | O_WRONLY, 0, RW_PMODE),
        -(Errno::EACCES as i32)
    );
    // The denied open must not have truncated the contents.
    shim.volume().set_readonly(&path, false);
    let fd = shim.sopen_syscall(&path, O_RDONLY, 0, 0);
    let mut buf = [0u8; 7];
    assert_eq!(shim.volume().read_fd(fd, &mut buf), Ok(7));
    assert_eq!(&buf, b"keep me");
    assert_eq!(shim.close_syscall(fd), 0);
}

#[test]
fn test_close_of_unknown_descriptor_is_ebadf() {
    let shim = test_shim();
    assert_eq!(shim.close_syscall(9999), -(Errno::EBADF as i32));
}
