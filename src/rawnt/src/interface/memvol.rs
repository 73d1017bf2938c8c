// An in-memory native volume. It stands in for the kernel side of the seam:
// it enforces creation dispositions, share modes, the read-only attribute,
// directory semantics and handle/descriptor accounting, so the translation
// pipeline can be exercised end to end on any host. Tables are dashmaps
// with an atomic counter per id space.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI32, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use sysdefs::constants::fs_const::{O_APPEND, SEEK_CUR, SEEK_END, SEEK_SET};
use sysdefs::constants::win_const::{
    CREATE_ALWAYS, CREATE_NEW, ERROR_ACCESS_DENIED, ERROR_FILE_EXISTS, ERROR_FILE_NOT_FOUND,
    ERROR_INVALID_HANDLE, ERROR_INVALID_PARAMETER, ERROR_NEGATIVE_SEEK, ERROR_PATH_NOT_FOUND,
    ERROR_SHARING_VIOLATION, FILETIME_EPOCH_DIFFERENCE_SECS, FILETIME_TICKS_PER_SECOND,
    FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_NORMAL, FILE_ATTRIBUTE_READONLY,
    FILE_ATTRIBUTE_TEMPORARY, FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_DELETE_ON_CLOSE,
    FILE_READ_DATA, FILE_SHARE_READ, FILE_SHARE_WRITE, FILE_WRITE_DATA, GENERIC_READ,
    GENERIC_WRITE, OPEN_ALWAYS, OPEN_EXISTING, TRUNCATE_EXISTING, UNC_PREFIX,
    WIN32_DEV_NAMESPACE, WIN32_FILE_NAMESPACE,
};
use sysdefs::data::fs_struct::{AttributeData, CreateParams};

use super::host::{NativeError, NativeHandle, NativeVolume};

// The volume clock starts mid-2020 (in FILETIME ticks) and advances a whole
// second per event, so successive writes get distinct, increasing stamps.
const CLOCK_BASE_TICKS: u64 =
    (FILETIME_EPOCH_DIFFERENCE_SECS as u64 + 1_600_000_000) * FILETIME_TICKS_PER_SECOND as u64;

fn want_read(access: u32) -> bool {
    access & (GENERIC_READ | FILE_READ_DATA) != 0
}

fn want_write(access: u32) -> bool {
    access & (GENERIC_WRITE | FILE_WRITE_DATA) != 0
}

// A share grant held by one open handle on one file.
#[derive(Clone, Copy)]
struct ShareGrant {
    handle: u64,
    access: u32,
    share: u32,
}

struct MemFile {
    data: Mutex<Vec<u8>>,
    attributes: AtomicU32,
    creation_time: u64,
    access_time: AtomicU64,
    write_time: AtomicU64,
    grants: Mutex<Vec<ShareGrant>>,
    pending_delete: AtomicU32,
}

impl MemFile {
    fn new(attributes: u32, data: Vec<u8>, now: u64) -> Arc<MemFile> {
        Arc::new(MemFile {
            data: Mutex::new(data),
            attributes: AtomicU32::new(attributes),
            creation_time: now,
            access_time: AtomicU64::new(now),
            write_time: AtomicU64::new(now),
            grants: Mutex::new(Vec::new()),
            pending_delete: AtomicU32::new(0),
        })
    }

    fn is_dir(&self) -> bool {
        self.attributes.load(Ordering::Relaxed) & FILE_ATTRIBUTE_DIRECTORY != 0
    }

    fn is_readonly(&self) -> bool {
        self.attributes.load(Ordering::Relaxed) & FILE_ATTRIBUTE_READONLY != 0
    }
}

struct OpenHandle {
    key: String,
    file: Arc<MemFile>,
    access: u32,
    delete_on_close: bool,
}

struct FdEntry {
    handle: u64,
    oflag: i32,
    textmode: i32,
    pos: u64,
}

/// In-memory native volume. Paths are case-insensitive, `\`-separated, and
/// may carry the `\\?\` / `\\?\UNC\` qualifiers the normalizer produces.
pub struct MemVolume {
    cwd: String,
    files: DashMap<String, Arc<MemFile>>,
    short_names: DashMap<String, String>,
    handles: DashMap<u64, OpenHandle>,
    fds: DashMap<i32, FdEntry>,
    next_handle: AtomicU64,
    next_fd: AtomicI32,
    clock: AtomicU64,
    // one-shot failure injection, keyed by native call name
    planted_failures: DashMap<&'static str, u32>,
}

impl MemVolume {
    pub fn new() -> MemVolume {
        MemVolume::with_cwd(r"C:\users\shim")
    }

    pub fn with_cwd(cwd: &str) -> MemVolume {
        let vol = MemVolume {
            cwd: cwd.to_string(),
            files: DashMap::new(),
            short_names: DashMap::new(),
            handles: DashMap::new(),
            fds: DashMap::new(),
            next_handle: AtomicU64::new(0x1000),
            next_fd: AtomicI32::new(3),
            clock: AtomicU64::new(CLOCK_BASE_TICKS),
            planted_failures: DashMap::new(),
        };
        vol.add_dir(cwd);
        vol
    }

    fn tick(&self) -> u64 {
        self.clock
            .fetch_add(FILETIME_TICKS_PER_SECOND as u64, Ordering::SeqCst)
    }

    // ===== test / setup surface =====

    /// Create a directory (and its ancestors).
    pub fn add_dir(&self, path: &str) {
        let key = canonical_key(path);
        let parts: Vec<&str> = key.split('\\').collect();
        for depth in 0..parts.len() {
            let prefix = parts[..=depth].join(r"\");
            if prefix.is_empty() || prefix == r"\" || is_root_key(&prefix) {
                continue;
            }
            let now = self.tick();
            self.files
                .entry(prefix)
                .or_insert_with(|| MemFile::new(FILE_ATTRIBUTE_DIRECTORY, Vec::new(), now));
        }
    }

    /// Create a regular file with the given contents, replacing any
    /// previous entry.
    pub fn add_file(&self, path: &str, data: &[u8]) {
        let now = self.tick();
        self.files.insert(
            canonical_key(path),
            MemFile::new(FILE_ATTRIBUTE_NORMAL, data.to_vec(), now),
        );
    }

    /// Toggle the native read-only attribute on an existing entry.
    pub fn set_readonly(&self, path: &str, readonly: bool) {
        if let Some(file) = self.files.get(&canonical_key(path)) {
            if readonly {
                file.attributes
                    .fetch_or(FILE_ATTRIBUTE_READONLY, Ordering::Relaxed);
            } else {
                file.attributes
                    .fetch_and(!FILE_ATTRIBUTE_READONLY, Ordering::Relaxed);
            }
        }
    }

    /// Register a legacy short-form alias for a path; `long_path_name`
    /// reports the long form for it.
    pub fn add_short_name(&self, short: &str, long: &str) {
        self.short_names
            .insert(canonical_key(short), long.to_string());
    }

    /// Plant a one-shot failure for the named native call.
    pub fn fail_next(&self, call: &'static str, code: u32) {
        self.planted_failures.insert(call, code);
    }

    fn take_planted(&self, call: &'static str) -> Option<NativeError> {
        self.planted_failures
            .remove(call)
            .map(|(_, code)| NativeError::new(code))
    }

    /// Number of native handles currently open; used to prove the pipeline
    /// leaks nothing on failure paths.
    pub fn open_handle_count(&self) -> usize {
        self.handles.len()
    }

    pub fn open_fd_count(&self) -> usize {
        self.fds.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(&canonical_key(path))
    }

    // ===== descriptor I/O (what the adopted descriptors support) =====

    pub fn write_fd(&self, fd: i32, buf: &[u8]) -> Result<usize, NativeError> {
        let mut entry = self
            .fds
            .get_mut(&fd)
            .ok_or_else(|| NativeError::new(ERROR_INVALID_HANDLE))?;
        let handle = self
            .handles
            .get(&entry.handle)
            .ok_or_else(|| NativeError::new(ERROR_INVALID_HANDLE))?;
        if !want_write(handle.access) {
            return Err(NativeError::new(ERROR_ACCESS_DENIED));
        }
        let file = handle.file.clone();
        drop(handle);

        let mut data = file.data.lock();
        if entry.oflag & O_APPEND != 0 {
            entry.pos = data.len() as u64;
        }
        let pos = entry.pos as usize;
        if pos > data.len() {
            data.resize(pos, 0);
        }
        let end = pos + buf.len();
        if end > data.len() {
            data.resize(end, 0);
        }
        data[pos..end].copy_from_slice(buf);
        entry.pos = end as u64;
        file.write_time.store(self.tick(), Ordering::SeqCst);
        Ok(buf.len())
    }

    pub fn read_fd(&self, fd: i32, buf: &mut [u8]) -> Result<usize, NativeError> {
        let mut entry = self
            .fds
            .get_mut(&fd)
            .ok_or_else(|| NativeError::new(ERROR_INVALID_HANDLE))?;
        let handle = self
            .handles
            .get(&entry.handle)
            .ok_or_else(|| NativeError::new(ERROR_INVALID_HANDLE))?;
        if !want_read(handle.access) {
            return Err(NativeError::new(ERROR_ACCESS_DENIED));
        }
        let file = handle.file.clone();
        drop(handle);

        let data = file.data.lock();
        let pos = (entry.pos as usize).min(data.len());
        let count = buf.len().min(data.len() - pos);
        buf[..count].copy_from_slice(&data[pos..pos + count]);
        entry.pos = (pos + count) as u64;
        file.access_time.store(self.tick(), Ordering::SeqCst);
        Ok(count)
    }

    pub fn lseek_fd(&self, fd: i32, offset: i64, whence: i32) -> Result<i64, NativeError> {
        let mut entry = self
            .fds
            .get_mut(&fd)
            .ok_or_else(|| NativeError::new(ERROR_INVALID_HANDLE))?;
        let handle = self
            .handles
            .get(&entry.handle)
            .ok_or_else(|| NativeError::new(ERROR_INVALID_HANDLE))?;
        let len = handle.file.data.lock().len() as i64;
        drop(handle);

        let base = match whence {
            SEEK_SET => 0,
            SEEK_CUR => entry.pos as i64,
            SEEK_END => len,
            _ => return Err(NativeError::new(ERROR_INVALID_PARAMETER)),
        };
        let target = base + offset;
        if target < 0 {
            return Err(NativeError::new(ERROR_NEGATIVE_SEEK));
        }
        entry.pos = target as u64;
        Ok(target)
    }

    // ===== internals =====

    fn register_handle(&self, key: String, file: Arc<MemFile>, parms: &CreateParams) -> u64 {
        let id = self.next_handle.fetch_add(1, Ordering::SeqCst);
        file.grants.lock().push(ShareGrant {
            handle: id,
            access: parms.desired_access,
            share: parms.share_mode,
        });
        self.handles.insert(
            id,
            OpenHandle {
                key,
                file: file.clone(),
                access: parms.desired_access,
                delete_on_close: parms.flags_and_attributes & FILE_FLAG_DELETE_ON_CLOSE != 0,
            },
        );
        id
    }

    // Both directions must agree: the request's access against every
    // holder's share grant, and every holder's access against the request's
    // share grant.
    fn check_sharing(&self, file: &MemFile, parms: &CreateParams) -> Result<(), NativeError> {
        let grants = file.grants.lock();
        for grant in grants.iter() {
            if want_read(parms.desired_access) && grant.share & FILE_SHARE_READ == 0 {
                return Err(NativeError::new(ERROR_SHARING_VIOLATION));
            }
            if want_write(parms.desired_access) && grant.share & FILE_SHARE_WRITE == 0 {
                return Err(NativeError::new(ERROR_SHARING_VIOLATION));
            }
            if want_read(grant.access) && parms.share_mode & FILE_SHARE_READ == 0 {
                return Err(NativeError::new(ERROR_SHARING_VIOLATION));
            }
            if want_write(grant.access) && parms.share_mode & FILE_SHARE_WRITE == 0 {
                return Err(NativeError::new(ERROR_SHARING_VIOLATION));
            }
        }
        Ok(())
    }

    fn parent_exists(&self, key: &str) -> bool {
        match key.rsplit_once('\\') {
            None => true,
            Some((parent, _)) => {
                if is_root_key(parent) {
                    return true;
                }
                self.files
                    .get(parent)
                    .map(|f| f.is_dir())
                    .unwrap_or(false)
            }
        }
    }

    fn missing_error(&self, key: &str) -> NativeError {
        if self.parent_exists(key) {
            NativeError::new(ERROR_FILE_NOT_FOUND)
        } else {
            NativeError::new(ERROR_PATH_NOT_FOUND)
        }
    }

    fn create_entry(
        &self,
        key: &str,
        parms: &CreateParams,
    ) -> Result<Arc<MemFile>, NativeError> {
        if !self.parent_exists(key) {
            return Err(NativeError::new(ERROR_PATH_NOT_FOUND));
        }
        let mut attributes = parms.flags_and_attributes
            & (FILE_ATTRIBUTE_READONLY | FILE_ATTRIBUTE_TEMPORARY);
        if attributes == 0 {
            attributes = FILE_ATTRIBUTE_NORMAL;
        }
        let file = MemFile::new(attributes, Vec::new(), self.tick());
        self.files.insert(key.to_string(), file.clone());
        Ok(file)
    }

    fn truncate_entry(&self, file: &MemFile) {
        file.data.lock().clear();
        file.write_time.store(self.tick(), Ordering::SeqCst);
    }
}

impl NativeVolume for MemVolume {
    fn long_path_name(&self, path: &str) -> Result<String, NativeError> {
        if let Some(err) = self.take_planted("long_path_name") {
            return Err(err);
        }
        let key = canonical_key(path);
        if let Some(long) = self.short_names.get(&key) {
            return Ok(long.clone());
        }
        if self.files.contains_key(&key) || is_root_key(&key) {
            return Ok(path.to_string());
        }
        Err(NativeError::new(ERROR_FILE_NOT_FOUND))
    }

    fn full_path_name(&self, path: &str) -> Result<String, NativeError> {
        if let Some(err) = self.take_planted("full_path_name") {
            return Err(err);
        }
        Ok(resolve_textual(&self.cwd, path))
    }

    fn create_file(&self, path: &str, parms: &CreateParams) -> Result<NativeHandle, NativeError> {
        if let Some(err) = self.take_planted("create_file") {
            return Err(err);
        }
        let key = canonical_key(path);
        let existing = self.files.get(&key).map(|f| Arc::clone(f.value()));

        // Attribute and sharing policy gates come first so a denied open can
        // never truncate anything.
        if let Some(ref file) = existing {
            if file.is_dir() {
                if parms.flags_and_attributes & FILE_FLAG_BACKUP_SEMANTICS == 0
                    || want_write(parms.desired_access)
                {
                    return Err(NativeError::new(ERROR_ACCESS_DENIED));
                }
            } else if file.is_readonly() && want_write(parms.desired_access) {
                return Err(NativeError::new(ERROR_ACCESS_DENIED));
            }
            self.check_sharing(file, parms)?;
        }

        let truncates = matches!(
            parms.creation_disposition,
            CREATE_ALWAYS | TRUNCATE_EXISTING
        );
        if truncates {
            if let Some(ref file) = existing {
                if file.is_dir() || file.is_readonly() {
                    return Err(NativeError::new(ERROR_ACCESS_DENIED));
                }
            }
        }

        let file = match parms.creation_disposition {
            CREATE_NEW => match existing {
                Some(_) => return Err(NativeError::new(ERROR_FILE_EXISTS)),
                None => self.create_entry(&key, parms)?,
            },
            CREATE_ALWAYS => match existing {
                Some(file) => {
                    self.truncate_entry(&file);
                    file
                }
                None => self.create_entry(&key, parms)?,
            },
            OPEN_EXISTING => match existing {
                Some(file) => file,
                None => return Err(self.missing_error(&key)),
            },
            OPEN_ALWAYS => match existing {
                Some(file) => file,
                None => self.create_entry(&key, parms)?,
            },
            TRUNCATE_EXISTING => match existing {
                Some(file) => {
                    if !want_write(parms.desired_access) {
                        return Err(NativeError::new(ERROR_ACCESS_DENIED));
                    }
                    self.truncate_entry(&file);
                    file
                }
                None => return Err(self.missing_error(&key)),
            },
            _ => return Err(NativeError::new(ERROR_INVALID_PARAMETER)),
        };

        file.access_time.store(self.tick(), Ordering::SeqCst);
        let id = self.register_handle(key, file, parms);
        Ok(NativeHandle(id))
    }

    fn query_attributes(&self, path: &str) -> Result<AttributeData, NativeError> {
        if let Some(err) = self.take_planted("query_attributes") {
            return Err(err);
        }
        let key = canonical_key(path);
        let file = self.files.get(&key).ok_or_else(|| self.missing_error(&key))?;
        let size = file.data.lock().len() as u64;
        Ok(AttributeData {
            file_attributes: file.attributes.load(Ordering::Relaxed),
            creation_time: file.creation_time,
            last_access_time: file.access_time.load(Ordering::SeqCst),
            last_write_time: file.write_time.load(Ordering::SeqCst),
            file_size_high: (size >> 32) as u32,
            file_size_low: (size & 0xFFFF_FFFF) as u32,
        })
    }

    fn binary_type(&self, path: &str) -> bool {
        match self.files.get(&canonical_key(path)) {
            Some(file) if !file.is_dir() => file.data.lock().starts_with(b"MZ"),
            _ => false,
        }
    }

    fn close_handle(&self, handle: NativeHandle) {
        if let Some((_, open)) = self.handles.remove(&handle.0) {
            let mut grants = open.file.grants.lock();
            grants.retain(|g| g.handle != handle.0);
            if open.delete_on_close {
                open.file.pending_delete.store(1, Ordering::SeqCst);
            }
            let last = grants.is_empty();
            drop(grants);
            if last && open.file.pending_delete.load(Ordering::SeqCst) != 0 {
                self.files.remove(&open.key);
            }
        }
    }

    fn handle_to_fd(&self, handle: NativeHandle, oflag: i32) -> Result<i32, NativeError> {
        if let Some(err) = self.take_planted("handle_to_fd") {
            return Err(err);
        }
        if !self.handles.contains_key(&handle.0) {
            return Err(NativeError::new(ERROR_INVALID_HANDLE));
        }
        let fd = self.next_fd.fetch_add(1, Ordering::SeqCst);
        self.fds.insert(
            fd,
            FdEntry {
                handle: handle.0,
                oflag,
                textmode: 0,
                pos: 0,
            },
        );
        Ok(fd)
    }

    fn set_fd_mode(&self, fd: i32, mode: i32) -> Result<i32, NativeError> {
        if let Some(err) = self.take_planted("set_fd_mode") {
            return Err(err);
        }
        let mut entry = self
            .fds
            .get_mut(&fd)
            .ok_or_else(|| NativeError::new(ERROR_INVALID_HANDLE))?;
        let previous = entry.textmode;
        entry.textmode = mode;
        Ok(previous)
    }

    fn close_fd(&self, fd: i32) -> Result<(), NativeError> {
        let (_, entry) = self
            .fds
            .remove(&fd)
            .ok_or_else(|| NativeError::new(ERROR_INVALID_HANDLE))?;
        self.close_handle(NativeHandle(entry.handle));
        Ok(())
    }
}

impl Default for MemVolume {
    fn default() -> MemVolume {
        MemVolume::new()
    }
}

// Strip the namespace qualifiers the normalizer prepends and fold case, so
// `\\?\C:\X` and `c:/x` address the same entry.
fn canonical_key(path: &str) -> String {
    let prefixed_unc = format!("{}{}", WIN32_FILE_NAMESPACE, UNC_PREFIX);
    let body = if let Some(rest) = path.strip_prefix(&prefixed_unc) {
        format!(r"\\{}", rest)
    } else if let Some(rest) = path.strip_prefix(WIN32_FILE_NAMESPACE) {
        rest.to_string()
    } else if let Some(rest) = path.strip_prefix(WIN32_DEV_NAMESPACE) {
        rest.to_string()
    } else {
        path.to_string()
    };
    let replaced = body.replace('/', "\\");
    let trimmed = if replaced.len() > 3 {
        replaced.trim_end_matches('\\').to_string()
    } else {
        replaced
    };
    trimmed.to_uppercase()
}

// Drive roots ("C:", "C:\") and network-share roots ("\\server",
// "\\server\share") always exist as containers.
fn is_root_key(key: &str) -> bool {
    if key.len() <= 3 && key.len() >= 2 && key.as_bytes()[1] == b':' {
        return true;
    }
    key.starts_with(r"\\") && key.matches('\\').count() <= 3
}

// Textual absolute resolution: anchor against the working directory, then
// fold away `.` and `..` without ever popping past the root.
fn resolve_textual(cwd: &str, path: &str) -> String {
    let p = path.replace('/', "\\");

    let (root, body) = if p.starts_with(r"\\") {
        (r"\\".to_string(), p[2..].to_string())
    } else if p.len() >= 2 && p.as_bytes()[1] == b':' {
        let drive = p[..2].to_string();
        let rest = p[2..].trim_start_matches('\\').to_string();
        (format!(r"{}\", drive), rest)
    } else if p.starts_with('\\') {
        let drive = &cwd[..2];
        (format!(r"{}\", drive), p[1..].to_string())
    } else {
        let rest = cwd[2..].trim_start_matches('\\');
        let body = if rest.is_empty() {
            p
        } else {
            format!(r"{}\{}", rest, p)
        };
        (format!(r"{}\", &cwd[..2]), body)
    };

    // UNC roots keep their first two components (server, share) out of
    // reach of "..".
    let protected = if root == r"\\" { 2 } else { 0 };

    let mut comps: Vec<&str> = Vec::new();
    for comp in body.split('\\') {
        match comp {
            "" | "." => {}
            ".." => {
                if comps.len() > protected {
                    comps.pop();
                }
            }
            _ => comps.push(comp),
        }
    }

    let joined = comps.join(r"\");
    if root == r"\\" {
        format!(r"\\{}", joined)
    } else if joined.is_empty() {
        root
    } else {
        format!("{}{}", root, joined)
    }
}
