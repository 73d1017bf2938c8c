// Path normalization
//
// Converts caller paths between namespaces: an explorer-style path becomes a
// namespace-qualified, absolute, long-path-capable string the lower-level
// native calls accept. Anything already in a native namespace is left
// untouched. The main benefit is breaking the legacy path-length restriction
// and reaching handles the portable path syntax cannot name.

use sysdefs::constants::err_const::Errno;
use sysdefs::constants::win_const::{
    NETWORK_SHARE, NT_DEVICE_NAMESPACE, UNC_PREFIX, WIN32_DEV_NAMESPACE, WIN32_FILE_NAMESPACE,
};

use crate::interface::host::{NativeError, NativeVolume};

/// True when the path already carries one of the recognized native
/// namespace prefixes and must pass through unchanged.
pub fn is_device_path(path: &str) -> bool {
    path.starts_with(WIN32_DEV_NAMESPACE)
        || path.starts_with(WIN32_FILE_NAMESPACE)
        || path.starts_with(NT_DEVICE_NAMESPACE)
}

/// Produce the namespace-qualified, absolute, long-path-capable form of
/// `path`. Idempotent: a path already in a native namespace is returned as
/// an identical copy. Fails only on resource exhaustion in the underlying
/// queries; a query that merely cannot improve the path (target missing,
/// no short components) falls back to the buffer it was given.
pub fn create_device_path<V: NativeVolume + ?Sized>(
    vol: &V,
    path: &str,
) -> Result<String, Errno> {
    if is_device_path(path) {
        return Ok(path.to_string());
    }

    // The lower-level APIs no longer rewrite '/' for us.
    let path = rewrite_separators(path);
    let path = expand_short_components(vol, path)?;
    let path = resolve_absolute(vol, path)?;
    Ok(apply_namespace_prefix(path))
}

fn rewrite_separators(path: &str) -> String {
    path.replace('/', r"\")
}

// Shared fallback rule for the two filesystem queries: "no improvement
// possible" keeps the prior buffer, only resource exhaustion is fatal.
fn query_or_keep(path: String, result: Result<String, NativeError>) -> Result<String, Errno> {
    match result {
        Ok(improved) => Ok(improved),
        Err(err) if err.is_resource_exhaustion() => Err(Errno::ENOMEM),
        Err(_) => Ok(path),
    }
}

// Expand legacy short-form (8.3) segments to their long names.
fn expand_short_components<V: NativeVolume + ?Sized>(
    vol: &V,
    path: String,
) -> Result<String, Errno> {
    let result = vol.long_path_name(&path);
    query_or_keep(path, result)
}

// Resolve any . and .. now, or subsequent native calls may fail since the
// lower layer no longer resolves them.
fn resolve_absolute<V: NativeVolume + ?Sized>(vol: &V, path: String) -> Result<String, Errno> {
    let result = vol.full_path_name(&path);
    query_or_keep(path, result)
}

// Network-share paths go under \\?\UNC\ with the leading separators
// replaced; everything else gets the plain extended-length prefix.
fn apply_namespace_prefix(path: String) -> String {
    if let Some(body) = path.strip_prefix(NETWORK_SHARE) {
        format!("{}{}{}", WIN32_FILE_NAMESPACE, UNC_PREFIX, body)
    } else {
        format!("{}{}", WIN32_FILE_NAMESPACE, path)
    }
}
