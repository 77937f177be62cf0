//! Strip-tool discovery and invocation.
//!
//! The size-reduction transform uses the NDK's per-ABI strip binary. The
//! tool is located under `<root>/toolchains/<abi pattern>/**/*-strip` and
//! invoked as a plain argument-vector subprocess with its exit status
//! checked.

use crate::catalog::Abi;
use crate::error::{DistError, DistResult};
use glob::Pattern;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use walkdir::WalkDir;

/// Locate the strip tool for `abi` under the toolchain root.
///
/// Returns the first match in lexical path order.
pub fn find_strip_tool(root: &Path, abi: Abi) -> DistResult<PathBuf> {
    let dir_pattern = Pattern::new(abi.toolchain_pattern()).expect("static pattern");
    let toolchains = root.join("toolchains");

    let mut candidates: Vec<PathBuf> = WalkDir::new(&toolchains)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map(|name| name.ends_with("-strip"))
                .unwrap_or(false)
        })
        .filter(|e| {
            // The ABI pattern matches the toolchain directory directly
            // under `toolchains/`.
            e.path()
                .strip_prefix(&toolchains)
                .ok()
                .and_then(|rel| rel.components().next())
                .and_then(|c| c.as_os_str().to_str())
                .map(|dir| dir_pattern.matches(dir))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect();

    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| DistError::ToolchainNotFound {
            abi: abi.to_string(),
            root: root.to_path_buf(),
        })
}

/// Run the strip tool over `target` in place.
pub fn strip_in_place(identity: &str, tool: &Path, target: &Path) -> DistResult<()> {
    debug!(tool = %tool.display(), target = %target.display(), "strip_in_place");
    let status = Command::new(tool)
        .arg(target)
        .status()
        .map_err(|e| DistError::Transform {
            identity: identity.to_string(),
            tool: tool.display().to_string(),
            reason: format!("spawn failed: {}", e),
        })?;
    if !status.success() {
        return Err(DistError::Transform {
            identity: identity.to_string(),
            tool: tool.display().to_string(),
            reason: format!("exit status {}", status),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_strip_tool_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_strip_tool(dir.path(), Abi::Armv7).unwrap_err();
        assert!(matches!(err, DistError::ToolchainNotFound { .. }));
    }

    #[test]
    fn test_find_strip_tool_ignores_other_abis() {
        let dir = tempfile::tempdir().unwrap();
        let other = dir
            .path()
            .join("toolchains/x86-4.9/prebuilt/linux-x86_64/bin");
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join("i686-linux-android-strip"), b"").unwrap();

        let err = find_strip_tool(dir.path(), Abi::Arm64).unwrap_err();
        assert!(matches!(err, DistError::ToolchainNotFound { .. }));
    }

    #[test]
    fn test_find_strip_tool_first_lexical_match() {
        let dir = tempfile::tempdir().unwrap();
        for toolchain in ["arm-linux-androideabi-4.9", "arm-linux-androideabi-4.8"] {
            let bin = dir
                .path()
                .join("toolchains")
                .join(toolchain)
                .join("prebuilt/linux-x86_64/bin");
            fs::create_dir_all(&bin).unwrap();
            fs::write(bin.join("arm-linux-androideabi-strip"), b"").unwrap();
        }

        let tool = find_strip_tool(dir.path(), Abi::Armv7).unwrap();
        assert!(tool
            .to_str()
            .unwrap()
            .contains("arm-linux-androideabi-4.8"));
        assert!(tool.to_str().unwrap().ends_with("-strip"));
    }

    #[test]
    fn test_find_strip_tool_skips_non_strip_files() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir
            .path()
            .join("toolchains/arm-linux-androideabi-4.9/prebuilt/bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("arm-linux-androideabi-gcc"), b"").unwrap();

        let err = find_strip_tool(dir.path(), Abi::Armv7).unwrap_err();
        assert!(matches!(err, DistError::ToolchainNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_strip_in_place_reports_exit_status() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("fake-strip");
        fs::write(&tool, "#!/bin/sh\nexit 3\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        let target = dir.path().join("lib.so");
        fs::write(&target, b"binary").unwrap();

        let err = strip_in_place("v8_751", &tool, &target).unwrap_err();
        match err {
            DistError::Transform { identity, reason, .. } => {
                assert_eq!(identity, "v8_751");
                assert!(reason.contains("exit status"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_strip_in_place_runs_tool() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("fake-strip");
        // The fake tool truncates the file to a single byte.
        fs::write(&tool, "#!/bin/sh\nprintf x > \"$1\"\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        let target = dir.path().join("lib.so");
        fs::write(&target, b"unstripped binary contents").unwrap();
        let raw_size = fs::metadata(&target).unwrap().len();

        strip_in_place("v8_751", &tool, &target).unwrap();
        let stripped_size = fs::metadata(&target).unwrap().len();
        assert_eq!(stripped_size, 1);
        assert!(stripped_size <= raw_size);
    }

    #[cfg(unix)]
    #[test]
    fn test_stripped_size_never_exceeds_raw_size() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("fake-strip");
        // A tool with nothing to remove leaves the file as-is; the
        // post-strip size must still be bounded by the raw size.
        fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        let target = dir.path().join("lib.so");
        fs::write(&target, b"already minimal").unwrap();
        let raw_size = fs::metadata(&target).unwrap().len();

        strip_in_place("v8_751", &tool, &target).unwrap();
        let stripped_size = fs::metadata(&target).unwrap().len();
        assert!(stripped_size <= raw_size);
        assert_eq!(stripped_size, raw_size);
    }
}
