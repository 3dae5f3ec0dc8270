// mediaprobe-core/tests/invocation_paths.rs

use mediaprobe_core::{FFPROBE_FLAGS, ProbeConfig, ProbeError, ProbeInvocation};
use std::fs::File;

const AWKWARD_NAMES: &[&str] = &[
    "plain.mp4",
    "with spaces.mkv",
    "single'quote.mov",
    "double\"quote.webm",
    "semi;colon && echo pwned.mp4",
    "$(touch injected).avi",
    "`backticks`.ts",
    "glob*?[x].mp4",
    "-starts-with-dash.mp4",
    "new\nline.mp4",
    "ünïcödé 日本語.mkv",
    "back\\slash.flac",
];

// Most of these names are not legal on Windows.
#[cfg(unix)]
#[test]
fn final_argument_is_the_exact_path_for_awkward_names() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProbeConfig::default();

    for name in AWKWARD_NAMES {
        let path = dir.path().join(name);
        File::create(&path).unwrap();

        let invocation = ProbeInvocation::build(&path, &config).unwrap();
        let args = invocation.arguments();

        assert_eq!(
            args.last().unwrap().as_encoded_bytes(),
            path.as_os_str().as_encoded_bytes(),
            "path {name:?} was altered"
        );
        assert_eq!(args.len(), FFPROBE_FLAGS.len() + 2);
    }

    assert!(!dir.path().join("injected").exists());
}

#[test]
fn nonexistent_paths_fail_with_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProbeConfig::default();

    for name in ["missing.mp4", "sub/dir/missing.mkv", "with space missing.mov"] {
        let err = ProbeInvocation::build(&dir.path().join(name), &config).unwrap_err();
        assert!(
            matches!(err, ProbeError::FileNotFound { .. }),
            "expected FileNotFound for {name}, got {err:?}"
        );
    }
}

#[cfg(unix)]
#[test]
fn unreadable_file_fails_with_file_not_found() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locked.mp4");
    File::create(&path).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything; nothing to check there.
    if File::open(&path).is_ok() {
        return;
    }

    let err = ProbeInvocation::build(&path, &ProbeConfig::default()).unwrap_err();
    assert!(matches!(err, ProbeError::FileNotFound { .. }));
}
