//! End-to-end dispatch tests.
//!
//! Small shell scripts stand in for the real formatters: they rewrite the
//! file they are given in place and log how they were called. Tests against
//! real formatter binaries run only when the matching environment variable
//! points at one.

#![cfg(unix)]

use polyfmt_core::{Dispatcher, Formatter, GlobalSettings, MemorySettingsStore, PolyfmtError};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Collapses runs of spaces and puts single spaces around `=`.
const SPACING_FORMATTER: &str = r#"#!/bin/sh
for a; do f=$a; done
out=$(sed -e 's/ *= */ = /g' -e 's/  */ /g' "$f") && printf '%s\n' "$out" > "$f"
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A formatter that appends its arguments, working directory and target
/// path to `log` before succeeding without touching the file.
fn logging_script(dir: &Path, name: &str, log: &Path) -> PathBuf {
    let body = format!(
        "#!/bin/sh\nfor a; do f=$a; done\necho \"args=$*\" >> '{log}'\necho \"cwd=$(pwd -P)\" >> '{log}'\necho \"file=$f\" >> '{log}'\n",
        log = log.display()
    );
    write_script(dir, name, &body)
}

fn log_value(log: &Path, key: &str) -> String {
    let prefix = format!("{key}=");
    fs::read_to_string(log)
        .unwrap()
        .lines()
        .find_map(|line| line.strip_prefix(&prefix).map(str::to_string))
        .unwrap()
}

fn dispatcher_with(entries: &[(&str, &str)]) -> Dispatcher {
    let mut settings = GlobalSettings::default();
    for (key, value) in entries {
        settings.set(key, value).unwrap();
    }
    Dispatcher::standard(Arc::new(MemorySettingsStore::new(settings)))
}

#[test]
fn test_formats_swift_without_project_context() {
    let bin = TempDir::new().unwrap();
    let exe = write_script(bin.path(), "swiftformat", SPACING_FORMATTER);

    let dispatcher = dispatcher_with(&[("swiftformat.executable_path", exe.to_str().unwrap())]);
    let formatted = dispatcher
        .format_editing_file("var   x=1", "public.swift-source", None)
        .unwrap();

    assert_eq!(formatted, "var x = 1\n");
}

#[test]
fn test_formatting_is_idempotent_for_every_tool() {
    let cases = [
        (Formatter::SwiftFormat, "public.swift-source", "main.swift", "let  a =2\nlet b=  3", "let a = 2\nlet b = 3\n"),
        (Formatter::AppleSwiftFormat, "public.swift-source", "main.swift", "let  a =2\nlet b=  3", "let a = 2\nlet b = 3\n"),
        (Formatter::ClangFormat, "public.c-source", "main.c", "int  a =2;\nint b=  3;", "int a = 2;\nint b = 3;\n"),
        (Formatter::Prettier, "com.netscape.javascript-source", "main.js", "const  a =2\nconst b=  3", "const a = 2\nconst b = 3\n"),
    ];

    for (formatter, content_type, file_name, input, expected) in cases {
        let bin = TempDir::new().unwrap();
        let exe = write_script(bin.path(), formatter.id(), SPACING_FORMATTER);
        let project = TempDir::new().unwrap();
        let source = project.path().join(file_name);

        let key = format!("{}.executable_path", formatter.id());
        let dispatcher = dispatcher_with(&[(key.as_str(), exe.to_str().unwrap())]);
        let once = dispatcher
            .format_editing_file(input, content_type, Some(source.as_path()))
            .unwrap();
        let twice = dispatcher
            .format_editing_file(&once, content_type, Some(source.as_path()))
            .unwrap();

        assert_eq!(once, expected, "{formatter:?}");
        assert_eq!(once, twice, "{formatter:?}");
    }
}

#[test]
fn test_tool_failure_carries_diagnostics() {
    let bin = TempDir::new().unwrap();
    let exe = write_script(
        bin.path(),
        "clang-format",
        "#!/bin/sh\necho 'syntax error at line 3' >&2\nexit 1\n",
    );

    let dispatcher = dispatcher_with(&[("clang-format.executable_path", exe.to_str().unwrap())]);
    let err = dispatcher
        .format_editing_file("int main(", "public.c-source", None)
        .unwrap_err();

    match err {
        PolyfmtError::ExternalToolFailure(output) => assert_eq!(output, "syntax error at line 3"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_temp_file_removed_after_success() {
    let bin = TempDir::new().unwrap();
    let log = bin.path().join("calls.log");
    let exe = logging_script(bin.path(), "swiftformat", &log);
    let project = TempDir::new().unwrap();
    let source = project.path().join("Sources").join("App.swift");
    fs::create_dir_all(source.parent().unwrap()).unwrap();

    let dispatcher = dispatcher_with(&[("swiftformat.executable_path", exe.to_str().unwrap())]);
    let formatted = dispatcher
        .format_editing_file("struct App {}\n", "public.swift-source", Some(source.as_path()))
        .unwrap();
    assert_eq!(formatted, "struct App {}\n");

    let temp_path = PathBuf::from(log_value(&log, "file"));
    assert!(!temp_path.exists());
    assert_eq!(
        temp_path.parent().unwrap().canonicalize().unwrap(),
        source.parent().unwrap().canonicalize().unwrap()
    );
    let name = temp_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with(".polyfmt_"));
    assert!(name.ends_with(".swift"));

    // The tool runs from the search root.
    assert_eq!(
        PathBuf::from(log_value(&log, "cwd")),
        source.parent().unwrap().canonicalize().unwrap()
    );
}

#[test]
fn test_temp_file_removed_after_failure() {
    let bin = TempDir::new().unwrap();
    let log = bin.path().join("calls.log");
    let exe = write_script(
        bin.path(),
        "clang-format",
        &format!(
            "#!/bin/sh\nfor a; do f=$a; done\necho \"file=$f\" >> '{}'\necho boom\nexit 2\n",
            log.display()
        ),
    );
    let project = TempDir::new().unwrap();

    let dispatcher = dispatcher_with(&[("clang-format.executable_path", exe.to_str().unwrap())]);
    let err = dispatcher
        .format_editing_file("x", "public.c-source", Some(project.path().join("x.c").as_path()))
        .unwrap_err();

    assert!(matches!(err, PolyfmtError::ExternalToolFailure(ref out) if out == "boom"));
    assert!(!PathBuf::from(log_value(&log, "file")).exists());
    assert_eq!(fs::read_dir(project.path()).unwrap().count(), 0);
}

#[test]
fn test_clang_format_uses_discovered_config() {
    let bin = TempDir::new().unwrap();
    let log = bin.path().join("calls.log");
    let exe = logging_script(bin.path(), "clang-format", &log);
    let project = TempDir::new().unwrap();
    fs::write(project.path().join(".clang-format"), "BasedOnStyle: WebKit").unwrap();

    let dispatcher = dispatcher_with(&[
        ("clang-format.executable_path", exe.to_str().unwrap()),
        ("clang-format.style", "Google"),
    ]);
    dispatcher
        .format_editing_file(
            "int x;",
            "public.c-source",
            Some(project.path().join("x.c").as_path()),
        )
        .unwrap();

    let file = log_value(&log, "file");
    assert_eq!(log_value(&log, "args"), format!("-style=file -i {file}"));
}

#[test]
fn test_clang_format_style_precedence() {
    let bin = TempDir::new().unwrap();
    let log = bin.path().join("calls.log");
    let exe = logging_script(bin.path(), "clang-format", &log);
    let project = TempDir::new().unwrap();

    let dispatcher = dispatcher_with(&[
        ("clang-format.executable_path", exe.to_str().unwrap()),
        ("clang-format.style", "Google"),
    ]);
    dispatcher
        .format_editing_file(
            "int x;",
            "public.c-source",
            Some(project.path().join("x.c").as_path()),
        )
        .unwrap();
    assert!(log_value(&log, "args").starts_with("-style=Google -i "));

    fs::remove_file(&log).unwrap();
    fs::write(
        project.path().join(".polyfmt"),
        r#"{"clangFormatStyle": "Chromium"}"#,
    )
    .unwrap();
    dispatcher
        .format_editing_file(
            "int x;",
            "public.c-source",
            Some(project.path().join("x.c").as_path()),
        )
        .unwrap();
    assert!(log_value(&log, "args").starts_with("-style=Chromium -i "));
}

#[test]
fn test_override_only_project_invokes_custom_path() {
    let bin = TempDir::new().unwrap();
    let log = bin.path().join("calls.log");
    let exe = logging_script(bin.path(), "my-clang-format", &log);
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(".polyfmt"),
        format!(r#"{{"clangFormatExecutablePath": "{}"}}"#, exe.display()),
    )
    .unwrap();

    let dispatcher = dispatcher_with(&[]);
    dispatcher
        .format_editing_file(
            "class A {}",
            "com.sun.java-source",
            Some(project.path().join("A.java").as_path()),
        )
        .unwrap();

    assert!(log_value(&log, "file").ends_with(".java"));
    assert!(log_value(&log, "args").starts_with("-style=LLVM -i "));
}

#[test]
fn test_prettier_runs_through_env_with_arguments() {
    let bin = TempDir::new().unwrap();
    let log = bin.path().join("calls.log");
    let exe = logging_script(bin.path(), "prettier", &log);
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(".polyfmt"),
        r#"{"prettierArguments": "--tab-width 4 --no-semi"}"#,
    )
    .unwrap();

    let dispatcher = dispatcher_with(&[
        ("prettier.executable_path", exe.to_str().unwrap()),
        ("prettier.arguments", "--single-quote"),
    ]);
    dispatcher
        .format_editing_file(
            "const a = 1",
            "com.microsoft.typescript",
            Some(project.path().join("a.ts").as_path()),
        )
        .unwrap();

    let file = log_value(&log, "file");
    let args = log_value(&log, "args");
    assert!(file.ends_with(".ts"));
    assert_eq!(args, format!("--write {file} --tab-width 4 --no-semi"));
}

#[test]
fn test_source_extension_used_for_temp_copy() {
    let bin = TempDir::new().unwrap();
    let log = bin.path().join("calls.log");
    let exe = logging_script(bin.path(), "clang-format", &log);
    let project = TempDir::new().unwrap();

    let dispatcher = dispatcher_with(&[("clang-format.executable_path", exe.to_str().unwrap())]);
    dispatcher
        .format_editing_file(
            "int x;",
            "public.c-plus-plus-header",
            Some(project.path().join("vec.hh").as_path()),
        )
        .unwrap();

    assert!(log_value(&log, "file").ends_with(".hh"));
}

#[test]
fn test_selected_formatter_without_executable() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join(".swiftformat"), "").unwrap();

    let dispatcher = dispatcher_with(&[]);
    let err = dispatcher
        .format_editing_file(
            "let x = 1",
            "public.swift-source",
            Some(project.path().join("main.swift").as_path()),
        )
        .unwrap_err();

    assert!(matches!(err, PolyfmtError::ExecutablePathNotSet(ref tool) if tool == "SwiftFormat"));
    assert_eq!(fs::read_dir(project.path()).unwrap().count(), 1);
}

#[test]
fn test_concurrent_requests_are_independent() {
    let bin = TempDir::new().unwrap();
    let exe = write_script(bin.path(), "swiftformat", SPACING_FORMATTER);
    let project = TempDir::new().unwrap();
    let source = project.path().join("main.swift");

    let dispatcher = Arc::new(dispatcher_with(&[(
        "swiftformat.executable_path",
        exe.to_str().unwrap(),
    )]));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            let source = source.clone();
            std::thread::spawn(move || {
                let content = format!("let v{i}={i}");
                dispatcher
                    .format_editing_file(&content, "public.swift-source", Some(source.as_path()))
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("let v{i} = {i}\n"));
    }
    assert_eq!(fs::read_dir(project.path()).unwrap().count(), 0);
}

#[test]
fn test_real_swiftformat() {
    let Ok(exe) = std::env::var("POLYFMT_SWIFTFORMAT_PATH") else {
        return;
    };

    let dispatcher = dispatcher_with(&[("swiftformat.executable_path", exe.as_str())]);
    let once = dispatcher
        .format_editing_file("var   x=1", "public.swift-source", None)
        .unwrap();
    let twice = dispatcher
        .format_editing_file(&once, "public.swift-source", None)
        .unwrap();

    assert_eq!(once, "var x = 1\n");
    assert_eq!(once, twice);
}

#[test]
fn test_real_clang_format() {
    let Ok(exe) = std::env::var("POLYFMT_CLANG_FORMAT_PATH") else {
        return;
    };

    let dispatcher = dispatcher_with(&[("clang-format.executable_path", exe.as_str())]);
    let once = dispatcher
        .format_editing_file("int   x=1;", "public.c-source", None)
        .unwrap();
    let twice = dispatcher
        .format_editing_file(&once, "public.c-source", None)
        .unwrap();

    assert_eq!(once.trim_end(), "int x = 1;");
    assert_eq!(once, twice);
}
