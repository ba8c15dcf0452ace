use std::fs;
use std::path::{Path, PathBuf};

fn rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

fn rel(path: &Path) -> String {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let rel = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();
    rel.replace('\\', "/")
}

fn core_files() -> Vec<PathBuf> {
    let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut files = rs_files(&src.join("system"));
    for name in ["scheduler.rs", "config.rs", "format.rs", "logging.rs", "lib.rs"] {
        files.push(src.join(name));
    }
    files
}

#[test]
fn core_does_not_depend_on_presentation() {
    let mut violations = Vec::new();

    for file in core_files() {
        let content = fs::read_to_string(&file).unwrap_or_default();
        for forbidden in ["crate::ui", "crate::app", "ratatui", "crossterm"] {
            if content.contains(forbidden) {
                violations.push(format!(
                    "{} imports forbidden dependency `{}`",
                    rel(&file),
                    forbidden
                ));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Core layering violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn ui_module_does_not_signal_processes_directly() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/ui");
    let mut violations = Vec::new();

    for file in rs_files(&root) {
        let content = fs::read_to_string(&file).unwrap_or_default();
        for forbidden in ["system::kill", "ProcessController", "system::registry"] {
            if content.contains(forbidden) {
                violations.push(format!("{} uses `{}` directly", rel(&file), forbidden));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "UI/core boundary violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn platform_cfg_is_scoped_to_kill() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut violations = Vec::new();

    for file in rs_files(&root) {
        let content = fs::read_to_string(&file).unwrap_or_default();
        if !content.contains("target_os") && !content.contains("cfg(unix)") {
            continue;
        }

        let rel_path = rel(&file);
        if rel_path != "src/system/kill.rs" {
            violations.push(format!(
                "{} contains a platform cfg but is outside the allowed boundary",
                rel_path
            ));
        }
    }

    assert!(
        violations.is_empty(),
        "Unexpected platform cfg usage:\n{}",
        violations.join("\n")
    );
}
