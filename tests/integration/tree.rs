use catchfix::{run, FileOutcome, RewriteConfig, RunError, RunOptions};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Build a mock project tree with the four default target directories
/// plus files outside them that must never be touched.
fn setup_server_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("Server");

    fs::create_dir_all(root.join("Forms")).unwrap();
    fs::create_dir_all(root.join("Handle Packet/Types")).unwrap();
    fs::create_dir_all(root.join("Helper")).unwrap();
    fs::create_dir_all(root.join("Other")).unwrap();

    fs::write(
        root.join("Forms/FormMain.cs"),
        r#"public partial class FormMain
{
    private void FormMain_Load(object sender, EventArgs e)
    {
        try { LoadSettings(); } catch { }
    }
}
"#,
    )
    .unwrap();

    fs::write(
        root.join("Handle Packet/Types/HandleLogs.cs"),
        "public class HandleLogs\n{\n    public void Append(string msg)\n    {\n        try\n        {\n            Write(msg);\n        }\n        catch\n        {\n        }\n    }\n}\n",
    )
    .unwrap();

    fs::write(
        root.join("Helper/Methods.cs"),
        "public static class Methods\n{\n    public static string Format(long size) => size.ToString();\n}\n",
    )
    .unwrap();

    fs::write(root.join("Helper/Notes.txt"), "try { } catch { }\n").unwrap();
    fs::write(root.join("Other/Ignored.cs"), "void X() { try { } catch { } }\n").unwrap();

    dir
}

fn config_for(root: &Path) -> RewriteConfig {
    let mut config = RewriteConfig::default();
    config.target.root = root.to_path_buf();
    config
}

#[test]
fn rewrites_only_target_files() {
    let dir = setup_server_tree();
    let root = dir.path().join("Server");

    let mut fixed = Vec::new();
    let summary = run(&config_for(&root), &RunOptions::default(), |outcome| {
        if let FileOutcome::Fixed(fix) = outcome {
            fixed.push(fix.path.file_name().unwrap().to_string_lossy().into_owned());
        }
    })
    .unwrap();

    assert_eq!(fixed, vec!["FormMain.cs", "HandleLogs.cs"]);
    assert_eq!(summary.files_scanned, 3);
    assert_eq!(summary.files_changed, 2);
    assert_eq!(summary.replacements, 2);
    assert_eq!(summary.missing_directories.len(), 1);
    assert!(summary.missing_directories[0].ends_with("Connection"));

    let form = fs::read_to_string(root.join("Forms/FormMain.cs")).unwrap();
    assert!(form.contains("\"FormMain_Load failed\""));

    let logs = fs::read_to_string(root.join("Handle Packet/Types/HandleLogs.cs")).unwrap();
    assert!(logs.contains(
        "        catch (Exception ex)\n        {\n            ErrorHandler.HandleNonCritical(() => { }, ex, \"Append failed\");\n        }\n"
    ));

    // Outside the target set
    assert_eq!(
        fs::read_to_string(root.join("Helper/Notes.txt")).unwrap(),
        "try { } catch { }\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("Other/Ignored.cs")).unwrap(),
        "void X() { try { } catch { } }\n"
    );
}

#[test]
fn second_run_changes_nothing() {
    let dir = setup_server_tree();
    let root = dir.path().join("Server");
    let config = config_for(&root);

    run(&config, &RunOptions::default(), |_| {}).unwrap();
    let after_first = fs::read_to_string(root.join("Forms/FormMain.cs")).unwrap();

    let summary = run(&config, &RunOptions::default(), |_| {}).unwrap();
    assert_eq!(summary.files_changed, 0);
    assert_eq!(summary.replacements, 0);
    assert_eq!(
        fs::read_to_string(root.join("Forms/FormMain.cs")).unwrap(),
        after_first
    );
}

#[test]
fn missing_root_touches_nothing() {
    let dir = setup_server_tree();
    let config = config_for(&dir.path().join("NoSuchServer"));

    let result = run(&config, &RunOptions::default(), |_| {
        panic!("no file should be visited")
    });

    match result {
        Err(RunError::RootNotFound(path)) => assert!(path.ends_with("NoSuchServer")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn undecodable_file_is_reported_and_left_alone() {
    let dir = setup_server_tree();
    let root = dir.path().join("Server");
    let latin1 = b"void Caf\xe9() { try { } catch { } }\n".to_vec();
    fs::write(root.join("Helper/Legacy.cs"), &latin1).unwrap();

    let mut failures = Vec::new();
    let summary = run(&config_for(&root), &RunOptions::default(), |outcome| {
        if let FileOutcome::Failed { path, reason } = outcome {
            failures.push((path.clone(), reason.clone()));
        }
    })
    .unwrap();

    assert_eq!(summary.files_failed, 1);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].0.ends_with("Legacy.cs"));
    assert!(failures[0].1.contains("UTF-8"));
    assert_eq!(fs::read(root.join("Helper/Legacy.cs")).unwrap(), latin1);

    // The other files were still processed
    assert_eq!(summary.files_changed, 2);
}

#[test]
fn custom_directories_and_extension() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src/App.java"),
        "public void start() { try { boot(); } catch { } }\n",
    )
    .unwrap();
    fs::write(root.join("src/App.cs"), "void Main() { try { } catch { } }\n").unwrap();

    let mut config = config_for(root);
    config.target.directories = vec!["src".to_string()];
    config.target.extension = ".java".to_string();

    let summary = run(&config, &RunOptions::default(), |_| {}).unwrap();
    assert_eq!(summary.files_changed, 1);
    assert!(fs::read_to_string(root.join("src/App.java"))
        .unwrap()
        .contains("\"start failed\""));
    assert_eq!(
        fs::read_to_string(root.join("src/App.cs")).unwrap(),
        "void Main() { try { } catch { } }\n"
    );
}
