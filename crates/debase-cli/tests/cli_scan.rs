use std::path::Path;
use std::process::Command;

fn debase() -> Command {
    Command::new(env!("CARGO_BIN_EXE_debase"))
}

fn write(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

const SCHEDULER_SYMBOLS: &str = "\
0000000000001129 T _ZN7cocos2d11CCSchedulerC1Ev
0000000000001129 T _ZN7cocos2d11CCSchedulerC2Ev
0000000000001180 W _ZN7cocos2d11CCSchedulerD1Ev
00000000000011d0 W _ZN7cocos2d11CCSchedulerD0Ev
0000000000001240 T _ZN7cocos2d11CCScheduler4initEv
0000000000001300 T _ZTV7CCNode
                 U printf
";

// --- scan ---

#[test]
fn scan_matches_structors_only() {
    let tmp = tempfile::tempdir().unwrap();
    let symbols = write(tmp.path(), "CCScheduler.sym", SCHEDULER_SYMBOLS);

    let output = debase()
        .args([
            "scan",
            "--pattern",
            "cocos2d::CCScheduler::CCScheduler",
            &symbols,
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("_ZN7cocos2d11CCSchedulerC1Ev"));
    assert!(stdout.contains("_ZN7cocos2d11CCSchedulerC2Ev"));
    assert!(stdout.contains("_ZN7cocos2d11CCSchedulerD1Ev"));
    // Deleting destructor, plain method, vtable, and C symbols are skipped.
    assert!(!stdout.contains("D0Ev"));
    assert!(!stdout.contains("4initEv"));
    assert!(!stdout.contains("_ZTV"));
    assert!(!stdout.contains("printf"));
}

#[test]
fn scan_with_file_stem_pattern_binds_per_input() {
    let tmp = tempfile::tempdir().unwrap();
    let scheduler = write(tmp.path(), "CCScheduler.sym", SCHEDULER_SYMBOLS);
    let lightning = write(
        tmp.path(),
        "CCLightning.sym",
        "_ZN7cocos2d11CCLightningD2Ev\n_ZN7cocos2d11CCSchedulerD2Ev\n",
    );

    let output = debase()
        .args(["scan", "--pattern", "**::{file.stem}", &scheduler, &lightning])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    // Each input only matches the structors of its own stem.
    assert!(stdout.contains("CCScheduler.sym: cocos2d::CCScheduler::CCScheduler"));
    assert!(stdout.contains("CCLightning.sym: cocos2d::CCLightning::CCLightning"));
    assert!(!stdout.contains("CCLightning.sym: cocos2d::CCScheduler::CCScheduler"));
}

#[test]
fn scan_ctor_and_dtor_sets_are_separate() {
    let tmp = tempfile::tempdir().unwrap();
    let symbols = write(tmp.path(), "s.sym", SCHEDULER_SYMBOLS);

    let output = debase()
        .args(["scan", "--dtor-pattern", "**::CCScheduler", &symbols])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("D1Ev"));
    assert!(!stdout.contains("C1Ev"));
}

#[test]
fn scan_reads_config_files_and_patterns() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "CCScheduler.sym", SCHEDULER_SYMBOLS);
    let cfg = write(
        tmp.path(),
        "debase.json",
        r#"{ "files": "CCScheduler.sym", "patterns": { "all": "cocos2d::**::CCScheduler" } }"#,
    );

    let output = debase().args(["scan", "--config", &cfg]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cocos2d::CCScheduler::CCScheduler"));
}

#[test]
fn scan_json_output() {
    let tmp = tempfile::tempdir().unwrap();
    let symbols = write(tmp.path(), "s.sym", "_ZN7cocos2d11CCLightningD2Ev\n");

    let output = debase()
        .args([
            "scan",
            "--json",
            "--pattern",
            "cocos2d::CCLightning::CCLightning",
            &symbols,
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let entries: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(entries[0]["kind"], "dtor");
    assert_eq!(entries[0]["variant"], 2);
    assert_eq!(entries[0]["qualified"], "cocos2d::CCLightning::CCLightning");
}

#[test]
fn scan_msvc_abi() {
    let tmp = tempfile::tempdir().unwrap();
    let symbols = write(
        tmp.path(),
        "s.sym",
        "??0CCLightning@cocos2d@@QAE@XZ\n?update@CCScheduler@cocos2d@@QAEXM@Z\n",
    );

    let output = debase()
        .args([
            "scan",
            "--abi",
            "x86_64-pc-windows-msvc",
            "--pattern",
            "cocos2d::CCLightning::CCLightning",
            &symbols,
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("??0CCLightning@cocos2d@@QAE@XZ"));
    assert!(!stdout.contains("update"));
}

#[test]
fn scan_without_inputs_fails() {
    let output = debase()
        .args(["scan", "--pattern", "a::B"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no input files"));
}

#[test]
fn scan_bad_pattern_fails_strict() {
    let tmp = tempfile::tempdir().unwrap();
    let symbols = write(tmp.path(), "s.sym", "_ZN1aC1Ev\n");

    let output = debase()
        .args(["scan", "--pattern", "a::b??", &symbols])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("a::b??"));
}

#[test]
fn scan_bad_pattern_warns_permissive() {
    let tmp = tempfile::tempdir().unwrap();
    let symbols = write(tmp.path(), "s.sym", "_ZN1a1BC1Ev\n");

    let output = debase()
        .args([
            "scan",
            "--permissive",
            "--pattern",
            "a::b??",
            "--pattern",
            "a::B::B",
            &symbols,
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("a::B::B"));
    assert!(stderr.contains("warning"));
}
