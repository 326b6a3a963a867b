use std::process::Command;

fn maze_chase() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_maze-chase"));
    let _ = command.env("RUST_LOG", "off");
    command
}

#[test]
fn headless_run_prints_final_board() {
    let output = maze_chase()
        .args(["--ticks", "25", "--intents", "LLUURRDD", "--seed", "3"])
        .output()
        .expect("failed to run maze-chase binary");

    assert!(output.status.success(), "maze-chase should exit cleanly");
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    let board: Vec<&str> = stdout.lines().collect();
    assert_eq!(board.len(), 31);
    assert!(board.iter().all(|row| row.chars().count() == 28));
}

#[test]
fn config_file_is_read() {
    let config = concat!(env!("CARGO_MANIFEST_DIR"), "/maze-chase.toml");
    let output = maze_chase()
        .args(["--config", config, "--ticks", "5", "--strategy", "weighted-random-walk"])
        .output()
        .expect("failed to run maze-chase binary");

    assert!(output.status.success());
}

#[test]
fn invalid_intent_script_is_rejected() {
    let output = maze_chase()
        .args(["--intents", "LX"])
        .output()
        .expect("failed to run maze-chase binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("intent script"), "stderr: {stderr}");
}

#[test]
fn missing_config_file_is_reported() {
    let output = maze_chase()
        .args(["--config", "does/not/exist.toml"])
        .output()
        .expect("failed to run maze-chase binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does/not/exist.toml"), "stderr: {stderr}");
}
