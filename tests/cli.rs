use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_cli(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_astar-grid"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn success_exit_code_and_length() {
    let output = run_cli(&["--quiet"], "S....\n.....\n.....\n.....\n....E\n");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("outcome: success"));
    assert!(stdout.contains("path length: 8"));
}

#[test]
fn no_path_exit_code() {
    let output = run_cli(&[], "S..\n###\n..E\n");
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("outcome: no path"));
    assert!(stdout.contains("xx"));
}

#[test]
fn aborted_exit_code() {
    let output = run_cli(&["--max-steps", "2"], "S....\n.....\n.....\n.....\n....E\n");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_input_exit_code() {
    let output = run_cli(&[], "S.\n.\n");
    assert_eq!(output.status.code(), Some(3));
    let output = run_cli(&[], "...\n...\n..E\n");
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("no start cell"));
}

#[test]
fn writes_frames() {
    let dir = std::env::temp_dir().join(format!("astar-grid-frames-{}", std::process::id()));
    let output = run_cli(
        &["--frames", dir.to_str().unwrap(), "--cell-size", "4"],
        "S.\n.E\n",
    );
    assert_eq!(output.status.code(), Some(0));
    let frames = std::fs::read_dir(&dir).unwrap().count();
    // Three expansions, one path cell and the final frame.
    assert_eq!(frames, 5);
    let first = std::fs::read(dir.join("frame_00000.ppm")).unwrap();
    assert!(first.starts_with(b"P6\n8 8\n255\n"));
    std::fs::remove_dir_all(&dir).unwrap();
}

fn open_grid(rows: usize) -> String {
    let mut text = String::new();
    for row in 0..rows {
        for column in 0..rows {
            text.push(match (row, column) {
                (0, 0) => 'S',
                (r, c) if r == rows - 1 && c == rows - 1 => 'E',
                _ => '.',
            });
        }
        text.push('\n');
    }
    text
}

#[test]
fn no_frame_buffer_without_frames() {
    // A frame at this cell size would need tens of petabytes.
    let output = run_cli(&["--quiet", "--cell-size", "1000000"], &open_grid(100));
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("path length: 198"));
}

#[test]
fn oversized_cells_are_rejected() {
    let output = run_cli(&["--quiet", "--cell-size", "50000000"], &open_grid(100));
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("does not fit 100 rows"));
}
