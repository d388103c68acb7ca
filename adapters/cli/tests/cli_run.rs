use std::{
    fs,
    process::{Command, Output},
};

fn lifestats(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lifestats"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch the lifestats binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

#[test]
fn quiet_blinker_reports_cycle_and_statistics() {
    let output = lifestats(&[
        "--rows", "5", "--cols", "5", "--live", "2,1 2,2 2,3", "--quiet",
    ]);

    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("entered a cycle of period 2"));
    assert!(text.contains("statistics at generation 2"));
    for category in [
        "longest_living_streak",
        "longest_death_streak",
        "births",
        "deaths",
        "gens_alive",
        "gens_dead",
    ] {
        assert!(text.contains(category), "missing {category} in\n{text}");
    }
}

#[test]
fn overlay_frame_is_printed_after_the_run() {
    let output = lifestats(&[
        "--rows",
        "6",
        "--cols",
        "6",
        "--pattern",
        "block",
        "--quiet",
        "--overlay",
        "gens-alive",
    ]);

    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("reached a fixed point"));
    assert!(text.starts_with("generation 1\n"));
}

#[test]
fn out_of_bounds_cells_fail_the_run() {
    let output = lifestats(&["--rows", "3", "--cols", "3", "--live", "5,5", "--quiet"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to build the initial board"), "{stderr}");
}

#[test]
fn config_file_supplies_defaults() {
    let dir = std::env::temp_dir().join(format!("lifestats-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("lifestats.toml");
    fs::write(
        &path,
        "rows = 4\ncols = 4\nlive = [[1, 1], [1, 2], [2, 1], [2, 2]]\nquiet = true\n",
    )
    .expect("write config");

    let output = lifestats(&["--config", path.to_str().expect("utf-8 path")]);
    let _ = fs::remove_dir_all(&dir);

    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("generation 1 has 4 live cell(s)"));
}

#[test]
fn generation_limit_is_honoured() {
    let output = lifestats(&[
        "--rows", "20", "--cols", "20", "--pattern", "glider", "--at", "0,0", "-g", "3", "--quiet",
    ]);

    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("hit the generation limit after 3 generation(s)"));
}
