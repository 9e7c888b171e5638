use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_run(root: &Path) {
    let shard = root.join("data/busybox");
    fs::create_dir_all(&shard).unwrap();
    fs::write(shard.join("systems.csv"), "ID,Name\n1,busybox\n").unwrap();
    fs::write(
        shard.join("models.csv"),
        "ID,SystemID,Version,VariableCount,ClauseCount\n10,1,1.0,100,300\n",
    )
    .unwrap();
    fs::write(
        shard.join("samples.csv"),
        "ID,SystemID,ModelID,Path,Type,Algorithm,AlgorithmIt,T,Size,Time,OriginalID,Error,Timeout,Seed\n\
         1,1,-1,f,f,,0,0,40,0,-1,false,false,0\n\
         2,1,10,1.0/t_yasa_t1,t,yasa,0,1,12,2000000000,-1,false,false,0\n\
         3,1,10,1.0/r_random_t1,r,RandomSampleReducer,0,1,10,500000000,1,false,false,7\n\
         4,1,10,1.0/r_scoring_t1,r,BitSetScoring1SampleReducer,0,1,15,900000000,1,false,false,0\n",
    )
    .unwrap();
    fs::write(
        shard.join("coverage.csv"),
        "SampleID,VariableCount,CoverageType,T,Coverage\n\
         1,100,f,1,1.0\n\
         2,100,f,1,0.8\n\
         3,100,f,1,0.9\n\
         4,100,f,1,0.95\n",
    )
    .unwrap();
}

fn sampleval(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sampleval").unwrap();
    cmd.current_dir(dir.path()).env_remove("SAMPLEVAL_ROOT").env_remove("RUST_LOG");
    cmd
}

#[test]
fn version_prints_package_version() {
    let dir = TempDir::new().unwrap();
    sampleval(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn prepare_writes_cache_under_default_root() {
    let dir = TempDir::new().unwrap();
    // without --root and results/.current the root is ./data
    write_run(&dir.path().join("data"));

    sampleval(&dir)
        .args(["prepare", "--format", "json"])
        .assert()
        .success()
        .stdout(contains("\"rows\": 4"));
    assert!(dir.path().join("data/plot/complete.json").is_file());
}

#[test]
fn plot_save_writes_all_charts() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("run");
    write_run(&root);

    sampleval(&dir)
        .arg("plot")
        .arg("--root")
        .arg(&root)
        .arg("--save")
        .assert()
        .success()
        .stderr(contains("wrote 6 charts"));

    let out = root.join("plot");
    for name in [
        "time_per_system_and_sample_type",
        "size_per_system_and_sample_type",
        "new_size_per_org_size_and_reduction_type",
        "size_per_sample_type",
        "size_per_t",
        "coverage_per_sample_type_and_coverage_type",
    ] {
        assert!(out.join(format!("{name}.svg")).is_file(), "{name}");
    }
}

#[test]
fn plot_rejects_unknown_chart() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("run");
    write_run(&root);

    sampleval(&dir)
        .arg("plot")
        .arg("--root")
        .arg(&root)
        .args(["--chart", "pie"])
        .assert()
        .code(2)
        .stderr(contains("unknown chart"));
}

#[test]
fn export_writes_tables_to_out_dir() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("run");
    let out = dir.path().join("tables");
    write_run(&root);

    sampleval(&dir)
        .arg("export")
        .arg("--root")
        .arg(&root)
        .arg("--out")
        .arg(&out)
        .arg("--save")
        .assert()
        .success();

    let complete = fs::read_to_string(out.join("complete.csv")).unwrap();
    assert!(complete.starts_with("SampleID;SystemID;"));
    assert_eq!(complete.lines().count(), 5);
    let tex = fs::read_to_string(out.join("summary.tex")).unwrap();
    assert!(tex.contains("Field (Random, \\$t=1\\$)"));
    assert!(out.join("summary.csv").is_file());
    assert!(out.join("complete.json").is_file());
}

#[test]
fn config_file_supplies_root() {
    let dir = TempDir::new().unwrap();
    write_run(&dir.path().join("elsewhere"));
    fs::write(
        dir.path().join("sampleval.yaml"),
        "root_dir: elsewhere\nunknown_key: 1\n",
    )
    .unwrap();

    sampleval(&dir)
        .arg("prepare")
        .assert()
        .success()
        .stderr(contains("ignored unknown config fields"));
    assert!(dir.path().join("elsewhere/plot/complete.json").is_file());
}

#[test]
fn missing_inputs_exit_with_config_error() {
    let dir = TempDir::new().unwrap();
    sampleval(&dir)
        .args(["prepare", "--root", "nowhere"])
        .assert()
        .code(2)
        .stderr(contains("fatal:"))
        .stderr(contains("systems.csv"));
}

#[test]
fn changed_duplicate_filter_rebuilds_cached_table() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("run");
    write_run(&root);
    fs::write(
        dir.path().join("sampleval.yaml"),
        "duplicate_system_prefix: busy\n",
    )
    .unwrap();

    sampleval(&dir)
        .arg("prepare")
        .arg("--root")
        .arg(&root)
        .assert()
        .success();

    // no --force: the cached table was built with the filter off
    sampleval(&dir)
        .arg("export")
        .arg("--root")
        .arg(&root)
        .args(["--save", "--duplicate-filter", "strict"])
        .assert()
        .success()
        .stderr(contains("cache_options_changed"));

    // field and t-wise rows of the busy* family are gone, both reduced rows stay
    let complete = fs::read_to_string(root.join("plot/complete.csv")).unwrap();
    assert_eq!(complete.lines().count(), 3);

    sampleval(&dir)
        .arg("export")
        .arg("--root")
        .arg(&root)
        .arg("--save")
        .assert()
        .success();
    let complete = fs::read_to_string(root.join("plot/complete.csv")).unwrap();
    assert_eq!(complete.lines().count(), 5);
}
