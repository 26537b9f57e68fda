use batch_move::cli::{Args, ProcessMode};
use batch_move::{Config, LogLevel, ManifestFormat, TransferMode, load_config};
use clap::Parser;
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn xml_then_cli_precedence() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(
        &cfg_path,
        "<config>\n  <chunk_prefix>batch_</chunk_prefix>\n  <manifest_format>text</manifest_format>\n  \
         <recursive>false</recursive>\n  <log_level>info</log_level>\n</config>\n",
    )
    .unwrap();

    let mut cfg = load_config(Some(&cfg_path)).unwrap();
    assert_eq!(cfg.chunk_prefix, "batch_");
    assert_eq!(cfg.manifest_format, ManifestFormat::Text);
    assert!(!cfg.recursive);
    assert_eq!(cfg.log_level, LogLevel::Info);

    let args = Args::try_parse_from([
        "batch_move",
        "--source",
        "/data",
        "--ids",
        "ids.txt",
        "--chunk-format",
        "json",
        "--recursive",
        "--debug",
        "--no-force-overwrite",
    ])
    .unwrap();
    args.apply_overrides(&mut cfg);

    assert_eq!(cfg.chunk_prefix, "batch_");
    assert_eq!(cfg.manifest_format, ManifestFormat::Json);
    assert!(cfg.recursive);
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert!(!cfg.force_overwrite);
    assert!(cfg.preserve_metadata);
}

#[test]
fn unset_flags_leave_config_alone() {
    let args = Args::try_parse_from(["batch_move", "-s", "/data", "-i", "ids.txt"]).unwrap();
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg, Config::default());
    assert_eq!(args.process_chunks, ProcessMode::None);
    assert_eq!(args.chunk_size, 0);
}

#[test]
fn process_flags_parse() {
    let args = Args::try_parse_from([
        "batch_move",
        "-s",
        "/data",
        "-i",
        "ids.csv",
        "--process-chunks",
        "move",
        "--process-dest",
        "/out",
    ])
    .unwrap();
    assert_eq!(args.process_chunks.transfer_mode(), Some(TransferMode::Move));
    assert_eq!(args.process_dest, Some(PathBuf::from("/out")));
}

#[test]
fn source_required_without_print_config() {
    assert!(Args::try_parse_from(["batch_move", "--ids", "ids.txt"]).is_err());
}

#[test]
#[serial]
fn env_named_config_is_used() {
    let td = tempdir().unwrap();
    let p = td.path().join("env.xml");
    fs::write(&p, "<config><chunks_dir>out_manifests</chunks_dir></config>").unwrap();
    unsafe { std::env::set_var("BATCH_MOVE_CONFIG", &p) };
    let cfg = load_config(None);
    unsafe { std::env::remove_var("BATCH_MOVE_CONFIG") };
    assert_eq!(cfg.unwrap().chunks_dir, PathBuf::from("out_manifests"));
}

#[test]
#[serial]
fn env_named_missing_config_is_error() {
    let td = tempdir().unwrap();
    unsafe { std::env::set_var("BATCH_MOVE_CONFIG", td.path().join("nope.xml")) };
    let res = load_config(None);
    unsafe { std::env::remove_var("BATCH_MOVE_CONFIG") };
    assert!(res.is_err());
}
