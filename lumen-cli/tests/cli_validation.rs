use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::Result;
use assert_cmd::prelude::*;
use tempfile::tempdir;

use lumen_test_utils::{gradient_image, write_png};

fn lumen(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lumen"));
    cmd.current_dir(dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stderr_of(cmd: &mut Command) -> String {
    let output = cmd.assert().failure().get_output().clone();
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_config(dir: &Path, body: &str) -> Result<()> {
    fs::create_dir_all(dir.join("config"))?;
    fs::write(dir.join("config/default.toml"), body)?;
    Ok(())
}

#[test]
fn unknown_backend_fails_before_reading_files() -> Result<()> {
    let temp = tempdir()?;
    let stderr = stderr_of(lumen(temp.path()).args(["--backend", "bogus"]));
    assert!(stderr.contains("unknown backend 'bogus'"), "{stderr}");
    Ok(())
}

#[test]
fn discrete_backend_requires_a_device() -> Result<()> {
    let temp = tempdir()?;
    let stderr = stderr_of(lumen(temp.path()).args(["-b", "axcl", "-d", "-1"]));
    assert!(stderr.contains("requires device_id >= 0"), "{stderr}");
    Ok(())
}

#[test]
fn device_below_minus_one_is_rejected() -> Result<()> {
    let temp = tempdir()?;
    let stderr = stderr_of(lumen(temp.path()).args(["--device_id", "-2"]));
    assert!(stderr.contains("device_id must be >= -1"), "{stderr}");
    Ok(())
}

#[test]
fn missing_configuration_is_reported() -> Result<()> {
    let temp = tempdir()?;
    let stderr = stderr_of(&mut lumen(temp.path()));
    assert!(stderr.contains("failed to load configuration"), "{stderr}");
    Ok(())
}

#[test]
fn crop_larger_than_target_is_rejected_before_model_load() -> Result<()> {
    let temp = tempdir()?;
    write_config(
        temp.path(),
        "model_path = \"absent.onnx\"\n[preprocess]\ntarget_size = [128, 128]\ncrop_size = [224, 224]\n",
    )?;
    let stderr = stderr_of(&mut lumen(temp.path()));
    assert!(stderr.contains("invalid crop configuration"), "{stderr}");
    assert!(!stderr.contains("model file not found"), "{stderr}");
    Ok(())
}

#[test]
fn missing_model_is_reported() -> Result<()> {
    let temp = tempdir()?;
    write_config(temp.path(), "model_path = \"absent.onnx\"\n")?;
    let image = temp.path().join("input.png");
    write_png(&image, &gradient_image(40, 30))?;

    let stderr = stderr_of(lumen(temp.path()).args(["--image", image.to_str().unwrap()]));
    assert!(stderr.contains("model file not found"), "{stderr}");
    Ok(())
}

#[test]
fn environment_variables_override_files() -> Result<()> {
    let temp = tempdir()?;
    write_config(temp.path(), "model_path = \"absent.onnx\"\n")?;
    let stderr = stderr_of(
        lumen(temp.path()).env("LUMEN__INFERENCE__REPETITIONS", "0"),
    );
    assert!(stderr.contains("repetitions must be at least 1"), "{stderr}");
    Ok(())
}
