//! Round-trip and replacement coverage for `persist`.

use std::fs;

use anyhow::{Context, Result, bail, ensure};
use confbind::{BindError, OS_NAME, PropertyMap, SystemSnapshot, load_props, persist};
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn unix_system() -> SystemSnapshot {
    SystemSnapshot::default().with_property(OS_NAME, "Linux")
}

#[fixture]
fn windows_system() -> SystemSnapshot {
    SystemSnapshot::default().with_property(OS_NAME, "Windows 11")
}

#[fixture]
fn sample() -> PropertyMap {
    PropertyMap::from([
        ("server.host".to_owned(), "localhost".to_owned()),
        ("server.port".to_owned(), "8080".to_owned()),
        ("greeting".to_owned(), "grüß dich = hallo # wirklich".to_owned()),
        ("multi.line".to_owned(), "first\nsecond".to_owned()),
    ])
}

#[rstest]
fn persist_round_trips_on_the_atomic_path(
    unix_system: SystemSnapshot,
    sample: PropertyMap,
) -> Result<()> {
    let dir = TempDir::new()?;
    let target = dir.path().join("app.properties");
    persist(&target, &sample, &unix_system)?;
    let reread = load_props(&target)?;
    ensure!(reread == sample, "round trip changed the mapping: {reread:?}");
    Ok(())
}

#[rstest]
fn persist_round_trips_on_the_overwrite_path(
    windows_system: SystemSnapshot,
    sample: PropertyMap,
) -> Result<()> {
    let dir = TempDir::new()?;
    let target = dir.path().join("app.properties");
    persist(&target, &sample, &windows_system)?;
    let reread = load_props(&target)?;
    ensure!(reread == sample, "round trip changed the mapping: {reread:?}");
    Ok(())
}

#[rstest]
fn second_persist_fully_replaces_the_first(unix_system: SystemSnapshot) -> Result<()> {
    let dir = TempDir::new()?;
    let target = dir.path().join("app.properties");
    let first = PropertyMap::from([
        ("only.in.first".to_owned(), "1".to_owned()),
        ("shared".to_owned(), "old".to_owned()),
    ]);
    let second = PropertyMap::from([("shared".to_owned(), "new".to_owned())]);
    persist(&target, &first, &unix_system)?;
    persist(&target, &second, &unix_system)?;
    let reread = load_props(&target)?;
    ensure!(reread == second, "stale entries survived: {reread:?}");
    let text = fs::read_to_string(&target)?;
    ensure!(
        !text.contains("only.in.first"),
        "first mapping leaked into the file: {text}"
    );
    Ok(())
}

#[rstest]
fn persist_creates_missing_ancestor_directories(
    unix_system: SystemSnapshot,
    sample: PropertyMap,
) -> Result<()> {
    let dir = TempDir::new()?;
    let target = dir.path().join("a/b/c/app.properties");
    persist(&target, &sample, &unix_system)?;
    ensure!(load_props(&target)? == sample, "mapping did not round trip");
    Ok(())
}

#[rstest]
fn persist_leaves_no_temporary_files_behind(
    unix_system: SystemSnapshot,
    sample: PropertyMap,
) -> Result<()> {
    let dir = TempDir::new()?;
    let target = dir.path().join("app.properties");
    persist(&target, &sample, &unix_system)?;
    let entries: Vec<_> = fs::read_dir(dir.path())?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<_>>()?;
    ensure!(
        entries.len() == 1,
        "expected only the target in {entries:?}"
    );
    Ok(())
}

#[rstest]
fn failed_rename_keeps_temp_file_and_target(
    unix_system: SystemSnapshot,
    sample: PropertyMap,
) -> Result<()> {
    let dir = TempDir::new()?;
    // A directory at the target path makes the final rename fail.
    let target = dir.path().join("app.properties");
    fs::create_dir(&target)?;
    let marker = target.join("keep.txt");
    fs::write(&marker, "prior content")?;

    let err = match persist(&target, &sample, &unix_system) {
        Ok(()) => bail!("expected persist onto a directory to fail"),
        Err(err) => err,
    };
    let BindError::Rename { from, to, .. } = err else {
        bail!("expected Rename error, got {err}");
    };
    ensure!(to == target, "error names the wrong target: {to:?}");
    ensure!(from.is_file(), "temporary file was not left behind");
    ensure!(
        load_props(&from)? == sample,
        "orphaned temporary file does not hold the complete new content"
    );
    ensure!(target.is_dir(), "target path was disturbed");
    ensure!(
        fs::read_to_string(&marker)? == "prior content",
        "prior target content was not preserved"
    );
    Ok(())
}

#[rstest]
fn persisted_file_starts_with_a_comment_line(
    unix_system: SystemSnapshot,
    sample: PropertyMap,
) -> Result<()> {
    let dir = TempDir::new()?;
    let target = dir.path().join("app.properties");
    persist(&target, &sample, &unix_system)?;
    let text = fs::read_to_string(&target)?;
    let first_line = text.lines().next().context("persisted file is empty")?;
    ensure!(
        first_line.starts_with('#'),
        "expected a leading comment, got {first_line:?}"
    );
    Ok(())
}

#[rstest]
fn empty_mapping_persists_and_reads_back_empty(unix_system: SystemSnapshot) -> Result<()> {
    let dir = TempDir::new()?;
    let target = dir.path().join("empty.properties");
    persist(&target, &PropertyMap::new(), &unix_system)?;
    ensure!(load_props(&target)?.is_empty(), "expected no entries");
    Ok(())
}
