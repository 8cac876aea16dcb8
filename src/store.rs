//! The data directory: daily schedules, the two master documents and their
//! dated snapshots.
//!
//! Masters are whole documents. They are read once, rebuilt in memory and
//! published by writing a dated snapshot and then swapping a copy of it in
//! over the canonical file with a rename, so a reader never sees a
//! half-written master.
use crate::context::RunContext;
use anyhow::{Context, Result};
use gameday_api::Schedule;
use log::{debug, error, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterKind {
    Team,
    Player,
}

impl MasterKind {
    fn stem(&self) -> &'static str {
        match self {
            MasterKind::Team => "teamMaster",
            MasterKind::Player => "playerMaster",
        }
    }
}

/// The date's schedule has not been published (or could not be read).
/// Expected when running ahead of the source; not a failure.
#[derive(Debug)]
pub struct ScheduleUnavailable {
    pub ctx: RunContext,
    pub reason: String,
}

impl fmt::Display for ScheduleUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} schedule not available: {}", self.ctx, self.reason)
    }
}

impl std::error::Error for ScheduleUnavailable {}

/// A snapshot written but not yet promoted to canonical.
#[derive(Debug)]
pub struct Snapshot {
    kind: MasterKind,
    path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    /// Open the data directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            info!("Creating data directory: {}", root.display());
            fs::create_dir_all(&root)
                .with_context(|| format!("could not create data directory {}", root.display()))?;
        }
        Ok(Self { root })
    }

    /// Open an existing data directory without creating anything.
    pub fn existing(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn schedule_path(&self, ctx: &RunContext) -> PathBuf {
        self.root.join(format!("schedule_{}.json", ctx.stamp()))
    }

    pub fn master_path(&self, kind: MasterKind) -> PathBuf {
        self.root.join(format!("{}.json", kind.stem()))
    }

    pub fn snapshot_path(&self, kind: MasterKind, ctx: &RunContext) -> PathBuf {
        self.root.join(format!("{}_{}.json", kind.stem(), ctx.stamp()))
    }

    pub fn save_schedule(&self, ctx: &RunContext, schedule: &Schedule) -> Result<PathBuf> {
        let path = self.schedule_path(ctx);
        info!("{ctx} Creating daily schedule file: {}", path.display());
        write_atomic(&path, &to_pretty_json(schedule)?)?;
        Ok(path)
    }

    /// A missing or unreadable schedule file is reported as
    /// [`ScheduleUnavailable`].
    pub fn load_schedule(&self, ctx: &RunContext) -> Result<Schedule, ScheduleUnavailable> {
        let path = self.schedule_path(ctx);
        info!("{ctx} Loading daily schedule from: {}", path.display());
        let unavailable = |reason: String| ScheduleUnavailable { ctx: *ctx, reason };

        let contents = fs::read_to_string(&path)
            .map_err(|e| unavailable(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&contents).map_err(|e| unavailable(format!("{}: {e}", path.display())))
    }

    /// Load a canonical master. A missing file is an empty master; an
    /// unparseable one is an error, so a bad file never gets replaced by a
    /// near-empty one.
    pub fn load_master<T>(&self, kind: MasterKind) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.master_path(kind);
        if !path.exists() {
            info!("No {} yet, starting a new one", path.display());
            return Ok(T::default());
        }
        let contents =
            fs::read_to_string(&path).with_context(|| format!("could not read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("corrupt master file {}", path.display()))
    }

    /// Write the dated snapshot of a master. The canonical file is untouched
    /// until [`DataStore::promote_all`].
    pub fn write_snapshot<T: Serialize>(
        &self,
        kind: MasterKind,
        ctx: &RunContext,
        master: &T,
    ) -> Result<Snapshot> {
        let path = self.snapshot_path(kind, ctx);
        info!("{ctx} Creating {} snapshot: {}", kind.stem(), path.display());
        write_atomic(&path, &to_pretty_json(master)?)?;
        Ok(Snapshot { kind, path })
    }

    /// Replace the canonical masters with copies of their snapshots. Every
    /// snapshot is copied to its staging file before any rename, so a failed
    /// copy leaves all canonical files as they were.
    pub fn promote_all(&self, snapshots: &[Snapshot]) -> Result<()> {
        let mut staged = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let canonical = self.master_path(snapshot.kind);
            let staging = staging_path(&canonical);
            if let Err(e) = fs::copy(&snapshot.path, &staging) {
                discard(staged.iter().map(|(staging, _)| staging));
                return Err(e).with_context(|| {
                    format!("could not copy {} to {}", snapshot.path.display(), staging.display())
                });
            }
            staged.push((staging, canonical));
        }

        for (i, (staging, canonical)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(staging, canonical) {
                for (_, done) in &staged[..i] {
                    error!("{} was already replaced and is ahead of {}", done.display(), canonical.display());
                }
                discard(staged[i..].iter().map(|(staging, _)| staging));
                return Err(e).with_context(|| format!("could not replace {}", canonical.display()));
            }
            debug!("{} replaced from its snapshot", canonical.display());
        }
        Ok(())
    }
}

fn discard<'a>(paths: impl Iterator<Item = &'a PathBuf>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("could not remove staging file {}: {e}", path.display());
        }
    }
}

/// Four-space indented JSON, map keys in sorted order.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer).context("could not serialize document")?;
    out.push(b'\n');
    Ok(out)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write to a sibling temp file, then rename over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let staging = staging_path(path);
    fs::write(&staging, bytes).with_context(|| format!("could not write {}", staging.display()))?;
    fs::rename(&staging, path).with_context(|| format!("could not replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("sandlot_{name}"));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}
