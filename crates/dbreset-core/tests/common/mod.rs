//! Shared fixtures and mock collaborators for procedure integration tests

#![allow(dead_code)]

use dbreset_core::errors::{fs_error, tool_error, Result};
use dbreset_core::{ExclusionSet, Layout, ServiceManager, ServiceStatus, SqlTools};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A stack installation under a temp directory
pub struct StackFixture {
    pub temp: TempDir,
    pub layout: Layout,
}

/// Build a stack layout with the given schema directories in the live
/// data directory and in the snapshot
///
/// Each schema directory gets a `db.opt` marker whose content records
/// which side it came from, so tests can tell snapshot content from
/// carried-forward content.
pub fn stack(live_schemas: &[&str], snapshot_schemas: &[&str]) -> StackFixture {
    let temp = TempDir::new().unwrap();
    let layout = Layout::new(temp.path());

    for schema in live_schemas {
        write_schema(&layout.data_dir(), schema, "live");
    }
    for schema in snapshot_schemas {
        write_schema(&layout.snapshot_dir(), schema, "snapshot");
    }

    fs::write(layout.start_launcher(), b"#!/bin/sh\n").unwrap();
    fs::write(layout.stop_launcher(), b"#!/bin/sh\n").unwrap();

    StackFixture { temp, layout }
}

/// Create `<data_dir>/<schema>/db.opt` marked with the given origin
pub fn write_schema(data_dir: &Path, schema: &str, origin: &str) {
    let dir = data_dir.join(schema);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("db.opt"), format!("{}:{}", origin, schema)).unwrap();
}

/// Read the origin marker of a schema directory
pub fn schema_origin(data_dir: &Path, schema: &str) -> String {
    fs::read_to_string(data_dir.join(schema).join("db.opt")).unwrap()
}

/// Top-level directory names under `path`, sorted
pub fn dir_names(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(path)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Service manager mock that records every call
pub struct RecordingService {
    running: Cell<bool>,
    stops_seen: Cell<usize>,
    fail_nth_stop: Option<usize>,
    pub calls: RefCell<Vec<&'static str>>,
}

impl RecordingService {
    pub fn new(running: bool) -> Self {
        Self {
            running: Cell::new(running),
            stops_seen: Cell::new(0),
            fail_nth_stop: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Make the nth stop call (1-based) fail
    pub fn with_failing_stop(running: bool, nth: usize) -> Self {
        Self {
            fail_nth_stop: Some(nth),
            ..Self::new(running)
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

impl ServiceManager for RecordingService {
    fn status(&self) -> ServiceStatus {
        if self.running.get() {
            ServiceStatus::Running
        } else {
            ServiceStatus::Stopped
        }
    }

    fn start(&self) -> Result<()> {
        self.calls.borrow_mut().push("start");
        self.running.set(true);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.calls.borrow_mut().push("stop");
        let n = self.stops_seen.get() + 1;
        self.stops_seen.set(n);
        if self.fail_nth_stop == Some(n) {
            return Err(tool_error("stop-launcher", "simulated stop failure"));
        }
        self.running.set(false);
        Ok(())
    }
}

/// SQL tools mock that records dump exclusions and restore inputs
pub struct RecordingSql {
    pub dumps: RefCell<Vec<(Vec<String>, PathBuf)>>,
    pub restores: RefCell<Vec<PathBuf>>,
    pub fail_dump: bool,
}

impl RecordingSql {
    pub fn new() -> Self {
        Self {
            dumps: RefCell::new(Vec::new()),
            restores: RefCell::new(Vec::new()),
            fail_dump: false,
        }
    }

    pub fn failing_dump() -> Self {
        Self {
            fail_dump: true,
            ..Self::new()
        }
    }
}

impl SqlTools for RecordingSql {
    fn dump(&self, exclusions: &ExclusionSet, out_file: &Path) -> Result<()> {
        if self.fail_dump {
            return Err(tool_error("mysqldump", "simulated dump failure"));
        }
        self.dumps
            .borrow_mut()
            .push((exclusions.names().to_vec(), out_file.to_path_buf()));
        fs::write(out_file, b"-- dump\n").map_err(|e| fs_error("write_dump", out_file, e))?;
        Ok(())
    }

    fn restore(&self, dump_file: &Path) -> Result<()> {
        self.restores.borrow_mut().push(dump_file.to_path_buf());
        Ok(())
    }
}
