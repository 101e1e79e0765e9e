//! Dump and restore collaborators
//!
//! The dump and client utilities are opaque executables; this module owns
//! only their invocation shape. Both operations are behind a trait so
//! tests can substitute a recording mock.

use crate::errors::{fs_error, tool_error, Result};
use crate::exclusions::ExclusionSet;
use crate::layout::Layout;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Full export and re-import of database contents
pub trait SqlTools {
    /// Dump all objects except the excluded schemas into `out_file`,
    /// overwriting it if present
    fn dump(&self, exclusions: &ExclusionSet, out_file: &Path) -> Result<()>;

    /// Re-import a dump file by feeding its bytes to the client utility
    fn restore(&self, dump_file: &Path) -> Result<()>;
}

/// Production implementation invoking the bundled mysqldump/mysql binaries
#[derive(Debug)]
pub struct MysqlTools {
    dump_bin: PathBuf,
    client_bin: PathBuf,
}

impl MysqlTools {
    pub fn new(dump_bin: impl Into<PathBuf>, client_bin: impl Into<PathBuf>) -> Self {
        Self {
            dump_bin: dump_bin.into(),
            client_bin: client_bin.into(),
        }
    }

    pub fn from_layout(layout: &Layout) -> Self {
        Self::new(layout.mysqldump_bin(), layout.mysql_bin())
    }

    /// Argument list for the dump invocation: authentication, all
    /// objects, one exclusion flag per schema, output file
    fn dump_args(exclusions: &ExclusionSet, out_file: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            OsString::from("-u"),
            OsString::from("root"),
            OsString::from("--all-databases"),
        ];
        for flag in exclusions.ignore_flags() {
            args.push(OsString::from(flag));
        }
        let mut result_file = OsString::from("--result-file=");
        result_file.push(out_file.as_os_str());
        args.push(result_file);
        args
    }

    fn run_checked(tool: &Path, command: &mut Command) -> Result<()> {
        let output = command.output().map_err(|e| {
            tool_error(
                tool.display().to_string(),
                format!("failed to launch: {}", e),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(tool_error(
                tool.display().to_string(),
                format!(
                    "exit status {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            ));
        }

        Ok(())
    }
}

impl SqlTools for MysqlTools {
    fn dump(&self, exclusions: &ExclusionSet, out_file: &Path) -> Result<()> {
        tracing::info!(out_file = %out_file.display(), "exporting databases");
        let mut command = Command::new(&self.dump_bin);
        command.args(Self::dump_args(exclusions, out_file));
        Self::run_checked(&self.dump_bin, &mut command)
    }

    fn restore(&self, dump_file: &Path) -> Result<()> {
        tracing::info!(dump_file = %dump_file.display(), "importing dump");
        let input = File::open(dump_file).map_err(|e| fs_error("open_dump", dump_file, e))?;

        let mut command = Command::new(&self.client_bin);
        command
            .arg("-u")
            .arg("root")
            .stdin(Stdio::from(input));
        Self::run_checked(&self.client_bin, &mut command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_args_shape() {
        let exclusions = ExclusionSet::standard();
        let args = MysqlTools::dump_args(&exclusions, Path::new("/stack/backup.sql"));
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();

        assert_eq!(args[0], "-u");
        assert_eq!(args[1], "root");
        assert_eq!(args[2], "--all-databases");
        assert!(args.last().unwrap().starts_with("--result-file="));
        assert!(args.last().unwrap().ends_with("backup.sql"));
    }

    #[test]
    fn test_dump_args_one_exclusion_flag_per_schema() {
        let exclusions = ExclusionSet::standard();
        let args = MysqlTools::dump_args(&exclusions, Path::new("/out.sql"));
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();

        let ignore_flags: Vec<&String> = args
            .iter()
            .filter(|a| a.starts_with("--ignore-database="))
            .collect();
        assert_eq!(ignore_flags.len(), exclusions.names().len());

        for name in exclusions.names() {
            let expected = format!("--ignore-database={}", name);
            let count = ignore_flags
                .iter()
                .filter(|f| f.as_str() == expected.as_str())
                .count();
            assert_eq!(count, 1, "expected exactly one flag for {}", name);
        }
    }

    #[test]
    fn test_restore_fails_when_dump_file_missing() {
        let tools = MysqlTools::new("/no/such/mysqldump", "/no/such/mysql");
        let err = tools.restore(Path::new("/no/such/backup.sql")).unwrap_err();
        assert_eq!(err.code(), "ERR_FILESYSTEM");
    }
}
