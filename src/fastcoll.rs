//! Collision oracle backed by Marc Stevens' `fastcoll` tool.
//!
//! Each request writes the prefix into a fresh temporary directory, runs
//! `fastcoll -p <prefix> -o <a> <b>` there and reads back the two files,
//! which contain the prefix followed by the colliding blocks. The directory
//! is removed when the request returns.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::collision::{CollisionOracle, MD5_BLOCK_LEN};
use crate::HashquineError;

#[derive(Debug, Clone)]
pub struct FastcollOracle {
    binary: PathBuf,
}

impl FastcollOracle {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

fn read_tail(path: &Path, prefix: &[u8]) -> Result<Vec<u8>, HashquineError> {
    let mut data = fs::read(path)?;
    if data.len() <= prefix.len() || data[..prefix.len()] != *prefix {
        return Err(HashquineError::Oracle(format!(
            "{} does not extend the requested prefix",
            path.display()
        )));
    }
    Ok(data.split_off(prefix.len()))
}

impl CollisionOracle for FastcollOracle {
    fn request(&mut self, prefix: &[u8]) -> Result<(Vec<u8>, Vec<u8>), HashquineError> {
        if prefix.len() % MD5_BLOCK_LEN != 0 {
            return Err(HashquineError::Internal(format!(
                "collision prefix of {} bytes is not block aligned",
                prefix.len()
            )));
        }
        let dir = tempfile::tempdir()?;
        let prefix_path = dir.path().join("prefix");
        let out_a = dir.path().join("md5_data1");
        let out_b = dir.path().join("md5_data2");
        fs::write(&prefix_path, prefix)?;

        let output = Command::new(&self.binary)
            .arg("-p")
            .arg(&prefix_path)
            .arg("-o")
            .arg(&out_a)
            .arg(&out_b)
            .current_dir(dir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                HashquineError::Oracle(format!("failed to run {}: {e}", self.binary.display()))
            })?;
        if !output.status.success() {
            return Err(HashquineError::Oracle(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok((read_tail(&out_a, prefix)?, read_tail(&out_b, prefix)?))
    }
}
