//! Chart generation models

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::utils::ServiceError;

/// A single historical observation for a fixed currency pair
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub base: String,
    pub target: String,
    pub rate: f64,
}

/// Rates collected over a trailing window, oldest first.
///
/// Dates whose lookup failed are left out and only counted in `failed_days`.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub base: String,
    pub target: String,
    pub days: u32,
    pub points: Vec<HistoricalPoint>,
    pub failed_days: usize,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min_rate(&self) -> f64 {
        self.points.iter().map(|p| p.rate).fold(f64::INFINITY, f64::min)
    }

    pub fn max_rate(&self) -> f64 {
        self.points.iter().map(|p| p.rate).fold(f64::NEG_INFINITY, f64::max)
    }
}

/// A rendered chart on disk. The holder is responsible for removing it.
#[derive(Debug)]
pub struct ChartFile {
    pub path: PathBuf,
    pub points: usize,
    pub failed_days: usize,
}

impl ChartFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the image file
    pub fn remove(self) -> Result<(), ServiceError> {
        std::fs::remove_file(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn chart_file(path: PathBuf) -> ChartFile {
        ChartFile {
            path,
            points: 1,
            failed_days: 0,
        }
    }

    #[test]
    fn test_remove_deletes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart_USD_RUB.png");
        std::fs::write(&path, b"png").unwrap();

        chart_file(path.clone()).remove().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_remove_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.png");

        let err = chart_file(path).remove().unwrap_err();

        match err {
            ServiceError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
