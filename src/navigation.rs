//! Stepping back and forth through a list of images.
//!
//! All state lives in one [`Session`] behind a mutex that stays locked for the
//! whole step, so at most one image is being processed at any time.

use tracing::{debug, warn};

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::detector::TextDetector;
use crate::error::PlateError;
use crate::processor::ImageResult;
use crate::PlateTester;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Default)]
pub struct Session {
    files: Vec<PathBuf>,
    cursor: Option<usize>,
    last_result: Option<ImageResult>,
}

impl Session {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files, cursor: None, last_result: None }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn last_result(&self) -> Option<&ImageResult> {
        self.last_result.as_ref()
    }

    /// Moves the cursor with wraparound. `None` when there is nothing to move over.
    pub fn step(&mut self, direction: Direction) -> Option<usize> {
        let len = self.files.len();
        if len == 0 {
            return None;
        }
        let next = match (direction, self.cursor) {
            (Direction::Forward, None) => 0,
            (Direction::Forward, Some(i)) => (i + 1) % len,
            (Direction::Backward, None) | (Direction::Backward, Some(0)) => len - 1,
            (Direction::Backward, Some(i)) => (i - 1).min(len - 1),
        };
        self.cursor = Some(next);
        Some(next)
    }
}

pub struct Navigator<D> {
    tester: PlateTester<D>,
    session: Mutex<Session>,
}

impl<D: TextDetector> Navigator<D> {
    pub fn new(tester: PlateTester<D>, files: Vec<PathBuf>) -> Self {
        Self { tester, session: Mutex::new(Session::new(files)) }
    }

    pub fn tester(&self) -> &PlateTester<D> {
        &self.tester
    }

    /// Replaces the file list and starts over before the first file.
    pub fn load_files(&self, files: Vec<PathBuf>) {
        *self.lock() = Session::new(files);
    }

    pub fn len(&self) -> usize {
        self.lock().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cursor(&self) -> Option<usize> {
        self.lock().cursor
    }

    pub fn last_result(&self) -> Option<ImageResult> {
        self.lock().last_result.clone()
    }

    pub fn next(&self) -> Result<Option<(PathBuf, ImageResult)>, PlateError> {
        self.step(Direction::Forward)
    }

    pub fn previous(&self) -> Result<Option<(PathBuf, ImageResult)>, PlateError> {
        self.step(Direction::Backward)
    }

    /// Moves to the neighbouring image and processes it.
    ///
    /// Returns `Ok(None)` without touching anything when there are no files.
    /// When processing fails the cursor has still moved, but the last result
    /// is kept as it was.
    pub fn step(&self, direction: Direction) -> Result<Option<(PathBuf, ImageResult)>, PlateError> {
        let mut session = self.lock();
        let index = match session.step(direction) {
            Some(index) => index,
            None => {
                debug!("no files to navigate");
                return Ok(None);
            }
        };
        let path = session.files[index].clone();
        debug!(index, path = %path.display(), ?direction, "navigating");

        match self.tester.process_file(&path) {
            Ok(result) => {
                session.last_result = Some(result.clone());
                Ok(Some((path, result)))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "processing failed, keeping previous result");
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
