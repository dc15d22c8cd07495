//! Access to the text detection service.
//!
//! Detection results use the JSON shape of a Cloud Vision `TEXT_DETECTION`
//! response: a list of `textAnnotations`, each with a `description` and a
//! `boundingPoly` whose vertices omit coordinates that are zero.

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use tokio::process::Command;
use tokio::runtime;
use tokio::time::timeout;

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use crate::error::PlateError;
use crate::processor::Annotation;
use crate::region::{BoundingPoly, Vertex};

pub trait TextDetector {
    fn detect_text(&self, image: &Path) -> Result<Vec<Annotation>, PlateError>;
}

impl<T: TextDetector + ?Sized> TextDetector for Box<T> {
    fn detect_text(&self, image: &Path) -> Result<Vec<Annotation>, PlateError> {
        (**self).detect_text(image)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VisionPayload {
    Batch { responses: Vec<VisionResponse> },
    Single(VisionResponse),
    Bare(Vec<EntityAnnotation>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VisionResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    error: Option<VisionStatus>,
}

#[derive(Debug, Deserialize)]
struct VisionStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    bounding_poly: Option<VisionPoly>,
}

#[derive(Debug, Deserialize)]
struct VisionPoly {
    #[serde(default)]
    vertices: Vec<Vertex>,
}

impl From<EntityAnnotation> for Annotation {
    fn from(entity: EntityAnnotation) -> Self {
        let bounding_poly = entity
            .bounding_poly
            .and_then(|poly| BoundingPoly::from_vertices(&poly.vertices));
        Annotation::new(entity.description, bounding_poly)
    }
}

fn into_annotations(response: VisionResponse) -> Result<Vec<Annotation>, PlateError> {
    if let Some(status) = response.error {
        return Err(PlateError::detector(format!(
            "service returned error {}: {}",
            status.code, status.message
        )));
    }
    Ok(response.text_annotations.into_iter().map(Annotation::from).collect())
}

/// Parses a detection response into annotations, in service order.
pub fn parse_annotations(json: &str) -> Result<Vec<Annotation>, PlateError> {
    let payload: VisionPayload = serde_json::from_str(json)?;
    match payload {
        VisionPayload::Batch { responses } => {
            let mut annotations = Vec::new();
            for response in responses {
                annotations.extend(into_annotations(response)?);
            }
            Ok(annotations)
        }
        VisionPayload::Single(response) => into_annotations(response),
        VisionPayload::Bare(entities) => Ok(entities.into_iter().map(Annotation::from).collect()),
    }
}

/// Reads detection results saved next to each image, as `car.jpg.json` or `car.json`.
#[derive(Debug, Clone, Default)]
pub struct SidecarDetector;

impl SidecarDetector {
    pub fn sidecar_path(image: &Path) -> Option<PathBuf> {
        let mut appended = image.as_os_str().to_owned();
        appended.push(".json");
        let appended = PathBuf::from(appended);
        if appended.is_file() {
            return Some(appended);
        }
        let replaced = image.with_extension("json");
        if replaced != image && replaced.is_file() {
            return Some(replaced);
        }
        None
    }
}

impl TextDetector for SidecarDetector {
    #[instrument(level = "debug", skip(self))]
    fn detect_text(&self, image: &Path) -> Result<Vec<Annotation>, PlateError> {
        let sidecar = Self::sidecar_path(image).ok_or_else(|| {
            PlateError::detector(format!("no detection result stored for {}", image.display()))
        })?;
        debug!(sidecar = %sidecar.display(), "reading stored detection");
        let json = std::fs::read_to_string(&sidecar)?;
        parse_annotations(&json)
    }
}

/// Runs an external program with the image path as its last argument and
/// parses the detection response it prints on stdout.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandDetector {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self { program: program.into(), args: Vec::new(), timeout }
    }

    /// Splits a command line on whitespace into program and leading arguments.
    pub fn from_command_line(command_line: &str, timeout: Duration) -> Result<Self, PlateError> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts
            .next()
            .ok_or_else(|| PlateError::detector("detector command is empty"))?;
        Ok(Self { program, args: parts.collect(), timeout })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl CommandDetector {
    async fn run(&self, image: &Path) -> Result<Output, PlateError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(image)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PlateError::detector(format!("failed to start {}: {}", self.program, e)))?;

        // output collection runs until stdout closes, so it sits under the same deadline
        match timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => Ok(output?),
            Err(_) => {
                warn!(timeout = ?self.timeout, "text detection timed out, killing detector");
                Err(PlateError::detector(format!(
                    "{} did not finish within {:?}",
                    self.program, self.timeout
                )))
            }
        }
    }
}

impl TextDetector for CommandDetector {
    #[instrument(level = "debug", skip(self), fields(program = %self.program))]
    fn detect_text(&self, image: &Path) -> Result<Vec<Annotation>, PlateError> {
        let runtime = runtime::Builder::new_current_thread().enable_all().build()?;
        let output = runtime.block_on(self.run(image))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlateError::detector(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        if stdout.trim().is_empty() {
            return Err(PlateError::detector(format!("{} printed no detection result", self.program)));
        }
        parse_annotations(&stdout)
    }
}
