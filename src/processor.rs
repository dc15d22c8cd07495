//! Per image classification of text annotations.

use tracing::{debug, instrument};

use std::fmt;

use crate::config::HarnessConfig;
use crate::region::{self, BoundingPoly, RegionGeometry};
use crate::selector;
use crate::text;

/// One text region reported by the text detection service.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub bounding_poly: Option<BoundingPoly>,
}

impl Annotation {
    pub fn new(text: impl Into<String>, bounding_poly: Option<BoundingPoly>) -> Self {
        Self { text: text.into(), bounding_poly }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Good,
    Bad,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Good => f.write_str("Good"),
            Tag::Bad => f.write_str("Bad"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub tag: Tag,
    pub poly: BoundingPoly,
    pub geometry: RegionGeometry,
    pub normalized: String,
    pub candidates: Vec<String>,
}

impl Classification {
    fn ratio_line(&self) -> String {
        match self.geometry.aspect_ratio {
            Some(ratio) => format!("{} Ratio h/w:{}", self.tag, ratio),
            None => format!("{} Ratio h/w:undefined", self.tag),
        }
    }

    fn write_block(&self, out: &mut String) {
        out.push_str(&self.ratio_line());
        out.push('\n');
        match self.tag {
            Tag::Good => {
                for candidate in &self.candidates {
                    out.push_str(candidate);
                    out.push('\n');
                }
            }
            Tag::Bad => {
                out.push_str(&self.normalized);
                out.push('\n');
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageResult {
    pub good_text: String,
    pub bad_text: String,
    /// empty when no candidate qualified
    pub best_guess: String,
    pub classifications: Vec<Classification>,
}

impl ImageResult {
    pub fn has_guess(&self) -> bool {
        !self.best_guess.is_empty()
    }
}

impl fmt::Display for ImageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- good --")?;
        f.write_str(&self.good_text)?;
        writeln!(f, "-- bad --")?;
        f.write_str(&self.bad_text)?;
        write!(f, "best guess: {}", self.best_guess)
    }
}

/// Classifies a single annotation. Annotations without text or geometry yield `None`.
pub fn classify_annotation(annotation: &Annotation, config: &HarnessConfig) -> Option<Classification> {
    if annotation.text.is_empty() {
        return None;
    }
    let poly = annotation.bounding_poly?;

    let normalized = text::normalize(&annotation.text);
    let candidates = text::extract_candidates(&normalized, config.max_candidate_len);
    let geometry = region::classify(&poly);
    let tag = if geometry.ratio_within(config.min_ratio, config.max_ratio) && !candidates.is_empty() {
        Tag::Good
    } else {
        Tag::Bad
    };
    debug!(%tag, ratio = ?geometry.aspect_ratio, candidates = candidates.len(), "classified region");

    Some(Classification { tag, poly, geometry, normalized, candidates })
}

/// Classifies every annotation of one image and picks the best plate guess
/// from the candidates of all of them.
#[instrument(level = "debug", skip_all, fields(annotations = annotations.len()))]
pub fn process(annotations: &[Annotation], config: &HarnessConfig) -> ImageResult {
    let mut result = ImageResult::default();
    let mut pool: Vec<&str> = Vec::new();

    let classifications: Vec<Classification> = annotations
        .iter()
        .filter_map(|annotation| classify_annotation(annotation, config))
        .collect();

    for classification in &classifications {
        match classification.tag {
            Tag::Good => classification.write_block(&mut result.good_text),
            Tag::Bad => classification.write_block(&mut result.bad_text),
        }
        pool.extend(classification.candidates.iter().map(String::as_str));
    }

    result.best_guess = selector::select_best(&pool);
    result.classifications = classifications;
    result
}
