//! Tesseract CLI recognition engine.
//!
//! Invokes the `tesseract` binary in TSV output mode and aggregates its
//! word-level results into one text + confidence + bounding box per region.
//! The engine is an external collaborator; a missing binary surfaces as
//! [`RecognizeError::EngineUnavailable`], not a crash.

use std::io::Write;
use std::process::Command;

use tracing::{debug, warn};

use crate::document::BoundingBox;
use crate::recognize::{BitmapRegion, RecognizeError, Recognizer, RegionText};

pub struct TesseractRecognizer {
    command: String,
    language: String,
}

impl TesseractRecognizer {
    #[must_use]
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    /// Probes whether the engine binary can be invoked at all.
    #[must_use]
    pub fn available(command: &str) -> bool {
        Command::new(command)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn recognize_region(&self, region: &BitmapRegion) -> Result<RegionText, RecognizeError> {
        let mut file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .map_err(|e| RecognizeError::Engine {
                message: format!("failed to stage region image: {e}"),
            })?;
        file.write_all(&region.data).map_err(|e| RecognizeError::Engine {
            message: format!("failed to stage region image: {e}"),
        })?;

        let output = Command::new(&self.command)
            .arg(file.path())
            .arg("stdout")
            .args(["-l", &self.language])
            .args(["--psm", "3"])
            .arg("tsv")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecognizeError::EngineUnavailable {
                        engine: self.command.clone(),
                    }
                } else {
                    RecognizeError::Engine {
                        message: e.to_string(),
                    }
                }
            })?;

        if !output.status.success() {
            return Err(RecognizeError::Engine {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let (text, confidence, bbox) = parse_tsv(&tsv);

        if text.is_empty() {
            warn!(block_id = %region.block_id, "engine returned no text for region");
        }
        debug!(
            block_id = %region.block_id,
            confidence,
            "recognized region"
        );

        Ok(RegionText {
            block_id: region.block_id.clone(),
            text,
            confidence,
            bbox: bbox.unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0)),
        })
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, regions: &[BitmapRegion]) -> Result<Vec<RegionText>, RecognizeError> {
        regions
            .iter()
            .map(|region| self.recognize_region(region))
            .collect()
    }

    fn name(&self) -> &str {
        &self.command
    }
}

/// Aggregates tesseract TSV word rows into region text.
///
/// Rows: level, page, block, par, line, word, left, top, width, height,
/// conf, text. Words are grouped into lines by the line number column;
/// confidence is the mean over recognized words, scaled to `[0, 1]`.
fn parse_tsv(tsv: &str) -> (String, f32, Option<BoundingBox>) {
    let mut lines: Vec<(u32, Vec<String>)> = Vec::new();
    let mut confidence_sum = 0.0f32;
    let mut word_count = 0usize;
    let mut bbox: Option<BoundingBox> = None;

    for row in tsv.lines().skip(1) {
        let columns: Vec<&str> = row.split('\t').collect();
        if columns.len() < 12 {
            continue;
        }

        let conf: f32 = columns[10].parse().unwrap_or(-1.0);
        let word = columns[11].trim();
        if conf < 0.0 || word.is_empty() {
            continue;
        }

        let line_key = {
            let block: u32 = columns[2].parse().unwrap_or(0);
            let par: u32 = columns[3].parse().unwrap_or(0);
            let line: u32 = columns[4].parse().unwrap_or(0);
            block * 10_000 + par * 100 + line
        };

        if let (Ok(left), Ok(top), Ok(width), Ok(height)) = (
            columns[6].parse::<f32>(),
            columns[7].parse::<f32>(),
            columns[8].parse::<f32>(),
            columns[9].parse::<f32>(),
        ) {
            let word_box = BoundingBox::new(left, top, left + width, top + height);
            bbox = Some(match bbox {
                Some(existing) => existing.union(&word_box),
                None => word_box,
            });
        }

        confidence_sum += conf;
        word_count += 1;

        match lines.last_mut() {
            Some((key, words)) if *key == line_key => words.push(word.to_string()),
            _ => lines.push((line_key, vec![word.to_string()])),
        }
    }

    let text = lines
        .iter()
        .map(|(_, words)| words.join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    let confidence = if word_count > 0 {
        (confidence_sum / word_count as f32) / 100.0
    } else {
        0.0
    };

    (text, confidence, bbox)
}
