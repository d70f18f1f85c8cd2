//! Outcome of one validation run.
//!
//! A [`ValidationReport`] records, for each step of the run, whether it
//! passed, failed (with a reason and, for element/CDATA/binary checks, the
//! structured finding) or was skipped. It renders as console text or JSON.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::finding::ValidationFinding;

/// Steps of a validation run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Build,
    Structure,
    Cdata,
    Binary,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Build, Step::Structure, Step::Cdata, Step::Binary];

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Build => "build",
            Step::Structure => "structure",
            Step::Cdata => "cdata",
            Step::Binary => "binary",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed {
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        finding: Option<ValidationFinding>,
    },
    /// Disabled by configuration, or not reached after an earlier failure.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub step: Step,
    #[serde(flatten)]
    pub status: StepStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    feed_path: PathBuf,
    checked_at: DateTime<Utc>,
    /// SHA-256 of the raw feed bytes, once they have been read.
    #[serde(skip_serializing_if = "Option::is_none")]
    content_sha256: Option<String>,
    steps: Vec<StepRecord>,
}

/// JSON shape: the report plus its computed verdict.
#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

impl ValidationReport {
    pub(crate) fn new(feed_path: PathBuf) -> Self {
        Self {
            feed_path,
            checked_at: Utc::now(),
            content_sha256: None,
            steps: Vec::with_capacity(Step::ALL.len()),
        }
    }

    pub(crate) fn pass(&mut self, step: Step) {
        self.record(step, StepStatus::Passed);
    }

    pub(crate) fn skip(&mut self, step: Step) {
        self.record(step, StepStatus::Skipped);
    }

    pub(crate) fn fail(&mut self, step: Step, reason: String, finding: Option<ValidationFinding>) {
        self.record(step, StepStatus::Failed { reason, finding });
        self.skip_remaining();
    }

    pub(crate) fn set_content_sha256(&mut self, digest: String) {
        self.content_sha256 = Some(digest);
    }

    fn record(&mut self, step: Step, status: StepStatus) {
        self.steps.push(StepRecord { step, status });
    }

    /// Marks every step not yet recorded as skipped.
    fn skip_remaining(&mut self) {
        for step in Step::ALL {
            if self.status(step).is_none() {
                self.record(step, StepStatus::Skipped);
            }
        }
    }

    /// True when no step failed and every check step actually ran.
    pub fn passed(&self) -> bool {
        let no_failures = self
            .steps
            .iter()
            .all(|r| !matches!(r.status, StepStatus::Failed { .. }));
        let checks_ran = [Step::Structure, Step::Cdata, Step::Binary]
            .into_iter()
            .all(|step| self.status(step) == Some(&StepStatus::Passed));
        no_failures && checks_ran
    }

    pub fn status(&self, step: Step) -> Option<&StepStatus> {
        self.steps.iter().find(|r| r.step == step).map(|r| &r.status)
    }

    /// The failed step, if any.
    pub fn failure(&self) -> Option<&StepRecord> {
        self.steps
            .iter()
            .find(|r| matches!(r.status, StepStatus::Failed { .. }))
    }

    /// The structured finding behind the failure, if the failing step produced one.
    pub fn finding(&self) -> Option<&ValidationFinding> {
        self.failure().and_then(|r| match &r.status {
            StepStatus::Failed { finding, .. } => finding.as_ref(),
            _ => None,
        })
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn feed_path(&self) -> &Path {
        &self.feed_path
    }

    pub fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    pub fn content_sha256(&self) -> Option<&str> {
        self.content_sha256.as_deref()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&JsonReport {
            passed: self.passed(),
            report: self,
        })
    }

    /// Console rendering: one line per step, then the verdict.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Feed: {}", self.feed_path.display());
        if let Some(digest) = &self.content_sha256 {
            let _ = writeln!(out, "SHA-256: {}", digest);
        }
        for record in &self.steps {
            match &record.status {
                StepStatus::Passed => {
                    let _ = writeln!(out, "  {:<10} passed", record.step);
                }
                StepStatus::Skipped => {
                    let _ = writeln!(out, "  {:<10} skipped", record.step);
                }
                StepStatus::Failed { reason, .. } => {
                    let _ = writeln!(out, "  {:<10} FAILED  {}", record.step, reason);
                }
            }
        }
        if self.passed() {
            out.push_str("RSS feed is valid\n");
        } else {
            out.push_str("RSS feed is invalid\n");
        }
        out
    }
}
