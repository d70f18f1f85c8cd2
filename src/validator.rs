//! Validation orchestrator.
//!
//! Runs the build, the structural check, then reads the feed once and runs
//! the CDATA and binary-content checks over that single read. Every failure
//! is caught here, logged, and recorded in the [`ValidationReport`]; the run
//! stops at the first failing step.
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::build::render_site;
use crate::config::Config;
use crate::feed::{
    check_cdata_sections, check_for_binary_content_with_radius, inspect_structure,
    StructureOutcome,
};
use crate::finding::ValidationFinding;
use crate::report::{Step, ValidationReport};

/// Builds the site (if enabled) and validates the generated feed.
pub fn validate(config: &Config) -> ValidationReport {
    let feed_path = config.feed_file();
    let mut report = ValidationReport::new(feed_path.clone());

    if config.build.enabled {
        if let Err(e) = render_site(&config.build, &config.project_root) {
            tracing::error!(error = %e, "Site build failed, feed not validated");
            report.fail(Step::Build, e.to_string(), None);
            return report;
        }
        report.pass(Step::Build);
    } else {
        tracing::debug!("Site build disabled, validating existing feed");
        report.skip(Step::Build);
    }

    match inspect_structure(&feed_path) {
        StructureOutcome::Valid => {}
        StructureOutcome::NotFound => {
            let reason = format!("RSS feed not found at {}", feed_path.display());
            report.fail(Step::Structure, reason, None);
            return report;
        }
        StructureOutcome::Unparseable(e) => {
            report.fail(Step::Structure, format!("XML parsing error: {}", e), None);
            return report;
        }
        StructureOutcome::Invalid(finding) => {
            fail_with_finding(&mut report, Step::Structure, finding);
            return report;
        }
    }

    let Some(content) = load_content(&mut report, &feed_path) else {
        return report;
    };

    if let Err(finding) = check_cdata_sections(&content) {
        fail_with_finding(&mut report, Step::Cdata, finding);
        return report;
    }
    report.pass(Step::Cdata);

    if let Err(finding) = check_for_binary_content_with_radius(&content, config.context_radius) {
        fail_with_finding(&mut report, Step::Binary, finding);
        return report;
    }
    report.pass(Step::Binary);

    tracing::info!(path = %feed_path.display(), "RSS feed passed all checks");
    report
}

/// Builds the site and validates the feed, returning only the verdict.
pub fn validate_rss_feed(config: &Config) -> bool {
    validate(config).passed()
}

/// Re-reads the feed for the textual checks and closes out the structure step.
///
/// The structure step owns access to the feed file, so a failed read is
/// recorded against it rather than against a check that never ran.
fn load_content(report: &mut ValidationReport, path: &Path) -> Option<String> {
    match read_raw_content(path) {
        Ok((content, digest)) => {
            report.set_content_sha256(digest);
            report.pass(Step::Structure);
            Some(content)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to re-read feed");
            let reason = format!("Failed to read feed file: {}", e);
            report.fail(Step::Structure, reason, None);
            None
        }
    }
}

/// Reads the feed's raw text and its SHA-256.
///
/// Invalid UTF-8 is decoded as U+FFFD so the binary scan reports where the
/// corruption sits instead of the read failing outright.
fn read_raw_content(path: &Path) -> std::io::Result<(String, String)> {
    let bytes = std::fs::read(path)?;
    let digest = format!("{:x}", Sha256::digest(&bytes));
    let content = String::from_utf8_lossy(&bytes).into_owned();
    Ok((content, digest))
}

fn fail_with_finding(report: &mut ValidationReport, step: Step, finding: ValidationFinding) {
    tracing::error!(
        step = %step,
        kind = %finding.kind,
        details = ?finding.details,
        "{}",
        finding.message
    );
    report.fail(step, finding.to_string(), Some(finding));
}
