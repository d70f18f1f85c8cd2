//! Build gate for static-site RSS feeds.
//!
//! Runs the site generator, then checks the generated feed for required RSS
//! elements, balanced CDATA markers and binary or non-printable characters.
//!
//! ```no_run
//! use feedgate::{validate, Config};
//!
//! let report = validate(&Config::for_project("/srv/blog"));
//! print!("{}", report.render_text());
//! std::process::exit(if report.passed() { 0 } else { 1 });
//! ```

pub mod build;
pub mod config;
pub mod feed;
pub mod finding;
pub mod report;
pub mod util;
pub mod validator;

pub use config::Config;
pub use finding::{FindingKind, ValidationFinding};
pub use report::{Step, StepStatus, ValidationReport};
pub use validator::{validate, validate_rss_feed};
