//! Diagnostics and build-context collaborators.
//!
//! `spec.md` treats these as external interfaces the compiler core talks to
//! but never defines itself: a front-end driver decides where messages go,
//! and what the "compilation package" even is. This module supplies the
//! trait boundary plus one concrete implementation
//! ([`StderrDiagnostics`]) built on `log`, the same crate
//! `delvinru-apk-info`'s CLI initializes via `env_logger` at startup.

use crate::source::Source;

/// Severity-tagged message sink. `ResourceTable`/`TableMerger` call through
/// this trait instead of returning every note as a hard error, matching
/// aapt2's `IDiagnostics` (`note`/`warn`/`error`).
pub trait Diagnostics {
    fn note(&mut self, source: &Source, message: &str);
    fn warn(&mut self, source: &Source, message: &str);
    fn error(&mut self, source: &Source, message: &str);
}

/// Routes diagnostics through the `log` crate at the matching level, with
/// the source location folded into the message the way aapt2 prefixes
/// console output with `file:line:`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrDiagnostics;

impl Diagnostics for StderrDiagnostics {
    fn note(&mut self, source: &Source, message: &str) {
        log::debug!("{}: {}", source, message);
    }

    fn warn(&mut self, source: &Source, message: &str) {
        log::warn!("{}: {}", source, message);
    }

    fn error(&mut self, source: &Source, message: &str) {
        log::error!("{}: {}", source, message);
    }
}

/// The ambient facts a compilation needs but that don't belong on
/// `ResourceTable` itself: which package is "ours" for unqualified
/// references, and what ID it's been assigned (if any yet).
///
/// Mirrors aapt2's `IAaptContext::getCompilationPackage`/`getPackageId`.
pub trait BuildContext {
    fn compilation_package(&self) -> &str;
    fn package_id(&self) -> Option<u8>;
}

/// A fixed, in-memory `BuildContext` — enough for tests and for
/// `restable-cli`'s demo invocations, where there's no larger build graph
/// to consult.
#[derive(Debug, Clone)]
pub struct StaticBuildContext {
    pub package: String,
    pub package_id: Option<u8>,
}

impl StaticBuildContext {
    pub fn new(package: impl Into<String>, package_id: Option<u8>) -> Self {
        StaticBuildContext {
            package: package.into(),
            package_id,
        }
    }
}

impl BuildContext for StaticBuildContext {
    fn compilation_package(&self) -> &str {
        &self.package
    }

    fn package_id(&self) -> Option<u8> {
        self.package_id
    }
}
