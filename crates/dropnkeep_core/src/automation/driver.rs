//! Composer automation state machine.
//!
//! # Responsibility
//! - Open, populate and commit one note through a foreign document.
//! - Convert every internal fault into a `NoteResult`.
//!
//! # Invariants
//! - One attempt per call; the driver never retries internally.
//! - Only the composer wait and the settle delay suspend, both through
//!   `Clock::sleep`, and both are bounded.
//! - Element handles live for one attempt only.
//! - Regions are used in discovery order: first is title, second is body.
//!   This mirrors the usual foreign layout and is not verified.

use crate::automation::clock::{bounded_wait, Clock, WaitError, WaitPolicy};
use crate::automation::document::{DocumentError, ForeignDocument};
use crate::automation::lookup::LookupTable;
use crate::automation::selector::SelectorList;
use crate::model::note::{NoteRequest, NoteResult};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
const DEFAULT_COMPOSER_TIMEOUT_MS: u64 = 3000;
const DEFAULT_SETTLE_DELAY_MS: u64 = 800;

/// Anything that can turn a `NoteRequest` into a `NoteResult`.
///
/// Implementations must not fail: every fault becomes an unsuccessful
/// result.
pub trait NoteComposer {
    fn create_note(&self, request: &NoteRequest) -> impl Future<Output = NoteResult>;
}

/// Timing knobs for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Composer readiness polling interval.
    pub poll_interval: Duration,
    /// Hard deadline for the composer to render.
    pub composer_timeout: Duration,
    /// Quiescence period after committing, for the foreign autosave.
    pub settle_delay: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            composer_timeout: Duration::from_millis(DEFAULT_COMPOSER_TIMEOUT_MS),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
        }
    }
}

/// Explicit automation states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    Idle,
    Locating,
    WaitingForComposer,
    Populating,
    Committing,
    Settling,
    Done,
    Failed,
}

impl ComposerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Locating => "locating",
            Self::WaitingForComposer => "waiting_for_composer",
            Self::Populating => "populating",
            Self::Committing => "committing",
            Self::Settling => "settling",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Result plus the visited state sequence, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationReport {
    pub result: NoteResult,
    pub states: Vec<ComposerState>,
}

/// Faults raised inside an attempt. Never escapes the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomationError {
    ComposerTimeout { waited_ms: u128 },
    Document(DocumentError),
}

impl Display for AutomationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ComposerTimeout { waited_ms } => {
                write!(f, "note composer did not appear within {waited_ms} ms")
            }
            Self::Document(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AutomationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ComposerTimeout { .. } => None,
            Self::Document(err) => Some(err),
        }
    }
}

impl From<DocumentError> for AutomationError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

/// One text assignment to a discovered region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionWrite {
    /// Index into the discovered region list.
    pub region: usize,
    pub text: String,
}

/// Decides which text goes into which region.
///
/// | title | body | regions | writes                       |
/// |-------|------|---------|------------------------------|
/// | yes   | yes  | >= 2    | title -> 0, body -> 1        |
/// | yes   | yes  | 1       | "title\nbody" -> 0           |
/// | yes   | no   | >= 1    | title -> 0                   |
/// | no    | yes  | >= 1    | body -> 0                    |
///
/// Everything else writes nothing.
pub fn plan_population(title: &str, body: &str, region_count: usize) -> Vec<RegionWrite> {
    if region_count == 0 {
        return Vec::new();
    }
    let write = |region: usize, text: String| RegionWrite { region, text };

    match (!title.is_empty(), !body.is_empty()) {
        (true, true) if region_count >= 2 => vec![
            write(0, title.to_string()),
            write(1, body.to_string()),
        ],
        (true, true) => vec![write(0, format!("{title}\n{body}"))],
        (true, false) => vec![write(0, title.to_string())],
        (false, true) => vec![write(0, body.to_string())],
        (false, false) => Vec::new(),
    }
}

/// Drives the foreign composer for one request at a time.
pub struct ComposerDriver<D: ForeignDocument, C: Clock> {
    document: D,
    clock: C,
    lookup: LookupTable,
    config: DriverConfig,
}

impl<D: ForeignDocument, C: Clock> ComposerDriver<D, C> {
    /// Creates a driver with the built-in lookup table and default timings.
    pub fn new(document: D, clock: C) -> Self {
        Self {
            document,
            clock,
            lookup: LookupTable::default(),
            config: DriverConfig::default(),
        }
    }

    pub fn with_lookup(mut self, lookup: LookupTable) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Runs one attempt and reports the visited states.
    pub async fn run(&self, request: &NoteRequest) -> AutomationReport {
        let attempt_id = Uuid::new_v4();
        let started_at = self.clock.now();
        let mut states = vec![ComposerState::Idle];
        info!(
            "event=note_create module=composer status=start attempt_id={} title_chars={} body_chars={}",
            attempt_id,
            request.title().chars().count(),
            request.body().chars().count()
        );

        let outcome = self.drive(request, &mut states).await;
        let duration_ms = self.clock.now().saturating_sub(started_at).as_millis();
        let result = match outcome {
            Ok(()) => {
                states.push(ComposerState::Done);
                info!(
                    "event=note_create module=composer status=ok attempt_id={} duration_ms={}",
                    attempt_id, duration_ms
                );
                NoteResult::created()
            }
            Err(err) => {
                let failed_in = states.last().copied().unwrap_or(ComposerState::Idle);
                states.push(ComposerState::Failed);
                error!(
                    "event=note_create module=composer status=error attempt_id={} state={} duration_ms={} error={}",
                    attempt_id,
                    failed_in.as_str(),
                    duration_ms,
                    err
                );
                NoteResult::failed(err.to_string())
            }
        };

        AutomationReport { result, states }
    }

    async fn drive(
        &self,
        request: &NoteRequest,
        states: &mut Vec<ComposerState>,
    ) -> Result<(), AutomationError> {
        enter(states, ComposerState::Locating);
        if !self.activate_entry_point()? {
            // The composer may already be open; the wait below decides.
            debug!("event=entry_point module=composer status=not_found");
        }

        enter(states, ComposerState::WaitingForComposer);
        self.wait_for_composer().await?;

        enter(states, ComposerState::Populating);
        let scope = self.composer_scope()?;
        let regions = self.discover_regions(&scope)?;
        let plan = plan_population(request.title(), request.body(), regions.len());
        if plan.is_empty() {
            warn!(
                "event=populate module=composer status=skipped regions={}",
                regions.len()
            );
        }
        for write in &plan {
            self.set_region_text(&regions[write.region], &write.text)?;
        }

        enter(states, ComposerState::Committing);
        self.commit(&scope)?;

        enter(states, ComposerState::Settling);
        self.clock.sleep(self.config.settle_delay).await;
        Ok(())
    }

    fn activate_entry_point(&self) -> Result<bool, DocumentError> {
        match self.first_match(&self.lookup.entry_point)? {
            Some(entry) => {
                self.document.click(&entry)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn wait_for_composer(&self) -> Result<(), AutomationError> {
        let policy = WaitPolicy {
            interval: self.config.poll_interval,
            timeout: self.config.composer_timeout,
        };
        let probe = || self.first_match(&self.lookup.composer_ready);
        match bounded_wait(&self.clock, policy, probe).await {
            Ok(_) => Ok(()),
            Err(WaitError::Timeout(timeout)) => Err(AutomationError::ComposerTimeout {
                waited_ms: timeout.waited.as_millis(),
            }),
            Err(WaitError::Probe(err)) => Err(err.into()),
        }
    }

    fn composer_scope(&self) -> Result<D::Element, DocumentError> {
        match self.first_match(&self.lookup.composer_scope)? {
            Some(scope) => Ok(scope),
            None => self.document.body(),
        }
    }

    fn discover_regions(&self, scope: &D::Element) -> Result<Vec<D::Element>, DocumentError> {
        let strict = self.visible_within(scope, &self.lookup.strict_editable)?;
        if !strict.is_empty() {
            return Ok(strict);
        }
        self.visible_within(scope, &self.lookup.broad_editable)
    }

    fn set_region_text(&self, region: &D::Element, text: &str) -> Result<(), DocumentError> {
        self.document.focus(region)?;
        self.document.clear_editable(region)?;
        if !self.document.insert_text(region, text)? {
            self.document.replace_text(region, text)?;
        }
        self.document.notify_input(region)
    }

    fn commit(&self, scope: &D::Element) -> Result<(), DocumentError> {
        for selector in &self.lookup.commit {
            if let Some(close) = self.document.query_all_within(scope, selector)?.into_iter().next()
            {
                return self.document.click(&close);
            }
        }
        debug!("event=commit module=composer status=blur_fallback");
        let body = self.document.body()?;
        self.document.click(&body)
    }

    fn first_match(&self, list: &SelectorList) -> Result<Option<D::Element>, DocumentError> {
        for selector in list {
            if let Some(found) = self.document.query_first(selector)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn visible_within(
        &self,
        scope: &D::Element,
        list: &SelectorList,
    ) -> Result<Vec<D::Element>, DocumentError> {
        for selector in list {
            let visible = self
                .document
                .query_all_within(scope, selector)?
                .into_iter()
                .filter(|element| self.document.is_rendered(element))
                .collect::<Vec<_>>();
            if !visible.is_empty() {
                return Ok(visible);
            }
        }
        Ok(Vec::new())
    }
}

impl<D: ForeignDocument, C: Clock> NoteComposer for ComposerDriver<D, C> {
    async fn create_note(&self, request: &NoteRequest) -> NoteResult {
        self.run(request).await.result
    }
}

fn enter(states: &mut Vec<ComposerState>, next: ComposerState) {
    debug!("event=composer_state module=composer state={}", next.as_str());
    states.push(next);
}

#[cfg(test)]
mod tests {
    use super::{plan_population, ComposerState, RegionWrite};

    fn write(region: usize, text: &str) -> RegionWrite {
        RegionWrite {
            region,
            text: text.to_string(),
        }
    }

    #[test]
    fn title_and_body_use_separate_regions() {
        assert_eq!(
            plan_population("T", "B", 2),
            vec![write(0, "T"), write(1, "B")]
        );
        assert_eq!(
            plan_population("T", "B", 3),
            vec![write(0, "T"), write(1, "B")]
        );
    }

    #[test]
    fn single_region_gets_combined_text() {
        assert_eq!(plan_population("T", "B", 1), vec![write(0, "T\nB")]);
    }

    #[test]
    fn title_only_and_body_only_use_first_region() {
        assert_eq!(plan_population("T", "", 2), vec![write(0, "T")]);
        assert_eq!(plan_population("", "B", 1), vec![write(0, "B")]);
        assert_eq!(plan_population("", "B", 2), vec![write(0, "B")]);
    }

    #[test]
    fn no_regions_or_no_text_writes_nothing() {
        assert!(plan_population("T", "B", 0).is_empty());
        assert!(plan_population("", "", 2).is_empty());
    }

    #[test]
    fn only_done_and_failed_are_terminal() {
        assert!(ComposerState::Done.is_terminal());
        assert!(ComposerState::Failed.is_terminal());
        assert!(!ComposerState::Settling.is_terminal());
    }
}
