//! Thread-local context tracking for crash reports.
//!
//! Records what the current thread is doing (phase, unit, method) so the
//! panic hook can say where things went wrong. Progress over the units of
//! one invocation is kept in global atomics.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static UNITS_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static UNITS_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<AnalysisContext> = const { RefCell::new(AnalysisContext::new()) };
}

/// Snapshot of what the thread was doing.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    pub phase: Option<AnalysisPhase>,
    /// Unit source file being analyzed
    pub current_unit: Option<PathBuf>,
    /// Location of the method being classified
    pub current_method: Option<String>,
}

impl AnalysisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_unit: None,
            current_method: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    /// Reading a unit source into a declaration model
    Loading,
    /// Running the eligibility rules
    Classification,
    /// Finalizing the report
    Reporting,
    /// Writing reports out
    OutputGeneration,
    /// Combining per-unit reports
    Merging,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Loading => "loading",
            Self::Classification => "classification",
            Self::Reporting => "reporting",
            Self::OutputGeneration => "output_generation",
            Self::Merging => "merging",
        };
        f.write_str(name)
    }
}

/// Restores the previous context when dropped.
pub struct ContextGuard {
    previous: AnalysisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut AnalysisContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_current_unit(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.current_unit = Some(path))
}

#[must_use]
pub fn set_current_method(location: impl Into<String>) -> ContextGuard {
    let location = location.into();
    update(|ctx| ctx.current_method = Some(location))
}

pub fn set_progress(processed: usize, total: usize) {
    UNITS_PROCESSED.store(processed, Ordering::Relaxed);
    UNITS_TOTAL.store(total, Ordering::Relaxed);
}

pub fn increment_processed() {
    UNITS_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> AnalysisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (processed, total) units
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        UNITS_PROCESSED.load(Ordering::Relaxed),
        UNITS_TOTAL.load(Ordering::Relaxed),
    )
}

#[cfg(test)]
pub(crate) fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| *ctx.borrow_mut() = AnalysisContext::new());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_restores_previous_phase() {
        reset_context();
        let _outer = set_phase(AnalysisPhase::Loading);
        {
            let _inner = set_phase(AnalysisPhase::Classification);
            assert_eq!(
                get_current_context().phase,
                Some(AnalysisPhase::Classification)
            );
        }
        assert_eq!(get_current_context().phase, Some(AnalysisPhase::Loading));
    }

    #[test]
    fn test_unit_and_method_are_tracked() {
        reset_context();
        let _unit = set_current_unit("units/Widget.json");
        let _method = set_current_method("/src/Widget.m:12:1");

        let ctx = get_current_context();
        assert_eq!(ctx.current_unit, Some(PathBuf::from("units/Widget.json")));
        assert_eq!(ctx.current_method.as_deref(), Some("/src/Widget.m:12:1"));
    }

    #[test]
    fn test_progress() {
        set_progress(0, 4);
        increment_processed();
        let (processed, total) = get_progress();
        assert!(processed >= 1);
        assert_eq!(total, 4);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(AnalysisPhase::OutputGeneration.to_string(), "output_generation");
        assert_eq!(AnalysisPhase::Merging.to_string(), "merging");
    }
}
