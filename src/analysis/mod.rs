//! The direct-dispatch eligibility pass.
//!
//! One [`DirectFinder`] runs over one compilation unit. It walks the unit's
//! items in source order, feeds each implemented method to the
//! [`Classifier`], turns protocol requirements and dynamic call sites into
//! selector blocks, and hands the surviving candidates to the report builder.

pub mod classifier;
pub mod naming;
pub mod resolver;
pub mod tracker;
pub mod traversal;

pub use classifier::{Classifier, SkipReason, Verdict};
pub use naming::NameRenderer;
pub use resolver::{FirstDeclaration, FirstDeclarationResolver};
pub use tracker::{Admission, DirectableEntry, ExclusionTracker};
pub use traversal::{DynamicSignal, Visit};

use crate::config::AnalysisConfig;
use crate::core::Result;
use crate::model::source::load_model;
use crate::model::{DeclContext, DeclarationModel};
use crate::observability::{set_current_method, set_current_unit, set_phase, AnalysisPhase};
use crate::report::{DirectableReport, ReportBuilder};
use std::path::Path;
use tracing::{debug, info};

/// Counts gathered during one pass, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub visited: usize,
    pub admitted: usize,
    pub name_blocks: usize,
    pub selector_blocks: usize,
    pub skipped: usize,
}

pub struct DirectFinder<'m> {
    model: &'m DeclarationModel,
    classifier: Classifier<'m>,
    tracker: ExclusionTracker,
    owner: Option<String>,
    stats: PassStats,
}

impl<'m> DirectFinder<'m> {
    pub fn new(model: &'m DeclarationModel, config: &'m AnalysisConfig) -> Self {
        Self {
            model,
            classifier: Classifier::new(
                model,
                &config.system_prefixes,
                &config.teardown_selectors,
            ),
            tracker: ExclusionTracker::new(),
            owner: None,
            stats: PassStats::default(),
        }
    }

    /// Run the pass to completion and build the unit's report.
    pub fn run(mut self) -> Result<DirectableReport> {
        {
            let _phase = set_phase(AnalysisPhase::Classification);
            for visit in traversal::visits(self.model) {
                self.apply(visit);
            }
        }

        let unit = self
            .owner
            .take()
            .unwrap_or_else(|| self.model.name().to_string());
        info!(
            unit = %unit,
            visited = self.stats.visited,
            admitted = self.stats.admitted,
            name_blocks = self.stats.name_blocks,
            selector_blocks = self.stats.selector_blocks,
            skipped = self.stats.skipped,
            "classification finished"
        );

        let _phase = set_phase(AnalysisPhase::Reporting);
        ReportBuilder::new(unit).finish(&self.tracker)
    }

    fn apply(&mut self, visit: Visit) {
        match visit {
            Visit::Enter(context) => self.owner = Some(self.owner_name(context)),
            Visit::ClassMethod { class, method } => {
                let _method = set_current_method(self.model.method(method).location.to_string());
                let verdict = self
                    .classifier
                    .classify_class_method(class, method, &mut self.tracker);
                self.record(verdict);
            }
            Visit::CategoryMethod { category, method } => {
                let _method = set_current_method(self.model.method(method).location.to_string());
                let verdict = self
                    .classifier
                    .classify_category_method(category, method, &mut self.tracker);
                self.record(verdict);
            }
            Visit::BlockSelector {
                selector,
                signal,
                location,
            } => {
                debug!(
                    selector = %selector,
                    signal = ?signal,
                    location = location.as_ref().map(ToString::to_string).unwrap_or_default(),
                    "selector blocked"
                );
                self.stats.selector_blocks += 1;
                self.tracker.block_selector(selector);
            }
        }
    }

    fn record(&mut self, verdict: Verdict) {
        self.stats.visited += 1;
        match verdict {
            Verdict::Candidate(Admission::Admitted) => self.stats.admitted += 1,
            Verdict::NameBlocked(_) => self.stats.name_blocks += 1,
            _ => self.stats.skipped += 1,
        }
    }

    // `Class` for a class implementation, `Class+Category` for a category's.
    fn owner_name(&self, context: DeclContext) -> String {
        match context {
            DeclContext::Class(class) => self.model.class(class).name.clone(),
            DeclContext::Category(cat) => {
                let category = self.model.category(cat);
                format!("{}+{}", self.model.class(category.class).name, category.name)
            }
        }
    }
}

/// Classify every method of a unit with the given settings.
pub fn analyze_model(model: &DeclarationModel, config: &AnalysisConfig) -> Result<DirectableReport> {
    DirectFinder::new(model, config).run()
}

/// Load a unit source file and classify it.
pub fn analyze_path(path: &Path, config: &AnalysisConfig) -> Result<DirectableReport> {
    let _unit = set_current_unit(path);
    let model = {
        let _phase = set_phase(AnalysisPhase::Loading);
        load_model(path)?
    };
    debug!(unit = model.name(), path = %path.display(), "loaded unit");
    analyze_model(&model, config)
}
