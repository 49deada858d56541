//! Crash reports, context tracking and log setup.
//!
//! Install the panic hook and the subscriber at startup:
//!
//! ```ignore
//! use directable::observability::{init_tracing, install_panic_hook};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_tracing(0);
//! }
//! ```
//!
//! Then mark what is being worked on, so a crash report can name it:
//!
//! ```ignore
//! let _phase = set_phase(AnalysisPhase::Loading);
//! let _unit = set_current_unit(&path);
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use self::tracing::{init_tracing, LOG_ENV};
pub use context::{
    get_current_context, get_progress, increment_processed, set_current_method,
    set_current_unit, set_phase, set_progress, AnalysisContext, AnalysisPhase, ContextGuard,
};
pub use panic_hook::install_panic_hook;
