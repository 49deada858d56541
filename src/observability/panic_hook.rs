//! Structured crash reports.
//!
//! A panic prints which unit and method were being classified, the phase,
//! and how many units were done, so a bug report can name the input that
//! triggered it.

use super::context::{get_current_context, get_progress, AnalysisContext};
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 76;

/// Install the crash-report hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();
    let (processed, total) = get_progress();

    eprintln!();
    for line in crash_report_lines(info, &context, processed, total) {
        eprintln!("{line}");
    }
    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    }
}

fn crash_report_lines(
    info: &PanicHookInfo<'_>,
    context: &AnalysisContext,
    processed: usize,
    total: usize,
) -> Vec<String> {
    let mut body = vec![
        format!("directable {VERSION} crashed"),
        format!("time: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        format!("platform: {}", std::env::consts::OS),
        format!("panic: {}", panic_message(info)),
    ];
    if let Some(location) = info.location() {
        body.push(format!(
            "at: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        ));
    }
    body.extend(context_lines(context, processed, total));
    if std::env::var("RUST_BACKTRACE").is_err() {
        body.push("run with RUST_BACKTRACE=1 for a stack trace".to_string());
    }
    boxed(&body)
}

fn context_lines(context: &AnalysisContext, processed: usize, total: usize) -> Vec<String> {
    let mut lines = Vec::new();
    match context.phase {
        Some(phase) => lines.push(format!("phase: {phase}")),
        None => lines.push("phase: (none, crashed before analysis)".to_string()),
    }
    if let Some(unit) = &context.current_unit {
        lines.push(format!("unit: {}", unit.display()));
    }
    if let Some(method) = &context.current_method {
        lines.push(format!("method at: {method}"));
    }
    if total > 0 {
        lines.push(format!("progress: {processed} / {total} units"));
    }
    lines
}

fn boxed(body: &[String]) -> Vec<String> {
    let rule = "═".repeat(WIDTH + 2);
    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(format!("╔{rule}╗"));
    for line in body {
        out.push(format!("║ {:<width$} ║", truncate(line, WIDTH), width = WIDTH));
    }
    out.push(format!("╚{rule}╝"));
    out
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
