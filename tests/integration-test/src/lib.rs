use rust_gl_tracked::context::ContextId;
use rust_gl_tracked::tracked::{Tracked, TrackedCounts};
use rust_gl_tracked::P;

pub mod lifecycle;
pub mod profiling;
pub mod sharing;
pub mod texture_units;

/// A tracker over the soft platform with one context created and current.
pub fn tracked() -> (Tracked, ContextId) {
	tracked_with_counts(TrackedCounts::REASONABLE_DEFAULTS)
}

pub fn tracked_with_counts(counts: TrackedCounts) -> (Tracked, ContextId) {
	let mut gl = Tracked::new(P::new(), counts);
	let context = gl.context_create();
	gl.context_make_current(context);
	(gl, context)
}
