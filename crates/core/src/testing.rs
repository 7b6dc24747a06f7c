//! Helpers for the crate's own tests.

use crate::context::ContextId;
use crate::platform::soft::SoftPlatform;
use crate::tracked::{Tracked, TrackedCounts};

pub(crate) fn tracked() -> (Tracked<SoftPlatform>, ContextId) {
	tracked_with_counts(TrackedCounts::REASONABLE_DEFAULTS)
}

pub(crate) fn tracked_with_counts(counts: TrackedCounts) -> (Tracked<SoftPlatform>, ContextId) {
	let mut gl = Tracked::new(SoftPlatform::new(), counts);
	let context = gl.context_create();
	gl.context_make_current(context);
	(gl, context)
}
