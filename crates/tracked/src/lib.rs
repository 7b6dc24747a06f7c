/// The primary platform is the soft in-process adapter
#[cfg(feature = "soft")]
pub type P = rust_gl_tracked_core::platform::soft::SoftPlatform;
#[cfg(not(any(feature = "soft")))]
compile_error!("Must select a primary platform by enabling a feature like \"soft\"");

pub mod tracked {
	pub type Tracked = rust_gl_tracked_core::tracked::Tracked<crate::P>;

	pub use rust_gl_tracked_core::tracked::*;
}

pub mod binding {
	pub use rust_gl_tracked_core::binding::*;
}

pub mod context {
	pub use rust_gl_tracked_core::context::*;
}

pub mod error {
	pub use rust_gl_tracked_core::error::*;
}

pub mod graph {
	pub use rust_gl_tracked_core::graph::*;
}

pub mod handle {
	pub use rust_gl_tracked_core::handle::*;
}

pub mod objects {
	pub use rust_gl_tracked_core::objects::*;
}

pub mod platform {
	pub use rust_gl_tracked_core::platform::*;
}

pub mod profiler {
	pub use rust_gl_tracked_core::profiler::*;
}

pub mod resource {
	pub use rust_gl_tracked_core::resource::*;
}

pub mod texunit {
	pub use rust_gl_tracked_core::texunit::*;
}
