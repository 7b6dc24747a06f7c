mod array_buffers;
mod array_objects;
mod framebuffers;
mod index_buffers;
mod shaders;
mod textures;
mod timer_queries;

pub use array_objects::*;
pub use framebuffers::*;

use crate::handle::ObjectName;
use crate::platform::TrackedPlatform;
use crate::resource::{ResourcePayload, TextureFormat, UsageHint};
use crate::tracked::Tracked;

impl<P: TrackedPlatform> Tracked<P> {
	/// Data store size of a buffer object. Callers run the guard first; an
	/// unknown or non-buffer name reads as an empty store.
	pub(crate) fn buffer_size_of(&self, name: ObjectName) -> u64 {
		match self.resources.get(name).map(|meta| &meta.payload) {
			Some(ResourcePayload::Buffer { size, .. }) => *size,
			_ => 0,
		}
	}

	pub(crate) fn buffer_usage_of(&self, name: ObjectName) -> UsageHint {
		match self.resources.get(name).map(|meta| &meta.payload) {
			Some(ResourcePayload::Buffer { usage, .. }) => *usage,
			_ => UsageHint::StaticDraw,
		}
	}

	pub(crate) fn texture_storage_of(&self, name: ObjectName) -> Option<(u32, u32, TextureFormat)> {
		match self.resources.get(name).map(|meta| &meta.payload) {
			Some(ResourcePayload::Texture2d {
				width,
				height,
				format,
			}) => Some((*width, *height, *format)),
			_ => None,
		}
	}

	pub(crate) fn shader_source_of(&self, name: ObjectName) -> String {
		match self.resources.get(name).map(|meta| &meta.payload) {
			Some(ResourcePayload::Shader { source, .. }) => source.clone(),
			_ => String::new(),
		}
	}
}
