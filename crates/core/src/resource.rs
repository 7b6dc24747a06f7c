use crate::context::ContextId;
use crate::handle::{AnyHandle, Handle, ObjectName, ResourceContent, ResourceKind};
use rustc_hash::FxHashMap;

/// Hint describing the expected access pattern of a buffer's data store.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum UsageHint {
	StaticDraw,
	StaticRead,
	StaticCopy,
	DynamicDraw,
	DynamicRead,
	DynamicCopy,
	StreamDraw,
	StreamRead,
	StreamCopy,
}

/// Storage formats for 2D textures, reduced to the set the tracker needs for
/// structural compatibility checks.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TextureFormat {
	R8,
	Rg8,
	Rgb8,
	Rgba8,
	Depth16,
	Depth24,
	Depth32F,
}

impl TextureFormat {
	pub fn bytes_per_pixel(self) -> u32 {
		match self {
			TextureFormat::R8 => 1,
			TextureFormat::Rg8 => 2,
			TextureFormat::Rgb8 => 3,
			TextureFormat::Rgba8 => 4,
			TextureFormat::Depth16 => 2,
			TextureFormat::Depth24 => 3,
			TextureFormat::Depth32F => 4,
		}
	}

	#[inline]
	pub fn is_depth_renderable(self) -> bool {
		matches!(
			self,
			TextureFormat::Depth16 | TextureFormat::Depth24 | TextureFormat::Depth32F
		)
	}

	#[inline]
	pub fn is_color_renderable(self) -> bool {
		!self.is_depth_renderable()
	}
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderStage {
	Vertex,
	Fragment,
}

/// Attribute and uniform locations reported by the native linker.
#[derive(Clone, Debug, Default)]
pub struct ProgramInterface {
	pub attributes: FxHashMap<String, u32>,
	pub uniforms: FxHashMap<String, u32>,
}

/// Category-specific payload stored alongside the handle core fields. The
/// guard, graph and binding logic never look inside; only the per-category
/// operations do.
#[derive(Clone, Debug)]
pub(crate) enum ResourcePayload {
	Buffer { size: u64, usage: UsageHint },
	ArrayObject,
	Texture2d {
		width: u32,
		height: u32,
		format: TextureFormat,
	},
	Shader { source: String },
	Program { interface: ProgramInterface },
	Framebuffer,
	TimerQuery,
}

#[derive(Clone, Debug)]
pub(crate) struct ResourceMeta {
	pub kind: ResourceKind,
	pub owner: ContextId,
	/// Monotonic: set once by delete, never cleared.
	pub deleted: bool,
	pub payload: ResourcePayload,
}

/// Native object name -> handle metadata for one tracker instance. This is
/// explicitly owned state, not a process-wide table, so multiple logical
/// context groups can coexist in one process without interference.
pub(crate) struct Resources {
	table: FxHashMap<ObjectName, ResourceMeta>,
}

impl Resources {
	pub fn new() -> Self {
		Self {
			table: FxHashMap::default(),
		}
	}

	pub fn insert(&mut self, name: ObjectName, meta: ResourceMeta) {
		self.table.insert(name, meta);
	}

	#[inline]
	pub fn get(&self, name: ObjectName) -> Option<&ResourceMeta> {
		self.table.get(&name)
	}

	/// Rebuild the erased handle for a registered name.
	pub fn any_handle(&self, name: ObjectName) -> Option<AnyHandle> {
		self.table
			.get(&name)
			.map(|meta| AnyHandle::from_parts(name, meta.kind, meta.owner))
	}

	/// Rebuild a typed handle for a registered name; `None` if the name is
	/// unknown or of a different kind.
	pub fn typed_handle<C: ResourceContent>(&self, name: ObjectName) -> Option<Handle<C>> {
		self.table
			.get(&name)
			.filter(|meta| meta.kind == C::KIND)
			.map(|meta| Handle::from_parts(name, meta.owner))
	}

	pub fn mark_deleted(&mut self, name: ObjectName) {
		if let Some(meta) = self.table.get_mut(&name) {
			meta.deleted = true;
		}
	}
}
