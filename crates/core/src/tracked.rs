use crate::binding::ContextBindings;
use crate::context::{ContextId, Contexts};
use crate::error::TrackedError;
use crate::graph::RefGraph;
use crate::handle::{AnyHandle, Handle, ObjectName, ResourceContent, ResourceKind};
use crate::platform::TrackedPlatform;
use crate::resource::Resources;
use rustc_hash::FxHashMap;

/// Implementation limits the tracker enforces; a real platform would report
/// these, the tracker only needs them to size its registries and validate
/// indices.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TrackedCounts {
	pub texture_units: u32,
	pub vertex_attributes: u32,
	pub color_attachments: u32,
}

impl TrackedCounts {
	pub const REASONABLE_DEFAULTS: Self = TrackedCounts {
		texture_units: 16,
		vertex_attributes: 16,
		color_attachments: 8,
	};
}

/// The tracked view of a native graphics layer: resource lifecycles, the
/// reference graph between them, per-context binding state and the
/// context-affinity guard, on top of a platform performing the raw native
/// calls.
///
/// All state is owned by this value and passed around explicitly; nothing is
/// process-global. The whole type is single-threaded: one logical context is
/// *current* at a time and the caller serializes the switches.
pub struct Tracked<P: TrackedPlatform> {
	pub(crate) platform: P,
	counts: TrackedCounts,
	pub(crate) contexts: Contexts,
	pub(crate) resources: Resources,
	pub(crate) graph: RefGraph,
	pub(crate) bindings: FxHashMap<ContextId, ContextBindings>,
}

impl<P: TrackedPlatform> Tracked<P> {
	pub fn new(platform: P, counts: TrackedCounts) -> Self {
		Self {
			platform,
			counts,
			contexts: Contexts::new(),
			resources: Resources::new(),
			graph: RefGraph::new(),
			bindings: FxHashMap::default(),
		}
	}

	#[inline]
	pub fn counts(&self) -> TrackedCounts {
		self.counts
	}

	#[inline]
	pub fn platform(&self) -> &P {
		&self.platform
	}

	// --- contexts ---------------------------------------------------------

	pub fn context_create(&mut self) -> ContextId {
		let context = self.contexts.create();
		self.bindings
			.insert(context, ContextBindings::new(self.counts.texture_units as usize));
		context
	}

	/// Create a context sharing `with`'s object namespace. Resources
	/// allocated under either context are usable from the other; deletion is
	/// visible to the whole group immediately.
	pub fn context_create_shared(&mut self, with: ContextId) -> ContextId {
		let context = self.contexts.create_shared(with);
		self.bindings
			.insert(context, ContextBindings::new(self.counts.texture_units as usize));
		context
	}

	pub fn context_make_current(&mut self, context: ContextId) {
		self.contexts.make_current(context);
	}

	pub fn context_release_current(&mut self) {
		self.contexts.release_current();
	}

	#[inline]
	pub fn context_current(&self) -> Option<ContextId> {
		self.contexts.current()
	}

	#[inline]
	pub fn contexts_are_shared(&self, a: ContextId, b: ContextId) -> bool {
		self.contexts.is_shared_with(a, b)
	}

	// --- handle queries ---------------------------------------------------

	/// Liveness query; succeeds on any handle, deleted or not, from any
	/// context. Identity, equality and this check are the only operations a
	/// deleted handle still supports.
	pub fn is_deleted(&self, handle: impl Into<AnyHandle>) -> bool {
		let handle = handle.into();
		self.resources
			.get(handle.name())
			.is_some_and(|meta| meta.deleted)
	}

	/// The distinct resources `container` currently references.
	pub fn references(&self, container: impl Into<AnyHandle>) -> Vec<AnyHandle> {
		self.graph
			.references(container.into().name())
			.into_iter()
			.filter_map(|name| self.resources.any_handle(name))
			.collect()
	}

	/// The containers currently referencing `referable`.
	pub fn referring_containers(&self, referable: impl Into<AnyHandle>) -> Vec<AnyHandle> {
		self.graph
			.referrers(referable.into().name())
			.into_iter()
			.filter_map(|name| self.resources.any_handle(name))
			.collect()
	}

	// --- guard ------------------------------------------------------------

	pub(crate) fn require_current(&self) -> Result<ContextId, TrackedError> {
		self.contexts.require_current()
	}

	/// The context-affinity guard: liveness first, then ownership, in that
	/// order, so a deleted handle misused from a foreign context reports
	/// `Deleted`, not `WrongContext`. Timer queries are usable only on
	/// exactly their owning context; every other category is usable across
	/// the owning context's share group.
	pub(crate) fn check_use(&self, handle: AnyHandle) -> Result<ContextId, TrackedError> {
		if let Some(meta) = self.resources.get(handle.name()) {
			if meta.deleted {
				return Err(TrackedError::Deleted {
					kind: handle.kind(),
					name: handle.name(),
				});
			}
		}
		let current = self.require_current()?;
		let usable = match self.resources.get(handle.name()) {
			// a handle this tracker never issued, e.g. from another instance
			None => false,
			Some(meta) => {
				if handle.kind() == ResourceKind::TimerQuery {
					current == meta.owner
				} else {
					self.contexts.is_shared_with(current, meta.owner)
				}
			}
		};
		if !usable {
			return Err(TrackedError::WrongContext {
				kind: handle.kind(),
				name: handle.name(),
				owner: handle.owner(),
				current,
			});
		}
		Ok(current)
	}

	// --- cascade ----------------------------------------------------------

	/// The shared deletion path: guard checks, then the reference-graph and
	/// binding-state cascades, then the native delete, then the flag. All of
	/// it completes before this returns, so no caller can observe a deleted
	/// resource with stale edges or stale bindings.
	pub(crate) fn delete_common(&mut self, handle: AnyHandle) -> Result<(), TrackedError> {
		let current = self.check_use(handle)?;
		log::debug!("delete {:?} {:?}", handle.kind(), handle.name());

		self.graph.on_delete(handle.name());

		let contexts = &self.contexts;
		let owner = handle.owner();
		let group: Vec<ContextId> = self
			.bindings
			.keys()
			.copied()
			.filter(|context| contexts.is_shared_with(*context, owner))
			.collect();
		for context in group {
			if let Some(bindings) = self.bindings.get_mut(&context) {
				let cleared = bindings.clear_name(handle.name());
				// the native side only has bindings for the current context
				if context == current {
					for target in cleared {
						self.platform.bind(target, None);
					}
				}
			}
		}

		self.platform.delete(handle.kind(), handle.name());
		self.resources.mark_deleted(handle.name());
		Ok(())
	}

	// --- internal accessors ----------------------------------------------

	pub(crate) fn bindings_of(&self, context: ContextId) -> Option<&ContextBindings> {
		self.bindings.get(&context)
	}

	pub(crate) fn bindings_of_mut(&mut self, context: ContextId) -> &mut ContextBindings {
		let units = self.counts.texture_units as usize;
		self.bindings
			.entry(context)
			.or_insert_with(|| ContextBindings::new(units))
	}

	/// Rebuild a typed handle from a name registered in the metadata table.
	pub(crate) fn typed_handle<C: ResourceContent>(&self, name: ObjectName) -> Option<Handle<C>> {
		self.resources.typed_handle(name)
	}
}
