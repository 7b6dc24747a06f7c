use crate::handle::ObjectName;
use rustc_hash::{FxHashMap, FxHashSet};

/// A named slot of a reference container. A container references at most one
/// object per slot; distinct slots of one container may reference the same
/// object.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SlotId {
	IndexBuffer,
	VertexAttribute(u32),
	VertexStage,
	FragmentStage,
	ColorAttachment(u32),
	DepthAttachment,
}

/// The many-to-many reference relation between containers and referables,
/// kept symmetric at all times: a container appears in a referable's referrer
/// set iff at least one of its slots points at that referable.
///
/// Everything is keyed by integer names instead of holding the resources
/// themselves, so deletion cannot leave dangling edges on either side and
/// there are no ownership cycles to break. All operations on the graph itself
/// are total; liveness and ownership failures belong to the callers' guard
/// checks.
pub(crate) struct RefGraph {
	/// container -> slot -> referable
	slots: FxHashMap<ObjectName, FxHashMap<SlotId, ObjectName>>,
	/// referable -> set of containers with at least one slot pointing at it
	referrers: FxHashMap<ObjectName, FxHashSet<ObjectName>>,
}

impl RefGraph {
	pub fn new() -> Self {
		Self {
			slots: FxHashMap::default(),
			referrers: FxHashMap::default(),
		}
	}

	/// Point `container`'s `slot` at `referable`, displacing the slot's
	/// previous occupant if any. Idempotent when the edge already exists.
	pub fn attach(&mut self, container: ObjectName, slot: SlotId, referable: ObjectName) {
		let previous = self
			.slots
			.entry(container)
			.or_default()
			.insert(slot, referable);
		if let Some(previous) = previous {
			if previous != referable {
				self.remove_referrer_if_unused(container, previous);
			}
		}
		self.referrers.entry(referable).or_default().insert(container);
	}

	/// Clear `container`'s `slot`, returning the displaced referable.
	/// Idempotent when the slot is already empty.
	pub fn detach(&mut self, container: ObjectName, slot: SlotId) -> Option<ObjectName> {
		let previous = self.slots.get_mut(&container)?.remove(&slot);
		if let Some(previous) = previous {
			self.remove_referrer_if_unused(container, previous);
		}
		self.prune_container(container);
		previous
	}

	#[inline]
	pub fn slot(&self, container: ObjectName, slot: SlotId) -> Option<ObjectName> {
		self.slots.get(&container)?.get(&slot).copied()
	}

	/// The distinct referables `container` currently references.
	pub fn references(&self, container: ObjectName) -> Vec<ObjectName> {
		match self.slots.get(&container) {
			None => Vec::new(),
			Some(slots) => {
				let mut names: Vec<ObjectName> = slots.values().copied().collect();
				names.sort_unstable();
				names.dedup();
				names
			}
		}
	}

	/// The containers currently referencing `referable`.
	pub fn referrers(&self, referable: ObjectName) -> Vec<ObjectName> {
		match self.referrers.get(&referable) {
			None => Vec::new(),
			Some(containers) => {
				let mut names: Vec<ObjectName> = containers.iter().copied().collect();
				names.sort_unstable();
				names
			}
		}
	}

	/// Drop every edge touching `name`, in both its container and referable
	/// roles. Returns the `(container, slot)` pairs that were cleared because
	/// they pointed at `name`, so the caller can invalidate any exposed
	/// bound-state that depended on them.
	pub fn on_delete(&mut self, name: ObjectName) -> Vec<(ObjectName, SlotId)> {
		// container role: the referables themselves are unaffected
		if let Some(slots) = self.slots.remove(&name) {
			let mut dropped: Vec<ObjectName> = slots.into_values().collect();
			dropped.sort_unstable();
			dropped.dedup();
			for referable in dropped {
				self.remove_referrer_edge(name, referable);
			}
		}

		// referable role: clear every slot of every referring container
		let mut cleared = Vec::new();
		if let Some(containers) = self.referrers.remove(&name) {
			for container in containers {
				if let Some(slots) = self.slots.get_mut(&container) {
					slots.retain(|slot, referable| {
						if *referable == name {
							cleared.push((container, *slot));
							false
						} else {
							true
						}
					});
				}
				self.prune_container(container);
			}
		}
		cleared
	}

	/// Remove `container` from `previous`'s referrer set unless another slot
	/// of `container` still points at `previous`.
	fn remove_referrer_if_unused(&mut self, container: ObjectName, previous: ObjectName) {
		let still_used = self
			.slots
			.get(&container)
			.is_some_and(|slots| slots.values().any(|r| *r == previous));
		if !still_used {
			self.remove_referrer_edge(container, previous);
		}
	}

	fn remove_referrer_edge(&mut self, container: ObjectName, referable: ObjectName) {
		if let Some(set) = self.referrers.get_mut(&referable) {
			set.remove(&container);
			if set.is_empty() {
				self.referrers.remove(&referable);
			}
		}
	}

	fn prune_container(&mut self, container: ObjectName) {
		if self.slots.get(&container).is_some_and(FxHashMap::is_empty) {
			self.slots.remove(&container);
		}
	}
}
