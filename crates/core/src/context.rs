use crate::error::TrackedError;
use rustc_hash::{FxHashMap, FxHashSet};

/// Identity of a logical context. Ids are minted by [`Contexts`] and are only
/// meaningful within the tracker instance that created them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ContextId(u32);

impl ContextId {
	#[inline]
	pub fn to_u32(self) -> u32 {
		self.0
	}
}

/// Registry of logical contexts: the share relation and the single *current*
/// designation.
///
/// Sharing is an equivalence over object namespaces. The adjacency sets are
/// built once, when a shared context is created, so the ownership guard never
/// has to scan all contexts at check time. "Current" is one global
/// designation the caller switches explicitly; the tracker trusts the caller
/// to serialize those switches.
pub(crate) struct Contexts {
	next: u32,
	share: FxHashMap<ContextId, FxHashSet<ContextId>>,
	current: Option<ContextId>,
}

impl Contexts {
	pub fn new() -> Self {
		Self {
			next: 0,
			share: FxHashMap::default(),
			current: None,
		}
	}

	pub fn create(&mut self) -> ContextId {
		let id = ContextId(self.next);
		self.next += 1;
		self.share.insert(id, FxHashSet::default());
		log::debug!("create context {:?}", id);
		id
	}

	/// Create a context sharing `with`'s object namespace. The new context
	/// joins the entire existing share group, keeping the relation symmetric
	/// and transitive.
	pub fn create_shared(&mut self, with: ContextId) -> ContextId {
		let id = self.create();
		let mut members: FxHashSet<ContextId> =
			self.share.get(&with).cloned().unwrap_or_default();
		members.insert(with);
		for member in &members {
			self.share.entry(*member).or_default().insert(id);
		}
		if let Some(set) = self.share.get_mut(&id) {
			*set = members;
		}
		log::debug!("create context {:?} shared with {:?}", id, with);
		id
	}

	pub fn make_current(&mut self, context: ContextId) {
		log::trace!("make current {:?} -> {:?}", self.current, context);
		self.current = Some(context);
	}

	pub fn release_current(&mut self) {
		log::trace!("release current {:?}", self.current);
		self.current = None;
	}

	#[inline]
	pub fn current(&self) -> Option<ContextId> {
		self.current
	}

	pub fn require_current(&self) -> Result<ContextId, TrackedError> {
		self.current.ok_or(TrackedError::NoContextCurrent)
	}

	/// True iff `a` and `b` name the same context or were created sharing an
	/// object namespace. Symmetric by construction.
	pub fn is_shared_with(&self, a: ContextId, b: ContextId) -> bool {
		a == b || self.share.get(&a).is_some_and(|set| set.contains(&b))
	}
}
