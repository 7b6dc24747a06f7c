use crate::error::TrackedError;
use crate::handle::{Handle, ResourceKind, TimerQuery};
use crate::platform::TrackedPlatform;
use crate::resource::{ResourceMeta, ResourcePayload};
use crate::tracked::Tracked;

/// Timer queries are *pseudo-unshared*: even inside a share group they are
/// usable only on exactly the context that allocated them. The guard enforces
/// this; the operations here are otherwise plain pass-throughs.
impl<P: TrackedPlatform> Tracked<P> {
	pub fn timer_query_allocate(&mut self) -> Result<Handle<TimerQuery>, TrackedError> {
		let current = self.require_current()?;
		let name = self.platform.allocate(ResourceKind::TimerQuery);
		log::debug!("allocate timer query {:?}", name);
		self.resources.insert(
			name,
			ResourceMeta {
				kind: ResourceKind::TimerQuery,
				owner: current,
				deleted: false,
				payload: ResourcePayload::TimerQuery,
			},
		);
		Ok(Handle::from_parts(name, current))
	}

	pub fn timer_query_begin(&mut self, handle: Handle<TimerQuery>) -> Result<(), TrackedError> {
		self.check_use(handle.erase())?;
		self.platform.timer_begin(handle.name());
		Ok(())
	}

	pub fn timer_query_end(&mut self, handle: Handle<TimerQuery>) -> Result<(), TrackedError> {
		self.check_use(handle.erase())?;
		self.platform.timer_end(handle.name());
		Ok(())
	}

	pub fn timer_query_elapsed(&self, handle: Handle<TimerQuery>) -> Result<u64, TrackedError> {
		self.check_use(handle.erase())?;
		Ok(self.platform.timer_elapsed(handle.name()))
	}

	pub fn timer_query_delete(&mut self, handle: Handle<TimerQuery>) -> Result<(), TrackedError> {
		self.delete_common(handle.erase())
	}
}
