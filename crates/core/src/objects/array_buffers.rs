use crate::binding::BindTarget;
use crate::error::{check_octet_range, TrackedError};
use crate::handle::{ArrayBuffer, Handle, ResourceKind};
use crate::platform::TrackedPlatform;
use crate::resource::{ResourceMeta, ResourcePayload, UsageHint};
use crate::tracked::Tracked;

impl<P: TrackedPlatform> Tracked<P> {
	/// Allocate an array buffer of `size` octets. The fresh buffer is left
	/// bound on the current context.
	pub fn array_buffer_allocate(
		&mut self,
		size: u64,
		usage: UsageHint,
	) -> Result<Handle<ArrayBuffer>, TrackedError> {
		let current = self.require_current()?;
		let name = self.platform.allocate(ResourceKind::ArrayBuffer);
		log::debug!("allocate array buffer {:?} ({} octets, {:?})", name, size, usage);
		self.platform
			.buffer_storage(ResourceKind::ArrayBuffer, name, size);
		self.resources.insert(
			name,
			ResourceMeta {
				kind: ResourceKind::ArrayBuffer,
				owner: current,
				deleted: false,
				payload: ResourcePayload::Buffer { size, usage },
			},
		);
		let handle = Handle::from_parts(name, current);
		self.platform.bind(BindTarget::ArrayBuffer, Some(name));
		self.bindings_of_mut(current).array_buffer.bind(handle);
		Ok(handle)
	}

	pub fn array_buffer_bind(&mut self, handle: Handle<ArrayBuffer>) -> Result<(), TrackedError> {
		let current = self.check_use(handle.erase())?;
		log::trace!("bind array buffer {:?}", handle.name());
		self.platform
			.bind(BindTarget::ArrayBuffer, Some(handle.name()));
		self.bindings_of_mut(current).array_buffer.bind(handle);
		Ok(())
	}

	pub fn array_buffer_unbind(&mut self) -> Result<(), TrackedError> {
		let current = self.require_current()?;
		log::trace!("unbind array buffer");
		self.platform.bind(BindTarget::ArrayBuffer, None);
		self.bindings_of_mut(current).array_buffer.unbind();
		Ok(())
	}

	pub fn array_buffer_bound(&self) -> Result<Option<Handle<ArrayBuffer>>, TrackedError> {
		let current = self.require_current()?;
		Ok(self
			.bindings_of(current)
			.and_then(|bindings| bindings.array_buffer.bound()))
	}

	pub fn array_buffer_is_bound(&self, handle: Handle<ArrayBuffer>) -> Result<bool, TrackedError> {
		Ok(self.array_buffer_bound()? == Some(handle))
	}

	/// Overwrite `data.len()` octets at `offset`. The buffer must currently
	/// be bound.
	pub fn array_buffer_update(
		&mut self,
		handle: Handle<ArrayBuffer>,
		offset: u64,
		data: &[u8],
	) -> Result<(), TrackedError> {
		self.check_use(handle.erase())?;
		let size = self.buffer_size_of(handle.name());
		check_octet_range("array buffer update range", offset, data.len() as u64, size)?;
		if self.array_buffer_bound()? != Some(handle) {
			return Err(TrackedError::NotBound {
				kind: ResourceKind::ArrayBuffer,
				name: Some(handle.name()),
			});
		}
		self.platform
			.buffer_write(ResourceKind::ArrayBuffer, handle.name(), offset, data);
		Ok(())
	}

	/// Read back `len` octets at `offset`. The buffer must currently be
	/// bound.
	pub fn array_buffer_read(
		&self,
		handle: Handle<ArrayBuffer>,
		offset: u64,
		len: u64,
	) -> Result<Vec<u8>, TrackedError> {
		self.check_use(handle.erase())?;
		let size = self.buffer_size_of(handle.name());
		check_octet_range("array buffer read range", offset, len, size)?;
		if self.array_buffer_bound()? != Some(handle) {
			return Err(TrackedError::NotBound {
				kind: ResourceKind::ArrayBuffer,
				name: Some(handle.name()),
			});
		}
		Ok(self
			.platform
			.buffer_read(ResourceKind::ArrayBuffer, handle.name(), offset, len))
	}

	pub fn array_buffer_size(&self, handle: Handle<ArrayBuffer>) -> Result<u64, TrackedError> {
		self.check_use(handle.erase())?;
		Ok(self.buffer_size_of(handle.name()))
	}

	pub fn array_buffer_usage(&self, handle: Handle<ArrayBuffer>) -> Result<UsageHint, TrackedError> {
		self.check_use(handle.erase())?;
		Ok(self.buffer_usage_of(handle.name()))
	}

	pub fn array_buffer_delete(&mut self, handle: Handle<ArrayBuffer>) -> Result<(), TrackedError> {
		self.delete_common(handle.erase())
	}
}
