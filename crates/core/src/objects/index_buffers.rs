use crate::binding::BindTarget;
use crate::error::{check_octet_range, TrackedError};
use crate::graph::SlotId;
use crate::handle::{ArrayObject, Handle, IndexBuffer, ResourceKind};
use crate::platform::TrackedPlatform;
use crate::resource::{ResourceMeta, ResourcePayload, UsageHint};
use crate::tracked::Tracked;

/// Index buffer binding routes through the currently bound array object: the
/// array object is the reference container, the index buffer the referable.
impl<P: TrackedPlatform> Tracked<P> {
	pub fn index_buffer_allocate(
		&mut self,
		size: u64,
		usage: UsageHint,
	) -> Result<Handle<IndexBuffer>, TrackedError> {
		let current = self.require_current()?;
		let name = self.platform.allocate(ResourceKind::IndexBuffer);
		log::debug!("allocate index buffer {:?} ({} octets, {:?})", name, size, usage);
		self.platform
			.buffer_storage(ResourceKind::IndexBuffer, name, size);
		self.resources.insert(
			name,
			ResourceMeta {
				kind: ResourceKind::IndexBuffer,
				owner: current,
				deleted: false,
				payload: ResourcePayload::Buffer { size, usage },
			},
		);
		Ok(Handle::from_parts(name, current))
	}

	/// Attach `handle` as the bound array object's index buffer, displacing
	/// any previous one.
	pub fn index_buffer_bind(&mut self, handle: Handle<IndexBuffer>) -> Result<(), TrackedError> {
		self.check_use(handle.erase())?;
		let array_object = self.bound_array_object_required()?;
		log::trace!("bind {:?}/{:?}", array_object.name(), handle.name());
		self.graph
			.attach(array_object.name(), SlotId::IndexBuffer, handle.name());
		self.platform
			.bind(BindTarget::IndexBuffer, Some(handle.name()));
		Ok(())
	}

	/// Clear the bound array object's index buffer. Idempotent when the slot
	/// is already empty.
	pub fn index_buffer_unbind(&mut self) -> Result<(), TrackedError> {
		let array_object = self.bound_array_object_required()?;
		log::trace!("unbind {:?} index buffer", array_object.name());
		self.graph.detach(array_object.name(), SlotId::IndexBuffer);
		self.platform.bind(BindTarget::IndexBuffer, None);
		Ok(())
	}

	/// The bound array object's current index buffer; `None` when no array
	/// object is bound or its slot is empty.
	pub fn index_buffer_bound(&self) -> Result<Option<Handle<IndexBuffer>>, TrackedError> {
		let current = self.require_current()?;
		let Some(array_object) = self
			.bindings_of(current)
			.and_then(|bindings| bindings.array_object.bound())
		else {
			return Ok(None);
		};
		Ok(self
			.graph
			.slot(array_object.name(), SlotId::IndexBuffer)
			.and_then(|name| self.typed_handle(name)))
	}

	pub fn index_buffer_update(
		&mut self,
		handle: Handle<IndexBuffer>,
		offset: u64,
		data: &[u8],
	) -> Result<(), TrackedError> {
		self.check_use(handle.erase())?;
		let size = self.buffer_size_of(handle.name());
		check_octet_range("index buffer update range", offset, data.len() as u64, size)?;
		if self.index_buffer_bound()? != Some(handle) {
			return Err(TrackedError::NotBound {
				kind: ResourceKind::IndexBuffer,
				name: Some(handle.name()),
			});
		}
		self.platform
			.buffer_write(ResourceKind::IndexBuffer, handle.name(), offset, data);
		Ok(())
	}

	pub fn index_buffer_read(
		&self,
		handle: Handle<IndexBuffer>,
		offset: u64,
		len: u64,
	) -> Result<Vec<u8>, TrackedError> {
		self.check_use(handle.erase())?;
		let size = self.buffer_size_of(handle.name());
		check_octet_range("index buffer read range", offset, len, size)?;
		if self.index_buffer_bound()? != Some(handle) {
			return Err(TrackedError::NotBound {
				kind: ResourceKind::IndexBuffer,
				name: Some(handle.name()),
			});
		}
		Ok(self
			.platform
			.buffer_read(ResourceKind::IndexBuffer, handle.name(), offset, len))
	}

	pub fn index_buffer_size(&self, handle: Handle<IndexBuffer>) -> Result<u64, TrackedError> {
		self.check_use(handle.erase())?;
		Ok(self.buffer_size_of(handle.name()))
	}

	pub fn index_buffer_usage(&self, handle: Handle<IndexBuffer>) -> Result<UsageHint, TrackedError> {
		self.check_use(handle.erase())?;
		Ok(self.buffer_usage_of(handle.name()))
	}

	pub fn index_buffer_delete(&mut self, handle: Handle<IndexBuffer>) -> Result<(), TrackedError> {
		self.delete_common(handle.erase())
	}

	fn bound_array_object_required(&self) -> Result<Handle<ArrayObject>, TrackedError> {
		let current = self.require_current()?;
		self.bindings_of(current)
			.and_then(|bindings| bindings.array_object.bound())
			.ok_or(TrackedError::NotBound {
				kind: ResourceKind::ArrayObject,
				name: None,
			})
	}
}

#[cfg(test)]
mod tests {
	use crate::error::TrackedError;
	use crate::handle::ResourceKind;
	use crate::resource::UsageHint;
	use crate::testing::tracked;

	#[test]
	fn test_bind_requires_array_object() -> anyhow::Result<()> {
		let (mut gl, _) = tracked();

		let ib = gl.index_buffer_allocate(6, UsageHint::StaticDraw)?;
		assert_eq!(
			gl.index_buffer_bind(ib),
			Err(TrackedError::NotBound {
				kind: ResourceKind::ArrayObject,
				name: None,
			})
		);
		Ok(())
	}

	#[test]
	fn test_bind_and_unbind_track_references() -> anyhow::Result<()> {
		let (mut gl, _) = tracked();

		let builder = gl.array_object_builder();
		let ao = gl.array_object_allocate(&builder)?;
		let ib = gl.index_buffer_allocate(6, UsageHint::StaticDraw)?;

		gl.index_buffer_bind(ib)?;
		assert_eq!(gl.references(ao).len(), 1);
		assert_eq!(gl.referring_containers(ib).len(), 1);
		assert_eq!(gl.index_buffer_bound()?, Some(ib));

		gl.index_buffer_unbind()?;
		assert_eq!(gl.references(ao).len(), 0);
		assert_eq!(gl.referring_containers(ib).len(), 0);
		assert_eq!(gl.index_buffer_bound()?, None);
		Ok(())
	}

	#[test]
	fn test_update_requires_attachment() -> anyhow::Result<()> {
		let (mut gl, _) = tracked();

		let builder = gl.array_object_builder();
		let _ao = gl.array_object_allocate(&builder)?;
		let ib = gl.index_buffer_allocate(4, UsageHint::DynamicDraw)?;

		assert_eq!(
			gl.index_buffer_update(ib, 0, &[1, 2, 3, 4]),
			Err(TrackedError::NotBound {
				kind: ResourceKind::IndexBuffer,
				name: Some(ib.name()),
			})
		);

		gl.index_buffer_bind(ib)?;
		gl.index_buffer_update(ib, 0, &[1, 2, 3, 4])?;
		assert_eq!(gl.index_buffer_read(ib, 0, 4)?, vec![1, 2, 3, 4]);
		Ok(())
	}

	#[test]
	fn test_delete_clears_array_object_slot() -> anyhow::Result<()> {
		let (mut gl, _) = tracked();

		let builder = gl.array_object_builder();
		let ao = gl.array_object_allocate(&builder)?;
		let ib = gl.index_buffer_allocate(6, UsageHint::StaticDraw)?;
		gl.index_buffer_bind(ib)?;

		gl.index_buffer_delete(ib)?;
		assert!(gl.is_deleted(ib));
		assert_eq!(gl.references(ao).len(), 0);
		assert_eq!(gl.index_buffer_bound()?, None);
		Ok(())
	}
}
