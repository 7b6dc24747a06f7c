use crate::binding::BindTarget;
use crate::error::TrackedError;
use crate::graph::SlotId;
use crate::handle::{ArrayBuffer, ArrayObject, Handle, IndexBuffer, ResourceKind};
use crate::platform::TrackedPlatform;
use crate::resource::{ResourceMeta, ResourcePayload};
use crate::tracked::Tracked;

/// One vertex attribute fetch configuration inside an array object.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AttributeSource {
	pub buffer: Handle<ArrayBuffer>,
	/// components per vertex, 1..=4
	pub elements: u32,
	pub offset_octets: u64,
	pub stride_octets: u32,
}

/// Staged configuration for an array object. Validation of indices and
/// element counts happens here; the referenced buffers are only verified
/// against the guard when the object is actually allocated.
#[derive(Clone, Debug)]
pub struct ArrayObjectBuilder {
	attributes: Vec<Option<AttributeSource>>,
	index_buffer: Option<Handle<IndexBuffer>>,
}

impl ArrayObjectBuilder {
	pub(crate) fn with_attributes(count: u32) -> Self {
		Self {
			attributes: vec![None; count as usize],
			index_buffer: None,
		}
	}

	pub fn set_attribute(&mut self, index: u32, source: AttributeSource) -> Result<(), TrackedError> {
		let slot = self.attribute_slot_mut(index)?;
		if !(1..=4).contains(&source.elements) {
			return Err(TrackedError::RangeInvalid {
				what: "attribute element count",
				value: u64::from(source.elements),
				lower: 1,
				upper: 4,
			});
		}
		*slot = Some(source);
		Ok(())
	}

	pub fn clear_attribute(&mut self, index: u32) -> Result<(), TrackedError> {
		*self.attribute_slot_mut(index)? = None;
		Ok(())
	}

	pub fn attribute(&self, index: u32) -> Result<Option<&AttributeSource>, TrackedError> {
		self.attributes
			.get(index as usize)
			.map(Option::as_ref)
			.ok_or(TrackedError::RangeInvalid {
				what: "attribute index",
				value: u64::from(index),
				lower: 0,
				upper: self.attributes.len().saturating_sub(1) as u64,
			})
	}

	pub fn set_index_buffer(&mut self, index_buffer: Handle<IndexBuffer>) {
		self.index_buffer = Some(index_buffer);
	}

	pub fn clear_index_buffer(&mut self) {
		self.index_buffer = None;
	}

	fn attribute_slot_mut(
		&mut self,
		index: u32,
	) -> Result<&mut Option<AttributeSource>, TrackedError> {
		let upper = self.attributes.len().saturating_sub(1) as u64;
		self.attributes
			.get_mut(index as usize)
			.ok_or(TrackedError::RangeInvalid {
				what: "attribute index",
				value: u64::from(index),
				lower: 0,
				upper,
			})
	}
}

impl<P: TrackedPlatform> Tracked<P> {
	pub fn array_object_builder(&self) -> ArrayObjectBuilder {
		ArrayObjectBuilder::with_attributes(self.counts().vertex_attributes)
	}

	/// Allocate an array object from `builder`. Every referenced buffer is
	/// guard-checked before anything is created; the fresh object is left
	/// bound.
	pub fn array_object_allocate(
		&mut self,
		builder: &ArrayObjectBuilder,
	) -> Result<Handle<ArrayObject>, TrackedError> {
		let current = self.require_current()?;
		for source in builder.attributes.iter().flatten() {
			self.check_use(source.buffer.erase())?;
		}
		if let Some(index_buffer) = builder.index_buffer {
			self.check_use(index_buffer.erase())?;
		}

		let name = self.platform.allocate(ResourceKind::ArrayObject);
		log::debug!("allocate array object {:?}", name);
		self.resources.insert(
			name,
			ResourceMeta {
				kind: ResourceKind::ArrayObject,
				owner: current,
				deleted: false,
				payload: ResourcePayload::ArrayObject,
			},
		);
		for (index, source) in builder.attributes.iter().enumerate() {
			if let Some(source) = source {
				self.graph
					.attach(name, SlotId::VertexAttribute(index as u32), source.buffer.name());
			}
		}
		if let Some(index_buffer) = builder.index_buffer {
			self.graph
				.attach(name, SlotId::IndexBuffer, index_buffer.name());
		}

		let handle = Handle::from_parts(name, current);
		self.platform.bind(BindTarget::ArrayObject, Some(name));
		self.bindings_of_mut(current).array_object.bind(handle);
		Ok(handle)
	}

	pub fn array_object_bind(&mut self, handle: Handle<ArrayObject>) -> Result<(), TrackedError> {
		let current = self.check_use(handle.erase())?;
		log::trace!("bind array object {:?}", handle.name());
		self.platform
			.bind(BindTarget::ArrayObject, Some(handle.name()));
		self.bindings_of_mut(current).array_object.bind(handle);
		Ok(())
	}

	pub fn array_object_unbind(&mut self) -> Result<(), TrackedError> {
		let current = self.require_current()?;
		log::trace!("unbind array object");
		self.platform.bind(BindTarget::ArrayObject, None);
		self.bindings_of_mut(current).array_object.unbind();
		Ok(())
	}

	pub fn array_object_bound(&self) -> Result<Option<Handle<ArrayObject>>, TrackedError> {
		let current = self.require_current()?;
		Ok(self
			.bindings_of(current)
			.and_then(|bindings| bindings.array_object.bound()))
	}

	/// The index buffer currently attached to `handle`, independent of what
	/// is bound.
	pub fn array_object_index_buffer(
		&self,
		handle: Handle<ArrayObject>,
	) -> Result<Option<Handle<IndexBuffer>>, TrackedError> {
		self.check_use(handle.erase())?;
		Ok(self
			.graph
			.slot(handle.name(), SlotId::IndexBuffer)
			.and_then(|name| self.typed_handle(name)))
	}

	/// The array buffer feeding attribute `index` of `handle`.
	pub fn array_object_attribute_buffer(
		&self,
		handle: Handle<ArrayObject>,
		index: u32,
	) -> Result<Option<Handle<ArrayBuffer>>, TrackedError> {
		self.check_use(handle.erase())?;
		if index >= self.counts().vertex_attributes {
			return Err(TrackedError::RangeInvalid {
				what: "attribute index",
				value: u64::from(index),
				lower: 0,
				upper: u64::from(self.counts().vertex_attributes) - 1,
			});
		}
		Ok(self
			.graph
			.slot(handle.name(), SlotId::VertexAttribute(index))
			.and_then(|name| self.typed_handle(name)))
	}

	pub fn array_object_delete(&mut self, handle: Handle<ArrayObject>) -> Result<(), TrackedError> {
		self.delete_common(handle.erase())
	}
}
