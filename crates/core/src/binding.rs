use crate::handle::{
	ArrayBuffer, ArrayObject, Framebuffer, Handle, ObjectName, Program, ResourceContent, Texture2d,
};
use smallvec::SmallVec;

/// Index of a texture unit, the scarce binding slots textures are attached to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct UnitIndex(u32);

impl UnitIndex {
	#[inline]
	pub fn new(index: u32) -> Self {
		Self(index)
	}

	#[inline]
	pub fn to_u32(self) -> u32 {
		self.0
	}
}

/// A native binding target. The platform adapter receives these verbatim;
/// the tracker's own state lives in [`ContextBindings`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BindTarget {
	ArrayBuffer,
	IndexBuffer,
	ArrayObject,
	Program,
	DrawFramebuffer,
	TextureUnit(UnitIndex),
}

/// One single-slot binding point. Binding displaces the previous occupant
/// implicitly; unbinding is idempotent.
#[derive(Debug)]
pub(crate) struct BindingPoint<C: ResourceContent> {
	current: Option<Handle<C>>,
}

impl<C: ResourceContent> Default for BindingPoint<C> {
	fn default() -> Self {
		Self { current: None }
	}
}

impl<C: ResourceContent> BindingPoint<C> {
	#[inline]
	pub fn bind(&mut self, handle: Handle<C>) {
		self.current = Some(handle);
	}

	#[inline]
	pub fn unbind(&mut self) {
		self.current = None;
	}

	#[inline]
	pub fn bound(&self) -> Option<Handle<C>> {
		self.current
	}

	/// Reset to unbound iff the point currently holds `name`.
	pub fn clear_if(&mut self, name: ObjectName) -> bool {
		if self.current.is_some_and(|h| h.name() == name) {
			self.current = None;
			true
		} else {
			false
		}
	}
}

/// The per-context binding registries, one per resource category. Registries
/// are independent: binding an array object never touches the texture units.
pub(crate) struct ContextBindings {
	pub array_buffer: BindingPoint<ArrayBuffer>,
	pub array_object: BindingPoint<ArrayObject>,
	pub program: BindingPoint<Program>,
	pub draw_framebuffer: BindingPoint<Framebuffer>,
	pub units: Vec<BindingPoint<Texture2d>>,
}

impl ContextBindings {
	pub fn new(units: usize) -> Self {
		Self {
			array_buffer: BindingPoint::default(),
			array_object: BindingPoint::default(),
			program: BindingPoint::default(),
			draw_framebuffer: BindingPoint::default(),
			units: (0..units).map(|_| BindingPoint::default()).collect(),
		}
	}

	#[inline]
	pub fn unit(&self, unit: UnitIndex) -> Option<&BindingPoint<Texture2d>> {
		self.units.get(unit.to_u32() as usize)
	}

	#[inline]
	pub fn unit_mut(&mut self, unit: UnitIndex) -> Option<&mut BindingPoint<Texture2d>> {
		self.units.get_mut(unit.to_u32() as usize)
	}

	/// Clear every point currently holding `name`, returning the native
	/// targets that were reset. Deleting one resource never disturbs the
	/// bindings of any other.
	pub fn clear_name(&mut self, name: ObjectName) -> SmallVec<[BindTarget; 2]> {
		let mut cleared = SmallVec::new();
		if self.array_buffer.clear_if(name) {
			cleared.push(BindTarget::ArrayBuffer);
		}
		if self.array_object.clear_if(name) {
			cleared.push(BindTarget::ArrayObject);
		}
		if self.program.clear_if(name) {
			cleared.push(BindTarget::Program);
		}
		if self.draw_framebuffer.clear_if(name) {
			cleared.push(BindTarget::DrawFramebuffer);
		}
		for (index, point) in self.units.iter_mut().enumerate() {
			if point.clear_if(name) {
				cleared.push(BindTarget::TextureUnit(UnitIndex::new(index as u32)));
			}
		}
		cleared
	}
}
