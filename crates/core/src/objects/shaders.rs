use crate::binding::BindTarget;
use crate::error::TrackedError;
use crate::graph::SlotId;
use crate::handle::{
	FragmentShader, Handle, Program, ResourceContent, ResourceKind, VertexShader,
};
use crate::platform::TrackedPlatform;
use crate::resource::{ResourceMeta, ResourcePayload, ShaderStage};
use crate::tracked::Tracked;

/// A linked program is a reference container over its shader stages. Deleting
/// a stage detaches it from every referring program; the program itself stays
/// linked and usable.
impl<P: TrackedPlatform> Tracked<P> {
	pub fn vertex_shader_compile(&mut self, source: &str) -> Result<Handle<VertexShader>, TrackedError> {
		self.shader_compile_inner(ShaderStage::Vertex, source)
	}

	pub fn fragment_shader_compile(
		&mut self,
		source: &str,
	) -> Result<Handle<FragmentShader>, TrackedError> {
		self.shader_compile_inner(ShaderStage::Fragment, source)
	}

	pub fn program_link(
		&mut self,
		vertex: Handle<VertexShader>,
		fragment: Handle<FragmentShader>,
	) -> Result<Handle<Program>, TrackedError> {
		let current = self.check_use(vertex.erase())?;
		self.check_use(fragment.erase())?;

		let vertex_source = self.shader_source_of(vertex.name());
		let fragment_source = self.shader_source_of(fragment.name());
		let name = self.platform.allocate(ResourceKind::Program);
		log::debug!("link program {:?} ({:?} + {:?})", name, vertex.name(), fragment.name());
		let interface = self
			.platform
			.link_program(name, &vertex_source, &fragment_source);
		self.resources.insert(
			name,
			ResourceMeta {
				kind: ResourceKind::Program,
				owner: current,
				deleted: false,
				payload: ResourcePayload::Program { interface },
			},
		);
		self.graph.attach(name, SlotId::VertexStage, vertex.name());
		self.graph
			.attach(name, SlotId::FragmentStage, fragment.name());
		Ok(Handle::from_parts(name, current))
	}

	pub fn program_activate(&mut self, handle: Handle<Program>) -> Result<(), TrackedError> {
		let current = self.check_use(handle.erase())?;
		log::trace!("activate program {:?}", handle.name());
		self.platform.bind(BindTarget::Program, Some(handle.name()));
		self.bindings_of_mut(current).program.bind(handle);
		Ok(())
	}

	pub fn program_deactivate(&mut self) -> Result<(), TrackedError> {
		let current = self.require_current()?;
		log::trace!("deactivate program");
		self.platform.bind(BindTarget::Program, None);
		self.bindings_of_mut(current).program.unbind();
		Ok(())
	}

	pub fn program_active(&self) -> Result<Option<Handle<Program>>, TrackedError> {
		let current = self.require_current()?;
		Ok(self
			.bindings_of(current)
			.and_then(|bindings| bindings.program.bound()))
	}

	/// Location of the named vertex attribute in the linked interface.
	pub fn program_attribute(&self, handle: Handle<Program>, name: &str) -> Result<u32, TrackedError> {
		self.check_use(handle.erase())?;
		self.program_interface_lookup(handle, name, true)
	}

	/// Location of the named uniform in the linked interface.
	pub fn program_uniform(&self, handle: Handle<Program>, name: &str) -> Result<u32, TrackedError> {
		self.check_use(handle.erase())?;
		self.program_interface_lookup(handle, name, false)
	}

	pub fn vertex_shader_delete(&mut self, handle: Handle<VertexShader>) -> Result<(), TrackedError> {
		self.delete_common(handle.erase())
	}

	pub fn fragment_shader_delete(
		&mut self,
		handle: Handle<FragmentShader>,
	) -> Result<(), TrackedError> {
		self.delete_common(handle.erase())
	}

	pub fn program_delete(&mut self, handle: Handle<Program>) -> Result<(), TrackedError> {
		self.delete_common(handle.erase())
	}

	fn shader_compile_inner<C: ResourceContent>(
		&mut self,
		stage: ShaderStage,
		source: &str,
	) -> Result<Handle<C>, TrackedError> {
		let current = self.require_current()?;
		if source.trim().is_empty() {
			return Err(TrackedError::RangeInvalid {
				what: "shader source octets",
				value: 0,
				lower: 1,
				upper: u64::MAX,
			});
		}
		let name = self.platform.allocate(C::KIND);
		log::debug!("compile {:?} shader {:?} ({} octets)", stage, name, source.len());
		self.platform.compile_shader(name, stage, source);
		self.resources.insert(
			name,
			ResourceMeta {
				kind: C::KIND,
				owner: current,
				deleted: false,
				payload: ResourcePayload::Shader {
					source: source.to_string(),
				},
			},
		);
		Ok(Handle::from_parts(name, current))
	}

	fn program_interface_lookup(
		&self,
		handle: Handle<Program>,
		name: &str,
		attribute: bool,
	) -> Result<u32, TrackedError> {
		let location = match self.resources.get(handle.name()).map(|meta| &meta.payload) {
			Some(ResourcePayload::Program { interface }) => {
				let table = if attribute {
					&interface.attributes
				} else {
					&interface.uniforms
				};
				table.get(name).copied()
			}
			_ => None,
		};
		location.ok_or_else(|| TrackedError::AttributeMissing {
			program: handle.name(),
			name: name.to_string(),
		})
	}
}
