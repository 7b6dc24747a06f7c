use crate::binding::BindTarget;
use crate::error::TrackedError;
use crate::graph::SlotId;
use crate::handle::{Framebuffer, Handle, ResourceKind, Texture2d};
use crate::platform::TrackedPlatform;
use crate::resource::{ResourceMeta, ResourcePayload};
use crate::tracked::Tracked;

/// Staged attachment configuration for a framebuffer. Index validation
/// happens here; liveness, ownership and format compatibility are checked
/// when the framebuffer is allocated.
#[derive(Clone, Debug)]
pub struct FramebufferBuilder {
	colors: Vec<Option<Handle<Texture2d>>>,
	depth: Option<Handle<Texture2d>>,
}

impl FramebufferBuilder {
	pub(crate) fn with_color_points(count: u32) -> Self {
		Self {
			colors: vec![None; count as usize],
			depth: None,
		}
	}

	pub fn attach_color(&mut self, point: u32, texture: Handle<Texture2d>) -> Result<(), TrackedError> {
		let upper = self.colors.len().saturating_sub(1) as u64;
		let slot = self
			.colors
			.get_mut(point as usize)
			.ok_or(TrackedError::RangeInvalid {
				what: "color attachment point",
				value: u64::from(point),
				lower: 0,
				upper,
			})?;
		*slot = Some(texture);
		Ok(())
	}

	pub fn attach_depth(&mut self, texture: Handle<Texture2d>) {
		self.depth = Some(texture);
	}

	pub fn color(&self, point: u32) -> Option<Handle<Texture2d>> {
		self.colors.get(point as usize).copied().flatten()
	}

	pub fn depth(&self) -> Option<Handle<Texture2d>> {
		self.depth
	}

	fn is_empty(&self) -> bool {
		self.depth.is_none() && self.colors.iter().all(Option::is_none)
	}
}

impl<P: TrackedPlatform> Tracked<P> {
	pub fn framebuffer_builder(&self) -> FramebufferBuilder {
		FramebufferBuilder::with_color_points(self.counts().color_attachments)
	}

	/// Allocate a framebuffer from `builder`. Every attached texture is
	/// guard-checked and must be renderable in the role it is attached to;
	/// the fresh framebuffer is left bound for drawing.
	pub fn framebuffer_allocate(
		&mut self,
		builder: &FramebufferBuilder,
	) -> Result<Handle<Framebuffer>, TrackedError> {
		let current = self.require_current()?;
		if builder.is_empty() {
			return Err(TrackedError::RangeInvalid {
				what: "framebuffer attachment count",
				value: 0,
				lower: 1,
				upper: u64::from(self.counts().color_attachments) + 1,
			});
		}
		for texture in builder.colors.iter().flatten() {
			self.check_use(texture.erase())?;
			self.require_renderable(*texture, "color", TextureFormatRole::Color)?;
		}
		if let Some(texture) = builder.depth {
			self.check_use(texture.erase())?;
			self.require_renderable(texture, "depth", TextureFormatRole::Depth)?;
		}

		let name = self.platform.allocate(ResourceKind::Framebuffer);
		log::debug!("allocate framebuffer {:?}", name);
		self.resources.insert(
			name,
			ResourceMeta {
				kind: ResourceKind::Framebuffer,
				owner: current,
				deleted: false,
				payload: ResourcePayload::Framebuffer,
			},
		);
		for (point, texture) in builder.colors.iter().enumerate() {
			if let Some(texture) = texture {
				self.graph
					.attach(name, SlotId::ColorAttachment(point as u32), texture.name());
			}
		}
		if let Some(texture) = builder.depth {
			self.graph
				.attach(name, SlotId::DepthAttachment, texture.name());
		}

		let handle = Handle::from_parts(name, current);
		self.platform
			.bind(BindTarget::DrawFramebuffer, Some(name));
		self.bindings_of_mut(current).draw_framebuffer.bind(handle);
		Ok(handle)
	}

	pub fn framebuffer_draw_bind(&mut self, handle: Handle<Framebuffer>) -> Result<(), TrackedError> {
		let current = self.check_use(handle.erase())?;
		log::trace!("bind draw framebuffer {:?}", handle.name());
		self.platform
			.bind(BindTarget::DrawFramebuffer, Some(handle.name()));
		self.bindings_of_mut(current).draw_framebuffer.bind(handle);
		Ok(())
	}

	pub fn framebuffer_draw_unbind(&mut self) -> Result<(), TrackedError> {
		let current = self.require_current()?;
		log::trace!("unbind draw framebuffer");
		self.platform.bind(BindTarget::DrawFramebuffer, None);
		self.bindings_of_mut(current).draw_framebuffer.unbind();
		Ok(())
	}

	pub fn framebuffer_draw_bound(&self) -> Result<Option<Handle<Framebuffer>>, TrackedError> {
		let current = self.require_current()?;
		Ok(self
			.bindings_of(current)
			.and_then(|bindings| bindings.draw_framebuffer.bound()))
	}

	pub fn framebuffer_color_attachment(
		&self,
		handle: Handle<Framebuffer>,
		point: u32,
	) -> Result<Option<Handle<Texture2d>>, TrackedError> {
		self.check_use(handle.erase())?;
		if point >= self.counts().color_attachments {
			return Err(TrackedError::RangeInvalid {
				what: "color attachment point",
				value: u64::from(point),
				lower: 0,
				upper: u64::from(self.counts().color_attachments) - 1,
			});
		}
		Ok(self
			.graph
			.slot(handle.name(), SlotId::ColorAttachment(point))
			.and_then(|name| self.typed_handle(name)))
	}

	pub fn framebuffer_depth_attachment(
		&self,
		handle: Handle<Framebuffer>,
	) -> Result<Option<Handle<Texture2d>>, TrackedError> {
		self.check_use(handle.erase())?;
		Ok(self
			.graph
			.slot(handle.name(), SlotId::DepthAttachment)
			.and_then(|name| self.typed_handle(name)))
	}

	pub fn framebuffer_delete(&mut self, handle: Handle<Framebuffer>) -> Result<(), TrackedError> {
		self.delete_common(handle.erase())
	}

	fn require_renderable(
		&self,
		texture: Handle<Texture2d>,
		point: &'static str,
		role: TextureFormatRole,
	) -> Result<(), TrackedError> {
		let Some((_, _, format)) = self.texture_storage_of(texture.name()) else {
			return Ok(());
		};
		let compatible = match role {
			TextureFormatRole::Color => format.is_color_renderable(),
			TextureFormatRole::Depth => format.is_depth_renderable(),
		};
		if !compatible {
			return Err(TrackedError::FormatIncompatible {
				kind: ResourceKind::Texture2d,
				name: texture.name(),
				format,
				point,
			});
		}
		Ok(())
	}
}

#[derive(Copy, Clone)]
enum TextureFormatRole {
	Color,
	Depth,
}
