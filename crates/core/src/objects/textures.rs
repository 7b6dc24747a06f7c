use crate::binding::{BindTarget, UnitIndex};
use crate::error::TrackedError;
use crate::handle::{Handle, ResourceKind, Texture2d};
use crate::platform::TrackedPlatform;
use crate::resource::{ResourceMeta, ResourcePayload, TextureFormat};
use crate::tracked::Tracked;

impl<P: TrackedPlatform> Tracked<P> {
	/// Allocate a 2D texture and bind it to `unit`. Allocating requires a
	/// unit because the native layer can only configure a texture through a
	/// unit binding.
	pub fn texture_2d_allocate(
		&mut self,
		unit: UnitIndex,
		width: u32,
		height: u32,
		format: TextureFormat,
	) -> Result<Handle<Texture2d>, TrackedError> {
		let current = self.require_current()?;
		self.require_unit(unit)?;
		for (what, value) in [("texture width", width), ("texture height", height)] {
			if value == 0 {
				return Err(TrackedError::RangeInvalid {
					what,
					value: 0,
					lower: 1,
					upper: u64::from(u32::MAX),
				});
			}
		}

		let name = self.platform.allocate(ResourceKind::Texture2d);
		log::debug!(
			"allocate texture {:?} ({}x{} {:?}) on unit {:?}",
			name,
			width,
			height,
			format,
			unit
		);
		self.platform.texture_storage(name, width, height, format);
		self.resources.insert(
			name,
			ResourceMeta {
				kind: ResourceKind::Texture2d,
				owner: current,
				deleted: false,
				payload: ResourcePayload::Texture2d {
					width,
					height,
					format,
				},
			},
		);
		let handle = Handle::from_parts(name, current);
		self.platform
			.bind(BindTarget::TextureUnit(unit), Some(name));
		if let Some(point) = self.bindings_of_mut(current).unit_mut(unit) {
			point.bind(handle);
		}
		Ok(handle)
	}

	/// Bind `handle` to `unit`. A texture may be bound to any number of units
	/// simultaneously.
	pub fn texture_2d_bind(
		&mut self,
		unit: UnitIndex,
		handle: Handle<Texture2d>,
	) -> Result<(), TrackedError> {
		let current = self.check_use(handle.erase())?;
		self.require_unit(unit)?;
		log::trace!("bind texture {:?} to unit {:?}", handle.name(), unit);
		self.platform
			.bind(BindTarget::TextureUnit(unit), Some(handle.name()));
		if let Some(point) = self.bindings_of_mut(current).unit_mut(unit) {
			point.bind(handle);
		}
		Ok(())
	}

	pub fn texture_unit_unbind(&mut self, unit: UnitIndex) -> Result<(), TrackedError> {
		let current = self.require_current()?;
		self.require_unit(unit)?;
		log::trace!("unbind unit {:?}", unit);
		self.platform.bind(BindTarget::TextureUnit(unit), None);
		if let Some(point) = self.bindings_of_mut(current).unit_mut(unit) {
			point.unbind();
		}
		Ok(())
	}

	pub fn texture_unit_bound(&self, unit: UnitIndex) -> Result<Option<Handle<Texture2d>>, TrackedError> {
		let current = self.require_current()?;
		self.require_unit(unit)?;
		Ok(self
			.bindings_of(current)
			.and_then(|bindings| bindings.unit(unit))
			.and_then(|point| point.bound()))
	}

	/// True iff `handle` occupies any texture unit of the current context.
	pub fn texture_is_bound_anywhere(&self, handle: Handle<Texture2d>) -> Result<bool, TrackedError> {
		let current = self.check_use(handle.erase())?;
		Ok(self.bindings_of(current).is_some_and(|bindings| {
			bindings
				.units
				.iter()
				.any(|point| point.bound() == Some(handle))
		}))
	}

	/// Replace the full image of `handle`, which must be bound at `unit`.
	/// `data` must hold exactly width x height x bytes-per-pixel octets.
	pub fn texture_2d_update(
		&mut self,
		unit: UnitIndex,
		handle: Handle<Texture2d>,
		data: &[u8],
	) -> Result<(), TrackedError> {
		self.check_use(handle.erase())?;
		self.require_unit(unit)?;
		let expected = self
			.texture_storage_of(handle.name())
			.map_or(0, |(width, height, format)| {
				u64::from(width) * u64::from(height) * u64::from(format.bytes_per_pixel())
			});
		if data.len() as u64 != expected {
			return Err(TrackedError::RangeInvalid {
				what: "texture update octets",
				value: data.len() as u64,
				lower: expected,
				upper: expected,
			});
		}
		if self.texture_unit_bound(unit)? != Some(handle) {
			return Err(TrackedError::NotBound {
				kind: ResourceKind::Texture2d,
				name: Some(handle.name()),
			});
		}
		self.platform.texture_write(handle.name(), data);
		Ok(())
	}

	pub fn texture_2d_size(&self, handle: Handle<Texture2d>) -> Result<(u32, u32), TrackedError> {
		self.check_use(handle.erase())?;
		Ok(self
			.texture_storage_of(handle.name())
			.map_or((0, 0), |(width, height, _)| (width, height)))
	}

	pub fn texture_2d_delete(&mut self, handle: Handle<Texture2d>) -> Result<(), TrackedError> {
		self.delete_common(handle.erase())
	}

	fn require_unit(&self, unit: UnitIndex) -> Result<(), TrackedError> {
		let units = self.counts().texture_units;
		if unit.to_u32() >= units {
			return Err(TrackedError::RangeInvalid {
				what: "texture unit index",
				value: u64::from(unit.to_u32()),
				lower: 0,
				upper: u64::from(units) - 1,
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::tracked;

	fn unit(index: u32) -> UnitIndex {
		UnitIndex::new(index)
	}

	#[test]
	fn test_texture_bound_to_multiple_units() -> anyhow::Result<()> {
		let (mut gl, _) = tracked();

		let t = gl.texture_2d_allocate(unit(0), 2, 2, TextureFormat::Rgba8)?;
		gl.texture_2d_bind(unit(3), t)?;

		assert_eq!(gl.texture_unit_bound(unit(0))?, Some(t));
		assert_eq!(gl.texture_unit_bound(unit(3))?, Some(t));
		assert!(gl.texture_is_bound_anywhere(t)?);

		gl.texture_unit_unbind(unit(0))?;
		assert_eq!(gl.texture_unit_bound(unit(0))?, None);
		assert!(gl.texture_is_bound_anywhere(t)?);

		gl.texture_unit_unbind(unit(3))?;
		assert!(!gl.texture_is_bound_anywhere(t)?);
		Ok(())
	}

	#[test]
	fn test_delete_clears_every_unit() -> anyhow::Result<()> {
		let (mut gl, _) = tracked();

		let t = gl.texture_2d_allocate(unit(0), 2, 2, TextureFormat::Rgb8)?;
		let other = gl.texture_2d_allocate(unit(5), 2, 2, TextureFormat::Rgb8)?;
		gl.texture_2d_bind(unit(1), t)?;

		gl.texture_2d_delete(t)?;
		assert_eq!(gl.texture_unit_bound(unit(0))?, None);
		assert_eq!(gl.texture_unit_bound(unit(1))?, None);
		// deletion never disturbs other textures' bindings
		assert_eq!(gl.texture_unit_bound(unit(5))?, Some(other));
		Ok(())
	}

	#[test]
	fn test_allocate_validates_arguments() -> anyhow::Result<()> {
		let (mut gl, _) = tracked();

		assert!(matches!(
			gl.texture_2d_allocate(unit(99), 2, 2, TextureFormat::R8),
			Err(TrackedError::RangeInvalid { .. })
		));
		assert!(matches!(
			gl.texture_2d_allocate(unit(0), 0, 2, TextureFormat::R8),
			Err(TrackedError::RangeInvalid { .. })
		));
		Ok(())
	}

	#[test]
	fn test_update_needs_exact_size_and_binding() -> anyhow::Result<()> {
		let (mut gl, _) = tracked();

		let t = gl.texture_2d_allocate(unit(0), 2, 2, TextureFormat::R8)?;
		assert!(matches!(
			gl.texture_2d_update(unit(0), t, &[0; 3]),
			Err(TrackedError::RangeInvalid { .. })
		));
		gl.texture_2d_update(unit(0), t, &[1, 2, 3, 4])?;

		gl.texture_unit_unbind(unit(0))?;
		assert_eq!(
			gl.texture_2d_update(unit(0), t, &[1, 2, 3, 4]),
			Err(TrackedError::NotBound {
				kind: ResourceKind::Texture2d,
				name: Some(t.name()),
			})
		);
		Ok(())
	}
}
