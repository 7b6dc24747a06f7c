#![cfg(test)]

use crate::{tracked, tracked_with_counts};
use rust_gl_tracked::binding::UnitIndex;
use rust_gl_tracked::error::TrackedError;
use rust_gl_tracked::resource::TextureFormat;
use rust_gl_tracked::texunit::UnitAllocator;
use rust_gl_tracked::tracked::TrackedCounts;

#[test]
fn test_two_unit_pool_exhausts_and_recovers() -> anyhow::Result<()> {
	let (mut gl, _) = tracked_with_counts(TrackedCounts {
		texture_units: 2,
		..TrackedCounts::REASONABLE_DEFAULTS
	});
	let texture = gl.texture_2d_allocate(UnitIndex::new(0), 2, 2, TextureFormat::Rgba8)?;

	let mut alloc = UnitAllocator::new(2, 4)?;
	let c0 = alloc.context_new(alloc.root())?;

	// the same texture may occupy both units at once
	let u0 = alloc.bind_texture_2d(c0, &mut gl, texture)?;
	let u1 = alloc.bind_texture_2d(c0, &mut gl, texture)?;
	assert_ne!(u0, u1);
	assert_eq!(gl.texture_unit_bound(u0)?, Some(texture));
	assert_eq!(gl.texture_unit_bound(u1)?, Some(texture));

	assert_eq!(
		alloc.bind_texture_2d(c0, &mut gl, texture),
		Err(TrackedError::TextureUnitsExhausted {
			required: 1,
			available: 0,
		})
	);

	alloc.context_finish(c0, &mut gl)?;
	assert_eq!(gl.texture_unit_bound(u0)?, None);
	assert_eq!(gl.texture_unit_bound(u1)?, None);
	Ok(())
}

#[test]
fn test_nested_contexts_release_in_order() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();
	let texture = gl.texture_2d_allocate(UnitIndex::new(0), 2, 2, TextureFormat::Rgba8)?;

	let mut alloc = UnitAllocator::new(8, 3)?;
	let c0 = alloc.context_new(alloc.root())?;
	alloc.bind_texture_2d(c0, &mut gl, texture)?;

	let c1 = alloc.context_new(c0)?;
	let unit = alloc.bind_texture_2d(c1, &mut gl, texture)?;
	assert_eq!(unit, UnitIndex::new(1));

	// the parent is unusable while the child lives
	assert_eq!(
		alloc.context_finish(c0, &mut gl),
		Err(TrackedError::ContextNotActive)
	);

	alloc.context_finish(c1, &mut gl)?;
	// the parent's claim survived its child
	assert_eq!(gl.texture_unit_bound(UnitIndex::new(0))?, Some(texture));
	assert_eq!(gl.texture_unit_bound(UnitIndex::new(1))?, None);

	alloc.context_finish(c0, &mut gl)?;
	assert_eq!(gl.texture_unit_bound(UnitIndex::new(0))?, None);
	Ok(())
}

#[test]
fn test_depth_limit_of_two() -> anyhow::Result<()> {
	let mut alloc = UnitAllocator::new(4, 2)?;

	// exactly two nested contexts succeed, the third fails
	let c0 = alloc.context_new(alloc.root())?;
	let c1 = alloc.context_new(c0)?;
	assert_eq!(
		alloc.context_new(c1),
		Err(TrackedError::ContextLimitReached { limit: 2 })
	);
	Ok(())
}

#[test]
fn test_reserved_context_claims_reserve_first() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();
	let texture = gl.texture_2d_allocate(UnitIndex::new(0), 2, 2, TextureFormat::Rgba8)?;

	let mut alloc = UnitAllocator::new(4, 4)?;
	let outer = alloc.context_new(alloc.root())?;
	let inner = alloc.context_new_with_reserved(outer, 2)?;

	// the reserve covers the first two claims, then the shared pool
	assert_eq!(alloc.bind_texture_2d(inner, &mut gl, texture)?, UnitIndex::new(0));
	assert_eq!(alloc.bind_texture_2d(inner, &mut gl, texture)?, UnitIndex::new(1));
	assert_eq!(alloc.bind_texture_2d(inner, &mut gl, texture)?, UnitIndex::new(2));

	alloc.context_finish(inner, &mut gl)?;
	assert_eq!(alloc.free_count(), 4);
	Ok(())
}

#[test]
fn test_allocating_textures_through_the_allocator() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();

	let mut alloc = UnitAllocator::new(4, 4)?;
	let c0 = alloc.context_new(alloc.root())?;
	let (unit, texture) = alloc.allocate_texture_2d(c0, &mut gl, 8, 8, TextureFormat::Depth24)?;

	assert_eq!(gl.texture_unit_bound(unit)?, Some(texture));
	alloc.context_finish(c0, &mut gl)?;
	assert_eq!(gl.texture_unit_bound(unit)?, None);
	// finishing releases the unit, not the texture
	assert!(!gl.is_deleted(texture));
	Ok(())
}
