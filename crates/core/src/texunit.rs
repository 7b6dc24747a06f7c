use crate::binding::UnitIndex;
use crate::error::TrackedError;
use crate::handle::{Handle, Texture2d};
use crate::platform::TrackedPlatform;
use crate::resource::TextureFormat;
use crate::tracked::Tracked;
use smallvec::SmallVec;

/// Token identifying one allocation context of a [`UnitAllocator`]. Tokens
/// are plain values; validity is checked against the allocator's stack on
/// every use, so a token kept across a `finish` simply stops working.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct UnitContext {
	serial: u64,
}

const ROOT_SERIAL: u64 = 0;

struct Frame {
	serial: u64,
	/// units this context owns, in claim order
	claimed: SmallVec<[UnitIndex; 8]>,
	/// units moved out of the shared pool up front, lowest index first
	reserved: SmallVec<[UnitIndex; 8]>,
}

impl Frame {
	fn new(serial: u64) -> Self {
		Self {
			serial,
			claimed: SmallVec::new(),
			reserved: SmallVec::new(),
		}
	}
}

/// A stack of nested allocation contexts over a fixed pool of texture units.
///
/// Only the top of the stack is *current*; claiming through any other
/// context (a finished one, or a parent whose child is still live) fails
/// with `ContextNotActive` and changes nothing. Claims prefer a context's
/// private reserve, then the shared pool, lowest index first. Finishing a
/// context unbinds everything it claimed and returns the units, including an
/// unused reserve, to the pool. The root context owns the whole pool and can
/// never be finished.
///
/// Exhaustion and depth errors are recoverable: a failed operation never
/// leaves partial claims behind.
pub struct UnitAllocator {
	stack: Vec<Frame>,
	/// units owned by no context, ascending
	free: Vec<UnitIndex>,
	/// maximum number of nested (non-root) contexts
	max_depth: usize,
	next_serial: u64,
}

impl UnitAllocator {
	/// Create an allocator over units `0..units` allowing at most
	/// `max_depth` nested contexts.
	pub fn new(units: u32, max_depth: usize) -> Result<Self, TrackedError> {
		if units == 0 {
			return Err(TrackedError::RangeInvalid {
				what: "texture unit count",
				value: 0,
				lower: 1,
				upper: u64::from(u32::MAX),
			});
		}
		Ok(Self {
			stack: vec![Frame::new(ROOT_SERIAL)],
			free: (0..units).map(UnitIndex::new).collect(),
			max_depth,
			next_serial: ROOT_SERIAL + 1,
		})
	}

	#[inline]
	pub fn root(&self) -> UnitContext {
		UnitContext { serial: ROOT_SERIAL }
	}

	/// Units owned by no context right now.
	#[inline]
	pub fn free_count(&self) -> usize {
		self.free.len()
	}

	/// Units claimed by `context`, in claim order. Works for any context
	/// still on the stack, current or not.
	pub fn claimed(&self, context: UnitContext) -> Result<&[UnitIndex], TrackedError> {
		self.stack
			.iter()
			.find(|frame| frame.serial == context.serial)
			.map(|frame| frame.claimed.as_slice())
			.ok_or(TrackedError::ContextNotActive)
	}

	/// Open a child context of `parent`. The child claims lazily from
	/// whatever remains in the shared pool at bind time.
	pub fn context_new(&mut self, parent: UnitContext) -> Result<UnitContext, TrackedError> {
		self.require_current(parent)?;
		self.check_depth()?;
		log::trace!("new unit context");
		Ok(self.push_frame(SmallVec::new()))
	}

	/// Open a child context with `reserve` units moved out of the shared
	/// pool into the child's private reserve up front.
	pub fn context_new_with_reserved(
		&mut self,
		parent: UnitContext,
		reserve: usize,
	) -> Result<UnitContext, TrackedError> {
		self.require_current(parent)?;
		if self.free.len() < reserve {
			return Err(TrackedError::TextureUnitsExhausted {
				required: reserve,
				available: self.free.len(),
			});
		}
		self.check_depth()?;
		let reserved: SmallVec<[UnitIndex; 8]> = self.free.drain(..reserve).collect();
		log::trace!("new unit context ({} reserved)", reserve);
		Ok(self.push_frame(reserved))
	}

	/// Claim the next free unit (the context's reserve first, then the
	/// shared pool) and bind `texture` to it. The claim is committed only
	/// after the bind succeeds, so a failed bind leaves the allocator
	/// untouched.
	pub fn bind_texture_2d<P: TrackedPlatform>(
		&mut self,
		context: UnitContext,
		gl: &mut Tracked<P>,
		texture: Handle<Texture2d>,
	) -> Result<UnitIndex, TrackedError> {
		self.require_current(context)?;
		let (unit, from_reserve) = self.peek_unit()?;
		gl.texture_2d_bind(unit, texture)?;
		self.commit_claim(unit, from_reserve);
		Ok(unit)
	}

	/// Claim the next free unit and allocate a fresh texture bound to it in
	/// one step.
	pub fn allocate_texture_2d<P: TrackedPlatform>(
		&mut self,
		context: UnitContext,
		gl: &mut Tracked<P>,
		width: u32,
		height: u32,
		format: TextureFormat,
	) -> Result<(UnitIndex, Handle<Texture2d>), TrackedError> {
		self.require_current(context)?;
		let (unit, from_reserve) = self.peek_unit()?;
		let texture = gl.texture_2d_allocate(unit, width, height, format)?;
		self.commit_claim(unit, from_reserve);
		Ok((unit, texture))
	}

	/// Unbind every unit `context` claimed, return all its units to the
	/// shared pool and pop it off the stack. The root cannot be finished,
	/// and neither can a parent whose child is still live.
	pub fn context_finish<P: TrackedPlatform>(
		&mut self,
		context: UnitContext,
		gl: &mut Tracked<P>,
	) -> Result<(), TrackedError> {
		let index = self.require_current(context)?;
		if index == 0 {
			return Err(TrackedError::ContextNotActive);
		}
		// fail before any native traffic if no context is current; claimed
		// units themselves are always in range, they were bound earlier
		gl.context_current().ok_or(TrackedError::NoContextCurrent)?;
		log::trace!("finish unit context");

		if let Some(frame) = self.stack.last() {
			for unit in frame.claimed.clone() {
				gl.texture_unit_unbind(unit)?;
			}
		}
		if let Some(frame) = self.stack.pop() {
			self.free.extend(frame.claimed);
			self.free.extend(frame.reserved);
			self.free.sort_unstable();
		}
		Ok(())
	}

	/// Index of `context` in the stack iff it is the current (top) context.
	fn require_current(&self, context: UnitContext) -> Result<usize, TrackedError> {
		match self.stack.last() {
			Some(top) if top.serial == context.serial => Ok(self.stack.len() - 1),
			_ => Err(TrackedError::ContextNotActive),
		}
	}

	fn check_depth(&self) -> Result<(), TrackedError> {
		// the root does not count toward the nesting limit
		if self.stack.len() > self.max_depth {
			return Err(TrackedError::ContextLimitReached {
				limit: self.max_depth,
			});
		}
		Ok(())
	}

	fn push_frame(&mut self, reserved: SmallVec<[UnitIndex; 8]>) -> UnitContext {
		let serial = self.next_serial;
		self.next_serial += 1;
		let mut frame = Frame::new(serial);
		frame.reserved = reserved;
		self.stack.push(frame);
		UnitContext { serial }
	}

	/// The unit the next claim would take, without taking it.
	fn peek_unit(&self) -> Result<(UnitIndex, bool), TrackedError> {
		if let Some(unit) = self.stack.last().and_then(|frame| frame.reserved.first()) {
			return Ok((*unit, true));
		}
		match self.free.first() {
			Some(unit) => Ok((*unit, false)),
			None => Err(TrackedError::TextureUnitsExhausted {
				required: 1,
				available: 0,
			}),
		}
	}

	fn commit_claim(&mut self, unit: UnitIndex, from_reserve: bool) {
		if from_reserve {
			if let Some(frame) = self.stack.last_mut() {
				frame.reserved.retain(|u| *u != unit);
			}
		} else {
			self.free.retain(|u| *u != unit);
		}
		if let Some(frame) = self.stack.last_mut() {
			frame.claimed.push(unit);
		}
	}
}
