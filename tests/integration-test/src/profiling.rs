#![cfg(test)]

use crate::tracked;
use rust_gl_tracked::profiler::Profiling;

#[test]
fn test_measurement_nodes_survive_frames_until_trimmed() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();
	let mut profiling = Profiling::new();
	profiling.set_enabled(true);

	for _ in 0..4 {
		profiling.start_frame();
		profiling.measure_begin(&mut gl, &["frame"])?;
		profiling.measure_begin(&mut gl, &["frame", "shadows"])?;
		profiling.measure_end(&mut gl, &["frame", "shadows"])?;
		profiling.measure_begin(&mut gl, &["frame", "sky"])?;
		profiling.measure_end(&mut gl, &["frame", "sky"])?;
		profiling.measure_end(&mut gl, &["frame"])?;
	}

	// the cache stabilizes at three nodes, no matter how many frames run
	assert_eq!(profiling.node_count(), 3);
	let shadows_timer = profiling.timer_of(&["frame", "shadows"]);

	profiling.trim(&mut gl)?;
	assert_eq!(profiling.node_count(), 0);
	let shadows_timer = shadows_timer.ok_or_else(|| anyhow::anyhow!("timer was allocated"))?;
	assert!(gl.is_deleted(shadows_timer));

	// the next frame rebuilds the tree with fresh timers
	profiling.start_frame();
	profiling.measure_begin(&mut gl, &["frame", "shadows"])?;
	profiling.measure_end(&mut gl, &["frame", "shadows"])?;
	assert_eq!(profiling.node_count(), 2);
	assert_ne!(profiling.timer_of(&["frame", "shadows"]), Some(shadows_timer));
	Ok(())
}
