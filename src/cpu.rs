//! Thread-to-CPU pinning.
//!
//! The queue itself never depends on placement; benches and the integrity
//! test pin the two threads to reduce scheduling noise.

use crate::error::Result;

#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu_id: usize) -> Result<()> {
    use nix::sched::{ sched_setaffinity, CpuSet };
    use nix::unistd::Pid;

    let mut cpu_set = CpuSet::new();
    cpu_set.set(cpu_id)?;
    // Pid 0 targets the calling thread
    sched_setaffinity(Pid::from_raw(0), &cpu_set)?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu_id: usize) -> Result<()> {
    Ok(())
}
