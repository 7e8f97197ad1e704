/// Process snapshots for the console's diagnostic surfaces.
///
/// The console does not own the process table. Whoever does implements
/// `ProcessTable` and hands out an atomic snapshot; the console only renders
/// it (Ctrl-P dump from the interrupt path, `top` from the shell).
use core::fmt;

/// Upper bound on processes in one snapshot.
pub const NPROC: usize = 16;

/// Process name length (including null terminator).
pub const PROC_NAME_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    Unused,
    Used,
    Sleeping,
    Runnable,
    Running,
    Zombie,
}

impl ProcState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcState::Unused => "UNUSED",
            ProcState::Used => "USED",
            ProcState::Sleeping => "SLEEPING",
            ProcState::Runnable => "RUNNABLE",
            ProcState::Running => "RUNNING",
            ProcState::Zombie => "ZOMBIE",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProcInfo {
    pub pid: u32,
    pub ppid: u32,
    pub state: ProcState,
    name: [u8; PROC_NAME_LEN],
}

impl ProcInfo {
    pub const fn empty() -> Self {
        Self {
            pid: 0,
            ppid: 0,
            state: ProcState::Unused,
            name: [0u8; PROC_NAME_LEN],
        }
    }

    pub fn new(pid: u32, name: &str, ppid: u32, state: ProcState) -> Self {
        let mut info = Self {
            pid,
            ppid,
            state,
            name: [0u8; PROC_NAME_LEN],
        };
        let copy_len = name.len().min(PROC_NAME_LEN - 1);
        info.name[..copy_len].copy_from_slice(&name.as_bytes()[..copy_len]);
        info
    }

    /// Name up to the first null.
    pub fn name(&self) -> &str {
        let len = self.name.iter().position(|&b| b == 0).unwrap_or(PROC_NAME_LEN);
        core::str::from_utf8(&self.name[..len]).unwrap_or("?")
    }
}

/// Point-in-time view of the process table.
#[derive(Debug, Clone, Copy)]
pub struct ProcSnapshot {
    pub uptime_secs: u64,
    pub running: usize,
    pub sleeping: usize,
    total: usize,
    procs: [ProcInfo; NPROC],
}

impl ProcSnapshot {
    pub const fn empty() -> Self {
        Self {
            uptime_secs: 0,
            running: 0,
            sleeping: 0,
            total: 0,
            procs: [ProcInfo::empty(); NPROC],
        }
    }

    /// Add a process, updating the state counters. False once `NPROC` is hit.
    pub fn push(&mut self, info: ProcInfo) -> bool {
        if self.total == NPROC {
            return false;
        }
        match info.state {
            ProcState::Running => self.running += 1,
            ProcState::Sleeping => self.sleeping += 1,
            _ => {}
        }
        self.procs[self.total] = info;
        self.total += 1;
        true
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn procs(&self) -> &[ProcInfo] {
        &self.procs[..self.total]
    }
}

/// Source of process snapshots.
pub trait ProcessTable: Sync {
    /// Consistent snapshot of uptime, counters, and per-process records.
    fn snapshot(&self) -> ProcSnapshot;
}

/// Short listing, one `pid state name` line per process. Printed on Ctrl-P.
pub fn dump(out: &mut dyn fmt::Write, snap: &ProcSnapshot) -> fmt::Result {
    out.write_str("\n")?;
    for p in snap.procs() {
        if p.state == ProcState::Unused {
            continue;
        }
        writeln!(out, "{} {} {}", p.pid, p.state.as_str(), p.name())?;
    }
    Ok(())
}

/// Full `top` report: uptime, counters, then a pid/name/ppid/state table.
pub fn render_top(out: &mut dyn fmt::Write, snap: &ProcSnapshot) -> fmt::Result {
    writeln!(out, "uptime: {} seconds", snap.uptime_secs)?;
    writeln!(out, "total: {}", snap.total())?;
    writeln!(out, "running: {}", snap.running)?;
    writeln!(out, "sleeping: {}", snap.sleeping)?;
    writeln!(out, "{:>8} {:<16} {:>6} {:<10}", "pid", "name", "ppid", "state")?;
    for p in snap.procs() {
        writeln!(out, "{:>8} {:<16} {:>6} {:<10}", p.pid, p.name(), p.ppid, p.state.as_str())?;
    }
    Ok(())
}

/// Process table that always returns the same snapshot.
#[cfg(test)]
pub struct FixedTable(pub ProcSnapshot);

#[cfg(test)]
impl FixedTable {
    /// Two-process table with 42 seconds of uptime.
    pub fn sample() -> Self {
        let mut snap = ProcSnapshot::empty();
        snap.uptime_secs = 42;
        snap.push(ProcInfo::new(1, "init", 0, ProcState::Sleeping));
        snap.push(ProcInfo::new(2, "kshell", 1, ProcState::Running));
        Self(snap)
    }
}

#[cfg(test)]
impl ProcessTable for FixedTable {
    fn snapshot(&self) -> ProcSnapshot {
        self.0
    }
}
