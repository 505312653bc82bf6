//! Local host and OS facts reported by the echo service.

use std::fmt;

use serde::Serialize;
use sysinfo::System;

const UNKNOWN: &str = "unknown";
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Snapshot of host diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct HostFacts {
    pub hostname: String,
    pub os_type: String,
    pub platform: String,
    pub arch: String,
    pub release: String,
    /// Seconds since boot.
    pub uptime: u64,
    /// Free memory in megabytes. Never exceeds `total_memory_mb`.
    pub free_memory_mb: f64,
    pub total_memory_mb: f64,
    pub cpu_count: usize,
    pub cpu_model: String,
    pub cpu_speed_mhz: u64,
}

impl HostFacts {
    /// Collect a fresh snapshot.
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu();

        let total = sys.total_memory();
        let free = sys.free_memory().min(total);

        let cpus = sys.cpus();
        let (cpu_model, cpu_speed_mhz) = cpus
            .first()
            .map(|cpu| (cpu.brand().trim().to_string(), cpu.frequency()))
            .unwrap_or_else(|| (UNKNOWN.to_string(), 0));

        Self {
            hostname: System::host_name().unwrap_or_else(|| UNKNOWN.to_string()),
            os_type: System::name().unwrap_or_else(|| UNKNOWN.to_string()),
            platform: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            release: System::kernel_version().unwrap_or_else(|| UNKNOWN.to_string()),
            uptime: System::uptime(),
            free_memory_mb: free as f64 / BYTES_PER_MB,
            total_memory_mb: total as f64 / BYTES_PER_MB,
            cpu_count: cpus.len(),
            cpu_model,
            cpu_speed_mhz,
        }
    }
}

impl fmt::Display for HostFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Host: {}", self.hostname)?;
        writeln!(f, "OS Type: {}", self.os_type)?;
        writeln!(f, "OS Platform: {}", self.platform)?;
        writeln!(f, "OS Arch: {}", self.arch)?;
        writeln!(f, "OS Release: {}", self.release)?;
        writeln!(f, "OS Uptime: {}", self.uptime)?;
        writeln!(f, "OS Free memory: {}mb", self.free_memory_mb)?;
        writeln!(f, "OS Total memory: {}mb", self.total_memory_mb)?;
        writeln!(f, "OS CPU count: {}", self.cpu_count)?;
        writeln!(f, "OS CPU model: {}", self.cpu_model)?;
        writeln!(f, "OS CPU speed: {}mhz", self.cpu_speed_mhz)
    }
}
