//! Read-only process metadata: uptime, memory, hostname, platform.
//!
//! Handlers never touch the OS directly; they go through [`ProcessMetrics`]
//! so tests can swap in [`FixedMetrics`].

use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sysinfo::{Pid, System};
use utoipa::ToSchema;

use crate::error::ProcessError;

/// Compiler version the binary was built with.
pub const RUST_VERSION: &str = env!("FLEEXSTACK_RUSTC_VERSION");

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Format a timestamp as RFC 3339 UTC with milliseconds, e.g. `2025-01-01T12:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current wall-clock time, formatted with [`format_timestamp`].
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Memory usage in whole MiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct MemoryUsage {
    /// Memory used by this process.
    pub used: u64,
    /// Memory available to this process.
    pub total: u64,
}

impl MemoryUsage {
    /// Convert byte counts to rounded MiB. `used` never exceeds `total`.
    pub fn from_bytes(used_bytes: u64, total_bytes: u64) -> Self {
        let total = to_mib(total_bytes);
        let used = to_mib(used_bytes).min(total);
        Self { used, total }
    }
}

fn to_mib(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_MIB).round() as u64
}

/// Source of process metadata for handlers.
pub trait ProcessMetrics: Send + Sync + std::fmt::Debug {
    /// Time since the process started serving.
    fn uptime(&self) -> Duration;

    /// Current memory usage.
    fn memory(&self) -> Result<MemoryUsage, ProcessError>;

    /// Host name of the machine.
    fn hostname(&self) -> Result<String, ProcessError>;

    /// Operating system identifier ("linux", "macos", ...).
    fn platform(&self) -> &str {
        std::env::consts::OS
    }

    /// CPU architecture identifier ("x86_64", "aarch64", ...).
    fn arch(&self) -> &str {
        std::env::consts::ARCH
    }

    /// Runtime version string.
    fn runtime_version(&self) -> &str {
        RUST_VERSION
    }
}

/// Metrics backed by the operating system.
#[derive(Debug)]
pub struct SystemMetrics {
    started: Instant,
    pid: Pid,
    system: Mutex<System>,
}

impl SystemMetrics {
    /// Create a provider; uptime counts from this call.
    pub fn new() -> Result<Self, ProcessError> {
        let pid = sysinfo::get_current_pid().map_err(|e| ProcessError::Pid(e.to_string()))?;

        Ok(Self {
            started: Instant::now(),
            pid,
            system: Mutex::new(System::new()),
        })
    }
}

impl ProcessMetrics for SystemMetrics {
    fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    fn memory(&self) -> Result<MemoryUsage, ProcessError> {
        let mut system = self.system.lock().map_err(|_| ProcessError::Poisoned)?;

        system.refresh_memory();
        if !system.refresh_process(self.pid) {
            return Err(ProcessError::ProcessNotFound(self.pid.to_string()));
        }

        let used = system
            .process(self.pid)
            .map(|process| process.memory())
            .ok_or_else(|| ProcessError::ProcessNotFound(self.pid.to_string()))?;

        Ok(MemoryUsage::from_bytes(used, system.total_memory()))
    }

    fn hostname(&self) -> Result<String, ProcessError> {
        hostname::get()
            .map_err(|e| ProcessError::Hostname(e.to_string()))?
            .into_string()
            .map_err(|_| ProcessError::Hostname("hostname is not valid UTF-8".to_string()))
    }
}

/// Canned metrics for deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedMetrics {
    /// Reported uptime.
    pub uptime: Duration,
    /// Reported memory.
    pub memory: MemoryUsage,
    /// Reported hostname.
    pub hostname: String,
    /// Reported platform.
    pub platform: String,
    /// Reported architecture.
    pub arch: String,
    /// Reported runtime version.
    pub runtime_version: String,
    /// When set, memory and hostname lookups fail with this message.
    pub failure: Option<String>,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            uptime: Duration::from_millis(12_500),
            memory: MemoryUsage { used: 12, total: 64 },
            hostname: "sample-host".to_string(),
            platform: "linux".to_string(),
            arch: "x86_64".to_string(),
            runtime_version: "1.80.0".to_string(),
            failure: None,
        }
    }
}

impl FixedMetrics {
    /// Metrics whose lookups all fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }
}

impl ProcessMetrics for FixedMetrics {
    fn uptime(&self) -> Duration {
        self.uptime
    }

    fn memory(&self) -> Result<MemoryUsage, ProcessError> {
        match &self.failure {
            Some(message) => Err(ProcessError::ProcessNotFound(message.clone())),
            None => Ok(self.memory),
        }
    }

    fn hostname(&self) -> Result<String, ProcessError> {
        match &self.failure {
            Some(message) => Err(ProcessError::Hostname(message.clone())),
            None => Ok(self.hostname.clone()),
        }
    }

    fn platform(&self) -> &str {
        &self.platform
    }

    fn arch(&self) -> &str {
        &self.arch
    }

    fn runtime_version(&self) -> &str {
        &self.runtime_version
    }
}
