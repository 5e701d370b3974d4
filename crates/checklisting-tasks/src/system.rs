//! Host resource checks: CPU load and usage, memory, disk space
//!
//! Each task samples the host through `sysinfo` into a plain snapshot and
//! hands it to a validator, so thresholds and messages are testable without
//! touching the machine.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use sysinfo::{Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

use checklisting_core::{Result, ResultBuilder, Task, TaskError, TaskResult};

use crate::registry::parse_params;

const GIGABYTE: f64 = (1u64 << 30) as f64;

/// Warning and error levels; values strictly above a level trip it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    warn: f64,
    error: f64,
}

impl Thresholds {
    /// `warn` must be positive and below `error`
    pub fn new(task_type: &str, warn: f64, error: f64) -> Result<Self> {
        if warn <= 0.0 || error <= warn {
            return Err(TaskError::invalid_parameters(
                task_type,
                format!("thresholds must satisfy 0 < warn < error, got warn={} error={}", warn, error),
            )
            .into());
        }
        Ok(Self { warn, error })
    }

    pub fn warn(&self) -> f64 {
        self.warn
    }

    pub fn error(&self) -> f64 {
        self.error
    }

    /// Result for `value`, with `subject` opening the message
    fn judge(&self, subject: String, value: f64, scale: f64, unit: &str) -> TaskResult {
        let (error, warn) = (self.error * scale, self.warn * scale);
        if value > error {
            TaskResult::failure(format!(
                "{} greater than error threshold [{}{}]",
                subject, self.error, unit
            ))
        } else if value > warn {
            TaskResult::warning(format!(
                "{} greater than warning threshold [{}{}]",
                subject, self.warn, unit
            ))
        } else {
            TaskResult::success(format!("{} at acceptable level", subject))
        }
    }
}

fn gigabytes(bytes: u64) -> f64 {
    bytes as f64 / GIGABYTE
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// One sample of the host CPUs
#[derive(Debug, Clone, PartialEq)]
pub struct CpuSnapshot {
    pub logical_cpus: usize,
    pub physical_cpus: usize,
    pub load_1m: f64,
    pub load_5m: f64,
    pub load_15m: f64,
    /// Usage percentage per logical CPU over the sampling interval
    pub usage: Vec<f32>,
}

/// Judges the 1 minute load average against per-CPU thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuLoadValidator {
    per_cpu: Thresholds,
}

impl CpuLoadValidator {
    pub fn new(per_cpu: Thresholds) -> Self {
        Self { per_cpu }
    }

    pub fn validate(&self, logical_cpus: usize, load_1m: f64) -> TaskResult {
        self.per_cpu.judge(
            format!("System load 1m is [{:.2}] which is", load_1m),
            load_1m,
            logical_cpus as f64,
            "/CPU",
        )
    }
}

impl Default for CpuLoadValidator {
    fn default() -> Self {
        Self::new(Thresholds {
            warn: 1.5,
            error: 2.0,
        })
    }
}

/// Reports the CPU counts and per-CPU usage as `INFO` results
#[derive(Clone)]
pub struct CpuInfoValidator {
    load: CpuLoadValidator,
    builder: ResultBuilder,
}

impl CpuInfoValidator {
    pub fn new(load: CpuLoadValidator) -> Self {
        Self {
            load,
            builder: ResultBuilder::new(),
        }
    }

    pub fn validate(&self, interval: Duration, snapshot: &CpuSnapshot) -> TaskResult {
        let count = TaskResult::info(format!(
            "Number of CPU: logical=[{}], physical=[{}]",
            snapshot.logical_cpus, snapshot.physical_cpus
        ));
        let usage = snapshot
            .usage
            .iter()
            .enumerate()
            .map(|(idx, usage)| {
                TaskResult::info(format!(
                    "CPU usage for CPU #{} for past [{}] seconds is [{:.1}%]",
                    idx,
                    interval.as_secs_f64(),
                    usage
                ))
            })
            .collect();

        self.builder.build(vec![
            self.load.validate(snapshot.logical_cpus, snapshot.load_1m),
            count,
            self.builder.build(usage),
        ])
    }
}

impl Default for CpuInfoValidator {
    fn default() -> Self {
        Self::new(CpuLoadValidator::default())
    }
}

fn default_interval_secs() -> f64 {
    5.0
}

fn default_load_warn() -> f64 {
    1.5
}

fn default_load_error() -> f64 {
    2.0
}

#[derive(Debug, Deserialize)]
struct CpuParams {
    #[serde(default = "default_interval_secs")]
    interval_secs: f64,
    #[serde(default = "default_load_warn")]
    load_warn_per_cpu: f64,
    #[serde(default = "default_load_error")]
    load_error_per_cpu: f64,
}

/// Samples CPU usage over `interval` and checks the load average
#[derive(Clone)]
pub struct CpuInfoTask {
    interval: Duration,
    validator: CpuInfoValidator,
}

impl CpuInfoTask {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            validator: CpuInfoValidator::default(),
        }
    }

    pub fn with_validator(mut self, validator: CpuInfoValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Build from `{interval_secs?, load_warn_per_cpu?, load_error_per_cpu?}`
    pub fn from_params(params: &Value) -> Result<Self> {
        let params: CpuParams = parse_params("cpu", params)?;
        let interval = Duration::try_from_secs_f64(params.interval_secs)
            .map_err(|e| TaskError::invalid_parameters("cpu", e.to_string()))?;
        let thresholds = Thresholds::new("cpu", params.load_warn_per_cpu, params.load_error_per_cpu)?;
        Ok(Self::new(interval)
            .with_validator(CpuInfoValidator::new(CpuLoadValidator::new(thresholds))))
    }

    async fn sample(&self) -> Result<CpuSnapshot> {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        tokio::time::sleep(self.interval.max(MINIMUM_CPU_UPDATE_INTERVAL)).await;
        sys.refresh_cpu_usage();

        let logical_cpus = sys.cpus().len();
        if logical_cpus == 0 {
            return Err(TaskError::Other("Could not determine number of logical CPUs".into()).into());
        }
        let physical_cpus = sys.physical_core_count().ok_or_else(|| {
            TaskError::Other("Could not determine number of physical CPUs".into())
        })?;
        let load = System::load_average();

        Ok(CpuSnapshot {
            logical_cpus,
            physical_cpus,
            load_1m: load.one,
            load_5m: load.five,
            load_15m: load.fifteen,
            usage: sys.cpus().iter().map(|cpu| cpu.cpu_usage()).collect(),
        })
    }
}

impl std::fmt::Debug for CpuInfoTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuInfoTask")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Task for CpuInfoTask {
    async fn run_check(&self) -> Result<TaskResult> {
        let snapshot = self.sample().await?;
        debug!(
            logical = snapshot.logical_cpus,
            physical = snapshot.physical_cpus,
            load_1m = snapshot.load_1m,
            "sampled cpu"
        );
        Ok(self.validator.validate(self.interval, &snapshot))
    }
}

/// Judges memory usage percentage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryInfoValidator {
    thresholds: Thresholds,
}

impl MemoryInfoValidator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn validate(&self, total_bytes: u64, used_bytes: u64) -> TaskResult {
        let used_percent = percent(used_bytes, total_bytes);
        self.thresholds.judge(
            format!(
                "System memory of [{:.2}] GB is used in [{:.1}%] which is",
                gigabytes(total_bytes),
                used_percent
            ),
            used_percent,
            1.0,
            "%",
        )
    }
}

impl Default for MemoryInfoValidator {
    fn default() -> Self {
        Self::new(Thresholds {
            warn: 80.0,
            error: 95.0,
        })
    }
}

fn default_usage_warn() -> f64 {
    80.0
}

fn default_usage_error() -> f64 {
    95.0
}

#[derive(Debug, Deserialize)]
struct UsageParams {
    #[serde(default = "default_usage_warn")]
    warn_percent: f64,
    #[serde(default = "default_usage_error")]
    error_percent: f64,
}

impl UsageParams {
    fn thresholds(task_type: &str, params: &Value) -> Result<Thresholds> {
        let params: Self = parse_params(task_type, params)?;
        Thresholds::new(task_type, params.warn_percent, params.error_percent)
    }
}

/// Checks how much of the physical memory is in use
#[derive(Debug, Clone, Default)]
pub struct MemoryInfoTask {
    validator: MemoryInfoValidator,
}

impl MemoryInfoTask {
    pub fn new(validator: MemoryInfoValidator) -> Self {
        Self { validator }
    }

    /// Build from `{warn_percent?, error_percent?}`
    pub fn from_params(params: &Value) -> Result<Self> {
        let thresholds = UsageParams::thresholds("memory", params)?;
        Ok(Self::new(MemoryInfoValidator::new(thresholds)))
    }
}

#[async_trait]
impl Task for MemoryInfoTask {
    async fn run_check(&self) -> Result<TaskResult> {
        let mut sys = System::new();
        sys.refresh_memory();
        let (total, used) = (sys.total_memory(), sys.used_memory());
        debug!(total, used, "sampled memory");
        Ok(self.validator.validate(total, used))
    }
}

/// Space usage of one mounted filesystem
#[derive(Debug, Clone, PartialEq)]
pub struct DiskUsage {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
}

/// Judges every mounted filesystem and aggregates the results
#[derive(Clone)]
pub struct DiskInfoValidator {
    thresholds: Thresholds,
    builder: ResultBuilder,
}

impl DiskInfoValidator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            builder: ResultBuilder::new(),
        }
    }

    fn validate_disk(&self, disk: &DiskUsage) -> TaskResult {
        let used_percent = percent(disk.used_bytes, disk.total_bytes);
        self.thresholds.judge(
            format!(
                "Device [{}] (mount: [{}]; fstype: [{}]) has [{:.2}] GB in total and is used in [{:.1}%] which is",
                disk.device,
                disk.mount_point,
                disk.fs_type,
                gigabytes(disk.total_bytes),
                used_percent
            ),
            used_percent,
            1.0,
            "%",
        )
    }

    pub fn validate(&self, disks: &[DiskUsage]) -> TaskResult {
        self.builder
            .build(disks.iter().map(|disk| self.validate_disk(disk)).collect())
    }
}

impl Default for DiskInfoValidator {
    fn default() -> Self {
        Self::new(Thresholds {
            warn: 80.0,
            error: 95.0,
        })
    }
}

/// Checks space usage on every mounted filesystem
#[derive(Clone, Default)]
pub struct DiskInfoTask {
    validator: DiskInfoValidator,
}

impl DiskInfoTask {
    pub fn new(validator: DiskInfoValidator) -> Self {
        Self { validator }
    }

    /// Build from `{warn_percent?, error_percent?}`
    pub fn from_params(params: &Value) -> Result<Self> {
        let thresholds = UsageParams::thresholds("disk", params)?;
        Ok(Self::new(DiskInfoValidator::new(thresholds)))
    }
}

impl std::fmt::Debug for DiskInfoTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskInfoTask")
            .field("thresholds", &self.validator.thresholds)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Task for DiskInfoTask {
    async fn run_check(&self) -> Result<TaskResult> {
        let disks = Disks::new_with_refreshed_list();
        let usages: Vec<DiskUsage> = disks
            .list()
            .iter()
            .map(|disk| DiskUsage {
                device: disk.name().to_string_lossy().into_owned(),
                mount_point: disk.mount_point().display().to_string(),
                fs_type: disk.file_system().to_string_lossy().into_owned(),
                total_bytes: disk.total_space(),
                used_bytes: disk.total_space().saturating_sub(disk.available_space()),
            })
            .collect();
        debug!(disks = usages.len(), "sampled disks");
        Ok(self.validator.validate(&usages))
    }
}
