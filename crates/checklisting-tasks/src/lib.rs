//! Checklisting Tasks - Built-in checks
//!
//! Leaf task implementations (environment and filesystem checks, subprocess,
//! socket and HTTP probes, ZooKeeper, host resources, remote checklists) and
//! the registry that builds them from configuration.

pub mod env;
pub mod external;
pub mod file;
pub mod http;
pub mod path;
pub mod registry;
pub mod socket;
pub mod static_result;
pub mod subprocess;
pub mod system;
pub mod zookeeper;

pub use env::EnvVarTask;
pub use external::{normalize_source, ExternalChecklistTask, ExternalChecklistValidator};
pub use file::{FileContentTask, InfoLineValidator, LineValidator, PatternLineValidator};
pub use http::{HttpTask, ResponseValidator, SimpleResponseValidator};
pub use path::{DirectoryExistsTask, FileExistsTask};
pub use registry::{FnTaskFactory, TaskFactory, TaskRegistry};
pub use socket::SocketTask;
pub use static_result::StaticResultTask;
pub use subprocess::{ExitCodeValidator, ProcessOutput, SubprocessTask, SubprocessValidator};
pub use system::{
    CpuInfoTask, CpuInfoValidator, CpuLoadValidator, CpuSnapshot, DiskInfoTask, DiskInfoValidator,
    DiskUsage, MemoryInfoTask, MemoryInfoValidator, Thresholds,
};
pub use zookeeper::{MntrLineValidator, RuokLineValidator, ZookeeperTask};
