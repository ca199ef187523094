//! Core input types: port specifications and scan targets.

mod port;
mod target;

pub use port::{parse_ports, PortList, PortRange, PortSpec, PortSpecError, MAX_PORT};
pub use target::{resolve_target, ScanTarget, TargetError};
