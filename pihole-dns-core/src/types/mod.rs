//! 类型定义模块

mod input;
mod state;

pub use input::{CnameRecordInput, DnsRecordInput};
pub use state::{PlanAction, ResourceState};

// Re-export client 库的公共类型
pub use pihole_dns_client::{CnameRecord, DnsRecord, RecordKind};
