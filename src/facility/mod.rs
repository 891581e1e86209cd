//! 设施模块
//!
//! 设施是容量受限的共享资源：FIFO 等待队列加上使用统计。

mod facility;
mod report;
mod stats;

pub use facility::{Facility, WaitEntry};
pub use report::FacilityReport;
pub use stats::FacilityStats;
