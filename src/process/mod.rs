//! 进程模块
//!
//! 进程是可寻址的状态机：不透明的整数状态加上一个行为回调。

mod behavior;
mod process;

pub use behavior::Behavior;
pub use process::{Process, ProcessSpec};

/// 进程状态：只有进程自己的行为能解释其含义
pub type State = i32;
