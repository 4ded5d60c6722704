//! 命令定义和实现

pub mod config;
pub mod lookup;
pub mod simulate;

pub use config::ConfigCommand;
pub use lookup::LookupCommand;
pub use simulate::SimulateCommand;
