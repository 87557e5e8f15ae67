//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the check,
//! including test parameters, step planning, data models and the execution pipeline.
//!
//! 此模块包含检查的核心功能，
//! 包括测试参数、步骤规划、数据模型和执行流水线。

pub mod execution;
pub mod models;
pub mod params;
pub mod steps;

// Re-exports
pub use execution::{RunContext, run_check};
pub use models::RunReport;
pub use params::TestParameters;
