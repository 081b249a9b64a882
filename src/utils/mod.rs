// 工具模块 - 随机数来源

pub mod random;

pub use random::{RandomGenerator, RandomSource};
