/// Per-region matching pipeline bound to a candidate pool
pub mod artist;
/// Multi-threaded grid compositor
pub mod easel;
/// Concurrent construction of the candidate pool
pub mod library;
/// Nearest-color selection with tolerance banding and cooldowns
pub mod selection;
/// Single pool entry with its cooldown counter
pub mod shape;
/// Fan-out/fan-in of worker threads with a bounded wait
pub mod task_group;
