//! Lock-free worklists for distributing tasks across threads.
//!
//! The deque here is the distribution half of a work-stealing scheduler: the
//! owning thread keeps a cheap LIFO tail for its own work while idle threads
//! steal FIFO from the head to balance load.

pub mod steal_deque;

pub use steal_deque::{steal_deque, Full, Steal, Stealer, Worker, MAX_CAPACITY};
