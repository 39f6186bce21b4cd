//! Actor-based worker pool
//!
//! Each worker runs as an independent async task and is driven through a
//! [`worker::WorkerHandle`].
//!
//! ```text
//!                  ┌──────────────────────┐
//!                  │  DistributedMonitor  │
//!                  └──────────┬───────────┘
//!                             │ Process(subnet_id) (mpsc)
//!              ┌──────────────┼──────────────┐
//!              │              │              │
//!      ┌───────▼──────┐ ┌─────▼────────┐ ┌───▼──────────┐
//!      │   Worker-0   │ │   Worker-1   │ │   Worker-N   │
//!      └───────┬──────┘ └─────┬────────┘ └───┬──────────┘
//!              │              │              │
//!              └──────────────┼──────────────┘
//!                             │ ProcessingResult (oneshot)
//!                             ▼
//!                  collected in bounded groups
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: Each worker has an mpsc command channel
//! 2. **Request/Response**: oneshot channels carry results and stats back

pub mod messages;
pub mod worker;
