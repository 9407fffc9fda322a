//! `rd-route` — turning a set of stops into a directed visiting order.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`oracle`]    | `RoutingOracle` trait, `Tour`, `HybridOracle`            |
//! | [`exact`]     | `ExactOracle` (Held-Karp, small inputs)                  |
//! | [`two_opt`]   | `TwoOptOracle` (nearest neighbour + 2-opt)               |
//! | [`sequencer`] | `RouteSequencer`, `DirectedRoute`                        |
//! | [`error`]     | `RouteError`, `RouteResult<T>`                           |
//!
//! # Oracle contract
//!
//! `solve(points, origin)` returns an open tour — a permutation of
//! `0..points.len()` whose first element is `origin` — and its length.  The
//! robot never returns to the origin inside a tour, so there is no closing
//! edge.  One and two points have trivial orders.

pub mod error;
pub mod exact;
pub mod oracle;
pub mod sequencer;
pub mod two_opt;


pub use error::{RouteError, RouteResult};
pub use exact::ExactOracle;
pub use oracle::{HybridOracle, RoutingOracle, Tour, open_tour_length};
pub use sequencer::{DirectedRoute, RouteSequencer};
pub use two_opt::TwoOptOracle;
