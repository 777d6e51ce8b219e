//! The attendance engine: code lifecycle, check-in processing and
//! reporting over the entities in `db`.
//!
//! Every operation that acts on behalf of someone takes an explicit
//! [`actor::Actor`] — the engine never reads caller identity from ambient
//! state.

pub mod actor;
pub mod attendance_code;
pub mod check_in;
pub mod code_gen;
pub mod error;
pub mod reporting;

#[cfg(test)]
pub(crate) mod test_support;
