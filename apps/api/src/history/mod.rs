// History: persistence of evaluations and use-case runs, plus the combined listing.
// The record store sits outside the generation core; handlers call it after a
// result has been enforced.

pub mod handlers;
pub mod store;
