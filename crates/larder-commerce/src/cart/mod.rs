//! Cart lines, quantity rules and the per-owner cart store.

mod line;
mod quantity;
mod store;

pub use line::{CartLine, LineQuantity};
pub use quantity::{
    commit_units, commit_weight, parse_quantity, snap_to_step, UnitCount, WeightAmount,
    WeightDraft, DEFAULT_WEIGHT, LIVE_EDIT_VERBATIM_BELOW, MAX_UNITS_PER_LINE,
    MAX_WEIGHT_PER_LINE, MIN_UNITS, MIN_WEIGHT, WEIGHT_STEP,
};
pub use store::CartStore;
