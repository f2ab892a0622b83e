/// Capacity arithmetic for instance expand and shrink decisions.
pub(crate) mod capacity;
