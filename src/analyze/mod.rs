/// Alpha content bounds.
pub mod bounds;
