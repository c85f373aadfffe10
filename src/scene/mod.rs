/// Orthographic capture camera and preview rig.
pub mod camera;
/// Shared render state and the viewport lease.
pub mod context;
