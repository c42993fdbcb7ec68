/// Type of rigid body, determining how it responds to forces and contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidBodyType {
    /// Fully simulated: integrates forces and receives contact impulses
    Dynamic,

    /// Moved by setting its velocity directly; infinite mass in contacts
    Kinematic,

    /// Never moves; infinite mass in contacts
    Static,
}
