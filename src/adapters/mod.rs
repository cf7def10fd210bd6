// Adapters layer: collaborators that feed the core from outside (roster files).

pub mod roster;
