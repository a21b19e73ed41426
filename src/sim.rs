pub(crate) mod leaf;
pub(crate) mod swarm;
pub(crate) mod wind;
