//! CLI command implementations.

pub(crate) mod sidebars;

pub(crate) use sidebars::SidebarsCommand;
