pub mod cli;
pub mod data;
pub mod logging;
pub mod solver;
pub mod utility;
