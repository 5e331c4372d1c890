//! The interactive front end for [`hopnet_core`]: command line handling,
//! topology files and the operator console.

pub mod cli;
pub mod console;
pub mod ndl;
