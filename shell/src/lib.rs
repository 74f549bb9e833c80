//! Terminal front end for the todo service: line commands, a plain-text
//! renderer and a blocking ureq `Transport`.

pub mod command;
pub mod render;
pub mod transport;
