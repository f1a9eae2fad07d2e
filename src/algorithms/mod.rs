pub mod a_star;
pub mod common;
pub mod cost;
pub mod path;
pub mod reference;
