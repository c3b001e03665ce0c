pub mod prelude;

pub mod atoms;
pub mod engine;
pub mod error;
pub mod intor;
pub mod provider;
pub mod structs;
pub mod transform;
pub mod util;
