pub mod talents;
