//! Request payload decoders

pub mod json;

pub use json::JsonRequestDecoder;
