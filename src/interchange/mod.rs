pub mod fcpxml;
pub mod xml;
