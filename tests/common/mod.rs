#![allow(dead_code)]

pub mod detectors;
pub mod fixtures;
