#![allow(dead_code)]

pub mod integrands;
